use crate::error::ParseError;
use crate::models::{ItemBlocks, Location, Offer};
use crate::parsers::build_offer;
use crate::scrapers::types::{ItemFailure, ItemFailurePolicy, ParsedPage};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, warn};

/// Container of the result list; browser code waits for it before parsing
pub const LIST_SELECTOR: &str = "#listaimoveispaginacao ul.control-group.no-bullets";

const ITEM_SELECTOR: &str =
    "#listaimoveispaginacao ul.control-group.no-bullets li.group-block-item";
const DATA_SELECTOR: &str = "div.dadosimovel-col2 ul.form-set.inside-set.no-bullets > li";
const TITLE_SELECTOR: &str = "a";

static LIST: Lazy<Selector> = Lazy::new(|| selector(LIST_SELECTOR));
static ITEM: Lazy<Selector> = Lazy::new(|| selector(ITEM_SELECTOR));
static DATA: Lazy<Selector> = Lazy::new(|| selector(DATA_SELECTOR));
static TITLE: Lazy<Selector> = Lazy::new(|| selector(TITLE_SELECTOR));

/// Elements rendered on their own line by a browser
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "dd", "div", "dl", "dt", "footer", "form", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hr", "li", "ol", "p", "section", "table", "tr", "ul",
];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Invalid listing selector")
}

/// Rendered text of an element, close to what a browser reports as `innerText`.
///
/// ASCII whitespace inside text nodes collapses to single spaces, `&nbsp;` is
/// kept as is; `<br>` and block-level elements start new lines.
pub fn inner_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    push_text(element, &mut text);
    text
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                for ch in text.chars() {
                    if !ch.is_ascii_whitespace() {
                        out.push(ch);
                    } else if !(out.is_empty() || out.ends_with(' ') || out.ends_with('\n')) {
                        out.push(' ');
                    }
                }
            }
            Node::Element(el) => match el.name() {
                "br" => out.push('\n'),
                "script" | "style" => {}
                name => {
                    let block = BLOCK_ELEMENTS.contains(&name);
                    if block {
                        out.push('\n');
                    }
                    if let Some(child_element) = ElementRef::wrap(child) {
                        push_text(child_element, out);
                    }
                    if block {
                        out.push('\n');
                    }
                }
            },
            _ => {}
        }
    }
}

/// Whether the page carries the result list container at all
pub fn has_listing(document: &Html) -> bool {
    document.select(&LIST).next().is_some()
}

/// Item containers in document order
pub fn listing_items(document: &Html) -> Vec<ElementRef<'_>> {
    document.select(&ITEM).collect()
}

/// Resolve the title and both text blocks of one item container.
pub fn item_blocks(item: ElementRef<'_>) -> Result<ItemBlocks, ParseError> {
    let missing = |selector: &'static str| ParseError::MissingElement {
        selector,
        html: item.html(),
    };

    let mut data = item.select(&DATA);
    let first = data.next().ok_or_else(|| missing(DATA_SELECTOR))?;
    let second = data.next().ok_or_else(|| missing(DATA_SELECTOR))?;

    let title = first
        .select(&TITLE)
        .next()
        .map(inner_text)
        .ok_or_else(|| missing(TITLE_SELECTOR))?;

    Ok(ItemBlocks {
        title: title.trim().to_string(),
        block1: inner_text(first),
        block2: inner_text(second),
    })
}

fn item_offer(location: &Location, item: ElementRef<'_>) -> Result<Offer, ParseError> {
    let blocks = item_blocks(item)?;
    build_offer(location, &blocks)
}

/// Parse every item on the page; the first failing item fails the page.
pub fn parse_offers(document: &Html, location: &Location) -> Result<Vec<Offer>, ParseError> {
    let items = listing_items(document);
    debug!("Found {} listing items", items.len());

    items
        .into_iter()
        .map(|item| item_offer(location, item))
        .collect()
}

/// Parse every item on the page, setting failing items aside.
pub fn parse_offers_isolated(document: &Html, location: &Location) -> ParsedPage {
    let mut parsed = ParsedPage::default();

    for (index, item) in listing_items(document).into_iter().enumerate() {
        match item_offer(location, item) {
            Ok(offer) => parsed.offers.push(offer),
            Err(error) => {
                warn!("Skipping listing item {}: {}", index, error);
                parsed.failures.push(ItemFailure { index, error });
            }
        }
    }

    debug!(
        "Parsed {} offers, {} items skipped",
        parsed.offers.len(),
        parsed.failures.len()
    );
    parsed
}

/// Parse a page snapshot under the given item failure policy.
pub fn parse_page(
    html: &str,
    location: &Location,
    policy: ItemFailurePolicy,
) -> Result<ParsedPage, ParseError> {
    let document = Html::parse_document(html);

    match policy {
        ItemFailurePolicy::AbortPage => Ok(ParsedPage {
            offers: parse_offers(&document, location)?,
            failures: Vec::new(),
        }),
        ItemFailurePolicy::SkipItem => Ok(parse_offers_isolated(&document, location)),
    }
}
