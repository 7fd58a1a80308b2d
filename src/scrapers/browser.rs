use crate::scrapers::page::{parse_page, LIST_SELECTOR};
use crate::scrapers::traits::OfferSource;
use crate::scrapers::types::{PageOutcome, ScrapeOptions, ScrapeReport, SearchParams};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const SEARCH_URL: &str =
    "https://venda-imoveis.caixa.gov.br/sistema/busca-imovel.asp?sltTipoBusca=imoveis";

const REGION_SELECT: &str = "#cmb_estado";
const LOCALITY_SELECT: &str = "#cmb_cidade";
const MODALITY_SELECT: &str = "#cmb_modalidade";
const PAGE_COUNT_INPUT: &str = "#hdnQtdPag";
const PAGINATION: &str = "#paginacao";

/// Text shown once the search form has moved on to the property data step
const DATA_STEP_PATTERN: &str = "Dados do im[óo]vel";
const NEXT_BUTTON_PATTERN: &str = "Pr[oó]ximo";

/// Browser-based scraper for the Caixa property sale listing using headless Chrome
pub struct CaixaBrowserScraper {
    browser: Browser,
    params: SearchParams,
    options: ScrapeOptions,
}

impl CaixaBrowserScraper {
    /// Launch Chrome for a new scrape
    pub fn new(params: SearchParams, options: ScrapeOptions) -> Result<Self> {
        info!("Launching Chrome (headless: {})...", options.headless);

        let launch = LaunchOptions::default_builder()
            .headless(options.headless)
            .idle_browser_timeout(Duration::from_secs(600))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(launch).context("Failed to launch Chrome browser")?;

        Ok(Self {
            browser,
            params,
            options,
        })
    }

    /// Fill in the search form, then walk every result page
    pub fn scrape_listing(&self) -> Result<ScrapeReport> {
        if self.options.max_pages == Some(0) {
            info!("Page limit is 0, nothing to visit");
            return Ok(ScrapeReport::new(self.params.clone()));
        }

        let tab = self.browser.new_tab()?;
        tab.set_default_timeout(self.options.wait_timeout);

        info!("Opening search page...");
        tab.navigate_to(SEARCH_URL)?;
        tab.wait_until_navigated()?;
        self.settle();

        let location = &self.params.location;
        info!(
            "Searching {} / {} ({})",
            location.region, location.locality, self.params.modality
        );
        select_option(&tab, REGION_SELECT, &location.region)?;
        self.settle();
        select_option(&tab, LOCALITY_SELECT, &location.locality)?;
        self.settle();
        select_option(&tab, MODALITY_SELECT, &self.params.modality)?;
        self.settle();

        click_next(&tab)?;
        tab.wait_until_navigated()?;
        self.settle();

        wait_for_text(&tab, DATA_STEP_PATTERN, self.options.wait_timeout)?;
        click_next(&tab)?;
        tab.wait_until_navigated()?;

        tab.wait_for_element(LIST_SELECTOR)
            .context("Result list did not appear")?;

        let mut report = ScrapeReport::new(self.params.clone());
        report.record(self.parse_current_page(&tab, 1));

        let total_pages = match self.options.max_pages {
            Some(max) => page_count(&tab).min(max),
            None => page_count(&tab),
        };
        info!("Listing has {} page(s) to visit", total_pages);

        for page in 2..=total_pages {
            let outcome = match self.open_page(&tab, page) {
                Ok(()) => self.parse_current_page(&tab, page),
                Err(e) => PageOutcome::Failed {
                    page,
                    reason: format!("{:#}", e),
                },
            };
            if let PageOutcome::Failed { reason, .. } = &outcome {
                warn!("Failed to parse page {}: {}. Continuing...", page, reason);
            }
            report.record(outcome);
        }

        info!(
            "Scraped {} offers from {} page(s)",
            report.offers.len(),
            report.pages_visited
        );
        Ok(report)
    }

    fn settle(&self) {
        thread::sleep(self.options.settle_delay);
    }

    fn open_page(&self, tab: &Tab, page: usize) -> Result<()> {
        debug!("Clicking page {}", page);
        let clicked = evaluate_bool(tab, &click_page_script(page))?;
        if !clicked {
            bail!("Page link {} not found in {}", page, PAGINATION);
        }

        thread::sleep(self.options.page_delay);
        tab.wait_for_element(LIST_SELECTOR)
            .with_context(|| format!("Result list did not reload for page {}", page))?;
        Ok(())
    }

    fn parse_current_page(&self, tab: &Tab, page: usize) -> PageOutcome {
        let html = match page_html(tab) {
            Ok(html) => html,
            Err(e) => {
                return PageOutcome::Failed {
                    page,
                    reason: format!("{:#}", e),
                }
            }
        };

        match parse_page(&html, &self.params.location, self.options.item_policy) {
            Ok(parsed) => {
                info!("Page {}: {} offers", page, parsed.offers.len());
                PageOutcome::Parsed { page, parsed }
            }
            Err(e) => {
                if let Some(dir) = &self.options.debug_dir {
                    save_debug_html(dir, page, &html);
                }
                PageOutcome::Failed {
                    page,
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[async_trait]
impl OfferSource for CaixaBrowserScraper {
    async fn scrape(&self) -> Result<ScrapeReport> {
        // headless_chrome blocks; keep it off the async worker
        tokio::task::block_in_place(|| self.scrape_listing())
    }

    fn source_name(&self) -> &'static str {
        "venda-imoveis.caixa.gov.br"
    }
}

fn evaluate_bool(tab: &Tab, script: &str) -> Result<bool> {
    let result = tab.evaluate(script, false)?;
    Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
}

/// Choose an option by value and fire `change` so the page loads dependent fields
fn select_option(tab: &Tab, selector: &str, value: &str) -> Result<()> {
    let script = format!(
        r#"(() => {{
            const select = document.querySelector({selector});
            if (!select) return false;
            select.value = {value};
            select.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return select.value === {value};
        }})()"#,
        selector = serde_json::to_string(selector)?,
        value = serde_json::to_string(value)?,
    );

    if !evaluate_bool(tab, &script)? {
        bail!("Option {:?} not available in {}", value, selector);
    }
    Ok(())
}

fn click_next(tab: &Tab) -> Result<()> {
    let script = format!(
        r#"(() => {{
            const pattern = new RegExp({pattern}, 'i');
            const button = Array.from(document.querySelectorAll('button, input[type=button], input[type=submit]'))
                .find(b => pattern.test(b.innerText || b.value || ''));
            if (!button) return false;
            button.click();
            return true;
        }})()"#,
        pattern = serde_json::to_string(NEXT_BUTTON_PATTERN)?,
    );

    if !evaluate_bool(tab, &script)? {
        bail!("Next button not found");
    }
    Ok(())
}

fn click_page_script(page: usize) -> String {
    format!(
        r#"(() => {{
            const pagination = document.querySelector('{PAGINATION}');
            if (!pagination) return false;
            const link = Array.from(pagination.querySelectorAll('*'))
                .find(el => el.children.length === 0 && el.textContent.trim() === '{page}');
            if (!link) return false;
            link.click();
            return true;
        }})()"#
    )
}

fn wait_for_text(tab: &Tab, pattern: &str, timeout: Duration) -> Result<()> {
    let script = format!(
        "new RegExp({}, 'i').test(document.body ? document.body.innerText : '')",
        serde_json::to_string(pattern)?
    );

    let started = Instant::now();
    while started.elapsed() < timeout {
        if evaluate_bool(tab, &script)? {
            return Ok(());
        }
        thread::sleep(Duration::from_millis(500));
    }
    bail!("Timed out after {:?} waiting for text /{}/", timeout, pattern)
}

/// Number of result pages from the hidden page-count field, 1 if it is absent or garbled
fn page_count(tab: &Tab) -> usize {
    let script = format!(
        "(() => {{ const el = document.querySelector('{PAGE_COUNT_INPUT}'); return el ? el.value : ''; }})()"
    );

    let raw = match tab.evaluate(&script, false) {
        Ok(result) => result
            .value
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default(),
        Err(e) => {
            debug!("Could not read page count: {}", e);
            String::new()
        }
    };

    parse_page_count(&raw)
}

fn parse_page_count(raw: &str) -> usize {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return 1;
    }
    raw.parse().unwrap_or(1)
}

fn page_html(tab: &Tab) -> Result<String> {
    let result = tab.evaluate("document.documentElement.outerHTML", false)?;
    match result.value.as_ref().and_then(|v| v.as_str()) {
        Some(html) if !html.is_empty() => Ok(html.to_string()),
        _ => bail!("Could not get HTML from page"),
    }
}

fn save_debug_html(dir: &Path, page: usize, html: &str) {
    let path = dir.join(format!("caixa_page_{}.html", page));
    let saved = std::fs::create_dir_all(dir).and_then(|_| std::fs::write(&path, html));
    match saved {
        Ok(()) => info!("Saved page HTML to {} ({} bytes)", path.display(), html.len()),
        Err(e) => warn!("Could not save page HTML to {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_defaults_to_one() {
        assert_eq!(parse_page_count(""), 1);
        assert_eq!(parse_page_count("  "), 1);
        assert_eq!(parse_page_count("3a"), 1);
        assert_eq!(parse_page_count("-2"), 1);
    }

    #[test]
    fn page_count_reads_digits() {
        assert_eq!(parse_page_count(" 12 "), 12);
    }

    #[test]
    fn page_click_script_targets_exact_number() {
        let script = click_page_script(4);
        assert!(script.contains("'#paginacao'"));
        assert!(script.contains("=== '4'"));
    }
}
