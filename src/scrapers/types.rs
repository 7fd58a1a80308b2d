use crate::error::ParseError;
use crate::models::{Location, Offer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Search parameters handed to the site's search form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Region (UF) and locality (city) dropdown values
    pub location: Location,
    /// Sale modality dropdown value
    pub modality: String,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            location: Location::new("SP", "RIBEIRAO PRETO"),
            modality: "Venda Direta Online".to_string(),
        }
    }
}

/// What to do when one listing item on a page cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ItemFailurePolicy {
    /// The first bad item fails the whole page
    AbortPage,
    /// Bad items are reported and the rest of the page is kept
    #[default]
    SkipItem,
}

/// Knobs for a scrape run
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub headless: bool,
    /// Pause after each form interaction, the site fills dropdowns asynchronously
    pub settle_delay: Duration,
    /// Pause after clicking a page number before reading the list again
    pub page_delay: Duration,
    /// Upper bound for element and text waits
    pub wait_timeout: Duration,
    pub max_pages: Option<usize>,
    pub item_policy: ItemFailurePolicy,
    /// Where to save the HTML of pages that fail to parse
    pub debug_dir: Option<PathBuf>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            headless: true,
            settle_delay: Duration::from_secs(5),
            page_delay: Duration::from_secs(4),
            wait_timeout: Duration::from_secs(30),
            max_pages: None,
            item_policy: ItemFailurePolicy::default(),
            debug_dir: None,
        }
    }
}

/// An item that was dropped from an otherwise parsed page
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    /// Position of the item container in document order
    pub index: usize,
    pub error: ParseError,
}

/// Offers parsed from one listing page, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPage {
    pub offers: Vec<Offer>,
    pub failures: Vec<ItemFailure>,
}

/// Result of visiting one page of the listing
#[derive(Debug, Clone)]
pub enum PageOutcome {
    Parsed { page: usize, parsed: ParsedPage },
    Failed { page: usize, reason: String },
}

/// A page, or a single item on it, that did not make it into the results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageFailure {
    pub page: usize,
    pub item: Option<usize>,
    pub reason: String,
}

/// Everything one run produced, pages concatenated in visiting order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    pub generated_at: DateTime<Utc>,
    pub search: SearchParams,
    pub pages_visited: usize,
    pub offers: Vec<Offer>,
    pub failures: Vec<PageFailure>,
}

impl ScrapeReport {
    pub fn new(search: SearchParams) -> Self {
        Self {
            generated_at: Utc::now(),
            search,
            pages_visited: 0,
            offers: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Fold one page into the report. Offers are appended as-is, no deduplication.
    pub fn record(&mut self, outcome: PageOutcome) {
        self.pages_visited += 1;
        match outcome {
            PageOutcome::Parsed { page, parsed } => {
                self.offers.extend(parsed.offers);
                self.failures
                    .extend(parsed.failures.into_iter().map(|failure| PageFailure {
                        page,
                        item: Some(failure.index),
                        reason: failure.error.to_string(),
                    }));
            }
            PageOutcome::Failed { page, reason } => {
                self.failures.push(PageFailure {
                    page,
                    item: None,
                    reason,
                });
            }
        }
    }
}
