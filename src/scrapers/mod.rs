pub mod browser;
pub mod page;
pub mod snapshot;
pub mod traits;
pub mod types;

pub use browser::CaixaBrowserScraper;
pub use snapshot::SnapshotSource;
pub use traits::OfferSource;
pub use types::{ItemFailurePolicy, PageOutcome, ScrapeOptions, ScrapeReport, SearchParams};
