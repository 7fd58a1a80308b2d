use crate::scrapers::types::ScrapeReport;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for everything that yields offers: the live site or saved pages
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Visit every page and collect offers plus per-page failures
    async fn scrape(&self) -> Result<ScrapeReport>;

    /// Get the name of the source
    fn source_name(&self) -> &'static str;
}
