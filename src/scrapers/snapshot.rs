use crate::scrapers::page::parse_page;
use crate::scrapers::traits::OfferSource;
use crate::scrapers::types::{ItemFailurePolicy, PageOutcome, ScrapeReport, SearchParams};
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Offline source reading saved listing pages, one file per page
pub struct SnapshotSource {
    paths: Vec<PathBuf>,
    params: SearchParams,
    policy: ItemFailurePolicy,
}

impl SnapshotSource {
    pub fn new(paths: Vec<PathBuf>, params: SearchParams, policy: ItemFailurePolicy) -> Self {
        Self {
            paths,
            params,
            policy,
        }
    }

    async fn visit(&self, page: usize, path: &Path) -> PageOutcome {
        let html = match tokio::fs::read_to_string(path).await {
            Ok(html) => html,
            Err(e) => {
                return PageOutcome::Failed {
                    page,
                    reason: format!("Failed to read {}: {}", path.display(), e),
                }
            }
        };

        match parse_page(&html, &self.params.location, self.policy) {
            Ok(parsed) => PageOutcome::Parsed { page, parsed },
            Err(e) => PageOutcome::Failed {
                page,
                reason: e.to_string(),
            },
        }
    }
}

#[async_trait]
impl OfferSource for SnapshotSource {
    async fn scrape(&self) -> Result<ScrapeReport> {
        let mut report = ScrapeReport::new(self.params.clone());

        for (i, path) in self.paths.iter().enumerate() {
            let page = i + 1;
            info!("Parsing snapshot page {} from {}", page, path.display());

            let outcome = self.visit(page, path).await;
            if let PageOutcome::Failed { reason, .. } = &outcome {
                warn!("Failed to parse page {}: {}. Continuing...", page, reason);
            }
            report.record(outcome);
        }

        Ok(report)
    }

    fn source_name(&self) -> &'static str {
        "snapshot"
    }
}
