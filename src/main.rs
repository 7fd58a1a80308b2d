use caixa_scout::export;
use caixa_scout::models::Location;
use caixa_scout::scrapers::{
    CaixaBrowserScraper, ItemFailurePolicy, OfferSource, ScrapeOptions, SearchParams,
    SnapshotSource,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Caixa Scout - property sale listing scraper")]
struct Args {
    /// Region (UF) dropdown value
    #[clap(long, default_value = "SP")]
    region: String,

    /// Locality (city) dropdown value
    #[clap(long, default_value = "RIBEIRAO PRETO")]
    locality: String,

    /// Sale modality dropdown value
    #[clap(long, default_value = "Venda Direta Online")]
    modality: String,

    /// Path to output CSV file
    #[clap(short, long, default_value = "resultados.csv")]
    output: PathBuf,

    /// Also write a JSON report with offers and failed pages
    #[clap(long)]
    json: Option<PathBuf>,

    /// Parse saved listing pages instead of opening the site, one file per page
    #[clap(long, num_args = 1..)]
    snapshot: Vec<PathBuf>,

    /// Show the browser window
    #[clap(long)]
    headed: bool,

    /// Maximum number of result pages to visit
    #[clap(short, long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    max_pages: Option<usize>,

    /// What to do with a listing item that cannot be parsed
    #[clap(long, value_enum, default_value_t = ItemFailurePolicy::SkipItem)]
    item_policy: ItemFailurePolicy,

    /// Milliseconds to wait after each search form interaction
    #[clap(long, default_value = "5000")]
    settle_ms: u64,

    /// Save the HTML of pages that fail to parse into this directory
    #[clap(long)]
    debug_dir: Option<PathBuf>,

    /// Log debug output
    #[clap(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging, RUST_LOG wins over --verbose
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("🏠 Caixa Scout - Property Sale Listing Scraper");
    info!("==============================================");

    let params = SearchParams {
        location: Location::new(args.region.clone(), args.locality.clone()),
        modality: args.modality.clone(),
    };

    let source: Box<dyn OfferSource> = if args.snapshot.is_empty() {
        let options = ScrapeOptions {
            headless: !args.headed,
            settle_delay: Duration::from_millis(args.settle_ms),
            max_pages: args.max_pages,
            item_policy: args.item_policy,
            debug_dir: args.debug_dir.clone(),
            ..ScrapeOptions::default()
        };
        Box::new(CaixaBrowserScraper::new(params, options)?)
    } else {
        Box::new(SnapshotSource::new(
            args.snapshot.clone(),
            params,
            args.item_policy,
        ))
    };

    info!("Starting scrape from {}...", source.source_name());
    let report = source.scrape().await?;

    info!(
        "✅ Scraped {} offers from {} page(s)",
        report.offers.len(),
        report.pages_visited
    );
    for failure in &report.failures {
        match failure.item {
            Some(item) => warn!("Page {} item {} skipped: {}", failure.page, item, failure.reason),
            None => warn!("Page {} skipped: {}", failure.page, failure.reason),
        }
    }

    export::save_offers_csv(&report.offers, &args.output)?;
    if let Some(json_path) = &args.json {
        export::save_report_json(&report, json_path).await?;
    }

    info!("Done!");
    Ok(())
}
