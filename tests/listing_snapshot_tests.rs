//! End-to-end tests against a saved copy of the listing page.

use caixa_scout::models::Location;
use caixa_scout::scrapers::page::{listing_items, parse_offers, parse_page};
use caixa_scout::scrapers::{ItemFailurePolicy, OfferSource, SearchParams, SnapshotSource};
use rust_decimal_macros::dec;
use scraper::Html;
use std::path::PathBuf;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn listing_html() -> String {
    std::fs::read_to_string(fixtures_path().join("caixa_listing.html")).unwrap()
}

fn ribeirao() -> Location {
    Location::new("SP", "RIBEIRAO PRETO")
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

mod static_page {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_one_offer_per_item_container() {
        let html = listing_html();
        let document = Html::parse_document(&html);

        let offers = parse_offers(&document, &ribeirao()).unwrap();

        assert!(!offers.is_empty());
        assert_eq!(offers.len(), listing_items(&document).len());
    }

    #[test]
    fn first_offer_matches_listing() {
        let html = listing_html();
        let document = Html::parse_document(&html);

        let offers = parse_offers(&document, &ribeirao()).unwrap();
        let first = &offers[0];

        assert_eq!(first.title, "RIBEIRAO PRETO - LAR GRECIA");
        assert_eq!(first.appraisal_value, dec!(190000.00));
        assert_eq!(first.sale_value, dec!(114838.57));
        assert_eq!(first.discount_percent, dec!(39.56));
        assert_eq!(first.property_id, "8787711568638");
        assert!(first.description.starts_with(
            "Apartamento - 95,08 m2, 2 quarto(s), 1 vaga(s) na garagem - Venda Direta Online"
        ));
        assert!(normalize_whitespace(&first.address).starts_with(&normalize_whitespace(
            "RUA ALFREDO PUCCI,N. 80 Apto. 22 BL A TORRE 2,  , BONFIM PAULISTA"
        )));
        assert!(normalize_whitespace(&first.normalized_address)
            .starts_with(&format!("{}, RIBEIRAO PRETO - SP", normalize_whitespace(&first.address))));
        assert_eq!(
            first.detail_link,
            "https://venda-imoveis.caixa.gov.br/sistema/detalhe-imovel.asp?hdnimovel=8787711568638"
        );
    }

    #[test]
    fn offers_keep_document_order() {
        let parsed = parse_page(&listing_html(), &ribeirao(), ItemFailurePolicy::AbortPage).unwrap();

        let titles: Vec<_> = parsed.offers.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "RIBEIRAO PRETO - LAR GRECIA",
                "RIBEIRAO PRETO - JARDIM PAULISTANO",
                "RIBEIRAO PRETO - VILA VIRGINIA",
            ]
        );
        let discounts: Vec<_> = parsed.offers.iter().map(|o| o.discount_percent.to_string()).collect();
        assert_eq!(discounts, vec!["39.56", "35.00", "37.00"]);
    }

    #[test]
    fn all_offers_have_title_and_description() {
        let parsed = parse_page(&listing_html(), &ribeirao(), ItemFailurePolicy::SkipItem).unwrap();

        assert!(parsed.failures.is_empty());
        for offer in &parsed.offers {
            assert_ne!(offer.title, "");
            assert_ne!(offer.description, "");
            assert_eq!(offer.region, "SP");
            assert_eq!(offer.locality, "RIBEIRAO PRETO");
        }
    }
}

mod snapshot_source {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn skips_unreadable_page_and_keeps_the_rest() {
        let source = SnapshotSource::new(
            vec![
                fixtures_path().join("caixa_listing.html"),
                fixtures_path().join("missing_page.html"),
                fixtures_path().join("caixa_listing.html"),
            ],
            SearchParams::default(),
            ItemFailurePolicy::SkipItem,
        );

        let report = source.scrape().await.unwrap();

        assert_eq!(report.pages_visited, 3);
        assert_eq!(report.offers.len(), 6);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].page, 2);
        assert_eq!(report.failures[0].item, None);
    }

    #[tokio::test]
    async fn broken_item_fails_page_under_abort_policy() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.html");
        std::fs::write(
            &broken,
            listing_html().replace("R$ 812.500,00", "sob consulta"),
        )
        .unwrap();

        let source = SnapshotSource::new(
            vec![broken.clone(), fixtures_path().join("caixa_listing.html")],
            SearchParams::default(),
            ItemFailurePolicy::AbortPage,
        );
        let report = source.scrape().await.unwrap();

        assert_eq!(report.offers.len(), 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].page, 1);
        assert!(report.failures[0].reason.contains("sob consulta"));

        let isolated = SnapshotSource::new(
            vec![broken],
            SearchParams::default(),
            ItemFailurePolicy::SkipItem,
        );
        let report = isolated.scrape().await.unwrap();

        assert_eq!(report.offers.len(), 2);
        assert_eq!(report.failures[0].item, Some(1));
    }
}
