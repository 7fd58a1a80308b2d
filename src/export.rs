use crate::models::Offer;
use crate::scrapers::types::ScrapeReport;
use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Column names of the exported sheet, in order
pub const CSV_HEADER: [&str; 11] = [
    "uf",
    "cidade",
    "title",
    "avaliacao",
    "valor",
    "desconto",
    "descricao",
    "numero",
    "endereco",
    "endereco_normalizado",
    "link",
];

/// Write offers as `;`-separated rows under a fixed header.
///
/// Fields are written verbatim; a `;` inside a field is not escaped.
pub fn write_offers_csv<W: Write>(writer: W, offers: &[Offer]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(CSV_HEADER)?;
    for offer in offers {
        writer.serialize(offer)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn save_offers_csv(offers: &[Offer], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;

    write_offers_csv(file, offers)?;
    info!("💾 Saved {} offers to {}", offers.len(), output_path.display());

    Ok(())
}

pub async fn save_report_json(report: &ScrapeReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    tokio::fs::write(output_path, json)
        .await
        .with_context(|| format!("Failed to write report: {}", output_path.display()))?;
    info!("💾 Saved run report to {}", output_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemBlocks, Location};
    use crate::parsers::build_offer;
    use pretty_assertions::assert_eq;

    fn offer() -> Offer {
        build_offer(
            &Location::new("SP", "RIBEIRAO PRETO"),
            &ItemBlocks {
                title: "RIBEIRAO PRETO - LAR GRECIA".to_string(),
                block1: "R$ 190.000,00\nR$ 114.838,57".to_string(),
                block2: "Apartamento\nNúmero do imóvel: 8787-711-5686-38\nRUA ALFREDO PUCCI, 80"
                    .to_string(),
            },
        )
        .unwrap()
    }

    fn render(offers: &[Offer]) -> String {
        let mut buffer = Vec::new();
        write_offers_csv(&mut buffer, offers).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn writes_header_for_empty_export() {
        assert_eq!(
            render(&[]),
            "uf;cidade;title;avaliacao;valor;desconto;descricao;numero;endereco;endereco_normalizado;link\n"
        );
    }

    #[test]
    fn writes_one_row_per_offer_with_full_decimals() {
        let csv = render(&[offer(), offer()]);
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "SP;RIBEIRAO PRETO;RIBEIRAO PRETO - LAR GRECIA;190000.00;114838.57;39.56;Apartamento;\
             8787711568638;RUA ALFREDO PUCCI, 80;RUA ALFREDO PUCCI, 80, RIBEIRAO PRETO - SP;\
             https://venda-imoveis.caixa.gov.br/sistema/detalhe-imovel.asp?hdnimovel=8787711568638"
        );
    }

    #[test]
    fn saves_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resultados.csv");

        save_offers_csv(&[offer()], &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("uf;cidade;title;"));
        assert_eq!(written.lines().count(), 2);
    }

    #[tokio::test]
    async fn saves_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut report = ScrapeReport::new(Default::default());
        report.offers.push(offer());

        save_report_json(&report, &path).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["offers"][0]["numero"], "8787711568638");
        assert_eq!(json["offers"][0]["avaliacao"], "190000.00");
        assert_eq!(json["search"]["location"]["region"], "SP");
    }
}
