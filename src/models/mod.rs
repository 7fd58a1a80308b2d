use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Region (UF) and locality (city) a search was run for.
///
/// Both are opaque codes handed to the site's dropdowns; nothing here parses them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub region: String,
    pub locality: String,
}

impl Location {
    pub fn new(region: impl Into<String>, locality: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            locality: locality.into(),
        }
    }
}

/// Raw text of one listing item, as resolved from the page.
///
/// This is the only shape the parsers see: the page adapter fills it, tests can
/// build it by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemBlocks {
    /// Inner text of the first link inside block 1
    pub title: String,
    /// Title, appraisal and sale price lines
    pub block1: String,
    /// Description, property id and address lines
    pub block2: String,
}

/// One parsed property offer.
///
/// Field names serialize to the column names of the exported sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Offer {
    #[serde(rename = "uf")]
    pub region: String,
    #[serde(rename = "cidade")]
    pub locality: String,
    pub title: String,
    #[serde(rename = "avaliacao")]
    pub appraisal_value: Decimal,
    #[serde(rename = "valor")]
    pub sale_value: Decimal,
    #[serde(rename = "desconto")]
    pub discount_percent: Decimal,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "numero")]
    pub property_id: String,
    #[serde(rename = "endereco")]
    pub address: String,
    #[serde(rename = "endereco_normalizado")]
    pub normalized_address: String,
    #[serde(rename = "link")]
    pub detail_link: String,
}
