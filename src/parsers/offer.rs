use crate::error::ParseError;
use crate::models::{ItemBlocks, Location, Offer};
use crate::parsers::amount::{compute_discount, parse_amount};
use crate::parsers::fields::extract_fields;

/// Detail page of a property; the property id is appended verbatim
pub const DETAIL_BASE_URL: &str =
    "https://venda-imoveis.caixa.gov.br/sistema/detalhe-imovel.asp?hdnimovel=";

pub fn detail_link(property_id: &str) -> String {
    format!("{}{}", DETAIL_BASE_URL, property_id)
}

pub fn normalized_address(address: &str, location: &Location) -> String {
    format!("{}, {} - {}", address, location.locality, location.region)
}

/// Build a complete offer from one item's text, or fail without a partial record.
pub fn build_offer(location: &Location, blocks: &ItemBlocks) -> Result<Offer, ParseError> {
    let fields = extract_fields(blocks)?;

    let appraisal_value = parse_amount(&fields.appraisal_line)?;
    let sale_value = parse_amount(&fields.price_line)?;
    let discount_percent = compute_discount(appraisal_value, sale_value)?;

    Ok(Offer {
        region: location.region.clone(),
        locality: location.locality.clone(),
        normalized_address: normalized_address(&fields.address, location),
        detail_link: detail_link(&fields.property_id),
        title: fields.title,
        appraisal_value,
        sale_value,
        discount_percent,
        description: fields.description,
        property_id: fields.property_id,
        address: fields.address,
    })
}
