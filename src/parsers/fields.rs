use crate::error::ParseError;
use crate::models::ItemBlocks;
use tracing::debug;

/// Text fields of one listing item, before any amount is parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub title: String,
    pub appraisal_line: String,
    pub price_line: String,
    pub description: String,
    pub property_id: String,
    pub address: String,
}

/// Split a rendered text block into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keep what follows the first `:` with dashes removed.
///
/// `"Número do imóvel: 8787-711-5686-38"` becomes `"8787711568638"`; a line
/// without `:` is returned unchanged.
pub fn normalize_property_id(line: &str) -> String {
    match line.split_once(':') {
        Some((_, id)) => id.trim().replace('-', ""),
        None => line.to_string(),
    }
}

/// Assign the lines of both blocks to their fields.
///
/// Block 1 repeats the title as a plain line under its link on most pages, so a
/// first line equal to the title is dropped before the appraisal and price lines
/// are taken. Those two are required; block 2 lines default to empty.
pub fn extract_fields(blocks: &ItemBlocks) -> Result<ItemFields, ParseError> {
    let title = blocks.title.trim().to_string();
    if title.is_empty() {
        return Err(ParseError::MalformedField {
            field: "title",
            block: blocks.block1.clone(),
        });
    }

    let mut block1 = split_lines(&blocks.block1);
    if block1.first() == Some(&title) {
        block1.remove(0);
    }

    let required = |index: usize, field: &'static str| {
        block1
            .get(index)
            .filter(|line| !line.is_empty())
            .cloned()
            .ok_or_else(|| ParseError::MalformedField {
                field,
                block: blocks.block1.clone(),
            })
    };
    let appraisal_line = required(0, "appraisal")?;
    let price_line = required(1, "price")?;

    let block2 = split_lines(&blocks.block2);
    let optional = |index: usize| block2.get(index).cloned().unwrap_or_default();

    let fields = ItemFields {
        title,
        appraisal_line,
        price_line,
        description: optional(0),
        property_id: normalize_property_id(&optional(1)),
        address: optional(2),
    };
    debug!("Extracted fields for {}: id={}", fields.title, fields.property_id);

    Ok(fields)
}
