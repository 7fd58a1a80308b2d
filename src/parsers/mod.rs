pub mod amount;
pub mod fields;
pub mod offer;

pub use amount::{compute_discount, parse_amount};
pub use fields::{extract_fields, normalize_property_id, split_lines, ItemFields};
pub use offer::{build_offer, DETAIL_BASE_URL};
