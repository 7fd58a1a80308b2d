pub mod error;
pub mod export;
pub mod models;
pub mod parsers;
pub mod scrapers;

pub use error::ParseError;
pub use models::{ItemBlocks, Location, Offer};
