#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod stats;
pub mod time;

pub use catalog::{CatalogError, WordCatalog};
pub use time::Clock;
