//! `pricecompare-core`: catalog domain building blocks.
//!
//! This crate contains **pure domain** logic (no IO, no HTTP, no storage):
//! the product model, price formatting, facet derivation, the filter
//! predicate, sort orders, catalog statistics and the logo lookup.

pub mod error;
pub mod facet;
pub mod logo;
pub mod price;
pub mod product;
pub mod selection;
pub mod sort;
pub mod stats;

pub use error::{DomainError, DomainResult};
pub use facet::{Facet, distinct_values};
pub use logo::LogoMap;
pub use price::{format_amount, format_czk};
pub use product::Product;
pub use selection::FilterSelection;
pub use sort::SortOrder;
pub use stats::CatalogStats;
