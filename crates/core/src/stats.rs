use std::collections::BTreeMap;

use serde::Serialize;

use crate::facet::{Facet, distinct_values};
use crate::product::Product;

/// Category label the scrapers write when a listing has no category.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Summary counts over a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_products: usize,
    pub per_source: BTreeMap<String, usize>,
    pub categories: usize,
}

impl CatalogStats {
    pub fn from_catalog(catalog: &[Product]) -> Self {
        let mut per_source = BTreeMap::new();
        for source in catalog.iter().filter_map(Product::source_site) {
            *per_source.entry(source.to_owned()).or_insert(0) += 1;
        }

        let categories = distinct_values(catalog, Facet::Category)
            .iter()
            .filter(|c| c.as_str() != UNKNOWN_CATEGORY)
            .count();

        Self {
            total_products: catalog.len(),
            per_source,
            categories,
        }
    }

    pub fn count_for(&self, source: &str) -> usize {
        self.per_source.get(source).copied().unwrap_or(0)
    }
}
