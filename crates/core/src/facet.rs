//! Facets: the product attributes the storefront filters on.

use core::str::FromStr;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::product::Product;

/// A filterable product attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Category,
    Source,
}

impl Facet {
    pub const ALL: [Facet; 2] = [Facet::Category, Facet::Source];

    /// Name used in the checkbox `data-filter-type` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Category => "category",
            Facet::Source => "source",
        }
    }

    /// The product's value for this facet, if present and non-empty.
    pub fn value_of<'a>(&self, product: &'a Product) -> Option<&'a str> {
        match self {
            Facet::Category => product.category(),
            Facet::Source => product.source_site(),
        }
    }
}

impl core::fmt::Display for Facet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facet {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(Facet::Category),
            "source" => Ok(Facet::Source),
            other => Err(DomainError::unknown_facet(other)),
        }
    }
}

/// Sorted, de-duplicated set of non-empty values of `facet` across `catalog`.
pub fn distinct_values(catalog: &[Product], facet: Facet) -> Vec<String> {
    catalog
        .iter()
        .filter_map(|p| facet.value_of(p))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
