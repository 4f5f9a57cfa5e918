use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::product::Product;

/// Display ordering applied after filtering.
///
/// `Catalog` keeps the order the backend returned. All orderings are stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Catalog,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Catalog => "catalog",
            SortOrder::PriceAsc => "price_asc",
            SortOrder::PriceDesc => "price_desc",
            SortOrder::NameAsc => "name_asc",
            SortOrder::NameDesc => "name_desc",
        }
    }

    pub fn sort(&self, products: &mut [&Product]) {
        match self {
            SortOrder::Catalog => {}
            SortOrder::PriceAsc => products.sort_by(|a, b| by_price(a, b)),
            SortOrder::PriceDesc => products.sort_by(|a, b| by_price(b, a)),
            SortOrder::NameAsc => products.sort_by(|a, b| a.title.cmp(&b.title)),
            SortOrder::NameDesc => products.sort_by(|a, b| b.title.cmp(&a.title)),
        }
    }
}

fn by_price(a: &Product, b: &Product) -> Ordering {
    a.effective_price().total_cmp(&b.effective_price())
}

impl core::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "catalog" => Ok(SortOrder::Catalog),
            "price_asc" => Ok(SortOrder::PriceAsc),
            "price_desc" => Ok(SortOrder::PriceDesc),
            "name_asc" => Ok(SortOrder::NameAsc),
            "name_desc" => Ok(SortOrder::NameDesc),
            other => Err(DomainError::unknown_sort_order(other)),
        }
    }
}
