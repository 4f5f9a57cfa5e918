use serde::{Deserialize, Serialize};

use crate::price;

/// A scraped product listing as served by `GET /api/products`.
///
/// Read-only on the client: the catalog is replaced wholesale on reload and
/// nothing in this crate mutates a product after deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    #[serde(default, deserialize_with = "loose_number")]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub source_site: Option<String>,
    #[serde(default, deserialize_with = "loose_number")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,
}

impl Product {
    /// Minimal constructor; optional fields start out absent.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price: None,
            category: None,
            source_site: None,
            rating: None,
            link: String::new(),
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_source(mut self, source_site: impl Into<String>) -> Self {
        self.source_site = Some(source_site.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    /// Category, with empty strings treated as absent.
    pub fn category(&self) -> Option<&str> {
        non_empty(self.category.as_deref())
    }

    /// Source identifier, with empty strings treated as absent.
    pub fn source_site(&self) -> Option<&str> {
        non_empty(self.source_site.as_deref())
    }

    /// Price used for display and sorting. Absent, zero and non-finite
    /// values all collapse to `0.0`.
    pub fn effective_price(&self) -> f64 {
        match self.price {
            Some(p) if p.is_finite() => p,
            _ => 0.0,
        }
    }

    /// Rating to display, if any. Zero counts as "no rating".
    pub fn display_rating(&self) -> Option<f64> {
        match self.rating {
            Some(r) if r.is_finite() && r != 0.0 => Some(r),
            _ => None,
        }
    }

    /// Price formatted the way the storefront shows it, e.g. `53 990 Kč`.
    pub fn formatted_price(&self) -> String {
        price::format_czk(self.effective_price())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Scraped numeric columns may hold text. Numeric strings (decimal comma
/// allowed) are parsed; anything else reads as absent.
fn loose_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Number(n)) => Some(n),
        Some(Loose::Text(text)) => text.trim().replace(',', ".").parse().ok(),
        Some(Loose::Other(_)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_sparse_backend_rows() {
        let json = r#"{"title":"Mixér","price":null,"rating":null,"link":null,"source_site":"dtrspider"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.title, "Mixér");
        assert_eq!(product.price, None);
        assert_eq!(product.category, None);
        assert_eq!(product.source_site(), Some("dtrspider"));
        assert_eq!(product.link, "");
    }

    #[test]
    fn text_in_numeric_columns_is_tolerated() {
        let json = r#"[
            {"title":"TV","price":"1299,5","rating":"4.5"},
            {"title":"X","price":"N/A","rating":true},
            {"title":"Y","price":1000}
        ]"#;
        let products: Vec<Product> = serde_json::from_str(json).unwrap();

        assert_eq!(products[0].price, Some(1299.5));
        assert_eq!(products[0].rating, Some(4.5));
        assert_eq!(products[1].price, None);
        assert_eq!(products[1].rating, None);
        assert_eq!(products[2].price, Some(1000.0));
    }

    #[test]
    fn title_is_required() {
        let json = r#"{"price": 10}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn effective_price_collapses_missing_and_invalid_values() {
        assert_eq!(Product::new("a").effective_price(), 0.0);
        assert_eq!(Product::new("a").with_price(f64::NAN).effective_price(), 0.0);
        assert_eq!(Product::new("a").with_price(1299.5).effective_price(), 1299.5);
    }

    #[test]
    fn zero_rating_is_not_displayed() {
        assert_eq!(Product::new("a").with_rating(0.0).display_rating(), None);
        assert_eq!(Product::new("a").with_rating(4.5).display_rating(), Some(4.5));
        assert_eq!(Product::new("a").display_rating(), None);
    }

    #[test]
    fn empty_strings_are_absent_facet_values() {
        let p = Product::new("a").with_category("").with_source("");
        assert_eq!(p.category(), None);
        assert_eq!(p.source_site(), None);
    }
}
