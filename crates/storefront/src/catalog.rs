//! In-memory catalog: the source of truth for filtering.

use chrono::{DateTime, Utc};
use pricecompare_core::{CatalogStats, Facet, FilterSelection, Product, SortOrder, distinct_values};

use crate::api::{ApiError, ProductApi};

/// Outcome of the most recent load attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogStatus {
    #[default]
    NotLoaded,
    Ready,
    Failed(String),
}

/// Products fetched from `GET /api/products`.
///
/// Replaced wholesale on every successful load; a failed load leaves the
/// previous products in place.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    products: Vec<Product>,
    status: CatalogStatus,
    loaded_at: Option<DateTime<Utc>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn status(&self) -> &CatalogStatus {
        &self.status
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Fetch once and apply the result.
    pub async fn load(&mut self, api: &dyn ProductApi) -> Result<usize, ApiError> {
        let result = api.list_products().await;
        self.apply(result)
    }

    /// Apply a fetch result: replace on success, keep products and log on failure.
    pub fn apply(&mut self, result: Result<Vec<Product>, ApiError>) -> Result<usize, ApiError> {
        match result {
            Ok(products) => {
                self.replace(products);
                tracing::info!(count = self.products.len(), "catalog loaded");
                Ok(self.products.len())
            }
            Err(err) => {
                tracing::error!(error = %err, kept = self.products.len(), "failed to load catalog");
                self.status = CatalogStatus::Failed(err.to_string());
                Err(err)
            }
        }
    }

    pub fn replace(&mut self, products: Vec<Product>) {
        self.products = products;
        self.status = CatalogStatus::Ready;
        self.loaded_at = Some(Utc::now());
    }

    pub fn facet_values(&self, facet: Facet) -> Vec<String> {
        distinct_values(&self.products, facet)
    }

    /// Products matching `selection`, ordered by `sort`.
    pub fn view(&self, selection: &FilterSelection, sort: SortOrder) -> Vec<&Product> {
        let mut shown = selection.apply(&self.products);
        sort.sort(&mut shown);
        shown
    }

    /// Every listing whose title contains `name` (case-insensitive), cheapest
    /// first. A listing without a price counts as 0.
    pub fn compare(&self, name: &str) -> Vec<&Product> {
        let mut selection = FilterSelection::new();
        selection.set_title_query(name);
        self.view(&selection, SortOrder::PriceAsc)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::from_catalog(&self.products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Product> {
        vec![
            Product::new("A").with_category("TV").with_source("datart").with_price(1000.0),
            Product::new("B").with_category("Phone").with_source("planeo").with_price(2000.0),
        ]
    }

    #[test]
    fn successful_load_replaces_wholesale() {
        let mut store = CatalogStore::new();
        store.apply(Ok(sample())).unwrap();
        assert_eq!(store.len(), 2);

        store.apply(Ok(vec![Product::new("C")])).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.products()[0].title, "C");
        assert_eq!(store.status(), &CatalogStatus::Ready);
        assert!(store.loaded_at().is_some());
    }

    #[test]
    fn failed_load_keeps_previous_products() {
        let mut store = CatalogStore::new();
        store.apply(Ok(sample())).unwrap();

        let err = store.apply(Err(ApiError::Api(500, "boom".into()))).unwrap_err();
        assert_eq!(err, ApiError::Api(500, "boom".into()));
        assert_eq!(store.len(), 2);
        assert!(matches!(store.status(), CatalogStatus::Failed(_)));
    }

    #[test]
    fn view_filters_without_mutating() {
        let mut store = CatalogStore::new();
        store.replace(sample());

        let mut sel = FilterSelection::new();
        sel.toggle(Facet::Source, "planeo", true);
        let shown = store.view(&sel, SortOrder::Catalog);

        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "B");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn view_applies_sort_after_filter() {
        let mut store = CatalogStore::new();
        store.replace(sample());
        let shown = store.view(&FilterSelection::new(), SortOrder::PriceDesc);
        let titles: Vec<&str> = shown.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn compare_lists_sellers_cheapest_first() {
        let mut store = CatalogStore::new();
        store.replace(vec![
            Product::new("iPhone 15 128GB").with_source("planeo").with_price(21990.0),
            Product::new("Televize").with_source("datart").with_price(500.0),
            Product::new("IPHONE 15 128GB").with_source("datart").with_price(20990.0),
            Product::new("iPhone 15").with_source("smarty"),
        ]);

        let sellers: Vec<Option<&str>> =
            store.compare("iphone 15").iter().map(|p| p.source_site()).collect();
        assert_eq!(sellers, vec![Some("smarty"), Some("datart"), Some("planeo")]);
        assert!(store.compare("walkman").is_empty());
    }

    #[tokio::test]
    async fn load_fetches_through_the_api() {
        let api = crate::app::tests::FakeApi::with_catalog(sample());
        let mut store = CatalogStore::new();

        assert_eq!(store.load(&api).await, Ok(2));
        assert_eq!(store.status(), &CatalogStatus::Ready);
    }
}
