//! The user's checked facet values, the title filter, and the membership
//! predicate over them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::facet::Facet;
use crate::product::Product;

/// Checked facet values plus an optional title substring.
///
/// An empty set places no constraint on its facet, and an empty title
/// matches every title; neither ever means "match nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub categories: BTreeSet<String>,
    pub sources: BTreeSet<String>,
    /// Trimmed substring, compared case-insensitively.
    #[serde(default)]
    pub title: String,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Category => &self.categories,
            Facet::Source => &self.sources,
        }
    }

    fn values_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Category => &mut self.categories,
            Facet::Source => &mut self.sources,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.sources.is_empty() && self.title.is_empty()
    }

    pub fn title_query(&self) -> &str {
        &self.title
    }

    /// Narrow to titles containing `query`. Returns `true` if it changed.
    pub fn set_title_query(&mut self, query: &str) -> bool {
        let query = query.trim();
        if self.title == query {
            return false;
        }
        self.title = query.to_owned();
        true
    }

    pub fn contains(&self, facet: Facet, value: &str) -> bool {
        self.values(facet).contains(value)
    }

    /// Add `value` when `checked`, remove it otherwise.
    ///
    /// Returns `true` if the selection changed. Removing an absent value and
    /// adding a present one are no-ops.
    pub fn toggle(&mut self, facet: Facet, value: &str, checked: bool) -> bool {
        let set = self.values_mut(facet);
        if checked {
            set.insert(value.to_owned())
        } else {
            set.remove(value)
        }
    }

    /// `(categories empty OR category ∈ categories) AND (sources empty OR source ∈ sources)
    /// AND (title empty OR product title contains title)`.
    pub fn matches(&self, product: &Product) -> bool {
        self.title_matches(product) && Facet::ALL.iter().all(|&facet| self.facet_matches(facet, product))
    }

    fn title_matches(&self, product: &Product) -> bool {
        self.title.is_empty() || product.title.to_lowercase().contains(&self.title.to_lowercase())
    }

    fn facet_matches(&self, facet: Facet, product: &Product) -> bool {
        let set = self.values(facet);
        if set.is_empty() {
            return true;
        }
        facet.value_of(product).is_some_and(|v| set.contains(v))
    }

    /// Products of `catalog` that satisfy the selection, in catalog order.
    pub fn apply<'a>(&self, catalog: &'a [Product]) -> Vec<&'a Product> {
        catalog.iter().filter(|p| self.matches(p)).collect()
    }
}
