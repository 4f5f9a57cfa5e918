//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures that can be decided without
/// any IO (input validation, unknown facet names). Transport and storage
/// failures belong to the storefront crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a blank search query).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A facet name did not match any known facet.
    #[error("unknown facet: {0}")]
    UnknownFacet(String),

    /// A sort order name did not match any known ordering.
    #[error("unknown sort order: {0}")]
    UnknownSortOrder(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unknown_facet(name: impl Into<String>) -> Self {
        Self::UnknownFacet(name.into())
    }

    pub fn unknown_sort_order(name: impl Into<String>) -> Self {
        Self::UnknownSortOrder(name.into())
    }
}
