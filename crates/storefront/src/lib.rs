//! `pricecompare-storefront`
//!
//! **Responsibility:** Client for the price-comparison aggregator backend.
//!
//! This crate provides:
//! - An HTTP client for the catalog, search and suggestion endpoints
//! - The in-memory catalog and filter/render pipeline
//! - The search and modal state machines
//! - Persisted theme preference
//! - A single-writer worker that applies page events to a [`PageView`]
//!
//! The backend stays the authority for products; nothing is cached
//! between runs except the theme flag.

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod modal;
pub mod prefs;
pub mod render;
pub mod search;
pub mod types;
pub mod view;
pub mod worker;

pub use api::{ApiError, HttpProductApi, ProductApi};
pub use app::{AppState, Storefront};
pub use catalog::{CatalogStatus, CatalogStore};
pub use config::{ConfigError, StorefrontConfig};
pub use modal::{ModalController, ModalState, PointerTarget};
pub use prefs::{MemoryPreferences, PreferenceBackend, PreferenceError, PreferenceStore, SqlitePreferences, Theme};
pub use render::{Labels, ListFragment, Renderer, StatusKind};
pub use search::{SearchClient, SearchState, SearchTicket};
pub use view::{ModalView, Notice, NoticeKind, PageView};
pub use worker::{StorefrontHandle, StorefrontWorker, UiEvent, WorkerError};
