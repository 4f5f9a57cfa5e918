//! The storefront controller: application state plus the operations the
//! page triggers.

use std::sync::Arc;

use anyhow::Context;
use pricecompare_core::{Facet, FilterSelection, Product, SortOrder};

use crate::api::{ApiError, HttpProductApi, ProductApi};
use crate::catalog::CatalogStore;
use crate::config::StorefrontConfig;
use crate::modal::{ModalController, PointerTarget};
use crate::prefs::{PreferenceStore, SqlitePreferences, Theme};
use crate::render::{Renderer, StatusKind};
use crate::search::{SearchClient, SearchState, SearchTicket};
use crate::view::{Notice, NoticeKind, PageView};

/// Application state mutated by the controller.
#[derive(Debug, Default)]
pub struct AppState {
    pub catalog: CatalogStore,
    pub selection: FilterSelection,
    pub sort: SortOrder,
    pub search: SearchClient,
    pub modal: ModalController,
    pub view: PageView,
}

pub struct Storefront {
    state: AppState,
    api: Arc<dyn ProductApi>,
    prefs: PreferenceStore,
    renderer: Renderer,
}

impl Storefront {
    pub fn new(api: Arc<dyn ProductApi>, prefs: PreferenceStore) -> Self {
        let mut storefront = Self {
            state: AppState::default(),
            api,
            prefs,
            renderer: Renderer::default(),
        };
        storefront.render_grid();
        storefront
    }

    /// HTTP API plus SQLite preferences, both taken from `config`.
    pub async fn from_config(config: &StorefrontConfig) -> anyhow::Result<Self> {
        let api = HttpProductApi::from_config(config).context("failed to build HTTP client")?;
        let backend = SqlitePreferences::open(&config.prefs_path).await?;
        let prefs = PreferenceStore::new(Arc::new(backend));
        tracing::info!(api_url = %api.base_url(), prefs = ?config.prefs_path, "storefront configured");
        Ok(Self::new(Arc::new(api), prefs))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> &PageView {
        &self.state.view
    }

    pub fn api(&self) -> Arc<dyn ProductApi> {
        self.api.clone()
    }

    pub fn theme(&self) -> Theme {
        self.prefs.theme()
    }

    /// Page ready: apply the stored theme, then load the catalog.
    pub async fn start(&mut self) {
        self.load_theme().await;
        self.load_catalog().await;
    }

    pub async fn load_theme(&mut self) -> Theme {
        let theme = self.prefs.load().await;
        self.state.view.theme = theme;
        theme
    }

    /// Flip the theme. The page follows the new theme even when persisting
    /// it fails.
    pub async fn toggle_theme(&mut self) -> Theme {
        if let Err(err) = self.prefs.toggle().await {
            tracing::error!(error = %err, "failed to persist theme preference");
        }
        let theme = self.prefs.theme();
        self.state.view.theme = theme;
        tracing::info!(dark = theme.is_dark(), "theme toggled");
        theme
    }

    pub async fn load_catalog(&mut self) -> bool {
        let outcome = self.state.catalog.load(self.api.as_ref()).await;
        self.catalog_settled(outcome)
    }

    /// Apply a catalog fetch result. Returns whether it succeeded.
    pub fn apply_catalog(&mut self, result: Result<Vec<Product>, ApiError>) -> bool {
        let outcome = self.state.catalog.apply(result);
        self.catalog_settled(outcome)
    }

    fn catalog_settled(&mut self, outcome: Result<usize, ApiError>) -> bool {
        match outcome {
            Ok(_) => {
                if matches!(&self.state.view.notice, Some(n) if n.kind == NoticeKind::Error) {
                    self.state.view.notice = None;
                }
                self.render_filters();
                self.render_grid();
                true
            }
            Err(_) => {
                self.state.view.notice = Some(Notice {
                    kind: NoticeKind::Error,
                    message: self.renderer.labels().catalog_failed.to_string(),
                });
                false
            }
        }
    }

    /// Returns whether the selection changed. The grid is repainted either way.
    pub fn toggle_filter(&mut self, facet: Facet, value: &str, checked: bool) -> bool {
        let changed = self.state.selection.toggle(facet, value, checked);
        tracing::debug!(%facet, value, checked, changed, "filter toggled");
        self.render_filters();
        self.render_grid();
        changed
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.state.sort = sort;
        self.render_grid();
    }

    /// Narrow the grid to titles containing `query`. Blank input lifts the
    /// title filter.
    pub fn set_title_filter(&mut self, query: &str) -> bool {
        let changed = self.state.selection.set_title_query(query);
        tracing::debug!(query = self.state.selection.title_query(), changed, "title filter set");
        self.render_grid();
        changed
    }

    /// Accept a search submission. Blank input shows the inline prompt and
    /// returns `None`; nothing is sent.
    pub fn submit_search(&mut self, raw_query: &str) -> Option<SearchTicket> {
        let ticket = match self.state.search.begin(raw_query) {
            Ok(ticket) => ticket,
            Err(err) => {
                tracing::warn!(error = %err, "search rejected");
                self.state.view.notice = Some(Notice {
                    kind: NoticeKind::Prompt,
                    message: self.renderer.labels().blank_query.to_string(),
                });
                return None;
            }
        };

        if matches!(&self.state.view.notice, Some(n) if n.kind == NoticeKind::Prompt) {
            self.state.view.notice = None;
        }

        let labels = self.renderer.labels();
        self.state.view.modal.title = self.renderer.searching_title(ticket.query());
        self.state.view.modal.body = self
            .renderer
            .status_message(StatusKind::Loading, labels.searching);
        Some(ticket)
    }

    /// Settle a search. Returns `false` when the ticket was stale and
    /// nothing changed.
    pub fn settle_search(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<Product>, ApiError>,
    ) -> bool {
        let Some(state) = self.state.search.complete(ticket, result) else {
            return false;
        };

        let labels = self.renderer.labels();
        let modal = &mut self.state.view.modal;
        match state {
            SearchState::Populated { query, results } => {
                modal.title = self.renderer.results_title(query, results.len());
                modal.body = self.renderer.render_cards(results);
            }
            SearchState::Empty { query } => {
                modal.title = self.renderer.results_title(query, 0);
                modal.body = self
                    .renderer
                    .status_message(StatusKind::Empty, labels.no_results);
            }
            SearchState::Failed { .. } => {
                modal.body = self
                    .renderer
                    .status_message(StatusKind::Error, labels.search_failed);
            }
            SearchState::Idle | SearchState::Searching { .. } => {}
        }

        self.state.modal.on_search_settled(state);
        self.state.view.modal.open = self.state.modal.is_open();
        true
    }

    /// One accepted submission, one network call.
    pub async fn search(&mut self, raw_query: &str) -> bool {
        let Some(ticket) = self.submit_search(raw_query) else {
            return false;
        };
        let result = self.api.search(ticket.query()).await;
        self.settle_search(&ticket, result)
    }

    pub fn close_modal(&mut self) {
        self.state.modal.close();
        self.state.view.modal.open = false;
    }

    /// Returns whether the modal closed.
    pub fn pointer(&mut self, target: PointerTarget) -> bool {
        let closed = self.state.modal.on_pointer(target);
        self.state.view.modal.open = self.state.modal.is_open();
        closed
    }

    fn render_grid(&mut self) {
        let shown = self.state.catalog.view(&self.state.selection, self.state.sort);
        let fragment = self.renderer.render_list(&shown);
        self.state.view.product_list = fragment.html;
        self.state.view.results_header = fragment.header;
    }

    fn render_filters(&mut self) {
        let catalog = &self.state.catalog;
        let selection = &self.state.selection;
        self.state.view.category_filters = self.renderer.render_filter_options(
            &catalog.facet_values(Facet::Category),
            Facet::Category,
            selection,
        );
        self.state.view.source_filters = self.renderer.render_filter_options(
            &catalog.facet_values(Facet::Source),
            Facet::Source,
            selection,
        );
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("state", &self.state)
            .field("prefs", &self.prefs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::catalog::CatalogStatus;
    use crate::modal::ModalState;
    use crate::prefs::tests::UnavailablePreferences;

    /// Scripted backend that counts calls.
    #[derive(Default)]
    pub(crate) struct FakeApi {
        pub catalog: Mutex<Vec<Result<Vec<Product>, ApiError>>>,
        pub results: Mutex<Vec<Product>>,
        pub search_error: Mutex<Option<ApiError>>,
        pub list_calls: AtomicUsize,
        pub search_calls: AtomicUsize,
    }

    impl FakeApi {
        pub(crate) fn with_catalog(products: Vec<Product>) -> Self {
            let api = Self::default();
            api.catalog.lock().unwrap().push(Ok(products));
            api
        }
    }

    #[async_trait]
    impl ProductApi for FakeApi {
        async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            let mut queue = self.catalog.lock().unwrap();
            if queue.is_empty() {
                Ok(vec![])
            } else {
                queue.remove(0)
            }
        }

        async fn search(&self, _query: &str) -> Result<Vec<Product>, ApiError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.search_error.lock().unwrap().clone() {
                return Err(err);
            }
            Ok(self.results.lock().unwrap().clone())
        }

        async fn suggest(&self, _prefix: &str) -> Result<Vec<String>, ApiError> {
            Ok(vec![])
        }
    }

    pub(crate) fn tv_and_phone() -> Vec<Product> {
        vec![
            Product::new("Televize").with_category("TV").with_source("datart").with_price(10000.0),
            Product::new("Telefon").with_category("Phone").with_source("planeo").with_price(5000.0),
        ]
    }

    fn storefront(api: Arc<FakeApi>) -> Storefront {
        Storefront::new(api, PreferenceStore::in_memory())
    }

    #[tokio::test]
    async fn start_renders_filters_and_grid() {
        let api = Arc::new(FakeApi::with_catalog(tv_and_phone()));
        let mut sf = storefront(api.clone());
        sf.start().await;

        let view = sf.view();
        assert_eq!(view.card_count(), 2);
        assert_eq!(view.results_header, "Nalezené produkty (2)");
        assert!(view.category_filters.contains("value=\"Phone\""));
        assert!(view.category_filters.contains("value=\"TV\""));
        assert!(view.source_filters.contains("value=\"datart\""));
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn checking_a_category_narrows_the_grid() {
        let api = Arc::new(FakeApi::with_catalog(tv_and_phone()));
        let mut sf = storefront(api);
        sf.start().await;

        assert!(sf.toggle_filter(Facet::Category, "TV", true));
        assert_eq!(sf.view().card_count(), 1);
        assert_eq!(sf.view().results_header, "Nalezené produkty (1)");
        assert!(sf.view().product_list.contains("Televize"));
        assert!(sf.view().category_filters.contains("value=\"TV\" checked"));

        assert!(sf.toggle_filter(Facet::Category, "TV", false));
        assert_eq!(sf.view().card_count(), 2);
    }

    #[tokio::test]
    async fn unmatched_filter_shows_zero() {
        let api = Arc::new(FakeApi::with_catalog(tv_and_phone()));
        let mut sf = storefront(api);
        sf.start().await;

        sf.toggle_filter(Facet::Source, "mironet", true);
        assert_eq!(sf.view().card_count(), 0);
        assert_eq!(sf.view().results_header, "Nalezené produkty (0)");
    }

    #[tokio::test]
    async fn sorting_reorders_the_grid() {
        let api = Arc::new(FakeApi::with_catalog(tv_and_phone()));
        let mut sf = storefront(api);
        sf.start().await;

        sf.set_sort(SortOrder::PriceAsc);
        let list = &sf.view().product_list;
        assert!(list.find("Telefon").unwrap() < list.find("Televize").unwrap());
    }

    #[tokio::test]
    async fn blank_search_prompts_without_a_request() {
        let api = Arc::new(FakeApi::default());
        let mut sf = storefront(api.clone());

        assert!(!sf.search("   ").await);
        assert_eq!(api.search_calls.load(Ordering::SeqCst), 0);
        assert_eq!(sf.state().search.state(), &SearchState::Idle);
        let notice = sf.view().notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Prompt);
        assert_eq!(notice.message, "Zadej hledaný výraz.");
        assert!(!sf.view().modal.open);

        // the prompt goes away with the next accepted search
        sf.search("tv").await;
        assert!(sf.view().notice.is_none());
    }

    #[tokio::test]
    async fn search_populates_and_opens_the_modal() {
        let api = Arc::new(FakeApi::default());
        *api.results.lock().unwrap() = tv_and_phone();
        let mut sf = storefront(api.clone());

        assert!(sf.search("  tele ").await);
        assert_eq!(api.search_calls.load(Ordering::SeqCst), 1);
        let view = sf.view();
        assert!(view.modal.open);
        assert_eq!(view.modal.title, "Výsledky pro \"tele\" (2 nalezeno)");
        assert_eq!(view.modal_card_count(), 2);
        assert_eq!(sf.state().modal.state(), ModalState::Open);
    }

    #[tokio::test]
    async fn empty_search_opens_modal_with_message() {
        let api = Arc::new(FakeApi::default());
        let mut sf = storefront(api);

        sf.search("xyz").await;
        let view = sf.view();
        assert!(view.modal.open);
        assert_eq!(view.modal.title, "Výsledky pro \"xyz\" (0 nalezeno)");
        assert!(view.modal.body.contains("Nebyly nalezeny žádné produkty."));
        assert_eq!(view.modal_card_count(), 0);
    }

    #[tokio::test]
    async fn failed_search_shows_error_placeholder() {
        let api = Arc::new(FakeApi::default());
        *api.search_error.lock().unwrap() = Some(ApiError::Api(500, "boom".into()));
        let mut sf = storefront(api);

        sf.search("tv").await;
        let view = sf.view();
        assert!(view.modal.open);
        assert_eq!(view.modal.title, "Hledání pro \"tv\"...");
        assert!(view.modal.body.contains("status-message error"));
        assert!(matches!(sf.state().search.state(), SearchState::Failed { .. }));
    }

    #[tokio::test]
    async fn modal_title_keeps_markup_as_text_until_written() {
        let mut sf = storefront(Arc::new(FakeApi::default()));
        sf.search("<b>").await;

        assert_eq!(sf.view().modal.title, "Výsledky pro \"<b>\" (0 nalezeno)");
        let doc = sf.view().to_document("Srovnávač");
        assert!(doc.contains("&quot;&lt;b&gt;&quot;"));
        assert!(!doc.contains("\"<b>\""));
    }

    #[tokio::test]
    async fn submitting_shows_the_loading_placeholder() {
        let mut sf = storefront(Arc::new(FakeApi::default()));
        let ticket = sf.submit_search("iphone").unwrap();

        assert_eq!(ticket.query(), "iphone");
        assert_eq!(sf.view().modal.title, "Hledání pro \"iphone\"...");
        assert!(sf.view().modal.body.contains("Hledám v databázi..."));
    }

    #[tokio::test]
    async fn stale_completion_leaves_the_modal_alone() {
        let mut sf = storefront(Arc::new(FakeApi::default()));
        let first = sf.submit_search("first").unwrap();
        let second = sf.submit_search("second").unwrap();

        assert!(sf.settle_search(&second, Ok(vec![Product::new("B")])));
        let settled = sf.view().clone();

        assert!(!sf.settle_search(&first, Ok(vec![Product::new("A"), Product::new("A2")])));
        assert_eq!(sf.view(), &settled);
        assert_eq!(sf.view().modal_card_count(), 1);
    }

    #[tokio::test]
    async fn modal_closes_on_button_and_backdrop_only() {
        let api = Arc::new(FakeApi::default());
        let mut sf = storefront(api);

        sf.search("tv").await;
        assert!(!sf.pointer(PointerTarget::Content));
        assert!(sf.view().modal.open);
        assert!(sf.pointer(PointerTarget::Backdrop));
        assert!(!sf.view().modal.open);

        sf.search("tv").await;
        sf.close_modal();
        assert!(!sf.view().modal.open);
    }

    #[tokio::test]
    async fn failed_load_sets_notice_and_recovery_clears_it() {
        let api = Arc::new(FakeApi::default());
        api.catalog
            .lock()
            .unwrap()
            .extend([Err(ApiError::Timeout), Ok(tv_and_phone())]);
        let mut sf = storefront(api);

        assert!(!sf.load_catalog().await);
        assert_eq!(sf.view().card_count(), 0);
        assert_eq!(sf.view().results_header, "Nalezené produkty (0)");
        assert!(matches!(sf.state().catalog.status(), CatalogStatus::Failed(_)));
        assert_eq!(sf.view().notice.as_ref().unwrap().kind, NoticeKind::Error);

        assert!(sf.load_catalog().await);
        assert!(sf.view().notice.is_none());
        assert_eq!(sf.view().card_count(), 2);
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_grid() {
        let api = Arc::new(FakeApi::default());
        api.catalog
            .lock()
            .unwrap()
            .extend([Ok(tv_and_phone()), Err(ApiError::Parse("bad".into()))]);
        let mut sf = storefront(api);

        sf.load_catalog().await;
        sf.load_catalog().await;
        assert_eq!(sf.view().card_count(), 2);
        assert_eq!(sf.state().catalog.len(), 2);
    }

    #[tokio::test]
    async fn theme_toggle_twice_restores() {
        let mut sf = storefront(Arc::new(FakeApi::default()));
        assert_eq!(sf.load_theme().await, Theme::Light);

        assert_eq!(sf.toggle_theme().await, Theme::Dark);
        assert_eq!(sf.view().theme, Theme::Dark);
        assert_eq!(sf.toggle_theme().await, Theme::Light);
        assert_eq!(sf.view().theme, Theme::Light);
    }

    #[tokio::test]
    async fn theme_toggles_on_screen_when_storage_fails() {
        let prefs = PreferenceStore::new(Arc::new(UnavailablePreferences));
        let mut sf = Storefront::new(Arc::new(FakeApi::default()), prefs);

        assert_eq!(sf.load_theme().await, Theme::Light);
        assert_eq!(sf.toggle_theme().await, Theme::Dark);
        assert_eq!(sf.view().theme, Theme::Dark);
        assert_eq!(sf.theme(), Theme::Dark);
    }

    #[tokio::test]
    async fn title_filter_narrows_the_grid() {
        let api = Arc::new(FakeApi::with_catalog(tv_and_phone()));
        let mut sf = storefront(api.clone());
        sf.start().await;

        assert!(sf.set_title_filter("TELEF"));
        assert_eq!(sf.view().card_count(), 1);
        assert!(sf.view().product_list.contains("Telefon"));
        assert_eq!(sf.view().results_header, "Nalezené produkty (1)");

        assert!(!sf.set_title_filter(" TELEF "));
        assert!(sf.set_title_filter(""));
        assert_eq!(sf.view().card_count(), 2);
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
    }
}
