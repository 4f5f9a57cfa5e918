//! Single-writer event loop around a [`Storefront`].
//!
//! UI events arrive over an mpsc channel and are applied one at a time.
//! Network calls run on spawned tasks and come back as internal events, so
//! the loop keeps handling input while requests are in flight. Every change
//! to the page is published on a watch channel.

use std::sync::Arc;

use pricecompare_core::{Facet, Product, SortOrder};
use thiserror::Error;
use tokio::sync::{Notify, mpsc, watch};
use tokio::task::JoinHandle;

use crate::api::ApiError;
use crate::app::Storefront;
use crate::modal::PointerTarget;
use crate::search::SearchTicket;
use crate::view::PageView;

/// Key that submits the query field.
pub const SUBMIT_KEY: &str = "Enter";

/// Input from the page.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    PageReady,
    ThemeToggleClicked,
    QueryKeyDown { key: String, value: String },
    SearchClicked { value: String },
    FilterChanged { facet: Facet, value: String, checked: bool },
    SortChanged(SortOrder),
    CloseClicked,
    WindowClicked(PointerTarget),
}

/// Completions reported by spawned network tasks.
#[derive(Debug)]
enum Completion {
    CatalogLoaded(Result<Vec<Product>, ApiError>),
    SearchSettled {
        ticket: SearchTicket,
        result: Result<Vec<Product>, ApiError>,
    },
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("storefront worker has stopped")]
    Stopped,
    #[error("storefront worker panicked: {0}")]
    Join(String),
}

pub struct StorefrontWorker {
    storefront: Storefront,
    shutdown: Arc<Notify>,
}

impl StorefrontWorker {
    pub fn new(storefront: Storefront) -> Self {
        Self {
            storefront,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Spawn the loop. The storefront is handed back by
    /// [`StorefrontHandle::shutdown`].
    pub fn start(self) -> StorefrontHandle {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel::<UiEvent>();
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
        let (view_tx, view_rx) = watch::channel(self.storefront.view().clone());
        let shutdown = self.shutdown.clone();
        let mut storefront = self.storefront;

        let task = tokio::spawn(async move {
            tracing::info!("storefront worker started");

            loop {
                tokio::select! {
                    _ = shutdown.notified() => {
                        tracing::info!("storefront worker received shutdown signal");
                        break;
                    }
                    event = events_rx.recv() => {
                        let Some(event) = event else {
                            tracing::info!("all storefront handles dropped");
                            break;
                        };
                        handle_event(&mut storefront, event, &done_tx).await;
                    }
                    Some(completion) = done_rx.recv() => {
                        handle_completion(&mut storefront, completion);
                    }
                }

                publish(&view_tx, storefront.view());
            }

            tracing::info!("storefront worker stopped");
            storefront
        });

        StorefrontHandle {
            events: events_tx,
            view: view_rx,
            shutdown: self.shutdown,
            task,
        }
    }
}

async fn handle_event(
    storefront: &mut Storefront,
    event: UiEvent,
    done: &mpsc::UnboundedSender<Completion>,
) {
    tracing::debug!(?event, "ui event");
    match event {
        UiEvent::PageReady => {
            storefront.load_theme().await;
            spawn_catalog_load(storefront, done);
        }
        UiEvent::ThemeToggleClicked => {
            storefront.toggle_theme().await;
        }
        UiEvent::QueryKeyDown { key, value } => {
            if key == SUBMIT_KEY {
                spawn_search(storefront, &value, done);
            }
        }
        UiEvent::SearchClicked { value } => spawn_search(storefront, &value, done),
        UiEvent::FilterChanged { facet, value, checked } => {
            storefront.toggle_filter(facet, &value, checked);
        }
        UiEvent::SortChanged(sort) => storefront.set_sort(sort),
        UiEvent::CloseClicked => storefront.close_modal(),
        UiEvent::WindowClicked(target) => {
            storefront.pointer(target);
        }
    }
}

fn handle_completion(storefront: &mut Storefront, completion: Completion) {
    match completion {
        Completion::CatalogLoaded(result) => {
            storefront.apply_catalog(result);
        }
        Completion::SearchSettled { ticket, result } => {
            storefront.settle_search(&ticket, result);
        }
    }
}

fn spawn_catalog_load(storefront: &Storefront, done: &mpsc::UnboundedSender<Completion>) {
    let api = storefront.api();
    let done = done.clone();
    tokio::spawn(async move {
        let result = api.list_products().await;
        if done.send(Completion::CatalogLoaded(result)).is_err() {
            tracing::debug!("worker gone before catalog load finished");
        }
    });
}

fn spawn_search(storefront: &mut Storefront, raw_query: &str, done: &mpsc::UnboundedSender<Completion>) {
    let Some(ticket) = storefront.submit_search(raw_query) else {
        return;
    };
    let api = storefront.api();
    let done = done.clone();
    tokio::spawn(async move {
        let result = api.search(ticket.query()).await;
        if done.send(Completion::SearchSettled { ticket, result }).is_err() {
            tracing::debug!("worker gone before search finished");
        }
    });
}

fn publish(tx: &watch::Sender<PageView>, view: &PageView) {
    tx.send_if_modified(|current| {
        if *current == *view {
            false
        } else {
            *current = view.clone();
            true
        }
    });
}

/// Client side of a running [`StorefrontWorker`].
pub struct StorefrontHandle {
    events: mpsc::UnboundedSender<UiEvent>,
    view: watch::Receiver<PageView>,
    shutdown: Arc<Notify>,
    task: JoinHandle<Storefront>,
}

impl StorefrontHandle {
    pub fn send(&self, event: UiEvent) -> Result<(), WorkerError> {
        self.events.send(event).map_err(|_| WorkerError::Stopped)
    }

    /// Latest published page.
    pub fn view(&self) -> PageView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PageView> {
        self.view.clone()
    }

    /// Stop the loop and take the storefront back.
    pub async fn shutdown(self) -> Result<Storefront, WorkerError> {
        self.shutdown.notify_one();
        self.task
            .await
            .map_err(|err| WorkerError::Join(err.to_string()))
    }
}
