//! Open/close state of the search results dialog.

use crate::search::SearchState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

/// Where a pointer event landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The overlay around the dialog.
    Backdrop,
    /// Anything inside the dialog itself.
    Content,
    /// Any other part of the page.
    Page,
}

#[derive(Debug, Clone, Default)]
pub struct ModalController {
    state: ModalState,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ModalState::Open
    }

    pub fn open(&mut self) {
        self.state = ModalState::Open;
    }

    pub fn close(&mut self) {
        self.state = ModalState::Closed;
    }

    /// Open for every settled search, failures included, so the message in
    /// the dialog body is visible.
    pub fn on_search_settled(&mut self, state: &SearchState) {
        if state.is_terminal() {
            self.open();
        }
    }

    /// Close on a backdrop hit. Returns whether the modal closed.
    pub fn on_pointer(&mut self, target: PointerTarget) -> bool {
        if self.is_open() && target == PointerTarget::Backdrop {
            self.close();
            return true;
        }
        false
    }
}
