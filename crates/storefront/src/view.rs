//! Value model of the page: one field per binding point.
//!
//! Renders replace a region's content wholesale, the way the browser page
//! replaced `innerHTML`. `to_document` wraps the regions in a minimal HTML
//! shell carrying the same element IDs.

use crate::prefs::Theme;
use crate::render::html_escape;

/// Element IDs the page logic binds to.
pub mod ids {
    pub const THEME_TOGGLE: &str = "dark-mode-toggle";
    pub const SEARCH_INPUT: &str = "search-input";
    pub const SEARCH_BUTTON: &str = "search-button";
    pub const PRODUCT_LIST: &str = "product-list";
    pub const CATEGORY_FILTERS: &str = "category-filters";
    pub const SOURCE_FILTERS: &str = "source-filters";
    pub const RESULTS_MODAL: &str = "resultsModal";
    pub const MODAL_TITLE: &str = "modal-title";
    pub const MODAL_BODY: &str = "modal-body";
    pub const CLOSE_BUTTON: &str = "close-btn";
    pub const RESULTS_HEADER: &str = "results-header";
    pub const NOTICE: &str = "status-message";
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalView {
    pub open: bool,
    /// Plain text, escaped on output by [`PageView::to_document`].
    pub title: String,
    /// HTML fragment.
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Inline prompt asking the user to fix their input.
    Prompt,
    /// Recoverable failure (e.g. the catalog could not be loaded).
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    pub theme: Theme,
    /// HTML fragment: product cards.
    pub product_list: String,
    /// HTML fragment: category checkboxes.
    pub category_filters: String,
    /// HTML fragment: source checkboxes.
    pub source_filters: String,
    /// Plain text, e.g. `Nalezené produkty (3)`.
    pub results_header: String,
    pub modal: ModalView,
    pub notice: Option<Notice>,
}

impl PageView {
    /// Content of the region bound to `id`, if it is one of ours.
    pub fn region(&self, id: &str) -> Option<&str> {
        match id {
            ids::PRODUCT_LIST => Some(&self.product_list),
            ids::CATEGORY_FILTERS => Some(&self.category_filters),
            ids::SOURCE_FILTERS => Some(&self.source_filters),
            ids::RESULTS_HEADER => Some(&self.results_header),
            ids::MODAL_TITLE => Some(&self.modal.title),
            ids::MODAL_BODY => Some(&self.modal.body),
            ids::NOTICE => self.notice.as_ref().map(|n| n.message.as_str()),
            _ => None,
        }
    }

    /// Number of product cards currently in the grid.
    pub fn card_count(&self) -> usize {
        self.product_list.matches("class=\"product-card\"").count()
    }

    /// Number of product cards currently in the modal body.
    pub fn modal_card_count(&self) -> usize {
        self.modal.body.matches("class=\"product-card\"").count()
    }

    pub fn to_document(&self, page_title: &str) -> String {
        let body_class = match self.theme.body_class() {
            Some(class) => format!(" class=\"{}\"", class),
            None => String::new(),
        };

        let notice = match &self.notice {
            Some(n) => {
                let kind = match n.kind {
                    NoticeKind::Prompt => "prompt",
                    NoticeKind::Error => "error",
                };
                format!(
                    "<p id=\"{id}\" class=\"status-message {kind}\">{msg}</p>\n",
                    id = ids::NOTICE,
                    kind = kind,
                    msg = html_escape(&n.message)
                )
            }
            None => String::new(),
        };

        let modal_display = if self.modal.open { "block" } else { "none" };

        format!(
            r#"<!DOCTYPE html>
<html lang="cs">
<head>
<meta charset="utf-8">
<title>{page_title}</title>
</head>
<body{body_class}>
<header>
<button id="{theme_toggle}"><i class="fa {icon}"></i></button>
<input id="{search_input}" type="text">
<button id="{search_button}">Hledat</button>
</header>
{notice}<aside class="filters">
<div id="{category_filters}" class="filter-options">
{category_html}</div>
<div id="{source_filters}" class="filter-options">
{source_html}</div>
</aside>
<main class="results-area">
<h2 id="{results_header_id}">{results_header}</h2>
<div id="{product_list}">
{product_html}</div>
</main>
<div id="{modal}" class="modal" style="display: {modal_display};">
<div class="modal-content">
<span class="{close}">&times;</span>
<h2 id="{modal_title}">{modal_title_text}</h2>
<div id="{modal_body}">
{modal_body_html}
</div>
</div>
</div>
</body>
</html>
"#,
            page_title = html_escape(page_title),
            body_class = body_class,
            theme_toggle = ids::THEME_TOGGLE,
            icon = self.theme.icon(),
            search_input = ids::SEARCH_INPUT,
            search_button = ids::SEARCH_BUTTON,
            notice = notice,
            category_filters = ids::CATEGORY_FILTERS,
            category_html = self.category_filters,
            source_filters = ids::SOURCE_FILTERS,
            source_html = self.source_filters,
            results_header_id = ids::RESULTS_HEADER,
            results_header = html_escape(&self.results_header),
            product_list = ids::PRODUCT_LIST,
            product_html = self.product_list,
            modal = ids::RESULTS_MODAL,
            modal_display = modal_display,
            close = ids::CLOSE_BUTTON,
            modal_title = ids::MODAL_TITLE,
            modal_title_text = html_escape(&self.modal.title),
            modal_body = ids::MODAL_BODY,
            modal_body_html = self.modal.body,
        )
    }
}
