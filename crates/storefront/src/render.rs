//! HTML fragments for product cards, filter checkboxes and status lines.
//!
//! Every function here is pure: same input, same markup. Interpolated text
//! and attribute values are escaped.

use pricecompare_core::{Facet, FilterSelection, LogoMap, Product};

/// User-facing strings. Defaults are the Czech storefront copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub results_header: &'static str,
    pub category_prefix: &'static str,
    pub category_placeholder: &'static str,
    pub unknown_category: &'static str,
    pub unknown_source: &'static str,
    pub buy: &'static str,
    pub searching: &'static str,
    pub no_results: &'static str,
    pub search_failed: &'static str,
    pub blank_query: &'static str,
    pub catalog_failed: &'static str,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            results_header: "Nalezené produkty",
            category_prefix: "Kategorie:",
            category_placeholder: "N/A",
            unknown_category: "Neznámá",
            unknown_source: "Neznámý",
            buy: "Koupit",
            searching: "Hledám v databázi...",
            no_results: "Nebyly nalezeny žádné produkty.",
            search_failed: "Při vyhledávání došlo k chybě. Zkus to prosím znovu.",
            blank_query: "Zadej hledaný výraz.",
            catalog_failed: "Nepodařilo se načíst produkty.",
        }
    }
}

/// Kind of a single-line status placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Empty,
    Error,
}

impl StatusKind {
    fn class(&self) -> &'static str {
        match self {
            StatusKind::Loading => "loading",
            StatusKind::Empty => "empty",
            StatusKind::Error => "error",
        }
    }
}

/// Grid content plus its header label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFragment {
    pub html: String,
    pub count: usize,
    pub header: String,
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    logos: LogoMap,
    labels: Labels,
}

impl Renderer {
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn render_card(&self, product: &Product) -> String {
        let labels = &self.labels;
        let source = product.source_site();
        let logo = self.logos.resolve(source);

        let rating = match product.display_rating() {
            Some(r) => format!(
                "\n    <span class=\"product-rating\">⭐ {}</span>",
                r
            ),
            None => String::new(),
        };

        format!(
            r#"<div class="product-card" data-category="{data_category}" data-source="{data_source}">
  <div class="product-info">
    <div class="source-logo-container">
      <img src="{logo}" alt="{alt} logo" class="source-logo">
    </div>
    <h3 class="product-title">{title}</h3>
    <p class="product-category">{category_prefix} {category}</p>{rating}
  </div>
  <div class="price-box">
    <span class="product-price">{price}</span>
    <a href="{link}" target="_blank" rel="noopener noreferrer" class="link-button">{buy}</a>
  </div>
</div>
"#,
            data_category = html_escape(product.category().unwrap_or(labels.unknown_category)),
            data_source = html_escape(source.unwrap_or(labels.unknown_source)),
            logo = html_escape(logo),
            alt = html_escape(source.unwrap_or(labels.unknown_source)),
            title = html_escape(&product.title),
            category_prefix = labels.category_prefix,
            category = html_escape(product.category().unwrap_or(labels.category_placeholder)),
            rating = rating,
            price = html_escape(&product.formatted_price()),
            link = html_escape(&product.link),
            buy = labels.buy,
        )
    }

    /// Card fragments concatenated in input order.
    pub fn render_cards<'a>(&self, products: impl IntoIterator<Item = &'a Product>) -> String {
        products.into_iter().map(|p| self.render_card(p)).collect()
    }

    pub fn render_list(&self, products: &[&Product]) -> ListFragment {
        ListFragment {
            html: self.render_cards(products.iter().copied()),
            count: products.len(),
            header: self.results_header(products.len()),
        }
    }

    pub fn results_header(&self, count: usize) -> String {
        format!("{} ({})", self.labels.results_header, count)
    }

    /// One checkbox per option; options already in `selection` render checked.
    pub fn render_filter_options(
        &self,
        options: &[String],
        facet: Facet,
        selection: &FilterSelection,
    ) -> String {
        options
            .iter()
            .map(|option| {
                let checked = if selection.contains(facet, option) { " checked" } else { "" };
                format!(
                    "<label>\n  <input type=\"checkbox\" data-filter-type=\"{}\" value=\"{}\"{}>\n  {}\n</label>\n",
                    facet.as_str(),
                    html_escape(option),
                    checked,
                    html_escape(option),
                )
            })
            .collect()
    }

    pub fn status_message(&self, kind: StatusKind, text: &str) -> String {
        format!(
            "<p class=\"status-message {}\">{}</p>",
            kind.class(),
            html_escape(text)
        )
    }

    /// Plain text; the caller escapes it when writing markup.
    pub fn searching_title(&self, query: &str) -> String {
        format!("Hledání pro \"{}\"...", query)
    }

    /// Plain text; the caller escapes it when writing markup.
    pub fn results_title(&self, query: &str, count: usize) -> String {
        format!("Výsledky pro \"{}\" ({} nalezeno)", query, count)
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
