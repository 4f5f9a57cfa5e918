//! `pricecompare` command-line entry point.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use pricecompare_core::{Facet, SortOrder};
use pricecompare_storefront::config::StorefrontConfig;
use pricecompare_storefront::{
    CatalogStore, HttpProductApi, PreferenceStore, ProductApi, SqlitePreferences, Storefront,
};

const PAGE_TITLE: &str = "Srovnávač cen";

/// Price-comparison storefront client
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (overrides PRICECOMPARE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Per-request timeout in seconds (overrides PRICECOMPARE_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog and write the filtered product page
    Page {
        /// Only show this category (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Only show this source site (repeatable)
        #[arg(long = "source")]
        sources: Vec<String>,
        /// Only show titles containing this text
        #[arg(long)]
        search: Option<String>,
        /// price_asc, price_desc, name_asc, name_desc or catalog
        #[arg(long, default_value = "catalog")]
        sort: String,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List every seller of a product, cheapest first
    Compare { name: String },
    /// Run one search and write the page with the results dialog open
    Search {
        query: String,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print title suggestions for a prefix
    Suggest { prefix: String },
    /// Print catalog statistics
    Stats,
    /// Show or flip the persisted theme
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Show,
    Toggle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pricecompare_observability::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Page { categories, sources, search, sort, out } => {
            let sort: SortOrder = sort.parse()?;
            let mut storefront = Storefront::from_config(&config).await?;
            storefront.start().await;
            for category in &categories {
                storefront.toggle_filter(Facet::Category, category, true);
            }
            for source in &sources {
                storefront.toggle_filter(Facet::Source, source, true);
            }
            if let Some(query) = &search {
                storefront.set_title_filter(query);
            }
            storefront.set_sort(sort);
            if let Some(notice) = &storefront.view().notice {
                eprintln!("{}", notice.message);
            }
            write_output(out.as_deref(), &storefront.view().to_document(PAGE_TITLE))?;
        }
        Commands::Search { query, out } => {
            let mut storefront = Storefront::from_config(&config).await?;
            storefront.load_theme().await;
            if !storefront.search(&query).await {
                if let Some(notice) = &storefront.view().notice {
                    bail!("{}", notice.message);
                }
            }
            write_output(out.as_deref(), &storefront.view().to_document(PAGE_TITLE))?;
        }
        Commands::Suggest { prefix } => {
            let api = HttpProductApi::from_config(&config)?;
            let suggestions = api.suggest(&prefix).await?;
            let mut stdout = std::io::stdout().lock();
            for title in suggestions {
                writeln!(stdout, "{}", title)?;
            }
        }
        Commands::Compare { name } => {
            let catalog = fetch_catalog(&config).await?;
            let sellers = catalog.compare(&name);
            if sellers.is_empty() {
                bail!("no listing matches {:?}", name.trim());
            }
            let mut stdout = std::io::stdout().lock();
            for product in sellers {
                writeln!(
                    stdout,
                    "{:<16} {:>14}  {}  {}",
                    product.source_site().unwrap_or("-"),
                    product.formatted_price(),
                    product.title,
                    product.link,
                )?;
            }
        }
        Commands::Stats => {
            let stats = fetch_catalog(&config).await?.stats();
            println!("products:   {}", stats.total_products);
            println!("categories: {}", stats.categories);
            for (source, count) in &stats.per_source {
                println!("  {:<16} {}", source, count);
            }
        }
        Commands::Theme { action } => {
            let backend = SqlitePreferences::open(&config.prefs_path).await?;
            let mut prefs = PreferenceStore::new(Arc::new(backend));
            let theme = match action {
                ThemeAction::Show => prefs.load().await,
                ThemeAction::Toggle => {
                    prefs.load().await;
                    prefs.toggle().await.context("failed to save theme")?
                }
            };
            println!("{}", if theme.is_dark() { "dark" } else { "light" });
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<StorefrontConfig> {
    let mut config = StorefrontConfig::from_env().context("invalid environment configuration")?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(secs) = cli.timeout_secs {
        if secs == 0 {
            bail!("--timeout-secs must be positive");
        }
        config = config.with_timeout(Duration::from_secs(secs));
    }
    tracing::debug!(api_url = %config.api_url, timeout = ?config.request_timeout, "configuration loaded");
    Ok(config)
}

async fn fetch_catalog(config: &StorefrontConfig) -> anyhow::Result<CatalogStore> {
    let api = HttpProductApi::from_config(config)?;
    let mut catalog = CatalogStore::new();
    catalog
        .load(&api)
        .await
        .with_context(|| format!("failed to load catalog from {}", config.api_url))?;
    Ok(catalog)
}

fn write_output(out: Option<&Path>, document: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "page written");
        }
        None => std::io::stdout().lock().write_all(document.as_bytes())?,
    }
    Ok(())
}

