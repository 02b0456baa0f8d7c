// ============================================================================
// storefront - CLI for the storefront client state
// ============================================================================
// Usage:
//   storefront stats                              Show local store statistics
//   storefront favorites list|clear|pull          Inspect or reset liked ids
//   storefront export                             Export all snapshots as JSON
//   storefront feed [--query Q] [--save] ...      Search a catalog file
//   storefront suggest --product ID [--tier T]    Print the suggestion plan
//   storefront bundle --product ID [--add ID...]  Print a bundle quote
// ============================================================================

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use storefront_core::db::keys;
use storefront_core::favorites::{pull_favorites, LikeState};
use storefront_core::filters::{
    CategorySelection, FacetValue, FilterState, NumericRange, SetMember, SortBy, Staged,
    DEFAULT_PRICE_RANGE,
};
use storefront_core::suggestions::{SuggestionLimits, SuggestionPlan};
use storefront_core::{
    plan_suggestions, search_feed, Bundle, CatalogIndex, CatalogItem, CatalogLoader,
    CategoryStore, FilterStore, JsonFileSource, LocalStore, SellerDirectory,
    SellerTier, StateContainer, StorefrontConfig,
};
use tracing_subscriber::EnvFilter;

/// Storefront client state tool
#[derive(Parser)]
#[command(name = "storefront", version, about = "Inspect storefront state and query a catalog")]
struct Cli {
    /// Path to the local state database (default: ~/.storefront/state.redb)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// JSON catalog file (default: STOREFRONT_CATALOG)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show local store statistics
    Stats,

    /// Liked item ids
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Export every snapshot as JSON
    Export,

    /// Search the catalog with the saved filters plus command-line facets
    Feed {
        /// Case-insensitive title/brand search
        #[arg(long)]
        query: Option<String>,

        /// Brand to include (repeatable)
        #[arg(long)]
        brand: Vec<String>,

        /// Upper price bound
        #[arg(long)]
        max_price: Option<i64>,

        /// Category id
        #[arg(long)]
        category: Option<String>,

        /// recommended, price-asc, price-desc or rating
        #[arg(long)]
        sort: Option<SortBy>,

        /// Keep these facets and the category as the applied selection
        #[arg(long)]
        save: bool,
    },

    /// Print the suggestion plan for a product
    Suggest {
        #[arg(long)]
        product: String,

        /// Seller tier override: freemium or premium (default: ask the API)
        #[arg(long)]
        tier: Option<SellerTier>,
    },

    /// Print a bundle quote for a bundle-deal product
    Bundle {
        #[arg(long)]
        product: String,

        /// Candidate ids to add to the bundle
        #[arg(long)]
        add: Vec<String>,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List liked ids
    List,
    /// Forget all liked ids
    Clear,
    /// Replace local ids with the server's list
    Pull,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("storefront_core=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = StorefrontConfig::default().with_overrides(cli.db_path, cli.catalog);

    match cli.command {
        Commands::Stats => cmd_stats(&open_store(&config)?),
        Commands::Favorites { action } => cmd_favorites(&open_store(&config)?, &config, action).await,
        Commands::Export => cmd_export(&open_store(&config)?),
        Commands::Feed {
            query,
            brand,
            max_price,
            category,
            sort,
            save,
        } => {
            let catalog = load_catalog(&config).await?;
            let store = open_store(&config)?;
            let flags = FeedFlags {
                brands: brand,
                max_price,
                category,
                sort,
            };
            cmd_feed(&store, &catalog, query.as_deref(), flags, save)
        }
        Commands::Suggest { product, tier } => {
            let catalog = load_catalog(&config).await?;
            cmd_suggest(&config, catalog, &product, tier).await
        }
        Commands::Bundle { product, add } => {
            let catalog = load_catalog(&config).await?;
            cmd_bundle(catalog, &product, &add)
        }
    }
}

fn open_store(config: &StorefrontConfig) -> Result<LocalStore> {
    LocalStore::open(config.db_path.as_deref())
}

async fn load_catalog(config: &StorefrontConfig) -> Result<Arc<Vec<CatalogItem>>> {
    let path = config
        .catalog_path
        .clone()
        .ok_or_else(|| anyhow!("No catalog given. Pass --catalog or set STOREFRONT_CATALOG."))?;

    let loader = CatalogLoader::new(Arc::new(JsonFileSource::new(path)));
    loader.ensure_loaded().await?;
    Ok(loader.items().await)
}

fn cmd_stats(store: &LocalStore) -> Result<()> {
    let stats = store.stats()?;

    println!("=== Storefront Local Store Stats ===");
    println!("Database:  {}", store.path().display());
    println!();
    println!("Snapshots: {} ({} bytes)", stats.snapshot_count, stats.total_bytes);
    for (key, bytes) in &stats.sizes {
        println!("  {:12} {} bytes", key, bytes);
    }

    Ok(())
}

async fn cmd_favorites(
    store: &LocalStore,
    config: &StorefrontConfig,
    action: FavoritesAction,
) -> Result<()> {
    match action {
        FavoritesAction::List => {
            let likes: StateContainer<LikeState> = StateContainer::default();
            store.restore(&likes, keys::LIKES)?;
            let ids = likes.get_state().ids;

            if ids.is_empty() {
                println!("No favorites.");
                return Ok(());
            }
            for id in ids.iter() {
                println!("{}", id);
            }
            println!("\nTotal: {} favorites", ids.len());
        }
        FavoritesAction::Clear => {
            if store.delete_snapshot(keys::LIKES)? {
                println!("Favorites cleared.");
            } else {
                println!("No favorites stored.");
            }
        }
        FavoritesAction::Pull => {
            let ids = pull_favorites(store, &config.api_base_url).await?;
            println!("Pulled {} favorites from {}", ids.len(), config.api_base_url);
        }
    }

    Ok(())
}

fn cmd_export(store: &LocalStore) -> Result<()> {
    let mut snapshots = serde_json::Map::new();
    for key in store.list_keys()? {
        if let Some(value) = store.load_snapshot(&key)? {
            snapshots.insert(key, value);
        }
    }

    let export = serde_json::json!({
        "exported_at": Utc::now().to_rfc3339(),
        "stats": store.stats()?,
        "snapshots": snapshots,
    });

    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}

/// Facets given on the command line, layered over the saved selection
struct FeedFlags {
    brands: Vec<String>,
    max_price: Option<i64>,
    category: Option<String>,
    sort: Option<SortBy>,
}

impl FeedFlags {
    fn apply(self, filters: &mut FilterState, categories: &mut CategorySelection) {
        for brand in self.brands {
            filters.toggle_member(SetMember::Brand(brand));
        }
        if let Some(max) = self.max_price {
            filters.set_facet(FacetValue::PriceRange(NumericRange::new(DEFAULT_PRICE_RANGE.lo, max)));
        }
        if let Some(sort) = self.sort {
            filters.set_facet(FacetValue::SortBy(sort));
        }
        if let Some(id) = self.category {
            categories.select_only(&id);
        }
    }
}

/// Applied filters and categories from the local store (defaults if never saved)
fn load_feed_state(store: &LocalStore) -> Result<(FilterState, CategorySelection)> {
    let filters: StateContainer<FilterStore> = StateContainer::default();
    let categories: StateContainer<CategoryStore> = StateContainer::default();
    store.restore(&filters, keys::FILTERS)?;
    store.restore(&categories, keys::CATEGORIES)?;

    let filters = filters.get_state().applied().clone();
    let categories = categories.get_state().applied().clone();
    Ok((filters, categories))
}

fn save_feed_state(
    store: &LocalStore,
    filters: &FilterState,
    categories: &CategorySelection,
) -> Result<()> {
    let filters: StateContainer<FilterStore> = StateContainer::new(Staged::new(filters.clone()));
    let categories: StateContainer<CategoryStore> =
        StateContainer::new(Staged::new(categories.clone()));
    store.persist(&filters, keys::FILTERS)?;
    store.persist(&categories, keys::CATEGORIES)
}

fn cmd_feed(
    store: &LocalStore,
    catalog: &[CatalogItem],
    query: Option<&str>,
    flags: FeedFlags,
    save: bool,
) -> Result<()> {
    let (mut filters, mut categories) = load_feed_state(store)?;
    flags.apply(&mut filters, &mut categories);

    if save {
        save_feed_state(store, &filters, &categories)?;
        println!("Saved {} active filters.", filters.active_count() + categories.active_count());
    }

    let results = search_feed(catalog, &filters, &categories, query.unwrap_or(""));

    for chip in filters.active_facets() {
        println!("[{}]", chip.label);
    }

    if results.is_empty() {
        println!("No items match.");
        return Ok(());
    }

    print_items(&results);
    println!("\n{} of {} items", results.len(), catalog.len());
    Ok(())
}

async fn cmd_suggest(
    config: &StorefrontConfig,
    catalog: Arc<Vec<CatalogItem>>,
    product_id: &str,
    tier: Option<SellerTier>,
) -> Result<()> {
    let index = CatalogIndex::build(catalog);
    let product = index
        .get(product_id)
        .ok_or_else(|| anyhow!("Product '{}' not found in catalog", product_id))?;

    let tier = match tier {
        Some(tier) => tier,
        None => {
            let directory = SellerDirectory::new(&config.api_base_url);
            directory.load_tiers().await;
            directory.tier_of(product.seller_id()).await
        }
    };

    let plan = plan_suggestions(&index, product, tier, SuggestionLimits::default());
    println!(
        "Product {} by seller {} ({})",
        product.id,
        product.seller_id(),
        tier.display_name()
    );
    println!("Mode: {}", plan.mode_name());
    println!();

    match &plan {
        SuggestionPlan::SimilarOnly { label, items } => {
            println!("{}", label);
            print_items(items);
        }
        SuggestionPlan::Blended { items } => print_items(items),
        SuggestionPlan::Split {
            seller,
            window,
            similar,
        } => {
            println!("More from this seller (showing {} of {})", window.visible(), window.total());
            print_items(window.slice(seller));
            println!();
            println!("Similar items");
            print_items(similar);
        }
    }

    Ok(())
}

fn cmd_bundle(catalog: Arc<Vec<CatalogItem>>, product_id: &str, add: &[String]) -> Result<()> {
    let index = CatalogIndex::build(catalog);
    let mut bundle = Bundle::for_product(&index, product_id)
        .ok_or_else(|| anyhow!("Product '{}' is not a bundle deal", product_id))?;

    for id in add {
        if !bundle.candidates().iter().any(|c| &c.id == id) {
            eprintln!("Skipping {}: not a bundle candidate", id);
        }
        bundle.toggle(id);
    }

    println!("Candidates:");
    for item in bundle.candidates() {
        let mark = if bundle.is_selected(&item.id) { "x" } else { " " };
        println!("  [{}] {:<10} {:<40} {}", mark, item.id, item.title, item.price);
    }

    let quote = bundle.quote();
    println!();
    println!("Items:    {}", quote.item_count);
    println!("Subtotal: {}", quote.subtotal);
    println!("Discount: {}", quote.discount);
    println!("Total:    {}", quote.total);
    Ok(())
}

fn print_items(items: &[&CatalogItem]) {
    println!(
        "{:<10}  {:<40}  {:<10}  {:<12}  {}",
        "ID", "TITLE", "PRICE", "SELLER", "BRAND"
    );
    println!("{}", "-".repeat(90));

    for item in items {
        let title = item.title.chars().take(40).collect::<String>();
        println!(
            "{:<10}  {:<40}  {:<10}  {:<12}  {}",
            item.id,
            title,
            item.price,
            item.seller_id(),
            item.brand.as_deref().unwrap_or("-")
        );
    }
}
