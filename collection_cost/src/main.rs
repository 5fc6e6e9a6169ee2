//! Collection Cost - Riftbound collection pricing on CardTrader
//!
//! Prices catalog categories against live CardTrader listings, shows the
//! cached totals and scans expansions for underpriced listings.

use clap::{Args, Parser, Subcommand};
use collection_cost::cheap_finder::{find_cheap_cards, CheapQuery, DEFAULT_EXPANSION};
use collection_cost::report::{format_cheap_finds, format_latest_rows, format_price_report};
use collection_cost::{
    load_catalog, CardTraderClient, CategoryFilter, Inventory, PriceQuery, PriceService,
    PricerError, Result,
};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Riftbound collection pricing on CardTrader
#[derive(Parser, Debug)]
#[command(name = "collection_cost")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(short, long, global = true, default_value_t = default_db_path())]
    database: String,

    /// CardTrader API token
    #[arg(long, global = true, env = "API_CARDTRADER", hide_env_values = true)]
    api_token: Option<String>,

    /// CardTrader API root
    #[arg(long, global = true, default_value = collection_cost::cardtrader::DEFAULT_BASE_URL)]
    base_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price every catalog card of a rarity and domain
    Price(PriceArgs),
    /// Show the newest cached total per rarity and domain
    Latest(LatestArgs),
    /// Find listings far below the price floor of their card
    Cheap(CheapArgs),
}

#[derive(Args, Debug)]
struct PriceArgs {
    /// Rarity (Epic, Rare, etc.)
    rarity: String,

    /// Domain (Fury, Calm, etc.)
    domain: String,

    /// Listing language (en, fr, etc.)
    language: Option<String>,

    /// Card catalog CSV
    #[arg(short, long, default_value = "riftbound_cards_by_set.csv")]
    catalog: PathBuf,

    /// Copies wanted of each card
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,

    /// Only sellers shipping through CardTrader Zero
    #[arg(short, long, default_value_t = false)]
    zero: bool,

    /// Expansion name (Origins, SFD, etc.) or CardTrader expansion id
    #[arg(short, long)]
    expansion: Option<String>,

    /// Only include foil listings
    #[arg(short, long, default_value_t = false)]
    foil: bool,

    /// Collection CSV; owned copies are subtracted and nothing is cached
    #[arg(short, long)]
    inventory: Option<PathBuf>,

    /// Subtract the catalog's own Quantity/Owned column; nothing is cached
    #[arg(long, default_value_t = false, conflicts_with = "inventory")]
    owned_from_catalog: bool,

    /// Ignore the cache and compute a fresh total
    #[arg(long, default_value_t = false)]
    force_refresh: bool,

    /// List every card's outcome
    #[arg(long, default_value_t = false)]
    details: bool,

    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct LatestArgs {
    /// Listing language filter the totals were computed with
    language: Option<String>,

    #[arg(short, long, default_value_t = 1)]
    quantity: u32,

    #[arg(short, long, default_value_t = false)]
    zero: bool,

    #[arg(short, long)]
    expansion: Option<String>,

    #[arg(short, long, default_value_t = false)]
    foil: bool,

    /// Print the rows as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct CheapArgs {
    /// Rarity level (Epic, Rare, etc.)
    rarity: String,

    /// Language code (en, fr, etc.)
    language: Option<String>,

    /// Expansion name or id
    #[arg(short, long, default_value = DEFAULT_EXPANSION)]
    expansion: String,

    /// Only CardTrader Zero compatible listings
    #[arg(short, long, default_value_t = false)]
    zero: bool,

    /// Print the finds as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Returns the default database path: ~/.local/share/collection_cost/prices.db
fn default_db_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("collection_cost")
        .join("prices.db")
        .to_string_lossy()
        .to_string()
}

#[tokio::main]
async fn main() {
    // Initialize logging. Set RUST_LOG to control the level, e.g. RUST_LOG=collection_cost=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        log::error!("collection_cost failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Price(args) => run_price(&cli, args).await,
        Command::Latest(args) => run_latest(&cli, args),
        Command::Cheap(args) => run_cheap(&cli, args).await,
    }
}

fn client(cli: &Cli) -> Result<CardTraderClient> {
    let token = cli
        .api_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            PricerError::Config("API_CARDTRADER not set (use --api-token or the environment)".into())
        })?;

    let client = CardTraderClient::with_timeout(token, Duration::from_secs(cli.timeout))?
        .with_base_url(&cli.base_url);
    Ok(client)
}

fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            log::info!("Created directory: {}", parent.display());
        }
    }

    let conn = Connection::open(path)?;
    log::info!("Opened database: {}", path.display());
    Ok(conn)
}

async fn run_price(cli: &Cli, args: &PriceArgs) -> Result<()> {
    let client = client(cli)?;
    let catalog = load_catalog(&args.catalog)?;
    let inventory = if args.owned_from_catalog {
        let owned = Inventory::from_records(&catalog);
        log::info!("Catalog lists {} owned cards", owned.len());
        Some(owned)
    } else {
        args.inventory.as_ref().map(Inventory::load).transpose()?
    };
    let conn = open_database(Path::new(&cli.database))?;
    let service = PriceService::new(client, catalog, inventory, conn)?;

    let query = PriceQuery::new(&args.rarity, &args.domain, args.quantity)
        .language(args.language.clone())
        .expansion(args.expansion.clone())
        .zero_only(args.zero)
        .foil(args.foil);

    let report = service.query(&query, args.force_refresh).await?;

    if args.json {
        println!("{}", to_json(&report)?);
    } else {
        print!("{}", format_price_report(&report, args.details));
    }
    Ok(())
}

fn run_latest(cli: &Cli, args: &LatestArgs) -> Result<()> {
    let conn = open_database(Path::new(&cli.database))?;
    collection_cost::init_schema(&conn)?;

    // Same normalization as a pricing query so the tuples line up
    let query = PriceQuery::new("", "", args.quantity)
        .language(args.language.clone())
        .expansion(args.expansion.clone());
    let filter = CategoryFilter {
        quantity: args.quantity,
        zero_only: args.zero,
        language: query.language,
        expansion: query.expansion,
        foil: args.foil,
    };
    let rows = collection_cost::database::latest_per_category(&conn, &filter)?;

    if args.json {
        println!("{}", to_json(&rows)?);
    } else {
        print!("{}", format_latest_rows(&rows));
    }
    Ok(())
}

async fn run_cheap(cli: &Cli, args: &CheapArgs) -> Result<()> {
    let client = client(cli)?;
    let query = CheapQuery {
        rarity: args.rarity.clone(),
        language: args.language.clone(),
        expansion: Some(args.expansion.clone()),
        zero_only: args.zero,
    };

    let finds = find_cheap_cards(&client, &query).await?;

    if args.json {
        println!("{}", to_json(&finds)?);
    } else {
        print!("{}", format_cheap_finds(&finds, args.language.as_deref()));
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
