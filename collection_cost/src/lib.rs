//! Collection Cost - Riftbound collection pricing on CardTrader
//!
//! Filters a local card catalog by rarity, domain and expansion, resolves
//! each card to a CardTrader blueprint, buys the cheapest acceptable
//! listings on paper and caches the totals in SQLite.

pub mod accumulator;
pub mod cardtrader;
pub mod catalog;
pub mod cheap_finder;
pub mod database;
pub mod error;
pub mod expansions;
pub mod inventory;
pub mod listings;
pub mod pricing;
pub mod report;
pub mod resolver;
pub mod service;

pub use cardtrader::{CardTraderClient, ListingFetch};
pub use catalog::{load_catalog, CardRecord};
pub use database::{init_schema, CacheRow, CategoryFilter};
pub use error::{PricerError, Result};
pub use inventory::Inventory;
pub use pricing::{price_collection, CardStatus, PriceQuery, PricingResult};
pub use resolver::BlueprintCache;
pub use service::{PriceReport, PriceService, ReportSource};
