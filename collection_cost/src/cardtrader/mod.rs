//! CardTrader API client for blueprints and marketplace listings

mod blueprints;
mod client;
mod marketplace;

pub use client::{CardTraderClient, DEFAULT_BASE_URL};
pub use marketplace::ListingFetch;
