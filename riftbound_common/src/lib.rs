//! Shared types for Riftbound pricing
//!
//! Wire types for the CardTrader marketplace API, card name normalization,
//! and the marketplace error type used by the pricing tools.

pub mod error;
pub mod models;
pub mod normalize;

pub use error::{MarketError, MarketResult};
pub use models::{Blueprint, Condition, FixedProperties, Listing, ListingProperties, Seller};
pub use normalize::normalize_name;
