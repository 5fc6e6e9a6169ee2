//! Marketplace listings per blueprint

use riftbound_common::{Listing, MarketError, MarketResult};
use std::collections::HashMap;

use super::CardTraderClient;

/// Outcome of fetching the live listings of one blueprint
///
/// Keeps "nobody sells this" apart from "the request failed" so the pricing
/// run can report the two differently while treating both as no offers.
#[derive(Debug)]
pub enum ListingFetch {
    Listings(Vec<Listing>),
    Empty,
    Failed(MarketError),
}

impl ListingFetch {
    /// Listings to price from; empty for both `Empty` and `Failed`
    pub fn into_listings(self) -> Vec<Listing> {
        match self {
            ListingFetch::Listings(listings) => listings,
            ListingFetch::Empty | ListingFetch::Failed(_) => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ListingFetch::Failed(_))
    }
}

impl From<MarketResult<Vec<Listing>>> for ListingFetch {
    fn from(result: MarketResult<Vec<Listing>>) -> Self {
        match result {
            Ok(listings) if listings.is_empty() => ListingFetch::Empty,
            Ok(listings) => ListingFetch::Listings(listings),
            Err(e) => ListingFetch::Failed(e),
        }
    }
}

impl CardTraderClient {
    /// Fetch current listings for a blueprint.
    ///
    /// The endpoint answers with an object keyed by the blueprint id; a
    /// missing key means no listings.
    pub async fn fetch_listings_raw(&self, blueprint_id: u64) -> MarketResult<Vec<Listing>> {
        let mut products: HashMap<String, Vec<Listing>> = self
            .get_json(
                "/marketplace/products",
                &[("blueprint_id", blueprint_id.to_string())],
            )
            .await?;

        Ok(products
            .remove(&blueprint_id.to_string())
            .unwrap_or_default())
    }

    /// Fetch current listings, folding every failure into [`ListingFetch::Failed`]
    pub async fn fetch_listings(&self, blueprint_id: u64) -> ListingFetch {
        let fetch = ListingFetch::from(self.fetch_listings_raw(blueprint_id).await);
        match &fetch {
            ListingFetch::Listings(listings) => {
                log::debug!("Blueprint {}: {} listings", blueprint_id, listings.len())
            }
            ListingFetch::Empty => log::debug!("Blueprint {}: no listings", blueprint_id),
            ListingFetch::Failed(e) => {
                log::warn!("Failed to fetch listings for blueprint {}: {}", blueprint_id, e)
            }
        }
        fetch
    }
}
