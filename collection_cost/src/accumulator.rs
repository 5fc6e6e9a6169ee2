//! Greedy cheapest-first purchase of listings

use riftbound_common::Listing;
use serde::Serialize;

/// What could be bought for one card
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Fulfillment {
    pub items: u32,
    /// Minor currency units
    pub cost_cents: i64,
    /// Currency of the last listing bought from
    pub currency: Option<String>,
}

/// Buy up to `needed` copies from price-sorted listings.
///
/// Units within a listing are interchangeable and price is the only cost, so
/// taking the cheapest listing first is optimal. Listings without a price
/// are never bought from.
pub fn accumulate(needed: u32, listings: &[Listing]) -> Fulfillment {
    let mut fulfillment = Fulfillment::default();
    let mut remaining = needed;

    for listing in listings {
        if remaining == 0 {
            break;
        }
        let Some(price) = listing.price_cents else {
            continue;
        };

        let take = listing.quantity.min(remaining);
        if take == 0 {
            continue;
        }

        fulfillment.cost_cents += i64::from(take) * price;
        fulfillment.items += take;
        remaining -= take;
        if let Some(currency) = &listing.price_currency {
            fulfillment.currency = Some(currency.clone());
        }
    }

    fulfillment
}
