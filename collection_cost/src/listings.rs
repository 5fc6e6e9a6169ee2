//! Listing filtering and ordering before accumulation

use riftbound_common::Listing;

/// Buyer preferences applied to a blueprint's listings
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingFilter<'a> {
    /// Only sellers that ship through CardTrader Zero
    pub zero_only: bool,
    pub language: Option<&'a str>,
    pub foil_only: bool,
}

/// Apply every filter in order and sort by unit price ascending:
/// graded, condition, Zero, language, foil policy, then price.
pub fn filter_and_sort(listings: Vec<Listing>, filter: &ListingFilter<'_>) -> Vec<Listing> {
    let mut listings = drop_unwanted_condition(listings);
    if filter.zero_only {
        listings = restrict_to_zero(listings);
    }
    if let Some(language) = filter.language {
        listings = restrict_to_language(listings, language);
    }
    listings = apply_foil_policy(listings, filter.foil_only);
    sort_by_price(&mut listings);
    listings
}

/// Drop graded listings and anything not Near Mint or Mint
pub fn drop_unwanted_condition(listings: Vec<Listing>) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|l| !l.graded)
        .filter(|l| l.condition().is_some_and(|c| c.is_mint_or_near_mint()))
        .collect()
}

pub fn restrict_to_zero(listings: Vec<Listing>) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(Listing::seller_can_sell_via_hub)
        .collect()
}

/// Keep listings in `language` (case-insensitive); listings without a language are dropped
pub fn restrict_to_language(listings: Vec<Listing>, language: &str) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|l| l.language().is_some_and(|lang| lang.eq_ignore_ascii_case(language)))
        .collect()
}

/// Foil-only keeps just foils. Otherwise foils are dropped as long as at
/// least one non-foil remains, and kept as the only option when none does.
pub fn apply_foil_policy(listings: Vec<Listing>, foil_only: bool) -> Vec<Listing> {
    if foil_only {
        return listings.into_iter().filter(Listing::is_foil).collect();
    }

    let (foils, non_foils): (Vec<Listing>, Vec<Listing>) =
        listings.into_iter().partition(Listing::is_foil);
    if non_foils.is_empty() {
        foils
    } else {
        non_foils
    }
}

/// Stable sort by unit price; listings without a price go last
pub fn sort_by_price(listings: &mut [Listing]) {
    listings.sort_by_key(|l| l.price_cents.unwrap_or(i64::MAX));
}

#[cfg(test)]
#[path = "listings_tests.rs"]
mod tests;
