//! Spot listings priced well under the rest of the market
//!
//! For every blueprint of a rarity in one expansion, the cheapest listing is
//! compared against the average of the next few. A big gap usually means a
//! mispriced offer worth buying.

use crate::cardtrader::CardTraderClient;
use crate::error::{PricerError, Result};
use crate::expansions::{known_set_names, ExpansionFilter};
use crate::listings::{restrict_to_language, restrict_to_zero};
use riftbound_common::Listing;
use serde::Serialize;

/// Expansion searched when none is given
pub const DEFAULT_EXPANSION: &str = "origins";
/// Fewer prices than this and a blueprint is not judged
pub const MIN_PRICES: usize = 4;
/// How many prices after the cheapest make up the floor
pub const FLOOR_POOL_SIZE: usize = 5;
/// Cheapest must be at most this fraction of the floor average
pub const CHEAP_RATIO: f64 = 0.80;

const CARD_URL: &str = "https://www.cardtrader.com/cards";

/// Cheapest price measured against the floor of the next listings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceGap {
    pub cheapest_cents: i64,
    pub floor_avg_cents: f64,
    pub pool_size: usize,
}

impl PriceGap {
    /// Percentage saved against the floor average
    pub fn discount_percent(&self) -> f64 {
        (1.0 - self.cheapest_cents as f64 / self.floor_avg_cents) * 100.0
    }

    pub fn is_cheap(&self) -> bool {
        self.cheapest_cents as f64 <= self.floor_avg_cents * CHEAP_RATIO
    }
}

/// Measure the gap for ascending `prices`; `None` when there are too few
pub fn evaluate_prices(prices: &[i64]) -> Option<PriceGap> {
    if prices.len() < MIN_PRICES {
        return None;
    }
    let cheapest = prices[0];
    let pool = &prices[1..prices.len().min(1 + FLOOR_POOL_SIZE)];
    let floor_avg = pool.iter().sum::<i64>() as f64 / pool.len() as f64;

    Some(PriceGap {
        cheapest_cents: cheapest,
        floor_avg_cents: floor_avg,
        pool_size: pool.len(),
    })
}

/// A blueprint whose cheapest listing is far below its floor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheapFind {
    pub name: String,
    pub blueprint_id: u64,
    pub gap: PriceGap,
    pub currency: String,
    pub link: String,
}

/// Search parameters for [`find_cheap_cards`]
#[derive(Debug, Clone, Default)]
pub struct CheapQuery {
    pub rarity: String,
    pub language: Option<String>,
    /// Set name or numeric id; [`DEFAULT_EXPANSION`] when unset
    pub expansion: Option<String>,
    pub zero_only: bool,
}

/// Turn the user's expansion input into an id
pub fn resolve_expansion(expansion: Option<&str>) -> Result<u64> {
    let input = expansion
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(DEFAULT_EXPANSION);

    ExpansionFilter::parse(input).expansion_id().ok_or_else(|| {
        PricerError::Config(format!(
            "Unknown expansion name '{}'. Known names: {}",
            input,
            known_set_names().join(", ")
        ))
    })
}

/// Scan an expansion for cheap listings of the given rarity.
///
/// An unknown expansion name or a failed blueprint export is an error;
/// failed listing requests only skip that blueprint.
pub async fn find_cheap_cards(client: &CardTraderClient, query: &CheapQuery) -> Result<Vec<CheapFind>> {
    let expansion_id = resolve_expansion(query.expansion.as_deref())?;
    let language = query
        .language
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    let blueprints = client.fetch_blueprints(expansion_id).await?;
    let targets: Vec<_> = blueprints
        .iter()
        .filter(|bp| {
            bp.rarity()
                .is_some_and(|r| r.eq_ignore_ascii_case(query.rarity.trim()))
        })
        .collect();

    log::info!(
        "Checking {} '{}' blueprints in expansion {}{}{}",
        targets.len(),
        query.rarity,
        expansion_id,
        language.map(|l| format!(" in language '{}'", l)).unwrap_or_default(),
        if query.zero_only { " (Zero only)" } else { "" }
    );

    let mut finds = Vec::new();
    for blueprint in targets {
        let fetch = client.fetch_listings(blueprint.id).await;
        if fetch.is_failed() {
            continue;
        }

        let mut listings = fetch.into_listings();
        if query.zero_only {
            listings = restrict_to_zero(listings);
        }
        if let Some(language) = language {
            listings = restrict_to_language(listings, language);
        }

        if let Some(find) = judge(&blueprint.name, blueprint.id, &listings) {
            log::info!(
                "Cheap find: {} at {} cents ({:.1}% under floor)",
                find.name,
                find.gap.cheapest_cents,
                find.gap.discount_percent()
            );
            finds.push(find);
        }
    }

    Ok(finds)
}

fn judge(name: &str, blueprint_id: u64, listings: &[Listing]) -> Option<CheapFind> {
    let mut prices: Vec<i64> = listings.iter().filter_map(|l| l.price_cents).collect();
    prices.sort_unstable();

    let gap = evaluate_prices(&prices)?;
    if !gap.is_cheap() {
        return None;
    }

    let currency = listings
        .first()
        .and_then(|l| l.price_currency.clone())
        .unwrap_or_else(|| "???".to_string());

    Some(CheapFind {
        name: name.to_string(),
        blueprint_id,
        gap,
        currency,
        link: format!("{}/{}", CARD_URL, blueprint_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(price: i64, currency: Option<&str>) -> Listing {
        Listing {
            price_cents: Some(price),
            price_currency: currency.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn too_few_prices_are_not_judged() {
        assert_eq!(evaluate_prices(&[100, 200, 300]), None);
        assert!(evaluate_prices(&[100, 200, 300, 400]).is_some());
    }

    #[test]
    fn floor_uses_at_most_five_following_prices() {
        let gap = evaluate_prices(&[50, 100, 100, 100, 100, 100, 1000]).unwrap();
        assert_eq!(gap.pool_size, 5);
        assert_eq!(gap.floor_avg_cents, 100.0);
        assert!(gap.is_cheap());
        assert!((gap.discount_percent() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn threshold_is_inclusive() {
        let at_threshold = evaluate_prices(&[80, 100, 100, 100]).unwrap();
        assert!(at_threshold.is_cheap());

        let just_over = evaluate_prices(&[81, 100, 100, 100]).unwrap();
        assert!(!just_over.is_cheap());
    }

    #[test]
    fn judge_takes_currency_from_first_listing() {
        let listings = vec![
            priced(300, Some("USD")),
            priced(100, Some("EUR")),
            priced(300, Some("EUR")),
            priced(300, Some("EUR")),
        ];
        let find = judge("Jinx", 42, &listings).unwrap();
        assert_eq!(find.currency, "USD");
        assert_eq!(find.gap.cheapest_cents, 100);
        assert_eq!(find.link, "https://www.cardtrader.com/cards/42");
    }

    #[test]
    fn judge_falls_back_to_placeholder_currency() {
        let listings = vec![priced(10, None), priced(100, None), priced(100, None), priced(100, None)];
        let find = judge("Teemo", 7, &listings).unwrap();
        assert_eq!(find.currency, "???");
    }

    #[test]
    fn judge_ignores_listings_without_price() {
        let mut listings = vec![priced(10, Some("EUR")), priced(100, Some("EUR")), priced(100, Some("EUR"))];
        listings.push(Listing::default());
        assert_eq!(judge("Teemo", 7, &listings), None);
    }

    #[test]
    fn expansion_defaults_to_origins() {
        assert_eq!(resolve_expansion(None).unwrap(), 4166);
        assert_eq!(resolve_expansion(Some("  ")).unwrap(), 4166);
        assert_eq!(resolve_expansion(Some("proving_grounds")).unwrap(), 4275);
        assert_eq!(resolve_expansion(Some("9999")).unwrap(), 9999);
    }

    #[test]
    fn unknown_expansion_lists_known_names() {
        let err = resolve_expansion(Some("atlantis")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("atlantis"));
        assert!(message.contains("origins"));
        assert!(message.contains("unleashed"));
    }
}
