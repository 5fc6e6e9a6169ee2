//! Collection pricing run: catalog selection through aggregation
//!
//! Cards are processed one at a time in catalog order. Every per-card
//! problem (unknown expansion, no blueprint, failed request, nothing for
//! sale) is recorded as that card's outcome and the run continues.

use crate::accumulator::accumulate;
use crate::cardtrader::CardTraderClient;
use crate::catalog::{select_cards, CardRecord, CatalogFilter, Selection};
use crate::expansions::ExpansionFilter;
use crate::inventory::Inventory;
use crate::listings::{filter_and_sort, ListingFilter};
use crate::resolver::{resolve_blueprint, BlueprintCache};
use serde::{Deserialize, Serialize};

/// Currency reported when nothing could be priced
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Filter tuple identifying one pricing question (and its cache rows)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuery {
    pub rarity: String,
    pub domain: String,
    /// Copies wanted of each matching card
    pub quantity: u32,
    /// Only sellers shipping through CardTrader Zero
    pub zero_only: bool,
    pub language: Option<String>,
    pub expansion: Option<String>,
    pub foil: bool,
}

impl PriceQuery {
    pub fn new(rarity: impl Into<String>, domain: impl Into<String>, quantity: u32) -> Self {
        Self {
            rarity: rarity.into(),
            domain: domain.into(),
            quantity,
            zero_only: false,
            language: None,
            expansion: None,
            foil: false,
        }
    }

    pub fn zero_only(mut self, zero_only: bool) -> Self {
        self.zero_only = zero_only;
        self
    }

    /// Blank input counts as "no language filter"
    pub fn language(mut self, language: Option<String>) -> Self {
        self.language = non_blank(language);
        self
    }

    /// Blank input counts as "all expansions"
    pub fn expansion(mut self, expansion: Option<String>) -> Self {
        self.expansion = non_blank(expansion);
        self
    }

    pub fn foil(mut self, foil: bool) -> Self {
        self.foil = foil;
        self
    }

    pub fn expansion_filter(&self) -> Option<ExpansionFilter> {
        self.expansion.as_deref().map(ExpansionFilter::parse)
    }

    pub fn listing_filter(&self) -> ListingFilter<'_> {
        ListingFilter {
            zero_only: self.zero_only,
            language: self.language.as_deref(),
            foil_only: self.foil,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// How pricing went for a single card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    /// At least one copy was bought
    Priced,
    /// No CardTrader expansion id for the card's set
    UnknownExpansion,
    /// No blueprint with a matching name
    Unresolved,
    /// Nothing buyable survived the filters
    NoListings,
    /// Blueprint export or listing request failed
    FetchFailed,
}

/// Per-card line of a pricing result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardOutcome {
    pub name: String,
    pub expansion_id: Option<u64>,
    pub blueprint_id: Option<u64>,
    pub needed: u32,
    pub fulfilled: u32,
    pub cost_cents: i64,
    pub currency: Option<String>,
    pub status: CardStatus,
}

impl CardOutcome {
    fn skipped(selection: &Selection<'_>, expansion_id: Option<u64>, status: CardStatus) -> Self {
        Self {
            name: selection.card.name.clone(),
            expansion_id,
            blueprint_id: None,
            needed: selection.needed,
            fulfilled: 0,
            cost_cents: 0,
            currency: None,
            status,
        }
    }
}

/// Totals of a pricing run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingResult {
    /// Catalog cards selected by the filters
    pub cards_matched: usize,
    /// Cards with at least one copy bought
    pub cards_priced: usize,
    pub items_fulfilled: u32,
    pub items_needed: u32,
    pub total_cost_cents: i64,
    /// Currency of the last listing bought from; no conversion is done
    pub currency: String,
    pub cards: Vec<CardOutcome>,
}

impl Default for PricingResult {
    fn default() -> Self {
        Self {
            cards_matched: 0,
            cards_priced: 0,
            items_fulfilled: 0,
            items_needed: 0,
            total_cost_cents: 0,
            currency: DEFAULT_CURRENCY.to_string(),
            cards: Vec::new(),
        }
    }
}

impl PricingResult {
    /// Total in major currency units
    pub fn total_cost(&self) -> f64 {
        self.total_cost_cents as f64 / 100.0
    }

    /// Fold one card into the totals
    pub fn record(&mut self, outcome: CardOutcome) {
        self.items_needed += outcome.needed;
        if outcome.fulfilled > 0 {
            self.cards_priced += 1;
            self.items_fulfilled += outcome.fulfilled;
            self.total_cost_cents += outcome.cost_cents;
            if let Some(currency) = &outcome.currency {
                self.currency = currency.clone();
            }
        }
        self.cards.push(outcome);
    }

    pub fn count_by_status(&self, status: CardStatus) -> usize {
        self.cards.iter().filter(|c| c.status == status).count()
    }
}

/// Price every catalog card matching `query`.
///
/// Blueprints are looked up through `blueprints` so an expansion is fetched
/// only once; listings are always fetched fresh.
pub async fn price_collection(
    client: &CardTraderClient,
    records: &[CardRecord],
    query: &PriceQuery,
    inventory: Option<&Inventory>,
    blueprints: &mut BlueprintCache,
) -> PricingResult {
    let expansion = query.expansion_filter();
    let filter = CatalogFilter {
        rarity: &query.rarity,
        domain: &query.domain,
        expansion: expansion.as_ref(),
        quantity: query.quantity,
    };
    let selections = select_cards(records, &filter, inventory);

    log::info!(
        "Pricing {} {} cards (x{}): {} catalog matches",
        query.rarity,
        query.domain,
        query.quantity,
        selections.len()
    );

    let mut result = PricingResult {
        cards_matched: selections.len(),
        ..Default::default()
    };

    for selection in &selections {
        let outcome = price_card(client, selection, query, expansion.as_ref(), blueprints).await;
        log::debug!(
            "{}: {:?}, {}/{} for {} cents",
            outcome.name,
            outcome.status,
            outcome.fulfilled,
            outcome.needed,
            outcome.cost_cents
        );
        result.record(outcome);
    }

    log::info!(
        "Priced {}/{} cards, {}/{} items, total {:.2} {}",
        result.cards_priced,
        result.cards_matched,
        result.items_fulfilled,
        result.items_needed,
        result.total_cost(),
        result.currency
    );
    let failed = result.count_by_status(CardStatus::FetchFailed);
    if failed > 0 {
        log::warn!("{} cards could not be priced because requests failed", failed);
    }

    result
}

async fn price_card(
    client: &CardTraderClient,
    selection: &Selection<'_>,
    query: &PriceQuery,
    expansion: Option<&ExpansionFilter>,
    blueprints: &mut BlueprintCache,
) -> CardOutcome {
    let card = selection.card;

    let Some(expansion_id) = card.expansion_id(expansion) else {
        log::debug!("No expansion id for {} (set '{}')", card.name, card.set);
        return CardOutcome::skipped(selection, None, CardStatus::UnknownExpansion);
    };

    let Some(expansion_blueprints) = blueprints.get_or_fetch(client, expansion_id).await else {
        return CardOutcome::skipped(selection, Some(expansion_id), CardStatus::FetchFailed);
    };
    let Some(blueprint) =
        resolve_blueprint(&card.name, card.collector_number(), expansion_blueprints)
    else {
        log::info!("Missing blueprint: {} (expansion {})", card.name, expansion_id);
        return CardOutcome::skipped(selection, Some(expansion_id), CardStatus::Unresolved);
    };
    let blueprint_id = blueprint.id;

    let fetch = client.fetch_listings(blueprint_id).await;
    let fetch_failed = fetch.is_failed();
    let listings = filter_and_sort(fetch.into_listings(), &query.listing_filter());
    let fulfillment = accumulate(selection.needed, &listings);

    let status = if fulfillment.items > 0 {
        CardStatus::Priced
    } else if fetch_failed {
        CardStatus::FetchFailed
    } else {
        CardStatus::NoListings
    };

    CardOutcome {
        name: card.name.clone(),
        expansion_id: Some(expansion_id),
        blueprint_id: Some(blueprint_id),
        needed: selection.needed,
        fulfilled: fulfillment.items,
        cost_cents: fulfillment.cost_cents,
        currency: fulfillment.currency,
        status,
    }
}
