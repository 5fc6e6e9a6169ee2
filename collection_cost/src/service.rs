//! Cached pricing queries
//!
//! Pricing a category takes one request per card, so results are stored in
//! the `price_history` table and served from there until a refresh is
//! forced. Inventory-adjusted results depend on owned counts the filter
//! tuple does not describe; they bypass the cache in both directions.
//! Results touched by a failed request are returned but never stored.

use crate::cardtrader::CardTraderClient;
use crate::catalog::CardRecord;
use crate::database::{self, CacheRow, CategoryFilter};
use crate::error::Result;
use crate::inventory::Inventory;
use crate::pricing::{price_collection, CardStatus, PriceQuery, PricingResult};
use crate::resolver::BlueprintCache;
use rusqlite::Connection;
use serde::Serialize;

/// Where a report's numbers came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    /// Newest stored row for the filter tuple
    Cache,
    /// Computed now and stored
    Fresh,
    /// Computed now, not stored (inventory active, nothing matched or a
    /// request failed)
    Uncached,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    pub query: PriceQuery,
    pub source: ReportSource,
    pub result: PricingResult,
    /// Timestamp of the stored row, when there is one
    pub computed_at: Option<String>,
}

impl PriceReport {
    fn from_cache(query: &PriceQuery, row: CacheRow) -> Self {
        Self {
            query: query.clone(),
            source: ReportSource::Cache,
            result: row.to_result(),
            computed_at: Some(row.computed_at),
        }
    }
}

pub struct PriceService {
    client: CardTraderClient,
    catalog: Vec<CardRecord>,
    inventory: Option<Inventory>,
    conn: Connection,
}

impl PriceService {
    /// Wrap an open database, creating the cache table if needed
    pub fn new(
        client: CardTraderClient,
        catalog: Vec<CardRecord>,
        inventory: Option<Inventory>,
        conn: Connection,
    ) -> Result<Self> {
        database::init_schema(&conn)?;
        Ok(Self {
            client,
            catalog,
            inventory,
            conn,
        })
    }

    /// Answer a pricing query, from the cache when allowed
    pub async fn query(&self, query: &PriceQuery, force_refresh: bool) -> Result<PriceReport> {
        if self.inventory.is_none() && !force_refresh {
            if let Some(row) = database::latest_for(&self.conn, query)? {
                log::info!(
                    "Serving {} {} x{} from cache ({})",
                    query.rarity,
                    query.domain,
                    query.quantity,
                    row.computed_at
                );
                return Ok(PriceReport::from_cache(query, row));
            }
        }

        let mut blueprints = BlueprintCache::new();
        let result = price_collection(
            &self.client,
            &self.catalog,
            query,
            self.inventory.as_ref(),
            &mut blueprints,
        )
        .await;

        let failed = result.count_by_status(CardStatus::FetchFailed);
        if failed > 0 {
            log::warn!(
                "Not caching {} {} x{}: {} cards hit failed requests",
                query.rarity,
                query.domain,
                query.quantity,
                failed
            );
        }

        if self.inventory.is_some() || result.cards_matched == 0 || failed > 0 {
            return Ok(PriceReport {
                query: query.clone(),
                source: ReportSource::Uncached,
                result,
                computed_at: None,
            });
        }

        let computed_at = database::now_timestamp();
        database::insert_result_at(&self.conn, query, &result, &computed_at)?;
        Ok(PriceReport {
            query: query.clone(),
            source: ReportSource::Fresh,
            result,
            computed_at: Some(computed_at),
        })
    }

    /// Newest stored result per rarity and domain
    pub fn latest(&self, filter: &CategoryFilter) -> Result<Vec<CacheRow>> {
        Ok(database::latest_per_category(&self.conn, filter)?)
    }
}
