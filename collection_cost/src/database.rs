//! Pricing result cache in SQLite
//!
//! Uses parameterized queries exclusively (no SQL string concatenation).
//! The table is append-only: every computation inserts a new row and the
//! newest row for a filter tuple is the current answer.

use crate::pricing::{PriceQuery, PricingResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

/// Result type for database operations
pub type DbResult<T> = rusqlite::Result<T>;

/// Initialize the database schema
///
/// Creates `price_history` and its filter-tuple index if they don't exist.
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS price_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            rarity TEXT NOT NULL,
            domain TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            zero_only BOOLEAN NOT NULL,
            language TEXT,
            expansion TEXT,
            foil BOOLEAN NOT NULL DEFAULT 0,
            total_cost REAL NOT NULL,
            items_found INTEGER NOT NULL,
            total_cards INTEGER NOT NULL,
            cards_priced INTEGER NOT NULL DEFAULT 0,
            items_needed INTEGER NOT NULL DEFAULT 0,
            currency TEXT NOT NULL,
            computed_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_price_history_filter
            ON price_history(rarity, domain, quantity, zero_only, foil, computed_at);
        ",
    )?;

    log::info!("Database schema initialized");
    Ok(())
}

/// One persisted pricing result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheRow {
    pub id: i64,
    pub rarity: String,
    pub domain: String,
    pub quantity: u32,
    pub zero_only: bool,
    pub language: Option<String>,
    pub expansion: Option<String>,
    pub foil: bool,
    /// Major currency units
    pub total_cost: f64,
    pub items_found: u32,
    pub total_cards: usize,
    pub cards_priced: usize,
    pub items_needed: u32,
    pub currency: String,
    pub computed_at: String,
}

impl CacheRow {
    fn from_row(row: &Row<'_>) -> DbResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            rarity: row.get("rarity")?,
            domain: row.get("domain")?,
            quantity: row.get("quantity")?,
            zero_only: row.get("zero_only")?,
            language: row.get("language")?,
            expansion: row.get("expansion")?,
            foil: row.get("foil")?,
            total_cost: row.get("total_cost")?,
            items_found: row.get("items_found")?,
            total_cards: row.get("total_cards")?,
            cards_priced: row.get("cards_priced")?,
            items_needed: row.get("items_needed")?,
            currency: row.get("currency")?,
            computed_at: row.get("computed_at")?,
        })
    }

    /// The filter tuple this row answers
    pub fn query(&self) -> PriceQuery {
        PriceQuery {
            rarity: self.rarity.clone(),
            domain: self.domain.clone(),
            quantity: self.quantity,
            zero_only: self.zero_only,
            language: self.language.clone(),
            expansion: self.expansion.clone(),
            foil: self.foil,
        }
    }

    /// Totals as a pricing result (per-card detail is not persisted)
    pub fn to_result(&self) -> PricingResult {
        PricingResult {
            cards_matched: self.total_cards,
            cards_priced: self.cards_priced,
            items_fulfilled: self.items_found,
            items_needed: self.items_needed,
            total_cost_cents: (self.total_cost * 100.0).round() as i64,
            currency: self.currency.clone(),
            cards: Vec::new(),
        }
    }
}

const SELECT_COLUMNS: &str = "SELECT id, rarity, domain, quantity, zero_only, language, expansion, foil,
        total_cost, items_found, total_cards, cards_priced, items_needed, currency, computed_at
 FROM price_history";

/// Current UTC time as fixed-width text so rows order lexicographically
pub fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.6fZ")
        .to_string()
}

/// Append a pricing result stamped with the current time; returns the new row id
pub fn insert_result(conn: &Connection, query: &PriceQuery, result: &PricingResult) -> DbResult<i64> {
    insert_result_at(conn, query, result, &now_timestamp())
}

/// Append a pricing result with an explicit timestamp
pub fn insert_result_at(
    conn: &Connection,
    query: &PriceQuery,
    result: &PricingResult,
    computed_at: &str,
) -> DbResult<i64> {
    conn.execute(
        "INSERT INTO price_history
         (rarity, domain, quantity, zero_only, language, expansion, foil,
          total_cost, items_found, total_cards, cards_priced, items_needed, currency, computed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            &query.rarity,
            &query.domain,
            query.quantity,
            query.zero_only,
            &query.language,
            &query.expansion,
            query.foil,
            result.total_cost(),
            result.items_fulfilled,
            result.cards_matched,
            result.cards_priced,
            result.items_needed,
            &result.currency,
            computed_at,
        ],
    )?;

    let id = conn.last_insert_rowid();
    log::debug!(
        "Cached {} {} x{} as row {}: {:.2} {}",
        query.rarity,
        query.domain,
        query.quantity,
        id,
        result.total_cost(),
        result.currency
    );
    Ok(id)
}

/// Newest row for an exact filter tuple.
///
/// `IS` comparisons make an unset language or expansion match only rows
/// where it is unset too.
pub fn latest_for(conn: &Connection, query: &PriceQuery) -> DbResult<Option<CacheRow>> {
    let sql = format!(
        "{SELECT_COLUMNS}
         WHERE rarity = ?1 AND domain = ?2 AND quantity = ?3 AND zero_only = ?4 AND foil = ?5
           AND language IS ?6 AND expansion IS ?7
         ORDER BY computed_at DESC, id DESC
         LIMIT 1"
    );
    conn.query_row(
        &sql,
        params![
            &query.rarity,
            &query.domain,
            query.quantity,
            query.zero_only,
            query.foil,
            &query.language,
            &query.expansion,
        ],
        CacheRow::from_row,
    )
    .optional()
}

/// Filter fields shared by every category on a dashboard view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    pub quantity: u32,
    pub zero_only: bool,
    pub language: Option<String>,
    pub expansion: Option<String>,
    pub foil: bool,
}

/// Newest row per (rarity, domain) for the remaining filter fields,
/// ordered by rarity then domain
pub fn latest_per_category(conn: &Connection, filter: &CategoryFilter) -> DbResult<Vec<CacheRow>> {
    let sql = format!(
        "{SELECT_COLUMNS}
         WHERE id IN (
             SELECT (
                 SELECT p2.id FROM price_history p2
                 WHERE p2.rarity = p1.rarity AND p2.domain = p1.domain
                   AND p2.quantity = ?1 AND p2.zero_only = ?2 AND p2.foil = ?3
                   AND p2.language IS ?4 AND p2.expansion IS ?5
                 ORDER BY p2.computed_at DESC, p2.id DESC
                 LIMIT 1
             )
             FROM price_history p1
             WHERE p1.quantity = ?1 AND p1.zero_only = ?2 AND p1.foil = ?3
               AND p1.language IS ?4 AND p1.expansion IS ?5
             GROUP BY p1.rarity, p1.domain
         )
         ORDER BY rarity, domain"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows: DbResult<Vec<CacheRow>> = stmt
        .query_map(
            params![
                filter.quantity,
                filter.zero_only,
                filter.foil,
                &filter.language,
                &filter.expansion,
            ],
            CacheRow::from_row,
        )?
        .collect();
    rows
}

/// Get total count of cached results
pub fn row_count(conn: &Connection) -> DbResult<i64> {
    conn.query_row("SELECT COUNT(*) FROM price_history", [], |row| row.get(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create an in-memory database for testing
    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn result(total_cents: i64, items: u32, cards: usize, currency: &str) -> PricingResult {
        PricingResult {
            cards_matched: cards,
            cards_priced: cards,
            items_fulfilled: items,
            items_needed: items,
            total_cost_cents: total_cents,
            currency: currency.to_string(),
            cards: Vec::new(),
        }
    }

    #[test]
    fn init_schema_is_idempotent() {
        let conn = test_db();
        init_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='price_history'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn round_trip_preserves_totals() {
        let conn = test_db();
        let query = PriceQuery::new("Epic", "Fury", 3).language(Some("en".to_string()));
        let priced = result(4321, 7, 4, "EUR");

        insert_result(&conn, &query, &priced).unwrap();
        let row = latest_for(&conn, &query).unwrap().unwrap();

        assert_eq!(row.total_cost, priced.total_cost());
        assert_eq!(row.items_found, 7);
        assert_eq!(row.currency, "EUR");
        assert_eq!(row.total_cards, 4);
        assert_eq!(row.query(), query);
        assert_eq!(row.to_result().total_cost_cents, 4321);
    }

    #[test]
    fn newest_row_wins() {
        let conn = test_db();
        let query = PriceQuery::new("Rare", "Calm", 1);

        insert_result_at(&conn, &query, &result(100, 1, 1, "EUR"), "2026-01-01T00:00:00.000000Z")
            .unwrap();
        insert_result_at(&conn, &query, &result(300, 1, 1, "EUR"), "2026-03-01T00:00:00.000000Z")
            .unwrap();
        insert_result_at(&conn, &query, &result(200, 1, 1, "EUR"), "2026-02-01T00:00:00.000000Z")
            .unwrap();

        let row = latest_for(&conn, &query).unwrap().unwrap();
        assert_eq!(row.to_result().total_cost_cents, 300);
        assert_eq!(row_count(&conn).unwrap(), 3);
    }

    #[test]
    fn same_timestamp_falls_back_to_insertion_order() {
        let conn = test_db();
        let query = PriceQuery::new("Rare", "Calm", 1);
        let ts = "2026-01-01T00:00:00.000000Z";

        insert_result_at(&conn, &query, &result(100, 1, 1, "EUR"), ts).unwrap();
        insert_result_at(&conn, &query, &result(150, 1, 1, "EUR"), ts).unwrap();

        let row = latest_for(&conn, &query).unwrap().unwrap();
        assert_eq!(row.to_result().total_cost_cents, 150);
    }

    #[test]
    fn unset_language_matches_only_unset_rows() {
        let conn = test_db();
        let any_language = PriceQuery::new("Epic", "Mind", 1);
        let english = any_language.clone().language(Some("en".to_string()));

        insert_result(&conn, &english, &result(500, 1, 1, "EUR")).unwrap();
        assert!(latest_for(&conn, &any_language).unwrap().is_none());

        insert_result(&conn, &any_language, &result(400, 1, 1, "EUR")).unwrap();
        let row = latest_for(&conn, &any_language).unwrap().unwrap();
        assert_eq!(row.language, None);
        assert_eq!(row.to_result().total_cost_cents, 400);

        let row = latest_for(&conn, &english).unwrap().unwrap();
        assert_eq!(row.language.as_deref(), Some("en"));
        assert_eq!(row.to_result().total_cost_cents, 500);
    }

    #[test]
    fn every_tuple_field_participates() {
        let conn = test_db();
        let base = PriceQuery::new("Epic", "Body", 2);
        insert_result(&conn, &base, &result(100, 2, 1, "EUR")).unwrap();

        assert!(latest_for(&conn, &base.clone().foil(true)).unwrap().is_none());
        assert!(latest_for(&conn, &base.clone().zero_only(true)).unwrap().is_none());
        assert!(latest_for(&conn, &base.clone().expansion(Some("SFD".to_string())))
            .unwrap()
            .is_none());
        assert!(latest_for(&conn, &PriceQuery::new("Epic", "Body", 3)).unwrap().is_none());
        assert!(latest_for(&conn, &base).unwrap().is_some());
    }

    #[test]
    fn latest_per_category_picks_newest_per_pair() {
        let conn = test_db();
        let fury = PriceQuery::new("Epic", "Fury", 1);
        let calm = PriceQuery::new("Common", "Calm", 1);
        let other_quantity = PriceQuery::new("Epic", "Fury", 4);

        insert_result_at(&conn, &fury, &result(100, 1, 1, "EUR"), "2026-01-01T00:00:00.000000Z")
            .unwrap();
        insert_result_at(&conn, &fury, &result(110, 1, 1, "EUR"), "2026-01-02T00:00:00.000000Z")
            .unwrap();
        insert_result_at(&conn, &calm, &result(20, 1, 1, "EUR"), "2026-01-01T00:00:00.000000Z")
            .unwrap();
        insert_result_at(
            &conn,
            &other_quantity,
            &result(999, 4, 1, "EUR"),
            "2026-01-03T00:00:00.000000Z",
        )
        .unwrap();

        let filter = CategoryFilter {
            quantity: 1,
            zero_only: false,
            language: None,
            expansion: None,
            foil: false,
        };
        let rows = latest_per_category(&conn, &filter).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rarity, "Common");
        assert_eq!(rows[1].rarity, "Epic");
        assert_eq!(rows[1].to_result().total_cost_cents, 110);
    }

    #[test]
    fn timestamps_are_fixed_width() {
        let ts = now_timestamp();
        assert_eq!(ts.len(), "2026-01-01T00:00:00.000000Z".len());
        assert!(ts.ends_with('Z'));
    }
}
