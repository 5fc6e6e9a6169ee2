//! Local card catalog (CSV) loading and filtering

use crate::error::{PricerError, Result};
use crate::expansions::{expansion_id_for_prefix, expansion_id_for_set, ExpansionFilter};
use crate::inventory::Inventory;
use serde::Deserialize;
use std::path::Path;

/// One card of the catalog
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(from = "CatalogRow")]
pub struct CardRecord {
    pub name: String,
    pub rarity: String,
    /// Comma-separated, e.g. "Fury, Body"
    pub domain: String,
    pub set: String,
    /// Catalog card ID such as `ogn-042`
    pub id: Option<String>,
    /// Copies already owned, from a `Quantity` or `Owned` column
    pub owned_quantity: Option<u32>,
}

/// Raw catalog CSV row
///
/// Only the columns needed for pricing are read; any other columns
/// (Energy, Might, Text, ...) are ignored. Catalogs name the domain column
/// `Domain` or `Dominion` and the owned column `Quantity` or `Owned`; when
/// a file has both, the first non-empty value wins.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Rarity", default)]
    rarity: String,
    #[serde(rename = "Domain", default)]
    domain: String,
    #[serde(rename = "Dominion", default)]
    dominion: String,
    #[serde(rename = "Set", default)]
    set: String,
    #[serde(rename = "ID", default)]
    id: Option<String>,
    #[serde(rename = "Quantity", default, deserialize_with = "csv::invalid_option")]
    quantity: Option<u32>,
    #[serde(rename = "Owned", default, deserialize_with = "csv::invalid_option")]
    owned: Option<u32>,
}

impl From<CatalogRow> for CardRecord {
    fn from(row: CatalogRow) -> Self {
        let domain = if row.domain.trim().is_empty() {
            row.dominion
        } else {
            row.domain
        };
        Self {
            name: row.name,
            rarity: row.rarity,
            domain,
            set: row.set,
            id: row.id,
            owned_quantity: row.quantity.or(row.owned),
        }
    }
}

impl CardRecord {
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.domain
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Case-insensitive membership test against the domain list
    pub fn has_domain(&self, domain: &str) -> bool {
        let domain = domain.trim();
        self.domains().any(|d| d.eq_ignore_ascii_case(domain))
    }

    /// Collector number from the card ID (`ogn-042` -> `042`)
    pub fn collector_number(&self) -> Option<&str> {
        let id = self.id.as_deref()?.trim();
        let number = match id.split_once('-') {
            Some((_, number)) => number,
            None => id,
        };
        Some(number.trim()).filter(|n| !n.is_empty())
    }

    /// Set prefix from the card ID (`ogn-042` -> `ogn`)
    pub fn id_prefix(&self) -> Option<&str> {
        let (prefix, _) = self.id.as_deref()?.trim().split_once('-')?;
        Some(prefix).filter(|p| !p.is_empty())
    }

    /// CardTrader expansion id this card is priced against.
    ///
    /// Order: set name map, then an explicit id override, then the ID prefix.
    pub fn expansion_id(&self, expansion: Option<&ExpansionFilter>) -> Option<u64> {
        expansion_id_for_set(&self.set)
            .or_else(|| expansion.and_then(ExpansionFilter::override_id))
            .or_else(|| self.id_prefix().and_then(expansion_id_for_prefix))
    }
}

/// Load the card catalog from a CSV file
///
/// Rows without a name are skipped. A missing or malformed file is a
/// configuration error for the whole run.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<CardRecord>> {
    let path = path.as_ref();
    log::info!("Loading card catalog from: {}", path.display());

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| PricerError::csv(path, e))?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: CardRecord = result.map_err(|e| PricerError::csv(path, e))?;
        if !record.name.trim().is_empty() {
            records.push(record);
        }
    }

    log::info!("Loaded {} catalog cards", records.len());
    Ok(records)
}

/// Catalog selection criteria
#[derive(Debug, Clone)]
pub struct CatalogFilter<'a> {
    pub rarity: &'a str,
    pub domain: &'a str,
    pub expansion: Option<&'a ExpansionFilter>,
    /// Copies wanted of each matching card
    pub quantity: u32,
}

/// A catalog card selected for pricing with the number of copies still needed
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub card: &'a CardRecord,
    pub needed: u32,
}

/// Select catalog cards matching rarity, domain and expansion, in catalog order.
///
/// With an inventory, the owned count is subtracted from the requested
/// quantity and fully owned cards are dropped.
pub fn select_cards<'a>(
    records: &'a [CardRecord],
    filter: &CatalogFilter<'_>,
    inventory: Option<&Inventory>,
) -> Vec<Selection<'a>> {
    let rarity = filter.rarity.trim();

    records
        .iter()
        .filter(|card| card.rarity.trim().eq_ignore_ascii_case(rarity))
        .filter(|card| card.has_domain(filter.domain))
        .filter(|card| {
            filter
                .expansion
                .map_or(true, |expansion| expansion.matches_set(&card.set))
        })
        .filter_map(|card| {
            let needed = match inventory {
                Some(inventory) => inventory.needed(&card.name, filter.quantity),
                None => filter.quantity,
            };
            if inventory.is_some() && needed == 0 {
                log::debug!("Skipping {}: already owned", card.name);
                return None;
            }
            Some(Selection { card, needed })
        })
        .collect()
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
