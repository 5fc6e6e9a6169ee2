//! Owned-card inventory used to price only the missing copies

use crate::catalog::CardRecord;
use crate::error::{PricerError, Result};
use riftbound_common::normalize_name;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Row of a collection CSV (`Name,Rarity,Dominion,Set,Quantity`)
#[derive(Debug, Deserialize)]
struct CollectionRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Quantity", alias = "Owned", default)]
    quantity: String,
}

/// Owned quantities keyed by normalized card name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    owned: HashMap<String, u32>,
}

impl Inventory {
    /// Load a collection CSV. Rows sharing a normalized name are summed;
    /// blank or unparsable quantities count as zero.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading inventory from: {}", path.display());

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| PricerError::csv(path, e))?;

        let mut inventory = Self::default();
        for result in rdr.deserialize() {
            let row: CollectionRow = result.map_err(|e| PricerError::csv(path, e))?;
            let quantity = row.quantity.trim().parse::<u32>().unwrap_or(0);
            inventory.add(&row.name, quantity);
        }

        log::info!("Inventory holds {} distinct cards", inventory.len());
        Ok(inventory)
    }

    /// Build an inventory from catalog rows that carry an owned quantity
    pub fn from_records(records: &[CardRecord]) -> Self {
        let mut inventory = Self::default();
        for record in records {
            if let Some(quantity) = record.owned_quantity {
                inventory.add(&record.name, quantity);
            }
        }
        inventory
    }

    pub fn add(&mut self, name: &str, quantity: u32) {
        let key = normalize_name(name);
        if key.is_empty() {
            return;
        }
        *self.owned.entry(key).or_insert(0) += quantity;
    }

    /// Owned copies of a card, zero when not in the inventory
    pub fn owned(&self, name: &str) -> u32 {
        self.owned.get(&normalize_name(name)).copied().unwrap_or(0)
    }

    /// Copies still missing to reach `requested`
    pub fn needed(&self, name: &str, requested: u32) -> u32 {
        requested.saturating_sub(self.owned(name))
    }

    pub fn len(&self) -> usize {
        self.owned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }
}
