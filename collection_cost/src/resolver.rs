//! Resolve local catalog cards to CardTrader blueprints

use crate::cardtrader::CardTraderClient;
use riftbound_common::{normalize_name, Blueprint};
use std::collections::HashMap;

/// Blueprints per expansion id, fetched at most once per pricing run
#[derive(Debug, Default)]
pub struct BlueprintCache {
    /// `None` marks an expansion whose export failed
    by_expansion: HashMap<u64, Option<Vec<Blueprint>>>,
}

impl BlueprintCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blueprints of an expansion, fetching them on first use.
    ///
    /// Returns `None` when the export failed. The failure is remembered so
    /// the run does not hit the API again for every card of that expansion.
    pub async fn get_or_fetch(
        &mut self,
        client: &CardTraderClient,
        expansion_id: u64,
    ) -> Option<&[Blueprint]> {
        if !self.by_expansion.contains_key(&expansion_id) {
            let blueprints = match client.fetch_blueprints(expansion_id).await {
                Ok(blueprints) => Some(blueprints),
                Err(e) => {
                    log::warn!(
                        "Failed to fetch blueprints for expansion {}: {}",
                        expansion_id,
                        e
                    );
                    None
                }
            };
            self.by_expansion.insert(expansion_id, blueprints);
        }

        self.by_expansion
            .get(&expansion_id)
            .and_then(|blueprints| blueprints.as_deref())
    }
}

/// Pick the blueprint for a card among an expansion's blueprints.
///
/// Among blueprints whose normalized name matches:
/// 1. an exact collector number match (case-insensitive) wins outright;
/// 2. otherwise the first base printing (no version marker);
/// 3. otherwise the last match, an alternate printing.
pub fn resolve_blueprint<'a>(
    name: &str,
    collector_number: Option<&str>,
    blueprints: &'a [Blueprint],
) -> Option<&'a Blueprint> {
    let target = normalize_name(name);
    if target.is_empty() {
        return None;
    }
    let wanted_number = collector_number.map(str::trim).filter(|n| !n.is_empty());

    let mut base_printing = None;
    let mut last_match = None;

    for blueprint in blueprints
        .iter()
        .filter(|bp| normalize_name(&bp.name) == target)
    {
        if let (Some(wanted), Some(number)) = (wanted_number, blueprint.collector_number()) {
            if wanted.eq_ignore_ascii_case(number) {
                return Some(blueprint);
            }
        }
        if base_printing.is_none() && !blueprint.has_version() {
            base_printing = Some(blueprint);
        }
        last_match = Some(blueprint);
    }

    base_printing.or(last_match)
}
