//! Blueprint (catalog entry) export per expansion

use riftbound_common::{Blueprint, MarketResult};

use super::CardTraderClient;

impl CardTraderClient {
    /// Fetch every blueprint of an expansion
    pub async fn fetch_blueprints(&self, expansion_id: u64) -> MarketResult<Vec<Blueprint>> {
        log::info!("Fetching blueprints for expansion ID {}...", expansion_id);

        let blueprints: Vec<Blueprint> = self
            .get_json(
                "/blueprints/export",
                &[("expansion_id", expansion_id.to_string())],
            )
            .await?;

        log::info!(
            "Fetched {} blueprints for expansion ID {}",
            blueprints.len(),
            expansion_id
        );
        Ok(blueprints)
    }
}
