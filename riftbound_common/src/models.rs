//! CardTrader marketplace wire types
//!
//! Fields the API may omit are modelled as `Option` (or defaulted flags) so
//! that missing data is an explicit branch for the callers instead of a
//! decode failure.

use serde::{Deserialize, Deserializer};

/// CardTrader catalog entry ("blueprint") for one card printing
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Blueprint {
    pub id: u64,
    pub name: String,
    /// Edition marker such as "Showcase" or "Alternate Art"; empty for the base printing
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fixed_properties: FixedProperties,
}

/// Printing properties fixed by the blueprint
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct FixedProperties {
    #[serde(default, deserialize_with = "string_or_number")]
    pub collector_number: Option<String>,
    #[serde(default)]
    pub riftbound_rarity: Option<String>,
}

impl Blueprint {
    /// Collector number, if the blueprint carries a non-empty one
    pub fn collector_number(&self) -> Option<&str> {
        self.fixed_properties
            .collector_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// True when the blueprint is an alternate printing (showcase, alt art, ...)
    pub fn has_version(&self) -> bool {
        self.version
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty())
    }

    /// Rarity as reported by CardTrader
    pub fn rarity(&self) -> Option<&str> {
        self.fixed_properties.riftbound_rarity.as_deref()
    }
}

/// Listing condition as reported in `properties_hash.condition`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Mint,
    NearMint,
    Other,
}

impl Condition {
    /// Exact string match against CardTrader's condition labels
    pub fn parse(s: &str) -> Self {
        match s {
            "Mint" => Condition::Mint,
            "Near Mint" => Condition::NearMint,
            _ => Condition::Other,
        }
    }

    pub fn is_mint_or_near_mint(&self) -> bool {
        matches!(self, Condition::Mint | Condition::NearMint)
    }
}

/// Seller attached to a listing
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Seller {
    /// Seller ships through the CardTrader Zero hub
    #[serde(default)]
    pub can_sell_via_hub: Option<bool>,
}

/// Variable properties of a listed item
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct ListingProperties {
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub riftbound_language: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub riftbound_foil: bool,
    #[serde(default, deserialize_with = "flag")]
    pub foil: bool,
}

/// One seller's offer for a blueprint
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Listing {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub blueprint_id: Option<u64>,
    /// Unit price in minor currency units
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub price_currency: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "flag")]
    pub graded: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties_hash: ListingProperties,
    #[serde(default)]
    pub user: Option<Seller>,
}

fn default_quantity() -> u32 {
    1
}

impl Default for Listing {
    fn default() -> Self {
        Self {
            id: None,
            blueprint_id: None,
            price_cents: None,
            price_currency: None,
            quantity: default_quantity(),
            graded: false,
            properties_hash: ListingProperties::default(),
            user: None,
        }
    }
}

impl Listing {
    pub fn condition(&self) -> Option<Condition> {
        self.properties_hash.condition.as_deref().map(Condition::parse)
    }

    pub fn language(&self) -> Option<&str> {
        self.properties_hash.riftbound_language.as_deref()
    }

    /// Foil by either of the two flags CardTrader uses
    pub fn is_foil(&self) -> bool {
        self.properties_hash.riftbound_foil || self.properties_hash.foil
    }

    /// Only an explicit `true` counts
    pub fn seller_can_sell_via_hub(&self) -> bool {
        self.user
            .as_ref()
            .and_then(|u| u.can_sell_via_hub)
            .unwrap_or(false)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts strings and numbers (collector numbers come as either)
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Truthiness of a loosely typed flag: booleans, non-zero numbers and
/// non-empty strings other than "false"/"0" are set
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(serde_json::Value::String(s)) => {
            let s = s.trim();
            !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
        }
        Some(other) => {
            log::debug!("Unexpected flag value {}, treating as unset", other);
            false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blueprint_deserializes_with_fixed_properties() {
        let json = r#"{
            "id": 291234,
            "name": "Jinx, Loose Cannon",
            "version": "",
            "expansion_id": 4166,
            "fixed_properties": {
                "collector_number": "202",
                "riftbound_rarity": "Epic"
            }
        }"#;

        let bp: Blueprint = serde_json::from_str(json).unwrap();
        assert_eq!(bp.id, 291234);
        assert_eq!(bp.collector_number(), Some("202"));
        assert_eq!(bp.rarity(), Some("Epic"));
        assert!(!bp.has_version());
    }

    #[test]
    fn blueprint_tolerates_missing_and_null_fields() {
        let bp: Blueprint =
            serde_json::from_str(r#"{"id": 1, "name": "Poro", "fixed_properties": null}"#).unwrap();
        assert_eq!(bp.collector_number(), None);
        assert_eq!(bp.version, None);
        assert!(!bp.has_version());

        let bp: Blueprint = serde_json::from_str(
            r#"{"id": 2, "name": "Poro", "version": "Showcase", "fixed_properties": {"collector_number": 17}}"#,
        )
        .unwrap();
        assert_eq!(bp.collector_number(), Some("17"));
        assert!(bp.has_version());
    }

    #[test]
    fn listing_deserializes_full_record() {
        let json = r#"{
            "id": 9001,
            "blueprint_id": 291234,
            "price_cents": 1250,
            "price_currency": "EUR",
            "quantity": 3,
            "graded": false,
            "properties_hash": {
                "condition": "Near Mint",
                "riftbound_language": "en",
                "riftbound_foil": false
            },
            "user": {"username": "shop", "can_sell_via_hub": true}
        }"#;

        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.price_cents, Some(1250));
        assert_eq!(listing.quantity, 3);
        assert_eq!(listing.condition(), Some(Condition::NearMint));
        assert_eq!(listing.language(), Some("en"));
        assert!(!listing.is_foil());
        assert!(listing.seller_can_sell_via_hub());
    }

    #[test]
    fn listing_defaults_when_fields_missing() {
        let listing: Listing = serde_json::from_str("{}").unwrap();
        assert_eq!(listing.quantity, 1);
        assert_eq!(listing.price_cents, None);
        assert!(!listing.graded);
        assert_eq!(listing.condition(), None);
        assert!(!listing.seller_can_sell_via_hub());
    }

    #[test]
    fn foil_reads_either_flag() {
        let listing: Listing =
            serde_json::from_str(r#"{"properties_hash": {"foil": "true"}}"#).unwrap();
        assert!(listing.is_foil());

        let listing: Listing =
            serde_json::from_str(r#"{"properties_hash": {"riftbound_foil": 1}}"#).unwrap();
        assert!(listing.is_foil());

        let listing: Listing =
            serde_json::from_str(r#"{"properties_hash": {"riftbound_foil": "0", "foil": null}}"#)
                .unwrap();
        assert!(!listing.is_foil());
    }

    #[test]
    fn condition_matches_labels_exactly() {
        assert_eq!(Condition::parse("Mint"), Condition::Mint);
        assert_eq!(Condition::parse("Near Mint"), Condition::NearMint);
        assert_eq!(Condition::parse("near mint"), Condition::Other);
        assert_eq!(Condition::parse("Good"), Condition::Other);
        assert!(!Condition::Other.is_mint_or_near_mint());
    }
}
