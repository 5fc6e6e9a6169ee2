//! Riftbound expansion ids on CardTrader
//!
//! The catalog CSV names sets the way the community does ("Origins", "SFD"),
//! while CardTrader addresses them by numeric expansion id.

use std::fmt;

/// Set names as they appear in the catalog's `Set` column (lowercase)
const SET_NAMES: &[(&str, u64)] = &[
    ("origins", 4166),
    ("promos", 4167),
    ("proving grounds", 4275),
    ("arcane", 4289),
    ("sfd", 4299),
    ("spiritforged", 4299),
    ("unleashed", 4425),
];

/// Prefixes of catalog card IDs such as `ogn-042`
const ID_PREFIXES: &[(&str, u64)] = &[
    ("ogn", 4166),
    ("ogs", 4275),
    ("arc", 4289),
    ("sfd", 4299),
    ("unl", 4425),
];

/// Look up the CardTrader expansion id for a set name (case-insensitive).
///
/// Underscores are accepted in place of spaces (`proving_grounds`).
pub fn expansion_id_for_set(set_name: &str) -> Option<u64> {
    let key = set_name.trim().to_lowercase().replace('_', " ");
    SET_NAMES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, id)| *id)
}

/// Look up the CardTrader expansion id for a card ID prefix (case-insensitive)
pub fn expansion_id_for_prefix(prefix: &str) -> Option<u64> {
    let key = prefix.trim().to_lowercase();
    ID_PREFIXES
        .iter()
        .find(|(p, _)| *p == key)
        .map(|(_, id)| *id)
}

/// All set names the lookup understands
pub fn known_set_names() -> Vec<&'static str> {
    SET_NAMES.iter().map(|(name, _)| *name).collect()
}

/// Expansion restriction as given by the user: a set name or a raw expansion id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionFilter {
    Name(String),
    Id(u64),
}

impl ExpansionFilter {
    /// All-digit input is an expansion id, anything else a set name
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(id) = s.parse() {
                return ExpansionFilter::Id(id);
            }
        }
        ExpansionFilter::Name(s.to_string())
    }

    /// Does a catalog row with this `Set` value pass the filter?
    ///
    /// An id filter also admits sets missing from the name map; those cards
    /// are then priced against the given id.
    pub fn matches_set(&self, set_name: &str) -> bool {
        match self {
            ExpansionFilter::Name(name) => set_name.trim().eq_ignore_ascii_case(name),
            ExpansionFilter::Id(id) => match expansion_id_for_set(set_name) {
                Some(known) => known == *id,
                None => true,
            },
        }
    }

    /// Resolve to an expansion id: ids pass through, names go through the set map
    pub fn expansion_id(&self) -> Option<u64> {
        match self {
            ExpansionFilter::Id(id) => Some(*id),
            ExpansionFilter::Name(name) => expansion_id_for_set(name),
        }
    }

    pub fn override_id(&self) -> Option<u64> {
        match self {
            ExpansionFilter::Id(id) => Some(*id),
            ExpansionFilter::Name(_) => None,
        }
    }
}

impl fmt::Display for ExpansionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpansionFilter::Name(name) => write!(f, "{}", name),
            ExpansionFilter::Id(id) => write!(f, "{}", id),
        }
    }
}
