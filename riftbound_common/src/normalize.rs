//! Card name normalization shared by the local catalog and the marketplace

/// Lowercase a card name and strip everything that is not an ASCII letter or digit.
///
/// Local catalog names and CardTrader blueprint names disagree on punctuation,
/// apostrophes and spacing, so both sides are compared in this form.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_case_and_punctuation() {
        assert_eq!(normalize_name("Ionia's Pride!"), normalize_name("ionias pride"));
        assert_eq!(normalize_name("Ionia's Pride!"), "ioniaspride");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(normalize_name("Token 2/2 - Sprite"), "token22sprite");
    }

    #[test]
    fn is_idempotent() {
        let once = normalize_name("Jinx, Loose Cannon");
        assert_eq!(normalize_name(&once), once);
    }

    #[test]
    fn drops_non_ascii_letters() {
        assert_eq!(normalize_name("Pokémon"), "pokmon");
        assert_eq!(normalize_name(""), "");
    }
}
