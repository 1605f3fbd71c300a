//! Parsing for the semi-structured debut fields.
//!
//! Debut text is a delimiter-separated list (`,`, `;` or newline) where
//! technique entries follow a `name: detail` pattern.

/// Split a debut field into trimmed, non-empty items.
pub fn split_items(text: &str) -> Vec<&str> {
    text.split([',', ';', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Parse a `name: detail` item. Returns `None` when either side is empty
/// or the separator is missing.
pub fn parse_attributed(item: &str) -> Option<(&str, &str)> {
    let (name, detail) = item.split_once(':')?;
    let name = name.trim();
    let detail = detail.trim();
    if name.is_empty() || detail.is_empty() {
        return None;
    }
    Some((name, detail))
}

/// Character credited with a technique debut, excluding `unattributed`.
pub fn technique_owner(item: &str) -> Option<&str> {
    parse_attributed(item)
        .map(|(name, _)| name)
        .filter(|name| !name.eq_ignore_ascii_case("unattributed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_items_mixed_delimiters() {
        let items = split_items("Luffy, Zoro;\n Nami ,, ;");
        assert_eq!(items, vec!["Luffy", "Zoro", "Nami"]);
        assert!(split_items("  ").is_empty());
    }

    #[test]
    fn test_parse_attributed() {
        assert_eq!(
            parse_attributed("Luffy: Gomu Gomu no Pistol"),
            Some(("Luffy", "Gomu Gomu no Pistol"))
        );
        assert_eq!(parse_attributed("Gomu Gomu no Pistol"), None);
        assert_eq!(parse_attributed(": nameless"), None);
        assert_eq!(parse_attributed("Zoro:"), None);
    }

    #[test]
    fn test_technique_owner_skips_unattributed() {
        assert_eq!(technique_owner("Unattributed: Soru"), None);
        assert_eq!(technique_owner("Sanji: Diable Jambe"), Some("Sanji"));
    }
}
