use serde::Serialize;
use std::collections::HashMap;

/// Bidirectional mapping between character names and dense ids in
/// `[0, len)`.
///
/// Ids are assigned once per session and never change. When the same name
/// is supplied twice, the first occurrence keeps the name lookup and the
/// later id is left unreachable by name. This is deliberately first-wins,
/// not the last-wins a plain name-to-id map insert would give.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CharacterIndex {
    names: Vec<String>,
    #[serde(skip)]
    ids: HashMap<String, usize>,
}

impl CharacterIndex {
    /// Build an index that preserves the given order as id order.
    pub fn from_names(names: Vec<String>) -> Self {
        let mut ids = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            ids.entry(name.clone()).or_insert(idx);
        }
        Self { names, ids }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn id(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Case-insensitive exact lookup, used for user-typed names.
    pub fn find_ignore_case(&self, name: &str) -> Option<usize> {
        self.id(name).or_else(|| {
            let wanted = name.trim().to_lowercase();
            self.names.iter().position(|n| n.to_lowercase() == wanted)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(names: &[&str]) -> CharacterIndex {
        CharacterIndex::from_names(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_ids_follow_input_order() {
        let idx = index(&["Zoro", "Luffy", "Nami"]);
        assert_eq!(idx.id("Zoro"), Some(0));
        assert_eq!(idx.id("Nami"), Some(2));
        assert_eq!(idx.name(1), Some("Luffy"));
        assert_eq!(idx.name(3), None);
        assert_eq!(idx.len(), 3);
    }

    #[test]
    fn test_duplicate_name_keeps_first_id() {
        let idx = index(&["Usopp", "Sanji", "Usopp"]);
        assert_eq!(idx.id("Usopp"), Some(0));
        assert_eq!(idx.len(), 3);
    }

    #[test]
    fn test_find_ignore_case() {
        let idx = index(&["Monkey D. Luffy", "Roronoa Zoro"]);
        assert_eq!(idx.find_ignore_case("roronoa zoro"), Some(1));
        assert_eq!(idx.find_ignore_case("  MONKEY D. LUFFY "), Some(0));
        assert_eq!(idx.find_ignore_case("Nami"), None);
    }
}
