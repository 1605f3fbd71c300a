//! Dataset normalization: sorted episode sequence plus stable character ids.

use std::collections::{BTreeSet, HashSet};

use crate::models::episode::{non_empty, parse_air_date};
use crate::models::{CharacterIndex, CrewCredits, Episode, RawEpisode};

/// Normalized dataset owned by the session.
#[derive(Debug, Clone, Default)]
pub struct NormalizedDataset {
    pub characters: CharacterIndex,
    /// Strictly increasing by episode number.
    pub episodes: Vec<Episode>,
}

impl NormalizedDataset {
    pub fn episode_numbers(&self) -> Vec<i64> {
        self.episodes.iter().map(|ep| ep.number).collect()
    }

    pub fn last_episode_number(&self) -> Option<i64> {
        self.episodes.last().map(|ep| ep.number)
    }
}

/// Normalize raw episode records.
///
/// Records without an integral episode number are dropped, the rest are
/// sorted by number and only the first record per number is kept. Ids come
/// from `character_override` when given (its order is the id order),
/// otherwise from the alphabetically sorted union of names across all
/// records. Names that do not resolve against the index are left out of
/// `character_ids`; duplicates within one episode are preserved.
pub fn normalize(
    records: &[RawEpisode],
    character_override: Option<&[String]>,
) -> NormalizedDataset {
    let characters = match character_override {
        Some(names) => CharacterIndex::from_names(names.to_vec()),
        None => {
            let union: BTreeSet<&str> = records
                .iter()
                .flat_map(|r| r.characters_list.iter())
                .map(String::as_str)
                .filter(|name| !name.is_empty())
                .collect();
            CharacterIndex::from_names(union.into_iter().map(String::from).collect())
        }
    };

    let mut numbered: Vec<(i64, &RawEpisode)> = records
        .iter()
        .filter_map(|r| r.number().map(|n| (n, r)))
        .collect();
    let dropped = records.len() - numbered.len();
    // Stable sort keeps input order among equal numbers.
    numbered.sort_by_key(|(n, _)| *n);

    let mut seen = HashSet::new();
    let episodes: Vec<Episode> = numbered
        .into_iter()
        .filter(|(n, _)| seen.insert(*n))
        .map(|(number, raw)| build_episode(number, raw, &characters))
        .collect();

    if dropped > 0 {
        tracing::debug!("Dropped {} episode records without an episode number", dropped);
    }

    NormalizedDataset {
        characters,
        episodes,
    }
}

fn build_episode(number: i64, raw: &RawEpisode, characters: &CharacterIndex) -> Episode {
    let names: Vec<String> = raw
        .characters_list
        .iter()
        .filter(|name| !name.is_empty())
        .cloned()
        .collect();
    let character_ids = names.iter().filter_map(|n| characters.id(n)).collect();

    Episode {
        number,
        air_date: raw.airdate.as_deref().and_then(parse_air_date),
        arc_name: non_empty(&raw.arc_name),
        characters: names,
        character_ids,
        character_debut: non_empty(&raw.char_debut),
        technique_debut: non_empty(&raw.tech_debut),
        crew: CrewCredits {
            director: non_empty(&raw.director),
            writer: non_empty(&raw.writer),
            art_director: non_empty(&raw.art_director),
            animator: non_empty(&raw.animator),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(number: serde_json::Value, chars: &[&str]) -> RawEpisode {
        RawEpisode {
            episode_number: Some(number),
            characters_list: chars.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sorts_and_drops_unnumbered() {
        let records = vec![
            raw(json!(3), &["Nami"]),
            raw(json!("two"), &["Usopp"]),
            raw(json!(1), &["Luffy"]),
            raw(json!(2.5), &["Zoro"]),
        ];
        let ds = normalize(&records, None);
        assert_eq!(ds.episode_numbers(), vec![1, 3]);
        // Index covers names from every record, even dropped ones.
        assert_eq!(ds.characters.names(), &["Luffy", "Nami", "Usopp", "Zoro"]);
    }

    #[test]
    fn test_duplicate_numbers_keep_first_record() {
        let records = vec![
            raw(json!(5), &["Luffy"]),
            raw(json!(4), &["Zoro"]),
            raw(json!(5), &["Nami"]),
        ];
        let ds = normalize(&records, None);
        assert_eq!(ds.episode_numbers(), vec![4, 5]);
        assert_eq!(ds.episodes[1].characters, vec!["Luffy"]);
    }

    #[test]
    fn test_override_defines_ids_and_filters_unknown() {
        let records = vec![raw(json!(1), &["Zoro", "Buggy", "Luffy", "Zoro"])];
        let names = vec!["Luffy".to_string(), "Zoro".to_string()];
        let ds = normalize(&records, Some(&names));
        assert_eq!(ds.characters.id("Luffy"), Some(0));
        assert_eq!(ds.characters.id("Buggy"), None);
        assert_eq!(ds.episodes[0].character_ids, vec![1, 0, 1]);
        assert_eq!(ds.episodes[0].characters.len(), 4);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            raw(json!(2), &["B", "A"]),
            raw(json!(1), &["C", "A"]),
        ];
        let first = normalize(&records, None);
        let second = normalize(&records, None);
        assert_eq!(first.characters.names(), second.characters.names());
        assert_eq!(first.episode_numbers(), second.episode_numbers());
        let ids = |ds: &NormalizedDataset| -> Vec<Vec<usize>> {
            ds.episodes.iter().map(|e| e.character_ids.clone()).collect()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_blank_fields_become_none() {
        let mut record = raw(json!(1), &[]);
        record.director = Some("  ".into());
        record.writer = Some("Oda".into());
        record.airdate = Some("1999-10-20".into());
        let ds = normalize(&[record], None);
        let ep = &ds.episodes[0];
        assert_eq!(ep.crew.director, None);
        assert_eq!(ep.crew.writer.as_deref(), Some("Oda"));
        assert!(ep.air_date.is_some());
        assert!(ds.characters.is_empty());
    }
}
