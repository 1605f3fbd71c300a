//! Saga and arc metadata.
//!
//! Arcs are ordered by a fixed saga table. That order is also the
//! ordering key for communities, which are labelled after the most common
//! debut arc of their members.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::Episode;

/// Sagas and their arcs, in broadcast order.
pub const SAGAS: &[(&str, &[&str])] = &[
    (
        "East Blue Saga",
        &[
            "Romance Dawn",
            "Orange Town",
            "Syrup Village",
            "Baratie",
            "Arlong Park",
            "Loguetown",
        ],
    ),
    (
        "Arabasta Saga",
        &[
            "Reverse Mountain",
            "Whisky Peak",
            "Little Garden",
            "Drum Island",
            "Arabasta",
        ],
    ),
    ("Sky Island Saga", &["Jaya", "Skypiea"]),
    (
        "Water 7 Saga",
        &[
            "Long Ring Long Land",
            "Water 7",
            "Enies Lobby",
            "Post-Enies Lobby",
        ],
    ),
    ("Thriller Bark Saga", &["Thriller Bark"]),
    (
        "Summit War Saga",
        &[
            "Sabaody Archipelago",
            "Amazon Lily",
            "Impel Down",
            "Marineford",
            "Post-War",
        ],
    ),
    ("Fish-Man Island Saga", &["Return to Sabaody", "Fish-Man Island"]),
    ("Dressrosa Saga", &["Punk Hazard", "Dressrosa"]),
    (
        "Whole Cake Island Saga",
        &["Zou", "Whole Cake Island", "Levely"],
    ),
    ("Wano Country Saga", &["Wano Country"]),
    ("Final Saga", &["Egghead", "Elbaph"]),
];

/// Saga containing `arc`, if the arc is in the table.
pub fn saga_of(arc: &str) -> Option<&'static str> {
    SAGAS
        .iter()
        .find(|(_, arcs)| arcs.contains(&arc))
        .map(|(saga, _)| *saga)
}

/// An arc present in the data with its episode range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArcMeta {
    pub name: String,
    pub saga: String,
    pub from_episode: i64,
    pub to_episode: i64,
}

/// Arcs that occur in `episodes`, in saga-table order. Arcs missing from
/// the table are not listed.
pub fn arc_meta(episodes: &[Episode]) -> Vec<ArcMeta> {
    let mut ranges: HashMap<&str, (i64, i64)> = HashMap::new();
    for ep in episodes {
        let Some(arc) = ep.arc_name.as_deref() else {
            continue;
        };
        let range = ranges.entry(arc).or_insert((ep.number, ep.number));
        range.0 = range.0.min(ep.number);
        range.1 = range.1.max(ep.number);
    }

    SAGAS
        .iter()
        .flat_map(|(saga, arcs)| arcs.iter().map(move |arc| (*saga, *arc)))
        .filter_map(|(saga, arc)| {
            ranges.get(arc).map(|&(from, to)| ArcMeta {
                name: arc.to_string(),
                saga: saga.to_string(),
                from_episode: from,
                to_episode: to,
            })
        })
        .collect()
}

/// Position of each present arc in [`arc_meta`] order.
#[derive(Debug, Clone, Default)]
pub struct ArcOrder {
    positions: HashMap<String, usize>,
}

impl ArcOrder {
    pub fn from_meta(meta: &[ArcMeta]) -> Self {
        let mut positions = HashMap::new();
        for (idx, arc) in meta.iter().enumerate() {
            positions.entry(arc.name.clone()).or_insert(idx);
        }
        Self { positions }
    }

    pub fn position(&self, arc: &str) -> Option<usize> {
        self.positions.get(arc).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CrewCredits;

    fn ep(number: i64, arc: Option<&str>) -> Episode {
        Episode {
            number,
            air_date: None,
            arc_name: arc.map(String::from),
            characters: Vec::new(),
            character_ids: Vec::new(),
            character_debut: None,
            technique_debut: None,
            crew: CrewCredits::default(),
        }
    }

    #[test]
    fn test_arc_meta_follows_saga_order() {
        let episodes = vec![
            ep(62, Some("Reverse Mountain")),
            ep(1, Some("Romance Dawn")),
            ep(3, Some("Romance Dawn")),
            ep(31, Some("Baratie")),
            ep(40, None),
            ep(999, Some("Filler")),
        ];
        let meta = arc_meta(&episodes);
        let names: Vec<&str> = meta.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Romance Dawn", "Baratie", "Reverse Mountain"]);
        assert_eq!((meta[0].from_episode, meta[0].to_episode), (1, 3));
        assert_eq!(meta[2].saga, "Arabasta Saga");
    }

    #[test]
    fn test_arc_order_positions() {
        let meta = arc_meta(&[ep(1, Some("Romance Dawn")), ep(80, Some("Drum Island"))]);
        let order = ArcOrder::from_meta(&meta);
        assert_eq!(order.position("Romance Dawn"), Some(0));
        assert_eq!(order.position("Drum Island"), Some(1));
        assert_eq!(order.position("Wano Country"), None);
    }

    #[test]
    fn test_saga_of() {
        assert_eq!(saga_of("Marineford"), Some("Summit War Saga"));
        assert_eq!(saga_of("Unknown"), None);
    }
}
