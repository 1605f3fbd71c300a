//! Per-episode aggregate series for the dashboard's metric charts.
//!
//! These are plain folds over the sorted episode sequence. None of them
//! touch the co-appearance matrix.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::models::{Bucket, BucketId, CrewRole, Episode};
use crate::services::community::CommunityTable;
use crate::utils::text::{split_items, technique_owner};

// ---------------------------------------------------------------------------
// Episode metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeMetrics {
    pub episode_number: i64,
    pub air_date: Option<NaiveDate>,
    pub character_debuts: usize,
    pub character_appearances: usize,
    pub technique_debuts: usize,
}

pub fn episode_metrics(episodes: &[Episode]) -> Vec<EpisodeMetrics> {
    episodes
        .iter()
        .map(|ep| EpisodeMetrics {
            episode_number: ep.number,
            air_date: ep.air_date,
            character_debuts: ep
                .character_debut
                .as_deref()
                .map(|t| split_items(t).len())
                .unwrap_or(0),
            character_appearances: ep.characters.len(),
            technique_debuts: technique_owners(ep).len(),
        })
        .collect()
}

fn technique_owners(ep: &Episode) -> Vec<&str> {
    ep.technique_debut
        .as_deref()
        .map(|t| split_items(t).into_iter().filter_map(technique_owner).collect())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Technique running totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechniqueSeries {
    pub character: String,
    /// Cumulative debut count after each episode.
    pub values: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechniqueRunning {
    pub episode_numbers: Vec<i64>,
    pub series: Vec<TechniqueSeries>,
    /// Mean cumulative count over characters with at least one debut so far.
    pub average: Vec<f64>,
}

/// Cumulative technique debuts per character. Only characters with at
/// least `min_debuts` debuts overall get a series (alphabetical); the
/// average line covers everyone.
pub fn technique_running(episodes: &[Episode], min_debuts: u32) -> TechniqueRunning {
    let per_episode: Vec<Vec<&str>> = episodes.iter().map(technique_owners).collect();

    let mut totals: BTreeMap<&str, u32> = BTreeMap::new();
    for &owner in per_episode.iter().flatten() {
        *totals.entry(owner).or_insert(0) += 1;
    }
    let tracked: Vec<&str> = totals
        .iter()
        .filter(|&(_, &n)| n >= min_debuts)
        .map(|(c, _)| *c)
        .collect();

    let mut running: HashMap<&str, u32> = HashMap::new();
    let mut series: Vec<TechniqueSeries> = tracked
        .iter()
        .map(|c| TechniqueSeries {
            character: c.to_string(),
            values: Vec::with_capacity(episodes.len()),
        })
        .collect();
    let mut average = Vec::with_capacity(episodes.len());

    for owners in &per_episode {
        for &owner in owners {
            *running.entry(owner).or_insert(0) += 1;
        }
        let active = running.values().filter(|&&v| v > 0).count();
        let total: u32 = running.values().sum();
        average.push(if active > 0 {
            total as f64 / active as f64
        } else {
            0.0
        });
        for (entry, character) in series.iter_mut().zip(&tracked) {
            entry.values.push(running.get(character).copied().unwrap_or(0));
        }
    }

    TechniqueRunning {
        episode_numbers: episodes.iter().map(|ep| ep.number).collect(),
        series,
        average,
    }
}

// ---------------------------------------------------------------------------
// Crew metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleMetrics {
    pub role: CrewRole,
    /// Whether this episode credits the role.
    pub credited: bool,
    pub unique_people: usize,
    pub credits_per_person: f64,
    pub avg_per_episode: f64,
    pub contributor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewEpisodeMetrics {
    pub episode_number: i64,
    pub air_date: Option<NaiveDate>,
    pub roles: Vec<RoleMetrics>,
}

/// Running crew statistics per episode for every [`CrewRole`].
pub fn crew_metrics(episodes: &[Episode]) -> Vec<CrewEpisodeMetrics> {
    let mut totals: HashMap<CrewRole, u32> = HashMap::new();
    let mut people: HashMap<CrewRole, HashSet<&str>> = HashMap::new();

    episodes
        .iter()
        .enumerate()
        .map(|(idx, ep)| {
            let seen = (idx + 1) as f64;
            let roles = CrewRole::ALL
                .iter()
                .map(|&role| {
                    let person = ep.crew.for_role(role);
                    let total = totals.entry(role).or_insert(0);
                    let unique = people.entry(role).or_default();
                    if let Some(name) = person {
                        *total += 1;
                        unique.insert(name);
                    }
                    RoleMetrics {
                        role,
                        credited: person.is_some(),
                        unique_people: unique.len(),
                        credits_per_person: if unique.is_empty() {
                            0.0
                        } else {
                            *total as f64 / unique.len() as f64
                        },
                        avg_per_episode: *total as f64 / seen,
                        contributor: person.map(String::from),
                    }
                })
                .collect();
            CrewEpisodeMetrics {
                episode_number: ep.number,
                air_date: ep.air_date,
                roles,
            }
        })
        .collect()
}

/// Credits per person for one role, most credited first.
pub fn crew_leaderboard(episodes: &[Episode], role: CrewRole) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for name in episodes.iter().filter_map(|ep| ep.crew.for_role(role)) {
        *counts.entry(name).or_insert(0) += 1;
    }
    let mut board: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, n)| (name.to_string(), n))
        .collect();
    board.sort_by(|a, b| b.1.cmp(&a.1));
    board
}

// ---------------------------------------------------------------------------
// Character presence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PresenceCategory {
    Core,
    ArcOnly,
    Recurring,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterPresence {
    pub character: String,
    pub debut_episode: i64,
    pub appearances: usize,
    pub episodes: usize,
    pub arcs: usize,
    pub coverage: f64,
    pub category: PresenceCategory,
}

/// Characters with at least `min_count` listings, ordered by debut.
///
/// Coverage is distinct episodes over the span from debut to the last
/// episode of the series. Coverage of at least one half is `Core`; an
/// appearance span of exactly three arcs is `ArcOnly`.
pub fn character_presence(episodes: &[Episode], min_count: usize) -> Vec<CharacterPresence> {
    #[derive(Default)]
    struct Tally<'a> {
        listings: usize,
        debut: Option<i64>,
        episodes: BTreeSet<i64>,
        arcs: HashSet<&'a str>,
    }

    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for ep in episodes {
        for name in &ep.characters {
            let t = tallies.entry(name.as_str()).or_default();
            t.listings += 1;
            t.debut = Some(t.debut.map_or(ep.number, |d| d.min(ep.number)));
            t.episodes.insert(ep.number);
            if let Some(arc) = ep.arc_name.as_deref() {
                t.arcs.insert(arc);
            }
        }
    }

    let last = episodes.iter().map(|ep| ep.number).max().unwrap_or(0).max(0);

    let mut out: Vec<CharacterPresence> = tallies
        .into_iter()
        .filter(|(_, t)| t.listings >= min_count)
        .filter_map(|(name, t)| {
            let debut = t.debut?;
            let span = last - debut + 1;
            let coverage = if span > 0 {
                t.episodes.len() as f64 / span as f64
            } else {
                t.episodes.len() as f64
            };
            let category = if coverage >= 0.5 {
                PresenceCategory::Core
            } else if t.arcs.len() == 3 {
                PresenceCategory::ArcOnly
            } else {
                PresenceCategory::Recurring
            };
            Some(CharacterPresence {
                character: name.to_string(),
                debut_episode: debut,
                appearances: t.listings,
                episodes: t.episodes.len(),
                arcs: t.arcs.len(),
                coverage,
                category,
            })
        })
        .collect();

    out.sort_by_key(|p| p.debut_episode);
    out
}

// ---------------------------------------------------------------------------
// Community appearance series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunitySeries {
    pub bucket: BucketId,
    pub label: String,
    pub member_count: usize,
    /// Character listings attributed to the bucket per episode.
    pub values: Vec<u32>,
}

/// How many character listings fall into each bucket per episode. Every
/// listing that resolves to a character id counts toward exactly one
/// bucket; listings of unindexed names count toward `none`.
pub fn community_appearances(
    episodes: &[Episode],
    buckets: &[Bucket],
    communities: &CommunityTable,
) -> Vec<CommunitySeries> {
    let position: HashMap<BucketId, usize> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| (b.id, i))
        .collect();
    let mut values = vec![vec![0u32; episodes.len()]; buckets.len()];

    for (idx, ep) in episodes.iter().enumerate() {
        let unresolved = ep.characters.len().saturating_sub(ep.character_ids.len());
        let resolved = ep.character_ids.iter().map(|&id| communities.bucket_of(id));
        let missing = std::iter::repeat(BucketId::NoCommunity).take(unresolved);
        for bucket in resolved.chain(missing) {
            if let Some(&slot) = position.get(&bucket) {
                values[slot][idx] += 1;
            }
        }
    }

    buckets
        .iter()
        .zip(values)
        .map(|(b, values)| CommunitySeries {
            bucket: b.id,
            label: b.label.clone(),
            member_count: b.member_count,
            values,
        })
        .collect()
}
