//! Community bucketing.
//!
//! Characters are grouped by their externally assigned community. Small
//! communities collapse into a shared `other` bucket and unassigned
//! characters into `none`.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{Bucket, BucketId, CharacterIndex, CommunityAssignment};
use crate::services::arcs::ArcOrder;

/// Communities with fewer members than this merge into `other`.
pub const SMALL_COMMUNITY_THRESHOLD: usize = 5;

pub const OTHER_LABEL: &str = "Other (small communities)";
pub const NO_COMMUNITY_LABEL: &str = "No community";

/// Community assignments and labels for one session.
#[derive(Debug, Clone, Default)]
pub struct CommunityTable {
    /// Parallel to character ids. Ids beyond the end are unassigned.
    assignments: Vec<CommunityAssignment>,
    labels: HashMap<u32, String>,
    centroids: HashMap<u32, [f64; 2]>,
    sizes: HashMap<u32, usize>,
    small_threshold: usize,
}

impl CommunityTable {
    pub fn new(
        assignments: Vec<CommunityAssignment>,
        labels: HashMap<u32, String>,
        centroids: HashMap<u32, [f64; 2]>,
        small_threshold: usize,
    ) -> Self {
        let mut sizes = HashMap::new();
        for community in assignments.iter().filter_map(|a| a.community()) {
            *sizes.entry(community).or_insert(0) += 1;
        }
        Self {
            assignments,
            labels,
            centroids,
            sizes,
            small_threshold,
        }
    }

    /// Table with no assignments: every character lands in `none`.
    pub fn unassigned() -> Self {
        Self::new(
            Vec::new(),
            HashMap::new(),
            HashMap::new(),
            SMALL_COMMUNITY_THRESHOLD,
        )
    }

    pub fn assignment(&self, character: usize) -> CommunityAssignment {
        self.assignments
            .get(character)
            .copied()
            .unwrap_or(CommunityAssignment::Unassigned)
    }

    pub fn community_size(&self, community: u32) -> usize {
        self.sizes.get(&community).copied().unwrap_or(0)
    }

    fn is_small(&self, community: u32) -> bool {
        self.community_size(community) < self.small_threshold
    }

    pub fn bucket_of(&self, character: usize) -> BucketId {
        match self.assignment(character) {
            CommunityAssignment::Unassigned => BucketId::NoCommunity,
            CommunityAssignment::Assigned(c) if self.is_small(c) => BucketId::Other,
            CommunityAssignment::Assigned(c) => BucketId::Community(c),
        }
    }

    pub fn community_label(&self, community: u32) -> String {
        self.labels
            .get(&community)
            .cloned()
            .unwrap_or_else(|| format!("Community {}", community))
    }

    /// Per-character label for tooltips. Members of merged small
    /// communities keep their raw id in the label.
    pub fn node_label(&self, character: usize) -> String {
        match self.assignment(character) {
            CommunityAssignment::Unassigned => NO_COMMUNITY_LABEL.to_string(),
            CommunityAssignment::Assigned(c) if self.is_small(c) => format!("Other (# {})", c),
            CommunityAssignment::Assigned(c) => self.community_label(c),
        }
    }

    pub fn centroids(&self) -> &HashMap<u32, [f64; 2]> {
        &self.centroids
    }

    /// Partition every indexed character into buckets.
    ///
    /// Real buckets come first, ordered by the arc position of their label
    /// (labels that are not arcs go last) and then by smallest member id.
    /// `other` and `none` follow when non-empty.
    pub fn classify(&self, characters: &CharacterIndex, arc_order: &ArcOrder) -> Vec<Bucket> {
        let mut real: BTreeMap<u32, BTreeSet<usize>> = BTreeMap::new();
        let mut other = BTreeSet::new();
        let mut none = BTreeSet::new();

        for id in 0..characters.len() {
            match self.bucket_of(id) {
                BucketId::Community(c) => {
                    real.entry(c).or_default().insert(id);
                }
                BucketId::Other => {
                    other.insert(id);
                }
                BucketId::NoCommunity => {
                    none.insert(id);
                }
            }
        }

        let mut ordered: Vec<(u32, String, BTreeSet<usize>)> = real
            .into_iter()
            .map(|(c, members)| (c, self.community_label(c), members))
            .collect();
        ordered.sort_by_key(|(_, label, members)| {
            (
                arc_order.position(label).unwrap_or(usize::MAX),
                members.first().copied().unwrap_or(usize::MAX),
            )
        });

        let mut buckets: Vec<Bucket> = ordered
            .into_iter()
            .map(|(c, label, members)| (BucketId::Community(c), label, members))
            .chain(
                [
                    (BucketId::Other, OTHER_LABEL.to_string(), other),
                    (BucketId::NoCommunity, NO_COMMUNITY_LABEL.to_string(), none),
                ]
                .into_iter(),
            )
            .filter(|(_, _, members)| !members.is_empty())
            .map(|(id, label, members)| Bucket {
                id,
                label,
                order: 0,
                member_count: members.len(),
                members,
            })
            .collect();

        for (order, bucket) in buckets.iter_mut().enumerate() {
            bucket.order = order;
        }
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrewCredits, Episode};
    use crate::services::arcs::{arc_meta, ArcOrder};

    fn characters(n: usize) -> CharacterIndex {
        CharacterIndex::from_names((0..n).map(|i| format!("c{i}")).collect())
    }

    fn table(raw: &[i64], labels: &[(u32, &str)]) -> CommunityTable {
        let assignments = raw
            .iter()
            .map(|&v| CommunityAssignment::from_value(&serde_json::json!(v)))
            .collect();
        let labels = labels
            .iter()
            .map(|(id, label)| (*id, label.to_string()))
            .collect();
        CommunityTable::new(
            assignments,
            labels,
            HashMap::new(),
            SMALL_COMMUNITY_THRESHOLD,
        )
    }

    #[test]
    fn test_four_members_merge_five_do_not() {
        // community 0 has 5 members, community 1 has 4
        let t = table(&[0, 0, 0, 0, 0, 1, 1, 1, 1], &[]);
        let buckets = t.classify(&characters(9), &ArcOrder::default());
        let ids: Vec<BucketId> = buckets.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![BucketId::Community(0), BucketId::Other]);
        assert_eq!(buckets[0].member_count, 5);
        assert_eq!(buckets[1].members, BTreeSet::from([5, 6, 7, 8]));
        assert_eq!(buckets[0].label, "Community 0");
    }

    #[test]
    fn test_unassigned_and_missing_go_to_none() {
        let t = table(&[-1, 2, 2, 2, 2, 2], &[(2, "Arabasta")]);
        // 8 characters, only 6 have an entry
        let buckets = t.classify(&characters(8), &ArcOrder::default());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "Arabasta");
        assert_eq!(buckets[1].id, BucketId::NoCommunity);
        assert_eq!(buckets[1].members, BTreeSet::from([0, 6, 7]));
        assert_eq!(buckets[1].order, 1);
    }

    #[test]
    fn test_real_buckets_follow_arc_order() {
        let ep = |number: i64, arc: &str| Episode {
            number,
            air_date: None,
            arc_name: Some(arc.to_string()),
            characters: Vec::new(),
            character_ids: Vec::new(),
            character_debut: None,
            technique_debut: None,
            crew: CrewCredits::default(),
        };
        let order = ArcOrder::from_meta(&arc_meta(&[
            ep(1, "Romance Dawn"),
            ep(20, "Syrup Village"),
        ]));
        // community 3 labelled by the earlier arc but has larger member ids
        let raw = [7, 7, 7, 7, 7, 3, 3, 3, 3, 3, 9, 9, 9, 9, 9];
        let t = table(
            &raw,
            &[(7, "Syrup Village"), (3, "Romance Dawn"), (9, "Not an arc")],
        );
        let buckets = t.classify(&characters(raw.len()), &order);
        let ids: Vec<BucketId> = buckets.iter().map(|b| b.id).collect();
        assert_eq!(
            ids,
            vec![
                BucketId::Community(3),
                BucketId::Community(7),
                BucketId::Community(9)
            ]
        );
    }

    #[test]
    fn test_label_ties_follow_first_member() {
        // neither label is an arc; community 5 is met first walking by id
        let raw = [5, 5, 2, 2, 2, 2, 2, 5, 5, 5];
        let t = table(&raw, &[(5, "Loguetown"), (2, "Warship Island")]);
        let buckets = t.classify(&characters(raw.len()), &ArcOrder::default());
        let ids: Vec<BucketId> = buckets.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![BucketId::Community(5), BucketId::Community(2)]);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let t = table(&[1, 1, 1, 1, 1, 4, 4, -1, 1], &[]);
        let chars = characters(9);
        let first = t.classify(&chars, &ArcOrder::default());
        let second = t.classify(&chars, &ArcOrder::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_node_labels() {
        let t = table(&[0, 0, 0, 0, 0, 8, -1], &[(0, "Baratie")]);
        assert_eq!(t.node_label(0), "Baratie");
        assert_eq!(t.node_label(5), "Other (# 8)");
        assert_eq!(t.node_label(6), NO_COMMUNITY_LABEL);
        assert_eq!(t.node_label(40), NO_COMMUNITY_LABEL);
    }

    #[test]
    fn test_unassigned_table_puts_everyone_in_none() {
        let buckets = CommunityTable::unassigned().classify(&characters(3), &ArcOrder::default());
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].id, BucketId::NoCommunity);
        assert_eq!(buckets[0].member_count, 3);
    }
}
