use serde::Serialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Externally supplied community membership of one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommunityAssignment {
    #[default]
    Unassigned,
    Assigned(u32),
}

impl CommunityAssignment {
    /// Interpret a raw JSON community value. Negative, fractional,
    /// non-numeric and null values are all unassigned.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let serde_json::Value::Number(n) = value else {
            return CommunityAssignment::Unassigned;
        };
        let id = n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        });
        match id.and_then(|id| u32::try_from(id).ok()) {
            Some(id) => CommunityAssignment::Assigned(id),
            None => CommunityAssignment::Unassigned,
        }
    }

    pub fn community(self) -> Option<u32> {
        match self {
            CommunityAssignment::Assigned(id) => Some(id),
            CommunityAssignment::Unassigned => None,
        }
    }
}

/// Identifier of a community bucket.
///
/// Displays as the bare community id for real communities, `other` for
/// merged small communities and `none` for unassigned characters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr,
)]
pub enum BucketId {
    Community(u32),
    Other,
    NoCommunity,
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketId::Community(id) => write!(f, "{}", id),
            BucketId::Other => f.write_str("other"),
            BucketId::NoCommunity => f.write_str("none"),
        }
    }
}

impl FromStr for BucketId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "other" => Ok(BucketId::Other),
            "none" => Ok(BucketId::NoCommunity),
            other => other
                .parse::<u32>()
                .map(BucketId::Community)
                .map_err(|_| format!("Invalid community bucket '{}'", s)),
        }
    }
}

/// A community grouping as shown in legends and filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub id: BucketId,
    pub label: String,
    /// Position of this bucket in the legend.
    pub order: usize,
    pub member_count: usize,
    pub members: BTreeSet<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assignment_from_value() {
        assert_eq!(
            CommunityAssignment::from_value(&json!(3)),
            CommunityAssignment::Assigned(3)
        );
        assert_eq!(
            CommunityAssignment::from_value(&json!(4.0)),
            CommunityAssignment::Assigned(4)
        );
        for value in [json!(-1), json!(2.5), json!("3"), json!(null)] {
            assert_eq!(
                CommunityAssignment::from_value(&value),
                CommunityAssignment::Unassigned,
                "{value} should be unassigned"
            );
        }
    }

    #[test]
    fn test_bucket_id_display_roundtrip() {
        for id in [BucketId::Community(12), BucketId::Other, BucketId::NoCommunity] {
            assert_eq!(id.to_string().parse::<BucketId>(), Ok(id));
        }
        assert!("community".parse::<BucketId>().is_err());
        assert_eq!("NONE".parse::<BucketId>(), Ok(BucketId::NoCommunity));
    }

    #[test]
    fn test_bucket_id_serializes_as_string() {
        let json = serde_json::to_value([BucketId::Community(2), BucketId::Other]).unwrap();
        assert_eq!(json, json!(["2", "other"]));
    }
}
