use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError, DefaultOnNull, VecSkipError};

/// Episode record as it appears in `episodes.json`.
///
/// Every field is optional at this level. A field of the wrong shape reads
/// as absent and a non-string entry in `characters_list` is skipped, so only
/// the episode number decides whether a record reaches the timeline.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEpisode {
    /// Kept as a raw JSON value so that floats, strings and nulls can be
    /// told apart from proper integers.
    #[serde(default)]
    pub episode_number: Option<serde_json::Value>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub airdate: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub arc_name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub char_debut: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub tech_debut: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError<DefaultOnNull<VecSkipError<_>>>")]
    #[serde(default)]
    pub characters_list: Vec<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub director: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub writer: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub art_director: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub animator: Option<String>,
}

impl RawEpisode {
    /// Integral episode number, if the record carries one.
    ///
    /// Floats with a zero fractional part count as integers; anything else
    /// (strings, `12.5`, null, missing) yields `None`.
    pub fn number(&self) -> Option<i64> {
        match self.episode_number.as_ref()? {
            serde_json::Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            _ => None,
        }
    }
}

/// Crew credits attached to one episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrewCredits {
    pub director: Option<String>,
    pub writer: Option<String>,
    pub art_director: Option<String>,
    pub animator: Option<String>,
}

impl CrewCredits {
    pub fn for_role(&self, role: CrewRole) -> Option<&str> {
        match role {
            CrewRole::Director => self.director.as_deref(),
            CrewRole::Writer => self.writer.as_deref(),
            CrewRole::ArtDirector => self.art_director.as_deref(),
            CrewRole::Animator => self.animator.as_deref(),
        }
    }
}

/// Crew role tracked per episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CrewRole {
    Director,
    Writer,
    ArtDirector,
    Animator,
}

impl CrewRole {
    pub const ALL: [CrewRole; 4] = [
        CrewRole::Director,
        CrewRole::Writer,
        CrewRole::ArtDirector,
        CrewRole::Animator,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CrewRole::Director => "Director",
            CrewRole::Writer => "Writer",
            CrewRole::ArtDirector => "Art Director",
            CrewRole::Animator => "Animator",
        }
    }
}

/// Normalized episode in the session's sorted sequence.
#[derive(Debug, Clone, Serialize)]
pub struct Episode {
    pub number: i64,
    pub air_date: Option<NaiveDate>,
    pub arc_name: Option<String>,
    /// Character names exactly as listed, duplicates included.
    pub characters: Vec<String>,
    /// Ids of `characters` that resolve in the character index, in list
    /// order. Duplicates are preserved.
    pub character_ids: Vec<usize>,
    pub character_debut: Option<String>,
    pub technique_debut: Option<String>,
    pub crew: CrewCredits,
}

/// Parse an ISO-ish air date (`2001-03-14` or a full RFC 3339 timestamp).
pub fn parse_air_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            text.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

/// Treat empty or whitespace-only strings as absent.
pub(crate) fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
