//! Test data builders for raw episode records.
//!
//! Records are produced as JSON values so tests exercise the same parsing
//! path as documents on disk.

use serde_json::{json, Map, Value};

/// Builder for one raw episode record.
pub struct EpisodeBuilder {
    fields: Map<String, Value>,
}

impl EpisodeBuilder {
    /// Create a new episode record with the given number and cast.
    pub fn new(number: i64, characters: &[&str]) -> Self {
        let mut fields = Map::new();
        fields.insert("episode_number".into(), json!(number));
        fields.insert("characters_list".into(), json!(characters));
        Self { fields }
    }

    pub fn arc(self, arc: &str) -> Self {
        self.field("arc_name", arc)
    }

    pub fn airdate(self, date: &str) -> Self {
        self.field("airdate", date)
    }

    pub fn char_debut(self, text: &str) -> Self {
        self.field("char_debut", text)
    }

    pub fn tech_debut(self, text: &str) -> Self {
        self.field("tech_debut", text)
    }

    pub fn director(self, name: &str) -> Self {
        self.field("director", name)
    }

    /// Set an arbitrary field, for malformed-record cases.
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Three episodes: {A,B}, {A,B,C}, {B,C}.
pub fn three_episode_scenario() -> Vec<Value> {
    vec![
        EpisodeBuilder::new(1, &["A", "B"]).build(),
        EpisodeBuilder::new(2, &["A", "B", "C"]).build(),
        EpisodeBuilder::new(3, &["B", "C"]).build(),
    ]
}
