//! Wire types exchanged with the classification service.

use std::fmt;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Attachment metadata. Only the filename is sent; contents never leave the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
}

/// The `From`/`To` header pair. Keys are capitalised on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailHeaders {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
}

/// Body of `POST /classify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub subject: String,
    pub body: String,
    pub headers: EmailHeaders,
    pub attachments: Vec<Attachment>,
}

/// Response of `POST /classify`.
///
/// `score` is the probability of the sensitive class; `scores` holds the
/// per-category probabilities in the order the service emitted them.
/// A missing `action` decodes as empty and is therefore tiered as danger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub action: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub score: f64,
    #[serde(default)]
    pub scores: Scores,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Other(IgnoredAny),
}

/// Any JSON number as-is; `null`, strings, and other non-numbers become 0.
fn number_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match LooseNumber::deserialize(deserializer)? {
        LooseNumber::Number(n) => n,
        LooseNumber::Other(_) => 0.0,
    })
}

/// Insertion-ordered category → probability map.
///
/// A JSON `null` decodes to an empty map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scores(Vec<(String, f64)>);

impl Scores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name`, keeping the position of the first insert.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Scores {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut scores = Scores::new();
        for (k, v) in iter {
            scores.insert(k, v);
        }
        scores
    }
}

impl Serialize for Scores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct ScoresVisitor;

impl<'de> Visitor<'de> for ScoresVisitor {
    type Value = Scores;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of category names to probabilities, or null")
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Scores, E> {
        Ok(Scores::new())
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Scores, E> {
        Ok(Scores::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Scores, D::Error> {
        deserializer.deserialize_map(ScoresVisitor)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Scores, A::Error> {
        let mut scores = Scores::new();
        while let Some((k, v)) = access.next_entry::<String, f64>()? {
            scores.insert(k, v);
        }
        Ok(scores)
    }
}

impl<'de> Deserialize<'de> for Scores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_option(ScoresVisitor)
    }
}
