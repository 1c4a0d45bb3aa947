//! Ordered (key, value) lists for the backend's loosely typed maps.
//!
//! Sentiment dimensions, participant engagement and priority counts arrive as
//! JSON objects. They are read in document order and validated entry by
//! entry: a malformed entry is dropped with a warning instead of failing the
//! whole payload. A list of `[key, value]` pairs or `{"key", "value"}`
//! objects is accepted as well.

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Scores in `[0, 1]`, keyed by dimension or participant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreList(Vec<(String, f64)>);

/// Non-negative counts keyed by label
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountList(Vec<(String, u64)>);

impl ScoreList {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn from_raw(raw: Vec<(String, Value)>) -> Self {
        let mut entries = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            match value.as_f64().filter(|v| v.is_finite()) {
                Some(score) => {
                    let clamped = score.clamp(0.0, 1.0);
                    if clamped != score {
                        log::warn!("Score for '{}' out of range ({}), clamped", key, score);
                    }
                    entries.push((key, clamped));
                }
                None => log::warn!("Dropping non-numeric score for '{}': {}", key, value),
            }
        }
        Self(entries)
    }
}

impl CountList {
    pub fn new(entries: Vec<(String, u64)>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Case-insensitive lookup
    pub fn get(&self, key: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| *v)
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, v)| *v).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn from_raw(raw: Vec<(String, Value)>) -> Self {
        let mut entries = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let count = value.as_u64().or_else(|| {
                value
                    .as_f64()
                    .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
                    .map(|v| v as u64)
            });
            match count {
                Some(count) => entries.push((key, count)),
                None => log::warn!("Dropping invalid count for '{}': {}", key, value),
            }
        }
        Self(entries)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ScoreList {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for CountList {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Raw entries in document order, before value validation
struct RawPairs(Vec<(String, Value)>);

struct RawPairsVisitor;

impl<'de> Visitor<'de> for RawPairsVisitor {
    type Value = RawPairs;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object or a list of key/value pairs")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawPairs, A::Error> {
        let mut out = Vec::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            out.push((key, value));
        }
        Ok(RawPairs(out))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawPairs, A::Error> {
        let mut out = Vec::new();
        while let Some(element) = seq.next_element::<Value>()? {
            match pair_from_element(&element) {
                Some(pair) => out.push(pair),
                None => log::warn!("Dropping malformed pair: {}", element),
            }
        }
        Ok(RawPairs(out))
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<RawPairs, E> {
        Ok(RawPairs(Vec::new()))
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<RawPairs, E> {
        Ok(RawPairs(Vec::new()))
    }
}

fn pair_from_element(element: &Value) -> Option<(String, Value)> {
    match element {
        Value::Array(items) if items.len() == 2 => {
            Some((items[0].as_str()?.to_string(), items[1].clone()))
        }
        Value::Object(obj) => {
            let key = obj.get("key").or_else(|| obj.get("name"))?.as_str()?;
            let value = obj.get("value").or_else(|| obj.get("score"))?;
            Some((key.to_string(), value.clone()))
        }
        _ => None,
    }
}

impl<'de> Deserialize<'de> for RawPairs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawPairsVisitor)
    }
}

impl<'de> Deserialize<'de> for ScoreList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawPairs::deserialize(deserializer).map(|raw| ScoreList::from_raw(raw.0))
    }
}

impl<'de> Deserialize<'de> for CountList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawPairs::deserialize(deserializer).map(|raw| CountList::from_raw(raw.0))
    }
}

impl Serialize for ScoreList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Serialize for CountList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
