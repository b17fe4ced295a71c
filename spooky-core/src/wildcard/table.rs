use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

use super::{matches, AssetCode};

/// Insertion-ordered `pattern -> value` table.
///
/// Serialized as a JSON object whose key order is the table order. Lookups
/// return the first pattern (in order) that matches.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternTable<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for PatternTable<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> PatternTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the value of an existing pattern in place, or append a new one.
    pub fn insert(&mut self, pattern: impl Into<String>, value: V) -> Option<V> {
        let pattern = pattern.into();
        match self.entries.iter_mut().find(|(k, _)| *k == pattern) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((pattern, value));
                None
            }
        }
    }

    pub fn get(&self, pattern: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == pattern)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.get(pattern).is_some()
    }

    /// First entry whose pattern matches the asset code.
    pub fn first_match(&self, code: &AssetCode) -> Option<(&str, &V)> {
        self.entries
            .iter()
            .find(|(pattern, _)| code.matches_pattern(pattern))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// First entry whose pattern matches a raw string (no domain handling).
    pub fn first_match_str(&self, candidate: &str) -> Option<(&str, &V)> {
        self.entries
            .iter()
            .find(|(pattern, _)| matches(pattern, candidate))
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for PatternTable<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

impl<V: Serialize> Serialize for PatternTable<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

struct PatternTableVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for PatternTableVisitor<V> {
    type Value = PatternTable<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object keyed by wildcard pattern")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut table = PatternTable::new();
        while let Some((pattern, value)) = access.next_entry::<String, V>()? {
            table.insert(pattern, value);
        }
        Ok(table)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for PatternTable<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PatternTableVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PatternTable<f32> {
        [
            ("spookynights:spectralbear-giant-*", 0.1),
            ("spookynights:spectralbear-*", 0.5),
            ("spookynights:*", 1.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_first_match_wins_in_insertion_order() {
        let table = sample();
        let giant = AssetCode::parse("spookynights:spectralbear-giant-adult");
        let brown = AssetCode::parse("spookynights:spectralbear-brown-adult");
        let wolf = AssetCode::parse("spookynights:spectralwolf-eurasian");

        assert_eq!(table.first_match(&giant).map(|(_, v)| *v), Some(0.1));
        assert_eq!(table.first_match(&brown).map(|(_, v)| *v), Some(0.5));
        assert_eq!(table.first_match(&wolf).map(|(_, v)| *v), Some(1.0));
    }

    #[test]
    fn test_broad_pattern_first_shadows_later_entries() {
        let table: PatternTable<f32> = [
            ("spookynights:*", 1.0),
            ("spookynights:spectralbear-giant-*", 0.1),
        ]
        .into_iter()
        .collect();
        let giant = AssetCode::parse("spookynights:spectralbear-giant-adult");
        let (pattern, value) = table.first_match(&giant).unwrap();
        assert_eq!(pattern, "spookynights:*");
        assert_eq!(*value, 1.0);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut table = sample();
        let old = table.insert("spookynights:spectralbear-*", 0.9);
        assert_eq!(old, Some(0.5));
        assert_eq!(table.len(), 3);
        let order: Vec<&str> = table.patterns().collect();
        assert_eq!(order[1], "spookynights:spectralbear-*");
        assert_eq!(table.get("spookynights:spectralbear-*"), Some(&0.9));
    }

    #[test]
    fn test_no_match() {
        let table = sample();
        let vanilla = AssetCode::parse("game:wolf-eurasian-adult");
        assert!(table.first_match(&vanilla).is_none());
    }

    #[test]
    fn test_json_preserves_order() {
        let json = r#"{"z-*": 1, "a-*": 2, "m-*": 3}"#;
        let table: PatternTable<u32> = serde_json::from_str(json).unwrap();
        let order: Vec<&str> = table.patterns().collect();
        assert_eq!(order, vec!["z-*", "a-*", "m-*"]);

        let out = serde_json::to_string(&table).unwrap();
        assert_eq!(out, r#"{"z-*":1,"a-*":2,"m-*":3}"#);
    }

    #[test]
    fn test_first_match_str_uses_raw_candidate() {
        let table: PatternTable<&str> = [("spectralwolf-*", "wolf"), ("*", "any")]
            .into_iter()
            .collect();
        assert_eq!(
            table.first_match_str("spectralwolf-eurasian").map(|(_, v)| *v),
            Some("wolf")
        );
        assert_eq!(table.first_match_str("spectralbear").map(|(_, v)| *v), Some("any"));
    }

    #[test]
    fn test_rejects_non_object_json() {
        let result: Result<PatternTable<f32>, _> = serde_json::from_str("[1, 2]");
        assert!(result.is_err());
    }
}
