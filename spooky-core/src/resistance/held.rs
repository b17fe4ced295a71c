use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stat bonus granted while an item is held. Applied by the host under
/// [`HELD_STAT_TAG`](crate::constants::HELD_STAT_TAG).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    /// Lowercased stat name, e.g. `walkspeed`
    pub stat: String,
    pub value: f32,
}

/// Values are numbers, though hand-written item files sometimes quote them.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStatValue {
    Number(f32),
    Text(String),
}

impl RawStatValue {
    fn value(self) -> Option<f32> {
        match self {
            Self::Number(v) => Some(v),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// `statModifiers` of a held item's attributes. Entries that are not numbers
/// are skipped; stat names are lowercased for the host's stat registry.
pub fn held_stat_modifiers(item_attributes: &Value) -> Vec<StatModifier> {
    let Some(Value::Object(entries)) = item_attributes.get("statModifiers") else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|(stat, raw)| {
            let value = RawStatValue::deserialize(raw).ok()?.value()?;
            Some(StatModifier {
                stat: stat.to_lowercase(),
                value,
            })
        })
        .collect()
}

/// What to set and what to clear after the held item changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatChanges {
    pub applied: Vec<StatModifier>,
    pub removed: Vec<String>,
}

impl StatChanges {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.removed.is_empty()
    }
}

/// Held-item stats currently applied to one player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeldStats {
    active: Vec<String>,
}

impl HeldStats {
    pub fn active(&self) -> &[String] {
        &self.active
    }

    /// Switch to a new held item (`None` for an empty hand). Stats of the
    /// previous item that the new one does not set are removed.
    pub fn update(&mut self, item_attributes: Option<&Value>) -> StatChanges {
        let applied = item_attributes.map(held_stat_modifiers).unwrap_or_default();
        let removed = self
            .active
            .iter()
            .filter(|stat| !applied.iter().any(|m| &m.stat == *stat))
            .cloned()
            .collect();
        self.active = applied.iter().map(|m| m.stat.clone()).collect();
        StatChanges { applied, removed }
    }
}
