//! Custom drops of spectral creatures.
//!
//! Drop tables come from entity metadata, not from the server config:
//!
//! ```json
//! {
//!   "drops": {
//!     "spectralwolf-*": [
//!       { "type": "item", "code": "game:bone", "quantity": { "avg": 2, "var": 1 } }
//!     ]
//!   },
//!   "glowColor": [120, 200, 255, 255]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::constants::{MOD_DOMAIN, SPECTRAL_FAMILIES};
use crate::random::RandomSource;
use crate::wildcard::{AssetCode, PatternTable};

/// Whether a creature belongs to one of the spectral families.
pub fn is_spectral(code: &AssetCode) -> bool {
    code.in_domain(MOD_DOMAIN)
        && SPECTRAL_FAMILIES
            .iter()
            .any(|family| code.path.starts_with(family))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropKind {
    #[default]
    Item,
    Block,
}

/// Average and spread of a drop quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantitySpec {
    #[serde(default = "one")]
    pub avg: f32,
    #[serde(default)]
    pub var: f32,
}

fn one() -> f32 {
    1.0
}

impl Default for QuantitySpec {
    fn default() -> Self {
        Self { avg: 1.0, var: 0.0 }
    }
}

impl QuantitySpec {
    /// `avg + roll * var - var / 2`, before rounding
    pub fn sample(&self, rng: &mut dyn RandomSource) -> f64 {
        let (avg, var) = (self.avg as f64, self.var as f64);
        avg + rng.next_f64() * var - var / 2.0
    }
}

/// Truncate, then round up with probability equal to the dropped fraction.
pub fn round_quantity(raw: f64, rng: &mut dyn RandomSource) -> i64 {
    let whole = raw.trunc();
    let frac = raw - whole;
    let mut qty = whole as i64;
    if rng.next_f64() < frac {
        qty += 1;
    }
    qty
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropEntry {
    #[serde(rename = "type", default)]
    pub kind: DropKind,
    pub code: String,
    #[serde(default)]
    pub quantity: QuantitySpec,
}

/// RGBA glow of the vanish effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlowColor(pub [u8; 4]);

impl GlowColor {
    pub const SPECTRAL: GlowColor = GlowColor([160, 220, 255, 255]);
}

impl Default for GlowColor {
    fn default() -> Self {
        Self::SPECTRAL
    }
}

/// Drop tables and glow color of one spectral entity type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpectralProfile {
    /// Path pattern -> drops
    #[serde(default)]
    pub drops: PatternTable<Vec<DropEntry>>,
    #[serde(rename = "glowColor", default)]
    pub glow_color: Option<GlowColor>,
}

impl SpectralProfile {
    /// `None` for malformed metadata, which means "no custom drops".
    pub fn from_attributes(attributes: &Value) -> Option<Self> {
        match Self::deserialize(attributes) {
            Ok(profile) => Some(profile),
            Err(e) => {
                debug!(error = %e, "ignoring malformed spectral drop metadata");
                None
            }
        }
    }

    /// Drops for a creature, keyed on its path.
    pub fn drops_for(&self, code: &AssetCode) -> &[DropEntry] {
        self.drops
            .first_match_str(&code.path)
            .map(|(_, drops)| drops.as_slice())
            .unwrap_or(&[])
    }

    pub fn glow(&self) -> GlowColor {
        self.glow_color.unwrap_or_default()
    }
}

/// One possible outcome of a randomizer container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedStack {
    pub code: String,
    #[serde(rename = "type", default)]
    pub kind: DropKind,
    #[serde(default = "one")]
    pub weight: f32,
    /// Stack size per unit of the container
    #[serde(default = "one_u32")]
    pub size: u32,
}

fn one_u32() -> u32 {
    1
}

/// Randomizer container codes and their possible contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Randomizers {
    containers: HashMap<String, Vec<WeightedStack>>,
}

impl Randomizers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, code: impl Into<String>, stacks: Vec<WeightedStack>) {
        self.containers.insert(code.into(), stacks);
    }

    pub fn is_randomizer(&self, code: &str) -> bool {
        self.containers.contains_key(code)
    }

    /// Pick one stack by weight. `None` when the container is unknown or has
    /// no positive weight.
    pub fn resolve(&self, code: &str, rng: &mut dyn RandomSource) -> Option<&WeightedStack> {
        let stacks = self.containers.get(code)?;
        let total: f64 = stacks.iter().map(|s| s.weight.max(0.0) as f64).sum();
        if total <= 0.0 {
            return None;
        }
        let mut pick = rng.next_f64() * total;
        let mut last = None;
        for stack in stacks.iter().filter(|s| s.weight > 0.0) {
            let weight = stack.weight as f64;
            if pick < weight {
                return Some(stack);
            }
            pick -= weight;
            last = Some(stack);
        }
        last
    }
}
