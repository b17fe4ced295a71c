//! Spectral creatures shrug off ordinary weapons.
//!
//! Incoming damage is scaled by the creature's `resistance` attribute unless
//! the attacking player holds a weapon with a positive `spectralDamageBonus`,
//! in which case that bonus is the multiplier instead.
//!
//! Spectral weapons can also carry `statModifiers`, applied to the player for
//! as long as the weapon is in hand (see [`HeldStats`]).

mod held;

pub use held::{held_stat_modifiers, HeldStats, StatChanges, StatModifier};

use serde_json::Value;

use crate::constants::DEFAULT_SPECTRAL_RESISTANCE;

/// Multiplier for one hit. A bonus of 0 (or below) means "no spectral weapon".
pub fn spectral_damage_multiplier(resistance: f32, weapon_bonus: f32) -> f32 {
    if weapon_bonus > 0.0 {
        weapon_bonus
    } else {
        resistance
    }
}

/// `spectralDamageBonus` of a held item's attributes; 0 when absent.
pub fn weapon_bonus(item_attributes: Option<&Value>) -> f32 {
    item_attributes
        .and_then(|attrs| attrs.get("spectralDamageBonus"))
        .and_then(Value::as_f64)
        .map(|bonus| bonus as f32)
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralResistance {
    pub resistance: f32,
}

impl Default for SpectralResistance {
    fn default() -> Self {
        Self {
            resistance: DEFAULT_SPECTRAL_RESISTANCE,
        }
    }
}

impl SpectralResistance {
    /// Read the `resistance` entity attribute, defaulting to half damage.
    pub fn from_attributes(attributes: &Value) -> Self {
        let resistance = attributes
            .get("resistance")
            .and_then(Value::as_f64)
            .map(|r| r as f32)
            .unwrap_or(DEFAULT_SPECTRAL_RESISTANCE);
        Self { resistance }
    }

    /// Damage after resistance. `weapon` is the attacking player's held item,
    /// `None` for non-player attackers.
    pub fn apply(&self, damage: f32, weapon: Option<&Value>) -> f32 {
        damage * spectral_damage_multiplier(self.resistance, weapon_bonus(weapon))
    }
}
