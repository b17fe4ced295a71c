//! Warning sound for players near a giant boss.
//!
//! Runs on the client. Each boss carries a [`ProximityWarning`] that is
//! ticked with the frame delta; every couple of seconds it checks the local
//! player's distance and asks for the warning sound when the player is
//! inside the ring `(min, max]` and the cooldown has passed. The cooldown
//! runs from game time 0, so nothing plays during the first cooldown of a
//! session.

use serde_json::Value;

use crate::config::ClientConfig;
use crate::constants::{
    WARNING_CHECK_INTERVAL_SECS, WARNING_DEFAULT_COOLDOWN_MS, WARNING_DEFAULT_SOUND,
    WARNING_DEFAULT_VOLUME,
};
use crate::wildcard::AssetCode;

/// Sound the host should play at the boss.
#[derive(Debug, Clone, PartialEq)]
pub struct WarningSound {
    pub sound: String,
    pub volume: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProximityWarning {
    pub sound: String,
    pub volume: f32,
    pub cooldown_ms: f32,
    accumulator: f32,
    /// Game time of the last warning, starting at 0
    last_played_ms: u64,
}

impl Default for ProximityWarning {
    fn default() -> Self {
        Self {
            sound: WARNING_DEFAULT_SOUND.to_string(),
            volume: WARNING_DEFAULT_VOLUME,
            cooldown_ms: WARNING_DEFAULT_COOLDOWN_MS,
            accumulator: 0.0,
            last_played_ms: 0,
        }
    }
}

impl ProximityWarning {
    /// Read `sound`, `volume` and `cooldownMs` from the behavior attributes.
    pub fn from_attributes(attributes: &Value) -> Self {
        let defaults = Self::default();
        Self {
            sound: attributes
                .get("sound")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(defaults.sound),
            volume: attributes
                .get("volume")
                .and_then(Value::as_f64)
                .map(|v| v as f32)
                .unwrap_or(defaults.volume),
            cooldown_ms: attributes
                .get("cooldownMs")
                .and_then(Value::as_f64)
                .map(|v| v as f32)
                .unwrap_or(defaults.cooldown_ms),
            ..defaults
        }
    }

    /// Only giant variants warn.
    pub fn applies_to(code: &AssetCode) -> bool {
        code.path.contains("giant")
    }

    /// Advance by `delta_secs`. `distance` is `None` when there is no live
    /// local player.
    pub fn tick(
        &mut self,
        code: &AssetCode,
        client: &ClientConfig,
        delta_secs: f32,
        now_ms: u64,
        distance: Option<f64>,
    ) -> Option<WarningSound> {
        if !client.boss_warning_sound || !Self::applies_to(code) {
            return None;
        }

        self.accumulator += delta_secs;
        if self.accumulator < WARNING_CHECK_INTERVAL_SECS {
            return None;
        }
        self.accumulator = 0.0;

        if (now_ms.saturating_sub(self.last_played_ms) as f32) < self.cooldown_ms {
            return None;
        }

        let distance = distance?;
        if distance <= client.boss_warning_max_range && distance > client.boss_warning_min_range {
            self.last_played_ms = now_ms;
            return Some(WarningSound {
                sound: self.sound.clone(),
                volume: self.volume,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn giant() -> AssetCode {
        AssetCode::parse("spookynights:spectralbear-giant-adult-male")
    }

    #[test]
    fn test_warns_inside_ring_after_interval() {
        let client = ClientConfig::default();
        let mut warning = ProximityWarning::default();
        assert!(warning.tick(&giant(), &client, 1.0, 11_000, Some(20.0)).is_none());
        let sound = warning.tick(&giant(), &client, 1.0, 12_000, Some(20.0)).unwrap();
        assert_eq!(sound.sound, WARNING_DEFAULT_SOUND);
    }

    #[test]
    fn test_ring_bounds() {
        let client = ClientConfig::default();
        let check = |d| {
            let mut w = ProximityWarning::default();
            w.tick(&giant(), &client, 2.0, 20_000, Some(d)).is_some()
        };
        assert!(!check(10.0));
        assert!(check(10.5));
        assert!(check(35.0));
        assert!(!check(35.1));
    }

    #[test]
    fn test_cooldown() {
        let client = ClientConfig::default();
        let mut warning = ProximityWarning::default();
        assert!(warning.tick(&giant(), &client, 2.0, 10_000, Some(20.0)).is_some());
        assert!(warning.tick(&giant(), &client, 2.0, 15_000, Some(20.0)).is_none());
        assert!(warning.tick(&giant(), &client, 2.0, 20_000, Some(20.0)).is_some());
    }

    #[test]
    fn test_silent_during_first_cooldown() {
        let client = ClientConfig::default();
        let mut warning = ProximityWarning::default();
        assert!(warning.tick(&giant(), &client, 2.0, 2_000, Some(20.0)).is_none());
        assert!(warning.tick(&giant(), &client, 2.0, 9_999, Some(20.0)).is_none());
        assert!(warning.tick(&giant(), &client, 2.0, 10_000, Some(20.0)).is_some());
    }

    #[test]
    fn test_disabled_or_not_giant() {
        let mut warning = ProximityWarning::default();
        let off = ClientConfig {
            boss_warning_sound: false,
            ..ClientConfig::default()
        };
        assert!(warning.tick(&giant(), &off, 5.0, 30_000, Some(20.0)).is_none());

        let brown = AssetCode::parse("spookynights:spectralbear-brown-adult-male");
        assert!(warning
            .tick(&brown, &ClientConfig::default(), 5.0, 30_000, Some(20.0))
            .is_none());
    }

    #[test]
    fn test_no_player() {
        let mut warning = ProximityWarning::default();
        assert!(warning
            .tick(&giant(), &ClientConfig::default(), 5.0, 30_000, None)
            .is_none());
    }

    #[test]
    fn test_attributes() {
        let warning = ProximityWarning::from_attributes(&json!({
            "sound": "spookynights:sounds/roar",
            "cooldownMs": 500
        }));
        assert_eq!(warning.sound, "spookynights:sounds/roar");
        assert_eq!(warning.cooldown_ms, 500.0);
        assert_eq!(warning.volume, WARNING_DEFAULT_VOLUME);
    }
}
