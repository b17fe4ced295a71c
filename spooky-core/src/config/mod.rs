//! Versioned mod configuration.
//!
//! Two persisted documents:
//! - `spookynights-server.json` ([`ServerConfig`]): spawn gating, multipliers,
//!   boss rules and candy loot
//! - `spookynights-client.json` ([`ClientConfig`]): cosmetic toggles and the
//!   boss warning sound range
//!
//! Both carry a `Version` string. A mismatch against the running release
//! triggers a copy-forward migration (see [`migration`]) and the migrated
//! document replaces the stored one. After startup the config is shared
//! read-only (`Arc<ServerConfig>`); gameplay never mutates it.

mod defaults;
pub mod load;
pub mod migration;
pub mod store;

pub use defaults::{default_boss_rules, default_candy_loot_table, default_spawn_multipliers};
pub use load::{load_client_config, load_server_config, ConfigSource, LoadReport};
pub use migration::{merge_client_config, migrate_server_config, MigrationError, MigrationReport};
pub use store::{ConfigStore, ConfigStoreError, FileConfigStore, MemoryConfigStore};

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{
    CLIENT_CONFIG_VERSION, HOURS_PER_DAY, MAX_LIGHT_LEVEL, SERVER_CONFIG_VERSION,
};
use crate::wildcard::{AssetCode, PatternTable};
use crate::world::{MoonPhase, NightMode};

/// Per-pattern boss override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BossRule {
    pub enabled: bool,
    /// Phase names; empty means every phase is allowed
    pub allowed_moon_phases: Vec<String>,
}

impl Default for BossRule {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_moon_phases: Vec::new(),
        }
    }
}

impl BossRule {
    pub fn full_moon_only() -> Self {
        Self {
            enabled: true,
            allowed_moon_phases: vec![MoonPhase::Full.name().to_string()],
        }
    }

    /// Unknown phase names never match.
    pub fn allows_phase(&self, phase: MoonPhase) -> bool {
        self.allowed_moon_phases.is_empty()
            || self
                .allowed_moon_phases
                .iter()
                .any(|name| MoonPhase::parse(name) == Some(phase))
    }
}

/// Server-side settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ServerConfig {
    pub version: String,

    #[serde(rename = "EnableCandyLoot")]
    pub candy_loot_enabled: bool,
    /// Months (1-12) in which kills can drop candy; empty allows all
    #[serde(rename = "AllowedCandyMonths")]
    pub candy_eligible_months: Vec<u32>,
    #[serde(rename = "CandyOnlyOnFullMoon")]
    pub candy_requires_full_moon: bool,
    /// Pattern -> `"chance@min-max"` candy rule
    pub candy_loot_table: PatternTable<String>,

    /// Pattern -> spawn multiplier (0 never, >= 1 always, fraction = chance)
    pub spawn_multipliers: PatternTable<f32>,

    /// Master switch for every time/calendar/moon rule
    #[serde(rename = "UseTimeBasedSpawning")]
    pub spawn_gating_enabled: bool,
    #[serde(rename = "SpawnOnlyAtNight")]
    pub night_only: bool,
    #[serde(rename = "NightTimeMode", deserialize_with = "lenient_night_mode")]
    pub night_mode: NightMode,
    #[serde(rename = "NightStartHour")]
    pub manual_night_start_hour: f32,
    #[serde(rename = "NightEndHour")]
    pub manual_night_end_hour: f32,
    pub light_level_threshold: i32,
    /// Months (1-12) in which spawns are allowed; empty allows all
    pub allowed_spawn_months: Vec<u32>,
    #[serde(rename = "SpawnOnlyOnLastDayOfMonth")]
    pub last_day_of_month_only: bool,
    #[serde(rename = "SpawnOnlyOnLastDayOfWeek")]
    pub last_day_of_week_only: bool,
    #[serde(rename = "SpawnOnlyOnFullMoon")]
    pub full_moon_only: bool,
    pub full_moon_spawn_multiplier: f32,

    #[serde(rename = "Bosses")]
    pub boss_rules: PatternTable<BossRule>,

    pub enable_debug_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: SERVER_CONFIG_VERSION.to_string(),
            candy_loot_enabled: true,
            candy_eligible_months: vec![10],
            candy_requires_full_moon: false,
            candy_loot_table: default_candy_loot_table(),
            spawn_multipliers: default_spawn_multipliers(),
            spawn_gating_enabled: true,
            night_only: true,
            night_mode: NightMode::Auto,
            manual_night_start_hour: 20.0,
            manual_night_end_hour: 6.0,
            light_level_threshold: 7,
            allowed_spawn_months: Vec::new(),
            last_day_of_month_only: false,
            last_day_of_week_only: false,
            full_moon_only: false,
            full_moon_spawn_multiplier: 2.0,
            boss_rules: default_boss_rules(),
            enable_debug_logging: false,
        }
    }
}

impl ServerConfig {
    /// Manual night start, normalised into `[0, 24)`
    pub fn night_start_hour(&self) -> f32 {
        normalize_hour(self.manual_night_start_hour, 20.0)
    }

    /// Manual night end, normalised into `[0, 24)`
    pub fn night_end_hour(&self) -> f32 {
        normalize_hour(self.manual_night_end_hour, 6.0)
    }

    /// Light threshold clamped to the host's light range
    pub fn light_threshold(&self) -> i32 {
        self.light_level_threshold.clamp(0, MAX_LIGHT_LEVEL)
    }

    /// First matching multiplier entry; negative values read as 0.
    pub fn multiplier_for(&self, code: &AssetCode) -> Option<(&str, f32)> {
        self.spawn_multipliers
            .first_match(code)
            .map(|(pattern, m)| (pattern, clamp_multiplier(*m)))
    }

    pub fn full_moon_multiplier(&self) -> f32 {
        clamp_multiplier(self.full_moon_spawn_multiplier)
    }

    pub fn boss_rule_for(&self, code: &AssetCode) -> Option<(&str, &BossRule)> {
        self.boss_rules.first_match(code)
    }

    pub fn candy_month_allowed(&self, month: u32) -> bool {
        self.candy_eligible_months.is_empty() || self.candy_eligible_months.contains(&month)
    }

    pub fn spawn_month_allowed(&self, month: u32) -> bool {
        self.allowed_spawn_months.is_empty() || self.allowed_spawn_months.contains(&month)
    }
}

/// Client-side settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ClientConfig {
    pub version: String,
    #[serde(rename = "EnableJackOLanternParticles")]
    pub jack_o_lantern_particles: bool,
    #[serde(rename = "EnableBossWarningSound")]
    pub boss_warning_sound: bool,
    pub boss_warning_max_range: f64,
    pub boss_warning_min_range: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: CLIENT_CONFIG_VERSION.to_string(),
            jack_o_lantern_particles: true,
            boss_warning_sound: true,
            boss_warning_max_range: 35.0,
            boss_warning_min_range: 10.0,
        }
    }
}

fn normalize_hour(hour: f32, fallback: f32) -> f32 {
    if hour.is_finite() {
        hour.rem_euclid(HOURS_PER_DAY)
    } else {
        fallback
    }
}

fn clamp_multiplier(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

fn lenient_night_mode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NightMode, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(NightMode::from_setting(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.version, SERVER_CONFIG_VERSION);
        assert!(config.candy_loot_enabled);
        assert_eq!(config.candy_eligible_months, vec![10]);
        assert!(config.spawn_gating_enabled);
        assert!(config.night_only);
        assert_eq!(config.night_mode, NightMode::Auto);
        assert_eq!(config.light_level_threshold, 7);
        assert_eq!(config.spawn_multipliers.len(), 6);
        assert_eq!(config.boss_rules.len(), 1);
        assert_eq!(config.candy_loot_table.len(), 23);
        assert!((config.full_moon_spawn_multiplier - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_server_json_keys() {
        let value = serde_json::to_value(ServerConfig::default()).unwrap();
        for key in [
            "Version",
            "EnableCandyLoot",
            "AllowedCandyMonths",
            "CandyOnlyOnFullMoon",
            "CandyLootTable",
            "SpawnMultipliers",
            "UseTimeBasedSpawning",
            "SpawnOnlyAtNight",
            "NightTimeMode",
            "NightStartHour",
            "NightEndHour",
            "LightLevelThreshold",
            "AllowedSpawnMonths",
            "SpawnOnlyOnLastDayOfMonth",
            "SpawnOnlyOnLastDayOfWeek",
            "SpawnOnlyOnFullMoon",
            "FullMoonSpawnMultiplier",
            "Bosses",
            "EnableDebugLogging",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["NightTimeMode"], "Auto");
        assert_eq!(
            value["Bosses"]["spookynights:spectralbear-giant-*"]["AllowedMoonPhases"][0],
            "full"
        );
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: ServerConfig =
            serde_json::from_str(r#"{"Version": "1.4.0", "SpawnOnlyAtNight": false}"#).unwrap();
        assert!(!config.night_only);
        assert_eq!(config.spawn_multipliers, default_spawn_multipliers());
    }

    #[test]
    fn test_unknown_night_mode_reads_as_auto() {
        let config: ServerConfig =
            serde_json::from_str(r#"{"NightTimeMode": "Whenever"}"#).unwrap();
        assert_eq!(config.night_mode, NightMode::Auto);
        let config: ServerConfig = serde_json::from_str(r#"{"NightTimeMode": "manual"}"#).unwrap();
        assert_eq!(config.night_mode, NightMode::Manual);
    }

    #[test]
    fn test_clamped_reads() {
        let config = ServerConfig {
            light_level_threshold: 99,
            manual_night_start_hour: 26.0,
            manual_night_end_hour: -2.0,
            full_moon_spawn_multiplier: -1.0,
            ..ServerConfig::default()
        };
        assert_eq!(config.light_threshold(), 32);
        assert!((config.night_start_hour() - 2.0).abs() < 1e-5);
        assert!((config.night_end_hour() - 22.0).abs() < 1e-5);
        assert_eq!(config.full_moon_multiplier(), 0.0);

        let negative = ServerConfig {
            light_level_threshold: -5,
            ..ServerConfig::default()
        };
        assert_eq!(negative.light_threshold(), 0);
    }

    #[test]
    fn test_negative_multiplier_reads_as_zero() {
        let mut config = ServerConfig::default();
        config
            .spawn_multipliers
            .insert("spookynights:spectralwolf-*", -3.0);
        let wolf = AssetCode::parse("spookynights:spectralwolf-eurasian-adult-male");
        let (pattern, m) = config.multiplier_for(&wolf).unwrap();
        assert_eq!(pattern, "spookynights:spectralwolf-*");
        assert_eq!(m, 0.0);
    }

    #[test]
    fn test_boss_rule_phases() {
        let open = BossRule::default();
        assert!(MoonPhase::all().iter().all(|p| open.allows_phase(*p)));

        let full = BossRule::full_moon_only();
        assert!(full.allows_phase(MoonPhase::Full));
        assert!(!full.allows_phase(MoonPhase::New));

        let typo = BossRule {
            enabled: true,
            allowed_moon_phases: vec!["fulll".into()],
        };
        assert!(!typo.allows_phase(MoonPhase::Full));
    }

    #[test]
    fn test_month_filters() {
        let config = ServerConfig {
            allowed_spawn_months: vec![],
            candy_eligible_months: vec![10, 11],
            ..ServerConfig::default()
        };
        assert!(config.spawn_month_allowed(3));
        assert!(config.candy_month_allowed(11));
        assert!(!config.candy_month_allowed(5));
    }

    #[test]
    fn test_client_defaults_and_keys() {
        let client = ClientConfig::default();
        assert_eq!(client.version, CLIENT_CONFIG_VERSION);
        let value = serde_json::to_value(&client).unwrap();
        assert_eq!(value["EnableJackOLanternParticles"], true);
        assert_eq!(value["EnableBossWarningSound"], true);
        assert_eq!(value["BossWarningMaxRange"], 35.0);
        assert_eq!(value["BossWarningMinRange"], 10.0);
    }
}
