//! Copy-forward config migration.
//!
//! An older document is never rewritten in place. Instead a fresh default
//! config is built and every field of the old document that still means
//! something is copied onto it:
//! - `SpawnMultipliers` entries are kept only for patterns the current
//!   defaults know (after renaming `spectralbear-*` to `spectralbear-brown-*`)
//! - `Bosses` and `CandyLootTable` are taken whole
//! - legacy `BearSpawnConfig` becomes the giant bear boss rule
//! - legacy `HalloweenEventOnly: true` becomes `AllowedCandyMonths: [10]`
//!
//! The first field that fails to convert stops the copy. Fields copied
//! before it are kept, the rest stay at their defaults.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::defaults::GIANT_BEAR_PATTERN;
use super::{BossRule, ClientConfig, ServerConfig};
use crate::wildcard::PatternTable;
use crate::world::NightMode;

/// Multiplier patterns renamed between releases (old -> new).
const MULTIPLIER_RENAMES: [(&str, &str); 1] = [(
    "spookynights:spectralbear-*",
    "spookynights:spectralbear-brown-*",
)];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MigrationError {
    #[error("config document is not a JSON object")]
    NotAnObject,
    #[error("field `{key}` could not be read: {detail}")]
    InvalidField { key: String, detail: String },
}

/// What a migration run did.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MigrationReport {
    /// `Version` of the source document, if it had one
    pub original_version: Option<String>,
    /// Keys copied onto the defaults, in copy order
    pub steps_applied: Vec<String>,
    /// Set when the copy stopped early
    #[serde(skip)]
    pub error: Option<MigrationError>,
}

impl MigrationReport {
    fn new(original_version: Option<String>) -> Self {
        Self {
            original_version,
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// `Version` string of a stored document.
pub fn version_of(doc: &Value) -> Option<String> {
    doc.get("Version").and_then(Value::as_str).map(str::to_string)
}

/// Typed read access to the optional fields of a stored document.
struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    fn new(doc: &'a Value) -> Result<Self, MigrationError> {
        doc.as_object()
            .map(|fields| Self { fields })
            .ok_or(MigrationError::NotAnObject)
    }

    /// `Ok(None)` when the key is absent or null.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, MigrationError> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|e| MigrationError::InvalidField {
                    key: key.to_string(),
                    detail: e.to_string(),
                }),
        }
    }

    fn copy<T: DeserializeOwned>(
        &self,
        key: &str,
        target: &mut T,
        report: &mut MigrationReport,
    ) -> Result<(), MigrationError> {
        if let Some(value) = self.get(key)? {
            *target = value;
            report.steps_applied.push(key.to_string());
        }
        Ok(())
    }
}

fn rename_multiplier_key(pattern: &str) -> &str {
    MULTIPLIER_RENAMES
        .iter()
        .find(|(old, _)| *old == pattern)
        .map(|(_, new)| *new)
        .unwrap_or(pattern)
}

/// Build a current server config from an older (or legacy) document.
pub fn migrate_server_config(doc: &Value) -> (ServerConfig, MigrationReport) {
    let mut config = ServerConfig::default();
    let mut report = MigrationReport::new(version_of(doc));

    if let Err(e) = copy_server_fields(doc, &mut config, &mut report) {
        warn!(
            error = %e,
            copied = report.steps_applied.len(),
            "server config migration stopped early, remaining fields keep defaults"
        );
        report.error = Some(e);
    }
    (config, report)
}

fn copy_server_fields(
    doc: &Value,
    config: &mut ServerConfig,
    report: &mut MigrationReport,
) -> Result<(), MigrationError> {
    let reader = FieldReader::new(doc)?;

    reader.copy("EnableCandyLoot", &mut config.candy_loot_enabled, report)?;
    match reader.get::<bool>("HalloweenEventOnly")? {
        Some(true) => {
            config.candy_eligible_months = vec![10];
            report.steps_applied.push("HalloweenEventOnly".to_string());
        }
        _ => reader.copy("AllowedCandyMonths", &mut config.candy_eligible_months, report)?,
    }
    reader.copy("CandyOnlyOnFullMoon", &mut config.candy_requires_full_moon, report)?;
    reader.copy("CandyLootTable", &mut config.candy_loot_table, report)?;

    if let Some(old) = reader.get::<PatternTable<f32>>("SpawnMultipliers")? {
        for (pattern, multiplier) in old.iter() {
            let renamed = rename_multiplier_key(pattern);
            if config.spawn_multipliers.contains(renamed) {
                config.spawn_multipliers.insert(renamed, *multiplier);
            }
        }
        report.steps_applied.push("SpawnMultipliers".to_string());
    }

    reader.copy("UseTimeBasedSpawning", &mut config.spawn_gating_enabled, report)?;
    reader.copy("SpawnOnlyAtNight", &mut config.night_only, report)?;
    if let Some(mode) = reader.get::<String>("NightTimeMode")? {
        config.night_mode = NightMode::from_setting(&mode);
        report.steps_applied.push("NightTimeMode".to_string());
    }
    reader.copy("NightStartHour", &mut config.manual_night_start_hour, report)?;
    reader.copy("NightEndHour", &mut config.manual_night_end_hour, report)?;
    reader.copy("LightLevelThreshold", &mut config.light_level_threshold, report)?;
    reader.copy("AllowedSpawnMonths", &mut config.allowed_spawn_months, report)?;
    reader.copy(
        "SpawnOnlyOnLastDayOfMonth",
        &mut config.last_day_of_month_only,
        report,
    )?;
    reader.copy(
        "SpawnOnlyOnLastDayOfWeek",
        &mut config.last_day_of_week_only,
        report,
    )?;
    reader.copy("SpawnOnlyOnFullMoon", &mut config.full_moon_only, report)?;
    reader.copy(
        "FullMoonSpawnMultiplier",
        &mut config.full_moon_spawn_multiplier,
        report,
    )?;
    reader.copy("Bosses", &mut config.boss_rules, report)?;

    // Pre-split documents carried a single bear rule
    if let Some(bear) = reader.get::<BossRule>("BearSpawnConfig")? {
        config.boss_rules.insert(GIANT_BEAR_PATTERN, bear);
        report.steps_applied.push("BearSpawnConfig".to_string());
    }

    reader.copy("EnableDebugLogging", &mut config.enable_debug_logging, report)?;
    Ok(())
}

/// Merge a stored client document onto the current client defaults.
pub fn merge_client_config(doc: &Value) -> (ClientConfig, MigrationReport) {
    let mut config = ClientConfig::default();
    let mut report = MigrationReport::new(version_of(doc));

    let result = FieldReader::new(doc).and_then(|reader| {
        reader.copy(
            "EnableJackOLanternParticles",
            &mut config.jack_o_lantern_particles,
            &mut report,
        )?;
        reader.copy(
            "EnableBossWarningSound",
            &mut config.boss_warning_sound,
            &mut report,
        )?;
        reader.copy(
            "BossWarningMaxRange",
            &mut config.boss_warning_max_range,
            &mut report,
        )?;
        reader.copy(
            "BossWarningMinRange",
            &mut config.boss_warning_min_range,
            &mut report,
        )
    });

    if let Err(e) = result {
        warn!(error = %e, "client config merge stopped early, remaining fields keep defaults");
        report.error = Some(e);
    }
    (config, report)
}
