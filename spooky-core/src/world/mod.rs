//! World-state facts read from the host at decision time.
//!
//! The decision core owns no clock. The host reports the hour, the moon,
//! the calendar and the light level at the point of interest, and every
//! spawn/loot decision is a pure function of those facts.

use serde::{Deserialize, Serialize};

use crate::constants::{DAYS_PER_WEEK, HOURS_PER_DAY};

/// Moon phases as the host calendar names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoonPhase {
    #[serde(alias = "empty")]
    New,
    Grow1,
    Grow2,
    Grow3,
    Full,
    Shrink1,
    Shrink2,
    Shrink3,
}

impl MoonPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Grow1 => "grow1",
            Self::Grow2 => "grow2",
            Self::Grow3 => "grow3",
            Self::Full => "full",
            Self::Shrink1 => "shrink1",
            Self::Shrink2 => "shrink2",
            Self::Shrink3 => "shrink3",
        }
    }

    /// Case-insensitive lookup; the host's `empty` is accepted for `new`.
    pub fn parse(name: &str) -> Option<Self> {
        let phase = match name.trim().to_ascii_lowercase().as_str() {
            "new" | "empty" => Self::New,
            "grow1" => Self::Grow1,
            "grow2" => Self::Grow2,
            "grow3" => Self::Grow3,
            "full" => Self::Full,
            "shrink1" => Self::Shrink1,
            "shrink2" => Self::Shrink2,
            "shrink3" => Self::Shrink3,
            _ => return None,
        };
        Some(phase)
    }

    pub fn all() -> [MoonPhase; 8] {
        [
            Self::New,
            Self::Grow1,
            Self::Grow2,
            Self::Grow3,
            Self::Full,
            Self::Shrink1,
            Self::Shrink2,
            Self::Shrink3,
        ]
    }

    pub fn is_full(&self) -> bool {
        *self == Self::Full
    }
}

/// How "night" is decided when spawning is restricted to night time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NightMode {
    /// Night wherever the spawn point is dark enough
    #[default]
    Auto,
    /// Night between two configured hours
    Manual,
}

impl NightMode {
    /// Lenient parse of the persisted string; unknown values fall back to `Auto`.
    pub fn from_setting(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("manual") {
            Self::Manual
        } else {
            Self::Auto
        }
    }
}

/// Snapshot of the facts a single decision depends on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldFacts {
    /// Hour of day in `[0, 24)`
    pub current_hour: f32,
    pub moon_phase: MoonPhase,
    /// Calendar month, 1-12
    pub calendar_month: u32,
    /// Day of month, 1-based
    pub day_of_month: u32,
    pub days_in_month: u32,
    /// Day of week, 0-6 (6 is the last day)
    pub day_of_week: u32,
    pub light_level: i32,
}

impl Default for WorldFacts {
    fn default() -> Self {
        Self {
            current_hour: 0.0,
            moon_phase: MoonPhase::New,
            calendar_month: 1,
            day_of_month: 1,
            days_in_month: 9,
            day_of_week: 0,
            light_level: 0,
        }
    }
}

impl WorldFacts {
    pub fn is_last_day_of_month(&self) -> bool {
        self.day_of_month == self.days_in_month
    }

    pub fn is_last_day_of_week(&self) -> bool {
        self.day_of_week == DAYS_PER_WEEK - 1
    }

    /// Same facts with the light level of another position
    pub fn with_light_level(self, light_level: i32) -> Self {
        Self {
            light_level,
            ..self
        }
    }
}

/// Raw calendar readings as the host exposes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarSnapshot {
    pub total_days: f64,
    pub days_per_month: u32,
    pub month: u32,
    pub hour_of_day: f32,
    pub moon_phase: MoonPhase,
}

impl CalendarSnapshot {
    /// Derive day-of-month and day-of-week from the running day counter.
    pub fn facts(&self, light_level: i32) -> WorldFacts {
        let days_per_month = self.days_per_month.max(1);
        let day_index = self.total_days.max(0.0).floor() as u64;
        WorldFacts {
            current_hour: self.hour_of_day.rem_euclid(HOURS_PER_DAY),
            moon_phase: self.moon_phase,
            calendar_month: self.month,
            day_of_month: (day_index % days_per_month as u64) as u32 + 1,
            days_in_month: days_per_month,
            day_of_week: (day_index % DAYS_PER_WEEK as u64) as u32,
            light_level,
        }
    }
}

/// Night window check.
///
/// Manual mode: `start > end` wraps past midnight (`hour >= start || hour < end`),
/// otherwise `start <= hour < end`. Equal bounds describe an empty window.
/// Auto mode: night wherever `light_level <= light_threshold`.
pub fn is_night(
    facts: &WorldFacts,
    mode: NightMode,
    start_hour: f32,
    end_hour: f32,
    light_threshold: i32,
) -> bool {
    match mode {
        NightMode::Manual => {
            let hour = facts.current_hour;
            if start_hour > end_hour {
                hour >= start_hour || hour < end_hour
            } else {
                start_hour <= hour && hour < end_hour
            }
        }
        NightMode::Auto => facts.light_level <= light_threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_hour(hour: f32) -> WorldFacts {
        WorldFacts {
            current_hour: hour,
            ..WorldFacts::default()
        }
    }

    #[test]
    fn test_moon_phase_parse() {
        assert_eq!(MoonPhase::parse("full"), Some(MoonPhase::Full));
        assert_eq!(MoonPhase::parse("FULL"), Some(MoonPhase::Full));
        assert_eq!(MoonPhase::parse("empty"), Some(MoonPhase::New));
        assert_eq!(MoonPhase::parse(" new "), Some(MoonPhase::New));
        assert_eq!(MoonPhase::parse("gibbous"), None);
        for phase in MoonPhase::all() {
            assert_eq!(MoonPhase::parse(phase.name()), Some(phase));
        }
    }

    #[test]
    fn test_moon_phase_serde() {
        assert_eq!(serde_json::to_string(&MoonPhase::Grow2).unwrap(), "\"grow2\"");
        let phase: MoonPhase = serde_json::from_str("\"empty\"").unwrap();
        assert_eq!(phase, MoonPhase::New);
    }

    #[test]
    fn test_night_mode_from_setting() {
        assert_eq!(NightMode::from_setting("Manual"), NightMode::Manual);
        assert_eq!(NightMode::from_setting("manual"), NightMode::Manual);
        assert_eq!(NightMode::from_setting("Auto"), NightMode::Auto);
        assert_eq!(NightMode::from_setting("sometimes"), NightMode::Auto);
    }

    #[test]
    fn test_manual_window_wraps_midnight() {
        let night = |h| is_night(&at_hour(h), NightMode::Manual, 20.0, 6.0, 7);
        assert!(night(20.0));
        assert!(night(23.5));
        assert!(night(0.0));
        assert!(night(5.99));
        assert!(!night(6.0));
        assert!(!night(12.0));
        assert!(!night(19.99));
    }

    #[test]
    fn test_manual_window_same_day() {
        let night = |h| is_night(&at_hour(h), NightMode::Manual, 1.0, 4.0, 7);
        assert!(!night(0.5));
        assert!(night(1.0));
        assert!(night(3.9));
        assert!(!night(4.0));
    }

    #[test]
    fn test_manual_window_empty_when_equal() {
        assert!(!is_night(&at_hour(5.0), NightMode::Manual, 5.0, 5.0, 7));
    }

    #[test]
    fn test_auto_uses_light_level() {
        let dark = WorldFacts::default().with_light_level(7);
        let lit = WorldFacts::default().with_light_level(8);
        assert!(is_night(&dark, NightMode::Auto, 20.0, 6.0, 7));
        assert!(!is_night(&lit, NightMode::Auto, 20.0, 6.0, 7));
    }

    #[test]
    fn test_calendar_snapshot_derivation() {
        let calendar = CalendarSnapshot {
            total_days: 26.4,
            days_per_month: 9,
            month: 10,
            hour_of_day: 22.0,
            moon_phase: MoonPhase::Full,
        };
        let facts = calendar.facts(3);
        // 26 % 9 = 8 -> ninth (last) day
        assert_eq!(facts.day_of_month, 9);
        assert!(facts.is_last_day_of_month());
        // 26 % 7 = 5
        assert_eq!(facts.day_of_week, 5);
        assert!(!facts.is_last_day_of_week());
        assert_eq!(facts.calendar_month, 10);
        assert_eq!(facts.light_level, 3);
    }

    #[test]
    fn test_calendar_last_day_of_week() {
        let calendar = CalendarSnapshot {
            total_days: 13.0,
            days_per_month: 30,
            month: 1,
            hour_of_day: 25.0,
            moon_phase: MoonPhase::New,
        };
        let facts = calendar.facts(0);
        assert!(facts.is_last_day_of_week());
        assert!((facts.current_hour - 1.0).abs() < f32::EPSILON);
    }
}
