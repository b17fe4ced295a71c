//! Spawn gating for the mod's creatures.
//!
//! The host asks [`SpawnGate::evaluate`] once per spawn attempt. Rules run in
//! a fixed order and the first failing rule denies:
//! 1. foreign domains are never gated
//! 2. with gating off, skip straight to the multiplier
//! 3. boss rules (first matching pattern only): disabled or wrong moon denies
//! 4. for non-bosses: full moon, night window, month, last day of month/week
//! 5. multiplier lookup (first matching pattern); no entry allows
//! 6. full-moon bonus for non-bosses when gating is on
//! 7. `<= 0` denies, `>= 1` allows, otherwise one roll decides
//!
//! [`DaylightSweep`] re-checks the night and boss moon rules for creatures
//! that are already loaded.

mod sweep;

pub use sweep::DaylightSweep;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::ServerConfig;
use crate::constants::MOD_DOMAIN;
use crate::random::RandomSource;
use crate::wildcard::AssetCode;
use crate::world::{is_night, WorldFacts};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnDecision {
    Allow,
    Deny,
}

impl SpawnDecision {
    pub fn is_allowed(&self) -> bool {
        *self == Self::Allow
    }
}

/// Rule that settled a spawn decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpawnReason {
    ForeignDomain,
    BossDisabled { pattern: String },
    BossMoonPhase { pattern: String },
    NotFullMoon,
    NotNight,
    MonthNotAllowed,
    NotLastDayOfMonth,
    NotLastDayOfWeek,
    /// No multiplier entry matched
    NoMultiplier,
    MultiplierNonPositive { multiplier: f32 },
    MultiplierCertain { multiplier: f32 },
    Rolled { roll: f64, multiplier: f32 },
}

impl fmt::Display for SpawnReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignDomain => write!(f, "not a {MOD_DOMAIN} creature"),
            Self::BossDisabled { pattern } => write!(f, "boss rule {pattern} is disabled"),
            Self::BossMoonPhase { pattern } => {
                write!(f, "boss rule {pattern} does not allow this moon phase")
            }
            Self::NotFullMoon => write!(f, "full moon only"),
            Self::NotNight => write!(f, "night only"),
            Self::MonthNotAllowed => write!(f, "month not allowed"),
            Self::NotLastDayOfMonth => write!(f, "last day of month only"),
            Self::NotLastDayOfWeek => write!(f, "last day of week only"),
            Self::NoMultiplier => write!(f, "no multiplier entry"),
            Self::MultiplierNonPositive { multiplier } => write!(f, "multiplier {multiplier}"),
            Self::MultiplierCertain { multiplier } => write!(f, "multiplier {multiplier}"),
            Self::Rolled { roll, multiplier } => {
                write!(f, "rolled {roll:.3} against {multiplier}")
            }
        }
    }
}

/// Decision plus the rule that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub decision: SpawnDecision,
    pub reason: SpawnReason,
    pub is_boss: bool,
    /// Effective multiplier after the full-moon bonus, if one applied
    pub multiplier: Option<f32>,
}

impl Verdict {
    fn deny(reason: SpawnReason, is_boss: bool) -> Self {
        Self {
            decision: SpawnDecision::Deny,
            reason,
            is_boss,
            multiplier: None,
        }
    }
}

/// Outcome of the boss rule lookup.
pub(crate) enum BossCheck {
    NotBoss,
    Allowed,
    Denied(SpawnReason),
}

/// Night/moon/calendar evaluator over an immutable config.
#[derive(Debug, Clone)]
pub struct SpawnGate {
    config: Arc<ServerConfig>,
}

impl SpawnGate {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        code: &AssetCode,
        facts: &WorldFacts,
        rng: &mut dyn RandomSource,
    ) -> SpawnDecision {
        self.assess(code, facts, rng).decision
    }

    /// Full verdict for one spawn attempt.
    pub fn assess(
        &self,
        code: &AssetCode,
        facts: &WorldFacts,
        rng: &mut dyn RandomSource,
    ) -> Verdict {
        let verdict = self.decide(code, facts, rng);
        if self.config.enable_debug_logging {
            debug!(
                code = %code,
                decision = ?verdict.decision,
                reason = %verdict.reason,
                moon = facts.moon_phase.name(),
                hour = facts.current_hour,
                light = facts.light_level,
                "spawn check"
            );
        }
        verdict
    }

    fn decide(&self, code: &AssetCode, facts: &WorldFacts, rng: &mut dyn RandomSource) -> Verdict {
        if !code.in_domain(MOD_DOMAIN) {
            return Verdict {
                decision: SpawnDecision::Allow,
                reason: SpawnReason::ForeignDomain,
                is_boss: false,
                multiplier: None,
            };
        }

        let config = &self.config;
        let mut is_boss = false;

        if config.spawn_gating_enabled {
            match self.boss_check(code, facts) {
                BossCheck::Denied(reason) => return Verdict::deny(reason, true),
                BossCheck::Allowed => is_boss = true,
                BossCheck::NotBoss => {}
            }

            if !is_boss {
                if let Some(reason) = self.calendar_denial(facts) {
                    return Verdict::deny(reason, false);
                }
            }
        }

        let Some((_, mut multiplier)) = config.multiplier_for(code) else {
            return Verdict {
                decision: SpawnDecision::Allow,
                reason: SpawnReason::NoMultiplier,
                is_boss,
                multiplier: None,
            };
        };

        if config.spawn_gating_enabled
            && !is_boss
            && !config.full_moon_only
            && facts.moon_phase.is_full()
        {
            multiplier *= config.full_moon_multiplier();
        }

        let (decision, reason) = if multiplier <= 0.0 {
            (
                SpawnDecision::Deny,
                SpawnReason::MultiplierNonPositive { multiplier },
            )
        } else if multiplier >= 1.0 {
            (
                SpawnDecision::Allow,
                SpawnReason::MultiplierCertain { multiplier },
            )
        } else {
            let roll = rng.next_f64();
            let decision = if roll <= multiplier as f64 {
                SpawnDecision::Allow
            } else {
                SpawnDecision::Deny
            };
            (decision, SpawnReason::Rolled { roll, multiplier })
        };

        Verdict {
            decision,
            reason,
            is_boss,
            multiplier: Some(multiplier),
        }
    }

    /// First matching boss rule decides; later rules are never consulted.
    pub(crate) fn boss_check(&self, code: &AssetCode, facts: &WorldFacts) -> BossCheck {
        match self.config.boss_rule_for(code) {
            None => BossCheck::NotBoss,
            Some((pattern, rule)) if !rule.enabled => BossCheck::Denied(SpawnReason::BossDisabled {
                pattern: pattern.to_string(),
            }),
            Some((pattern, rule)) if !rule.allows_phase(facts.moon_phase) => {
                BossCheck::Denied(SpawnReason::BossMoonPhase {
                    pattern: pattern.to_string(),
                })
            }
            Some(_) => BossCheck::Allowed,
        }
    }

    pub(crate) fn night_now(&self, facts: &WorldFacts) -> bool {
        let config = &self.config;
        is_night(
            facts,
            config.night_mode,
            config.night_start_hour(),
            config.night_end_hour(),
            config.light_threshold(),
        )
    }

    fn calendar_denial(&self, facts: &WorldFacts) -> Option<SpawnReason> {
        let config = &self.config;
        if config.full_moon_only && !facts.moon_phase.is_full() {
            return Some(SpawnReason::NotFullMoon);
        }
        if config.night_only && !self.night_now(facts) {
            return Some(SpawnReason::NotNight);
        }
        if !config.spawn_month_allowed(facts.calendar_month) {
            return Some(SpawnReason::MonthNotAllowed);
        }
        if config.last_day_of_month_only && !facts.is_last_day_of_month() {
            return Some(SpawnReason::NotLastDayOfMonth);
        }
        if config.last_day_of_week_only && !facts.is_last_day_of_week() {
            return Some(SpawnReason::NotLastDayOfWeek);
        }
        None
    }
}
