//! What eating a candy does to the eater.
//!
//! Resolution only decides; the host applies each [`CandyAction`] to the
//! player (stats, healing, chat messages, particles) and schedules the
//! removal of timed stat modifiers.

use serde::{Deserialize, Serialize};

use super::GlowColor;
use crate::constants::{CANDY_EAT_SECONDS, CANDY_STABILITY_CAP, MOD_DOMAIN};
use crate::random::RandomSource;
use crate::wildcard::AssetCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandyKind {
    GhostCaramel,
    ShadowCube,
    Mummy,
    SpiderGummy,
    VampireTeeth,
}

impl CandyKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "ghostcaramel" => Self::GhostCaramel,
            "shadowcube" => Self::ShadowCube,
            "mummy" => Self::Mummy,
            "spidergummy" => Self::SpiderGummy,
            "vampireteeth" => Self::VampireTeeth,
            _ => return None,
        };
        Some(kind)
    }

    /// Candy type of an item code such as `spookynights:spookycandy-mummy`.
    pub fn of(code: &AssetCode) -> Option<Self> {
        if !code.in_domain(MOD_DOMAIN) {
            return None;
        }
        code.variants().nth(1).and_then(Self::from_name)
    }

    /// Eating particles, RGBA
    pub fn particle_color(&self) -> GlowColor {
        match self {
            Self::GhostCaramel => GlowColor([215, 150, 55, 200]),
            Self::ShadowCube => GlowColor([70, 20, 85, 200]),
            Self::Mummy => GlowColor([215, 210, 210, 200]),
            Self::SpiderGummy => GlowColor([30, 255, 30, 200]),
            Self::VampireTeeth => GlowColor([205, 0, 0, 200]),
        }
    }
}

/// Outcome of the shadow cube's d100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowOutcome {
    Divine,
    Speed,
    Hallucination,
    Darkness,
    Teleport,
}

impl ShadowOutcome {
    /// `roll` in `0..100`: 5% divine, 20% speed, 30% hallucination,
    /// 25% darkness, 20% failed teleport.
    pub fn from_roll(roll: i32) -> Self {
        match roll {
            r if r < 5 => Self::Divine,
            r if r < 25 => Self::Speed,
            r if r < 55 => Self::Hallucination,
            r if r < 80 => Self::Darkness,
            _ => Self::Teleport,
        }
    }
}

/// Change to the eater's temporal stability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StabilityChange {
    Raise { amount: f64, cap: f64 },
    Lower { amount: f64, floor: f64 },
    Set(f64),
}

impl StabilityChange {
    pub fn apply(&self, current: f64) -> f64 {
        match *self {
            Self::Raise { amount, cap } => (current + amount).min(cap),
            Self::Lower { amount, floor } => (current - amount).max(floor),
            Self::Set(value) => value,
        }
    }
}

/// Stat modifier the host removes again after `duration_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedStat {
    pub stat: String,
    pub tag: String,
    pub value: f32,
    pub duration_ms: u64,
    /// Lang key sent to the player on removal
    pub expire_message: Option<String>,
}

impl TimedStat {
    fn new(stat: &str, tag: &str, value: f32, duration_ms: u64) -> Self {
        Self {
            stat: stat.to_string(),
            tag: tag.to_string(),
            value,
            duration_ms,
            expire_message: None,
        }
    }

    fn announcing(mut self, lang_key: &str) -> Self {
        self.expire_message = Some(lang_key.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CandyAction {
    Heal(f32),
    Stability(StabilityChange),
    Stat(TimedStat),
    /// Internal poison damage `delay_ms` after eating
    Poison { amount: f32, delay_ms: u64 },
    /// Client-side jump along the view direction
    Leap { up: f64, forward: f64 },
    /// Saturation and every nutrition category set to this value
    FillSatiety(f32),
    Intoxication(f32),
    Sound(String),
    /// Cloud particles around the eater, ten bursts a second
    ParticleLoop { color: GlowColor, duration_secs: u32 },
    /// Relative teleport
    Teleport { dx: f64, dy: f64, dz: f64 },
    /// Block placed at the eater's position after the other actions
    PlaceBlock(String),
    /// Lang key of a chat notification
    Message(String),
}

/// Everything one eaten candy does, in application order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandyEffect {
    pub candy: CandyKind,
    pub shadow: Option<ShadowOutcome>,
    pub actions: Vec<CandyAction>,
    pub particle_color: GlowColor,
}

/// Whether the candy was held long enough to be eaten.
pub fn eaten_long_enough(seconds_used: f32) -> bool {
    seconds_used > CANDY_EAT_SECONDS
}

/// Resolve the effect of eating `candy`. `None` for anything that is not one
/// of the mod's candies.
///
/// Only the shadow cube rolls: one d100, plus two more for the teleport offset.
pub fn consume_candy(candy: &AssetCode, rng: &mut dyn RandomSource) -> Option<CandyEffect> {
    let kind = CandyKind::of(candy)?;
    let mut shadow = None;

    let actions = match kind {
        CandyKind::GhostCaramel => vec![
            CandyAction::Stability(StabilityChange::Raise {
                amount: 0.25,
                cap: CANDY_STABILITY_CAP,
            }),
            CandyAction::Stat(
                TimedStat::new("meleeWeaponsDamage", "candy_weakness", -0.5, 30_000)
                    .announcing("spookynights:candy-expire-weakness"),
            ),
            message("candy-msg-ghostcaramel"),
        ],
        CandyKind::Mummy => vec![
            CandyAction::Heal(2.0),
            CandyAction::Stat(TimedStat::new(
                "knockbackResistance",
                "candy_anchor",
                1.0,
                45_000,
            )),
            CandyAction::Stat(
                TimedStat::new("walkspeed", "candy_slow", -0.25, 45_000)
                    .announcing("spookynights:candy-expire-slow"),
            ),
            message("candy-msg-mummy"),
        ],
        CandyKind::SpiderGummy => vec![
            CandyAction::Leap {
                up: 0.35,
                forward: 0.5,
            },
            CandyAction::Stat(TimedStat::new(
                "fallDamageMultiplier",
                "candy_feather",
                -1.0,
                10_000,
            )),
            CandyAction::Poison {
                amount: 1.0,
                delay_ms: 1_000,
            },
            CandyAction::Poison {
                amount: 1.0,
                delay_ms: 3_000,
            },
            message("candy-msg-spidergummy"),
        ],
        CandyKind::VampireTeeth => vec![
            CandyAction::Heal(6.0),
            CandyAction::Stability(StabilityChange::Lower {
                amount: 0.3,
                floor: 0.0,
            }),
            message("candy-msg-vampireteeth"),
        ],
        CandyKind::ShadowCube => {
            let outcome = ShadowOutcome::from_roll(rng.next_in_range(0, 99));
            shadow = Some(outcome);
            shadow_actions(outcome, rng)
        }
    };

    Some(CandyEffect {
        candy: kind,
        shadow,
        actions,
        particle_color: kind.particle_color(),
    })
}

fn shadow_actions(outcome: ShadowOutcome, rng: &mut dyn RandomSource) -> Vec<CandyAction> {
    match outcome {
        ShadowOutcome::Divine => vec![
            CandyAction::Heal(20.0),
            CandyAction::FillSatiety(1500.0),
            CandyAction::Stability(StabilityChange::Set(CANDY_STABILITY_CAP)),
            message("candy-msg-shadow-divine"),
        ],
        ShadowOutcome::Speed => vec![
            CandyAction::Stat(
                TimedStat::new("walkspeed", "candy_speed", 0.5, 45_000)
                    .announcing("spookynights:candy-expire-speed"),
            ),
            message("candy-msg-shadow-speed"),
        ],
        ShadowOutcome::Hallucination => vec![
            CandyAction::Intoxication(0.8),
            CandyAction::Sound("spookynights:sounds/creature/specter_growls".to_string()),
            message("candy-msg-shadow-hallucination"),
        ],
        ShadowOutcome::Darkness => vec![
            CandyAction::Stat(TimedStat::new(
                "walkspeed",
                "candy_heavy_slow",
                -0.5,
                15_000,
            )),
            CandyAction::ParticleLoop {
                color: GlowColor([0, 0, 0, 255]),
                duration_secs: 15,
            },
            message("candy-msg-shadow-blind"),
        ],
        ShadowOutcome::Teleport => {
            let dx = (rng.next_f64() - 0.5) * 20.0;
            let dz = (rng.next_f64() - 0.5) * 20.0;
            vec![
                CandyAction::Teleport { dx, dy: 1.0, dz },
                CandyAction::PlaceBlock("game:cobweb-n-d".to_string()),
                message("candy-msg-shadow-fail"),
            ]
        }
    }
}

fn message(key: &str) -> CandyAction {
    CandyAction::Message(format!("{MOD_DOMAIN}:{key}"))
}
