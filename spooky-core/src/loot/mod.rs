//! Death loot for the mod's creatures.
//!
//! Two independent sources:
//! - candy: player kills only, gated by month and moon, one `chance@min-max`
//!   rule per creature pattern, paid out as candy bags
//! - spectral drops: any kill of a spectral creature, from the drop table in
//!   the creature's metadata, followed by a vanish effect and an expiry
//!   despawn (so the host's own death drops never happen)
//!
//! Candy bags opened by players and candies eaten from them are resolved
//! here too.

mod candy_bag;
mod candy_effect;
mod rule;
mod spectral;

pub use candy_bag::open_candy_bag;
pub use candy_effect::{
    consume_candy, eaten_long_enough, CandyAction, CandyEffect, CandyKind, ShadowOutcome,
    StabilityChange, TimedStat,
};
pub use rule::{CandyRule, LootRuleError};
pub use spectral::{
    is_spectral, round_quantity, DropEntry, DropKind, GlowColor, QuantitySpec, Randomizers,
    SpectralProfile, WeightedStack,
};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::constants::CANDY_BAG_CODE;
use crate::random::RandomSource;
use crate::wildcard::AssetCode;
use crate::world::WorldFacts;

/// Something the host should spawn at the victim's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropRequest {
    pub code: AssetCode,
    pub kind: DropKind,
    pub quantity: u32,
}

/// Glow-and-fade effect for a spectral creature, followed by an expiry despawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VanishRequest {
    pub code: AssetCode,
    pub color: GlowColor,
}

/// Everything one death produces.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeathLoot {
    pub drops: Vec<DropRequest>,
    pub vanish: Option<VanishRequest>,
}

impl DeathLoot {
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty() && self.vanish.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct LootResolver {
    config: Arc<ServerConfig>,
    randomizers: Randomizers,
}

impl LootResolver {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            config,
            randomizers: Randomizers::default(),
        }
    }

    pub fn with_randomizers(mut self, randomizers: Randomizers) -> Self {
        self.randomizers = randomizers;
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Candy and spectral drops for one death, candy rolled first.
    pub fn on_death(
        &self,
        victim: &AssetCode,
        killer_is_player: bool,
        facts: &WorldFacts,
        profile: Option<&SpectralProfile>,
        rng: &mut dyn RandomSource,
    ) -> DeathLoot {
        let mut loot = DeathLoot::default();
        loot.drops
            .extend(self.candy_drop(victim, killer_is_player, facts, rng));

        if is_spectral(victim) {
            loot.drops.extend(self.spectral_drops(victim, profile, rng));
            loot.vanish = Some(VanishRequest {
                code: victim.clone(),
                color: profile.map(SpectralProfile::glow).unwrap_or_default(),
            });
        }
        loot
    }

    /// Candy bag drop, if the kill earns one.
    pub fn candy_drop(
        &self,
        victim: &AssetCode,
        killer_is_player: bool,
        facts: &WorldFacts,
        rng: &mut dyn RandomSource,
    ) -> Option<DropRequest> {
        let config = &self.config;
        if !config.candy_loot_enabled || !killer_is_player {
            return None;
        }
        if !config.candy_month_allowed(facts.calendar_month) {
            return None;
        }
        if config.candy_requires_full_moon && !facts.moon_phase.is_full() {
            return None;
        }

        let (pattern, raw) = config.candy_loot_table.first_match(victim)?;
        if raw.trim().is_empty() {
            return None;
        }
        let rule = match CandyRule::parse(raw) {
            Ok(rule) => rule,
            Err(e) => {
                warn!(pattern, rule = raw.as_str(), victim = %victim, error = %e, "skipping malformed candy rule");
                return None;
            }
        };

        if !rule.passes(rng) {
            return None;
        }
        let quantity = rule.roll_quantity(rng);
        if quantity == 0 {
            return None;
        }
        if config.enable_debug_logging {
            debug!(victim = %victim, quantity, "candy drop");
        }
        Some(DropRequest {
            code: AssetCode::parse(CANDY_BAG_CODE),
            kind: DropKind::Item,
            quantity,
        })
    }

    /// Custom drops of a spectral creature. Missing metadata means none.
    pub fn spectral_drops(
        &self,
        victim: &AssetCode,
        profile: Option<&SpectralProfile>,
        rng: &mut dyn RandomSource,
    ) -> Vec<DropRequest> {
        let Some(profile) = profile.filter(|_| is_spectral(victim)) else {
            return Vec::new();
        };

        let mut drops = Vec::new();
        for entry in profile.drops_for(victim) {
            let raw = entry.quantity.sample(rng);

            let (code, kind, stack_size) =
                if entry.kind == DropKind::Item && self.randomizers.is_randomizer(&entry.code) {
                    match self.randomizers.resolve(&entry.code, rng) {
                        Some(stack) => (stack.code.as_str(), stack.kind, stack.size),
                        None => continue,
                    }
                } else {
                    (entry.code.as_str(), entry.kind, 1)
                };

            let quantity = round_quantity(raw, rng).saturating_mul(stack_size as i64);
            if quantity > 0 {
                drops.push(DropRequest {
                    code: AssetCode::parse(code),
                    kind,
                    quantity: quantity.min(u32::MAX as i64) as u32,
                });
            }
        }
        drops
    }
}
