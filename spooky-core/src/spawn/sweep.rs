use std::sync::Arc;
use tracing::debug;

use super::{BossCheck, SpawnGate};
use crate::config::ServerConfig;
use crate::constants::MOD_DOMAIN;
use crate::wildcard::AssetCode;
use crate::world::WorldFacts;

/// Periodic re-check of loaded creatures.
///
/// Spawn rules only run at spawn time, so a creature that spawned at night
/// would otherwise outlive the sunrise. Only the night window and the boss
/// moon rule are re-checked; spawn chances are not rolled again. Despawns
/// are expiries: no death, no loot.
#[derive(Debug, Clone)]
pub struct DaylightSweep {
    gate: SpawnGate,
}

impl DaylightSweep {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            gate: SpawnGate::new(config),
        }
    }

    /// Whether a loaded creature may stay in the world.
    pub fn still_valid(&self, code: &AssetCode, facts: &WorldFacts) -> bool {
        let config = self.gate.config();
        if !code.in_domain(MOD_DOMAIN) || !config.spawn_gating_enabled {
            return true;
        }
        match self.gate.boss_check(code, facts) {
            BossCheck::Denied(_) => false,
            BossCheck::Allowed => true,
            BossCheck::NotBoss => !config.night_only || self.gate.night_now(facts),
        }
    }

    /// Ids of the creatures to expire.
    ///
    /// Each entry is `(id, code, light level at the creature)`; the light
    /// level replaces the one in `facts` for that creature.
    pub fn sweep<'a, Id, I>(&self, creatures: I, facts: &WorldFacts) -> Vec<Id>
    where
        I: IntoIterator<Item = (Id, &'a AssetCode, i32)>,
    {
        let expired: Vec<Id> = creatures
            .into_iter()
            .filter(|(_, code, light)| !self.still_valid(code, &facts.with_light_level(*light)))
            .map(|(id, _, _)| id)
            .collect();
        if !expired.is_empty() && self.gate.config().enable_debug_logging {
            debug!(count = expired.len(), "daylight sweep expiring creatures");
        }
        expired
    }
}
