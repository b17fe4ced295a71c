//! Bevy adapter for the decision core.
//!
//! The host keeps [`WorldClock`] current and turns engine callbacks into
//! events:
//! - [`SpawnAttempt`] in, [`SpawnVerdict`] out
//! - [`SpectralDeath`] in, [`DropRequested`] / [`VanishRequested`] out, and
//!   spectral victims despawned without further death handling
//! - every 5 s of game time loaded [`SpectralCreature`]s are re-checked and
//!   expired ones despawned with a [`CreatureExpired`] event
//! - [`CandyBagOpened`] in, [`DropRequested`] out; [`CandyEaten`] in,
//!   [`CandyEffectRequested`] out
//! - [`HeldItemChanged`] in, [`HeldStatsChanged`] out
//!
//! Everything runs in `Update` on the simulation thread.

use bevy::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::constants::DAYLIGHT_SWEEP_INTERVAL_SECS;
use crate::logging::LoggingPlugin;
use crate::loot::{
    consume_candy, eaten_long_enough, open_candy_bag, CandyEffect, DropRequest, GlowColor,
    LootResolver, Randomizers, SpectralProfile,
};
use crate::random::RngSource;
use crate::resistance::{HeldStats, StatChanges};
use crate::spawn::{DaylightSweep, SpawnGate, Verdict};
use crate::wildcard::AssetCode;
use crate::world::WorldFacts;

/// Seed of the plugin's RNG unless the host picks one
pub const DEFAULT_RNG_SEED: u64 = 0x5900_C4A7;

pub struct SpookyNightsPlugin {
    config: Arc<ServerConfig>,
    randomizers: Randomizers,
    seed: u64,
}

impl SpookyNightsPlugin {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            config,
            randomizers: Randomizers::default(),
            seed: DEFAULT_RNG_SEED,
        }
    }

    pub fn with_randomizers(mut self, randomizers: Randomizers) -> Self {
        self.randomizers = randomizers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Plugin for SpookyNightsPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<LoggingPlugin>() {
            app.add_plugins(LoggingPlugin::for_server(&self.config));
        }

        app.insert_resource(SpookyRules {
            gate: SpawnGate::new(Arc::clone(&self.config)),
            sweep: DaylightSweep::new(Arc::clone(&self.config)),
            loot: LootResolver::new(Arc::clone(&self.config))
                .with_randomizers(self.randomizers.clone()),
        })
        .insert_resource(SpookyRng(RngSource::seeded(self.seed)))
        .insert_resource(DaylightSweepTimer(Timer::from_seconds(
            DAYLIGHT_SWEEP_INTERVAL_SECS,
            TimerMode::Repeating,
        )))
        .init_resource::<WorldClock>()
        .init_resource::<HeldStatLedger>()
        .add_event::<SpawnAttempt>()
        .add_event::<SpawnVerdict>()
        .add_event::<SpectralDeath>()
        .add_event::<DropRequested>()
        .add_event::<VanishRequested>()
        .add_event::<CreatureExpired>()
        .add_event::<CandyBagOpened>()
        .add_event::<CandyEaten>()
        .add_event::<CandyEffectRequested>()
        .add_event::<HeldItemChanged>()
        .add_event::<HeldStatsChanged>()
        .add_systems(
            Update,
            (
                evaluate_spawn_attempts,
                resolve_deaths,
                run_daylight_sweep,
                resolve_candy,
                track_held_items,
            )
                .chain(),
        );
    }
}

/// Gate, sweep and loot resolver sharing one config.
#[derive(Resource, Debug, Clone)]
pub struct SpookyRules {
    pub gate: SpawnGate,
    pub sweep: DaylightSweep,
    pub loot: LootResolver,
}

/// Current world facts, kept up to date by the host.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct WorldClock(pub WorldFacts);

#[derive(Resource, Debug, Clone)]
pub struct SpookyRng(pub RngSource<Xoshiro256PlusPlus>);

#[derive(Resource, Debug)]
pub struct DaylightSweepTimer(pub Timer);

/// Held-item stats applied per player.
#[derive(Resource, Debug, Default)]
pub struct HeldStatLedger(pub HashMap<Entity, HeldStats>);

/// A loaded creature from the mod's domain.
#[derive(Component, Debug, Clone)]
pub struct SpectralCreature {
    pub code: AssetCode,
    /// Light level at the creature, refreshed by the host
    pub light_level: i32,
}

/// Drop table and glow color read from the creature's metadata.
#[derive(Component, Debug, Clone)]
pub struct SpectralMetadata(pub SpectralProfile);

#[derive(Event, Debug, Clone)]
pub struct SpawnAttempt {
    /// Host handle echoed back in the verdict
    pub request_id: u64,
    pub code: AssetCode,
    pub light_level: i32,
}

#[derive(Event, Debug, Clone)]
pub struct SpawnVerdict {
    pub request_id: u64,
    pub code: AssetCode,
    pub verdict: Verdict,
}

#[derive(Event, Debug, Clone)]
pub struct SpectralDeath {
    pub entity: Entity,
    pub code: AssetCode,
    pub killer_is_player: bool,
}

#[derive(Event, Debug, Clone)]
pub struct DropRequested {
    pub source: Entity,
    pub drop: DropRequest,
}

#[derive(Event, Debug, Clone)]
pub struct VanishRequested {
    pub entity: Entity,
    pub color: GlowColor,
}

#[derive(Event, Debug, Clone)]
pub struct CreatureExpired {
    pub entity: Entity,
    pub code: AssetCode,
}

/// A player opened a candy bag; the contents arrive as a [`DropRequested`]
/// with the player as source.
#[derive(Event, Debug, Clone)]
pub struct CandyBagOpened {
    pub player: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct CandyEaten {
    pub player: Entity,
    pub candy: AssetCode,
    /// How long the candy was held to the mouth
    pub seconds_used: f32,
}

#[derive(Event, Debug, Clone)]
pub struct CandyEffectRequested {
    pub player: Entity,
    pub effect: CandyEffect,
}

#[derive(Event, Debug, Clone)]
pub struct HeldItemChanged {
    pub player: Entity,
    /// Attributes of the item now in the right hand, `None` when empty
    pub item_attributes: Option<Value>,
}

#[derive(Event, Debug, Clone)]
pub struct HeldStatsChanged {
    pub player: Entity,
    pub changes: StatChanges,
}

fn evaluate_spawn_attempts(
    rules: Res<SpookyRules>,
    clock: Res<WorldClock>,
    mut rng: ResMut<SpookyRng>,
    mut attempts: EventReader<SpawnAttempt>,
    mut verdicts: EventWriter<SpawnVerdict>,
) {
    for attempt in attempts.read() {
        let facts = clock.0.with_light_level(attempt.light_level);
        let verdict = rules.gate.assess(&attempt.code, &facts, &mut rng.0);
        verdicts.send(SpawnVerdict {
            request_id: attempt.request_id,
            code: attempt.code.clone(),
            verdict,
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_deaths(
    mut commands: Commands,
    rules: Res<SpookyRules>,
    clock: Res<WorldClock>,
    mut rng: ResMut<SpookyRng>,
    mut deaths: EventReader<SpectralDeath>,
    metadata: Query<&SpectralMetadata>,
    mut drops: EventWriter<DropRequested>,
    mut vanishes: EventWriter<VanishRequested>,
) {
    for death in deaths.read() {
        let profile = metadata.get(death.entity).ok().map(|m| &m.0);
        let loot = rules.loot.on_death(
            &death.code,
            death.killer_is_player,
            &clock.0,
            profile,
            &mut rng.0,
        );

        for drop in loot.drops {
            drops.send(DropRequested {
                source: death.entity,
                drop,
            });
        }
        if let Some(vanish) = loot.vanish {
            vanishes.send(VanishRequested {
                entity: death.entity,
                color: vanish.color,
            });
            if let Some(mut victim) = commands.get_entity(death.entity) {
                victim.despawn();
            }
        }
    }
}

fn run_daylight_sweep(
    mut commands: Commands,
    time: Res<Time>,
    mut timer: ResMut<DaylightSweepTimer>,
    rules: Res<SpookyRules>,
    clock: Res<WorldClock>,
    creatures: Query<(Entity, &SpectralCreature)>,
    mut expired: EventWriter<CreatureExpired>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }

    let doomed = rules.sweep.sweep(
        creatures
            .iter()
            .map(|(entity, creature)| (entity, &creature.code, creature.light_level)),
        &clock.0,
    );
    for entity in doomed {
        if let Ok((_, creature)) = creatures.get(entity) {
            expired.send(CreatureExpired {
                entity,
                code: creature.code.clone(),
            });
        }
        commands.entity(entity).despawn();
    }
}

fn resolve_candy(
    mut rng: ResMut<SpookyRng>,
    mut bags: EventReader<CandyBagOpened>,
    mut eaten: EventReader<CandyEaten>,
    mut drops: EventWriter<DropRequested>,
    mut effects: EventWriter<CandyEffectRequested>,
) {
    for bag in bags.read() {
        drops.send(DropRequested {
            source: bag.player,
            drop: open_candy_bag(&mut rng.0),
        });
    }

    for meal in eaten.read() {
        if !eaten_long_enough(meal.seconds_used) {
            continue;
        }
        if let Some(effect) = consume_candy(&meal.candy, &mut rng.0) {
            effects.send(CandyEffectRequested {
                player: meal.player,
                effect,
            });
        }
    }
}

fn track_held_items(
    mut ledger: ResMut<HeldStatLedger>,
    mut held: EventReader<HeldItemChanged>,
    mut changed: EventWriter<HeldStatsChanged>,
) {
    for event in held.read() {
        let stats = ledger.0.entry(event.player).or_default();
        let changes = stats.update(event.item_attributes.as_ref());
        if stats.active().is_empty() {
            ledger.0.remove(&event.player);
        }
        if !changes.is_empty() {
            changed.send(HeldStatsChanged {
                player: event.player,
                changes,
            });
        }
    }
}
