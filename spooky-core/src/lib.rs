//! Spooky Nights - decision core
//!
//! Engine-independent rules of the Spooky Nights creature mod:
//! - Wildcard matching over namespaced asset codes (first match wins)
//! - Spawn gating (night window, moon, calendar, boss rules, multipliers)
//! - Daylight sweep of creatures that outlived their spawn conditions
//! - Candy and spectral death loot
//! - Versioned server/client config with copy-forward migration
//! - Spectral damage resistance and the giant boss warning
//! - Bevy adapter plugin

pub mod config;
pub mod constants;
pub mod logging;
pub mod loot;
pub mod plugin;
pub mod random;
pub mod resistance;
pub mod spawn;
pub mod warning;
pub mod wildcard;
pub mod world;

pub use config::{load_client_config, load_server_config, ClientConfig, ServerConfig};
pub use loot::{DeathLoot, DropRequest, LootResolver};
pub use plugin::SpookyNightsPlugin;
pub use random::{FixedSequence, RandomSource, RngSource};
pub use spawn::{DaylightSweep, SpawnDecision, SpawnGate, Verdict};
pub use wildcard::{matches, AssetCode, PatternTable};
pub use world::{MoonPhase, NightMode, WorldFacts};
