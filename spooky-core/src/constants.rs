//! Centralized constants for the Spooky Nights decision core.
//!
//! Asset codes, file names and timing values shared by the spawn gate,
//! loot resolver, config loader and the Bevy adapter. Default tables
//! (multipliers, candy rules, boss rules) live in `config::defaults`.

// =====================================================
// Identifiers
// =====================================================

/// Asset domain owned by the mod. Spawns outside it are never gated.
pub const MOD_DOMAIN: &str = "spookynights";

/// Domain the host assigns to codes written without one.
pub const BASE_DOMAIN: &str = "game";

/// Item dropped by candy loot rolls
pub const CANDY_BAG_CODE: &str = "spookynights:candybag";

/// Entity path prefixes of the spectral creature families
pub const SPECTRAL_FAMILIES: [&str; 5] = [
    "spectraldrifter",
    "spectralshiver",
    "spectralbowtorn",
    "spectralwolf",
    "spectralbear",
];

/// Candy variants a candy bag can yield
pub const CANDY_VARIANTS: [&str; 5] = [
    "spookynights:spookycandy-ghostcaramel",
    "spookynights:spookycandy-shadowcube",
    "spookynights:spookycandy-mummy",
    "spookynights:spookycandy-spidergummy",
    "spookynights:spookycandy-vampireteeth",
];

/// Inclusive quantity range of candies from one opened bag
pub const CANDY_BAG_MIN: u32 = 1;
pub const CANDY_BAG_MAX: u32 = 3;

/// A candy only takes effect when held to the mouth longer than this
pub const CANDY_EAT_SECONDS: f32 = 0.9;

/// Ceiling of the temporal stability a candy can grant
pub const CANDY_STABILITY_CAP: f64 = 1.5;

// =====================================================
// Config files & versions
// =====================================================

/// Server-side settings document
pub const SERVER_CONFIG_FILE: &str = "spookynights-server.json";

/// Client-side settings document
pub const CLIENT_CONFIG_FILE: &str = "spookynights-client.json";

/// Single combined document written by releases before the server/client split
pub const LEGACY_CONFIG_FILE: &str = "spookynightsconfig.json";

pub const SERVER_CONFIG_VERSION: &str = "1.4.0";
pub const CLIENT_CONFIG_VERSION: &str = "1.7.1";

// =====================================================
// Time & calendar
// =====================================================

/// Seconds of simulated time between daylight sweeps
pub const DAYLIGHT_SWEEP_INTERVAL_SECS: f32 = 5.0;

pub const HOURS_PER_DAY: f32 = 24.0;

pub const DAYS_PER_WEEK: u32 = 7;

/// Highest block light level the host reports
pub const MAX_LIGHT_LEVEL: i32 = 32;

// =====================================================
// Spectral combat
// =====================================================

/// Fraction of incoming damage a spectral creature takes from ordinary weapons
pub const DEFAULT_SPECTRAL_RESISTANCE: f32 = 0.5;

/// Tag of the stat modifiers applied while a spectral weapon is held
pub const HELD_STAT_TAG: &str = "spookynights-held";

// =====================================================
// Boss proximity warning
// =====================================================

pub const WARNING_CHECK_INTERVAL_SECS: f32 = 2.0;
pub const WARNING_DEFAULT_COOLDOWN_MS: f32 = 10_000.0;
pub const WARNING_DEFAULT_VOLUME: f32 = 1.0;
pub const WARNING_DEFAULT_SOUND: &str = "spookynights:sounds/creature/bear/spectral_bear_warning";
