use super::BossRule;
use crate::wildcard::PatternTable;

/// Giant bears only roam under a full moon.
pub const GIANT_BEAR_PATTERN: &str = "spookynights:spectralbear-giant-*";

pub fn default_spawn_multipliers() -> PatternTable<f32> {
    [
        ("spookynights:spectralwolf-*", 0.5),
        ("spookynights:spectralbear-brown-*", 0.5),
        (GIANT_BEAR_PATTERN, 0.5),
        ("spookynights:spectraldrifter-*", 0.5),
        ("spookynights:spectralshiver-*", 0.5),
        ("spookynights:spectralbowtorn-*", 0.5),
    ]
    .into_iter()
    .collect()
}

pub fn default_boss_rules() -> PatternTable<BossRule> {
    [(GIANT_BEAR_PATTERN, BossRule::full_moon_only())]
        .into_iter()
        .collect()
}

/// Candy rules per creature variant, deeper and nastier variants paying more.
pub fn default_candy_loot_table() -> PatternTable<String> {
    [
        ("spookynights:spectraldrifter-normal", "0.2@1"),
        ("spookynights:spectraldrifter-deep", "0.3@1-2"),
        ("spookynights:spectraldrifter-tainted", "0.35@1-2"),
        ("spookynights:spectraldrifter-corrupt", "0.4@2-3"),
        ("spookynights:spectraldrifter-nightmare", "0.6@3-5"),
        ("spookynights:spectraldrifter-double-headed", "0.7@4-6"),
        ("spookynights:spectralshiver-surface", "0.2@1"),
        ("spookynights:spectralshiver-deep", "0.3@1-2"),
        ("spookynights:spectralshiver-tainted", "0.35@1-2"),
        ("spookynights:spectralshiver-corrupt", "0.4@2-3"),
        ("spookynights:spectralshiver-nightmare", "0.6@3-5"),
        ("spookynights:spectralshiver-stilt", "0.7@4-6"),
        ("spookynights:spectralshiver-bellhead", "0.7@4-6"),
        ("spookynights:spectralshiver-deepsplit", "0.7@4-6"),
        ("spookynights:spectralbowtorn-surface", "0.25@1"),
        ("spookynights:spectralbowtorn-deep", "0.35@1-2"),
        ("spookynights:spectralbowtorn-tainted", "0.4@2-3"),
        ("spookynights:spectralbowtorn-corrupt", "0.45@2-4"),
        ("spookynights:spectralbowtorn-nightmare", "0.65@3-5"),
        ("spookynights:spectralbowtorn-gearfoot", "0.75@4-6"),
        ("spookynights:spectralbear-brown-adult-*", "0.5@2-4"),
        ("spookynights:spectralwolf-eurasian-adult-*", "0.3@1-2"),
        ("spookynights:spectralbear-giant-adult-*", "1.0@8-12"),
    ]
    .into_iter()
    .map(|(pattern, rule)| (pattern, rule.to_string()))
    .collect()
}
