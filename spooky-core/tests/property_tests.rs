//! Property-based tests using proptest
//!
//! Invariants that must hold for all inputs:
//! - Matcher: literal patterns are equality, `*` matches everything
//! - Spawn gate: gating off never denies for time reasons, multiplier
//!   extremes never roll, fractional multipliers are decided by the roll
//! - Candy rules: quantities stay inside the configured range

use proptest::prelude::*;
use std::sync::Arc;

use spooky_core::config::ServerConfig;
use spooky_core::loot::CandyRule;
use spooky_core::random::{FixedSequence, RandomSource};
use spooky_core::spawn::{SpawnDecision, SpawnGate};
use spooky_core::wildcard::{matches, AssetCode, PatternTable};
use spooky_core::world::{MoonPhase, WorldFacts};

fn any_moon() -> impl Strategy<Value = MoonPhase> {
    (0usize..8).prop_map(|i| MoonPhase::all()[i])
}

fn any_facts() -> impl Strategy<Value = WorldFacts> {
    (
        0.0f32..24.0,
        any_moon(),
        1u32..=12,
        1u32..=9,
        0u32..7,
        0i32..=32,
    )
        .prop_map(|(hour, moon, month, day, weekday, light)| WorldFacts {
            current_hour: hour,
            moon_phase: moon,
            calendar_month: month,
            day_of_month: day,
            days_in_month: 9,
            day_of_week: weekday,
            light_level: light,
        })
}

fn wolf() -> AssetCode {
    AssetCode::parse("spookynights:spectralwolf-eurasian-adult-male")
}

fn gate_with_multiplier(multiplier: f32, gating: bool) -> SpawnGate {
    let mut config = ServerConfig {
        spawn_gating_enabled: gating,
        full_moon_only: true,
        allowed_spawn_months: vec![2],
        last_day_of_week_only: true,
        ..ServerConfig::default()
    };
    config.spawn_multipliers = [("spookynights:spectralwolf-*", multiplier)]
        .into_iter()
        .collect::<PatternTable<f32>>();
    SpawnGate::new(Arc::new(config))
}

// ============================================================
// Matcher Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_literal_pattern_is_equality(pattern in "[a-z:\\-]{0,16}", candidate in "[a-z:\\-]{0,16}") {
        prop_assert_eq!(matches(&pattern, &candidate), pattern == candidate);
        prop_assert!(matches(&pattern, &pattern));
    }

    #[test]
    fn prop_star_matches_everything(candidate in ".{0,32}") {
        prop_assert!(matches("*", &candidate));
    }

    #[test]
    fn prop_prefix_star_matches_extensions(prefix in "[a-z\\-]{0,10}", rest in "[a-z\\-]{0,10}") {
        let pattern = format!("{prefix}*");
        let candidate = format!("{prefix}{rest}");
        prop_assert!(matches(&pattern, &candidate));
    }

    #[test]
    fn prop_infix_star_matches(head in "[a-z]{0,6}", middle in "[a-z\\-:]{0,10}", tail in "[a-z]{0,6}") {
        let pattern = format!("{head}*{tail}");
        let candidate = format!("{head}{middle}{tail}");
        prop_assert!(matches(&pattern, &candidate));
    }
}

// ============================================================
// Spawn Gate Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_gating_off_only_multiplier_decides(facts in any_facts(), roll in 0.0f64..1.0) {
        let gate = gate_with_multiplier(1.0, false);
        let mut rng = FixedSequence::constant(roll);
        prop_assert_eq!(gate.evaluate(&wolf(), &facts, &mut rng), SpawnDecision::Allow);
    }

    #[test]
    fn prop_zero_multiplier_always_denies(facts in any_facts(), roll in 0.0f64..1.0, gating in any::<bool>()) {
        let gate = gate_with_multiplier(0.0, gating);
        let mut rng = FixedSequence::constant(roll);
        prop_assert_eq!(gate.evaluate(&wolf(), &facts, &mut rng), SpawnDecision::Deny);
    }

    #[test]
    fn prop_half_multiplier_follows_roll(roll in 0.0f64..1.0) {
        let gate = gate_with_multiplier(0.5, false);
        let facts = WorldFacts::default();
        let mut rng = FixedSequence::constant(roll);
        let expected = if roll <= 0.5 { SpawnDecision::Allow } else { SpawnDecision::Deny };
        prop_assert_eq!(gate.evaluate(&wolf(), &facts, &mut rng), expected);
    }

    #[test]
    fn prop_foreign_domain_always_allowed(facts in any_facts(), path in "[a-z\\-]{1,20}") {
        let gate = gate_with_multiplier(0.0, true);
        let code = AssetCode::new("game", path);
        let mut rng = FixedSequence::constant(0.99);
        prop_assert_eq!(gate.evaluate(&code, &facts, &mut rng), SpawnDecision::Allow);
    }

    #[test]
    fn prop_gate_is_deterministic(facts in any_facts(), roll in 0.0f64..1.0) {
        let gate = SpawnGate::new(Arc::new(ServerConfig::default()));
        let a = gate.assess(&wolf(), &facts, &mut FixedSequence::constant(roll));
        let b = gate.assess(&wolf(), &facts, &mut FixedSequence::constant(roll));
        prop_assert_eq!(a, b);
    }
}

// ============================================================
// Candy Rule Properties
// ============================================================

proptest! {
    #[test]
    fn prop_candy_quantity_in_range(min in 0u32..20, extra in 0u32..20, roll in 0.0f64..1.0) {
        let max = min + extra;
        let rule = CandyRule::parse(&format!("0.5@{min}-{max}")).unwrap();
        let qty = rule.roll_quantity(&mut FixedSequence::constant(roll));
        prop_assert!((min..=max).contains(&qty));
    }

    #[test]
    fn prop_next_in_range_bounds(min in -50i32..50, span in 0i32..50, roll in 0.0f64..1.0) {
        let max = min + span;
        let mut rng = FixedSequence::constant(roll);
        let value = rng.next_in_range(min, max);
        prop_assert!(value >= min && value <= max);
    }
}
