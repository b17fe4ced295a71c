use std::fmt;
use std::str::FromStr;

use crate::random::RandomSource;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LootRuleError {
    #[error("empty loot rule")]
    Empty,
    #[error("`{0}` has no `@` between chance and quantity")]
    MissingSeparator(String),
    #[error("`{0}` is not a valid chance")]
    InvalidChance(String),
    #[error("`{0}` is not a valid quantity")]
    InvalidQuantity(String),
    #[error("quantity range {min}-{max} is inverted")]
    InvertedRange { min: u32, max: u32 },
}

/// Candy rule written as `chance@min-max` (or `chance@n` for a fixed amount).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandyRule {
    pub chance: f32,
    pub min: u32,
    pub max: u32,
}

impl CandyRule {
    pub fn parse(raw: &str) -> Result<Self, LootRuleError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(LootRuleError::Empty);
        }
        let (chance, quantity) = raw
            .split_once('@')
            .ok_or_else(|| LootRuleError::MissingSeparator(raw.to_string()))?;

        let chance: f32 = chance
            .trim()
            .parse()
            .ok()
            .filter(|c: &f32| c.is_finite())
            .ok_or_else(|| LootRuleError::InvalidChance(chance.to_string()))?;

        let (min, max) = match quantity.split_once('-') {
            Some((min, max)) => (parse_quantity(min)?, parse_quantity(max)?),
            None => {
                let n = parse_quantity(quantity)?;
                (n, n)
            }
        };
        if max < min {
            return Err(LootRuleError::InvertedRange { min, max });
        }

        Ok(Self { chance, min, max })
    }

    /// Chance roll; passes when the roll is below the chance.
    pub fn passes(&self, rng: &mut dyn RandomSource) -> bool {
        rng.next_f64() < self.chance as f64
    }

    /// Uniform quantity in `[min, max]`.
    pub fn roll_quantity(&self, rng: &mut dyn RandomSource) -> u32 {
        let span = (self.max - self.min) as f64 + 1.0;
        let offset = (rng.next_f64() * span).floor() as u32;
        (self.min + offset).min(self.max)
    }
}

fn parse_quantity(raw: &str) -> Result<u32, LootRuleError> {
    raw.trim()
        .parse()
        .map_err(|_| LootRuleError::InvalidQuantity(raw.to_string()))
}

impl FromStr for CandyRule {
    type Err = LootRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CandyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}@{}", self.chance, self.min)
        } else {
            write!(f, "{}@{}-{}", self.chance, self.min, self.max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedSequence;

    #[test]
    fn test_parse_range_and_single() {
        assert_eq!(
            CandyRule::parse("0.5@2-4").unwrap(),
            CandyRule { chance: 0.5, min: 2, max: 4 }
        );
        assert_eq!(
            CandyRule::parse("0.2@1").unwrap(),
            CandyRule { chance: 0.2, min: 1, max: 1 }
        );
        assert_eq!(
            " 1.0 @ 8-12 ".parse::<CandyRule>().unwrap(),
            CandyRule { chance: 1.0, min: 8, max: 12 }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(CandyRule::parse(""), Err(LootRuleError::Empty));
        assert!(matches!(
            CandyRule::parse("0.5"),
            Err(LootRuleError::MissingSeparator(_))
        ));
        assert!(matches!(
            CandyRule::parse("lots@1-2"),
            Err(LootRuleError::InvalidChance(_))
        ));
        assert!(matches!(
            CandyRule::parse("NaN@1-2"),
            Err(LootRuleError::InvalidChance(_))
        ));
        assert!(matches!(
            CandyRule::parse("0.5@a-2"),
            Err(LootRuleError::InvalidQuantity(_))
        ));
        assert_eq!(
            CandyRule::parse("0.5@4-2"),
            Err(LootRuleError::InvertedRange { min: 4, max: 2 })
        );
    }

    #[test]
    fn test_chance_is_strict() {
        let rule = CandyRule::parse("0.5@1").unwrap();
        assert!(rule.passes(&mut FixedSequence::constant(0.49)));
        assert!(!rule.passes(&mut FixedSequence::constant(0.5)));
    }

    #[test]
    fn test_quantity_roll_covers_range() {
        let rule = CandyRule::parse("1@2-4").unwrap();
        let qty = |r| rule.roll_quantity(&mut FixedSequence::constant(r));
        assert_eq!(qty(0.0), 2);
        assert_eq!(qty(0.34), 3);
        assert_eq!(qty(0.7), 4);
        assert_eq!(qty(0.999), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(CandyRule::parse("0.5@2-4").unwrap().to_string(), "0.5@2-4");
        assert_eq!(CandyRule::parse("0.2@1").unwrap().to_string(), "0.2@1");
    }
}
