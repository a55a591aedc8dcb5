//! Test case generators
//!
//! Each scenario family is an independent [`CaseGenerator`]. Generators draw every random number from the RNG they
//! are handed, so a fixed seed reproduces a case byte for byte.
//!
//! ## Families
//!
//! - `foreign_calls` - weighted-sum foreign functions `f1..fN` plus their C implementations
//! - `local_calls` - arity-overloaded local functions, plain or weighted sums
//! - `range_sum` - point-update / range-sum operation logs
//! - `quadratic` - integer-root quadratic equations

pub mod foreign_calls;
pub mod local_calls;
mod nary;
pub mod quadratic;
pub mod range_sum;

use std::fmt;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::{NaryCallConfig, QuadraticConfig, RangeSumConfig};
use crate::errors::Result;
use crate::fixture::TestCase;

pub use foreign_calls::ForeignCallGenerator;
pub use local_calls::LocalCallGenerator;
pub use quadratic::QuadraticGenerator;
pub use range_sum::RangeSumGenerator;

/// The scenario families the tool knows how to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Scenario {
    /// Foreign functions with many arguments
    ForeignCalls,
    /// Local functions with many arguments, plain sum
    LocalSum,
    /// Local functions with many arguments, weighted sum
    LocalWeighted,
    /// Range sums with point updates
    RangeSum,
    /// Integer roots of quadratic equations
    Quadratic,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::ForeignCalls,
        Scenario::LocalSum,
        Scenario::LocalWeighted,
        Scenario::RangeSum,
        Scenario::Quadratic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::ForeignCalls => "foreign-calls",
            Scenario::LocalSum => "local-sum",
            Scenario::LocalWeighted => "local-weighted",
            Scenario::RangeSum => "range-sum",
            Scenario::Quadratic => "quadratic",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A family of self-consistent test cases
pub trait CaseGenerator {
    fn scenario(&self) -> Scenario;

    /// Produce one case. Fails only on invalid configuration.
    fn generate(&self, rng: &mut dyn RngCore) -> Result<TestCase>;

    /// Re-derive the expected output of `case` independently of [`CaseGenerator::generate`].
    fn check(&self, case: &TestCase) -> Result<()>;
}

/// Generator for `scenario` with its default configuration.
pub fn generator_for(scenario: Scenario) -> Box<dyn CaseGenerator> {
    match scenario {
        Scenario::ForeignCalls => Box::new(ForeignCallGenerator::new(NaryCallConfig::foreign())),
        Scenario::LocalSum => Box::new(LocalCallGenerator::new(Scenario::LocalSum, NaryCallConfig::local_sum())),
        Scenario::LocalWeighted => Box::new(LocalCallGenerator::new(
            Scenario::LocalWeighted,
            NaryCallConfig::local_weighted(),
        )),
        Scenario::RangeSum => Box::new(RangeSumGenerator::new(RangeSumConfig::default())),
        Scenario::Quadratic => Box::new(QuadraticGenerator::new(QuadraticConfig::default())),
    }
}

/// Generate a case with a freshly seeded RNG.
pub fn generate_seeded(generator: &dyn CaseGenerator, seed: u64) -> Result<TestCase> {
    let mut rng = StdRng::seed_from_u64(seed);
    generator.generate(&mut rng)
}

/// Parse expected-output lines as integers.
pub(crate) fn parse_ints(lines: &[String], what: &str) -> Result<Vec<i64>> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            line.trim().parse::<i64>().map_err(|_| {
                crate::errors::FixtureError::Check(format!("{} line {} is not an integer: {:?}", what, i + 1, line))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_names_are_unique() {
        let mut names: Vec<&str> = Scenario::ALL.iter().map(|s| s.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Scenario::ALL.len());
    }

    #[test]
    fn test_generator_for_reports_its_scenario() {
        for scenario in Scenario::ALL {
            assert_eq!(generator_for(scenario).scenario(), scenario);
        }
    }

    #[test]
    fn test_every_default_generator_passes_its_own_check() {
        for scenario in Scenario::ALL {
            let generator = generator_for(scenario);
            for seed in 0..8 {
                let case = generate_seeded(generator.as_ref(), seed).unwrap();
                generator
                    .check(&case)
                    .unwrap_or_else(|e| panic!("{scenario} seed {seed}: {e}"));
            }
        }
    }

    #[test]
    fn test_same_seed_same_case() {
        for scenario in Scenario::ALL {
            let generator = generator_for(scenario);
            let a = generate_seeded(generator.as_ref(), 1234).unwrap();
            let b = generate_seeded(generator.as_ref(), 1234).unwrap();
            assert_eq!(a, b, "{scenario}");
        }
    }

    #[test]
    fn test_parse_ints() {
        let lines = vec!["1".to_string(), " -2 ".to_string()];
        assert_eq!(parse_ints(&lines, "output").unwrap(), vec![1, -2]);
        assert!(parse_ints(&["x".to_string()], "output").is_err());
    }
}
