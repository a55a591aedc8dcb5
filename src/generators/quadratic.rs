//! Integer roots of quadratic equations
//!
//! Every case is built from its answer: roots `x <= y` and a nonzero leading coefficient `a` give the equation
//! `a*t^2 - a*(x+y)*t + a*x*y = 0`. A small exhaustive grid comes first, random cases follow.
//!
//! Input layout: case count, then `a b c` per case. Output: `x` and `y` on separate lines per case.

use rand::{Rng, RngCore};

use crate::config::QuadraticConfig;
use crate::errors::{FixtureError, Result};
use crate::fixture::TestCase;

use super::{CaseGenerator, Scenario, parse_ints};

/// Leading coefficients covered by the exhaustive grid
const GRID_COEFFICIENTS: [i64; 3] = [-1, 1, 2];
/// Largest root covered by the exhaustive grid
const GRID_MAX_ROOT: i64 = 2;

/// `a * (t - x) * (t - y)` with `x <= y`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quadratic {
    pub a: i64,
    pub x: i64,
    pub y: i64,
}

impl Quadratic {
    /// Build from two roots in any order.
    pub fn new(a: i64, r1: i64, r2: i64) -> Self {
        let (x, y) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };
        Self { a, x, y }
    }

    /// Expanded `(a, b, c)`
    pub fn coefficients(&self) -> (i64, i64, i64) {
        (self.a, -self.a * (self.x + self.y), self.a * self.x * self.y)
    }
}

/// The fixed grid: `a` in {-1, 1, 2}, `0 <= x <= y <= 2`
pub fn grid() -> Vec<Quadratic> {
    let mut cases = Vec::new();
    for a in GRID_COEFFICIENTS {
        for y in 0..=GRID_MAX_ROOT {
            for x in 0..=y {
                cases.push(Quadratic { a, x, y });
            }
        }
    }
    cases
}

pub struct QuadraticGenerator {
    config: QuadraticConfig,
}

impl QuadraticGenerator {
    pub fn new(config: QuadraticConfig) -> Self {
        Self { config }
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Quadratic {
        let cb = self.config.coefficient_bound;
        let rb = self.config.root_bound;
        let mut a = 0;
        while a == 0 {
            a = rng.gen_range(-cb..=cb);
        }
        let r1 = rng.gen_range(-rb..=rb);
        let r2 = rng.gen_range(-rb..=rb);
        Quadratic::new(a, r1, r2)
    }
}

impl CaseGenerator for QuadraticGenerator {
    fn scenario(&self) -> Scenario {
        Scenario::Quadratic
    }

    #[tracing::instrument(skip_all, fields(random_cases = self.config.random_cases))]
    fn generate(&self, rng: &mut dyn RngCore) -> Result<TestCase> {
        self.config.validate()?;

        let mut cases = grid();
        for _ in 0..self.config.random_cases {
            cases.push(self.sample(rng));
        }

        let mut input = Vec::with_capacity(cases.len() + 1);
        let mut output = Vec::with_capacity(cases.len() * 2);
        input.push(cases.len().to_string());
        for case in &cases {
            let (a, b, c) = case.coefficients();
            input.push(format!("{} {} {}", a, b, c));
            output.push(case.x.to_string());
            output.push(case.y.to_string());
        }

        Ok(TestCase {
            program: None,
            input,
            output,
            natives: Vec::new(),
        })
    }

    /// Verify the coefficients expand from the expected roots and the roots are ordered.
    fn check(&self, case: &TestCase) -> Result<()> {
        let (count, equations) = case
            .input
            .split_first()
            .ok_or_else(|| FixtureError::Check("input is empty".to_string()))?;
        let count: usize = count
            .trim()
            .parse()
            .map_err(|_| FixtureError::Check(format!("malformed case count {:?}", count)))?;
        if equations.len() != count {
            return Err(FixtureError::Check(format!(
                "input announces {} cases, found {}",
                count,
                equations.len()
            )));
        }

        let roots = parse_ints(&case.output, "output")?;
        if roots.len() != 2 * count {
            return Err(FixtureError::Check(format!(
                "expected {} output lines, found {}",
                2 * count,
                roots.len()
            )));
        }

        for (i, (line, pair)) in equations.iter().zip(roots.chunks(2)).enumerate() {
            let coefficients: Vec<i64> = parse_ints(
                &line.split_whitespace().map(str::to_string).collect::<Vec<_>>(),
                "coefficient",
            )?;
            let [a, b, c] = coefficients.as_slice() else {
                return Err(FixtureError::Check(format!("case {} has malformed coefficients {:?}", i + 1, line)));
            };
            let (x, y) = (pair[0], pair[1]);
            if *a == 0 {
                return Err(FixtureError::Check(format!("case {} has a zero leading coefficient", i + 1)));
            }
            if x > y {
                return Err(FixtureError::Check(format!("case {} roots {} > {} are out of order", i + 1, x, y)));
            }
            let expected = Quadratic { a: *a, x, y }.coefficients();
            if expected != (*a, *b, *c) {
                return Err(FixtureError::Check(format!(
                    "case {}: roots {} and {} do not solve {}",
                    i + 1,
                    x,
                    y,
                    line
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::generate_seeded;
    use rand::SeedableRng;

    fn generator() -> QuadraticGenerator {
        QuadraticGenerator::new(QuadraticConfig::default())
    }

    #[test]
    fn test_grid_size_and_order() {
        let grid = grid();
        assert_eq!(grid.len(), 18);
        assert_eq!(grid[0], Quadratic { a: -1, x: 0, y: 0 });
        assert_eq!(grid[1], Quadratic { a: -1, x: 0, y: 1 });
        assert_eq!(grid[17], Quadratic { a: 2, x: 2, y: 2 });
        assert!(grid.iter().all(|q| q.a != 0 && q.x <= q.y));
    }

    #[test]
    fn test_coefficients() {
        assert_eq!(Quadratic::new(2, 3, -1).coefficients(), (2, -4, -6));
        assert_eq!(Quadratic::new(-1, 0, 0).coefficients(), (-1, 0, 0));
    }

    #[test]
    fn test_new_orders_roots() {
        let q = Quadratic::new(1, 5, -5);
        assert_eq!((q.x, q.y), (-5, 5));
    }

    #[test]
    fn test_case_layout() {
        let case = generate_seeded(&generator(), 31).unwrap();
        assert!(case.program.is_none());
        assert_eq!(case.input[0], "36");
        assert_eq!(case.input.len(), 37);
        assert_eq!(case.output.len(), 72);
        // First grid case: a = -1, x = y = 0
        assert_eq!(case.input[1], "-1 0 0");
        assert_eq!(&case.output[..2], &["0".to_string(), "0".to_string()]);
    }

    #[test]
    fn test_random_cases_respect_bounds() {
        let generator = generator();
        let mut rng = rand::rngs::StdRng::seed_from_u64(32);
        for _ in 0..500 {
            let q = generator.sample(&mut rng);
            assert!(q.a != 0 && (-50..=50).contains(&q.a));
            assert!((-50..=50).contains(&q.x) && (-50..=50).contains(&q.y));
            assert!(q.x <= q.y);
        }
    }

    #[test]
    fn test_check_rejects_swapped_roots() {
        let generator = generator();
        let mut case = generate_seeded(&generator, 33).unwrap();
        // Grid case a = -1, x = 0, y = 1 occupies output lines 2 and 3
        case.output.swap(2, 3);
        assert!(matches!(generator.check(&case), Err(FixtureError::Check(_))));
    }

    #[test]
    fn test_check_rejects_wrong_roots() {
        let generator = generator();
        let mut case = generate_seeded(&generator, 34).unwrap();
        case.output[1] = "7".to_string();
        assert!(generator.check(&case).is_err());
    }

    #[test]
    fn test_check_rejects_tampered_coefficients() {
        let generator = generator();
        let mut case = generate_seeded(&generator, 36).unwrap();
        // Grid case a = -1, x = 0, y = 0 expands to `-1 0 0`
        case.input[1] = "-1 0 5".to_string();
        assert!(matches!(generator.check(&case), Err(FixtureError::Check(_))));
    }

    #[test]
    fn test_oversized_random_case_count_is_config_error() {
        let generator = QuadraticGenerator::new(QuadraticConfig::default().with_random_cases(usize::MAX));
        assert!(matches!(generate_seeded(&generator, 0), Err(FixtureError::Config(_))));
    }

    #[test]
    fn test_no_random_cases() {
        let generator = QuadraticGenerator::new(QuadraticConfig::default().with_random_cases(0));
        let case = generate_seeded(&generator, 35).unwrap();
        assert_eq!(case.input[0], "18");
        generator.check(&case).unwrap();
    }
}
