//! Generator and scaffolder configuration
//!
//! Defaults reproduce the fixtures currently checked into the compiler's test suite. Every knob can be overridden
//! with the `with_*` builders; `validate()` rejects settings under which a generator could not keep its expected
//! output exact.

use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::errors::{FixtureError, Result};

/// Environment variable consulted when no `--seed` is given
pub const SEED_ENV: &str = "CAC_FIXTURES_SEED";

/// Default root of the incorrect-examples tree
pub const DEFAULT_INCORRECT_ROOT: &str = "examples/incorrect";

/// Default manifest file name
pub const MANIFEST_FILE_NAME: &str = "descriptions.json";

/// Largest absolute value accepted for sampled integers.
///
/// Keeps every closed-form expectation comfortably inside `i64`.
const MAX_MAGNITUDE: i64 = 1_000_000;

/// Largest arity the call generators will emit
const MAX_ARITY: usize = 64;

/// Largest number of generated lines (range-sum operations, quadratic cases) in one case
const MAX_LINES: usize = 1_000_000;

/// Whether `value` lies within `±MAX_MAGNITUDE`.
fn within_magnitude(value: i64) -> bool {
    (-MAX_MAGNITUDE..=MAX_MAGNITUDE).contains(&value)
}

/// Pick the RNG seed: explicit value, then `CAC_FIXTURES_SEED`, then fresh entropy.
pub fn resolve_seed(explicit: Option<u64>) -> u64 {
    let env_value = env::var(SEED_ENV).ok();
    resolve_seed_from(explicit, env_value.as_deref()).unwrap_or_else(rand::random)
}

/// Seed from an explicit value or the raw environment value. `None` means entropy should be used.
pub fn resolve_seed_from(explicit: Option<u64>, env_value: Option<&str>) -> Option<u64> {
    if explicit.is_some() {
        return explicit;
    }
    let value = env_value?;
    match value.trim().parse() {
        Ok(seed) => Some(seed),
        Err(_) => {
            tracing::warn!("ignoring unparsable {}={:?}", SEED_ENV, value);
            None
        }
    }
}

fn check_range(name: &str, range: &RangeInclusive<i64>) -> Result<()> {
    if range.is_empty() {
        return Err(FixtureError::Config(format!(
            "{} range {}..={} is empty",
            name,
            range.start(),
            range.end()
        )));
    }
    if !within_magnitude(*range.start()) || !within_magnitude(*range.end()) {
        return Err(FixtureError::Config(format!(
            "{} range {}..={} exceeds ±{}",
            name,
            range.start(),
            range.end(),
            MAX_MAGNITUDE
        )));
    }
    Ok(())
}

// ============================================================================
// N-ary call families
// ============================================================================

/// How parameters are weighted in the generated sum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weighting {
    /// `x0 + x1 + ...`
    Uniform,
    /// `1 * x0 + 2 * x1 + ...`
    Positional,
}

impl Weighting {
    /// Weight of the zero-based parameter `index`.
    pub fn weight(self, index: usize) -> i64 {
        match self {
            Weighting::Uniform => 1,
            Weighting::Positional => index as i64 + 1,
        }
    }
}

/// Which argument absorbs the difference to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustedArg {
    First,
    Last,
}

impl AdjustedArg {
    pub fn index(self, arity: usize) -> usize {
        match self {
            AdjustedArg::First => 0,
            AdjustedArg::Last => arity.saturating_sub(1),
        }
    }
}

/// Configuration shared by the foreign and local n-ary call families
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaryCallConfig {
    /// Arities 1..=max_arity are emitted, one call each
    pub max_arity: usize,
    /// Range sampled for each argument before adjustment
    pub args: RangeInclusive<i64>,
    /// Value every call must produce
    pub target: i64,
    pub weighting: Weighting,
    pub adjusted: AdjustedArg,
}

impl NaryCallConfig {
    /// Foreign weighted-sum functions `f1..f10`, target 100
    pub fn foreign() -> Self {
        Self {
            max_arity: 10,
            args: -100..=100,
            target: 100,
            weighting: Weighting::Positional,
            adjusted: AdjustedArg::First,
        }
    }

    /// Locally defined plain sums for arities 1..19, target 50
    pub fn local_sum() -> Self {
        Self {
            max_arity: 19,
            args: -50..=50,
            target: 50,
            weighting: Weighting::Uniform,
            adjusted: AdjustedArg::Last,
        }
    }

    /// Locally defined weighted sums for arities 1..10, target 100
    pub fn local_weighted() -> Self {
        Self {
            max_arity: 10,
            args: -100..=100,
            target: 100,
            weighting: Weighting::Positional,
            adjusted: AdjustedArg::First,
        }
    }

    pub fn with_max_arity(mut self, max_arity: usize) -> Self {
        self.max_arity = max_arity;
        self
    }

    pub fn with_target(mut self, target: i64) -> Self {
        self.target = target;
        self
    }

    pub fn with_args(mut self, args: RangeInclusive<i64>) -> Self {
        self.args = args;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_arity == 0 || self.max_arity > MAX_ARITY {
            return Err(FixtureError::Config(format!(
                "max arity must be in 1..={}, got {}",
                MAX_ARITY, self.max_arity
            )));
        }
        check_range("argument", &self.args)?;
        if !within_magnitude(self.target) {
            return Err(FixtureError::Config(format!(
                "target {} exceeds ±{}",
                self.target, MAX_MAGNITUDE
            )));
        }
        // The adjusted argument must carry weight 1 at every arity, otherwise the target is not always reachable.
        for arity in 1..=self.max_arity {
            let index = self.adjusted.index(arity);
            if self.weighting.weight(index) != 1 {
                return Err(FixtureError::Config(format!(
                    "adjusted argument x{} has weight {} at arity {}; it must have weight 1",
                    index,
                    self.weighting.weight(index),
                    arity
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Range-sum family
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSumConfig {
    /// Length of the reference array
    pub len: usize,
    /// Number of operations in the log
    pub ops: usize,
    /// Range of values written by updates
    pub values: RangeInclusive<i64>,
}

impl Default for RangeSumConfig {
    fn default() -> Self {
        Self {
            len: 50,
            ops: 50,
            values: -100..=100,
        }
    }
}

impl RangeSumConfig {
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    pub fn with_ops(mut self, ops: usize) -> Self {
        self.ops = ops;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_LINES).contains(&self.len) {
            return Err(FixtureError::Config(format!(
                "array length must be in 1..={}, got {}",
                MAX_LINES, self.len
            )));
        }
        if self.ops > MAX_LINES {
            return Err(FixtureError::Config(format!(
                "operation count must be at most {}, got {}",
                MAX_LINES, self.ops
            )));
        }
        check_range("value", &self.values)
    }
}

// ============================================================================
// Quadratic family
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadraticConfig {
    /// Randomly sampled cases appended after the exhaustive grid
    pub random_cases: usize,
    /// Leading coefficients are drawn from `-bound..=bound` without zero
    pub coefficient_bound: i64,
    /// Roots are drawn from `-bound..=bound`
    pub root_bound: i64,
}

impl Default for QuadraticConfig {
    fn default() -> Self {
        Self {
            random_cases: 18,
            coefficient_bound: 50,
            root_bound: 50,
        }
    }
}

impl QuadraticConfig {
    pub fn with_random_cases(mut self, random_cases: usize) -> Self {
        self.random_cases = random_cases;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.random_cases > MAX_LINES {
            return Err(FixtureError::Config(format!(
                "random case count must be at most {}, got {}",
                MAX_LINES, self.random_cases
            )));
        }
        if self.coefficient_bound < 1 {
            return Err(FixtureError::Config(
                "coefficient bound must be at least 1 so a nonzero leading coefficient exists".to_string(),
            ));
        }
        check_range("coefficient", &(-self.coefficient_bound..=self.coefficient_bound))?;
        if self.root_bound < 0 {
            return Err(FixtureError::Config(format!(
                "root bound must not be negative, got {}",
                self.root_bound
            )));
        }
        check_range("root", &(-self.root_bound..=self.root_bound))
    }
}

// ============================================================================
// Manifest scaffolder
// ============================================================================

/// What to do with a manifest that already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaffoldMode {
    /// Overwrite with fresh placeholder entries
    #[default]
    Regenerate,
    /// Keep classifications of files that still exist
    Merge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldConfig {
    pub root: PathBuf,
    pub file_name: String,
    pub mode: ScaffoldMode,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_INCORRECT_ROOT),
            file_name: MANIFEST_FILE_NAME.to_string(),
            mode: ScaffoldMode::default(),
        }
    }
}

impl ScaffoldConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: ScaffoldMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_name.is_empty() || self.file_name.contains(['/', '\\']) {
            return Err(FixtureError::Config(format!(
                "manifest file name must be a plain file name, got {:?}",
                self.file_name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Presets
    // ========================================

    #[test]
    fn test_foreign_preset() {
        let config = NaryCallConfig::foreign();
        assert_eq!(config.max_arity, 10);
        assert_eq!(config.args, -100..=100);
        assert_eq!(config.target, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_sum_preset() {
        let config = NaryCallConfig::local_sum();
        assert_eq!(config.max_arity, 19);
        assert_eq!(config.args, -50..=50);
        assert_eq!(config.target, 50);
        assert_eq!(config.adjusted, AdjustedArg::Last);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_weighted_preset() {
        let config = NaryCallConfig::local_weighted();
        assert_eq!(config.weighting, Weighting::Positional);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_weights() {
        assert_eq!(Weighting::Uniform.weight(7), 1);
        assert_eq!(Weighting::Positional.weight(0), 1);
        assert_eq!(Weighting::Positional.weight(4), 5);
    }

    #[test]
    fn test_adjusted_index() {
        assert_eq!(AdjustedArg::First.index(5), 0);
        assert_eq!(AdjustedArg::Last.index(5), 4);
        assert_eq!(AdjustedArg::Last.index(0), 0);
    }

    // ========================================
    // Validation
    // ========================================

    #[test]
    fn test_positional_weight_on_last_argument_rejected() {
        let mut config = NaryCallConfig::local_weighted();
        config.adjusted = AdjustedArg::Last;
        assert!(matches!(config.validate(), Err(FixtureError::Config(_))));

        // Arity 1 alone is fine: x0 has weight 1
        assert!(config.with_max_arity(1).validate().is_ok());
    }

    #[test]
    fn test_zero_arity_rejected() {
        assert!(NaryCallConfig::foreign().with_max_arity(0).validate().is_err());
        assert!(NaryCallConfig::foreign().with_max_arity(MAX_ARITY + 1).validate().is_err());
    }

    #[test]
    fn test_empty_argument_range_rejected() {
        #[allow(clippy::reversed_empty_ranges)]
        let config = NaryCallConfig::foreign().with_args(5..=-5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_target_rejected() {
        assert!(NaryCallConfig::foreign().with_target(i64::MAX).validate().is_err());
        assert!(matches!(
            NaryCallConfig::local_sum().with_target(i64::MIN).validate(),
            Err(FixtureError::Config(_))
        ));
        assert!(NaryCallConfig::foreign().with_target(-MAX_MAGNITUDE).validate().is_ok());
    }

    #[test]
    fn test_extreme_argument_range_rejected() {
        let config = NaryCallConfig::foreign().with_args(i64::MIN..=0);
        assert!(matches!(config.validate(), Err(FixtureError::Config(_))));
    }

    #[test]
    fn test_range_sum_validation() {
        assert!(RangeSumConfig::default().validate().is_ok());
        assert!(RangeSumConfig::default().with_len(0).validate().is_err());
        // Zero operations is a legitimate, if boring, log
        assert!(RangeSumConfig::default().with_ops(0).validate().is_ok());
    }

    #[test]
    fn test_range_sum_size_limits() {
        assert!(RangeSumConfig::default().with_len(usize::MAX).validate().is_err());
        assert!(RangeSumConfig::default().with_len(MAX_LINES).validate().is_ok());
        assert!(RangeSumConfig::default().with_ops(usize::MAX).validate().is_err());
        assert!(RangeSumConfig::default().with_ops(MAX_LINES + 1).validate().is_err());
    }

    #[test]
    fn test_quadratic_validation() {
        assert!(QuadraticConfig::default().validate().is_ok());
        let mut config = QuadraticConfig::default();
        config.coefficient_bound = 0;
        assert!(config.validate().is_err());
        assert!(QuadraticConfig::default().with_random_cases(usize::MAX).validate().is_err());
    }

    #[test]
    fn test_scaffold_defaults() {
        let config = ScaffoldConfig::default();
        assert_eq!(config.root, PathBuf::from("examples/incorrect"));
        assert_eq!(config.file_name, "descriptions.json");
        assert_eq!(config.mode, ScaffoldMode::Regenerate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scaffold_file_name_must_be_plain() {
        assert!(ScaffoldConfig::default().with_file_name("a/b.json").validate().is_err());
        assert!(ScaffoldConfig::default().with_file_name("").validate().is_err());
    }

    #[test]
    fn test_explicit_seed_wins() {
        assert_eq!(resolve_seed(Some(42)), 42);
        assert_eq!(resolve_seed_from(Some(42), Some("7")), Some(42));
    }

    #[test]
    fn test_env_seed_fallback() {
        assert_eq!(resolve_seed_from(None, Some("7")), Some(7));
        assert_eq!(resolve_seed_from(None, Some(" 99\n")), Some(99));
    }

    #[test]
    fn test_unparsable_env_seed_ignored() {
        assert_eq!(resolve_seed_from(None, Some("seven")), None);
        assert_eq!(resolve_seed_from(None, Some("-1")), None);
    }

    #[test]
    fn test_no_seed_source() {
        assert_eq!(resolve_seed_from(None, None), None);
    }
}
