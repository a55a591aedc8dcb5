//! Shared pieces of the n-ary call families

use rand::{Rng, RngCore};

use cac_syntax::ast::{BinaryOp, Expr, Param, Program, Stmt, Type};
use cac_syntax::eval::{self, WRITE_INT};

use crate::config::{NaryCallConfig, Weighting};
use crate::errors::{FixtureError, Result};
use crate::fixture::{NativeLibrary, TestCase};

use super::parse_ints;

/// Name of the `i`-th parameter
pub(super) fn param_name(i: usize) -> String {
    format!("x{i}")
}

/// `foreign write_int: [Int] -> Unit;`
pub(super) fn write_int_decl() -> Stmt {
    Stmt::foreign(WRITE_INT, vec![Type::Int], Type::Unit)
}

pub(super) fn int_params(arity: usize) -> Vec<Param> {
    (0..arity).map(|i| Param::new(param_name(i), Type::Int)).collect()
}

/// Body of the arity-`arity` function: `x0 + x1 + ...` or `1 * x0 + 2 * x1 + ...`
pub(super) fn body(weighting: Weighting, arity: usize) -> Expr {
    let terms = (0..arity).map(|i| match weighting {
        Weighting::Uniform => Expr::var(param_name(i)),
        Weighting::Positional => Expr::binary(Expr::Int(weighting.weight(i)), BinaryOp::Mul, Expr::var(param_name(i))),
    });
    Expr::sum(terms).unwrap_or(Expr::Int(0))
}

pub(super) fn weighted_sum(weighting: Weighting, args: &[i64]) -> i64 {
    args.iter()
        .enumerate()
        .map(|(i, x)| weighting.weight(i) * x)
        .sum()
}

/// Sample `arity` arguments and shift the adjusted one so the weighted sum hits the target.
pub(super) fn sample_args(rng: &mut dyn RngCore, config: &NaryCallConfig, arity: usize) -> Vec<i64> {
    let mut args: Vec<i64> = (0..arity).map(|_| rng.gen_range(config.args.clone())).collect();
    let index = config.adjusted.index(arity);
    // Weight of the adjusted argument is 1 (checked by `NaryCallConfig::validate`)
    args[index] += config.target - weighted_sum(config.weighting, &args);
    tracing::debug!(arity, ?args, "sampled call arguments");
    args
}

/// `write_int[callee[args]];`
pub(super) fn print_call(callee: &str, args: &[i64]) -> Stmt {
    let args = args.iter().map(|&a| Expr::Int(a)).collect();
    Stmt::Expr(Expr::call(WRITE_INT, vec![Expr::call(callee, args)]))
}

/// Expected output: the target once per call
pub(super) fn expected_output(config: &NaryCallConfig) -> Vec<String> {
    vec![config.target.to_string(); config.max_arity]
}

/// Run the program through the reference evaluator and compare with the expected output.
pub(super) fn check_by_evaluation(case: &TestCase, config: &NaryCallConfig) -> Result<()> {
    let program: &Program = case
        .program
        .as_ref()
        .ok_or_else(|| FixtureError::Check("case has no program".to_string()))?;

    let expected = parse_ints(&case.output, "output")?;
    if expected.len() != config.max_arity {
        return Err(FixtureError::Check(format!(
            "expected {} output lines, found {}",
            config.max_arity,
            expected.len()
        )));
    }
    if let Some(bad) = expected.iter().find(|&&v| v != config.target) {
        return Err(FixtureError::Check(format!(
            "output value {} differs from target {}",
            bad, config.target
        )));
    }

    let actual = eval::evaluate(program, &NativeLibrary(&case.natives))?;
    if actual != expected {
        return Err(FixtureError::Check(format!(
            "program writes {:?}, expected {:?}",
            actual, expected
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_body_rendering() {
        assert_eq!(body(Weighting::Uniform, 3).to_string(), "x0 + x1 + x2");
        assert_eq!(body(Weighting::Positional, 2).to_string(), "1 * x0 + 2 * x1");
        assert_eq!(body(Weighting::Uniform, 0).to_string(), "0");
    }

    #[test]
    fn test_weighted_sum() {
        assert_eq!(weighted_sum(Weighting::Uniform, &[1, 2, 3]), 6);
        assert_eq!(weighted_sum(Weighting::Positional, &[1, 2, 3]), 14);
    }

    #[test]
    fn test_sample_args_hits_target() {
        let mut rng = StdRng::seed_from_u64(7);
        for config in [NaryCallConfig::foreign(), NaryCallConfig::local_sum()] {
            for arity in 1..=config.max_arity {
                let args = sample_args(&mut rng, &config, arity);
                assert_eq!(args.len(), arity);
                assert_eq!(weighted_sum(config.weighting, &args), config.target);
            }
        }
    }

    #[test]
    fn test_unadjusted_args_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(99);
        let config = NaryCallConfig::local_sum();
        let args = sample_args(&mut rng, &config, 19);
        assert!(args[..18].iter().all(|a| config.args.contains(a)));
    }

    #[test]
    fn test_print_call() {
        assert_eq!(print_call("f", &[3, -4]).to_string(), "write_int[f[3, -4]];");
    }
}
