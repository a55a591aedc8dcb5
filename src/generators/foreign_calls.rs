//! Foreign functions with many arguments
//!
//! Declares `foreign fN: [Int, ...] -> Int;` for every arity and calls each once. The functions are implemented
//! natively as weighted sums and shipped alongside the program in `foreign-functions.c`.

use rand::RngCore;

use cac_syntax::ast::{Program, Type};
use cac_syntax::Stmt;

use crate::config::NaryCallConfig;
use crate::errors::Result;
use crate::fixture::{NativeFunction, TestCase};

use super::nary;
use super::{CaseGenerator, Scenario};

pub struct ForeignCallGenerator {
    config: NaryCallConfig,
}

impl ForeignCallGenerator {
    pub fn new(config: NaryCallConfig) -> Self {
        Self { config }
    }
}

/// `fN` for arity `N`
fn function_name(arity: usize) -> String {
    format!("f{arity}")
}

impl CaseGenerator for ForeignCallGenerator {
    fn scenario(&self) -> Scenario {
        Scenario::ForeignCalls
    }

    #[tracing::instrument(skip_all, fields(max_arity = self.config.max_arity))]
    fn generate(&self, rng: &mut dyn RngCore) -> Result<TestCase> {
        self.config.validate()?;

        let mut decls = vec![nary::write_int_decl()];
        let mut calls = Vec::new();
        let mut natives = Vec::new();

        for arity in 1..=self.config.max_arity {
            let name = function_name(arity);
            let weights = (0..arity).map(|i| self.config.weighting.weight(i)).collect();
            natives.push(NativeFunction::new(&name, weights));
            decls.push(Stmt::foreign(&name, vec![Type::Int; arity], Type::Int));

            let args = nary::sample_args(rng, &self.config, arity);
            calls.push(nary::print_call(&name, &args));
        }

        let program: Program = decls.into_iter().chain(calls).collect();
        Ok(TestCase {
            program: Some(program),
            input: Vec::new(),
            output: nary::expected_output(&self.config),
            natives,
        })
    }

    fn check(&self, case: &TestCase) -> Result<()> {
        nary::check_by_evaluation(case, &self.config)
    }
}
