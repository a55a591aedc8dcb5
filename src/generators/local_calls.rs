//! Local functions with many arguments
//!
//! Binds `let f = [x0: Int, ...] -> Int => ...;` once per arity, relying on overloading by arity, then calls every
//! overload once.

use rand::RngCore;

use cac_syntax::ast::{Program, Stmt, Type};

use crate::config::NaryCallConfig;
use crate::errors::Result;
use crate::fixture::TestCase;

use super::nary;
use super::{CaseGenerator, Scenario};

/// Name shared by every overload
const FUNCTION_NAME: &str = "f";

pub struct LocalCallGenerator {
    scenario: Scenario,
    config: NaryCallConfig,
}

impl LocalCallGenerator {
    pub fn new(scenario: Scenario, config: NaryCallConfig) -> Self {
        Self { scenario, config }
    }
}

impl CaseGenerator for LocalCallGenerator {
    fn scenario(&self) -> Scenario {
        self.scenario
    }

    #[tracing::instrument(skip_all, fields(scenario = %self.scenario, max_arity = self.config.max_arity))]
    fn generate(&self, rng: &mut dyn RngCore) -> Result<TestCase> {
        self.config.validate()?;

        let mut decls = vec![nary::write_int_decl()];
        let mut calls = Vec::new();

        for arity in 1..=self.config.max_arity {
            decls.push(Stmt::function(
                FUNCTION_NAME,
                nary::int_params(arity),
                Type::Int,
                nary::body(self.config.weighting, arity),
            ));

            let args = nary::sample_args(rng, &self.config, arity);
            calls.push(nary::print_call(FUNCTION_NAME, &args));
        }

        let program: Program = decls.into_iter().chain(calls).collect();
        Ok(TestCase {
            program: Some(program),
            input: Vec::new(),
            output: nary::expected_output(&self.config),
            natives: Vec::new(),
        })
    }

    fn check(&self, case: &TestCase) -> Result<()> {
        nary::check_by_evaluation(case, &self.config)
    }
}
