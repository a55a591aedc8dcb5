//! Range sums with point updates
//!
//! Simulates an array under a random log of point updates and half-open range-sum queries. Query answers are taken
//! from the reference array at the moment the query is generated.
//!
//! Input layout: `n q`, then one line per operation (`0 i v` for `a[i] = v`, `1 l r` for `sum(a[l..r])`).
//! The program under test is written by hand, so no `program.cac` is produced.

use std::fmt;

use rand::{Rng, RngCore};

use crate::config::RangeSumConfig;
use crate::errors::{FixtureError, Result};
use crate::fixture::TestCase;

use super::{CaseGenerator, Scenario, parse_ints};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `a[index] = value`
    Update { index: usize, value: i64 },
    /// `sum(a[left..right])`, `right` exclusive
    Query { left: usize, right: usize },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Update { index, value } => write!(f, "0 {} {}", index, value),
            Operation::Query { left, right } => write!(f, "1 {} {}", left, right),
        }
    }
}

impl Operation {
    fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [kind, a, b] = fields.as_slice() else {
            return None;
        };
        match *kind {
            "0" => Some(Operation::Update {
                index: a.parse().ok()?,
                value: b.parse().ok()?,
            }),
            "1" => Some(Operation::Query {
                left: a.parse().ok()?,
                right: b.parse().ok()?,
            }),
            _ => None,
        }
    }
}

/// Reference array the operations are applied to
#[derive(Debug, Clone)]
pub struct RangeSumArray {
    values: Vec<i64>,
}

impl RangeSumArray {
    pub fn zeroed(len: usize) -> Self {
        Self { values: vec![0; len] }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Apply `op`; queries return their answer. `None` when an index is out of bounds.
    pub fn apply(&mut self, op: Operation) -> Option<Option<i64>> {
        match op {
            Operation::Update { index, value } => {
                *self.values.get_mut(index)? = value;
                Some(None)
            }
            Operation::Query { left, right } => {
                let slice = self.values.get(left..right)?;
                Some(Some(slice.iter().sum()))
            }
        }
    }
}

pub struct RangeSumGenerator {
    config: RangeSumConfig,
}

impl RangeSumGenerator {
    pub fn new(config: RangeSumConfig) -> Self {
        Self { config }
    }

    fn sample_operation(&self, rng: &mut dyn RngCore) -> Operation {
        let n = self.config.len;
        if rng.gen_range(0..=1) == 0 {
            Operation::Update {
                index: rng.gen_range(0..n),
                value: rng.gen_range(self.config.values.clone()),
            }
        } else {
            let left = rng.gen_range(0..n);
            Operation::Query {
                left,
                right: rng.gen_range(left..=n),
            }
        }
    }
}

impl CaseGenerator for RangeSumGenerator {
    fn scenario(&self) -> Scenario {
        Scenario::RangeSum
    }

    #[tracing::instrument(skip_all, fields(len = self.config.len, ops = self.config.ops))]
    fn generate(&self, rng: &mut dyn RngCore) -> Result<TestCase> {
        self.config.validate()?;

        let mut array = RangeSumArray::zeroed(self.config.len);
        let mut input = Vec::with_capacity(self.config.ops + 1);
        let mut output = Vec::new();
        input.push(format!("{} {}", self.config.len, self.config.ops));

        for _ in 0..self.config.ops {
            let op = self.sample_operation(rng);
            let answer = array
                .apply(op)
                .ok_or_else(|| FixtureError::Check(format!("sampled operation `{}` is out of bounds", op)))?;
            if let Some(sum) = answer {
                output.push(sum.to_string());
            }
            input.push(op.to_string());
        }

        tracing::debug!(queries = output.len(), "generated operation log");
        Ok(TestCase {
            program: None,
            input,
            output,
            natives: Vec::new(),
        })
    }

    /// Replay the operation log from the input lines.
    fn check(&self, case: &TestCase) -> Result<()> {
        let (header, ops) = case
            .input
            .split_first()
            .ok_or_else(|| FixtureError::Check("input is empty".to_string()))?;

        let (n, q) = parse_header(header)?;
        if ops.len() != q {
            return Err(FixtureError::Check(format!(
                "header announces {} operations, found {}",
                q,
                ops.len()
            )));
        }

        let mut array = RangeSumArray::zeroed(n);
        let mut answers = Vec::new();
        for (i, line) in ops.iter().enumerate() {
            let op = Operation::parse(line)
                .ok_or_else(|| FixtureError::Check(format!("operation {} is malformed: {:?}", i + 1, line)))?;
            match array.apply(op) {
                Some(Some(sum)) => answers.push(sum),
                Some(None) => {}
                None => {
                    return Err(FixtureError::Check(format!(
                        "operation {} (`{}`) is out of bounds for length {}",
                        i + 1,
                        op,
                        n
                    )));
                }
            }
        }

        let expected = parse_ints(&case.output, "output")?;
        if answers != expected {
            return Err(FixtureError::Check(format!(
                "replayed answers {:?} differ from expected {:?}",
                answers, expected
            )));
        }
        Ok(())
    }
}

fn parse_header(line: &str) -> Result<(usize, usize)> {
    let mut fields = line.split_whitespace().map(str::parse::<usize>);
    match (fields.next(), fields.next(), fields.next()) {
        (Some(Ok(n)), Some(Ok(q)), None) => Ok((n, q)),
        _ => Err(FixtureError::Check(format!("malformed header {:?}", line))),
    }
}
