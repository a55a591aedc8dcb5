//! Reference evaluator for generated programs
//!
//! Runs a [`Program`] built from this crate's nodes and collects everything passed to `write_int`. Let-bound
//! functions are overloaded by arity; a later definition with the same name and arity shadows the earlier one.
//! Foreign functions other than `write_int` are served by a [`Host`].

use std::collections::HashMap;

use thiserror::Error;

use crate::ast::{BinaryOp, Expr, Ident, Param, Program, Stmt};

/// Built-in output function every generated program declares
pub const WRITE_INT: &str = "write_int";

const MAX_CALL_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("no function `{name}` taking {arity} argument(s) is in scope")]
    UnknownFunction { name: String, arity: usize },

    #[error("unbound variable `{0}`")]
    UnboundVariable(String),

    #[error("foreign function `{name}` is declared with {declared} parameter(s) but called with {given}")]
    ArityMismatch { name: String, declared: usize, given: usize },

    #[error("integer overflow while evaluating `{0}`")]
    Overflow(String),

    #[error("expected an Int value in `{0}`, found Unit")]
    UnitValue(String),

    #[error("call depth exceeded {MAX_CALL_DEPTH}")]
    RecursionLimit,

    #[error("host cannot execute foreign function `{0}`")]
    Host(String),
}

/// Supplies implementations for foreign functions.
pub trait Host {
    /// Call the foreign function `name`. Returns `None` when the host does not provide it.
    fn call(&self, name: &str, args: &[i64]) -> Option<i64>;
}

/// Host without any foreign functions besides `write_int`.
pub struct NoHost;

impl Host for NoHost {
    fn call(&self, _name: &str, _args: &[i64]) -> Option<i64> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Value {
    Int(i64),
    Unit,
}

struct Function<'p> {
    params: &'p [Param],
    body: &'p Expr,
}

struct Interpreter<'p, H: Host> {
    host: &'p H,
    functions: HashMap<(Ident, usize), Function<'p>>,
    foreign: HashMap<Ident, usize>,
    output: Vec<i64>,
    depth: usize,
}

/// Evaluate `program` and return the values written with `write_int`, in order.
#[tracing::instrument(skip_all, fields(stmt_count = program.len()))]
pub fn evaluate<H: Host>(program: &Program, host: &H) -> Result<Vec<i64>, EvalError> {
    let mut interp = Interpreter {
        host,
        functions: HashMap::new(),
        foreign: HashMap::new(),
        output: Vec::new(),
        depth: 0,
    };

    for stmt in &program.statements {
        match stmt {
            Stmt::Foreign { name, params, .. } => {
                interp.foreign.insert(name.clone(), params.len());
            }
            Stmt::Let {
                name, params, body, ..
            } => {
                interp
                    .functions
                    .insert((name.clone(), params.len()), Function { params, body });
            }
            Stmt::Expr(expr) => {
                interp.eval(expr, &HashMap::new())?;
            }
        }
    }

    Ok(interp.output)
}

impl<'p, H: Host> Interpreter<'p, H> {
    fn eval(&mut self, expr: &Expr, env: &HashMap<&str, i64>) -> Result<Value, EvalError> {
        match expr {
            Expr::Int(v) => Ok(Value::Int(*v)),
            Expr::Var(name) => env
                .get(name.as_str())
                .map(|v| Value::Int(*v))
                .ok_or_else(|| EvalError::UnboundVariable(name.clone())),
            Expr::Binary(lhs, op, rhs) => {
                let l = self.eval_int(lhs, env)?;
                let r = self.eval_int(rhs, env)?;
                let value = match op {
                    BinaryOp::Add => l.checked_add(r),
                    BinaryOp::Mul => l.checked_mul(r),
                };
                value.map(Value::Int).ok_or_else(|| EvalError::Overflow(expr.to_string()))
            }
            Expr::Call(callee, args) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_int(arg, env)?);
                }
                self.call(callee, &values)
            }
        }
    }

    fn eval_int(&mut self, expr: &Expr, env: &HashMap<&str, i64>) -> Result<i64, EvalError> {
        match self.eval(expr, env)? {
            Value::Int(v) => Ok(v),
            Value::Unit => Err(EvalError::UnitValue(expr.to_string())),
        }
    }

    fn call(&mut self, name: &str, args: &[i64]) -> Result<Value, EvalError> {
        let key = (name.to_string(), args.len());
        if let Some(func) = self.functions.get(&key) {
            let (params, body) = (func.params, func.body);
            if self.depth >= MAX_CALL_DEPTH {
                return Err(EvalError::RecursionLimit);
            }
            let env: HashMap<&str, i64> = params.iter().map(|p| p.name.as_str()).zip(args.iter().copied()).collect();
            self.depth += 1;
            let result = self.eval(body, &env);
            self.depth -= 1;
            return result;
        }

        let Some(&declared) = self.foreign.get(name) else {
            return Err(EvalError::UnknownFunction {
                name: name.to_string(),
                arity: args.len(),
            });
        };
        if declared != args.len() {
            return Err(EvalError::ArityMismatch {
                name: name.to_string(),
                declared,
                given: args.len(),
            });
        }

        if name == WRITE_INT {
            self.output.push(args[0]);
            return Ok(Value::Unit);
        }

        self.host
            .call(name, args)
            .map(Value::Int)
            .ok_or_else(|| EvalError::Host(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Type;

    fn write_int_decl() -> Stmt {
        Stmt::foreign(WRITE_INT, vec![Type::Int], Type::Unit)
    }

    fn print(expr: Expr) -> Stmt {
        Stmt::Expr(Expr::call(WRITE_INT, vec![expr]))
    }

    fn sum_fn(arity: usize) -> Stmt {
        let params = (0..arity).map(|i| Param::new(format!("x{i}"), Type::Int)).collect();
        let body = Expr::sum((0..arity).map(|i| Expr::var(format!("x{i}")))).unwrap();
        Stmt::function("f", params, Type::Int, body)
    }

    struct Doubler;

    impl Host for Doubler {
        fn call(&self, name: &str, args: &[i64]) -> Option<i64> {
            (name == "double").then(|| args[0] * 2)
        }
    }

    #[test]
    fn test_write_int_collects_output() {
        let program: Program = vec![write_int_decl(), print(Expr::Int(4)), print(Expr::Int(-2))]
            .into_iter()
            .collect();
        assert_eq!(evaluate(&program, &NoHost).unwrap(), vec![4, -2]);
    }

    #[test]
    fn test_overload_by_arity() {
        let program: Program = vec![
            write_int_decl(),
            sum_fn(1),
            sum_fn(3),
            print(Expr::call("f", vec![Expr::Int(5)])),
            print(Expr::call("f", vec![Expr::Int(1), Expr::Int(2), Expr::Int(3)])),
        ]
        .into_iter()
        .collect();
        assert_eq!(evaluate(&program, &NoHost).unwrap(), vec![5, 6]);
    }

    #[test]
    fn test_foreign_served_by_host() {
        let program: Program = vec![
            write_int_decl(),
            Stmt::foreign("double", vec![Type::Int], Type::Int),
            print(Expr::call("double", vec![Expr::Int(21)])),
        ]
        .into_iter()
        .collect();
        assert_eq!(evaluate(&program, &Doubler).unwrap(), vec![42]);
        assert_eq!(
            evaluate(&program, &NoHost),
            Err(EvalError::Host("double".to_string()))
        );
    }

    #[test]
    fn test_unknown_function() {
        let program: Program = vec![write_int_decl(), print(Expr::call("f", vec![Expr::Int(1)]))]
            .into_iter()
            .collect();
        assert_eq!(
            evaluate(&program, &NoHost),
            Err(EvalError::UnknownFunction {
                name: "f".to_string(),
                arity: 1
            })
        );
    }

    #[test]
    fn test_foreign_arity_mismatch() {
        let program: Program = vec![write_int_decl(), Stmt::Expr(Expr::call(WRITE_INT, vec![]))]
            .into_iter()
            .collect();
        assert!(matches!(
            evaluate(&program, &NoHost),
            Err(EvalError::ArityMismatch { declared: 1, given: 0, .. })
        ));
    }

    #[test]
    fn test_unit_used_as_int() {
        let program: Program = vec![write_int_decl(), print(Expr::call(WRITE_INT, vec![Expr::Int(1)]))]
            .into_iter()
            .collect();
        assert!(matches!(evaluate(&program, &NoHost), Err(EvalError::UnitValue(_))));
    }

    #[test]
    fn test_overflow_is_reported() {
        let program: Program = vec![
            write_int_decl(),
            print(Expr::binary(Expr::Int(i64::MAX), BinaryOp::Add, Expr::Int(1))),
        ]
        .into_iter()
        .collect();
        assert!(matches!(evaluate(&program, &NoHost), Err(EvalError::Overflow(_))));
    }

    #[test]
    fn test_unbounded_recursion_is_cut_off() {
        let program: Program = vec![
            Stmt::function(
                "loop",
                vec![Param::new("x", Type::Int)],
                Type::Int,
                Expr::call("loop", vec![Expr::var("x")]),
            ),
            Stmt::Expr(Expr::call("loop", vec![Expr::Int(0)])),
        ]
        .into_iter()
        .collect();
        assert_eq!(evaluate(&program, &NoHost), Err(EvalError::RecursionLimit));
    }
}
