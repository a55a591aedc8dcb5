//! Structured source builder for the subset of the cac language emitted by the fixture generators.
//!
//! Generated programs are assembled as [`ast::Program`] values and rendered through [`writer::SourceWriter`], so the
//! surface syntax lives in one place no matter how many parameters a declaration grows.
//!
//! ## Notes
//! - Only the constructs the generators need exist here: foreign declarations, arrow-function `let` bindings, calls
//!   and integer arithmetic. This is not a parser.
//! - [`eval`] is a reference evaluator for that same subset. It lets fixtures be checked against their expected
//!   output without the real compiler.
//!
//! ## Examples
//! ```rust
//! use cac_syntax::ast::{Expr, Program, Stmt, Type};
//!
//! let mut program = Program::new();
//! program.push(Stmt::foreign("write_int", vec![Type::Int], Type::Unit));
//! program.push(Stmt::Expr(Expr::call("write_int", vec![Expr::Int(7)])));
//! assert_eq!(program.to_string(), "foreign write_int: [Int] -> Unit;\nwrite_int[7];\n");
//! ```

pub mod ast;
pub mod eval;
pub mod writer;

pub use ast::{BinaryOp, Expr, Param, Program, Stmt, Type};
pub use eval::{EvalError, Host, NoHost, evaluate};
