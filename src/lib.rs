#![forbid(unsafe_code)]
//! Test-data tooling for the cac compiler test suite
//!
//! Two independent utilities:
//!
//! - **Case generation** ([`generators`]): deterministic, seeded generation of I/O test cases (`program.cac`,
//!   `input.txt`, `output.txt` and, for foreign calls, `foreign-functions.c`).
//! - **Manifest scaffolding** ([`manifest`]): placeholder `descriptions.json` manifests for the incorrect-examples
//!   tree.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` with `?` / `map_err`. The `cli` module enforces `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fixture;
pub mod generators;
pub mod manifest;

pub use config::{NaryCallConfig, QuadraticConfig, RangeSumConfig, ScaffoldConfig, ScaffoldMode};
pub use errors::{FixtureError, Result};
pub use fixture::{FixtureWriter, NativeFunction, TestCase};
pub use generators::{CaseGenerator, Scenario, generate_seeded, generator_for};
pub use manifest::{Manifest, ScaffoldReport, scaffold};
