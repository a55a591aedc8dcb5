//! CLI module for cac-fixtures
//!
//! ## Commands
//!
//! - `generate <scenario>` - Generate one I/O test case into a directory
//! - `describe [root]` - Scaffold `descriptions.json` manifests for incorrect examples
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_INCORRECT_ROOT, MANIFEST_FILE_NAME};
use crate::errors::FixtureError;
use crate::generators::Scenario;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Library errors are rendered through miette so code and help text reach the user.
impl From<FixtureError> for CliError {
    fn from(err: FixtureError) -> Self {
        CliError::failure(format!("{:?}", miette::Report::new(err)))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Test-data tooling for the cac compiler test suite
#[derive(Parser, Debug)]
#[command(name = "cac-fixtures")]
#[command(version)]
#[command(about = "Generate I/O test cases and scaffold incorrect-example manifests", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one I/O test case
    Generate(GenerateArgs),

    /// Write descriptions.json manifests for every category of incorrect examples
    Describe {
        /// Root of the incorrect-examples tree
        #[arg(value_name = "ROOT", default_value = DEFAULT_INCORRECT_ROOT)]
        root: PathBuf,
        /// Keep classifications already recorded in existing manifests
        #[arg(long)]
        merge: bool,
        /// Manifest file name
        #[arg(long, value_name = "NAME", default_value = MANIFEST_FILE_NAME)]
        file_name: String,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Scenario family to generate
    #[arg(value_enum, value_name = "SCENARIO")]
    pub scenario: Scenario,

    /// Case directory to write into
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub out: PathBuf,

    /// RNG seed (falls back to $CAC_FIXTURES_SEED, then entropy)
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Re-derive the expected output before writing; nothing is written on mismatch
    #[arg(long)]
    pub check: bool,

    /// Largest arity to emit (call scenarios)
    #[arg(long, value_name = "N")]
    pub max_arity: Option<usize>,

    /// Value every call must produce (call scenarios)
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub target: Option<i64>,

    /// Array length (range-sum)
    #[arg(long, value_name = "N")]
    pub len: Option<usize>,

    /// Number of operations (range-sum)
    #[arg(long, value_name = "N")]
    pub ops: Option<usize>,

    /// Number of random cases after the fixed grid (quadratic)
    #[arg(long, value_name = "N")]
    pub random_cases: Option<usize>,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Generate(args) => commands::generate(&args),
        Command::Describe {
            root,
            merge,
            file_name,
        } => commands::describe(root, merge, file_name),
    }
}

// ============================================================================
// Tests
// ============================================================================
