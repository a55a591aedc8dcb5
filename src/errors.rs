//! Error types shared by the generators, the fixture writer and the manifest scaffolder.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use cac_syntax::EvalError;

#[derive(Debug, Error, Diagnostic)]
pub enum FixtureError {
    #[error("I/O error on '{}': {source}", path.display())]
    #[diagnostic(code(cac_fixtures::io), help("check that the path exists and is writable"))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed manifest '{}': {source}", path.display())]
    #[diagnostic(
        code(cac_fixtures::manifest),
        help("fix the JSON by hand or rerun without --merge to regenerate it from scratch")
    )]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    #[diagnostic(code(cac_fixtures::config))]
    Config(String),

    #[error("generated case failed its check: {0}")]
    #[diagnostic(
        code(cac_fixtures::check),
        help("the generator and its expected-output arithmetic disagree; nothing was written")
    )]
    Check(String),

    #[error("evaluating the generated program failed: {0}")]
    #[diagnostic(code(cac_fixtures::eval))]
    Eval(#[from] EvalError),
}

impl FixtureError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FixtureError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = FixtureError> = std::result::Result<T, E>;
