//! Incorrect-example manifests
//!
//! Each category directory under the incorrect-examples root carries a `descriptions.json` that tells the test
//! suite which errors each example is expected to raise:
//!
//! ```json
//! {
//!   "examples": [
//!     {
//!       "path": "unterminated_comment.cac",
//!       "errors": {
//!         "lexerErrors": false
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! `path` is relative to the manifest's directory. The scaffolder only writes placeholders; classifications are
//! corrected by hand afterwards, which is what the merge mode preserves.

pub mod scaffold;

use serde::{Deserialize, Serialize};

pub use scaffold::{CategoryOutcome, ScaffoldReport, scaffold};

/// Error kinds an example is expected to raise
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorKinds {
    pub lexer_errors: bool,
    /// Kinds added by hand that this tool does not know about; carried through merges untouched
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleEntry {
    pub path: String,
    pub errors: ErrorKinds,
}

impl ExampleEntry {
    /// Placeholder entry: no error kind expected
    pub fn placeholder(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            errors: ErrorKinds::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub examples: Vec<ExampleEntry>,
}

impl Manifest {
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&ExampleEntry> {
        self.examples.iter().find(|e| e.path == path)
    }

    /// Pretty JSON with two-space indentation
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
