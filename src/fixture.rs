//! Test cases and the writer that lays them out on disk
//!
//! A case directory holds:
//! - `program.cac` - the generated program (only for families that generate one)
//! - `input.txt` - runtime input, possibly empty
//! - `output.txt` - expected output, one value per line
//! - `foreign-functions.c` - native implementations of foreign functions (only when there are any)
//!
//! Every file of a case is first staged in a hidden temporary sibling. Only once all of them are staged are they
//! renamed into place, so a failed run never leaves a truncated fixture or a mix of old and new files behind.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use cac_syntax::{Host, Program};

use crate::errors::{FixtureError, Result};

pub const PROGRAM_FILE: &str = "program.cac";
pub const INPUT_FILE: &str = "input.txt";
pub const OUTPUT_FILE: &str = "output.txt";
pub const NATIVES_FILE: &str = "foreign-functions.c";

const TEMP_SUFFIX: &str = ".cac-fixtures.tmp";

/// A native function computing `sum(weights[i] * x_i)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeFunction {
    pub name: String,
    pub weights: Vec<i64>,
}

impl NativeFunction {
    pub fn new(name: impl Into<String>, weights: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            weights,
        }
    }

    pub fn arity(&self) -> usize {
        self.weights.len()
    }

    /// Evaluate the native body. `None` on arity mismatch or overflow.
    pub fn apply(&self, args: &[i64]) -> Option<i64> {
        if args.len() != self.arity() {
            return None;
        }
        self.weights
            .iter()
            .zip(args)
            .try_fold(0i64, |acc, (w, x)| acc.checked_add(w.checked_mul(*x)?))
    }

    /// C definition, e.g. `int f2(int x0, int x1) { return 1 * x0 + 2 * x1; };`
    pub fn to_c(&self) -> String {
        let params: Vec<String> = (0..self.arity()).map(|i| format!("int x{i}")).collect();
        let terms: Vec<String> = self
            .weights
            .iter()
            .enumerate()
            .map(|(i, w)| format!("{w} * x{i}"))
            .collect();
        let body = if terms.is_empty() { "0".to_string() } else { terms.join(" + ") };
        format!("int {}({}) {{ return {}; }};", self.name, params.join(", "), body)
    }
}

/// Serves foreign calls from a set of native definitions.
pub struct NativeLibrary<'a>(pub &'a [NativeFunction]);

impl Host for NativeLibrary<'_> {
    fn call(&self, name: &str, args: &[i64]) -> Option<i64> {
        self.0
            .iter()
            .find(|f| f.name == name && f.arity() == args.len())
            .and_then(|f| f.apply(args))
    }
}

/// One generated (program, input, expected output) triple
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCase {
    /// `None` when the family's `program.cac` is written by hand
    pub program: Option<Program>,
    pub input: Vec<String>,
    pub output: Vec<String>,
    pub natives: Vec<NativeFunction>,
}

impl TestCase {
    pub fn input_text(&self) -> String {
        render_lines(&self.input)
    }

    pub fn output_text(&self) -> String {
        render_lines(&self.output)
    }

    pub fn natives_text(&self) -> String {
        let mut out = String::new();
        for native in &self.natives {
            let _ = writeln!(out, "{}", native.to_c());
        }
        out
    }
}

fn render_lines(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Name of the temporary sibling staged for `file_name`.
pub fn temp_file_name(file_name: &str) -> String {
    format!(".{file_name}{TEMP_SUFFIX}")
}

/// A file written to its temporary sibling and waiting to be renamed into place
struct Staged {
    tmp: PathBuf,
    path: PathBuf,
}

impl Staged {
    fn write(path: &Path, contents: &str) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FixtureError::Config(format!("'{}' has no file name", path.display())))?;
        let tmp = path.with_file_name(temp_file_name(file_name));
        fs::write(&tmp, contents).map_err(|e| FixtureError::io(&tmp, e))?;
        Ok(Self {
            tmp,
            path: path.to_path_buf(),
        })
    }

    fn commit(self) -> Result<PathBuf> {
        if let Err(e) = fs::rename(&self.tmp, &self.path) {
            self.discard();
            return Err(FixtureError::io(&self.path, e));
        }
        Ok(self.path)
    }

    fn discard(&self) {
        let _ = fs::remove_file(&self.tmp);
    }
}

/// Stage every `(path, contents)` pair, then rename them all into place.
///
/// Nothing is renamed unless every file was staged; staged files are removed on failure.
pub fn write_all_atomic(files: &[(PathBuf, String)]) -> Result<Vec<PathBuf>> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, contents) in files {
        match Staged::write(path, contents) {
            Ok(file) => staged.push(file),
            Err(e) => {
                staged.iter().for_each(Staged::discard);
                return Err(e);
            }
        }
    }

    let mut written = Vec::with_capacity(staged.len());
    let mut pending = staged.into_iter();
    while let Some(file) = pending.next() {
        match file.commit() {
            Ok(path) => written.push(path),
            Err(e) => {
                pending.for_each(|rest| rest.discard());
                return Err(e);
            }
        }
    }
    Ok(written)
}

/// Write `contents` to `path` through a temporary sibling and an atomic rename.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    Staged::write(path, contents)?.commit().map(|_| ())
}

/// Writes test cases into a case directory
pub struct FixtureWriter {
    dir: PathBuf,
}

impl FixtureWriter {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write every artifact of `case`, returning the paths written.
    #[tracing::instrument(skip_all, fields(dir = %self.dir.display()))]
    pub fn write(&self, case: &TestCase) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir).map_err(|e| FixtureError::io(&self.dir, e))?;

        let mut files: Vec<(PathBuf, String)> = Vec::new();
        if let Some(program) = &case.program {
            files.push((self.dir.join(PROGRAM_FILE), program.render()));
        }
        files.push((self.dir.join(INPUT_FILE), case.input_text()));
        files.push((self.dir.join(OUTPUT_FILE), case.output_text()));
        if !case.natives.is_empty() {
            files.push((self.dir.join(NATIVES_FILE), case.natives_text()));
        }

        let written = write_all_atomic(&files)?;
        for (path, contents) in &files {
            tracing::info!("wrote {} ({} bytes)", path.display(), contents.len());
        }
        Ok(written)
    }
}
