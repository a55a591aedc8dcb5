//! Output writer for generated source
//!
//! Every statement goes through [`SourceWriter::end_statement`], so terminators and line breaks come out uniformly.

/// Statement terminator of the cac surface syntax
pub const STATEMENT_TERMINATOR: char = ';';

/// Line-oriented source buffer
#[derive(Debug, Default)]
pub struct SourceWriter {
    output: String,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the rendered output
    pub fn finish(self) -> String {
        self.output
    }

    /// Write a fragment on the current line
    pub fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    /// Terminate the current statement and start a new line
    pub fn end_statement(&mut self) {
        self.output.push(STATEMENT_TERMINATOR);
        self.output.push('\n');
    }
}
