//! Host-shim I/O.
//!
//! The interpreter never touches the process's streams directly; programs
//! print through an [`OutputSink`] and read through an [`InputSource`].
//! Implement these to capture or script I/O when embedding — the collecting
//! and scripted implementations below are what the test suite uses.

use std::{
    collections::VecDeque,
    io::{self, BufRead as _, Write as _},
};

/// Trait for handling output from the `print` statement.
///
/// One call per executed `print`, carrying the fully concatenated text of all
/// its arguments. The sink owns line termination; the text never contains a
/// trailing newline.
pub trait OutputSink {
    /// Emits one program output line.
    fn output(&mut self, line: &str);
}

/// Trait supplying lines to the `inputs`/`inputi` statements.
pub trait InputSource {
    /// Reads one line, without its terminator. `None` means the source is
    /// exhausted, which the interpreter reports as a fault.
    fn read_line(&mut self) -> Option<String>;
}

/// Default `OutputSink` that writes lines to stdout.
///
/// Write failures (e.g. a closed pipe) are ignored; the interpreter has no
/// useful recovery and the process is about to notice anyway.
#[derive(Debug, Default)]
pub struct StdOutput;

impl OutputSink for StdOutput {
    fn output(&mut self, line: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
        let _ = stdout.flush();
    }
}

/// An `OutputSink` that collects all output into a string.
///
/// Useful for testing or capturing program output programmatically.
#[derive(Debug, Default)]
pub struct CollectOutput(String);

impl CollectOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected output so far, one `\n`-terminated line per `print`.
    #[must_use]
    pub fn output(&self) -> &str {
        self.0.as_str()
    }

    /// Consumes the sink and returns the collected output.
    #[must_use]
    pub fn into_output(self) -> String {
        self.0
    }
}

impl OutputSink for CollectOutput {
    fn output(&mut self, line: &str) {
        self.0.push_str(line);
        self.0.push('\n');
    }
}

/// `OutputSink` that ignores all output.
#[derive(Debug, Default)]
pub struct NoOutput;

impl OutputSink for NoOutput {
    fn output(&mut self, _line: &str) {}
}

/// `InputSource` reading lines from stdin.
#[derive(Debug, Default)]
pub struct StdInput;

impl InputSource for StdInput {
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
        }
    }
}

/// `InputSource` serving a fixed queue of lines, for tests and embedding.
#[derive(Debug, Default)]
pub struct ScriptedInput(VecDeque<String>);

impl ScriptedInput {
    #[must_use = "the source does nothing until a program reads from it"]
    pub fn new<I>(lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self(lines.into_iter().map(Into::into).collect())
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self) -> Option<String> {
        self.0.pop_front()
    }
}

/// `InputSource` that is always exhausted.
#[derive(Debug, Default)]
pub struct EmptyInput;

impl InputSource for EmptyInput {
    fn read_line(&mut self) -> Option<String> {
        None
    }
}
