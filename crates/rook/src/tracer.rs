//! Execution tracing.
//!
//! A [`Tracer`] observes every statement just before it executes. The default
//! [`NoopTracer`] costs nothing; [`StderrTracer`] gives the classic
//! line-by-line execution dump for debugging programs, and
//! [`RecordingTracer`] captures events for assertions in tests.

/// Observer for statement execution.
pub trait Tracer {
    /// Whether this tracer wants events at all. The interpreter skips
    /// rendering statements back to text when this returns false.
    fn enabled(&self) -> bool {
        true
    }

    /// Called before each statement runs. `line` is the statement head's
    /// source line; `text` is the statement rendered back to S-expression
    /// form.
    fn statement(&mut self, line: Option<u32>, text: &str);
}

/// Tracer that does nothing.
#[derive(Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn enabled(&self) -> bool {
        false
    }

    fn statement(&mut self, _line: Option<u32>, _text: &str) {}
}

/// Tracer that prints each statement to stderr as `line: statement`.
#[derive(Debug, Default)]
pub struct StderrTracer;

impl Tracer for StderrTracer {
    fn statement(&mut self, line: Option<u32>, text: &str) {
        match line {
            Some(line) => eprintln!("{line}: {text}"),
            None => eprintln!("?: {text}"),
        }
    }
}

/// Tracer that records every event for later inspection.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    events: Vec<(Option<u32>, String)>,
}

impl RecordingTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The `(line, statement)` events observed so far, in execution order.
    #[must_use]
    pub fn events(&self) -> &[(Option<u32>, String)] {
        &self.events
    }
}

impl Tracer for RecordingTracer {
    fn statement(&mut self, line: Option<u32>, text: &str) {
        self.events.push((line, text.to_owned()));
    }
}
