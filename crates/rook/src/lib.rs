#![doc = include_str!("../../../README.md")]

mod classes;
mod env;
mod error;
mod heap;
mod io;
pub mod keywords;
mod parse;
mod run;
mod tracer;
mod value;
mod vm;

pub use crate::{
    error::{ErrorKind, Exception, RunResult},
    io::{CollectOutput, EmptyInput, InputSource, NoOutput, OutputSink, ScriptedInput, StdInput, StdOutput},
    run::Program,
    tracer::{NoopTracer, RecordingTracer, StderrTracer, Tracer},
};
