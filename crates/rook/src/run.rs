//! Public interface for compiling and running programs.

use crate::{
    classes::ClassIndex,
    error::Exception,
    io::{InputSource, OutputSink, StdInput, StdOutput},
    keywords,
    parse::parse,
    tracer::{NoopTracer, Tracer},
    vm::{ArgValues, Vm},
};

/// A compiled program: the parsed tree resolved into a class index, ready to
/// run any number of times.
///
/// Compiling only parses and builds class definitions — no objects exist and
/// nothing executes until [`Program::run`].
///
/// # Example
/// ```
/// use rook::{CollectOutput, EmptyInput, Program};
///
/// let program = Program::compile(
///     "(class main (method void main () (print \"hello\")))",
/// ).unwrap();
/// let mut output = CollectOutput::new();
/// program.run(&mut EmptyInput, &mut output).unwrap();
/// assert_eq!(output.output(), "hello\n");
/// ```
#[derive(Debug)]
pub struct Program {
    classes: ClassIndex,
}

impl Program {
    /// Parses source text and builds the class index.
    ///
    /// # Errors
    /// `SYNTAX_ERROR` for malformed input; `TYPE_ERROR`/`NAME_ERROR` for
    /// duplicate or ill-typed definitions.
    pub fn compile(source: &str) -> Result<Self, Exception> {
        let forms = parse(source)?;
        let classes = ClassIndex::build(&forms)?;
        Ok(Self { classes })
    }

    /// Runs the program: instantiates the `main` class and dispatches its
    /// zero-argument `main` method, discarding the result.
    ///
    /// Each run gets a fresh object arena; the class index is shared and
    /// immutable.
    ///
    /// # Errors
    /// The first interpreter error raised by the program. Errors are
    /// terminal — there is no catch mechanism in the language.
    pub fn run(&self, input: &mut impl InputSource, output: &mut impl OutputSink) -> Result<(), Exception> {
        self.run_traced(input, output, &mut NoopTracer)
    }

    /// As [`Program::run`], with a [`Tracer`] observing each statement.
    pub fn run_traced(
        &self,
        input: &mut impl InputSource,
        output: &mut impl OutputSink,
        tracer: &mut impl Tracer,
    ) -> Result<(), Exception> {
        let mut vm = Vm::new(&self.classes, input, output, tracer);
        let main_obj = vm.instantiate(keywords::MAIN_CLASS_DEF, None)?;
        vm.call_method(main_obj, keywords::MAIN_FUNC_DEF, ArgValues::new(), None, None)?;
        Ok(())
    }

    /// Runs on the process's stdin/stdout.
    pub fn run_stdio(&self) -> Result<(), Exception> {
        self.run(&mut StdInput, &mut StdOutput)
    }
}
