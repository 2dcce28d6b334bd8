//! The `inputs`/`inputi` statements and host input wiring.

use pretty_assertions::assert_eq;
use rook::{CollectOutput, EmptyInput, ErrorKind, Program, ScriptedInput};

fn run_with_input(source: &str, lines: &[&str]) -> String {
    let program = Program::compile(source).unwrap();
    let mut input = ScriptedInput::new(lines.iter().copied());
    let mut output = CollectOutput::new();
    program.run(&mut input, &mut output).unwrap();
    output.into_output()
}

#[test]
fn inputs_reads_a_string_into_a_field() {
    let out = run_with_input(
        "(class main
           (field string name \"\")
           (method void main ()
             (begin
               (inputs name)
               (print \"hi \" name))))",
        &["rook"],
    );
    assert_eq!(out, "hi rook\n");
}

#[test]
fn inputi_reads_an_int_into_a_local() {
    let out = run_with_input(
        "(class main
           (method void main ()
             (let ((int n 0))
               (inputi n)
               (print (* n 2)))))",
        &["21"],
    );
    assert_eq!(out, "42\n");
}

#[test]
fn input_lines_drain_in_order() {
    let out = run_with_input(
        "(class main
           (field string a \"\")
           (field string b \"\")
           (method void main ()
             (begin
               (inputs a)
               (inputs b)
               (print b a))))",
        &["first", "second"],
    );
    assert_eq!(out, "secondfirst\n");
}

#[test]
fn inputi_accepts_negative_numbers() {
    let out = run_with_input(
        "(class main
           (field int n 0)
           (method void main ()
             (begin
               (inputi n)
               (print n))))",
        &["-5"],
    );
    assert_eq!(out, "-5\n");
}

#[test]
fn inputi_rejects_non_integer_input() {
    let program = Program::compile(
        "(class main
           (field int n 0)
           (method void main ()
             (inputi n)))",
    )
    .unwrap();
    let mut input = ScriptedInput::new(["not a number"]);
    let mut output = CollectOutput::new();
    let err = program.run(&mut input, &mut output).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert_eq!(err.line, Some(4));
}

#[test]
fn exhausted_input_is_a_fault() {
    let program = Program::compile(
        "(class main
           (field string s \"\")
           (method void main ()
             (inputs s)))",
    )
    .unwrap();
    let mut output = CollectOutput::new();
    let err = program.run(&mut EmptyInput, &mut output).unwrap_err();
    assert_eq!(err.kind, ErrorKind::FaultError);
    assert_eq!(err.message, "input exhausted");
}

#[test]
fn input_respects_shadowing() {
    // the local shadows the field, so the field keeps its default
    let out = run_with_input(
        "(class main
           (field int n 7)
           (method void main ()
             (let ((int n 0))
               (inputi n)
               (print n)))
           (method int field_value () (return n)))",
        &["3"],
    );
    assert_eq!(out, "3\n");
}

#[test]
fn input_type_checks_against_target() {
    // reading a string into an int-typed field mismatches
    let program = Program::compile(
        "(class main
           (field int n 0)
           (method void main ()
             (inputs n)))",
    )
    .unwrap();
    let mut input = ScriptedInput::new(["text"]);
    let mut output = CollectOutput::new();
    let err = program.run(&mut input, &mut output).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert_eq!(err.message, "mismatched type and value");
}
