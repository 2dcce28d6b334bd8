//! Error taxonomy: kinds, messages, and call-site line attribution.

use pretty_assertions::assert_eq;
use rook::{CollectOutput, EmptyInput, ErrorKind, Exception, Program};

fn run_err(source: &str) -> Exception {
    let program = match Program::compile(source) {
        Ok(program) => program,
        Err(err) => return err,
    };
    let mut output = CollectOutput::new();
    program.run(&mut EmptyInput, &mut output).unwrap_err()
}

// === definition uniqueness ===

#[test]
fn duplicate_class_name() {
    let err = run_err("(class a)\n(class a)\n(class main (method void main () (return)))");
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert!(err.message.contains("duplicate class name a"));
    assert_eq!(err.line, Some(2));
}

#[test]
fn duplicate_field_name() {
    let err = run_err("(class main (field int x 0)\n(field int x 1))");
    assert_eq!(err.kind, ErrorKind::NameError);
    assert!(err.message.contains("duplicate field x"));
    assert_eq!(err.line, Some(2));
}

#[test]
fn duplicate_method_name() {
    let err = run_err("(class main (method void m () (return)) (method int m ((int x)) (return x)))");
    assert_eq!(err.kind, ErrorKind::NameError);
    assert!(err.message.contains("duplicate method m"));
}

#[test]
fn duplicate_formal_parameter() {
    let err = run_err(
        "(class main
           (method void m ((int x) (int x)) (return))
           (method void main () (call me m 1 2)))",
    );
    assert_eq!(err.kind, ErrorKind::NameError);
    assert!(err.message.contains("duplicate formal param x"));
    assert_eq!(err.line, Some(3));
}

#[test]
fn duplicate_let_binding() {
    let err = run_err(
        "(class main
           (method void main ()
             (let ((int x 1) (int x 2))
               (print x))))",
    );
    assert_eq!(err.kind, ErrorKind::NameError);
    assert!(err.message.contains("duplicate let params x"));
}

// === dispatch failures ===

#[test]
fn unknown_method() {
    let err = run_err(
        "(class main
           (method void main ()
             (call me vanish)))",
    );
    assert_eq!(err.kind, ErrorKind::NameError);
    assert!(err.message.contains("unknown method vanish"));
    assert_eq!(err.line, Some(3));
}

#[test]
fn arity_mismatch_after_exhausting_chain() {
    let err = run_err(
        "(class a (method int val () (return 1)))
         (class b inherits a (method int val ((int x)) (return x)))
         (class main
           (method void main ()
             (call (new b) val 1 2)))",
    );
    assert_eq!(err.kind, ErrorKind::NameError);
    assert!(err.message.contains("invalid number of parameters in call to val"));
    assert_eq!(err.line, Some(5));
}

#[test]
fn null_dereference_reports_call_line() {
    let err = run_err(
        "(class a (method string greet () (return \"A\")))
         (class main
           (field a ref null)
           (method void main ()
             (call ref greet)))",
    );
    assert_eq!(err.kind, ErrorKind::FaultError);
    assert_eq!(err.message, "null dereference");
    assert_eq!(err.line, Some(5));
}

#[test]
fn super_without_superclass_is_a_null_dereference() {
    let err = run_err(
        "(class main
           (method void main ()
             (call super anything)))",
    );
    assert_eq!(err.kind, ErrorKind::FaultError);
    assert_eq!(err.message, "null dereference");
}

#[test]
fn method_call_on_primitive_value() {
    let err = run_err(
        "(class main
           (method void main ()
             (call 5 greet)))",
    );
    assert_eq!(err.kind, ErrorKind::TypeError);
}

// === type failures ===

#[test]
fn unknown_class_in_new_reports_call_line() {
    let err = run_err(
        "(class main
           (method void main ()
             (call (new ghost) say)))",
    );
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert!(err.message.contains("No class named ghost found"));
    assert_eq!(err.line, Some(3));
}

#[test]
fn unknown_type_in_field_declaration() {
    let err = run_err("(class main (field ghost x null))");
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert!(err.message.contains("invalid type name ghost"));
}

#[test]
fn unknown_formal_type_surfaces_at_call() {
    let source = "(class main
           (method void m ((ghost x)) (return))
           (method void main () (call me m 1)))";
    // compiles fine; the formal type is only resolved when the method runs
    let program = Program::compile(source).unwrap();
    let mut output = CollectOutput::new();
    let err = program.run(&mut EmptyInput, &mut output).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert!(err.message.contains("invalid type name ghost"));
}

#[test]
fn non_boolean_if_condition() {
    let err = run_err(
        "(class main
           (method void main ()
             (if 1 (print \"x\"))))",
    );
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert!(err.message.contains("non-boolean if condition"));
    assert_eq!(err.line, Some(3));
}

#[test]
fn non_boolean_while_condition() {
    let err = run_err(
        "(class main
           (method void main ()
             (while \"yes\" (print \"x\"))))",
    );
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert!(err.message.contains("non-boolean while condition"));
}

#[test]
fn operator_not_defined_for_operand_type() {
    let err = run_err("(class main (method void main () (print (& 1 2))))");
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert_eq!(err.message, "invalid operator applied to ints");
}

#[test]
fn incompatible_operand_types() {
    let err = run_err("(class main (method void main () (print (+ 1 \"x\"))))");
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert!(err.message.contains("applied to two incompatible types"));
}

#[test]
fn unary_not_on_non_boolean() {
    let err = run_err("(class main (method void main () (print (! 5))))");
    assert_eq!(err.kind, ErrorKind::TypeError);
}

#[test]
fn return_type_mismatch() {
    let err = run_err(
        "(class main
           (method int m () (return \"text\"))
           (method void main () (call me m)))",
    );
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert_eq!(err.message, "mismatched type and value");
}

#[test]
fn assignment_type_mismatch_on_field() {
    let err = run_err(
        "(class main
           (field int x 0)
           (method void main () (set x true)))",
    );
    assert_eq!(err.kind, ErrorKind::TypeError);
}

#[test]
fn assignment_from_nothing() {
    let err = run_err(
        "(class main
           (field int x 0)
           (method void v () (return))
           (method void main ()
             (set x (call me v))))",
    );
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert!(err.message.contains("can't assign to nothing x"));
    assert_eq!(err.line, Some(5));
}

#[test]
fn division_by_zero_reports_statement_line() {
    let err = run_err(
        "(class main
           (method void main ()
             (print (/ 1 0))))",
    );
    assert_eq!(err.kind, ErrorKind::FaultError);
    assert_eq!(err.message, "division by zero");
    assert_eq!(err.line, Some(3));
}

// === name failures ===

#[test]
fn parameter_type_mismatch_is_a_name_error() {
    let err = run_err(
        "(class main
           (method void m ((int x)) (return))
           (method void main () (call me m \"abc\")))",
    );
    assert_eq!(err.kind, ErrorKind::NameError);
    assert_eq!(err.message, "mismatched parameter and value");
}

#[test]
fn unknown_variable_in_expression() {
    let err = run_err(
        "(class main
           (method void main ()
             (print phantom)))",
    );
    assert_eq!(err.kind, ErrorKind::NameError);
    assert!(err.message.contains("invalid field or parameter phantom"));
    assert_eq!(err.line, Some(3));
}

#[test]
fn unknown_assignment_target() {
    let err = run_err("(class main (method void main () (set phantom 1)))");
    assert_eq!(err.kind, ErrorKind::NameError);
    assert!(err.message.contains("unknown variable phantom"));
}

#[test]
fn let_binding_goes_out_of_scope() {
    let err = run_err(
        "(class main
           (method void main ()
             (begin
               (let ((int x 1)) (print x))
               (print x))))",
    );
    assert_eq!(err.kind, ErrorKind::NameError);
    assert!(err.message.contains("invalid field or parameter x"));
    assert_eq!(err.line, Some(5));
}

// === bootstrap and syntax ===

#[test]
fn missing_main_class() {
    let err = run_err("(class helper (method void m () (return)))");
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert!(err.message.contains("No class named main found"));
    assert_eq!(err.line, None);
}

#[test]
fn missing_main_method() {
    let err = run_err("(class main (field int x 0))");
    assert_eq!(err.kind, ErrorKind::NameError);
    assert!(err.message.contains("unknown method main"));
}

#[test]
fn empty_program_is_missing_main() {
    let err = run_err("");
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert!(err.message.contains("No class named main found"));
}

#[test]
fn unknown_statement_head() {
    let err = run_err(
        "(class main
           (method void main ()
             (frobnicate 1)))",
    );
    assert_eq!(err.kind, ErrorKind::SyntaxError);
    assert!(err.message.contains("unknown statement frobnicate"));
    assert_eq!(err.line, Some(3));
}

#[test]
fn unbalanced_parens_are_a_syntax_error() {
    let err = run_err("(class main (method void main () (return))");
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}
