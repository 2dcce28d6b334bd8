//! Reserved words and host constants.
//!
//! Every tag the interpreter treats specially lives here so that an embedding
//! host (or a test suite) has one place that pins the exact spellings. None of
//! these may be used as a user identifier in the positions where the
//! interpreter matches on them.

/// Head token of a class definition form.
pub const CLASS_DEF: &str = "class";
/// Marker between a class name and its superclass name.
pub const INHERITS_DEF: &str = "inherits";
/// Head token of a field member.
pub const FIELD_DEF: &str = "field";
/// Head token of a method member.
pub const METHOD_DEF: &str = "method";

/// Statement heads.
pub const BEGIN_DEF: &str = "begin";
pub const SET_DEF: &str = "set";
pub const IF_DEF: &str = "if";
pub const WHILE_DEF: &str = "while";
pub const RETURN_DEF: &str = "return";
pub const CALL_DEF: &str = "call";
pub const NEW_DEF: &str = "new";
pub const LET_DEF: &str = "let";
pub const PRINT_DEF: &str = "print";
pub const INPUT_STRING_DEF: &str = "inputs";
pub const INPUT_INT_DEF: &str = "inputi";

/// Receiver pseudo-objects.
pub const ME_DEF: &str = "me";
pub const SUPER_DEF: &str = "super";

/// Literals.
pub const TRUE_DEF: &str = "true";
pub const FALSE_DEF: &str = "false";
pub const NULL_DEF: &str = "null";
pub const NOTHING_DEF: &str = "nothing";

/// Primitive type names.
pub const INT_DEF: &str = "int";
pub const BOOL_DEF: &str = "bool";
pub const STRING_DEF: &str = "string";
pub const VOID_DEF: &str = "void";

/// The class instantiated to bootstrap a program.
pub const MAIN_CLASS_DEF: &str = "main";
/// The zero-argument method dispatched on the bootstrap instance.
pub const MAIN_FUNC_DEF: &str = "main";
