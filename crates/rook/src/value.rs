//! Runtime values and static types.
//!
//! A value is a tagged variant: immediates carry their payload inline and
//! object references carry a handle into the arena plus the value's *static*
//! class name. The static class is what assignment and parameter passing
//! reason about; the arena instance keeps the dynamic class.

use std::{borrow::Cow, fmt, rc::Rc};

use crate::{heap::ObjectId, keywords};

/// Interned-enough class name. Cheap to clone, compared by content.
pub(crate) type ClassName = Rc<str>;

/// The static type of a value or binding: a primitive tag or a class name.
///
/// `Class(None)` is the generic class type carried only by a `null` literal
/// before assignment context refines it to a concrete class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Type {
    Int,
    Bool,
    Str,
    Nothing,
    Void,
    Class(Option<ClassName>),
}

impl Type {
    /// The concrete class name, when this is a non-generic class type.
    pub fn class_name(&self) -> Option<&ClassName> {
        match self {
            Self::Class(Some(name)) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str(keywords::INT_DEF),
            Self::Bool => f.write_str(keywords::BOOL_DEF),
            Self::Str => f.write_str(keywords::STRING_DEF),
            Self::Nothing => f.write_str(keywords::NOTHING_DEF),
            Self::Void => f.write_str(keywords::VOID_DEF),
            Self::Class(Some(name)) => f.write_str(name),
            Self::Class(None) => f.write_str(keywords::NULL_DEF),
        }
    }
}

/// A runtime value.
#[derive(Debug, Clone)]
pub(crate) enum Value {
    Int(i64),
    Bool(bool),
    Str(Rc<str>),
    /// A live object reference. `class` is the static type; the instance in
    /// the arena knows its dynamic class.
    Object { class: ClassName, id: ObjectId },
    /// A null reference, optionally refined to a class. `Null(None)` is the
    /// generic null produced by the bare `null` literal.
    Null(Option<ClassName>),
    /// The unit value produced by a bare `return` and by void methods.
    /// (`void` exists only as a return type; void methods yield `Nothing`.)
    Nothing,
}

impl Value {
    /// The static type of this value.
    pub fn static_type(&self) -> Type {
        match self {
            Self::Int(_) => Type::Int,
            Self::Bool(_) => Type::Bool,
            Self::Str(_) => Type::Str,
            Self::Object { class, .. } => Type::Class(Some(class.clone())),
            Self::Null(class) => Type::Class(class.clone()),
            Self::Nothing => Type::Nothing,
        }
    }

    /// A copy of this value with its static class replaced (upcast / null
    /// refinement). Only meaningful on class-typed values.
    pub fn retargeted(&self, class: ClassName) -> Self {
        match self {
            Self::Object { id, .. } => Self::Object { class, id: *id },
            Self::Null(_) => Self::Null(Some(class)),
            other => other.clone(),
        }
    }

    /// Builds a value from a literal token, or `None` when the token is not a
    /// literal (the caller then treats it as a variable name).
    ///
    /// `expected_class` refines a `null` literal at creation; without it the
    /// null is generic and is refined later by assignment context.
    pub fn from_literal(token: &str, expected_class: Option<&ClassName>) -> Option<Self> {
        if token == keywords::TRUE_DEF {
            return Some(Self::Bool(true));
        }
        if token == keywords::FALSE_DEF {
            return Some(Self::Bool(false));
        }
        if let Some(rest) = token.strip_prefix('"') {
            let body = rest.strip_suffix('"').unwrap_or(rest);
            return Some(Self::Str(Rc::from(body)));
        }
        let digits = token.strip_prefix('-').unwrap_or(token);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return token.parse::<i64>().ok().map(Self::Int);
        }
        if token == keywords::NULL_DEF {
            return Some(Self::Null(expected_class.cloned()));
        }
        if token == keywords::NOTHING_DEF {
            return Some(Self::Nothing);
        }
        None
    }

    /// The text `print` emits for this value.
    ///
    /// Object references and nulls have no contractual rendering; programs
    /// must not rely on their output.
    pub fn display_form(&self) -> Cow<'_, str> {
        match self {
            Self::Int(i) => Cow::Owned(i.to_string()),
            Self::Bool(true) => Cow::Borrowed(keywords::TRUE_DEF),
            Self::Bool(false) => Cow::Borrowed(keywords::FALSE_DEF),
            Self::Str(s) => Cow::Borrowed(s),
            Self::Null(_) => Cow::Borrowed(keywords::NULL_DEF),
            Self::Object { class, .. } => Cow::Owned(format!("<{class}>")),
            Self::Nothing => Cow::Borrowed(keywords::NOTHING_DEF),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn literal_order_bool_before_word() {
        assert!(matches!(Value::from_literal("true", None), Some(Value::Bool(true))));
        assert!(matches!(Value::from_literal("false", None), Some(Value::Bool(false))));
    }

    #[test]
    fn literal_string_strips_quotes() {
        let Some(Value::Str(s)) = Value::from_literal("\"hi there\"", None) else {
            panic!("expected string literal");
        };
        assert_eq!(&*s, "hi there");
    }

    #[test]
    fn literal_signed_int() {
        assert!(matches!(Value::from_literal("-17", None), Some(Value::Int(-17))));
        assert!(matches!(Value::from_literal("0", None), Some(Value::Int(0))));
    }

    #[test]
    fn literal_null_defaults_to_generic() {
        assert!(matches!(Value::from_literal("null", None), Some(Value::Null(None))));
        let expected: ClassName = Rc::from("dog");
        let Some(Value::Null(Some(class))) = Value::from_literal("null", Some(&expected)) else {
            panic!("expected refined null");
        };
        assert_eq!(&*class, "dog");
    }

    #[test]
    fn literal_nothing() {
        assert!(matches!(Value::from_literal("nothing", None), Some(Value::Nothing)));
    }

    #[test]
    fn non_literals_fall_through() {
        assert!(Value::from_literal("x", None).is_none());
        assert!(Value::from_literal("-", None).is_none());
        assert!(Value::from_literal("12ab", None).is_none());
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::Int(13).display_form(), "13");
        assert_eq!(Value::Bool(true).display_form(), "true");
        assert_eq!(Value::Str(Rc::from("s")).display_form(), "s");
        assert_eq!(Value::Null(None).display_form(), "null");
    }
}
