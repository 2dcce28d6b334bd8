//! Binary operator dispatch.
//!
//! Operands are evaluated before dispatch; the operand *type* selects the
//! operator table. Class-typed operands of different classes first unify
//! along the inheritance chain, so a `dog` and an `animal` compare under the
//! common `animal` type. Class comparison is reference identity on handles.

use std::rc::Rc;

use crate::{
    classes::ClassIndex,
    error::{Exception, RunResult},
    value::{ClassName, Type, Value},
};

/// Every recognized binary operator token.
const BINARY_OPS: [&str; 13] = [
    "+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">=", "&", "|",
];

pub(super) fn is_binary_op(op: &str) -> bool {
    BINARY_OPS.contains(&op)
}

/// Applies `op` to evaluated operands, reporting failures at `line`.
pub(super) fn apply(classes: &ClassIndex, op: &str, lhs: Value, rhs: Value, line: u32) -> RunResult<Value> {
    let (lhs, rhs) = unify_classes(classes, lhs, rhs);
    match (&lhs, &rhs) {
        (Value::Int(a), Value::Int(b)) => int_op(op, *a, *b, line),
        (Value::Str(a), Value::Str(b)) => str_op(op, a, b, line),
        (Value::Bool(a), Value::Bool(b)) => bool_op(op, *a, *b, line),
        _ => {
            let compatible = matches!(
                (lhs.static_type(), rhs.static_type()),
                (Type::Class(a), Type::Class(b)) if a == b || a.is_none() || b.is_none()
            );
            if compatible {
                class_op(op, &lhs, &rhs, line)
            } else {
                Err(Exception::type_error(
                    format!("operator {op} applied to two incompatible types"),
                    Some(line),
                ))
            }
        }
    }
}

/// When both operands are class-typed with different static classes, retarget
/// the more derived one to the common ancestor, if there is one. Unrelated
/// classes pass through unchanged and fail the compatibility check above.
fn unify_classes(classes: &ClassIndex, lhs: Value, rhs: Value) -> (Value, Value) {
    let (Some(left), Some(right)) = (value_class(&lhs), value_class(&rhs)) else {
        return (lhs, rhs);
    };
    if left == right {
        (lhs, rhs)
    } else if classes.is_ancestor(&right, &left) {
        (lhs.retargeted(right), rhs)
    } else if classes.is_ancestor(&left, &right) {
        let unified = rhs.retargeted(left);
        (lhs, unified)
    } else {
        (lhs, rhs)
    }
}

fn value_class(value: &Value) -> Option<ClassName> {
    match value {
        Value::Object { class, .. } => Some(Rc::clone(class)),
        Value::Null(Some(class)) => Some(Rc::clone(class)),
        _ => None,
    }
}

fn int_op(op: &str, a: i64, b: i64, line: u32) -> RunResult<Value> {
    let value = match op {
        "+" => Value::Int(a.wrapping_add(b)),
        "-" => Value::Int(a.wrapping_sub(b)),
        "*" => Value::Int(a.wrapping_mul(b)),
        "/" => {
            if b == 0 {
                return Err(Exception::fault_error("division by zero", Some(line)));
            }
            Value::Int(a.wrapping_div(b))
        }
        "%" => {
            if b == 0 {
                return Err(Exception::fault_error("division by zero", Some(line)));
            }
            Value::Int(a.wrapping_rem(b))
        }
        "==" => Value::Bool(a == b),
        "!=" => Value::Bool(a != b),
        "<" => Value::Bool(a < b),
        "<=" => Value::Bool(a <= b),
        ">" => Value::Bool(a > b),
        ">=" => Value::Bool(a >= b),
        _ => return Err(Exception::type_error("invalid operator applied to ints", Some(line))),
    };
    Ok(value)
}

fn str_op(op: &str, a: &str, b: &str, line: u32) -> RunResult<Value> {
    let value = match op {
        "+" => Value::Str(Rc::from(format!("{a}{b}").as_str())),
        "==" => Value::Bool(a == b),
        "!=" => Value::Bool(a != b),
        "<" => Value::Bool(a < b),
        "<=" => Value::Bool(a <= b),
        ">" => Value::Bool(a > b),
        ">=" => Value::Bool(a >= b),
        _ => {
            return Err(Exception::type_error(
                "invalid operator applied to strings",
                Some(line),
            ));
        }
    };
    Ok(value)
}

fn bool_op(op: &str, a: bool, b: bool, line: u32) -> RunResult<Value> {
    let value = match op {
        // both operands were already evaluated: no short-circuiting
        "&" => Value::Bool(a && b),
        "|" => Value::Bool(a || b),
        "==" => Value::Bool(a == b),
        "!=" => Value::Bool(a != b),
        _ => return Err(Exception::type_error("invalid operator applied to bool", Some(line))),
    };
    Ok(value)
}

fn class_op(op: &str, lhs: &Value, rhs: &Value, line: u32) -> RunResult<Value> {
    let same = match (lhs, rhs) {
        (Value::Object { id: a, .. }, Value::Object { id: b, .. }) => a == b,
        (Value::Null(_), Value::Null(_)) => true,
        _ => false,
    };
    match op {
        "==" => Ok(Value::Bool(same)),
        "!=" => Ok(Value::Bool(!same)),
        _ => Err(Exception::type_error("invalid operator applied to class", Some(line))),
    }
}
