//! Class, field, and method definitions.
//!
//! The class index is built in two passes so classes can reference each other
//! (and themselves) before their definitions complete: pass one registers
//! every class name and rejects duplicates, pass two constructs the
//! definitions, validating fields and method signatures against the full name
//! set. Definitions are immutable after construction and shared by every
//! instance via `Rc`.
//!
//! No overloading: within one class, two methods cannot share a name, and two
//! formals within one method cannot share a name.

use std::rc::Rc;

use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;

use crate::{
    error::{Exception, RunResult},
    keywords,
    parse::Node,
    value::{ClassName, Type, Value},
};

/// A member field: declared type plus the default value its literal produced.
#[derive(Debug)]
pub(crate) struct FieldDef {
    pub name: Rc<str>,
    pub declared: Type,
    /// Default value, already checked (and null-refined) against `declared`.
    pub default: Value,
}

/// One formal parameter. The type name stays unresolved here; it is resolved
/// against the class index at each call, so a bad formal type only surfaces
/// when the method is actually invoked.
#[derive(Debug)]
pub(crate) struct FormalParam {
    pub type_name: Rc<str>,
    pub name: Rc<str>,
}

/// A member method: resolved return type, formals, and the body statement.
#[derive(Debug)]
pub(crate) struct MethodDef {
    pub name: Rc<str>,
    pub return_type: Type,
    pub formals: Vec<FormalParam>,
    /// The single top-level body statement (usually a `begin`).
    pub body: Node,
}

/// An immutable class definition.
#[derive(Debug)]
pub(crate) struct ClassDef {
    pub name: ClassName,
    pub superclass: Option<ClassName>,
    /// Fields in declaration order.
    pub fields: IndexMap<Rc<str>, FieldDef>,
    methods: AHashMap<Rc<str>, Rc<MethodDef>>,
}

impl ClassDef {
    pub fn method(&self, name: &str) -> Option<&Rc<MethodDef>> {
        self.methods.get(name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Builds one class from its parsed form. `known` answers whether a name
    /// was registered as a class in pass one.
    fn build(items: &[Node], known: &AHashSet<ClassName>) -> RunResult<Self> {
        let head_line = items.first().and_then(Node::line);
        let Some(name_tok) = items.get(1).and_then(Node::as_token) else {
            return Err(Exception::syntax_error("malformed class definition", head_line));
        };
        let name: ClassName = Rc::clone(&name_tok.text);

        let (superclass, members) = match items.get(2).and_then(Node::as_token) {
            Some(tok) if &*tok.text == keywords::INHERITS_DEF => {
                let Some(super_tok) = items.get(3).and_then(Node::as_token) else {
                    return Err(Exception::syntax_error(
                        format!("malformed inherits clause in class {name}"),
                        Some(tok.line),
                    ));
                };
                (Some(Rc::clone(&super_tok.text)), &items[4..])
            }
            _ => (None, &items[2..]),
        };

        let mut fields = IndexMap::new();
        let mut methods = AHashMap::new();
        for member in members {
            let Some(member_items) = member.as_list() else {
                continue;
            };
            match member_items.first().and_then(Node::as_token).map(|tok| &*tok.text) {
                Some(keywords::FIELD_DEF) => {
                    let field = Self::build_field(member_items, known)?;
                    if fields.contains_key(&field.name) {
                        return Err(Exception::name_error(
                            format!("duplicate field {}", field.name),
                            member.line(),
                        ));
                    }
                    fields.insert(Rc::clone(&field.name), field);
                }
                Some(keywords::METHOD_DEF) => {
                    let method = Self::build_method(member_items, known)?;
                    if methods.contains_key(&method.name) {
                        return Err(Exception::name_error(
                            format!("duplicate method {}", method.name),
                            member.line(),
                        ));
                    }
                    methods.insert(Rc::clone(&method.name), Rc::new(method));
                }
                // Stray members are skipped, matching the reference behavior.
                _ => {}
            }
        }

        Ok(Self {
            name,
            superclass,
            fields,
            methods,
        })
    }

    /// `(field type name default)`
    fn build_field(items: &[Node], known: &AHashSet<ClassName>) -> RunResult<FieldDef> {
        let line = items.first().and_then(Node::line);
        let (Some(type_tok), Some(name_tok), Some(default_tok)) = (
            items.get(1).and_then(Node::as_token),
            items.get(2).and_then(Node::as_token),
            items.get(3).and_then(Node::as_token),
        ) else {
            return Err(Exception::syntax_error("malformed field definition", line));
        };
        let declared = resolve_type_name(&type_tok.text, known)
            .ok_or_else(|| Exception::type_error(format!("invalid type name {}", type_tok.text), None))?;
        let literal = Value::from_literal(&default_tok.text, None).ok_or_else(|| {
            Exception::type_error(
                format!("invalid default value for field {}", name_tok.text),
                Some(default_tok.line),
            )
        })?;
        // Field defaults are literals: the class-to-class walk is unreachable.
        let default = check_assign_impl(&declared, literal, false, |_, _| false)?;
        Ok(FieldDef {
            name: Rc::clone(&name_tok.text),
            declared,
            default,
        })
    }

    /// `(method return-type name (formals…) body)`
    fn build_method(items: &[Node], known: &AHashSet<ClassName>) -> RunResult<MethodDef> {
        let line = items.first().and_then(Node::line);
        let (Some(ret_tok), Some(name_tok), Some(formals_list), Some(body)) = (
            items.get(1).and_then(Node::as_token),
            items.get(2).and_then(Node::as_token),
            items.get(3).and_then(Node::as_list),
            items.get(4),
        ) else {
            return Err(Exception::syntax_error("malformed method definition", line));
        };
        let return_type = resolve_type_name(&ret_tok.text, known)
            .ok_or_else(|| Exception::type_error(format!("invalid type name {}", ret_tok.text), None))?;

        let mut formals = Vec::with_capacity(formals_list.len());
        for formal in formals_list {
            let pair = formal.as_list().filter(|pair| pair.len() == 2);
            let (Some(type_tok), Some(param_tok)) = (
                pair.and_then(|p| p[0].as_token()),
                pair.and_then(|p| p[1].as_token()),
            ) else {
                return Err(Exception::syntax_error(
                    format!("malformed formal parameter in method {}", name_tok.text),
                    formal.line().or(line),
                ));
            };
            formals.push(FormalParam {
                type_name: Rc::clone(&type_tok.text),
                name: Rc::clone(&param_tok.text),
            });
        }

        Ok(MethodDef {
            name: Rc::clone(&name_tok.text),
            return_type,
            formals,
            body: body.clone(),
        })
    }
}

/// Program-wide mapping from class name to definition.
#[derive(Debug, Default)]
pub(crate) struct ClassIndex {
    classes: IndexMap<ClassName, Rc<ClassDef>>,
}

impl ClassIndex {
    /// Builds the index from the program's top-level forms. Non-`class` forms
    /// are ignored.
    pub fn build(program: &[Node]) -> RunResult<Self> {
        // Pass one: register names so definitions can forward-reference.
        let mut known = AHashSet::new();
        let mut class_forms = Vec::new();
        for form in program {
            let Some(items) = form.as_list() else {
                continue;
            };
            let Some(head) = items.first().and_then(Node::as_token) else {
                continue;
            };
            if &*head.text != keywords::CLASS_DEF {
                continue;
            }
            let Some(name_tok) = items.get(1).and_then(Node::as_token) else {
                return Err(Exception::syntax_error("malformed class definition", Some(head.line)));
            };
            if !known.insert(Rc::clone(&name_tok.text)) {
                return Err(Exception::type_error(
                    format!("duplicate class name {}", name_tok.text),
                    Some(head.line),
                ));
            }
            class_forms.push(items);
        }

        // Pass two: construct the definitions.
        let mut classes = IndexMap::with_capacity(class_forms.len());
        for items in class_forms {
            let class_def = ClassDef::build(items, &known)?;
            classes.insert(Rc::clone(&class_def.name), Rc::new(class_def));
        }
        Ok(Self { classes })
    }

    pub fn get(&self, name: &str) -> Option<&Rc<ClassDef>> {
        self.classes.get(name)
    }

    /// Resolves a type name to a primitive tag or a known class.
    pub fn resolve_type(&self, name: &str) -> RunResult<Type> {
        resolve_type_name_with(name, |n| self.classes.contains_key(n))
            .ok_or_else(|| Exception::type_error(format!("invalid type name {name}"), None))
    }

    /// Whether `expected` is `actual` or appears on `actual`'s superclass
    /// chain.
    pub fn is_ancestor(&self, expected: &str, actual: &str) -> bool {
        let mut cursor = Some(actual);
        while let Some(name) = cursor {
            if name == expected {
                return true;
            }
            cursor = self.classes.get(name).and_then(|def| def.superclass.as_deref());
        }
        false
    }

    /// Enforces assignment compatibility of `value` against `expected` and
    /// returns the (possibly retargeted) value.
    ///
    /// Parameter position (`is_param`) differs in two ways: a successful
    /// class-to-class match upcasts the value's static type to the formal's
    /// declared class, and a primitive mismatch reports `NAME_ERROR` instead
    /// of `TYPE_ERROR`.
    pub fn check_assign(&self, expected: &Type, value: Value, is_param: bool) -> RunResult<Value> {
        check_assign_impl(expected, value, is_param, |exp, act| self.is_ancestor(exp, act))
    }
}

/// Resolution of a type name against the reserved primitive keywords and a
/// class-name predicate.
fn resolve_type_name_with(name: &str, is_class: impl Fn(&str) -> bool) -> Option<Type> {
    match name {
        keywords::INT_DEF => Some(Type::Int),
        keywords::STRING_DEF => Some(Type::Str),
        keywords::BOOL_DEF => Some(Type::Bool),
        keywords::NULL_DEF => Some(Type::Class(None)),
        keywords::VOID_DEF => Some(Type::Void),
        keywords::NOTHING_DEF => Some(Type::Nothing),
        _ if is_class(name) => Some(Type::Class(Some(Rc::from(name)))),
        _ => None,
    }
}

fn resolve_type_name(name: &str, known: &AHashSet<ClassName>) -> Option<Type> {
    resolve_type_name_with(name, |n| known.contains(n))
}

/// The assignment-compatibility core shared by the index and class building.
///
/// Rules, in order: a generic null refines to an expected class; class-to-
/// class assignment walks the actual's ancestor chain (upcasting in parameter
/// position); anything else needs exact tag equality.
fn check_assign_impl(
    expected: &Type,
    value: Value,
    is_param: bool,
    is_ancestor: impl Fn(&str, &str) -> bool,
) -> RunResult<Value> {
    if let (Type::Class(Some(class)), Value::Null(None)) = (expected, &value) {
        return Ok(Value::Null(Some(Rc::clone(class))));
    }

    let actual = value.static_type();
    if let (Some(expected_class), Some(actual_class)) = (expected.class_name(), actual.class_name()) {
        if is_ancestor(expected_class.as_ref(), actual_class.as_ref()) {
            if is_param {
                return Ok(value.retargeted(Rc::clone(expected_class)));
            }
            return Ok(value);
        }
        return Err(Exception::type_error("mismatched classes", None));
    }

    if *expected != actual {
        if is_param {
            return Err(Exception::name_error("mismatched parameter and value", None));
        }
        return Err(Exception::type_error("mismatched type and value", None));
    }
    Ok(value)
}
