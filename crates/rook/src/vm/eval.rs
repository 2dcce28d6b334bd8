//! The expression evaluator.
//!
//! A leaf token resolves, in order: environment binding, field of the
//! executing object, the reserved `me`, literal. A list dispatches on its
//! head: binary/unary operator, `call`, or `new`.
//!
//! All errors raised during expression evaluation carry the line of the
//! *enclosing statement* — the call site, for nested calls.

use std::rc::Rc;

use crate::{
    env::Environment,
    error::{Exception, RunResult},
    heap::ObjectId,
    io::{InputSource, OutputSink},
    keywords,
    parse::Node,
    tracer::Tracer,
    value::Value,
    vm::{ArgValues, Vm, binary},
};

impl<I: InputSource, O: OutputSink, T: Tracer> Vm<'_, I, O, T> {
    pub(super) fn evaluate_expression(
        &mut self,
        cur: ObjectId,
        me: ObjectId,
        env: &mut Environment,
        node: &Node,
        line: u32,
    ) -> RunResult<Value> {
        if let Some(tok) = node.as_token() {
            return self.evaluate_leaf(cur, me, env, &tok.text, line);
        }

        let items = node.as_list().unwrap_or_default();
        let Some(head) = items.first().and_then(Node::as_token) else {
            return Err(Exception::syntax_error(format!("unknown expression {node}"), Some(line)));
        };

        if binary::is_binary_op(&head.text) {
            let (Some(left), Some(right)) = (items.get(1), items.get(2)) else {
                return Err(Exception::syntax_error(
                    format!("malformed {} expression", head.text),
                    Some(line),
                ));
            };
            let lhs = self.evaluate_expression(cur, me, env, left, line)?;
            let rhs = self.evaluate_expression(cur, me, env, right, line)?;
            return binary::apply(self.classes, &head.text, lhs, rhs, line);
        }

        match &*head.text {
            "!" => {
                let Some(operand) = items.get(1) else {
                    return Err(Exception::syntax_error("malformed ! expression", Some(line)));
                };
                match self.evaluate_expression(cur, me, env, operand, line)? {
                    Value::Bool(b) => Ok(Value::Bool(!b)),
                    _ => Err(Exception::type_error("operator ! applied to non-boolean", Some(line))),
                }
            }
            keywords::CALL_DEF => self.evaluate_call(cur, me, env, items, line),
            keywords::NEW_DEF => self.evaluate_new(items, line),
            other => Err(Exception::syntax_error(format!("unknown expression {other}"), Some(line))),
        }
    }

    /// Leaf resolution. Locals and parameters shadow fields; `me` and
    /// literals only apply when neither binds the name.
    fn evaluate_leaf(
        &mut self,
        cur: ObjectId,
        me: ObjectId,
        env: &Environment,
        name: &Rc<str>,
        line: u32,
    ) -> RunResult<Value> {
        if let Some(value) = env.get(name) {
            return Ok(value.clone());
        }
        if let Some(value) = self.heap.get(cur).fields.get(&**name) {
            return Ok(value.clone());
        }
        if &**name == keywords::ME_DEF {
            let class = Rc::clone(self.heap.get(me).class_name());
            return Ok(Value::Object { class, id: me });
        }
        if let Some(value) = Value::from_literal(name, None) {
            return Ok(value);
        }
        Err(Exception::name_error(
            format!("invalid field or parameter {name}"),
            Some(line),
        ))
    }

    /// `(call receiver method args…)` — shared by the statement and the
    /// expression form.
    ///
    /// `me` and `super` receivers carry the dynamic self onward as the first
    /// object, so dispatch stays anchored to the most derived instance inside
    /// inherited bodies. Any other receiver starts a fresh dispatch.
    pub(super) fn evaluate_call(
        &mut self,
        cur: ObjectId,
        me: ObjectId,
        env: &mut Environment,
        items: &[Node],
        line: u32,
    ) -> RunResult<Value> {
        let (Some(receiver), Some(method_tok)) = (items.get(1), items.get(2).and_then(Node::as_token)) else {
            return Err(Exception::syntax_error("malformed call", Some(line)));
        };

        let (target, first_obj) = match receiver.as_token().map(|tok| &*tok.text) {
            Some(keywords::ME_DEF) => (Some(me), Some(me)),
            Some(keywords::SUPER_DEF) => (self.heap.get(cur).super_obj, Some(me)),
            _ => match self.evaluate_expression(cur, me, env, receiver, line)? {
                Value::Object { id, .. } => (Some(id), None),
                Value::Null(_) => (None, None),
                other => {
                    return Err(Exception::type_error(
                        format!("method call on non-object value of type {}", other.static_type()),
                        Some(line),
                    ));
                }
            },
        };
        let Some(target) = target else {
            return Err(Exception::fault_error("null dereference", Some(line)));
        };

        let mut args = ArgValues::new();
        for expr in &items[3..] {
            args.push(self.evaluate_expression(cur, me, env, expr, line)?);
        }
        self.call_method(target, &method_tok.text, args, Some(line), first_obj)
    }

    /// `(new ClassName)`
    fn evaluate_new(&mut self, items: &[Node], line: u32) -> RunResult<Value> {
        let Some(class_tok) = items.get(1).and_then(Node::as_token) else {
            return Err(Exception::syntax_error("malformed new expression", Some(line)));
        };
        let id = self.instantiate(&class_tok.text, Some(line))?;
        Ok(Value::Object {
            class: Rc::clone(&class_tok.text),
            id,
        })
    }
}
