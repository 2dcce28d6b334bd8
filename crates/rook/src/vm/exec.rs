//! The statement interpreter.
//!
//! Every statement evaluates to a [`Flow`]: `Proceed` to continue with the
//! next statement, `Return` to unwind the current method call. Errors are not
//! statuses — they abort the run through the error channel.

use std::rc::Rc;

use ahash::AHashMap;

use crate::{
    env::Environment,
    error::{Exception, RunResult},
    heap::ObjectId,
    io::{InputSource, OutputSink},
    keywords,
    parse::Node,
    tracer::Tracer,
    value::Value,
    vm::{Flow, Vm},
};

impl<I: InputSource, O: OutputSink, T: Tracer> Vm<'_, I, O, T> {
    /// Executes one statement against the executing object `cur` and dynamic
    /// self `me`.
    pub(super) fn execute_statement(
        &mut self,
        cur: ObjectId,
        me: ObjectId,
        env: &mut Environment,
        node: &Node,
    ) -> RunResult<Flow> {
        let head = node.as_list().and_then(|items| items.first()).and_then(Node::as_token);
        let Some(head) = head else {
            return Err(Exception::syntax_error(format!("unknown statement {node}"), node.line()));
        };
        let line = head.line;
        if self.tracer.enabled() {
            self.tracer.statement(Some(line), &node.to_string());
        }
        let items = node.as_list().unwrap_or_default();

        match &*head.text {
            keywords::BEGIN_DEF => self.execute_begin(cur, me, env, &items[1..]),
            keywords::SET_DEF => self.execute_set(cur, me, env, items, line),
            keywords::IF_DEF => self.execute_if(cur, me, env, items, line),
            keywords::CALL_DEF => {
                // statement form: evaluate for effect, discard the value
                self.evaluate_call(cur, me, env, items, line)?;
                Ok(Flow::Proceed)
            }
            keywords::WHILE_DEF => self.execute_while(cur, me, env, items, line),
            keywords::RETURN_DEF => self.execute_return(cur, me, env, items, line),
            keywords::INPUT_STRING_DEF => self.execute_input(cur, env, items, line, true),
            keywords::INPUT_INT_DEF => self.execute_input(cur, env, items, line, false),
            keywords::PRINT_DEF => self.execute_print(cur, me, env, items, line),
            keywords::LET_DEF => self.execute_let(cur, me, env, items, line),
            other => Err(Exception::syntax_error(format!("unknown statement {other}"), Some(line))),
        }
    }

    /// `(begin s1 … sn)`
    fn execute_begin(
        &mut self,
        cur: ObjectId,
        me: ObjectId,
        env: &mut Environment,
        statements: &[Node],
    ) -> RunResult<Flow> {
        for statement in statements {
            if let Flow::Return(value) = self.execute_statement(cur, me, env, statement)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Proceed)
    }

    /// `(let ((type name literal) …) body…)` — a scoped block whose frame is
    /// popped on every exit path, early returns included.
    fn execute_let(
        &mut self,
        cur: ObjectId,
        me: ObjectId,
        env: &mut Environment,
        items: &[Node],
        line: u32,
    ) -> RunResult<Flow> {
        let Some(bindings) = items.get(1).and_then(Node::as_list) else {
            return Err(Exception::syntax_error("malformed let statement", Some(line)));
        };

        let mut frame = AHashMap::with_capacity(bindings.len());
        for binding in bindings {
            let triple = binding.as_list().filter(|triple| triple.len() == 3);
            let (Some(type_tok), Some(name_tok), Some(literal_tok)) = (
                triple.and_then(|t| t[0].as_token()),
                triple.and_then(|t| t[1].as_token()),
                triple.and_then(|t| t[2].as_token()),
            ) else {
                return Err(Exception::syntax_error("malformed let binding", binding.line().or(Some(line))));
            };
            let declared = self.classes.resolve_type(&type_tok.text)?;
            let literal = Value::from_literal(&literal_tok.text, None).ok_or_else(|| {
                Exception::type_error(
                    format!("invalid literal in let binding {}", name_tok.text),
                    Some(literal_tok.line),
                )
            })?;
            let value = self.classes.check_assign(&declared, literal, false)?;
            if frame.insert(Rc::clone(&name_tok.text), value).is_some() {
                return Err(Exception::name_error(format!("duplicate let params {}", name_tok.text), None));
            }
        }

        env.push_frame(frame);
        for statement in &items[2..] {
            if let Flow::Return(value) = self.execute_statement(cur, me, env, statement)? {
                env.pop_frame();
                return Ok(Flow::Return(value));
            }
        }
        env.pop_frame();
        Ok(Flow::Proceed)
    }

    /// `(set name expr)`
    fn execute_set(
        &mut self,
        cur: ObjectId,
        me: ObjectId,
        env: &mut Environment,
        items: &[Node],
        line: u32,
    ) -> RunResult<Flow> {
        let (Some(name_tok), Some(expr)) = (items.get(1).and_then(Node::as_token), items.get(2)) else {
            return Err(Exception::syntax_error("malformed set statement", Some(line)));
        };
        let value = self.evaluate_expression(cur, me, env, expr, line)?;
        self.set_variable(cur, env, &name_tok.text, value, line)?;
        Ok(Flow::Proceed)
    }

    /// `(if cond then [else])` — a false condition with no else branch simply
    /// proceeds.
    fn execute_if(
        &mut self,
        cur: ObjectId,
        me: ObjectId,
        env: &mut Environment,
        items: &[Node],
        line: u32,
    ) -> RunResult<Flow> {
        let (Some(cond), Some(then_branch)) = (items.get(1), items.get(2)) else {
            return Err(Exception::syntax_error("malformed if statement", Some(line)));
        };
        let condition = self.evaluate_expression(cur, me, env, cond, line)?;
        let Value::Bool(truth) = condition else {
            return Err(Exception::type_error(
                format!("non-boolean if condition {cond}"),
                Some(line),
            ));
        };
        if truth {
            return self.execute_statement(cur, me, env, then_branch);
        }
        if let Some(else_branch) = items.get(3) {
            return self.execute_statement(cur, me, env, else_branch);
        }
        Ok(Flow::Proceed)
    }

    /// `(while cond body)`
    fn execute_while(
        &mut self,
        cur: ObjectId,
        me: ObjectId,
        env: &mut Environment,
        items: &[Node],
        line: u32,
    ) -> RunResult<Flow> {
        let (Some(cond), Some(body)) = (items.get(1), items.get(2)) else {
            return Err(Exception::syntax_error("malformed while statement", Some(line)));
        };
        loop {
            let condition = self.evaluate_expression(cur, me, env, cond, line)?;
            let Value::Bool(truth) = condition else {
                return Err(Exception::type_error(
                    format!("non-boolean while condition {cond}"),
                    Some(line),
                ));
            };
            if !truth {
                return Ok(Flow::Proceed);
            }
            if let Flow::Return(value) = self.execute_statement(cur, me, env, body)? {
                return Ok(Flow::Return(value));
            }
        }
    }

    /// `(return [expr])` — the value is typechecked against the declared
    /// return type by the dispatching call, not here.
    fn execute_return(
        &mut self,
        cur: ObjectId,
        me: ObjectId,
        env: &mut Environment,
        items: &[Node],
        line: u32,
    ) -> RunResult<Flow> {
        match items.get(1) {
            None => Ok(Flow::Return(Value::Nothing)),
            Some(expr) => {
                let value = self.evaluate_expression(cur, me, env, expr, line)?;
                Ok(Flow::Return(value))
            }
        }
    }

    /// `(print e1 e2 …)` — arguments concatenate into one output line.
    fn execute_print(
        &mut self,
        cur: ObjectId,
        me: ObjectId,
        env: &mut Environment,
        items: &[Node],
        line: u32,
    ) -> RunResult<Flow> {
        let mut out = String::new();
        for expr in &items[1..] {
            let value = self.evaluate_expression(cur, me, env, expr, line)?;
            out.push_str(&value.display_form());
        }
        self.output.output(&out);
        Ok(Flow::Proceed)
    }

    /// `(inputs var)` / `(inputi var)`
    fn execute_input(
        &mut self,
        cur: ObjectId,
        env: &mut Environment,
        items: &[Node],
        line: u32,
        as_string: bool,
    ) -> RunResult<Flow> {
        let Some(name_tok) = items.get(1).and_then(Node::as_token) else {
            return Err(Exception::syntax_error("malformed input statement", Some(line)));
        };
        let Some(input_line) = self.input.read_line() else {
            return Err(Exception::fault_error("input exhausted", Some(line)));
        };
        let value = if as_string {
            Value::Str(Rc::from(input_line.as_str()))
        } else {
            let parsed = input_line.trim().parse::<i64>().map_err(|_| {
                Exception::type_error(format!("non-integer input {input_line}"), Some(line))
            })?;
            Value::Int(parsed)
        };
        self.set_variable(cur, env, &name_tok.text, value, line)?;
        Ok(Flow::Proceed)
    }

    /// Assigns `value` to a parameter/local or, failing that, a field of the
    /// executing object. Locals shadow fields.
    ///
    /// Environment bindings are checked against the static type of the value
    /// currently bound; fields against their declared type.
    fn set_variable(
        &mut self,
        cur: ObjectId,
        env: &mut Environment,
        name: &Rc<str>,
        value: Value,
        line: u32,
    ) -> RunResult<()> {
        if matches!(value, Value::Nothing) {
            return Err(Exception::type_error(
                format!("can't assign to nothing {name}"),
                Some(line),
            ));
        }

        if let Some(existing) = env.get(name) {
            let target = existing.static_type();
            let value = self.classes.check_assign(&target, value, false)?;
            env.set(name, value);
            return Ok(());
        }

        let Some(declared) = self.heap.get(cur).class_def.field(name).map(|f| f.declared.clone()) else {
            return Err(Exception::name_error(format!("unknown variable {name}"), Some(line)));
        };
        let value = self.classes.check_assign(&declared, value, false)?;
        if let Some(slot) = self.heap.get_mut(cur).fields.get_mut(&**name) {
            *slot = value;
        }
        Ok(())
    }
}
