//! The execution core: object instantiation and method dispatch.
//!
//! `Vm` owns the object arena and borrows the class index and host I/O for
//! the duration of one program run. Statement execution threads two object
//! handles everywhere:
//!
//! * `cur` — the object whose method is executing. Fields and `super` resolve
//!   against it, so an inherited method sees its *own* class's fields on the
//!   super object.
//! * `me` — the dynamic self: the originally dispatched-upon receiver when
//!   dispatch delegated up the chain, otherwise `cur`. `me` expressions and
//!   `me` receivers use it, which is what keeps `me` pointing at the most
//!   derived instance inside inherited bodies.

mod binary;
mod eval;
mod exec;

use std::rc::Rc;

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::{
    classes::ClassIndex,
    env::Environment,
    error::{Exception, RunResult},
    heap::{Heap, Instance, ObjectId},
    io::{InputSource, OutputSink},
    tracer::Tracer,
    value::{Type, Value},
};

/// Statement outcome: continue sequentially, or unwind to the enclosing
/// method call with a return value.
#[derive(Debug)]
pub(crate) enum Flow {
    Proceed,
    Return(Value),
}

/// Evaluated actual arguments on their way into a call.
pub(crate) type ArgValues = SmallVec<[Value; 4]>;

/// One program run's execution state.
pub(crate) struct Vm<'a, I: InputSource, O: OutputSink, T: Tracer> {
    pub classes: &'a ClassIndex,
    pub heap: Heap,
    pub input: &'a mut I,
    pub output: &'a mut O,
    pub tracer: &'a mut T,
}

impl<'a, I: InputSource, O: OutputSink, T: Tracer> Vm<'a, I, O, T> {
    pub fn new(classes: &'a ClassIndex, input: &'a mut I, output: &'a mut O, tracer: &'a mut T) -> Self {
        Self {
            classes,
            heap: Heap::new(),
            input,
            output,
            tracer,
        }
    }

    /// Instantiates `class_name`, recursively instantiating its superclass as
    /// a separate super object and materializing field defaults into fresh
    /// values.
    ///
    /// `line` is the call site of the `new` expression (`None` for the
    /// bootstrap instantiation), which is where an unknown class is reported.
    pub fn instantiate(&mut self, class_name: &str, line: Option<u32>) -> RunResult<ObjectId> {
        let Some(class_def) = self.classes.get(class_name) else {
            return Err(Exception::type_error(
                format!("No class named {class_name} found"),
                line,
            ));
        };
        let class_def = Rc::clone(class_def);
        let super_obj = match class_def.superclass.as_deref() {
            Some(superclass) => Some(self.instantiate(superclass, line)?),
            None => None,
        };
        let fields = class_def
            .fields
            .iter()
            .map(|(name, field)| (Rc::clone(name), field.default.clone()))
            .collect();
        Ok(self.heap.allocate(Instance {
            class_def,
            fields,
            super_obj,
        }))
    }

    /// Dispatches `method_name` on `obj` with already-evaluated arguments.
    ///
    /// Lookup delegates to the super object when the name is absent here *or*
    /// when the arity differs — a subclass method with a different parameter
    /// count does not hide the ancestor's version. Delegation preserves
    /// `first_obj`, setting it to the current object on the first hop so the
    /// executing body still knows the originally dispatched-upon receiver.
    ///
    /// `line` is the call site and is where dispatch failures are reported.
    pub fn call_method(
        &mut self,
        obj: ObjectId,
        method_name: &str,
        args: ArgValues,
        line: Option<u32>,
        first_obj: Option<ObjectId>,
    ) -> RunResult<Value> {
        let instance = self.heap.get(obj);
        let super_obj = instance.super_obj;
        let named = instance.class_def.method(method_name).map(Rc::clone);

        let method = match named {
            Some(method) if method.formals.len() == args.len() => method,
            named => {
                if let Some(superclass) = super_obj {
                    return self.call_method(superclass, method_name, args, line, first_obj.or(Some(obj)));
                }
                let message = if named.is_some() {
                    format!("invalid number of parameters in call to {method_name}")
                } else {
                    format!("unknown method {method_name}")
                };
                return Err(Exception::name_error(message, line));
            }
        };

        let mut params = AHashMap::with_capacity(method.formals.len());
        for (formal, actual) in method.formals.iter().zip(args) {
            let declared = self.classes.resolve_type(&formal.type_name)?;
            let actual = self.classes.check_assign(&declared, actual, true)?;
            if params.insert(Rc::clone(&formal.name), actual).is_some() {
                return Err(Exception::name_error(
                    format!("duplicate formal param {}", formal.name),
                    line,
                ));
            }
        }

        let mut env = Environment::new(params);
        let me = first_obj.unwrap_or(obj);
        let flow = self.execute_statement(obj, me, &mut env, &method.body)?;

        if let Flow::Return(value) = flow {
            if !matches!(value, Value::Nothing) {
                return self.classes.check_assign(&method.return_type, value, false);
            }
        }
        Ok(default_return(&method.return_type))
    }
}

/// The value a method yields when it falls off the end of its body or
/// executes a bare `return`.
///
/// Class-typed methods default to a *generic* null so the receiving context
/// refines it; `void` (and the degenerate type names) default to the unit
/// `nothing`.
fn default_return(return_type: &Type) -> Value {
    match return_type {
        Type::Int => Value::Int(0),
        Type::Bool => Value::Bool(false),
        Type::Str => Value::Str(Rc::from("")),
        Type::Class(Some(_)) => Value::Null(None),
        Type::Class(None) | Type::Void | Type::Nothing => Value::Nothing,
    }
}
