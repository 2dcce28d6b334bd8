//! Object arena.
//!
//! Instances live in a flat slot vector addressed by [`ObjectId`] handles, so
//! object graphs (including cycles through fields) need no ownership
//! gymnastics and reference identity is a handle compare. Slots are never
//! reclaimed: interpreter errors are terminal and an object population is
//! bounded by the `new` expressions a run evaluates.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    classes::ClassDef,
    value::{ClassName, Value},
};

/// Unique identifier for instances stored inside the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ObjectId(usize);

impl ObjectId {
    /// Returns the raw slot index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Per-instance state: current field values and the inheritance link.
///
/// A derived instance owns a *separate* instance of its superclass; inherited
/// methods execute against that super object's fields.
#[derive(Debug)]
pub(crate) struct Instance {
    /// The defining class. Shared with every other instance of the class.
    pub class_def: Rc<ClassDef>,
    /// Field values in declaration order, initialized from defaults.
    pub fields: IndexMap<Rc<str>, Value>,
    /// The super object, when the class inherits.
    pub super_obj: Option<ObjectId>,
}

impl Instance {
    /// The dynamic class of this instance.
    pub fn class_name(&self) -> &ClassName {
        &self.class_def.name
    }
}

/// The arena of live instances.
#[derive(Debug, Default)]
pub(crate) struct Heap {
    entries: Vec<Instance>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an instance and returns its handle.
    pub fn allocate(&mut self, instance: Instance) -> ObjectId {
        let id = ObjectId(self.entries.len());
        self.entries.push(instance);
        id
    }

    /// Looks up an instance. Handles are only minted by `allocate`, so a
    /// missing slot is an interpreter bug, not a program error.
    pub fn get(&self, id: ObjectId) -> &Instance {
        &self.entries[id.index()]
    }

    pub fn get_mut(&mut self, id: ObjectId) -> &mut Instance {
        &mut self.entries[id.index()]
    }
}
