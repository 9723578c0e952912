use crate::function::Function;
use crate::value::Value;
use indexmap::IndexMap;
use std::rc::Rc;
use wisp_span::Symbol;

/// A class's method table is fixed once built; only instance field maps are
/// mutable afterwards.
pub struct Class {
    pub name: Symbol,
    pub superclass: Option<Rc<Class>>,
    pub methods: IndexMap<Symbol, Rc<Function>>,
}

impl Class {
    /// Walks this class and its ancestors for a method named `name`.
    pub fn find_method(&self, name: Symbol) -> Option<Rc<Function>> {
        if let Some(method) = self.methods.get(&name) {
            return Some(Rc::clone(method));
        }
        self.superclass.as_ref().and_then(|s| s.find_method(name))
    }

    pub fn arity(&self) -> usize {
        self.find_method(Symbol::intern("init")).map(|f| f.arity()).unwrap_or(0)
    }
}

/// A live instance: a reference to its class plus a mutable field map.
///
/// Fields use an `IndexMap` so field iteration (were the Language ever to
/// expose it) would observe insertion order rather than hash order, matching
/// how the rest of the interpreter treats object-like maps.
pub struct Instance {
    pub class: Rc<Class>,
    fields: IndexMap<Symbol, Value>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self { class, fields: IndexMap::new() }
    }

    pub fn get_field(&self, name: Symbol) -> Option<Value> {
        self.fields.get(&name).cloned()
    }

    pub fn set_field(&mut self, name: Symbol, value: Value) {
        self.fields.insert(name, value);
    }
}
