use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wisp_span::Symbol;

/// A single environment frame: a name-to-value mapping plus an optional
/// enclosing frame.
///
/// Frames form a DAG, never a cycle: a frame's `enclosing` pointer is fixed
/// at construction and never changes, so it is safe to share frames by
/// reference count between every closure and call frame that captured them.
pub struct Frame {
    values: HashMap<Symbol, Value>,
    enclosing: Option<Env>,
}

/// A reference-counted handle to a [`Frame`].
pub type Env = Rc<RefCell<Frame>>;

pub fn new_global() -> Env {
    Rc::new(RefCell::new(Frame { values: HashMap::new(), enclosing: None }))
}

pub fn new_enclosed(enclosing: &Env) -> Env {
    Rc::new(RefCell::new(Frame { values: HashMap::new(), enclosing: Some(Rc::clone(enclosing)) }))
}

/// Defines (or redefines) `name` in `env`'s own frame.
pub fn define(env: &Env, name: Symbol, value: Value) {
    env.borrow_mut().values.insert(name, value);
}

/// Walks `depth` enclosing pointers from `env` and returns that ancestor.
pub fn ancestor(env: &Env, depth: usize) -> Env {
    let mut frame = Rc::clone(env);
    for _ in 0..depth {
        let next = frame
            .borrow()
            .enclosing
            .clone()
            .expect("resolver depth outlives the environment chain it was computed against");
        frame = next;
    }
    frame
}

/// Reads `name` at exactly `depth` hops from `env` (resolver-assisted lookup).
pub fn get_at(env: &Env, depth: usize, name: Symbol) -> Option<Value> {
    ancestor(env, depth).borrow().values.get(&name).cloned()
}

/// Writes `name` at exactly `depth` hops from `env`. Returns `false` if the
/// target frame has no existing binding for `name`.
pub fn assign_at(env: &Env, depth: usize, name: Symbol, value: Value) -> bool {
    let frame = ancestor(env, depth);
    let mut frame = frame.borrow_mut();
    if frame.values.contains_key(&name) {
        frame.values.insert(name, value);
        true
    } else {
        false
    }
}

/// Reads `name` walking from `env` all the way out to the global frame
/// (used when the resolver recorded no depth, i.e. the name is global).
pub fn get_global(env: &Env, name: Symbol) -> Option<Value> {
    let mut frame = Rc::clone(env);
    loop {
        if let Some(value) = frame.borrow().values.get(&name).cloned() {
            return Some(value);
        }
        let next = frame.borrow().enclosing.clone();
        match next {
            Some(next) => frame = next,
            None => return None,
        }
    }
}

/// Assigns `name` walking from `env` out to the global frame. Returns
/// `false` if no frame along the chain already binds `name`.
pub fn assign_global(env: &Env, name: Symbol, value: Value) -> bool {
    let mut frame = Rc::clone(env);
    loop {
        if frame.borrow().values.contains_key(&name) {
            frame.borrow_mut().values.insert(name, value);
            return true;
        }
        let next = frame.borrow().enclosing.clone();
        match next {
            Some(next) => frame = next,
            None => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_frame_sees_parent_bindings() {
        let global = new_global();
        define(&global, Symbol::intern("x"), Value::Number(1.0));
        let child = new_enclosed(&global);
        assert!(get_global(&child, Symbol::intern("x")).is_some());
    }

    #[test]
    fn assign_at_fails_when_target_frame_lacks_binding() {
        let global = new_global();
        assert!(!assign_at(&global, 0, Symbol::intern("missing"), Value::Nil));
    }
}
