use crate::environment::{self, Env};
use crate::value::Value;
use std::rc::Rc;
use wisp_ast::FunctionDecl;
use wisp_span::Symbol;

/// A user-declared function or method, closing over the frame active at its
/// declaration.
pub struct Function {
    pub decl: Rc<FunctionDecl>,
    pub closure: Env,
    /// True for a class's `init` method: its call always returns the
    /// receiver regardless of whether the body took a bare `return`.
    pub is_initializer: bool,
}

impl Function {
    pub fn new(decl: Rc<FunctionDecl>, closure: Env, is_initializer: bool) -> Rc<Self> {
        Rc::new(Self { decl, closure, is_initializer })
    }

    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }

    /// Produces a fresh callable whose closure binds `this` to `receiver`,
    /// enclosed by the method's original closure (so a method on a subclass
    /// still sees the superclass method's own closure one hop further out).
    pub fn bind(self: &Rc<Self>, receiver: Value) -> Rc<Self> {
        let frame = environment::new_enclosed(&self.closure);
        environment::define(&frame, Symbol::intern("this"), receiver);
        Rc::new(Self { decl: Rc::clone(&self.decl), closure: frame, is_initializer: self.is_initializer })
    }
}
