use crate::expr::{Expr, Identifier};
use std::rc::Rc;
use wisp_span::Span;

/// A `fun` declaration's fixed parts: name, parameters, and body.
///
/// Shared via `Rc` because the same declaration is referenced both by the
/// `Stmt::Function` that introduces it and, for methods, by the owning
/// class's method table, and again at call time by the `Value::Function`
/// that closes over it.
#[derive(Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub params: Vec<Identifier>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A statement node.
///
/// Unlike [`Expr`](crate::Expr), statements carry no `NodeId`: nothing in the
/// resolver or interpreter ever needs to look a statement up by identity,
/// only expressions (variable references, `this`, `super`) do.
#[derive(Debug, PartialEq)]
pub enum Stmt {
    Block {
        statements: Vec<Stmt>,
    },
    Class {
        name: Identifier,
        superclass: Option<Expr>,
        methods: Vec<Rc<FunctionDecl>>,
        span: Span,
    },
    Expression {
        expr: Expr,
    },
    Function(Rc<FunctionDecl>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    Print {
        expr: Expr,
        span: Span,
    },
    Return {
        keyword: Span,
        value: Option<Expr>,
    },
    Var {
        name: Identifier,
        initializer: Option<Expr>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
}
