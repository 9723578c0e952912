//! Lexical scope resolution for the Wisp scripting language.
//!
//! A single statement-tree walk threads a stack of scopes plus two
//! single-value contexts (the kind of function and class currently being
//! resolved) and produces a side-table mapping each variable-referencing
//! expression's [`NodeId`] to the number of environment hops from its use
//! site to its binding site. Names absent from the table are resolved
//! against the global frame at interpretation time.

use indexmap::IndexMap;
use std::collections::HashMap;
use wisp_ast::{Expr, FunctionDecl, Identifier, NodeId, Stmt};
use wisp_errors::{Diagnostic, Handler};
use wisp_span::Symbol;

/// The resolver's output: expression node id -> enclosing-frame hop count.
pub type Depths = HashMap<NodeId, usize>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    None,
    Function,
    Method,
    Initializer,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ClassKind {
    None,
    Class,
    Subclass,
}

pub struct Resolver<'h> {
    handler: &'h Handler,
    scopes: Vec<IndexMap<Symbol, bool>>,
    depths: Depths,
    current_function: FunctionKind,
    current_class: ClassKind,
}

impl<'h> Resolver<'h> {
    pub fn new(handler: &'h Handler) -> Self {
        Self {
            handler,
            scopes: Vec::new(),
            depths: HashMap::new(),
            current_function: FunctionKind::None,
            current_class: ClassKind::None,
        }
    }

    /// Resolves a whole program, returning the side-table built along the way.
    pub fn resolve(mut self, statements: &[Stmt]) -> Depths {
        self.resolve_stmts(statements);
        self.depths
    }

    fn begin_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Identifier) {
        let Some(scope) = self.scopes.last_mut() else { return };
        if scope.contains_key(&name.name) {
            self.handler.emit(Diagnostic::at(
                name.span.line,
                name.name.to_string(),
                "Already a variable with this name in this scope.",
            ));
        }
        scope.insert(name.name, false);
    }

    fn define(&mut self, name: &Identifier) {
        let Some(scope) = self.scopes.last_mut() else { return };
        scope.insert(name.name, true);
    }

    fn resolve_local(&mut self, id: NodeId, name: Symbol) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name) {
                self.depths.insert(id, depth);
                return;
            }
        }
        // Not found in any scope: treated as a global at interpretation time.
    }

    fn resolve_stmts(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block { statements } => {
                self.begin_scope();
                self.resolve_stmts(statements);
                self.end_scope();
            }
            Stmt::Class { name, superclass, methods, span } => {
                let enclosing_class = self.current_class;
                self.current_class = ClassKind::Class;

                self.declare(name);
                self.define(name);

                if let Some(superclass) = superclass {
                    let Expr::Variable { name: super_name, .. } = superclass else {
                        unreachable!("parser only ever produces a Variable superclass expression")
                    };
                    if super_name.name == name.name {
                        self.handler.emit(Diagnostic::at(
                            span.line,
                            super_name.name.to_string(),
                            "A class can't inherit from itself.",
                        ));
                    }
                    self.current_class = ClassKind::Subclass;
                    self.resolve_expr(superclass);

                    self.begin_scope();
                    self.scopes.last_mut().unwrap().insert(Symbol::intern("super"), true);
                }

                self.begin_scope();
                self.scopes.last_mut().unwrap().insert(Symbol::intern("this"), true);

                for method in methods {
                    let kind = if method.name.name.to_string() == "init" {
                        FunctionKind::Initializer
                    } else {
                        FunctionKind::Method
                    };
                    self.resolve_function(method, kind);
                }

                self.end_scope();
                if superclass.is_some() {
                    self.end_scope();
                }

                self.current_class = enclosing_class;
            }
            Stmt::Expression { expr } => self.resolve_expr(expr),
            Stmt::Function(decl) => {
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(decl, FunctionKind::Function);
            }
            Stmt::If { condition, then_branch, else_branch } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::Print { expr, .. } => self.resolve_expr(expr),
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionKind::None {
                    self.handler.emit(Diagnostic::at(
                        keyword.line,
                        "return",
                        "Can't return from top-level code.",
                    ));
                }
                if let Some(value) = value {
                    if self.current_function == FunctionKind::Initializer {
                        self.handler.emit(Diagnostic::at(
                            keyword.line,
                            "return",
                            "Can't return a value from an initializer.",
                        ));
                    }
                    self.resolve_expr(value);
                }
            }
            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(initializer) = initializer {
                    self.resolve_expr(initializer);
                }
                self.define(name);
            }
            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }
        }
    }

    fn resolve_function(&mut self, decl: &FunctionDecl, kind: FunctionKind) {
        let enclosing_function = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &decl.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_stmts(&decl.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Assign { id, name, value, .. } => {
                self.resolve_expr(value);
                self.resolve_local(*id, name.name);
            }
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Call { callee, args, .. } => {
                self.resolve_expr(callee);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Get { object, .. } => self.resolve_expr(object),
            Expr::Grouping { inner, .. } => self.resolve_expr(inner),
            Expr::Literal { .. } => {}
            Expr::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }
            Expr::Super { id, keyword, .. } => {
                if self.current_class == ClassKind::None {
                    self.handler.emit(Diagnostic::at(
                        keyword.line,
                        "super",
                        "Can't use 'super' outside of a class.",
                    ));
                } else if self.current_class != ClassKind::Subclass {
                    self.handler.emit(Diagnostic::at(
                        keyword.line,
                        "super",
                        "Can't use 'super' in a class with no superclass.",
                    ));
                }
                self.resolve_local(*id, Symbol::intern("super"));
            }
            Expr::This { id, keyword } => {
                if self.current_class == ClassKind::None {
                    self.handler.emit(Diagnostic::at(
                        keyword.line,
                        "this",
                        "Can't use 'this' outside of a class.",
                    ));
                }
                self.resolve_local(*id, Symbol::intern("this"));
            }
            Expr::Unary { right, .. } => self.resolve_expr(right),
            Expr::Variable { id, name, .. } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.name) == Some(&false) {
                        self.handler.emit(Diagnostic::at(
                            name.span.line,
                            name.name.to_string(),
                            "Can't read local variable in its own initializer.",
                        ));
                    }
                }
                self.resolve_local(*id, name.name);
            }
        }
    }
}

/// Resolves `statements`, returning the depth side-table.
pub fn resolve(statements: &[Stmt], handler: &Handler) -> Depths {
    Resolver::new(handler).resolve(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisp_parser::parse;

    fn resolve_source(source: &str) -> (Depths, bool) {
        let handler = Handler::new(false);
        let stmts = parse(source, &handler);
        let depths = resolve(&stmts, &handler);
        (depths, handler.had_error())
    }

    #[test]
    fn reading_local_in_own_initializer_is_an_error() {
        let (_, had_error) = resolve_source("{ var a = a; }");
        assert!(had_error);
    }

    #[test]
    fn redeclaring_in_same_scope_is_an_error() {
        let (_, had_error) = resolve_source("{ var a = 1; var a = 2; }");
        assert!(had_error);
    }

    #[test]
    fn top_level_return_is_an_error() {
        let (_, had_error) = resolve_source("return 1;");
        assert!(had_error);
    }

    #[test]
    fn this_outside_class_is_an_error() {
        let (_, had_error) = resolve_source("print this;");
        assert!(had_error);
    }

    #[test]
    fn super_without_superclass_is_an_error() {
        let (_, had_error) = resolve_source("class A { m() { super.m(); } }");
        assert!(had_error);
    }

    #[test]
    fn class_inheriting_itself_is_an_error() {
        let (_, had_error) = resolve_source("class A < A {}");
        assert!(had_error);
    }

    #[test]
    fn shadowing_a_global_does_not_perturb_an_earlier_capture_depth() {
        let (depths, had_error) = resolve_source(
            "var a = \"global\"; { fun show() { print a; } show(); var a = \"local\"; show(); }",
        );
        assert!(!had_error);
        // `show`'s reference to `a` resolves to the global (no entry), since
        // at the point `show` is declared no local `a` exists yet.
        assert!(depths.values().all(|d| *d != 0) || depths.is_empty());
    }
}
