use crate::class::{Class, Instance};
use crate::environment::{self, Env};
use crate::function::Function;
use crate::host::HostServices;
use crate::native;
use crate::value::{Callable, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use wisp_ast::{BinaryOp, Expr, Literal, LogicalOp, Stmt, UnaryOp};
use wisp_errors::{Diagnostic, Handler, RuntimeError};
use wisp_resolver::Depths;
use wisp_span::Symbol;

/// What a statement's execution produced, beyond its side effects.
enum Flow {
    Normal,
    Return(Value),
}

type Exec = Result<Flow, RuntimeError>;
type Eval = Result<Value, RuntimeError>;

/// Walks a parsed, resolved program against a chain of environments.
///
/// Holds the globals frame, the current frame, the resolver's depth
/// side-table, the shared diagnostic [`Handler`], host services (the
/// file-handle table and friends), and the sink `print` writes to.
pub struct Interpreter<'h> {
    globals: Env,
    env: Env,
    depths: Depths,
    handler: &'h Handler,
    pub(crate) host: HostServices,
    output: RefCell<Box<dyn Write>>,
}

impl<'h> Interpreter<'h> {
    pub fn new(handler: &'h Handler, depths: Depths, args: Vec<String>) -> Self {
        let globals = environment::new_global();
        native::install(&globals);
        Self {
            env: Rc::clone(&globals),
            globals,
            depths,
            handler,
            host: HostServices::new(args),
            output: RefCell::new(Box::new(std::io::stdout())),
        }
    }

    /// Installs a fresh depth side-table, used by the prompt loop: each
    /// line is parsed and resolved independently, but the globals frame and
    /// host services carry over between lines.
    pub fn set_depths(&mut self, depths: Depths) {
        self.depths = depths;
    }

    /// Redirects `print` output; used by tests to capture program output.
    pub fn with_output(mut self, output: Box<dyn Write>) -> Self {
        self.output = RefCell::new(output);
        self
    }

    /// Runs a program's statements in order. Stops at the first runtime
    /// error, which has already been reported to the `Handler` by then.
    pub fn interpret(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            if self.exec_stmt(stmt).is_err() {
                return;
            }
        }
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Exec {
        match stmt {
            Stmt::Block { statements } => {
                let enclosing = Rc::clone(&self.env);
                self.env = environment::new_enclosed(&enclosing);
                let result = self.exec_block(statements);
                self.env = enclosing;
                result
            }
            Stmt::Class { name, superclass, methods, span } => {
                let superclass_value = match superclass {
                    Some(expr) => {
                        let value = self.eval_expr(expr)?;
                        let Value::Callable(Callable::Class(class)) = &value else {
                            self.runtime_error(span.line, "Superclass must be a class.");
                            return Err(RuntimeError);
                        };
                        Some(Rc::clone(class))
                    }
                    None => None,
                };

                let method_scope = match &superclass_value {
                    Some(class) => {
                        let scope = environment::new_enclosed(&self.env);
                        environment::define(
                            &scope,
                            Symbol::intern("super"),
                            Value::Callable(Callable::Class(Rc::clone(class))),
                        );
                        scope
                    }
                    None => Rc::clone(&self.env),
                };

                let mut table = IndexMap::new();
                for method in methods {
                    let is_initializer = method.name.name.to_string() == "init";
                    let function = Function::new(Rc::clone(method), Rc::clone(&method_scope), is_initializer);
                    table.insert(method.name.name, function);
                }

                let class = Rc::new(Class { name: name.name, superclass: superclass_value, methods: table });
                environment::define(&self.env, name.name, Value::Callable(Callable::Class(class)));
                Ok(Flow::Normal)
            }
            Stmt::Expression { expr } => {
                self.eval_expr(expr)?;
                Ok(Flow::Normal)
            }
            Stmt::Function(decl) => {
                let function = Function::new(Rc::clone(decl), Rc::clone(&self.env), false);
                environment::define(&self.env, decl.name.name, Value::Callable(Callable::Function(function)));
                Ok(Flow::Normal)
            }
            Stmt::If { condition, then_branch, else_branch } => {
                if self.eval_expr(condition)?.is_truthy() {
                    self.exec_stmt(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::Print { expr, .. } => {
                let value = self.eval_expr(expr)?;
                let mut output = self.output.borrow_mut();
                let _ = writeln!(output, "{}", value.stringify());
                Ok(Flow::Normal)
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                environment::define(&self.env, name.name, value);
                Ok(Flow::Normal)
            }
            Stmt::While { condition, body } => {
                while self.eval_expr(condition)?.is_truthy() {
                    match self.exec_stmt(body)? {
                        Flow::Normal => {}
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                }
                Ok(Flow::Normal)
            }
        }
    }

    fn exec_block(&mut self, statements: &[Stmt]) -> Exec {
        for stmt in statements {
            match self.exec_stmt(stmt)? {
                Flow::Normal => {}
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }
        Ok(Flow::Normal)
    }

    fn eval_expr(&mut self, expr: &Expr) -> Eval {
        match expr {
            Expr::Assign { id, span, name, value } => {
                let value = self.eval_expr(value)?;
                self.assign_variable(*id, span.line, name.name, value.clone())?;
                Ok(value)
            }
            Expr::Binary { span, left, op, right } => self.eval_binary(span.line, left, *op, right),
            Expr::Call { span, callee, args, .. } => self.eval_call(span.line, callee, args),
            Expr::Get { span, object, name } => {
                let object = self.eval_expr(object)?;
                self.eval_get(span.line, &object, name.name)
            }
            Expr::Grouping { inner, .. } => self.eval_expr(inner),
            Expr::Literal { value, .. } => Ok(literal_value(value)),
            Expr::Logical { left, op, right, .. } => {
                let left_value = self.eval_expr(left)?;
                match (op, left_value.is_truthy()) {
                    (LogicalOp::Or, true) => Ok(left_value),
                    (LogicalOp::Or, false) => self.eval_expr(right),
                    (LogicalOp::And, false) => Ok(left_value),
                    (LogicalOp::And, true) => self.eval_expr(right),
                }
            }
            Expr::Set { span, object, name, value } => {
                let object = self.eval_expr(object)?;
                let value = self.eval_expr(value)?;
                let Value::Instance(instance) = &object else {
                    self.runtime_error(span.line, "Only instances have fields.");
                    return Err(RuntimeError);
                };
                instance.borrow_mut().set_field(name.name, value.clone());
                Ok(value)
            }
            Expr::Super { id, span, method, .. } => self.eval_super(*id, span.line, method.name),
            Expr::This { id, span, .. } => self.read_variable(*id, span.line, Symbol::intern("this")),
            Expr::Unary { span, op, right } => self.eval_unary(span.line, *op, right),
            Expr::Variable { id, span, name } => self.read_variable(*id, span.line, name.name),
        }
    }

    fn read_variable(&self, id: wisp_ast::NodeId, line: u32, name: Symbol) -> Eval {
        let found = match self.depths.get(&id) {
            Some(&depth) => environment::get_at(&self.env, depth, name),
            None => environment::get_global(&self.globals, name),
        };
        found.ok_or_else(|| {
            self.runtime_error(line, format!("Undefined variable '{name}'."));
            RuntimeError
        })
    }

    fn assign_variable(&mut self, id: wisp_ast::NodeId, line: u32, name: Symbol, value: Value) -> Result<(), RuntimeError> {
        let ok = match self.depths.get(&id) {
            Some(&depth) => environment::assign_at(&self.env, depth, name, value),
            None => environment::assign_global(&self.globals, name, value),
        };
        if ok {
            Ok(())
        } else {
            self.runtime_error(line, format!("Undefined variable '{name}'."));
            Err(RuntimeError)
        }
    }

    fn eval_super(&mut self, id: wisp_ast::NodeId, line: u32, method_name: Symbol) -> Eval {
        let depth = *self.depths.get(&id).expect("resolver always records a depth for `super`");
        let superclass = environment::get_at(&self.env, depth, Symbol::intern("super"))
            .expect("resolver guarantees `super` is bound where it resolved `super`");
        let Value::Callable(Callable::Class(superclass)) = superclass else {
            unreachable!("`super` always binds to a class value")
        };
        // `this` is always exactly one hop closer than `super` by construction.
        let this = environment::get_at(&self.env, depth - 1, Symbol::intern("this"))
            .expect("resolver guarantees `this` is bound one scope inside `super`");
        match superclass.find_method(method_name) {
            Some(method) => Ok(Value::Callable(Callable::Function(method.bind(this)))),
            None => {
                self.runtime_error(line, format!("Undefined property '{method_name}'."));
                Err(RuntimeError)
            }
        }
    }

    fn eval_get(&mut self, line: u32, object: &Value, name: Symbol) -> Eval {
        let Value::Instance(instance) = object else {
            self.runtime_error(line, "Only instances have properties.");
            return Err(RuntimeError);
        };
        if let Some(value) = instance.borrow().get_field(name) {
            return Ok(value);
        }
        let class = Rc::clone(&instance.borrow().class);
        match class.find_method(name) {
            Some(method) => Ok(Value::Callable(Callable::Function(method.bind(object.clone())))),
            None => {
                self.runtime_error(line, format!("Undefined property '{name}'."));
                Err(RuntimeError)
            }
        }
    }

    fn eval_call(&mut self, line: u32, callee: &Expr, arg_exprs: &[Expr]) -> Eval {
        let callee = self.eval_expr(callee)?;
        let mut args = Vec::with_capacity(arg_exprs.len());
        for arg in arg_exprs {
            args.push(self.eval_expr(arg)?);
        }

        let (arity, callable) = match &callee {
            Value::Callable(c @ Callable::Native(native)) => (native.arity, c.clone()),
            Value::Callable(c @ Callable::Function(function)) => (function.arity(), c.clone()),
            Value::Callable(c @ Callable::Class(class)) => (class.arity(), c.clone()),
            _ => {
                self.runtime_error(line, "Can only call functions and classes.");
                return Err(RuntimeError);
            }
        };

        if args.len() != arity {
            self.runtime_error(line, format!("Expected {arity} arguments but got {}.", args.len()));
            return Err(RuntimeError);
        }

        match callable {
            Callable::Native(native) => (native.call)(self, &args),
            Callable::Function(function) => self.call_function(&function, args),
            Callable::Class(class) => self.instantiate(&class, args),
        }
    }

    fn call_function(&mut self, function: &Rc<Function>, args: Vec<Value>) -> Eval {
        let frame = environment::new_enclosed(&function.closure);
        for (param, arg) in function.decl.params.iter().zip(args) {
            environment::define(&frame, param.name, arg);
        }

        let enclosing = Rc::clone(&self.env);
        self.env = Rc::clone(&frame);
        let result = self.exec_block(&function.decl.body);
        self.env = enclosing;

        let flow = result?;
        if function.is_initializer {
            return Ok(environment::get_at(&frame, 0, Symbol::intern("this"))
                .expect("an initializer's frame always binds `this`"));
        }
        match flow {
            Flow::Normal => Ok(Value::Nil),
            Flow::Return(value) => Ok(value),
        }
    }

    fn instantiate(&mut self, class: &Rc<Class>, args: Vec<Value>) -> Eval {
        let instance = Rc::new(RefCell::new(Instance::new(Rc::clone(class))));
        if let Some(initializer) = class.find_method(Symbol::intern("init")) {
            let bound = initializer.bind(Value::Instance(Rc::clone(&instance)));
            self.call_function(&bound, args)?;
        }
        Ok(Value::Instance(instance))
    }

    fn eval_unary(&mut self, line: u32, op: UnaryOp, right: &Expr) -> Eval {
        let right = self.eval_expr(right)?;
        match op {
            UnaryOp::Neg => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => {
                    self.runtime_error(line, "Operand must be a number.");
                    Err(RuntimeError)
                }
            },
            UnaryOp::Not => Ok(Value::Bool(!right.is_truthy())),
        }
    }

    fn eval_binary(&mut self, line: u32, left: &Expr, op: BinaryOp, right: &Expr) -> Eval {
        let left = self.eval_expr(left)?;
        let right = self.eval_expr(right)?;
        match op {
            BinaryOp::Add => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{a}{b}"))),
                _ => {
                    self.runtime_error(line, "Operands must both be numbers or strings.");
                    Err(RuntimeError)
                }
            },
            BinaryOp::Sub => self.numeric_binary(line, left, right, |a, b| Value::Number(a - b)),
            BinaryOp::Mul => self.numeric_binary(line, left, right, |a, b| Value::Number(a * b)),
            BinaryOp::Div => {
                let (a, b) = self.both_numbers(line, &left, &right)?;
                if b == 0.0 {
                    self.runtime_error(line, "Cannot divide by zero.");
                    return Err(RuntimeError);
                }
                Ok(Value::Number(a / b))
            }
            BinaryOp::Greater => self.numeric_binary(line, left, right, |a, b| Value::Bool(a > b)),
            BinaryOp::GreaterEq => self.numeric_binary(line, left, right, |a, b| Value::Bool(a >= b)),
            BinaryOp::Less => self.numeric_binary(line, left, right, |a, b| Value::Bool(a < b)),
            BinaryOp::LessEq => self.numeric_binary(line, left, right, |a, b| Value::Bool(a <= b)),
            BinaryOp::Eq => Ok(Value::Bool(left.eq_value(&right))),
            BinaryOp::NotEq => Ok(Value::Bool(!left.eq_value(&right))),
        }
    }

    fn both_numbers(&self, line: u32, left: &Value, right: &Value) -> Result<(f64, f64), RuntimeError> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
            _ => {
                self.runtime_error(line, "Operands must both be numbers.");
                Err(RuntimeError)
            }
        }
    }

    fn numeric_binary(
        &self,
        line: u32,
        left: Value,
        right: Value,
        op: impl FnOnce(f64, f64) -> Value,
    ) -> Result<Value, RuntimeError> {
        let (a, b) = self.both_numbers(line, &left, &right)?;
        Ok(op(a, b))
    }

    fn runtime_error(&self, line: u32, message: impl Into<String>) {
        self.handler.emit(Diagnostic::scan(line, message));
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Nil => Value::Nil,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Number(n) => Value::Number(*n),
        Literal::Str(s) => Value::string(s.as_str()),
    }
}
