use crate::parser::context::ParserContext;
use crate::tokenizer::TokenKind;
use std::rc::Rc;
use wisp_ast::{Expr, FunctionDecl, Literal, Stmt};
use wisp_errors::ParseError;
use wisp_span::Span;

type PStmt = Result<Stmt, ParseError>;

impl<'h> ParserContext<'h> {
    /// `program := declaration* EOF`
    pub fn parse_program(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.at_eof() {
            match self.parse_declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(ParseError) => self.synchronize(),
            }
        }
        statements
    }

    /// `declaration := classDecl | funDecl | varDecl | statement`
    fn parse_declaration(&mut self) -> PStmt {
        if self.eat(&TokenKind::Class) {
            return self.parse_class_decl();
        }
        if self.eat(&TokenKind::Fun) {
            return self.parse_function("function").map(Stmt::Function);
        }
        if self.eat(&TokenKind::Var) {
            return self.parse_var_decl();
        }
        self.parse_statement()
    }

    /// `classDecl := "class" IDENT ("<" IDENT)? "{" function* "}"`
    fn parse_class_decl(&mut self) -> PStmt {
        let span = self.prev_token.span;
        let name = self.expect_identifier("class name")?;
        let superclass = if self.eat(&TokenKind::Less) {
            let super_name = self.expect_identifier("superclass name")?;
            let super_span = super_name.span;
            Some(Expr::Variable { id: self.ids.next(), span: super_span, name: super_name })
        } else {
            None
        };
        self.expect(TokenKind::LeftBrace, "'{' before class body")?;
        let mut methods = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.at_eof() {
            methods.push(self.parse_function("method")?);
        }
        self.expect(TokenKind::RightBrace, "'}' after class body")?;
        Ok(Stmt::Class { name, superclass, methods, span })
    }

    /// `function := IDENT "(" params? ")" block`
    fn parse_function(&mut self, kind: &str) -> Result<Rc<FunctionDecl>, ParseError> {
        let name = self.expect_identifier(&format!("{kind} name"))?;
        let span = name.span;
        self.expect(TokenKind::LeftParen, &format!("'(' after {kind} name"))?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                if params.len() >= 255 {
                    self.error_at_current("Can't have more than 255 parameters.");
                }
                params.push(self.expect_identifier("parameter name")?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, "')' after parameters")?;
        self.expect(TokenKind::LeftBrace, &format!("'{{' before {kind} body"))?;
        let body = self.parse_block()?;
        Ok(Rc::new(FunctionDecl { name, params, body, span }))
    }

    /// `varDecl := "var" IDENT ("=" expression)? ";"`
    fn parse_var_decl(&mut self) -> PStmt {
        let name = self.expect_identifier("variable name")?;
        let initializer =
            if self.eat(&TokenKind::Equal) { Some(self.parse_expression()?) } else { None };
        self.expect(TokenKind::Semicolon, "';' after variable declaration")?;
        Ok(Stmt::Var { name, initializer })
    }

    fn parse_statement(&mut self) -> PStmt {
        if self.eat(&TokenKind::For) {
            return self.parse_for_stmt();
        }
        if self.eat(&TokenKind::If) {
            return self.parse_if_stmt();
        }
        if self.eat(&TokenKind::Print) {
            return self.parse_print_stmt();
        }
        if self.eat(&TokenKind::Return) {
            return self.parse_return_stmt();
        }
        if self.eat(&TokenKind::While) {
            return self.parse_while_stmt();
        }
        if self.eat(&TokenKind::LeftBrace) {
            return Ok(Stmt::Block { statements: self.parse_block()? });
        }
        self.parse_expr_stmt()
    }

    /// `block := "{" declaration* "}"`, opening brace already consumed.
    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.at_eof() {
            match self.parse_declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(ParseError) => self.synchronize(),
            }
        }
        self.expect(TokenKind::RightBrace, "'}' after block")?;
        Ok(statements)
    }

    fn parse_expr_stmt(&mut self) -> PStmt {
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "';' after expression")?;
        Ok(Stmt::Expression { expr })
    }

    /// Desugars `for (init; cond; incr) body` into
    /// `{ init; while (cond) { body; incr; } }`.
    fn parse_for_stmt(&mut self) -> PStmt {
        self.expect(TokenKind::LeftParen, "'(' after 'for'")?;

        let initializer = if self.eat(&TokenKind::Semicolon) {
            None
        } else if self.eat(&TokenKind::Var) {
            Some(self.parse_var_decl()?)
        } else {
            Some(self.parse_expr_stmt()?)
        };

        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semicolon, "';' after loop condition")?;

        let increment = if self.check(&TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::RightParen, "')' after for clauses")?;

        let mut body = self.parse_statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block {
                statements: vec![body, Stmt::Expression { expr: increment }],
            };
        }

        let condition = condition.unwrap_or_else(|| Expr::Literal {
            id: self.ids.next(),
            span: Span::dummy(),
            value: Literal::Bool(true),
        });
        body = Stmt::While { condition, body: Box::new(body) };

        if let Some(initializer) = initializer {
            body = Stmt::Block { statements: vec![initializer, body] };
        }

        Ok(body)
    }

    /// `ifStmt := "if" "(" expression ")" statement ("else" statement)?`
    fn parse_if_stmt(&mut self) -> PStmt {
        self.expect(TokenKind::LeftParen, "'(' after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RightParen, "')' after if condition")?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch =
            if self.eat(&TokenKind::Else) { Some(Box::new(self.parse_statement()?)) } else { None };
        Ok(Stmt::If { condition, then_branch, else_branch })
    }

    fn parse_print_stmt(&mut self) -> PStmt {
        let span = self.prev_token.span;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "';' after value")?;
        Ok(Stmt::Print { expr, span })
    }

    /// `returnStmt := "return" expression? ";"`
    fn parse_return_stmt(&mut self) -> PStmt {
        let keyword = self.prev_token.span;
        let value = if self.check(&TokenKind::Semicolon) { None } else { Some(self.parse_expression()?) };
        self.expect(TokenKind::Semicolon, "';' after return value")?;
        Ok(Stmt::Return { keyword, value })
    }

    /// `whileStmt := "while" "(" expression ")" statement`
    fn parse_while_stmt(&mut self) -> PStmt {
        self.expect(TokenKind::LeftParen, "'(' after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RightParen, "')' after condition")?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::While { condition, body })
    }
}
