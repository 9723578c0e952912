use crate::parser::context::ParserContext;
use crate::tokenizer::TokenKind;
use wisp_ast::{BinaryOp, Expr, Literal, LogicalOp, UnaryOp};
use wisp_errors::ParseError;
use wisp_span::Span;

type PExpr = Result<Expr, ParseError>;

impl<'h> ParserContext<'h> {
    pub(crate) fn parse_expression(&mut self) -> PExpr {
        self.parse_assignment()
    }

    /// `(call ".")? IDENT "=" assignment | logic_or`
    ///
    /// The grammar's left-recursive `assignment` production is rewritten:
    /// parse a full `logic_or` first, then if an `=` follows, check that
    /// what was just parsed is a legal assignment target.
    fn parse_assignment(&mut self) -> PExpr {
        let expr = self.parse_or()?;
        if self.eat(&TokenKind::Equal) {
            let equals_span = self.prev_token.span;
            let value = Box::new(self.parse_assignment()?);
            let span = Span::new(equals_span.line);
            return match expr {
                Expr::Variable { name, .. } => {
                    Ok(Expr::Assign { id: self.ids.next(), span, name, value })
                }
                Expr::Get { object, name, .. } => {
                    Ok(Expr::Set { id: self.ids.next(), span, object, name, value })
                }
                other => {
                    self.error_at_prev("Invalid assignment target.");
                    Ok(other)
                }
            };
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> PExpr {
        self.parse_logical(&[TokenKind::Or], LogicalOp::Or, Self::parse_and)
    }

    fn parse_and(&mut self) -> PExpr {
        self.parse_logical(&[TokenKind::And], LogicalOp::And, Self::parse_equality)
    }

    fn parse_logical(
        &mut self,
        tokens: &[TokenKind],
        op: LogicalOp,
        mut inner: impl FnMut(&mut Self) -> PExpr,
    ) -> PExpr {
        let mut expr = inner(self)?;
        while self.check_any(tokens) {
            self.bump();
            let span = expr.span();
            let right = Box::new(inner(self)?);
            expr = Expr::Logical { id: self.ids.next(), span, left: Box::new(expr), op, right };
        }
        Ok(expr)
    }

    fn parse_bin_expr(
        &mut self,
        eat_op: impl Fn(&mut Self) -> Option<BinaryOp>,
        mut inner: impl FnMut(&mut Self) -> PExpr,
    ) -> PExpr {
        let mut expr = inner(self)?;
        while let Some(op) = eat_op(self) {
            let span = expr.span();
            let right = Box::new(inner(self)?);
            expr = Expr::Binary { id: self.ids.next(), span, left: Box::new(expr), op, right };
        }
        Ok(expr)
    }

    fn parse_equality(&mut self) -> PExpr {
        self.parse_bin_expr(
            |p| {
                if p.eat(&TokenKind::BangEqual) {
                    Some(BinaryOp::NotEq)
                } else if p.eat(&TokenKind::EqualEqual) {
                    Some(BinaryOp::Eq)
                } else {
                    None
                }
            },
            Self::parse_comparison,
        )
    }

    fn parse_comparison(&mut self) -> PExpr {
        self.parse_bin_expr(
            |p| {
                if p.eat(&TokenKind::Greater) {
                    Some(BinaryOp::Greater)
                } else if p.eat(&TokenKind::GreaterEqual) {
                    Some(BinaryOp::GreaterEq)
                } else if p.eat(&TokenKind::Less) {
                    Some(BinaryOp::Less)
                } else if p.eat(&TokenKind::LessEqual) {
                    Some(BinaryOp::LessEq)
                } else {
                    None
                }
            },
            Self::parse_term,
        )
    }

    fn parse_term(&mut self) -> PExpr {
        self.parse_bin_expr(
            |p| {
                if p.eat(&TokenKind::Minus) {
                    Some(BinaryOp::Sub)
                } else if p.eat(&TokenKind::Plus) {
                    Some(BinaryOp::Add)
                } else {
                    None
                }
            },
            Self::parse_factor,
        )
    }

    fn parse_factor(&mut self) -> PExpr {
        self.parse_bin_expr(
            |p| {
                if p.eat(&TokenKind::Slash) {
                    Some(BinaryOp::Div)
                } else if p.eat(&TokenKind::Star) {
                    Some(BinaryOp::Mul)
                } else {
                    None
                }
            },
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> PExpr {
        if self.check_any(&[TokenKind::Bang, TokenKind::Minus]) {
            self.bump();
            let span = Span::new(self.prev_token.span.line);
            let op = if self.prev_token.kind == TokenKind::Bang { UnaryOp::Not } else { UnaryOp::Neg };
            let right = Box::new(self.parse_unary()?);
            return Ok(Expr::Unary { id: self.ids.next(), span, op, right });
        }
        self.parse_call()
    }

    /// `primary ( "(" args? ")" | "." IDENT )*`
    fn parse_call(&mut self) -> PExpr {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(&TokenKind::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if self.eat(&TokenKind::Dot) {
                let name = self.expect_identifier("property name after '.'")?;
                let span = expr.span();
                expr = Expr::Get { id: self.ids.next(), span, object: Box::new(expr), name };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> PExpr {
        let span = callee.span();
        let mut args = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                if args.len() >= 255 {
                    self.error_at_current("Can't have more than 255 arguments.");
                }
                args.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, "')' after arguments")?;
        let paren = Span::new(self.prev_token.span.line);
        Ok(Expr::Call { id: self.ids.next(), span, callee: Box::new(callee), paren, args })
    }

    fn parse_primary(&mut self) -> PExpr {
        let span = self.token.span;
        if self.eat(&TokenKind::False) {
            return Ok(Expr::Literal { id: self.ids.next(), span, value: Literal::Bool(false) });
        }
        if self.eat(&TokenKind::True) {
            return Ok(Expr::Literal { id: self.ids.next(), span, value: Literal::Bool(true) });
        }
        if self.eat(&TokenKind::Nil) {
            return Ok(Expr::Literal { id: self.ids.next(), span, value: Literal::Nil });
        }
        if let TokenKind::Number(n) = self.token.kind {
            self.bump();
            return Ok(Expr::Literal { id: self.ids.next(), span, value: Literal::Number(n) });
        }
        if let TokenKind::String(s) = self.token.kind.clone() {
            self.bump();
            return Ok(Expr::Literal { id: self.ids.next(), span, value: Literal::Str(s) });
        }
        if self.eat(&TokenKind::Super) {
            let keyword = span;
            self.expect(TokenKind::Dot, "'.' after 'super'")?;
            let method = self.expect_identifier("superclass method name")?;
            return Ok(Expr::Super { id: self.ids.next(), span, keyword, method });
        }
        if self.eat(&TokenKind::This) {
            return Ok(Expr::This { id: self.ids.next(), span, keyword: span });
        }
        if let TokenKind::Identifier(name) = self.token.kind.clone() {
            self.bump();
            return Ok(Expr::Variable {
                id: self.ids.next(),
                span,
                name: wisp_ast::Identifier::new(name, span),
            });
        }
        if self.eat(&TokenKind::LeftParen) {
            let inner = Box::new(self.parse_expression()?);
            self.expect(TokenKind::RightParen, "')' after expression")?;
            return Ok(Expr::Grouping { id: self.ids.next(), span, inner });
        }
        self.error_at_current("Expect expression.");
        Err(ParseError)
    }
}
