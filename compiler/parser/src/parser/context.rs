use crate::tokenizer::{Token, TokenKind};
use std::mem;
use wisp_ast::{Identifier, NodeIdGen};
use wisp_errors::{Diagnostic, Handler, ParseError};
use wisp_span::Symbol;

/// Threads the token cursor, the diagnostic sink, and the id generator
/// through every parsing production.
///
/// Tokens are pushed in reverse so `bump` is a cheap `Vec::pop`, mirroring
/// how a hand-rolled recursive-descent parser keeps its cursor.
pub struct ParserContext<'h> {
    pub(crate) handler: &'h Handler,
    pub(crate) ids: NodeIdGen,
    tokens: Vec<Token>,
    pub(crate) token: Token,
    pub(crate) prev_token: Token,
}

impl<'h> ParserContext<'h> {
    pub fn new(handler: &'h Handler, mut tokens: Vec<Token>) -> Self {
        tokens.reverse();
        let eof = tokens.first().cloned().expect("token stream always ends in Eof");
        let mut ctx = Self { handler, ids: NodeIdGen::new(), token: eof.clone(), prev_token: eof, tokens };
        ctx.bump();
        ctx
    }

    /// Advances the cursor by one token.
    pub(crate) fn bump(&mut self) {
        let next = self.tokens.pop().unwrap_or_else(|| self.token.clone());
        self.prev_token = mem::replace(&mut self.token, next);
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        &self.token.kind == kind
    }

    pub(crate) fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|k| self.check(k))
    }

    /// Consumes the current token if it matches `kind`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        let matches = self.check(kind);
        if matches {
            self.bump();
        }
        matches
    }

    /// Consumes the current token if it matches `kind`, else reports a
    /// diagnostic and raises [`ParseError`].
    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), ParseError> {
        if self.eat(&kind) {
            return Ok(());
        }
        self.error_at_current(format!("Expect {what}."));
        Err(ParseError)
    }

    pub(crate) fn expect_identifier(&mut self, what: &str) -> Result<Identifier, ParseError> {
        if let TokenKind::Identifier(name) = self.token.kind.clone() {
            let span = self.token.span;
            self.bump();
            return Ok(Identifier::new(name, span));
        }
        self.error_at_current(format!("Expect {what}."));
        Err(ParseError)
    }

    /// Interns the previous token's lexeme, used once a keyword/identifier
    /// pair has already been bumped past.
    pub(crate) fn prev_as_symbol(&self) -> Symbol {
        Symbol::intern(&self.prev_token.lexeme)
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.token.is_eof()
    }

    pub(crate) fn error_at_current(&self, message: impl Into<String>) {
        self.error_at(&self.token.clone(), message);
    }

    pub(crate) fn error_at_prev(&self, message: impl Into<String>) {
        self.error_at(&self.prev_token.clone(), message);
    }

    fn error_at(&self, token: &Token, message: impl Into<String>) {
        let diagnostic = if token.is_eof() {
            Diagnostic::at_end(token.span.line, message)
        } else {
            Diagnostic::at(token.span.line, token.lexeme.clone(), message)
        };
        self.handler.emit(diagnostic);
    }

    /// Panic-mode recovery: discard tokens until a statement boundary — a
    /// `;` just consumed, or a keyword that can start a new declaration.
    pub(crate) fn synchronize(&mut self) {
        while !self.at_eof() {
            if self.prev_token.kind == TokenKind::Semicolon {
                return;
            }
            if self.check_any(&[
                TokenKind::Class,
                TokenKind::Fun,
                TokenKind::Var,
                TokenKind::For,
                TokenKind::If,
                TokenKind::While,
                TokenKind::Return,
            ]) {
                return;
            }
            self.bump();
        }
    }
}
