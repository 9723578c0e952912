use crate::tokenizer::token::{keyword, Token, TokenKind};
use wisp_errors::{Diagnostic, Handler};
use wisp_span::{Span, Symbol};

/// Turns source text into a finite token sequence terminated by [`TokenKind::Eof`].
///
/// Operates on the source as a `Vec<char>` rather than a byte slice so that
/// `current`/`start` index by scalar value, never splitting a multi-byte
/// UTF-8 sequence.
pub struct Scanner<'h> {
    source: Vec<char>,
    start: usize,
    current: usize,
    line: u32,
    tokens: Vec<Token>,
    handler: &'h Handler,
}

impl<'h> Scanner<'h> {
    pub fn new(source: &str, handler: &'h Handler) -> Self {
        Self { source: source.chars().collect(), start: 0, current: 0, line: 1, tokens: Vec::new(), handler }
    }

    pub fn scan_tokens(mut self) -> Vec<Token> {
        while !self.at_end() {
            self.start = self.current;
            self.scan_token();
        }
        self.tokens.push(Token::new(TokenKind::Eof, "", Span::new(self.line)));
        self.tokens
    }

    fn at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.at_end() || self.source[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn push(&mut self, kind: TokenKind) {
        let lexeme = self.lexeme();
        self.tokens.push(Token::new(kind, lexeme, Span::new(self.line)));
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '(' => self.push(TokenKind::LeftParen),
            ')' => self.push(TokenKind::RightParen),
            '{' => self.push(TokenKind::LeftBrace),
            '}' => self.push(TokenKind::RightBrace),
            ',' => self.push(TokenKind::Comma),
            '.' => self.push(TokenKind::Dot),
            '-' => self.push(TokenKind::Minus),
            '+' => self.push(TokenKind::Plus),
            ';' => self.push(TokenKind::Semicolon),
            '*' => self.push(TokenKind::Star),
            '!' => {
                let kind = if self.matches('=') { TokenKind::BangEqual } else { TokenKind::Bang };
                self.push(kind);
            }
            '=' => {
                let kind = if self.matches('=') { TokenKind::EqualEqual } else { TokenKind::Equal };
                self.push(kind);
            }
            '<' => {
                let kind = if self.matches('=') { TokenKind::LessEqual } else { TokenKind::Less };
                self.push(kind);
            }
            '>' => {
                let kind = if self.matches('=') { TokenKind::GreaterEqual } else { TokenKind::Greater };
                self.push(kind);
            }
            '/' => {
                if self.matches('/') {
                    while self.peek() != '\n' && !self.at_end() {
                        self.advance();
                    }
                } else {
                    self.push(TokenKind::Slash);
                }
            }
            ' ' | '\t' | '\r' => {}
            '\n' => self.line += 1,
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if is_ident_start(c) => self.identifier(),
            _ => {
                self.handler.emit(Diagnostic::scan(self.line, "Unexpected character."));
            }
        }
    }

    fn string(&mut self) {
        while self.peek() != '"' && !self.at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }
        if self.at_end() {
            self.handler.emit(Diagnostic::scan(self.line, "Unterminated string."));
            return;
        }
        // The closing quote.
        self.advance();
        let value: String = self.source[self.start + 1..self.current - 1].iter().collect();
        self.push(TokenKind::String(value));
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        let text = self.lexeme();
        let value: f64 = text.parse().expect("scanned digits always parse as f64");
        self.push(TokenKind::Number(value));
    }

    fn identifier(&mut self) {
        while is_ident_continue(self.peek()) {
            self.advance();
        }
        let text = self.lexeme();
        let kind = keyword(&text).unwrap_or_else(|| TokenKind::Identifier(Symbol::intern(&text)));
        self.push(kind);
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> (Vec<TokenKind>, bool) {
        let handler = Handler::new(false);
        let tokens = Scanner::new(source, &handler).scan_tokens();
        (tokens.into_iter().map(|t| t.kind).collect(), handler.had_error())
    }

    #[test]
    fn ends_with_single_eof() {
        let (kinds, _) = scan("var x = 1;");
        assert_eq!(kinds.last(), Some(&TokenKind::Eof));
        assert_eq!(kinds.iter().filter(|k| matches!(k, TokenKind::Eof)).count(), 1);
    }

    #[test]
    fn prefers_longer_operator_match() {
        let (kinds, _) = scan("!= = == <=");
        assert_eq!(
            kinds,
            vec![
                TokenKind::BangEqual,
                TokenKind::Equal,
                TokenKind::EqualEqual,
                TokenKind::LessEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_not_identifiers() {
        let (kinds, _) = scan("class this super");
        assert_eq!(kinds, vec![TokenKind::Class, TokenKind::This, TokenKind::Super, TokenKind::Eof]);
    }

    #[test]
    fn unterminated_string_reports_and_produces_no_token() {
        let (kinds, had_error) = scan("\"abc");
        assert!(had_error);
        assert_eq!(kinds, vec![TokenKind::Eof]);
    }

    #[test]
    fn unexpected_character_is_skipped_with_diagnostic() {
        let (kinds, had_error) = scan("@ 1");
        assert!(had_error);
        assert_eq!(kinds, vec![TokenKind::Number(1.0), TokenKind::Eof]);
    }

    #[test]
    fn numbers_do_not_accept_scientific_notation() {
        let (kinds, _) = scan("1e3");
        // `1` is a number, `e3` is scanned as a separate identifier.
        assert_eq!(kinds[0], TokenKind::Number(1.0));
        assert!(matches!(kinds[1], TokenKind::Identifier(_)));
    }
}
