//! Scanner and recursive-descent parser for the Wisp scripting language.

mod parser;
mod tokenizer;

pub use parser::ParserContext;
pub use tokenizer::{keyword, Scanner, Token, TokenKind};

use wisp_ast::Stmt;
use wisp_errors::Handler;

/// Scans `source` and parses it to a (possibly partial, on error) list of
/// statements. Diagnostics are reported through `handler`; callers should
/// check [`Handler::had_error`] before handing the result to the resolver.
pub fn parse(source: &str, handler: &Handler) -> Vec<Stmt> {
    let tokens = Scanner::new(source, handler).scan_tokens();
    let mut ctx = ParserContext::new(handler, tokens);
    ctx.parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisp_ast::Stmt;

    fn parse_ok(source: &str) -> (Vec<Stmt>, bool) {
        let handler = Handler::new(false);
        let stmts = parse(source, &handler);
        (stmts, handler.had_error())
    }

    #[test]
    fn parses_print_statement() {
        let (stmts, had_error) = parse_ok("print 1 + 2;");
        assert!(!had_error);
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0], Stmt::Print { .. }));
    }

    #[test]
    fn invalid_assignment_target_reports_but_recovers() {
        let (stmts, had_error) = parse_ok("1 = 2; print 3;");
        assert!(had_error);
        // The offending statement is still produced; parsing continues past it.
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn missing_semicolon_synchronizes_at_next_statement() {
        let (stmts, had_error) = parse_ok("var a = 1 var b = 2;");
        assert!(had_error);
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0], Stmt::Var { .. }));
    }

    #[test]
    fn for_loop_desugars_to_block_with_while() {
        let (stmts, had_error) = parse_ok("for (var i = 0; i < 3; i = i + 1) print i;");
        assert!(!had_error);
        assert_eq!(stmts.len(), 1);
        match &stmts[0] {
            Stmt::Block { statements } => {
                assert_eq!(statements.len(), 2);
                assert!(matches!(statements[0], Stmt::Var { .. }));
                assert!(matches!(statements[1], Stmt::While { .. }));
            }
            other => panic!("expected desugared block, got {other:?}"),
        }
    }

    #[test]
    fn class_with_superclass_parses_methods() {
        let (stmts, had_error) =
            parse_ok("class A { greet() { print \"hi\"; } } class B < A { greet() { super.greet(); } }");
        assert!(!had_error);
        assert_eq!(stmts.len(), 2);
        match &stmts[1] {
            Stmt::Class { superclass, methods, .. } => {
                assert!(superclass.is_some());
                assert_eq!(methods.len(), 1);
            }
            other => panic!("expected class, got {other:?}"),
        }
    }

    #[test]
    fn argument_limit_reports_diagnostic_but_keeps_parsing() {
        let args = (0..256).map(|n| n.to_string()).collect::<Vec<_>>().join(",");
        let source = format!("f({args});");
        let (_, had_error) = parse_ok(&source);
        assert!(had_error);
    }
}
