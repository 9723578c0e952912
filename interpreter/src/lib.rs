//! Tree-walking evaluator for the Wisp scripting language.
//!
//! Consults the resolver's depth side-table for every variable, `this`, and
//! `super` reference rather than re-deriving scope at evaluation time; see
//! [`wisp_resolver`].

mod class;
mod environment;
mod function;
mod host;
mod interpreter;
mod native;
mod value;

pub use interpreter::Interpreter;
pub use value::{Callable, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wisp_errors::Handler;

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl std::io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn run(source: &str) -> (String, bool) {
        let handler = Handler::new(false);
        let stmts = wisp_parser::parse(source, &handler);
        let depths = wisp_resolver::resolve(&stmts, &handler);
        let buf = SharedBuf::default();
        let mut interp = Interpreter::new(&handler, depths, Vec::new()).with_output(Box::new(buf.clone()));
        interp.interpret(&stmts);
        let out = String::from_utf8(buf.0.borrow().clone()).unwrap();
        (out, handler.had_error())
    }

    #[test]
    fn arithmetic_and_precedence() {
        let (out, had_error) = run("print -1 + 2 * 3;");
        assert!(!had_error);
        assert_eq!(out, "5\n");
    }

    #[test]
    fn closure_capture() {
        let (out, had_error) = run(
            "fun makeCounter(){var i=0; fun c(){i=i+1; return i;} return c;}\n\
             var c = makeCounter(); print c(); print c();",
        );
        assert!(!had_error);
        assert_eq!(out, "1\n2\n");
    }

    #[test]
    fn resolver_depth_stability_across_shadowing() {
        let (out, had_error) = run(
            "var a = \"global\";\n\
             { fun show(){ print a; } show(); var a = \"local\"; show(); }",
        );
        assert!(!had_error);
        assert_eq!(out, "global\nglobal\n");
    }

    #[test]
    fn inheritance_and_super() {
        let (out, had_error) = run(
            "class A { greet(){print \"A\";} }\n\
             class B < A { greet(){super.greet(); print \"B\";} }\n\
             B().greet();",
        );
        assert!(!had_error);
        assert_eq!(out, "A\nB\n");
    }

    #[test]
    fn initializer_always_returns_the_instance() {
        let (out, had_error) = run("class C { init(){ this.x = 1; return; } }\nvar o = C(); print o.x;");
        assert!(!had_error);
        assert_eq!(out, "1\n");
    }

    #[test]
    fn division_by_zero_reports_and_stops() {
        let (out, had_error) = run("print 1/0;");
        assert!(had_error);
        assert_eq!(out, "");
    }

    #[test]
    fn string_concatenation_with_plus() {
        let (out, _) = run(r#"print "a" + "b";"#);
        assert_eq!(out, "ab\n");
    }

    #[test]
    fn equality_across_variants_is_false() {
        let (out, had_error) = run("print nil == false;");
        assert!(!had_error);
        assert_eq!(out, "false\n");
    }

    #[test]
    fn undefined_variable_is_a_runtime_error() {
        let (_, had_error) = run("print undefined_name;");
        assert!(had_error);
    }

    #[test]
    fn and_or_short_circuit_and_return_operand_values() {
        let (out, _) = run(r#"print "hi" or 2; print nil and "unused"; print false or "fallback";"#);
        assert_eq!(out, "hi\nnil\nfallback\n");
    }

    #[test]
    fn for_loop_desugars_and_runs() {
        let (out, had_error) = run("for (var i = 0; i < 3; i = i + 1) print i;");
        assert!(!had_error);
        assert_eq!(out, "0\n1\n2\n");
    }

    #[test]
    fn runtime_program_same_input_same_output() {
        let source = "fun fib(n){ if (n < 2) return n; return fib(n-1)+fib(n-2); } print fib(10);";
        let (first, _) = run(source);
        let (second, _) = run(source);
        assert_eq!(first, second);
        assert_eq!(first, "55\n");
    }
}
