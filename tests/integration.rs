//! End-to-end tests driving the whole scan → parse → resolve → interpret
//! pipeline through the CLI-facing entry points, rather than any one stage
//! in isolation.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use wisp_errors::Handler;

fn write_script(dir: &tempfile::TempDir, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).unwrap();
    path
}

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

#[test]
fn successful_script_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_script(&dir, "ok.wisp", "print 1 + 1;");
    let handler = Handler::new(false);
    let code = wisp_lang::run_file(&path, &handler, Vec::new());
    assert_eq!(code, 0);
    assert!(!handler.had_error());
}

#[test]
fn source_level_error_exits_sixty_five() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_script(&dir, "bad.wisp", "print 1/0;");
    let handler = Handler::new(false);
    let code = wisp_lang::run_file(&path, &handler, Vec::new());
    assert_eq!(code, wisp_lang::EXIT_SOURCE_ERROR);
    assert!(handler.had_error());
}

#[test]
fn parse_error_also_exits_sixty_five() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_script(&dir, "bad_syntax.wisp", "var = ;");
    let handler = Handler::new(false);
    let code = wisp_lang::run_file(&path, &handler, Vec::new());
    assert_eq!(code, wisp_lang::EXIT_SOURCE_ERROR);
}

#[test]
fn missing_file_exits_with_host_io_code() {
    let handler = Handler::new(false);
    let code = wisp_lang::run_file(
        std::path::Path::new("/nonexistent/definitely/not/here.wisp"),
        &handler,
        Vec::new(),
    );
    assert_eq!(code, wisp_lang::EXIT_IO_ERROR);
}

#[test]
fn diagnostic_matches_the_documented_format() {
    let handler = Handler::new(false);
    let stmts = wisp_parser::parse("print 1/0;", &handler);
    let depths = wisp_resolver::resolve(&stmts, &handler);
    let mut interp = wisp_interpreter::Interpreter::new(&handler, depths, Vec::new());
    interp.interpret(&stmts);

    let diagnostics = handler.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let rendered = diagnostics[0].to_string();
    assert!(rendered.starts_with("[line 1] Error"));
    assert!(rendered.contains("Cannot divide by zero."));
}

#[test]
fn script_arguments_reach_the_interpreted_program() {
    let handler = Handler::new(false);
    let source = "print _argc(0); print _argv(); print _argv(); print _argv();";
    let stmts = wisp_parser::parse(source, &handler);
    let depths = wisp_resolver::resolve(&stmts, &handler);
    let args = vec!["hello".to_string(), "world".to_string()];
    let buf = SharedBuf::default();
    let mut interp = wisp_interpreter::Interpreter::new(&handler, depths, args)
        .with_output(Box::new(buf.clone()));
    interp.interpret(&stmts);

    assert!(!handler.had_error());
    let printed = String::from_utf8(buf.0.borrow().clone()).unwrap();
    assert_eq!(printed, "2\nhello\nworld\nnil\n");
}

#[test]
fn class_declaration_and_method_call_runs_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_script(
        &dir,
        "class.wisp",
        "class Greeter { greet(name) { print \"hi \" + name; } }\nGreeter().greet(\"world\");",
    );
    let handler = Handler::new(false);
    let code = wisp_lang::run_file(&path, &handler, Vec::new());
    assert_eq!(code, 0);
}
