use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use wisp_errors::Handler;
use wisp_interpreter::Interpreter;

/// Exit code for a source-level error (lex, parse, resolve, or runtime).
pub const EXIT_SOURCE_ERROR: i32 = 65;
/// Exit code for a usage error: malformed CLI invocation.
pub const EXIT_USAGE_ERROR: i32 = 64;
/// Exit code for a host I/O failure reading the script file itself (distinct
/// from an intrinsic's own `_read`/`_write`, which surface as `nil`).
pub const EXIT_IO_ERROR: i32 = 74;

/// Scans, parses, resolves, and interprets `source` against `interp`,
/// reporting through `handler`. Each stage's errors gate the next: a failed
/// scan or parse skips resolution; a failed resolution skips interpretation.
pub fn run_source(source: &str, handler: &Handler, interp: &mut Interpreter) {
    let statements = wisp_parser::parse(source, handler);
    if handler.had_error() {
        return;
    }
    let depths = wisp_resolver::resolve(&statements, handler);
    if handler.had_error() {
        return;
    }
    interp.set_depths(depths);
    interp.interpret(&statements);
}

/// Reads `path` as UTF-8 and runs it to completion, returning the process
/// exit code: `0` on success, [`EXIT_SOURCE_ERROR`] if any diagnostic was
/// reported, [`EXIT_IO_ERROR`] if the file itself couldn't be read.
pub fn run_file(path: &Path, handler: &Handler, script_args: Vec<String>) -> i32 {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "failed to read script");
            eprintln!("Could not read file \"{}\": {err}", path.display());
            return EXIT_IO_ERROR;
        }
    };

    let mut interp = Interpreter::new(handler, Default::default(), script_args);
    run_source(&source, handler, &mut interp);

    if handler.had_error() { EXIT_SOURCE_ERROR } else { 0 }
}

/// Reads lines from stdin one at a time, running each against a single
/// long-lived interpreter so top-level bindings persist across lines. The
/// error flag is cleared between lines so one mistake doesn't poison the
/// rest of the session.
pub fn run_prompt(handler: &Handler) -> i32 {
    let mut interp = Interpreter::new(handler, Default::default(), Vec::new());
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        line.clear();
        let bytes_read = match stdin.lock().read_line(&mut line) {
            Ok(n) => n,
            Err(err) => {
                tracing::error!(error = %err, "failed to read from stdin");
                break;
            }
        };
        if bytes_read == 0 {
            break;
        }

        run_source(&line, handler, &mut interp);
        handler.reset();
    }

    0
}
