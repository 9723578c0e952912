use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use wisp_errors::Handler;
use wisp_lang::{run_file, run_prompt, EXIT_USAGE_ERROR};

/// A tree-walking interpreter for the Wisp scripting language.
#[derive(Parser, Debug)]
#[command(name = "wisp", version, about)]
struct Args {
    /// Script to run. Omit to start an interactive prompt.
    path: Option<PathBuf>,

    /// Arguments passed through to the running script (`_argc`/`_argv`).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    script_args: Vec<String>,

    /// Raise the default log level from `warn` to `debug`.
    #[arg(short, long)]
    verbose: bool,

    /// Send diagnostics to stderr instead of stdout.
    #[arg(long)]
    diagnostics_to_stderr: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(EXIT_USAGE_ERROR as u8);
        }
    };

    wisp_lang::logging::init(args.verbose);

    let handler = Handler::new(args.diagnostics_to_stderr);
    let code = match args.path {
        Some(path) => run_file(&path, &handler, args.script_args),
        None => run_prompt(&handler),
    };

    ExitCode::from(code as u8)
}
