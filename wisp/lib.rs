//! Library entry points for the Wisp scripting language's CLI.
//!
//! The pipeline itself — scan, parse, resolve, interpret — lives in
//! [`wisp_parser`], [`wisp_resolver`], and [`wisp_interpreter`]; this crate
//! only wires those stages to a file or a prompt loop and to the process
//! environment (argv, exit codes, logging).

pub mod logging;
pub mod run;

pub use run::{run_file, run_prompt, run_source, EXIT_IO_ERROR, EXIT_SOURCE_ERROR, EXIT_USAGE_ERROR};
