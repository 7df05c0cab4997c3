use std::io::{self, Write};

use tracing_subscriber::{EnvFilter, fmt};

use crate::bytecode::Program;
use crate::interpreter::RunError;

/// Install a stderr logger. `RUST_LOG` overrides the default `warn` filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // try_init: tests may call this more than once per process.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Print a runtime error prefixed with the program name, followed by the
/// bytecode around the failing instruction when there is one.
pub fn print_run_error(program: &str, code: &Program, err: &RunError) {
    let msg = format!("{program}: Runtime error: {err}");
    match err.pc() {
        Some(pc) => print_error_with_context(&msg, code, pc),
        None => {
            eprintln!("{msg}");
            let _ = io::stderr().flush();
        }
    }
}

/// Print a concise error and a short disassembly window around `pc`, with a
/// marker on the failing instruction.
pub fn print_error_with_context(prefix: &str, code: &Program, pc: usize) {
    eprintln!("{prefix}");

    const WINDOW: usize = 3;

    let start = pc.saturating_sub(WINDOW);
    let end = (pc + WINDOW + 1).min(code.len());
    let width = end.saturating_sub(1).to_string().len();

    for index in start..end {
        let marker = if index == pc { '>' } else { ' ' };
        eprintln!("  {marker} {index:>width$}  {}", code[index]);
    }
    let _ = io::stderr().flush();
}
