use std::fs;
use std::io::{self, BufWriter, Read, Write};

use clap::Args;
use tracing::debug;

use crate::cli_util::print_run_error;
use crate::compiler::Compiler;
use crate::config::{Config, Overrides};
use crate::interpreter::{EofPolicy, Interpreter};
use crate::tape::Tape;

#[derive(Args, Debug, Default)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Print one opcode byte per compiled instruction instead of executing
    #[arg(short = 'c', long = "dump")]
    pub dump: bool,

    /// Print a human-readable bytecode listing instead of executing
    #[arg(short = 'l', long = "listing", conflicts_with = "dump")]
    pub listing: bool,

    /// Compile one instruction per source character (no fusion)
    #[arg(long = "no-fuse")]
    pub no_fuse: bool,

    /// Value stored by `,` at end of input: sentinel (255), zero, unchanged (fallback BF_EOF)
    #[arg(long = "eof", value_name = "POLICY")]
    pub eof: Option<EofPolicy>,

    /// Tape cells on each side of the origin (fallback BF_TAPE_CAPACITY; default 20_000)
    #[arg(long = "capacity", value_name = "CELLS")]
    pub capacity: Option<usize>,

    /// Maximum instructions before abort (fallback BF_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<u64>,

    /// Source file; the program is read from stdin when omitted
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

impl RunArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            dump: self.dump,
            listing: self.listing,
            no_fuse: self.no_fuse,
            eof: self.eof,
            tape_capacity: self.capacity,
            max_steps: self.max_steps,
        }
    }
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let config = Config::load(&args.overrides());

    let source = match read_source(args.file.as_deref()) {
        Ok(bytes) => bytes,
        Err(e) => {
            let origin = args.file.as_deref().unwrap_or("stdin");
            eprintln!("{program}: failed to read program from {origin}: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    execute(program, &config, &source)
}

/// Compile `source` and either dump it or run it against stdin/stdout.
pub fn execute(program: &str, config: &Config, source: &[u8]) -> i32 {
    let code = Compiler::new().fuse(config.fuse).compile(source);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if config.dump || config.listing {
        let written = if config.dump {
            code.dump(&mut out)
        } else {
            code.write_listing(&mut out)
        };
        return match written.and_then(|_| out.flush()) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{program}: failed to write bytecode: {e}");
                1
            }
        };
    }

    let mut tape = match Tape::try_with_capacity(config.tape_capacity) {
        Ok(tape) => tape,
        Err(e) => {
            eprintln!("{program}: {e}");
            return 1;
        }
    };
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let result = Interpreter::new(&code)
        .eof(config.eof)
        .max_steps(config.max_steps)
        .run(&mut tape, &mut input, &mut out);
    let flushed = out.flush();

    match result {
        Ok(stats) => {
            debug!(steps = stats.steps, "run complete");
            if let Err(e) = flushed {
                eprintln!("{program}: failed to flush output: {e}");
                return 1;
            }
            0
        }
        Err(err) => {
            print_run_error(program, &code, &err);
            1
        }
    }
}

fn read_source(path: Option<&str>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path),
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} [OPTIONS] [FILE]    # Compile and run a Brainfuck program (stdin when FILE is omitted)

Options:
  --dump,     -c        Print one opcode byte per compiled instruction instead of executing
  --listing,  -l        Print a readable bytecode listing instead of executing
  --no-fuse             Disable run and loop-idiom fusion
  --eof <POLICY>        What `,` stores at end of input: sentinel (255, default), zero, unchanged
  --capacity <CELLS>    Tape cells on each side of the origin (default 20000)
  --max-steps <N>       Abort after N executed instructions
  --help,     -h        Show this help

Environment:
  BF_EOF, BF_TAPE_CAPACITY, BF_MAX_STEPS   Fallbacks for the flags above
  RUST_LOG                                 Log filter for diagnostics on stderr (default: warn)

Config file:
  $XDG_CONFIG_HOME/bf.toml, section [run]: eof, tape_capacity, max_steps, fuse

Notes:
- Characters outside of ><+-.,[] are comments.
- An unmatched ']' is ignored; an unmatched '[' jumps to the end of the program.
- Moving the pointer off either end of the tape aborts with exit status 1.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
