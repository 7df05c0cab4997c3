//! A pattern-fusing Brainfuck compiler and bytecode interpreter.
//!
//! Source text goes through two stages:
//!
//! 1. [`compiler`] scans the source once and lowers it to a [`Program`] of
//!    superinstructions. Runs such as `+++` or `>>>` become a single
//!    instruction, and common loop idioms (`[-]`, `[>]`, `[->+<]`, ...) become
//!    constant-time operations.
//! 2. [`interpreter`] dispatches that bytecode against a bounded [`Tape`].
//!
//! Features and behaviors:
//! - The tape holds 20,000 cells on each side of the starting cell. Moving
//!   past either end aborts the run with a [`TapeError`].
//! - Cells are bytes; arithmetic wraps.
//! - `,` on end of input stores 255 by default (see [`EofPolicy`]).
//! - Characters outside `><+-.,[]` are comments. An unmatched `]` is ignored
//!   and an unmatched `[` jumps to the end of the program.
//!
//! Quick start:
//!
//! ```
//! use fused_bf::{compile, execute};
//!
//! let code = compile(b"++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.");
//! let mut out = Vec::new();
//! execute(&code, &mut std::io::empty(), &mut out).expect("program should run");
//! assert_eq!(out, b"Hello");
//! ```

pub mod bytecode;
pub mod cli_util;
pub mod commands;
pub mod compiler;
pub mod config;
pub mod interpreter;
pub mod tape;

pub use bytecode::{Instruction, OpCode, Program};
pub use compiler::{Compiler, compile};
pub use config::Config;
pub use interpreter::{EofPolicy, Interpreter, RunError, RunStats, execute};
pub use tape::{Tape, TapeError};
