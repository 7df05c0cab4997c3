//! Bytecode dispatcher.
//!
//! Executes a [`Program`] against a [`Tape`] and a pair of byte streams. Each
//! step selects its handler with a single `match` on the opcode, which rustc
//! lowers to a jump table.

use std::fmt;
use std::io::{self, ErrorKind, Read, Write};
use std::str::FromStr;

use tracing::debug;

use crate::bytecode::{OpCode, Program};
use crate::tape::{Tape, TapeError};

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The cursor left the tape.
    #[error("{source} (instruction {pc})")]
    Tape {
        pc: usize,
        #[source]
        source: TapeError,
    },

    /// The input or output stream failed. End of input is not an error.
    #[error("I/O error at instruction {pc}: {source}")]
    Io {
        pc: usize,
        #[source]
        source: io::Error,
    },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: u64 },
}

impl RunError {
    /// Instruction index the run stopped at, when there is one.
    pub fn pc(&self) -> Option<usize> {
        match self {
            RunError::Tape { pc, .. } | RunError::Io { pc, .. } => Some(*pc),
            RunError::StepLimitExceeded { .. } => None,
        }
    }
}

/// What `,` stores when the input stream is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofPolicy {
    /// Store the C `EOF` value (-1) truncated to a byte: 255.
    #[default]
    Sentinel,
    /// Store 0.
    Zero,
    /// Leave the cell as it was.
    Unchanged,
}

impl EofPolicy {
    const SENTINEL: i64 = -1;
}

impl FromStr for EofPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentinel" | "eof" | "-1" | "255" => Ok(EofPolicy::Sentinel),
            "zero" | "0" => Ok(EofPolicy::Zero),
            "unchanged" | "keep" => Ok(EofPolicy::Unchanged),
            other => Err(format!(
                "unknown EOF policy '{other}' (expected sentinel, zero or unchanged)"
            )),
        }
    }
}

impl fmt::Display for EofPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EofPolicy::Sentinel => "sentinel",
            EofPolicy::Zero => "zero",
            EofPolicy::Unchanged => "unchanged",
        })
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Instructions executed.
    pub steps: u64,
}

/// Executes a compiled program. Borrowing the program keeps it shareable
/// across any number of runs.
#[derive(Debug, Clone, Copy)]
pub struct Interpreter<'p> {
    program: &'p Program,
    eof: EofPolicy,
    max_steps: Option<u64>,
}

impl<'p> Interpreter<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            eof: EofPolicy::default(),
            max_steps: None,
        }
    }

    pub fn eof(mut self, eof: EofPolicy) -> Self {
        self.eof = eof;
        self
    }

    /// Abort with [`RunError::StepLimitExceeded`] instead of executing more
    /// than `limit` instructions.
    pub fn max_steps(mut self, limit: Option<u64>) -> Self {
        self.max_steps = limit;
        self
    }

    /// Run to completion on `tape`.
    ///
    /// Output is written byte by byte; buffering and flushing are the
    /// caller's business.
    pub fn run<R, W>(&self, tape: &mut Tape, input: &mut R, output: &mut W) -> Result<RunStats, RunError>
    where
        R: Read,
        W: Write,
    {
        let limit = self.max_steps.unwrap_or(u64::MAX);
        let mut pc = 0usize;
        let mut steps = 0u64;

        while let Some(instr) = self.program.get(pc) {
            if steps >= limit {
                return Err(RunError::StepLimitExceeded { limit });
            }
            let on_tape = move |source: TapeError| RunError::Tape { pc, source };

            match instr.op {
                OpCode::Output => {
                    output
                        .write_all(&[tape.get()])
                        .map_err(|source| RunError::Io { pc, source })?;
                }
                OpCode::Input => match read_byte(input).map_err(|source| RunError::Io { pc, source })? {
                    Some(byte) => tape.set(i64::from(byte)),
                    None => match self.eof {
                        EofPolicy::Sentinel => tape.set(EofPolicy::SENTINEL),
                        EofPolicy::Zero => tape.set(0),
                        EofPolicy::Unchanged => {}
                    },
                },
                OpCode::JumpFwd => {
                    if tape.get() == 0 {
                        pc = instr.jump_ref;
                    }
                }
                OpCode::JumpBack => {
                    if tape.get() != 0 {
                        pc = instr.jump_ref;
                    }
                }
                OpCode::SetZero => tape.set(0),
                OpCode::SetValue => tape.set(instr.value & 0xFF),
                OpCode::AddVal => tape.add(instr.value),
                OpCode::MovePos => {
                    let distance = usize::try_from(instr.value.unsigned_abs()).unwrap_or(usize::MAX);
                    if instr.value >= 0 {
                        tape.move_right(distance).map_err(on_tape)?;
                    } else {
                        tape.move_left(distance).map_err(on_tape)?;
                    }
                }
                OpCode::AddToNext => transfer(tape, 1).map_err(on_tape)?,
                OpCode::MultiplyMove => transfer(tape, instr.value).map_err(on_tape)?,
                OpCode::ScanRight => {
                    while tape.get() != 0 {
                        tape.move_right(1).map_err(on_tape)?;
                    }
                }
                OpCode::ScanLeft => {
                    while tape.get() != 0 {
                        tape.move_left(1).map_err(on_tape)?;
                    }
                }
            }

            steps += 1;
            pc += 1;
        }

        debug!(steps, position = tape.position(), "program halted");
        Ok(RunStats { steps })
    }
}

/// Move `factor` times the current cell into its right neighbour and clear it.
///
/// A zero cell is left alone: the source loop would never have entered its
/// body, so no cursor movement (and no bound check) may happen.
fn transfer(tape: &mut Tape, factor: i64) -> Result<(), TapeError> {
    let v = tape.get();
    if v == 0 {
        return Ok(());
    }
    tape.set(0);
    tape.move_right(1)?;
    tape.add(i64::from(v).wrapping_mul(factor));
    tape.move_left(1)
}

/// Read a single byte, retrying on interruption. `None` means end of input.
fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Run `program` on a fresh default tape.
pub fn execute<R: Read, W: Write>(program: &Program, input: &mut R, output: &mut W) -> Result<RunStats, RunError> {
    let mut tape = Tape::new();
    Interpreter::new(program).run(&mut tape, input, output)
}
