//! Single-pass, pattern-fusing compiler from source bytes to [`Program`].
//!
//! The scan walks the source once, left to right, with a small fixed
//! lookahead at each `[` to recognise loop idioms:
//!
//! | source            | bytecode              |
//! |-------------------|-----------------------|
//! | `+-` runs         | `ADD_VAL n`           |
//! | `><` runs         | `MOVE_POS n`          |
//! | `[-]` / `[+]` + run | `SET_VALUE n`       |
//! | `[-]` / `[+]`     | `SET_ZERO`            |
//! | `[>]` / `[<]`     | `SCAN_RIGHT` / `SCAN_LEFT` |
//! | `[->+<]`          | `ADD_TO_NEXT`         |
//! | `[->` run `<]`    | `MULTIPLY_MOVE n`     |
//!
//! Compilation never fails. Bytes outside `><+-.,[]` are comments, a `]`
//! without an open loop is dropped, and a `[` that is never closed jumps to
//! the end of the program.

use tracing::{debug, warn};

use crate::bytecode::{Instruction, OpCode, Program};

/// Compile `source` with idiom fusion enabled.
pub fn compile(source: &[u8]) -> Program {
    Compiler::new().compile(source)
}

/// Compiler settings.
#[derive(Debug, Clone, Copy)]
pub struct Compiler {
    fuse: bool,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self { fuse: true }
    }

    /// Enable or disable run and idiom fusion. With fusion off every source
    /// instruction becomes exactly one bytecode instruction.
    pub fn fuse(mut self, fuse: bool) -> Self {
        self.fuse = fuse;
        self
    }

    pub fn compile(&self, source: &[u8]) -> Program {
        let mut emitter = Emitter::default();
        let mut pos = 0;

        while pos < source.len() {
            pos = if self.fuse {
                emitter.lower_fused(source, pos)
            } else {
                emitter.lower_plain(source, pos)
            };
        }

        let program = emitter.finish();
        debug!(
            source_bytes = source.len(),
            instructions = program.len(),
            fused = self.fuse,
            "compiled program"
        );
        program
    }
}

/// Transient compile state: the code being built and the open-loop stack.
#[derive(Default)]
struct Emitter {
    code: Vec<Instruction>,
    loop_stack: Vec<usize>,
    dropped_closes: usize,
}

impl Emitter {
    /// Lower the construct starting at `pos`, returning the next position.
    fn lower_fused(&mut self, source: &[u8], pos: usize) -> usize {
        match source[pos] {
            b'+' | b'-' => {
                let (sum, end) = net_run(source, pos, b'+', b'-');
                self.code.push(Instruction::with_value(OpCode::AddVal, sum));
                end
            }
            b'>' | b'<' => {
                let (sum, end) = net_run(source, pos, b'>', b'<');
                self.code.push(Instruction::with_value(OpCode::MovePos, sum));
                end
            }
            b'.' => {
                self.code.push(Instruction::new(OpCode::Output));
                pos + 1
            }
            b',' => {
                self.code.push(Instruction::new(OpCode::Input));
                pos + 1
            }
            b'[' => match match_idiom(source, pos) {
                Some((instr, end)) => {
                    self.code.push(instr);
                    end
                }
                None => {
                    self.open_loop();
                    pos + 1
                }
            },
            b']' => {
                self.close_loop();
                pos + 1
            }
            _ => pos + 1,
        }
    }

    /// One instruction per source byte; the reference lowering.
    fn lower_plain(&mut self, source: &[u8], pos: usize) -> usize {
        match source[pos] {
            b'+' => self.code.push(Instruction::with_value(OpCode::AddVal, 1)),
            b'-' => self.code.push(Instruction::with_value(OpCode::AddVal, -1)),
            b'>' => self.code.push(Instruction::with_value(OpCode::MovePos, 1)),
            b'<' => self.code.push(Instruction::with_value(OpCode::MovePos, -1)),
            b'.' => self.code.push(Instruction::new(OpCode::Output)),
            b',' => self.code.push(Instruction::new(OpCode::Input)),
            b'[' => self.open_loop(),
            b']' => self.close_loop(),
            _ => {}
        }
        pos + 1
    }

    fn open_loop(&mut self) {
        self.loop_stack.push(self.code.len());
        self.code.push(Instruction::jump(OpCode::JumpFwd, 0));
    }

    fn close_loop(&mut self) {
        let Some(open) = self.loop_stack.pop() else {
            self.dropped_closes += 1;
            return;
        };
        self.code[open].jump_ref = self.code.len();
        self.code.push(Instruction::jump(OpCode::JumpBack, open));
    }

    fn finish(mut self) -> Program {
        if self.dropped_closes > 0 {
            warn!(count = self.dropped_closes, "ignoring unmatched ']'");
        }
        if !self.loop_stack.is_empty() {
            warn!(
                count = self.loop_stack.len(),
                "unmatched '[' will jump to program end"
            );
            let end = self.code.len();
            for open in self.loop_stack.drain(..) {
                self.code[open].jump_ref = end;
            }
        }
        Program::from_instructions(self.code)
    }
}

/// Sum a contiguous run of `up`/`down` bytes starting at `pos`.
///
/// Returns the net count (`up` minus `down`) and the index just past the run.
fn net_run(source: &[u8], pos: usize, up: u8, down: u8) -> (i64, usize) {
    let mut sum: i64 = 0;
    let mut end = pos;
    while let Some(&byte) = source.get(end) {
        if byte == up {
            sum = sum.saturating_add(1);
        } else if byte == down {
            sum = sum.saturating_sub(1);
        } else {
            break;
        }
        end += 1;
    }
    (sum, end)
}

/// Try each loop idiom at the `[` found at `pos`, in precedence order.
fn match_idiom(source: &[u8], pos: usize) -> Option<(Instruction, usize)> {
    let rest = &source[pos..];

    if rest.starts_with(b"[-]") || rest.starts_with(b"[+]") {
        let (sum, end) = net_run(source, pos + 3, b'+', b'-');
        let instr = if sum != 0 {
            Instruction::with_value(OpCode::SetValue, sum)
        } else {
            Instruction::new(OpCode::SetZero)
        };
        return Some((instr, end));
    }

    if rest.starts_with(b"[>]") {
        return Some((Instruction::new(OpCode::ScanRight), pos + 3));
    }
    if rest.starts_with(b"[<]") {
        return Some((Instruction::new(OpCode::ScanLeft), pos + 3));
    }

    if rest.starts_with(b"[->+<]") {
        return Some((Instruction::new(OpCode::AddToNext), pos + 6));
    }

    if rest.starts_with(b"[->") {
        let body = pos + 3;
        let (factor, end) = net_run(source, body, b'+', b'-');
        if end > body && source[end..].starts_with(b"<]") {
            return Some((
                Instruction::with_value(OpCode::MultiplyMove, factor),
                end + 2,
            ));
        }
    }

    None
}
