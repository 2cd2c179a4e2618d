//! The execution engine: a fetch-decode-execute loop over a loaded
//! [`Program`], driving the operand stack and variable store.

pub mod error;
pub mod opcode;
pub mod stack;
pub mod varmap;

use std::io::{BufRead, Write};

use crate::stax_asm::program::{Instruction, Program};
use error::{Fault, RuntimeError, RuntimeResult};
use opcode::Opcode;
use stack::Stack;
use varmap::VarMap;

/// Control-flow result of one executed instruction.
///
/// Replaces the overloaded integer convention of a relative advance,
/// an absolute target, and a `-1` halt sentinel with an explicit tagged
/// result the loop can match on totally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Advance the program counter to the next instruction.
    Advance,
    /// Redirect the program counter to an absolute address.
    Jump(usize),
    /// Stop execution immediately, with no further counter mutation.
    Halt,
}

/// One execution instance: program counter, operand stack and variable
/// store, scoped to a single program run.
///
/// Generic over its input and output so that READ and PRINT are driven by
/// the caller: the CLI shell passes locked stdin/stdout, tests pass byte
/// slices and buffers. Two instances share nothing; running the same
/// program twice requires two of them (or a [`reset`](StaxVM::reset)).
pub struct StaxVM<'run, R, W> {
    program: &'run Program,
    stack: Stack,
    vars: VarMap,
    pc: usize,
    input: R,
    output: W,
}

impl<'run, R: BufRead, W: Write> StaxVM<'run, R, W> {
    pub fn new(program: &'run Program, input: R, output: W) -> Self {
        StaxVM {
            program,
            stack: Stack::new(),
            vars: VarMap::new(),
            pc: 0,
            input,
            output,
        }
    }

    /// Clears all machine state so the same instance can run the program
    /// again from address 0.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.vars.clear();
        self.pc = 0;
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// The fetch-decode-execute loop.
    ///
    /// Terminates normally when the program counter runs off the end of
    /// the program (the implicit halt) or an instruction yields
    /// [`Flow::Halt`]. Any handler error is caught here and wrapped into a
    /// [`Fault`] naming the current address and mnemonic; there is no
    /// instruction-level recovery.
    pub fn run(&mut self) -> Result<(), Fault> {
        let program = self.program;
        while self.pc < program.len() {
            let instr = &program[self.pc];
            match self.execute_instruction(instr) {
                Ok(Flow::Advance) => self.pc += 1,
                Ok(Flow::Jump(target)) => self.pc = target,
                Ok(Flow::Halt) => return Ok(()),
                Err(cause) => {
                    return Err(Fault {
                        address: self.pc,
                        opcode: instr.mnemonic.clone(),
                        cause,
                        span: instr.span.into(),
                    });
                }
            }
        }
        Ok(())
    }

    fn execute_instruction(&mut self, instr: &Instruction) -> RuntimeResult<Flow> {
        let opcode: Opcode = instr
            .mnemonic
            .parse()
            .map_err(|()| RuntimeError::UnknownOpcode(instr.mnemonic.clone()))?;
        self.check_arity(opcode, instr)?;
        match opcode {
            Opcode::Push => {
                let val = int_operand(&instr.operands[0])?;
                self.stack.push(val);
                Ok(Flow::Advance)
            }
            Opcode::Pop => {
                self.stack.pop()?;
                Ok(Flow::Advance)
            }
            Opcode::Add => self.binary_op(|a, b| Ok(a.wrapping_add(b))),
            Opcode::Sub => self.binary_op(|a, b| Ok(a.wrapping_sub(b))),
            Opcode::Mul => self.binary_op(|a, b| Ok(a.wrapping_mul(b))),
            Opcode::Div => self.binary_op(|a, b| {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                Ok(floor_div(a, b))
            }),
            Opcode::Mod => self.binary_op(|a, b| {
                if b == 0 {
                    return Err(RuntimeError::ModuloByZero);
                }
                Ok(floor_mod(a, b))
            }),
            Opcode::Neg => {
                let a = self.stack.pop()?;
                self.stack.push(a.wrapping_neg());
                Ok(Flow::Advance)
            }
            Opcode::Eq => self.binary_op(|a, b| Ok((a == b) as i64)),
            Opcode::Neq => self.binary_op(|a, b| Ok((a != b) as i64)),
            Opcode::Lt => self.binary_op(|a, b| Ok((a < b) as i64)),
            Opcode::Gt => self.binary_op(|a, b| Ok((a > b) as i64)),
            Opcode::Le => self.binary_op(|a, b| Ok((a <= b) as i64)),
            Opcode::Ge => self.binary_op(|a, b| Ok((a >= b) as i64)),
            Opcode::Store => {
                let val = self.stack.pop()?;
                self.vars.insert(&instr.operands[0], val);
                Ok(Flow::Advance)
            }
            Opcode::Load => {
                let val = self.vars.get(&instr.operands[0])?;
                self.stack.push(val);
                Ok(Flow::Advance)
            }
            Opcode::Jmp => Ok(Flow::Jump(self.jump_target(&instr.operands[0])?)),
            Opcode::Jz => {
                let cond = self.stack.pop()?;
                if cond == 0 {
                    // The target is only resolved when the jump is taken,
                    // so a bad target on a not-taken branch never faults.
                    Ok(Flow::Jump(self.jump_target(&instr.operands[0])?))
                } else {
                    Ok(Flow::Advance)
                }
            }
            Opcode::Jnz => {
                let cond = self.stack.pop()?;
                if cond != 0 {
                    Ok(Flow::Jump(self.jump_target(&instr.operands[0])?))
                } else {
                    Ok(Flow::Advance)
                }
            }
            Opcode::Call => {
                // Return address goes on the operand stack; RET pops it.
                self.stack.push((self.pc + 1) as i64);
                Ok(Flow::Jump(self.jump_target(&instr.operands[0])?))
            }
            Opcode::Ret => {
                let address = self.stack.pop()?;
                if address < 0 {
                    return Err(RuntimeError::InvalidReturnAddress(address));
                }
                // An address at or past the end of the program falls off
                // the end: the loop exits and the run halts normally.
                Ok(Flow::Jump(address as usize))
            }
            Opcode::Print => {
                let val = self.stack.last()?;
                writeln!(self.output, "{val}")?;
                Ok(Flow::Advance)
            }
            Opcode::Read => {
                let mut line = String::new();
                if self.input.read_line(&mut line)? == 0 {
                    return Err(RuntimeError::InputExhausted);
                }
                let token = line.trim();
                let val = token
                    .parse::<i64>()
                    .map_err(|_| RuntimeError::MalformedInput(token.to_owned()))?;
                self.stack.push(val);
                Ok(Flow::Advance)
            }
            Opcode::Halt => Ok(Flow::Halt),
        }
    }

    fn binary_op(
        &mut self,
        op: impl FnOnce(i64, i64) -> RuntimeResult<i64>,
    ) -> RuntimeResult<Flow> {
        let (a, b) = self.stack.pop_2()?;
        self.stack.push(op(a, b)?);
        Ok(Flow::Advance)
    }

    fn check_arity(&self, opcode: Opcode, instr: &Instruction) -> RuntimeResult<()> {
        let expected = opcode.arity();
        if instr.operands.len() != expected {
            return Err(RuntimeError::WrongOperandCount {
                opcode: opcode.to_string(),
                expected,
                found: instr.operands.len(),
            });
        }
        Ok(())
    }

    /// Shared target resolution for JMP/JZ/JNZ/CALL: the label map wins,
    /// otherwise the token must parse as a non-negative in-range address.
    fn jump_target(&self, token: &str) -> RuntimeResult<usize> {
        if let Some(address) = self.program.label(token) {
            return Ok(address);
        }
        let address = token
            .parse::<usize>()
            .map_err(|_| RuntimeError::InvalidJumpTarget(token.to_owned()))?;
        if address >= self.program.len() {
            return Err(RuntimeError::JumpOutOfBounds {
                address,
                len: self.program.len(),
            });
        }
        Ok(address)
    }
}

fn int_operand(token: &str) -> RuntimeResult<i64> {
    token
        .parse::<i64>()
        .map_err(|_| RuntimeError::MalformedOperand(token.to_owned()))
}

/// Division truncating toward negative infinity, so that
/// `floor_div(-7, 2) == -4` rather than the `-3` of truncating division.
fn floor_div(a: i64, b: i64) -> i64 {
    let quot = a.wrapping_div(b);
    let rem = a.wrapping_rem(b);
    if rem != 0 && (rem < 0) != (b < 0) {
        quot - 1
    } else {
        quot
    }
}

/// Remainder whose sign follows the divisor, consistent with [`floor_div`].
fn floor_mod(a: i64, b: i64) -> i64 {
    let rem = a.wrapping_rem(b);
    if rem != 0 && (rem < 0) != (b < 0) {
        rem + b
    } else {
        rem
    }
}
