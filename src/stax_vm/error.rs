use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Cause of a run-time fault.
///
/// Faults are a host-side termination signal, not something bytecode can
/// catch: the executor wraps the cause in a [`Fault`] naming the program
/// counter and opcode, and the run terminates wholesale.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("stack underflow")]
    StackUnderflow,
    #[error("variable `{0}` is not defined")]
    UndefinedVariable(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("`{opcode}` takes {expected} operand(s), found {found}")]
    WrongOperandCount {
        opcode: String,
        expected: usize,
        found: usize,
    },
    #[error("malformed integer operand `{0}`")]
    MalformedOperand(String),
    #[error("invalid jump target `{0}`: neither a known label nor a non-negative address")]
    InvalidJumpTarget(String),
    #[error("jump address {address} is outside the program (length {len})")]
    JumpOutOfBounds { address: usize, len: usize },
    #[error("return address {0} is negative")]
    InvalidReturnAddress(i64),
    #[error("unknown instruction `{0}`")]
    UnknownOpcode(String),
    #[error("input exhausted: READ found no more lines")]
    InputExhausted,
    #[error("READ expected an integer, found `{0}`")]
    MalformedInput(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A run terminated by a fault: the address and mnemonic of the faulting
/// instruction plus the underlying cause, with the offending source line
/// labelled for diagnostics.
#[derive(Error, Diagnostic, Debug)]
#[diagnostic(code(vm::fault))]
#[error("fault at address {address}: `{opcode}`: {cause}")]
pub struct Fault {
    pub address: usize,
    pub opcode: String,
    #[source]
    pub cause: RuntimeError,
    #[label("this instruction faulted")]
    pub span: SourceSpan,
}
