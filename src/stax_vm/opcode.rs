use std::fmt;
use std::str::FromStr;

/// The fixed instruction set of the machine.
///
/// Mnemonic resolution happens at execution time, not load time: an opcode
/// that is never reached is never looked up, so a misspelled instruction
/// only faults if the program counter actually arrives at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Push,
    Pop,

    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Neg,

    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,

    Store,
    Load,

    Jmp,
    Jz,
    Jnz,
    Call,
    Ret,

    Print,
    Read,
    Halt,
}

impl Opcode {
    /// Number of operand tokens the instruction requires.
    pub fn arity(self) -> usize {
        use Opcode::*;
        match self {
            Push | Store | Load | Jmp | Jz | Jnz | Call => 1,
            _ => 0,
        }
    }
}

impl FromStr for Opcode {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Opcode::*;
        match s {
            "PUSH" => Ok(Push),
            "POP" => Ok(Pop),
            "ADD" => Ok(Add),
            "SUB" => Ok(Sub),
            "MUL" => Ok(Mul),
            "DIV" => Ok(Div),
            "MOD" => Ok(Mod),
            "NEG" => Ok(Neg),
            "EQ" => Ok(Eq),
            "NEQ" => Ok(Neq),
            "LT" => Ok(Lt),
            "GT" => Ok(Gt),
            "LE" => Ok(Le),
            "GE" => Ok(Ge),
            "STORE" => Ok(Store),
            "LOAD" => Ok(Load),
            "JMP" => Ok(Jmp),
            "JZ" => Ok(Jz),
            "JNZ" => Ok(Jnz),
            "CALL" => Ok(Call),
            "RET" => Ok(Ret),
            "PRINT" => Ok(Print),
            "READ" => Ok(Read),
            "HALT" => Ok(Halt),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Opcode::*;
        let mnemonic = match self {
            Push => "PUSH",
            Pop => "POP",
            Add => "ADD",
            Sub => "SUB",
            Mul => "MUL",
            Div => "DIV",
            Mod => "MOD",
            Neg => "NEG",
            Eq => "EQ",
            Neq => "NEQ",
            Lt => "LT",
            Gt => "GT",
            Le => "LE",
            Ge => "GE",
            Store => "STORE",
            Load => "LOAD",
            Jmp => "JMP",
            Jz => "JZ",
            Jnz => "JNZ",
            Call => "CALL",
            Ret => "RET",
            Print => "PRINT",
            Read => "READ",
            Halt => "HALT",
        };
        write!(f, "{mnemonic}")
    }
}

#[cfg(test)]
mod tests {
    use super::Opcode;

    #[test]
    fn mnemonics_round_trip() {
        for mnemonic in [
            "PUSH", "POP", "ADD", "SUB", "MUL", "DIV", "MOD", "NEG", "EQ", "NEQ", "LT", "GT",
            "LE", "GE", "STORE", "LOAD", "JMP", "JZ", "JNZ", "CALL", "RET", "PRINT", "READ",
            "HALT",
        ] {
            let opcode: Opcode = mnemonic.parse().unwrap();
            assert_eq!(opcode.to_string(), mnemonic);
        }
    }

    #[test]
    fn unknown_mnemonic_is_rejected() {
        assert!("FROB".parse::<Opcode>().is_err());
        // Mnemonics are case-sensitive.
        assert!("push".parse::<Opcode>().is_err());
    }

    #[test]
    fn arity_matches_instruction_set() {
        assert_eq!(Opcode::Push.arity(), 1);
        assert_eq!(Opcode::Store.arity(), 1);
        assert_eq!(Opcode::Jmp.arity(), 1);
        assert_eq!(Opcode::Add.arity(), 0);
        assert_eq!(Opcode::Ret.arity(), 0);
        assert_eq!(Opcode::Halt.arity(), 0);
    }
}
