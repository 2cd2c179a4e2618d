use miette::SourceSpan;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Index;

/// Byte range of one instruction line within the program source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Returns a new span that covers both self and other.
    pub fn union(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> SourceSpan {
        (span.start, span.end - span.start).into()
    }
}

/// One loaded source line: a raw mnemonic plus raw operand tokens.
///
/// Operands are kept verbatim; they are only parsed when the instruction is
/// actually executed, so a malformed operand on an unreached instruction
/// never aborts the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: String,
    pub operands: Vec<String>,
    pub span: Span,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic)?;
        for operand in &self.operands {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}

/// A loaded program: the dense, zero-indexed instruction array plus the
/// label map. Built once by the [`Assembler`](super::Assembler) and
/// read-only during execution.
///
/// Label declarations consume no address, so every label maps into
/// `0..=len` (`len` being the address just past the last instruction).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub labels: HashMap<String, usize>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }
}

impl Index<usize> for Program {
    type Output = Instruction;
    fn index(&self, index: usize) -> &Instruction {
        &self.instructions[index]
    }
}

impl fmt::Display for Program {
    /// Renders the resolved listing: label names ahead of the address they
    /// point at, then one numbered instruction per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut labels_at: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
        for (name, address) in &self.labels {
            labels_at.entry(*address).or_default().push(name);
        }
        for names in labels_at.values_mut() {
            names.sort_unstable();
        }
        for (address, instruction) in self.instructions.iter().enumerate() {
            if let Some(names) = labels_at.get(&address) {
                for name in names {
                    writeln!(f, "{name}:")?;
                }
            }
            writeln!(f, "{address:>5}  {instruction}")?;
        }
        if let Some(names) = labels_at.get(&self.instructions.len()) {
            for name in names {
                writeln!(f, "{name}:")?;
            }
        }
        Ok(())
    }
}
