//! Program loader: turns raw mnemonic text into a [`Program`].
//!
//! Label declarations (`LABEL <name>`) are stripped into the label map and
//! consume no address; every other non-blank line becomes one instruction.
//! The label map is complete before execution starts, so forward and
//! backward references resolve identically.

pub mod error;
pub mod program;

use std::collections::HashMap;

use logos::Logos;

use error::{AsmResult, DuplicateLabelError, MalformedLabelError};
use program::{Instruction, Program, Span};

/// Mnemonic that declares a label. Never executed; consumed entirely here.
const LABEL_MNEMONIC: &str = "LABEL";

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")]
enum TokenKind {
    #[token("\n")]
    Newline,
    #[regex(r"[^ \t\r\n\f]+")]
    Word,
}

#[derive(Debug, Default)]
pub struct Assembler;

impl Assembler {
    pub fn new() -> Self {
        Assembler
    }

    pub fn assemble(&self, source: &str) -> AsmResult<Program> {
        let mut program = Program::default();
        let mut label_spans: HashMap<String, Span> = HashMap::new();
        let mut line: Vec<(Span, &str)> = Vec::new();
        let mut lexer = TokenKind::lexer(source);
        while let Some(token) = lexer.next() {
            let span = Span {
                start: lexer.span().start,
                end: lexer.span().end,
            };
            match token {
                Ok(TokenKind::Word) => line.push((span, lexer.slice())),
                Ok(TokenKind::Newline) => {
                    self.load_line(&mut program, &mut label_spans, &line, source)?;
                    line.clear();
                }
                // Every non-whitespace byte matches `Word`, so the lexer
                // has no failure case.
                Err(()) => {}
            }
        }
        self.load_line(&mut program, &mut label_spans, &line, source)?;
        Ok(program)
    }

    fn load_line(
        &self,
        program: &mut Program,
        label_spans: &mut HashMap<String, Span>,
        tokens: &[(Span, &str)],
        src: &str,
    ) -> AsmResult<()> {
        // Blank and whitespace-only lines never consume an address.
        let Some(((_, mnemonic), rest)) = tokens.split_first() else {
            return Ok(());
        };
        let line_span = tokens
            .iter()
            .skip(1)
            .fold(tokens[0].0, |acc, (span, _)| acc.union(*span));
        if *mnemonic == LABEL_MNEMONIC {
            let [(name_span, name)] = rest else {
                return Err(MalformedLabelError {
                    span: line_span.into(),
                    src: src.to_owned(),
                }
                .into());
            };
            if let Some(first) = label_spans.get(*name) {
                return Err(DuplicateLabelError {
                    name: (*name).to_owned(),
                    span: (*name_span).into(),
                    first: (*first).into(),
                    src: src.to_owned(),
                }
                .into());
            }
            label_spans.insert((*name).to_owned(), *name_span);
            // The label points at the *next* real instruction, which may be
            // the end-of-program address.
            program
                .labels
                .insert((*name).to_owned(), program.instructions.len());
        } else {
            program.instructions.push(Instruction {
                mnemonic: (*mnemonic).to_owned(),
                operands: rest.iter().map(|(_, token)| (*token).to_owned()).collect(),
                span: line_span,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::error::AsmError;
    use super::*;

    fn assemble(source: &str) -> Program {
        Assembler::new().assemble(source).unwrap()
    }

    #[test]
    fn labels_consume_no_address() {
        let program = assemble("LABEL start\nPUSH 1\nLABEL mid\nPUSH 2\nLABEL end\n");
        assert_eq!(program.len(), 2);
        assert_eq!(program.label("start"), Some(0));
        assert_eq!(program.label("mid"), Some(1));
        assert_eq!(program.label("end"), Some(2));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let program = assemble("\n  \nPUSH 1\n\n\t\nADD\n");
        assert_eq!(program.len(), 2);
        assert_eq!(program[0].mnemonic, "PUSH");
        assert_eq!(program[1].mnemonic, "ADD");
    }

    #[test]
    fn forward_and_backward_references_resolve_identically() {
        let forward = assemble("JMP target\nLABEL target\nHALT\n");
        let backward = assemble("LABEL target\nJMP target\nHALT\n");
        assert_eq!(forward.label("target"), Some(1));
        assert_eq!(backward.label("target"), Some(0));
    }

    #[test]
    fn operands_are_kept_verbatim() {
        let program = assemble("PUSH -42\nSTORE counter\n");
        assert_eq!(program[0].operands, vec!["-42".to_owned()]);
        assert_eq!(program[1].operands, vec!["counter".to_owned()]);
    }

    #[test]
    fn last_line_without_trailing_newline_is_loaded() {
        let program = assemble("PUSH 1\nHALT");
        assert_eq!(program.len(), 2);
        assert_eq!(program[1].mnemonic, "HALT");
    }

    #[test]
    fn label_without_name_is_rejected() {
        let err = Assembler::new().assemble("LABEL\n").unwrap_err();
        assert!(matches!(err, AsmError::MalformedLabel(_)));
    }

    #[test]
    fn label_with_two_names_is_rejected() {
        let err = Assembler::new().assemble("LABEL one two\n").unwrap_err();
        assert!(matches!(err, AsmError::MalformedLabel(_)));
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let err = Assembler::new()
            .assemble("LABEL loop\nPUSH 1\nLABEL loop\n")
            .unwrap_err();
        match err {
            AsmError::DuplicateLabel(inner) => assert_eq!(inner.name, "loop"),
            other => panic!("expected duplicate label error, got {other:?}"),
        }
    }

    #[test]
    fn listing_shows_labels_and_addresses() {
        let program = assemble("LABEL loop\nPUSH 1\nJMP loop\n");
        let listing = program.to_string();
        assert!(listing.contains("loop:"));
        assert!(listing.contains("0  PUSH 1"));
        assert!(listing.contains("1  JMP loop"));
    }
}
