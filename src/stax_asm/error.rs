use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::declare_error_type;

declare_error_type! {
    #[error("assembly error: {0}")]
    pub enum AsmError {
        MalformedLabel(MalformedLabelError),
        DuplicateLabel(DuplicateLabelError),
    }
}

pub type AsmResult<T> = Result<T, AsmError>;

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(
    code(asm::malformed_label),
    help("label declarations take exactly one name: LABEL <name>")
)]
#[error("malformed label declaration")]
pub struct MalformedLabelError {
    #[label("expected exactly one label name on this line")]
    pub span: SourceSpan,
    #[source_code]
    pub src: String,
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(
    code(asm::duplicate_label),
    help("label names must be unique within one program")
)]
#[error("label `{name}` is declared twice")]
pub struct DuplicateLabelError {
    pub name: String,
    #[label("redeclared here")]
    pub span: SourceSpan,
    #[label("first declared here")]
    pub first: SourceSpan,
    #[source_code]
    pub src: String,
}
