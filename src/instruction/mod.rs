//! The typed instruction catalog and its application model.
//!
//! Instructions are the units of the template mini-language: each one extends
//! a sample's expression text and/or records generation metadata, producing
//! one or more output variations. All applications are copy-on-write - the
//! input sample is never mutated, so branching instructions can safely
//! diverge from a shared ancestor.

pub mod parser;
pub mod reuse;
pub mod tokens;

pub use parser::parse;
pub use reuse::ReuseKind;
pub use tokens::TokenKind;

use std::fmt;

use crate::sample::SampleExpression;

/// Effectively unlimited output limit, selected by the `*` template marker.
pub const UNLIMITED_OUTPUT: i32 = 10_000;

/// A single instruction of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Appends fixed text without touching metadata.
    AppendText(String),
    /// Appends fixed text and records it in metadata exactly as if the token
    /// had been drawn randomly.
    AppendTextAsToken { token: TokenKind, text: String },
    /// A stateless token instruction from the closed catalog.
    Token(TokenKind),
    /// Appends the text of an already-finished sample.
    Reuse(ReuseKind),
    /// Clamps the wrapped instruction's effective output limit.
    LimitOverride {
        inner: Box<Instruction>,
        limit: i32,
    },
}

impl Instruction {
    /// The output limit used when the caller does not request one.
    pub fn default_output_limit(&self) -> i32 {
        match self {
            Instruction::AppendText(_)
            | Instruction::AppendTextAsToken { .. }
            | Instruction::Token(_) => 1,
            Instruction::Reuse(_) => 3,
            Instruction::LimitOverride { limit, .. } => *limit,
        }
    }

    /// Applies the instruction with its default output limit.
    pub fn apply_default(
        &self,
        input: &SampleExpression,
        generated: &[SampleExpression],
    ) -> Vec<SampleExpression> {
        self.apply(input, self.default_output_limit(), generated)
    }

    /// Applies the instruction to the given sample.
    ///
    /// `generated` is the read-only view of all previously finished samples,
    /// consulted by reuse instructions only. An `output_limit` below 1 forces
    /// the single canonical continuation with no invalid siblings.
    pub fn apply(
        &self,
        input: &SampleExpression,
        output_limit: i32,
        generated: &[SampleExpression],
    ) -> Vec<SampleExpression> {
        match self {
            Instruction::AppendText(text) => vec![append_text(input, text)],
            Instruction::AppendTextAsToken { token, text } => {
                let mut res = append_text(input, text);
                let mut info = res.generation_info.take().unwrap_or_default();
                token.record(&mut info, text);
                res.generation_info = Some(info);
                vec![res]
            }
            Instruction::Token(kind) => tokens::apply_token(*kind, input, output_limit),
            Instruction::Reuse(kind) => reuse::apply_reuse(kind, input, output_limit, generated),
            Instruction::LimitOverride { inner, limit } => {
                inner.apply(input, output_limit.min(*limit), generated)
            }
        }
    }
}

/// Plain text append; clears the skip flag and copies the metadata through.
fn append_text(input: &SampleExpression, text: &str) -> SampleExpression {
    SampleExpression {
        expression: format!("{}{}", input.expression, text),
        skip: false,
        generation_info: Some(input.info_copy()),
        ..input.clone()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::AppendText(text) => write!(f, "'{text}'"),
            Instruction::AppendTextAsToken { token, text } => write!(f, "{token}:'{text}'"),
            Instruction::Token(kind) => write!(f, "{kind}"),
            Instruction::Reuse(kind) => write!(f, "{kind}"),
            Instruction::LimitOverride { inner, .. } => write!(f, "{inner}"),
        }
    }
}
