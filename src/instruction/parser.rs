//! Parser for the template instruction mini-language.
//!
//! A template is scanned left to right:
//! - `~` appends an optional-whitespace-or-comment instruction,
//! - `_` appends a mandatory-whitespace-or-comment instruction,
//! - `${NAME[!|*][:ARGUMENT]}` appends a catalog instruction, where `!`
//!   forces the canonical no-variation output limit and `*` an effectively
//!   unbounded one,
//! - everything else accumulates into literal-append runs.
//!
//! An empty template still yields exactly one (empty) literal append, so an
//! empty sample is a legal terminal state.

use crate::error::TemplateError;
use crate::instruction::{Instruction, ReuseKind, TokenKind, UNLIMITED_OUTPUT};
use crate::sample::Operator;

/// Parses one template string into its ordered instruction sequence.
///
/// # Errors
///
/// Returns a [`TemplateError`] for an unterminated `${...`, an unknown
/// instruction name, an argument supplied where unsupported, a missing
/// required argument, or an unusable fixed constant.
pub fn parse(template: &str) -> Result<Vec<Instruction>, TemplateError> {
    let mut res = Vec::new();
    let mut pending = String::new();

    let mut iter = template.char_indices().peekable();
    while let Some((idx, ch)) = iter.next() {
        match ch {
            '$' if template[idx + 1..].starts_with('{') => {
                flush_pending(&mut pending, &mut res);
                let rest = &template[idx..];
                let close = rest
                    .find('}')
                    .ok_or_else(|| TemplateError::UnterminatedInstruction {
                        template: template.to_string(),
                    })?;
                res.push(parse_instruction_body(&rest[2..close], template)?);
                let close_abs = idx + close;
                while let Some(&(i, _)) = iter.peek() {
                    if i <= close_abs {
                        iter.next();
                    } else {
                        break;
                    }
                }
            }
            '~' => {
                flush_pending(&mut pending, &mut res);
                res.push(Instruction::Token(TokenKind::OptionalWhitespaceOrComment));
            }
            '_' => {
                flush_pending(&mut pending, &mut res);
                res.push(Instruction::Token(TokenKind::MandatoryWhitespaceOrComment));
            }
            _ => pending.push(ch),
        }
    }
    flush_pending(&mut pending, &mut res);

    // must allow the empty expression
    if res.is_empty() {
        res.push(Instruction::AppendText(String::new()));
    }

    Ok(res)
}

fn flush_pending(pending: &mut String, res: &mut Vec<Instruction>) {
    if !pending.is_empty() {
        res.push(Instruction::AppendText(std::mem::take(pending)));
    }
}

/// Parses the body of one `${...}` token (the text between the braces).
fn parse_instruction_body(body: &str, template: &str) -> Result<Instruction, TemplateError> {
    let (raw_name, argument) = match body.find(':') {
        Some(pos) => (&body[..pos], Some(body[pos + 1..].trim())),
        None => (body, None),
    };

    let mut name = raw_name.trim();
    let mut override_limit = None;
    if let Some(stripped) = name.strip_suffix('!') {
        name = stripped.trim_end();
        override_limit = Some(0);
    } else if let Some(stripped) = name.strip_suffix('*') {
        name = stripped.trim_end();
        override_limit = Some(UNLIMITED_OUTPUT);
    }
    let normalized = name.to_uppercase();

    let instruction = build_instruction(&normalized, argument, template)?;

    Ok(match override_limit {
        Some(limit) => Instruction::LimitOverride {
            inner: Box::new(instruction),
            limit,
        },
        None => instruction,
    })
}

/// Resolves a normalized instruction name plus optional argument.
fn build_instruction(
    name: &str,
    argument: Option<&str>,
    template: &str,
) -> Result<Instruction, TemplateError> {
    let token = match name {
        "ALL" => Some(TokenKind::All),
        "NONE" => Some(TokenKind::None),
        "ARG_NAME" => Some(TokenKind::ArgName),
        "ARG_VALUE" => Some(TokenKind::ArgValue),
        "ARG_REF" => Some(TokenKind::ArgRef),
        "IS" => Some(TokenKind::Is),
        "NOT" => Some(TokenKind::Not),
        "UNKNOWN" => Some(TokenKind::Unknown),
        "OP" => Some(TokenKind::Op),
        "STRICT" => Some(TokenKind::Strict),
        "ANY" => Some(TokenKind::Any),
        "OF" => Some(TokenKind::Of),
        "MIXED_LIST" => Some(TokenKind::MixedList),
        "CONTAINS" => Some(TokenKind::Contains),
        "SNIPPET" => Some(TokenKind::Snippet),
        "SNIPPET_LIST" => Some(TokenKind::SnippetList),
        "BETWEEN" => Some(TokenKind::Between),
        "BOUND" => Some(TokenKind::Bound),
        "COMMENT" => Some(TokenKind::Comment),
        "AND" => Some(TokenKind::And),
        "OR" => Some(TokenKind::Or),
        "CURB" => Some(TokenKind::Curb),
        _ => None,
    };

    if let Some(token) = token {
        return build_token_instruction(token, argument, template);
    }

    match name {
        "OPAQUE_EXPRESSION" | "COMPOSITE_EXPRESSION" => {
            if let Some(argument) = argument {
                return Err(TemplateError::UnexpectedArgument {
                    name: name.to_string(),
                    argument: argument.to_string(),
                    template: template.to_string(),
                });
            }
            let kind = if name == "OPAQUE_EXPRESSION" {
                ReuseKind::Opaque
            } else {
                ReuseKind::Composite
            };
            Ok(Instruction::Reuse(kind))
        }
        "EXPRESSION" => match argument {
            Some(filter) if !filter.is_empty() => {
                Ok(Instruction::Reuse(ReuseKind::IdOrGroup(filter.to_string())))
            }
            _ => Err(TemplateError::MissingArgument {
                name: name.to_string(),
                template: template.to_string(),
            }),
        },
        _ => Err(TemplateError::UnknownInstruction {
            name: name.to_string(),
            template: template.to_string(),
        }),
    }
}

/// The token kinds that support fixed-constant payloads.
fn supports_constant(token: TokenKind) -> bool {
    matches!(
        token,
        TokenKind::ArgName
            | TokenKind::ArgValue
            | TokenKind::ArgRef
            | TokenKind::Op
            | TokenKind::Snippet
            | TokenKind::Bound
            | TokenKind::Comment
    )
}

fn build_token_instruction(
    token: TokenKind,
    argument: Option<&str>,
    template: &str,
) -> Result<Instruction, TemplateError> {
    match argument {
        None => Ok(Instruction::Token(token)),
        Some(text) if supports_constant(token) => {
            // a blank payload counts as absent
            if text.is_empty() {
                return Ok(Instruction::Token(token));
            }
            validate_constant(token, text, template)?;
            Ok(Instruction::AppendTextAsToken {
                token,
                text: text.to_string(),
            })
        }
        Some(text) => Err(TemplateError::UnexpectedArgument {
            name: token.to_string(),
            argument: text.to_string(),
            template: template.to_string(),
        }),
    }
}

/// Rejects fixed constants the metadata bookkeeping could not represent.
fn validate_constant(token: TokenKind, text: &str, template: &str) -> Result<(), TemplateError> {
    let usable = match token {
        TokenKind::Op => Operator::resolve(text).is_some(),
        TokenKind::Bound => text.parse::<i64>().is_ok(),
        _ => true,
    };
    if usable {
        Ok(())
    } else {
        Err(TemplateError::InvalidArgument {
            name: token.to_string(),
            argument: text.to_string(),
            template: template.to_string(),
        })
    }
}
