//! The closed catalog of stateless token instructions.
//!
//! Each token kind owns a small ordered table of literal spelling variants.
//! Index 0 is by convention the canonical ("nicest") spelling: it is the only
//! spelling used when variation is disabled and the first element of every
//! multi-select, while the random single-select path deliberately draws from
//! the remaining indexes only.

use std::fmt;
use std::sync::OnceLock;

use tracing::warn;

use crate::sample::{GenerationInfo, Operator, SampleExpression};
use crate::seeding::DrawRng;

/// Number of elements a CSV list instruction may emit.
const MAX_CSV_ELEMENTS: u32 = 5;

/// Stateless token instruction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    MandatoryWhitespaceOrComment,
    OptionalWhitespaceOrComment,
    All,
    None,
    ArgName,
    ArgValue,
    Is,
    Not,
    Unknown,
    Op,
    ArgRef,
    Strict,
    Any,
    Of,
    MixedList,
    Contains,
    Snippet,
    SnippetList,
    Between,
    Bound,
    Comment,
    And,
    Or,
    Curb,
}

/// How a token kind turns its pattern table into output variations.
enum Selector {
    /// One randomly drawn spelling (canonical when variation is disabled).
    SingleSelect,
    /// Canonical spelling plus up to `limit - 1` further distinct spellings.
    MultiSelect,
    /// Canonical filler, occasionally replaced or followed by comments.
    WhitespaceOrComment,
    /// Comma-separated list of 1-5 drawn values.
    CsvList,
}

const PATTERNS_MANDATORY_WS: &[&str] = &[" ", "\n", "\r\n", "\t", "\r", "   ", "\t\t\n\t"];
const PATTERNS_OPTIONAL_WS: &[&str] = &["", " ", "\n", "\r\n", "\t", "\r", "   ", "\t\t\n\t"];
const PATTERNS_COMMENT: &[&str] = &[
    "/* comment */",
    "/* hugo */",
    "/* NOT */",
    "\n/**/\n",
    "\n/*AND (b=3)*/\n",
    "/*\\nsome comment\\n\\n\\n*/",
];
const PATTERNS_OR: &[&str] = &["OR", "or", "Or", "oR"];
const PATTERNS_AND: &[&str] = &["AND", "and", "And", "AnD", "aND"];
const PATTERNS_ALL: &[&str] = &["<ALL>", "<all>", "<All>", "<aLl>", "<AlL>"];
const PATTERNS_NONE: &[&str] = &["<NONE>", "<none>", "<None>", "<nOnE>", "<NoNe>"];
const PATTERNS_IS: &[&str] = &["IS", "is", "Is", "iS"];
const PATTERNS_NOT: &[&str] = &["NOT", "not", "Not", "nOt", "nOT"];
const PATTERNS_UNKNOWN: &[&str] = &["UNKNOWN", "unknown", "Unknown", "unKnown", "uNkNoWn"];
const PATTERNS_OP: &[&str] = &["=", "<", "<=", "!=", ">=", ">"];
const PATTERNS_STRICT: &[&str] = &["STRICT", "strict", "Strict", "sTriCt"];
const PATTERNS_ANY: &[&str] = &["ANY", "any", "Any", "AnY", "aNY"];
const PATTERNS_OF: &[&str] = &["OF", "of", "Of", "oF"];
const PATTERNS_CONTAINS: &[&str] = &["CONTAINS", "contains", "Contains", "conTains", "cONTAInS"];
const PATTERNS_BETWEEN: &[&str] = &["BETWEEN", "between", "Between", "betWeen", "bETWEEn"];
const PATTERNS_CURB: &[&str] = &["CURB", "curb", "Curb", "curB", "cUrB"];

const PATTERNS_ARG_NAME: &[&str] = &[
    "argName",
    "a",
    "\"a\"",
    "\"argName\"",
    "\"argument name\"",
    "arg1",
    "arg2",
    "arg3",
    "arg4",
    "arg5",
    "arg6",
    "arg7",
    "arg8",
    "arg9",
    "arg10",
    "arg11",
    "arg12",
    "arg13",
    "arg14",
    "arg15",
    "arg16",
    "arg17",
    "arg18",
    "arg19",
    "arg20",
    "\"<ALL>\"",
    "\"<NONE>\"",
    "\"IS\"",
    "\"NOT\"",
    "\"BETWEEN\"",
    "\"STRICT\"",
    "\"UNKNOWN\"",
    "\"OF\"",
    "\"CONTAINS\"",
    "\"CURB\"",
    "\"name with quote (\"\")\"",
];
const PATTERNS_ARG_VALUE: &[&str] = &[
    "value",
    "\"\"",
    "v",
    "\"v\"",
    "\"value\"",
    "val1",
    "val2",
    "val3",
    "val4",
    "val5",
    "val6",
    "val7",
    "val8",
    "val9",
    "val10",
    "val11",
    "val12",
    "val13",
    "val14",
    "val15",
    "val16",
    "val17",
    "val18",
    "val19",
    "val20",
    "\"some value\"",
    "\"<ALL>\"",
    "\"<NONE>\"",
    "\"IS\"",
    "\"NOT\"",
    "\"BETWEEN\"",
    "\"STRICT\"",
    "\"UNKNOWN\"",
    "\"OF\"",
    "\"CONTAINS\"",
    "\"CURB\"",
    "\"value with quote (\"\")\"",
];
const PATTERNS_ARG_REF: &[&str] = &[
    "@argName",
    "@a",
    "@\"a\"",
    "@\"argName\"",
    "@\"argument name\"",
    "@arg1",
    "@arg2",
    "@arg3",
    "@arg4",
    "@arg5",
    "@arg6",
    "@arg7",
    "@arg8",
    "@arg9",
    "@arg10",
    "@arg11",
    "@arg12",
    "@arg13",
    "@arg14",
    "@arg15",
    "@arg16",
    "@arg17",
    "@arg18",
    "@arg19",
    "@arg20",
    "@\"<ALL>\"",
    "@\"<NONE>\"",
    "@\"IS\"",
    "@\"NOT\"",
    "@\"BETWEEN\"",
    "@\"STRICT\"",
    "@\"UNKNOWN\"",
    "@\"OF\"",
    "@\"CONTAINS\"",
    "@\"CURB\"",
    "@\"argref with quote (\"\")\"",
];
const PATTERNS_SNIPPET: &[&str] = &[
    "foo",
    "f",
    "bar",
    "\"foo bar\"",
    "\\",
    "\"a=b\"",
    "\"OR\"",
    "brand\\sports",
    "C:\\programs",
    "\"!\"",
    "yeti",
    "Hugo",
    "Eliza",
    "blue",
    "red",
    "green",
    "toast",
    "\"snippet with quote (\"\")\"",
];
const PATTERNS_BOUND: &[&str] = &["1", "0", "10", "2", "3", "4", "5", "6", "7", "8", "9", "999"];

/// Malformed suffixes for negative argument-name samples.
const BAD_PATTERNS_ARG_NAME: &[&str] =
    &[" ", "!", "\"", "\n", "\t", "\r", "\"", "\"\"", "\"\n\""];
/// Malformed suffixes for negative argument-value and snippet samples.
const BAD_PATTERNS_VALUE: &[&str] = &[" ", "!", "\"", "\n", "\t", "\r", "\"", "\"\n\""];
/// Malformed suffixes for negative mixed-list samples.
const BAD_PATTERNS_MIXED_LIST: &[&str] =
    &[" ", "a,,b", "a,", "a,b,", "a,,", ",", "\"a\",", ",\"a\"", ",a"];
/// Malformed suffixes for negative snippet-list samples.
const BAD_PATTERNS_SNIPPET_LIST: &[&str] =
    &[" ", "a,,b", "a,", "a,@b,", "a,,", ",", "@\"a\",", ",@\"a\"", ",@a, b"];

/// Mixed-list values draw from the value and reference tables combined.
fn mixed_patterns() -> &'static [&'static str] {
    static MIXED: OnceLock<Vec<&'static str>> = OnceLock::new();
    MIXED.get_or_init(|| {
        let mut all = PATTERNS_ARG_VALUE.to_vec();
        all.extend_from_slice(PATTERNS_ARG_REF);
        all
    })
}

impl TokenKind {
    /// The kind's ordered spelling variants, canonical spelling first.
    pub fn patterns(self) -> &'static [&'static str] {
        match self {
            TokenKind::MandatoryWhitespaceOrComment => PATTERNS_MANDATORY_WS,
            TokenKind::OptionalWhitespaceOrComment => PATTERNS_OPTIONAL_WS,
            TokenKind::All => PATTERNS_ALL,
            TokenKind::None => PATTERNS_NONE,
            TokenKind::ArgName => PATTERNS_ARG_NAME,
            TokenKind::ArgValue => PATTERNS_ARG_VALUE,
            TokenKind::Is => PATTERNS_IS,
            TokenKind::Not => PATTERNS_NOT,
            TokenKind::Unknown => PATTERNS_UNKNOWN,
            TokenKind::Op => PATTERNS_OP,
            TokenKind::ArgRef => PATTERNS_ARG_REF,
            TokenKind::Strict => PATTERNS_STRICT,
            TokenKind::Any => PATTERNS_ANY,
            TokenKind::Of => PATTERNS_OF,
            TokenKind::MixedList => mixed_patterns(),
            TokenKind::Contains => PATTERNS_CONTAINS,
            TokenKind::Snippet => PATTERNS_SNIPPET,
            TokenKind::SnippetList => PATTERNS_SNIPPET,
            TokenKind::Between => PATTERNS_BETWEEN,
            TokenKind::Bound => PATTERNS_BOUND,
            TokenKind::Comment => PATTERNS_COMMENT,
            TokenKind::And => PATTERNS_AND,
            TokenKind::Or => PATTERNS_OR,
            TokenKind::Curb => PATTERNS_CURB,
        }
    }

    fn selector(self) -> Selector {
        match self {
            TokenKind::MandatoryWhitespaceOrComment | TokenKind::OptionalWhitespaceOrComment => {
                Selector::WhitespaceOrComment
            }
            TokenKind::All
            | TokenKind::None
            | TokenKind::ArgName
            | TokenKind::ArgValue
            | TokenKind::Op
            | TokenKind::ArgRef
            | TokenKind::Contains => Selector::MultiSelect,
            TokenKind::MixedList | TokenKind::SnippetList => Selector::CsvList,
            _ => Selector::SingleSelect,
        }
    }

    /// Updates the generation info with the metadata of an appended pattern.
    pub(crate) fn record(self, info: &mut GenerationInfo, pattern: &str) {
        match self {
            TokenKind::All => info.cnt_all += 1,
            TokenKind::None => info.cnt_none += 1,
            TokenKind::Is => info.cnt_is += 1,
            TokenKind::Not => info.cnt_not += 1,
            TokenKind::Unknown => info.cnt_unknown += 1,
            TokenKind::Strict => info.cnt_strict += 1,
            TokenKind::Any => info.cnt_any += 1,
            TokenKind::Of => info.cnt_of += 1,
            TokenKind::Contains => info.cnt_contains += 1,
            TokenKind::Between => info.cnt_between += 1,
            TokenKind::Curb => info.cnt_curb += 1,
            TokenKind::And => info.cnt_and += 1,
            TokenKind::Or => info.cnt_or += 1,
            TokenKind::Op => match Operator::resolve(pattern) {
                Some(op) => GenerationInfo::push_value(&mut info.operators, op),
                Option::None => warn!(pattern, "skipping unresolvable operator token"),
            },
            TokenKind::ArgName => {
                GenerationInfo::push_value(&mut info.arg_names, pattern.to_string());
            }
            TokenKind::ArgValue => {
                GenerationInfo::push_value(&mut info.arg_values, pattern.to_string());
            }
            TokenKind::ArgRef => {
                let stripped = pattern.strip_prefix('@').unwrap_or(pattern);
                GenerationInfo::push_value(&mut info.arg_refs, stripped.to_string());
            }
            TokenKind::Comment => {
                GenerationInfo::push_value(&mut info.comments, trim_comment(pattern).to_string());
            }
            TokenKind::Snippet => {
                GenerationInfo::push_value(&mut info.snippets, pattern.to_string());
            }
            TokenKind::Bound => match pattern.parse::<i64>() {
                Ok(value) => GenerationInfo::push_value(&mut info.bound_values, value),
                Err(_) => warn!(pattern, "skipping unparsable bound token"),
            },
            TokenKind::MandatoryWhitespaceOrComment
            | TokenKind::OptionalWhitespaceOrComment
            | TokenKind::MixedList
            | TokenKind::SnippetList => {}
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::MandatoryWhitespaceOrComment => "MANDATORY_WHITESPACE_OR_COMMENT",
            TokenKind::OptionalWhitespaceOrComment => "OPTIONAL_WHITESPACE_OR_COMMENT",
            TokenKind::All => "ALL",
            TokenKind::None => "NONE",
            TokenKind::ArgName => "ARG_NAME",
            TokenKind::ArgValue => "ARG_VALUE",
            TokenKind::Is => "IS",
            TokenKind::Not => "NOT",
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::Op => "OP",
            TokenKind::ArgRef => "ARG_REF",
            TokenKind::Strict => "STRICT",
            TokenKind::Any => "ANY",
            TokenKind::Of => "OF",
            TokenKind::MixedList => "MIXED_LIST",
            TokenKind::Contains => "CONTAINS",
            TokenKind::Snippet => "SNIPPET",
            TokenKind::SnippetList => "SNIPPET_LIST",
            TokenKind::Between => "BETWEEN",
            TokenKind::Bound => "BOUND",
            TokenKind::Comment => "COMMENT",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Curb => "CURB",
        };
        f.write_str(name)
    }
}

/// Strips whitespace surrounding the delimited `/* ... */` body of a comment
/// pattern. Falls back to the full text when there is no delimiter.
fn trim_comment(comment: &str) -> &str {
    match (comment.find('/'), comment.rfind('/')) {
        (Some(start), Some(end)) if start < end => &comment[start..=end],
        _ => comment,
    }
}

/// Applies a token instruction, producing one or more output variations.
///
/// An `output_limit` below 1 forces the canonical single-variant path and
/// suppresses malformed siblings.
pub(crate) fn apply_token(
    kind: TokenKind,
    input: &SampleExpression,
    output_limit: i32,
) -> Vec<SampleExpression> {
    match kind.selector() {
        Selector::SingleSelect => single_select(kind, input, kind.patterns(), output_limit),
        Selector::MultiSelect => multi_select(kind, input, output_limit),
        Selector::WhitespaceOrComment => whitespace_or_comment(kind, input, output_limit),
        Selector::CsvList => csv_list(kind, input, output_limit),
    }
}

/// Picks one pattern, never index 0 unless it is the only one.
fn pick_value<'a>(patterns: &[&'a str], rng: &mut DrawRng) -> &'a str {
    let mut idx = 0;
    if patterns.len() > 1 {
        idx = rng.next_below(patterns.len() as u32 - 1) as usize + 1;
    }
    patterns[idx]
}

/// Picks up to `len` distinct patterns without replacement.
///
/// Returns the whole table when it has no more than `len` entries. The head
/// pattern is only drawn once it is the last one remaining.
fn pick_values_no_duplicates<'a>(
    patterns: &[&'a str],
    rng: &mut DrawRng,
    len: usize,
) -> Vec<&'a str> {
    if patterns.len() <= len {
        return patterns.to_vec();
    }
    let mut available = patterns.to_vec();
    let mut res = Vec::new();
    for _ in 0..len {
        if available.len() == 1 {
            res.push(available[0]);
            break;
        }
        let value = pick_value(&available, rng);
        res.push(value);
        if let Some(pos) = available.iter().position(|&v| v == value) {
            available.remove(pos);
        }
    }
    res
}

/// Picks between 1 and `max` patterns, duplicates allowed.
fn pick_values<'a>(patterns: &[&'a str], rng: &mut DrawRng, max: u32) -> Vec<&'a str> {
    let count = rng.next_below(max) + 1;
    (0..count).map(|_| pick_value(patterns, rng)).collect()
}

/// Extends the input with the given pattern, recording its metadata.
///
/// An empty pattern passes the input through unchanged.
fn augment_with_pattern(
    kind: TokenKind,
    input: &SampleExpression,
    pattern: &str,
    out: &mut Vec<SampleExpression>,
) {
    if pattern.is_empty() {
        out.push(input.clone());
        return;
    }
    let mut info = input.info_copy();
    kind.record(&mut info, pattern);
    out.push(SampleExpression {
        expression: format!("{}{}", input.expression, pattern),
        generation_info: Some(info),
        ..input.clone()
    });
}

fn single_select(
    kind: TokenKind,
    input: &SampleExpression,
    patterns: &[&str],
    output_limit: i32,
) -> Vec<SampleExpression> {
    let mut rng = input.seeded_rng();
    let pattern = if output_limit < 1 {
        patterns[0]
    } else {
        pick_value(patterns, &mut rng)
    };
    let mut res = Vec::new();
    augment_with_pattern(kind, input, pattern, &mut res);
    add_invalid_siblings(kind, input, &mut rng, res, output_limit < 1)
}

fn multi_select(kind: TokenKind, input: &SampleExpression, output_limit: i32) -> Vec<SampleExpression> {
    let mut rng = input.seeded_rng();
    let patterns = kind.patterns();

    let multiplier = if input.invalid || output_limit <= 1 {
        1
    } else {
        output_limit as usize
    };

    let mut selected = vec![patterns[0]];
    if multiplier > 1 {
        selected.extend(pick_values_no_duplicates(patterns, &mut rng, multiplier - 1));
    }

    let mut res = Vec::new();
    for pattern in selected {
        augment_with_pattern(kind, input, pattern, &mut res);
    }
    add_invalid_siblings(kind, input, &mut rng, res, output_limit < 1)
}

fn whitespace_or_comment(
    kind: TokenKind,
    input: &SampleExpression,
    output_limit: i32,
) -> Vec<SampleExpression> {
    let mut rng = input.seeded_rng();
    let skip_variations = output_limit < 1;
    let patterns = kind.patterns();

    // default augmentation with the canonical filler
    let mut res = Vec::new();
    augment_with_pattern(kind, input, patterns[0], &mut res);

    // round about every 10th occurrence shall be a comment
    if rng.next_below(100) < 10 {
        let mut sub = apply_token(TokenKind::Comment, input, 1);
        // approx. every 5th comment shall be a double comment
        if !skip_variations && rng.next_below(100) < 5 {
            sub = apply_token(TokenKind::Comment, &sub[0], 1);
        }
        res.extend(sub);
    } else if !skip_variations {
        // whitespace variation, excluding the canonical pattern
        res.extend(single_select(kind, input, &patterns[1..], output_limit));
    }
    res
}

fn csv_list(kind: TokenKind, input: &SampleExpression, output_limit: i32) -> Vec<SampleExpression> {
    let mut rng = input.seeded_rng();

    let list_values = pick_values(kind.patterns(), &mut rng, MAX_CSV_ELEMENTS);

    let mut expression = input.expression.clone();
    let mut info = input.info_copy();

    for (i, value) in list_values.iter().enumerate() {
        if i > 0 {
            occasionally_append_filler(&mut rng, &mut expression, &mut info);
            expression.push(',');
            occasionally_append_filler(&mut rng, &mut expression, &mut info);
        }
        expression.push_str(value);
        if kind == TokenKind::MixedList {
            if value.starts_with('@') {
                TokenKind::ArgRef.record(&mut info, value);
            } else {
                TokenKind::ArgValue.record(&mut info, value);
            }
        } else {
            TokenKind::Snippet.record(&mut info, value);
        }
    }

    let res = vec![SampleExpression {
        expression,
        generation_info: Some(info),
        ..input.clone()
    }];
    add_invalid_siblings(kind, input, &mut rng, res, output_limit < 1)
}

/// Randomly inserts extra whitespace or an inline comment around a separator.
fn occasionally_append_filler(rng: &mut DrawRng, expression: &mut String, info: &mut GenerationInfo) {
    if rng.next_below(100) < 10 {
        expression.push('\n');
    } else if rng.next_bool() {
        expression.push(' ');
    }
    if rng.next_below(100) < 10 {
        let comment = PATTERNS_COMMENT[0];
        expression.push_str(comment);
        TokenKind::Comment.record(info, comment);
    }
}

/// Adds deliberately malformed sibling samples for negative testing.
///
/// Already-invalid inputs are left alone (no point stacking defects), and
/// disabled variation suppresses the siblings entirely.
fn add_invalid_siblings(
    kind: TokenKind,
    input: &SampleExpression,
    rng: &mut DrawRng,
    mut results: Vec<SampleExpression>,
    skip_variations: bool,
) -> Vec<SampleExpression> {
    if input.invalid || skip_variations {
        return results;
    }

    let (menu, picks) = match kind {
        TokenKind::ArgName => (BAD_PATTERNS_ARG_NAME, 2),
        TokenKind::ArgValue | TokenKind::Snippet => (BAD_PATTERNS_VALUE, 2),
        TokenKind::MixedList => (BAD_PATTERNS_MIXED_LIST, 3),
        TokenKind::SnippetList => (BAD_PATTERNS_SNIPPET_LIST, 3),
        _ => return results,
    };

    let mut invalid_texts = vec![input.expression.clone()];
    for bad in pick_values_no_duplicates(menu, rng, picks) {
        invalid_texts.push(format!("{}{}", input.expression, bad));
    }

    for text in invalid_texts {
        results.push(SampleExpression {
            expression: text,
            invalid: true,
            generation_info: Some(input.info_copy()),
            ..input.clone()
        });
    }
    results
}
