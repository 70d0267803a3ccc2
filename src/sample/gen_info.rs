//! Per-sample generation metadata.
//!
//! A [`GenerationInfo`] records which lexical constructs the generator put
//! into a sample: one counter per fixed keyword token plus ordered lists of
//! captured literal values. A downstream validator parses the finished
//! expression independently and asserts that its own derived counts match
//! this record exactly.

use serde::{Deserialize, Serialize};

/// Comparison operator spellings the generator can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessThanOrEquals,
    GreaterThanOrEquals,
}

impl Operator {
    /// The operator's literal token.
    pub fn token(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::LessThanOrEquals => "<=",
            Operator::GreaterThanOrEquals => ">=",
        }
    }

    /// Resolves a literal token back to its operator, if it is one.
    pub fn resolve(token: &str) -> Option<Operator> {
        match token {
            "=" => Some(Operator::Equals),
            "!=" => Some(Operator::NotEquals),
            "<" => Some(Operator::LessThan),
            ">" => Some(Operator::GreaterThan),
            "<=" => Some(Operator::LessThanOrEquals),
            ">=" => Some(Operator::GreaterThanOrEquals),
            _ => None,
        }
    }
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// Structured record of a sample's generation process.
///
/// Counters default to zero and lists stay absent (`None`) until first
/// populated, which keeps empty-corpus comparisons trivial and the persisted
/// JSON free of noise. The `group` tag is internal processing state and never
/// serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationInfo {
    /// Awareness of the owning group during generation, not persisted.
    #[serde(skip)]
    pub(crate) group: Option<String>,

    #[serde(skip_serializing_if = "is_zero")]
    pub cnt_all: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub cnt_none: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub cnt_is: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub cnt_not: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub cnt_unknown: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub cnt_strict: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub cnt_contains: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub cnt_any: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub cnt_between: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub cnt_curb: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub cnt_and: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub cnt_or: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub cnt_of: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound_values: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operators: Option<Vec<Operator>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg_refs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
}

impl GenerationInfo {
    /// Creates an empty record tagged with the owning group.
    pub(crate) fn for_group(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            ..Self::default()
        }
    }

    /// Appends a value to an absent-until-populated list.
    pub(crate) fn push_value<T>(slot: &mut Option<Vec<T>>, value: T) {
        slot.get_or_insert_with(Vec::new).push(value);
    }

    /// Returns a new record with the other record *added* to this one:
    /// counter-wise addition plus null-safe list concatenation, this record's
    /// elements first.
    pub fn combine(&self, other: &GenerationInfo) -> GenerationInfo {
        let mut res = self.clone();

        combine_lists(&mut res.arg_names, &other.arg_names);
        combine_lists(&mut res.arg_refs, &other.arg_refs);
        combine_lists(&mut res.arg_values, &other.arg_values);
        combine_lists(&mut res.bound_values, &other.bound_values);
        combine_lists(&mut res.comments, &other.comments);
        combine_lists(&mut res.operators, &other.operators);
        combine_lists(&mut res.snippets, &other.snippets);

        res.cnt_all += other.cnt_all;
        res.cnt_and += other.cnt_and;
        res.cnt_any += other.cnt_any;
        res.cnt_between += other.cnt_between;
        res.cnt_contains += other.cnt_contains;
        res.cnt_curb += other.cnt_curb;
        res.cnt_is += other.cnt_is;
        res.cnt_none += other.cnt_none;
        res.cnt_not += other.cnt_not;
        res.cnt_of += other.cnt_of;
        res.cnt_or += other.cnt_or;
        res.cnt_strict += other.cnt_strict;
        res.cnt_unknown += other.cnt_unknown;
        res
    }
}

fn combine_lists<T: Clone>(left: &mut Option<Vec<T>>, right: &Option<Vec<T>>) {
    if let Some(right) = right {
        left.get_or_insert_with(Vec::new).extend(right.iter().cloned());
    }
}
