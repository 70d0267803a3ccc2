//! The immutable sample record.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::SampleError;
use crate::sample::GenerationInfo;
use crate::seeding::{self, DrawRng};

fn is_false(value: &bool) -> bool {
    !*value
}

/// A single sample expression, either a template to be expanded or a
/// generated result.
///
/// Samples are never mutated in place: every instruction application copies
/// its input with modifications, so branching instructions can safely diverge
/// from a shared ancestor. Identity (equality and hashing) depends only on
/// the `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleExpression {
    pub id: String,
    pub label: String,
    /// The expression text, possibly still empty during expansion.
    #[serde(default)]
    pub expression: String,
    /// Expected to fail parsing (negative test sample).
    #[serde(default, skip_serializing_if = "is_false")]
    pub invalid: bool,
    /// AND/OR combination that needs parenthesization when embedded elsewhere.
    #[serde(default, skip_serializing_if = "is_false")]
    pub composite: bool,
    /// Excluded from processing without being deleted.
    #[serde(default, skip_serializing_if = "is_false")]
    pub skip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_info: Option<GenerationInfo>,
}

impl SampleExpression {
    /// Creates a plain sample with all flags cleared.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::InvalidSample`] if `id` or `label` is empty or
    /// whitespace-only.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        expression: impl Into<String>,
    ) -> Result<Self, SampleError> {
        Self::with_flags(id, label, expression, false, false, false)
    }

    /// Creates a sample with explicit flags.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::InvalidSample`] if `id` or `label` is empty or
    /// whitespace-only.
    pub fn with_flags(
        id: impl Into<String>,
        label: impl Into<String>,
        expression: impl Into<String>,
        invalid: bool,
        composite: bool,
        skip: bool,
    ) -> Result<Self, SampleError> {
        let res = Self {
            id: id.into(),
            label: label.into(),
            expression: expression.into(),
            invalid,
            composite,
            skip,
            generation_info: None,
        };
        res.validate()?;
        Ok(res)
    }

    /// Checks the construction invariants (non-blank id and label).
    pub fn validate(&self) -> Result<(), SampleError> {
        if self.id.trim().is_empty() || self.label.trim().is_empty() {
            return Err(SampleError::InvalidSample {
                id: self.id.clone(),
                label: self.label.clone(),
            });
        }
        Ok(())
    }

    /// The owning group, if the sample has been tagged during generation.
    pub fn group(&self) -> Option<&str> {
        self.generation_info.as_ref().and_then(|info| info.group.as_deref())
    }

    /// A generator seeded on the sample's id plus its expression so far.
    pub(crate) fn seeded_rng(&self) -> DrawRng {
        seeding::random_for(&format!("{}{}", self.id, self.expression))
    }

    /// A clone of the sample's generation info, or a fresh default when absent.
    pub(crate) fn info_copy(&self) -> GenerationInfo {
        self.generation_info.clone().unwrap_or_default()
    }
}

impl PartialEq for SampleExpression {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SampleExpression {}

impl Hash for SampleExpression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
