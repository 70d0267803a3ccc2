//! Named collections of sample expressions.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::SampleError;
use crate::sample::{GenerationInfo, SampleExpression};

fn is_false(value: &bool) -> bool {
    !*value
}

/// A named, non-empty collection of sample expressions.
///
/// The group name is the group's identity. On construction every member's
/// generation info is (re-)tagged with the group name, so that group-filtered
/// reuse instructions can address the members later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleExpressionGroup {
    pub group: String,
    pub samples: Vec<SampleExpression>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub skip: bool,
}

impl SampleExpressionGroup {
    /// Creates a group with the skip flag cleared.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::InvalidGroup`] for a blank group name,
    /// [`SampleError::EmptyGroup`] for an empty member list, or the first
    /// member's validation error.
    pub fn new(
        group: impl Into<String>,
        samples: Vec<SampleExpression>,
    ) -> Result<Self, SampleError> {
        Self::with_skip(group, samples, false)
    }

    /// Creates a group with an explicit skip flag.
    pub fn with_skip(
        group: impl Into<String>,
        samples: Vec<SampleExpression>,
        skip: bool,
    ) -> Result<Self, SampleError> {
        let group = group.into();
        if group.trim().is_empty() {
            return Err(SampleError::InvalidGroup(group));
        }
        if samples.is_empty() {
            return Err(SampleError::EmptyGroup(group));
        }
        let samples = samples
            .into_iter()
            .map(|sample| {
                sample.validate()?;
                Ok(tag_with_group(sample, &group))
            })
            .collect::<Result<Vec<_>, SampleError>>()?;
        Ok(Self {
            group,
            samples,
            skip,
        })
    }
}

/// Ensures the sample carries generation info tagged with the group name.
fn tag_with_group(mut sample: SampleExpression, group: &str) -> SampleExpression {
    match &mut sample.generation_info {
        Some(info) => info.group = Some(group.to_string()),
        None => sample.generation_info = Some(GenerationInfo::for_group(group)),
    }
    sample
}

impl PartialEq for SampleExpressionGroup {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group
    }
}

impl Eq for SampleExpressionGroup {}

impl Hash for SampleExpressionGroup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str) -> SampleExpression {
        SampleExpression::new(id, format!("label {id}"), "a = b").expect("valid sample")
    }

    #[test]
    fn test_rejects_blank_group_name() {
        assert!(SampleExpressionGroup::new("  ", vec![sample("id-1")]).is_err());
    }

    #[test]
    fn test_rejects_empty_member_list() {
        assert!(SampleExpressionGroup::new("basic", vec![]).is_err());
    }

    #[test]
    fn test_members_are_tagged_with_group() {
        let group =
            SampleExpressionGroup::new("basic", vec![sample("id-1")]).expect("valid group");
        assert_eq!(group.samples[0].group(), Some("basic"));
    }

    #[test]
    fn test_existing_info_is_retagged() {
        let mut member = sample("id-1");
        member.generation_info = Some(GenerationInfo::for_group("other"));
        let group = SampleExpressionGroup::new("basic", vec![member]).expect("valid group");
        assert_eq!(group.samples[0].group(), Some("basic"));
    }

    #[test]
    fn test_equality_depends_only_on_group_name() {
        let a = SampleExpressionGroup::new("basic", vec![sample("id-1")]).expect("valid group");
        let b = SampleExpressionGroup::new("basic", vec![sample("id-2")]).expect("valid group");
        assert_eq!(a, b);
    }

    #[test]
    fn test_json_round_trip() {
        let group =
            SampleExpressionGroup::new("basic", vec![sample("id-1")]).expect("valid group");
        let json = serde_json::to_string(&group).expect("serializable");
        assert!(!json.contains("\"skip\""));
        let back: SampleExpressionGroup = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(back.group, "basic");
        assert_eq!(back.samples.len(), 1);
    }
}
