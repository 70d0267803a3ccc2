//! Summary catalog of a generated corpus.

use serde::{Deserialize, Serialize};

use crate::sample::SampleExpressionGroup;

/// One catalog line: a group and its sample count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleGroupCatalogEntry {
    pub group: String,
    #[serde(rename = "sampleCount")]
    pub sample_count: usize,
}

/// Companion summary written next to a generated corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleGroupCatalog {
    pub groups: Vec<SampleGroupCatalogEntry>,
    #[serde(rename = "numberOfGroups")]
    pub number_of_groups: usize,
    #[serde(rename = "numberOfSamples")]
    pub number_of_samples: usize,
}

impl SampleGroupCatalog {
    /// Summarizes the given groups.
    pub fn from_groups(groups: &[SampleExpressionGroup]) -> Self {
        let entries: Vec<SampleGroupCatalogEntry> = groups
            .iter()
            .map(|g| SampleGroupCatalogEntry {
                group: g.group.clone(),
                sample_count: g.samples.len(),
            })
            .collect();
        let number_of_samples = entries.iter().map(|e| e.sample_count).sum();
        Self {
            number_of_groups: entries.len(),
            number_of_samples,
            groups: entries,
        }
    }
}
