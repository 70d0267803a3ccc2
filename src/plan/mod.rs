//! Execution plans: validated, parsed template groups ready for expansion.

pub mod builder;
pub mod executor;

pub use builder::build_plan;
pub use executor::{PlanExecutor, VARIATION_COUNT_LIMIT};

use std::collections::HashMap;

use tracing::warn;

use crate::error::PlanError;
use crate::instruction::Instruction;
use crate::sample::{GenerationInfo, SampleExpression, SampleExpressionGroup};

/// One template together with its parsed instruction sequence.
///
/// The instruction sequence is never empty: even an empty template parses
/// into a single empty literal append.
#[derive(Debug, Clone)]
pub struct PlanEntry {
    pub template: SampleExpression,
    pub instructions: Vec<Instruction>,
}

impl PlanEntry {
    /// The empty shell every expansion of this template starts from: the
    /// template's identity and flags, no expression text yet, and a fresh
    /// metadata record tagged with the owning group.
    pub fn start_expression(&self, group: &str) -> SampleExpression {
        SampleExpression {
            id: self.template.id.clone(),
            label: self.template.label.clone(),
            expression: String::new(),
            invalid: self.template.invalid,
            composite: self.template.composite,
            skip: false,
            generation_info: Some(GenerationInfo::for_group(group)),
        }
    }
}

/// An ordered, named collection of plan entries.
#[derive(Debug, Clone)]
pub struct PlanGroup {
    pub group: String,
    pub members: Vec<PlanEntry>,
}

/// A validated execution plan.
#[derive(Debug, Clone)]
pub struct Plan {
    pub groups: Vec<PlanGroup>,
}

impl Plan {
    /// Assembles a plan from prepared groups.
    ///
    /// Template ids recurring across groups are logged as warnings, never
    /// rejected: later by-id reuse can only deterministically address the
    /// first group that registered the id.
    pub fn new(groups: Vec<PlanGroup>) -> Self {
        let mut id_to_group: HashMap<&str, &str> = HashMap::new();
        for group in &groups {
            for member in &group.members {
                if let Some(other) = id_to_group.get(member.template.id.as_str()) {
                    warn!(
                        id = %member.template.id,
                        group = %group.group,
                        previous_group = %other,
                        "template ids should be unique across groups"
                    );
                } else {
                    id_to_group.insert(&member.template.id, &group.group);
                }
            }
        }
        Self { groups }
    }
}

/// Builds and executes a plan for the given template groups in one call.
pub fn generate_samples(
    template_groups: &[SampleExpressionGroup],
) -> Result<Vec<SampleExpressionGroup>, PlanError> {
    let plan = build_plan(template_groups)?;
    let mut executor = PlanExecutor::new();
    Ok(executor.execute(&plan)?)
}
