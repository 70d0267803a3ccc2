//! Depth-first plan expansion with a per-template variation budget.

use tracing::{debug, info};

use crate::error::SampleError;
use crate::instruction::Instruction;
use crate::plan::Plan;
use crate::sample::{SampleExpression, SampleExpressionGroup};
use crate::seeding::fingerprint_int;

/// Soft ceiling on the number of finished variations per template. Once
/// reached, all remaining instruction applications run with limit 0, so every
/// still-open branch collapses to its single canonical continuation.
pub const VARIATION_COUNT_LIMIT: usize = 50;

/// Executes plans and accumulates every finished sample.
///
/// The accumulated list is append-only and shared across all templates and
/// groups of the executed plans, which is what makes cross-group reuse
/// possible: a reuse instruction can only ever see samples finished strictly
/// before it runs.
#[derive(Debug, Default)]
pub struct PlanExecutor {
    generated: Vec<SampleExpression>,
}

impl PlanExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// All samples finished by this executor so far, in finalization order.
    pub fn generated(&self) -> &[SampleExpression] {
        &self.generated
    }

    /// Expands every template of the plan into its sample variations.
    ///
    /// Returns one result group per plan group, in plan order, each holding
    /// its finished samples in generation order.
    pub fn execute(&mut self, plan: &Plan) -> Result<Vec<SampleExpressionGroup>, SampleError> {
        let mut res = Vec::with_capacity(plan.groups.len());
        for group in &plan.groups {
            let mut group_results: Vec<SampleExpression> = Vec::new();
            for entry in &group.members {
                let mut variation_count = 0usize;
                self.expand(
                    entry.start_expression(&group.group),
                    &entry.instructions,
                    &mut group_results,
                    &mut variation_count,
                );
                debug!(
                    group = %group.group,
                    id = %entry.template.id,
                    variations = variation_count,
                    "expanded template"
                );
            }
            info!(
                group = %group.group,
                samples = group_results.len(),
                "finished sample group"
            );
            res.push(SampleExpressionGroup::new(
                group.group.clone(),
                group_results,
            )?);
        }
        Ok(res)
    }

    fn expand(
        &mut self,
        base: SampleExpression,
        instructions: &[Instruction],
        group_results: &mut Vec<SampleExpression>,
        variation_count: &mut usize,
    ) {
        let Some((first, rest)) = instructions.split_first() else {
            return;
        };
        let results = if *variation_count < VARIATION_COUNT_LIMIT {
            first.apply_default(&base, &self.generated)
        } else {
            first.apply(&base, 0, &self.generated)
        };
        if rest.is_empty() {
            for result in results {
                let finished = finalize(result);
                group_results.push(finished.clone());
                self.generated.push(finished);
                *variation_count += 1;
            }
        } else {
            for result in results {
                self.expand(result, rest, group_results, variation_count);
            }
        }
    }
}

/// Makes the sample's id unique by appending the fingerprint of its final
/// expression text in hex. Identical expression texts from the same template
/// still collide, intentionally, so exact duplicates stay detectable.
fn finalize(sample: SampleExpression) -> SampleExpression {
    SampleExpression {
        id: format!("{}_{:x}", sample.id, fingerprint_int(&sample.expression)),
        ..sample
    }
}
