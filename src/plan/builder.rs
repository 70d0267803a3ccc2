//! Turns raw template groups into a validated [`Plan`].

use std::collections::HashSet;

use tracing::debug;

use crate::error::PlanError;
use crate::instruction::parse;
use crate::plan::{Plan, PlanEntry, PlanGroup};
use crate::sample::SampleExpressionGroup;

/// Validates and parses the given template groups.
///
/// Groups and templates flagged `skip` are dropped with a debug log entry,
/// as are groups left empty after that filtering. Duplicate group names and
/// duplicate template ids within a group are hard errors.
pub fn build_plan(template_groups: &[SampleExpressionGroup]) -> Result<Plan, PlanError> {
    let mut groups: Vec<PlanGroup> = Vec::new();

    for template_group in template_groups {
        if template_group.skip {
            debug!(group = %template_group.group, "skipping group (marked skip=true)");
            continue;
        }
        if groups.iter().any(|g| g.group == template_group.group) {
            return Err(PlanError::DuplicateGroup(template_group.group.clone()));
        }

        let mut seen_ids: HashSet<&str> = HashSet::new();
        let mut members = Vec::new();
        for template in &template_group.samples {
            if template.skip {
                debug!(
                    group = %template_group.group,
                    id = %template.id,
                    "skipping template (marked skip=true)"
                );
                continue;
            }
            template.validate()?;
            if !seen_ids.insert(&template.id) {
                return Err(PlanError::DuplicateTemplateId {
                    group: template_group.group.clone(),
                    id: template.id.clone(),
                });
            }
            let instructions = parse(&template.expression)?;
            members.push(PlanEntry {
                template: template.clone(),
                instructions,
            });
        }

        if members.is_empty() {
            debug!(group = %template_group.group, "dropping group without active templates");
            continue;
        }
        groups.push(PlanGroup {
            group: template_group.group.clone(),
            members,
        });
    }

    Ok(Plan::new(groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleExpression;

    fn template(id: &str, expression: &str) -> SampleExpression {
        SampleExpression::new(id, format!("label {id}"), expression).expect("valid template")
    }

    fn group(name: &str, samples: Vec<SampleExpression>) -> SampleExpressionGroup {
        SampleExpressionGroup::new(name, samples).expect("valid group")
    }

    #[test]
    fn test_build_plan_parses_all_active_templates() {
        let groups = vec![group(
            "basic",
            vec![template("t1", "a = 1"), template("t2", "a${OP}1")],
        )];
        let plan = build_plan(&groups).expect("plan builds");
        assert_eq!(plan.groups.len(), 1);
        assert_eq!(plan.groups[0].members.len(), 2);
        assert_eq!(plan.groups[0].members[1].instructions.len(), 3);
    }

    #[test]
    fn test_skipped_group_is_dropped() {
        let skipped =
            SampleExpressionGroup::with_skip("later", vec![template("t1", "a = 1")], true)
                .expect("valid group");
        let plan = build_plan(&[skipped]).expect("plan builds");
        assert!(plan.groups.is_empty());
    }

    #[test]
    fn test_group_with_only_skipped_templates_is_dropped() {
        let mut t = template("t1", "a = 1");
        t.skip = true;
        let plan = build_plan(&[group("basic", vec![t])]).expect("plan builds");
        assert!(plan.groups.is_empty());
    }

    #[test]
    fn test_duplicate_group_name_is_rejected() {
        let groups = vec![
            group("basic", vec![template("t1", "a = 1")]),
            group("basic", vec![template("t2", "b = 2")]),
        ];
        let err = build_plan(&groups).expect_err("duplicate group");
        assert!(matches!(err, PlanError::DuplicateGroup(name) if name == "basic"));
    }

    #[test]
    fn test_duplicate_template_id_within_group_is_rejected() {
        let groups = vec![group(
            "basic",
            vec![template("t1", "a = 1"), template("t1", "b = 2")],
        )];
        let err = build_plan(&groups).expect_err("duplicate id");
        assert!(
            matches!(err, PlanError::DuplicateTemplateId { group, id } if group == "basic" && id == "t1")
        );
    }

    #[test]
    fn test_broken_template_fails_the_build() {
        let groups = vec![group("basic", vec![template("t1", "a = ${NO_SUCH_TOKEN}")])];
        assert!(matches!(
            build_plan(&groups),
            Err(PlanError::Template(_))
        ));
    }
}
