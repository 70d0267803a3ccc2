//! Reuse instructions: embedding previously finished samples.
//!
//! A reuse instruction appends the expression text of an already-finalized
//! sample onto the current one, wrapping it in parentheses when the source is
//! composite, and combines its metadata into the destination's. Candidates
//! come from the executor's append-only list of finished samples, so reuse
//! can only ever reference strictly earlier output.

use std::fmt;

use tracing::error;

use crate::sample::SampleExpression;
use crate::seeding::DrawRng;

/// The three reuse candidate-pool policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReuseKind {
    /// All previously generated, non-invalid, non-composite samples.
    Opaque,
    /// All previously generated, non-invalid, composite samples.
    Composite,
    /// First sample whose pre-finalization id equals the filter, falling
    /// back to all samples whose group tag equals the filter.
    IdOrGroup(String),
}

impl fmt::Display for ReuseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReuseKind::Opaque => f.write_str("OPAQUE_EXPRESSION"),
            ReuseKind::Composite => f.write_str("COMPOSITE_EXPRESSION"),
            ReuseKind::IdOrGroup(filter) => write!(f, "EXPRESSION:{filter}"),
        }
    }
}

/// True if the sample's finalized id minus its fingerprint suffix equals the
/// filter, i.e. the sample came from the template with that id.
fn matches_pre_finalization_id(sample: &SampleExpression, filter: &str) -> bool {
    match sample.id.rfind('_') {
        Some(pos) if pos > 0 => &sample.id[..pos] == filter,
        _ => false,
    }
}

/// Resolves the candidate pool for the given reuse kind.
fn candidates<'a>(kind: &ReuseKind, generated: &'a [SampleExpression]) -> Vec<&'a SampleExpression> {
    match kind {
        ReuseKind::Opaque => generated
            .iter()
            .filter(|s| !s.invalid && !s.composite)
            .collect(),
        ReuseKind::Composite => generated
            .iter()
            .filter(|s| !s.invalid && s.composite)
            .collect(),
        ReuseKind::IdOrGroup(filter) => {
            // match only the first occurrence to make the result predictable
            let by_id: Vec<&SampleExpression> = generated
                .iter()
                .filter(|s| !s.invalid && matches_pre_finalization_id(s, filter))
                .take(1)
                .collect();
            if !by_id.is_empty() {
                by_id
            } else {
                generated
                    .iter()
                    .filter(|s| !s.invalid && s.group() == Some(filter.as_str()))
                    .collect()
            }
        }
    }
}

/// Draws up to `max` unique candidates without replacement.
fn pick_unique<'a>(
    candidates: Vec<&'a SampleExpression>,
    rng: &mut DrawRng,
    max: usize,
) -> Vec<&'a SampleExpression> {
    if candidates.len() <= max {
        return candidates;
    }
    let mut available = candidates;
    let mut res = Vec::new();
    for _ in 0..max {
        let idx = rng.next_below(available.len() as u32) as usize;
        res.push(available.remove(idx));
    }
    res
}

/// Applies a reuse instruction.
///
/// An empty candidate pool never fails hard: the single forced result is the
/// input marked `invalid` and `skip`, so downstream consumers see a visibly
/// flagged artifact instead of a silent gap.
pub(crate) fn apply_reuse(
    kind: &ReuseKind,
    input: &SampleExpression,
    output_limit: i32,
    generated: &[SampleExpression],
) -> Vec<SampleExpression> {
    let max_variations = if input.invalid { 0 } else { output_limit };
    let mut rng = input.seeded_rng();

    let refs = pick_unique(
        candidates(kind, generated),
        &mut rng,
        max_variations.max(1) as usize,
    );

    if refs.is_empty() {
        let fail = SampleExpression {
            invalid: true,
            skip: true,
            generation_info: Some(input.info_copy()),
            ..input.clone()
        };
        error!(
            instruction = %kind,
            id = %fail.id,
            "no matching reference expression found, marking sample as invalid with skip=true"
        );
        return vec![fail];
    }

    let mut res = Vec::new();
    for reference in refs {
        let expression = if reference.composite {
            format!("{}( {} )", input.expression, reference.expression)
        } else {
            format!("{}{}", input.expression, reference.expression)
        };
        let info = input
            .info_copy()
            .combine(reference.generation_info.as_ref().unwrap_or(&Default::default()));
        res.push(SampleExpression {
            expression,
            generation_info: Some(info),
            ..input.clone()
        });
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::GenerationInfo;

    fn finished(id: &str, expression: &str, invalid: bool, composite: bool) -> SampleExpression {
        let mut sample = SampleExpression::with_flags(
            format!("{id}_{:x}", crate::seeding::fingerprint_int(expression)),
            format!("label {id}"),
            expression,
            invalid,
            composite,
            false,
        )
        .expect("valid sample");
        sample.generation_info = Some(GenerationInfo::for_group("pool"));
        sample
    }

    fn empty_input() -> SampleExpression {
        SampleExpression::new("current", "current label", "").expect("valid sample")
    }

    #[test]
    fn test_opaque_pool_excludes_invalid_and_composite() {
        let generated = vec![
            finished("plain", "a = 1", false, false),
            finished("bad", "a = ", true, false),
            finished("combo", "a = 1 AND b = 2", false, true),
        ];
        let pool = candidates(&ReuseKind::Opaque, &generated);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].expression, "a = 1");
    }

    #[test]
    fn test_composite_pool_contains_only_composites() {
        let generated = vec![
            finished("plain", "a = 1", false, false),
            finished("combo", "a = 1 AND b = 2", false, true),
        ];
        let pool = candidates(&ReuseKind::Composite, &generated);
        assert_eq!(pool.len(), 1);
        assert!(pool[0].composite);
    }

    #[test]
    fn test_id_match_is_preferred_over_group_match() {
        let mut by_group = finished("other", "by group", false, false);
        by_group.generation_info = Some(GenerationInfo::for_group("target"));
        let generated = vec![by_group, finished("target", "by id", false, false)];
        let pool = candidates(&ReuseKind::IdOrGroup("target".to_string()), &generated);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].expression, "by id");
    }

    #[test]
    fn test_id_match_takes_first_occurrence_only() {
        let generated = vec![
            finished("target", "first", false, false),
            finished("target", "second", false, false),
        ];
        let pool = candidates(&ReuseKind::IdOrGroup("target".to_string()), &generated);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].expression, "first");
    }

    #[test]
    fn test_group_fallback_when_no_id_matches() {
        let generated = vec![
            finished("one", "a = 1", false, false),
            finished("two", "b = 2", false, false),
        ];
        let pool = candidates(&ReuseKind::IdOrGroup("pool".to_string()), &generated);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_empty_pool_yields_single_flagged_sample() {
        let res = apply_reuse(&ReuseKind::IdOrGroup("nothing".to_string()), &empty_input(), 3, &[]);
        assert_eq!(res.len(), 1);
        assert!(res[0].invalid);
        assert!(res[0].skip);
        assert_eq!(res[0].expression, "");
    }

    #[test]
    fn test_composite_reference_is_parenthesized() {
        let generated = vec![finished("combo", "a = 1 OR b = 2", false, true)];
        let mut input = empty_input();
        input.expression = "NOT ".to_string();
        let res = apply_reuse(&ReuseKind::Composite, &input, 1, &generated);
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].expression, "NOT ( a = 1 OR b = 2 )");
    }

    #[test]
    fn test_reused_metadata_is_combined() {
        let mut reference = finished("plain", "a = 1", false, false);
        let mut info = GenerationInfo::for_group("pool");
        info.cnt_and = 2;
        reference.generation_info = Some(info);
        let mut input = empty_input();
        let mut own = GenerationInfo::default();
        own.cnt_and = 1;
        input.generation_info = Some(own);

        let res = apply_reuse(&ReuseKind::Opaque, &input, 1, &[reference]);
        assert_eq!(
            res[0].generation_info.as_ref().expect("info present").cnt_and,
            3
        );
    }

    #[test]
    fn test_draws_are_unique_and_bounded() {
        let generated: Vec<SampleExpression> = (0..10)
            .map(|i| finished(&format!("id-{i}"), &format!("e{i} = {i}"), false, false))
            .collect();
        let res = apply_reuse(&ReuseKind::Opaque, &empty_input(), 3, &generated);
        assert_eq!(res.len(), 3);
        let distinct: std::collections::HashSet<_> =
            res.iter().map(|s| s.expression.clone()).collect();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn test_invalid_input_draws_single_reference() {
        let generated: Vec<SampleExpression> = (0..10)
            .map(|i| finished(&format!("id-{i}"), &format!("e{i} = {i}"), false, false))
            .collect();
        let mut input = empty_input();
        input.invalid = true;
        let res = apply_reuse(&ReuseKind::Opaque, &input, 5, &generated);
        assert_eq!(res.len(), 1);
    }
}
