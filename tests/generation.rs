//! End-to-end generation tests: template groups in, finished corpora out.

use sample_forge::export::{
    read_sample_groups_from_json_file, write_group_catalog_to_json_file,
    write_sample_groups_to_json_file,
};
use sample_forge::plan::generate_samples;
use sample_forge::sample::{SampleExpression, SampleExpressionGroup};

fn template(id: &str, expression: &str) -> SampleExpression {
    SampleExpression::new(id, format!("label {id}"), expression).expect("valid template")
}

fn template_group(name: &str, samples: Vec<SampleExpression>) -> SampleExpressionGroup {
    SampleExpressionGroup::new(name, samples).expect("valid group")
}

fn demo_template_groups() -> Vec<SampleExpressionGroup> {
    vec![
        template_group(
            "basic",
            vec![
                template("eq", "${ARG_NAME}~${OP}~${ARG_VALUE}"),
                template("all", "${ALL}"),
                template("is-unknown", "${ARG_NAME}~${IS}~${UNKNOWN}"),
            ],
        ),
        template_group(
            "combined",
            vec![
                template("and-pair", "${EXPRESSION!:eq} ${AND!} ${EXPRESSION!:eq}"),
                template("not-any", "${NOT}_${EXPRESSION:basic}"),
            ],
        ),
    ]
}

#[test]
fn test_generation_is_fully_deterministic() {
    let groups = demo_template_groups();
    let first = generate_samples(&groups).expect("generation succeeds");
    let second = generate_samples(&groups).expect("generation succeeds");

    let first_json = serde_json::to_string_pretty(&first).expect("serializable");
    let second_json = serde_json::to_string_pretty(&second).expect("serializable");
    assert_eq!(first_json, second_json);
}

#[test]
fn test_generated_ids_carry_fingerprint_suffix() {
    let results =
        generate_samples(&demo_template_groups()).expect("generation succeeds");
    for group in &results {
        for sample in &group.samples {
            let (prefix, suffix) = sample
                .id
                .rsplit_once('_')
                .expect("finalized id has a suffix");
            assert!(!prefix.is_empty());
            assert!(!suffix.is_empty());
            assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
            assert!(
                suffix.chars().all(|c| !c.is_ascii_uppercase()),
                "suffix must be lowercase hex: {}",
                sample.id
            );
        }
    }
}

#[test]
fn test_every_sample_is_tagged_with_its_group() {
    let results =
        generate_samples(&demo_template_groups()).expect("generation succeeds");
    for group in &results {
        for sample in &group.samples {
            assert_eq!(sample.group(), Some(group.group.as_str()));
        }
    }
}

#[test]
fn test_cross_group_reuse_embeds_earlier_output() {
    let results =
        generate_samples(&demo_template_groups()).expect("generation succeeds");
    let combined = &results[1];
    let and_pair = combined
        .samples
        .iter()
        .find(|s| s.id.starts_with("and-pair_"))
        .expect("and-pair sample present");
    assert!(!and_pair.invalid);
    assert!(and_pair.expression.contains(" AND "));
    let info = and_pair.generation_info.as_ref().expect("info present");
    assert_eq!(info.cnt_and, 1);
}

#[test]
fn test_metadata_counts_reflect_expression_content() {
    let results = generate_samples(&[template_group(
        "basic",
        vec![template("is-unknown", "${ARG_NAME!} ${IS!} ${UNKNOWN!}")],
    )])
    .expect("generation succeeds");
    assert_eq!(results[0].samples.len(), 1);
    let sample = &results[0].samples[0];
    assert_eq!(sample.expression, "argName IS UNKNOWN");
    let info = sample.generation_info.as_ref().expect("info present");
    assert_eq!(info.cnt_is, 1);
    assert_eq!(info.cnt_unknown, 1);
    assert_eq!(info.arg_names, Some(vec!["argName".to_string()]));
}

#[test]
fn test_unresolvable_reference_produces_flagged_sample_not_error() {
    let results = generate_samples(&[template_group(
        "lonely",
        vec![template("orphan", "${COMPOSITE_EXPRESSION!}")],
    )])
    .expect("generation still succeeds");
    assert_eq!(results[0].samples.len(), 1);
    assert!(results[0].samples[0].invalid);
    assert!(results[0].samples[0].skip);
}

#[test]
fn test_skipped_templates_leave_no_trace_in_output() {
    let mut inactive = template("ignored", "${ALL}");
    inactive.skip = true;
    let results = generate_samples(&[template_group(
        "basic",
        vec![template("eq", "a = 1"), inactive],
    )])
    .expect("generation succeeds");
    assert_eq!(results[0].samples.len(), 1);
    assert!(results[0].samples[0].id.starts_with("eq_"));
}

#[test]
fn test_export_round_trip_preserves_generated_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let samples_path = dir.path().join("samples.json");
    let catalog_path = dir.path().join("catalog.json");

    let results =
        generate_samples(&demo_template_groups()).expect("generation succeeds");
    write_sample_groups_to_json_file(&results, &samples_path).expect("write succeeds");
    write_group_catalog_to_json_file(&results, &catalog_path).expect("catalog write succeeds");

    let restored = read_sample_groups_from_json_file(&samples_path).expect("read succeeds");
    assert_eq!(
        serde_json::to_string(&results).expect("serializable"),
        serde_json::to_string(&restored).expect("serializable")
    );

    let catalog: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(&catalog_path).expect("catalog readable"),
    )
    .expect("valid json");
    let total: u64 = results.iter().map(|g| g.samples.len() as u64).sum();
    assert_eq!(catalog["numberOfGroups"], 2);
    assert_eq!(catalog["numberOfSamples"], total);
}

#[test]
fn test_generated_groups_can_be_fed_back_as_templates() {
    // a generated corpus is itself a valid template input: literal
    // expressions without instruction markers expand to themselves
    let results = generate_samples(&[template_group(
        "basic",
        vec![template("eq", "a ${OP!} 1")],
    )])
    .expect("generation succeeds");
    let literal = &results[0].samples[0];
    assert_eq!(literal.expression, "a = 1");

    let regenerated = generate_samples(&results).expect("second pass succeeds");
    assert_eq!(regenerated[0].samples[0].expression, "a = 1");
}
