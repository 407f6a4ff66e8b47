use super::*;

#[test]
fn default_config_validates() {
    let config = default_config();
    validate_config(&config).expect("default config is valid");
    assert_eq!(config.segment(SegmentKind::Chained).unwrap().target, 35_000);
    assert_eq!(config.fallback_shell, Shell::Bash);
}

#[test]
fn config_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("corpus.json");
    std::fs::write(&path, config_stub().expect("stub")).expect("write config");
    let loaded = load_config(&path).expect("load config");
    assert_eq!(loaded, default_config());
}

#[test]
fn config_stub_parses_back_to_defaults() {
    let stub = config_stub().expect("render stub");
    assert!(stub.ends_with('\n'));
    assert!(stub.contains("\"schema_version\": 1"));
    let parsed: CorpusConfig = serde_json::from_str(&stub).expect("parse stub");
    validate_config(&parsed).expect("stub validates");
    assert_eq!(parsed, default_config());
}

#[test]
fn rejects_unknown_schema_version() {
    let mut config = default_config();
    config.schema_version = 7;
    let err = validate_config(&config).expect_err("schema version rejected");
    assert!(err.to_string().contains("schema_version 7"));
}

#[test]
fn rejects_weights_that_do_not_sum_to_one() {
    let mut config = default_config();
    config.shell_weights[0].weight = 0.5;
    let err = validate_config(&config).expect_err("weights rejected");
    assert!(err.to_string().contains("sum to 1"));
}

#[test]
fn rejects_fallback_shell_without_weight() {
    let mut config = default_config();
    config.shell_weights.retain(|entry| entry.shell != Shell::Tcsh);
    config.shell_weights[0].weight += 0.03;
    config.fallback_shell = Shell::Tcsh;
    let err = validate_config(&config).expect_err("fallback rejected");
    assert!(err.to_string().contains("fallback_shell tcsh"));
}

#[test]
fn rejects_overlapping_split_ratios() {
    let mut config = default_config();
    config.split.validation = 0.2;
    let err = validate_config(&config).expect_err("split rejected");
    assert!(err.to_string().contains("must not exceed 1"));
}

#[test]
fn rejects_missing_and_duplicate_segments() {
    let mut config = default_config();
    config.segments.pop();
    let err = validate_config(&config).expect_err("missing segment rejected");
    assert!(err.to_string().contains("top_tools is missing"));

    let mut config = default_config();
    let duplicate = config.segments[0].clone();
    config.segments.push(duplicate);
    let err = validate_config(&config).expect_err("duplicate segment rejected");
    assert!(err.to_string().contains("more than once"));
}

#[test]
fn rejects_empty_error_mix() {
    let mut config = default_config();
    config.segments[1].error_mix.clear();
    let err = validate_config(&config).expect_err("empty mix rejected");
    assert!(err.to_string().contains("empty error_mix"));
}

#[test]
fn unknown_fields_fail_to_parse() {
    let mut value = serde_json::to_value(default_config()).expect("serialize config");
    value["surprise"] = serde_json::json!(true);
    assert!(serde_json::from_value::<CorpusConfig>(value).is_err());
}
