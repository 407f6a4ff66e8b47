//! Command-line behavior of the `corpusgen` binary.

mod common;

use common::{run_corpusgen, stdout_ok};

#[test]
fn generate_writes_segments_and_splits() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run_corpusgen(
        dir.path(),
        &["generate", "--sample", "40", "--output-dir", "data/generated"],
    );
    let stdout = stdout_ok(&output);
    assert!(stdout.contains("Generating ds1_single"));
    assert!(stdout.contains("Generation complete!"));

    let generated = dir.path().join("data/generated");
    for stem in ["ds1_single", "ds2_chained", "ds3_natural_language", "ds4_tools"] {
        assert!(generated.join(format!("{stem}.jsonl")).is_file(), "{stem}");
        assert!(generated.join(format!("{stem}_analysis.jsonl")).is_file(), "{stem}");
    }
    let final_dir = dir.path().join("data/final");
    for split in ["train", "validation", "test"] {
        assert!(final_dir.join(format!("{split}.jsonl")).is_file(), "{split}");
    }

    let verify = run_corpusgen(dir.path(), &["verify", "data/generated", "--json"]);
    let summary: serde_json::Value =
        serde_json::from_str(&stdout_ok(&verify)).expect("verify json");
    assert_eq!(summary["passed"], true);
    assert_eq!(summary["total"], 160);
}

#[test]
fn single_dataset_skips_combining() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run_corpusgen(
        dir.path(),
        &[
            "generate",
            "--dataset",
            "ds2",
            "--sample",
            "30",
            "--output-dir",
            "out/generated",
        ],
    );
    stdout_ok(&output);
    assert!(dir.path().join("out/generated/ds2_chained.jsonl").is_file());
    assert!(!dir.path().join("out/generated/ds1_single.jsonl").exists());
    assert!(!dir.path().join("out/final").exists());
}

#[test]
fn verify_fails_on_null_corrections() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("ds4_tools_analysis.jsonl"),
        "{\"shell\":\"bash\",\"incorrect_command\":\"ls\",\"correct_command\":\"ls\"}\n",
    )
    .expect("write fixture");
    let output = run_corpusgen(dir.path(), &["verify", "."]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Null corrections: 1 [FAIL]"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().expect("tempdir");
    stdout_ok(&run_corpusgen(dir.path(), &["init", "--config", "corpus.json"]));
    let written = std::fs::read_to_string(dir.path().join("corpus.json")).expect("config");
    assert!(written.contains("\"schema_version\": 1"));

    let again = run_corpusgen(dir.path(), &["init", "--config", "corpus.json"]);
    assert!(!again.status.success());
    assert!(String::from_utf8_lossy(&again.stderr).contains("already exists"));

    stdout_ok(&run_corpusgen(
        dir.path(),
        &["init", "--config", "corpus.json", "--force"],
    ));
    let generate = run_corpusgen(
        dir.path(),
        &[
            "generate",
            "--config",
            "corpus.json",
            "--dataset",
            "ds4",
            "--sample",
            "10",
            "--output-dir",
            "gen",
        ],
    );
    stdout_ok(&generate);
}
