//! Shared helpers for integration tests.

use cmd_corpus::catalog::Catalogs;
use cmd_corpus::config::{default_config, CorpusConfig};
use std::path::Path;
use std::process::{Command, Output};

#[allow(dead_code)]
pub fn config() -> CorpusConfig {
    default_config()
}

#[allow(dead_code)]
pub fn catalogs() -> Catalogs {
    Catalogs::embedded().expect("embedded catalogs")
}

/// Run the `corpusgen` binary with `args`, using `cwd` as working directory.
#[allow(dead_code)]
pub fn run_corpusgen(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_corpusgen"))
        .args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "warn")
        .output()
        .expect("spawn corpusgen")
}

/// Stdout of a finished run, panicking with stderr when it failed.
#[allow(dead_code)]
pub fn stdout_ok(output: &Output) -> String {
    assert!(
        output.status.success(),
        "corpusgen failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}
