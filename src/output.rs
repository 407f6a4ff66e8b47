//! JSON-lines writers for segment files and final splits.
//!
//! Every file is written in one shot from a fully built buffer; parent
//! directories are created on demand.
use crate::corpus::{SegmentOutput, Splits};
use crate::example::TrainingExample;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Paths written for one segment.
#[derive(Debug, Clone)]
pub struct SegmentFiles {
    pub chat: PathBuf,
    pub analysis: PathBuf,
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Serialize each record as one compact JSON line.
pub fn write_jsonl<T: Serialize>(path: &Path, records: impl IntoIterator<Item = T>) -> Result<()> {
    let mut buf = Vec::new();
    for record in records {
        serde_json::to_writer(&mut buf, &record)
            .with_context(|| format!("serialize record for {}", path.display()))?;
        buf.push(b'\n');
    }
    write_bytes(path, &buf)
}

pub fn write_chat(path: &Path, examples: &[TrainingExample]) -> Result<()> {
    write_jsonl(path, examples.iter().map(TrainingExample::to_chat))
}

pub fn write_analysis(path: &Path, examples: &[TrainingExample]) -> Result<()> {
    write_jsonl(path, examples.iter().map(TrainingExample::analysis))
}

/// Write `<stem>.jsonl` and `<stem>_analysis.jsonl` under `dir`.
pub fn write_segment(dir: &Path, segment: &SegmentOutput) -> Result<SegmentFiles> {
    let stem = segment.kind.file_stem();
    let files = SegmentFiles {
        chat: dir.join(format!("{stem}.jsonl")),
        analysis: dir.join(format!("{stem}_analysis.jsonl")),
    };
    write_chat(&files.chat, &segment.examples)?;
    write_analysis(&files.analysis, &segment.examples)?;
    Ok(files)
}

/// Write `train.jsonl`, `validation.jsonl` and `test.jsonl` (chat projection).
pub fn write_splits(final_dir: &Path, splits: &Splits) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (name, part) in splits.parts() {
        let path = final_dir.join(format!("{name}.jsonl"));
        write_chat(&path, part)?;
        written.push(path);
    }
    Ok(written)
}

pub fn count_lines(path: &Path) -> Result<usize> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(text.lines().filter(|line| !line.trim().is_empty()).count())
}

/// `.jsonl` files directly under `dir`, sorted by name.
pub fn jsonl_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "jsonl") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::Shell;
    use crate::types::{ErrorType, SegmentKind};

    fn examples(n: usize) -> Vec<TrainingExample> {
        (0..n)
            .map(|i| {
                TrainingExample::new(
                    Shell::Fish,
                    &format!("gerp -r todo src{i}"),
                    &format!("grep -r todo src{i}"),
                    "tools_text_processing",
                    ErrorType::ToolSpecific,
                    "tools_pattern",
                )
            })
            .collect()
    }

    #[test]
    fn segment_files_hold_both_projections() {
        let dir = tempfile::tempdir().expect("tempdir");
        let segment = SegmentOutput {
            kind: SegmentKind::TopTools,
            examples: examples(4),
        };
        let files = write_segment(&dir.path().join("generated"), &segment).expect("write");
        assert!(files.chat.ends_with("ds4_tools.jsonl"));
        assert!(files.analysis.ends_with("ds4_tools_analysis.jsonl"));
        assert_eq!(count_lines(&files.chat).expect("count"), 4);

        let chat = fs::read_to_string(&files.chat).expect("read chat");
        let first: serde_json::Value =
            serde_json::from_str(chat.lines().next().expect("line")).expect("parse");
        assert_eq!(first["messages"][1]["content"], "gerp -r todo src0");

        let analysis = fs::read_to_string(&files.analysis).expect("read analysis");
        let parsed: Vec<TrainingExample> = analysis
            .lines()
            .map(|line| serde_json::from_str(line).expect("parse analysis"))
            .collect();
        assert_eq!(parsed, segment.examples);
    }

    #[test]
    fn splits_are_written_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let splits = Splits {
            train: examples(3),
            validation: examples(1),
            test: Vec::new(),
        };
        let written = write_splits(dir.path(), &splits).expect("write splits");
        let names: Vec<_> = written
            .iter()
            .map(|path| path.file_name().expect("name").to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["train.jsonl", "validation.jsonl", "test.jsonl"]);
        assert_eq!(count_lines(&written[0]).expect("count"), 3);
        assert_eq!(count_lines(&written[2]).expect("count"), 0);
        assert_eq!(jsonl_files(dir.path()).expect("list").len(), 3);
    }
}
