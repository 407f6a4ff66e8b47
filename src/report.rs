//! Post-hoc verification of a generated corpus directory.
//!
//! Reads every `*_analysis.jsonl` file and measures the same quality
//! properties the generator enforces: null corrections, the single-character
//! share, and how segments and shells are distributed.
use crate::output;
use crate::quality;
use crate::types::SegmentKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Single-character share at or above which the corpus fails.
pub const MAX_SINGLE_CHAR_PCT: f64 = 5.0;

const ANALYSIS_SUFFIX: &str = "_analysis";

#[derive(Debug, Deserialize)]
struct AnalysisRecord {
    #[serde(default)]
    incorrect_command: String,
    #[serde(default)]
    correct_command: String,
    #[serde(default = "unknown_shell")]
    shell: String,
}

fn unknown_shell() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SegmentStats {
    pub total: usize,
    pub single_char: usize,
    pub null_corrections: usize,
    pub shells: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Check {
    pub name: String,
    pub value: f64,
    pub target: String,
    pub passed: bool,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Report {
    pub total: usize,
    pub single_char: usize,
    pub null_corrections: usize,
    /// Keyed by file stem without the analysis suffix.
    pub by_segment: BTreeMap<String, SegmentStats>,
    pub by_shell: BTreeMap<String, usize>,
}

/// Segments whose single-character corrections count toward the check.
fn counts_single_char(stem: &str) -> bool {
    matches!(
        SegmentKind::from_file_stem(stem),
        Some(SegmentKind::SingleCommand | SegmentKind::TopTools)
    )
}

fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Scan `dir` for analysis files and collect statistics.
pub fn analyze_dir(dir: &Path) -> Result<Report> {
    let mut report = Report::default();
    for path in output::jsonl_files(dir)? {
        let Some(stem) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.strip_suffix(ANALYSIS_SUFFIX))
        else {
            continue;
        };
        let text = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let stats = analyze_segment(stem, &text)
            .with_context(|| format!("analyze {}", path.display()))?;
        report.absorb(stem, stats);
    }
    Ok(report)
}

fn analyze_segment(stem: &str, text: &str) -> Result<SegmentStats> {
    let count_single = counts_single_char(stem);
    let mut stats = SegmentStats::default();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: AnalysisRecord =
            serde_json::from_str(line).with_context(|| format!("parse line {}", idx + 1))?;
        stats.total += 1;
        *stats.shells.entry(record.shell).or_default() += 1;
        if quality::is_null(&record.incorrect_command, &record.correct_command) {
            stats.null_corrections += 1;
        }
        if count_single
            && quality::is_single_char_correction(&record.incorrect_command, &record.correct_command)
        {
            stats.single_char += 1;
        }
    }
    Ok(stats)
}

impl Report {
    fn absorb(&mut self, stem: &str, stats: SegmentStats) {
        self.total += stats.total;
        self.single_char += stats.single_char;
        self.null_corrections += stats.null_corrections;
        for (shell, count) in &stats.shells {
            *self.by_shell.entry(shell.clone()).or_default() += count;
        }
        self.by_segment.insert(stem.to_string(), stats);
    }

    pub fn single_char_pct(&self) -> f64 {
        pct(self.single_char, self.total)
    }

    pub fn checks(&self) -> Vec<Check> {
        let mut checks = Vec::new();
        if self.total > 0 {
            let share = self.single_char_pct();
            checks.push(Check {
                name: "single_char_corrections".to_string(),
                value: share,
                target: format!("< {MAX_SINGLE_CHAR_PCT}%"),
                passed: share < MAX_SINGLE_CHAR_PCT,
            });
        }
        checks.push(Check {
            name: "null_corrections".to_string(),
            value: self.null_corrections as f64,
            target: "0".to_string(),
            passed: self.null_corrections == 0,
        });
        checks
    }

    pub fn passed(&self) -> bool {
        self.checks().iter().all(|check| check.passed)
    }

    /// Shells ordered by descending count, ties by name.
    pub fn shells_by_count(&self) -> Vec<(&str, usize)> {
        let mut shells: Vec<(&str, usize)> = self
            .by_shell
            .iter()
            .map(|(shell, count)| (shell.as_str(), *count))
            .collect();
        shells.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        shells
    }

    pub fn summary_json(&self) -> serde_json::Value {
        serde_json::json!({
            "passed": self.passed(),
            "total": self.total,
            "single_char": self.single_char,
            "single_char_pct": self.single_char_pct(),
            "null_corrections": self.null_corrections,
            "checks": self.checks(),
            "by_segment": self.by_segment,
            "by_shell": self.by_shell,
        })
    }

    pub fn render_text(&self) -> String {
        let rule = "=".repeat(60);
        let thin = "-".repeat(60);
        let mut out = String::new();
        let _ = writeln!(out, "{rule}\nDATASET VERIFICATION REPORT\n{rule}");
        let _ = writeln!(out, "\nTotal examples: {}", self.total);

        for check in self.checks() {
            let status = if check.passed { "PASS" } else { "FAIL" };
            match check.name.as_str() {
                "single_char_corrections" => {
                    let _ = writeln!(
                        out,
                        "\nSingle-char corrections: {} ({:.2}%) [{status}]\n  Target: {}",
                        self.single_char, check.value, check.target
                    );
                }
                _ => {
                    let _ = writeln!(
                        out,
                        "\nNull corrections: {} [{status}]\n  Target: {}",
                        self.null_corrections, check.target
                    );
                }
            }
        }

        let _ = writeln!(out, "\n{thin}\nDATASET DISTRIBUTION\n{thin}");
        for kind in SegmentKind::ALL {
            let stem = kind.file_stem();
            let stats = self.by_segment.get(stem).cloned().unwrap_or_default();
            let _ = writeln!(
                out,
                "\n{stem}: {} ({:.1}%)\n  {}\n  Target: ~{}%",
                stats.total,
                pct(stats.total, self.total),
                kind.description(),
                kind.target_share_pct()
            );
            if stats.null_corrections > 0 {
                let _ = writeln!(out, "  WARNING: {} null corrections", stats.null_corrections);
            }
            if stats.single_char > 0 {
                let _ = writeln!(
                    out,
                    "  Single-char: {} ({:.2}%)",
                    stats.single_char,
                    pct(stats.single_char, stats.total)
                );
            }
        }

        let _ = writeln!(out, "\n{thin}\nSHELL DISTRIBUTION\n{thin}");
        for (shell, count) in self.shells_by_count() {
            let _ = writeln!(out, "  {shell}: {count} ({:.1}%)", pct(count, self.total));
        }

        let verdict = if self.passed() {
            "ALL CHECKS PASSED"
        } else {
            "SOME CHECKS FAILED - See details above"
        };
        let _ = writeln!(out, "\n{rule}\n{verdict}\n{rule}");
        out
    }
}
