//! Corpus configuration.
//!
//! One immutable value carries every table the engine consults (shell weights,
//! error mixes, quality thresholds, split ratios) and is passed by reference
//! into each component, so nothing reads ambient global state.
use crate::shell::Shell;
use crate::types::{ErrorType, SegmentKind};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CorpusConfig {
    pub schema_version: u32,
    pub shell_weights: Vec<ShellWeight>,
    pub fallback_shell: Shell,
    pub max_single_char_ratio: f64,
    pub predefined_error_rate: f64,
    pub typo_rate: f64,
    pub max_attempts: usize,
    pub deficit_rounds: usize,
    pub split: SplitRatios,
    pub segments: Vec<SegmentConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ShellWeight {
    pub shell: Shell,
    pub weight: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ErrorWeight {
    pub kind: ErrorType,
    pub weight: f64,
}

/// Train/validation shares; test receives whatever remains.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SplitRatios {
    pub train: f64,
    pub validation: f64,
}

/// Extra natural-language pool mixed into a draw with an independent roll.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExtraPool {
    pub pool: String,
    pub probability: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SegmentConfig {
    pub kind: SegmentKind,
    pub target: usize,
    pub error_mix: Vec<ErrorWeight>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_pools: Vec<ExtraPool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_pool_styles: Vec<ErrorType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_pool_shells: Vec<Shell>,
}

impl CorpusConfig {
    /// Look up a segment's settings; validated configs always carry all four.
    pub fn segment(&self, kind: SegmentKind) -> Result<&SegmentConfig> {
        self.segments
            .iter()
            .find(|segment| segment.kind == kind)
            .ok_or_else(|| anyhow!("config has no segment {kind}"))
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        default_config()
    }
}

fn mix(entries: &[(ErrorType, f64)]) -> Vec<ErrorWeight> {
    entries
        .iter()
        .map(|(kind, weight)| ErrorWeight {
            kind: *kind,
            weight: *weight,
        })
        .collect()
}

fn default_categories() -> Vec<String> {
    [
        "navigation",
        "file_operations",
        "search",
        "processes",
        "network",
        "git",
        "packages",
        "compression",
        "text",
        "system",
        "docker",
        "kubernetes",
        "variables",
        "help",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_segments() -> Vec<SegmentConfig> {
    vec![
        SegmentConfig {
            kind: SegmentKind::SingleCommand,
            target: 35_000,
            error_mix: mix(&[
                (ErrorType::Typo, 0.15),
                (ErrorType::WrongFlag, 0.25),
                (ErrorType::Permission, 0.15),
                (ErrorType::Path, 0.20),
                (ErrorType::Syntax, 0.25),
            ]),
            categories: default_categories(),
            extra_pools: Vec::new(),
            extra_pool_styles: Vec::new(),
            extra_pool_shells: Vec::new(),
        },
        SegmentConfig {
            kind: SegmentKind::Chained,
            target: 35_000,
            error_mix: mix(&[
                (ErrorType::Pipe, 0.40),
                (ErrorType::Chaining, 0.30),
                (ErrorType::Redirection, 0.20),
                (ErrorType::Subshell, 0.10),
            ]),
            categories: Vec::new(),
            extra_pools: Vec::new(),
            extra_pool_styles: Vec::new(),
            extra_pool_shells: Vec::new(),
        },
        SegmentConfig {
            kind: SegmentKind::NaturalLanguage,
            target: 50_000,
            error_mix: mix(&[
                (ErrorType::Imperative, 0.40),
                (ErrorType::Question, 0.20),
                (ErrorType::Mixed, 0.25),
                (ErrorType::Intent, 0.15),
            ]),
            categories: Vec::new(),
            extra_pools: [
                ("git", 0.25),
                ("docker", 0.15),
                ("kubernetes", 0.20),
                ("workflow", 0.15),
                ("debug", 0.10),
            ]
            .into_iter()
            .map(|(pool, probability)| ExtraPool {
                pool: pool.to_string(),
                probability,
            })
            .collect(),
            extra_pool_styles: vec![ErrorType::Imperative, ErrorType::Intent],
            extra_pool_shells: vec![Shell::Bash, Shell::Zsh, Shell::Powershell],
        },
        SegmentConfig {
            kind: SegmentKind::TopTools,
            target: 30_000,
            error_mix: mix(&[(ErrorType::ToolSpecific, 1.0)]),
            categories: Vec::new(),
            extra_pools: Vec::new(),
            extra_pool_styles: Vec::new(),
            extra_pool_shells: Vec::new(),
        },
    ]
}

/// Build the default configuration.
pub fn default_config() -> CorpusConfig {
    CorpusConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        shell_weights: [
            (Shell::Bash, 0.35),
            (Shell::Zsh, 0.25),
            (Shell::Powershell, 0.20),
            (Shell::Cmd, 0.12),
            (Shell::Fish, 0.05),
            (Shell::Tcsh, 0.03),
        ]
        .into_iter()
        .map(|(shell, weight)| ShellWeight { shell, weight })
        .collect(),
        fallback_shell: Shell::Bash,
        max_single_char_ratio: 0.05,
        predefined_error_rate: 0.7,
        typo_rate: 0.15,
        max_attempts: 3,
        deficit_rounds: 3,
        split: SplitRatios {
            train: 0.90,
            validation: 0.05,
        },
        segments: default_segments(),
    }
}

/// Render the default config as pretty JSON, ready to be edited.
pub fn config_stub() -> Result<String> {
    let mut text =
        serde_json::to_string_pretty(&default_config()).context("serialize config stub")?;
    text.push('\n');
    Ok(text)
}

/// Load a config file and validate it.
pub fn load_config(path: &Path) -> Result<CorpusConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: CorpusConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse corpus config {}", path.display()))?;
    validate_config(&config).with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

/// Validate schema version, weight tables, ratios and segment settings.
pub fn validate_config(config: &CorpusConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported corpus config schema_version {}",
            config.schema_version
        ));
    }
    validate_shell_weights(config)?;
    validate_ratio(config.max_single_char_ratio, "max_single_char_ratio")?;
    validate_ratio(config.predefined_error_rate, "predefined_error_rate")?;
    validate_ratio(config.typo_rate, "typo_rate")?;
    validate_ratio(config.split.train, "split.train")?;
    validate_ratio(config.split.validation, "split.validation")?;
    if config.split.train + config.split.validation > 1.0 + WEIGHT_SUM_TOLERANCE {
        return Err(anyhow!(
            "split.train + split.validation must not exceed 1 (got {})",
            config.split.train + config.split.validation
        ));
    }
    if config.max_attempts == 0 {
        return Err(anyhow!("max_attempts must be at least 1"));
    }

    let mut seen = BTreeSet::new();
    for segment in &config.segments {
        if !seen.insert(segment.kind) {
            return Err(anyhow!("segment {} is configured more than once", segment.kind));
        }
        validate_segment(segment)?;
    }
    for kind in SegmentKind::ALL {
        if !seen.contains(&kind) {
            return Err(anyhow!("segment {kind} is missing from config"));
        }
    }
    Ok(())
}

fn validate_shell_weights(config: &CorpusConfig) -> Result<()> {
    if config.shell_weights.is_empty() {
        return Err(anyhow!("shell_weights must be non-empty"));
    }
    let mut seen = BTreeSet::new();
    let mut total = 0.0;
    for entry in &config.shell_weights {
        if !seen.insert(entry.shell) {
            return Err(anyhow!("shell {} is weighted more than once", entry.shell));
        }
        if entry.weight.is_nan() || entry.weight <= 0.0 {
            return Err(anyhow!(
                "shell weight for {} must be positive (got {})",
                entry.shell,
                entry.weight
            ));
        }
        total += entry.weight;
    }
    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(anyhow!("shell weights must sum to 1 (got {total})"));
    }
    if !seen.contains(&config.fallback_shell) {
        return Err(anyhow!(
            "fallback_shell {} has no shell weight",
            config.fallback_shell
        ));
    }
    Ok(())
}

fn validate_segment(segment: &SegmentConfig) -> Result<()> {
    if segment.error_mix.is_empty() {
        return Err(anyhow!("segment {} has an empty error_mix", segment.kind));
    }
    for entry in &segment.error_mix {
        if !entry.weight.is_finite() || entry.weight <= 0.0 {
            return Err(anyhow!(
                "segment {} error weight for {} must be positive (got {})",
                segment.kind,
                entry.kind,
                entry.weight
            ));
        }
    }
    for extra in &segment.extra_pools {
        validate_ratio(extra.probability, &format!("extra pool {}", extra.pool))?;
    }
    Ok(())
}

fn validate_ratio(value: f64, label: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(anyhow!("{label} must be within [0, 1] (got {value})"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
