//! Shared identifiers for corpus segments and error classes.
//!
//! These values appear in config, catalogs and every emitted example, so their
//! string forms are part of the on-disk format.
use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four corpus partitions.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    SingleCommand,
    Chained,
    NaturalLanguage,
    TopTools,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 4] = [
        SegmentKind::SingleCommand,
        SegmentKind::Chained,
        SegmentKind::NaturalLanguage,
        SegmentKind::TopTools,
    ];

    /// Return the stable string identifier used in JSON artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::SingleCommand => "single_command",
            SegmentKind::Chained => "chained",
            SegmentKind::NaturalLanguage => "natural_language",
            SegmentKind::TopTools => "top_tools",
        }
    }

    /// File stem for the segment's output files.
    pub fn file_stem(&self) -> &'static str {
        match self {
            SegmentKind::SingleCommand => "ds1_single",
            SegmentKind::Chained => "ds2_chained",
            SegmentKind::NaturalLanguage => "ds3_natural_language",
            SegmentKind::TopTools => "ds4_tools",
        }
    }

    /// Short alias accepted on the command line.
    pub fn alias(&self) -> &'static str {
        match self {
            SegmentKind::SingleCommand => "ds1",
            SegmentKind::Chained => "ds2",
            SegmentKind::NaturalLanguage => "ds3",
            SegmentKind::TopTools => "ds4",
        }
    }

    /// Value written to `source` on every example of the segment.
    pub fn source_label(&self) -> &'static str {
        match self {
            SegmentKind::SingleCommand => "template",
            SegmentKind::Chained => "chained_pattern",
            SegmentKind::NaturalLanguage => "nl_pattern",
            SegmentKind::TopTools => "tools_pattern",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SegmentKind::SingleCommand => "Single command corrections (typos, wrong flags, etc.)",
            SegmentKind::Chained => "Chained and piped command corrections",
            SegmentKind::NaturalLanguage => "Natural language to command translations",
            SegmentKind::TopTools => "Top CLI tools corrections",
        }
    }

    /// Expected share of a combined corpus, in percent.
    pub fn target_share_pct(&self) -> f64 {
        match self {
            SegmentKind::SingleCommand => 23.3,
            SegmentKind::Chained => 23.3,
            SegmentKind::NaturalLanguage => 33.3,
            SegmentKind::TopTools => 20.0,
        }
    }

    pub fn from_file_stem(stem: &str) -> Option<SegmentKind> {
        SegmentKind::ALL
            .into_iter()
            .find(|kind| kind.file_stem() == stem)
    }

    pub fn from_alias(alias: &str) -> Option<SegmentKind> {
        SegmentKind::ALL.into_iter().find(|kind| kind.alias() == alias)
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error class recorded as `error_type` on an example.
///
/// Single-command, chained and natural-language segments each draw from their
/// own subset; top-tools examples are always `ToolSpecific`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    Typo,
    WrongFlag,
    Permission,
    Path,
    Syntax,
    Pipe,
    Chaining,
    Redirection,
    Subshell,
    Imperative,
    Question,
    Mixed,
    Intent,
    ToolSpecific,
}

impl ErrorType {
    /// Return the stable string identifier used in JSON artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Typo => "typo",
            ErrorType::WrongFlag => "wrong_flag",
            ErrorType::Permission => "permission",
            ErrorType::Path => "path",
            ErrorType::Syntax => "syntax",
            ErrorType::Pipe => "pipe",
            ErrorType::Chaining => "chaining",
            ErrorType::Redirection => "redirection",
            ErrorType::Subshell => "subshell",
            ErrorType::Imperative => "imperative",
            ErrorType::Question => "question",
            ErrorType::Mixed => "mixed",
            ErrorType::Intent => "intent",
            ErrorType::ToolSpecific => "tool_specific",
        }
    }
}

impl ErrorType {
    pub const ALL: [ErrorType; 14] = [
        ErrorType::Typo,
        ErrorType::WrongFlag,
        ErrorType::Permission,
        ErrorType::Path,
        ErrorType::Syntax,
        ErrorType::Pipe,
        ErrorType::Chaining,
        ErrorType::Redirection,
        ErrorType::Subshell,
        ErrorType::Imperative,
        ErrorType::Question,
        ErrorType::Mixed,
        ErrorType::Intent,
        ErrorType::ToolSpecific,
    ];
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ErrorType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| anyhow!("unknown error type {value:?}"))
    }
}
