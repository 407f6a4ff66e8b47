//! Shell dialects covered by the corpus.
use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target shell for a training example.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    Bash,
    Zsh,
    Powershell,
    Cmd,
    Fish,
    Tcsh,
}

impl Shell {
    /// Canonical order, also the order shell counts are allocated in.
    pub const ALL: [Shell; 6] = [
        Shell::Bash,
        Shell::Zsh,
        Shell::Powershell,
        Shell::Cmd,
        Shell::Fish,
        Shell::Tcsh,
    ];

    /// Return the stable string identifier used in JSON artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Powershell => "powershell",
            Shell::Cmd => "cmd",
            Shell::Fish => "fish",
            Shell::Tcsh => "tcsh",
        }
    }

    /// Shells whose quoting follows POSIX word splitting closely enough to lint.
    pub fn is_posix_like(&self) -> bool {
        matches!(self, Shell::Bash | Shell::Zsh | Shell::Fish | Shell::Tcsh)
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shell {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Shell::ALL
            .into_iter()
            .find(|shell| shell.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| anyhow!("unknown shell {value:?}"))
    }
}
