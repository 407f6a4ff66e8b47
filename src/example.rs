//! Training examples and their serialized projections.
use crate::quality;
use crate::shell::Shell;
use crate::types::ErrorType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One labelled (incorrect, correct) command pair.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TrainingExample {
    pub shell: Shell,
    pub incorrect_command: String,
    pub correct_command: String,
    pub category: String,
    pub error_type: ErrorType,
    pub source: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Three-turn chat projection used for training files.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ChatExample {
    pub messages: Vec<ChatMessage>,
}

impl TrainingExample {
    pub fn new(
        shell: Shell,
        incorrect: &str,
        correct: &str,
        category: &str,
        error_type: ErrorType,
        source: &str,
    ) -> Self {
        Self {
            shell,
            incorrect_command: incorrect.to_string(),
            correct_command: correct.to_string(),
            category: category.to_string(),
            error_type,
            source: source.to_string(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn is_single_char(&self) -> bool {
        quality::is_single_char_correction(&self.incorrect_command, &self.correct_command)
    }

    pub fn is_null(&self) -> bool {
        quality::is_null(&self.incorrect_command, &self.correct_command)
    }

    /// Flat projection carrying every field.
    pub fn analysis(&self) -> serde_json::Value {
        serde_json::json!({
            "shell": self.shell,
            "incorrect_command": self.incorrect_command,
            "correct_command": self.correct_command,
            "category": self.category,
            "error_type": self.error_type,
            "source": self.source,
            "metadata": self.metadata,
        })
    }

    pub fn to_chat(&self) -> ChatExample {
        ChatExample {
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: system_prompt(self.shell),
                },
                ChatMessage {
                    role: Role::User,
                    content: self.incorrect_command.clone(),
                },
                ChatMessage {
                    role: Role::Assistant,
                    content: self.correct_command.clone(),
                },
            ],
        }
    }
}

pub fn system_prompt(shell: Shell) -> String {
    format!("You are a shell command corrector for {shell}. Output only the corrected command.")
}
