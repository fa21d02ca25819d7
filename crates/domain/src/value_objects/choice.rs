//! Interactive choices raised by content.

use serde::{Deserialize, Serialize};

use super::content::{CellPosition, ContentRef};
use crate::error::DomainError;

/// How a pending choice accepts answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum ChoiceSpec {
    /// One of a fixed set of labels.
    Options(Vec<String>),
    /// Any non-empty text.
    Freeform,
}

/// The validated answer to a pending choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAnswer {
    /// Canonical label for option answers, trimmed text for freeform.
    pub label: String,
    /// Option index, `None` for freeform.
    pub index: Option<usize>,
}

/// An unresolved decision that blocks rolling and moving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChoice {
    source: ContentRef,
    cell: Option<CellPosition>,
    prompt: String,
    spec: ChoiceSpec,
}

impl PendingChoice {
    pub fn new(source: ContentRef, prompt: impl Into<String>, spec: ChoiceSpec) -> Self {
        Self {
            source,
            cell: None,
            prompt: prompt.into(),
            spec,
        }
    }

    pub fn with_cell(mut self, cell: CellPosition) -> Self {
        self.cell = Some(cell);
        self
    }

    pub fn source(&self) -> ContentRef {
        self.source
    }

    pub fn cell(&self) -> Option<CellPosition> {
        self.cell
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn spec(&self) -> &ChoiceSpec {
        &self.spec
    }

    pub fn options(&self) -> &[String] {
        match &self.spec {
            ChoiceSpec::Options(options) => options,
            ChoiceSpec::Freeform => &[],
        }
    }

    /// Validate `answer` against this choice.
    ///
    /// Option matching ignores case, whitespace and punctuation. A trailing
    /// parenthesised annotation on an option ("Walk around (costs 5)") may
    /// be omitted by the player.
    pub fn accept(&self, answer: &str) -> Result<ResolvedAnswer, DomainError> {
        let normalized = normalize_answer(answer);
        if normalized.is_empty() {
            return Err(DomainError::validation("answer cannot be empty"));
        }

        match &self.spec {
            ChoiceSpec::Freeform => Ok(ResolvedAnswer {
                label: answer.trim().to_string(),
                index: None,
            }),
            ChoiceSpec::Options(options) => options
                .iter()
                .enumerate()
                .find(|(_, option)| {
                    normalize_answer(option) == normalized
                        || normalize_answer(strip_annotation(option)) == normalized
                })
                .map(|(index, option)| ResolvedAnswer {
                    label: option.clone(),
                    index: Some(index),
                })
                .ok_or_else(|| {
                    DomainError::validation(format!(
                        "'{}' is not one of: {}",
                        answer.trim(),
                        options.join(" / ")
                    ))
                }),
        }
    }
}

/// Lowercase and drop everything that is not a letter or digit.
pub fn normalize_answer(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn strip_annotation(option: &str) -> &str {
    let trimmed = option.trim_end();
    for (open, close) in [('(', ')'), ('（', '）')] {
        if trimmed.ends_with(close) {
            if let Some(start) = trimmed.rfind(open) {
                return &trimmed[..start];
            }
        }
    }
    trimmed
}
