use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::difficulty::DifficultyLevel;
use crate::model::ids::{OptionId, QuestionId, TopicId};
use crate::model::wire::null_as_false;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AdminRequestError {
    #[error("topic name must be between {min} and {max} characters")]
    TopicName { min: usize, max: usize },

    #[error("question text is required")]
    EmptyQuestion,

    #[error("option text is required")]
    EmptyOption,

    #[error("a question needs between {min} and {max} options, got {got}")]
    OptionCount { min: usize, max: usize, got: usize },

    #[error("exactly one option must be marked as correct")]
    CorrectOptions,

    #[error("topic id must be positive")]
    InvalidTopic,
}

//
// ─── REQUESTS ──────────────────────────────────────────────────────────────────
//

/// Body of the topic create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicRequest {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl TopicRequest {
    pub const NAME_MIN: usize = 2;
    pub const NAME_MAX: usize = 100;

    /// # Errors
    ///
    /// Returns `AdminRequestError::TopicName` when the trimmed name is outside
    /// [`TopicRequest::NAME_MIN`, `TopicRequest::NAME_MAX`] characters.
    pub fn new(name: &str, description: Option<&str>) -> Result<Self, AdminRequestError> {
        let name = name.trim();
        let length = name.chars().count();
        if !(Self::NAME_MIN..=Self::NAME_MAX).contains(&length) {
            return Err(AdminRequestError::TopicName {
                min: Self::NAME_MIN,
                max: Self::NAME_MAX,
            });
        }
        Ok(Self {
            name: name.to_owned(),
            description: description
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_owned),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionRequest {
    pub option_text: String,
    pub is_correct: bool,
}

impl OptionRequest {
    #[must_use]
    pub fn new(option_text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            option_text: option_text.into(),
            is_correct,
        }
    }
}

/// Body of the question create and update calls.
///
/// Always carries between [`QuestionRequest::MIN_OPTIONS`] and
/// [`QuestionRequest::MAX_OPTIONS`] options, exactly one of them correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    topic_id: TopicId,
    question_text: String,
    difficulty_level: DifficultyLevel,
    options: Vec<OptionRequest>,
}

impl QuestionRequest {
    pub const MIN_OPTIONS: usize = 2;
    pub const MAX_OPTIONS: usize = 6;

    /// # Errors
    ///
    /// Returns the first rule the question breaks: a zero topic id, blank
    /// question or option text, an option count out of range, or anything
    /// other than one correct option.
    pub fn new(
        topic_id: TopicId,
        question_text: &str,
        difficulty_level: DifficultyLevel,
        options: Vec<OptionRequest>,
    ) -> Result<Self, AdminRequestError> {
        if topic_id.value() == 0 {
            return Err(AdminRequestError::InvalidTopic);
        }
        let question_text = question_text.trim();
        if question_text.is_empty() {
            return Err(AdminRequestError::EmptyQuestion);
        }
        if !(Self::MIN_OPTIONS..=Self::MAX_OPTIONS).contains(&options.len()) {
            return Err(AdminRequestError::OptionCount {
                min: Self::MIN_OPTIONS,
                max: Self::MAX_OPTIONS,
                got: options.len(),
            });
        }
        if options.iter().any(|o| o.option_text.trim().is_empty()) {
            return Err(AdminRequestError::EmptyOption);
        }
        if options.iter().filter(|o| o.is_correct).count() != 1 {
            return Err(AdminRequestError::CorrectOptions);
        }

        Ok(Self {
            topic_id,
            question_text: question_text.to_owned(),
            difficulty_level,
            options,
        })
    }

    #[must_use]
    pub fn topic_id(&self) -> TopicId {
        self.topic_id
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn difficulty_level(&self) -> DifficultyLevel {
        self.difficulty_level
    }

    #[must_use]
    pub fn options(&self) -> &[OptionRequest] {
        &self.options
    }
}

//
// ─── RESPONSES ─────────────────────────────────────────────────────────────────
//

/// A topic as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminTopic {
    pub id: TopicId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOption {
    pub id: OptionId,
    pub option_text: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_correct: bool,
}

/// A question with its answer key, as the admin endpoints return it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminQuestion {
    pub id: QuestionId,
    pub question_text: String,
    #[serde(default)]
    pub topic_name: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<DifficultyLevel>,
    #[serde(default)]
    pub options: Vec<AdminOption>,
}

impl AdminQuestion {
    #[must_use]
    pub fn correct_option(&self) -> Option<&AdminOption> {
        self.options.iter().find(|option| option.is_correct)
    }
}
