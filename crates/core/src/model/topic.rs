use serde::{Deserialize, Serialize};

use crate::model::difficulty::DifficultyLevel;
use crate::model::ids::TopicId;

/// A topic with the number of questions available per difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSummary {
    pub topic_id: TopicId,
    pub topic_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub beginner_questions: u64,
    #[serde(default)]
    pub moderate_questions: u64,
    #[serde(default)]
    pub expert_questions: u64,
    #[serde(default)]
    pub total_questions: u64,
}

impl TopicSummary {
    #[must_use]
    pub fn available_for(&self, difficulty: DifficultyLevel) -> u64 {
        match difficulty {
            DifficultyLevel::Beginner => self.beginner_questions,
            DifficultyLevel::Moderate => self.moderate_questions,
            DifficultyLevel::Expert => self.expert_questions,
        }
    }
}
