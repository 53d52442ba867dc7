use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::difficulty::DifficultyLevel;
use crate::model::ids::TopicId;
use crate::model::topic::TopicSummary;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizRequestError {
    #[error("at least one topic must be selected")]
    NoTopics,

    #[error("topic id must be positive")]
    InvalidTopic,
}

//
// ─── QUESTION COUNT ────────────────────────────────────────────────────────────
//

/// Number of questions requested for a quiz, always within
/// [`QuestionCount::MIN`, `QuestionCount::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct QuestionCount(u32);

impl QuestionCount {
    pub const MIN: u32 = 10;
    pub const MAX: u32 = 50;

    /// Clamps `value` into the allowed range.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn incremented(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    #[must_use]
    pub fn decremented(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }
}

impl Default for QuestionCount {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl From<u32> for QuestionCount {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<QuestionCount> for u32 {
    fn from(value: QuestionCount) -> Self {
        value.0
    }
}

//
// ─── QUIZ REQUEST ──────────────────────────────────────────────────────────────
//

/// Parameters of a quiz generation request.
///
/// Topics keep their selection order; duplicates are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    topic_ids: Vec<TopicId>,
    difficulty_level: DifficultyLevel,
    #[serde(rename = "numberOfQuestions")]
    question_count: QuestionCount,
}

impl QuizRequest {
    /// # Errors
    ///
    /// Returns `QuizRequestError::NoTopics` for an empty topic list and
    /// `QuizRequestError::InvalidTopic` if any id is zero.
    pub fn new(
        topic_ids: impl IntoIterator<Item = TopicId>,
        difficulty_level: DifficultyLevel,
        question_count: QuestionCount,
    ) -> Result<Self, QuizRequestError> {
        let mut unique: Vec<TopicId> = Vec::new();
        for id in topic_ids {
            if id.value() == 0 {
                return Err(QuizRequestError::InvalidTopic);
            }
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.is_empty() {
            return Err(QuizRequestError::NoTopics);
        }

        Ok(Self {
            topic_ids: unique,
            difficulty_level,
            question_count,
        })
    }

    #[must_use]
    pub fn topic_ids(&self) -> &[TopicId] {
        &self.topic_ids
    }

    #[must_use]
    pub fn difficulty_level(&self) -> DifficultyLevel {
        self.difficulty_level
    }

    #[must_use]
    pub fn question_count(&self) -> QuestionCount {
        self.question_count
    }

    /// Questions the listed topics hold at this request's difficulty.
    /// Topics missing from `topics` count as empty.
    #[must_use]
    pub fn available_in(&self, topics: &[TopicSummary]) -> u64 {
        topics
            .iter()
            .filter(|topic| self.topic_ids.contains(&topic.topic_id))
            .map(|topic| topic.available_for(self.difficulty_level))
            .sum()
    }
}

//
// ─── QUIZ SETUP ────────────────────────────────────────────────────────────────
//

/// Mutable selection state of the topic picker before a quiz is started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSetup {
    topics: Vec<TopicId>,
    difficulty: DifficultyLevel,
    count: QuestionCount,
}

impl QuizSetup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the topic, or deselects it if already selected.
    pub fn toggle_topic(&mut self, id: TopicId) {
        if let Some(pos) = self.topics.iter().position(|t| *t == id) {
            self.topics.remove(pos);
        } else {
            self.topics.push(id);
        }
    }

    #[must_use]
    pub fn is_selected(&self, id: TopicId) -> bool {
        self.topics.contains(&id)
    }

    #[must_use]
    pub fn selected_topics(&self) -> &[TopicId] {
        &self.topics
    }

    pub fn set_difficulty(&mut self, difficulty: DifficultyLevel) {
        self.difficulty = difficulty;
    }

    #[must_use]
    pub fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    pub fn set_count(&mut self, count: u32) {
        self.count = QuestionCount::new(count);
    }

    pub fn increment_count(&mut self) {
        self.count = self.count.incremented();
    }

    pub fn decrement_count(&mut self) {
        self.count = self.count.decremented();
    }

    #[must_use]
    pub fn count(&self) -> QuestionCount {
        self.count
    }

    /// # Errors
    ///
    /// Returns `QuizRequestError::NoTopics` when nothing is selected.
    pub fn build(&self) -> Result<QuizRequest, QuizRequestError> {
        QuizRequest::new(self.topics.iter().copied(), self.difficulty, self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_is_clamped_at_every_change() {
        assert_eq!(QuestionCount::new(3).get(), 10);
        assert_eq!(QuestionCount::new(99).get(), 50);
        assert_eq!(QuestionCount::new(10).decremented().get(), 10);
        assert_eq!(QuestionCount::new(50).incremented().get(), 50);
        assert_eq!(QuestionCount::new(20).incremented().get(), 21);
    }

    #[test]
    fn empty_topics_are_rejected() {
        let err = QuizRequest::new(Vec::new(), DifficultyLevel::Expert, QuestionCount::default())
            .unwrap_err();
        assert_eq!(err, QuizRequestError::NoTopics);
    }

    #[test]
    fn zero_topic_id_is_rejected() {
        let err = QuizRequest::new([TopicId::new(0)], DifficultyLevel::Expert, QuestionCount::default())
            .unwrap_err();
        assert_eq!(err, QuizRequestError::InvalidTopic);
    }

    #[test]
    fn duplicate_topics_collapse_in_selection_order() {
        let request = QuizRequest::new(
            [TopicId::new(3), TopicId::new(1), TopicId::new(3)],
            DifficultyLevel::Moderate,
            QuestionCount::new(12),
        )
        .unwrap();
        assert_eq!(request.topic_ids(), &[TopicId::new(3), TopicId::new(1)]);
    }

    #[test]
    fn request_serializes_to_generate_body() {
        let request = QuizRequest::new(
            [TopicId::new(1), TopicId::new(3)],
            DifficultyLevel::Moderate,
            QuestionCount::new(10),
        )
        .unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "topicIds": [1, 3],
                "difficultyLevel": "MODERATE",
                "numberOfQuestions": 10
            })
        );
    }

    #[test]
    fn availability_sums_selected_topics_at_the_chosen_level() {
        let topic = |id: u64, moderate: u64| TopicSummary {
            topic_id: TopicId::new(id),
            topic_name: format!("T{id}"),
            description: None,
            beginner_questions: 100,
            moderate_questions: moderate,
            expert_questions: 0,
            total_questions: 100 + moderate,
        };
        let topics = [topic(1, 4), topic(2, 30), topic(3, 5)];
        let request = QuizRequest::new(
            [TopicId::new(1), TopicId::new(3), TopicId::new(9)],
            DifficultyLevel::Moderate,
            QuestionCount::new(20),
        )
        .unwrap();
        assert_eq!(request.available_in(&topics), 9);
        assert_eq!(request.available_in(&[]), 0);
    }

    #[test]
    fn setup_toggles_and_builds() {
        let mut setup = QuizSetup::new();
        assert!(setup.build().is_err());

        setup.toggle_topic(TopicId::new(4));
        setup.toggle_topic(TopicId::new(2));
        setup.toggle_topic(TopicId::new(4));
        assert!(!setup.is_selected(TopicId::new(4)));

        setup.set_difficulty(DifficultyLevel::Expert);
        setup.decrement_count();
        setup.set_count(70);
        setup.increment_count();

        let request = setup.build().unwrap();
        assert_eq!(request.topic_ids(), &[TopicId::new(2)]);
        assert_eq!(request.difficulty_level(), DifficultyLevel::Expert);
        assert_eq!(request.question_count().get(), 50);
    }
}
