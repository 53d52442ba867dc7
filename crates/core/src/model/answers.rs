use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::{OptionId, QuestionId, QuizId};
use crate::model::quiz::GeneratedQuiz;

/// Current selection per question. At most one option per question;
/// a later selection replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerMap {
    selections: HashMap<QuestionId, OptionId>,
}

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `option` for `question`, returning the replaced selection.
    pub fn select(&mut self, question: QuestionId, option: OptionId) -> Option<OptionId> {
        self.selections.insert(question, option)
    }

    #[must_use]
    pub fn get(&self, question: QuestionId) -> Option<OptionId> {
        self.selections.get(&question).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub selected_option_id: Option<OptionId>,
}

/// Body of a quiz submission: one entry per question, in quiz order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub quiz_id: QuizId,
    pub answers: Vec<AnswerEntry>,
}

impl SubmissionPayload {
    /// Builds the payload in the quiz's question order, independent of the
    /// order in which answers were recorded.
    #[must_use]
    pub fn from_answers(quiz: &GeneratedQuiz, answers: &AnswerMap) -> Self {
        let answers = quiz
            .questions
            .iter()
            .map(|q| AnswerEntry {
                question_id: q.question_id,
                selected_option_id: answers.get(q.question_id),
            })
            .collect();
        Self {
            quiz_id: quiz.quiz_id.clone(),
            answers,
        }
    }

    /// Questions without a selection, in quiz order.
    #[must_use]
    pub fn unanswered(&self) -> Vec<QuestionId> {
        self.answers
            .iter()
            .filter(|entry| entry.selected_option_id.is_none())
            .map(|entry| entry.question_id)
            .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answers
            .iter()
            .all(|entry| entry.selected_option_id.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::difficulty::DifficultyLevel;
    use crate::model::quiz::Question;

    fn quiz(ids: &[u64]) -> GeneratedQuiz {
        GeneratedQuiz {
            quiz_id: QuizId::new("qz"),
            topic_names: Vec::new(),
            difficulty_level: DifficultyLevel::Moderate,
            questions: ids
                .iter()
                .map(|id| Question {
                    question_id: QuestionId::new(*id),
                    text: String::new(),
                    topic_name: None,
                    options: Vec::new(),
                })
                .collect(),
            total_questions: ids.len(),
        }
    }

    #[test]
    fn last_selection_wins() {
        let mut answers = AnswerMap::new();
        assert_eq!(answers.select(QuestionId::new(1), OptionId::new(10)), None);
        assert_eq!(
            answers.select(QuestionId::new(1), OptionId::new(11)),
            Some(OptionId::new(10))
        );
        assert_eq!(answers.get(QuestionId::new(1)), Some(OptionId::new(11)));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn payload_follows_quiz_order() {
        let quiz = quiz(&[7, 3, 9]);
        let mut answers = AnswerMap::new();
        answers.select(QuestionId::new(9), OptionId::new(90));
        answers.select(QuestionId::new(7), OptionId::new(70));
        answers.select(QuestionId::new(3), OptionId::new(30));

        let payload = SubmissionPayload::from_answers(&quiz, &answers);
        let order: Vec<u64> = payload
            .answers
            .iter()
            .map(|a| a.question_id.value())
            .collect();
        assert_eq!(order, vec![7, 3, 9]);
        assert!(payload.is_complete());
    }

    #[test]
    fn missing_answers_serialize_as_null() {
        let quiz = quiz(&[1, 2]);
        let mut answers = AnswerMap::new();
        answers.select(QuestionId::new(1), OptionId::new(5));

        let payload = SubmissionPayload::from_answers(&quiz, &answers);
        assert_eq!(payload.unanswered(), vec![QuestionId::new(2)]);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "quizId": "qz",
                "answers": [
                    {"questionId": 1, "selectedOptionId": 5},
                    {"questionId": 2, "selectedOptionId": null}
                ]
            })
        );
    }
}
