use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::difficulty::DifficultyLevel;
use crate::model::ids::{OptionId, QuestionId, QuizId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Structural problems in a generated quiz returned by the backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizValidationError {
    #[error("quiz contains no questions")]
    Empty,

    #[error("quiz reports {reported} questions but contains {actual}")]
    CountMismatch { reported: usize, actual: usize },

    #[error("question {0} appears more than once")]
    DuplicateQuestion(QuestionId),

    #[error("question {question} lists option {option} more than once")]
    DuplicateOption {
        question: QuestionId,
        option: OptionId,
    },
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A selectable answer, sent without its correctness flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub option_id: OptionId,
    #[serde(rename = "optionText")]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: QuestionId,
    #[serde(rename = "questionText", alias = "questionTitle", alias = "question")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

impl Question {
    #[must_use]
    pub fn has_option(&self, option_id: OptionId) -> bool {
        self.options.iter().any(|o| o.option_id == option_id)
    }
}

/// A quiz generated by the backend.
///
/// Question and option order is the presentation order and is never changed
/// on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuiz {
    pub quiz_id: QuizId,
    #[serde(default)]
    pub topic_names: Vec<String>,
    pub difficulty_level: DifficultyLevel,
    pub questions: Vec<Question>,
    pub total_questions: usize,
}

impl GeneratedQuiz {
    /// Checks the structural invariants of a quiz before it is used.
    ///
    /// # Errors
    ///
    /// Returns `QuizValidationError` if the quiz is empty, its reported total
    /// disagrees with its question list, or ids repeat.
    pub fn validate(&self) -> Result<(), QuizValidationError> {
        if self.questions.is_empty() {
            return Err(QuizValidationError::Empty);
        }
        if self.total_questions != self.questions.len() {
            return Err(QuizValidationError::CountMismatch {
                reported: self.total_questions,
                actual: self.questions.len(),
            });
        }

        let mut seen = HashSet::with_capacity(self.questions.len());
        for question in &self.questions {
            if !seen.insert(question.question_id) {
                return Err(QuizValidationError::DuplicateQuestion(question.question_id));
            }
            let mut options = HashSet::with_capacity(question.options.len());
            for option in &question.options {
                if !options.insert(option.option_id) {
                    return Err(QuizValidationError::DuplicateOption {
                        question: question.question_id,
                        option: option.option_id,
                    });
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.question_id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Human title, e.g. "Java, SQL Quiz".
    #[must_use]
    pub fn title(&self) -> String {
        if self.topic_names.is_empty() {
            "Quiz".to_owned()
        } else {
            format!("{} Quiz", self.topic_names.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u64, options: &[u64]) -> Question {
        Question {
            question_id: QuestionId::new(id),
            text: format!("Q{id}"),
            topic_name: None,
            options: options
                .iter()
                .map(|o| AnswerOption {
                    option_id: OptionId::new(*o),
                    text: format!("O{o}"),
                })
                .collect(),
        }
    }

    fn quiz(questions: Vec<Question>, total: usize) -> GeneratedQuiz {
        GeneratedQuiz {
            quiz_id: QuizId::new("quiz-1"),
            topic_names: vec!["Java".into(), "SQL".into()],
            difficulty_level: DifficultyLevel::Beginner,
            questions,
            total_questions: total,
        }
    }

    #[test]
    fn valid_quiz_passes() {
        let quiz = quiz(vec![question(1, &[10, 11]), question(2, &[20, 21])], 2);
        assert!(quiz.validate().is_ok());
        assert_eq!(quiz.title(), "Java, SQL Quiz");
    }

    #[test]
    fn total_must_match_question_list() {
        let quiz = quiz(vec![question(1, &[10])], 3);
        assert_eq!(
            quiz.validate(),
            Err(QuizValidationError::CountMismatch {
                reported: 3,
                actual: 1
            })
        );
    }

    #[test]
    fn duplicate_question_ids_are_rejected() {
        let quiz = quiz(vec![question(1, &[10]), question(1, &[11])], 2);
        assert_eq!(
            quiz.validate(),
            Err(QuizValidationError::DuplicateQuestion(QuestionId::new(1)))
        );
    }

    #[test]
    fn duplicate_option_ids_are_rejected() {
        let quiz = quiz(vec![question(1, &[10, 10])], 1);
        assert!(matches!(
            quiz.validate(),
            Err(QuizValidationError::DuplicateOption { .. })
        ));
    }

    #[test]
    fn deserializes_backend_shape() {
        let json = serde_json::json!({
            "quizId": "8f1c",
            "topicNames": ["Java"],
            "difficultyLevel": "EXPERT",
            "totalQuestions": 1,
            "questions": [{
                "questionId": 5,
                "questionText": "What is a trait?",
                "topicName": "Rust",
                "options": [
                    {"optionId": 50, "optionText": "An interface"},
                    {"optionId": 51, "optionText": "A struct"}
                ]
            }]
        });
        let quiz: GeneratedQuiz = serde_json::from_value(json).unwrap();
        assert_eq!(quiz.quiz_id.as_str(), "8f1c");
        assert_eq!(quiz.questions[0].options[1].option_id, OptionId::new(51));
        assert_eq!(quiz.questions[0].topic_name.as_deref(), Some("Rust"));
        assert!(quiz.validate().is_ok());
    }
}
