use serde::{Deserialize, Serialize};

use crate::model::difficulty::DifficultyLevel;
use crate::model::ids::{AttemptId, OptionId, QuestionId};
use crate::model::wire::null_as_false;

/// How an option should be presented in a post-quiz review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewMark {
    /// The user's choice, and it was right.
    ChosenCorrect,
    /// The user's choice, and it was wrong.
    ChosenWrong,
    /// Not chosen, but the correct answer.
    CorrectAnswer,
    Neutral,
}

impl ReviewMark {
    #[must_use]
    pub fn label(self) -> Option<&'static str> {
        match self {
            ReviewMark::ChosenCorrect => Some("Your Choice (Correct)"),
            ReviewMark::ChosenWrong => Some("Your Choice (Wrong)"),
            ReviewMark::CorrectAnswer => Some("Correct Answer"),
            ReviewMark::Neutral => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionReview {
    pub option_id: OptionId,
    #[serde(rename = "optionText")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_correct: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub was_selected: bool,
}

impl OptionReview {
    #[must_use]
    pub fn mark(&self) -> ReviewMark {
        match (self.was_selected, self.is_correct) {
            (true, true) => ReviewMark::ChosenCorrect,
            (true, false) => ReviewMark::ChosenWrong,
            (false, true) => ReviewMark::CorrectAnswer,
            (false, false) => ReviewMark::Neutral,
        }
    }
}

/// Per-question breakdown returned with a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub question_id: QuestionId,
    pub question_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
    #[serde(default)]
    pub selected_option_id: Option<OptionId>,
    #[serde(default)]
    pub correct_option_id: Option<OptionId>,
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub options: Vec<OptionReview>,
}

/// Scored outcome of a submission. Produced by the backend and rendered as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    #[serde(default)]
    pub attempt_id: Option<AttemptId>,
    pub score: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub percentage: f64,
    #[serde(default)]
    pub topic_names: Vec<String>,
    pub difficulty_level: DifficultyLevel,
    #[serde(default)]
    pub question_reviews: Vec<QuestionReview>,
    #[serde(default)]
    pub email_sent: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(selected: bool, correct: bool) -> OptionReview {
        OptionReview {
            option_id: OptionId::new(1),
            text: "x".into(),
            is_correct: correct,
            was_selected: selected,
        }
    }

    #[test]
    fn marks_follow_selection_and_correctness() {
        assert_eq!(option(true, true).mark(), ReviewMark::ChosenCorrect);
        assert_eq!(option(true, false).mark(), ReviewMark::ChosenWrong);
        assert_eq!(option(false, true).mark(), ReviewMark::CorrectAnswer);
        assert_eq!(option(false, false).mark(), ReviewMark::Neutral);
        assert_eq!(ReviewMark::Neutral.label(), None);
    }

    #[test]
    fn deserializes_result_body() {
        let json = serde_json::json!({
            "attemptId": 42,
            "score": 8,
            "totalQuestions": 10,
            "correctAnswers": 8,
            "wrongAnswers": 2,
            "percentage": 80.0,
            "topicNames": ["Java"],
            "difficultyLevel": "MODERATE",
            "questionReviews": [{
                "questionId": 1,
                "questionText": "2 + 2?",
                "selectedOptionId": 11,
                "correctOptionId": 11,
                "isCorrect": true,
                "options": [
                    {"optionId": 10, "optionText": "3", "isCorrect": false, "wasSelected": false},
                    {"optionId": 11, "optionText": "4", "isCorrect": true, "wasSelected": true}
                ]
            }],
            "emailSent": null
        });
        let result: QuizResult = serde_json::from_value(json).unwrap();
        assert_eq!(result.attempt_id, Some(AttemptId::new(42)));
        assert_eq!(result.question_reviews[0].options[1].mark(), ReviewMark::ChosenCorrect);
        assert_eq!(result.email_sent, None);
    }

    #[test]
    fn null_option_flags_read_as_false() {
        let json = r#"{"optionId":1,"optionText":"x","isCorrect":null,"wasSelected":false}"#;
        let option: OptionReview = serde_json::from_str(json).unwrap();
        assert!(!option.is_correct);
        assert!(!option.was_selected);
        assert_eq!(option.mark(), ReviewMark::Neutral);

        let bare: OptionReview =
            serde_json::from_str(r#"{"optionId":2,"optionText":"y","wasSelected":null}"#).unwrap();
        assert!(!bare.is_correct);
        assert!(!bare.was_selected);
    }
}
