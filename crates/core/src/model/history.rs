use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::ids::AttemptId;

/// One past attempt as listed in the history view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSummary {
    pub attempt_id: AttemptId,
    #[serde(default)]
    pub topic_name: Option<String>,
    // Kept as text: older attempts may carry levels the client does not know.
    #[serde(default)]
    pub difficulty_level: Option<String>,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: f64,
    #[serde(default)]
    pub attempted_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_local_timestamp() {
        let json = serde_json::json!({
            "attemptId": 9,
            "topicName": "Java",
            "difficultyLevel": "EXPERT",
            "score": 7,
            "totalQuestions": 10,
            "percentage": 70.0,
            "attemptedAt": "2025-03-01T14:05:09.123"
        });
        let attempt: AttemptSummary = serde_json::from_value(json).unwrap();
        assert_eq!(attempt.attempt_id, AttemptId::new(9));
        let at = attempt.attempted_at.unwrap();
        assert_eq!(at.format("%Y-%m-%d %H:%M").to_string(), "2025-03-01 14:05");
    }
}
