mod account;
mod admin;
mod answers;
mod difficulty;
mod history;
mod ids;
mod quiz;
mod request;
mod result;
mod topic;
mod wire;

pub use ids::{AttemptId, OptionId, ParseIdError, QuestionId, QuizId, SessionId, TopicId};

pub use account::{Account, AuthToken};
pub use admin::{
    AdminOption, AdminQuestion, AdminRequestError, AdminTopic, OptionRequest, QuestionRequest,
    TopicRequest,
};
pub use answers::{AnswerEntry, AnswerMap, SubmissionPayload};
pub use difficulty::{DifficultyLevel, ParseDifficultyError};
pub use history::AttemptSummary;
pub use quiz::{AnswerOption, GeneratedQuiz, Question, QuizValidationError};
pub use request::{QuestionCount, QuizRequest, QuizRequestError, QuizSetup};
pub use result::{OptionReview, QuestionReview, QuizResult, ReviewMark};
pub use topic::TopicSummary;
