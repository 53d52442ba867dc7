#![forbid(unsafe_code)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use api::{
    AdminApi, ApiCall, HttpAdminApi, HttpQuizApi, QuizApi, RestClient, ScriptedQuizApi,
};
pub use auth::{AuthService, CredentialProvider, CredentialStore};
pub use config::ClientConfig;
pub use error::{ApiError, AuthError, ConfigError, SessionError};

pub use sessions::{
    Advance, Disposition, FailedStage, Failure, QuizSession, QuizSessionLoop, SessionPhase,
    SessionProgress, SessionState, StepOutcome,
};
