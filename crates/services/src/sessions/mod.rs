mod progress;
mod service;
mod state;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::QuizSession;
pub use state::{
    Advance, Attempt, Disposition, FailedStage, Failure, RequestTicket, SessionPhase,
    SessionState,
};
pub use workflow::{QuizSessionLoop, StepOutcome};
