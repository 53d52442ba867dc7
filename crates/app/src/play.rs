use std::error::Error;

use quiz_core::model::{QuizRequest, QuizResult, TopicSummary};
use quiz_core::time::format_elapsed;
use services::{
    CredentialProvider, CredentialStore, QuizApi, QuizSession, QuizSessionLoop, SessionError,
    SessionState,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::render;

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Choose(usize),
    Next,
    Previous,
    Retry,
    Quit,
    Unknown,
}

fn parse_key(line: &str) -> Key {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "n" | "next" | "" => Key::Next,
        "p" | "prev" | "previous" => Key::Previous,
        "r" | "retry" => Key::Retry,
        "q" | "quit" => Key::Quit,
        _ => match line.parse::<usize>() {
            Ok(number) if number > 0 => Key::Choose(number - 1),
            _ => Key::Unknown,
        },
    }
}

type Input = Lines<BufReader<Stdin>>;

/// Plays one quiz on the terminal until it is scored or the player quits.
///
/// # Errors
///
/// Returns the session error when the quiz cannot be generated, and I/O
/// errors from stdin.
pub async fn run(
    driver: &QuizSessionLoop,
    request: QuizRequest,
    credentials: &CredentialStore,
) -> Result<(), Box<dyn Error>> {
    match driver.api().list_topics().await {
        Ok(topics) => {
            if let Some(warning) = availability_warning(&request, &topics) {
                println!("{warning}");
            }
        }
        Err(err) => tracing::debug!(error = %err, "topic counts unavailable"),
    }

    let mut session = driver.new_session();
    println!(
        "Generating {} {} questions...",
        request.question_count().get(),
        request.difficulty_level().label()
    );
    driver.start_request(&mut session, request).await?;
    if let Some(quiz) = session.quiz() {
        println!("{}", quiz.title());
    }

    let mut input: Input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match session.state() {
            SessionState::InProgress(_) => {
                render::question(&session);
                let Some(line) = input.next_line().await? else {
                    session.abandon();
                    return Ok(());
                };
                if !answer_step(driver, &mut session, parse_key(&line)).await? {
                    session.abandon();
                    println!("Quiz abandoned.");
                    return Ok(());
                }
            }
            SessionState::Completed { result, .. } => {
                render::result(result);
                if let Some(elapsed) = session.elapsed() {
                    println!("Time taken: {}", format_elapsed(elapsed));
                }
                offer_email(driver, credentials, &mut input, result).await?;
                return Ok(());
            }
            SessionState::Failed {
                failure,
                resume: Some(_),
            } => {
                println!("{}", failure.message);
                println!("r retry submission, q quit");
                let Some(line) = input.next_line().await? else {
                    return Ok(());
                };
                match parse_key(&line) {
                    Key::Retry => match driver.retry_submission(&mut session).await {
                        Ok(_) | Err(SessionError::Request(_)) => {}
                        Err(other) => return Err(other.into()),
                    },
                    Key::Quit => return Ok(()),
                    _ => {}
                }
            }
            SessionState::Failed { failure, .. } => {
                return Err(SessionError::Request(failure.clone()).into());
            }
            SessionState::Idle | SessionState::Initializing { .. } | SessionState::Submitting(_) => {
                return Err(SessionError::InvalidState(session.phase()).into());
            }
        }
    }
}

/// Applies one key while a question is on screen. `Ok(false)` means quit.
async fn answer_step(
    driver: &QuizSessionLoop,
    session: &mut QuizSession,
    key: Key,
) -> Result<bool, SessionError> {
    match key {
        Key::Choose(index) => {
            let Some(question) = session.current_question() else {
                return Ok(true);
            };
            let Some(option) = question.options.get(index) else {
                println!("No option {} on this question.", index + 1);
                return Ok(true);
            };
            let (question_id, option_id) = (question.question_id, option.option_id);
            session.select_answer(question_id, option_id)?;
        }
        Key::Next => match driver.advance(session).await {
            Ok(_) => {}
            Err(err @ SessionError::Incomplete { .. }) => println!("{err}"),
            // Shown by the failed-state prompt.
            Err(SessionError::Request(_)) => {}
            Err(other) => return Err(other),
        },
        Key::Previous => session.retreat()?,
        Key::Quit => return Ok(false),
        Key::Retry | Key::Unknown => println!("Type an option number, n, p or q."),
    }
    Ok(true)
}

/// Warns when the selected topics hold fewer questions at the chosen
/// difficulty than were asked for.
fn availability_warning(request: &QuizRequest, topics: &[TopicSummary]) -> Option<String> {
    let available = request.available_in(topics);
    let wanted = u64::from(request.question_count().get());
    (available < wanted).then(|| {
        format!(
            "Only {available} {} questions are available for the selected topics; you asked for {wanted}.",
            request.difficulty_level().label().to_ascii_lowercase()
        )
    })
}

fn wants_email(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Sends the result and returns the line to show, success or not.
async fn email_result(api: &dyn QuizApi, email: &str, result: &QuizResult) -> String {
    match api.send_result_email(email, result).await {
        Ok(message) => message,
        Err(err) => {
            tracing::warn!(error = %err, "sending results failed");
            err.server_message()
                .unwrap_or("Failed to send quiz results")
                .to_owned()
        }
    }
}

async fn offer_email(
    driver: &QuizSessionLoop,
    credentials: &CredentialStore,
    input: &mut Input,
    result: &QuizResult,
) -> Result<(), Box<dyn Error>> {
    let Some(account) = credentials.account() else {
        return Ok(());
    };
    println!();
    println!("Email these results to {}? [y/N]", account.email);
    let Some(line) = input.next_line().await? else {
        return Ok(());
    };
    if wants_email(&line) {
        println!("{}", email_result(driver.api().as_ref(), &account.email, result).await);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use quiz_core::model::{DifficultyLevel, QuestionCount, TopicId};
    use reqwest::StatusCode;
    use services::{ApiCall, ApiError, ScriptedQuizApi};

    fn result() -> QuizResult {
        QuizResult {
            attempt_id: None,
            score: 3,
            total_questions: 10,
            correct_answers: 3,
            wrong_answers: 7,
            percentage: 30.0,
            topic_names: vec!["SQL".into()],
            difficulty_level: DifficultyLevel::Expert,
            question_reviews: Vec::new(),
            email_sent: None,
        }
    }

    fn topic(id: u64, expert: u64) -> TopicSummary {
        TopicSummary {
            topic_id: TopicId::new(id),
            topic_name: format!("T{id}"),
            description: None,
            beginner_questions: 50,
            moderate_questions: 50,
            expert_questions: expert,
            total_questions: 100 + expert,
        }
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(parse_key("2"), Key::Choose(1));
        assert_eq!(parse_key(" N "), Key::Next);
        assert_eq!(parse_key(""), Key::Next);
        assert_eq!(parse_key("p"), Key::Previous);
        assert_eq!(parse_key("q"), Key::Quit);
        assert_eq!(parse_key("0"), Key::Unknown);
        assert_eq!(parse_key("maybe"), Key::Unknown);
    }

    #[test]
    fn short_topics_produce_a_warning() {
        let request = QuizRequest::new(
            [TopicId::new(1), TopicId::new(2)],
            DifficultyLevel::Expert,
            QuestionCount::new(15),
        )
        .unwrap();

        let warning = availability_warning(&request, &[topic(1, 6), topic(2, 4), topic(3, 40)]);
        assert_eq!(
            warning.as_deref(),
            Some("Only 10 expert questions are available for the selected topics; you asked for 15.")
        );
        assert_eq!(availability_warning(&request, &[topic(1, 9), topic(2, 6)]), None);
    }

    #[test]
    fn only_yes_sends_email() {
        assert!(wants_email(" Y "));
        assert!(wants_email("yes"));
        assert!(!wants_email(""));
        assert!(!wants_email("nope"));
    }

    #[tokio::test]
    async fn email_reports_backend_message_or_fallback() {
        let api = ScriptedQuizApi::new();
        api.push_email(Ok("Quiz results have been sent to your email".into()));
        api.push_email(Err(ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: Some("Failed to send email: mail server down".into()),
        }));
        api.push_email(Err(ApiError::Timeout(Duration::from_secs(30))));

        let mut lines = Vec::new();
        for _ in 0..3 {
            lines.push(email_result(&api, "ada@example.com", &result()).await);
        }
        assert_eq!(
            lines,
            [
                "Quiz results have been sent to your email",
                "Failed to send email: mail server down",
                "Failed to send quiz results",
            ]
        );
        assert_eq!(
            api.calls(),
            vec![ApiCall::SendResultEmail("ada@example.com".into()); 3]
        );
    }
}
