use std::fmt;
use std::time::Duration;

use quiz_core::model::{
    AdminRequestError, AttemptId, DifficultyLevel, OptionRequest, QuestionId, QuestionRequest,
    QuizSetup, TopicId, TopicRequest,
};
use services::config::parse_timeout_secs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingCommand,
    UnknownArg(String),
    InvalidTopic { raw: String },
    InvalidDifficulty { raw: String },
    InvalidCount { raw: String },
    InvalidAttemptId { raw: String },
    InvalidQuestionId { raw: String },
    InvalidTimeout { raw: String },
    InvalidAdminRequest(AdminRequestError),
    PasswordWithoutEmail,
    SignInRequired { command: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingCommand => write!(f, "no command given"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTopic { raw } => write!(f, "invalid topic id: {raw}"),
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw} (beginner, moderate, expert)")
            }
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
            ArgsError::InvalidAttemptId { raw } => write!(f, "invalid attempt id: {raw}"),
            ArgsError::InvalidQuestionId { raw } => write!(f, "invalid question id: {raw}"),
            ArgsError::InvalidTimeout { raw } => write!(f, "invalid --timeout value: {raw}"),
            ArgsError::InvalidAdminRequest(err) => write!(f, "{err}"),
            ArgsError::PasswordWithoutEmail => write!(f, "--password needs --email"),
            ArgsError::SignInRequired { command } => {
                write!(f, "{command} needs --email and --password")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn required(value: Option<String>, flag: &'static str) -> Result<String, ArgsError> {
    value.ok_or(ArgsError::MissingValue { flag })
}

fn topic_id(raw: &str) -> Result<TopicId, ArgsError> {
    raw.trim().parse().map_err(|_| ArgsError::InvalidTopic {
        raw: raw.to_owned(),
    })
}

fn question_id(raw: &str) -> Result<QuestionId, ArgsError> {
    raw.trim().parse().map_err(|_| ArgsError::InvalidQuestionId {
        raw: raw.to_owned(),
    })
}

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Topics,
    ShowTopic(TopicId),
    Questions { topic: Option<TopicId> },
    ShowQuestion(QuestionId),
    AddTopic(TopicRequest),
    UpdateTopic(TopicId, TopicRequest),
    DeleteTopic(TopicId),
    AddQuestion(QuestionRequest),
    UpdateQuestion(QuestionId, QuestionRequest),
    DeleteQuestion(QuestionId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Topics,
    Play(QuizSetup),
    History,
    Result(AttemptId),
    Register {
        full_name: String,
        email: String,
        password: String,
    },
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        token: String,
        new_password: String,
    },
    VerifyEmail {
        token: String,
    },
    ResendVerification {
        email: String,
    },
    ChangePassword {
        new_password: String,
    },
    Admin(AdminCommand),
}

impl Command {
    /// Whether `--email`/`--password` sign in before the command runs.
    fn signs_in(&self) -> bool {
        !matches!(
            self,
            Command::Register { .. }
                | Command::ForgotPassword { .. }
                | Command::ResetPassword { .. }
                | Command::VerifyEmail { .. }
                | Command::ResendVerification { .. }
        )
    }

    /// Commands that cannot run anonymously.
    fn account_required(&self) -> Option<&'static str> {
        match self {
            Command::ChangePassword { .. } => Some("change-password"),
            Command::Admin(_) => Some("admin"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub api: Option<String>,
    pub timeout: Option<Duration>,
    pub login: Option<Login>,
}

/// Command-specific flags, collected before the command word is interpreted.
#[derive(Debug, Default)]
struct Flags {
    setup: QuizSetup,
    name: Option<String>,
    description: Option<String>,
    topic: Option<TopicId>,
    text: Option<String>,
    options: Vec<OptionRequest>,
    token: Option<String>,
    new_password: Option<String>,
}

impl Flags {
    fn topic_request(&self) -> Result<TopicRequest, ArgsError> {
        let name = self
            .name
            .as_deref()
            .ok_or(ArgsError::MissingValue { flag: "--name" })?;
        TopicRequest::new(name, self.description.as_deref())
            .map_err(ArgsError::InvalidAdminRequest)
    }

    fn question_request(&self) -> Result<QuestionRequest, ArgsError> {
        let topic = self.topic.ok_or(ArgsError::MissingValue { flag: "--topic" })?;
        let text = self
            .text
            .as_deref()
            .ok_or(ArgsError::MissingValue { flag: "--text" })?;
        QuestionRequest::new(topic, text, self.setup.difficulty(), self.options.clone())
            .map_err(ArgsError::InvalidAdminRequest)
    }
}

impl Args {
    /// Parses everything after the program name. `Ok(None)` means help was asked for.
    pub fn parse(argv: impl IntoIterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        Self::parse_with_env(argv, |key| std::env::var(key).ok())
    }

    fn parse_with_env(
        argv: impl IntoIterator<Item = String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ArgsError> {
        let mut args = argv.into_iter();
        let mut words: Vec<String> = Vec::new();
        let mut flags = Flags::default();
        let mut api = None;
        let mut timeout = None;
        let mut email = lookup("QUIZ_EMAIL");
        let mut password = lookup("QUIZ_PASSWORD");

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => return Ok(None),
                "--api" => api = Some(require_value(&mut args, "--api")?),
                "--timeout" => {
                    let value = require_value(&mut args, "--timeout")?;
                    let parsed = parse_timeout_secs(&value)
                        .map_err(|_| ArgsError::InvalidTimeout { raw: value.clone() })?;
                    timeout = Some(parsed);
                }
                "--email" => email = Some(require_value(&mut args, "--email")?),
                "--password" => password = Some(require_value(&mut args, "--password")?),
                "--topics" => {
                    let value = require_value(&mut args, "--topics")?;
                    for raw in value.split(',').filter(|raw| !raw.trim().is_empty()) {
                        let id = topic_id(raw)?;
                        if !flags.setup.is_selected(id) {
                            flags.setup.toggle_topic(id);
                        }
                    }
                }
                "--difficulty" => {
                    let value = require_value(&mut args, "--difficulty")?;
                    let level: DifficultyLevel = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidDifficulty { raw: value.clone() })?;
                    flags.setup.set_difficulty(level);
                }
                "--count" => {
                    let value = require_value(&mut args, "--count")?;
                    let count: u32 = value
                        .trim()
                        .parse()
                        .map_err(|_| ArgsError::InvalidCount { raw: value.clone() })?;
                    flags.setup.set_count(count);
                }
                "--name" => flags.name = Some(require_value(&mut args, "--name")?),
                "--description" => {
                    flags.description = Some(require_value(&mut args, "--description")?);
                }
                "--topic" => flags.topic = Some(topic_id(&require_value(&mut args, "--topic")?)?),
                "--text" => flags.text = Some(require_value(&mut args, "--text")?),
                "--option" => {
                    let text = require_value(&mut args, "--option")?;
                    flags.options.push(OptionRequest::new(text, false));
                }
                "--correct" => {
                    let text = require_value(&mut args, "--correct")?;
                    flags.options.push(OptionRequest::new(text, true));
                }
                "--token" => flags.token = Some(require_value(&mut args, "--token")?),
                "--new-password" => {
                    flags.new_password = Some(require_value(&mut args, "--new-password")?);
                }
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => words.push(arg),
            }
        }

        let mut words = words.into_iter();
        let name = words.next().ok_or(ArgsError::MissingCommand)?;
        let command = match name.as_str() {
            "topics" => Command::Topics,
            "history" => Command::History,
            "play" => Command::Play(flags.setup.clone()),
            "result" => {
                let raw = words.next().ok_or(ArgsError::MissingValue {
                    flag: "result <attempt-id>",
                })?;
                Command::Result(
                    raw.parse()
                        .map_err(|_| ArgsError::InvalidAttemptId { raw: raw.clone() })?,
                )
            }
            "register" => Command::Register {
                full_name: required(flags.name.clone(), "--name")?,
                email: required(email.clone(), "--email")?,
                password: required(password.clone(), "--password")?,
            },
            "forgot-password" => Command::ForgotPassword {
                email: required(email.clone(), "--email")?,
            },
            "resend-verification" => Command::ResendVerification {
                email: required(email.clone(), "--email")?,
            },
            "reset-password" => Command::ResetPassword {
                token: required(flags.token.clone(), "--token")?,
                new_password: required(flags.new_password.clone(), "--new-password")?,
            },
            "verify-email" => Command::VerifyEmail {
                token: required(flags.token.clone(), "--token")?,
            },
            "change-password" => Command::ChangePassword {
                new_password: required(flags.new_password.clone(), "--new-password")?,
            },
            "admin" => Command::Admin(admin_command(&mut words, &flags)?),
            _ => return Err(ArgsError::UnknownArg(name)),
        };
        if let Some(extra) = words.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        let login = if command.signs_in() {
            match (email, password) {
                (Some(email), Some(password)) => Some(Login { email, password }),
                (None, Some(_)) => return Err(ArgsError::PasswordWithoutEmail),
                (Some(_), None) => return Err(ArgsError::MissingValue { flag: "--password" }),
                (None, None) => None,
            }
        } else {
            None
        };
        if let (None, Some(command)) = (&login, command.account_required()) {
            return Err(ArgsError::SignInRequired { command });
        }

        Ok(Some(Self {
            command,
            api,
            timeout,
            login,
        }))
    }
}

fn admin_command(
    words: &mut impl Iterator<Item = String>,
    flags: &Flags,
) -> Result<AdminCommand, ArgsError> {
    let action = words.next().ok_or(ArgsError::MissingValue {
        flag: "admin <action>",
    })?;
    let mut id = |what: &'static str| words.next().ok_or(ArgsError::MissingValue { flag: what });

    Ok(match action.as_str() {
        "topics" => AdminCommand::Topics,
        "topic" => AdminCommand::ShowTopic(topic_id(&id("topic <id>")?)?),
        "questions" => AdminCommand::Questions { topic: flags.topic },
        "question" => AdminCommand::ShowQuestion(question_id(&id("question <id>")?)?),
        "add-topic" => AdminCommand::AddTopic(flags.topic_request()?),
        "update-topic" => {
            let topic = topic_id(&id("update-topic <id>")?)?;
            AdminCommand::UpdateTopic(topic, flags.topic_request()?)
        }
        "delete-topic" => AdminCommand::DeleteTopic(topic_id(&id("delete-topic <id>")?)?),
        "add-question" => AdminCommand::AddQuestion(flags.question_request()?),
        "update-question" => {
            let question = question_id(&id("update-question <id>")?)?;
            AdminCommand::UpdateQuestion(question, flags.question_request()?)
        }
        "delete-question" => {
            AdminCommand::DeleteQuestion(question_id(&id("delete-question <id>")?)?)
        }
        _ => return Err(ArgsError::UnknownArg(action)),
    })
}

pub fn print_usage() {
    eprintln!(
        "Usage:
  quiz [global options] topics
  quiz [global options] play --topics <id,id,...> [--difficulty <level>] [--count <n>]
  quiz [global options] history
  quiz [global options] result <attempt-id>

Account:
  quiz register --name <full name> --email <email> --password <pass>
  quiz verify-email --token <token>
  quiz resend-verification --email <email>
  quiz forgot-password --email <email>
  quiz reset-password --token <token> --new-password <pass>
  quiz --email <email> --password <pass> change-password --new-password <pass>

Admin (needs an admin account):
  quiz [global options] admin topics
  quiz [global options] admin topic <id>
  quiz [global options] admin add-topic --name <name> [--description <text>]
  quiz [global options] admin update-topic <id> --name <name> [--description <text>]
  quiz [global options] admin delete-topic <id>
  quiz [global options] admin questions [--topic <id>]
  quiz [global options] admin question <id>
  quiz [global options] admin add-question --topic <id> --text <question>
        [--difficulty <level>] --correct <option> --option <option>...
  quiz [global options] admin update-question <id> (same flags as add-question)
  quiz [global options] admin delete-question <id>

Global options:
  --api <url>          Backend base url (env QUIZ_API_BASE, default http://localhost:8080)
  --timeout <secs>     Request timeout (env QUIZ_API_TIMEOUT_SECS, default 30)
  --email <email>      Sign in before running the command (env QUIZ_EMAIL)
  --password <pass>    Password for --email (env QUIZ_PASSWORD)

While playing: an option number selects it, n = next/submit, p = previous, q = quit."
    );
}
