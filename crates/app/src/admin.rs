use std::error::Error;
use std::fmt;

use quiz_core::model::Account;
use services::AdminApi;

use crate::args::AdminCommand;
use crate::render;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotAdmin {
    email: String,
}

impl fmt::Display for NotAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not an admin account", self.email)
    }
}

impl Error for NotAdmin {}

/// Gate for the admin commands: the signed-in account must carry the admin role.
pub fn require_admin(account: &Account) -> Result<(), NotAdmin> {
    if account.is_admin() {
        Ok(())
    } else {
        Err(NotAdmin {
            email: account.email.clone(),
        })
    }
}

/// Runs one admin action and prints what the backend returned.
///
/// # Errors
///
/// Returns the API error of the failed call.
pub async fn run(api: &dyn AdminApi, command: AdminCommand) -> Result<(), Box<dyn Error>> {
    match command {
        AdminCommand::Topics => render::admin_topics(&api.list_topics().await?),
        AdminCommand::ShowTopic(id) => render::admin_topic(&api.topic(id).await?),
        AdminCommand::Questions { topic: Some(topic) } => {
            render::admin_questions(&api.questions_for_topic(topic).await?);
        }
        AdminCommand::Questions { topic: None } => {
            render::admin_questions(&api.list_questions().await?);
        }
        AdminCommand::ShowQuestion(id) => render::admin_question(&api.question(id).await?),
        AdminCommand::AddTopic(request) => {
            let topic = api.create_topic(&request).await?;
            println!("Topic created.");
            render::admin_topic(&topic);
        }
        AdminCommand::UpdateTopic(id, request) => {
            let topic = api.update_topic(id, &request).await?;
            println!("Topic updated.");
            render::admin_topic(&topic);
        }
        AdminCommand::DeleteTopic(id) => println!("{}", api.delete_topic(id).await?),
        AdminCommand::AddQuestion(request) => {
            let question = api.create_question(&request).await?;
            println!("Question created.");
            render::admin_question(&question);
        }
        AdminCommand::UpdateQuestion(id, request) => {
            let question = api.update_question(id, &request).await?;
            println!("Question updated.");
            render::admin_question(&question);
        }
        AdminCommand::DeleteQuestion(id) => println!("{}", api.delete_question(id).await?),
    }
    Ok(())
}
