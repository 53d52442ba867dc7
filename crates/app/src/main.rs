mod admin;
mod args;
mod play;
mod render;

use std::sync::Arc;

use services::{
    AuthService, ClientConfig, CredentialStore, HttpAdminApi, HttpQuizApi, QuizApi,
    QuizSessionLoop, RestClient,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::{Args, ArgsError, Command, print_usage};

fn init_tracing() {
    // Logs go to stderr so they never interleave with the quiz on stdout.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn client_config(args: &Args) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api) = &args.api {
        config = ClientConfig::new(api, config.request_timeout())?;
    }
    if let Some(timeout) = args.timeout {
        config = config.with_timeout(timeout);
    }
    Ok(config)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let parsed = match Args::parse(std::env::args().skip(1)) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            print_usage();
            return Err(e.into());
        }
    };

    let config = client_config(&parsed)?;
    tracing::debug!(base_url = %config.base_url(), timeout = ?config.request_timeout(), "client configured");

    let credentials = Arc::new(CredentialStore::new());
    let rest = RestClient::new(&config, credentials.clone())?;

    let auth = AuthService::new(rest.clone(), Arc::clone(&credentials));
    let account = match &parsed.login {
        Some(login) => {
            let account = auth.login(&login.email, &login.password).await?;
            println!("Signed in as {} <{}>", account.full_name, account.email);
            if !account.email_verified {
                println!("Your email is not verified yet.");
            }
            Some(account)
        }
        None => None,
    };

    let api: Arc<dyn QuizApi> = Arc::new(HttpQuizApi::new(rest.clone()));

    match parsed.command {
        Command::Topics => render::topics(&api.list_topics().await?),
        Command::History => render::history(&api.history().await?),
        Command::Result(attempt_id) => render::result(&api.attempt_result(attempt_id).await?),
        Command::Play(setup) => {
            let request = setup.build()?;
            let driver = QuizSessionLoop::new(api, config.request_timeout());
            play::run(&driver, request, &credentials).await?;
        }
        Command::Register {
            full_name,
            email,
            password,
        } => println!("{}", auth.register(&full_name, &email, &password).await?),
        Command::ForgotPassword { email } => println!("{}", auth.forgot_password(&email).await?),
        Command::ResetPassword {
            token,
            new_password,
        } => println!("{}", auth.reset_password(&token, &new_password).await?),
        Command::VerifyEmail { token } => println!("{}", auth.verify_email(&token).await?),
        Command::ResendVerification { email } => {
            println!("{}", auth.resend_verification(&email).await?);
        }
        Command::ChangePassword { new_password } => {
            let Some(login) = &parsed.login else {
                return Err(ArgsError::SignInRequired {
                    command: "change-password",
                }
                .into());
            };
            println!(
                "{}",
                auth.change_password(&login.password, &new_password).await?
            );
        }
        Command::Admin(command) => {
            let Some(account) = &account else {
                return Err(ArgsError::SignInRequired { command: "admin" }.into());
            };
            admin::require_admin(account)?;
            admin::run(&HttpAdminApi::new(rest), command).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
