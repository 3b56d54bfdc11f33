mod store;
mod transport;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use session::{
    AuthState, ConfigError, FormError, LoginForm, SessionConfig, SessionEvent, SessionManager, SessionStore, SignupForm,
};
use tracing_subscriber::EnvFilter;

use crate::store::FileStore;
use crate::transport::ReqwestTransport;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Form(#[from] FormError),
    #[error("{0}")]
    Auth(String),
    #[error("not signed in; run `storaige login` first")]
    NotSignedIn,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "storaige", about = "storAIge session CLI")]
struct Cli {
    /// API origin. Falls back to `STORAIGE_API_BASE_URL`, then `http://localhost:8080`.
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, env = "STORAIGE_STATE_FILE", default_value = ".storaige-session.json")]
    state_file: PathBuf,

    /// Request timeout. Falls back to `STORAIGE_REQUEST_TIMEOUT_SECS`, then 15.
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "STORAIGE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account. Does not sign in.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "STORAIGE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to `--password`.
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Clear the local session and end it on the server.
    Logout,
    /// Check the stored session against the server and print the user.
    Whoami,
    /// Sliding refresh through the profile endpoint.
    Refresh,
    /// Exchange the stored token through the refresh endpoint.
    Rotate,
    /// Print what is stored locally without contacting the server.
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = session_config(&cli)?;

    let file = Rc::new(FileStore::open(&cli.state_file));
    tracing::debug!(path = %file.path().display(), "session file");
    let manager = SessionManager::new(config, SessionStore::new(file), Rc::new(ReqwestTransport::new()?));
    manager.subscribe(|event| {
        if matches!(event, SessionEvent::Expired) {
            tracing::warn!("session expired; stored credentials were cleared");
        }
    });

    let result = run(&manager, cli.command).await;
    manager.dispose();
    print_json(&result?)
}

/// Environment settings, overridden by explicit flags.
fn session_config(cli: &Cli) -> Result<SessionConfig, CliError> {
    let mut config = SessionConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_request_timeout(Duration::from_secs(secs))?;
    }
    Ok(config)
}

async fn run(manager: &SessionManager, command: Command) -> Result<Value, CliError> {
    match command {
        Command::Login { email, password } => {
            let form = LoginForm::new(&email, &password);
            let email = form.validate()?;
            if manager.login(email, &form.password).await {
                user_json(manager)
            } else {
                Err(failure(manager, "login failed"))
            }
        }
        Command::Signup { name, email, password, confirm_password } => {
            let form = SignupForm {
                name,
                email,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
            };
            form.validate()?;
            let message = manager.register(&form).await.map_err(CliError::Auth)?;
            Ok(json!({ "message": message }))
        }
        Command::Logout => {
            manager.logout().await;
            Ok(json!({ "loggedOut": true }))
        }
        Command::Whoami => {
            restore(manager).await?;
            user_json(manager)
        }
        Command::Refresh => {
            restore(manager).await?;
            let rotated = manager.refresh().await;
            if let Some(message) = manager.state().error() {
                return Err(CliError::Auth(message.to_owned()));
            }
            Ok(json!({ "tokenRotated": rotated, "user": serde_json::to_value(manager.state().user())? }))
        }
        Command::Rotate => {
            restore(manager).await?;
            if manager.rotate().await {
                Ok(json!({ "tokenRotated": true }))
            } else if manager.store().token().is_none() {
                Err(CliError::NotSignedIn)
            } else {
                Err(CliError::Auth("token rotation failed".to_owned()))
            }
        }
        Command::Status => {
            let store = manager.store();
            Ok(json!({
                "baseUrl": manager.config().base_url,
                "tokenPresent": store.token().is_some(),
                "user": serde_json::to_value(store.user())?,
            }))
        }
    }
}

/// Run the startup check and require a signed-in session afterwards.
async fn restore(manager: &SessionManager) -> Result<(), CliError> {
    manager.init().await;
    if manager.state().is_authenticated() {
        Ok(())
    } else {
        Err(CliError::NotSignedIn)
    }
}

fn user_json(manager: &SessionManager) -> Result<Value, CliError> {
    match manager.state() {
        AuthState::Authenticated(user) => Ok(serde_json::to_value(user)?),
        _ => Err(CliError::NotSignedIn),
    }
}

fn failure(manager: &SessionManager, fallback: &str) -> CliError {
    let message = manager.state().error().map_or_else(|| fallback.to_owned(), str::to_owned);
    CliError::Auth(message)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
