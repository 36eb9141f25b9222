use clap::Parser;
use lodging_accounts::cli::{Cli, Commands, render_lookup};
use lodging_accounts::config::Config;
use lodging_accounts::service::forms::{self, LoginForm, RegistrationForm};
use lodging_accounts::CredentialStore;
use mimalloc::MiMalloc;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut cfg = Config::from_env()?;
    if let Some(url) = cli.database_url.clone() {
        cfg.database_url = url;
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        loglevel = %cfg.loglevel,
        max_connections = cfg.max_connections
    );

    let store = CredentialStore::connect_lazy(&cfg.store_settings())?;

    // Keep going without a schema; every command then reports the store as unavailable.
    if let Err(e) = store.ensure_schema().await {
        warn!(
            error = %e,
            "database setup failed; login/registration won't work until database is available"
        );
    }

    let code = match cli.command {
        Commands::Register {
            user_type,
            name,
            phone,
            username,
            password,
            location,
        } => {
            let form = RegistrationForm {
                user_type,
                name,
                phone,
                username,
                password,
                location,
            };
            report(forms::submit_registration(&store, form).await)
        }
        Commands::Login { username, password } => {
            report(forms::submit_login(&store, LoginForm { username, password }).await)
        }
        Commands::Lookup { username, json } => {
            let found = store.lookup(&username).await;
            match render_lookup(&username, found, json) {
                Ok(body) => {
                    println!("{body}");
                    ExitCode::SUCCESS
                }
                Err(msg) => {
                    eprintln!("{msg}");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Check => match store.ping().await {
            Ok(()) => {
                println!("Database connection OK");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Database connection failed: {e}");
                ExitCode::FAILURE
            }
        },
    };

    store.close().await;
    Ok(code)
}

fn report(feedback: forms::Feedback) -> ExitCode {
    if feedback.is_success() {
        println!("{feedback}");
        ExitCode::SUCCESS
    } else {
        eprintln!("{feedback}");
        ExitCode::FAILURE
    }
}
