use crate::error::AccountsError;
use crate::types::account::{UserProfile, UserType};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "lodging-accounts")]
#[command(about = "Student and house-owner account registration and login")]
#[command(version)]
pub struct Cli {
    /// Database URL, e.g. sqlite://user_management.db
    ///
    /// Overrides DATABASE_URL from the environment or .env file.
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Register a new account
    Register {
        /// Account kind: "Student" or "House Owner" (also house-owner)
        #[arg(long, value_parser = parse_user_type, default_value = "Student")]
        user_type: UserType,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, env = "ACCOUNT_PASSWORD", hide_env_values = true, default_value = "")]
        password: String,
        /// Required for house owners
        #[arg(long, default_value = "")]
        location: String,
    },
    /// Check a username and password
    Login {
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, env = "ACCOUNT_PASSWORD", hide_env_values = true, default_value = "")]
        password: String,
    },
    /// Show the profile stored for a username
    Lookup {
        username: String,
        /// Print the profile as JSON
        #[arg(long)]
        json: bool,
    },
    /// Verify that the database is reachable
    Check,
}

fn parse_user_type(s: &str) -> Result<UserType, String> {
    s.parse::<UserType>().map_err(|e| e.to_string())
}

/// Text for the `lookup` command: `Ok` goes to stdout, `Err` to stderr.
pub fn render_lookup(
    username: &str,
    found: Result<Option<UserProfile>, AccountsError>,
    json: bool,
) -> Result<String, String> {
    match found {
        Ok(Some(profile)) if json => serde_json::to_string_pretty(&profile)
            .map_err(|e| format!("Could not encode profile: {e}")),
        Ok(Some(profile)) => Ok(profile.to_string()),
        Ok(None) => Err(format!("No user named {username:?}")),
        Err(e) => Err(format!("Lookup failed: {e}")),
    }
}
