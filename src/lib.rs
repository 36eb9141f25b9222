pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod service;
pub mod types;

pub use db::sqlite::{CredentialStore, StoreSettings};
pub use error::AccountsError;
pub use types::account::{NewUser, RegisterOutcome, UserProfile, UserType};
