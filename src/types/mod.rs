pub mod account;

pub use account::{NewUser, RegisterOutcome, UserAccount, UserProfile, UserType};
