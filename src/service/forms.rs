//! Input rules and user-facing feedback for the login and registration forms.
//!
//! The store accepts whatever it is given; the presence checks and the
//! house-owner location rule live here.

use crate::db::sqlite::CredentialStore;
use crate::types::account::{NewUser, RegisterOutcome, UserType};
use std::fmt;
use thiserror::Error as ThisError;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum FormError {
    #[error("Please fill in all required fields.")]
    MissingFields,
    #[error("Please enter both username and password.")]
    MissingCredentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Information,
    Error,
}

/// What the user is shown after submitting a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub title: String,
    pub message: String,
}

impl Feedback {
    fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Information,
            title: title.to_string(),
            message: message.into(),
        }
    }

    fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == FeedbackKind::Information
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub user_type: UserType,
    pub name: String,
    pub phone: String,
    pub username: String,
    pub password: String,
    pub location: String,
}

fn blank(s: &str) -> bool {
    s.is_empty()
}

impl RegistrationForm {
    pub fn validate(self) -> Result<NewUser, FormError> {
        let missing = blank(&self.name)
            || blank(&self.phone)
            || blank(&self.username)
            || blank(&self.password)
            || (self.user_type == UserType::HouseOwner && blank(&self.location));
        if missing {
            return Err(FormError::MissingFields);
        }

        let location = (!blank(&self.location)).then_some(self.location);
        Ok(NewUser {
            user_type: self.user_type,
            name: self.name,
            phone: self.phone,
            username: self.username,
            password: self.password,
            location,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormError> {
        if blank(&self.username) || blank(&self.password) {
            return Err(FormError::MissingCredentials);
        }
        Ok(())
    }
}

pub async fn submit_registration(store: &CredentialStore, form: RegistrationForm) -> Feedback {
    let user = match form.validate() {
        Ok(user) => user,
        Err(e) => return Feedback::error("Registration Error", e.to_string()),
    };

    match store.register(&user).await {
        Ok(RegisterOutcome::Created(_)) => {
            Feedback::info("Success", "User registered successfully!")
        }
        Ok(RegisterOutcome::UsernameTaken) => registration_failed(),
        Err(e) => {
            error!(username = %user.username, error = %e, "registration could not reach the store");
            registration_failed()
        }
    }
}

fn registration_failed() -> Feedback {
    Feedback::error(
        "Registration Failed",
        "Username may already exist or there was a database error.",
    )
}

/// Failed logins produce the same feedback whether the username was unknown,
/// the password wrong, or the store unavailable.
pub async fn submit_login(store: &CredentialStore, form: LoginForm) -> Feedback {
    if let Err(e) = form.validate() {
        return Feedback::error("Login Error", e.to_string());
    }

    match store.login(&form.username, &form.password).await {
        Ok(true) => {
            info!(username = %form.username, "user logged in");
            Feedback::info("Login Successful", format!("Welcome, {}!", form.username))
        }
        Ok(false) => login_failed(),
        Err(e) => {
            error!(username = %form.username, error = %e, "login could not reach the store");
            login_failed()
        }
    }
}

fn login_failed() -> Feedback {
    Feedback::error("Login Failed", "Invalid username or password.")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> RegistrationForm {
        RegistrationForm {
            user_type: UserType::Student,
            name: "Amina".into(),
            phone: "555-0101".into(),
            username: "amina".into(),
            password: "pw".into(),
            location: String::new(),
        }
    }

    #[test]
    fn student_without_location_is_valid() {
        let user = student().validate().expect("student form is complete");
        assert_eq!(user.location, None);
        assert_eq!(user.user_type, UserType::Student);
    }

    #[test]
    fn house_owner_requires_location() {
        let form = RegistrationForm {
            user_type: UserType::HouseOwner,
            ..student()
        };
        assert_eq!(form.validate(), Err(FormError::MissingFields));

        let form = RegistrationForm {
            user_type: UserType::HouseOwner,
            location: "Mirpur 10".into(),
            ..student()
        };
        let user = form.validate().expect("owner with location");
        assert_eq!(user.location.as_deref(), Some("Mirpur 10"));
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        for form in [
            RegistrationForm { name: String::new(), ..student() },
            RegistrationForm { phone: String::new(), ..student() },
            RegistrationForm { username: String::new(), ..student() },
            RegistrationForm { password: String::new(), ..student() },
        ] {
            assert_eq!(form.validate(), Err(FormError::MissingFields));
        }
    }

    #[test]
    fn whitespace_counts_as_present() {
        let user = RegistrationForm {
            password: "   ".into(),
            ..student()
        }
        .validate()
        .expect("whitespace password is accepted");
        assert_eq!(user.password, "   ");

        let form = LoginForm {
            username: " ".into(),
            password: " ".into(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn login_form_requires_both_fields() {
        let form = LoginForm {
            username: "amina".into(),
            password: String::new(),
        };
        assert_eq!(form.validate(), Err(FormError::MissingCredentials));
        let form = LoginForm {
            username: "amina".into(),
            password: "pw".into(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn feedback_display_joins_title_and_message() {
        assert_eq!(
            login_failed().to_string(),
            "Login Failed: Invalid username or password."
        );
        assert!(!login_failed().is_success());
    }
}
