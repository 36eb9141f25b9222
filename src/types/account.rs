use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of account holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "Student")]
    Student,
    #[serde(rename = "House Owner")]
    HouseOwner,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Student => "Student",
            UserType::HouseOwner => "House Owner",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUserType(pub String);

impl fmt::Display for UnknownUserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown user type: {:?}", self.0)
    }
}

impl std::error::Error for UnknownUserType {}

impl FromStr for UserType {
    type Err = UnknownUserType;

    /// Accepts the stored spelling plus the kebab/snake forms used on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Student" | "student" => Ok(UserType::Student),
            "House Owner" | "house owner" | "house-owner" | "house_owner" => {
                Ok(UserType::HouseOwner)
            }
            other => Err(UnknownUserType(other.to_string())),
        }
    }
}

/// Values for a registration, as handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub user_type: UserType,
    pub name: String,
    pub phone: String,
    pub username: String,
    pub password: String,
    pub location: Option<String>,
}

/// Display-relevant fields of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_type: UserType,
    pub name: String,
    pub phone: String,
    pub location: Option<String>,
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User: {} ({}) - Phone: {} - Location: {}",
            self.name,
            self.user_type,
            self.phone,
            self.location.as_deref().unwrap_or("-")
        )
    }
}

/// Full account row minus the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub user_type: UserType,
    pub name: String,
    pub phone: String,
    pub username: String,
    pub location: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<UserAccount> for UserProfile {
    fn from(a: UserAccount) -> Self {
        Self {
            user_type: a.user_type,
            name: a.name,
            phone: a.phone,
            location: a.location,
        }
    }
}

/// Result of a registration attempt that reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Exactly one row inserted; carries the new id.
    Created(i64),
    /// The username is already in use.
    UsernameTaken,
}

impl RegisterOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, RegisterOutcome::Created(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_parses_stored_and_cli_spellings() {
        assert_eq!("Student".parse::<UserType>(), Ok(UserType::Student));
        assert_eq!("House Owner".parse::<UserType>(), Ok(UserType::HouseOwner));
        assert_eq!("house-owner".parse::<UserType>(), Ok(UserType::HouseOwner));
        assert!("Landlord".parse::<UserType>().is_err());
    }

    #[test]
    fn user_type_serializes_with_display_name() {
        let json = serde_json::to_string(&UserType::HouseOwner).unwrap();
        assert_eq!(json, r#""House Owner""#);
    }

    #[test]
    fn profile_display_matches_info_line() {
        let profile = UserProfile {
            user_type: UserType::HouseOwner,
            name: "Rita".into(),
            phone: "0170".into(),
            location: Some("Dhanmondi".into()),
        };
        assert_eq!(
            profile.to_string(),
            "User: Rita (House Owner) - Phone: 0170 - Location: Dhanmondi"
        );
    }

    #[test]
    fn register_outcome_reports_creation() {
        assert!(RegisterOutcome::Created(7).is_created());
        assert!(!RegisterOutcome::UsernameTaken.is_created());
    }
}
