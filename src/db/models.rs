use crate::types::account::{UserAccount, UserProfile, UserType};
use chrono::NaiveDateTime;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub user_type: String,
    pub name: String,
    pub phone: String,
    pub username: String,
    pub location: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbProfile {
    pub user_type: String,
    pub name: String,
    pub phone: String,
    pub location: Option<String>,
}

fn decode_user_type(raw: &str) -> Result<UserType, sqlx::Error> {
    raw.parse::<UserType>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

impl TryFrom<DbUser> for UserAccount {
    type Error = sqlx::Error;

    fn try_from(d: DbUser) -> Result<Self, Self::Error> {
        Ok(UserAccount {
            id: d.id,
            user_type: decode_user_type(&d.user_type)?,
            name: d.name,
            phone: d.phone,
            username: d.username,
            location: d.location,
            created_at: d.created_at,
        })
    }
}

impl TryFrom<DbProfile> for UserProfile {
    type Error = sqlx::Error;

    fn try_from(d: DbProfile) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            user_type: decode_user_type(&d.user_type)?,
            name: d.name,
            phone: d.phone,
            location: d.location,
        })
    }
}
