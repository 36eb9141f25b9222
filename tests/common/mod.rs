#![allow(dead_code)]

use lodging_accounts::{CredentialStore, NewUser, StoreSettings, UserType};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A SQLite file under the temp dir that is removed on drop.
pub struct TempDb {
    pub path: PathBuf,
}

impl TempDb {
    pub fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut path = std::env::temp_dir();
        path.push(format!(
            "lodging-accounts-{tag}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        Self { path }
    }

    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    pub fn settings(&self) -> StoreSettings {
        StoreSettings {
            database_url: self.url(),
            max_connections: 4,
            connect_timeout: Duration::from_secs(5),
            query_timeout: Duration::from_secs(5),
        }
    }

    /// A store whose schema is already in place.
    pub async fn store(&self) -> CredentialStore {
        let store = CredentialStore::connect_lazy(&self.settings()).expect("valid database url");
        store.ensure_schema().await.expect("schema init");
        store
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut p = self.path.clone().into_os_string();
            p.push(suffix);
            let _ = std::fs::remove_file(p);
        }
    }
}

pub fn student(username: &str, password: &str) -> NewUser {
    NewUser {
        user_type: UserType::Student,
        name: "A".to_string(),
        phone: "555".to_string(),
        username: username.to_string(),
        password: password.to_string(),
        location: None,
    }
}
