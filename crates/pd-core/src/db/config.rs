//! Database connection settings read from the environment.
//!
//! Only the settings are handled here; opening connections is left to the
//! caller's driver.

use serde::{Serialize, Serializer};

use super::DbError;

/// Username variable (default `root`).
pub const ENV_USERNAME: &str = "PERSONAL_DATA_DB_USERNAME";
/// Password variable (default empty).
pub const ENV_PASSWORD: &str = "PERSONAL_DATA_DB_PASSWORD";
/// Host variable (default `localhost`).
pub const ENV_HOST: &str = "PERSONAL_DATA_DB_HOST";
/// Database name variable (required).
pub const ENV_DATABASE: &str = "PERSONAL_DATA_DB_NAME";

pub const DEFAULT_USERNAME: &str = "root";
pub const DEFAULT_HOST: &str = "localhost";

/// Connection settings for the user database.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct DbConfig {
    pub username: String,
    #[serde(serialize_with = "mask_password")]
    pub password: String,
    pub host: String,
    pub database: String,
}

fn mask_password<S: Serializer>(password: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(masked(password))
}

fn masked(password: &str) -> &'static str {
    if password.is_empty() {
        ""
    } else {
        "***"
    }
}

impl DbConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, DbError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`.
    ///
    /// Variables that are set but empty are taken as-is, except the
    /// database name, which must be non-empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DbError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = lookup(ENV_DATABASE)
            .filter(|name| !name.is_empty())
            .ok_or(DbError::MissingDatabase(ENV_DATABASE))?;

        Ok(Self {
            username: lookup(ENV_USERNAME).unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            password: lookup(ENV_PASSWORD).unwrap_or_default(),
            host: lookup(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            database,
        })
    }
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("username", &self.username)
            .field("password", &masked(&self.password))
            .field("host", &self.host)
            .field("database", &self.database)
            .finish()
    }
}
