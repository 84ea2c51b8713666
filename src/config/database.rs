use std::fmt;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::debug;
use url::Url;

use super::AppConfig;
use crate::domain::credential::Credential;

/// Everything needed to open one store connection.
///
/// Built per invocation from [`AppConfig`] and the decrypted [`Credential`].
/// The password stays a [`Credential`], so it is wiped when the parameters drop.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParameters {
    pub host: String,
    pub database: String,
    pub username: String,
    pub password: Credential,
    pub timeout_seconds: u64,
}

impl ConnectionParameters {
    pub fn new(config: &AppConfig, credential: &Credential) -> Self {
        Self {
            host: config.db_host.clone(),
            database: config.database.clone(),
            username: config.db_username.clone(),
            password: credential.clone(),
            timeout_seconds: config.connect_timeout_secs,
        }
    }

    /// MySQL connection URL with percent-encoded credentials.
    pub fn connection_url(&self) -> Result<Url, DbErr> {
        let mut url = Url::parse(&format!("mysql://{}", self.host.trim()))
            .map_err(|e| DbErr::Custom(format!("invalid database host `{}`: {}", self.host, e)))?;

        url.set_path(&self.database);
        url.set_username(&self.username)
            .and_then(|_| url.set_password(Some(self.password.expose())))
            .map_err(|_| DbErr::Custom("database URL cannot carry credentials".to_string()))?;

        Ok(url)
    }

    pub fn connect_options(&self) -> Result<ConnectOptions, DbErr> {
        let mut options = ConnectOptions::new(self.connection_url()?.to_string());
        options
            .connect_timeout(Duration::from_secs(self.timeout_seconds))
            .acquire_timeout(Duration::from_secs(self.timeout_seconds))
            .max_connections(1)
            .min_connections(0)
            .sqlx_logging(false);
        Ok(options)
    }
}

impl fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParameters")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Opens a fresh, unpooled connection. The caller owns it and must close it.
pub async fn establish_connection(
    params: &ConnectionParameters,
) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(params.connect_options()?).await?;
    debug!(host = %params.host, database = %params.database, "Connected to the database.");
    Ok(db)
}
