use std::env;

use crate::domain::store::{
    Procedure, DEFAULT_EVALUATION_PROCEDURE, DEFAULT_TARGET_PROCEDURE,
};

/// Default connection timeout for the relational store, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
/// Environment variable holding the base64 KMS ciphertext of the DB password.
pub const DEFAULT_PASSWORD_VAR: &str = "PASSWORD";
pub const DEFAULT_AWS_REGION: &str = "us-east-2";

/// Per-invocation settings.
///
/// Read from the environment every time an alert is invoked; nothing here is
/// cached between invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_host: String,
    pub database: String,
    pub db_username: String,
    /// Name of the variable carrying the encrypted password, not the password.
    pub password_var: String,
    /// Execution-context name bound into the KMS encryption context.
    pub function_name: String,
    pub connect_timeout_secs: u64,
    pub evaluation_procedure: Procedure,
    pub target_procedure: Procedure,
}

impl AppConfig {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let db_host = require("DB_ENDPOINT")?;
        let database = require("DATABASE")?;
        let db_username = get("DB_USER")
            .or_else(|| get("USER"))
            .ok_or(ConfigError::Missing("DB_USER"))?;
        let password_var = get("DB_PASSWORD_VAR").unwrap_or_else(|| DEFAULT_PASSWORD_VAR.to_string());
        let function_name = require("AWS_LAMBDA_FUNCTION_NAME")?;

        let connect_timeout_secs = match get("DB_CONNECT_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            None => DEFAULT_CONNECT_TIMEOUT_SECS,
        };

        let evaluation_name = get("ALERT_EVALUATION_PROCEDURE")
            .unwrap_or_else(|| DEFAULT_EVALUATION_PROCEDURE.to_string());
        let target_name = get("ALERT_TARGET_PROCEDURE")
            .unwrap_or_else(|| DEFAULT_TARGET_PROCEDURE.to_string());

        Ok(Self {
            db_host,
            database,
            db_username,
            password_var,
            function_name,
            connect_timeout_secs,
            evaluation_procedure: Procedure::evaluation(evaluation_name)?,
            target_procedure: Procedure::target_lookup(target_name)?,
        })
    }
}

/// HTTP trigger settings, read once when `serve` starts.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        Ok(Self { server_port })
    }
}

/// AWS region for the KMS and SNS clients. Needed by every trigger mode.
pub fn aws_region_from_env() -> String {
    aws_region_from_lookup(|key| env::var(key).ok())
}

pub fn aws_region_from_lookup<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("AWS_REGION")
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| {
            tracing::warn!(
                region = DEFAULT_AWS_REGION,
                "AWS_REGION is not set, falling back to the default region"
            );
            DEFAULT_AWS_REGION.to_string()
        })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("Invalid port number")]
    InvalidPort,
    #[error("Invalid connection timeout: {0}")]
    InvalidTimeout(String),
    #[error("Invalid stored procedure name: {0}")]
    InvalidProcedureName(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("DB_ENDPOINT", "db.internal:3306"),
        ("DATABASE", "securities"),
        ("DB_USER", "alerts"),
        ("AWS_LAMBDA_FUNCTION_NAME", "SecurityAlertSNS"),
    ];

    #[test]
    fn should_load_defaults() {
        let config = AppConfig::from_lookup(lookup(BASE)).unwrap();

        assert_eq!(config.db_host, "db.internal:3306");
        assert_eq!(config.password_var, "PASSWORD");
        assert_eq!(config.connect_timeout_secs, 30);
        assert_eq!(config.evaluation_procedure.name, "SecurityAlertCheck");
        assert_eq!(config.target_procedure.name, "GetSecurityAlertURL");
    }

    #[test]
    fn should_fall_back_to_user_variable() {
        let pairs: Vec<_> = BASE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "DB_USER")
            .chain([("USER", "legacy")])
            .collect();

        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.db_username, "legacy");
    }

    #[test]
    fn should_report_missing_variable() {
        let pairs: Vec<_> = BASE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "DATABASE")
            .collect();

        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();

        assert!(matches!(err, ConfigError::Missing("DATABASE")));
    }

    #[test]
    fn should_treat_blank_values_as_missing() {
        let pairs: Vec<_> = BASE
            .iter()
            .copied()
            .map(|(k, v)| if k == "AWS_LAMBDA_FUNCTION_NAME" { (k, "  ") } else { (k, v) })
            .collect();

        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();

        assert!(matches!(err, ConfigError::Missing("AWS_LAMBDA_FUNCTION_NAME")));
    }

    #[test]
    fn should_reject_invalid_timeout() {
        let pairs: Vec<_> = BASE
            .iter()
            .copied()
            .chain([("DB_CONNECT_TIMEOUT_SECS", "0")])
            .collect();

        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidTimeout(raw) if raw == "0"));
    }

    #[test]
    fn should_reject_procedure_name_with_sql() {
        let pairs: Vec<_> = BASE
            .iter()
            .copied()
            .chain([("ALERT_TARGET_PROCEDURE", "x(); DROP TABLE alerts; --")])
            .collect();

        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidProcedureName(_)));
    }

    #[test]
    fn should_resolve_region_regardless_of_server_port() {
        let pairs = [("SERVER_PORT", "not-a-port"), ("AWS_REGION", "eu-west-1")];

        let region = aws_region_from_lookup(lookup(&pairs));

        assert_eq!(region, "eu-west-1");
    }

    #[test]
    fn should_default_region_when_unset() {
        assert_eq!(aws_region_from_lookup(lookup(&[])), "us-east-2");
    }

    #[test]
    fn should_parse_server_port() {
        let config = ServerConfig::from_lookup(lookup(&[("SERVER_PORT", "9090")])).unwrap();
        assert_eq!(config.server_port, 9090);

        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn should_reject_invalid_server_port() {
        let err = ServerConfig::from_lookup(lookup(&[("SERVER_PORT", "not-a-port")])).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidPort));
    }
}
