use crate::config::ConfigError;

pub const DEFAULT_EVALUATION_PROCEDURE: &str = "SecurityAlertCheck";
pub const DEFAULT_TARGET_PROCEDURE: &str = "GetSecurityAlertURL";

/// Name of the single input parameter both procedures take.
pub const ALERT_PARAMETER: &str = "AlertTypeID";

pub const SYMBOL_COLUMN: &str = "symbol";
pub const PERCENTAGE_CHANGE_COLUMN: &str = "percentageChange";
pub const TARGET_ADDRESS_COLUMN: &str = "awsSNSURL";

/// A stored procedure call site: its name, input parameter and the columns
/// read back from each result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    pub name: String,
    pub parameter: String,
    pub columns: Vec<String>,
}

impl Procedure {
    /// The name is spliced into the `CALL` statement, so only plain
    /// (optionally schema-qualified) identifiers are accepted.
    pub fn new(
        name: impl Into<String>,
        parameter: impl Into<String>,
        columns: &[&str],
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(ConfigError::InvalidProcedureName(name));
        }

        Ok(Self {
            name,
            parameter: parameter.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        })
    }

    /// Evaluation procedure: one `(symbol, percentageChange)` row per match.
    pub fn evaluation(name: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(
            name,
            ALERT_PARAMETER,
            &[SYMBOL_COLUMN, PERCENTAGE_CHANGE_COLUMN],
        )
    }

    /// Target-lookup procedure: `(awsSNSURL)` rows.
    pub fn target_lookup(name: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(name, ALERT_PARAMETER, &[TARGET_ADDRESS_COLUMN])
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            !part.is_empty()
                && !part.starts_with(|c: char| c.is_ascii_digit())
                && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
