use sea_orm::{
    prelude::Decimal, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, QueryResult,
    Statement, Value,
};
use tracing::{error, warn};

use super::{AlertStore, Procedure, StoreRow};
use crate::config::{establish_connection, ConnectionParameters};
use crate::utils::AlertError;

/// sea-orm / MySQL implementation of [`AlertStore`].
///
/// Holds no connection between calls; every call connects, runs one
/// `CALL`, collects the rows and closes the connection.
#[derive(Debug, Clone, Default)]
pub struct MySqlAlertStore;

impl MySqlAlertStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl AlertStore for MySqlAlertStore {
    async fn call_procedure(
        &self,
        params: &ConnectionParameters,
        procedure: &Procedure,
        value: &str,
    ) -> Result<Vec<StoreRow>, AlertError> {
        let db = establish_connection(params).await.map_err(|e| {
            error!(host = %params.host, error = %e, "Failed to connect to the database");
            AlertError::DataStore(format!("connection to {} failed: {}", params.host, e))
        })?;

        run_and_close(db, procedure, value).await
    }
}

/// Runs the procedure, then closes `db` whatever the outcome.
async fn run_and_close(
    db: DatabaseConnection,
    procedure: &Procedure,
    value: &str,
) -> Result<Vec<StoreRow>, AlertError> {
    let result = run_procedure(&db, procedure, value).await;

    if let Err(e) = db.close().await {
        warn!(error = %e, "Failed to close database connection");
    }

    result
}

async fn run_procedure(
    db: &DatabaseConnection,
    procedure: &Procedure,
    value: &str,
) -> Result<Vec<StoreRow>, AlertError> {
    let rows = db
        .query_all(call_statement(procedure, value))
        .await
        .map_err(|e| AlertError::DataStore(format!("{} failed: {}", procedure.name, e)))?;

    rows.iter()
        .map(|row| read_row(row, &procedure.columns))
        .collect::<Result<Vec<_>, DbErr>>()
        .map_err(|e| {
            AlertError::DataStore(format!("unexpected result from {}: {}", procedure.name, e))
        })
}

/// `CALL <procedure>(?)` with the value bound positionally.
pub fn call_statement(procedure: &Procedure, value: &str) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::MySql,
        format!("CALL {}(?)", procedure.name),
        [Value::from(value.to_string())],
    )
}

fn read_row(row: &QueryResult, columns: &[String]) -> Result<StoreRow, DbErr> {
    columns
        .iter()
        .map(|column| Ok((column.clone(), column_text(row, column)?)))
        .collect()
}

/// Textual form of a column, whatever its SQL type.
fn column_text(row: &QueryResult, column: &str) -> Result<String, DbErr> {
    if let Ok(text) = row.try_get::<Option<String>>("", column) {
        return Ok(text.unwrap_or_default());
    }
    if let Ok(number) = row.try_get::<Option<Decimal>>("", column) {
        return Ok(number.map(|n| n.to_string()).unwrap_or_default());
    }
    if let Ok(number) = row.try_get::<Option<i64>>("", column) {
        return Ok(number.map(|n| n.to_string()).unwrap_or_default());
    }
    row.try_get::<Option<f64>>("", column)
        .map(|number| number.map(|n| n.to_string()).unwrap_or_default())
}
