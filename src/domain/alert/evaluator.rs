use tracing::{debug, instrument};

use crate::domain::store::{
    DataStoreClient, Procedure, StoreRow, PERCENTAGE_CHANGE_COLUMN, SYMBOL_COLUMN,
};
use crate::domain::InvocationContext;
use crate::utils::AlertError;

/// One security matching the alert criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRow {
    pub symbol: String,
    pub percentage_change: String,
}

impl EvaluationRow {
    pub fn new(symbol: impl Into<String>, percentage_change: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            percentage_change: percentage_change.into(),
        }
    }

    fn from_store_row(row: &StoreRow) -> Result<Self, AlertError> {
        let column = |name: &str| {
            row.get(name).cloned().ok_or_else(|| {
                AlertError::DataStore(format!("evaluation row is missing column `{}`", name))
            })
        };

        Ok(Self {
            symbol: column(SYMBOL_COLUMN)?,
            percentage_change: column(PERCENTAGE_CHANGE_COLUMN)?,
        })
    }
}

/// Human-readable list of matching securities; empty means "no match".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertSummary(String);

impl AlertSummary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `"\n{symbol}({percentageChange}) "` per row, in row order.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a EvaluationRow>) -> Self {
        let mut summary = String::new();
        for row in rows {
            summary.push_str(&format!("\n{}({}) ", row.symbol, row.percentage_change));
        }
        Self(summary)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Runs the evaluation procedure and folds its rows into an [`AlertSummary`].
#[derive(Debug, Clone)]
pub struct AlertEvaluator {
    procedure: Procedure,
}

impl AlertEvaluator {
    pub fn new(procedure: Procedure) -> Self {
        Self { procedure }
    }

    #[instrument(skip_all, fields(invocation_id = %ctx.invocation_id, alert_id = ctx.alert_id))]
    pub async fn evaluate(
        &self,
        ctx: &InvocationContext,
        store: &DataStoreClient,
    ) -> Result<AlertSummary, AlertError> {
        let rows = store
            .query(&self.procedure, ctx.alert_id)
            .await?
            .iter()
            .map(EvaluationRow::from_store_row)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(matches = rows.len(), "Alert evaluated");
        Ok(AlertSummary::from_rows(&rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionParameters;
    use crate::domain::store::client::MockAlertStore;
    use std::sync::Arc;

    fn store_with(rows: Vec<StoreRow>) -> DataStoreClient {
        let mut store = MockAlertStore::new();
        store
            .expect_call_procedure()
            .withf(|_, procedure, value| procedure.name == "SecurityAlertCheck" && value == "11")
            .times(1)
            .returning(move |_, _, _| Ok(rows.clone()));
        DataStoreClient::new(
            Arc::new(store),
            ConnectionParameters {
                host: "db".into(),
                database: "securities".into(),
                username: "alerts".into(),
                password: crate::domain::credential::Credential::new("pw"),
                timeout_seconds: 30,
            },
        )
    }

    fn row(symbol: &str, change: &str) -> StoreRow {
        StoreRow::from([
            ("symbol".to_string(), symbol.to_string()),
            ("percentageChange".to_string(), change.to_string()),
        ])
    }

    fn evaluator() -> AlertEvaluator {
        AlertEvaluator::new(Procedure::evaluation("SecurityAlertCheck").unwrap())
    }

    #[test]
    fn should_concatenate_rows_in_order() {
        let rows = [
            EvaluationRow::new("AAPL", "+2.1%"),
            EvaluationRow::new("GOOG", "-0.4%"),
            EvaluationRow::new("MSFT", "+1.0%"),
        ];

        let summary = AlertSummary::from_rows(&rows);

        assert_eq!(summary.as_str(), "\nAAPL(+2.1%) \nGOOG(-0.4%) \nMSFT(+1.0%) ");
    }

    #[test]
    fn should_not_sort_rows() {
        let rows = [EvaluationRow::new("ZZZ", "1"), EvaluationRow::new("AAA", "2")];

        assert_eq!(AlertSummary::from_rows(&rows).as_str(), "\nZZZ(1) \nAAA(2) ");
    }

    #[test]
    fn should_be_empty_without_rows() {
        assert!(AlertSummary::from_rows(&Vec::<EvaluationRow>::new()).is_empty());
    }

    #[tokio::test]
    async fn should_evaluate_rows_from_store() {
        // Arrange
        let store = store_with(vec![row("AAPL", "+2.1%"), row("GOOG", "-0.4%")]);
        let ctx = InvocationContext::new(11, "SecurityAlertSNS");

        // Act
        let summary = evaluator().evaluate(&ctx, &store).await.unwrap();

        // Assert
        assert_eq!(summary.as_str(), "\nAAPL(+2.1%) \nGOOG(-0.4%) ");
    }

    #[tokio::test]
    async fn should_keep_empty_values_from_null_columns() {
        let store = store_with(vec![row("TSLA", "")]);
        let ctx = InvocationContext::new(11, "SecurityAlertSNS");

        let summary = evaluator().evaluate(&ctx, &store).await.unwrap();

        assert_eq!(summary.as_str(), "\nTSLA() ");
    }

    #[tokio::test]
    async fn should_fail_on_missing_column() {
        let store = store_with(vec![StoreRow::from([("symbol".to_string(), "AAPL".to_string())])]);
        let ctx = InvocationContext::new(11, "SecurityAlertSNS");

        let result = evaluator().evaluate(&ctx, &store).await;

        assert!(matches!(result, Err(AlertError::DataStore(msg)) if msg.contains("percentageChange")));
    }
}
