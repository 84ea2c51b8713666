use uuid::Uuid;

/// Per-invocation state, passed explicitly to every pipeline component.
///
/// One value is built for each trigger event and dropped when the invocation
/// ends; components never keep a copy of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub invocation_id: Uuid,
    pub alert_id: i64,
    /// Execution-context name bound into the key-management encryption context.
    pub execution_context: String,
}

impl InvocationContext {
    pub fn new(alert_id: i64, execution_context: impl Into<String>) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            alert_id,
            execution_context: execution_context.into(),
        }
    }
}
