pub mod dto;
pub mod evaluator;
pub mod handler;
pub mod pipeline;
pub mod service;
pub mod target;

pub use dto::{AlertRequest, InvocationResponse};
pub use evaluator::{AlertEvaluator, AlertSummary, EvaluationRow};
pub use pipeline::{InvocationOutcome, Pipeline};
pub use service::{AlertService, SettingsLoader};
pub use target::TargetResolver;
