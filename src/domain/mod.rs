pub mod alert;
pub mod context;
pub mod credential;
pub mod notification;
pub mod store;

pub use context::InvocationContext;
