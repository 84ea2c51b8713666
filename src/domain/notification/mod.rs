pub mod dispatcher;
pub mod publisher;

pub use dispatcher::{NotificationDispatcher, NotificationTarget};
pub use publisher::{Publisher, PublisherClient, SnsPublisher};
