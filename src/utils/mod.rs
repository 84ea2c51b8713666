pub mod error;
pub mod logging;
pub mod response;

pub use error::AlertError;
pub use response::{BaseResponse, ErrorResponse};
