//! Response models for the web API.

pub mod error;

pub use error::{ApiResult, ErrorResponse};
