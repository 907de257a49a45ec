//! API client modules
//!
//! Configuration, pagination state and error types live in their own
//! modules; [`ApiClient`] ties them to the HTTP transport.

pub mod api;
pub mod config;
pub mod error;
pub mod page;

// Re-export main types for convenience
pub use api::ApiClient;
pub use config::{ClientConfig, DebugConfig, RequestConfig};
pub use error::{ApiFailure, ClientError, Result};
pub use page::{Page, PageCursor, Paginated};
