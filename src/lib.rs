//! Client for REST APIs following the paginated list/detail convention.
//!
//! ```no_run
//! use serde_json::json;
//! use vb_api::{ApiClient, ClientConfig, Page};
//!
//! # async fn run() -> vb_api::client::Result<()> {
//! let mut api = ApiClient::new(ClientConfig::new("api.example.com", "secret"))?;
//!
//! let mut widgets = api.list("widgets", &["active=true"], None).await?;
//! while api.cursor("widgets").next.is_some() {
//!     widgets.extend(api.list("widgets", &[], Some(Page::Next)).await?);
//! }
//!
//! let created = api.create("widgets", &json!({"name": "bolt"}), &[]).await?;
//! api.patch("widgets", &json!({"id": created["id"], "name": "nut"}), &[]).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod id;
pub mod logging;
pub mod result;

pub use client::{ApiClient, ClientConfig, ClientError, Page, PageCursor};
pub use id::ResourceId;
