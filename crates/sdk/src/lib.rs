//! # Veil Mail SDK
//!
//! Minimal Rust client for the Veil Mail REST API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use veilmail_sdk::{ApiRequest, VeilMailClient, VeilMailResult};
//!
//! # async fn example() -> VeilMailResult<()> {
//! let client = VeilMailClient::builder()
//!     .api_key("vm_live_your_key")
//!     .build()?;
//!
//! let domains = client.execute(&ApiRequest::get("/v1/domains")).await?;
//! println!("{}", serde_json::to_string_pretty(&domains)?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod transport;

pub use client::{VeilMailClient, VeilMailClientBuilder};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
pub use error::{VeilMailError, VeilMailResult};
pub use request::{path_segment, ApiRequest, QueryString};
pub use transport::HttpTransport;

pub use reqwest::Method;
