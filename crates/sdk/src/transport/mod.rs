//! Transport layer for the Veil Mail SDK.

pub mod http;

pub use http::HttpTransport;
