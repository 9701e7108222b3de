// MCP (Model Context Protocol) server for the Veil Mail API
// Exposes the email, template, domain, audience and analytics endpoints as tools

pub mod codec;
pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
pub use tools::{Dispatcher, VeilMailTool};
