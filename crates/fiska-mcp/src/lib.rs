//! MCP server exposing the Fiska accounting API as callable tools.
//!
//! Speaks JSON-RPC 2.0 over stdio, one message per line. The tool surface
//! wraps the typed `fiska` client: listing and fetching contacts and
//! invoices, creating contacts, counting, and driving PDF-generation jobs
//! to completion. Results are rendered as short text summaries.

pub mod protocol;
pub mod server;
pub mod summary;
pub mod tools;
pub mod transport;

pub use server::McpServer;
pub use tools::Toolbox;
