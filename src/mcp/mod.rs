//! MCP (Model Context Protocol) server for symbol queries.
//!
//! Provides a JSON-RPC 2.0 interface over stdio so that AI assistants
//! can ask semantic questions about a loaded code snapshot: resolve a
//! symbol, fetch its declaration source, enumerate references and
//! implementations, list type members.

/// MCP server implementation.
pub mod server;

/// Tool definitions and dispatch.
pub mod tools;

/// JSON-RPC 2.0 transport types.
pub mod transport;

pub use server::McpServer;
pub use tools::{get_tool_definitions, handle_tool_call, ToolContent, ToolDefinition, ToolResult};
pub use transport::{recover_id, ErrorCode, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
