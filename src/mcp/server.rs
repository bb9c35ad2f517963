//! MCP server that reads JSON-RPC 2.0 messages from stdin and writes
//! responses to stdout.
//!
//! The server exposes symbol-query tools via the Model Context Protocol.
//! Each inbound line is handled on its own task, with index queries run
//! off the read loop, so a slow query never stalls the next message.
//! Replies may complete out of order; correlation is by id only, and a
//! single writer task serializes outbound lines.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::errors::{Result, ServerError};
use crate::index::SemanticIndex;

use super::tools::{self, get_tool_definitions, handle_tool_call};
use super::transport::{recover_id, ErrorCode, JsonRpcRequest, JsonRpcResponse};

/// Wire protocol version advertised during the handshake.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Runtime statistics for the MCP server.
pub struct ServerStats {
    started_at: Instant,
    total_requests: AtomicU64,
    tool_calls: AtomicU64,
    errors: AtomicU64,
}

impl ServerStats {
    fn new() -> Self {
        Self {
            started_at: Instant::now(),
            total_requests: AtomicU64::new(0),
            tool_calls: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
}

/// The MCP server wrapping an injected semantic index snapshot.
pub struct McpServer {
    index: Arc<dyn SemanticIndex>,
    stats: ServerStats,
}

/// Returns `true` for methods that are notifications and must never be
/// answered, not even with an error.
fn is_notification(method: &str) -> bool {
    matches!(method, "initialized" | "notifications/initialized")
}

/// Builds the reply for a request whose handler panicked.
///
/// A panicking handler still owes its request a reply, but a line that
/// classifies as a notification (or carries no id) gets none even on
/// internal failure.
fn panic_fallback_reply(raw: &str) -> Option<JsonRpcResponse> {
    if let Ok(request) = serde_json::from_str::<JsonRpcRequest>(raw) {
        if is_notification(&request.method) || request.id.is_null() {
            return None;
        }
    }
    Some(JsonRpcResponse::error(
        recover_id(raw),
        ErrorCode::InternalError,
        "request handler panicked".to_string(),
    ))
}

impl McpServer {
    /// Creates a new MCP server backed by the given semantic index.
    ///
    /// Fails if a declared tool is missing from the dispatch table.
    pub fn new(index: Arc<dyn SemanticIndex>) -> Result<Self> {
        tools::validate_registry()?;
        Ok(Self {
            index,
            stats: ServerStats::new(),
        })
    }

    /// Runs the server, reading JSON-RPC requests from stdin and writing
    /// responses to stdout. Runs until stdin is closed.
    pub async fn run(self: Arc<Self>) -> Result<()> {
        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();

        // One writer task owns stdout: a full line per reply, flushed,
        // so concurrent handlers never interleave partial writes.
        let (reply_tx, mut reply_rx) = mpsc::channel::<String>(64);
        let writer = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(line) = reply_rx.recv().await {
                if stdout.write_all(line.as_bytes()).await.is_err() {
                    break;
                }
                if stdout.write_all(b"\n").await.is_err() {
                    break;
                }
                if stdout.flush().await.is_err() {
                    break;
                }
            }
        });

        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }

            let server = Arc::clone(&self);
            let tx = reply_tx.clone();
            tokio::spawn(async move {
                let raw = line.clone();
                let handled =
                    tokio::task::spawn_blocking(move || server.handle_line(&line)).await;

                let response = match handled {
                    Ok(response) => response,
                    Err(e) => {
                        error!(error = %e, "request handler panicked");
                        panic_fallback_reply(&raw)
                    }
                };

                if let Some(resp) = response {
                    match serde_json::to_string(&resp) {
                        Ok(json_line) => {
                            let _ = tx.send(json_line).await;
                        }
                        Err(e) => error!(error = %e, "failed to serialize response"),
                    }
                }
            });
        }

        // In-flight handlers hold their own sender clones; the writer
        // drains them before exiting.
        drop(reply_tx);
        let _ = writer.await;

        info!(
            total_requests = self.stats.total_requests.load(Ordering::Relaxed),
            tool_calls = self.stats.tool_calls.load(Ordering::Relaxed),
            errors = self.stats.errors.load(Ordering::Relaxed),
            uptime_secs = self.stats.started_at.elapsed().as_secs(),
            "stdin closed, shutting down"
        );
        Ok(())
    }

    /// Handles one raw inbound line, returning the reply to write (if any).
    pub fn handle_line(&self, raw: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(raw) {
            Ok(request) => self.handle_request(&request),
            Err(e) => {
                error!(error = %e, "failed to parse JSON-RPC request");
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                Some(JsonRpcResponse::error(
                    recover_id(raw),
                    ErrorCode::ParseError,
                    format!("failed to parse JSON-RPC request: {}", e),
                ))
            }
        }
    }

    /// Dispatches a parsed JSON-RPC request to the appropriate handler.
    ///
    /// Returns `None` for notifications and for any message without an
    /// id; those must not be answered regardless of internal outcome.
    fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        let id = request.id.clone();

        if is_notification(&request.method) {
            debug!(method = request.method.as_str(), "notification received");
            return None;
        }
        if id.is_null() {
            debug!(
                method = request.method.as_str(),
                "ignoring message without id"
            );
            return None;
        }

        let result = match request.method.as_str() {
            "initialize" => Some(self.handle_initialize(id)),
            // "listTools" is the legacy synonym kept for older clients.
            "tools/list" | "listTools" => Some(self.handle_tools_list(id)),
            "tools/call" => Some(self.handle_tools_call(id, &request.params)),
            "ping" => Some(JsonRpcResponse::success(id, json!({}))),
            method if tools::is_tool(method) => {
                // Legacy direct form: the tool name as the method, its
                // arguments as the params, no envelope.
                let args = request.params.clone().unwrap_or(json!({}));
                Some(self.invoke_tool(id, method, args))
            }
            _ => Some(JsonRpcResponse::error(
                id,
                ErrorCode::MethodNotFound,
                format!("method not found: {}", request.method),
            )),
        };

        // Track errors
        if let Some(ref resp) = result {
            if resp.error.is_some() {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
            }
        }

        result
    }

    /// Handles the `initialize` method, returning server capabilities.
    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": get_tool_definitions()
                },
                "serverInfo": {
                    "name": "symlens",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    /// Handles the `tools/list` method, returning all available tool definitions.
    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let tools = get_tool_definitions();
        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    /// Handles the `tools/call` method, unwrapping the envelope and
    /// dispatching to the named tool.
    fn handle_tools_call(&self, id: Value, params: &Option<Value>) -> JsonRpcResponse {
        let params = match params {
            Some(p) => p,
            None => {
                return JsonRpcResponse::error(
                    id,
                    ErrorCode::InvalidParams,
                    "missing params for tools/call".to_string(),
                );
            }
        };

        let tool_name = match params.get("name").and_then(|v| v.as_str()) {
            Some(name) => name,
            None => {
                return JsonRpcResponse::error(
                    id,
                    ErrorCode::InvalidParams,
                    "missing 'name' in tools/call params".to_string(),
                );
            }
        };

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));
        self.invoke_tool(id, tool_name, arguments)
    }

    /// Invokes one tool and wraps the outcome into a reply.
    ///
    /// Protocol-tier failures map onto distinct numeric codes; domain
    /// outcomes come back as successful replies with the error flag set.
    fn invoke_tool(&self, id: Value, tool_name: &str, args: Value) -> JsonRpcResponse {
        self.stats.tool_calls.fetch_add(1, Ordering::Relaxed);

        match handle_tool_call(self.index.as_ref(), tool_name, args) {
            Ok(result) => match serde_json::to_value(&result) {
                Ok(payload) => JsonRpcResponse::success(id, payload),
                Err(e) => {
                    error!(error = %e, tool = tool_name, "failed to encode tool result");
                    JsonRpcResponse::error_with_data(
                        id,
                        ErrorCode::InternalError,
                        "failed to encode tool result".to_string(),
                        json!(e.to_string()),
                    )
                }
            },
            Err(ServerError::UnknownTool(name)) => JsonRpcResponse::error(
                id,
                ErrorCode::MethodNotFound,
                format!("unknown tool: {}", name),
            ),
            Err(ServerError::InvalidParams(message)) => JsonRpcResponse::error(
                id,
                ErrorCode::InvalidParams,
                format!("invalid params: {}", message),
            ),
            Err(e) => {
                error!(error = %e, tool = tool_name, "tool execution failed");
                JsonRpcResponse::error_with_data(
                    id,
                    ErrorCode::InternalError,
                    "tool execution failed".to_string(),
                    json!(e.to_string()),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_fallback_skips_notifications_and_idless_lines() {
        assert!(panic_fallback_reply(r#"{"jsonrpc":"2.0","method":"initialized"}"#).is_none());
        assert!(panic_fallback_reply(
            r#"{"jsonrpc":"2.0","method":"notifications/initialized","id":3}"#
        )
        .is_none());
        assert!(panic_fallback_reply(r#"{"jsonrpc":"2.0","method":"tools/list"}"#).is_none());
    }

    #[test]
    fn test_panic_fallback_answers_identified_requests() {
        let response =
            panic_fallback_reply(r#"{"jsonrpc":"2.0","id":5,"method":"tools/list"}"#).unwrap();
        assert_eq!(response.id, json!(5));
        assert_eq!(
            response.error.unwrap().code,
            ErrorCode::InternalError.as_i32()
        );
    }
}
