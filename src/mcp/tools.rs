//! MCP tool definitions and dispatch for symbol queries.
//!
//! Each tool maps to one operation in [`crate::ops`]. Tool definitions
//! include JSON Schema descriptions so that MCP clients can discover
//! available capabilities. Argument payloads deserialize into typed
//! structs; a payload that does not fit the declared shape is an
//! invalid-params protocol error, while domain absence comes back as a
//! successful result flagged with `isError`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{Result, ServerError};
use crate::index::SemanticIndex;
use crate::ops::{self, ToolError, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

/// Maximum character length for a tool response before truncation.
const MAX_RESPONSE_CHARS: usize = 15_000;

/// A tool definition exposed by the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema describing the tool's input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// One piece of tool result content.
///
/// Tagged so that further variants (code, structured JSON) can be added
/// without breaking clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// The tool-call result envelope: content list plus error flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    fn text(text: String) -> Self {
        Self {
            content: vec![ToolContent::Text { text }],
            is_error: false,
        }
    }

    fn tool_error(err: &ToolError) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: err.to_string(),
            }],
            is_error: true,
        }
    }
}

/// Arguments for tools taking only a symbol name.
#[derive(Debug, Deserialize)]
struct SymbolArgs {
    symbol: String,
}

/// Arguments for tools with unbounded result sets.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagedSymbolArgs {
    symbol: String,
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_page_size")]
    page_size: i64,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Returns the list of all tool definitions exposed by this MCP server.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    let symbol_property = json!({
        "type": "string",
        "description": "Symbol name to look up (case-insensitive, unqualified)"
    });
    let page_properties = json!({
        "symbol": symbol_property.clone(),
        "page": {
            "type": "number",
            "description": "1-indexed page number (default: 1)"
        },
        "pageSize": {
            "type": "number",
            "description": "Number of items per page (default: 10)"
        }
    });

    vec![
        ToolDefinition {
            name: "resolveSymbol".to_string(),
            description: "Resolve a symbol name to its kind, namespace, declaring file, and line.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": { "symbol": symbol_property.clone() },
                "required": ["symbol"]
            }),
        },
        ToolDefinition {
            name: "getSymbolSource".to_string(),
            description: "Return the exact original source text of a symbol's declaration(s).".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": { "symbol": symbol_property.clone() },
                "required": ["symbol"]
            }),
        },
        ToolDefinition {
            name: "findReferences".to_string(),
            description: "Find all references to a symbol across the snapshot, paginated.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": page_properties.clone(),
                "required": ["symbol"]
            }),
        },
        ToolDefinition {
            name: "findImplementations".to_string(),
            description: "Find the declarations of all types implementing an interface or base type, paginated.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": page_properties,
                "required": ["symbol"]
            }),
        },
        ToolDefinition {
            name: "listMembers".to_string(),
            description: "List the methods, properties, and fields of a named type as signature strings.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": { "symbol": symbol_property },
                "required": ["symbol"]
            }),
        },
    ]
}

/// Names routed by [`handle_tool_call`], in declaration order.
const TOOL_NAMES: [&str; 5] = [
    "resolveSymbol",
    "getSymbolSource",
    "findReferences",
    "findImplementations",
    "listMembers",
];

/// Returns `true` if the given name is a dispatchable tool.
pub fn is_tool(name: &str) -> bool {
    TOOL_NAMES.contains(&name)
}

/// Verifies that the declaration list and the dispatch table agree in
/// both directions.
///
/// Run once at server construction to catch typos between the two.
pub fn validate_registry() -> Result<()> {
    let declared: Vec<String> = get_tool_definitions()
        .into_iter()
        .map(|t| t.name)
        .collect();

    for name in &declared {
        if !is_tool(name) {
            return Err(ServerError::UnknownTool(format!(
                "tool '{}' is declared but not routed",
                name
            )));
        }
    }
    for name in TOOL_NAMES {
        if !declared.iter().any(|d| d == name) {
            return Err(ServerError::UnknownTool(format!(
                "tool '{}' is routed but not declared",
                name
            )));
        }
    }
    Ok(())
}

/// Dispatches a tool call to the appropriate handler.
///
/// `Err` here is a protocol-tier failure (unknown tool, bad argument
/// shape); domain outcomes are always `Ok` with the error flag set as
/// appropriate.
pub fn handle_tool_call(
    index: &dyn SemanticIndex,
    tool_name: &str,
    args: Value,
) -> Result<ToolResult> {
    match tool_name {
        "resolveSymbol" => handle_resolve_symbol(index, args),
        "getSymbolSource" => handle_get_symbol_source(index, args),
        "findReferences" => handle_find_references(index, args),
        "findImplementations" => handle_find_implementations(index, args),
        "listMembers" => handle_list_members(index, args),
        _ => Err(ServerError::UnknownTool(tool_name.to_string())),
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| ServerError::InvalidParams(e.to_string()))
}

/// Truncates a string to the maximum response character limit, appending
/// a truncation notice if necessary.
fn truncate_response(s: &str) -> String {
    if s.len() <= MAX_RESPONSE_CHARS {
        s.to_string()
    } else {
        // Find a valid UTF-8 character boundary at or before MAX_RESPONSE_CHARS
        let mut end = MAX_RESPONSE_CHARS;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}\n\n[... truncated at {} chars]", &s[..end], end)
    }
}

fn pretty<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Handles `resolveSymbol` tool calls.
fn handle_resolve_symbol(index: &dyn SemanticIndex, args: Value) -> Result<ToolResult> {
    let args: SymbolArgs = parse_args(args)?;
    match ops::resolve_symbol(index, &args.symbol) {
        Ok(descriptor) => Ok(ToolResult::text(truncate_response(&pretty(&descriptor)?))),
        Err(e) => Ok(ToolResult::tool_error(&e)),
    }
}

/// Handles `getSymbolSource` tool calls.
fn handle_get_symbol_source(index: &dyn SemanticIndex, args: Value) -> Result<ToolResult> {
    let args: SymbolArgs = parse_args(args)?;
    match ops::get_symbol_source(index, &args.symbol) {
        Ok(spans) => Ok(ToolResult::text(truncate_response(&pretty(&spans)?))),
        Err(e) => Ok(ToolResult::tool_error(&e)),
    }
}

/// Handles `findReferences` tool calls.
fn handle_find_references(index: &dyn SemanticIndex, args: Value) -> Result<ToolResult> {
    let args: PagedSymbolArgs = parse_args(args)?;
    let page = ops::find_references(index, &args.symbol, args.page, args.page_size);
    Ok(ToolResult::text(truncate_response(&pretty(&page)?)))
}

/// Handles `findImplementations` tool calls.
fn handle_find_implementations(index: &dyn SemanticIndex, args: Value) -> Result<ToolResult> {
    let args: PagedSymbolArgs = parse_args(args)?;
    let page = ops::find_implementations(index, &args.symbol, args.page, args.page_size);
    Ok(ToolResult::text(truncate_response(&pretty(&page)?)))
}

/// Handles `listMembers` tool calls.
fn handle_list_members(index: &dyn SemanticIndex, args: Value) -> Result<ToolResult> {
    let args: SymbolArgs = parse_args(args)?;
    match ops::list_members(index, &args.symbol) {
        Ok(lists) => Ok(ToolResult::text(truncate_response(&pretty(&lists)?))),
        Err(e) => Ok(ToolResult::tool_error(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotIndex;
    use crate::types::{Location, SymbolKind};

    #[test]
    fn test_tool_definitions_complete() {
        let tools = get_tool_definitions();
        assert_eq!(tools.len(), 5);

        let tool_names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert!(tool_names.contains(&"resolveSymbol"));
        assert!(tool_names.contains(&"getSymbolSource"));
        assert!(tool_names.contains(&"findReferences"));
        assert!(tool_names.contains(&"findImplementations"));
        assert!(tool_names.contains(&"listMembers"));
    }

    #[test]
    fn test_tool_definitions_have_schemas() {
        let tools = get_tool_definitions();
        for tool in &tools {
            assert!(!tool.name.is_empty());
            assert!(!tool.description.is_empty());
            assert!(tool.input_schema.is_object());
            assert_eq!(tool.input_schema["type"], "object");
        }
    }

    #[test]
    fn test_registry_validates() {
        validate_registry().unwrap();
    }

    #[test]
    fn test_every_routed_tool_is_declared() {
        let declared: Vec<String> = get_tool_definitions()
            .into_iter()
            .map(|t| t.name)
            .collect();
        for name in TOOL_NAMES {
            assert!(
                declared.iter().any(|d| d == name),
                "tool '{}' is routed but not declared",
                name
            );
        }
    }

    #[test]
    fn test_every_declared_tool_is_routed() {
        let index = SnapshotIndex::new();
        for tool in get_tool_definitions() {
            let outcome = handle_tool_call(&index, &tool.name, json!({"symbol": "X"}));
            assert!(
                !matches!(outcome, Err(ServerError::UnknownTool(_))),
                "tool '{}' is declared but not routed",
                tool.name
            );
        }
    }

    #[test]
    fn test_unknown_tool_is_protocol_error() {
        let index = SnapshotIndex::new();
        let err = handle_tool_call(&index, "noSuchTool", json!({})).unwrap_err();
        assert!(matches!(err, ServerError::UnknownTool(_)));
    }

    #[test]
    fn test_bad_argument_shape_is_invalid_params() {
        let index = SnapshotIndex::new();
        let err = handle_tool_call(&index, "resolveSymbol", json!({"symbol": 7})).unwrap_err();
        assert!(matches!(err, ServerError::InvalidParams(_)));
    }

    #[test]
    fn test_missing_symbol_is_flagged_error_result() {
        let index = SnapshotIndex::new();
        let result = handle_tool_call(&index, "resolveSymbol", json!({"symbol": "Nope"})).unwrap();
        assert!(result.is_error);
        let ToolContent::Text { text } = &result.content[0];
        assert!(text.contains("symbol not found"));
    }

    #[test]
    fn test_find_references_defaults_page_arguments() {
        let mut index = SnapshotIndex::new();
        let id = index.add_symbol(
            SymbolKind::Class,
            "Widget",
            "Ui",
            Some(Location {
                file: "w.cs".to_string(),
                line: 2,
            }),
        );
        index.add_reference(
            id,
            Location {
                file: "m.cs".to_string(),
                line: 8,
            },
        );

        let result = handle_tool_call(&index, "findReferences", json!({"symbol": "Widget"})).unwrap();
        assert!(!result.is_error);
        let ToolContent::Text { text } = &result.content[0];
        let page: Value = serde_json::from_str(text).unwrap();
        assert_eq!(page["page"], 1);
        assert_eq!(page["pageSize"], 10);
        assert_eq!(page["totalItems"], 1);
    }

    #[test]
    fn test_truncate_short_response() {
        let short = "hello world";
        assert_eq!(truncate_response(short), short);
    }

    #[test]
    fn test_truncate_long_response() {
        let long = "x".repeat(20_000);
        let result = truncate_response(&long);
        assert!(result.len() < 20_000);
        assert!(result.contains("[... truncated at 15000 chars]"));
    }

    #[test]
    fn test_tool_result_envelope_shape() {
        let result = ToolResult::text("ok".to_string());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][0]["text"], "ok");
        assert_eq!(json["isError"], false);
    }
}
