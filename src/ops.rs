//! The five symbol-query operations exposed as MCP tools.
//!
//! Each operation resolves its symbol name through [`crate::resolver`]
//! and shapes a typed result. Domain absence ("symbol not found") is a
//! tagged [`ToolError`], never a protocol failure: the dispatcher turns
//! it into a successful reply flagged as an error result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::index::SemanticIndex;
use crate::paging::{paginate, Page};
use crate::resolver;
use crate::types::{Location, MemberKind, SourceSpan, SymbolDescriptor};

/// Default page number for unbounded-result operations.
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size for unbounded-result operations.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Expected, recoverable outcomes visible to the calling agent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("source not found for symbol: {0}")]
    SourceNotFound(String),

    #[error("symbol is not a type or not found: {0}")]
    NotAType(String),
}

/// Result of `listMembers`: signature strings grouped by member kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberLists {
    pub methods: Vec<String>,
    pub properties: Vec<String>,
    pub fields: Vec<String>,
}

/// Resolves a symbol name to its kind, name, namespace, and declaration site.
pub fn resolve_symbol(
    index: &dyn SemanticIndex,
    name: &str,
) -> Result<SymbolDescriptor, ToolError> {
    let symbol =
        resolver::resolve(index, name).ok_or_else(|| ToolError::SymbolNotFound(name.to_string()))?;
    // A symbol without a source declaration has no location to report.
    SymbolDescriptor::of(&symbol).ok_or_else(|| ToolError::SymbolNotFound(name.to_string()))
}

/// Returns the exact original declaration text of a symbol, one span per
/// declaring syntax node.
pub fn get_symbol_source(
    index: &dyn SemanticIndex,
    name: &str,
) -> Result<Vec<SourceSpan>, ToolError> {
    let symbol =
        resolver::resolve(index, name).ok_or_else(|| ToolError::SymbolNotFound(name.to_string()))?;
    let spans = index.declaring_source(&symbol);
    if spans.is_empty() {
        return Err(ToolError::SourceNotFound(name.to_string()));
    }
    Ok(spans)
}

/// Returns one page of all reference locations for a symbol.
///
/// An unresolved name yields an empty page, not an error. The full
/// reference list is gathered before slicing.
pub fn find_references(
    index: &dyn SemanticIndex,
    name: &str,
    page: i64,
    page_size: i64,
) -> Page<Location> {
    let locations = match resolver::resolve(index, name) {
        Some(symbol) => index.find_references(&symbol),
        None => Vec::new(),
    };
    paginate(locations, page, page_size)
}

/// Returns one page of declaration locations for types implementing the
/// named type.
///
/// An unresolved name, or a symbol that is not a named type, yields an
/// empty page.
pub fn find_implementations(
    index: &dyn SemanticIndex,
    name: &str,
    page: i64,
    page_size: i64,
) -> Page<Location> {
    let locations = match resolver::resolve(index, name) {
        Some(symbol) if symbol.is_named_type() => index
            .find_implementations(&symbol)
            .into_iter()
            .filter_map(|implementor| implementor.declaration)
            .collect(),
        _ => Vec::new(),
    };
    paginate(locations, page, page_size)
}

/// Lists the ordinary methods, properties, and fields of a named type.
///
/// Implicit (compiler-synthesized) members are dropped. Constructors,
/// destructors, operators, conversions, and accessors are implementation
/// details of other member kinds and never appear in the methods list.
pub fn list_members(index: &dyn SemanticIndex, name: &str) -> Result<MemberLists, ToolError> {
    let symbol = resolver::resolve(index, name)
        .filter(|s| s.is_named_type())
        .ok_or_else(|| ToolError::NotAType(name.to_string()))?;

    let mut lists = MemberLists::default();
    for member in index.members(&symbol) {
        if member.is_implicit {
            continue;
        }
        match member.kind {
            MemberKind::Method => lists.methods.push(member.display),
            MemberKind::Property => lists.properties.push(member.display),
            MemberKind::Field => lists.fields.push(member.display),
            _ => {}
        }
    }
    Ok(lists)
}
