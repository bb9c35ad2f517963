use serde::{Deserialize, Serialize};

/// Kinds of symbols surfaced by the semantic index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Class,
    Interface,
    Struct,
    Enum,
    Record,
    Delegate,
    Method,
    Property,
    Field,
    Event,
    Namespace,
    Other,
}

impl SymbolKind {
    /// Returns `true` if this kind names a type (something that can have
    /// members and implementations).
    pub fn is_named_type(&self) -> bool {
        matches!(
            self,
            SymbolKind::Class
                | SymbolKind::Interface
                | SymbolKind::Struct
                | SymbolKind::Enum
                | SymbolKind::Record
                | SymbolKind::Delegate
        )
    }
}

/// Kinds of type members reported by the semantic index.
///
/// Accessor methods, constructors, operators and conversions are kept
/// distinct from ordinary methods so that member listings can exclude
/// them without inspecting display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    Method,
    Constructor,
    Destructor,
    Operator,
    Conversion,
    Accessor,
    Property,
    Field,
    Event,
    Other,
}

/// Identifier for a symbol within one snapshot.
pub type SymbolId = u32;

/// A symbol as enumerated by the semantic index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub kind: SymbolKind,
    pub name: String,
    /// Containing-namespace display string, empty for the global namespace.
    pub namespace: String,
    /// Source declaration site, absent for purely metadata-derived symbols.
    pub declaration: Option<Location>,
}

impl Symbol {
    pub fn is_named_type(&self) -> bool {
        self.kind.is_named_type()
    }
}

/// A (file, 1-indexed line) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

/// Exact original source text of one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub file: String,
    pub text: String,
}

/// A member of a named type, with its index-formatted display string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub kind: MemberKind,
    /// Minimally-qualified signature string, e.g. `MyTestMethod(string param)`.
    pub display: String,
    /// Set for compiler-synthesized members (backing fields, etc.).
    #[serde(default, rename = "implicit")]
    pub is_implicit: bool,
}

/// Resolved identity of a code entity, as returned by `resolveSymbol`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDescriptor {
    pub kind: SymbolKind,
    pub name: String,
    pub namespace: String,
    pub file: String,
    pub line: u32,
}

impl SymbolDescriptor {
    /// Builds a descriptor from a symbol, or `None` if the symbol has no
    /// source declaration location.
    pub fn of(symbol: &Symbol) -> Option<SymbolDescriptor> {
        symbol.declaration.as_ref().map(|loc| SymbolDescriptor {
            kind: symbol.kind,
            name: symbol.name.clone(),
            namespace: symbol.namespace.clone(),
            file: loc.file.clone(),
            line: loc.line,
        })
    }
}
