//! The query seam between the server core and the semantic model.
//!
//! The core never parses or analyzes source itself; everything it knows
//! about the codebase comes through [`SemanticIndex`]. The snapshot
//! behind an index is immutable for the process lifetime, so
//! implementations are shared read-only across concurrent requests
//! without locking.

use crate::types::{Location, Member, SourceSpan, Symbol};

/// Read-only queries against an immutable code snapshot.
///
/// Implementations are injected as `Arc<dyn SemanticIndex>`; tests
/// substitute in-memory fakes. Calls may block on large snapshots and
/// are expected to run off the protocol read loop.
pub trait SemanticIndex: Send + Sync {
    /// Returns all source-declared symbols whose name satisfies the
    /// predicate, in the index's own stable enumeration order.
    ///
    /// The predicate receives the simple symbol name. Callers that want
    /// case-insensitive matching pass a case-insensitive predicate; the
    /// index applies it verbatim.
    fn find_declarations(&self, predicate: &dyn Fn(&str) -> bool) -> Vec<Symbol>;

    /// Returns every reference to the symbol across the whole snapshot.
    fn find_references(&self, symbol: &Symbol) -> Vec<Location>;

    /// Returns the types implementing the given named type.
    ///
    /// Only meaningful for interface and base-type symbols; returns an
    /// empty list otherwise.
    fn find_implementations(&self, symbol: &Symbol) -> Vec<Symbol>;

    /// Returns the exact original source text of each declaration of the
    /// symbol (more than one for partial declarations).
    fn declaring_source(&self, symbol: &Symbol) -> Vec<SourceSpan>;

    /// Returns the members of the given named type, implicit ones included.
    fn members(&self, symbol: &Symbol) -> Vec<Member>;
}
