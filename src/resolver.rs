//! Symbol name resolution and disambiguation.
//!
//! Lookup is name-only; there is no qualified-name syntax. When several
//! symbols share a name (overloads, partial classes, same simple name in
//! different namespaces) the index's enumeration order decides which one
//! wins, so resolution is best-effort rather than exact. Callers must
//! not rely on which duplicate is selected.

use crate::index::SemanticIndex;
use crate::types::Symbol;

/// Resolves a free-text symbol name to exactly one symbol, or `None`.
///
/// Candidates are all source-declared symbols matching the name
/// case-insensitively, in index order. The first candidate whose name
/// equals the query under case-insensitive comparison is preferred;
/// failing that, the first candidate in index order is taken.
pub fn resolve(index: &dyn SemanticIndex, name: &str) -> Option<Symbol> {
    let mut candidates = index.find_declarations(&|n| n.eq_ignore_ascii_case(name));
    if candidates.is_empty() {
        return None;
    }

    let pos = candidates
        .iter()
        .position(|c| c.name.eq_ignore_ascii_case(name))
        .unwrap_or(0);
    Some(candidates.swap_remove(pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotIndex;
    use crate::types::{Location, SymbolKind};

    fn decl(file: &str, line: u32) -> Option<Location> {
        Some(Location {
            file: file.to_string(),
            line,
        })
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let mut index = SnapshotIndex::new();
        index.add_symbol(SymbolKind::Class, "MyTestClass", "Demo", decl("a.cs", 5));

        let symbol = resolve(&index, "mytestclass").unwrap();
        assert_eq!(symbol.name, "MyTestClass");
    }

    #[test]
    fn test_resolve_prefers_first_in_index_order() {
        let mut index = SnapshotIndex::new();
        index.add_symbol(SymbolKind::Class, "Widget", "Ui", decl("ui.cs", 1));
        index.add_symbol(SymbolKind::Class, "Widget", "Legacy", decl("legacy.cs", 9));

        let symbol = resolve(&index, "Widget").unwrap();
        assert_eq!(symbol.namespace, "Ui");
    }

    #[test]
    fn test_resolve_unknown_name() {
        let index = SnapshotIndex::new();
        assert!(resolve(&index, "NoSuchSymbol").is_none());
    }
}
