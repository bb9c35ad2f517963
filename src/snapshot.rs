//! In-memory semantic index loaded from a prebuilt snapshot file.
//!
//! Index construction (parsing, type resolution) happens outside this
//! process; the binary is handed a JSON snapshot describing symbols,
//! their references, implementations, members, and declaration source.
//! The same type serves as the in-memory fake index in tests.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{Result, ServerError};
use crate::index::SemanticIndex;
use crate::types::{Location, Member, SourceSpan, Symbol, SymbolId, SymbolKind};

/// One symbol entry in a snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub kind: SymbolKind,
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub declaration: Option<Location>,
    #[serde(default)]
    pub references: Vec<Location>,
    /// Names of types in this snapshot that implement this symbol.
    #[serde(default)]
    pub implementations: Vec<String>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub source: Vec<SourceSpan>,
}

/// Top-level shape of a snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub symbols: Vec<SymbolRecord>,
}

/// An immutable in-memory [`SemanticIndex`].
///
/// Symbols are enumerated in insertion order, which is the stable
/// index-defined order the resolver's disambiguation policy relies on.
#[derive(Debug, Default)]
pub struct SnapshotIndex {
    symbols: Vec<Symbol>,
    references: Vec<Vec<Location>>,
    implementations: Vec<Vec<SymbolId>>,
    members: Vec<Vec<Member>>,
    sources: Vec<Vec<SourceSpan>>,
}

impl SnapshotIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| ServerError::Snapshot {
            message: format!("failed to read snapshot file: {}", e),
            path: path.display().to_string(),
        })?;

        let file: SnapshotFile =
            serde_json::from_str(&contents).map_err(|e| ServerError::Snapshot {
                message: format!("failed to parse snapshot file: {}", e),
                path: path.display().to_string(),
            })?;

        Ok(Self::from_records(file.symbols))
    }

    /// Builds an index from parsed snapshot records.
    ///
    /// Implementation links are given by type name and resolved against
    /// the symbol table after all symbols are registered; links to names
    /// absent from the snapshot are dropped with a warning.
    pub fn from_records(records: Vec<SymbolRecord>) -> Self {
        let mut index = Self::new();

        for record in &records {
            let id = index.add_symbol(
                record.kind,
                &record.name,
                &record.namespace,
                record.declaration.clone(),
            );
            for reference in &record.references {
                index.add_reference(id, reference.clone());
            }
            for member in &record.members {
                index.add_member(id, member.clone());
            }
            for span in &record.source {
                index.add_source(id, span.clone());
            }
        }

        for (id, record) in records.iter().enumerate() {
            for impl_name in &record.implementations {
                match index.find_by_exact_name(impl_name) {
                    Some(impl_id) => index.add_implementation(id as SymbolId, impl_id),
                    None => warn!(
                        symbol = record.name.as_str(),
                        implementation = impl_name.as_str(),
                        "snapshot names an implementation that is not in the snapshot"
                    ),
                }
            }
        }

        index
    }

    /// Registers a symbol and returns its id.
    pub fn add_symbol(
        &mut self,
        kind: SymbolKind,
        name: &str,
        namespace: &str,
        declaration: Option<Location>,
    ) -> SymbolId {
        let id = self.symbols.len() as SymbolId;
        self.symbols.push(Symbol {
            id,
            kind,
            name: name.to_string(),
            namespace: namespace.to_string(),
            declaration,
        });
        self.references.push(Vec::new());
        self.implementations.push(Vec::new());
        self.members.push(Vec::new());
        self.sources.push(Vec::new());
        id
    }

    pub fn add_reference(&mut self, id: SymbolId, location: Location) {
        self.references[id as usize].push(location);
    }

    pub fn add_implementation(&mut self, type_id: SymbolId, implementor_id: SymbolId) {
        self.implementations[type_id as usize].push(implementor_id);
    }

    pub fn add_member(&mut self, id: SymbolId, member: Member) {
        self.members[id as usize].push(member);
    }

    pub fn add_source(&mut self, id: SymbolId, span: SourceSpan) {
        self.sources[id as usize].push(span);
    }

    /// Number of symbols in the snapshot.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    fn find_by_exact_name(&self, name: &str) -> Option<SymbolId> {
        self.symbols.iter().find(|s| s.name == name).map(|s| s.id)
    }
}

impl SemanticIndex for SnapshotIndex {
    fn find_declarations(&self, predicate: &dyn Fn(&str) -> bool) -> Vec<Symbol> {
        self.symbols
            .iter()
            .filter(|s| predicate(&s.name))
            .cloned()
            .collect()
    }

    fn find_references(&self, symbol: &Symbol) -> Vec<Location> {
        self.references
            .get(symbol.id as usize)
            .cloned()
            .unwrap_or_default()
    }

    fn find_implementations(&self, symbol: &Symbol) -> Vec<Symbol> {
        self.implementations
            .get(symbol.id as usize)
            .map(|ids| {
                ids.iter()
                    .map(|id| self.symbols[*id as usize].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn declaring_source(&self, symbol: &Symbol) -> Vec<SourceSpan> {
        self.sources
            .get(symbol.id as usize)
            .cloned()
            .unwrap_or_default()
    }

    fn members(&self, symbol: &Symbol) -> Vec<Member> {
        self.members
            .get(symbol.id as usize)
            .cloned()
            .unwrap_or_default()
    }
}
