//! The Symbol Store collaborator interface.
//!
//! The core never indexes source itself; it asks an injected [`SymbolStore`]
//! for raw records by fully-qualified name. The store is populated and
//! invalidated by an external indexer. [`InMemorySymbolStore`] is the
//! reference implementation used by hosts that keep their index in memory
//! and by the test suite.

use rustc_hash::FxHashMap;

use crate::types::{ClasslikeRecord, FunctionRecord};

/// Read-only access to the indexed symbol database.
///
/// Lookups take FQCNs *without* a leading `\`; implementations should
/// tolerate one anyway, since raw names leak in from docblocks.
pub trait SymbolStore {
    /// The raw stored record for a classlike, or `None` when the FQCN is
    /// not indexed.
    fn find_classlike_by_fqcn(&self, fqcn: &str) -> Option<ClasslikeRecord>;

    /// The raw stored record for a global function, or `None`.
    fn find_function_by_fqcn(&self, fqcn: &str) -> Option<FunctionRecord>;
}

/// A plain in-memory [`SymbolStore`] backed by hash maps.
#[derive(Debug, Default)]
pub struct InMemorySymbolStore {
    classlikes: FxHashMap<String, ClasslikeRecord>,
    functions: FxHashMap<String, FunctionRecord>,
}

impl InMemorySymbolStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a classlike record, keyed by its FQCN.
    pub fn add_classlike(&mut self, record: ClasslikeRecord) {
        self.classlikes.insert(record.fqcn.clone(), record);
    }

    /// Insert (or replace) a function record, keyed by its FQCN.
    pub fn add_function(&mut self, record: FunctionRecord) {
        self.functions.insert(record.fqcn.clone(), record);
    }

    /// Remove every record originating from `file`. Called by the indexer
    /// before re-indexing a changed file.
    pub fn remove_file(&mut self, file: &str) {
        self.classlikes.retain(|_, r| r.file != file);
        self.functions.retain(|_, r| r.file != file);
    }
}

impl SymbolStore for InMemorySymbolStore {
    fn find_classlike_by_fqcn(&self, fqcn: &str) -> Option<ClasslikeRecord> {
        let name = fqcn.strip_prefix('\\').unwrap_or(fqcn);
        self.classlikes.get(name).cloned()
    }

    fn find_function_by_fqcn(&self, fqcn: &str) -> Option<FunctionRecord> {
        let name = fqcn.strip_prefix('\\').unwrap_or(fqcn);
        self.functions.get(name).cloned()
    }
}
