//! The Name Resolver collaborator interface.
//!
//! Turning a type name as written in source into a fully-qualified name
//! depends on the `use` statements and namespace in scope at the position
//! where the name appears. The core consumes this as an injected
//! capability; [`ImportMapResolver`] is a concrete implementation covering
//! the standard PHP rules:
//!
//!   - Fully-qualified names (`\PDO`, `\Couchbase\Cluster`) — strip the
//!     leading `\` and pass through
//!   - Unqualified names resolved via the import table or the current
//!     namespace (class names do NOT fall back to global scope)
//!   - Qualified names with alias expansion on the first segment
//!     (`OA\Endpoint` where `use Swagger\OpenAPI as OA;`)

use rustc_hash::FxHashMap;

use crate::types::FilePosition;

/// Resolves a textual name to its fully-qualified form, given the file
/// position the name appears at.
pub trait NameResolver {
    /// The fully-qualified form of `raw`, without a leading `\`.
    ///
    /// Never fails: a name that cannot be qualified any further is
    /// returned as written (minus a leading `\`), which keeps unresolvable
    /// names visible to the caller instead of silently dropping them.
    fn resolve(&self, raw: &str, position: &FilePosition) -> String;
}

/// Per-file import context: the declared namespace and the `use` table
/// mapping alias → FQCN.
#[derive(Debug, Clone, Default)]
pub struct FileImports {
    /// The namespace declared in the file, if any (e.g. `App\Models`).
    pub namespace: Option<String>,
    /// `use` statements: imported alias (short name or explicit `as`) to
    /// fully-qualified name.
    pub uses: FxHashMap<String, String>,
}

/// A [`NameResolver`] backed by per-file import tables registered up front.
///
/// Position granularity is per file — PHP allows multiple namespace blocks
/// per file, but one namespace per file is what the indexer produces, so
/// the offset part of the position is not consulted here.
#[derive(Debug, Default)]
pub struct ImportMapResolver {
    files: FxHashMap<String, FileImports>,
}

impl ImportMapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the import context of `path`, replacing any previous one.
    pub fn set_file_imports(&mut self, path: impl Into<String>, imports: FileImports) {
        self.files.insert(path.into(), imports);
    }
}

impl NameResolver for ImportMapResolver {
    fn resolve(&self, raw: &str, position: &FilePosition) -> String {
        // Fully qualified: strip the leading `\` and we are done.
        if let Some(stripped) = raw.strip_prefix('\\') {
            return stripped.to_string();
        }

        let Some(imports) = self.files.get(&position.path) else {
            return raw.to_string();
        };

        // Unqualified name (no `\` at all): import table first, then the
        // current namespace. No global fallback for class names.
        if !raw.contains('\\') {
            if let Some(fqcn) = imports.uses.get(raw) {
                return fqcn.clone();
            }
            if let Some(ref ns) = imports.namespace {
                return format!("{}\\{}", ns, raw);
            }
            return raw.to_string();
        }

        // Qualified name: expand a first-segment alias, else prepend the
        // current namespace.
        let first_segment = raw.split('\\').next().unwrap_or(raw);
        if let Some(prefix) = imports.uses.get(first_segment) {
            return format!("{}{}", prefix, &raw[first_segment.len()..]);
        }
        if let Some(ref ns) = imports.namespace {
            return format!("{}\\{}", ns, raw);
        }
        raw.to_string()
    }
}
