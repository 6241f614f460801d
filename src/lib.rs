//! Semantic core of a PHP code-intelligence backend.
//!
//! Three cooperating pieces, each usable on its own:
//!
//!   - [`builder::ClasslikeInfoBuilder`] flattens a classlike's full
//!     inheritance graph (parents, interfaces, traits) into a single
//!     [`types::ClasslikeInfo`] with provenance on every member and every
//!     type reference resolved to an FQCN.
//!   - [`deduction::TypeDeducer`] answers "what are the possible types of
//!     this expression at this position" by exhaustive dispatch over the
//!     lowered [`ast::Node`] set.
//!   - The Local Type Scanner (`TypeDeducer::local_expression_types` in
//!     [`scanner`]) adds flow sensitivity: a forward scan of the enclosing
//!     scope finds what last established each variable's type, honouring
//!     conditional branches and `@var` docblock overrides.
//!
//! The core owns no index and no parser. Hosts supply both through small
//! trait seams — [`store::SymbolStore`] for indexed symbols and
//! [`names::NameResolver`] for import/namespace resolution — and lower
//! their parse trees into the owned [`ast`] nodes.

pub mod ast;
pub mod builder;
pub mod deduction;
pub mod docblock;
pub mod names;
pub mod scanner;
pub mod store;
pub mod types;

pub(crate) mod relations;

pub use builder::{BuildError, ClasslikeInfoBuilder};
pub use deduction::{MetaStaticMethodTypes, TypeDeducer, TypeDeductionContext};
pub use names::{FileImports, ImportMapResolver, NameResolver};
pub use store::{InMemorySymbolStore, SymbolStore};
