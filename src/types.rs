//! Data types used throughout the semantic core.
//!
//! This module contains the "model" structs and enums on both sides of the
//! flattening pipeline: the *raw* records as the Symbol Store hands them out
//! (direct relations only, unresolved type strings) and the *flattened* info
//! the [`crate::builder::ClasslikeInfoBuilder`] produces (transitive
//! relation closures, provenance on every member, resolved type references).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A byte range in a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Whether `offset` falls inside this span (inclusive on both ends).
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset <= self.end
    }
}

/// A position inside a specific file, used as the context for name
/// resolution (imports and namespaces are file- and position-dependent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePosition {
    /// Path (or URI) of the file the name appears in.
    pub path: String,
    /// Byte offset of the name within the file.
    pub offset: u32,
}

impl FilePosition {
    pub fn new(path: impl Into<String>, offset: u32) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }
}

/// What sort of classlike a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClasslikeKind {
    Class,
    Interface,
    Trait,
}

/// Visibility of a class member (method, property, or constant).
///
/// In PHP, members without an explicit visibility modifier default to
/// `Public`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// A single type reference as written in source.
///
/// `raw` is the type exactly as the author wrote it (`Foo`, `\A\Foo`,
/// `self`, `Foo[]`, `int`, …). `resolved` is the fully-qualified form once
/// it has been computed. Resolution always needs a position context, so a
/// record fresh out of the Symbol Store carries `resolved: None` and the
/// builder fills it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeReference {
    pub raw: String,
    pub resolved: Option<String>,
}

impl TypeReference {
    pub fn raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            resolved: None,
        }
    }

    /// The best name available for this reference: the resolved FQCN when
    /// present, the raw text otherwise.
    pub fn name(&self) -> &str {
        self.resolved.as_deref().unwrap_or(&self.raw)
    }
}

// ─── Raw records (Symbol Store output) ──────────────────────────────────────

/// A constant as stored by the indexer, before flattening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawConstant {
    /// The constant name (e.g. "MAX_SIZE", "STATUS_ACTIVE").
    pub name: String,
    /// The constant's type(s) — a union when more than one.
    pub types: Vec<TypeReference>,
    pub visibility: Visibility,
    /// Where the constant is declared, inside the owning file.
    pub span: Span,
}

/// A property as stored by the indexer, before flattening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProperty {
    /// The property name WITHOUT the `$` prefix (e.g. "name", "age").
    /// This matches PHP access syntax: `$this->name` not `$this->$name`.
    pub name: String,
    pub types: Vec<TypeReference>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub span: Span,
}

/// A parameter of a stored method or function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawParameter {
    /// The parameter name including the `$` prefix (e.g. "$text").
    pub name: String,
    /// Declared type hint(s), if any.
    pub types: Vec<TypeReference>,
    /// Whether the parameter has a default value.
    pub is_optional: bool,
    /// Whether this parameter is variadic (has `...`).
    pub is_variadic: bool,
}

/// A method as stored by the indexer, before flattening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMethod {
    /// The method name (e.g. "updateText").
    pub name: String,
    pub parameters: Vec<RawParameter>,
    /// Declared/documented return type(s) — a union when more than one.
    pub return_types: Vec<TypeReference>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub span: Span,
}

/// A `use TraitName { original as alias; }` adaptation.
///
/// `trait_fqcn` is `None` when the aliasing statement does not name the
/// source trait (`use T { m as n; }`), in which case the alias applies to
/// whichever used trait provides `method`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitAlias {
    pub trait_fqcn: Option<String>,
    /// Name of the trait method being adapted.
    pub method: String,
    /// New name, when the adaptation renames (`as newName`).
    pub alias: Option<String>,
    /// New visibility, when the adaptation changes it (`as protected`).
    pub visibility: Option<Visibility>,
}

/// A `use A, B { A::m insteadof B; }` precedence declaration: `method` is
/// taken from `trait_fqcn`, same-named methods from other traits lose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitPrecedence {
    pub trait_fqcn: String,
    pub method: String,
}

/// A classlike exactly as the Symbol Store hands it out: own members only,
/// direct relations only, type references unresolved.
///
/// Relation FQCNs (`parents`, `interfaces`, `traits` and the reverse
/// relations) are already fully qualified — the indexer resolves them at
/// index time. Member *types* are not: they are position-dependent and stay
/// raw until the builder runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClasslikeRecord {
    pub kind: ClasslikeKind,
    /// Fully-qualified name, without a leading `\`.
    pub fqcn: String,
    /// Path of the file that declares this classlike.
    pub file: String,
    /// Span of the declaration inside `file`.
    pub span: Span,
    pub is_abstract: bool,
    pub is_final: bool,
    /// Direct parent FQCN(s): at most one for a class, any number for an
    /// interface (interfaces may extend several).
    pub parents: Vec<String>,
    /// Directly implemented interface FQCNs (classes only).
    pub interfaces: Vec<String>,
    /// Directly used trait FQCNs (classes and traits).
    pub traits: Vec<String>,
    pub trait_aliases: Vec<TraitAlias>,
    pub trait_precedences: Vec<TraitPrecedence>,
    pub constants: Vec<RawConstant>,
    pub properties: Vec<RawProperty>,
    pub methods: Vec<RawMethod>,
    /// FQCNs of classlikes that directly extend this one (reverse of
    /// `parents`). Maintained by the indexer, copied verbatim into the
    /// flattened info.
    pub direct_children: Vec<String>,
    /// FQCNs of classes that directly implement this interface.
    pub direct_implementors: Vec<String>,
    /// FQCNs of classlikes that directly `use` this trait.
    pub direct_trait_users: Vec<String>,
}

impl ClasslikeRecord {
    /// A minimal record with the given kind and FQCN — everything else
    /// empty. Fixtures and indexers fill in the rest field by field.
    pub fn new(kind: ClasslikeKind, fqcn: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            kind,
            fqcn: fqcn.into(),
            file: file.into(),
            span: Span::default(),
            is_abstract: false,
            is_final: false,
            parents: Vec::new(),
            interfaces: Vec::new(),
            traits: Vec::new(),
            trait_aliases: Vec::new(),
            trait_precedences: Vec::new(),
            constants: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            direct_children: Vec::new(),
            direct_implementors: Vec::new(),
            direct_trait_users: Vec::new(),
        }
    }
}

/// A global function as stored by the indexer. Only what expression
/// deduction needs: parameters and return types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Fully-qualified function name, without a leading `\`.
    pub fqcn: String,
    pub file: String,
    pub span: Span,
    pub parameters: Vec<RawParameter>,
    pub return_types: Vec<TypeReference>,
}

// ─── Flattened info (builder output) ────────────────────────────────────────

/// A constant after flattening: carries provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantInfo {
    pub name: String,
    pub types: Vec<TypeReference>,
    pub visibility: Visibility,
    pub span: Span,
    /// FQCN of the classlike that originally declared this constant.
    pub declaring_structure: String,
    /// FQCN of the nearest ancestor whose same-named constant this one
    /// overrides, when there is one.
    pub override_of: Option<String>,
    /// FQCNs of interfaces whose same-named constant this one satisfies.
    pub implementation_of: Vec<String>,
}

/// A property after flattening: carries provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    pub types: Vec<TypeReference>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub span: Span,
    /// FQCN of the classlike that originally declared this property.
    pub declaring_structure: String,
    /// FQCN of the nearest ancestor whose same-named property this one
    /// overrides, when there is one.
    pub override_of: Option<String>,
}

/// A parameter after flattening. Same shape as [`RawParameter`]; type
/// references get resolved alongside the owning method's.
pub type ParameterInfo = RawParameter;

/// A method after flattening: carries provenance and interface
/// implementation links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    pub parameters: Vec<ParameterInfo>,
    pub return_types: Vec<TypeReference>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub span: Span,
    /// FQCN of the classlike that originally declared this method.
    pub declaring_structure: String,
    /// FQCN of the nearest ancestor whose same-named method this one
    /// overrides, when there is one.
    pub override_of: Option<String>,
    /// FQCNs of interfaces whose same-named method this one satisfies.
    pub implementation_of: Vec<String>,
}

/// The fully-flattened shape of a classlike: everything it declares plus
/// everything it inherits, implements or mixes in, with every type
/// reference resolved and provenance recorded on every member.
///
/// Built on demand by [`crate::builder::ClasslikeInfoBuilder::build`];
/// immutable once returned. Member maps are keyed by member name and keep
/// declaration/merge order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClasslikeInfo {
    pub kind: ClasslikeKind,
    pub fqcn: String,
    pub file: String,
    pub span: Span,
    pub is_abstract: bool,
    pub is_final: bool,
    /// Transitive closure of parent FQCNs, nearest first.
    pub parents: Vec<String>,
    /// Transitive closure of implemented/extended interface FQCNs.
    pub interfaces: Vec<String>,
    /// Transitive closure of used trait FQCNs.
    pub traits: Vec<String>,
    pub direct_parents: Vec<String>,
    pub direct_interfaces: Vec<String>,
    pub direct_traits: Vec<String>,
    /// Reverse relations, copied once from the raw record — these reflect
    /// only the immediate relation and are never accumulated recursively.
    pub direct_children: Vec<String>,
    pub direct_implementors: Vec<String>,
    pub direct_trait_users: Vec<String>,
    pub constants: IndexMap<String, ConstantInfo>,
    pub properties: IndexMap<String, PropertyInfo>,
    pub methods: IndexMap<String, MethodInfo>,
}

impl ClasslikeInfo {
    /// Push `fqcn` onto `list` unless it is already present. Relation
    /// closures must stay duplicate-free when diamond graphs are merged.
    pub(crate) fn push_unique(list: &mut Vec<String>, fqcn: &str) {
        if !list.iter().any(|f| f == fqcn) {
            list.push(fqcn.to_string());
        }
    }
}
