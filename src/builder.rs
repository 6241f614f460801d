//! Classlike info building: recursive flattening of a classlike's
//! inheritance/interface/trait graph.
//!
//! [`ClasslikeInfoBuilder::build`] fetches the raw record for an FQCN,
//! recursively builds every ancestor through the same entry point, and
//! hands each ancestor to the matching relation resolver. Merge order is
//! fixed: traits first, then parents, then interfaces — a class's trait
//! members must already be in place when parent members arrive so that
//! override provenance lands on the right member.
//!
//! An unknown ancestor never breaks the whole build: it is skipped and
//! that one relation is simply omitted. A cycle anywhere in the ancestry
//! is different — it makes the whole graph unflattenable, so it fails the
//! top-level build.

use thiserror::Error;
use tracing::debug;

use crate::docblock;
use crate::names::NameResolver;
use crate::relations::{InheritanceResolver, InterfaceImplementationResolver, TraitUsageResolver};
use crate::store::SymbolStore;
use crate::types::{
    ClasslikeInfo, ClasslikeRecord, ConstantInfo, FilePosition, MethodInfo, PropertyInfo, Span,
    TypeReference,
};

/// Why a classlike could not be flattened.
///
/// Both variants are expected, recoverable conditions for callers of
/// [`ClasslikeInfoBuilder::build`]. Inside the recursive descent an
/// unknown ancestor is deliberately swallowed so one broken relation does
/// not prevent flattening the rest; a detected cycle propagates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The requested FQCN is absent from the Symbol Store.
    #[error("no classlike named `{fqcn}` in the symbol store")]
    UnknownClasslike { fqcn: String },
    /// The FQCN is already on the active resolution stack: the ancestry
    /// graph contains a cycle.
    #[error("circular ancestry while flattening `{origin}`: `{detected_at}` is already being resolved")]
    CircularDependency {
        /// The FQCN the top-level build started from.
        origin: String,
        /// The FQCN at which the cycle was detected.
        detected_at: String,
    },
}

/// The ordered set of FQCNs currently being flattened.
///
/// Owned by one top-level [`ClasslikeInfoBuilder::build`] call and threaded
/// through the recursion by unique reference — never shared across calls,
/// so concurrent or nested top-level builds cannot observe each other's
/// state.
#[derive(Debug, Default)]
struct ResolutionStack {
    entries: Vec<String>,
}

impl ResolutionStack {
    fn contains(&self, fqcn: &str) -> bool {
        self.entries.iter().any(|e| e == fqcn)
    }

    fn push(&mut self, fqcn: &str) {
        self.entries.push(fqcn.to_string());
    }

    fn pop(&mut self) {
        self.entries.pop();
    }

    /// The FQCN the top-level build started from. Falls back to `detected`
    /// when the stack is empty (cannot happen once a build has started).
    fn origin<'a>(&'a self, detected: &'a str) -> &'a str {
        self.entries.first().map(String::as_str).unwrap_or(detected)
    }
}

/// Flattens classlikes on demand. Stateless apart from its injected
/// collaborators; every `build` call owns its own resolution stack.
pub struct ClasslikeInfoBuilder<'a> {
    store: &'a dyn SymbolStore,
    names: &'a dyn NameResolver,
}

impl<'a> ClasslikeInfoBuilder<'a> {
    pub fn new(store: &'a dyn SymbolStore, names: &'a dyn NameResolver) -> Self {
        Self { store, names }
    }

    /// Build the fully-flattened info for `fqcn`.
    ///
    /// Fails with [`BuildError::UnknownClasslike`] when the Symbol Store
    /// has no record for `fqcn`, and with [`BuildError::CircularDependency`]
    /// when `fqcn` or any ancestor reached while flattening it closes a
    /// cycle.
    pub fn build(&self, fqcn: &str) -> Result<ClasslikeInfo, BuildError> {
        let mut stack = ResolutionStack::default();
        self.build_with_stack(fqcn, &mut stack)
    }

    fn build_with_stack(
        &self,
        fqcn: &str,
        stack: &mut ResolutionStack,
    ) -> Result<ClasslikeInfo, BuildError> {
        if stack.contains(fqcn) {
            return Err(BuildError::CircularDependency {
                origin: stack.origin(fqcn).to_string(),
                detected_at: fqcn.to_string(),
            });
        }

        let record = self
            .store
            .find_classlike_by_fqcn(fqcn)
            .ok_or_else(|| BuildError::UnknownClasslike {
                fqcn: fqcn.to_string(),
            })?;

        stack.push(&record.fqcn);
        let mut info = Self::base_info(&record);

        // ── Traits ──────────────────────────────────────────────────────
        for trait_fqcn in &record.traits {
            match self.build_with_stack(trait_fqcn, stack) {
                Ok(trait_info) => {
                    ClasslikeInfo::push_unique(&mut info.traits, &trait_info.fqcn);
                    for nested in &trait_info.traits {
                        ClasslikeInfo::push_unique(&mut info.traits, nested);
                    }
                    TraitUsageResolver::resolve(
                        &trait_info,
                        &mut info,
                        &record.trait_aliases,
                        &record.trait_precedences,
                    );
                }
                Err(error @ BuildError::CircularDependency { .. }) => return Err(error),
                Err(error) => {
                    debug!(classlike = %record.fqcn, r#trait = %trait_fqcn, %error, "skipping trait");
                }
            }
        }

        // ── Parents ─────────────────────────────────────────────────────
        for parent_fqcn in &record.parents {
            match self.build_with_stack(parent_fqcn, stack) {
                Ok(parent_info) => {
                    ClasslikeInfo::push_unique(&mut info.parents, &parent_info.fqcn);
                    for ancestor in &parent_info.parents {
                        ClasslikeInfo::push_unique(&mut info.parents, ancestor);
                    }
                    for interface in &parent_info.interfaces {
                        ClasslikeInfo::push_unique(&mut info.interfaces, interface);
                    }
                    for used_trait in &parent_info.traits {
                        ClasslikeInfo::push_unique(&mut info.traits, used_trait);
                    }
                    InheritanceResolver::resolve(&parent_info, &mut info);
                }
                Err(error @ BuildError::CircularDependency { .. }) => return Err(error),
                Err(error) => {
                    debug!(classlike = %record.fqcn, parent = %parent_fqcn, %error, "skipping parent");
                }
            }
        }

        // ── Interfaces ──────────────────────────────────────────────────
        for interface_fqcn in &record.interfaces {
            match self.build_with_stack(interface_fqcn, stack) {
                Ok(interface_info) => {
                    ClasslikeInfo::push_unique(&mut info.interfaces, &interface_info.fqcn);
                    // An interface's ancestry closure lives in its
                    // `parents` (interfaces extend interfaces).
                    for extended in &interface_info.parents {
                        ClasslikeInfo::push_unique(&mut info.interfaces, extended);
                    }
                    InterfaceImplementationResolver::resolve(&interface_info, &mut info);
                }
                Err(error @ BuildError::CircularDependency { .. }) => return Err(error),
                Err(error) => {
                    debug!(classlike = %record.fqcn, interface = %interface_fqcn, %error, "skipping interface");
                }
            }
        }

        // Type resolution runs after all merging: plain names first, then
        // the declaration-bound keywords, then `static` — which must come
        // last so ancestor members carrying `static` re-bind to the
        // most-derived FQCN rather than the ancestor's.
        self.resolve_plain_types(&mut info, &record);
        Self::resolve_declaration_keywords(&mut info);
        Self::resolve_static_keyword(&mut info);

        stack.pop();
        Ok(info)
    }

    /// The "flat" info for a record: own members and direct relations
    /// only, no inheritance. Reverse relations are copied here, once —
    /// they reflect only the immediate relation.
    fn base_info(record: &ClasslikeRecord) -> ClasslikeInfo {
        let mut info = ClasslikeInfo {
            kind: record.kind,
            fqcn: record.fqcn.clone(),
            file: record.file.clone(),
            span: record.span,
            is_abstract: record.is_abstract,
            is_final: record.is_final,
            parents: Vec::new(),
            interfaces: Vec::new(),
            traits: Vec::new(),
            direct_parents: record.parents.clone(),
            direct_interfaces: record.interfaces.clone(),
            direct_traits: record.traits.clone(),
            direct_children: record.direct_children.clone(),
            direct_implementors: record.direct_implementors.clone(),
            direct_trait_users: record.direct_trait_users.clone(),
            constants: Default::default(),
            properties: Default::default(),
            methods: Default::default(),
        };

        for constant in &record.constants {
            info.constants.insert(
                constant.name.clone(),
                ConstantInfo {
                    name: constant.name.clone(),
                    types: constant.types.clone(),
                    visibility: constant.visibility,
                    span: constant.span,
                    declaring_structure: record.fqcn.clone(),
                    override_of: None,
                    implementation_of: Vec::new(),
                },
            );
        }
        for property in &record.properties {
            info.properties.insert(
                property.name.clone(),
                PropertyInfo {
                    name: property.name.clone(),
                    types: property.types.clone(),
                    visibility: property.visibility,
                    is_static: property.is_static,
                    span: property.span,
                    declaring_structure: record.fqcn.clone(),
                    override_of: None,
                },
            );
        }
        for method in &record.methods {
            info.methods.insert(
                method.name.clone(),
                MethodInfo {
                    name: method.name.clone(),
                    parameters: method.parameters.clone(),
                    return_types: method.return_types.clone(),
                    visibility: method.visibility,
                    is_static: method.is_static,
                    is_abstract: method.is_abstract,
                    is_final: method.is_final,
                    span: method.span,
                    declaring_structure: record.fqcn.clone(),
                    override_of: None,
                    implementation_of: Vec::new(),
                },
            );
        }

        info
    }

    /// Resolve every still-unresolved, non-keyword type reference.
    ///
    /// Ancestor members arrive fully resolved from their own build; the
    /// only unresolved references left at this point belong to the record's
    /// own members, so the record's file is the right resolution context.
    fn resolve_plain_types(&self, info: &mut ClasslikeInfo, record: &ClasslikeRecord) {
        let file = record.file.clone();
        let names = self.names;
        for_each_type_ref(info, |type_ref, span| {
            if type_ref.resolved.is_some() || docblock::is_keyword(&type_ref.raw) {
                return;
            }
            if docblock::is_scalar(&type_ref.raw) {
                type_ref.resolved = Some(type_ref.raw.clone());
                return;
            }
            let (base, suffix) = split_array_suffix(&type_ref.raw);
            let position = FilePosition::new(file.clone(), span.start);
            type_ref.resolved = Some(format!("{}{}", names.resolve(base, &position), suffix));
        });
    }

    /// Resolve `self`, `$this` and `parent`.
    ///
    /// `self` and `parent` bind to the *declaring* classlike, so this pass
    /// fills only unresolved references — ancestor members keep the
    /// binding their own build produced. `$this` follows late static
    /// binding and is overwritten at every level, like `static`.
    fn resolve_declaration_keywords(info: &mut ClasslikeInfo) {
        let fqcn = info.fqcn.clone();
        let first_parent = info.direct_parents.first().cloned();
        for_each_type_ref(info, |type_ref, _| {
            let (base, suffix) = split_array_suffix(&type_ref.raw);
            match base {
                "self" if type_ref.resolved.is_none() => {
                    type_ref.resolved = Some(format!("{}{}", fqcn, suffix));
                }
                "parent" if type_ref.resolved.is_none() => {
                    if let Some(ref parent) = first_parent {
                        type_ref.resolved = Some(format!("{}{}", parent, suffix));
                    }
                }
                "$this" => {
                    type_ref.resolved = Some(format!("{}{}", fqcn, suffix));
                }
                _ => {}
            }
        });
    }

    /// Resolve `static` to the classlike being built, overwriting any
    /// binding an ancestor's build produced.
    fn resolve_static_keyword(info: &mut ClasslikeInfo) {
        let fqcn = info.fqcn.clone();
        for_each_type_ref(info, |type_ref, _| {
            let (base, suffix) = split_array_suffix(&type_ref.raw);
            if base == "static" {
                type_ref.resolved = Some(format!("{}{}", fqcn, suffix));
            }
        });
    }
}

/// Split `Foo[]` into `("Foo", "[]")`; plain types get an empty suffix.
fn split_array_suffix(raw: &str) -> (&str, &str) {
    match raw.strip_suffix("[]") {
        Some(base) => (base, "[]"),
        None => (raw, ""),
    }
}

/// Visit every type reference in `info` together with the span of the
/// member carrying it (parameters use the owning method's span).
fn for_each_type_ref(info: &mut ClasslikeInfo, mut f: impl FnMut(&mut TypeReference, Span)) {
    for constant in info.constants.values_mut() {
        for type_ref in &mut constant.types {
            f(type_ref, constant.span);
        }
    }
    for property in info.properties.values_mut() {
        for type_ref in &mut property.types {
            f(type_ref, property.span);
        }
    }
    for method in info.methods.values_mut() {
        for type_ref in &mut method.return_types {
            f(type_ref, method.span);
        }
        for parameter in &mut method.parameters {
            for type_ref in &mut parameter.types {
                f(type_ref, method.span);
            }
        }
    }
}
