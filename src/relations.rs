//! Relation resolvers: member merging between a flattened ancestor and an
//! in-progress descendant.
//!
//! Each resolver takes a fully-built ancestor's info and merges its
//! constants, properties and methods into the descendant, respecting PHP's
//! precedence rules (the descendant's own members always win) and
//! recording provenance:
//!
//!   - `declaring_structure` is *propagated*, never overwritten — a member
//!     that travelled `Base → Mid → Child` still names `Base`.
//!   - a member copied in (or redeclared by the descendant) is tagged as an
//!     "override" of the ancestor for inheritance/trait merging, or as an
//!     "implementation" for interface merging. `override_of` keeps its
//!     first value, so the *nearest* shadowed ancestor wins and an
//!     unmodified member keeps pointing at its declaring ancestor.
//!
//! Trait usage additionally applies `as`-aliases and `insteadof`
//! precedences before the generic merge.

use tracing::warn;

use crate::types::{ClasslikeInfo, MethodInfo, TraitAlias, TraitPrecedence, Visibility};

/// How an ancestor relates to the descendant being built. Decides
/// visibility filtering and which provenance field gets stamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    /// `extends` — parent class or parent interface chain.
    Inheritance,
    /// `implements` — interface onto an implementing class.
    Implementation,
    /// `use` — trait mixed into a class or another trait.
    TraitUse,
}

/// Merges members from a parent classlike into its child.
///
/// Private parent members are never inherited; a child member with the
/// same name shadows the parent's and is annotated as its override.
pub(crate) struct InheritanceResolver;

impl InheritanceResolver {
    pub(crate) fn resolve(ancestor: &ClasslikeInfo, descendant: &mut ClasslikeInfo) {
        merge_constants(ancestor, descendant, Relation::Inheritance);
        merge_properties(ancestor, descendant, Relation::Inheritance);
        let methods: Vec<MethodInfo> = ancestor.methods.values().cloned().collect();
        merge_methods(&methods, ancestor, descendant, Relation::Inheritance);
    }
}

/// Merges members from an implemented interface into the implementing
/// class. Interfaces carry constants and (abstract) methods; a class
/// member satisfying an interface member is annotated as its
/// implementation.
pub(crate) struct InterfaceImplementationResolver;

impl InterfaceImplementationResolver {
    pub(crate) fn resolve(ancestor: &ClasslikeInfo, descendant: &mut ClasslikeInfo) {
        merge_constants(ancestor, descendant, Relation::Implementation);
        let methods: Vec<MethodInfo> = ancestor.methods.values().cloned().collect();
        merge_methods(&methods, ancestor, descendant, Relation::Implementation);
    }
}

/// Merges members from a used trait into the using classlike.
///
/// Unlike inheritance, trait members are copied regardless of visibility —
/// PHP copies trait members into the using class as if they were written
/// there. `as` aliases are expanded and `insteadof` precedences filter
/// losing methods before the generic merge runs.
pub(crate) struct TraitUsageResolver;

impl TraitUsageResolver {
    pub(crate) fn resolve(
        ancestor: &ClasslikeInfo,
        descendant: &mut ClasslikeInfo,
        aliases: &[TraitAlias],
        precedences: &[TraitPrecedence],
    ) {
        merge_constants(ancestor, descendant, Relation::TraitUse);
        merge_properties(ancestor, descendant, Relation::TraitUse);

        let methods = Self::adapted_methods(ancestor, aliases, precedences);
        merge_methods(&methods, ancestor, descendant, Relation::TraitUse);
    }

    /// Apply aliasing and precedence rules to the trait's method list.
    ///
    /// Precedence: a method loses (is dropped) when an `insteadof`
    /// declaration names the same method on a *different* trait. Aliasing:
    /// each matching `as` adaptation appends a renamed (and possibly
    /// re-scoped) copy; the original stays available under its own name,
    /// matching PHP.
    fn adapted_methods(
        ancestor: &ClasslikeInfo,
        aliases: &[TraitAlias],
        precedences: &[TraitPrecedence],
    ) -> Vec<MethodInfo> {
        let mut methods: Vec<MethodInfo> = ancestor
            .methods
            .values()
            .filter(|method| {
                !precedences
                    .iter()
                    .any(|p| p.method == method.name && p.trait_fqcn != ancestor.fqcn)
            })
            .cloned()
            .collect();

        for alias in aliases {
            let applies = alias
                .trait_fqcn
                .as_deref()
                .is_none_or(|fqcn| fqcn == ancestor.fqcn);
            if !applies {
                continue;
            }
            let Some(original) = ancestor.methods.get(&alias.method) else {
                continue;
            };

            let mut adapted = original.clone();
            if let Some(ref new_name) = alias.alias {
                adapted.name = new_name.clone();
            }
            if let Some(visibility) = alias.visibility {
                adapted.visibility = visibility;
            }
            methods.push(adapted);
        }

        methods
    }
}

// ─── Generic merge ──────────────────────────────────────────────────────────

fn merge_constants(ancestor: &ClasslikeInfo, descendant: &mut ClasslikeInfo, relation: Relation) {
    for constant in ancestor.constants.values() {
        if relation == Relation::Inheritance && constant.visibility == Visibility::Private {
            continue;
        }
        match descendant.constants.get_mut(&constant.name) {
            Some(existing) => match relation {
                Relation::Implementation => {
                    push_unique(&mut existing.implementation_of, &ancestor.fqcn);
                }
                _ => {
                    existing.override_of.get_or_insert_with(|| ancestor.fqcn.clone());
                }
            },
            None => {
                let mut copied = constant.clone();
                match relation {
                    Relation::Implementation => {
                        push_unique(&mut copied.implementation_of, &ancestor.fqcn);
                    }
                    _ => {
                        copied.override_of.get_or_insert_with(|| ancestor.fqcn.clone());
                    }
                }
                descendant.constants.insert(copied.name.clone(), copied);
            }
        }
    }
}

fn merge_properties(ancestor: &ClasslikeInfo, descendant: &mut ClasslikeInfo, relation: Relation) {
    for property in ancestor.properties.values() {
        if relation == Relation::Inheritance && property.visibility == Visibility::Private {
            continue;
        }
        match descendant.properties.get_mut(&property.name) {
            Some(existing) => {
                existing.override_of.get_or_insert_with(|| ancestor.fqcn.clone());
            }
            None => {
                let mut copied = property.clone();
                copied.override_of.get_or_insert_with(|| ancestor.fqcn.clone());
                descendant.properties.insert(copied.name.clone(), copied);
            }
        }
    }
}

fn merge_methods(
    methods: &[MethodInfo],
    ancestor: &ClasslikeInfo,
    descendant: &mut ClasslikeInfo,
    relation: Relation,
) {
    for method in methods {
        if relation == Relation::Inheritance && method.visibility == Visibility::Private {
            continue;
        }
        match descendant.methods.get_mut(&method.name) {
            Some(existing) => {
                match relation {
                    Relation::Implementation => {
                        push_unique(&mut existing.implementation_of, &ancestor.fqcn);
                    }
                    _ => {
                        // A same-named method that the descendant did not
                        // declare itself came from an earlier-merged trait:
                        // without a disambiguating precedence that is a
                        // collision PHP rejects at compile time. The first
                        // trait keeps winning here; the indexer surfaces
                        // the error.
                        if relation == Relation::TraitUse
                            && existing.declaring_structure != descendant.fqcn
                        {
                            warn!(
                                classlike = %descendant.fqcn,
                                method = %method.name,
                                first = %existing.declaring_structure,
                                second = %ancestor.fqcn,
                                "method collision between traits without an insteadof precedence"
                            );
                        }
                        existing.override_of.get_or_insert_with(|| ancestor.fqcn.clone());
                    }
                }
            }
            None => {
                let mut copied = method.clone();
                match relation {
                    Relation::Implementation => {
                        push_unique(&mut copied.implementation_of, &ancestor.fqcn);
                    }
                    _ => {
                        copied.override_of.get_or_insert_with(|| ancestor.fqcn.clone());
                    }
                }
                descendant.methods.insert(copied.name.clone(), copied);
            }
        }
    }
}

fn push_unique(list: &mut Vec<String>, fqcn: &str) {
    if !list.iter().any(|f| f == fqcn) {
        list.push(fqcn.to_string());
    }
}
