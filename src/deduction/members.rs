//! Deduction of member access: class constants, properties, method and
//! static calls, and global function calls.
//!
//! The shared shape: deduce the type(s) of the object/class
//! sub-expression, then for *each* candidate type build its flattened
//! info and look up the referenced member by name. A candidate that fails
//! to build (unknown or cyclic) or lacks the member is silently skipped;
//! the results of all matches across all candidates are unioned.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ast::{Arg, Node};
use crate::docblock;
use crate::types::{FilePosition, TypeReference};

use super::{TypeDeducer, TypeDeductionContext};

/// Static factory/override hints: maps a `(class FQCN, method)` pair plus
/// the call site's literal first argument to an explicit return type list.
///
/// Lets a host teach the engine container patterns like
/// `App::make('mailer')` without any docblock support in user code.
#[derive(Debug, Clone, Default)]
pub struct MetaStaticMethodTypes {
    entries: FxHashMap<(String, String), FxHashMap<String, Vec<String>>>,
}

impl MetaStaticMethodTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an override: calling `class_fqcn::method(argument)` with
    /// exactly the given literal argument deduces to `types`.
    pub fn add(
        &mut self,
        class_fqcn: impl Into<String>,
        method: impl Into<String>,
        argument: impl Into<String>,
        types: Vec<String>,
    ) {
        self.entries
            .entry((class_fqcn.into(), method.into()))
            .or_default()
            .insert(argument.into(), types);
    }

    fn lookup(&self, class_fqcn: &str, method: &str, argument: &str) -> Option<&Vec<String>> {
        self.entries
            .get(&(class_fqcn.to_string(), method.to_string()))?
            .get(argument)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TypeDeducer<'_> {
    /// `<class>::NAME` — the constant's resolved types, unioned over all
    /// candidate class types. `<class>::class` is PHP's class-name string.
    pub(super) fn deduce_class_const_fetch(
        &self,
        class: &Node,
        name: &str,
        ctx: &TypeDeductionContext<'_>,
    ) -> Vec<String> {
        if name == "class" {
            return vec!["string".to_string()];
        }

        let mut types = Vec::new();
        for candidate in self.deduce_sub(class, ctx.document) {
            let Some(info) = self.build_candidate(&candidate) else {
                continue;
            };
            if let Some(constant) = info.constants.get(name) {
                collect_reference_names(&constant.types, &mut types);
            }
        }
        types
    }

    /// `<object>->name` / `<class>::$name` — the property's resolved
    /// types, unioned over all candidate base types.
    pub(super) fn deduce_property_fetch(
        &self,
        base: &Node,
        name: &str,
        static_access: bool,
        ctx: &TypeDeductionContext<'_>,
    ) -> Vec<String> {
        let mut types = Vec::new();
        for candidate in self.deduce_sub(base, ctx.document) {
            let Some(info) = self.build_candidate(&candidate) else {
                continue;
            };
            match info.properties.get(name) {
                Some(property) if property.is_static == static_access => {
                    collect_reference_names(&property.types, &mut types);
                }
                _ => {}
            }
        }
        types
    }

    /// `<object>->name(...)` / `<class>::name(...)` — the method's return
    /// types, unioned over all candidate base types. Meta overrides win
    /// over the stored return types when the call site matches.
    pub(super) fn deduce_method_call(
        &self,
        base: &Node,
        name: &str,
        args: &[Arg],
        ctx: &TypeDeductionContext<'_>,
    ) -> Vec<String> {
        let literal_arg = first_literal_argument(args);

        let mut types = Vec::new();
        for candidate in self.deduce_sub(base, ctx.document) {
            if let Some(argument) = literal_arg
                && let Some(overridden) = self.meta.lookup(&candidate, name, argument)
            {
                types.extend(overridden.iter().cloned());
                continue;
            }

            let Some(info) = self.build_candidate(&candidate) else {
                continue;
            };
            if let Some(method) = info.methods.get(name) {
                collect_reference_names(&method.return_types, &mut types);
            }
        }
        types
    }

    /// `name(...)` — a global (or namespaced) function's return types,
    /// looked up in the Symbol Store after qualifying the callee name.
    pub(super) fn deduce_function_call(
        &self,
        name: &str,
        ctx: &TypeDeductionContext<'_>,
    ) -> Vec<String> {
        let position = FilePosition::new(ctx.document.path.clone(), ctx.effective_position());
        let fqcn = self.names.resolve(name, &position);
        let Some(function) = self.store.find_function_by_fqcn(&fqcn) else {
            return Vec::new();
        };

        function
            .return_types
            .iter()
            .map(|type_ref| match type_ref.resolved {
                Some(ref resolved) => resolved.clone(),
                None if docblock::is_scalar(&type_ref.raw) => type_ref.raw.clone(),
                None => {
                    let declared_at = FilePosition::new(function.file.clone(), function.span.start);
                    self.names.resolve(&type_ref.raw, &declared_at)
                }
            })
            .collect()
    }

    /// Flatten a candidate base type, skipping scalars outright and
    /// swallowing build failures — an unknown or cyclic candidate just
    /// contributes nothing.
    fn build_candidate(&self, candidate: &str) -> Option<crate::types::ClasslikeInfo> {
        if docblock::is_scalar(candidate) {
            return None;
        }
        match self.builder().build(candidate) {
            Ok(info) => Some(info),
            Err(error) => {
                debug!(%candidate, %error, "skipping undeducible member base type");
                None
            }
        }
    }
}

/// The literal string value of the first argument, when there is one —
/// the key meta overrides are registered under.
fn first_literal_argument(args: &[Arg]) -> Option<&str> {
    match args.first() {
        Some(Arg {
            value: Node::StringLiteral { value, .. },
        }) => Some(value.as_str()),
        _ => None,
    }
}

fn collect_reference_names(references: &[TypeReference], out: &mut Vec<String>) {
    for reference in references {
        out.push(reference.name().to_string());
    }
}
