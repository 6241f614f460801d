//! Expression type deduction.
//!
//! [`TypeDeducer::deduce`] answers "what are the possible static types of
//! this expression at this position" as a deduplicated union of type
//! names. It is a pure dispatch over the closed [`Node`] set: every node
//! kind maps to exactly one rule, each rule recurses into the engine for
//! its sub-expressions, and a kind without a rule is normalised to "no
//! types" rather than an error — the empty list is the universal
//! "undeducible" signal.
//!
//! The per-kind rules live in the submodules: [`names`], [`members`] and
//! [`control`] all extend [`TypeDeducer`] with further `impl` blocks, as
//! does the Local Type Scanner in [`crate::scanner`].

mod control;
mod members;
mod names;

pub use members::MetaStaticMethodTypes;

use thiserror::Error;
use tracing::debug;

use crate::ast::{Document, Node};
use crate::builder::ClasslikeInfoBuilder;
use crate::names::NameResolver;
use crate::store::SymbolStore;

/// Everything a deduction needs: the node whose type is sought and enough
/// position context to resolve names.
///
/// When `position` is `None`, the node's own start offset is used. Rules
/// that recurse pass an explicit position where the default would loop —
/// the assignment rule evaluates its right-hand side at the RHS's own
/// start so that `$x = $x` re-queried at the same variable terminates.
#[derive(Debug, Clone, Copy)]
pub struct TypeDeductionContext<'a> {
    pub node: &'a Node,
    pub document: &'a Document,
    pub position: Option<u32>,
}

impl<'a> TypeDeductionContext<'a> {
    pub fn new(node: &'a Node, document: &'a Document) -> Self {
        Self {
            node,
            document,
            position: None,
        }
    }

    pub fn at(node: &'a Node, document: &'a Document, position: u32) -> Self {
        Self {
            node,
            document,
            position: Some(position),
        }
    }

    /// The effective position: explicit when supplied, the node's own
    /// start otherwise.
    pub fn effective_position(&self) -> u32 {
        self.position.unwrap_or_else(|| self.node.span().start)
    }
}

/// Raised internally when a node kind has no deduction rule; never leaves
/// the engine — [`TypeDeducer::deduce`] normalises it to an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no deducer registered for this node kind")]
pub(crate) struct NoDeducerFound;

/// The type deduction engine.
///
/// Stateless apart from its injected collaborators and the optional meta
/// override table; safe to construct per request.
pub struct TypeDeducer<'a> {
    pub(crate) store: &'a dyn SymbolStore,
    pub(crate) names: &'a dyn NameResolver,
    pub(crate) meta: MetaStaticMethodTypes,
}

impl<'a> TypeDeducer<'a> {
    pub fn new(store: &'a dyn SymbolStore, names: &'a dyn NameResolver) -> Self {
        Self {
            store,
            names,
            meta: MetaStaticMethodTypes::default(),
        }
    }

    /// Like [`TypeDeducer::new`], with a meta override table consulted by
    /// method/static-call deduction.
    pub fn with_meta(
        store: &'a dyn SymbolStore,
        names: &'a dyn NameResolver,
        meta: MetaStaticMethodTypes,
    ) -> Self {
        Self { store, names, meta }
    }

    /// A classlike builder over the same collaborators, for member
    /// lookups.
    pub(crate) fn builder(&self) -> ClasslikeInfoBuilder<'_> {
        ClasslikeInfoBuilder::new(self.store, self.names)
    }

    /// Deduce the possible types of the context's node.
    ///
    /// Returns a deduplicated union of type names; empty means "could not
    /// be determined", never an error.
    pub fn deduce(&self, ctx: &TypeDeductionContext<'_>) -> Vec<String> {
        match self.dispatch(ctx) {
            Ok(types) => dedup_preserving(types),
            Err(NoDeducerFound) => {
                debug!(position = ctx.effective_position(), "no deducer for node kind");
                Vec::new()
            }
        }
    }

    /// Convenience wrapper for rules recursing into a sub-expression at
    /// its own position.
    pub(crate) fn deduce_sub(&self, node: &Node, document: &Document) -> Vec<String> {
        self.deduce(&TypeDeductionContext::new(node, document))
    }

    fn dispatch(&self, ctx: &TypeDeductionContext<'_>) -> Result<Vec<String>, NoDeducerFound> {
        match ctx.node {
            Node::IntLiteral { .. } => Ok(vec!["int".to_string()]),
            Node::FloatLiteral { .. } => Ok(vec!["float".to_string()]),
            Node::StringLiteral { .. } => Ok(vec!["string".to_string()]),
            Node::ArrayLiteral { .. } => Ok(vec!["array".to_string()]),
            Node::Closure { .. } | Node::ArrowFn { .. } => Ok(vec!["\\Closure".to_string()]),

            Node::Variable { name, .. } => Ok(self.deduce_variable(name, ctx)),
            Node::Assignment { rhs, .. } => Ok(self.deduce_assignment(rhs, ctx)),
            Node::Ternary {
                condition,
                then,
                r#else,
                ..
            } => Ok(self.deduce_ternary(condition, then.as_deref(), r#else, ctx)),
            Node::ArrayIndex { base, .. } => Ok(self.deduce_array_index(base, ctx)),
            Node::Foreach { iterable, .. } => Ok(self.deduce_foreach_value(iterable, ctx)),

            Node::New { class, .. } => Ok(self.deduce_sub(class, ctx.document)),
            Node::Clone { subject, .. } => Ok(self.deduce_sub(subject, ctx.document)),
            Node::Name { value, .. } => Ok(self.deduce_name(value, ctx)),
            Node::Catch { class_names, .. } => Ok(self.deduce_catch(class_names, ctx)),

            Node::ClassConstFetch { class, name, .. } => {
                Ok(self.deduce_class_const_fetch(class, name, ctx))
            }
            Node::PropertyFetch { object, name, .. } => {
                Ok(self.deduce_property_fetch(object, name, false, ctx))
            }
            Node::StaticPropertyFetch { class, name, .. } => {
                Ok(self.deduce_property_fetch(class, name, true, ctx))
            }
            Node::MethodCall {
                object, name, args, ..
            } => Ok(self.deduce_method_call(object, name, args, ctx)),
            Node::StaticCall {
                class, name, args, ..
            } => Ok(self.deduce_method_call(class, name, args, ctx)),
            Node::FunctionCall { name, .. } => Ok(self.deduce_function_call(name, ctx)),

            // Parameters are resolved by the Local Type Scanner, which
            // special-cases them before consulting the engine.
            Node::Param(_) => Err(NoDeducerFound),
        }
    }
}

/// Deduplicate while keeping first-seen order.
pub(crate) fn dedup_preserving(types: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(types.len());
    for t in types {
        if !out.contains(&t) {
            out.push(t);
        }
    }
    out
}
