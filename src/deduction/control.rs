//! Deduction rules for value-flow constructs: assignments, ternaries,
//! array index access and foreach value bindings.

use crate::ast::Node;
use crate::docblock;

use super::{TypeDeducer, TypeDeductionContext};

impl TypeDeducer<'_> {
    /// An assignment has the type of its right-hand side.
    ///
    /// The RHS is evaluated at its *own* start position, not the
    /// assignment's — re-querying `$x = $x` at the textual `$x` would
    /// otherwise recurse forever through the scanner.
    pub(super) fn deduce_assignment(&self, rhs: &Node, ctx: &TypeDeductionContext<'_>) -> Vec<String> {
        self.deduce(&TypeDeductionContext::at(
            rhs,
            ctx.document,
            rhs.span().start,
        ))
    }

    /// A ternary is the union of its branches. The Elvis form
    /// `cond ?: else` falls back to the condition for the "then" side.
    pub(super) fn deduce_ternary(
        &self,
        condition: &Node,
        then: Option<&Node>,
        r#else: &Node,
        ctx: &TypeDeductionContext<'_>,
    ) -> Vec<String> {
        let mut types = self.deduce_sub(then.unwrap_or(condition), ctx.document);
        types.extend(self.deduce_sub(r#else, ctx.document));
        types
    }

    /// Array index access, per candidate type of the base expression:
    /// `string` bases index to `string`, array-shaped bases (`T[]`) to
    /// their element type, anything else to `mixed`.
    pub(super) fn deduce_array_index(
        &self,
        base: &Node,
        ctx: &TypeDeductionContext<'_>,
    ) -> Vec<String> {
        self.deduce_sub(base, ctx.document)
            .into_iter()
            .map(|base_type| {
                if base_type == "string" {
                    "string".to_string()
                } else if let Some(element) = docblock::array_element_type(&base_type) {
                    element.to_string()
                } else {
                    "mixed".to_string()
                }
            })
            .collect()
    }

    /// The foreach value variable takes the element type of every
    /// array-shaped candidate of the iterated expression; candidates
    /// without an element type contribute nothing.
    pub(super) fn deduce_foreach_value(
        &self,
        iterable: &Node,
        ctx: &TypeDeductionContext<'_>,
    ) -> Vec<String> {
        self.deduce_sub(iterable, ctx.document)
            .into_iter()
            .filter_map(|iterable_type| {
                docblock::array_element_type(&iterable_type).map(str::to_string)
            })
            .collect()
    }
}
