//! Deduction of name nodes and catch clauses.
//!
//! Name nodes in class-name position special-case the late-binding
//! keywords: `self` and `static` resolve to the innermost classlike
//! enclosing the position, `parent` to that classlike's first direct
//! parent (silently empty when there is none). Everything else goes
//! through the Name Resolver.

use crate::ast::{ClassDecl, Document, FunctionDecl, Stmt};
use crate::types::FilePosition;

use super::{TypeDeducer, TypeDeductionContext};

impl TypeDeducer<'_> {
    pub(super) fn deduce_name(&self, value: &str, ctx: &TypeDeductionContext<'_>) -> Vec<String> {
        let position = ctx.effective_position();
        match value {
            "self" | "static" => self
                .enclosing_classlike(ctx.document, position)
                .into_iter()
                .collect(),
            "parent" => {
                let Some(fqcn) = self.enclosing_classlike(ctx.document, position) else {
                    return Vec::new();
                };
                let Some(record) = self.store.find_classlike_by_fqcn(&fqcn) else {
                    return Vec::new();
                };
                record.parents.first().cloned().into_iter().collect()
            }
            _ => {
                let file_position = FilePosition::new(ctx.document.path.clone(), position);
                vec![self.names.resolve(value, &file_position)]
            }
        }
    }

    /// A catch clause's variable takes the union of all caught exception
    /// types.
    pub(super) fn deduce_catch(
        &self,
        class_names: &[String],
        ctx: &TypeDeductionContext<'_>,
    ) -> Vec<String> {
        let position = FilePosition::new(ctx.document.path.clone(), ctx.effective_position());
        class_names
            .iter()
            .map(|name| self.names.resolve(name, &position))
            .collect()
    }

    /// The FQCN of the innermost classlike declaration enclosing
    /// `position` in `document`, if any.
    pub(crate) fn enclosing_classlike(&self, document: &Document, position: u32) -> Option<String> {
        let class = find_enclosing_class(&document.program, position)?;
        let file_position = FilePosition::new(document.path.clone(), class.span.start);
        Some(self.names.resolve(&class.name, &file_position))
    }
}

fn find_enclosing_class(statements: &[Stmt], position: u32) -> Option<&ClassDecl> {
    for stmt in statements {
        match stmt {
            Stmt::Class(class) if class.span.contains(position) => return Some(class),
            Stmt::Block { body, .. } | Stmt::Function(FunctionDecl { body, .. }) => {
                if let Some(found) = find_enclosing_class(body, position) {
                    return Some(found);
                }
            }
            Stmt::If {
                then_body,
                else_body,
                ..
            } => {
                if let Some(found) = find_enclosing_class(then_body, position)
                    .or_else(|| find_enclosing_class(else_body, position))
                {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}
