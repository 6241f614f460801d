//! The Local Type Scanner: flow-sensitive narrowing of expression types
//! inside the lexical scope enclosing a position.
//!
//! A single forward scan over the enclosing function/method/closure body
//! (or the top level) produces an immutable map from expression text
//! (`$var`, `$this->prop`) to the nearest node that establishes its type
//! as of the queried position: a parameter declaration, a `foreach` value
//! binding, a `catch` binding, an assignment, or an inline `@var` docblock
//! override. Assignment semantics follow control flow:
//!
//!   - an *unconditional* assignment replaces all previous candidates (the
//!     expression is being re-bound on every path), while
//!   - an assignment inside a conditional branch *adds* a possibility (the
//!     expression might be this type).
//!
//! The collected matches feed back into the Type Deduction Engine; the
//! final result rewrites the late-binding keywords (`self`, `static`,
//! `$this`, `parent`) to the concrete FQCN of the enclosing classlike.

use rustc_hash::FxHashMap;

use crate::ast::{Docblock, Document, Node, Param, Stmt};
use crate::deduction::{TypeDeducer, TypeDeductionContext};
use crate::docblock;
use crate::types::{FilePosition, Span};

/// The nearest node that establishes an expression's type.
#[derive(Debug, Clone)]
enum BestMatch {
    /// The right-hand side of an assignment to the expression.
    Assignment(Node),
    /// A `foreach` binding whose value variable is the expression.
    Foreach(Node),
    /// A `catch` binding whose variable is the expression.
    Catch(Node),
    /// A declared parameter of the enclosing scope.
    Param(Param),
}

/// What the forward scan learned about one tracked expression.
#[derive(Debug, Clone, Default)]
struct ExpressionTypeInfo {
    /// The last unconditional match, if any.
    best_match: Option<BestMatch>,
    /// Candidates observed along conditional branches since the last
    /// unconditional match — the type possibility map.
    possibilities: Vec<BestMatch>,
    /// An applicable `@var` docblock override: declared type text plus the
    /// offset it appears at.
    docblock_override: Option<(String, u32)>,
}

impl ExpressionTypeInfo {
    /// Record a match. Unconditional matches re-bind the expression:
    /// previous candidates and overrides no longer apply.
    fn record(&mut self, best_match: BestMatch, conditional: bool) {
        if conditional {
            self.possibilities.push(best_match);
        } else {
            self.best_match = Some(best_match);
            self.possibilities.clear();
            self.docblock_override = None;
        }
    }
}

/// The lexical scope enclosing a position: its declared parameters and
/// body statements.
struct Scope<'a> {
    params: &'a [Param],
    body: &'a [Stmt],
}

impl TypeDeducer<'_> {
    /// The engine's rule for variable nodes: delegate entirely to the
    /// scanner. A bare `$this` has no establishing node; it enters as its
    /// own default and the keyword rewrite binds it to the enclosing
    /// classlike.
    pub(crate) fn deduce_variable(
        &self,
        name: &str,
        ctx: &TypeDeductionContext<'_>,
    ) -> Vec<String> {
        let defaults = if name == "$this" {
            vec!["$this".to_string()]
        } else {
            Vec::new()
        };
        self.local_expression_types(ctx.document, ctx.effective_position(), name, &defaults)
    }

    /// Determine the local types of `expression` (e.g. `"$user"`,
    /// `"$this->repo"`) at `position`, falling back to `default_types`
    /// when the enclosing scope establishes nothing.
    pub fn local_expression_types(
        &self,
        document: &Document,
        position: u32,
        expression: &str,
        default_types: &[String],
    ) -> Vec<String> {
        let scope = find_scope(&document.program, position).unwrap_or(Scope {
            params: &[],
            body: &document.program,
        });

        let mut map: FxHashMap<String, ExpressionTypeInfo> = FxHashMap::default();
        for param in scope.params {
            map.entry(param.name.clone())
                .or_default()
                .record(BestMatch::Param(param.clone()), false);
        }
        scan_statements(&mut map, scope.body, position, false);

        let info = map.get(expression);

        // (1) An explicit `@var` override at or before the position wins
        // outright.
        if let Some((override_text, offset)) = info.and_then(|i| i.docblock_override.as_ref())
            && *offset <= position
        {
            let types = self.expand_annotation_types(document, position, override_text);
            return self.rewrite_keyword_types(document, position, types);
        }

        // (2) Deduce through every recorded match: the unconditional
        // best match plus the possibilities branches contributed.
        let mut types = Vec::new();
        if let Some(info) = info {
            for best_match in info.best_match.iter().chain(info.possibilities.iter()) {
                types.extend(self.deduce_match(best_match, document, position));
            }
        }

        // (3) Nothing local establishes a type — fall back to the
        // caller's defaults. A match that deduced to nothing does not.
        if info.is_none_or(|i| i.best_match.is_none() && i.possibilities.is_empty())
            && types.is_empty()
        {
            types = default_types.to_vec();
        }

        self.rewrite_keyword_types(document, position, types)
    }

    fn deduce_match(&self, best_match: &BestMatch, document: &Document, position: u32) -> Vec<String> {
        match best_match {
            // The RHS is evaluated at its own start position so that a
            // self-referential assignment terminates.
            BestMatch::Assignment(rhs) => self.deduce(&TypeDeductionContext::at(
                rhs,
                document,
                rhs.span().start,
            )),
            BestMatch::Foreach(node) | BestMatch::Catch(node) => {
                self.deduce(&TypeDeductionContext::at(node, document, position))
            }
            BestMatch::Param(param) => self.resolve_param_types(document, param),
        }
    }

    /// Parameter resolution order: the `@param` docblock entry first, then
    /// the declared hint, then nullability.
    fn resolve_param_types(&self, document: &Document, param: &Param) -> Vec<String> {
        if let Some(ref docblock_type) = param.docblock_type {
            return self.expand_annotation_types(document, param.span.start, docblock_type);
        }

        let mut types = Vec::new();
        if let Some(ref hint) = param.hint {
            types = self.expand_annotation_types(document, param.span.start, hint);
            if param.nullable {
                types.push("null".to_string());
            }
        }
        types
    }

    /// Expand a docblock/hint type string into resolved member types:
    /// unions and intersections split, scalars kept as written, classlike
    /// names qualified through the Name Resolver.
    fn expand_annotation_types(
        &self,
        document: &Document,
        offset: u32,
        annotation: &str,
    ) -> Vec<String> {
        docblock::split_type_list(annotation)
            .into_iter()
            .map(|member| {
                if docblock::is_scalar(&member) || docblock::is_keyword(&member) {
                    member
                } else {
                    let (base, suffix) = match member.strip_suffix("[]") {
                        Some(base) => (base.to_string(), "[]"),
                        None => (member, ""),
                    };
                    let position = FilePosition::new(document.path.clone(), offset);
                    format!("{}{}", self.names.resolve(&base, &position), suffix)
                }
            })
            .collect()
    }

    /// Rewrite the late-binding keywords in a result list to the concrete
    /// FQCN of the enclosing classlike, by deducing the corresponding
    /// synthetic keyword node through the engine.
    fn rewrite_keyword_types(
        &self,
        document: &Document,
        position: u32,
        types: Vec<String>,
    ) -> Vec<String> {
        let mut out = Vec::with_capacity(types.len());
        for type_name in types {
            let keyword = match type_name.as_str() {
                "self" => Some("self"),
                // `$this` and `static` both late-bind to the class in
                // scope at the position.
                "static" | "$this" => Some("static"),
                "parent" => Some("parent"),
                _ => None,
            };
            match keyword {
                Some(keyword) => {
                    let node = Node::Name {
                        value: keyword.to_string(),
                        span: Span::new(position, position),
                    };
                    out.extend(self.deduce(&TypeDeductionContext::at(&node, document, position)));
                }
                None => out.push(type_name),
            }
        }
        crate::deduction::dedup_preserving(out)
    }
}

// ─── Scope location ─────────────────────────────────────────────────────────

/// Find the innermost function/method/closure body enclosing `position`.
/// Returns `None` when the position sits in top-level code.
fn find_scope<'a>(statements: &'a [Stmt], position: u32) -> Option<Scope<'a>> {
    for stmt in statements {
        match stmt {
            Stmt::Function(func) if func.body_span.contains(position) => {
                return Some(find_scope(&func.body, position).unwrap_or(Scope {
                    params: &func.params,
                    body: &func.body,
                }));
            }
            Stmt::Class(class) => {
                for method in &class.methods {
                    if method.body_span.contains(position) {
                        return Some(find_scope(&method.body, position).unwrap_or(Scope {
                            params: &method.params,
                            body: &method.body,
                        }));
                    }
                }
            }
            Stmt::Expression { expr, .. } => {
                if let Some(scope) = find_closure_scope(expr, position) {
                    return Some(scope);
                }
            }
            Stmt::Block { body, .. } => {
                if let Some(scope) = find_scope(body, position) {
                    return Some(scope);
                }
            }
            Stmt::If {
                then_body,
                else_body,
                ..
            } => {
                if let Some(scope) =
                    find_scope(then_body, position).or_else(|| find_scope(else_body, position))
                {
                    return Some(scope);
                }
            }
            Stmt::Foreach { body, .. } => {
                if let Some(scope) = find_scope(body, position) {
                    return Some(scope);
                }
            }
            Stmt::Try {
                body,
                catches,
                finally,
                ..
            } => {
                if let Some(scope) = find_scope(body, position) {
                    return Some(scope);
                }
                for catch in catches {
                    if let Some(scope) = find_scope(&catch.body, position) {
                        return Some(scope);
                    }
                }
                if let Some(scope) = find_scope(finally, position) {
                    return Some(scope);
                }
            }
            _ => {}
        }
    }
    None
}

/// Search an expression tree for a closure whose body encloses
/// `position`. Closures introduce a fresh variable scope.
fn find_closure_scope<'a>(node: &'a Node, position: u32) -> Option<Scope<'a>> {
    match node {
        Node::Closure {
            params,
            body,
            body_span,
            ..
        } if body_span.contains(position) => {
            Some(find_scope(body, position).unwrap_or(Scope { params, body }))
        }
        Node::Assignment { lhs, rhs, .. } => {
            find_closure_scope(lhs, position).or_else(|| find_closure_scope(rhs, position))
        }
        Node::Ternary {
            condition,
            then,
            r#else,
            ..
        } => find_closure_scope(condition, position)
            .or_else(|| then.as_deref().and_then(|t| find_closure_scope(t, position)))
            .or_else(|| find_closure_scope(r#else, position)),
        Node::MethodCall { object: base, args, .. }
        | Node::StaticCall { class: base, args, .. } => {
            find_closure_scope(base, position)
                .or_else(|| args.iter().find_map(|arg| find_closure_scope(&arg.value, position)))
        }
        Node::FunctionCall { args, .. } => args
            .iter()
            .find_map(|arg| find_closure_scope(&arg.value, position)),
        Node::New { class: inner, .. }
        | Node::Clone { subject: inner, .. }
        | Node::ArrayIndex { base: inner, .. }
        | Node::PropertyFetch { object: inner, .. }
        | Node::StaticPropertyFetch { class: inner, .. }
        | Node::ClassConstFetch { class: inner, .. } => find_closure_scope(inner, position),
        _ => None,
    }
}

// ─── Forward scan ───────────────────────────────────────────────────────────

/// Walk statements up to `position`, recording what establishes each
/// tracked expression's type. `conditional` marks branches that may or
/// may not execute.
fn scan_statements(
    map: &mut FxHashMap<String, ExpressionTypeInfo>,
    statements: &[Stmt],
    position: u32,
    conditional: bool,
) {
    for stmt in statements {
        // Only statements starting before the position can establish a
        // type at it.
        if stmt.span().start >= position {
            continue;
        }

        match stmt {
            // An expression statement must have completed before the
            // position — the RHS of the very assignment being re-queried
            // must not establish its own type.
            Stmt::Expression {
                expr,
                docblock,
                span,
            } => {
                if span.end < position {
                    scan_expression(map, expr, docblock.as_ref(), conditional);
                }
            }
            Stmt::Block { body, .. } => {
                scan_statements(map, body, position, conditional);
            }
            Stmt::If {
                then_body,
                else_body,
                ..
            } => {
                scan_statements(map, then_body, position, true);
                scan_statements(map, else_body, position, true);
            }
            Stmt::Foreach { binding, body, .. } => {
                // The iteration variable only exists inside the loop body.
                if let Node::Foreach { value_var, .. } = binding
                    && body_contains(body, stmt.span(), position)
                {
                    map.entry(value_var.clone())
                        .or_default()
                        .record(BestMatch::Foreach(binding.clone()), conditional);
                }
                scan_statements(map, body, position, true);
            }
            Stmt::Try {
                body,
                catches,
                finally,
                ..
            } => {
                scan_statements(map, body, position, true);
                for catch in catches {
                    if let Node::Catch { variable, .. } = &catch.node
                        && catch
                            .body
                            .first()
                            .zip(catch.body.last())
                            .is_some_and(|(first, last)| {
                                Span::new(first.span().start, last.span().end).contains(position)
                            })
                    {
                        map.entry(variable.clone())
                            .or_default()
                            .record(BestMatch::Catch(catch.node.clone()), conditional);
                    }
                    scan_statements(map, &catch.body, position, true);
                }
                scan_statements(map, finally, position, true);
            }
            _ => {}
        }
    }
}

/// Record assignments (including chained `$a = $b = …`) and inline `@var`
/// overrides carried by an expression statement.
fn scan_expression(
    map: &mut FxHashMap<String, ExpressionTypeInfo>,
    expr: &Node,
    docblock: Option<&Docblock>,
    conditional: bool,
) {
    // A docblock with an explicit variable name overrides that variable
    // even when the statement is not an assignment to it.
    if let Some(doc) = docblock
        && let Some((annotation, var_name)) = docblock::parse_var_tag(&doc.text)
        && let Some(var_name) = var_name
    {
        map.entry(var_name)
            .or_default()
            .docblock_override = Some((annotation, doc.span.start));
    }

    let Node::Assignment { lhs, rhs, .. } = expr else {
        return;
    };

    if let Some(text) = lhs.expression_text() {
        map.entry(text.clone())
            .or_default()
            .record(BestMatch::Assignment((**rhs).clone()), conditional);

        // A nameless `/** @var Type */` applies to the assignment target.
        if let Some(doc) = docblock
            && let Some((annotation, None)) = docblock::parse_var_tag(&doc.text)
        {
            map.entry(text)
                .or_default()
                .docblock_override = Some((annotation, doc.span.start));
        }
    }

    // Chained assignment: the inner assignment also binds.
    if matches!(rhs.as_ref(), Node::Assignment { .. }) {
        scan_expression(map, rhs, None, conditional);
    }
}

/// Whether `position` falls inside a loop body, approximated by the span
/// from the first body statement to the statement's end (bodies carry no
/// span of their own).
fn body_contains(body: &[Stmt], stmt_span: Span, position: u32) -> bool {
    match body.first() {
        Some(first) => Span::new(first.span().start, stmt_span.end).contains(position),
        None => false,
    }
}
