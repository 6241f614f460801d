#![allow(dead_code)]

use phpsema::ast::{
    Arg, ClassDecl, Docblock, Document, FunctionDecl, Node, Param, Stmt,
};
use phpsema::types::{
    ClasslikeKind, ClasslikeRecord, FunctionRecord, RawConstant, RawMethod, RawProperty, Span,
    TypeReference, Visibility,
};
use phpsema::{FileImports, ImportMapResolver, InMemorySymbolStore};

// ─── Record fixtures ────────────────────────────────────────────────────────

pub fn refs(raws: &[&str]) -> Vec<TypeReference> {
    raws.iter().map(|raw| TypeReference::raw(*raw)).collect()
}

pub fn class(fqcn: &str, file: &str) -> ClasslikeRecord {
    ClasslikeRecord::new(ClasslikeKind::Class, fqcn, file)
}

pub fn interface(fqcn: &str, file: &str) -> ClasslikeRecord {
    ClasslikeRecord::new(ClasslikeKind::Interface, fqcn, file)
}

pub fn trait_record(fqcn: &str, file: &str) -> ClasslikeRecord {
    ClasslikeRecord::new(ClasslikeKind::Trait, fqcn, file)
}

pub fn constant(name: &str, types: &[&str]) -> RawConstant {
    RawConstant {
        name: name.to_string(),
        types: refs(types),
        visibility: Visibility::Public,
        span: Span::default(),
    }
}

pub fn property(name: &str, types: &[&str]) -> RawProperty {
    property_with(name, types, Visibility::Public, false)
}

pub fn property_with(
    name: &str,
    types: &[&str],
    visibility: Visibility,
    is_static: bool,
) -> RawProperty {
    RawProperty {
        name: name.to_string(),
        types: refs(types),
        visibility,
        is_static,
        span: Span::default(),
    }
}

pub fn method(name: &str, return_types: &[&str]) -> RawMethod {
    method_with(name, return_types, Visibility::Public)
}

pub fn method_with(name: &str, return_types: &[&str], visibility: Visibility) -> RawMethod {
    RawMethod {
        name: name.to_string(),
        parameters: Vec::new(),
        return_types: refs(return_types),
        visibility,
        is_static: false,
        is_abstract: false,
        is_final: false,
        span: Span::default(),
    }
}

pub fn static_method(name: &str, return_types: &[&str]) -> RawMethod {
    RawMethod {
        is_static: true,
        ..method(name, return_types)
    }
}

pub fn function(fqcn: &str, file: &str, return_types: &[&str]) -> FunctionRecord {
    FunctionRecord {
        fqcn: fqcn.to_string(),
        file: file.to_string(),
        span: Span::default(),
        parameters: Vec::new(),
        return_types: refs(return_types),
    }
}

pub fn store_with(records: Vec<ClasslikeRecord>) -> InMemorySymbolStore {
    let mut store = InMemorySymbolStore::new();
    for record in records {
        store.add_classlike(record);
    }
    store
}

// ─── Name resolver fixtures ─────────────────────────────────────────────────

/// A resolver with no registered files: every name resolves to itself.
pub fn bare_resolver() -> ImportMapResolver {
    ImportMapResolver::new()
}

/// A resolver where `path` lives in `namespace` with the given `use`
/// table (alias → FQCN).
pub fn resolver_for(path: &str, namespace: &str, uses: &[(&str, &str)]) -> ImportMapResolver {
    let mut imports = FileImports {
        namespace: Some(namespace.to_string()),
        ..Default::default()
    };
    for (alias, fqcn) in uses {
        imports.uses.insert(alias.to_string(), fqcn.to_string());
    }
    let mut resolver = ImportMapResolver::new();
    resolver.set_file_imports(path, imports);
    resolver
}

// ─── AST fixtures ───────────────────────────────────────────────────────────

pub fn sp(start: u32, end: u32) -> Span {
    Span::new(start, end)
}

pub fn var(name: &str, at: u32) -> Node {
    Node::Variable {
        name: name.to_string(),
        span: sp(at, at + name.len() as u32),
    }
}

pub fn name_node(value: &str, at: u32) -> Node {
    Node::Name {
        value: value.to_string(),
        span: sp(at, at + value.len() as u32),
    }
}

pub fn int_lit(at: u32) -> Node {
    Node::IntLiteral { span: sp(at, at + 1) }
}

pub fn string_lit(value: &str, at: u32) -> Node {
    Node::StringLiteral {
        value: value.to_string(),
        span: sp(at, at + value.len() as u32 + 2),
    }
}

pub fn array_lit(at: u32) -> Node {
    Node::ArrayLiteral { span: sp(at, at + 2) }
}

pub fn new_of(class_name: &str, at: u32) -> Node {
    let name = name_node(class_name, at + 4);
    let end = name.span().end + 2;
    Node::New {
        class: Box::new(name),
        span: sp(at, end),
    }
}

pub fn assign(lhs: Node, rhs: Node) -> Node {
    let span = sp(lhs.span().start, rhs.span().end);
    Node::Assignment {
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        span,
    }
}

pub fn arg(value: Node) -> Arg {
    Arg::new(value)
}

pub fn expr_stmt(expr: Node) -> Stmt {
    let span = expr.span();
    Stmt::Expression {
        expr,
        docblock: None,
        span,
    }
}

pub fn doc_stmt(expr: Node, doc_text: &str, doc_at: u32) -> Stmt {
    let span = sp(doc_at, expr.span().end);
    Stmt::Expression {
        expr,
        docblock: Some(Docblock {
            text: doc_text.to_string(),
            span: sp(doc_at, doc_at + doc_text.len() as u32),
        }),
        span,
    }
}

pub fn param(name: &str, hint: Option<&str>, nullable: bool, docblock_type: Option<&str>, at: u32) -> Param {
    Param {
        name: name.to_string(),
        hint: hint.map(str::to_string),
        nullable,
        docblock_type: docblock_type.map(str::to_string),
        span: sp(at, at + name.len() as u32),
    }
}

pub fn func_stmt(name: &str, params: Vec<Param>, body: Vec<Stmt>, body_span: Span, span: Span) -> Stmt {
    Stmt::Function(FunctionDecl {
        name: name.to_string(),
        params,
        body,
        body_span,
        docblock: None,
        span,
    })
}

pub fn class_stmt(name: &str, methods: Vec<FunctionDecl>, body_span: Span, span: Span) -> Stmt {
    Stmt::Class(ClassDecl {
        name: name.to_string(),
        methods,
        body_span,
        span,
    })
}

pub fn method_decl(name: &str, params: Vec<Param>, body: Vec<Stmt>, body_span: Span, span: Span) -> FunctionDecl {
    FunctionDecl {
        name: name.to_string(),
        params,
        body,
        body_span,
        docblock: None,
        span,
    }
}

pub fn document(path: &str, program: Vec<Stmt>) -> Document {
    Document::new(path, "", program)
}
