//! The expression/statement AST the core operates on.
//!
//! The parser itself is an external collaborator: a host parses a PHP
//! document with whatever frontend it likes and lowers the result into
//! these owned, span-carrying nodes. The node set is deliberately closed —
//! type deduction is an exhaustive match over it, and anything a frontend
//! cannot express simply is not deducible.
//!
//! Offsets are byte offsets into the document text, matching the positions
//! used everywhere else in the core.

use crate::types::Span;

/// An argument at a call site. Only the value expression matters to type
/// deduction (named/spread arguments do not change a call's type).
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub value: Node,
}

impl Arg {
    pub fn new(value: Node) -> Self {
        Self { value }
    }
}

/// A declared parameter of a function, method or closure.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// The parameter name including the `$` prefix (e.g. "$text").
    pub name: String,
    /// Declared type hint as written (e.g. "string", "Foo"), without any
    /// nullable `?` marker.
    pub hint: Option<String>,
    /// Whether the hint is nullable (`?Foo` or a default of `null`).
    pub nullable: bool,
    /// The `@param` docblock type for this parameter, when the enclosing
    /// function's docblock has one.
    pub docblock_type: Option<String>,
    pub span: Span,
}

/// A deducible AST node.
///
/// Mostly expressions, plus the three statement-level constructs that
/// establish a variable's type and therefore need a deduction rule of
/// their own: `foreach` value bindings, `catch` clauses, and parameter
/// declarations.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An integer literal.
    IntLiteral { span: Span },
    /// A float literal.
    FloatLiteral { span: Span },
    /// A string literal. The value is kept for meta override lookups.
    StringLiteral { value: String, span: Span },
    /// An array literal (`[...]` or `array(...)`).
    ArrayLiteral { span: Span },
    /// A variable, name including the `$` prefix.
    Variable { name: String, span: Span },
    /// An assignment expression `lhs = rhs`.
    Assignment {
        lhs: Box<Node>,
        rhs: Box<Node>,
        span: Span,
    },
    /// A `new <class>(...)` expression.
    New { class: Box<Node>, span: Span },
    /// A `clone <expr>` expression.
    Clone { subject: Box<Node>, span: Span },
    /// A ternary. `then` is `None` for the Elvis form `cond ?: else`.
    Ternary {
        condition: Box<Node>,
        then: Option<Box<Node>>,
        r#else: Box<Node>,
        span: Span,
    },
    /// An array index access `base[...]`. The index expression does not
    /// influence the deduced type and is not carried.
    ArrayIndex { base: Box<Node>, span: Span },
    /// A bare name in class-name position (`Foo`, `\A\Foo`, `self`,
    /// `static`, `parent`).
    Name { value: String, span: Span },
    /// A class constant fetch `<class>::NAME`.
    ClassConstFetch {
        class: Box<Node>,
        name: String,
        span: Span,
    },
    /// An instance property fetch `<object>->name`.
    PropertyFetch {
        object: Box<Node>,
        name: String,
        span: Span,
    },
    /// A static property fetch `<class>::$name`. The stored name has no
    /// `$` prefix, matching how properties are indexed.
    StaticPropertyFetch {
        class: Box<Node>,
        name: String,
        span: Span,
    },
    /// An instance method call `<object>->name(...)`.
    MethodCall {
        object: Box<Node>,
        name: String,
        args: Vec<Arg>,
        span: Span,
    },
    /// A static method call `<class>::name(...)`.
    StaticCall {
        class: Box<Node>,
        name: String,
        args: Vec<Arg>,
        span: Span,
    },
    /// A global (or namespaced) function call `name(...)`.
    FunctionCall {
        name: String,
        args: Vec<Arg>,
        span: Span,
    },
    /// An anonymous function. Parameters and body are carried for the
    /// scanner's scope handling; deduction never introspects them.
    Closure {
        params: Vec<Param>,
        body: Vec<Stmt>,
        body_span: Span,
        span: Span,
    },
    /// An arrow function `fn (...) => expr`.
    ArrowFn { params: Vec<Param>, span: Span },
    /// A `foreach (<iterable> as [$key =>] $value)` binding. Deduces the
    /// type of the *value* variable.
    Foreach {
        iterable: Box<Node>,
        key_var: Option<String>,
        value_var: String,
        span: Span,
    },
    /// A `catch (A | B $e)` clause binding. Class names are as written.
    Catch {
        class_names: Vec<String>,
        variable: String,
        span: Span,
    },
    /// A parameter declaration, when it is what establishes a variable's
    /// type at the queried position.
    Param(Box<Param>),
}

impl Node {
    /// The source span of this node.
    pub fn span(&self) -> Span {
        match self {
            Node::IntLiteral { span }
            | Node::FloatLiteral { span }
            | Node::StringLiteral { span, .. }
            | Node::ArrayLiteral { span }
            | Node::Variable { span, .. }
            | Node::Assignment { span, .. }
            | Node::New { span, .. }
            | Node::Clone { span, .. }
            | Node::Ternary { span, .. }
            | Node::ArrayIndex { span, .. }
            | Node::Name { span, .. }
            | Node::ClassConstFetch { span, .. }
            | Node::PropertyFetch { span, .. }
            | Node::StaticPropertyFetch { span, .. }
            | Node::MethodCall { span, .. }
            | Node::StaticCall { span, .. }
            | Node::FunctionCall { span, .. }
            | Node::Closure { span, .. }
            | Node::ArrowFn { span, .. }
            | Node::Foreach { span, .. }
            | Node::Catch { span, .. } => *span,
            Node::Param(param) => param.span,
        }
    }

    /// The textual form of the expression, the way the scanner keys its
    /// expression map: `$var`, `$this->prop`, `Foo::$prop`. Returns `None`
    /// for nodes that are not trackable lvalue-ish expressions.
    pub fn expression_text(&self) -> Option<String> {
        match self {
            Node::Variable { name, .. } => Some(name.clone()),
            Node::PropertyFetch { object, name, .. } => {
                Some(format!("{}->{}", object.expression_text()?, name))
            }
            Node::StaticPropertyFetch { class, name, .. } => match class.as_ref() {
                Node::Name { value, .. } => Some(format!("{}::${}", value, name)),
                _ => None,
            },
            _ => None,
        }
    }
}

/// A documentation comment attached to a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Docblock {
    /// The comment text including delimiters.
    pub text: String,
    pub span: Span,
}

/// A `catch` clause with its body.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// The binding itself, always a [`Node::Catch`].
    pub node: Node,
    pub body: Vec<Stmt>,
}

/// A named function or method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    /// Span of the body block (between the braces).
    pub body_span: Span,
    pub docblock: Option<Docblock>,
    pub span: Span,
}

/// A classlike declaration. Only what position-based lookups need: the
/// name as written and the member methods with their bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// The declared name as written in source (resolved on demand through
    /// the Name Resolver).
    pub name: String,
    pub methods: Vec<FunctionDecl>,
    /// Span of the class body (between the braces).
    pub body_span: Span,
    pub span: Span,
}

/// A statement, as lowered by the external parser.
///
/// Only the control structures the Local Type Scanner cares about are
/// modelled; everything else lowers to `Expression` or is omitted by the
/// frontend.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// An expression statement, with the docblock immediately preceding it
    /// (carrier of inline `@var` overrides).
    Expression {
        expr: Node,
        docblock: Option<Docblock>,
        span: Span,
    },
    /// A `{ ... }` grouping with no control-flow meaning.
    Block { body: Vec<Stmt>, span: Span },
    /// An `if` with the else-if chain folded into `else_body` by the
    /// frontend.
    If {
        condition: Node,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
        span: Span,
    },
    /// A `foreach` loop. `binding` is always a [`Node::Foreach`].
    Foreach {
        binding: Node,
        body: Vec<Stmt>,
        span: Span,
    },
    /// A `try`/`catch`/`finally`.
    Try {
        body: Vec<Stmt>,
        catches: Vec<CatchClause>,
        finally: Vec<Stmt>,
        span: Span,
    },
    /// A `return`, carried so frontends can lower complete bodies.
    Return { expr: Option<Node>, span: Span },
    /// A named function declaration.
    Function(FunctionDecl),
    /// A classlike declaration.
    Class(ClassDecl),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expression { span, .. }
            | Stmt::Block { span, .. }
            | Stmt::If { span, .. }
            | Stmt::Foreach { span, .. }
            | Stmt::Try { span, .. }
            | Stmt::Return { span, .. } => *span,
            Stmt::Function(func) => func.span,
            Stmt::Class(class) => class.span,
        }
    }
}

/// A parsed source document: its path, raw text, and lowered program.
///
/// The text is kept alongside the AST because name resolution and docblock
/// matching are position-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: String,
    pub text: String,
    pub program: Vec<Stmt>,
}

impl Document {
    pub fn new(path: impl Into<String>, text: impl Into<String>, program: Vec<Stmt>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            program,
        }
    }
}
