use crate::Span;

use super::{
    ast::{Expr, Pattern, Stmt},
    expressions::{Argument, BinaryOp},
    types::{Convention, TypeExpr},
};

/// Block Statement
/// The suite of a compound statement.
///
/// `inline` is set for bodies written on the header line (`if a: b`).
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub inline: bool,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> std::slice::Iter<'_, Stmt> {
        self.body.iter()
    }
}

// IMPORTS

/// A dotted module path with an optional `as` alias.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportName {
    pub path: Vec<String>,
    pub alias: Option<String>,
    pub span: Span,
}

/// `import a.b as c, d`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    pub names: Vec<ImportName>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportTargets {
    Wildcard,
    Names(Vec<ImportName>),
}

/// `from ..a.b import c as d`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportFromStmt {
    /// Number of leading dots of a relative import.
    pub level: u32,
    pub module: Vec<String>,
    pub targets: ImportTargets,
    pub span: Span,
}

// SIMPLE STATEMENTS

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

/// `[var] target [: Type] = value`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStmt {
    pub is_var: bool,
    pub target: Pattern,
    pub annotation: Option<TypeExpr>,
    pub value: Expr,
    pub span: Span,
}

/// `target op= value`
#[derive(Debug, Clone, PartialEq)]
pub struct AugAssignmentStmt {
    pub target: Pattern,
    pub operator: BinaryOp,
    pub value: Expr,
    pub span: Span,
}

/// Declaration without an initialiser: `var name [: Type]` or `name: Type`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub is_var: bool,
    pub name: String,
    pub annotation: Option<TypeExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AliasValue {
    Type(TypeExpr),
    Expr(Expr),
}

/// `alias Name[params] = value`
#[derive(Debug, Clone, PartialEq)]
pub struct AliasStmt {
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub value: AliasValue,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RaiseStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassStmt {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakStmt {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinueStmt {
    pub span: Span,
}

// DEFINITIONS

/// Function parameter.
///
/// A variadic parameter (`*name`) never carries a convention or a default.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub convention: Option<Convention>,
    pub name: String,
    pub annotation: Option<TypeExpr>,
    pub default: Option<Expr>,
    pub variadic: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedTypeParameter {
    pub name: String,
    pub annotation: Option<TypeExpr>,
    pub default: Option<Expr>,
    pub span: Span,
}

/// Entry of a `[...]` list after a definition name.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeParameter {
    Named(NamedTypeParameter),
    /// The `//` marker; parameters before it are inferred only.
    InferOnly(Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FnKeyword {
    Def,
    Fn,
}

/// Function Declaration Statement
#[derive(Debug, Clone, PartialEq)]
pub struct FnDeclStmt {
    pub keyword: FnKeyword,
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    pub return_convention: Option<Convention>,
    pub return_type: Option<TypeExpr>,
    pub raises: bool,
    pub body: BlockStmt,
    pub span: Span,
}

/// Struct Declaration Statement
#[derive(Debug, Clone, PartialEq)]
pub struct StructDeclStmt {
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    /// Traits listed in parentheses after the name.
    pub bases: Vec<TypeExpr>,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitDeclStmt {
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub bases: Vec<TypeExpr>,
    pub body: BlockStmt,
    pub span: Span,
}

/// `@dotted.name` or `@dotted.name(arguments)` on its own line.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    pub path: Vec<String>,
    pub arguments: Option<Vec<Argument>>,
    pub span: Span,
}

/// Decorated Statement
/// One or more decorators followed by exactly one function, struct or trait.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoratedStmt {
    pub decorators: Vec<Decorator>,
    pub definition: Box<Stmt>,
    pub span: Span,
}

// CONTROL FLOW

#[derive(Debug, Clone, PartialEq)]
pub struct ElifClause {
    pub condition: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub body: BlockStmt,
    pub elif_clauses: Vec<ElifClause>,
    pub else_body: Option<BlockStmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub target: Pattern,
    pub iterable: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

/// Error Statement
/// Marks source skipped while recovering from a syntax error.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorStmt {
    pub span: Span,
}
