use std::sync::Arc;

use crate::Span;

use super::{
    expressions::{
        AttributeExpr, BinaryExpr, BooleanExpr, CallExpr, ComparisonExpr, ConditionalExpr,
        DictExpr, FloatExpr, IntegerExpr, ListExpr, NoneExpr, ParenthesizedExpr, PrefixExpr,
        SetExpr, SliceExpr, StringExpr, SubscriptExpr, SymbolExpr, TransferExpr, TupleExpr,
    },
    statements::{
        AliasStmt, AssignmentStmt, AugAssignmentStmt, BreakStmt, ContinueStmt, DecoratedStmt,
        ErrorStmt, ExpressionStmt, FnDeclStmt, ForStmt, IfStmt, ImportFromStmt, ImportStmt,
        PassStmt, RaiseStmt, ReturnStmt, StructDeclStmt, TraitDeclStmt, VarDeclStmt, WhileStmt,
    },
};

/// Root of a parsed document.
///
/// Top-level statements are reference counted so an incremental re-parse can
/// hand unchanged statements to the new tree without copying them.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub body: Vec<Arc<Stmt>>,
    pub span: Span,
}

impl Module {
    pub fn iter(&self) -> impl Iterator<Item = &Stmt> {
        self.body.iter().map(|stmt| stmt.as_ref())
    }
}

/// Statement Types
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Import(ImportStmt),
    ImportFrom(ImportFromStmt),
    Expression(ExpressionStmt),
    Assignment(AssignmentStmt),
    AugAssignment(AugAssignmentStmt),
    VarDecl(VarDeclStmt),
    Alias(AliasStmt),
    Return(ReturnStmt),
    Raise(RaiseStmt),
    Pass(PassStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    FnDecl(FnDeclStmt),
    StructDecl(StructDeclStmt),
    TraitDecl(TraitDeclStmt),
    If(IfStmt),
    For(ForStmt),
    While(WhileStmt),
    Decorated(DecoratedStmt),
    Error(ErrorStmt),
}

impl Stmt {
    pub fn get_span(&self) -> Span {
        match self {
            Stmt::Import(stmt) => stmt.span,
            Stmt::ImportFrom(stmt) => stmt.span,
            Stmt::Expression(stmt) => stmt.span,
            Stmt::Assignment(stmt) => stmt.span,
            Stmt::AugAssignment(stmt) => stmt.span,
            Stmt::VarDecl(stmt) => stmt.span,
            Stmt::Alias(stmt) => stmt.span,
            Stmt::Return(stmt) => stmt.span,
            Stmt::Raise(stmt) => stmt.span,
            Stmt::Pass(stmt) => stmt.span,
            Stmt::Break(stmt) => stmt.span,
            Stmt::Continue(stmt) => stmt.span,
            Stmt::FnDecl(stmt) => stmt.span,
            Stmt::StructDecl(stmt) => stmt.span,
            Stmt::TraitDecl(stmt) => stmt.span,
            Stmt::If(stmt) => stmt.span,
            Stmt::For(stmt) => stmt.span,
            Stmt::While(stmt) => stmt.span,
            Stmt::Decorated(stmt) => stmt.span,
            Stmt::Error(stmt) => stmt.span,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Stmt::Error(_))
    }
}

/// Expression Types
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Integer(IntegerExpr),
    Float(FloatExpr),
    String(StringExpr),
    Boolean(BooleanExpr),
    NoneLiteral(NoneExpr),
    Symbol(SymbolExpr),
    List(ListExpr),
    Tuple(TupleExpr),
    Dict(DictExpr),
    Set(SetExpr),
    Parenthesized(ParenthesizedExpr),
    Call(CallExpr),
    Attribute(AttributeExpr),
    Subscript(SubscriptExpr),
    Slice(SliceExpr),
    Transfer(TransferExpr),
    Prefix(PrefixExpr),
    Binary(BinaryExpr),
    Comparison(ComparisonExpr),
    Conditional(ConditionalExpr),
}

impl Expr {
    pub fn get_span(&self) -> Span {
        match self {
            Expr::Integer(expr) => expr.span,
            Expr::Float(expr) => expr.span,
            Expr::String(expr) => expr.span,
            Expr::Boolean(expr) => expr.span,
            Expr::NoneLiteral(expr) => expr.span,
            Expr::Symbol(expr) => expr.span,
            Expr::List(expr) => expr.span,
            Expr::Tuple(expr) => expr.span,
            Expr::Dict(expr) => expr.span,
            Expr::Set(expr) => expr.span,
            Expr::Parenthesized(expr) => expr.span,
            Expr::Call(expr) => expr.span,
            Expr::Attribute(expr) => expr.span,
            Expr::Subscript(expr) => expr.span,
            Expr::Slice(expr) => expr.span,
            Expr::Transfer(expr) => expr.span,
            Expr::Prefix(expr) => expr.span,
            Expr::Binary(expr) => expr.span,
            Expr::Comparison(expr) => expr.span,
            Expr::Conditional(expr) => expr.span,
        }
    }
}

/// Target of an assignment or `for` loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Name(SymbolExpr),
    Tuple { elements: Vec<Pattern>, span: Span },
    List { elements: Vec<Pattern>, span: Span },
    Attribute(AttributeExpr),
    Subscript(SubscriptExpr),
}

impl Pattern {
    pub fn get_span(&self) -> Span {
        match self {
            Pattern::Name(symbol) => symbol.span,
            Pattern::Tuple { span, .. } | Pattern::List { span, .. } => *span,
            Pattern::Attribute(attribute) => attribute.span,
            Pattern::Subscript(subscript) => subscript.span,
        }
    }
}

/// Only names, attribute and subscript expressions and nested tuples or
/// lists of them can be assigned to. Returns the offending expression's span.
impl TryFrom<Expr> for Pattern {
    type Error = Span;

    fn try_from(expr: Expr) -> Result<Self, Self::Error> {
        match expr {
            Expr::Symbol(symbol) => Ok(Pattern::Name(symbol)),
            Expr::Attribute(attribute) => Ok(Pattern::Attribute(attribute)),
            Expr::Subscript(subscript) => Ok(Pattern::Subscript(subscript)),
            Expr::Parenthesized(parenthesized) => Pattern::try_from(*parenthesized.inner),
            Expr::Tuple(tuple) => Ok(Pattern::Tuple {
                elements: tuple
                    .elements
                    .into_iter()
                    .map(Pattern::try_from)
                    .collect::<Result<_, _>>()?,
                span: tuple.span,
            }),
            Expr::List(list) => Ok(Pattern::List {
                elements: list
                    .elements
                    .into_iter()
                    .map(Pattern::try_from)
                    .collect::<Result<_, _>>()?,
                span: list.span,
            }),
            other => Err(other.get_span()),
        }
    }
}
