//! Mutable walk over every span in a tree.
//!
//! Used to move reused statements to their new offsets after an edit.

use crate::Span;

use super::{
    ast::{Expr, Pattern, Stmt},
    expressions::Argument,
    statements::{AliasValue, BlockStmt, ImportName, ImportTargets, Parameter, TypeParameter},
    types::{TypeArgument, TypeExpr},
};

pub fn walk_stmt_spans(stmt: &mut Stmt, f: &mut impl FnMut(&mut Span)) {
    match stmt {
        Stmt::Import(import) => {
            f(&mut import.span);
            for name in &mut import.names {
                walk_import_name_spans(name, f);
            }
        }
        Stmt::ImportFrom(import) => {
            f(&mut import.span);
            if let ImportTargets::Names(names) = &mut import.targets {
                for name in names {
                    walk_import_name_spans(name, f);
                }
            }
        }
        Stmt::Expression(expression) => {
            f(&mut expression.span);
            walk_expr_spans(&mut expression.expression, f);
        }
        Stmt::Assignment(assignment) => {
            f(&mut assignment.span);
            walk_pattern_spans(&mut assignment.target, f);
            if let Some(annotation) = &mut assignment.annotation {
                walk_type_spans(annotation, f);
            }
            walk_expr_spans(&mut assignment.value, f);
        }
        Stmt::AugAssignment(assignment) => {
            f(&mut assignment.span);
            walk_pattern_spans(&mut assignment.target, f);
            walk_expr_spans(&mut assignment.value, f);
        }
        Stmt::VarDecl(decl) => {
            f(&mut decl.span);
            if let Some(annotation) = &mut decl.annotation {
                walk_type_spans(annotation, f);
            }
        }
        Stmt::Alias(alias) => {
            f(&mut alias.span);
            for parameter in &mut alias.type_parameters {
                walk_type_parameter_spans(parameter, f);
            }
            match &mut alias.value {
                AliasValue::Type(ty) => walk_type_spans(ty, f),
                AliasValue::Expr(expr) => walk_expr_spans(expr, f),
            }
        }
        Stmt::Return(ret) => {
            f(&mut ret.span);
            if let Some(value) = &mut ret.value {
                walk_expr_spans(value, f);
            }
        }
        Stmt::Raise(raise) => {
            f(&mut raise.span);
            if let Some(value) = &mut raise.value {
                walk_expr_spans(value, f);
            }
        }
        Stmt::Pass(pass) => f(&mut pass.span),
        Stmt::Break(brk) => f(&mut brk.span),
        Stmt::Continue(cont) => f(&mut cont.span),
        Stmt::FnDecl(decl) => {
            f(&mut decl.span);
            for parameter in &mut decl.type_parameters {
                walk_type_parameter_spans(parameter, f);
            }
            for parameter in &mut decl.parameters {
                walk_parameter_spans(parameter, f);
            }
            if let Some(return_type) = &mut decl.return_type {
                walk_type_spans(return_type, f);
            }
            walk_block_spans(&mut decl.body, f);
        }
        Stmt::StructDecl(decl) => {
            f(&mut decl.span);
            for parameter in &mut decl.type_parameters {
                walk_type_parameter_spans(parameter, f);
            }
            for base in &mut decl.bases {
                walk_type_spans(base, f);
            }
            walk_block_spans(&mut decl.body, f);
        }
        Stmt::TraitDecl(decl) => {
            f(&mut decl.span);
            for parameter in &mut decl.type_parameters {
                walk_type_parameter_spans(parameter, f);
            }
            for base in &mut decl.bases {
                walk_type_spans(base, f);
            }
            walk_block_spans(&mut decl.body, f);
        }
        Stmt::If(stmt) => {
            f(&mut stmt.span);
            walk_expr_spans(&mut stmt.condition, f);
            walk_block_spans(&mut stmt.body, f);
            for clause in &mut stmt.elif_clauses {
                f(&mut clause.span);
                walk_expr_spans(&mut clause.condition, f);
                walk_block_spans(&mut clause.body, f);
            }
            if let Some(else_body) = &mut stmt.else_body {
                walk_block_spans(else_body, f);
            }
        }
        Stmt::For(stmt) => {
            f(&mut stmt.span);
            walk_pattern_spans(&mut stmt.target, f);
            walk_expr_spans(&mut stmt.iterable, f);
            walk_block_spans(&mut stmt.body, f);
        }
        Stmt::While(stmt) => {
            f(&mut stmt.span);
            walk_expr_spans(&mut stmt.condition, f);
            walk_block_spans(&mut stmt.body, f);
        }
        Stmt::Decorated(decorated) => {
            f(&mut decorated.span);
            for decorator in &mut decorated.decorators {
                f(&mut decorator.span);
                for argument in decorator.arguments.iter_mut().flatten() {
                    walk_argument_spans(argument, f);
                }
            }
            walk_stmt_spans(&mut decorated.definition, f);
        }
        Stmt::Error(error) => f(&mut error.span),
    }
}

pub fn walk_block_spans(block: &mut BlockStmt, f: &mut impl FnMut(&mut Span)) {
    f(&mut block.span);
    for stmt in &mut block.body {
        walk_stmt_spans(stmt, f);
    }
}

fn walk_import_name_spans(name: &mut ImportName, f: &mut impl FnMut(&mut Span)) {
    f(&mut name.span);
}

fn walk_parameter_spans(parameter: &mut Parameter, f: &mut impl FnMut(&mut Span)) {
    f(&mut parameter.span);
    if let Some(annotation) = &mut parameter.annotation {
        walk_type_spans(annotation, f);
    }
    if let Some(default) = &mut parameter.default {
        walk_expr_spans(default, f);
    }
}

fn walk_type_parameter_spans(parameter: &mut TypeParameter, f: &mut impl FnMut(&mut Span)) {
    match parameter {
        TypeParameter::Named(named) => {
            f(&mut named.span);
            if let Some(annotation) = &mut named.annotation {
                walk_type_spans(annotation, f);
            }
            if let Some(default) = &mut named.default {
                walk_expr_spans(default, f);
            }
        }
        TypeParameter::InferOnly(span) => f(span),
    }
}

pub fn walk_pattern_spans(pattern: &mut Pattern, f: &mut impl FnMut(&mut Span)) {
    match pattern {
        Pattern::Name(symbol) => f(&mut symbol.span),
        Pattern::Tuple { elements, span } | Pattern::List { elements, span } => {
            f(span);
            for element in elements {
                walk_pattern_spans(element, f);
            }
        }
        Pattern::Attribute(attribute) => {
            f(&mut attribute.span);
            walk_expr_spans(&mut attribute.object, f);
        }
        Pattern::Subscript(subscript) => {
            f(&mut subscript.span);
            walk_expr_spans(&mut subscript.object, f);
            for index in &mut subscript.indices {
                walk_expr_spans(index, f);
            }
        }
    }
}

pub fn walk_type_spans(ty: &mut TypeExpr, f: &mut impl FnMut(&mut Span)) {
    match ty {
        TypeExpr::Symbol(symbol) => f(&mut symbol.span),
        TypeExpr::Qualified(qualified) => {
            f(&mut qualified.span);
            walk_type_spans(&mut qualified.base, f);
        }
        TypeExpr::Generic(generic) => {
            f(&mut generic.span);
            walk_type_spans(&mut generic.base, f);
            for argument in &mut generic.arguments {
                walk_type_argument_spans(argument, f);
            }
        }
    }
}

fn walk_type_argument_spans(argument: &mut TypeArgument, f: &mut impl FnMut(&mut Span)) {
    match argument {
        TypeArgument::Type(ty) => walk_type_spans(ty, f),
        TypeArgument::Expr(expr) => walk_expr_spans(expr, f),
        TypeArgument::Keyword(keyword) => {
            f(&mut keyword.span);
            walk_type_argument_spans(&mut keyword.value, f);
        }
    }
}

fn walk_argument_spans(argument: &mut Argument, f: &mut impl FnMut(&mut Span)) {
    match argument {
        Argument::Positional(expr) => walk_expr_spans(expr, f),
        Argument::Keyword(keyword) => {
            f(&mut keyword.span);
            walk_expr_spans(&mut keyword.value, f);
        }
    }
}

pub fn walk_expr_spans(expr: &mut Expr, f: &mut impl FnMut(&mut Span)) {
    match expr {
        Expr::Integer(integer) => f(&mut integer.span),
        Expr::Float(float) => f(&mut float.span),
        Expr::String(string) => f(&mut string.span),
        Expr::Boolean(boolean) => f(&mut boolean.span),
        Expr::NoneLiteral(none) => f(&mut none.span),
        Expr::Symbol(symbol) => f(&mut symbol.span),
        Expr::List(list) => {
            f(&mut list.span);
            for element in &mut list.elements {
                walk_expr_spans(element, f);
            }
        }
        Expr::Tuple(tuple) => {
            f(&mut tuple.span);
            for element in &mut tuple.elements {
                walk_expr_spans(element, f);
            }
        }
        Expr::Set(set) => {
            f(&mut set.span);
            for element in &mut set.elements {
                walk_expr_spans(element, f);
            }
        }
        Expr::Dict(dict) => {
            f(&mut dict.span);
            for (key, value) in &mut dict.entries {
                walk_expr_spans(key, f);
                walk_expr_spans(value, f);
            }
        }
        Expr::Parenthesized(parenthesized) => {
            f(&mut parenthesized.span);
            walk_expr_spans(&mut parenthesized.inner, f);
        }
        Expr::Call(call) => {
            f(&mut call.span);
            walk_expr_spans(&mut call.callee, f);
            if let Some(type_arguments) = &mut call.type_arguments {
                for argument in type_arguments {
                    walk_argument_spans(argument, f);
                }
            }
            for argument in &mut call.arguments {
                walk_argument_spans(argument, f);
            }
        }
        Expr::Attribute(attribute) => {
            f(&mut attribute.span);
            walk_expr_spans(&mut attribute.object, f);
        }
        Expr::Subscript(subscript) => {
            f(&mut subscript.span);
            walk_expr_spans(&mut subscript.object, f);
            for index in &mut subscript.indices {
                walk_expr_spans(index, f);
            }
        }
        Expr::Slice(slice) => {
            f(&mut slice.span);
            for bound in [&mut slice.lower, &mut slice.upper, &mut slice.step]
                .into_iter()
                .flatten()
            {
                walk_expr_spans(bound, f);
            }
        }
        Expr::Transfer(transfer) => {
            f(&mut transfer.span);
            walk_expr_spans(&mut transfer.value, f);
        }
        Expr::Prefix(prefix) => {
            f(&mut prefix.span);
            walk_expr_spans(&mut prefix.operand, f);
        }
        Expr::Binary(binary) => {
            f(&mut binary.span);
            walk_expr_spans(&mut binary.left, f);
            walk_expr_spans(&mut binary.right, f);
        }
        Expr::Comparison(comparison) => {
            f(&mut comparison.span);
            for operand in &mut comparison.operands {
                walk_expr_spans(operand, f);
            }
        }
        Expr::Conditional(conditional) => {
            f(&mut conditional.span);
            walk_expr_spans(&mut conditional.then_value, f);
            walk_expr_spans(&mut conditional.condition, f);
            walk_expr_spans(&mut conditional.else_value, f);
        }
    }
}

/// Moves every span in `stmt` by `delta` bytes.
pub fn shift_stmt(stmt: &mut Stmt, delta: i64) {
    walk_stmt_spans(stmt, &mut |span: &mut Span| span.shift(delta));
}
