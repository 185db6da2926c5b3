//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Function, struct and trait definitions
//! - Operator precedence and chaining
//! - Generic calls versus subscripts
//! - Suites, layout and error recovery

use std::sync::{atomic::AtomicBool, Arc};

use pretty_assertions::assert_eq;

use crate::{
    ast::{
        ast::{Expr, Pattern, Stmt},
        expressions::{Argument, BinaryOp, ComparisonOp, UnaryOp},
        statements::{AliasValue, FnKeyword, ImportTargets, TypeParameter},
        types::{Convention, TypeArgument, TypeExpr},
    },
    config::{ConventionSet, ParserConfig},
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    Span,
};

use super::parser::{parse, ParseOutput};

fn parse_with(source: &str, config: &ParserConfig) -> ParseOutput {
    let scan = tokenize(source, config);
    assert!(scan.errors.is_empty(), "scan errors: {:?}", scan.errors);
    parse(scan.tokens, config)
}

fn parse_ok(source: &str) -> Vec<Stmt> {
    let output = parse_with(source, &ParserConfig::default());
    assert!(output.errors.is_empty(), "errors: {:?}", output.errors);
    output.body
}

fn parse_errors(source: &str) -> Vec<Error> {
    parse_with(source, &ParserConfig::default()).errors
}

fn parse_expression(source: &str) -> Expr {
    match parse_ok(source).remove(0) {
        Stmt::Expression(stmt) => stmt.expression,
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

fn symbol_name(expr: &Expr) -> &str {
    match expr {
        Expr::Symbol(symbol) => &symbol.value,
        other => panic!("expected a symbol, got {:?}", other),
    }
}

#[test]
fn test_parse_function_declaration() {
    let body = parse_ok("fn add(x: Int, y: Int) -> Int:\n    return x + y\n");
    assert_eq!(body.len(), 1);

    let Stmt::FnDecl(decl) = &body[0] else {
        panic!("expected a function, got {:?}", body[0]);
    };
    assert_eq!(decl.keyword, FnKeyword::Fn);
    assert_eq!(decl.name, "add");
    assert_eq!(decl.span, Span::new(0, 47));
    assert_eq!(
        decl.parameters.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        vec!["x", "y"]
    );
    assert!(matches!(&decl.return_type, Some(TypeExpr::Symbol(ty)) if ty.name == "Int"));
    assert!(!decl.raises);
    assert!(!decl.body.inline);

    let Stmt::Return(ret) = &decl.body.body[0] else {
        panic!("expected a return statement");
    };
    assert_eq!(ret.span, Span::new(35, 47));
    assert!(matches!(
        &ret.value,
        Some(Expr::Binary(binary)) if binary.operator == BinaryOp::Add
    ));
}

#[test]
fn test_parse_if_else_with_two_space_indent() {
    let body = parse_ok("if a:\n  b = 1\nelse:\n  b = 2\n");
    assert_eq!(body.len(), 1);

    let Stmt::If(stmt) = &body[0] else {
        panic!("expected an if statement");
    };
    assert_eq!(symbol_name(&stmt.condition), "a");
    assert_eq!(stmt.body.body.len(), 1);
    assert!(stmt.elif_clauses.is_empty());
    assert_eq!(stmt.else_body.as_ref().map(|block| block.body.len()), Some(1));
}

#[test]
fn test_parse_elif_chain() {
    let body = parse_ok("if a:\n    pass\nelif b:\n    pass\nelif c: pass\nelse: pass\n");
    let Stmt::If(stmt) = &body[0] else {
        panic!("expected an if statement");
    };
    assert_eq!(stmt.elif_clauses.len(), 2);
    assert!(stmt.elif_clauses[1].body.inline);
    assert!(stmt.else_body.is_some());
}

#[test]
fn test_comparison_chain_is_one_node() {
    let Expr::Comparison(comparison) = parse_expression("a < b < c\n") else {
        panic!("expected a comparison");
    };
    assert_eq!(comparison.operands.len(), 3);
    assert_eq!(
        comparison.operators,
        vec![ComparisonOp::Less, ComparisonOp::Less]
    );
}

#[test]
fn test_two_token_comparisons() {
    let Expr::Comparison(comparison) = parse_expression("a is not b not in c\n") else {
        panic!("expected a comparison");
    };
    assert_eq!(
        comparison.operators,
        vec![ComparisonOp::IsNot, ComparisonOp::NotIn]
    );
}

#[test]
fn test_power_is_right_associative() {
    let Expr::Binary(outer) = parse_expression("a ** b ** c\n") else {
        panic!("expected a binary expression");
    };
    assert_eq!(outer.operator, BinaryOp::Power);
    assert_eq!(symbol_name(&outer.left), "a");
    assert!(matches!(
        outer.right.as_ref(),
        Expr::Binary(inner) if inner.operator == BinaryOp::Power
    ));
}

#[test]
fn test_subtraction_is_left_associative() {
    let Expr::Binary(outer) = parse_expression("a - b - c\n") else {
        panic!("expected a binary expression");
    };
    assert_eq!(outer.operator, BinaryOp::Subtract);
    assert_eq!(symbol_name(&outer.right), "c");
    assert!(matches!(
        outer.left.as_ref(),
        Expr::Binary(inner) if inner.operator == BinaryOp::Subtract
    ));
}

#[test]
fn test_operator_precedence() {
    let Expr::Binary(or) = parse_expression("a or b and c\n") else {
        panic!("expected `or`");
    };
    assert_eq!(or.operator, BinaryOp::Or);
    assert!(matches!(or.right.as_ref(), Expr::Binary(and) if and.operator == BinaryOp::And));

    let Expr::Prefix(not) = parse_expression("not a == b\n") else {
        panic!("expected `not`");
    };
    assert_eq!(not.operator, UnaryOp::Not);
    assert!(matches!(not.operand.as_ref(), Expr::Comparison(_)));

    let Expr::Prefix(negation) = parse_expression("-x ** 2\n") else {
        panic!("expected a negation");
    };
    assert_eq!(negation.operator, UnaryOp::Minus);
    assert!(matches!(
        negation.operand.as_ref(),
        Expr::Binary(power) if power.operator == BinaryOp::Power
    ));

    let Expr::Binary(bit_or) = parse_expression("a | b & c ^ d\n") else {
        panic!("expected `|`");
    };
    assert_eq!(bit_or.operator, BinaryOp::BitOr);
    let Expr::Binary(and) = bit_or.right.as_ref() else {
        panic!("expected `&`");
    };
    assert_eq!(and.operator, BinaryOp::BitAnd);
    assert!(matches!(and.right.as_ref(), Expr::Binary(xor) if xor.operator == BinaryOp::BitXor));

    let Expr::Binary(and) = parse_expression("a & b ^ c\n") else {
        panic!("expected `&`");
    };
    assert_eq!(and.operator, BinaryOp::BitAnd);
    assert!(matches!(and.left.as_ref(), Expr::Symbol(_)));
    assert!(matches!(and.right.as_ref(), Expr::Binary(xor) if xor.operator == BinaryOp::BitXor));

    let Expr::Binary(sum) = parse_expression("1 + 2 * 3 << 1\n") else {
        panic!("expected a shift");
    };
    assert_eq!(sum.operator, BinaryOp::ShiftLeft);
}

#[test]
fn test_generic_call_with_transfer() {
    let Expr::Transfer(transfer) = parse_expression("f[T](x)^\n") else {
        panic!("expected a transfer");
    };
    let Expr::Call(call) = transfer.value.as_ref() else {
        panic!("expected a call");
    };
    assert_eq!(symbol_name(&call.callee), "f");
    assert_eq!(call.type_arguments.as_ref().map(Vec::len), Some(1));
    assert_eq!(call.arguments.len(), 1);
    assert_eq!(transfer.span, Span::new(0, 8));
}

#[test]
fn test_caret_transfer_binds_tighter_than_addition() {
    let Expr::Binary(sum) = parse_expression("a + b^\n") else {
        panic!("expected an addition");
    };
    assert_eq!(sum.operator, BinaryOp::Add);
    assert!(matches!(sum.right.as_ref(), Expr::Transfer(_)));

    let Expr::Binary(xor) = parse_expression("a ^ b\n") else {
        panic!("expected xor");
    };
    assert_eq!(xor.operator, BinaryOp::BitXor);
}

#[test]
fn test_subscript_versus_generic_call() {
    let Expr::Subscript(subscript) = parse_expression("a[i, 1:2]\n") else {
        panic!("expected a subscript");
    };
    assert_eq!(subscript.indices.len(), 2);
    assert!(matches!(subscript.indices[1], Expr::Slice(_)));

    let Expr::Call(call) = parse_expression("SIMD[DType.uint8, size=4](0)\n") else {
        panic!("expected a generic call");
    };
    let type_arguments = call.type_arguments.unwrap();
    assert!(matches!(type_arguments[0], Argument::Positional(Expr::Attribute(_))));
    assert!(matches!(&type_arguments[1], Argument::Keyword(keyword) if keyword.name == "size"));

    // A plain call after a subscript of a call result
    let Expr::Subscript(outer) = parse_expression("a.b(c)[d]\n") else {
        panic!("expected a subscript");
    };
    assert!(matches!(outer.object.as_ref(), Expr::Call(call) if call.type_arguments.is_none()));
}

#[test]
fn test_keyword_outside_call_is_error() {
    let errors = parse_errors("x = [a=1]\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get_internal(),
        &ErrorImpl::KeywordArgumentOutsideCall {
            name: String::from("a")
        }
    );
    assert_eq!(errors[0].get_span(), Span::new(5, 6));

    let errors = parse_errors("x[key=1]\n");
    assert!(matches!(
        errors[0].get_internal(),
        ErrorImpl::KeywordArgumentOutsideCall { .. }
    ));
}

#[test]
fn test_keyword_arguments_in_call() {
    let Expr::Call(call) = parse_expression("f(1, end=2)\n") else {
        panic!("expected a call");
    };
    assert!(matches!(call.arguments[0], Argument::Positional(Expr::Integer(_))));
    assert!(matches!(&call.arguments[1], Argument::Keyword(keyword) if keyword.name == "end"));
}

#[test]
fn test_conditional_needs_parentheses_in_call_arguments() {
    assert!(!parse_errors("f(a if b else c)\n").is_empty());
    assert!(!parse_errors("f[a if b else c](x)\n").is_empty());

    let Expr::Call(call) = parse_expression("f((a if b else c))\n") else {
        panic!("expected a call");
    };
    assert!(matches!(
        &call.arguments[0],
        Argument::Positional(Expr::Parenthesized(inner)) if matches!(inner.inner.as_ref(), Expr::Conditional(_))
    ));

    let body = parse_ok("x = a if b else c\n");
    assert!(matches!(&body[0], Stmt::Assignment(assign) if matches!(assign.value, Expr::Conditional(_))));
}

#[test]
fn test_decorator_without_definition() {
    let output = parse_with("@value\nx = 1\n", &ParserConfig::default());
    assert_eq!(output.errors.len(), 1);
    assert_eq!(
        output.errors[0].get_internal(),
        &ErrorImpl::DecoratorWithoutDefinition {
            token: String::from("x")
        }
    );
    assert_eq!(output.body.len(), 2);
    assert!(output.body[0].is_error());
    assert!(matches!(output.body[1], Stmt::Assignment(_)));
}

#[test]
fn test_decorated_struct() {
    let body = parse_ok("@value\n@register_passable(\"trivial\")\nstruct S:\n    var x: Int\n");
    let Stmt::Decorated(decorated) = &body[0] else {
        panic!("expected a decorated definition");
    };
    assert_eq!(decorated.decorators.len(), 2);
    assert_eq!(decorated.decorators[0].path, vec!["value"]);
    assert_eq!(decorated.decorators[0].arguments, None);
    assert_eq!(decorated.decorators[1].span, Span::new(7, 36));
    assert!(matches!(
        decorated.decorators[1].arguments.as_deref(),
        Some([Argument::Positional(Expr::String(_))])
    ));
    assert!(matches!(decorated.definition.as_ref(), Stmt::StructDecl(decl) if decl.name == "S"));

    let body = parse_ok("@compiler.always_inline(\"nodebug\")\nfn f(): pass\n");
    let Stmt::Decorated(decorated) = &body[0] else {
        panic!("expected a decorated definition");
    };
    assert_eq!(decorated.decorators[0].path, vec!["compiler", "always_inline"]);
}

#[test]
fn test_decorator_must_be_dotted_name() {
    for source in [
        "@foo + 1\ndef f(): pass\n",
        "@a[0] if b else c\nfn g(): pass\n",
        "@f(x)(y)\nfn g(): pass\n",
        "@1\nfn g(): pass\n",
    ] {
        let errors = parse_errors(source);
        assert!(!errors.is_empty(), "accepted `{}`", source.trim_end());
    }
}

#[test]
fn test_variadic_parameter_rules() {
    let errors = parse_errors("def f(owned *args): pass\n");
    assert!(matches!(
        errors[0].get_internal(),
        ErrorImpl::InvalidVariadicParameter { .. }
    ));

    let errors = parse_errors("def f(*args = 1): pass\n");
    assert!(matches!(
        errors[0].get_internal(),
        ErrorImpl::InvalidVariadicParameter { .. }
    ));

    let body = parse_ok("def f(*args: Int): pass\n");
    let Stmt::FnDecl(decl) = &body[0] else {
        panic!("expected a function");
    };
    assert!(decl.parameters[0].variadic);
}

#[test]
fn test_parameter_conventions() {
    let body = parse_ok("fn f(mut self, owned x: Int, read: Int) -> ref Int:\n    pass\n");
    let Stmt::FnDecl(decl) = &body[0] else {
        panic!("expected a function");
    };
    assert_eq!(decl.parameters[0].convention, Some(Convention::Mut));
    assert_eq!(decl.parameters[1].convention, Some(Convention::Owned));
    // A convention word followed by `:` is an ordinary name
    assert_eq!(decl.parameters[2].convention, None);
    assert_eq!(decl.parameters[2].name, "read");
    assert_eq!(decl.return_convention, Some(Convention::Ref));
}

#[test]
fn test_convention_sets() {
    let modern = ParserConfig::default().with_conventions(ConventionSet::Modern);
    let errors = parse_with("fn f(inout x: Int): pass\n", &modern).errors;
    assert_eq!(
        errors[0].get_internal(),
        &ErrorImpl::ConventionNotEnabled {
            convention: String::from("inout")
        }
    );

    let legacy = ParserConfig::default().with_conventions(ConventionSet::Legacy);
    assert!(parse_with("fn f(inout x: Int): pass\n", &legacy).errors.is_empty());
    assert!(!parse_with("fn f(read x: Int): pass\n", &legacy).errors.is_empty());
}

#[test]
fn test_type_parameters_and_raises() {
    let body = parse_ok("fn f[T: Intable, //, n: Int = 4](x: T) raises -> Int:\n    return n\n");
    let Stmt::FnDecl(decl) = &body[0] else {
        panic!("expected a function");
    };
    assert_eq!(decl.type_parameters.len(), 3);
    assert!(matches!(decl.type_parameters[1], TypeParameter::InferOnly(_)));
    assert!(matches!(
        &decl.type_parameters[2],
        TypeParameter::Named(named) if named.name == "n" && named.default.is_some()
    ));
    assert!(decl.raises);

    let body = parse_ok("def g() -> None raises:\n    pass\n");
    assert!(matches!(&body[0], Stmt::FnDecl(decl) if decl.raises));
}

#[test]
fn test_empty_type_parameter_list() {
    let errors = parse_errors("fn f[]():\n    pass\n");
    assert_eq!(errors[0].get_internal(), &ErrorImpl::EmptyTypeParameterList);
    assert_eq!(errors[0].get_span(), Span::new(4, 6));
}

#[test]
fn test_struct_with_parameters_and_bases() {
    let body = parse_ok(
        "struct Pair[T: AnyType](Copyable, Movable):\n    var first: T\n    var second: List[T]\n",
    );
    let Stmt::StructDecl(decl) = &body[0] else {
        panic!("expected a struct");
    };
    assert_eq!(decl.type_parameters.len(), 1);
    assert_eq!(decl.bases.len(), 2);
    assert_eq!(decl.body.body.len(), 2);

    let Stmt::VarDecl(second) = &decl.body.body[1] else {
        panic!("expected a field declaration");
    };
    assert!(second.is_var);
    let Some(TypeExpr::Generic(generic)) = &second.annotation else {
        panic!("expected a generic type");
    };
    assert!(matches!(&generic.arguments[0], TypeArgument::Type(TypeExpr::Symbol(ty)) if ty.name == "T"));
}

#[test]
fn test_trait_declaration() {
    let body = parse_ok("trait Shape(Copyable):\n    fn area(self) -> Float64: pass\n");
    assert!(matches!(&body[0], Stmt::TraitDecl(decl) if decl.bases.len() == 1));
}

#[test]
fn test_imports() {
    let body = parse_ok("import math, os.path as p\nfrom ..pkg.mod import (a, b as c,)\nfrom . import *\n");
    assert_eq!(body.len(), 3);

    let Stmt::Import(import) = &body[0] else {
        panic!("expected an import");
    };
    assert_eq!(import.names[1].path, vec!["os", "path"]);
    assert_eq!(import.names[1].alias.as_deref(), Some("p"));

    let Stmt::ImportFrom(from) = &body[1] else {
        panic!("expected a from-import");
    };
    assert_eq!(from.level, 2);
    assert_eq!(from.module, vec!["pkg", "mod"]);
    assert!(matches!(&from.targets, ImportTargets::Names(names) if names.len() == 2));

    assert!(matches!(
        &body[2],
        Stmt::ImportFrom(from) if from.level == 1 && from.module.is_empty() && from.targets == ImportTargets::Wildcard
    ));
}

#[test]
fn test_alias_values() {
    let body = parse_ok("alias N = 4\nalias T = List[Int]\n");
    assert!(matches!(&body[0], Stmt::Alias(alias) if matches!(alias.value, AliasValue::Expr(_))));
    assert!(matches!(
        &body[1],
        Stmt::Alias(alias) if matches!(alias.value, AliasValue::Type(TypeExpr::Generic(_)))
    ));
}

#[test]
fn test_assignments() {
    let body = parse_ok("a, b = b, a\nx.y[0] += 1\nvar z: Int = 3\nw: Float64\n");
    assert!(matches!(
        &body[0],
        Stmt::Assignment(assign) if matches!(assign.target, Pattern::Tuple { .. })
    ));
    assert!(matches!(
        &body[1],
        Stmt::AugAssignment(assign) if assign.operator == BinaryOp::Add && matches!(assign.target, Pattern::Subscript(_))
    ));
    assert!(matches!(&body[2], Stmt::Assignment(assign) if assign.is_var && assign.annotation.is_some()));
    assert!(matches!(&body[3], Stmt::VarDecl(decl) if !decl.is_var && decl.name == "w"));

    let errors = parse_errors("f() = 1\n(a, b) += 1\n");
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|error| error.get_internal() == &ErrorImpl::InvalidAssignmentTarget));
}

#[test]
fn test_for_and_while() {
    let body = parse_ok("for i, x in items:\n    continue\nwhile True:\n    break\n");
    assert!(matches!(&body[0], Stmt::For(stmt) if matches!(stmt.target, Pattern::Tuple { .. })));
    assert!(matches!(&body[1], Stmt::While(_)));
}

#[test]
fn test_inline_suite() {
    let body = parse_ok("if a: b; c\nd\n");
    assert_eq!(body.len(), 2);
    let Stmt::If(stmt) = &body[0] else {
        panic!("expected an if statement");
    };
    assert!(stmt.body.inline);
    assert_eq!(stmt.body.body.len(), 2);

    assert!(!parse_errors("if a: for x in y: pass\n").is_empty());
}

#[test]
fn test_missing_indented_block() {
    let errors = parse_errors("if a:\nb\n");
    assert_eq!(errors[0].get_internal(), &ErrorImpl::ExpectedIndentedBlock);
    assert_eq!(errors[0].get_span(), Span::new(5, 6));
}

#[test]
fn test_recovers_from_multiple_errors() {
    let output = parse_with("x = )\ny = 2\nz = ]\nw = 3\n", &ParserConfig::default());
    assert_eq!(output.errors.len(), 2);
    assert_eq!(output.errors[0].get_position().0, 4);
    assert_eq!(output.body.len(), 4);
    assert!(output.body[0].is_error());
    assert!(matches!(output.body[1], Stmt::Assignment(_)));
    assert!(output.body[2].is_error());
    assert!(matches!(output.body[3], Stmt::Assignment(_)));
}

#[test]
fn test_recovery_skips_block_of_broken_header() {
    let output = parse_with("def f(x) y:\n    x = 1\n    y = 2\nz = 3\n", &ParserConfig::default());
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.body.len(), 2);
    assert!(output.body[0].is_error());
    assert!(matches!(output.body[1], Stmt::Assignment(_)));
}

#[test]
fn test_recovery_inside_block() {
    let output = parse_with("def f():\n    x = )\n    y = 2\nz = 3\n", &ParserConfig::default());
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.body.len(), 2);
    let Stmt::FnDecl(decl) = &output.body[0] else {
        panic!("expected a function");
    };
    assert_eq!(decl.body.body.len(), 2);
    assert!(decl.body.body[0].is_error());
}

#[test]
fn test_unexpected_indent() {
    let output = parse_with("a\n    b\nc\n", &ParserConfig::default());
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.body.len(), 3);
    assert!(output.body[1].is_error());
    assert!(matches!(&output.body[2], Stmt::Expression(stmt) if symbol_name(&stmt.expression) == "c"));
}

#[test]
fn test_cancelled_parse_stops() {
    let flag = Arc::new(AtomicBool::new(true));
    let config = ParserConfig::default().with_cancel_flag(flag);
    let output = parse_with("x = 1\ny = 2\n", &config);
    assert!(output.cancelled);
    assert!(output.body.is_empty());
}

#[test]
fn test_literals() {
    assert!(matches!(parse_expression("0x_ff\n"), Expr::Integer(int) if int.value == Some(255)));
    assert!(matches!(parse_expression("1_000\n"), Expr::Integer(int) if int.value == Some(1000)));
    assert!(matches!(parse_expression("2.5e3\n"), Expr::Float(float) if float.value == 2500.0));
    assert!(matches!(parse_expression("\"a\" 'b'\n"), Expr::String(string) if string.value == "ab"));
    assert!(matches!(parse_expression("{}\n"), Expr::Dict(dict) if dict.entries.is_empty()));
    assert!(matches!(parse_expression("{1: 2, 3: 4}\n"), Expr::Dict(dict) if dict.entries.len() == 2));
    assert!(matches!(parse_expression("{1, 2}\n"), Expr::Set(set) if set.elements.len() == 2));
    assert!(matches!(parse_expression("()\n"), Expr::Tuple(tuple) if tuple.elements.is_empty()));
    assert!(matches!(parse_expression("(a,)\n"), Expr::Tuple(tuple) if tuple.elements.len() == 1));
    assert!(matches!(parse_expression("(a)\n"), Expr::Parenthesized(_)));
    assert!(matches!(parse_expression("[1, 2,]\n"), Expr::List(list) if list.elements.len() == 2));
    assert!(matches!(parse_expression("None\n"), Expr::NoneLiteral(_)));

}

#[test]
fn test_wide_integer_literal_is_kept() {
    let body = parse_ok("x = 18446744073709551616\ny = 0xffff_ffff_ffff_ffff\n");
    let Stmt::Assignment(wide) = &body[0] else {
        panic!("expected an assignment");
    };
    let Expr::Integer(int) = &wide.value else {
        panic!("expected an integer");
    };
    assert_eq!(int.text, "18446744073709551616");
    assert_eq!(int.value, None);

    let Stmt::Assignment(max) = &body[1] else {
        panic!("expected an assignment");
    };
    assert!(matches!(&max.value, Expr::Integer(int) if int.value == Some(u64::MAX)));
}

#[test]
fn test_statement_terminators() {
    let body = parse_ok("a; b\nc;\npass");
    assert_eq!(body.len(), 4);

    let errors = parse_errors("a b\n");
    assert_eq!(
        errors[0].get_internal(),
        &ErrorImpl::UnexpectedToken {
            token: String::from("b")
        }
    );
}
