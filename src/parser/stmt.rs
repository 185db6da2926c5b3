use crate::{
    ast::{
        ast::{Expr, Pattern, Stmt},
        expressions::{BinaryOp, TupleExpr},
        statements::{
            AliasStmt, AliasValue, AssignmentStmt, AugAssignmentStmt, BlockStmt, BreakStmt,
            ContinueStmt, DecoratedStmt, Decorator, ElifClause, ExpressionStmt, FnDeclStmt,
            FnKeyword, ForStmt, IfStmt, ImportFromStmt, ImportName, ImportStmt, ImportTargets,
            Parameter, PassStmt, RaiseStmt, ReturnStmt, StructDeclStmt, TraitDeclStmt,
            TypeParameter, VarDeclStmt, WhileStmt,
        },
        types::{Convention, TypeExpr},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{
        expr::{parse_call_arguments, parse_expr, parse_expr_list},
        lookups::BindingPower,
    },
    Span,
};

use super::{
    parser::Parser,
    recovery::parse_stmt_or_recover,
    types::{parse_type, parse_type_parameters},
};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token_kind = parser.current_token_kind();
    if token_kind == TokenKind::Indent {
        return Err(parser.unexpected_detailed("unexpected indentation"));
    }

    if let Some(handler) = parser.get_stmt_lookup().get(&token_kind).copied() {
        return handler(parser);
    }

    parse_expression_stmt(parser)
}

fn starts_compound_stmt(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Def
            | TokenKind::Fn
            | TokenKind::Struct
            | TokenKind::Trait
            | TokenKind::If
            | TokenKind::For
            | TokenKind::While
            | TokenKind::At
    )
}

/// Consumes the terminator of a simple statement: `;`, `NEWLINE` or end of input.
fn end_simple_stmt(parser: &mut Parser) -> Result<(), Error> {
    match parser.current_token_kind() {
        TokenKind::Semicolon => {
            parser.advance();
            parser.eat(TokenKind::Newline);
            Ok(())
        }
        TokenKind::Newline => {
            parser.advance();
            Ok(())
        }
        TokenKind::EOF => Ok(()),
        _ => Err(parser.unexpected()),
    }
}

fn into_pattern(expr: Expr) -> Result<Pattern, Error> {
    Pattern::try_from(expr).map_err(|span| Error::new(ErrorImpl::InvalidAssignmentTarget, span))
}

fn augmented_operator(kind: TokenKind) -> Option<BinaryOp> {
    let operator = match kind {
        TokenKind::PlusEquals => BinaryOp::Add,
        TokenKind::MinusEquals => BinaryOp::Subtract,
        TokenKind::StarEquals => BinaryOp::Multiply,
        TokenKind::StarStarEquals => BinaryOp::Power,
        TokenKind::SlashEquals => BinaryOp::Divide,
        TokenKind::SlashSlashEquals => BinaryOp::FloorDivide,
        TokenKind::PercentEquals => BinaryOp::Modulo,
        TokenKind::PipeEquals => BinaryOp::BitOr,
        TokenKind::CaretEquals => BinaryOp::BitXor,
        TokenKind::AmpersandEquals => BinaryOp::BitAnd,
        TokenKind::ShiftLeftEquals => BinaryOp::ShiftLeft,
        TokenKind::ShiftRightEquals => BinaryOp::ShiftRight,
        _ => return None,
    };
    Some(operator)
}

/// Expression statements, assignments and `name: Type` declarations.
fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.current_token().span.start.0;
    let first = parse_expr_list(parser)?;

    let stmt = match parser.current_token_kind() {
        TokenKind::Colon => {
            parser.advance();
            let annotation = parse_type(parser, BindingPower::Default)?;

            if parser.eat(TokenKind::Assignment) {
                let value = parse_expr_list(parser)?;
                Stmt::Assignment(AssignmentStmt {
                    is_var: false,
                    target: into_pattern(first)?,
                    annotation: Some(annotation),
                    value,
                    span: Span::new(start, parser.previous_end()),
                })
            } else {
                let name = match first {
                    Expr::Symbol(symbol) => symbol.value,
                    other => {
                        return Err(Error::new(
                            ErrorImpl::InvalidAssignmentTarget,
                            other.get_span(),
                        ))
                    }
                };
                Stmt::VarDecl(VarDeclStmt {
                    is_var: false,
                    name,
                    annotation: Some(annotation),
                    span: Span::new(start, parser.previous_end()),
                })
            }
        }
        TokenKind::Assignment => {
            parser.advance();
            let target = into_pattern(first)?;
            let value = parse_expr_list(parser)?;
            Stmt::Assignment(AssignmentStmt {
                is_var: false,
                target,
                annotation: None,
                value,
                span: Span::new(start, parser.previous_end()),
            })
        }
        kind if kind.is_augmented_assignment() => {
            let operator_token = parser.advance().clone();
            let operator = augmented_operator(operator_token.kind).ok_or_else(|| {
                Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: operator_token.to_string(),
                    },
                    operator_token.span,
                )
            })?;

            let target = match into_pattern(first)? {
                Pattern::Tuple { span, .. } | Pattern::List { span, .. } => {
                    return Err(Error::new(ErrorImpl::InvalidAssignmentTarget, span))
                }
                target => target,
            };
            let value = parse_expr_list(parser)?;
            Stmt::AugAssignment(AugAssignmentStmt {
                target,
                operator,
                value,
                span: Span::new(start, parser.previous_end()),
            })
        }
        _ => Stmt::Expression(ExpressionStmt {
            span: first.get_span(),
            expression: first,
        }),
    };

    end_simple_stmt(parser)?;
    Ok(stmt)
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.0;

    if parser.current_token_kind() != TokenKind::Identifier
        && parser.current_token_kind() != TokenKind::OpenParen
    {
        return Err(parser.unexpected_detailed("expected identifier during variable declaration"));
    }
    let target = parse_expr_list(parser)?;

    let annotation = if parser.eat(TokenKind::Colon) {
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };

    let stmt = if parser.eat(TokenKind::Assignment) {
        let value = parse_expr_list(parser)?;
        Stmt::Assignment(AssignmentStmt {
            is_var: true,
            target: into_pattern(target)?,
            annotation,
            value,
            span: Span::new(start, parser.previous_end()),
        })
    } else {
        let name = match target {
            Expr::Symbol(symbol) => symbol.value,
            other => {
                return Err(Error::new(
                    ErrorImpl::InvalidAssignmentTarget,
                    other.get_span(),
                ))
            }
        };
        Stmt::VarDecl(VarDeclStmt {
            is_var: true,
            name,
            annotation,
            span: Span::new(start, parser.previous_end()),
        })
    };

    end_simple_stmt(parser)?;
    Ok(stmt)
}

pub fn parse_alias_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.0;

    let error = parser.unexpected_detailed("expected alias name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let type_parameters = if parser.current_token_kind() == TokenKind::OpenBracket {
        parse_type_parameters(parser)?
    } else {
        vec![]
    };

    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    let value = match TypeExpr::try_from(&value) {
        Ok(ty) => AliasValue::Type(ty),
        Err(()) => AliasValue::Expr(value),
    };

    let span = Span::new(start, parser.previous_end());
    end_simple_stmt(parser)?;

    Ok(Stmt::Alias(AliasStmt {
        name,
        type_parameters,
        value,
        span,
    }))
}

/// Value of `return`/`raise`, absent when the statement ends right away.
fn parse_optional_value(parser: &mut Parser) -> Result<Option<Expr>, Error> {
    match parser.current_token_kind() {
        TokenKind::Newline | TokenKind::Semicolon | TokenKind::EOF => Ok(None),
        _ => Ok(Some(parse_expr_list(parser)?)),
    }
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.0;
    let value = parse_optional_value(parser)?;
    let span = Span::new(start, parser.previous_end());
    end_simple_stmt(parser)?;

    Ok(Stmt::Return(ReturnStmt { value, span }))
}

pub fn parse_raise_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.0;
    let value = parse_optional_value(parser)?;
    let span = Span::new(start, parser.previous_end());
    end_simple_stmt(parser)?;

    Ok(Stmt::Raise(RaiseStmt { value, span }))
}

/// `pass`, `break` and `continue`.
pub fn parse_keyword_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();
    let span = token.span;

    let stmt = match token.kind {
        TokenKind::Pass => Stmt::Pass(PassStmt { span }),
        TokenKind::Break => Stmt::Break(BreakStmt { span }),
        TokenKind::Continue => Stmt::Continue(ContinueStmt { span }),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: token.to_string(),
                },
                span,
            ))
        }
    };

    end_simple_stmt(parser)?;
    Ok(stmt)
}

fn parse_dotted_name(parser: &mut Parser, expected: &str) -> Result<Vec<String>, Error> {
    let error = parser.unexpected_detailed(expected);
    let mut path = vec![parser.expect_error(TokenKind::Identifier, Some(error))?.value];

    while parser.current_token_kind() == TokenKind::Dot
        && parser.peek_kind(1) == TokenKind::Identifier
    {
        parser.advance();
        path.push(parser.advance().value.clone());
    }

    Ok(path)
}

fn parse_import_alias(parser: &mut Parser) -> Result<Option<String>, Error> {
    if parser.eat(TokenKind::As) {
        Ok(Some(parser.expect(TokenKind::Identifier)?.value))
    } else {
        Ok(None)
    }
}

pub fn parse_import_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.0;

    let mut names = vec![];
    loop {
        let name_start = parser.current_token().span.start.0;
        let path = parse_dotted_name(parser, "expected module name")?;
        let alias = parse_import_alias(parser)?;
        names.push(ImportName {
            path,
            alias,
            span: Span::new(name_start, parser.previous_end()),
        });

        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    let span = Span::new(start, parser.previous_end());
    end_simple_stmt(parser)?;

    Ok(Stmt::Import(ImportStmt { names, span }))
}

pub fn parse_import_from_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.0;

    let mut level = 0;
    while parser.eat(TokenKind::Dot) {
        level += 1;
    }

    let module = if parser.current_token_kind() == TokenKind::Identifier || level == 0 {
        parse_dotted_name(parser, "expected module name")?
    } else {
        vec![]
    };

    parser.expect(TokenKind::Import)?;

    let targets = if parser.eat(TokenKind::Star) {
        ImportTargets::Wildcard
    } else {
        let parenthesized = parser.eat(TokenKind::OpenParen);

        let mut names = vec![];
        loop {
            let name = parser.expect(TokenKind::Identifier)?;
            let alias = parse_import_alias(parser)?;
            names.push(ImportName {
                path: vec![name.value],
                alias,
                span: Span::new(name.span.start.0, parser.previous_end()),
            });

            if !parser.eat(TokenKind::Comma)
                || (parenthesized && parser.current_token_kind() == TokenKind::CloseParen)
            {
                break;
            }
        }

        if parenthesized {
            parser.expect(TokenKind::CloseParen)?;
        }
        ImportTargets::Names(names)
    };

    let span = Span::new(start, parser.previous_end());
    end_simple_stmt(parser)?;

    Ok(Stmt::ImportFrom(ImportFromStmt {
        level,
        module,
        targets,
        span,
    }))
}

/// Parses the `:` and body of a compound statement.
///
/// The body is either an indented block on the following lines or simple
/// statements on the header line.
pub fn parse_suite(parser: &mut Parser) -> Result<BlockStmt, Error> {
    parser.expect(TokenKind::Colon)?;

    if parser.current_token_kind() != TokenKind::Newline {
        return parse_inline_suite(parser);
    }

    let newline = parser.advance().clone();
    if parser.current_token_kind() != TokenKind::Indent {
        return Err(Error::new(ErrorImpl::ExpectedIndentedBlock, newline.span));
    }
    let indent = parser.advance().clone();

    let mut body = vec![];
    while !matches!(
        parser.current_token_kind(),
        TokenKind::Dedent | TokenKind::EOF
    ) {
        if parser.check_cancelled() {
            break;
        }

        if parser.current_token_kind() == TokenKind::Newline {
            parser.advance();
            continue;
        }

        body.push(parse_stmt_or_recover(parser));
    }

    if !parser.check_cancelled() {
        parser.eat(TokenKind::Dedent);
    }

    let start = body
        .first()
        .map(|stmt| stmt.get_span().start.0)
        .unwrap_or(indent.span.end.0);
    let end = body
        .last()
        .map(|stmt| stmt.get_span().end.0)
        .unwrap_or(start);

    Ok(BlockStmt {
        body,
        inline: false,
        span: Span::new(start, end),
    })
}

fn parse_inline_suite(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.current_token().span.start.0;

    let mut body = vec![];
    loop {
        if starts_compound_stmt(parser.current_token_kind()) {
            return Err(parser.unexpected_detailed("compound statements need an indented block"));
        }

        body.push(parse_stmt(parser)?);

        if parser.previous_token_kind() == Some(TokenKind::Newline) || !parser.has_tokens() {
            break;
        }
    }

    let end = body
        .last()
        .map(|stmt| stmt.get_span().end.0)
        .unwrap_or(start);

    Ok(BlockStmt {
        body,
        inline: true,
        span: Span::new(start, end),
    })
}

fn parse_raises(parser: &mut Parser) -> bool {
    let token = parser.current_token();
    if token.kind == TokenKind::Identifier && token.value == "raises" {
        parser.advance();
        return true;
    }
    false
}

/// An argument convention word, recognised only when a name (or `*`) follows it.
fn parse_convention(parser: &mut Parser) -> Result<Option<Convention>, Error> {
    let token = parser.current_token();
    if token.kind != TokenKind::Identifier {
        return Ok(None);
    }
    let Some(convention) = Convention::from_word(&token.value) else {
        return Ok(None);
    };
    if !matches!(
        parser.peek_kind(1),
        TokenKind::Identifier | TokenKind::Star
    ) {
        return Ok(None);
    }

    let span = token.span;
    if !parser.get_config().conventions.accepts(convention) {
        return Err(Error::new(
            ErrorImpl::ConventionNotEnabled {
                convention: convention.to_string(),
            },
            span,
        ));
    }

    parser.advance();
    Ok(Some(convention))
}

fn parse_parameter(parser: &mut Parser) -> Result<Parameter, Error> {
    let start = parser.current_token().span.start.0;
    let convention = parse_convention(parser)?;

    if parser.eat(TokenKind::Star) {
        let name = parser.expect(TokenKind::Identifier)?;
        if convention.is_some() {
            return Err(Error::new(
                ErrorImpl::InvalidVariadicParameter {
                    reason: String::from("cannot take an argument convention"),
                },
                Span::new(start, name.span.end.0),
            ));
        }

        let annotation = if parser.eat(TokenKind::Colon) {
            Some(parse_type(parser, BindingPower::Default)?)
        } else {
            None
        };

        if parser.current_token_kind() == TokenKind::Assignment {
            return Err(Error::new(
                ErrorImpl::InvalidVariadicParameter {
                    reason: String::from("cannot have a default value"),
                },
                parser.current_token().span,
            ));
        }

        return Ok(Parameter {
            convention: None,
            name: name.value,
            annotation,
            default: None,
            variadic: true,
            span: Span::new(start, parser.previous_end()),
        });
    }

    let error = parser.unexpected_detailed("expected a parameter name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let annotation = if parser.eat(TokenKind::Colon) {
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };
    let default = if parser.eat(TokenKind::Assignment) {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    Ok(Parameter {
        convention,
        name,
        annotation,
        default,
        variadic: false,
        span: Span::new(start, parser.previous_end()),
    })
}

fn parse_parameters(parser: &mut Parser) -> Result<Vec<Parameter>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        parameters.push(parse_parameter(parser)?);
        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(parameters)
}

fn parse_optional_type_parameters(parser: &mut Parser) -> Result<Vec<TypeParameter>, Error> {
    if parser.current_token_kind() == TokenKind::OpenBracket {
        parse_type_parameters(parser)
    } else {
        Ok(vec![])
    }
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let keyword_token = parser.advance().clone();
    let keyword = if keyword_token.kind == TokenKind::Def {
        FnKeyword::Def
    } else {
        FnKeyword::Fn
    };

    let error = parser.unexpected_detailed("expected function name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let type_parameters = parse_optional_type_parameters(parser)?;
    let parameters = parse_parameters(parser)?;

    // `raises` may be written on either side of the return type
    let mut raises = parse_raises(parser);
    let (return_convention, return_type) = if parser.eat(TokenKind::Arrow) {
        let convention = parse_convention(parser)?;
        (convention, Some(parse_type(parser, BindingPower::Default)?))
    } else {
        (None, None)
    };
    raises |= parse_raises(parser);

    let body = parse_suite(parser)?;

    Ok(Stmt::FnDecl(FnDeclStmt {
        span: Span::new(keyword_token.span.start.0, body.span.end.0),
        keyword,
        name,
        type_parameters,
        parameters,
        return_convention,
        return_type,
        raises,
        body,
    }))
}

/// Shared header of `struct` and `trait`: name, parameters and bases.
fn parse_type_decl_header(
    parser: &mut Parser,
) -> Result<(String, Vec<TypeParameter>, Vec<TypeExpr>), Error> {
    let error = parser.unexpected_detailed("expected type name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let type_parameters = parse_optional_type_parameters(parser)?;

    let mut bases = vec![];
    if parser.eat(TokenKind::OpenParen) {
        while parser.current_token_kind() != TokenKind::CloseParen {
            bases.push(parse_type(parser, BindingPower::Default)?);
            if !parser.eat(TokenKind::Comma) {
                break;
            }
        }
        parser.expect(TokenKind::CloseParen)?;
    }

    Ok((name, type_parameters, bases))
}

pub fn parse_struct_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.0;
    let (name, type_parameters, bases) = parse_type_decl_header(parser)?;
    let body = parse_suite(parser)?;

    Ok(Stmt::StructDecl(StructDeclStmt {
        span: Span::new(start, body.span.end.0),
        name,
        type_parameters,
        bases,
        body,
    }))
}

pub fn parse_trait_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.0;
    let (name, type_parameters, bases) = parse_type_decl_header(parser)?;
    let body = parse_suite(parser)?;

    Ok(Stmt::TraitDecl(TraitDeclStmt {
        span: Span::new(start, body.span.end.0),
        name,
        type_parameters,
        bases,
        body,
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.0;
    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_suite(parser)?;
    let mut end = body.span.end.0;

    let mut elif_clauses = vec![];
    while parser.current_token_kind() == TokenKind::Elif {
        let elif_start = parser.advance().span.start.0;
        let condition = parse_expr(parser, BindingPower::Default)?;
        let body = parse_suite(parser)?;
        end = body.span.end.0;

        elif_clauses.push(ElifClause {
            condition,
            span: Span::new(elif_start, end),
            body,
        });
    }

    let else_body = if parser.eat(TokenKind::Else) {
        let else_body = parse_suite(parser)?;
        end = else_body.span.end.0;
        Some(else_body)
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        condition,
        body,
        elif_clauses,
        else_body,
        span: Span::new(start, end),
    }))
}

/// Loop targets stop before `in`, so they are parsed above comparison power.
fn parse_for_target(parser: &mut Parser) -> Result<Pattern, Error> {
    let first = parse_expr(parser, BindingPower::Comparison)?;
    if parser.current_token_kind() != TokenKind::Comma {
        return into_pattern(first);
    }

    let start = first.get_span().start.0;
    let mut elements = vec![first];
    while parser.eat(TokenKind::Comma) {
        if parser.current_token_kind() == TokenKind::In {
            break;
        }
        elements.push(parse_expr(parser, BindingPower::Comparison)?);
    }

    into_pattern(Expr::Tuple(TupleExpr {
        elements,
        span: Span::new(start, parser.previous_end()),
    }))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.0;
    let target = parse_for_target(parser)?;
    parser.expect(TokenKind::In)?;
    let iterable = parse_expr_list(parser)?;
    let body = parse_suite(parser)?;

    Ok(Stmt::For(ForStmt {
        span: Span::new(start, body.span.end.0),
        target,
        iterable,
        body,
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.0;
    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_suite(parser)?;

    Ok(Stmt::While(WhileStmt {
        span: Span::new(start, body.span.end.0),
        condition,
        body,
    }))
}

pub fn parse_decorated_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.current_token().span.start.0;

    let mut decorators = vec![];
    while parser.current_token_kind() == TokenKind::At {
        let at = parser.advance().span.start.0;
        let path = parse_dotted_name(parser, "expected decorator name")?;
        let arguments = match parser.current_token_kind() {
            TokenKind::OpenParen => Some(parse_call_arguments(parser)?),
            _ => None,
        };
        let span = Span::new(at, parser.previous_end());
        parser.expect(TokenKind::Newline)?;

        decorators.push(Decorator {
            path,
            arguments,
            span,
        });
    }

    let definition = match parser.current_token_kind() {
        TokenKind::Def | TokenKind::Fn => parse_fn_decl_stmt(parser)?,
        TokenKind::Struct => parse_struct_decl_stmt(parser)?,
        TokenKind::Trait => parse_trait_decl_stmt(parser)?,
        _ => {
            let token = parser.current_token();
            return Err(Error::new(
                ErrorImpl::DecoratorWithoutDefinition {
                    token: token.to_string(),
                },
                token.span,
            ));
        }
    };

    Ok(Stmt::Decorated(DecoratedStmt {
        span: Span::new(start, definition.get_span().end.0),
        decorators,
        definition: Box::new(definition),
    }))
}
