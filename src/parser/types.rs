//! Type parsing implementation.
//!
//! This module handles type annotations and the `[...]` parameter lists
//! written after definition names. It supports:
//!
//! - Named types (`Int`, `None`)
//! - Qualified types (`DType.float32`)
//! - Generic types with positional and keyword arguments (`SIMD[DType.uint8, 4]`)
//!
//! Similar to expression parsing, it uses NUD/LED handlers with
//! binding powers for parsing complex type expressions.

use std::collections::HashMap;

use crate::{
    ast::{
        statements::{NamedTypeParameter, TypeParameter},
        types::{GenericType, KeywordTypeArgument, QualifiedType, SymbolType, TypeArgument, TypeExpr},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{expr::parse_expr, lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeExpr, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser, TypeExpr, BindingPower) -> Result<TypeExpr, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Initializes the type parsing lookup tables.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser to initialize
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::NoneKw, parse_symbol_type);
    parser.type_led(TokenKind::Dot, BindingPower::Postfix, parse_qualified_type);
    parser.type_led(TokenKind::OpenBracket, BindingPower::Postfix, parse_generic_type);
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let token = parser.advance().clone();
    match token.kind {
        TokenKind::Identifier | TokenKind::NoneKw => Ok(TypeExpr::Symbol(SymbolType {
            name: token.value,
            span: token.span,
        })),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.to_string(),
            },
            token.span,
        )),
    }
}

pub fn parse_qualified_type(
    parser: &mut Parser,
    left: TypeExpr,
    _bp: BindingPower,
) -> Result<TypeExpr, Error> {
    parser.advance();
    let member = parser.expect(TokenKind::Identifier)?;

    Ok(TypeExpr::Qualified(QualifiedType {
        span: left.get_span().to(member.span),
        base: Box::new(left),
        member: member.value,
    }))
}

/// One generic argument: a type, a compile-time value, or `name=value`.
fn parse_type_argument(parser: &mut Parser) -> Result<TypeArgument, Error> {
    if parser.current_token_kind() == TokenKind::Identifier
        && parser.peek_kind(1) == TokenKind::Assignment
    {
        let name = parser.advance().clone();
        parser.advance();
        let value = parse_expr(parser, BindingPower::Conditional)?;

        return Ok(TypeArgument::Keyword(KeywordTypeArgument {
            span: name.span.to(value.get_span()),
            name: name.value,
            value: Box::new(TypeArgument::from(value)),
        }));
    }

    Ok(TypeArgument::from(parse_expr(
        parser,
        BindingPower::Conditional,
    )?))
}

pub fn parse_generic_type(
    parser: &mut Parser,
    left: TypeExpr,
    _bp: BindingPower,
) -> Result<TypeExpr, Error> {
    parser.advance();
    if parser.current_token_kind() == TokenKind::CloseBracket {
        return Err(parser.unexpected_detailed("expected at least one type argument"));
    }

    let mut arguments = vec![];
    loop {
        arguments.push(parse_type_argument(parser)?);
        if !parser.eat(TokenKind::Comma) || parser.current_token_kind() == TokenKind::CloseBracket
        {
            break;
        }
    }
    let close = parser.expect(TokenKind::CloseBracket)?;

    Ok(TypeExpr::Generic(GenericType {
        span: left.get_span().to(close.span),
        base: Box::new(left),
        arguments,
    }))
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<TypeExpr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_type_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected_detailed("expected a type")),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let binding_power = parser
            .get_type_bp_lookup()
            .get(&token_kind)
            .copied()
            .unwrap_or(BindingPower::Default);
        if binding_power <= bp {
            break;
        }

        let led = match parser.get_type_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected()),
        };
        left = led(parser, left, binding_power)?;
    }

    Ok(left)
}

/// Parses `[T: Bound = default, //, ...]` after a definition name.
///
/// `[` in this position always opens a parameter list, never a subscript.
pub fn parse_type_parameters(parser: &mut Parser) -> Result<Vec<TypeParameter>, Error> {
    let open = parser.expect(TokenKind::OpenBracket)?;
    if parser.current_token_kind() == TokenKind::CloseBracket {
        let close = parser.advance().clone();
        return Err(Error::new(
            ErrorImpl::EmptyTypeParameterList,
            open.span.to(close.span),
        ));
    }

    let mut parameters = vec![];
    loop {
        if parser.current_token_kind() == TokenKind::SlashSlash {
            let marker = parser.advance().span;
            parameters.push(TypeParameter::InferOnly(marker));
        } else {
            let error = parser.unexpected_detailed("expected a parameter name");
            let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

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

            parameters.push(TypeParameter::Named(NamedTypeParameter {
                name: name.value,
                annotation,
                default,
                span: Span::new(name.span.start.0, parser.previous_end()),
            }));
        }

        if !parser.eat(TokenKind::Comma) || parser.current_token_kind() == TokenKind::CloseBracket
        {
            break;
        }
    }
    parser.expect(TokenKind::CloseBracket)?;

    Ok(parameters)
}
