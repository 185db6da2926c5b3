//! Expression parsing.
//!
//! Precedence climbing over the binding powers in `lookups.rs`. Postfix
//! forms (`.name`, `(args)`, `[items]`, trailing `^`) are LED handlers with
//! the tightest binding power, so they chain directly onto the preceding
//! operand and never onto an enclosing binary expression.
//!
//! `[` after an arbitrary expression is resolved here, after its items have
//! been read: when the closing `]` is immediately followed by `(` the items
//! are the type arguments of a generic call (`f[T](x)`), otherwise the
//! brackets are a subscript (`a[i]`). `[` directly after a definition name
//! never reaches this module; see `types::parse_type_parameters`.

use crate::{
    ast::{
        ast::Expr,
        expressions::{
            Argument, AttributeExpr, BinaryExpr, BinaryOp, BooleanExpr, CallExpr, ComparisonExpr,
            ComparisonOp, ConditionalExpr, DictExpr, FloatExpr, IntegerExpr, KeywordArgument,
            ListExpr, NoneExpr, ParenthesizedExpr, PrefixExpr, SetExpr, SliceExpr, StringExpr,
            SubscriptExpr, SymbolExpr, TransferExpr, TupleExpr, UnaryOp,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected()),
    };

    let mut left = nud(parser)?;

    // While the current token binds tighter than `bp`, keep extending lhs
    while parser.current_binding_power() > bp {
        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected()),
        };

        let binding_power = parser.current_binding_power();
        left = led(parser, left, binding_power)?;
    }

    Ok(left)
}

/// Parses `a, b, c` as a bare tuple, or a single expression when there is no comma.
pub fn parse_expr_list(parser: &mut Parser) -> Result<Expr, Error> {
    let first = parse_expr(parser, BindingPower::Default)?;
    if parser.current_token_kind() != TokenKind::Comma {
        return Ok(first);
    }

    let start = first.get_span();
    let mut elements = vec![first];
    while parser.eat(TokenKind::Comma) {
        if !parser.current_token_kind().starts_operand() {
            break;
        }
        elements.push(parse_expr(parser, BindingPower::Default)?);
    }

    Ok(Expr::Tuple(TupleExpr {
        elements,
        span: Span::new(start.start.0, parser.previous_end()),
    }))
}

fn parse_integer(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|ch| *ch != '_').collect();
    let (radix, body) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        _ => (10, digits.as_str()),
    };

    u64::from_str_radix(body, radix).ok()
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();
    let span = token.span;

    match token.kind {
        TokenKind::Integer => Ok(Expr::Integer(IntegerExpr {
            value: parse_integer(&token.value),
            text: token.value,
            span,
        })),
        TokenKind::Float => match token.value.replace('_', "").parse::<f64>() {
            Ok(value) => Ok(Expr::Float(FloatExpr { value, span })),
            Err(_) => Err(Error::new(
                ErrorImpl::NumberParseError { token: token.value },
                span,
            )),
        },
        TokenKind::String => {
            let mut value = StringExpr::unescape(&token.value);
            let mut span = span;

            // Adjacent literals form one string
            while parser.current_token_kind() == TokenKind::String {
                let next = parser.advance().clone();
                value.push_str(&StringExpr::unescape(&next.value));
                span = span.to(next.span);
            }

            Ok(Expr::String(StringExpr { value, span }))
        }
        TokenKind::Identifier => Ok(Expr::Symbol(SymbolExpr {
            value: token.value,
            span,
        })),
        TokenKind::True | TokenKind::False => Ok(Expr::Boolean(BooleanExpr {
            value: token.kind == TokenKind::True,
            span,
        })),
        TokenKind::NoneKw => Ok(Expr::NoneLiteral(NoneExpr { span })),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.to_string(),
            },
            span,
        )),
    }
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOp> {
    let operator = match kind {
        TokenKind::Or => BinaryOp::Or,
        TokenKind::And => BinaryOp::And,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Ampersand => BinaryOp::BitAnd,
        TokenKind::ShiftLeft => BinaryOp::ShiftLeft,
        TokenKind::ShiftRight => BinaryOp::ShiftRight,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Dash => BinaryOp::Subtract,
        TokenKind::Star => BinaryOp::Multiply,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::SlashSlash => BinaryOp::FloorDivide,
        TokenKind::Percent => BinaryOp::Modulo,
        TokenKind::StarStar => BinaryOp::Power,
        _ => return None,
    };
    Some(operator)
}

fn make_binary(left: Expr, operator: BinaryOp, right: Expr) -> Expr {
    Expr::Binary(BinaryExpr {
        span: left.get_span().to(right.get_span()),
        left: Box::new(left),
        operator,
        right: Box::new(right),
    })
}

/// Left-associative binary operators: the right operand stops at the same power.
pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = binary_operator(operator_token.kind).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.to_string(),
            },
            operator_token.span,
        )
    })?;

    let right = parse_expr(parser, bp)?;

    Ok(make_binary(left, operator, right))
}

/// `**` is right-associative and its right operand may carry a prefix operator.
pub fn parse_power_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    let right = parse_expr(parser, BindingPower::Unary)?;

    Ok(make_binary(left, BinaryOp::Power, right))
}

/// `^` as postfix ownership transfer or as binary xor.
pub fn parse_caret_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    if bp != BindingPower::Postfix {
        return parse_binary_expr(parser, left, bp);
    }

    let caret = parser.advance().clone();
    Ok(Expr::Transfer(TransferExpr {
        span: left.get_span().to(caret.span),
        value: Box::new(left),
    }))
}

/// Consumes one comparison operator, including the two-token `is not` and `not in`.
fn take_comparison_operator(parser: &mut Parser) -> Option<ComparisonOp> {
    let operator = match parser.current_token_kind() {
        TokenKind::Equals => ComparisonOp::Equal,
        TokenKind::NotEquals => ComparisonOp::NotEqual,
        TokenKind::Less => ComparisonOp::Less,
        TokenKind::LessEquals => ComparisonOp::LessEqual,
        TokenKind::Greater => ComparisonOp::Greater,
        TokenKind::GreaterEquals => ComparisonOp::GreaterEqual,
        TokenKind::In => ComparisonOp::In,
        TokenKind::Is => {
            parser.advance();
            return Some(if parser.eat(TokenKind::Not) {
                ComparisonOp::IsNot
            } else {
                ComparisonOp::Is
            });
        }
        TokenKind::Not if parser.peek_kind(1) == TokenKind::In => {
            parser.advance();
            ComparisonOp::NotIn
        }
        _ => return None,
    };

    parser.advance();
    Some(operator)
}

/// Folds a whole comparison chain into one node.
pub fn parse_comparison_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let start = left.get_span();
    let mut operands = vec![left];
    let mut operators = vec![];

    while let Some(operator) = take_comparison_operator(parser) {
        operators.push(operator);
        operands.push(parse_expr(parser, BindingPower::Comparison)?);
    }

    let end = operands.last().map(Expr::get_span).unwrap_or(start);
    Ok(Expr::Comparison(ComparisonExpr {
        operands,
        operators,
        span: start.to(end),
    }))
}

/// `then_value if condition else else_value`
pub fn parse_conditional_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    let condition = parse_expr(parser, BindingPower::Conditional)?;
    parser.expect(TokenKind::Else)?;
    let else_value = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::Conditional(ConditionalExpr {
        span: left.get_span().to(else_value.get_span()),
        then_value: Box::new(left),
        condition: Box::new(condition),
        else_value: Box::new(else_value),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::Dash => UnaryOp::Minus,
        TokenKind::Plus => UnaryOp::Plus,
        _ => UnaryOp::Invert,
    };
    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Prefix(PrefixExpr {
        span: operator_token.span.to(operand.get_span()),
        operator,
        operand: Box::new(operand),
    }))
}

pub fn parse_not_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operand = parse_expr(parser, BindingPower::Not)?;

    Ok(Expr::Prefix(PrefixExpr {
        span: operator_token.span.to(operand.get_span()),
        operator: UnaryOp::Not,
        operand: Box::new(operand),
    }))
}

pub fn parse_attribute_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();

    let error = parser.unexpected_detailed("expected an attribute name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(Expr::Attribute(AttributeExpr {
        span: left.get_span().to(name.span),
        object: Box::new(left),
        attribute: name.value,
    }))
}

/// One call argument: `expr` or `name=expr`.
fn parse_argument(parser: &mut Parser, bp: BindingPower) -> Result<Argument, Error> {
    if parser.current_token_kind() == TokenKind::Identifier
        && parser.peek_kind(1) == TokenKind::Assignment
    {
        let name = parser.advance().clone();
        parser.advance();
        let value = parse_expr(parser, bp)?;

        return Ok(Argument::Keyword(KeywordArgument {
            span: name.span.to(value.get_span()),
            name: name.value,
            value,
        }));
    }

    Ok(Argument::Positional(parse_expr(parser, bp)?))
}

/// `(args)`; a conditional expression must be parenthesized here.
pub fn parse_call_arguments(parser: &mut Parser) -> Result<Vec<Argument>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_argument(parser, BindingPower::Conditional)?);
        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(arguments)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let arguments = parse_call_arguments(parser)?;

    Ok(Expr::Call(CallExpr {
        span: Span::new(left.get_span().start.0, parser.previous_end()),
        callee: Box::new(left),
        type_arguments: None,
        arguments,
    }))
}

fn parse_slice_bound(parser: &mut Parser) -> Result<Option<Box<Expr>>, Error> {
    match parser.current_token_kind() {
        TokenKind::Colon | TokenKind::Comma | TokenKind::CloseBracket => Ok(None),
        _ => Ok(Some(Box::new(parse_expr(parser, BindingPower::Default)?))),
    }
}

/// One entry between `[` and `]`: an expression, a slice or `name=expr`.
fn parse_bracket_item(parser: &mut Parser) -> Result<Argument, Error> {
    if parser.current_token_kind() == TokenKind::Identifier
        && parser.peek_kind(1) == TokenKind::Assignment
    {
        return parse_argument(parser, BindingPower::Default);
    }

    let start = parser.current_token().span.start.0;
    let lower = if parser.current_token_kind() == TokenKind::Colon {
        None
    } else {
        let expr = parse_expr(parser, BindingPower::Default)?;
        if parser.current_token_kind() != TokenKind::Colon {
            return Ok(Argument::Positional(expr));
        }
        Some(Box::new(expr))
    };

    parser.advance();
    let upper = parse_slice_bound(parser)?;
    let step = if parser.eat(TokenKind::Colon) {
        parse_slice_bound(parser)?
    } else {
        None
    };

    Ok(Argument::Positional(Expr::Slice(SliceExpr {
        lower,
        upper,
        step,
        span: Span::new(start, parser.previous_end()),
    })))
}

/// Rejects bracket items that cannot be type arguments of a generic call.
fn check_type_argument(item: Argument) -> Result<Argument, Error> {
    let value = match &item {
        Argument::Positional(expr) => expr,
        Argument::Keyword(keyword) => &keyword.value,
    };

    match value {
        Expr::Slice(slice) => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: String::from(":"),
                message: String::from("a slice cannot be a type argument"),
            },
            slice.span,
        )),
        Expr::Conditional(conditional) => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: String::from("if"),
                message: String::from(
                    "conditional expressions must be parenthesized in type arguments",
                ),
            },
            conditional.span,
        )),
        _ => Ok(item),
    }
}

/// `[` after an expression: generic call type arguments or a subscript.
pub fn parse_bracket_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    if parser.current_token_kind() == TokenKind::CloseBracket {
        return Err(parser.unexpected());
    }

    let mut items = vec![];
    loop {
        items.push(parse_bracket_item(parser)?);
        if !parser.eat(TokenKind::Comma) || parser.current_token_kind() == TokenKind::CloseBracket {
            break;
        }
    }
    parser.expect(TokenKind::CloseBracket)?;

    if parser.current_token_kind() == TokenKind::OpenParen {
        let type_arguments = items
            .into_iter()
            .map(check_type_argument)
            .collect::<Result<Vec<_>, _>>()?;
        let arguments = parse_call_arguments(parser)?;

        return Ok(Expr::Call(CallExpr {
            span: Span::new(left.get_span().start.0, parser.previous_end()),
            callee: Box::new(left),
            type_arguments: Some(type_arguments),
            arguments,
        }));
    }

    let indices = items
        .into_iter()
        .map(|item| match item {
            Argument::Positional(expr) => Ok(expr),
            Argument::Keyword(keyword) => Err(Error::new(
                ErrorImpl::KeywordArgumentOutsideCall { name: keyword.name },
                keyword.span,
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Expr::Subscript(SubscriptExpr {
        span: Span::new(left.get_span().start.0, parser.previous_end()),
        object: Box::new(left),
        indices,
    }))
}

/// An element of a list, tuple, set or dict literal; `name=expr` is rejected.
fn parse_collection_item(parser: &mut Parser) -> Result<Expr, Error> {
    if parser.current_token_kind() == TokenKind::Identifier
        && parser.peek_kind(1) == TokenKind::Assignment
    {
        let name = parser.current_token().clone();
        return Err(Error::new(
            ErrorImpl::KeywordArgumentOutsideCall { name: name.value },
            name.span,
        ));
    }

    parse_expr(parser, BindingPower::Default)
}

/// `(` as a primary: grouping, a tuple, or the empty tuple.
pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();

    if parser.current_token_kind() == TokenKind::CloseParen {
        let close = parser.advance().clone();
        return Ok(Expr::Tuple(TupleExpr {
            elements: vec![],
            span: open.span.to(close.span),
        }));
    }

    let first = parse_collection_item(parser)?;

    if parser.current_token_kind() != TokenKind::Comma {
        let close = parser.expect(TokenKind::CloseParen)?;
        return Ok(Expr::Parenthesized(ParenthesizedExpr {
            inner: Box::new(first),
            span: open.span.to(close.span),
        }));
    }

    let mut elements = vec![first];
    while parser.eat(TokenKind::Comma) {
        if parser.current_token_kind() == TokenKind::CloseParen {
            break;
        }
        elements.push(parse_collection_item(parser)?);
    }
    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Tuple(TupleExpr {
        elements,
        span: open.span.to(close.span),
    }))
}

pub fn parse_list_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();

    let mut elements = vec![];
    while parser.current_token_kind() != TokenKind::CloseBracket {
        elements.push(parse_collection_item(parser)?);
        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }
    let close = parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::List(ListExpr {
        elements,
        span: open.span.to(close.span),
    }))
}

/// `{}` and `{k: v, ...}` are dicts; `{a, b}` is a set.
pub fn parse_dict_or_set_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();

    if parser.current_token_kind() == TokenKind::CloseCurly {
        let close = parser.advance().clone();
        return Ok(Expr::Dict(DictExpr {
            entries: vec![],
            span: open.span.to(close.span),
        }));
    }

    let first = parse_collection_item(parser)?;

    if parser.eat(TokenKind::Colon) {
        let value = parse_expr(parser, BindingPower::Default)?;
        let mut entries = vec![(first, value)];

        while parser.eat(TokenKind::Comma) {
            if parser.current_token_kind() == TokenKind::CloseCurly {
                break;
            }
            let key = parse_collection_item(parser)?;
            parser.expect(TokenKind::Colon)?;
            let value = parse_expr(parser, BindingPower::Default)?;
            entries.push((key, value));
        }
        let close = parser.expect(TokenKind::CloseCurly)?;

        return Ok(Expr::Dict(DictExpr {
            entries,
            span: open.span.to(close.span),
        }));
    }

    let mut elements = vec![first];
    while parser.eat(TokenKind::Comma) {
        if parser.current_token_kind() == TokenKind::CloseCurly {
            break;
        }
        elements.push(parse_collection_item(parser)?);
    }
    let close = parser.expect(TokenKind::CloseCurly)?;

    Ok(Expr::Set(SetExpr {
        elements,
        span: open.span.to(close.span),
    }))
}
