//! Parser implementation for building the syntax tree.
//!
//! This module contains the main Parser struct and the parse entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix and postfix expressions
//! - Binding powers for operator precedence
//! - Type parsing handlers

use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::ast::Stmt,
    config::ParserConfig,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    recovery::parse_stmt_or_recover,
    types::{create_token_type_lookups, TypeLEDHandler, TypeLEDLookup, TypeNUDHandler, TypeNUDLookup},
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and maintains lookup tables for
/// parsing statements, expressions, and types. Errors are collected rather
/// than returned so that a single pass reports every malformed statement.
pub struct Parser {
    /// The list of tokens to parse, always ending in `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type null denotation handlers
    type_nud_lookup: TypeNUDLookup,
    /// Lookup table for type left denotation handlers
    type_led_lookup: TypeLEDLookup,
    /// Lookup table for type binding powers
    type_binding_power_lookup: BPLookup,
    errors: Vec<Error>,
    config: ParserConfig,
    cancelled: bool,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>, config: &ParserConfig) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens.last().map(|token| token.span.end.0).unwrap_or(0);
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::new(),
                span: Span::new(end, end),
            });
        }

        Parser {
            tokens,
            pos: 0,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            type_led_lookup: HashMap::new(),
            type_binding_power_lookup: HashMap::new(),
            errors: vec![],
            config: config.clone(),
            cancelled: false,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Kind of the token `offset` places ahead of the current one.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    pub fn previous_token(&self) -> Option<&Token> {
        self.pos.checked_sub(1).and_then(|index| self.tokens.get(index))
    }

    pub fn previous_token_kind(&self) -> Option<TokenKind> {
        self.previous_token().map(|token| token.kind)
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// Never moves past `EOF`.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.tokens[index].kind != TokenKind::EOF {
            self.pos = index + 1;
        }
        &self.tokens[index]
    }

    pub fn get_index(&self) -> usize {
        self.pos
    }

    /// End of the last consumed token, or the current start when nothing was consumed.
    pub fn previous_end(&self) -> u32 {
        self.previous_token()
            .map(|token| token.span.end.0)
            .unwrap_or(self.current_token().span.start.0)
    }

    /// Builds the default "unexpected token" error for the current token.
    pub fn unexpected(&self) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.to_string(),
            },
            token.span,
        )
    }

    pub fn unexpected_detailed(&self, message: &str) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.to_string(),
                message: String::from(message),
            },
            token.span,
        )
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            return Err(error.unwrap_or_else(|| self.unexpected()));
        }

        Ok(self.advance().clone())
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Consumes the current token if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current_token_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn push_error(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub fn get_config(&self) -> &ParserConfig {
        &self.config
    }

    /// Polls the cancel flag; once observed the parser stays cancelled.
    pub fn check_cancelled(&mut self) -> bool {
        if !self.cancelled && self.config.is_cancelled() {
            debug!(position = self.current_token().span.start.0, "parse cancelled");
            self.cancelled = true;
        }
        self.cancelled
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the type binding power lookup table.
    pub fn get_type_bp_lookup(&self) -> &BPLookup {
        &self.type_binding_power_lookup
    }

    /// Returns a reference to the type NUD lookup table.
    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Returns a reference to the type LED lookup table.
    pub fn get_type_led_lookup(&self) -> &TypeLEDLookup {
        &self.type_led_lookup
    }

    /// Binding power of the current token as an infix or postfix operator.
    ///
    /// Two tokens depend on what follows them:
    /// - `^` is a postfix transfer when the next token cannot start an
    ///   operand, and binary xor otherwise.
    /// - `not` only continues an expression as the first half of `not in`.
    pub fn current_binding_power(&self) -> BindingPower {
        match self.current_token_kind() {
            TokenKind::Caret if !self.peek_kind(1).starts_operand() => BindingPower::Postfix,
            TokenKind::Not if self.peek_kind(1) != TokenKind::In => BindingPower::Default,
            kind => self
                .binding_power_lookup
                .get(&kind)
                .copied()
                .unwrap_or(BindingPower::Default),
        }
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Leaves the binding power alone: `-` is both a prefix and an infix operator.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type left denotation handler.
    pub fn type_led(
        &mut self,
        kind: TokenKind,
        binding_power: BindingPower,
        led_fn: TypeLEDHandler,
    ) {
        self.type_binding_power_lookup.insert(kind, binding_power);
        self.type_led_lookup.insert(kind, led_fn);
    }

    /// Registers a type null denotation handler.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }
}

/// Statements and diagnostics produced from one token stream.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub body: Vec<Stmt>,
    pub errors: Vec<Error>,
    pub cancelled: bool,
}

/// Parses a stream of tokens into top-level statements.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses statements until EOF or until
/// cancellation is observed at a statement boundary.
pub fn parse(tokens: Vec<Token>, config: &ParserConfig) -> ParseOutput {
    let mut parser = Parser::new(tokens, config);
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let mut body = vec![];

    while parser.has_tokens() {
        if parser.check_cancelled() {
            break;
        }

        match parser.current_token_kind() {
            TokenKind::Newline => {
                parser.advance();
            }
            TokenKind::Dedent => {
                // Unmatched after recovery; nothing to close.
                parser.advance();
            }
            _ => body.push(parse_stmt_or_recover(&mut parser)),
        }
    }

    debug!(
        statements = body.len(),
        errors = parser.errors.len(),
        cancelled = parser.cancelled,
        "parsed token stream"
    );

    ParseOutput {
        body,
        errors: parser.errors,
        cancelled: parser.cancelled,
    }
}
