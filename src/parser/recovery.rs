//! Statement-level error recovery.
//!
//! A failed statement is replaced by an `ErrorStmt` marker and the parser
//! skips ahead to the next statement boundary at the enclosing level, so
//! every malformed statement of a document is reported in one pass.

use tracing::debug;

use crate::{
    ast::{ast::Stmt, statements::ErrorStmt},
    lexer::tokens::TokenKind,
    Span,
};

use super::{parser::Parser, stmt::parse_stmt};

/// Parses one statement, recovering from a syntax error if there is one.
pub fn parse_stmt_or_recover(parser: &mut Parser) -> Stmt {
    let start_index = parser.get_index();
    let start = parser.current_token().span.start.0;

    match parse_stmt(parser) {
        Ok(stmt) => stmt,
        Err(error) => {
            debug!(
                position = error.get_position().0,
                error = %error,
                "recovering from syntax error"
            );
            parser.push_error(error);
            synchronize(parser, start_index);

            let end = if parser.get_index() > start_index {
                parser.previous_end()
            } else {
                start
            };
            Stmt::Error(ErrorStmt {
                span: Span::new(start, end.max(start)),
            })
        }
    }
}

/// Skips to the start of the next statement at the current level.
///
/// Stops after a `NEWLINE` at the enclosing level, or before the `DEDENT`
/// that closes the enclosing block. An indented block directly after the
/// skipped line belongs to the broken statement and is skipped too.
pub fn synchronize(parser: &mut Parser, start_index: usize) {
    let progressed = parser.get_index() > start_index;
    if progressed
        && matches!(
            parser.previous_token_kind(),
            Some(TokenKind::Newline | TokenKind::Dedent)
        )
    {
        return;
    }

    let mut depth = 0usize;
    loop {
        match parser.current_token_kind() {
            TokenKind::EOF => return,
            TokenKind::Indent => {
                depth += 1;
                parser.advance();
            }
            TokenKind::Dedent => {
                if depth == 0 {
                    return;
                }
                depth -= 1;
                parser.advance();
                if depth == 0 {
                    return;
                }
            }
            TokenKind::Newline => {
                parser.advance();
                if depth == 0 {
                    break;
                }
            }
            _ => {
                parser.advance();
            }
        }
    }

    if parser.current_token_kind() == TokenKind::Indent {
        skip_block(parser);
    }
}

/// Skips an `INDENT ... DEDENT` block including nested blocks.
fn skip_block(parser: &mut Parser) {
    let mut depth = 0usize;
    loop {
        match parser.current_token_kind() {
            TokenKind::EOF => return,
            TokenKind::Indent => depth += 1,
            TokenKind::Dedent => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    parser.advance();
                    return;
                }
            }
            _ => {}
        }
        parser.advance();
    }
}
