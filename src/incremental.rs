//! Whole-document and incremental parsing.
//!
//! An incremental re-parse keeps the top-level statements that end before an
//! edit, resumes scanning at the first statement that may be affected, and
//! stops as soon as the scanner reaches the start of an old statement lying
//! wholly after the edit. Statements from that point on are taken over from
//! the previous tree with their spans moved by the edit's length change.
//! The result is always identical to a full parse of the new text.

use std::sync::Arc;

use tracing::debug;

use crate::{
    ast::{
        ast::{Module, Stmt},
        visit::shift_stmt,
    },
    config::ParserConfig,
    errors::errors::Error,
    lexer::{
        layout::LineState,
        lexer::{tokenize, Lexer},
        tokens::{Token, TokenKind},
    },
    parser::parser,
    Span,
};

/// A single text replacement, in byte offsets.
///
/// `start..old_end` of the previous text was replaced by `start..new_end`
/// of the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub start: u32,
    pub old_end: u32,
    pub new_end: u32,
}

impl Edit {
    pub fn insert(at: u32, len: u32) -> Edit {
        Edit {
            start: at,
            old_end: at,
            new_end: at + len,
        }
    }

    pub fn delete(start: u32, end: u32) -> Edit {
        Edit {
            start,
            old_end: end,
            new_end: start,
        }
    }

    pub fn replace(start: u32, old_end: u32, new_len: u32) -> Edit {
        Edit {
            start,
            old_end,
            new_end: start + new_len,
        }
    }

    /// Change in document length.
    pub fn delta(&self) -> i64 {
        self.new_end as i64 - self.old_end as i64
    }
}

/// Everything produced for one version of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub module: Module,
    /// Scan and syntax errors ordered by position.
    pub errors: Vec<Error>,
    pub comments: Vec<Token>,
    pub line_states: Vec<LineState>,
    /// The parse stopped early because the cancel flag was raised.
    pub cancelled: bool,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn merge_errors(scan_errors: Vec<Error>, parse_errors: Vec<Error>) -> Vec<Error> {
    let mut errors = scan_errors;
    errors.extend(parse_errors);
    errors.sort_by_key(|error| error.get_position());
    errors
}

/// Scans and parses a whole document.
pub fn parse(source: &str, config: &ParserConfig) -> ParseResult {
    let scan = tokenize(source, config);
    let output = parser::parse(scan.tokens, config);

    ParseResult {
        module: Module {
            body: output.body.into_iter().map(Arc::new).collect(),
            span: Span::new(0, source.len() as u32),
        },
        errors: merge_errors(scan.errors, output.errors),
        comments: scan.comments,
        line_states: scan.line_states,
        cancelled: output.cancelled,
    }
}

fn is_consistent(previous: &ParseResult, source: &str, edit: &Edit) -> bool {
    let old_len = previous.module.span.end.0 as i64;
    edit.start <= edit.old_end
        && edit.start <= edit.new_end
        && edit.old_end as i64 <= old_len
        && edit.new_end as usize <= source.len()
        && old_len + edit.delta() == source.len() as i64
}

fn has_error_at(previous: &ParseResult, offset: u32) -> bool {
    previous
        .errors
        .iter()
        .any(|error| error.get_position().0 == offset)
}

/// Offset where the first possibly affected statement starts, with the number
/// of leading statements kept as they are.
fn resume_point(previous: &ParseResult, source: &str, edit: &Edit) -> Option<(usize, u32)> {
    let body = &previous.module.body;

    // A statement is untouched when the edit starts after the next one begins.
    let mut reused = body
        .windows(2)
        .take_while(|pair| pair[1].get_span().start.0 < edit.start)
        .count();

    // An error sitting on a statement's first token may have been reported
    // by the statement before it, so that statement is parsed again too.
    while reused > 0 && has_error_at(previous, body[reused].get_span().start.0) {
        reused -= 1;
    }

    if reused == 0 {
        return Some((0, 0));
    }

    let offset = body[reused].get_span().start.0;
    let bytes = source.as_bytes();
    let at_line_start = offset == 0 || bytes.get(offset as usize - 1) == Some(&b'\n');
    let at_column_zero = bytes
        .get(offset as usize)
        .is_some_and(|byte| !matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | b'#'));

    if at_line_start && at_column_zero {
        Some((reused, offset))
    } else {
        None
    }
}

/// Re-parses `source` after `edit` was applied to the text of `previous`.
///
/// Falls back to a full parse whenever the previous result cannot be reused
/// safely.
pub fn reparse(previous: &ParseResult, source: &str, edit: &Edit, config: &ParserConfig) -> ParseResult {
    if previous.cancelled || previous.module.body.is_empty() || !is_consistent(previous, source, edit) {
        return parse(source, config);
    }

    let Some((reused, resume_at)) = resume_point(previous, source, edit) else {
        debug!(edit_start = edit.start, "no resumable statement boundary before edit");
        return parse(source, config);
    };

    let snapshot = if resume_at == 0 {
        Default::default()
    } else {
        match previous
            .line_states
            .iter()
            .find(|state| state.offset == resume_at)
        {
            Some(state) if state.snapshot.bracket_depth == 0 => state.snapshot.clone(),
            _ => return parse(source, config),
        }
    };

    let delta = edit.delta();
    let old_body = &previous.module.body;

    // Old statements wholly after the edit, keyed by where they start now.
    // A start carrying an old error may owe it to the statement before, which
    // is parsed again, so the scan does not stop there.
    let stop_points: Vec<u32> = old_body
        .iter()
        .skip(reused + 1)
        .filter(|stmt| !stmt.is_error())
        .map(|stmt| stmt.get_span().start.0)
        .filter(|&start| start >= edit.old_end && !has_error_at(previous, start))
        .map(|start| (start as i64 + delta) as u32)
        .collect();

    let Some(lexer) = Lexer::resume(source, resume_at as usize, &snapshot, config) else {
        return parse(source, config);
    };
    let scan = lexer.with_stop_points(stop_points).run();

    let mut tokens = scan.tokens;
    let closing = tokens
        .iter()
        .take_while(|token| token.kind == TokenKind::Dedent)
        .count();
    tokens.drain(..closing);

    let output = parser::parse(tokens, config);
    let new_errors = merge_errors(scan.errors, output.errors);

    // Where the old suffix takes over, in old and new coordinates.
    let splice = match scan.stopped_at {
        Some(stop) if !output.cancelled => {
            let clean = new_errors.iter().all(|error| error.get_position().0 < stop);
            let old_stop = (stop as i64 - delta) as u32;
            let first_kept = old_body
                .iter()
                .position(|stmt| stmt.get_span().start.0 == old_stop);
            match first_kept {
                Some(index) if clean => Some((index, stop, old_stop)),
                _ => None,
            }
        }
        _ => None,
    };

    if scan.stopped_at.is_some() && splice.is_none() && !output.cancelled {
        debug!(edit_start = edit.start, "suffix not reusable, parsing whole document");
        return parse(source, config);
    }

    let mut body: Vec<Arc<Stmt>> = old_body[..reused].to_vec();
    body.extend(output.body.into_iter().map(Arc::new));

    let mut errors: Vec<Error> = previous
        .errors
        .iter()
        .filter(|error| error.get_position().0 < resume_at)
        .cloned()
        .collect();
    errors.extend(new_errors);

    let mut comments: Vec<Token> = previous
        .comments
        .iter()
        .filter(|comment| comment.span.start.0 < resume_at)
        .cloned()
        .collect();
    comments.extend(scan.comments);

    let mut line_states: Vec<LineState> = previous
        .line_states
        .iter()
        .filter(|state| state.offset < resume_at)
        .cloned()
        .collect();
    line_states.extend(scan.line_states);

    if let Some((first_kept, _, old_stop)) = splice {
        for stmt in &old_body[first_kept..] {
            if delta == 0 {
                body.push(Arc::clone(stmt));
            } else {
                let mut moved = stmt.as_ref().clone();
                shift_stmt(&mut moved, delta);
                body.push(Arc::new(moved));
            }
        }

        errors.extend(
            previous
                .errors
                .iter()
                .filter(|error| error.get_position().0 >= old_stop)
                .map(|error| {
                    let mut error = error.clone();
                    error.shift(delta);
                    error
                }),
        );
        comments.extend(
            previous
                .comments
                .iter()
                .filter(|comment| comment.span.start.0 >= old_stop)
                .map(|comment| {
                    let mut comment = comment.clone();
                    comment.span.shift(delta);
                    comment
                }),
        );
        line_states.extend(
            previous
                .line_states
                .iter()
                .filter(|state| state.offset > old_stop)
                .map(|state| LineState {
                    offset: (state.offset as i64 + delta) as u32,
                    snapshot: state.snapshot.clone(),
                }),
        );
    }

    debug!(
        kept_before = reused,
        reparsed = body.len(),
        resumed_at = resume_at,
        spliced = splice.is_some(),
        "incremental parse"
    );

    ParseResult {
        module: Module {
            body,
            span: Span::new(0, source.len() as u32),
        },
        errors,
        comments,
        line_states,
        cancelled: output.cancelled,
    }
}
