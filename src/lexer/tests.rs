//! Unit tests for the layout scanner.
//!
//! This module contains tests for tokenization including:
//! - Keywords, contextual words and identifiers
//! - Numeric and string literals
//! - Operators and punctuation
//! - Indentation, bracket continuation and comments
//! - Scan errors and recovery
//! - Line states, resuming and stop points

use pretty_assertions::assert_eq;

use super::{
    layout::{LineState, ScannerSnapshot, StringKind},
    lexer::{tokenize, Lexer, ScanOutput},
    tokens::TokenKind::{self, *},
};
use crate::{config::ParserConfig, errors::errors::ErrorCategory, Span};

fn scan(source: &str) -> ScanOutput {
    tokenize(source, &ParserConfig::default())
}

fn kinds(source: &str) -> Vec<TokenKind> {
    scan(source).tokens.iter().map(|token| token.kind).collect()
}

fn categories(output: &ScanOutput) -> Vec<ErrorCategory> {
    output.errors.iter().map(|error| error.category()).collect()
}

#[test]
fn test_tokenize_keywords() {
    let source = "import from as var alias return pass break continue raise def fn struct trait \
                  if elif else for while in is and or not True False None";

    assert_eq!(
        kinds(source),
        vec![
            Import, From, As, Var, Alias, Return, Pass, Break, Continue, Raise, Def, Fn, Struct,
            Trait, If, Elif, Else, For, While, In, Is, And, Or, Not, True, False, NoneKw, Newline,
            EOF
        ]
    );
}

#[test]
fn test_contextual_words_are_identifiers() {
    let output = scan("mut owned ref out read inout raises self");

    for token in &output.tokens[..8] {
        assert_eq!(token.kind, Identifier);
    }
    assert_eq!(output.tokens[5].value, "inout");
}

#[test]
fn test_tokenize_numbers() {
    let output = scan("42 3.14 0x1F 1_000 2e10 0b101");
    let found: Vec<(TokenKind, &str)> = output.tokens[..6]
        .iter()
        .map(|token| (token.kind, token.value.as_str()))
        .collect();

    assert_eq!(
        found,
        vec![
            (Integer, "42"),
            (Float, "3.14"),
            (Integer, "0x1F"),
            (Integer, "1_000"),
            (Float, "2e10"),
            (Integer, "0b101"),
        ]
    );
}

#[test]
fn test_tokenize_strings_keep_raw_text() {
    let output = scan(r#""hello" 'wor\'ld' "tab\t""#);

    assert_eq!(output.tokens[0].kind, String);
    assert_eq!(output.tokens[0].value, "\"hello\"");
    assert_eq!(output.tokens[1].value, r"'wor\'ld'");
    assert_eq!(output.tokens[2].value, r#""tab\t""#);
    assert!(output.errors.is_empty());
}

#[test]
fn test_triple_quoted_string_spans_lines() {
    assert_eq!(
        kinds("x = \"\"\"a\nb\"\"\"\ny\n"),
        vec![Identifier, Assignment, String, Newline, Identifier, Newline, EOF]
    );
}

#[test]
fn test_tokenize_operators() {
    let source = "+ - * ** / // % | ^ & ~ << >> == != < <= > >= = += -= **= //= -> @ . , : ;";

    assert_eq!(
        kinds(source),
        vec![
            Plus,
            Dash,
            Star,
            StarStar,
            Slash,
            SlashSlash,
            Percent,
            Pipe,
            Caret,
            Ampersand,
            Tilde,
            ShiftLeft,
            ShiftRight,
            Equals,
            NotEquals,
            Less,
            LessEquals,
            Greater,
            GreaterEquals,
            Assignment,
            PlusEquals,
            MinusEquals,
            StarStarEquals,
            SlashSlashEquals,
            Arrow,
            At,
            Dot,
            Comma,
            Colon,
            Semicolon,
            Newline,
            EOF
        ]
    );
}

#[test]
fn test_token_spans() {
    let output = scan("ab = 12\n");

    assert_eq!(output.tokens[0].span, Span::new(0, 2));
    assert_eq!(output.tokens[1].span, Span::new(3, 4));
    assert_eq!(output.tokens[2].span, Span::new(5, 7));
    assert_eq!(output.tokens[3].kind, Newline);
    assert_eq!(output.tokens[3].span, Span::new(7, 8));
    assert!(output.tokens[3].value.is_empty());
}

#[test]
fn test_indent_and_dedent() {
    assert_eq!(
        kinds("if a:\n    b\nc\n"),
        vec![If, Identifier, Colon, Newline, Indent, Identifier, Newline, Dedent, Identifier, Newline, EOF]
    );
}

#[test]
fn test_dedents_flushed_at_end_of_input() {
    assert_eq!(
        kinds("a:\n  b:\n    c\n"),
        vec![
            Identifier, Colon, Newline, Indent, Identifier, Colon, Newline, Indent, Identifier,
            Newline, Dedent, Dedent, EOF
        ]
    );
}

#[test]
fn test_missing_final_newline_is_synthesized() {
    assert_eq!(
        kinds("a:\n    b"),
        vec![Identifier, Colon, Newline, Indent, Identifier, Newline, Dedent, EOF]
    );
}

#[test]
fn test_brackets_suppress_layout() {
    assert_eq!(
        kinds("x = (1,\n     2)\ny\n"),
        vec![
            Identifier, Assignment, OpenParen, Integer, Comma, Integer, CloseParen, Newline,
            Identifier, Newline, EOF
        ]
    );
}

#[test]
fn test_blank_and_comment_lines_do_not_touch_layout() {
    let output = scan("a:\n\n    # note\n    b\n");
    let found: Vec<TokenKind> = output.tokens.iter().map(|token| token.kind).collect();

    assert_eq!(
        found,
        vec![Identifier, Colon, Newline, Indent, Identifier, Newline, Dedent, EOF]
    );
    assert_eq!(output.comments.len(), 1);
    assert_eq!(output.comments[0].kind, Comment);
    assert_eq!(output.comments[0].value, "# note");
}

#[test]
fn test_trailing_comment() {
    let output = scan("x = 1 # c\n");

    assert_eq!(
        output.tokens.iter().map(|token| token.kind).collect::<Vec<_>>(),
        vec![Identifier, Assignment, Integer, Newline, EOF]
    );
    assert_eq!(output.comments[0].value, "# c");
    assert_eq!(output.comments[0].span, Span::new(6, 9));
}

#[test]
fn test_comment_excludes_carriage_return() {
    let output = scan("x = 1 # c\r\n# own line\r\ny = 2\r\n");

    assert_eq!(
        output.tokens.iter().map(|token| token.kind).collect::<Vec<_>>(),
        vec![Identifier, Assignment, Integer, Newline, Identifier, Assignment, Integer, Newline, EOF]
    );
    assert_eq!(output.comments[0].value, "# c");
    assert_eq!(output.comments[0].span, Span::new(6, 9));
    assert_eq!(output.comments[1].value, "# own line");
    assert_eq!(output.comments[1].span, Span::new(11, 21));
    assert!(output.errors.is_empty());
}

#[test]
fn test_explicit_line_continuation() {
    assert_eq!(
        kinds("x = 1 + \\\n    2\n"),
        vec![Identifier, Assignment, Integer, Plus, Integer, Newline, EOF]
    );
}

#[test]
fn test_dedent_to_unknown_width_is_reported() {
    let output = scan("a:\n    b:\n        c\n   d\n");
    let found: Vec<TokenKind> = output.tokens.iter().map(|token| token.kind).collect();

    assert_eq!(categories(&output), vec![ErrorCategory::IndentationError]);
    assert_eq!(output.errors[0].get_span(), Span::new(20, 23));
    assert_eq!(
        found,
        vec![
            Identifier, Colon, Newline, Indent, Identifier, Colon, Newline, Indent, Identifier,
            Newline, Dedent, Dedent, Identifier, Newline, EOF
        ]
    );
}

#[test]
fn test_resync_after_dedent_mismatch() {
    let output = scan("a:\n    b\n  c\n  d\ne\n");
    let found: Vec<TokenKind> = output.tokens.iter().map(|token| token.kind).collect();

    assert_eq!(output.errors.len(), 1);
    assert_eq!(
        found,
        vec![
            Identifier, Colon, Newline, Indent, Identifier, Newline, Dedent, Identifier, Newline,
            Identifier, Newline, Identifier, Newline, EOF
        ]
    );
}

#[test]
fn test_mixed_tabs_and_spaces() {
    let output = scan("a:\n \tb\n");

    assert_eq!(categories(&output), vec![ErrorCategory::IndentationError]);
    assert!(output.tokens.iter().any(|token| token.kind == Indent));
}

#[test]
fn test_configurable_tab_width() {
    let config = ParserConfig::default().with_tab_width(4);
    let output = tokenize("a:\n\tb\n    c\n", &config);
    let found: Vec<TokenKind> = output.tokens.iter().map(|token| token.kind).collect();

    assert!(output.errors.is_empty());
    assert_eq!(
        found,
        vec![Identifier, Colon, Newline, Indent, Identifier, Newline, Identifier, Newline, Dedent, EOF]
    );
}

#[test]
fn test_unterminated_string() {
    let output = scan("x = \"abc\ny\n");

    assert_eq!(categories(&output), vec![ErrorCategory::UnterminatedString]);
    assert_eq!(
        output.tokens.iter().map(|token| token.kind).collect::<Vec<_>>(),
        vec![Identifier, Assignment, String, Newline, Identifier, Newline, EOF]
    );
}

#[test]
fn test_unterminated_triple_string() {
    let output = scan("x = '''abc\ny\n");

    assert_eq!(categories(&output), vec![ErrorCategory::UnterminatedString]);
    assert_eq!(output.tokens[2].value, "'''abc\ny\n");
}

#[test]
fn test_unclosed_bracket() {
    let output = scan("x = (1,\n");

    assert_eq!(categories(&output), vec![ErrorCategory::UnclosedBracket]);
    assert_eq!(output.errors[0].get_span(), Span::new(4, 5));
    assert_eq!(
        output.tokens.iter().map(|token| token.kind).collect::<Vec<_>>(),
        vec![Identifier, Assignment, OpenParen, Integer, Comma, Newline, EOF]
    );
}

#[test]
fn test_unrecognised_character_is_skipped() {
    let output = scan("x = $\ny\n");

    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].get_error_name(), "UnrecognisedToken");
    assert_eq!(
        output.tokens.iter().map(|token| token.kind).collect::<Vec<_>>(),
        vec![Identifier, Assignment, Newline, Identifier, Newline, EOF]
    );
}

#[test]
fn test_indents_balance_dedents() {
    let sources = [
        "a:\n  b:\n    c\n  d\ne\n",
        "def f():\n    if x:\n        return 1\n    else:\n        return 2\n",
        "a:\n\tb:\n\t\tc\n",
        "x = [\n  1,\n    2,\n]\n",
    ];

    for source in sources {
        let found = kinds(source);
        let indents = found.iter().filter(|kind| **kind == Indent).count();
        let dedents = found.iter().filter(|kind| **kind == Dedent).count();
        assert_eq!(indents, dedents, "unbalanced layout for {source:?}");
    }
}

#[test]
fn test_line_states_record_brackets() {
    let output = scan("a:\n    (b,\n  c)\n");

    assert_eq!(output.line_states.len(), 3);
    assert_eq!(output.line_states[0].offset, 0);
    assert_eq!(output.line_states[1].offset, 3);
    assert_eq!(output.line_states[1].snapshot, ScannerSnapshot::default());
    assert_eq!(output.line_states[2].offset, 11);
    assert_eq!(output.line_states[2].snapshot.bracket_depth, 1);
    assert_eq!(output.line_states[2].snapshot.indent_stack, vec![0, 4]);
}

#[test]
fn test_line_states_inside_strings() {
    let output = scan("s = \"\"\"a\nb\"\"\"\n");

    assert_eq!(
        output.line_states[1],
        LineState {
            offset: 9,
            snapshot: ScannerSnapshot {
                indent_stack: vec![0],
                bracket_depth: 0,
                string: Some(StringKind::TripleDouble),
            },
        }
    );
    assert!(!output.line_states[1].snapshot.is_resumable());
}

#[test]
fn test_snapshot_serialization() {
    let snapshot = ScannerSnapshot {
        indent_stack: vec![0, 4, 8],
        bracket_depth: 2,
        string: Some(StringKind::TripleSingle),
    };

    let json = serde_json::to_string(&snapshot).unwrap();
    let restored: ScannerSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, snapshot);
}

#[test]
fn test_resume_from_snapshot() {
    let source = "a:\n    b\nc\n";
    let config = ParserConfig::default();
    let full = tokenize(source, &config);
    let state = full
        .line_states
        .iter()
        .find(|state| state.offset == 9)
        .unwrap();

    assert_eq!(state.snapshot.indent_stack, vec![0, 4]);

    let resumed = Lexer::resume(source, 9, &state.snapshot, &config).unwrap().run();
    assert_eq!(
        resumed.tokens.iter().map(|token| token.kind).collect::<Vec<_>>(),
        vec![Dedent, Identifier, Newline, EOF]
    );
    assert_eq!(resumed.tokens[1].span, Span::new(9, 10));
}

#[test]
fn test_resume_refuses_string_snapshot() {
    let snapshot = ScannerSnapshot {
        string: Some(StringKind::TripleDouble),
        ..ScannerSnapshot::default()
    };

    assert!(Lexer::resume("x", 0, &snapshot, &ParserConfig::default()).is_none());
}

#[test]
fn test_stop_points() {
    let config = ParserConfig::default();
    let output = Lexer::new("a\n  # c\nb\nc\n", &config)
        .with_stop_points(vec![10])
        .run();

    assert_eq!(output.stopped_at, Some(10));
    assert_eq!(
        output.tokens.iter().map(|token| token.kind).collect::<Vec<_>>(),
        vec![Identifier, Newline, Identifier, Newline, EOF]
    );
}

#[test]
fn test_stop_point_inside_block_is_ignored() {
    let config = ParserConfig::default();
    let output = Lexer::new("a:\n    b\n", &config).with_stop_points(vec![3]).run();

    assert_eq!(output.stopped_at, None);
}
