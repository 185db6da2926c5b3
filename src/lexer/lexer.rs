use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use crate::{
    config::ParserConfig,
    errors::errors::{Error, ErrorImpl},
    Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::{
    layout::{
        apply_indent, is_blank_line, is_comment_line, measure_indent, IndentChange, LineState,
        ScannerSnapshot, StringKind,
    },
    tokens::{Token, TokenKind, RESERVED_LOOKUP},
};

pub type RegexHandler = fn(&mut Lexer<'_>, &str);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(source: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(source).expect("token patterns are valid regular expressions"),
        handler,
    }
}

lazy_static! {
    /// Tried in order at every position; longer operators come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern(r"^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern(r"^(?:[0-9][0-9_]*\.[0-9][0-9_]*(?:[eE][+-]?[0-9]+)?|[0-9][0-9_]*[eE][+-]?[0-9]+)", float_handler),
        pattern(r"^(?:0[xX][0-9a-fA-F_]+|0[oO][0-7_]+|0[bB][01_]+|[0-9][0-9_]*)", integer_handler),
        pattern(r"^[ \t\x0C\r]+", skip_handler),
        pattern(r"^\\\r?\n", continuation_handler),
        pattern(r"^#[^\r\n]*", comment_handler),
        pattern(r#"^(?:"""|''')"#, triple_string_handler),
        pattern(r#"^["']"#, string_handler),
        pattern(r"^[(\[{]", open_bracket_handler),
        pattern(r"^[)\]}]", close_bracket_handler),
        pattern(r"^\*\*=", MK_DEFAULT_HANDLER!(TokenKind::StarStarEquals, "**=")),
        pattern(r"^//=", MK_DEFAULT_HANDLER!(TokenKind::SlashSlashEquals, "//=")),
        pattern(r"^<<=", MK_DEFAULT_HANDLER!(TokenKind::ShiftLeftEquals, "<<=")),
        pattern(r"^>>=", MK_DEFAULT_HANDLER!(TokenKind::ShiftRightEquals, ">>=")),
        pattern(r"^\*\*", MK_DEFAULT_HANDLER!(TokenKind::StarStar, "**")),
        pattern(r"^//", MK_DEFAULT_HANDLER!(TokenKind::SlashSlash, "//")),
        pattern(r"^<<", MK_DEFAULT_HANDLER!(TokenKind::ShiftLeft, "<<")),
        pattern(r"^>>", MK_DEFAULT_HANDLER!(TokenKind::ShiftRight, ">>")),
        pattern(r"^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern(r"^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern(r"^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern(r"^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern(r"^->", MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->")),
        pattern(r"^\+=", MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=")),
        pattern(r"^-=", MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=")),
        pattern(r"^\*=", MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=")),
        pattern(r"^/=", MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=")),
        pattern(r"^%=", MK_DEFAULT_HANDLER!(TokenKind::PercentEquals, "%=")),
        pattern(r"^&=", MK_DEFAULT_HANDLER!(TokenKind::AmpersandEquals, "&=")),
        pattern(r"^\|=", MK_DEFAULT_HANDLER!(TokenKind::PipeEquals, "|=")),
        pattern(r"^\^=", MK_DEFAULT_HANDLER!(TokenKind::CaretEquals, "^=")),
        pattern(r"^\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern(r"^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern(r"^\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern(r"^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern(r"^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        pattern(r"^\|", MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|")),
        pattern(r"^\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
        pattern(r"^&", MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&")),
        pattern(r"^~", MK_DEFAULT_HANDLER!(TokenKind::Tilde, "~")),
        pattern(r"^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern(r"^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern(r"^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern(r"^\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern(r"^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern(r"^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern(r"^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern(r"^@", MK_DEFAULT_HANDLER!(TokenKind::At, "@")),
    ];
}

/// Everything a scan produces.
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    /// Grammar token stream, always terminated by `EOF`.
    pub tokens: Vec<Token>,
    pub comments: Vec<Token>,
    pub errors: Vec<Error>,
    /// One record per physical line start reached, in document order.
    pub line_states: Vec<LineState>,
    /// Set when the scan ended early at a requested stop point.
    pub stopped_at: Option<u32>,
}

/// The layout scanner.
///
/// Lexical tokens come from the pattern table; layout tokens (`Newline`,
/// `Indent`, `Dedent`) are derived from line starts while outside brackets.
pub struct Lexer<'src> {
    source: &'src str,
    pub pos: usize,
    tokens: Vec<Token>,
    comments: Vec<Token>,
    errors: Vec<Error>,
    line_states: Vec<LineState>,
    tab_width: u32,
    indent_stack: Vec<u32>,
    /// Spans of the currently unclosed openers; its length is the bracket depth.
    open_brackets: Vec<Span>,
    at_line_start: bool,
    line_has_content: bool,
    /// Set after a dedent mismatch until a blank line or a matching width.
    resyncing: bool,
    stop_points: Vec<u32>,
    stopped_at: Option<u32>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, config: &ParserConfig) -> Lexer<'src> {
        Lexer {
            source,
            pos: 0,
            tokens: vec![],
            comments: vec![],
            errors: vec![],
            line_states: vec![],
            tab_width: config.tab_width,
            indent_stack: vec![0],
            open_brackets: vec![],
            at_line_start: true,
            line_has_content: false,
            resyncing: false,
            stop_points: vec![],
            stopped_at: None,
        }
    }

    /// Restarts scanning at `offset` from a previously recorded state.
    ///
    /// Returns `None` when the snapshot was taken inside a string literal.
    pub fn resume(
        source: &'src str,
        offset: usize,
        snapshot: &ScannerSnapshot,
        config: &ParserConfig,
    ) -> Option<Lexer<'src>> {
        if !snapshot.is_resumable() || offset > source.len() {
            return None;
        }

        let mut lexer = Lexer::new(source, config);
        lexer.pos = offset;
        lexer.indent_stack = snapshot.indent_stack.clone();
        if lexer.indent_stack.is_empty() {
            lexer.indent_stack.push(0);
        }
        lexer.open_brackets = vec![Span::new(offset as u32, offset as u32); snapshot.bracket_depth as usize];
        lexer.at_line_start = lexer.open_brackets.is_empty()
            && (offset == 0 || source.as_bytes()[offset - 1] == b'\n');

        debug!(offset, depth = snapshot.bracket_depth, "resuming scan");
        Some(lexer)
    }

    /// Line starts at which the scan ends early once the state there is top-level.
    pub fn with_stop_points(mut self, mut stop_points: Vec<u32>) -> Self {
        stop_points.sort_unstable();
        stop_points.dedup();
        self.stop_points = stop_points;
        self
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        if !token.kind.is_layout() {
            self.line_has_content = true;
        }
        self.tokens.push(token);
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &'src str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn bracket_depth(&self) -> u32 {
        self.open_brackets.len() as u32
    }

    pub fn snapshot(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            indent_stack: self.indent_stack.clone(),
            bracket_depth: self.bracket_depth(),
            string: None,
        }
    }

    fn record_line_state(&mut self, offset: usize, string: Option<StringKind>) {
        let mut snapshot = self.snapshot();
        snapshot.string = string;
        self.line_states.push(LineState {
            offset: offset as u32,
            snapshot,
        });
    }

    fn error(&mut self, error_impl: ErrorImpl, span: Span) {
        debug!(start = span.start.0, error = %error_impl, "scan error");
        self.errors.push(Error::new(error_impl, span));
    }

    fn layout_token(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.push(MK_TOKEN!(kind, String::new(), Span::new(start as u32, end as u32)));
    }

    /// Evaluates the indentation of the line starting at the current position.
    fn begin_line(&mut self) {
        self.at_line_start = false;
        let line_start = self.pos;
        self.record_line_state(line_start, None);

        let rest = self.remainder();
        let indent = measure_indent(rest, self.tab_width);
        let after = &rest[indent.len..];

        if is_blank_line(after) {
            self.resyncing = false;
            return;
        }
        if is_comment_line(after) {
            return;
        }

        let content_start = line_start + indent.len;

        if indent.width == 0 && self.stop_points.binary_search(&(line_start as u32)).is_ok() {
            self.apply_indentation(0, line_start, content_start);
            self.stopped_at = Some(line_start as u32);
            debug!(offset = line_start, "scan reached stop point");
            return;
        }

        if indent.mixed {
            self.error(
                ErrorImpl::MixedIndentation,
                Span::new(line_start as u32, content_start as u32),
            );
        }

        self.apply_indentation(indent.width, line_start, content_start);
        self.advance_n(indent.len);
    }

    fn apply_indentation(&mut self, width: u32, line_start: usize, content_start: usize) {
        if self.resyncing {
            if self.indent_stack.contains(&width) {
                self.resyncing = false;
            } else {
                trace!(width, "skipping indentation while resynchronising");
                return;
            }
        }

        match apply_indent(&mut self.indent_stack, width) {
            IndentChange::Indent => {
                trace!(width, "indent");
                self.layout_token(TokenKind::Indent, line_start, content_start);
            }
            IndentChange::Same => {}
            IndentChange::Dedent { count, matched } => {
                trace!(width, count, "dedent");
                for _ in 0..count {
                    self.layout_token(TokenKind::Dedent, content_start, content_start);
                }
                if !matched {
                    self.error(
                        ErrorImpl::InconsistentDedent { width },
                        Span::new(line_start as u32, content_start as u32),
                    );
                    self.resyncing = true;
                }
            }
        }
    }

    fn newline(&mut self) {
        let start = self.pos;
        self.advance_n(1);

        if self.open_brackets.is_empty() {
            if self.line_has_content {
                self.layout_token(TokenKind::Newline, start, start + 1);
            }
            self.line_has_content = false;
            self.at_line_start = true;
        } else {
            // Implicit continuation: no layout inside brackets.
            self.record_line_state(self.pos, None);
        }
    }

    fn finish(&mut self) {
        let end = self.pos as u32;

        if self.stopped_at.is_none() {
            if let Some(opener) = self.open_brackets.first().copied() {
                let bracket = self.source
                    [opener.start.0 as usize..opener.end.0 as usize]
                    .to_string();
                self.error(ErrorImpl::UnclosedBracket { bracket }, opener);
            }

            if self.line_has_content {
                self.layout_token(TokenKind::Newline, end as usize, end as usize);
                self.line_has_content = false;
            }

            while self.indent_stack.len() > 1 {
                self.indent_stack.pop();
                self.layout_token(TokenKind::Dedent, end as usize, end as usize);
            }
        }

        self.tokens.push(MK_TOKEN!(TokenKind::EOF, String::new(), Span::new(end, end)));
    }

    /// Scans to the end of input, or to the first stop point reached.
    pub fn run(mut self) -> ScanOutput {
        while !self.at_eof() {
            if self.at_line_start {
                self.begin_line();
                if self.stopped_at.is_some() {
                    break;
                }
                continue;
            }

            if self.remainder().starts_with('\n') {
                self.newline();
                continue;
            }

            let remaining = self.remainder();
            let mut matched = false;

            for pattern in PATTERNS.iter() {
                if let Some(found) = pattern.regex.find(remaining) {
                    (pattern.handler)(&mut self, found.as_str());
                    matched = true;
                    break;
                }
            }

            if !matched {
                let ch = self.at().unwrap_or('\0');
                let start = self.pos as u32;
                self.error(
                    ErrorImpl::UnrecognisedToken {
                        token: ch.to_string(),
                    },
                    Span::new(start, start + ch.len_utf8() as u32),
                );
                self.advance_n(ch.len_utf8().max(1));
            }
        }

        self.finish();

        ScanOutput {
            tokens: self.tokens,
            comments: self.comments,
            errors: self.errors,
            line_states: self.line_states,
            stopped_at: self.stopped_at,
        }
    }
}

fn span_of(lexer: &Lexer<'_>, len: usize) -> Span {
    Span::new(lexer.pos as u32, (lexer.pos + len) as u32)
}

fn symbol_handler(lexer: &mut Lexer<'_>, matched: &str) {
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, matched.to_string(), span_of(lexer, matched.len())));
    lexer.advance_n(matched.len());
}

fn integer_handler(lexer: &mut Lexer<'_>, matched: &str) {
    lexer.push(MK_TOKEN!(TokenKind::Integer, matched.to_string(), span_of(lexer, matched.len())));
    lexer.advance_n(matched.len());
}

fn float_handler(lexer: &mut Lexer<'_>, matched: &str) {
    lexer.push(MK_TOKEN!(TokenKind::Float, matched.to_string(), span_of(lexer, matched.len())));
    lexer.advance_n(matched.len());
}

fn skip_handler(lexer: &mut Lexer<'_>, matched: &str) {
    lexer.advance_n(matched.len());
}

fn continuation_handler(lexer: &mut Lexer<'_>, matched: &str) {
    lexer.advance_n(matched.len());
    lexer.record_line_state(lexer.pos, None);
}

fn comment_handler(lexer: &mut Lexer<'_>, matched: &str) {
    let span = span_of(lexer, matched.len());
    lexer.comments.push(MK_TOKEN!(TokenKind::Comment, matched.to_string(), span));
    lexer.advance_n(matched.len());
}

fn open_bracket_handler(lexer: &mut Lexer<'_>, matched: &str) {
    let kind = match matched {
        "(" => TokenKind::OpenParen,
        "[" => TokenKind::OpenBracket,
        _ => TokenKind::OpenCurly,
    };
    let span = span_of(lexer, 1);
    lexer.open_brackets.push(span);
    lexer.push(MK_TOKEN!(kind, matched.to_string(), span));
    lexer.advance_n(1);
}

fn close_bracket_handler(lexer: &mut Lexer<'_>, matched: &str) {
    let kind = match matched {
        ")" => TokenKind::CloseParen,
        "]" => TokenKind::CloseBracket,
        _ => TokenKind::CloseCurly,
    };
    // A stray closer leaves the depth at zero; the parser reports it.
    lexer.open_brackets.pop();
    lexer.push(MK_TOKEN!(kind, matched.to_string(), span_of(lexer, 1)));
    lexer.advance_n(1);
}

/// Single-line string; ends at the matching quote or, unterminated, at the newline.
fn string_handler(lexer: &mut Lexer<'_>, matched: &str) {
    let quote = matched.as_bytes()[0];
    let bytes = lexer.remainder().as_bytes();
    let mut end = 1;
    let mut terminated = false;

    while end < bytes.len() {
        match bytes[end] {
            b'\\' if end + 1 < bytes.len() && bytes[end + 1] != b'\n' => end += 2,
            b'\n' => break,
            byte if byte == quote => {
                end += 1;
                terminated = true;
                break;
            }
            _ => end += 1,
        }
    }
    let end = end.min(bytes.len());

    let text = lexer.remainder()[..end].to_string();
    let span = span_of(lexer, end);
    if !terminated {
        lexer.error(ErrorImpl::UnterminatedString, span);
    }
    lexer.push(MK_TOKEN!(TokenKind::String, text, span));
    lexer.advance_n(end);
}

/// Triple-quoted string; may span physical lines.
fn triple_string_handler(lexer: &mut Lexer<'_>, matched: &str) {
    let kind = if matched == "\"\"\"" {
        StringKind::TripleDouble
    } else {
        StringKind::TripleSingle
    };
    let delimiter = kind.delimiter();
    let start = lexer.pos;
    let bytes = lexer.remainder().as_bytes();
    let mut end = 3;
    let mut terminated = false;
    let mut line_starts = vec![];

    while end < bytes.len() {
        if bytes[end] == b'\\' && end + 1 < bytes.len() {
            if bytes[end + 1] == b'\n' {
                line_starts.push(start + end + 2);
            }
            end += 2;
            continue;
        }
        if bytes[end] == b'\n' {
            line_starts.push(start + end + 1);
        }
        if bytes[end..].starts_with(delimiter.as_bytes()) {
            end += 3;
            terminated = true;
            break;
        }
        end += 1;
    }
    let end = end.min(bytes.len());

    for line_start in line_starts {
        lexer.record_line_state(line_start, Some(kind));
    }

    let text = lexer.remainder()[..end].to_string();
    let span = span_of(lexer, end);
    if !terminated {
        lexer.error(ErrorImpl::UnterminatedString, span);
    }
    lexer.push(MK_TOKEN!(TokenKind::String, text, span));
    lexer.advance_n(end);
}

/// Scans a whole document.
pub fn tokenize(source: &str, config: &ParserConfig) -> ScanOutput {
    Lexer::new(source, config).run()
}
