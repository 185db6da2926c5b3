#![allow(clippy::module_inception)]

use crate::{
    config::ParserConfig,
    errors::errors::{Error, ErrorTip},
    incremental::ParseResult,
};

pub mod ast;
pub mod config;
pub mod errors;
pub mod incremental;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// A byte offset into the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position(pub u32);

impl Position {
    pub fn shifted(self, delta: i64) -> Self {
        Position((self.0 as i64 + delta) as u32)
    }
}

/// Half-open byte range `[start, end)` covered by a token or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Span {
            start: Position(start),
            end: Position(end),
        }
    }

    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }

    pub fn len(&self) -> u32 {
        self.end.0 - self.start.0
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn shift(&mut self, delta: i64) {
        self.start = self.start.shifted(delta);
        self.end = self.end.shifted(delta);
    }
}

/// Scans and parses `source` in one go.
pub fn parse_source(source: &str, config: &ParserConfig) -> ParseResult {
    incremental::parse(source, config)
}

/// Returns the 1-based line number, the line text and the column of `position`.
///
/// Positions at or past the end of the buffer resolve to the last line.
pub fn get_line_at_position(source: &str, position: u32) -> (usize, String, usize) {
    let pos = (position as usize).min(source.len());

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return (line_number, line.to_string(), pos - start);
        }

        start = end;
        line_number += 1;
    }

    // End of input: point just past the last character of the final line.
    let last = source[..pos].rsplit('\n').next().unwrap_or("");
    if source.ends_with('\n') {
        (line_number, String::new(), 0)
    } else {
        (line_number - 1, last.to_string(), last.len())
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nfoo\nbar\nTesting { }\n";
        let (line_number, line, line_pos) = super::get_line_at_position(source, 10);
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(source, 30);
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);
    }

    #[test]
    fn test_get_line_at_end_of_input() {
        let (line_number, line, line_pos) = super::get_line_at_position("a = 1", 5);
        assert_eq!(line_number, 1);
        assert_eq!(line, "a = 1");
        assert_eq!(line_pos, 5);
    }

    #[test]
    fn test_render_error_points_at_column() {
        use crate::errors::errors::{Error, ErrorImpl};

        let source = "x = 1\ny = )\n";
        let error = Error::new(
            ErrorImpl::UnexpectedToken {
                token: ")".to_string(),
            },
            crate::Span::new(10, 11),
        );
        let rendered = super::render_error(&error, source, "main.mojo");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Error: UnexpectedToken (Unexpected token: `)`)");
        assert_eq!(lines[1], "-> main.mojo");
        assert_eq!(lines[3], "2 | y = )");
        assert_eq!(lines[4], "  | ----^");
    }
}

/// Renders an error against its source text.
///
/// ```text
/// Error: UnexpectedToken (Unexpected token: `)`)
/// -> main.mojo
///   |
/// 2 | y = )
///   | ----^
/// ```
pub fn render_error(error: &Error, source: &str, file_name: &str) -> String {
    let position = error.get_position();
    let (line, line_text, line_pos) = get_line_at_position(source, position.0);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let mut out = String::new();
    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}\n", file_name));
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
