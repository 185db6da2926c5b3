//! Off-side rule bookkeeping for the scanner.
//!
//! The indentation stack starts as `[0]` and stays strictly increasing from
//! bottom to top. It is only ever touched at the start of a logical line that
//! is outside brackets and strings and that carries content.

use serde::{Deserialize, Serialize};

/// Kind of string literal that can be open across a physical line start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringKind {
    TripleDouble,
    TripleSingle,
}

impl StringKind {
    pub fn delimiter(&self) -> &'static str {
        match self {
            StringKind::TripleDouble => "\"\"\"",
            StringKind::TripleSingle => "'''",
        }
    }
}

/// Minimal scanner state needed to resume scanning at a physical line start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerSnapshot {
    pub indent_stack: Vec<u32>,
    pub bracket_depth: u32,
    pub string: Option<StringKind>,
}

impl Default for ScannerSnapshot {
    fn default() -> Self {
        ScannerSnapshot {
            indent_stack: vec![0],
            bracket_depth: 0,
            string: None,
        }
    }
}

impl ScannerSnapshot {
    /// Scanning can restart from this state at its line start.
    pub fn is_resumable(&self) -> bool {
        self.string.is_none()
    }

    /// Outside every block, bracket and string.
    pub fn is_top_level(&self) -> bool {
        self.indent_stack == [0] && self.bracket_depth == 0 && self.string.is_none()
    }
}

/// Scanner state recorded at the start of a physical line, before any
/// indentation on that line has been evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineState {
    pub offset: u32,
    pub snapshot: ScannerSnapshot,
}

/// Leading whitespace of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indentation {
    pub width: u32,
    /// Byte length of the whitespace run.
    pub len: usize,
    /// Both tabs and spaces occur in the run.
    pub mixed: bool,
}

pub fn measure_indent(line: &str, tab_width: u32) -> Indentation {
    let mut width = 0;
    let mut len = 0;
    let mut seen_space = false;
    let mut seen_tab = false;

    for byte in line.bytes() {
        match byte {
            b' ' => {
                width += 1;
                seen_space = true;
            }
            b'\t' => {
                width += tab_width;
                seen_tab = true;
            }
            b'\x0C' => {}
            _ => break,
        }
        len += 1;
    }

    Indentation {
        width,
        len,
        mixed: seen_space && seen_tab,
    }
}

/// Whether the remainder of a line (after indentation) holds no tokens.
pub fn is_blank_line(rest: &str) -> bool {
    let trimmed = rest.trim_start_matches([' ', '\t', '\x0C', '\r']);
    trimmed.is_empty() || trimmed.starts_with('\n')
}

pub fn is_comment_line(rest: &str) -> bool {
    rest.trim_start_matches([' ', '\t', '\x0C', '\r']).starts_with('#')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentChange {
    Indent,
    Same,
    /// `matched` is false when no enclosing level has exactly the new width.
    Dedent { count: usize, matched: bool },
}

/// Compares `width` against the stack top and updates the stack.
pub fn apply_indent(stack: &mut Vec<u32>, width: u32) -> IndentChange {
    let top = stack.last().copied().unwrap_or(0);

    if width > top {
        stack.push(width);
        return IndentChange::Indent;
    }

    if width == top {
        return IndentChange::Same;
    }

    let mut count = 0;
    while stack.len() > 1 && stack.last().is_some_and(|level| *level > width) {
        stack.pop();
        count += 1;
    }

    IndentChange::Dedent {
        count,
        matched: stack.last().copied().unwrap_or(0) == width,
    }
}
