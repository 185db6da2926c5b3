use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("import", TokenKind::Import);
        map.insert("from", TokenKind::From);
        map.insert("as", TokenKind::As);
        map.insert("var", TokenKind::Var);
        map.insert("alias", TokenKind::Alias);
        map.insert("return", TokenKind::Return);
        map.insert("pass", TokenKind::Pass);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("raise", TokenKind::Raise);
        map.insert("def", TokenKind::Def);
        map.insert("fn", TokenKind::Fn);
        map.insert("struct", TokenKind::Struct);
        map.insert("trait", TokenKind::Trait);
        map.insert("if", TokenKind::If);
        map.insert("elif", TokenKind::Elif);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("while", TokenKind::While);
        map.insert("in", TokenKind::In);
        map.insert("is", TokenKind::Is);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("not", TokenKind::Not);
        map.insert("True", TokenKind::True);
        map.insert("False", TokenKind::False);
        map.insert("None", TokenKind::NoneKw);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,

    // Layout
    Newline,
    Indent,
    Dedent,

    // Never part of the grammar stream, kept in the side list
    Comment,

    Integer,
    Float,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Dot,
    Comma,
    Colon,
    Semicolon,
    Arrow,
    At,

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

    PlusEquals,
    MinusEquals,
    StarEquals,
    StarStarEquals,
    SlashEquals,
    SlashSlashEquals,
    PercentEquals,
    PipeEquals,
    CaretEquals,
    AmpersandEquals,
    ShiftLeftEquals,
    ShiftRightEquals,

    // Reserved
    Import,
    From,
    As,
    Var,
    Alias,
    Return,
    Pass,
    Break,
    Continue,
    Raise,
    Def,
    Fn,
    Struct,
    Trait,
    If,
    Elif,
    Else,
    For,
    While,
    In,
    Is,
    And,
    Or,
    Not,
    True,
    False,
    NoneKw,
}

impl TokenKind {
    /// Layout tokens carry a position but no text.
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::EOF
        )
    }

    pub fn is_augmented_assignment(&self) -> bool {
        matches!(
            self,
            TokenKind::PlusEquals
                | TokenKind::MinusEquals
                | TokenKind::StarEquals
                | TokenKind::StarStarEquals
                | TokenKind::SlashEquals
                | TokenKind::SlashSlashEquals
                | TokenKind::PercentEquals
                | TokenKind::PipeEquals
                | TokenKind::CaretEquals
                | TokenKind::AmpersandEquals
                | TokenKind::ShiftLeftEquals
                | TokenKind::ShiftRightEquals
        )
    }

    /// Whether a token of this kind can begin an operand.
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Integer
                | TokenKind::Float
                | TokenKind::String
                | TokenKind::True
                | TokenKind::False
                | TokenKind::NoneKw
                | TokenKind::OpenParen
                | TokenKind::OpenBracket
                | TokenKind::OpenCurly
                | TokenKind::Plus
                | TokenKind::Dash
                | TokenKind::Tilde
                | TokenKind::Not
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text; empty for layout tokens.
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.value.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}", self.value)
        }
    }
}
