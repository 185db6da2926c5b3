use crate::Span;

use super::ast::Expr;

// LITERALS

/// Integer Expression
/// Represents an integer literal in the AST, in any radix.
///
/// `text` is the literal as written. `value` is `None` when it does not fit
/// in 64 bits; range checks belong to later stages.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerExpr {
    pub text: String,
    pub value: Option<u64>,
    pub span: Span,
}

/// Float Expression
#[derive(Debug, Clone, PartialEq)]
pub struct FloatExpr {
    pub value: f64,
    pub span: Span,
}

/// String Expression
/// Represents a string literal in the AST. Adjacent literals are joined.
#[derive(Debug, Clone, PartialEq)]
pub struct StringExpr {
    /// The unescaped contents, without quotes.
    pub value: String,
    pub span: Span,
}

impl StringExpr {
    /// Strips the quotes from a raw string token and resolves its escapes.
    ///
    /// Unterminated literals keep whatever text they have.
    pub fn unescape(raw: &str) -> String {
        let quote_len = if raw.starts_with("\"\"\"") || raw.starts_with("'''") {
            3
        } else {
            1
        };
        let delimiter = raw.get(..quote_len).unwrap_or("");
        let body = raw.get(quote_len..).unwrap_or("");
        let body = match body.strip_suffix(delimiter) {
            Some(stripped) if !delimiter.is_empty() => stripped,
            _ => body,
        };

        let mut result = String::new();
        let mut chars = body.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch != '\\' {
                result.push(ch);
                continue;
            }

            match chars.peek().copied() {
                Some('n') => {
                    result.push('\n');
                    chars.next();
                }
                Some('t') => {
                    result.push('\t');
                    chars.next();
                }
                Some('r') => {
                    result.push('\r');
                    chars.next();
                }
                Some('0') => {
                    result.push('\0');
                    chars.next();
                }
                Some(quote @ ('\\' | '"' | '\'')) => {
                    result.push(quote);
                    chars.next();
                }
                Some('\n') => {
                    // Escaped line break inside a triple-quoted literal.
                    chars.next();
                }
                Some('x') => {
                    chars.next();
                    let mut hex = String::new();

                    while hex.len() < 2 {
                        match chars.peek() {
                            Some(digit) if digit.is_ascii_hexdigit() => {
                                hex.push(*digit);
                                chars.next();
                            }
                            _ => break,
                        }
                    }

                    match u8::from_str_radix(&hex, 16) {
                        Ok(byte) => result.push(byte as char),
                        Err(_) => {
                            result.push_str("\\x");
                            result.push_str(&hex);
                        }
                    }
                }
                _ => result.push(ch), // Keep the backslash
            }
        }

        result
    }
}

/// Boolean Expression
/// `True` or `False`.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanExpr {
    pub value: bool,
    pub span: Span,
}

/// `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct NoneExpr {
    pub span: Span,
}

/// Symbol Expression
/// Represents an identifier in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

// COLLECTIONS

#[derive(Debug, Clone, PartialEq)]
pub struct ListExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

/// Tuple Expression
/// Both `(a, b)` and the bare `a, b` form of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictExpr {
    pub entries: Vec<(Expr, Expr)>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

/// Parenthesized Expression
/// Kept as a node so tooling can see the source shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ParenthesizedExpr {
    pub inner: Box<Expr>,
    pub span: Span,
}

// POSTFIX

/// `name=value` in a call argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordArgument {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Positional(Expr),
    Keyword(KeywordArgument),
}

impl Argument {
    pub fn get_span(&self) -> Span {
        match self {
            Argument::Positional(expr) => expr.get_span(),
            Argument::Keyword(keyword) => keyword.span,
        }
    }
}

/// Call Expression
/// Represents a function call in the AST.
///
/// `type_arguments` is set for generic calls such as `f[T](x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub type_arguments: Option<Vec<Argument>>,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

/// Attribute Expression
/// `object.attribute`
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeExpr {
    pub object: Box<Expr>,
    pub attribute: String,
    pub span: Span,
}

/// Subscript Expression
/// `object[index, ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptExpr {
    pub object: Box<Expr>,
    pub indices: Vec<Expr>,
    pub span: Span,
}

/// `lower:upper:step`, only valid as a subscript index.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceExpr {
    pub lower: Option<Box<Expr>>,
    pub upper: Option<Box<Expr>>,
    pub step: Option<Box<Expr>>,
    pub span: Span,
}

/// Transfer Expression
/// `value^`, moving ownership of `value` into its consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferExpr {
    pub value: Box<Expr>,
    pub span: Span,
}

// OPERATORS

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Invert,
    Not,
}

/// Prefix Expression
/// Represents a prefix operation on an expression in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub operator: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    ShiftLeft,
    ShiftRight,
    Add,
    Subtract,
    Multiply,
    Divide,
    FloorDivide,
    Modulo,
    Power,
}

/// Binary Expression
/// Represents a binary operation between two expressions in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOp,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Is,
    IsNot,
    In,
    NotIn,
}

/// Comparison Expression
/// A whole comparison chain: `a < b <= c` has three operands and two operators.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonExpr {
    pub operands: Vec<Expr>,
    pub operators: Vec<ComparisonOp>,
    pub span: Span,
}

/// Conditional Expression
/// `then_value if condition else else_value`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub then_value: Box<Expr>,
    pub condition: Box<Expr>,
    pub else_value: Box<Expr>,
    pub span: Span,
}
