use std::fmt::Display;

use thiserror::Error;

use crate::{Position, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
        }
    }

    pub fn get_position(&self) -> Position {
        self.span.start
    }

    pub fn get_span(&self) -> Span {
        self.span
    }

    pub fn get_internal(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn shift(&mut self, delta: i64) {
        self.span.shift(delta);
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::InconsistentDedent { .. }
            | ErrorImpl::MixedIndentation
            | ErrorImpl::UnterminatedString
            | ErrorImpl::UnclosedBracket { .. } => ErrorKind::Scan,
            _ => ErrorKind::Syntax,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::InconsistentDedent { .. } | ErrorImpl::MixedIndentation => {
                ErrorCategory::IndentationError
            }
            ErrorImpl::UnterminatedString => ErrorCategory::UnterminatedString,
            ErrorImpl::UnclosedBracket { .. } => ErrorCategory::UnclosedBracket,
            _ => ErrorCategory::UnexpectedToken,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::InconsistentDedent { .. } => "InconsistentDedent",
            ErrorImpl::MixedIndentation => "MixedIndentation",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnclosedBracket { .. } => "UnclosedBracket",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::ExpectedIndentedBlock => "ExpectedIndentedBlock",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::InvalidVariadicParameter { .. } => "InvalidVariadicParameter",
            ErrorImpl::DecoratorWithoutDefinition { .. } => "DecoratorWithoutDefinition",
            ErrorImpl::KeywordArgumentOutsideCall { .. } => "KeywordArgumentOutsideCall",
            ErrorImpl::ConventionNotEnabled { .. } => "ConventionNotEnabled",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::EmptyTypeParameterList => "EmptyTypeParameterList",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::InconsistentDedent { width } => ErrorTip::Suggestion(format!(
                "Indentation of width {} does not match any enclosing block",
                width
            )),
            ErrorImpl::MixedIndentation => ErrorTip::Suggestion(String::from(
                "Indent with either tabs or spaces, not both",
            )),
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("Missing closing quote"))
            }
            ErrorImpl::UnclosedBracket { bracket } => {
                ErrorTip::Suggestion(format!("`{}` is never closed", bracket))
            }
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::ExpectedIndentedBlock => ErrorTip::Suggestion(String::from(
                "Expected an indented block or a statement after `:`",
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::InvalidVariadicParameter { reason } => {
                ErrorTip::Suggestion(format!("Variadic parameters {}", reason))
            }
            ErrorImpl::DecoratorWithoutDefinition { token } => ErrorTip::Suggestion(format!(
                "Decorators must be followed by `def`, `fn`, `struct` or `trait`, found `{}`",
                token
            )),
            ErrorImpl::KeywordArgumentOutsideCall { name } => ErrorTip::Suggestion(format!(
                "Keyword argument `{}` is only allowed in a call argument list",
                name
            )),
            ErrorImpl::ConventionNotEnabled { convention } => ErrorTip::Suggestion(format!(
                "Argument convention `{}` is not enabled by the parser configuration",
                convention
            )),
            ErrorImpl::InvalidAssignmentTarget => ErrorTip::Suggestion(String::from(
                "Only names, tuples, lists, attributes and subscripts can be assigned to",
            )),
            ErrorImpl::EmptyTypeParameterList => ErrorTip::Suggestion(String::from(
                "Parameter lists in `[...]` need at least one parameter",
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.category(),
            self.span.start.0,
            self.span.end.0,
            self.internal_error
        )
    }
}

impl std::error::Error for Error {}

/// Which stage produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Scan,
    Syntax,
}

/// Short machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    IndentationError,
    UnexpectedToken,
    UnterminatedString,
    UnclosedBracket,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::IndentationError => "indentation-error",
            ErrorCategory::UnexpectedToken => "unexpected-token",
            ErrorCategory::UnterminatedString => "unterminated-string",
            ErrorCategory::UnclosedBracket => "unclosed-bracket",
        }
    }
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("indentation does not match any enclosing block (width {width})")]
    InconsistentDedent { width: u32 },
    #[error("inconsistent use of tabs and spaces in indentation")]
    MixedIndentation,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unclosed bracket {bracket:?}")]
    UnclosedBracket { bracket: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("expected an indented block")]
    ExpectedIndentedBlock,
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("invalid variadic parameter: {reason}")]
    InvalidVariadicParameter { reason: String },
    #[error("decorator must precede a definition, found {token:?}")]
    DecoratorWithoutDefinition { token: String },
    #[error("keyword argument {name:?} outside a call argument list")]
    KeywordArgumentOutsideCall { name: String },
    #[error("argument convention {convention:?} is not enabled")]
    ConventionNotEnabled { convention: String },
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("empty type parameter list")]
    EmptyTypeParameterList,
}
