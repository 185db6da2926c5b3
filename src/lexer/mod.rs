//! Layout scanner.
//!
//! This module converts source text into the token stream consumed by the
//! parser. It handles:
//!
//! - Tokenization of identifiers, literals, keywords and operators using regex patterns
//! - Off-side rule layout: `Newline`, `Indent` and `Dedent` tokens derived from
//!   leading whitespace, suppressed inside brackets
//! - Comments, collected on the side rather than in the token stream
//! - Scanner state snapshots for resuming a scan mid-document

pub mod layout;
pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
