//! Syntax builder.
//!
//! This module turns the layout scanner's token stream into the syntax tree.
//! It uses a Pratt parser for expressions with explicit binding powers and
//! handles:
//!
//! - Statement parsing (imports, declarations, definitions, control flow)
//! - Suites, both indented blocks and statements on the header line
//! - Type annotations and `[...]` parameter lists
//! - Error recovery at statement boundaries and cooperative cancellation
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod recovery;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
