//! Syntax tree.
//!
//! Submodules:
//! - ast: `Module` and the `Stmt`, `Expr` and `Pattern` unions
//! - expressions: one struct per expression kind
//! - statements: one struct per statement kind, plus suites and parameters
//! - types: type annotations and argument conventions
//! - visit: mutable span walk
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
pub mod visit;
