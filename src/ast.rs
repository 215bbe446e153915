//! # Macro Language - Abstract Syntax Tree
//!
//! A program is a flat list of [`Statement`]s; statements hold [`Expr`]
//! trees. Both are closed sum types: every node kind is one variant, and
//! every variant has exactly one wire discriminant with a fixed arity.
//!
//! - **[expressions]** - literals, variables, property/method chains, host calls, operators
//! - **[statements]** - assignment, calls, `if`, `for each`
//! - **[operators]** - binary operators and their source spelling
//! - **[program]** - the compiled program and its JSON entry points
//! - **[encoding]** - serde impls for the tagged-map wire format
//!
//! ## Wire Format
//!
//! Each node is a single-key map from discriminant to operand list:
//!
//! ```text
//! a = 8 + 2
//! ```
//!
//! ```text
//! [{"=": [{"var": ["a"]}, {"+": [{"number": [8]}, {"number": [2]}]}]}]
//! ```
//!
//! Statement lists (`if` branches, loop bodies) nest as plain arrays:
//!
//! ```text
//! for each i in [1, 2] do add(i) end
//! ```
//!
//! ```text
//! [{"foreach": ["i", {"array": [{"number": [1]}, {"number": [2]}]},
//!                [{"func": ["add", [{"var": ["i"]}]]}]]}]
//! ```
pub mod encoding;
pub mod expressions;
pub mod operators;
pub mod program;
pub mod statements;

pub use expressions::Expr;
pub use operators::BinOp;
pub use program::Program;
pub use statements::Statement;
