//! Error types for compiling and running macro programs.
//!
//! Every error aborts the whole `compile` / `run` call: there is no partial
//! AST and no partial result.

use thiserror::Error;

use crate::host::HostError;

/// Syntax error produced by [`crate::compile`].
///
/// Reports the furthest position any grammar alternative reached, together
/// with every symbol that was tried there.
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "expected {} but {} found at line {line}, column {column}",
    expected_list(.expected),
    found_char(.found)
)]
pub struct ParseError {
    /// Character offset (not byte offset) of the failure
    pub offset: usize,
    /// 1-based line of `offset`
    pub line: usize,
    /// 1-based column of `offset`
    pub column: usize,
    /// Sorted, de-duplicated symbols accepted at `offset`
    pub expected: Vec<String>,
    /// Character found at `offset`, `None` at end of input
    pub found: Option<char>,
}

fn expected_list(expected: &[String]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

fn found_char(found: &Option<char>) -> String {
    match found {
        Some(ch) => format!("{ch:?}"),
        None => "end of input".to_string(),
    }
}

/// Failure to decode a program from its JSON wire form.
#[derive(Error, Debug)]
#[error("invalid program encoding: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Errors raised while running a program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunError {
    /// Read of a variable that was never assigned
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    /// Call of a name missing from the host function table
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// Binary operator applied to operands it does not accept
    #[error("cannot apply '{op}' to {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// Property that the receiver does not expose
    #[error("{type_name} has no property '{name}'")]
    UnknownProperty {
        type_name: &'static str,
        name: String,
    },

    /// Method that the receiver does not implement
    #[error("{type_name} has no method '{name}'")]
    UnknownMethod {
        type_name: &'static str,
        name: String,
    },

    /// Built-in method called with unusable arguments
    #[error(".{method}() {message}")]
    MethodArgument {
        method: &'static str,
        message: String,
    },

    /// Error returned by a host function, surfaced as is
    #[error(transparent)]
    Host(#[from] HostError),
}
