//! Host function registry.
//!
//! Macro code has no standard library: every global function call resolves
//! to a native closure supplied by the embedding program. A host function
//! receives the evaluated arguments and the shared [`Context`], which is its
//! only side-effect channel.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::context::Context;
use crate::value::Value;

/// Error raised by (or on behalf of) a host function.
///
/// It reaches the caller of `run` unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        HostError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Wrong number of arguments for a function with a declared arity.
    pub fn arity(function: &str, expected: usize, found: usize) -> Self {
        HostError::new(format!(
            "{}() expects {} argument{}, got {}",
            function,
            expected,
            if expected == 1 { "" } else { "s" },
            found
        ))
    }

    /// Argument `index` (0-based) has the wrong shape.
    pub fn argument(index: usize, expected: &str, found: &Value) -> Self {
        HostError::new(format!(
            "argument {} must be {}, got {}",
            index + 1,
            expected,
            found.type_name()
        ))
    }
}

/// Signature of a host function.
pub type HostFunction = dyn Fn(&[Value], &mut Context) -> Result<Value, HostError> + Send + Sync;

struct Entry {
    arity: Option<usize>,
    func: Box<HostFunction>,
}

/// Mapping from name to host function, read-only during a run.
///
/// # Examples
///
/// ```
/// use jsonmacro::{HostFunctions, Value, host};
///
/// let functions = HostFunctions::new()
///     .with("addToTotal", |args, ctx| {
///         let n = host::number_arg(args, 0)?;
///         let total = ctx.get("total").and_then(Value::as_number).unwrap_or(0.0);
///         ctx.insert("total", total + n);
///         Ok(Value::Null)
///     })
///     .with_arity("double", 1, |args, _| Ok(Value::from(host::number_arg(args, 0)? * 2.0)));
///
/// assert!(functions.contains("addToTotal"));
/// assert_eq!(functions.len(), 2);
/// ```
#[derive(Default)]
pub struct HostFunctions {
    entries: HashMap<String, Entry>,
}

impl HostFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `func` under `name`, replacing any previous entry. Any
    /// number of arguments is accepted.
    pub fn insert<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(&[Value], &mut Context) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        self.entries.insert(
            name.into(),
            Entry {
                arity: None,
                func: Box::new(func),
            },
        );
    }

    /// Registers `func` under `name` with an exact argument count, checked
    /// before every call.
    pub fn insert_with_arity<F>(&mut self, name: impl Into<String>, arity: usize, func: F)
    where
        F: Fn(&[Value], &mut Context) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        self.entries.insert(
            name.into(),
            Entry {
                arity: Some(arity),
                func: Box::new(func),
            },
        );
    }

    pub fn with<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value], &mut Context) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        self.insert(name, func);
        self
    }

    pub fn with_arity<F>(mut self, name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&[Value], &mut Context) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        self.insert_with_arity(name, arity, func);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Invokes `name`, or returns `None` if it is not registered.
    pub fn call(
        &self,
        name: &str,
        args: &[Value],
        context: &mut Context,
    ) -> Option<Result<Value, HostError>> {
        let entry = self.entries.get(name)?;
        if let Some(arity) = entry.arity
            && arity != args.len()
        {
            return Some(Err(HostError::arity(name, arity, args.len())));
        }
        Some((entry.func)(args, context))
    }
}

impl fmt::Debug for HostFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunctions")
            .field("names", &self.names())
            .finish()
    }
}

// Argument helpers for host function bodies

fn arg(args: &[Value], index: usize) -> Result<&Value, HostError> {
    args.get(index)
        .ok_or_else(|| HostError::new(format!("missing argument {}", index + 1)))
}

pub fn number_arg(args: &[Value], index: usize) -> Result<f64, HostError> {
    let value = arg(args, index)?;
    value
        .as_number()
        .ok_or_else(|| HostError::argument(index, "a number", value))
}

pub fn string_arg(args: &[Value], index: usize) -> Result<&str, HostError> {
    let value = arg(args, index)?;
    value
        .as_str()
        .ok_or_else(|| HostError::argument(index, "a string", value))
}

pub fn bool_arg(args: &[Value], index: usize) -> Result<bool, HostError> {
    let value = arg(args, index)?;
    value
        .as_bool()
        .ok_or_else(|| HostError::argument(index, "a boolean", value))
}

pub fn array_arg(args: &[Value], index: usize) -> Result<&[Value], HostError> {
    let value = arg(args, index)?;
    value
        .as_array()
        .ok_or_else(|| HostError::argument(index, "an array", value))
}
