use crate::ast::Statement;
use crate::error::DecodeError;

/// A compiled program.
///
/// Produced once by [`crate::compile`] (or decoded from its JSON form) and
/// executed any number of times by [`crate::run`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    /// Top-level statements, in execution order
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Program { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Compact tagged-map JSON, e.g. `[{"=":[{"var":["a"]},{"number":[1]}]}]`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Decodes a program previously produced by [`Program::to_json`].
    ///
    /// Unknown discriminants, wrong arities and expression-only nodes in
    /// statement position are rejected.
    pub fn from_json(json: &str) -> Result<Program, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<Vec<Statement>> for Program {
    fn from(statements: Vec<Statement>) -> Self {
        Program { statements }
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}
