use crate::ast::Expr;

/// Statement node.
///
/// A program is an ordered list of statements; order is execution order.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Variable assignment
    ///
    /// Writes the value of `value` into the registry under `name`.
    ///
    /// # Example
    /// ```text
    /// total = price * 2
    /// ```
    Assign { name: String, value: Expr },

    /// Host function call evaluated for its side effects
    ///
    /// # Example
    /// ```text
    /// addToTotal(1)
    /// ```
    Func { name: String, args: Vec<Expr> },

    /// Method call evaluated for its side effects
    ///
    /// # Example
    /// ```text
    /// items.first().describe()
    /// ```
    Call {
        base: Expr,
        method: String,
        args: Vec<Expr>,
    },

    /// Conditional
    ///
    /// `else if` chains are an `If` as the only statement of `otherwise`.
    ///
    /// # Example
    /// ```text
    /// if a > 1 then big() else if a == 1 then one() else small() end
    /// ```
    If {
        predicate: Expr,
        then: Vec<Statement>,
        otherwise: Vec<Statement>,
    },

    /// Iteration over a list, rebinding `binding` in the shared registry
    ///
    /// # Example
    /// ```text
    /// for each i in [1, 2, 3] do addToTotal(i) end
    /// ```
    ForEach {
        binding: String,
        iterable: Expr,
        body: Vec<Statement>,
    },
}

impl Statement {
    /// Wire discriminant of this node.
    pub fn discriminant(&self) -> &'static str {
        match self {
            Statement::Assign { .. } => "=",
            Statement::Func { .. } => "func",
            Statement::Call { .. } => "call",
            Statement::If { .. } => "if",
            Statement::ForEach { .. } => "foreach",
        }
    }
}
