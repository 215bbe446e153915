use crate::ast::BinOp;

/// Expression node.
///
/// Every variant maps to exactly one wire discriminant with a fixed number
/// of operands, so evaluation can dispatch on the variant alone.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    /// Number literal, always a double
    ///
    /// # Example
    /// ```text
    /// 42
    /// -2.5
    /// .5
    /// ```
    Number(f64),

    /// String literal, taken verbatim between double quotes
    ///
    /// # Example
    /// ```text
    /// "hello"
    /// ```
    String(String),

    /// Boolean literal (`true` / `false`)
    Boolean(bool),

    /// Array literal, elements evaluated eagerly on every read
    ///
    /// # Example
    /// ```text
    /// [1, a + 1, "x"]
    /// ```
    Array(Vec<Expr>),

    // References
    /// Variable read from the registry
    Var(String),

    /// Property access on the value of `base`
    ///
    /// # Example
    /// ```text
    /// user.name
    /// ```
    Prop { base: Box<Expr>, name: String },

    /// Method call on the value of `base`
    ///
    /// # Examples
    /// ```text
    /// items.count()
    /// name.split(",").first()
    /// ```
    Call {
        base: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },

    /// Host function call
    ///
    /// # Example
    /// ```text
    /// addToTotal(a + 1)
    /// ```
    Func { name: String, args: Vec<Expr> },

    // Operations
    /// Binary operation (arithmetic, comparison, logical)
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Logical negation (`not a`)
    Not(Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Expr::String(s.into())
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn prop(base: Expr, name: impl Into<String>) -> Self {
        Expr::Prop {
            base: Box::new(base),
            name: name.into(),
        }
    }

    pub fn call(base: Expr, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            base: Box::new(base),
            method: method.into(),
            args,
        }
    }

    pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Func {
            name: name.into(),
            args,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Expr) -> Self {
        Expr::Not(Box::new(operand))
    }

    /// Wire discriminant of this node.
    pub fn discriminant(&self) -> &'static str {
        match self {
            Expr::Number(_) => "number",
            Expr::String(_) => "string",
            Expr::Boolean(_) => "boolean",
            Expr::Array(_) => "array",
            Expr::Var(_) => "var",
            Expr::Prop { .. } => "prop",
            Expr::Call { .. } => "call",
            Expr::Func { .. } => "func",
            Expr::BinaryOp { op, .. } => op.symbol(),
            Expr::Not(_) => "not",
        }
    }
}
