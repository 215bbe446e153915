/// Binary operators.
///
/// Each operator is also the discriminant of its AST node on the wire
/// (`{"+": [left, right]}`), see [`BinOp::symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    // Equality
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,

    // Relation
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Arithmetic
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,

    // Logical
    /// Logical AND (`and`)
    And,
    /// Logical OR (`or`)
    Or,
}

impl BinOp {
    pub const ALL: [BinOp; 12] = [
        BinOp::Equal,
        BinOp::NotEqual,
        BinOp::LessThan,
        BinOp::LessEqual,
        BinOp::GreaterThan,
        BinOp::GreaterEqual,
        BinOp::Add,
        BinOp::Subtract,
        BinOp::Multiply,
        BinOp::Divide,
        BinOp::And,
        BinOp::Or,
    ];

    /// Source spelling, which doubles as the wire discriminant.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Equal => "==",
            BinOp::NotEqual => "!=",
            BinOp::LessThan => "<",
            BinOp::LessEqual => "<=",
            BinOp::GreaterThan => ">",
            BinOp::GreaterEqual => ">=",
            BinOp::Add => "+",
            BinOp::Subtract => "-",
            BinOp::Multiply => "*",
            BinOp::Divide => "/",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<BinOp> {
        BinOp::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
