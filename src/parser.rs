use tracing::debug;

use crate::{
    ast::{BinOp, Expr, Program, Statement},
    error::ParseError,
    lexer::Lexer,
};

/// Marker for a failed grammar alternative.
///
/// What was expected and where lives in the lexer, which turns it into a
/// [`ParseError`] once the whole parse has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stop;

type PResult<T> = Result<T, Stop>;

/// How a binary operator is written in source.
#[derive(Clone, Copy)]
enum Spelling {
    Symbol,
    Word,
}

const OR_LEVEL: &[(BinOp, Spelling)] = &[(BinOp::Or, Spelling::Word)];
const AND_LEVEL: &[(BinOp, Spelling)] = &[(BinOp::And, Spelling::Word)];
const EQUALITY_LEVEL: &[(BinOp, Spelling)] = &[
    (BinOp::Equal, Spelling::Symbol),
    (BinOp::NotEqual, Spelling::Symbol),
];
// Two-character operators first so `<=` is not read as `<`.
const RELATION_LEVEL: &[(BinOp, Spelling)] = &[
    (BinOp::LessEqual, Spelling::Symbol),
    (BinOp::GreaterEqual, Spelling::Symbol),
    (BinOp::LessThan, Spelling::Symbol),
    (BinOp::GreaterThan, Spelling::Symbol),
];
const SUM_LEVEL: &[(BinOp, Spelling)] = &[
    (BinOp::Add, Spelling::Symbol),
    (BinOp::Subtract, Spelling::Symbol),
];
const PRODUCT_LEVEL: &[(BinOp, Spelling)] = &[
    (BinOp::Multiply, Spelling::Symbol),
    (BinOp::Divide, Spelling::Symbol),
];

pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Parser { lexer }
    }

    /// Parse a whole program. Empty or all-whitespace input yields an empty
    /// program.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        self.program().map_err(|Stop| self.lexer.error())
    }

    fn program(&mut self) -> PResult<Program> {
        let statements = self.parse_statements(&[])?;
        if !self.lexer.is_at_end() {
            self.lexer.expected("end of input");
            return Err(Stop);
        }
        Ok(Program::new(statements))
    }

    /// Parse statements until end of input or one of `terminators`.
    ///
    /// Statements are separated by whitespace only. The terminator itself
    /// is left for the caller.
    fn parse_statements(&mut self, terminators: &[&str]) -> PResult<Vec<Statement>> {
        let mut statements = vec![];

        loop {
            self.lexer.skip_whitespace();
            if self.lexer.is_at_end() || terminators.iter().any(|kw| self.lexer.check_keyword(kw))
            {
                break;
            }
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> PResult<Statement> {
        if self.lexer.eat_keyword("if") {
            return self.parse_if();
        }
        if self.lexer.eat_keyword("for") {
            return self.parse_for_each();
        }

        let name = self.lexer.read_identifier().ok_or(Stop)?;
        let after_name = self.lexer.position();

        // identifier '=' !'=' expression
        self.lexer.skip_whitespace();
        if self.lexer.eat_assign() {
            self.lexer.skip_whitespace();
            let value = self.parse_expression()?;
            return Ok(Statement::Assign { name, value });
        }
        self.lexer.reset(after_name);

        // Call statements: `(` or `.` must follow the name directly
        if self.lexer.eat_char('(') {
            let args = self.parse_element_list(')')?;
            return Ok(Statement::Func { name, args });
        }

        match self.parse_chain(Expr::Var(name))? {
            Expr::Call { base, method, args } => Ok(Statement::Call {
                base: *base,
                method,
                args,
            }),
            // A bare variable or a chain ending in a property has no effect
            _ => Err(Stop),
        }
    }

    /// `if <expr> then <statements> (else <if> | else <statements> end | end)`
    ///
    /// `else if` is a nested `if` that owns the closing `end`.
    fn parse_if(&mut self) -> PResult<Statement> {
        self.lexer.skip_whitespace();
        let predicate = self.parse_expression()?;
        self.lexer.skip_whitespace();
        self.expect_keyword("then")?;

        let then = self.parse_statements(&["else", "end"])?;

        let otherwise = if self.lexer.eat_keyword("else") {
            self.lexer.skip_whitespace();
            if self.lexer.eat_keyword("if") {
                vec![self.parse_if()?]
            } else {
                let statements = self.parse_statements(&["end"])?;
                self.expect_keyword("end")?;
                statements
            }
        } else {
            self.expect_keyword("end")?;
            vec![]
        };

        Ok(Statement::If {
            predicate,
            then,
            otherwise,
        })
    }

    /// `for each <identifier> in <term> do <statements> end`
    fn parse_for_each(&mut self) -> PResult<Statement> {
        self.lexer.skip_whitespace();
        self.expect_keyword("each")?;
        self.lexer.skip_whitespace();
        let binding = self.lexer.read_identifier().ok_or(Stop)?;
        self.lexer.skip_whitespace();
        self.expect_keyword("in")?;
        self.lexer.skip_whitespace();
        // Restriction: the iterable is a single term, not a full expression
        let iterable = self.parse_term()?;
        self.lexer.skip_whitespace();
        self.expect_keyword("do")?;

        let body = self.parse_statements(&["end"])?;
        self.expect_keyword("end")?;

        Ok(Statement::ForEach {
            binding,
            iterable,
            body,
        })
    }

    fn expect_keyword(&mut self, keyword: &str) -> PResult<()> {
        if self.lexer.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(Stop)
        }
    }

    fn expect_char(&mut self, ch: char) -> PResult<()> {
        if self.lexer.eat_char(ch) {
            Ok(())
        } else {
            Err(Stop)
        }
    }

    fn parse_expression(&mut self) -> PResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> PResult<Expr> {
        self.parse_binary_level(OR_LEVEL, Self::parse_and)
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        self.parse_binary_level(AND_LEVEL, Self::parse_equality)
    }

    fn parse_equality(&mut self) -> PResult<Expr> {
        self.parse_binary_level(EQUALITY_LEVEL, Self::parse_relation)
    }

    fn parse_relation(&mut self) -> PResult<Expr> {
        self.parse_binary_level(RELATION_LEVEL, Self::parse_sum)
    }

    fn parse_sum(&mut self) -> PResult<Expr> {
        self.parse_binary_level(SUM_LEVEL, Self::parse_product)
    }

    fn parse_product(&mut self) -> PResult<Expr> {
        self.parse_binary_level(PRODUCT_LEVEL, Self::parse_not)
    }

    /// Parse one head operand and then any number of `(operator, operand)`
    /// pairs, folding them to the left: `a - b - c` is `(a - b) - c`.
    fn parse_binary_level(
        &mut self,
        operators: &[(BinOp, Spelling)],
        next: fn(&mut Self) -> PResult<Expr>,
    ) -> PResult<Expr> {
        let mut left = next(self)?;

        loop {
            let before = self.lexer.position();
            self.lexer.skip_whitespace();

            let Some(op) = self.eat_operator(operators) else {
                // Whitespace belongs to whatever comes next
                self.lexer.reset(before);
                break;
            };

            self.lexer.skip_whitespace();
            let right = next(self)?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn eat_operator(&mut self, operators: &[(BinOp, Spelling)]) -> Option<BinOp> {
        operators.iter().find_map(|&(op, spelling)| {
            let matched = match spelling {
                Spelling::Symbol => self.lexer.eat_symbol(op.symbol()),
                Spelling::Word => self.lexer.eat_keyword(op.symbol()),
            };
            matched.then_some(op)
        })
    }

    /// `not` binds tighter than every binary operator.
    fn parse_not(&mut self) -> PResult<Expr> {
        if self.lexer.eat_keyword("not") {
            self.lexer.skip_whitespace();
            let operand = self.parse_not()?;
            return Ok(Expr::not(operand));
        }
        self.parse_term()
    }

    /// Parse terms (atoms), in order: signed number, boolean, call or
    /// variable chain, array, string, parenthesized expression.
    fn parse_term(&mut self) -> PResult<Expr> {
        if let Some(n) = self.lexer.read_number() {
            return Ok(Expr::Number(n));
        }

        if self.lexer.eat_keyword("true") {
            return Ok(Expr::Boolean(true));
        }
        if self.lexer.eat_keyword("false") {
            return Ok(Expr::Boolean(false));
        }

        if let Some(name) = self.lexer.read_identifier() {
            if self.lexer.eat_char('(') {
                let args = self.parse_element_list(')')?;
                return Ok(Expr::Func { name, args });
            }
            return self.parse_chain(Expr::Var(name));
        }

        if self.lexer.eat_char('[') {
            let elements = self.parse_element_list(']')?;
            return Ok(Expr::Array(elements));
        }

        if let Some(s) = self.lexer.read_string() {
            return Ok(Expr::String(s));
        }

        if self.lexer.eat_char('(') {
            self.lexer.skip_whitespace();
            let expr = self.parse_expression()?;
            self.lexer.skip_whitespace();
            self.expect_char(')')?;
            return Ok(expr);
        }

        Err(Stop)
    }

    /// Fold `.name` and `.name(args)` suffixes onto `base`, left to right.
    fn parse_chain(&mut self, mut base: Expr) -> PResult<Expr> {
        while self.lexer.eat_char('.') {
            let name = self.lexer.read_identifier().ok_or(Stop)?;

            base = if self.lexer.eat_char('(') {
                let args = self.parse_element_list(')')?;
                Expr::call(base, name, args)
            } else {
                Expr::prop(base, name)
            };
        }
        Ok(base)
    }

    /// Comma-separated expressions up to `close`; the opening delimiter is
    /// already consumed. Empty lists are allowed, elisions are not.
    fn parse_element_list(&mut self, close: char) -> PResult<Vec<Expr>> {
        let mut elements = vec![];
        self.lexer.skip_whitespace();

        if self.lexer.eat_char(close) {
            return Ok(elements);
        }

        elements.push(self.parse_expression()?);
        loop {
            self.lexer.skip_whitespace();
            if !self.lexer.eat_char(',') {
                break;
            }
            self.lexer.skip_whitespace();
            elements.push(self.parse_expression()?);
        }

        self.expect_char(close)?;
        Ok(elements)
    }
}

/// Compile macro source text into a [`Program`].
///
/// Parsing is all or nothing: either the whole text is a valid program or a
/// single [`ParseError`] describes the furthest point the grammar reached.
///
/// # Examples
///
/// ```
/// let program = jsonmacro::compile("a = 8 + 2 * 1").unwrap();
/// assert_eq!(
///     program.to_json().unwrap(),
///     r#"[{"=":[{"var":["a"]},{"+":[{"number":[8]},{"*":[{"number":[2]},{"number":[1]}]}]}]}]"#
/// );
///
/// assert!(jsonmacro::compile("a = [1,,2]").is_err());
/// ```
pub fn compile(source: &str) -> Result<Program, ParseError> {
    let mut parser = Parser::new(Lexer::new(source));
    match parser.parse_program() {
        Ok(program) => {
            debug!(
                statements = program.len(),
                chars = source.chars().count(),
                "compiled program"
            );
            Ok(program)
        }
        Err(e) => {
            debug!(offset = e.offset, expected = ?e.expected, "compile failed");
            Err(e)
        }
    }
}
