use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    ast::{BinOp, Expr, Program, Statement},
    context::Context,
    error::RunError,
    host::HostFunctions,
    methods,
    value::Value,
};

/// Tree-walking interpreter for one run of a program.
///
/// Holds the variable registry and the context for the duration of the run.
/// The registry is flat: assignments, loop bindings and reads all share one
/// namespace, and a loop variable keeps its last value after the loop.
pub struct Interpreter<'f> {
    /// Variables assigned so far (`name = ...` and `for each name in ...`)
    registry: HashMap<String, Value>,
    functions: &'f HostFunctions,
    context: Context,
}

impl<'f> Interpreter<'f> {
    pub fn new(functions: &'f HostFunctions, context: Context) -> Self {
        Interpreter {
            registry: HashMap::new(),
            functions,
            context,
        }
    }

    /// Current value of a variable, if it was ever assigned.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.registry.get(name)
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn into_context(self) -> Context {
        self.context
    }

    /// Executes every statement of `program` in order. The first error
    /// aborts the run.
    pub fn exec_program(&mut self, program: &Program) -> Result<(), RunError> {
        self.exec_block(&program.statements)
    }

    fn exec_block(&mut self, statements: &[Statement]) -> Result<(), RunError> {
        for stmt in statements {
            self.exec_statement(stmt)?;
        }
        Ok(())
    }

    fn exec_statement(&mut self, stmt: &Statement) -> Result<(), RunError> {
        trace!(statement = stmt.discriminant(), "exec");

        match stmt {
            Statement::Assign { name, value } => {
                let value = self.eval_expr(value)?;
                self.registry.insert(name.clone(), value);
            }
            Statement::Func { name, args } => {
                self.call_function(name, args)?;
            }
            Statement::Call { base, method, args } => {
                self.call_method(base, method, args)?;
            }
            Statement::If {
                predicate,
                then,
                otherwise,
            } => {
                if self.eval_expr(predicate)?.is_truthy() {
                    self.exec_block(then)?;
                } else {
                    self.exec_block(otherwise)?;
                }
            }
            Statement::ForEach {
                binding,
                iterable,
                body,
            } => {
                // Anything but a list runs the body zero times
                if let Value::Array(items) = self.eval_expr(iterable)? {
                    for item in items {
                        self.registry.insert(binding.clone(), item);
                        self.exec_block(body)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RunError> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::String(s) => Ok(Value::String(s.clone())),
            Expr::Boolean(b) => Ok(Value::Boolean(*b)),
            Expr::Array(exprs) => {
                let mut arr = Vec::with_capacity(exprs.len());
                for expr in exprs {
                    arr.push(self.eval_expr(expr)?);
                }
                Ok(Value::Array(arr))
            }
            Expr::Var(name) => self
                .registry
                .get(name)
                .cloned()
                .ok_or_else(|| RunError::UndefinedVariable(name.clone())),
            Expr::Prop { base, name } => {
                let object = self.eval_expr(base)?;
                methods::get_property(&object, name)
            }
            Expr::Call { base, method, args } => self.call_method(base, method, args),
            Expr::Func { name, args } => self.call_function(name, args),
            Expr::BinaryOp { op, left, right } => {
                // Both operands are always evaluated, `and`/`or` included
                let left_val = self.eval_expr(left)?;
                let right_val = self.eval_expr(right)?;
                apply_binop(*op, &left_val, &right_val)
            }
            Expr::Not(operand) => Ok(Value::Boolean(!self.eval_expr(operand)?.is_truthy())),
        }
    }

    fn eval_args(&mut self, args: &[Expr]) -> Result<Vec<Value>, RunError> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    fn call_function(&mut self, name: &str, args: &[Expr]) -> Result<Value, RunError> {
        if !self.functions.contains(name) {
            return Err(RunError::UnknownFunction(name.to_string()));
        }
        let args = self.eval_args(args)?;
        trace!(function = name, args = args.len(), "host call");

        match self.functions.call(name, &args, &mut self.context) {
            Some(result) => Ok(result?),
            None => Err(RunError::UnknownFunction(name.to_string())),
        }
    }

    fn call_method(&mut self, base: &Expr, method: &str, args: &[Expr]) -> Result<Value, RunError> {
        let object = self.eval_expr(base)?;
        let args = self.eval_args(args)?;
        methods::call_method(&object, method, &args)
    }
}

fn apply_binop(op: BinOp, left: &Value, right: &Value) -> Result<Value, RunError> {
    let mismatch = || RunError::TypeMismatch {
        op: op.symbol(),
        left: left.type_name(),
        right: right.type_name(),
    };

    match op {
        BinOp::Equal => Ok(Value::Boolean(left == right)),
        BinOp::NotEqual => Ok(Value::Boolean(left != right)),
        BinOp::And => Ok(Value::Boolean(left.is_truthy() && right.is_truthy())),
        BinOp::Or => Ok(Value::Boolean(left.is_truthy() || right.is_truthy())),
        BinOp::Add => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            _ => Err(mismatch()),
        },
        BinOp::Subtract | BinOp::Multiply | BinOp::Divide => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(match op {
                BinOp::Subtract => a - b,
                BinOp::Multiply => a * b,
                // IEEE: x/0 is infinite, 0/0 is NaN
                _ => a / b,
            })),
            _ => Err(mismatch()),
        },
        BinOp::LessThan | BinOp::LessEqual | BinOp::GreaterThan | BinOp::GreaterEqual => {
            let ordering = match (left, right) {
                (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                _ => return Err(mismatch()),
            };
            // NaN compares false against everything
            let result = ordering.is_some_and(|ord| match op {
                BinOp::LessThan => ord.is_lt(),
                BinOp::LessEqual => ord.is_le(),
                BinOp::GreaterThan => ord.is_gt(),
                _ => ord.is_ge(),
            });
            Ok(Value::Boolean(result))
        }
    }
}

/// Runs `program` against `functions`, starting from an empty context.
///
/// Returns the context as left by the host functions. Variables assigned by
/// the program are discarded when the run ends.
///
/// # Examples
///
/// ```
/// use jsonmacro::{HostFunctions, Value, host};
///
/// let program = jsonmacro::compile(
///     "a = 1 + 1 if a then for each i in [1,2,3] do addToTotal(a+i) end end",
/// ).unwrap();
///
/// let functions = HostFunctions::new().with("addToTotal", |args, ctx| {
///     let n = host::number_arg(args, 0)?;
///     let total = ctx.get("total").and_then(Value::as_number).unwrap_or(0.0);
///     ctx.insert("total", total + n);
///     Ok(Value::Null)
/// });
///
/// let context = jsonmacro::run(&program, &functions).unwrap();
/// assert_eq!(context.get("total"), Some(&Value::from(12)));
/// ```
pub fn run(program: &Program, functions: &HostFunctions) -> Result<Context, RunError> {
    run_with_context(program, functions, Context::new())
}

/// Like [`run`], but the host functions see `context` as the initial state.
pub fn run_with_context(
    program: &Program,
    functions: &HostFunctions,
    context: Context,
) -> Result<Context, RunError> {
    debug!(
        statements = program.len(),
        context = context.len(),
        "run started"
    );

    let mut interpreter = Interpreter::new(functions, context);
    match interpreter.exec_program(program) {
        Ok(()) => {
            let context = interpreter.into_context();
            debug!(context = context.len(), "run finished");
            Ok(context)
        }
        Err(e) => {
            debug!(error = %e, "run failed");
            Err(e)
        }
    }
}
