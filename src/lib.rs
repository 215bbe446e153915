pub mod ast;
pub mod context;
pub mod error;
pub mod host;
pub mod interpreter;
pub mod lexer;
pub mod methods;
pub mod parser;
pub mod value;

pub use ast::{BinOp, Expr, Program, Statement};
pub use context::Context;
pub use error::{DecodeError, ParseError, RunError};
pub use host::{HostError, HostFunctions};
pub use interpreter::{Interpreter, run, run_with_context};
pub use lexer::Lexer;
pub use parser::{Parser, compile};
pub use value::Value;
