//! Tagged-map wire encoding of the AST.
//!
//! Every node is a JSON object with exactly one key, the discriminant, whose
//! value is a fixed-arity operand list:
//!
//! ```text
//! {"=": [{"var": ["a"]}, {"+": [{"number": [1]}, {"var": ["b"]}]}]}
//! ```
//!
//! Decoding is strict: unknown discriminants, extra keys, wrong arities and
//! expression-only nodes in statement position are all rejected.

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::ast::{BinOp, Expr, Program, Statement};

/// Largest magnitude at which every whole `f64` is exactly an `i64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Number payload, written as a JSON integer when it is whole.
struct Number(f64);

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let n = self.0;
        if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
            serializer.serialize_i64(n as i64)
        } else {
            serializer.serialize_f64(n)
        }
    }
}

pub(crate) fn serialize_number<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    Number(n).serialize(serializer)
}

/// `{"var": [name]}`, the left operand of an assignment.
struct VarNode<'a>(&'a str);

impl Serialize for VarNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("var", &(self.0,))?;
        map.end()
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        let key = self.discriminant();
        match self {
            Expr::Number(n) => map.serialize_entry(key, &(Number(*n),))?,
            Expr::String(s) => map.serialize_entry(key, &(s,))?,
            Expr::Boolean(b) => map.serialize_entry(key, &(b,))?,
            Expr::Array(elements) => map.serialize_entry(key, elements)?,
            Expr::Var(name) => map.serialize_entry(key, &(name,))?,
            Expr::Prop { base, name } => map.serialize_entry(key, &(base, name))?,
            Expr::Call { base, method, args } => {
                map.serialize_entry(key, &(base, method, args))?
            }
            Expr::Func { name, args } => map.serialize_entry(key, &(name, args))?,
            Expr::BinaryOp { left, right, .. } => map.serialize_entry(key, &(left, right))?,
            Expr::Not(operand) => map.serialize_entry(key, &(operand,))?,
        }
        map.end()
    }
}

impl Serialize for Statement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        let key = self.discriminant();
        match self {
            Statement::Assign { name, value } => {
                map.serialize_entry(key, &(VarNode(name), value))?
            }
            Statement::Func { name, args } => map.serialize_entry(key, &(name, args))?,
            Statement::Call { base, method, args } => {
                map.serialize_entry(key, &(base, method, args))?
            }
            Statement::If {
                predicate,
                then,
                otherwise,
            } => map.serialize_entry(key, &(predicate, then, otherwise))?,
            Statement::ForEach {
                binding,
                iterable,
                body,
            } => map.serialize_entry(key, &(binding, iterable, body))?,
        }
        map.end()
    }
}

impl Serialize for Program {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.statements.serialize(serializer)
    }
}

/// Reads the single discriminant key of a node.
fn read_discriminant<'de, A: MapAccess<'de>>(map: &mut A, what: &str) -> Result<String, A::Error> {
    map.next_key::<String>()?
        .ok_or_else(|| de::Error::custom(format!("{what} node has no discriminant")))
}

fn ensure_single_key<'de, A: MapAccess<'de>>(map: &mut A, what: &str) -> Result<(), A::Error> {
    if map.next_key::<IgnoredAny>()?.is_some() {
        return Err(de::Error::custom(format!(
            "{what} node must have exactly one key"
        )));
    }
    Ok(())
}

struct ExprVisitor;

impl<'de> Visitor<'de> for ExprVisitor {
    type Value = Expr;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a single-key expression node")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Expr, A::Error> {
        let key = read_discriminant(&mut map, "expression")?;
        let expr = match key.as_str() {
            "number" => {
                let (n,): (f64,) = map.next_value()?;
                Expr::Number(n)
            }
            "string" => {
                let (s,): (String,) = map.next_value()?;
                Expr::String(s)
            }
            "boolean" => {
                let (b,): (bool,) = map.next_value()?;
                Expr::Boolean(b)
            }
            "array" => Expr::Array(map.next_value()?),
            "var" => {
                let (name,): (String,) = map.next_value()?;
                Expr::Var(name)
            }
            "prop" => {
                let (base, name): (Expr, String) = map.next_value()?;
                Expr::prop(base, name)
            }
            "call" => {
                let (base, method, args): (Expr, String, Vec<Expr>) = map.next_value()?;
                Expr::call(base, method, args)
            }
            "func" => {
                let (name, args): (String, Vec<Expr>) = map.next_value()?;
                Expr::Func { name, args }
            }
            "not" => {
                let (operand,): (Expr,) = map.next_value()?;
                Expr::not(operand)
            }
            other => match BinOp::from_symbol(other) {
                Some(op) => {
                    let (left, right): (Expr, Expr) = map.next_value()?;
                    Expr::binary(op, left, right)
                }
                None => {
                    return Err(de::Error::custom(format!(
                        "unknown expression discriminant `{other}`"
                    )));
                }
            },
        };
        ensure_single_key(&mut map, "expression")?;
        Ok(expr)
    }
}

impl<'de> Deserialize<'de> for Expr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ExprVisitor)
    }
}

struct StatementVisitor;

impl<'de> Visitor<'de> for StatementVisitor {
    type Value = Statement;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a single-key statement node")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Statement, A::Error> {
        let key = read_discriminant(&mut map, "statement")?;
        let statement = match key.as_str() {
            "=" => {
                let (target, value): (Expr, Expr) = map.next_value()?;
                match target {
                    Expr::Var(name) => Statement::Assign { name, value },
                    other => {
                        return Err(de::Error::custom(format!(
                            "assignment target must be a `var` node, got `{}`",
                            other.discriminant()
                        )));
                    }
                }
            }
            "func" => {
                let (name, args): (String, Vec<Expr>) = map.next_value()?;
                Statement::Func { name, args }
            }
            "call" => {
                let (base, method, args): (Expr, String, Vec<Expr>) = map.next_value()?;
                Statement::Call { base, method, args }
            }
            "if" => {
                let (predicate, then, otherwise): (Expr, Vec<Statement>, Vec<Statement>) =
                    map.next_value()?;
                Statement::If {
                    predicate,
                    then,
                    otherwise,
                }
            }
            "foreach" => {
                let (binding, iterable, body): (String, Expr, Vec<Statement>) =
                    map.next_value()?;
                Statement::ForEach {
                    binding,
                    iterable,
                    body,
                }
            }
            other => {
                return Err(de::Error::custom(format!(
                    "unknown statement discriminant `{other}`"
                )));
            }
        };
        ensure_single_key(&mut map, "statement")?;
        Ok(statement)
    }
}

impl<'de> Deserialize<'de> for Statement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StatementVisitor)
    }
}

impl<'de> Deserialize<'de> for Program {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Statement>::deserialize(deserializer).map(Program::new)
    }
}
