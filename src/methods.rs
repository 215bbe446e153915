//! Property access and method dispatch on runtime values.
//!
//! `prop` and `call` nodes evaluate their base and hand the result to this
//! module; what a property or method means is decided entirely by the type
//! of the receiver.

use std::cmp::Ordering;

use regex::Regex;

use crate::error::RunError;
use crate::value::Value;

/// Reads property `name` of `base`.
///
/// Objects expose their fields (a missing field reads as `null`); strings
/// and arrays expose `length`.
pub fn get_property(base: &Value, name: &str) -> Result<Value, RunError> {
    match (base, name) {
        (Value::Object(map), _) => Ok(map.get(name).cloned().unwrap_or(Value::Null)),
        (Value::Array(arr), "length") => Ok(Value::Number(arr.len() as f64)),
        (Value::String(s), "length") => Ok(Value::Number(s.chars().count() as f64)),
        _ => Err(RunError::UnknownProperty {
            type_name: base.type_name(),
            name: name.to_string(),
        }),
    }
}

/// Calls method `method` on `object` with already evaluated arguments.
pub fn call_method(object: &Value, method: &str, args: &[Value]) -> Result<Value, RunError> {
    match (object, method) {
        // Type method (works on any value)
        (_, "type") => Ok(Value::String(object.type_name().to_string())),

        // Array methods
        (Value::Array(arr), "count" | "length") => Ok(Value::Number(arr.len() as f64)),
        (Value::Array(arr), "first") => Ok(arr.first().cloned().unwrap_or(Value::Null)),
        (Value::Array(arr), "last") => Ok(arr.last().cloned().unwrap_or(Value::Null)),
        (Value::Array(arr), "sum") => method_sum(arr),
        (Value::Array(arr), "min") => method_extreme(arr, "min", Ordering::Less),
        (Value::Array(arr), "max") => method_extreme(arr, "max", Ordering::Greater),
        (Value::Array(arr), "reverse") => Ok(Value::Array(arr.iter().rev().cloned().collect())),
        (Value::Array(arr), "unique") => Ok(method_unique(arr)),
        (Value::Array(arr), "sort") => method_sort(arr),
        (Value::Array(arr), "contains") => {
            let needle = required_arg(args, "contains")?;
            Ok(Value::Boolean(arr.contains(needle)))
        }
        (Value::Array(arr), "join") => method_join(arr, args),

        // String methods
        (Value::String(s), "length") => Ok(Value::Number(s.chars().count() as f64)),
        (Value::String(s), "upper") => Ok(Value::String(s.to_uppercase())),
        (Value::String(s), "lower") => Ok(Value::String(s.to_lowercase())),
        (Value::String(s), "trim") => Ok(Value::String(s.trim().to_string())),
        (Value::String(s), "contains") => {
            let sub = string_arg(args, "contains")?;
            Ok(Value::Boolean(s.contains(sub)))
        }
        (Value::String(s), "startswith") => {
            let prefix = string_arg(args, "startswith")?;
            Ok(Value::Boolean(s.starts_with(prefix)))
        }
        (Value::String(s), "endswith") => {
            let suffix = string_arg(args, "endswith")?;
            Ok(Value::Boolean(s.ends_with(suffix)))
        }
        (Value::String(s), "split") => {
            let separator = string_arg(args, "split")?;
            Ok(Value::Array(
                s.split(separator)
                    .map(|part| Value::String(part.to_string()))
                    .collect(),
            ))
        }
        (Value::String(s), "matches") => method_matches(s, args),

        // Object methods
        (Value::Object(map), "keys") => Ok(Value::Array(
            map.keys().map(|k| Value::String(k.clone())).collect(),
        )),
        (Value::Object(map), "values") => Ok(Value::Array(map.values().cloned().collect())),
        (Value::Object(map), "has") => {
            let key = string_arg(args, "has")?;
            Ok(Value::Boolean(map.contains_key(key)))
        }

        _ => Err(RunError::UnknownMethod {
            type_name: object.type_name(),
            name: method.to_string(),
        }),
    }
}

fn required_arg<'a>(args: &'a [Value], method: &'static str) -> Result<&'a Value, RunError> {
    args.first().ok_or_else(|| RunError::MethodArgument {
        method,
        message: "requires an argument".to_string(),
    })
}

fn string_arg<'a>(args: &'a [Value], method: &'static str) -> Result<&'a str, RunError> {
    let arg = required_arg(args, method)?;
    arg.as_str().ok_or_else(|| RunError::MethodArgument {
        method,
        message: format!("argument must be string, got {}", arg.type_name()),
    })
}

fn numbers(arr: &[Value], method: &'static str) -> Result<Vec<f64>, RunError> {
    arr.iter()
        .map(|item| {
            item.as_number().ok_or_else(|| RunError::MethodArgument {
                method,
                message: format!("requires numeric values, got {}", item.type_name()),
            })
        })
        .collect()
}

/// .sum() - sums numeric values
fn method_sum(arr: &[Value]) -> Result<Value, RunError> {
    Ok(Value::Number(numbers(arr, "sum")?.into_iter().sum()))
}

/// .min() / .max() - null on an empty array
fn method_extreme(arr: &[Value], method: &'static str, wanted: Ordering) -> Result<Value, RunError> {
    let values = numbers(arr, method)?;
    let extreme = values.into_iter().reduce(|best, n| {
        if n.partial_cmp(&best) == Some(wanted) {
            n
        } else {
            best
        }
    });
    Ok(extreme.map(Value::Number).unwrap_or(Value::Null))
}

/// .unique() - keeps the first occurrence of each value
fn method_unique(arr: &[Value]) -> Value {
    let mut result = Vec::new();
    for item in arr {
        if !result.contains(item) {
            result.push(item.clone());
        }
    }
    Value::Array(result)
}

/// .sort() - ascending; all numbers or all strings
fn method_sort(arr: &[Value]) -> Result<Value, RunError> {
    let mut sorted = arr.to_vec();
    let all_numbers = sorted.iter().all(|v| matches!(v, Value::Number(_)));
    let all_strings = sorted.iter().all(|v| matches!(v, Value::String(_)));

    if !all_numbers && !all_strings {
        return Err(RunError::MethodArgument {
            method: "sort",
            message: "requires all numbers or all strings".to_string(),
        });
    }

    sorted.sort_by(compare_values);
    Ok(Value::Array(sorted))
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

/// .join(separator?) - separator defaults to ","
fn method_join(arr: &[Value], args: &[Value]) -> Result<Value, RunError> {
    let separator = if args.is_empty() {
        ","
    } else {
        string_arg(args, "join")?
    };
    let parts: Vec<String> = arr.iter().map(Value::as_string).collect();
    Ok(Value::String(parts.join(separator)))
}

/// .matches(pattern) - regex match anywhere in the string
fn method_matches(s: &str, args: &[Value]) -> Result<Value, RunError> {
    let pattern = string_arg(args, "matches")?;
    let re = Regex::new(pattern).map_err(|e| RunError::MethodArgument {
        method: "matches",
        message: format!("invalid regex: {e}"),
    })?;
    Ok(Value::Boolean(re.is_match(s)))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn list(items: &[f64]) -> Value {
        Value::Array(items.iter().copied().map(Value::Number).collect())
    }

    #[test]
    fn test_object_properties() {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::from("Alice"));
        let user = Value::Object(map);

        assert_eq!(get_property(&user, "name"), Ok(Value::from("Alice")));
        assert_eq!(get_property(&user, "missing"), Ok(Value::Null));
        assert_eq!(
            get_property(&Value::from(1), "name"),
            Err(RunError::UnknownProperty {
                type_name: "number",
                name: "name".to_string()
            })
        );
    }

    #[test]
    fn test_array_methods() {
        let numbers = list(&[3.0, 1.0, 2.0, 1.0]);
        assert_eq!(call_method(&numbers, "count", &[]), Ok(Value::from(4)));
        assert_eq!(call_method(&numbers, "sum", &[]), Ok(Value::from(7)));
        assert_eq!(call_method(&numbers, "min", &[]), Ok(Value::from(1)));
        assert_eq!(call_method(&numbers, "max", &[]), Ok(Value::from(3)));
        assert_eq!(call_method(&numbers, "sort", &[]), Ok(list(&[1.0, 1.0, 2.0, 3.0])));
        assert_eq!(call_method(&numbers, "unique", &[]), Ok(list(&[3.0, 1.0, 2.0])));
        assert_eq!(call_method(&list(&[]), "max", &[]), Ok(Value::Null));
        assert_eq!(
            call_method(&numbers, "join", &[Value::from("-")]),
            Ok(Value::from("3-1-2-1"))
        );
    }

    #[test]
    fn test_string_methods() {
        let s = Value::from(" a,b ");
        assert_eq!(call_method(&s, "trim", &[]), Ok(Value::from("a,b")));
        assert_eq!(
            call_method(&Value::from("a,b"), "split", &[Value::from(",")]),
            Ok(Value::Array(vec![Value::from("a"), Value::from("b")]))
        );
        assert_eq!(
            call_method(&Value::from("abc123"), "matches", &[Value::from("^[a-z]+\\d+$")]),
            Ok(Value::from(true))
        );
        assert!(matches!(
            call_method(&Value::from("x"), "matches", &[Value::from("(")]),
            Err(RunError::MethodArgument { method: "matches", .. })
        ));
    }

    #[test]
    fn test_unknown_method_names_the_receiver_type() {
        assert_eq!(
            call_method(&Value::from(true), "upper", &[]),
            Err(RunError::UnknownMethod {
                type_name: "boolean",
                name: "upper".to_string()
            })
        );
        assert_eq!(call_method(&Value::Null, "type", &[]), Ok(Value::from("null")));
    }
}
