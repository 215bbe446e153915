// Conformance Tests
//
// Whole-language properties: all-or-nothing parsing, fixed node shapes,
// per-run state, and the semantics chosen for the corner cases.

use std::thread;

use jsonmacro::{Context, HostFunctions, Program, RunError, Value, compile, host, run};
use serde_json::Value as Json;

fn counter() -> HostFunctions {
    HostFunctions::new()
        .with("add", |args, ctx| {
            let n = host::number_arg(args, 0)?;
            let total = ctx.get("total").and_then(Value::as_number).unwrap_or(0.0);
            ctx.insert("total", total + n);
            Ok(Value::Null)
        })
        .with("set", |args, ctx| {
            let key = host::string_arg(args, 0)?.to_string();
            ctx.insert(key, args.get(1).cloned().unwrap_or_default());
            Ok(Value::Null)
        })
}

fn run_source(source: &str) -> Result<Context, RunError> {
    run(&compile(source).unwrap(), &counter())
}

/// Walks every node and checks that it is a single-key map with the
/// operand count fixed by its discriminant.
fn check_shape(node: &Json) {
    let map = node.as_object().expect("node is an object");
    assert_eq!(map.len(), 1, "{node}");
    let (key, operands) = map.iter().next().unwrap();
    let operands = operands.as_array().expect("operands are a list");

    let arity = match key.as_str() {
        "var" | "number" | "string" | "boolean" | "not" => Some(1),
        "prop" | "func" | "=" => Some(2),
        "call" | "if" | "foreach" => Some(3),
        "array" => None,
        _ => Some(2),
    };
    if let Some(arity) = arity {
        assert_eq!(operands.len(), arity, "{key}: {node}");
    }

    for operand in operands {
        match operand {
            Json::Object(_) => check_shape(operand),
            Json::Array(items) => items.iter().for_each(check_shape),
            _ => {}
        }
    }
}

#[test]
fn test_every_node_has_a_fixed_arity() {
    let program = compile(
        r#"
        a = [1, "two", true, b.c, d.e(f, g), h(), not i, j == k, l or m and n]
        if a then
          set("x", a.length)
        else if b then
          o.p().q()
        else
          add(1 - 2 * 3 / 4)
        end
        for each z in [] do end
        "#,
    )
    .unwrap();

    let json = serde_json::to_value(&program).unwrap();
    for statement in json.as_array().unwrap() {
        check_shape(statement);
    }
}

#[test]
fn test_compiling_is_deterministic() {
    let source = "a = 8 - 2 - 1 if a then b() else if c then d() end";
    assert_eq!(compile(source).unwrap(), compile(source).unwrap());
    assert_eq!(
        compile(source).unwrap().to_json().unwrap(),
        compile(source).unwrap().to_json().unwrap()
    );
}

#[test]
fn test_subtraction_is_left_associative() {
    let context = run_source(r#"set("r", 8 - 2 - 1)"#).unwrap();
    assert_eq!(context.get("r"), Some(&Value::from(5)));
}

#[test]
fn test_parsing_is_all_or_nothing() {
    // The first two statements are valid, the third is not
    let err = compile("a = 1 b = 2 c = [1,,2]").unwrap_err();
    assert_eq!(err.offset, 19);
}

#[test]
fn test_statements_need_only_whitespace_between_them() {
    let program = compile("set(\"a\", 1)set(\"b\", 2)\n\tadd(1)").unwrap();
    assert_eq!(program.len(), 3);
}

#[test]
fn test_registry_writes_overwrite() {
    let context = run_source(r#"x = 1 x = "two" set("x", x)"#).unwrap();
    assert_eq!(context.get("x"), Some(&Value::from("two")));
}

#[test]
fn test_variables_are_not_part_of_the_result() {
    let context = run_source("secret = 42").unwrap();
    assert!(context.is_empty());
}

#[test]
fn test_context_keys_are_not_variables() {
    let program = compile("add(1) if total then set(\"leak\", true) end").unwrap();
    let functions = counter();

    let err = run(&program, &functions).unwrap_err();
    assert_eq!(err, RunError::UndefinedVariable("total".to_string()));
}

#[test]
fn test_independent_runs_can_execute_concurrently() {
    let program: Program = compile("for each i in [1, 2, 3, 4] do add(i) end").unwrap();
    let functions = counter();

    let results: Vec<Context> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| run(&program, &functions).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for context in results {
        assert_eq!(context.get("total"), Some(&Value::from(10)));
    }
}

#[test]
fn test_foreach_over_non_list_runs_zero_times() {
    for iterable in ["1", "\"abc\"", "true", "m"] {
        let source = format!("m = 0 for each i in {iterable} do add(1) end");
        let context = run_source(&source).unwrap();
        assert!(context.get("total").is_none(), "{iterable}");
    }
}

#[test]
fn test_truthiness() {
    let cases = [
        ("0", false),
        ("1", true),
        ("-0.5", true),
        ("0 / 0", false),
        ("\"\"", false),
        ("\"0\"", true),
        ("[]", true),
        ("false", false),
    ];
    for (expr, expected) in cases {
        let source = format!("if {expr} then set(\"t\", true) else set(\"t\", false) end");
        let context = run_source(&source).unwrap();
        assert_eq!(context.get("t"), Some(&Value::from(expected)), "{expr}");
    }
}

#[test]
fn test_host_functions_receive_evaluated_arguments() {
    let context = run_source(r#"a = 3 set("sum", a * 2 + 1) set("list", [a, "b"])"#).unwrap();
    assert_eq!(context.get("sum"), Some(&Value::from(7)));
    assert_eq!(
        context.get("list"),
        Some(&Value::Array(vec![Value::from(3), Value::from("b")]))
    );
    assert_eq!(context.to_json(), r#"{"list":[3,"b"],"sum":7}"#);
}
