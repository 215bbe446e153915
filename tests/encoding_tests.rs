// tests/encoding_tests.rs

use jsonmacro::{BinOp, Expr, HostFunctions, Program, Statement, Value, compile, run};
use serde_json::json;

#[test]
fn test_compact_json() {
    let program = compile("a = 8 + 2 * 1").unwrap();
    assert_eq!(
        program.to_json().unwrap(),
        r#"[{"=":[{"var":["a"]},{"+":[{"number":[8]},{"*":[{"number":[2]},{"number":[1]}]}]}]}]"#
    );
}

#[test]
fn test_pretty_json_has_the_same_content() {
    let program = compile("for each i in [1, 2] do f(i) end").unwrap();
    let text = program.to_json_pretty().unwrap();
    let pretty: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(pretty, serde_json::to_value(&program).unwrap());
    assert!(text.contains('\n'));
}

#[test]
fn test_json_round_trip_preserves_the_program() {
    let source = r#"
        a = [1, .5, "s", true, b.c, d.e(1), f()]
        if not a and 1 <= 2 or 3 != 4 then
          x.y().z(a)
        else if a then
          g()
        end
        for each i in a do h(i / 2 - 1) end
    "#;
    let program = compile(source).unwrap();
    let decoded = Program::from_json(&program.to_json().unwrap()).unwrap();
    assert_eq!(decoded, program);
}

#[test]
fn test_decoded_program_runs() {
    let json = r#"[
        {"=": [{"var": ["a"]}, {"+": [{"number": [1]}, {"number": [1]}]}]},
        {"foreach": ["i", {"array": [{"number": [1]}, {"number": [2]}, {"number": [3]}]},
            [{"func": ["add", [{"+": [{"var": ["a"]}, {"var": ["i"]}]}]]}]]}
    ]"#;
    let program = Program::from_json(json).unwrap();

    let functions = HostFunctions::new().with("add", |args, ctx| {
        let total = ctx.get("total").and_then(Value::as_number).unwrap_or(0.0);
        ctx.insert("total", total + args[0].as_number().unwrap());
        Ok(Value::Null)
    });
    let context = run(&program, &functions).unwrap();
    assert_eq!(context.get("total"), Some(&Value::from(12)));
}

#[test]
fn test_hand_built_ast_serializes() {
    let program = Program::new(vec![Statement::If {
        predicate: Expr::binary(BinOp::GreaterEqual, Expr::var("n"), Expr::Number(2.5)),
        then: vec![Statement::Func {
            name: "big".to_string(),
            args: vec![Expr::string("yes")],
        }],
        otherwise: vec![],
    }]);

    assert_eq!(
        serde_json::to_value(&program).unwrap(),
        json!([{"if": [
            {">=": [{"var": ["n"]}, {"number": [2.5]}]},
            [{"func": ["big", [{"string": ["yes"]}]]}],
            []
        ]}])
    );
}

#[test]
fn test_unknown_discriminant_is_rejected() {
    let err = Program::from_json(r#"[{"loop": []}]"#).unwrap_err();
    assert!(
        err.to_string().contains("unknown statement discriminant `loop`"),
        "{err}"
    );

    let err = Program::from_json(r#"[{"func": ["f", [{"%": [{"number": [1]}, {"number": [2]}]}]]}]"#)
        .unwrap_err();
    assert!(
        err.to_string().contains("unknown expression discriminant `%`"),
        "{err}"
    );
}

#[test]
fn test_wrong_arity_is_rejected() {
    assert!(Program::from_json(r#"[{"func": ["f"]}]"#).is_err());
    assert!(Program::from_json(r#"[{"func": ["f", [], []]}]"#).is_err());
    assert!(
        Program::from_json(r#"[{"=": [{"var": ["a"]}, {"+": [{"number": [1]}]}]}]"#).is_err()
    );
    assert!(Program::from_json(r#"[{"=": [{"var": ["a", "b"]}, {"number": [1]}]}]"#).is_err());
}

#[test]
fn test_expression_in_statement_position_is_rejected() {
    assert!(Program::from_json(r#"[{"+": [{"number": [1]}, {"number": [2]}]}]"#).is_err());
    assert!(Program::from_json(r#"[{"var": ["a"]}]"#).is_err());
}

#[test]
fn test_malformed_nodes_are_rejected() {
    // Two keys
    assert!(
        Program::from_json(r#"[{"func": ["f", []], "call": [{"var": ["a"]}, "m", []]}]"#).is_err()
    );
    // No key
    assert!(Program::from_json(r#"[{}]"#).is_err());
    // Assignment to something other than a variable
    let err = Program::from_json(r#"[{"=": [{"number": [1]}, {"number": [2]}]}]"#).unwrap_err();
    assert!(err.to_string().contains("assignment target"), "{err}");
}

#[test]
fn test_non_integral_and_large_numbers() {
    let program = compile("a = 0.1 b = 12345678901234567890").unwrap();
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(json[0]["="][1], json!({"number": [0.1]}));
    assert!(json[1]["="][1]["number"][0].is_f64());
}

#[test]
fn test_every_compiled_number_survives_a_round_trip() {
    let huge = format!("a = {}", "1".repeat(400));
    let err = compile(&huge).unwrap_err();
    assert_eq!(err.offset, 4);
    assert!(err.expected.contains(&"number".to_string()), "{:?}", err.expected);

    // 308 digits still fit in a double
    let program = compile(&format!("a = {}", "9".repeat(308))).unwrap();
    let decoded = Program::from_json(&program.to_json().unwrap()).unwrap();
    assert_eq!(decoded, program);
}
