//! Coercion Tests
//!
//! Host values of every accepted shape become well-formed terms, and the
//! failures that remain carry the offending shape and its position.

mod common;

use common::wire;
use pretty_assertions::assert_eq;
use reql_term::{
    r, Arguments, CoerceOptions, Datum, Error, Lambda, OptArgs, Term, TermType, TermWalk, Value,
};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};

fn coercion_error(result: reql_term::Result<Term>) -> (&'static str, String) {
    match result {
        Err(Error::Coercion { shape, path, .. }) => (shape, path),
        other => panic!("expected coercion error, got {other:?}"),
    }
}

#[test]
fn test_every_child_is_a_term() {
    let term = Term::new(
        TermType::INSERT,
        Arguments::new()
            .arg(r::table("t").unwrap())
            .arg(Value::object([
                ("name", Value::from("ada")),
                ("tags", Value::from(vec!["x", "y"])),
                ("age", Value::from(36)),
                ("nick", Value::from(None::<String>)),
            ])),
        Some(OptArgs::new().with("return_changes", true)),
    )
    .unwrap();

    assert_eq!(term.node_count(), 11);
    assert_eq!(
        wire(&term),
        json!([56, [[15, ["t"]], [3, [], {
            "age": 36,
            "name": "ada",
            "nick": null,
            "tags": [2, ["x", "y"]]
        }]], {"return_changes": true}])
    );
}

#[test]
fn test_map_types_coerce_to_objects() {
    let mut hash = HashMap::new();
    hash.insert("k".to_string(), 1);
    let mut tree = BTreeMap::new();
    tree.insert("b", 2.5);
    tree.insert("a", 1.5);

    assert_eq!(wire(&r::expr(hash).unwrap()), json!([3, [], {"k": 1}]));
    assert_eq!(
        wire(&r::expr(tree).unwrap()),
        json!([3, [], {"a": 1.5, "b": 2.5}])
    );
}

#[test]
fn test_option_and_unit_become_null() {
    assert_eq!(r::expr(None::<i32>).unwrap().as_datum(), Some(&Datum::Null));
    assert_eq!(r::expr(Some(4)).unwrap().as_datum(), Some(&Datum::Number(4.into())));
    assert_eq!(r::expr(()).unwrap().as_datum(), Some(&Datum::Null));
}

#[test]
fn test_duplicate_object_key_last_wins() {
    let term = r::expr(Value::object([("k", 1), ("k", 2)])).unwrap();
    assert_eq!(wire(&term), json!([3, [], {"k": 2}]));
}

#[test]
fn test_duplicate_option_last_wins() {
    let options = OptArgs::new().with("index", "a").with("index", "b");
    assert_eq!(options.len(), 1);
    let term = r::table("t").unwrap().get_all_opts([1], options).unwrap();
    assert_eq!(wire(&term)[2], json!({"index": "b"}));
}

#[test]
fn test_nan_reports_shape_and_path() {
    let nested = Value::array([Value::from(1), Value::object([("score", f64::NAN)])]);
    let result = Term::new(TermType::ZIP, Arguments::single(nested), None);
    let (shape, path) = coercion_error(result);
    assert_eq!(shape, "float");
    assert_eq!(path, "args[0][1].score");
}

#[test]
fn test_infinite_option_reports_option_path() {
    let result = r::table_opts("t", OptArgs::new().with("limit", f64::INFINITY));
    let (_, path) = coercion_error(result);
    assert_eq!(path, "optargs.limit");
}

#[test]
fn test_function_body_error_path() {
    let result = r::expr(Lambda::unary(|x| x.add(f64::NEG_INFINITY)));
    match result {
        Err(Error::Coercion { path, .. }) => assert_eq!(path, "args[0].body.args[1]"),
        other => panic!("expected coercion error, got {other:?}"),
    }
}

#[test]
fn test_nesting_depth_is_configurable() {
    let mut value = Value::from("leaf");
    for _ in 0..25 {
        value = Value::Array(vec![value]);
    }
    let (shape, _) = coercion_error(r::expr(value));
    assert_eq!(shape, "array");

    let mut value = Value::from("leaf");
    for _ in 0..25 {
        value = Value::Array(vec![value]);
    }
    let deep = r::expr_with(value, CoerceOptions { nesting_depth: 64 }).unwrap();
    assert_eq!(deep.node_count(), 26);
}

#[test]
fn test_depth_counts_from_each_argument() {
    let mut value = Value::from(1);
    for _ in 0..10 {
        value = Value::Array(vec![value]);
    }
    let inner = r::expr(value).unwrap();
    // Already-built terms are attached as-is and do not count again.
    let mut outer = Value::Term(inner);
    for _ in 0..10 {
        outer = Value::Array(vec![outer]);
    }
    assert!(r::expr(outer).is_ok());
}

#[test]
fn test_implicit_var_inside_function_is_bound() {
    let lambda = Lambda::unary(|_| r::row().get_field("x"));
    let term = r::expr(lambda).unwrap();
    assert!(!term.contains_implicit_var());
    assert!(term.any_node(|t| t.tag() == TermType::IMPLICIT_VAR));
}
