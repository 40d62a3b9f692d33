//! Wire Format Tests
//!
//! Bit-exact checks of the positional JSON encoding: the 2- vs 3-element node
//! forms, literal passthrough, repeatability and very deep chains.

mod common;

use common::{table, wire};
use pretty_assertions::assert_eq;
use reql_term::{r, Arguments, Compiler, OptArgs, Query, Term, TermType, Value};
use serde_json::json;

// ============================================================================
// Node shapes
// ============================================================================

mod node_shapes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_zip_over_single_array() {
        let term = Term::new(TermType::ZIP, Arguments::single(vec!["a"]), None).unwrap();
        assert_eq!(wire(&term), json!([72, [[2, ["a"]]]]));
    }

    #[test]
    fn test_zip_over_nested_term() {
        let inner = r::expr(vec![r::expr(Value::object([("left", 1), ("right", 2)])).unwrap()])
            .unwrap();
        let term = inner.zip().unwrap();
        assert_eq!(
            wire(&term),
            json!([72, [[2, [[3, [], {"left": 1, "right": 2}]]]]])
        );
    }

    #[test]
    fn test_empty_options_give_two_elements() {
        let term = r::table_opts("users", OptArgs::new()).unwrap();
        let encoded = wire(&term);
        assert_eq!(encoded.as_array().map(Vec::len), Some(2));
        assert_eq!(encoded, json!([15, ["users"]]));
    }

    #[test]
    fn test_options_give_three_elements() {
        let term = r::table_opts("users", OptArgs::new().with("opt", vec![1, 2])).unwrap();
        let encoded = wire(&term);
        assert_eq!(encoded.as_array().map(Vec::len), Some(3));
        assert_eq!(encoded, json!([15, ["users"], {"opt": [2, [1, 2]]}]));
    }

    #[test]
    fn test_sequence_argument_becomes_make_array() {
        let term = r::expr(vec![1, 2, 3]).unwrap();
        assert_eq!(wire(&term), json!([2, [1, 2, 3]]));
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(wire(&r::expr(Vec::<i32>::new()).unwrap()), json!([2, []]));
        assert_eq!(
            wire(&r::expr(Value::object(Vec::<(String, Value)>::new())).unwrap()),
            json!([3, []])
        );
    }

    #[test]
    fn test_object_keys_in_stable_order() {
        let term = r::expr(Value::object([("z", 1), ("a", 2), ("m", 3)])).unwrap();
        let text = Compiler::new().compile_to_string(&term).unwrap();
        assert_eq!(text, r#"[3,[],{"a":2,"m":3,"z":1}]"#);
    }

    #[test]
    fn test_zero_argument_node() {
        assert_eq!(wire(&r::now().unwrap()), json!([103, []]));
        assert_eq!(wire(&r::row()), json!([13, []]));
    }
}

// ============================================================================
// Literals
// ============================================================================

mod literals {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_scalars_compile_unchanged() {
        assert_eq!(wire(&r::expr(()).unwrap()), json!(null));
        assert_eq!(wire(&r::expr(true).unwrap()), json!(true));
        assert_eq!(wire(&r::expr(-17).unwrap()), json!(-17));
        assert_eq!(wire(&r::expr(2.5).unwrap()), json!(2.5));
        assert_eq!(wire(&r::expr("héllo").unwrap()), json!("héllo"));
    }

    #[test]
    fn test_json_input_is_rebuilt_as_terms() {
        let term = r::expr(json!({"tags": ["a", "b"], "n": null})).unwrap();
        assert_eq!(
            wire(&term),
            json!([3, [], {"n": null, "tags": [2, ["a", "b"]]}])
        );
    }

    proptest! {
        #[test]
        fn prop_integer_identity(n in any::<i64>()) {
            prop_assert_eq!(wire(&r::expr(n).unwrap()), json!(n));
        }

        #[test]
        fn prop_string_identity(s in ".*") {
            prop_assert_eq!(wire(&r::expr(s.as_str()).unwrap()), json!(s));
        }

        #[test]
        fn prop_finite_float_identity(f in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
            prop_assert_eq!(wire(&r::expr(f).unwrap()), json!(f));
        }
    }
}

// ============================================================================
// Functions
// ============================================================================

mod functions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_func_shape() {
        let term = r::expr(r::func1(|x| x.add(1))).unwrap();
        let encoded = wire(&term);
        let id = encoded[1][0][1][0].clone();
        assert!(id.is_u64());
        assert_eq!(
            encoded,
            json!([69, [[2, [id.clone()]], [24, [[10, [id]], 1]]]])
        );
    }

    #[test]
    fn test_parameters_are_distinct() {
        let term = r::expr(r::func2(|a, b| a.sub(b))).unwrap();
        let encoded = wire(&term);
        let params = encoded[1][0][1].as_array().unwrap();
        assert_ne!(params[0], params[1]);
    }
}

// ============================================================================
// Repeatability
// ============================================================================

mod repeatability {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::thread;

    fn sample() -> Term {
        table("posts")
            .filter(r::row().bracket("published").unwrap().eq(true).unwrap())
            .unwrap()
            .order_by_opts(Vec::<Value>::new(), OptArgs::new().with("index", r::desc("date").unwrap()))
            .unwrap()
            .limit(10)
            .unwrap()
    }

    #[test]
    fn test_compile_is_idempotent() {
        let term = sample();
        let compiler = Compiler::new();
        let first = compiler.compile_to_vec(&term).unwrap();
        let second = compiler.compile_to_vec(&term).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compile_does_not_mutate_tree() {
        let term = sample();
        let before = term.clone();
        let _ = wire(&term);
        assert_eq!(term, before);
    }

    #[test]
    fn test_concurrent_compilation() {
        let term = Arc::new(sample());
        let expected = wire(&term);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let term = Arc::clone(&term);
                thread::spawn(move || Compiler::new().compile(&term).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}

// ============================================================================
// Deep trees
// ============================================================================

mod deep_trees {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value as Json;

    const DEPTH: usize = 5000;

    #[test]
    fn test_long_add_chain_compiles() {
        let mut term = r::expr(0).unwrap();
        for _ in 0..DEPTH {
            term = term.add(1).unwrap();
        }
        assert_eq!(term.tag(), TermType::ADD);

        let mut node = Compiler::new().compile(&term).unwrap();
        let mut levels = 0;
        // Unwrap one level at a time; dropping the whole array would recurse.
        loop {
            match node {
                Json::Array(mut parts) => {
                    assert_eq!(parts.len(), 2);
                    assert_eq!(parts[0], json!(24));
                    let mut args = match parts.pop() {
                        Some(Json::Array(args)) => args,
                        other => panic!("expected argument list, got {other:?}"),
                    };
                    assert_eq!(args.len(), 2);
                    assert_eq!(args[1], json!(1));
                    node = args.swap_remove(0);
                    levels += 1;
                }
                leaf => {
                    assert_eq!(leaf, json!(0));
                    break;
                }
            }
        }
        assert_eq!(levels, DEPTH);
    }
}

// ============================================================================
// Query envelope
// ============================================================================

mod envelope {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_start_with_globals() {
        let query = Query::start(table("users").count().unwrap())
            .with_global("db", "test")
            .unwrap()
            .with_global("durability", "soft")
            .unwrap();
        assert_eq!(
            query.compile(&Compiler::new()).unwrap(),
            json!([1, [43, [[15, ["users"]]]], {"db": [14, ["test"]], "durability": "soft"}])
        );
    }

    #[test]
    fn test_start_bytes() {
        let query = Query::start(r::expr(vec![1, 2, 3]).unwrap());
        assert_eq!(query.to_vec().unwrap(), b"[1,[2,[1,2,3]]]".to_vec());
    }
}
