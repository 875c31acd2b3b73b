#![allow(clippy::expect_used, reason = "Proptest strategies and bodies can panic")]

use expr_nature::{schema, Nature};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

use super::*;
use crate::assign_ids;

fn loc(from: u32, to: u32) -> Location {
    Location::new(from, to)
}

fn parse(value: Value) -> AnyNode {
    let Ok(any) = serde_json::from_value(value) else {
        panic!("transport JSON should deserialize");
    };
    any
}

fn round_trip(node: &Node) -> Node {
    let Ok(decoded) = decode(&encode(node)) else {
        panic!("encoded tree should decode: {node}");
    };
    decoded
}

/// One instance of every variant.
fn every_variant() -> Vec<(NodeTag, Node)> {
    let l = loc(0, 1);
    let leaf = || Node::identifier(l, "x");
    let mut builtin = Node::builtin(l, "all", vec![leaf()]);
    if let NodeKind::Builtin { throws, map, .. } = &mut builtin.kind {
        *throws = true;
        *map = Some(Box::new(leaf()));
    }
    vec![
        (NodeTag::Nil, Node::nil(l)),
        (NodeTag::Identifier, leaf()),
        (NodeTag::Integer, Node::integer(l, -3)),
        (NodeTag::Float, Node::float(l, 2.5)),
        (NodeTag::Bool, Node::boolean(l, true)),
        (NodeTag::String, Node::string(l, "s")),
        (NodeTag::Constant, Node::constant(l, json!({"k": [1, 2]}))),
        (NodeTag::Unary, Node::unary(l, "!", leaf())),
        (NodeTag::Binary, Node::binary(l, "+", leaf(), leaf())),
        (NodeTag::Chain, Node::chain(l, leaf())),
        (NodeTag::Member, Node::method(l, leaf(), Node::string(l, "M"), true)),
        (NodeTag::Slice, Node::slice(l, leaf(), None, Some(leaf()))),
        (NodeTag::Call, Node::call(l, leaf(), vec![])),
        (NodeTag::Builtin, builtin),
        (NodeTag::Predicate, Node::predicate(l, Node::pointer(l, ""))),
        (NodeTag::Pointer, Node::pointer(l, "index")),
        (NodeTag::Conditional, Node::conditional(l, leaf(), leaf(), leaf())),
        (
            NodeTag::VariableDeclarator,
            Node::variable_declarator(l, "v", leaf(), leaf()),
        ),
        (NodeTag::Array, Node::array(l, vec![leaf(), leaf()])),
        (NodeTag::Map, Node::map(l, vec![])),
        (NodeTag::Pair, Node::pair(l, leaf(), leaf())),
    ]
}

// Encoding

#[test]
fn test_discriminants() {
    let cases = every_variant();
    assert_eq!(cases.len(), NodeTag::ALL.len());
    for (tag, node) in &cases {
        assert_eq!(encode(node).node_type, tag.as_str());
    }
}

#[test]
fn test_every_variant_round_trips() {
    for (tag, node) in every_variant() {
        assert_eq!(round_trip(&node), node, "{tag}");
    }
}

#[test]
fn test_json_shape() {
    let tree = Node::binary(
        loc(0, 12),
        "||",
        Node::boolean(loc(0, 4), true),
        Node::boolean(loc(8, 12), true),
    );
    let Ok(json) = serde_json::to_value(encode(&tree)) else {
        panic!("transport node should serialize");
    };
    assert_eq!(
        json,
        json!({
            "type": "binary",
            "loc": {"from": 0, "to": 12},
            "operator": "||",
            "left": {"type": "bool", "loc": {"from": 0, "to": 4}, "value": true},
            "right": {"type": "bool", "loc": {"from": 8, "to": 12}, "value": true},
        })
    );
}

#[test]
fn test_absent_fields_are_omitted() {
    let slice = Node::slice(loc(0, 4), Node::identifier(loc(0, 1), "x"), None, None);
    let any = encode(&slice);
    assert!(any.from.is_none());
    assert!(any.to.is_none());
    assert!(any.value.is_none());

    let Ok(json) = serde_json::to_string(&any) else {
        panic!("transport node should serialize");
    };
    assert!(!json.contains("\"from\":{"));
    assert!(!json.contains("arguments"));
}

#[test]
fn test_empty_list_is_not_absent() {
    let call = Node::call(loc(0, 3), Node::identifier(loc(0, 1), "f"), vec![]);
    let any = encode(&call);
    assert_eq!(any.arguments, Some(vec![]));
    assert_eq!(round_trip(&call), call);
}

#[test]
fn test_child_nodes_use_value_node() {
    let pair = Node::pair(loc(0, 6), Node::string(loc(0, 3), "a"), Node::integer(loc(5, 6), 1));
    let any = encode(&pair);
    assert!(any.value.is_none());
    assert_eq!(
        any.value_node.map(|v| v.node_type),
        Some("integer".to_owned())
    );
}

#[test]
fn test_ids_travel_natures_do_not() {
    let mut tree = Node::unary(loc(0, 2), "-", Node::integer(loc(1, 2), 1));
    assign_ids(&mut tree);
    tree.set_nature(Nature::of(schema::int()));

    let decoded = round_trip(&tree);
    assert_eq!(decoded.id(), Some(NodeId::new(1)));
    assert!(decoded.nature().is_unknown());
    assert_eq!(decoded.meta.type_name, None);
}

// Decoding

#[test]
fn test_decode_from_json() {
    let any = parse(json!({
        "type": "member",
        "loc": {"from": 0, "to": 5},
        "node": {"type": "identifier", "loc": {"from": 0, "to": 3}, "value": "foo"},
        "property": {"type": "string", "loc": {"from": 4, "to": 5}, "value": "b"},
        "optional": false,
        "method": false,
        "comment": "ignored",
    }));
    let Ok(node) = decode(&any) else {
        panic!("member should decode");
    };
    assert_eq!(node.to_string(), "foo.b");
    assert_eq!(node.location(), loc(0, 5));
}

#[test]
fn test_unknown_type() {
    let any = parse(json!({"type": "lambda", "loc": {"from": 0, "to": 0}}));
    assert_eq!(
        decode(&any),
        Err(DecodeError::UnknownNodeType("lambda".into()))
    );
}

#[test]
fn test_missing_required_field() {
    let any = parse(json!({"type": "call", "callee": {"type": "identifier", "value": "f"}}));
    assert_eq!(
        decode(&any),
        Err(DecodeError::MissingField {
            node_type: NodeTag::Call,
            field: "arguments",
        })
    );

    let any = parse(json!({"type": "pair", "key": {"type": "nil"}, "value": {"type": "nil"}}));
    assert_eq!(
        decode(&any),
        Err(DecodeError::MissingField {
            node_type: NodeTag::Pair,
            field: "value_node",
        })
    );
}

#[test]
fn test_wrong_primitive_kind() {
    let any = parse(json!({"type": "identifier", "value": 5}));
    assert_eq!(
        decode(&any),
        Err(DecodeError::InvalidValue {
            node_type: NodeTag::Identifier,
            expected: "text",
            found: "5".into(),
        })
    );

    let any = parse(json!({"type": "integer", "value": 1.5}));
    assert!(matches!(
        decode(&any),
        Err(DecodeError::InvalidValue {
            node_type: NodeTag::Integer,
            ..
        })
    ));

    let any = parse(json!({"type": "bool", "value": "true"}));
    assert!(decode(&any).is_err());
}

#[test]
fn test_float_accepts_integers() {
    let any = parse(json!({"type": "float", "value": 2}));
    let Ok(node) = decode(&any) else {
        panic!("integral float should decode");
    };
    assert_eq!(node.kind, NodeKind::Float(2.0));
}

#[test]
fn test_non_finite_floats_round_trip() {
    for (v, text) in [(f64::INFINITY, "+Inf"), (f64::NEG_INFINITY, "-Inf")] {
        let node = Node::float(loc(0, 3), v);
        let any = encode(&node);
        assert_eq!(any.value, Some(json!(text)));
        let Ok(back) = decode(&any) else {
            panic!("{text} should decode");
        };
        assert_eq!(back, node);
    }

    let any = encode(&Node::float(loc(0, 3), f64::NAN));
    assert_eq!(any.value, Some(json!("NaN")));
    let Ok(Node {
        kind: NodeKind::Float(v),
        ..
    }) = decode(&any)
    else {
        panic!("NaN should decode to a float");
    };
    assert!(v.is_nan());
}

#[test]
fn test_float_rejects_other_text() {
    for value in [json!("inf"), json!("1.5"), json!(true)] {
        let any = parse(json!({"type": "float", "value": value}));
        assert!(matches!(
            decode(&any),
            Err(DecodeError::InvalidValue { .. })
        ));
    }
}

#[test]
fn test_constant_without_value_is_null() {
    let any = parse(json!({"type": "constant", "loc": {"from": 0, "to": 1}}));
    let Ok(node) = decode(&any) else {
        panic!("constant should decode");
    };
    assert_eq!(node.kind, NodeKind::Constant(Value::Null));
}

#[test]
fn test_child_failure_propagates() {
    let any = parse(json!({
        "type": "array",
        "nodes": [
            {"type": "integer", "value": 1},
            {"type": "binary", "operator": "+", "left": {"type": "nil"}},
            {"type": "mystery"},
        ],
    }));
    assert_eq!(
        decode(&any),
        Err(DecodeError::MissingField {
            node_type: NodeTag::Binary,
            field: "right",
        })
    );
}

#[test]
fn test_error_messages() {
    let err = DecodeError::MissingField {
        node_type: NodeTag::VariableDeclarator,
        field: "expr",
    };
    assert_eq!(err.to_string(), "variable_declarator node is missing `expr`");
}

// Trees

#[test]
fn test_tree_keeps_source() {
    let source = "true || true";
    let node = Node::binary(
        loc(0, 12),
        "||",
        Node::boolean(loc(0, 4), true),
        Node::boolean(loc(8, 12), true),
    );
    let tree = Tree::new(node, source);
    let any = tree.encode();
    assert_eq!(any.source.as_deref(), Some(source));

    let Ok(back) = Tree::try_from(&any) else {
        panic!("tree should decode");
    };
    assert_eq!(back, tree);
    assert_eq!(back.snippet(loc(8, 12)), Some("true"));
    assert_eq!(back.snippet(loc(8, 40)), None);
}

#[test]
fn test_tree_without_source() {
    let any = AnyTree {
        node: encode(&Node::nil(loc(0, 3))),
        source: None,
    };
    let Ok(tree) = Tree::decode(&any) else {
        panic!("tree should decode");
    };
    assert_eq!(tree.source, "");
    assert_eq!(AnyTree::from(&tree), any);
}

// Round-trip law

fn arb_loc() -> impl Strategy<Value = Location> {
    (0u32..1_000, 0u32..100).prop_map(|(from, len)| Location::new(from, from + len))
}

fn arb_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z_][a-zA-Z0-9_]{0,6}").expect("valid regex")
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(2, 8, 3, |inner| {
        prop::collection::vec(inner, 0..3).prop_map(Value::Array)
    })
}

fn arb_leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        arb_loc().prop_map(Node::nil),
        (arb_loc(), arb_name()).prop_map(|(l, n)| Node::identifier(l, n)),
        (arb_loc(), any::<i64>()).prop_map(|(l, v)| Node::integer(l, v)),
        // Eighths print and parse exactly.
        (arb_loc(), -1_000_000i32..1_000_000).prop_map(|(l, n)| Node::float(l, f64::from(n) / 8.0)),
        (arb_loc(), prop_oneof![Just(f64::INFINITY), Just(f64::NEG_INFINITY)])
            .prop_map(|(l, v)| Node::float(l, v)),
        (arb_loc(), any::<bool>()).prop_map(|(l, v)| Node::boolean(l, v)),
        (arb_loc(), ".{0,8}").prop_map(|(l, s)| Node::string(l, s)),
        (arb_loc(), arb_json()).prop_map(|(l, v)| Node::constant(l, v)),
        (arb_loc(), "[a-z]{0,5}").prop_map(|(l, n)| Node::pointer(l, n)),
    ]
}

fn arb_operator() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("+"), Just("*"), Just("and"), Just("??"), Just("in")]
}

fn arb_node() -> impl Strategy<Value = Node> {
    arb_leaf().prop_recursive(4, 48, 4, |inner| {
        let unary_and_binary = prop_oneof![
            (arb_loc(), prop_oneof![Just("-"), Just("not")], inner.clone())
                .prop_map(|(l, op, n)| Node::unary(l, op, n)),
            (arb_loc(), arb_operator(), inner.clone(), inner.clone())
                .prop_map(|(l, op, a, b)| Node::binary(l, op, a, b)),
            (arb_loc(), inner.clone()).prop_map(|(l, n)| Node::chain(l, n)),
            (arb_loc(), inner.clone(), inner.clone(), any::<bool>(), any::<bool>()).prop_map(
                |(l, obj, prop, optional, method)| {
                    if method {
                        Node::method(l, obj, prop, optional)
                    } else {
                        Node::member(l, obj, prop, optional)
                    }
                }
            ),
            (
                arb_loc(),
                inner.clone(),
                prop::option::of(inner.clone()),
                prop::option::of(inner.clone())
            )
                .prop_map(|(l, n, from, to)| Node::slice(l, n, from, to)),
            (arb_loc(), inner.clone(), prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(l, f, args)| Node::call(l, f, args)),
            (
                arb_loc(),
                arb_name(),
                prop::collection::vec(inner.clone(), 0..3),
                any::<bool>(),
                prop::option::of(inner.clone())
            )
                .prop_map(|(l, name, arguments, throws, map)| Node::new(
                    l,
                    NodeKind::Builtin {
                        name,
                        arguments,
                        throws,
                        map: map.map(Box::new),
                    }
                )),
        ];
        let structured = prop_oneof![
            (arb_loc(), inner.clone()).prop_map(|(l, n)| Node::predicate(l, n)),
            (arb_loc(), inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(l, c, a, b)| Node::conditional(l, c, a, b)),
            (arb_loc(), arb_name(), inner.clone(), inner.clone())
                .prop_map(|(l, name, v, e)| Node::variable_declarator(l, name, v, e)),
            (arb_loc(), prop::collection::vec(inner.clone(), 0..4))
                .prop_map(|(l, items)| Node::array(l, items)),
            (
                arb_loc(),
                prop::collection::vec((arb_loc(), inner.clone(), inner.clone()), 0..3)
            )
                .prop_map(|(l, pairs)| Node::map(
                    l,
                    pairs
                        .into_iter()
                        .map(|(pl, k, v)| Node::pair(pl, k, v))
                        .collect()
                )),
        ];
        prop_oneof![unary_and_binary, structured]
    })
}

fn arb_tree() -> impl Strategy<Value = Node> {
    (arb_node(), any::<bool>()).prop_map(|(mut node, numbered)| {
        if numbered {
            assign_ids(&mut node);
        }
        node
    })
}

proptest! {
    #[test]
    fn prop_round_trip(tree in arb_tree()) {
        let decoded = decode(&encode(&tree));
        prop_assert_eq!(decoded, Ok(tree));
    }

    #[test]
    fn prop_round_trip_through_json(tree in arb_tree()) {
        let text = serde_json::to_string(&encode(&tree)).expect("serialize");
        let any: AnyNode = serde_json::from_str(&text).expect("deserialize");
        prop_assert_eq!(decode(&any), Ok(tree));
    }
}
