//! Transport form of a tree.
//!
//! `AnyNode` is a flat tagged record: a `type` discriminant, the location,
//! an optional id, and only the payload keys the variant defines. It is the
//! shape trees take in JSON when they cross a process or sandbox boundary.
//!
//! ```json
//! {"type": "binary", "loc": {"from": 0, "to": 12}, "operator": "||",
//!  "left": {"type": "bool", "loc": {"from": 0, "to": 4}, "value": true},
//!  "right": {"type": "bool", "loc": {"from": 8, "to": 12}, "value": true}}
//! ```
//!
//! Resolved Natures never travel. A decoded tree has to be checked again.
//!
//! Absent keys are omitted, never zero-filled: a `call` without `arguments`
//! fails to decode, while `"arguments": []` is a call with no arguments.

use expr_stack::ensure_sufficient_stack;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{DecodeError, Location, Meta, Node, NodeId, NodeKind, NodeTag};

/// Tagged transport node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnyNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub loc: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<Box<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<Box<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Box<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Box<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callee: Option<Box<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throws: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<Box<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cond: Option<Box<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp1: Option<Box<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp2: Option<Box<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_node: Option<Box<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<Box<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairs: Option<Vec<AnyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Box<AnyNode>>,
}

impl AnyNode {
    fn header(tag: NodeTag, meta: &Meta) -> Self {
        AnyNode {
            node_type: tag.as_str().to_owned(),
            loc: meta.loc,
            id: meta.id,
            ..AnyNode::default()
        }
    }
}

fn boxed(node: &Node) -> Option<Box<AnyNode>> {
    Some(Box::new(encode(node)))
}

fn listed(nodes: &[Node]) -> Option<Vec<AnyNode>> {
    Some(nodes.iter().map(encode).collect())
}

/// Convert a tree to its transport form. Total over every variant.
///
/// Non-finite floats have no JSON number form and travel as the text
/// `"+Inf"`, `"-Inf"` or `"NaN"`.
pub fn encode(node: &Node) -> AnyNode {
    ensure_sufficient_stack(|| {
        let mut any = AnyNode::header(node.tag(), &node.meta);
        match &node.kind {
            NodeKind::Nil => {}
            NodeKind::Identifier(s) | NodeKind::String(s) => {
                any.value = Some(Value::String(s.clone()));
            }
            NodeKind::Integer(v) => any.value = Some(Value::from(*v)),
            NodeKind::Float(v) => any.value = Some(float_value(*v)),
            NodeKind::Bool(v) => any.value = Some(Value::Bool(*v)),
            NodeKind::Constant(v) => any.value = Some(v.clone()),
            NodeKind::Unary { operator, node } => {
                any.operator = Some(operator.clone());
                any.node = boxed(node);
            }
            NodeKind::Binary {
                operator,
                left,
                right,
            } => {
                any.operator = Some(operator.clone());
                any.left = boxed(left);
                any.right = boxed(right);
            }
            NodeKind::Chain { node } | NodeKind::Predicate { node } => any.node = boxed(node),
            NodeKind::Member {
                node,
                property,
                optional,
                method,
            } => {
                any.node = boxed(node);
                any.property = boxed(property);
                any.optional = Some(*optional);
                any.method = Some(*method);
            }
            NodeKind::Slice { node, from, to } => {
                any.node = boxed(node);
                any.from = from.as_deref().and_then(boxed);
                any.to = to.as_deref().and_then(boxed);
            }
            NodeKind::Call { callee, arguments } => {
                any.callee = boxed(callee);
                any.arguments = listed(arguments);
            }
            NodeKind::Builtin {
                name,
                arguments,
                throws,
                map,
            } => {
                any.name = Some(name.clone());
                any.arguments = listed(arguments);
                any.throws = Some(*throws);
                any.map = map.as_deref().and_then(boxed);
            }
            NodeKind::Pointer(name) => any.name = Some(name.clone()),
            NodeKind::Conditional { cond, exp1, exp2 } => {
                any.cond = boxed(cond);
                any.exp1 = boxed(exp1);
                any.exp2 = boxed(exp2);
            }
            NodeKind::VariableDeclarator { name, value, expr } => {
                any.name = Some(name.clone());
                any.value_node = boxed(value);
                any.expr = boxed(expr);
            }
            NodeKind::Array { nodes } => any.nodes = listed(nodes),
            NodeKind::Map { pairs } => any.pairs = listed(pairs),
            NodeKind::Pair { key, value } => {
                any.key = boxed(key);
                any.value_node = boxed(value);
            }
        }
        any
    })
}

/// Required-field access for one node being decoded.
struct Payload<'a> {
    tag: NodeTag,
    any: &'a AnyNode,
}

impl<'a> Payload<'a> {
    fn child(
        &self,
        field: &'static str,
        slot: &Option<Box<AnyNode>>,
    ) -> Result<Box<Node>, DecodeError> {
        let any = slot
            .as_deref()
            .ok_or_else(|| DecodeError::missing(self.tag, field))?;
        decode(any).map(Box::new)
    }

    fn list(
        &self,
        field: &'static str,
        slot: &Option<Vec<AnyNode>>,
    ) -> Result<Vec<Node>, DecodeError> {
        slot.as_ref()
            .ok_or_else(|| DecodeError::missing(self.tag, field))?
            .iter()
            .map(decode)
            .collect()
    }

    fn text(&self, field: &'static str, slot: &Option<String>) -> Result<String, DecodeError> {
        slot.clone().ok_or_else(|| DecodeError::missing(self.tag, field))
    }

    fn flag(&self, field: &'static str, slot: Option<bool>) -> Result<bool, DecodeError> {
        slot.ok_or_else(|| DecodeError::missing(self.tag, field))
    }

    fn value(&self) -> Result<&'a Value, DecodeError> {
        self.any
            .value
            .as_ref()
            .ok_or_else(|| DecodeError::missing(self.tag, "value"))
    }

    fn string_value(&self) -> Result<String, DecodeError> {
        let value = self.value()?;
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| DecodeError::invalid(self.tag, "text", value))
    }
}

fn float_value(v: f64) -> Value {
    if let Some(number) = serde_json::Number::from_f64(v) {
        return Value::Number(number);
    }
    let text = if v.is_nan() {
        "NaN"
    } else if v.is_sign_positive() {
        "+Inf"
    } else {
        "-Inf"
    };
    Value::String(text.to_owned())
}

fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::String(text) => match text.as_str() {
            "+Inf" => Some(f64::INFINITY),
            "-Inf" => Some(f64::NEG_INFINITY),
            "NaN" => Some(f64::NAN),
            _ => None,
        },
        _ => value.as_f64(),
    }
}

fn optional(slot: &Option<Box<AnyNode>>) -> Result<Option<Box<Node>>, DecodeError> {
    slot.as_deref().map(|any| decode(any).map(Box::new)).transpose()
}

/// Rebuild a tree from its transport form.
///
/// Fails on an unknown discriminant, a missing required key, or a
/// primitive payload of the wrong kind. The first failure, in child order,
/// is returned.
pub fn decode(any: &AnyNode) -> Result<Node, DecodeError> {
    ensure_sufficient_stack(|| {
        let tag: NodeTag = any.node_type.parse()?;
        let p = Payload { tag, any };
        let kind = match tag {
            NodeTag::Nil => NodeKind::Nil,
            NodeTag::Identifier => NodeKind::Identifier(p.string_value()?),
            NodeTag::String => NodeKind::String(p.string_value()?),
            NodeTag::Integer => {
                let value = p.value()?;
                let v = value
                    .as_i64()
                    .ok_or_else(|| DecodeError::invalid(tag, "integer", value))?;
                NodeKind::Integer(v)
            }
            NodeTag::Float => {
                let value = p.value()?;
                let v = parse_float(value)
                    .ok_or_else(|| DecodeError::invalid(tag, "number", value))?;
                NodeKind::Float(v)
            }
            NodeTag::Bool => {
                let value = p.value()?;
                let v = value
                    .as_bool()
                    .ok_or_else(|| DecodeError::invalid(tag, "bool", value))?;
                NodeKind::Bool(v)
            }
            NodeTag::Constant => NodeKind::Constant(any.value.clone().unwrap_or(Value::Null)),
            NodeTag::Unary => NodeKind::Unary {
                operator: p.text("operator", &any.operator)?,
                node: p.child("node", &any.node)?,
            },
            NodeTag::Binary => NodeKind::Binary {
                operator: p.text("operator", &any.operator)?,
                left: p.child("left", &any.left)?,
                right: p.child("right", &any.right)?,
            },
            NodeTag::Chain => NodeKind::Chain {
                node: p.child("node", &any.node)?,
            },
            NodeTag::Member => NodeKind::Member {
                node: p.child("node", &any.node)?,
                property: p.child("property", &any.property)?,
                optional: p.flag("optional", any.optional)?,
                method: p.flag("method", any.method)?,
            },
            NodeTag::Slice => NodeKind::Slice {
                node: p.child("node", &any.node)?,
                from: optional(&any.from)?,
                to: optional(&any.to)?,
            },
            NodeTag::Call => NodeKind::Call {
                callee: p.child("callee", &any.callee)?,
                arguments: p.list("arguments", &any.arguments)?,
            },
            NodeTag::Builtin => NodeKind::Builtin {
                name: p.text("name", &any.name)?,
                arguments: p.list("arguments", &any.arguments)?,
                throws: p.flag("throws", any.throws)?,
                map: optional(&any.map)?,
            },
            NodeTag::Predicate => NodeKind::Predicate {
                node: p.child("node", &any.node)?,
            },
            NodeTag::Pointer => NodeKind::Pointer(p.text("name", &any.name)?),
            NodeTag::Conditional => NodeKind::Conditional {
                cond: p.child("cond", &any.cond)?,
                exp1: p.child("exp1", &any.exp1)?,
                exp2: p.child("exp2", &any.exp2)?,
            },
            NodeTag::VariableDeclarator => NodeKind::VariableDeclarator {
                name: p.text("name", &any.name)?,
                value: p.child("value_node", &any.value_node)?,
                expr: p.child("expr", &any.expr)?,
            },
            NodeTag::Array => NodeKind::Array {
                nodes: p.list("nodes", &any.nodes)?,
            },
            NodeTag::Map => NodeKind::Map {
                pairs: p.list("pairs", &any.pairs)?,
            },
            NodeTag::Pair => NodeKind::Pair {
                key: p.child("key", &any.key)?,
                value: p.child("value_node", &any.value_node)?,
            },
        };
        Ok(Node {
            meta: Meta {
                loc: any.loc,
                id: any.id,
                ..Meta::default()
            },
            kind,
        })
    })
}

/// A transport root plus the source text it was parsed from, when known.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnyTree {
    pub node: AnyNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A decoded tree and its source text (empty when not supplied).
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    pub node: Node,
    pub source: String,
}

impl Tree {
    pub fn new(node: Node, source: impl Into<String>) -> Self {
        Tree {
            node,
            source: source.into(),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(root = %any.node.node_type))]
    pub fn decode(any: &AnyTree) -> Result<Tree, DecodeError> {
        let node = decode(&any.node).inspect_err(|err| {
            tracing::debug!(%err, "tree rejected");
        })?;
        Ok(Tree {
            node,
            source: any.source.clone().unwrap_or_default(),
        })
    }

    pub fn encode(&self) -> AnyTree {
        AnyTree {
            node: encode(&self.node),
            source: (!self.source.is_empty()).then(|| self.source.clone()),
        }
    }

    /// Source text covered by `loc`, if it lies on character boundaries.
    pub fn snippet(&self, loc: Location) -> Option<&str> {
        self.source.get(loc.to_range())
    }
}

impl TryFrom<&AnyTree> for Tree {
    type Error = DecodeError;

    fn try_from(any: &AnyTree) -> Result<Self, Self::Error> {
        Tree::decode(any)
    }
}

impl From<&Tree> for AnyTree {
    fn from(tree: &Tree) -> Self {
        tree.encode()
    }
}

#[cfg(test)]
mod tests;
