//! Expression nodes.
//!
//! A `Node` is a `NodeKind` plus `Meta`. The kind is a closed set of 21
//! variants; every consumer in this crate matches all of them.
//!
//! Nodes are built by a parser or by `decode`. The checker annotates them
//! afterwards through `set_nature` / `set_type`. Structural changes go
//! through [`patch`](crate::patch), which replaces a whole slot.

mod print;
mod tag;

use expr_nature::{schema, HostType, Nature};
use serde::{Deserialize, Serialize};

use crate::Location;

pub use tag::NodeTag;

/// Stable identity of a node, independent of its location.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        NodeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Metadata shared by every variant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Meta {
    pub loc: Location,
    pub id: Option<NodeId>,
    /// Resolved by the checker. `Nature::unknown()` until then.
    pub nature: Nature,
    /// Name of the resolved host type, refreshed by `set_nature`.
    pub type_name: Option<String>,
}

impl Meta {
    pub fn at(loc: Location) -> Self {
        Meta {
            loc,
            ..Meta::default()
        }
    }
}

/// The expression variants.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// `nil`
    Nil,
    /// Unresolved reference.
    Identifier(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
    /// Pre-resolved literal of any shape. Only produced by the optimizer.
    Constant(serde_json::Value),
    Unary {
        operator: String,
        node: Box<Node>,
    },
    Binary {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Wraps a run of optional member accesses so `?.` can short-circuit
    /// the whole run.
    Chain {
        node: Box<Node>,
    },
    Member {
        node: Box<Node>,
        property: Box<Node>,
        optional: bool,
        /// The property names a method rather than a field or index.
        method: bool,
    },
    /// `node[from:to]`. Missing bounds mean the start and end.
    Slice {
        node: Box<Node>,
        from: Option<Box<Node>>,
        to: Option<Box<Node>>,
    },
    Call {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    Builtin {
        name: String,
        arguments: Vec<Node>,
        throws: bool,
        /// Fold target recorded by the optimizer.
        map: Option<Box<Node>>,
    },
    /// Closure argument of a builtin; the body refers to `Pointer`s.
    Predicate {
        node: Box<Node>,
    },
    /// `#` or `#name` inside a predicate. Empty name is the current element.
    Pointer(String),
    Conditional {
        cond: Box<Node>,
        exp1: Box<Node>,
        exp2: Box<Node>,
    },
    /// `let name = value; expr`
    VariableDeclarator {
        name: String,
        value: Box<Node>,
        expr: Box<Node>,
    },
    Array {
        nodes: Vec<Node>,
    },
    /// Pairs keep their source order.
    Map {
        pairs: Vec<Node>,
    },
    Pair {
        key: Box<Node>,
        value: Box<Node>,
    },
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Nil => NodeTag::Nil,
            NodeKind::Identifier(_) => NodeTag::Identifier,
            NodeKind::Integer(_) => NodeTag::Integer,
            NodeKind::Float(_) => NodeTag::Float,
            NodeKind::Bool(_) => NodeTag::Bool,
            NodeKind::String(_) => NodeTag::String,
            NodeKind::Constant(_) => NodeTag::Constant,
            NodeKind::Unary { .. } => NodeTag::Unary,
            NodeKind::Binary { .. } => NodeTag::Binary,
            NodeKind::Chain { .. } => NodeTag::Chain,
            NodeKind::Member { .. } => NodeTag::Member,
            NodeKind::Slice { .. } => NodeTag::Slice,
            NodeKind::Call { .. } => NodeTag::Call,
            NodeKind::Builtin { .. } => NodeTag::Builtin,
            NodeKind::Predicate { .. } => NodeTag::Predicate,
            NodeKind::Pointer(_) => NodeTag::Pointer,
            NodeKind::Conditional { .. } => NodeTag::Conditional,
            NodeKind::VariableDeclarator { .. } => NodeTag::VariableDeclarator,
            NodeKind::Array { .. } => NodeTag::Array,
            NodeKind::Map { .. } => NodeTag::Map,
            NodeKind::Pair { .. } => NodeTag::Pair,
        }
    }
}

/// An expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub meta: Meta,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(loc: Location, kind: NodeKind) -> Self {
        Node {
            meta: Meta::at(loc),
            kind,
        }
    }

    #[inline]
    pub fn tag(&self) -> NodeTag {
        self.kind.tag()
    }

    #[inline]
    pub fn location(&self) -> Location {
        self.meta.loc
    }

    pub fn set_location(&mut self, loc: Location) {
        self.meta.loc = loc;
    }

    #[inline]
    pub fn id(&self) -> Option<NodeId> {
        self.meta.id
    }

    #[must_use]
    pub fn with_id(mut self, id: NodeId) -> Self {
        self.meta.id = Some(id);
        self
    }

    #[inline]
    pub fn nature(&self) -> &Nature {
        &self.meta.nature
    }

    pub fn set_nature(&mut self, nature: Nature) {
        self.meta.type_name = nature.ty.as_ref().map(|ty| ty.name());
        self.meta.nature = nature;
    }

    /// Effective type: the resolved host type, or `any` before checking.
    pub fn ty(&self) -> HostType {
        self.meta.nature.ty.clone().unwrap_or_else(schema::any)
    }

    /// Bind a refined host type, keeping the rest of the Nature.
    pub fn set_type(&mut self, ty: HostType) {
        let name = ty.name();
        self.meta.nature.type_name = name.clone();
        self.meta.nature.ty = Some(ty);
        self.meta.type_name = Some(name);
    }

    /// Forget everything the checker resolved on this node.
    pub fn clear_nature(&mut self) {
        self.meta.nature = Nature::unknown();
        self.meta.type_name = None;
    }

    // Constructors

    pub fn nil(loc: Location) -> Self {
        Node::new(loc, NodeKind::Nil)
    }

    pub fn identifier(loc: Location, name: impl Into<String>) -> Self {
        Node::new(loc, NodeKind::Identifier(name.into()))
    }

    pub fn integer(loc: Location, value: i64) -> Self {
        Node::new(loc, NodeKind::Integer(value))
    }

    pub fn float(loc: Location, value: f64) -> Self {
        Node::new(loc, NodeKind::Float(value))
    }

    pub fn boolean(loc: Location, value: bool) -> Self {
        Node::new(loc, NodeKind::Bool(value))
    }

    pub fn string(loc: Location, value: impl Into<String>) -> Self {
        Node::new(loc, NodeKind::String(value.into()))
    }

    pub fn constant(loc: Location, value: serde_json::Value) -> Self {
        Node::new(loc, NodeKind::Constant(value))
    }

    pub fn unary(loc: Location, operator: impl Into<String>, node: Node) -> Self {
        Node::new(
            loc,
            NodeKind::Unary {
                operator: operator.into(),
                node: Box::new(node),
            },
        )
    }

    pub fn binary(loc: Location, operator: impl Into<String>, left: Node, right: Node) -> Self {
        Node::new(
            loc,
            NodeKind::Binary {
                operator: operator.into(),
                left: Box::new(left),
                right: Box::new(right),
            },
        )
    }

    pub fn chain(loc: Location, node: Node) -> Self {
        Node::new(
            loc,
            NodeKind::Chain {
                node: Box::new(node),
            },
        )
    }

    /// Field or index access.
    pub fn member(loc: Location, node: Node, property: Node, optional: bool) -> Self {
        Node::new(
            loc,
            NodeKind::Member {
                node: Box::new(node),
                property: Box::new(property),
                optional,
                method: false,
            },
        )
    }

    /// Member access naming a method.
    pub fn method(loc: Location, node: Node, property: Node, optional: bool) -> Self {
        Node::new(
            loc,
            NodeKind::Member {
                node: Box::new(node),
                property: Box::new(property),
                optional,
                method: true,
            },
        )
    }

    pub fn slice(loc: Location, node: Node, from: Option<Node>, to: Option<Node>) -> Self {
        Node::new(
            loc,
            NodeKind::Slice {
                node: Box::new(node),
                from: from.map(Box::new),
                to: to.map(Box::new),
            },
        )
    }

    pub fn call(loc: Location, callee: Node, arguments: Vec<Node>) -> Self {
        Node::new(
            loc,
            NodeKind::Call {
                callee: Box::new(callee),
                arguments,
            },
        )
    }

    pub fn builtin(loc: Location, name: impl Into<String>, arguments: Vec<Node>) -> Self {
        Node::new(
            loc,
            NodeKind::Builtin {
                name: name.into(),
                arguments,
                throws: false,
                map: None,
            },
        )
    }

    pub fn predicate(loc: Location, node: Node) -> Self {
        Node::new(
            loc,
            NodeKind::Predicate {
                node: Box::new(node),
            },
        )
    }

    pub fn pointer(loc: Location, name: impl Into<String>) -> Self {
        Node::new(loc, NodeKind::Pointer(name.into()))
    }

    pub fn conditional(loc: Location, cond: Node, exp1: Node, exp2: Node) -> Self {
        Node::new(
            loc,
            NodeKind::Conditional {
                cond: Box::new(cond),
                exp1: Box::new(exp1),
                exp2: Box::new(exp2),
            },
        )
    }

    pub fn variable_declarator(
        loc: Location,
        name: impl Into<String>,
        value: Node,
        expr: Node,
    ) -> Self {
        Node::new(
            loc,
            NodeKind::VariableDeclarator {
                name: name.into(),
                value: Box::new(value),
                expr: Box::new(expr),
            },
        )
    }

    pub fn array(loc: Location, nodes: Vec<Node>) -> Self {
        Node::new(loc, NodeKind::Array { nodes })
    }

    pub fn map(loc: Location, pairs: Vec<Node>) -> Self {
        Node::new(loc, NodeKind::Map { pairs })
    }

    pub fn pair(loc: Location, key: Node, value: Node) -> Self {
        Node::new(
            loc,
            NodeKind::Pair {
                key: Box::new(key),
                value: Box::new(value),
            },
        )
    }
}
