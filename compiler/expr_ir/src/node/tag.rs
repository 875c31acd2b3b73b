//! Variant discriminants.

use std::fmt;
use std::str::FromStr;

use crate::DecodeError;

/// Discriminant of a `NodeKind`, and the `type` key of its transport form.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeTag {
    Nil,
    Identifier,
    Integer,
    Float,
    Bool,
    String,
    Constant,
    Unary,
    Binary,
    Chain,
    Member,
    Slice,
    Call,
    Builtin,
    Predicate,
    Pointer,
    Conditional,
    VariableDeclarator,
    Array,
    Map,
    Pair,
}

impl NodeTag {
    pub const ALL: [NodeTag; 21] = [
        NodeTag::Nil,
        NodeTag::Identifier,
        NodeTag::Integer,
        NodeTag::Float,
        NodeTag::Bool,
        NodeTag::String,
        NodeTag::Constant,
        NodeTag::Unary,
        NodeTag::Binary,
        NodeTag::Chain,
        NodeTag::Member,
        NodeTag::Slice,
        NodeTag::Call,
        NodeTag::Builtin,
        NodeTag::Predicate,
        NodeTag::Pointer,
        NodeTag::Conditional,
        NodeTag::VariableDeclarator,
        NodeTag::Array,
        NodeTag::Map,
        NodeTag::Pair,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            NodeTag::Nil => "nil",
            NodeTag::Identifier => "identifier",
            NodeTag::Integer => "integer",
            NodeTag::Float => "float",
            NodeTag::Bool => "bool",
            NodeTag::String => "string",
            NodeTag::Constant => "constant",
            NodeTag::Unary => "unary",
            NodeTag::Binary => "binary",
            NodeTag::Chain => "chain",
            NodeTag::Member => "member",
            NodeTag::Slice => "slice",
            NodeTag::Call => "call",
            NodeTag::Builtin => "builtin",
            NodeTag::Predicate => "predicate",
            NodeTag::Pointer => "pointer",
            NodeTag::Conditional => "conditional",
            NodeTag::VariableDeclarator => "variable_declarator",
            NodeTag::Array => "array",
            NodeTag::Map => "map",
            NodeTag::Pair => "pair",
        }
    }
}

impl FromStr for NodeTag {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| DecodeError::UnknownNodeType(s.to_owned()))
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
