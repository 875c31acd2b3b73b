//! Coarse type categories.

use std::fmt;

/// Coarse category of a host type.
///
/// `Invalid` is reported by a [`Nature`](crate::Nature) with no bound host
/// type, and by host types the embedding cannot classify.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Kind {
    #[default]
    Invalid,
    Bool,
    Int,
    Float,
    String,
    /// Record with named fields.
    Struct,
    /// Dictionary.
    Map,
    /// Growable sequence.
    Slice,
    /// Fixed-length sequence.
    Array,
    /// One level of indirection; also used for optionals.
    Pointer,
    /// Method set; the empty interface is "any".
    Interface,
    Func,
}

impl Kind {
    pub const fn is_primitive(self) -> bool {
        matches!(self, Kind::Bool | Kind::Int | Kind::Float | Kind::String)
    }

    pub const fn is_sequence(self) -> bool {
        matches!(self, Kind::Slice | Kind::Array)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Struct => "struct",
            Kind::Map => "map",
            Kind::Slice => "slice",
            Kind::Array => "array",
            Kind::Pointer => "pointer",
            Kind::Interface => "interface",
            Kind::Func => "func",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
