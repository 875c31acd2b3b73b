//! Declared shapes for schema-less values.
//!
//! A dictionary environment only tells the introspector which keys are
//! present right now. A `Decl` lets the host state the shape instead:
//!
//! ```text
//! Decl::map([
//!     ("user", Decl::map([("name", Decl::Type(schema::string()))])),
//!     ("tags", Decl::array(Decl::Type(schema::string()))),
//! ])
//! ```
//!
//! Map declarations are strict unless an `extra` declaration describes the
//! undeclared keys.

use std::collections::BTreeMap;

use expr_stack::ensure_sufficient_stack;

use crate::{schema, HostType, Nature};

/// Declared shape of a value.
#[derive(Clone, Debug, PartialEq)]
pub enum Decl {
    /// A value of a host type.
    Type(HostType),
    /// The universal nil.
    Nil,
    /// `[]any` whose elements have the given shape.
    Array(Box<Decl>),
    /// `map[string]any` with declared keys.
    Map {
        fields: BTreeMap<String, Decl>,
        /// Shape of undeclared keys. `None` closes the key set.
        extra: Option<Box<Decl>>,
    },
}

impl Decl {
    pub fn any() -> Self {
        Decl::Type(schema::any())
    }

    pub fn array(of: Decl) -> Self {
        Decl::Array(Box::new(of))
    }

    /// Strict map declaration.
    pub fn map<K: Into<String>>(fields: impl IntoIterator<Item = (K, Decl)>) -> Self {
        Decl::Map {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            extra: None,
        }
    }

    /// Open up a map declaration: undeclared keys take the `extra` shape.
    /// Other declarations are returned unchanged.
    #[must_use]
    pub fn with_extra(self, extra: Decl) -> Self {
        match self {
            Decl::Map { fields, .. } => Decl::Map {
                fields,
                extra: Some(Box::new(extra)),
            },
            other => other,
        }
    }

    pub fn nature(&self) -> Nature {
        ensure_sufficient_stack(|| match self {
            Decl::Type(ty) => Nature::of(ty.clone()),
            Decl::Nil => Nature::nil(),
            Decl::Array(of) => Nature::array_of(of.nature()),
            Decl::Map { fields, extra } => {
                let mut nature = Nature::of(schema::any_map());
                nature.fields = fields
                    .iter()
                    .map(|(name, decl)| (name.clone(), decl.nature()))
                    .collect();
                nature.strict = extra.is_none();
                nature.default_map_value = extra.as_ref().map(|e| Box::new(e.nature()));
                nature
            }
        })
    }
}
