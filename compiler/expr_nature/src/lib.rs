//! Nature: structural type descriptions for expressions.
//!
//! The checker never sees static declarations for the values an expression
//! touches. Instead every expression and environment value is described by a
//! [`Nature`], which answers structural questions (fields, methods, element
//! and key types, assignability, arity) by querying an opaque [`HostType`]
//! lazily.
//!
//! # Layers
//!
//! - [`HostTypeInfo`]: the capability the embedding host implements over its
//!   own runtime types.
//! - [`schema`]: a table-driven `HostTypeInfo` implementation, for hosts that
//!   register their types ahead of time.
//! - [`Nature`]: the descriptor attached to nodes and environments.
//! - [`Decl`]: declarative shapes for schema-less dictionaries and arrays.

mod decl;
mod fields;
mod host;
mod kind;
mod nature;
pub mod schema;

pub use decl::Decl;
pub use fields::{fetch_field, struct_fields, FieldPath};
pub use host::{signature, FieldInfo, HostType, HostTypeInfo, MethodInfo};
pub use kind::Kind;
pub use nature::Nature;
