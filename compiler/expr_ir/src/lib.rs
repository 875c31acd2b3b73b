//! Expression IR
//!
//! This crate contains the tree the rest of the expression pipeline works on:
//! - `Location`: half-open byte ranges into the source text
//! - `Node` / `NodeKind`: the closed set of expression variants plus shared
//!   metadata (location, stable id, Nature)
//! - `Visitor` / `MutVisitor`: exhaustive traversal
//! - `AnyNode`: the tagged transport form, with `encode` / `decode`
//! - `patch`: in-place subtree replacement that keeps source positions
//!
//! # Design
//!
//! - **Closed sum type**: every consumer matches all variants; there is no
//!   fallback arm anywhere in this crate.
//! - **Owned children**: `Box<Node>` children make every slot addressable as
//!   `&mut Node`, which is what `patch` replaces.
//! - **Types are annotations**: the checker writes Natures onto nodes after
//!   construction; transport and patching treat them as disposable.

mod error;
mod location;
mod node;
mod operator;
pub mod patch;
mod traits;
pub mod transport;
pub mod visitor;

pub use error::DecodeError;
pub use location::Location;
pub use node::{Meta, Node, NodeId, NodeKind, NodeTag};
pub use operator::{binary_precedence, unary_precedence, Associativity};
pub use patch::{patch, patch_tree, PatchTarget, Patcher};
pub use traits::Located;
pub use transport::{decode, encode, AnyNode, AnyTree, Tree};
pub use visitor::{assign_ids, strip_types, MutVisitor, Visitor};
