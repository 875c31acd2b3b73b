//! Subtree replacement.
//!
//! `patch` swaps the node in a slot for another one. The replacement takes
//! over the old node's location, so diagnostics keep pointing at the text
//! the user wrote, and loses every resolved Nature, so the tree has to be
//! checked again.
//!
//! `Patcher` finds the slots to replace. It matches either by location or by
//! node id, never both, and runs post-order: children are patched before
//! their parent is tested, and a freshly installed replacement is never
//! walked. Nested nodes sharing one location (a `chain` around its `member`)
//! are therefore both replaced, inner first.

use crate::visitor::{strip_types, walk_node_mut, MutVisitor};
use crate::{Location, Node, NodeId};

/// Replace the node in `slot`, returning the old one.
pub fn patch(slot: &mut Node, mut replacement: Node) -> Node {
    replacement.set_location(slot.location());
    strip_types(&mut replacement);
    std::mem::replace(slot, replacement)
}

/// Which slots a `Patcher` replaces.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PatchTarget {
    /// Nodes whose location equals this range exactly.
    Location(Location),
    /// The node carrying this id.
    Id(NodeId),
}

impl PatchTarget {
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            PatchTarget::Location(loc) => node.location() == *loc,
            PatchTarget::Id(id) => node.id() == Some(*id),
        }
    }
}

/// Visitor replacing every slot that matches `target`.
pub struct Patcher<'a> {
    target: PatchTarget,
    replacement: &'a Node,
    patched: usize,
}

impl<'a> Patcher<'a> {
    pub fn new(target: PatchTarget, replacement: &'a Node) -> Self {
        Patcher {
            target,
            replacement,
            patched: 0,
        }
    }

    /// Replacements made so far.
    pub fn patched(&self) -> usize {
        self.patched
    }
}

impl MutVisitor for Patcher<'_> {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
        if self.target.matches(node) {
            patch(node, self.replacement.clone());
            self.patched += 1;
        }
    }
}

/// Patch every slot of `root` matching `target`. Returns the number of
/// replacements.
#[tracing::instrument(level = "debug", skip(root, replacement))]
pub fn patch_tree(root: &mut Node, target: PatchTarget, replacement: &Node) -> usize {
    let mut patcher = Patcher::new(target, replacement);
    patcher.visit_node_mut(root);
    if patcher.patched == 0 {
        tracing::debug!("no node matched");
    }
    patcher.patched
}
