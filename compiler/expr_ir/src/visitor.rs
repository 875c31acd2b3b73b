//! Tree Visitor Pattern
//!
//! Two traversals over the same closed variant set:
//!
//! - `Visitor<'ast>` borrows the tree and can collect into its own state.
//! - `MutVisitor` gets every slot as `&mut Node`, which is what a patcher
//!   needs to swap a subtree out.
//!
//! Default implementations call the matching `walk_*` function. An override
//! that wants post-order (children before parent) calls `walk_*` first.
//!
//! # Example
//!
//! ```text
//! struct CountIdentifiers {
//!     count: usize,
//! }
//!
//! impl<'ast> Visitor<'ast> for CountIdentifiers {
//!     fn visit_node(&mut self, node: &'ast Node) {
//!         if let NodeKind::Identifier(_) = node.kind {
//!             self.count += 1;
//!         }
//!         walk_node(self, node);
//!     }
//! }
//! ```

use expr_stack::ensure_sufficient_stack;

use crate::{Node, NodeId, NodeKind};

/// Read-only traversal.
pub trait Visitor<'ast> {
    fn visit_node(&mut self, node: &'ast Node) {
        walk_node(self, node);
    }
}

/// Visit every direct child of `node`, in source order.
pub fn walk_node<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, node: &'ast Node) {
    ensure_sufficient_stack(|| match &node.kind {
        NodeKind::Nil
        | NodeKind::Identifier(_)
        | NodeKind::Integer(_)
        | NodeKind::Float(_)
        | NodeKind::Bool(_)
        | NodeKind::String(_)
        | NodeKind::Constant(_)
        | NodeKind::Pointer(_) => {}
        NodeKind::Unary { node, .. }
        | NodeKind::Chain { node }
        | NodeKind::Predicate { node } => visitor.visit_node(node),
        NodeKind::Binary { left, right, .. } => {
            visitor.visit_node(left);
            visitor.visit_node(right);
        }
        NodeKind::Member { node, property, .. } => {
            visitor.visit_node(node);
            visitor.visit_node(property);
        }
        NodeKind::Slice { node, from, to } => {
            visitor.visit_node(node);
            if let Some(from) = from {
                visitor.visit_node(from);
            }
            if let Some(to) = to {
                visitor.visit_node(to);
            }
        }
        NodeKind::Call { callee, arguments } => {
            visitor.visit_node(callee);
            for arg in arguments {
                visitor.visit_node(arg);
            }
        }
        NodeKind::Builtin { arguments, map, .. } => {
            for arg in arguments {
                visitor.visit_node(arg);
            }
            if let Some(map) = map {
                visitor.visit_node(map);
            }
        }
        NodeKind::Conditional { cond, exp1, exp2 } => {
            visitor.visit_node(cond);
            visitor.visit_node(exp1);
            visitor.visit_node(exp2);
        }
        NodeKind::VariableDeclarator { value, expr, .. } => {
            visitor.visit_node(value);
            visitor.visit_node(expr);
        }
        NodeKind::Array { nodes: items } | NodeKind::Map { pairs: items } => {
            for item in items {
                visitor.visit_node(item);
            }
        }
        NodeKind::Pair { key, value } => {
            visitor.visit_node(key);
            visitor.visit_node(value);
        }
    });
}

/// Traversal with exclusive access to every slot.
pub trait MutVisitor {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }
}

/// Visit every direct child slot of `node`, in source order.
pub fn walk_node_mut<V: MutVisitor + ?Sized>(visitor: &mut V, node: &mut Node) {
    ensure_sufficient_stack(|| match &mut node.kind {
        NodeKind::Nil
        | NodeKind::Identifier(_)
        | NodeKind::Integer(_)
        | NodeKind::Float(_)
        | NodeKind::Bool(_)
        | NodeKind::String(_)
        | NodeKind::Constant(_)
        | NodeKind::Pointer(_) => {}
        NodeKind::Unary { node, .. }
        | NodeKind::Chain { node }
        | NodeKind::Predicate { node } => visitor.visit_node_mut(node),
        NodeKind::Binary { left, right, .. } => {
            visitor.visit_node_mut(left);
            visitor.visit_node_mut(right);
        }
        NodeKind::Member { node, property, .. } => {
            visitor.visit_node_mut(node);
            visitor.visit_node_mut(property);
        }
        NodeKind::Slice { node, from, to } => {
            visitor.visit_node_mut(node);
            if let Some(from) = from {
                visitor.visit_node_mut(from);
            }
            if let Some(to) = to {
                visitor.visit_node_mut(to);
            }
        }
        NodeKind::Call { callee, arguments } => {
            visitor.visit_node_mut(callee);
            for arg in arguments {
                visitor.visit_node_mut(arg);
            }
        }
        NodeKind::Builtin { arguments, map, .. } => {
            for arg in arguments {
                visitor.visit_node_mut(arg);
            }
            if let Some(map) = map {
                visitor.visit_node_mut(map);
            }
        }
        NodeKind::Conditional { cond, exp1, exp2 } => {
            visitor.visit_node_mut(cond);
            visitor.visit_node_mut(exp1);
            visitor.visit_node_mut(exp2);
        }
        NodeKind::VariableDeclarator { value, expr, .. } => {
            visitor.visit_node_mut(value);
            visitor.visit_node_mut(expr);
        }
        NodeKind::Array { nodes: items } | NodeKind::Map { pairs: items } => {
            for item in items {
                visitor.visit_node_mut(item);
            }
        }
        NodeKind::Pair { key, value } => {
            visitor.visit_node_mut(key);
            visitor.visit_node_mut(value);
        }
    });
}

struct IdAssigner {
    next: u32,
}

impl MutVisitor for IdAssigner {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
        node.meta.id = Some(NodeId::new(self.next));
        self.next += 1;
    }
}

/// Number every node in post-order, starting at 0. Returns the node count.
pub fn assign_ids(root: &mut Node) -> u32 {
    let mut assigner = IdAssigner { next: 0 };
    assigner.visit_node_mut(root);
    assigner.next
}

struct TypeStripper;

impl MutVisitor for TypeStripper {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
        node.clear_nature();
    }
}

/// Drop every resolved Nature in the subtree.
pub fn strip_types(root: &mut Node) {
    TypeStripper.visit_node_mut(root);
}

#[cfg(test)]
mod tests {
    use expr_nature::{schema, Nature};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Location;

    const L: Location = Location::DUMMY;

    struct NodeCounter {
        count: usize,
    }

    impl<'ast> Visitor<'ast> for NodeCounter {
        fn visit_node(&mut self, node: &'ast Node) {
            self.count += 1;
            walk_node(self, node);
        }
    }

    struct IdentCollector<'ast> {
        names: Vec<&'ast str>,
    }

    impl<'ast> Visitor<'ast> for IdentCollector<'ast> {
        fn visit_node(&mut self, node: &'ast Node) {
            if let NodeKind::Identifier(name) = &node.kind {
                self.names.push(name);
            }
            walk_node(self, node);
        }
    }

    fn sample() -> Node {
        // let x = a[1:]; x ? f(b) : {"k": c}
        Node::variable_declarator(
            L,
            "x",
            Node::slice(L, Node::identifier(L, "a"), Some(Node::integer(L, 1)), None),
            Node::conditional(
                L,
                Node::identifier(L, "x"),
                Node::call(L, Node::identifier(L, "f"), vec![Node::identifier(L, "b")]),
                Node::map(
                    L,
                    vec![Node::pair(L, Node::string(L, "k"), Node::identifier(L, "c"))],
                ),
            ),
        )
    }

    #[test]
    fn test_visit_counts_every_node() {
        let mut counter = NodeCounter { count: 0 };
        counter.visit_node(&sample());
        assert_eq!(counter.count, 13);
    }

    #[test]
    fn test_visit_source_order() {
        let tree = sample();
        let mut collector = IdentCollector { names: vec![] };
        collector.visit_node(&tree);
        assert_eq!(collector.names, vec!["a", "x", "f", "b", "c"]);
    }

    #[test]
    fn test_visit_optional_children() {
        let mut builtin = Node::builtin(L, "sum", vec![Node::identifier(L, "xs")]);
        if let NodeKind::Builtin { map, .. } = &mut builtin.kind {
            *map = Some(Box::new(Node::pointer(L, "")));
        }
        let mut counter = NodeCounter { count: 0 };
        counter.visit_node(&builtin);
        assert_eq!(counter.count, 3);
    }

    #[test]
    fn test_assign_ids_post_order() {
        let mut tree = Node::binary(
            L,
            "+",
            Node::integer(L, 1),
            Node::unary(L, "-", Node::integer(L, 2)),
        );
        assert_eq!(assign_ids(&mut tree), 4);
        assert_eq!(tree.id(), Some(NodeId::new(3)));
        let NodeKind::Binary { left, right, .. } = &tree.kind else {
            panic!("expected binary");
        };
        assert_eq!(left.id(), Some(NodeId::new(0)));
        assert_eq!(right.id(), Some(NodeId::new(2)));
    }

    #[test]
    fn test_strip_types_reaches_every_node() {
        let mut tree = Node::array(L, vec![Node::integer(L, 1)]);
        tree.set_nature(Nature::array_of(Nature::of(schema::int())));
        if let NodeKind::Array { nodes } = &mut tree.kind {
            nodes[0].set_type(schema::int());
        }
        strip_types(&mut tree);
        assert!(tree.nature().is_unknown());
        let NodeKind::Array { nodes } = &tree.kind else {
            panic!("expected array");
        };
        assert_eq!(nodes[0].meta.type_name, None);
    }

    #[test]
    fn test_visit_deeply_nested() {
        let mut tree = Node::integer(L, 0);
        for _ in 0..10_000 {
            tree = Node::unary(L, "-", tree);
        }
        let mut counter = NodeCounter { count: 0 };
        counter.visit_node(&tree);
        assert_eq!(counter.count, 10_001);
        assert_eq!(assign_ids(&mut tree), 10_001);
        // Take the chain apart iteratively so the drop stays shallow.
        while let NodeKind::Unary { node, .. } = tree.kind {
            tree = *node;
        }
    }
}
