//! Source-like rendering of a tree.
//!
//! Binary operands get parentheses only where precedence or associativity
//! requires them, so `a + b * c` prints back unchanged while `(a + b) * c`
//! keeps its parentheses.

use std::fmt::{self, Write};

use expr_stack::ensure_sufficient_stack;

use super::{Node, NodeKind};
use crate::operator::{binary_precedence, is_boolean, unary_precedence, Associativity};

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        print(f, self)
    }
}

fn print(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    ensure_sufficient_stack(|| match &node.kind {
        NodeKind::Nil => f.write_str("nil"),
        NodeKind::Identifier(name) => f.write_str(name),
        NodeKind::Integer(v) => write!(f, "{v}"),
        NodeKind::Float(v) => write!(f, "{v:?}"),
        NodeKind::Bool(v) => write!(f, "{v}"),
        NodeKind::String(s) => write!(f, "{s:?}"),
        NodeKind::Constant(v) => write!(f, "{v}"),
        NodeKind::Unary { operator, node } => {
            f.write_str(operator)?;
            let word = operator.chars().all(char::is_alphabetic);
            if word {
                f.write_char(' ')?;
            }
            let wrap = match &node.kind {
                NodeKind::Binary { .. }
                | NodeKind::Conditional { .. }
                | NodeKind::VariableDeclarator { .. } => true,
                NodeKind::Unary { .. } => !word,
                _ => false,
            };
            operand(f, node, wrap)
        }
        NodeKind::Binary {
            operator,
            left,
            right,
        } => {
            operand(f, left, needs_parens(operator, left, false))?;
            write!(f, " {operator} ")?;
            operand(f, right, needs_parens(operator, right, true))
        }
        NodeKind::Chain { node } => print(f, node),
        NodeKind::Member {
            node: object,
            property,
            optional,
            ..
        } => {
            operand(f, object, is_compound(object))?;
            if *optional {
                f.write_str("?.")?;
            }
            match &property.kind {
                NodeKind::String(name) if is_identifier(name) => {
                    if !*optional {
                        f.write_char('.')?;
                    }
                    f.write_str(name)
                }
                _ => {
                    f.write_char('[')?;
                    print(f, property)?;
                    f.write_char(']')
                }
            }
        }
        NodeKind::Slice {
            node: object,
            from,
            to,
        } => {
            operand(f, object, is_compound(object))?;
            f.write_char('[')?;
            if let Some(from) = from {
                print(f, from)?;
            }
            f.write_char(':')?;
            if let Some(to) = to {
                print(f, to)?;
            }
            f.write_char(']')
        }
        NodeKind::Call { callee, arguments } => {
            operand(f, callee, is_compound(callee))?;
            list(f, '(', arguments, ')')
        }
        NodeKind::Builtin {
            name, arguments, ..
        } => {
            f.write_str(name)?;
            list(f, '(', arguments, ')')
        }
        NodeKind::Predicate { node } => {
            f.write_char('{')?;
            print(f, node)?;
            f.write_char('}')
        }
        NodeKind::Pointer(name) => write!(f, "#{name}"),
        NodeKind::Conditional { cond, exp1, exp2 } => {
            let wrap = matches!(
                cond.kind,
                NodeKind::Conditional { .. } | NodeKind::VariableDeclarator { .. }
            );
            operand(f, cond, wrap)?;
            f.write_str(" ? ")?;
            print(f, exp1)?;
            f.write_str(" : ")?;
            print(f, exp2)
        }
        NodeKind::VariableDeclarator { name, value, expr } => {
            write!(f, "let {name} = ")?;
            print(f, value)?;
            f.write_str("; ")?;
            print(f, expr)
        }
        NodeKind::Array { nodes } => list(f, '[', nodes, ']'),
        NodeKind::Map { pairs } => list(f, '{', pairs, '}'),
        NodeKind::Pair { key, value } => {
            print(f, key)?;
            f.write_str(": ")?;
            print(f, value)
        }
    })
}

fn operand(f: &mut fmt::Formatter<'_>, node: &Node, wrap: bool) -> fmt::Result {
    if wrap {
        f.write_char('(')?;
        print(f, node)?;
        f.write_char(')')
    } else {
        print(f, node)
    }
}

fn list(f: &mut fmt::Formatter<'_>, open: char, items: &[Node], close: char) -> fmt::Result {
    f.write_char(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        print(f, item)?;
    }
    f.write_char(close)
}

/// Operands that bind looser than postfix access.
fn is_compound(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::Unary { .. }
            | NodeKind::Binary { .. }
            | NodeKind::Conditional { .. }
            | NodeKind::VariableDeclarator { .. }
    )
}

fn needs_parens(parent: &str, child: &Node, right_side: bool) -> bool {
    let Some((parent_prec, assoc)) = binary_precedence(parent) else {
        return is_compound(child);
    };
    match &child.kind {
        NodeKind::Binary { operator, .. } => {
            let Some((child_prec, _)) = binary_precedence(operator) else {
                return true;
            };
            if is_boolean(parent) && is_boolean(operator) && parent != operator {
                return true;
            }
            if child_prec != parent_prec {
                return child_prec < parent_prec;
            }
            match assoc {
                Associativity::Left => right_side,
                Associativity::Right => !right_side,
            }
        }
        NodeKind::Unary { operator, .. } => {
            !unary_precedence(operator).is_some_and(|prec| prec >= parent_prec)
        }
        NodeKind::Conditional { .. } | NodeKind::VariableDeclarator { .. } => true,
        _ => false,
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
