//! Operator precedence, used by the printer to decide on parentheses.
//!
//! Operators are kept as source text on the nodes; the parser owns the full
//! operator table. These numbers only need to agree with it on ordering.

/// Grouping direction of a binary operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Associativity {
    Left,
    Right,
}

/// Precedence (higher binds tighter) and associativity of a binary operator.
pub fn binary_precedence(op: &str) -> Option<(u16, Associativity)> {
    use Associativity::{Left, Right};
    let entry = match op {
        "or" | "||" => (10, Left),
        "and" | "&&" => (15, Left),
        "==" | "!=" | "<" | ">" | "<=" | ">=" | "in" | "not in" | "matches" | "contains"
        | "startsWith" | "endsWith" => (20, Left),
        ".." => (25, Left),
        "+" | "-" => (30, Left),
        "*" | "/" | "%" => (60, Left),
        "**" | "^" => (100, Right),
        "??" => (500, Left),
        _ => return None,
    };
    Some(entry)
}

/// Precedence of a prefix operator.
pub fn unary_precedence(op: &str) -> Option<u16> {
    match op {
        "not" | "!" => Some(50),
        "-" | "+" => Some(90),
        _ => None,
    }
}

/// Logical connectives; mixing them always gets parentheses.
pub(crate) fn is_boolean(op: &str) -> bool {
    matches!(op, "and" | "&&" | "or" | "||")
}
