//! Location access shared by the native and transport trees.

use crate::{AnyNode, Location, Node};

/// Anything that covers a range of the source text.
pub trait Located {
    fn location(&self) -> Location;
}

impl Located for Node {
    fn location(&self) -> Location {
        self.meta.loc
    }
}

impl Located for AnyNode {
    fn location(&self) -> Location {
        self.loc
    }
}
