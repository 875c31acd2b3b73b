//! Source locations, serialized as `{"from": .., "to": ..}`.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Half-open byte range `[from, to)` into the source text.
///
/// Patch by location matches on equality of the whole range.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub from: u32,
    pub to: u32,
}

impl Location {
    /// Location of synthesized nodes.
    pub const DUMMY: Location = Location { from: 0, to: 0 };

    #[inline]
    pub const fn new(from: u32, to: u32) -> Self {
        Location { from, to }
    }

    /// Byte range for slicing the source text.
    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.from as usize..self.to as usize
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
