use std::fmt;

/// A 1-based source line number.
///
/// The front end stamps every node with the line it came from; the
/// evaluator copies it onto errors. `Line::UNKNOWN` (0) marks synthesized
/// nodes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line(pub u32);

impl Line {
    pub const UNKNOWN: Line = Line(0);

    #[inline]
    pub const fn new(line: u32) -> Self {
        Line(line)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_known(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.0)
    }
}
