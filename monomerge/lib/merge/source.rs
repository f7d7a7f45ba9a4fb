use std::fmt::{self, Display};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Identifies a source root by its position in the priority list.
///
/// Index 0 is the highest-priority source. Ordering on `SourceId` is priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(usize);

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl SourceId {
    /// Creates a source id for the source at `index` in the priority list.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the position of the source in the priority list.
    pub fn index(&self) -> usize {
        self.0
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
