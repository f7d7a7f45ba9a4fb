//! Utility functions and types.

mod mode;
mod path;
mod term;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use mode::*;
pub use path::*;
pub use term::*;
