//! Merge configuration and overlay manifests.

mod manifest;
mod merge_config;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use manifest::*;
pub use merge_config::*;
