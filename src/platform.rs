//! Functions that wrap platform specific functionality, such as reading files
//! picked or dropped by the user.
mod fileio;

pub use fileio::*;
