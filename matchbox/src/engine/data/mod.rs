//! Data Structures Module
//!
//! Holds the need/duplicate partition of a user's collection that the
//! matching logic works on.

pub mod partition;

pub use partition::Partition;
