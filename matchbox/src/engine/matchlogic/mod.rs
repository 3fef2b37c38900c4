//! Match Logic Module
//!
//! Duplicate-for-need exchange discovery between the requesting user and a
//! single candidate.

pub mod matcher;

pub use matcher::Matcher;
