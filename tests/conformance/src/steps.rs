//! Step definitions for cucumber tests

pub mod given;
pub mod when;
pub mod then;
