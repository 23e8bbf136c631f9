//! Cucumber behaviour suite for the haystack comparator.
//!
//! Run with: cargo test --test conformance

pub mod steps;
pub mod world;
