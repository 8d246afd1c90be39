//! # Foundry Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Fixture catalogs, players and units
//! - Scripted random sources
//! - Determinism test harness
//! - Balance matchup runs
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod balance;
pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
