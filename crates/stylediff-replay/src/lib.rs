//! Reference command interpreter for stylediff.
//!
//! Applies update commands to an owned JSON style document with the
//! semantics a live renderer would give them. Replaying a diff against its
//! before document must reproduce the after document.
//!
//! # Key Types
//!
//! - [`ReplayEngine`] — Applies command lists and checks convergence
//! - [`ReplayOutcome`] — Result of a verified replay

pub mod error;
pub mod replay;

pub use error::{ReplayError, ReplayResult};
pub use replay::{ReplayEngine, ReplayOutcome};
