//! Foundation types for stylediff.
//!
//! This crate provides the vocabulary shared by the differ, the reference
//! interpreter and the command-line tool. Every other stylediff crate depends
//! on `stylediff-types`.
//!
//! # Key Types
//!
//! - [`Operation`] — Closed set of update operation names (the wire contract)
//! - [`RootField`] — Style-wide fields that have a dedicated setter
//! - [`Command`] — One typed incremental update with its wire encoding
//! - [`StyleView`] / [`LayerView`] / [`ImportView`] — Borrowed, shape-checked
//!   views over a JSON style document
//! - [`deep_equal`] — Structural equality used to decide what changed

pub mod command;
pub mod equal;
pub mod error;
pub mod operation;
pub mod style;

pub use command::{Command, PropertyKind, WireCommand};
pub use equal::{deep_equal, equal_opt};
pub use error::{TypeError, TypeResult};
pub use operation::{Operation, RootField};
pub use style::{object, optional_object, ImportView, LayerView, Sources, StyleView};
