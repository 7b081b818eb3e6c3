//! Style diff engine for stylediff.
//!
//! Computes a deterministic, ordered list of incremental update commands that
//! turns a "before" style document into an "after" one, so a live renderer can
//! patch itself instead of reloading the whole style. Any failure while
//! diffing degrades to a single `setStyle` command.
//!
//! # Key Types
//!
//! - [`StyleDiffer`] / [`diff_styles`] — Orchestrator with the fallback boundary
//! - [`DiffConfig`] — Tunables for source and layer diffing
//! - [`FallbackHook`] — Observer notified when a diff falls back to `setStyle`
//! - [`diff_root`], [`diff_sources`], [`diff_layers`], [`diff_imports`],
//!   [`diff_properties`] — The individual differs
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use stylediff_diff::diff_styles;
//! use stylediff_types::Operation;
//!
//! let before = json!({"version": 8, "zoom": 2, "layers": []});
//! let after = json!({"version": 8, "zoom": 3, "layers": []});
//! let commands = diff_styles(Some(&before), &after);
//! assert_eq!(commands.len(), 1);
//! assert_eq!(commands[0].operation(), Operation::SetZoom);
//! ```

pub mod config;
pub mod differ;
pub mod error;
pub mod hook;
pub mod import;
pub mod layer;
pub mod property;
pub mod root;
pub mod source;
pub mod tracker;

pub use config::DiffConfig;
pub use differ::{diff_styles, StyleDiffer};
pub use error::{DiffError, DiffResult};
pub use hook::{FallbackHook, TracingFallbackHook};
pub use import::diff_imports;
pub use layer::diff_layers;
pub use property::diff_properties;
pub use root::{diff_root, RootDiff};
pub use source::{diff_sources, SourceDiff};
pub use tracker::LayerTracker;
