//! # cutlist_core - Cabinet Cutting-List Engine
//!
//! `cutlist_core` turns a few cabinet dimensions into the list of board
//! pieces a workshop has to cut. It validates the form input, applies the
//! construction formulas, keeps the running table of cabinets, totals the
//! pieces and board area, saves projects, and exports the table as CSV or
//! PDF. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Pure calculation**: the part calculator has no side effects and no error path
//! - **Explicit state**: the application state is a [`Session`] value changed only by [`update`]
//! - **Rich Errors**: structured error types, not just strings
//! - **JSON-First**: all model types implement Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use cutlist_core::cabinet::CabinetSpec;
//! use cutlist_core::calculations::calculate;
//!
//! let parts = calculate(&CabinetSpec::floor(49.0, 77.1, 55.0, 1).with_stretchers(2, 12.0));
//!
//! assert_eq!(parts[0].description, "body");
//! assert_eq!(parts[0].length_cm, 75.5);
//! assert_eq!(parts.len(), 5);
//! ```
//!
//! ## Modules
//!
//! - [`validation`] - Form input checks and messages
//! - [`calculations`] - Formula tables and the part calculator
//! - [`aggregate`] - Totals over the table
//! - [`project`] - Cabinets, saved projects, preferences
//! - [`session`] - Application state and the action/update loop
//! - [`store`] - Project library over key-value storage
//! - [`export`] - Cutting sheet, CSV and PDF output
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic writes, file locking, schema versions

pub mod aggregate;
pub mod cabinet;
pub mod calculations;
pub mod errors;
pub mod export;
pub mod file_io;
pub mod project;
pub mod session;
pub mod store;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use aggregate::{aggregate, Totals};
pub use cabinet::{CabinetKind, CabinetSpec};
pub use calculations::{calculate, EdgeBanding, Part, PartEdit};
pub use errors::{CutlistError, CutlistResult};
pub use export::{export, ExportArtifact, ExportFormat};
pub use project::{Cabinet, Preferences, Project};
pub use session::{update, Action, Outcome, Session};
pub use store::{KeyValueStore, MemoryStore, ProjectLibrary};
pub use validation::{validate, ValidationReport};
