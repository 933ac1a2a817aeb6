//! jne-core: path-addressed JSON node access, mutation and edit sessions
//!
//! This crate focuses on a small, well-factored surface:
//! - Structural paths (`$["a"][0]` labels, JSON Pointer parsing)
//! - Read a node at a path without ever failing (`resolve`)
//! - Build a new document with a node replaced, creating missing containers (`assign`)
//! - A Viewing/Editing session that commits drafts into injected stores
//!
pub mod document;
pub mod edit;
pub mod error;
pub mod path;
pub mod session;
pub mod store;

pub use document::{Document, EditOpts, to_pretty};
pub use edit::{MAX_ARRAY_PADDING, assign, assign_text, resolve, resolve_value, resolve_with};
pub use error::EditError;
pub use path::{Path, Segment};
pub use session::{EditSession, Mode};
pub use store::{DocumentStore, FileStore, MemoryMirror, MemoryStore, MirrorStore, SyncOptions};
