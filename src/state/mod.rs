//! State management module
//!
//! This module contains all the core data structures for the application:
//! - Project: the top-level container (pages, segments, audio, chain mode)
//! - Page / Segment / Region: the authoring model
//! - SelectionState: selected segment ids plus the range anchor
//! - ClipboardState: copied segment snapshots
//! - History: snapshot-based undo/redo
//! - ViewState: canvas zoom/pan and tool mode

mod clipboard;
mod history;
mod project;
mod selection;
mod view;

pub use clipboard::ClipboardState;
pub use history::{History, Snapshot};
pub use project::*;
pub use selection::{SelectMode, SelectionState};
pub use view::{ViewState, ZOOM_MAX, ZOOM_MIN};
