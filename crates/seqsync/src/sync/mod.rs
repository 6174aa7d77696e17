//! Two-way synchronization between a structured editor and a text editor.
//!
//! The [`SyncCoordinator`] owns the [`Document`](seqsync_core::Document); hosts wire their
//! editors to it through [`TextSink`], [`RenderBridge`] and [`SyncListener`], all optional and
//! supplied at construction.

mod coordinator;
mod history;
mod host;
mod render;
mod timer;

pub use coordinator::{EditDisposition, SyncCoordinator, SyncStats};
pub use history::History;
pub use host::{SyncDirection, SyncListener, SyncStatus, TextSink};
pub use render::{RenderBridge, RenderCompletion, RenderError, RenderResult, RenderedArtifact};
pub use timer::{DebounceTimer, TaskId};
