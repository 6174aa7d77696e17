use super::render::RenderError;
use seqsync_core::{Document, Error, MergeOutcome};

/// Receives regenerated text for the host's editor buffer.
///
/// Implementations may feed the text straight back into
/// [`SyncCoordinator::on_text_edit`](super::SyncCoordinator::on_text_edit); that echo is
/// suppressed.
pub trait TextSink {
    fn replace_text(&self, text: &str);
}

impl<F: Fn(&str)> TextSink for F {
    fn replace_text(&self, text: &str) {
        self(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirection {
    TextToModel,
    ModelToText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// Both sides agree after a pass.
    Synced {
        direction: SyncDirection,
        outcome: Option<MergeOutcome>,
    },
    /// Text edits were merged but blocks built in the model were kept over the text's.
    Preserved { blocks: usize },
    /// The text had no markers; only its actor declarations were taken.
    Recovered { actors: usize },
    /// The pass found nothing to apply.
    Unchanged,
    /// The text was not parsed; the document is untouched.
    Rejected(Error),
    Rendered,
    RenderFailed(RenderError),
}

/// Status notifications for the host's UI. Every method has a no-op default.
pub trait SyncListener {
    fn on_status(&self, _status: &SyncStatus) {}

    fn on_document_changed(&self, _document: &Document) {}
}
