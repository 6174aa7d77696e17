use super::history::History;
use super::host::{SyncDirection, SyncListener, SyncStatus, TextSink};
use super::render::{RenderBridge, RenderResult, RenderedArtifact};
use super::timer::{DebounceTimer, TaskId};
use seqsync_core::{Document, Engine, MergeOutcome, reconcile_with_outcome};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditDisposition {
    /// A text pass runs once the debounce delay passes without further edits.
    Scheduled(TaskId),
    /// Committed and pushed to the text side.
    Applied,
    /// The edit left the document as it was.
    Unchanged,
    /// Echo of an in-flight pass in the other direction; dropped.
    Suppressed,
    /// Sync is off: the edit was recorded on its own side only.
    Disabled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub parse_passes: u64,
    pub generate_passes: u64,
    pub suppressed_echoes: u64,
    pub rejected_inputs: u64,
    pub noop_passes: u64,
    pub fallback_passes: u64,
    pub renders_requested: u64,
    pub render_failures: u64,
    pub last_parse_duration: Option<Duration>,
}

/// Holds a direction flag raised for the lifetime of one pass.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn raise(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[derive(Debug)]
struct SyncState {
    document: Document,
    text: String,
    history: History,
    timer: DebounceTimer<String>,
    pending: Option<TaskId>,
    stats: SyncStats,
}

#[derive(Debug, Default)]
struct RenderState {
    latest_request: u64,
    last_artifact: Option<RenderedArtifact>,
    failures: u64,
}

/// Keeps a [`Document`] and its text form consistent under edits from either side.
///
/// Single-threaded and re-entrant: collaborators may call back into the coordinator from
/// their callbacks (a text sink feeding the editor's change event straight back into
/// [`SyncCoordinator::on_text_edit`], for instance). Edits arriving while a pass in the other
/// direction is running are dropped and counted as suppressed echoes.
///
/// Time is virtual. Text edits are debounced on an internal [`DebounceTimer`] that only moves
/// when the host calls [`SyncCoordinator::advance`] (or [`SyncCoordinator::flush`]).
pub struct SyncCoordinator {
    engine: Engine,
    state: RefCell<SyncState>,
    render: Rc<RefCell<RenderState>>,
    model_to_text_in_flight: Cell<bool>,
    text_to_model_in_flight: Cell<bool>,
    sync_enabled: Cell<bool>,
    text_sink: Option<Box<dyn TextSink>>,
    render_bridge: Option<Box<dyn RenderBridge>>,
    listener: Option<Rc<dyn SyncListener>>,
}

impl SyncCoordinator {
    pub fn new(engine: Engine) -> Self {
        let document = Document::new();
        let text = engine.generate(&document);
        let history = History::new(engine.config().history_limit);
        Self {
            engine,
            state: RefCell::new(SyncState {
                document,
                text,
                history,
                timer: DebounceTimer::new(),
                pending: None,
                stats: SyncStats::default(),
            }),
            render: Rc::new(RefCell::new(RenderState::default())),
            model_to_text_in_flight: Cell::new(false),
            text_to_model_in_flight: Cell::new(false),
            sync_enabled: Cell::new(true),
            text_sink: None,
            render_bridge: None,
            listener: None,
        }
    }

    /// Starting document; the initial text is generated from it.
    pub fn with_document(mut self, document: Document) -> Self {
        let text = self.engine.generate(&document);
        let state = self.state.get_mut();
        state.document = document;
        state.text = text;
        self
    }

    pub fn with_text_sink(mut self, sink: impl TextSink + 'static) -> Self {
        self.text_sink = Some(Box::new(sink));
        self
    }

    pub fn with_render_bridge(mut self, bridge: impl RenderBridge + 'static) -> Self {
        self.render_bridge = Some(Box::new(bridge));
        self
    }

    pub fn with_listener<L: SyncListener + 'static>(mut self, listener: Rc<L>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn document(&self) -> Document {
        self.state.borrow().document.clone()
    }

    /// Latest text known to the coordinator, from either side.
    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    pub fn stats(&self) -> SyncStats {
        let mut stats = self.state.borrow().stats;
        stats.render_failures = self.render.borrow().failures;
        stats
    }

    /// Most recent successful preview; kept across failed renders.
    pub fn last_render(&self) -> Option<RenderedArtifact> {
        self.render.borrow().last_artifact.clone()
    }

    pub fn is_sync_enabled(&self) -> bool {
        self.sync_enabled.get()
    }

    pub fn has_pending_text_pass(&self) -> bool {
        self.state.borrow().pending.is_some()
    }

    /// Time until the pending text pass runs.
    pub fn pending_delay(&self) -> Option<Duration> {
        self.state.borrow().timer.next_due_in()
    }

    pub fn can_undo(&self) -> bool {
        self.state.borrow().history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.borrow().history.can_redo()
    }

    /// Records an edit of the text buffer and (re)starts the debounce delay.
    pub fn on_text_edit(&self, text: impl Into<String>) -> EditDisposition {
        if self.model_to_text_in_flight.get() {
            self.state.borrow_mut().stats.suppressed_echoes += 1;
            tracing::trace!("suppressing text edit echoed from a model-to-text pass");
            return EditDisposition::Suppressed;
        }

        let text = text.into();
        let delay = self.engine.config().debounce();
        let mut state = self.state.borrow_mut();
        if !self.sync_enabled.get() {
            state.text = text;
            return EditDisposition::Disabled;
        }
        state.text = text.clone();
        if let Some(previous) = state.pending.take() {
            state.timer.cancel(previous);
        }
        let id = state.timer.schedule(delay, text);
        state.pending = Some(id);
        EditDisposition::Scheduled(id)
    }

    /// Moves the debounce clock forward and runs the text pass if it became due.
    /// Returns the number of passes run.
    pub fn advance(&self, elapsed: Duration) -> usize {
        let due = {
            let mut state = self.state.borrow_mut();
            let due = state.timer.advance(elapsed);
            let fired = state.pending.is_some_and(|id| !state.timer.is_pending(id));
            if fired {
                state.pending = None;
            }
            due
        };
        self.run_due(due)
    }

    /// Runs the pending text pass immediately.
    pub fn flush(&self) -> usize {
        let due = {
            let mut state = self.state.borrow_mut();
            state.pending = None;
            state.timer.drain()
        };
        self.run_due(due)
    }

    /// Mutates the document, then regenerates the text and pushes it to the sink.
    ///
    /// `edit` runs without any internal borrow held but must not call back into the
    /// coordinator. Referenced actors are re-inserted afterwards.
    pub fn apply_model_edit(&self, edit: impl FnOnce(&mut Document)) -> EditDisposition {
        if self.suppress_model_edit() {
            return EditDisposition::Suppressed;
        }

        let mut document = self.document();
        edit(&mut document);
        document.ensure_referenced_actors();
        if document == self.state.borrow().document {
            return EditDisposition::Unchanged;
        }

        let _in_flight = InFlight::raise(&self.model_to_text_in_flight);
        self.commit(document);
        if !self.sync_enabled.get() {
            return EditDisposition::Disabled;
        }
        self.push_model_to_text();
        EditDisposition::Applied
    }

    pub fn replace_document(&self, document: Document) -> EditDisposition {
        self.apply_model_edit(move |current| *current = document)
    }

    pub fn undo(&self) -> bool {
        self.step_history(History::undo)
    }

    pub fn redo(&self) -> bool {
        self.step_history(History::redo)
    }

    /// Turning sync back on regenerates the text from the model; text edits made while it was
    /// off are overwritten.
    pub fn set_sync_enabled(&self, enabled: bool) {
        let was_enabled = self.sync_enabled.replace(enabled);
        if enabled == was_enabled {
            return;
        }
        if enabled {
            tracing::debug!("sync enabled; regenerating text from the model");
            let _in_flight = InFlight::raise(&self.model_to_text_in_flight);
            self.push_model_to_text();
        } else {
            tracing::debug!("sync disabled");
            let mut state = self.state.borrow_mut();
            if let Some(pending) = state.pending.take() {
                state.timer.cancel(pending);
            }
        }
    }

    fn suppress_model_edit(&self) -> bool {
        if self.text_to_model_in_flight.get() || self.model_to_text_in_flight.get() {
            self.state.borrow_mut().stats.suppressed_echoes += 1;
            tracing::trace!("suppressing model edit issued during an in-flight pass");
            return true;
        }
        false
    }

    fn step_history(&self, step: fn(&mut History, Document) -> Option<Document>) -> bool {
        if self.suppress_model_edit() {
            return false;
        }

        let _in_flight = InFlight::raise(&self.model_to_text_in_flight);
        let restored = {
            let mut state = self.state.borrow_mut();
            let current = state.document.clone();
            match step(&mut state.history, current) {
                Some(document) => {
                    state.document = document;
                    true
                }
                None => false,
            }
        };
        if !restored {
            return false;
        }
        self.notify_document_changed();
        if self.sync_enabled.get() {
            self.push_model_to_text();
        }
        true
    }

    fn run_due(&self, due: Vec<String>) -> usize {
        let passes = due.len();
        for text in due {
            self.run_text_pass(&text);
        }
        passes
    }

    fn run_text_pass(&self, text: &str) {
        if self.text_to_model_in_flight.get() {
            tracing::debug!("text pass already running; dropping nested pass");
            return;
        }
        let _in_flight = InFlight::raise(&self.text_to_model_in_flight);

        let start = Instant::now();
        let parsed = self.engine.parse_sync(text);
        {
            let mut state = self.state.borrow_mut();
            state.stats.parse_passes += 1;
            state.stats.last_parse_duration = Some(start.elapsed());
        }

        let status = match parsed {
            Err(err) => {
                tracing::warn!(error = %err, "text rejected before parsing");
                self.state.borrow_mut().stats.rejected_inputs += 1;
                SyncStatus::Rejected(err)
            }
            Ok(None) => self.recover_actors(text),
            Ok(Some(parsed)) if parsed.is_empty() => {
                tracing::debug!("text has markers but no content; refreshing preview only");
                self.state.borrow_mut().stats.noop_passes += 1;
                self.request_render(text);
                SyncStatus::Unchanged
            }
            Ok(Some(parsed)) => self.merge_parsed(text, parsed),
        };
        self.notify(&status);
    }

    fn recover_actors(&self, text: &str) -> SyncStatus {
        let actors = self.engine.extract_actors(text);
        if actors.is_empty() {
            tracing::debug!("no markers and no actor declarations; nothing to apply");
            self.state.borrow_mut().stats.noop_passes += 1;
            return SyncStatus::Unchanged;
        }

        let recovered = actors.len();
        let mut document = self.document();
        document.actors = actors;
        document.ensure_referenced_actors();
        tracing::debug!(actors = recovered, "taking actor declarations from unstructured text");
        self.state.borrow_mut().stats.fallback_passes += 1;
        if document != self.state.borrow().document {
            self.commit(document);
        }
        SyncStatus::Recovered { actors: recovered }
    }

    fn merge_parsed(&self, text: &str, parsed: Document) -> SyncStatus {
        let previous = self.document();
        let (merged, outcome) = reconcile_with_outcome(&previous, parsed);
        tracing::debug!(?outcome, "merged text into the model");
        self.request_render(text);
        if merged == previous {
            self.state.borrow_mut().stats.noop_passes += 1;
            return SyncStatus::Unchanged;
        }

        self.commit(merged);
        match outcome {
            MergeOutcome::Merged {
                preserved_blocks: 0,
                ..
            }
            | MergeOutcome::NodesKept => SyncStatus::Synced {
                direction: SyncDirection::TextToModel,
                outcome: Some(outcome),
            },
            MergeOutcome::Merged {
                preserved_blocks, ..
            }
            | MergeOutcome::BlocksOnly { preserved_blocks } => SyncStatus::Preserved {
                blocks: preserved_blocks,
            },
        }
    }

    fn commit(&self, document: Document) {
        {
            let mut state = self.state.borrow_mut();
            let previous = std::mem::replace(&mut state.document, document);
            state.history.record(previous);
        }
        self.notify_document_changed();
    }

    /// Caller holds the model-to-text flag.
    fn push_model_to_text(&self) {
        let text = {
            let mut state = self.state.borrow_mut();
            if let Some(pending) = state.pending.take() {
                state.timer.cancel(pending);
                tracing::debug!("model edit supersedes a pending text pass");
            }
            let text = self.engine.generate(&state.document);
            state.text = text.clone();
            state.stats.generate_passes += 1;
            text
        };

        if let Some(sink) = &self.text_sink {
            sink.replace_text(&text);
        }
        self.request_render(&text);
        self.notify(&SyncStatus::Synced {
            direction: SyncDirection::ModelToText,
            outcome: None,
        });
    }

    fn request_render(&self, text: &str) {
        let Some(bridge) = &self.render_bridge else {
            return;
        };

        let request = {
            let mut render = self.render.borrow_mut();
            render.latest_request += 1;
            render.latest_request
        };
        self.state.borrow_mut().stats.renders_requested += 1;

        let render = Rc::clone(&self.render);
        let listener = self.listener.clone();
        bridge.render(
            text,
            Box::new(move |result: RenderResult| {
                let status = {
                    let mut render = render.borrow_mut();
                    if render.latest_request != request {
                        tracing::trace!(
                            request,
                            latest = render.latest_request,
                            "dropping stale render result"
                        );
                        return;
                    }
                    match result {
                        Ok(artifact) => {
                            render.last_artifact = Some(artifact);
                            SyncStatus::Rendered
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "preview render failed");
                            render.failures += 1;
                            SyncStatus::RenderFailed(err)
                        }
                    }
                };
                if let Some(listener) = listener {
                    listener.on_status(&status);
                }
            }),
        );
    }

    fn notify(&self, status: &SyncStatus) {
        if let Some(listener) = &self.listener {
            listener.on_status(status);
        }
    }

    fn notify_document_changed(&self) {
        if let Some(listener) = &self.listener {
            let document = self.document();
            listener.on_document_changed(&document);
        }
    }
}
