use std::time::Duration;

/// Output of a preview render, opaque to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// e.g. `image/svg+xml`.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl RenderedArtifact {
    pub fn new(media_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn svg(svg: impl Into<String>) -> Self {
        Self::new("image/svg+xml", svg.into().into_bytes())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Renderer unavailable: {0}")]
    Unavailable(String),

    #[error("Renderer rejected the diagram: {message}")]
    Rejected { message: String },

    #[error("Render timed out after {0:?}")]
    TimedOut(Duration),
}

pub type RenderResult = std::result::Result<RenderedArtifact, RenderError>;

/// Invoked once per request, synchronously or later.
pub type RenderCompletion = Box<dyn FnOnce(RenderResult)>;

/// Turns diagram text into a preview.
///
/// Fire-and-forget: the coordinator never waits for the completion, and a failed render never
/// affects the document. Only the completion of the most recent request is reported.
pub trait RenderBridge {
    fn render(&self, text: &str, completion: RenderCompletion);
}
