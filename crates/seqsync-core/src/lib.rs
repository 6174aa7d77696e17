#![forbid(unsafe_code)]

//! PlantUML sequence-diagram parser, generator and merge policy (headless).
//!
//! Design goals:
//! - the structured model is the source of truth for blocks, text for actors and flat messages
//! - generation is total and deterministic; parsing never fails on a single bad line
//! - runtime-agnostic async APIs (no specific executor required)

pub mod actors;
pub mod config;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod syntax;

pub use actors::{ActorKind, ActorRegistry};
pub use config::{EngineConfig, InputLimits};
pub use error::{Error, Result};
pub use models::{
    ActorSet, Condition, ConditionKind, Document, DocumentStatistics, Loop, Message, Node,
    Parallel,
};
pub use reconcile::{MergeOutcome, reconcile, reconcile_with_outcome};
pub use syntax::{Diagnostic, Severity};

/// Explicit engine handle; hosts construct one and pass it where needed.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the title line emitted by [`Engine::generate`]. `None` disables it.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.config.title = title;
        self
    }

    pub fn with_limits(mut self, limits: InputLimits) -> Self {
        self.config.limits = limits;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rejects text above the configured line/byte ceilings.
    pub fn check_limits(&self, text: &str) -> Result<()> {
        self.config.limits.check(text)
    }

    /// Parses marker-delimited text into a document.
    ///
    /// - `Err(Error::InputTooLarge)`: rejected before parsing.
    /// - `Ok(None)`: `@startuml` or `@enduml` is missing; see [`Engine::extract_actors`] for
    ///   the degraded path.
    /// - `Ok(Some(_))`: possibly empty document. Unrecognized lines are skipped.
    pub fn parse_sync(&self, text: &str) -> Result<Option<Document>> {
        self.check_limits(text)?;
        let start = std::time::Instant::now();
        let parsed = syntax::parse_document(text);
        tracing::trace!(
            elapsed = ?start.elapsed(),
            input_bytes = text.len(),
            parsed = parsed.is_some(),
            "parse"
        );
        Ok(parsed)
    }

    pub async fn parse(&self, text: &str) -> Result<Option<Document>> {
        self.parse_sync(text)
    }

    /// Actor declarations only, for text that [`Engine::parse_sync`] could not structure.
    pub fn extract_actors(&self, text: &str) -> ActorSet {
        syntax::extract_actors(text)
    }

    /// Renders a document. Total: every document yields well-formed text.
    pub fn generate(&self, document: &Document) -> String {
        syntax::generate(document, &self.config)
    }

    pub fn format(&self, text: &str) -> Result<String> {
        self.check_limits(text)?;
        Ok(syntax::format::format_text(text, &self.config.indent_unit))
    }

    pub fn validate(&self, text: &str) -> Vec<Diagnostic> {
        syntax::validate::validate_text(text, &self.config.limits)
    }
}

#[cfg(test)]
mod tests;
