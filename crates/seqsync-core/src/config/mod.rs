use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TITLE: &str = "Business Flow";

/// Size ceilings checked before any line reaches the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    pub max_lines: usize,
    pub max_bytes: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_lines: 1000,
            max_bytes: 100_000,
        }
    }
}

impl InputLimits {
    pub fn check(&self, text: &str) -> Result<()> {
        let bytes = text.len();
        // `split('\n')` instead of `lines()`: a trailing newline still counts as a line, as
        // in an editor buffer.
        let lines = text.split('\n').count();
        if lines > self.max_lines || bytes > self.max_bytes {
            return Err(Error::InputTooLarge {
                lines,
                bytes,
                max_lines: self.max_lines,
                max_bytes: self.max_bytes,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub limits: InputLimits,
    /// One nesting level of generated code.
    pub indent_unit: String,
    /// Title line emitted above the actor declarations. `None` disables the line.
    pub title: Option<String>,
    /// Appended to the text of uncertain messages.
    pub uncertain_suffix: String,
    pub debounce_ms: u64,
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            limits: InputLimits::default(),
            indent_unit: "  ".to_string(),
            title: Some(DEFAULT_TITLE.to_string()),
            uncertain_suffix: "?".to_string(),
            debounce_ms: 500,
            history_limit: 50,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.indent_unit.is_empty() || !self.indent_unit.chars().all(|c| c == ' ' || c == '\t')
        {
            return Err(Error::InvalidConfig {
                message: format!(
                    "indent_unit must be non-empty whitespace, got {:?}",
                    self.indent_unit
                ),
            });
        }
        if self.limits.max_lines == 0 || self.limits.max_bytes == 0 {
            return Err(Error::InvalidConfig {
                message: "input limits must be greater than zero".to_string(),
            });
        }
        // The parser strips these glyphs; any other suffix would not survive a round trip.
        if !matches!(self.uncertain_suffix.as_str(), "?" | "？") {
            return Err(Error::InvalidConfig {
                message: format!(
                    "uncertain_suffix must be `?` or `？`, got {:?}",
                    self.uncertain_suffix
                ),
            });
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
