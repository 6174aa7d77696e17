//! The PlantUML sequence subset: line classification, tree building, code generation,
//! formatting and structural diagnostics.

pub mod format;
pub mod generator;
pub mod matcher;
pub mod parser;
pub mod validate;

pub use generator::{Generator, generate, quote_name};
pub use matcher::{Arrow, Line, match_line};
pub use parser::{extract_actors, parse_document};
pub use validate::{Diagnostic, Severity};
