use super::matcher::{Line, match_line};
use crate::config::InputLimits;
use crate::models::ConditionKind;
use rustc_hash::FxHashSet;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// 1-based; `0` for findings about the whole text.
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    fn error(line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            line,
            message: message.into(),
        }
    }

    fn warning(line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            line,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        if self.line == 0 {
            write!(f, "{severity}: {}", self.message)
        } else {
            write!(f, "{severity}: line {}: {}", self.line, self.message)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenBlock {
    Loop,
    Condition(ConditionKind),
    Parallel,
}

impl OpenBlock {
    fn keyword(self) -> &'static str {
        match self {
            OpenBlock::Loop => "loop",
            OpenBlock::Condition(kind) => kind.keyword(),
            OpenBlock::Parallel => "par",
        }
    }

    fn accepts_else(self) -> bool {
        matches!(
            self,
            OpenBlock::Condition(ConditionKind::Alt) | OpenBlock::Parallel
        )
    }
}

/// Structural diagnostics for hand-written text.
///
/// The parser itself is tolerant (it skips or repairs everything reported here); this is what a
/// host shows next to the editor. Results are ordered by line, whole-text findings first.
pub fn validate_text(text: &str, limits: &InputLimits) -> Vec<Diagnostic> {
    if let Err(err) = limits.check(text) {
        return vec![Diagnostic::error(0, err.to_string())];
    }

    let lines: Vec<(usize, Line<'_>)> = text
        .lines()
        .enumerate()
        .map(|(i, raw)| (i + 1, match_line(raw)))
        .collect();

    let mut out = Vec::new();
    let start = lines
        .iter()
        .find(|(_, l)| matches!(l, Line::StartMarker))
        .map(|(n, _)| *n);
    let end = lines
        .iter()
        .filter(|(n, l)| matches!(l, Line::EndMarker) && start.is_some_and(|s| *n > s))
        .map(|(n, _)| *n)
        .next();
    if start.is_none() {
        out.push(Diagnostic::error(0, "missing @startuml"));
    }
    if end.is_none() {
        out.push(Diagnostic::error(0, "missing @enduml"));
    }

    let mut declared: FxHashSet<&str> = FxHashSet::default();
    for (_, line) in &lines {
        if let Line::ActorDecl { name, alias, .. } = line {
            declared.insert(*name);
            if let Some(alias) = alias {
                declared.insert(*alias);
            }
        }
    }

    let first = start.map_or(1, |s| s + 1);
    let last = end.unwrap_or(usize::MAX);
    let mut stack: Vec<(OpenBlock, usize)> = Vec::new();
    let mut warned: FxHashSet<&str> = FxHashSet::default();

    for (line_no, line) in lines.iter().filter(|(n, _)| *n >= first && *n < last) {
        let line_no = *line_no;
        match line {
            Line::LoopOpen { .. } => stack.push((OpenBlock::Loop, line_no)),
            Line::ConditionOpen { kind, .. } => stack.push((OpenBlock::Condition(*kind), line_no)),
            Line::ParallelOpen => stack.push((OpenBlock::Parallel, line_no)),
            Line::Else => match stack.last() {
                Some((block, _)) if block.accepts_else() => {}
                Some((block, _)) => out.push(Diagnostic::error(
                    line_no,
                    format!("`else` is not allowed inside `{}`", block.keyword()),
                )),
                None => out.push(Diagnostic::error(line_no, "`else` outside of a block")),
            },
            Line::End => {
                if stack.pop().is_none() {
                    out.push(Diagnostic::error(line_no, "`end` without a matching block"));
                }
            }
            Line::Message { from, to, .. } => {
                for endpoint in [*from, *to] {
                    if !declared.contains(endpoint) && warned.insert(endpoint) {
                        out.push(Diagnostic::warning(
                            line_no,
                            format!("actor '{endpoint}' is not declared"),
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    for (block, opened_at) in stack.into_iter().rev() {
        out.push(Diagnostic::error(
            opened_at,
            format!("`{}` opened here is never closed", block.keyword()),
        ));
    }

    out.sort_by_key(|d| d.line);
    out
}
