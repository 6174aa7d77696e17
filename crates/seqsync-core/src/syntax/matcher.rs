//! Single-line classification.
//!
//! Every line is trimmed before matching. Anything that is not one of the constructs below is
//! reported as [`Line::Unrecognized`] and skipped by callers; titles, notes, skinparams and blank
//! lines all end up there.

use crate::models::ConditionKind;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

pub const START_MARKER: &str = "@startuml";
pub const END_MARKER: &str = "@enduml";

fn actor_decl_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"^(actor|participant|database|entity|boundary|control)\s+(?:"([^"]+)"|'([^']+)'|`([^`]+)`|(\S+))(?:\s+as\s+([^\s#<]+))?(?:\s+(.*))?$"#,
        )
        .expect("valid regex")
    })
}

fn message_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The bare source endpoint is lazy so `A-->B` splits at the first arrow token instead of
    // swallowing a dash into the name.
    RE.get_or_init(|| {
        Regex::new(
            r#"^(?:"([^"]+)"|'([^']+)'|`([^`]+)`|(\S+?))\s*(<?-->>?|<?->>?|\.\.>>?)\s*(?:"([^"]+)"|'([^']+)'|`([^`]+)`|([^\s:]+))(?:\s*:\s*(.*))?$"#,
        )
        .expect("valid regex")
    })
}

fn block_open_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(loop|alt|opt|par)(?:\s+(.*))?$").expect("valid regex"))
}

/// Arrow token between two message endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrow<'a> {
    pub token: &'a str,
}

impl Arrow<'_> {
    /// Dashed (`--`) and dotted (`..`) arrows are asynchronous.
    pub fn is_async(&self) -> bool {
        self.token.contains("--") || self.token.contains("..")
    }

    /// Trailing `>>` ("call" style). A style variant only; it is not kept on the model.
    pub fn is_call(&self) -> bool {
        self.token.ends_with(">>")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    StartMarker,
    EndMarker,
    ActorDecl {
        keyword: &'a str,
        name: &'a str,
        alias: Option<&'a str>,
    },
    Message {
        from: &'a str,
        arrow: Arrow<'a>,
        to: &'a str,
        text: &'a str,
    },
    LoopOpen {
        condition: &'a str,
    },
    ConditionOpen {
        kind: ConditionKind,
        name: &'a str,
    },
    ParallelOpen,
    Else,
    End,
    Unrecognized,
}

impl Line<'_> {
    pub fn opens_block(&self) -> bool {
        matches!(
            self,
            Line::LoopOpen { .. } | Line::ConditionOpen { .. } | Line::ParallelOpen
        )
    }
}

fn first_group<'t>(caps: &Captures<'t>, groups: &[usize]) -> Option<&'t str> {
    groups.iter().find_map(|&i| caps.get(i)).map(|m| m.as_str())
}

pub fn match_line(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Unrecognized;
    }

    if line.starts_with(START_MARKER) {
        return Line::StartMarker;
    }
    if line.starts_with(END_MARKER) {
        return Line::EndMarker;
    }

    // Trailing decoration (`#color`, `order 10`, `<<stereotype>>`) is ignored, but a keyword
    // used as a message endpoint is not a declaration.
    if let Some(caps) = actor_decl_regex().captures(line).filter(|caps| {
        !message_regex().is_match(line)
            && !caps.get(7).is_some_and(|m| starts_with_arrow(m.as_str()))
    }) {
        let keyword = caps.get(1).map_or("", |m| m.as_str());
        if let Some(name) = first_group(&caps, &[2, 3, 4, 5]) {
            return Line::ActorDecl {
                keyword,
                name,
                alias: caps.get(6).map(|m| m.as_str()),
            };
        }
    }

    match line {
        "else" => return Line::Else,
        "end" => return Line::End,
        _ => {}
    }

    if let Some(caps) = block_open_regex()
        .captures(line)
        .filter(|_| !is_message_from_keyword(line))
    {
        let label = caps.get(2).map_or("", |m| m.as_str().trim());
        match caps.get(1).map(|m| m.as_str()) {
            Some("loop") => return Line::LoopOpen { condition: label },
            Some("alt") => {
                return Line::ConditionOpen {
                    kind: ConditionKind::Alt,
                    name: label,
                };
            }
            Some("opt") => {
                return Line::ConditionOpen {
                    kind: ConditionKind::Opt,
                    name: label,
                };
            }
            Some("par") => return Line::ParallelOpen,
            _ => {}
        }
    }

    if let Some(caps) = message_regex().captures(line) {
        let from = first_group(&caps, &[1, 2, 3, 4]);
        let to = first_group(&caps, &[6, 7, 8, 9]);
        if let (Some(from), Some(arrow), Some(to)) = (from, caps.get(5), to) {
            return Line::Message {
                from,
                arrow: Arrow {
                    token: arrow.as_str(),
                },
                to,
                text: caps.get(10).map_or("", |m| m.as_str().trim()),
            };
        }
    }

    Line::Unrecognized
}

fn starts_with_arrow(rest: &str) -> bool {
    ["->", "-->", "..>", "<-"].iter().any(|t| rest.starts_with(t))
}

/// `par -> B : x` is a message from an actor named `par`, not a block.
fn is_message_from_keyword(line: &str) -> bool {
    starts_with_arrow(
        line.trim_start_matches(|c: char| c.is_ascii_alphabetic())
            .trim_start(),
    )
}

/// Writes line breaks as the literal `\n` PlantUML uses inside labels.
pub fn escape_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains(['\n', '\r']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\\n").replace(['\r', '\n'], "\\n"))
}

/// Inverse of [`escape_newlines`]. A literal backslash-n in the source reads as a line break.
pub fn unescape_newlines(text: &str) -> Cow<'_, str> {
    if text.contains("\\n") {
        Cow::Owned(text.replace("\\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Splits a trailing uncertainty glyph (`?` or `？`) off a message text.
pub fn split_uncertain(text: &str) -> (&str, bool) {
    let text = text.trim();
    match text.strip_suffix('?').or_else(|| text.strip_suffix('？')) {
        Some(rest) => (rest.trim_end(), true),
        None => (text, false),
    }
}
