use super::matcher::{END_MARKER, START_MARKER, escape_newlines};
use crate::actors::ActorKind;
use crate::config::EngineConfig;
use crate::models::{Condition, ConditionKind, Document, Loop, Message, Node, Parallel};

const SYNC_ARROW: &str = "->";
const ASYNC_ARROW: &str = "-->";

/// Wraps a name in the first quote style it does not contain.
///
/// All three styles are accepted by the matcher, so a name only fails to round trip if it
/// contains every quote character. Line breaks are written as `\n`.
pub fn quote_name(name: &str) -> String {
    let name = escape_newlines(name);
    let quote = ['"', '\'', '`']
        .into_iter()
        .find(|q| !name.contains(*q))
        .unwrap_or('"');
    format!("{quote}{name}{quote}")
}

/// Renders documents to text. Pure: the same document and config always give the same output.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    config: &'a EngineConfig,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, document: &Document) -> String {
        let mut out = String::with_capacity(64 + document.nodes.len() * 32);
        out.push_str(START_MARKER);
        out.push('\n');

        if !document.nodes.is_empty() {
            if let Some(title) = self.config.title.as_deref() {
                out.push_str("title ");
                out.push_str(&escape_newlines(title));
                out.push_str("\n\n");
            }
        }

        if !document.actors.is_empty() {
            for actor in document.actors.iter() {
                out.push_str(ActorKind::classify(actor).keyword());
                out.push(' ');
                out.push_str(&quote_name(actor));
                out.push('\n');
            }
            out.push('\n');
        }

        self.write_nodes(&mut out, &document.nodes, "");

        out.push('\n');
        out.push_str(END_MARKER);
        out
    }

    fn write_nodes(&self, out: &mut String, nodes: &[Node], indent: &str) {
        for node in nodes {
            match node {
                Node::Message(m) => self.write_message(out, m, indent),
                Node::Condition(c) => self.write_condition(out, c, indent),
                Node::Loop(l) => self.write_loop(out, l, indent),
                Node::Parallel(p) => self.write_parallel(out, p, indent),
            }
        }
    }

    fn write_message(&self, out: &mut String, m: &Message, indent: &str) {
        let arrow = if m.is_async { ASYNC_ARROW } else { SYNC_ARROW };
        let suffix = if m.uncertain {
            self.config.uncertain_suffix.as_str()
        } else {
            ""
        };
        out.push_str(&format!(
            "{indent}{} {arrow} {} : {}{suffix}\n",
            quote_name(&m.from),
            quote_name(&m.to),
            escape_newlines(&m.text)
        ));
    }

    fn write_keyword_line(out: &mut String, indent: &str, keyword: &str, label: &str) {
        out.push_str(indent);
        out.push_str(keyword);
        if !label.is_empty() {
            out.push(' ');
            out.push_str(&escape_newlines(label));
        }
        out.push('\n');
    }

    fn write_condition(&self, out: &mut String, c: &Condition, indent: &str) {
        let inner = format!("{indent}{}", self.config.indent_unit);
        Self::write_keyword_line(out, indent, c.kind.keyword(), &c.name);
        self.write_nodes(out, &c.true_branch, &inner);
        if c.kind == ConditionKind::Alt && !c.false_branch.is_empty() {
            Self::write_keyword_line(out, indent, "else", "");
            self.write_nodes(out, &c.false_branch, &inner);
        }
        Self::write_keyword_line(out, indent, "end", "");
    }

    fn write_loop(&self, out: &mut String, l: &Loop, indent: &str) {
        let inner = format!("{indent}{}", self.config.indent_unit);
        Self::write_keyword_line(out, indent, "loop", &l.condition);
        self.write_nodes(out, &l.body, &inner);
        Self::write_keyword_line(out, indent, "end", "");
    }

    // Branches are separated with `else` rather than `and`: the remote renderer only accepts
    // the former inside `par`.
    fn write_parallel(&self, out: &mut String, p: &Parallel, indent: &str) {
        let inner = format!("{indent}{}", self.config.indent_unit);
        Self::write_keyword_line(out, indent, "par", "");
        for (i, branch) in p.branches.iter().enumerate() {
            if i > 0 {
                Self::write_keyword_line(out, indent, "else", "");
            }
            self.write_nodes(out, branch, &inner);
        }
        Self::write_keyword_line(out, indent, "end", "");
    }
}

pub fn generate(document: &Document, config: &EngineConfig) -> String {
    Generator::new(config).generate(document)
}
