use super::matcher::{Line, match_line, split_uncertain, unescape_newlines};
use crate::actors::ActorRegistry;
use crate::models::{ActorSet, Condition, ConditionKind, Document, Loop, Message, Node, Parallel};

/// One open block while walking the text.
#[derive(Debug)]
enum Frame {
    Loop(Loop),
    Condition { node: Condition, in_false: bool },
    /// The active branch is always the last one.
    Parallel(Parallel),
}

impl Frame {
    fn active_list(&mut self) -> &mut Vec<Node> {
        match self {
            Frame::Loop(l) => &mut l.body,
            Frame::Condition { node, in_false } => {
                if *in_false {
                    &mut node.false_branch
                } else {
                    &mut node.true_branch
                }
            }
            Frame::Parallel(p) => {
                if p.branches.is_empty() {
                    p.branches.push(Vec::new());
                }
                let last = p.branches.len() - 1;
                &mut p.branches[last]
            }
        }
    }

    /// Handles an `else` line. Returns `false` when the frame does not accept one.
    fn separate(&mut self) -> bool {
        match self {
            Frame::Condition { node, in_false } if node.kind == ConditionKind::Alt => {
                if *in_false {
                    tracing::debug!(
                        condition = %node.name,
                        "additional else in alt; continuing the second branch"
                    );
                }
                *in_false = true;
                true
            }
            Frame::Parallel(p) => {
                p.branches.push(Vec::new());
                true
            }
            Frame::Loop(_) | Frame::Condition { .. } => false,
        }
    }

    fn into_node(self) -> Node {
        match self {
            Frame::Loop(l) => Node::Loop(l),
            Frame::Condition { node, .. } => Node::Condition(node),
            Frame::Parallel(p) => Node::Parallel(p),
        }
    }
}

#[derive(Debug, Default)]
struct TreeBuilder {
    document: Document,
    registry: ActorRegistry,
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn push_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(frame) => frame.active_list().push(node),
            None => self.document.nodes.push(node),
        }
    }

    fn apply(&mut self, line: Line<'_>, line_no: usize) {
        match line {
            Line::ActorDecl { name, alias, .. } => {
                let name = unescape_newlines(name);
                self.document.actors.insert(name.as_ref());
                self.registry.declare(&name, alias);
            }
            Line::Message {
                from,
                arrow,
                to,
                text,
            } => {
                let from = self
                    .registry
                    .resolve(&unescape_newlines(from), &mut self.document.actors);
                let to = self
                    .registry
                    .resolve(&unescape_newlines(to), &mut self.document.actors);
                let (text, uncertain) = split_uncertain(text);
                self.push_node(Node::Message(Message {
                    from,
                    to,
                    text: unescape_newlines(text).into_owned(),
                    uncertain,
                    is_async: arrow.is_async(),
                }));
            }
            Line::LoopOpen { condition } => {
                let condition = unescape_newlines(condition);
                self.stack.push(Frame::Loop(Loop::new(condition, Vec::new())));
            }
            Line::ConditionOpen { kind, name } => {
                self.stack.push(Frame::Condition {
                    node: Condition::empty(kind, unescape_newlines(name).into_owned()),
                    in_false: false,
                });
            }
            Line::ParallelOpen => {
                self.stack.push(Frame::Parallel(Parallel::new(vec![Vec::new()])));
            }
            Line::Else => {
                let accepted = self.stack.last_mut().is_some_and(Frame::separate);
                if !accepted {
                    tracing::debug!(line = line_no, "ignoring else outside alt/par");
                }
            }
            Line::End => match self.stack.pop() {
                Some(frame) => {
                    let node = frame.into_node();
                    self.push_node(node);
                }
                None => tracing::debug!(line = line_no, "ignoring end without open block"),
            },
            Line::StartMarker | Line::EndMarker | Line::Unrecognized => {}
        }
    }

    fn finish(mut self) -> Document {
        if !self.stack.is_empty() {
            tracing::debug!(
                open = self.stack.len(),
                "closing unterminated blocks at end of document"
            );
        }
        while let Some(frame) = self.stack.pop() {
            let node = frame.into_node();
            self.push_node(node);
        }
        self.document
    }
}

/// Locates the body between the first start marker and the following end marker, as
/// `(first_body_line, end_marker_line)` indexes into `lines`.
fn body_bounds(lines: &[&str]) -> Option<(usize, usize)> {
    let start = lines
        .iter()
        .position(|l| matches!(match_line(l), Line::StartMarker))?;
    let end = lines[start + 1..]
        .iter()
        .position(|l| matches!(match_line(l), Line::EndMarker))?;
    Some((start + 1, start + 1 + end))
}

/// Builds a document from marker-delimited text.
///
/// Returns `None` when either marker is missing: the caller decides how to degrade (see
/// [`extract_actors`]). Unrecognized lines are skipped; this function never fails otherwise.
pub fn parse_document(text: &str) -> Option<Document> {
    let lines: Vec<&str> = text.lines().collect();
    let Some((first, end)) = body_bounds(&lines) else {
        tracing::debug!("missing @startuml/@enduml; no parse result");
        return None;
    };

    let mut builder = TreeBuilder::default();
    for (idx, raw) in lines[first..end].iter().enumerate() {
        builder.apply(match_line(raw), first + idx + 1);
    }
    Some(builder.finish())
}

/// Degraded extraction used when [`parse_document`] has no result: only actor declarations
/// are collected, anywhere in the text.
pub fn extract_actors(text: &str) -> ActorSet {
    text.lines()
        .filter_map(|raw| match match_line(raw) {
            Line::ActorDecl { name, .. } => Some(unescape_newlines(name).into_owned()),
            _ => None,
        })
        .collect()
}
