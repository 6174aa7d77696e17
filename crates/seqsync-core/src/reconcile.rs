//! Merge policy for text-originated edits.
//!
//! Text is trusted for the actor set and for flat messages, not for blocks: a block edited in
//! text cannot be told apart from one the user wants to keep as built in the structured
//! editor, so top-level blocks of the previous document always survive a text pass verbatim.

use crate::models::{Document, Node};

/// What [`reconcile`] did with the node list, for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Fresh messages followed by the preserved blocks.
    Merged { messages: usize, preserved_blocks: usize },
    /// The text had no flat messages; only the previous blocks remain.
    BlocksOnly { preserved_blocks: usize },
    /// Neither fresh messages nor previous blocks; the previous node list is kept.
    NodesKept,
}

pub fn reconcile(previous: &Document, parsed: Document) -> Document {
    reconcile_with_outcome(previous, parsed).0
}

pub fn reconcile_with_outcome(previous: &Document, parsed: Document) -> (Document, MergeOutcome) {
    let Document { actors, nodes } = parsed;

    let preserved: Vec<Node> = previous
        .nodes
        .iter()
        .filter(|n| n.is_block())
        .cloned()
        .collect();
    let parsed_blocks = nodes.iter().filter(|n| n.is_block()).count();
    if parsed_blocks > 0 {
        tracing::debug!(
            parsed_blocks,
            preserved = preserved.len(),
            "discarding blocks parsed from text in favor of the structured ones"
        );
    }
    let fresh: Vec<Node> = nodes.into_iter().filter(|n| !n.is_block()).collect();

    let (nodes, outcome) = if !fresh.is_empty() {
        let outcome = MergeOutcome::Merged {
            messages: fresh.len(),
            preserved_blocks: preserved.len(),
        };
        let mut merged = fresh;
        merged.extend(preserved);
        (merged, outcome)
    } else if !preserved.is_empty() {
        let outcome = MergeOutcome::BlocksOnly {
            preserved_blocks: preserved.len(),
        };
        (preserved, outcome)
    } else {
        (previous.nodes.clone(), MergeOutcome::NodesKept)
    };

    let mut merged = Document { actors, nodes };
    merged.ensure_referenced_actors();
    (merged, outcome)
}
