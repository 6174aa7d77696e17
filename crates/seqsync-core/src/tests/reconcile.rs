use crate::models::{ActorSet, Condition, ConditionKind, Document, Loop, Message, Node};
use crate::reconcile::{MergeOutcome, reconcile, reconcile_with_outcome};

fn actors(names: &[&str]) -> ActorSet {
    names.iter().copied().collect()
}

fn poll_loop() -> Node {
    Loop::new("poll", vec![Message::new("B", "Queue", "tick").into()]).into()
}

#[test]
fn reconcile_replaces_messages_and_keeps_blocks_verbatim() {
    let previous = Document {
        actors: actors(&["A", "B", "Queue"]),
        nodes: vec![
            Message::new("A", "B", "one").into(),
            poll_loop(),
            Message::new("B", "A", "two").into(),
        ],
    };
    let parsed = Document {
        actors: actors(&["A", "B", "C"]),
        nodes: vec![
            Message::new("A", "C", "three").into(),
            Message::new("C", "B", "four").into(),
        ],
    };

    let (merged, outcome) = reconcile_with_outcome(&previous, parsed);
    assert_eq!(
        outcome,
        MergeOutcome::Merged {
            messages: 2,
            preserved_blocks: 1
        }
    );
    assert_eq!(
        merged.nodes,
        vec![
            Message::new("A", "C", "three").into(),
            Message::new("C", "B", "four").into(),
            poll_loop(),
        ]
    );
    // `Queue` is only referenced by the preserved loop and is re-inserted after the text set.
    assert_eq!(merged.actors, actors(&["A", "B", "C", "Queue"]));
}

#[test]
fn reconcile_discards_blocks_parsed_from_text() {
    let previous = Document {
        actors: actors(&["A", "B", "Queue"]),
        nodes: vec![poll_loop()],
    };
    let edited_alt = Condition::new(
        ConditionKind::Alt,
        "edited in text",
        vec![Message::new("A", "B", "x").into()],
    )
    .unwrap();
    let parsed = Document {
        actors: actors(&["A", "B"]),
        nodes: vec![edited_alt.into()],
    };

    let (merged, outcome) = reconcile_with_outcome(&previous, parsed);
    assert_eq!(
        outcome,
        MergeOutcome::BlocksOnly {
            preserved_blocks: 1
        }
    );
    assert_eq!(merged.nodes, vec![poll_loop()]);
}

#[test]
fn reconcile_keeps_previous_nodes_when_nothing_to_merge() {
    let previous = Document {
        actors: actors(&["A", "B"]),
        nodes: vec![Message::new("A", "B", "hello").into()],
    };
    let parsed = Document {
        actors: actors(&["X"]),
        nodes: Vec::new(),
    };

    let (merged, outcome) = reconcile_with_outcome(&previous, parsed);
    assert_eq!(outcome, MergeOutcome::NodesKept);
    assert_eq!(merged.nodes, previous.nodes);
    assert_eq!(merged.actors, actors(&["X", "A", "B"]));
}

#[test]
fn reconcile_takes_actor_order_from_text() {
    let previous = Document {
        actors: actors(&["A", "B"]),
        nodes: vec![Message::new("A", "B", "hello").into()],
    };
    let parsed = Document {
        actors: actors(&["B", "A"]),
        nodes: vec![Message::new("B", "A", "hi").into()],
    };
    let merged = reconcile(&previous, parsed);
    assert_eq!(merged.actors, actors(&["B", "A"]));
    assert_eq!(merged.nodes, vec![Message::new("B", "A", "hi").into()]);
}
