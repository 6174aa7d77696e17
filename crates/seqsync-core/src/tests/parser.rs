use crate::models::{ActorSet, Condition, ConditionKind, Document, Loop, Message, Node, Parallel};
use crate::syntax::{extract_actors, parse_document};

fn actors(names: &[&str]) -> ActorSet {
    names.iter().copied().collect()
}

#[test]
fn parse_single_message() {
    let doc = parse_document("@startuml\nA -> B : hello\n@enduml").unwrap();
    assert_eq!(
        doc,
        Document {
            actors: actors(&["A", "B"]),
            nodes: vec![Node::Message(Message::new("A", "B", "hello"))],
        }
    );
}

#[test]
fn parse_async_uncertain_message() {
    let doc = parse_document("@startuml\nA --> B : ping?\n@enduml").unwrap();
    let m = doc.nodes[0].as_message().unwrap();
    assert!(m.is_async);
    assert!(m.uncertain);
    assert_eq!(m.text, "ping");
}

#[test]
fn parse_markers_only_is_an_empty_document() {
    let doc = parse_document("@startuml\n@enduml").unwrap();
    assert!(doc.is_empty());
}

#[test]
fn parse_missing_markers_has_no_result() {
    assert_eq!(parse_document("@startuml\nA -> B : hello\n"), None);
    assert_eq!(parse_document("A -> B : hello\n@enduml"), None);
    // An end marker before the start marker does not close the body.
    assert_eq!(parse_document("@enduml\n@startuml\nA -> B : x"), None);
}

#[test]
fn parse_resolves_aliases_to_display_names() {
    let text = r#"@startuml
title Checkout
participant "Web Server" as WS
actor User
User -> WS : request
WS --> User : response
@enduml"#;
    let doc = parse_document(text).unwrap();
    assert_eq!(doc.actors, actors(&["Web Server", "User"]));
    assert_eq!(
        doc.nodes,
        vec![
            Node::Message(Message::new("User", "Web Server", "request")),
            Node::Message(Message::new("Web Server", "User", "response").asynchronous()),
        ]
    );
}

#[test]
fn parse_registers_undeclared_endpoints_in_first_use_order() {
    let text = "@startuml\nactor Carol\nBob -> Alice : hi\nAlice -> Carol : hey\n@enduml";
    let doc = parse_document(text).unwrap();
    assert_eq!(doc.actors, actors(&["Carol", "Bob", "Alice"]));
}

#[test]
fn parse_nested_blocks_attach_to_innermost_frame() {
    let text = r#"@startuml
loop retry
  alt ok
    A -> B : x
  else
    A -> C : y
  end
end
opt maybe
  B -> A : z
end
par
  A -> B : p1
else
  A -> C : p2
end
@enduml"#;
    let doc = parse_document(text).unwrap();
    let alt = Condition::new(
        ConditionKind::Alt,
        "ok",
        vec![Message::new("A", "B", "x").into()],
    )
    .unwrap()
    .with_false_branch(vec![Message::new("A", "C", "y").into()]);
    let opt = Condition::new(
        ConditionKind::Opt,
        "maybe",
        vec![Message::new("B", "A", "z").into()],
    )
    .unwrap();
    assert_eq!(
        doc.nodes,
        vec![
            Loop::new("retry", vec![alt.into()]).into(),
            opt.into(),
            Parallel::new(vec![
                vec![Message::new("A", "B", "p1").into()],
                vec![Message::new("A", "C", "p2").into()],
            ])
            .into(),
        ]
    );
    assert_eq!(doc.actors, actors(&["A", "B", "C"]));
    assert_eq!(doc.statistics().max_depth, 2);
}

#[test]
fn parse_closes_unterminated_blocks_at_end_marker() {
    let text = "@startuml\nloop forever\nopt tired\nA -> B : rest\n@enduml";
    let doc = parse_document(text).unwrap();
    let opt = Condition::new(
        ConditionKind::Opt,
        "tired",
        vec![Message::new("A", "B", "rest").into()],
    )
    .unwrap();
    assert_eq!(doc.nodes, vec![Loop::new("forever", vec![opt.into()]).into()]);
}

#[test]
fn parse_ignores_stray_end_and_misplaced_else() {
    let text = "@startuml\nend\nelse\nloop l\nA -> B : 1\nelse\nA -> B : 2\nend\n@enduml";
    let doc = parse_document(text).unwrap();
    assert_eq!(
        doc.nodes,
        vec![
            Loop::new(
                "l",
                vec![
                    Message::new("A", "B", "1").into(),
                    Message::new("A", "B", "2").into(),
                ],
            )
            .into()
        ]
    );
}

#[test]
fn parse_extra_else_in_alt_continues_second_branch() {
    let text = "@startuml\nalt a\nA -> B : 1\nelse\nA -> B : 2\nelse\nA -> B : 3\nend\n@enduml";
    let doc = parse_document(text).unwrap();
    let Node::Condition(c) = &doc.nodes[0] else {
        panic!("expected condition, got {:?}", doc.nodes[0]);
    };
    assert_eq!(c.true_branch.len(), 1);
    assert_eq!(c.false_branch.len(), 2);
}

#[test]
fn parse_only_reads_the_first_marked_body() {
    let text = "A -> Z : before\n@startuml\nA -> B : x\n@enduml\nB -> Y : after\n@startuml\nC -> D : y\n@enduml";
    let doc = parse_document(text).unwrap();
    assert_eq!(doc.actors, actors(&["A", "B"]));
    assert_eq!(doc.nodes.len(), 1);
}

#[test]
fn parse_skips_unrecognized_lines() {
    let text = "@startuml\nskinparam monochrome true\n\nnote over A: hi\nA -> B : ok\n@enduml";
    let doc = parse_document(text).unwrap();
    assert_eq!(doc.nodes, vec![Message::new("A", "B", "ok").into()]);
}

#[test]
fn extract_actors_reads_declarations_anywhere() {
    let text = "actor Alice\nparticipant \"Order API\" as API\nAlice -> Bob : hi\nloop";
    assert_eq!(extract_actors(text), actors(&["Alice", "Order API"]));
    assert!(extract_actors("A -> B : hi").is_empty());
}

#[test]
fn parse_keeps_display_names_of_decorated_declarations() {
    let doc = parse_document(
        "@startuml\nparticipant \"Web Server\" as WS #lightblue\nWS -> DB : q\npar -> WS : ping\n@enduml",
    )
    .unwrap();
    assert_eq!(doc.actors, actors(&["Web Server", "DB", "par"]));
    assert_eq!(
        doc.nodes,
        vec![
            Node::Message(Message::new("Web Server", "DB", "q")),
            Node::Message(Message::new("par", "Web Server", "ping")),
        ]
    );
}
