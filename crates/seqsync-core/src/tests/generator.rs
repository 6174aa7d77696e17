use crate::config::EngineConfig;
use crate::models::{Condition, ConditionKind, Document, Loop, Message, Node, Parallel};
use crate::syntax::{generate, parse_document, quote_name};

fn untitled() -> EngineConfig {
    EngineConfig {
        title: None,
        ..Default::default()
    }
}

#[test]
fn generate_empty_document() {
    assert_eq!(
        generate(&Document::new(), &EngineConfig::default()),
        "@startuml\n\n@enduml"
    );
}

#[test]
fn generate_flat_document_with_title_and_classified_actors() {
    let mut doc = Document::new();
    doc.push(Message::new("User", "Order Service", "place order"));
    doc.push(
        Message::new("Order Service", "User DB", "save")
            .asynchronous()
            .uncertain(),
    );

    let expected = r#"@startuml
title Business Flow

actor "User"
participant "Order Service"
database "User DB"

"User" -> "Order Service" : place order
"Order Service" --> "User DB" : save?

@enduml"#;
    assert_eq!(generate(&doc, &EngineConfig::default()), expected);
}

#[test]
fn generate_omits_title_without_nodes() {
    let mut doc = Document::new();
    doc.actors.insert("Alice");
    assert_eq!(
        generate(&doc, &EngineConfig::default()),
        "@startuml\nactor \"Alice\"\n\n\n@enduml"
    );
}

#[test]
fn generate_alt_without_false_branch_has_no_else() {
    let m1 = Message::new("A", "B", "m1");
    let alt = Condition::new(ConditionKind::Alt, "ok", vec![m1.into()]).unwrap();
    let mut doc = Document::new();
    doc.push(alt);

    let out = generate(&doc, &untitled());
    assert!(out.contains("alt ok\n  \"A\" -> \"B\" : m1\nend\n"), "{out}");
    assert!(!out.contains("else"), "{out}");
}

#[test]
fn generate_alt_false_branch_emits_one_else_at_block_indent() {
    let alt = Condition::new(
        ConditionKind::Alt,
        "in stock",
        vec![Message::new("Shop", "User", "ship").into()],
    )
    .unwrap()
    .with_false_branch(vec![Message::new("Shop", "User", "refund").into()]);
    let mut doc = Document::new();
    doc.push(Loop::new("each order", vec![alt.into()]));

    let out = generate(&doc, &untitled());
    let expected_body = r#"loop each order
  alt in stock
    "Shop" -> "User" : ship
  else
    "Shop" -> "User" : refund
  end
end
"#;
    assert!(out.contains(expected_body), "{out}");
    assert_eq!(out.lines().filter(|l| l.trim() == "else").count(), 1);
}

#[test]
fn generate_opt_never_renders_false_branch() {
    let opt = Condition::new(
        ConditionKind::Opt,
        "coupon",
        vec![Message::new("A", "B", "apply").into()],
    )
    .unwrap()
    .with_false_branch(vec![Message::new("A", "B", "ignored").into()]);
    let mut doc = Document::new();
    doc.push(opt);

    let out = generate(&doc, &untitled());
    assert!(!out.contains("ignored"), "{out}");
    assert!(!out.contains("else"), "{out}");
}

#[test]
fn generate_parallel_branches_separated_by_else() {
    let mut doc = Document::new();
    doc.push(Parallel::new(vec![
        vec![Message::new("A", "B", "left").into()],
        vec![Message::new("A", "C", "right").into()],
    ]));

    let out = generate(&doc, &untitled());
    assert!(
        out.contains("par\n  \"A\" -> \"B\" : left\nelse\n  \"A\" -> \"C\" : right\nend\n"),
        "{out}"
    );
}

#[test]
fn generate_respects_indent_unit_and_suffix() {
    let config = EngineConfig {
        indent_unit: "\t".to_string(),
        uncertain_suffix: "？".to_string(),
        title: None,
        ..Default::default()
    };
    let mut doc = Document::new();
    doc.push(Loop::new(
        "daily",
        vec![Message::new("担当者", "在庫システム", "確認").uncertain().into()],
    ));

    let out = generate(&doc, &config);
    assert!(
        out.contains("loop daily\n\t\"担当者\" -> \"在庫システム\" : 確認？\nend\n"),
        "{out}"
    );
    assert!(out.contains("participant \"在庫システム\"\n"), "{out}");
}

#[test]
fn generate_is_idempotent() {
    let mut doc = Document::new();
    doc.push(Message::new("A", "B", "one"));
    doc.push(Loop::new("x", vec![Message::new("B", "A", "two").into()]));
    let config = EngineConfig::default();
    assert_eq!(generate(&doc, &config), generate(&doc, &config));
}

#[test]
fn quote_name_picks_an_unused_quote() {
    assert_eq!(quote_name("Alice"), "\"Alice\"");
    assert_eq!(quote_name("say \"hi\""), "'say \"hi\"'");
    assert_eq!(quote_name("it's \"x\""), "`it's \"x\"`");
}

#[test]
fn flat_documents_round_trip() {
    let mut doc = Document::new();
    doc.actors.insert("Idle Person");
    doc.push(Message::new("Customer", "Payment API", "pay 10 USD"));
    doc.push(Message::new("Payment API", "Card \"Vault\" DB", "").asynchronous());
    doc.push(Message::new("Payment API", "Customer", "confirm").uncertain());
    doc.push(Message::new("O'Brien", "Customer", "ping"));

    let text = generate(&doc, &EngineConfig::default());
    let parsed = parse_document(&text).unwrap();
    assert_eq!(parsed.actors, doc.actors);
    let messages = |d: &Document| -> Vec<Message> {
        d.nodes.iter().filter_map(Node::as_message).cloned().collect()
    };
    assert_eq!(messages(&parsed), messages(&doc));
}

#[test]
fn nested_documents_round_trip() {
    let alt = Condition::new(
        ConditionKind::Alt,
        "valid",
        vec![Message::new("A", "B", "accept").into()],
    )
    .unwrap()
    .with_false_branch(vec![Message::new("A", "B", "reject").into()]);
    let mut doc = Document::new();
    doc.push(Message::new("B", "A", "submit"));
    doc.push(Loop::new(
        "until done",
        vec![
            alt.into(),
            Parallel::new(vec![
                vec![Message::new("A", "C", "log").into()],
                vec![Message::new("A", "D", "notify").asynchronous().into()],
            ])
            .into(),
        ],
    ));

    let parsed = parse_document(&generate(&doc, &EngineConfig::default())).unwrap();
    assert_eq!(parsed, doc);
}

#[test]
fn generate_escapes_line_breaks_in_labels() {
    let alt = Condition::new(
        ConditionKind::Alt,
        "ok\nelse",
        vec![Message::new("A", "B", "x\nend").into()],
    )
    .unwrap();
    let mut doc = Document::new();
    doc.push(alt);
    doc.push(Loop::new("retry\r\nend", vec![Message::new("A", "B", "again").into()]));
    doc.push(Message::new("A", "New\nService", "after"));

    let text = generate(&doc, &untitled());
    assert_eq!(text.lines().filter(|l| l.trim() == "end").count(), 2);
    assert!(!text.lines().any(|l| l.trim() == "else"));
    assert!(text.contains(r#""A" -> "B" : x\nend"#), "{text}");

    let parsed = parse_document(&text).unwrap();
    assert_eq!(parsed.nodes[0], doc.nodes[0]);
    assert_eq!(
        parsed.nodes[1],
        Node::Loop(Loop::new("retry\nend", vec![Message::new("A", "B", "again").into()]))
    );
    assert_eq!(parsed.nodes[2], doc.nodes[2]);
    assert!(parsed.actors.contains("New\nService"));
}
