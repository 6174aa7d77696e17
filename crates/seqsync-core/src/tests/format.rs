use crate::syntax::format::format_text;

#[test]
fn format_reindents_by_block_structure() {
    let text = "@startuml\nloop x\nA -> B : y\n    alt ok\nB -> A : z\n else\nB -> A : w\nend\nend\n\n@enduml\n";
    let expected = "@startuml\nloop x\n  A -> B : y\n  alt ok\n    B -> A : z\n  else\n    B -> A : w\n  end\nend\n\n@enduml\n";
    assert_eq!(format_text(text, "  "), expected);
}

#[test]
fn format_keeps_markers_flush_left_and_recovers_from_stray_end() {
    let text = "   @startuml\nend\n  end\nopt a\n\t\tA -> B : b\n@enduml";
    let expected = "@startuml\nend\nend\nopt a\n\tA -> B : b\n@enduml";
    assert_eq!(format_text(text, "\t"), expected);
}

#[test]
fn format_is_stable() {
    let text = "@startuml\npar\nA -> B : 1\nelse\nA -> C : 2\nend\n@enduml";
    let once = format_text(text, "  ");
    assert_eq!(format_text(&once, "  "), once);
}
