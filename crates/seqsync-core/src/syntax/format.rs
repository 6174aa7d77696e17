use super::matcher::{Line, match_line};

/// Re-indents text by block structure.
///
/// Markers and top-level statements stay flush left, block bodies get one `indent_unit` per
/// level and `else`/`end` line up with their opening keyword. Blank lines are kept, other
/// whitespace-only changes are the only edits made.
pub fn format_text(text: &str, indent_unit: &str) -> String {
    let mut depth: usize = 0;
    let mut out: Vec<String> = Vec::new();

    for raw in text.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            out.push(String::new());
            continue;
        }

        let line = match_line(trimmed);
        let level = match line {
            Line::StartMarker | Line::EndMarker => {
                depth = 0;
                0
            }
            Line::End => {
                depth = depth.saturating_sub(1);
                depth
            }
            Line::Else => depth.saturating_sub(1),
            _ => depth,
        };
        out.push(format!("{}{trimmed}", indent_unit.repeat(level)));

        if line.opens_block() {
            depth += 1;
        }
    }

    let mut formatted = out.join("\n");
    if text.ends_with('\n') {
        formatted.push('\n');
    }
    formatted
}
