use crate::vocab::EMPHASIS_MARKER;
use crossterm::style::{Attribute, Color, Stylize};

/// Render emphasis markup for the terminal in `color`: segments between markers
/// are also bold, the markers themselves are dropped. Each segment carries its own
/// colour since the bold reset clears the foreground as well.
pub fn decorate(text: &str, color: Color) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    for (idx, segment) in text.split(EMPHASIS_MARKER).enumerate() {
        if segment.is_empty() {
            continue;
        }
        let styled = segment.with(color);
        if idx % 2 == 1 {
            out.push_str(&styled.attribute(Attribute::Bold).to_string());
        } else {
            out.push_str(&styled.to_string());
        }
    }
    out
}
