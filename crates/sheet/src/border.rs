//! Glyphs for the sheet's top edge.
//!
//! A bottom sheet only has a top edge: the left corner, a horizontal run and
//! the right corner. The drag indicator (grabber) is drawn centered over it.
//!
//! ```text
//! ╭──────━━━━━━──────╮
//! ```

use phf::phf_map;

/// Left corner, horizontal fill, right corner.
pub type EdgeChars = [char; 3];

/// Map of edge style names to their glyphs.
pub static EDGE_CHARS: phf::Map<&'static str, EdgeChars> = phf_map! {
    "none" => [' ', ' ', ' '],
    "round" => ['╭', '─', '╮'],
    "square" => ['┌', '─', '┐'],
    "heavy" => ['┏', '━', '┓'],
    "double" => ['╔', '═', '╗'],
    "ascii" => ['+', '-', '+'],
};

/// Grabber drawn for each edge style. Styles without an entry use the default.
static GRABBERS: phf::Map<&'static str, &'static str> = phf_map! {
    "ascii" => "====",
    "double" => "════",
};

const DEFAULT_GRABBER: &str = "━━━━";
const DEFAULT_EDGE: &str = "round";

/// Resolved top edge for a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetEdge {
    pub left: char,
    pub fill: char,
    pub right: char,
    pub grabber: &'static str,
    visible: bool,
}

impl SheetEdge {
    /// Look up an edge style by name, falling back to "round".
    pub fn named(name: &str) -> Self {
        let (name, chars) = match EDGE_CHARS.get_entry(name) {
            Some((key, chars)) => (*key, *chars),
            None => {
                log::warn!("unknown sheet border {name:?}, using {DEFAULT_EDGE:?}");
                (DEFAULT_EDGE, EDGE_CHARS[DEFAULT_EDGE])
            }
        };
        let [left, fill, right] = chars;
        Self {
            left,
            fill,
            right,
            grabber: GRABBERS.get(name).copied().unwrap_or(DEFAULT_GRABBER),
            visible: name != "none",
        }
    }

    /// Whether the edge draws any glyphs of its own.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Default for SheetEdge {
    fn default() -> Self {
        Self::named(DEFAULT_EDGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_styles_resolve() {
        let edge = SheetEdge::named("heavy");
        assert_eq!((edge.left, edge.fill, edge.right), ('┏', '━', '┓'));
        assert!(edge.is_visible());
        assert_eq!(SheetEdge::named("ascii").grabber, "====");
    }

    #[test]
    fn unknown_style_falls_back_to_round() {
        assert_eq!(SheetEdge::named("zigzag"), SheetEdge::named("round"));
    }

    #[test]
    fn none_is_invisible() {
        assert!(!SheetEdge::named("none").is_visible());
    }
}
