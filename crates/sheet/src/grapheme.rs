use unicode_display_width::width as display_width_impl;
use unicode_segmentation::UnicodeSegmentation;

pub(crate) fn display_width(text: &str) -> usize {
    display_width_impl(text) as usize
}

/// Longest prefix of `text` that fits in `max_width` cells.
pub(crate) fn truncate_to_width(text: &str, max_width: usize) -> &str {
    let mut used = 0;
    let mut end = 0;
    for (idx, grapheme) in UnicodeSegmentation::grapheme_indices(text, true) {
        let w = display_width(grapheme);
        if used + w > max_width {
            break;
        }
        used += w;
        end = idx + grapheme.len();
    }
    &text[..end]
}
