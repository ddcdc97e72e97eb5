// Display-width helpers for aligned terminal output. Hangul syllables take
// two columns, so byte or char counts misalign the tables.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "..";

pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Longest prefix of `s` whose display width is at most `budget`.
fn prefix_within(s: &str, budget: usize) -> &str {
    let mut used = 0;
    for (i, ch) in s.char_indices() {
        used += char_width(ch);
        if used > budget {
            return &s[..i];
        }
    }
    s
}

/// Fit `s` into `width` columns, marking a cut with "..". Below three columns
/// there is no room for the marker, so only the first character is kept.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width < ELLIPSIS.len() + 1 {
        return s
            .chars()
            .next()
            .filter(|ch| char_width(*ch) <= width)
            .map(String::from)
            .unwrap_or_default();
    }
    format!("{}{ELLIPSIS}", prefix_within(s, width - ELLIPSIS.len()))
}

/// Exactly `width` columns: truncated if too long, then space padded.
/// A double-width char cut at the boundary leaves one column of padding.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let fitted = truncate_display(s, width);
    let pad = width.saturating_sub(display_width(&fitted));
    format!("{fitted}{}", " ".repeat(pad))
}
