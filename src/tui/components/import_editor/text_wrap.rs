//! Wrapping and boundary helpers for the import editor.
//!
//! Stateless; nothing here knows about `ImportEditor` or `EditorCursor`.

/// Left + right border of the editor block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 2;
/// Top + bottom border of the editor block
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Offset from area edge to content (border width)
pub(super) const BORDER_OFFSET: u16 = 1;

/// Pasted JSON often has long unbroken strings, so words are broken at the edge.
pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Text columns inside the block. 0 if the area is too narrow.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Text rows inside the block, at least 1.
pub(super) fn visible_rows(area_height: u16) -> u16 {
    area_height.saturating_sub(VERTICAL_OVERHEAD).max(1)
}

/// Wrapped line count, including the empty line after a trailing newline.
pub(super) fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }
    let lines = textwrap::wrap(text, wrap_options(width));
    let trailing = text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty());
    (lines.len() as u16).max(1) + u16::from(trailing)
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos].char_indices().last().map_or(0, |(i, _)| i)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Start of the word before `pos`, skipping punctuation such as `":[{` first.
pub(super) fn prev_word_boundary(text: &str, pos: usize) -> usize {
    let mut boundary = pos;
    let mut seen_word = false;
    for (i, c) in text[..pos].char_indices().rev() {
        if is_word_char(c) {
            seen_word = true;
            boundary = i;
        } else if seen_word {
            break;
        } else {
            boundary = i;
        }
    }
    boundary
}

/// End of the word after `pos`, skipping punctuation first.
pub(super) fn next_word_boundary(text: &str, pos: usize) -> usize {
    let mut seen_word = false;
    for (i, c) in text[pos..].char_indices() {
        if is_word_char(c) {
            seen_word = true;
        } else if seen_word {
            return pos + i;
        }
    }
    text.len()
}
