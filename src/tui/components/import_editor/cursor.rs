//! Cursor position and vertical scrolling for the import editor.
//!
//! `EditorCursor` owns the byte offset into the buffer and the first visible
//! wrapped row. The buffer itself is owned by `ImportEditor` and passed in.

use super::text_wrap::{BORDER_OFFSET, inner_width, visible_rows, wrap_line_count, wrap_options};
use ratatui::layout::Rect;

pub(super) struct EditorCursor {
    /// Byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// First wrapped row shown
    pub scroll_offset: u16,
    /// Area from the last render, used for Up/Down and PageUp/PageDown
    pub last_area: Rect,
}

impl EditorCursor {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_area: Rect::new(0, 0, 80, 20),
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Wrapped row (0-based) the cursor sits on.
    pub fn row(&self, buffer: &str, area_width: u16) -> u16 {
        let width = inner_width(area_width);
        if width == 0 {
            return 0;
        }
        let before = &buffer[..self.pos];
        let lines = textwrap::wrap(before, wrap_options(width));
        let row = lines.len().saturating_sub(1) as u16;
        // A '\n' right before the cursor that textwrap didn't turn into a row.
        if before.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
            row + 1
        } else {
            row
        }
    }

    /// Moves the cursor `rows` wrapped rows up (negative) or down, keeping
    /// the column where the target row is long enough.
    pub fn move_rows(&mut self, buffer: &str, rows: i32) -> bool {
        let width = inner_width(self.last_area.width);
        if width == 0 || buffer.is_empty() || rows == 0 {
            return false;
        }
        let lines = textwrap::wrap(buffer, wrap_options(width));
        if lines.is_empty() {
            return false;
        }

        // Byte span of each wrapped row, counting a following '\n' once.
        let mut starts = Vec::with_capacity(lines.len());
        let mut offset = 0;
        for line in &lines {
            starts.push(offset);
            let newline = buffer.as_bytes().get(offset + line.len()) == Some(&b'\n');
            offset += line.len() + usize::from(newline);
        }

        let current = starts
            .iter()
            .rposition(|&start| start <= self.pos)
            .unwrap_or(0);
        let column = self.pos - starts[current];
        let target = (current as i64 + rows as i64).clamp(0, lines.len() as i64 - 1) as usize;
        if target == current {
            return false;
        }
        let line = &lines[target];
        let mut col = column.min(line.len());
        while !line.is_char_boundary(col) {
            col -= 1;
        }
        self.pos = starts[target] + col;
        true
    }

    /// Keeps the cursor row inside the visible window.
    pub fn follow(&mut self, buffer: &str, area: Rect) {
        let rows = visible_rows(area.height);
        let total = wrap_line_count(buffer, inner_width(area.width));
        if total <= rows {
            self.scroll_offset = 0;
            return;
        }
        let row = self.row(buffer, area.width);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + rows {
            self.scroll_offset = row + 1 - rows;
        }
    }

    /// Screen (column, row) for the terminal cursor.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        if width == 0 {
            return (area.x + BORDER_OFFSET, area.y + BORDER_OFFSET);
        }
        let before = &buffer[..self.pos];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let logical = &before[line_start..];

        // textwrap trims trailing spaces, so count chars instead of using
        // the wrapped segment's length.
        let segments = textwrap::wrap(logical, wrap_options(width));
        let col = match segments.split_last() {
            None => 0,
            Some((_, earlier)) => {
                let consumed: usize = earlier.iter().map(|s| s.chars().count()).sum();
                logical.chars().count().saturating_sub(consumed) as u16
            }
        };
        let row = self.row(buffer, area.width).saturating_sub(self.scroll_offset);
        (
            area.x + BORDER_OFFSET + col.min(width),
            area.y + BORDER_OFFSET + row,
        )
    }
}
