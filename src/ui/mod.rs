//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the feed state and turns it into cells on the terminal.
//! No network I/O happens here.

pub mod deal_list;
pub mod layout;
pub mod popup;
pub mod screen;
pub mod spinner;
pub mod strip;
pub mod tabs;
pub mod theme;

/// Text of one buffer row.  Cells hidden behind a wide glyph are skipped so
/// Hangul reads back as written.
#[cfg(test)]
pub(crate) fn row_text(buf: &ratatui::buffer::Buffer, y: u16) -> String {
    let mut out = String::new();
    let mut x = buf.area.x;
    while x < buf.area.x + buf.area.width {
        let symbol = buf[(x, y)].symbol();
        out.push_str(symbol);
        x += ratatui::text::Span::raw(symbol).width().max(1) as u16;
    }
    out
}
