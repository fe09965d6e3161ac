//! Loading indicator: a small spinner + label rendered in the top-right
//! corner of a given area.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::theme::Theme;

/// Braille-dot spinner frames.  Cycles through these on each tick.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const LABEL: &str = "불러오는 중";

/// Shown on the list border while the front track is fetching a page.
///
/// It picks its own position (top-right of `area`) and is invisible when
/// `visible` is false.
pub struct LoadingIndicator {
    pub visible: bool,
    /// Monotonically increasing tick counter (drives the spinner frame).
    pub tick: u64,
}

impl Widget for LoadingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible || area.width < 20 || area.height == 0 {
            return;
        }

        let frame = SPINNER_FRAMES[(self.tick as usize) % SPINNER_FRAMES.len()];
        let line = Line::from(Span::styled(
            format!(" {frame} {LABEL} "),
            Theme::spinner_style(),
        ));

        let label_width = line.width() as u16;
        // Inside the border (leave 1 col for the border char).
        let x = area.x + area.width.saturating_sub(label_width + 2);
        buf.set_line(x, area.y, &line, label_width);
    }
}
