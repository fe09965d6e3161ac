//! Horizontal promo strips on the home screen.

use chrono::{DateTime, TimeZone};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::StatefulWidget,
};

use crate::core::countdown;
use crate::core::deal::{format_won, Deal};

use super::theme::Theme;

/// Columns per card, gap included.
pub const STRIP_CARD_WIDTH: u16 = 24;
const LEFT_PAD: u16 = 2;
const SHOW_ALL_LABEL: &str = "전체보기";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripKind {
    /// "Today only" deals on the orange band.
    Lure,
    /// Brand-deal preview with countdowns and a link to the full catalog.
    Brand,
}

impl StripKind {
    fn heading(self) -> &'static str {
        match self {
            StripKind::Lure => "오늘만 이가격, 순삭 특가",
            StripKind::Brand => "오늘의 브랜드 딜",
        }
    }
}

/// Horizontal scroll position of a strip, in whole cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripState {
    /// First visible card.
    pub offset: usize,
}

impl StripState {
    /// Shift by `delta` cards.  The last card stays in the rightmost slot.
    pub fn scroll_by(&mut self, delta: isize, count: usize, visible: usize) {
        let max = count.saturating_sub(visible);
        self.offset = self.offset.saturating_add_signed(delta).min(max);
    }
}

/// Whole cards that fit in a strip drawn at `area`.
pub fn visible_cards(area: Rect) -> usize {
    (area.width.saturating_sub(LEFT_PAD) / STRIP_CARD_WIDTH) as usize
}

pub struct DealStrip<'a, Tz: TimeZone> {
    pub kind: StripKind,
    pub deals: &'a [Deal],
    pub now: &'a DateTime<Tz>,
}

impl<'a, Tz: TimeZone> DealStrip<'a, Tz> {
    fn card_lines(&self, deal: &Deal) -> Vec<Line<'static>> {
        let price = Line::from(vec![
            Span::styled(format!("{}% ", deal.discount_rate), Theme::rate_style()),
            Span::styled(format_won(deal.discounted_price), Theme::price_style()),
        ]);
        match self.kind {
            StripKind::Lure => vec![
                Line::from(deal.title.clone()),
                Line::from(Span::styled(
                    format_won(deal.original_price),
                    Theme::struck_price_style(),
                )),
                price,
            ],
            StripKind::Brand => {
                let timer = countdown::remaining_for(self.now, deal.discount_end_date.as_deref())
                    .map(|left| Line::from(Span::styled(format!(" {left} "), Theme::countdown_style())))
                    .unwrap_or_default();
                vec![
                    timer,
                    Line::from(Span::styled(deal.title.clone(), Theme::title_text_style())),
                    price,
                ]
            }
        }
    }
}

impl<'a, Tz: TimeZone> StatefulWidget for DealStrip<'a, Tz> {
    type State = StripState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut StripState) {
        if area.height == 0 || area.width <= LEFT_PAD {
            return;
        }
        if self.kind == StripKind::Lure {
            buf.set_style(area, Theme::lure_strip_style());
        }

        let heading = Line::from(Span::styled(self.kind.heading(), Theme::strip_heading_style()));
        buf.set_line(area.x + LEFT_PAD, area.y, &heading, area.width - LEFT_PAD);
        if self.kind == StripKind::Brand {
            if let Some(link) = show_all_rect(area) {
                buf.set_string(link.x, link.y, SHOW_ALL_LABEL, Theme::show_all_style());
            }
        }

        // A resize may leave the offset past the last full page.
        let visible = visible_cards(area);
        state.offset = state.offset.min(self.deals.len().saturating_sub(visible));

        let top = area.y + 1;
        let bottom = area.y + area.height;
        let shown = self.deals.iter().skip(state.offset).take(visible);
        for (i, deal) in shown.enumerate() {
            let x = area.x + LEFT_PAD + i as u16 * STRIP_CARD_WIDTH;
            for (row, line) in self.card_lines(deal).iter().enumerate() {
                let y = top + row as u16;
                if y >= bottom {
                    break;
                }
                buf.set_line(x, y, line, STRIP_CARD_WIDTH - 2);
            }
        }

        if top < bottom {
            if state.offset > 0 {
                buf.set_string(area.x, top, "‹", Theme::muted_style());
            }
            if state.offset + visible < self.deals.len() {
                buf.set_string(area.x + area.width - 1, top, "›", Theme::muted_style());
            }
        }
    }
}

/// Where the "전체보기" link sits in a brand strip drawn at `area`.
pub fn show_all_rect(area: Rect) -> Option<Rect> {
    let width = Line::from(SHOW_ALL_LABEL).width() as u16;
    if area.height == 0 || area.width < width + LEFT_PAD * 2 {
        return None;
    }
    Some(Rect::new(
        area.x + area.width - width - LEFT_PAD,
        area.y,
        width,
        1,
    ))
}

/// Index of the deal under column `col` of a strip drawn at `area` and
/// scrolled to `offset`.
pub fn card_at(area: Rect, col: u16, count: usize, offset: usize) -> Option<usize> {
    let start = area.x + LEFT_PAD;
    if col < start {
        return None;
    }
    let slot = ((col - start) / STRIP_CARD_WIDTH) as usize;
    let index = offset + slot;
    (slot < visible_cards(area) && index < count).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::row_text;
    use crate::core::countdown::EXPIRED_LABEL;
    use crate::core::deal::sample_deal;
    use chrono::{FixedOffset, TimeZone};

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .unwrap()
    }

    #[test]
    fn brand_strip_shows_heading_link_and_countdowns() {
        let mut open = sample_deal(1);
        open.discount_end_date = Some("2024-05-01T13:30:05+09:00".into());
        let mut closed = sample_deal(2);
        closed.discount_end_date = Some("2024-05-01T11:00:00+09:00".into());
        let deals = vec![open, closed];

        let area = Rect::new(0, 0, 60, 7);
        let mut buf = Buffer::empty(area);
        let now = now();
        DealStrip { kind: StripKind::Brand, deals: &deals, now: &now }
            .render(area, &mut buf, &mut StripState::default());

        assert!(row_text(&buf, 0).contains("오늘의 브랜드 딜"));
        assert!(row_text(&buf, 0).contains("전체보기"));
        assert!(row_text(&buf, 1).contains("1시간 30분 5초"));
        assert!(row_text(&buf, 1).contains(EXPIRED_LABEL));
        assert!(row_text(&buf, 3).contains("35% 12,900원"));
    }

    #[test]
    fn cards_that_do_not_fit_wait_offscreen() {
        let deals: Vec<Deal> = (1..=4).map(sample_deal).collect();
        let area = Rect::new(0, 0, 52, 6);
        let mut buf = Buffer::empty(area);
        let now = now();
        DealStrip { kind: StripKind::Lure, deals: &deals, now: &now }
            .render(area, &mut buf, &mut StripState::default());

        let titles = row_text(&buf, 1);
        assert!(titles.contains("deal #1"));
        assert!(titles.contains("deal #2"));
        assert!(!titles.contains("deal #3"));
        assert!(!titles.starts_with('‹'));
        assert!(titles.trim_end().ends_with('›'));
    }

    #[test]
    fn scrolled_strip_shows_later_cards() {
        let deals: Vec<Deal> = (1..=6).map(sample_deal).collect();
        let area = Rect::new(0, 0, 80, 6);
        let now = now();
        let mut state = StripState::default();
        state.scroll_by(10, deals.len(), visible_cards(area));
        assert_eq!(state.offset, 3);

        let mut buf = Buffer::empty(area);
        DealStrip { kind: StripKind::Lure, deals: &deals, now: &now }
            .render(area, &mut buf, &mut state);
        let titles = row_text(&buf, 1);
        for id in 4..=6 {
            assert!(titles.contains(&format!("deal #{id}")), "{titles}");
        }
        assert!(!titles.contains("deal #3"));
        assert!(titles.starts_with('‹'));
        assert!(!titles.contains('›'));
    }

    #[test]
    fn offset_is_clamped_when_the_strip_widens() {
        let deals: Vec<Deal> = (1..=4).map(sample_deal).collect();
        let now = now();
        let mut state = StripState { offset: 2 };

        let area = Rect::new(0, 0, 80, 6);
        let mut buf = Buffer::empty(area);
        DealStrip { kind: StripKind::Lure, deals: &deals, now: &now }
            .render(area, &mut buf, &mut state);
        assert_eq!(state.offset, 1);

        state.scroll_by(-5, deals.len(), visible_cards(area));
        assert_eq!(state.offset, 0);
    }

    #[test]
    fn hit_testing() {
        let area = Rect::new(0, 10, 80, 7);
        let link = show_all_rect(area).unwrap();
        assert_eq!(link.y, 10);
        assert_eq!(link.x + link.width, 78);

        assert_eq!(visible_cards(area), 3);
        assert_eq!(card_at(area, 0, 5, 0), None);
        assert_eq!(card_at(area, 2, 5, 0), Some(0));
        assert_eq!(card_at(area, 2 + STRIP_CARD_WIDTH, 5, 0), Some(1));
        assert_eq!(card_at(area, 2 + STRIP_CARD_WIDTH, 1, 0), None);
        // A fourth card would overflow 80 columns.
        assert_eq!(card_at(area, 2 + 3 * STRIP_CARD_WIDTH, 5, 0), None);
        // Scrolled by two: the first slot holds deal index 2.
        assert_eq!(card_at(area, 2, 5, 2), Some(2));
        assert_eq!(card_at(area, 2 + 2 * STRIP_CARD_WIDTH, 5, 2), Some(4));
    }
}
