//! Scrollable list of deal cards.
//!
//! Cards have a fixed height per style, so scroll geometry (and therefore
//! the near-bottom check) can be computed from the item count alone without
//! rendering.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::app::scroll::ScrollMetrics;
use crate::core::deal::{format_won, Deal};

use super::theme::Theme;

// ───────────────────────────────────────── state ─────────────

/// Row-based scroll position for a deal list.
#[derive(Debug, Default, Clone, Copy)]
pub struct DealListState {
    /// First visible row.
    pub offset: usize,
    /// Visible rows, recorded on the last render.
    pub viewport: usize,
}

impl DealListState {
    pub fn metrics(&self, content: usize) -> ScrollMetrics {
        ScrollMetrics {
            offset: self.offset,
            viewport: self.viewport,
            content,
        }
    }

    fn max_offset(&self, content: usize) -> usize {
        content.saturating_sub(self.viewport)
    }

    /// Move by `delta` rows, clamped to the content.
    pub fn scroll_by(&mut self, delta: isize, content: usize) {
        let target = if delta < 0 {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta as usize)
        };
        self.offset = target.min(self.max_offset(content));
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self, content: usize) {
        self.offset = self.max_offset(content);
    }

    /// Index of the card drawn at `row` (relative to the list's inner area).
    pub fn card_at(&self, row: usize, style: CardStyle, count: usize) -> Option<usize> {
        let absolute = self.offset + row;
        let height = style.height();
        // The last row of every card is a spacer.
        if absolute % height == height - 1 {
            return None;
        }
        let index = absolute / height;
        (index < count).then_some(index)
    }
}

// ───────────────────────────────────────── card style ────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStyle {
    /// Time-deal card.  `upcoming` marks deals whose window is not open yet.
    TimeDeal { upcoming: bool },
    /// Brand catalog card with stock bar and price notes.
    BrandDeal,
}

impl CardStyle {
    /// Rows per card, spacer included.
    pub fn height(self) -> usize {
        match self {
            CardStyle::TimeDeal { .. } => 4,
            CardStyle::BrandDeal => 5,
        }
    }

    pub fn content_rows(self, count: usize) -> usize {
        count * self.height()
    }

    fn card_lines(self, deal: &Deal) -> Vec<Line<'static>> {
        match self {
            CardStyle::TimeDeal { upcoming } => {
                let mut title = Vec::new();
                if upcoming {
                    title.push(Span::styled(" 오픈예정 ", Theme::upcoming_style()));
                    title.push(Span::raw(" "));
                }
                title.push(Span::styled(deal.title.clone(), Theme::title_text_style()));
                vec![
                    Line::from(title),
                    Line::from(Span::styled(
                        format_won(deal.original_price),
                        Theme::struck_price_style(),
                    )),
                    Line::from(vec![
                        Span::styled(format!("{}% ", deal.discount_rate), Theme::rate_style()),
                        Span::styled(format_won(deal.discounted_price), Theme::price_style()),
                    ]),
                    Line::raw(""),
                ]
            }
            CardStyle::BrandDeal => vec![
                Line::from(Span::styled(deal.title.clone(), Theme::title_text_style())),
                stock_bar(deal),
                Line::from(Span::styled(
                    format!("할인가 {}", format_won(deal.discounted_price)),
                    Theme::rate_style(),
                )),
                Line::from(Span::styled(
                    format!("곧 정상가 {} 으로 돌아갑니다", format_won(deal.original_price)),
                    Theme::muted_style(),
                )),
                Line::raw(""),
            ],
        }
    }
}

const STOCK_BAR_WIDTH: usize = 20;

/// `███████░░░░░ 35%`: filled share is the remaining stock, the label is the
/// discount rate.
fn stock_bar(deal: &Deal) -> Line<'static> {
    let pct = deal.stock_percentage.unwrap_or(0.0).clamp(0.0, 100.0);
    let filled = ((pct / 100.0) * STOCK_BAR_WIDTH as f64).round() as usize;
    Line::from(vec![
        Span::styled("█".repeat(filled), Theme::stock_filled_style()),
        Span::styled(
            "░".repeat(STOCK_BAR_WIDTH - filled),
            Theme::stock_empty_style(),
        ),
        Span::styled(format!(" {}%", deal.discount_rate), Theme::rate_style()),
    ])
}

// ───────────────────────────────────────── widget ────────────

pub struct DealListWidget<'a> {
    deals: &'a [Deal],
    style: CardStyle,
    block: Option<Block<'a>>,
    empty_text: &'a str,
}

impl<'a> DealListWidget<'a> {
    pub fn new(deals: &'a [Deal], style: CardStyle) -> Self {
        Self {
            deals,
            style,
            block: None,
            empty_text: "",
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Text shown when there are no deals (e.g. while the first page loads).
    pub fn empty_text(mut self, text: &'a str) -> Self {
        self.empty_text = text;
        self
    }
}

impl<'a> StatefulWidget for DealListWidget<'a> {
    type State = DealListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        state.viewport = inner.height as usize;
        let content = self.style.content_rows(self.deals.len());
        state.offset = state.offset.min(state.max_offset(content));

        if self.deals.is_empty() {
            if inner.height > 0 {
                let line = Line::from(Span::styled(self.empty_text, Theme::muted_style()));
                buf.set_line(inner.x + 1, inner.y, &line, inner.width.saturating_sub(1));
            }
            return;
        }

        // Only build the cards that intersect the viewport.
        let height = self.style.height();
        let first_card = state.offset / height;
        let last_card = ((state.offset + state.viewport) / height + 1).min(self.deals.len());
        let skip = state.offset - first_card * height;

        let lines = self.deals[first_card..last_card]
            .iter()
            .flat_map(|deal| self.style.card_lines(deal))
            .skip(skip)
            .take(state.viewport);

        for (i, line) in lines.enumerate() {
            buf.set_line(inner.x + 1, inner.y + i as u16, &line, inner.width.saturating_sub(1));
        }
    }
}
