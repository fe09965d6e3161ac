//! Hourly discount windows derived from wall-clock time.
//!
//! The operating day is a fixed cycle of 17 one-hour slots starting at 07:00.
//! Nothing here is stored: every caller recomputes the window from the
//! current instant, so a long-running session rolls over on its own.

use chrono::{DateTime, Local, TimeZone, Timelike};

/// Display labels for the slots starting at 07:00 … 23:00, in cycle order.
pub const SLOT_LABELS: [&str; 17] = [
    "오전 7시",
    "오전 8시",
    "오전 9시",
    "오전 10시",
    "오전 11시",
    "오후 12시",
    "오후 1시",
    "오후 2시",
    "오후 3시",
    "오후 4시",
    "오후 5시",
    "오후 6시",
    "오후 7시",
    "오후 8시",
    "오후 9시",
    "오후 10시",
    "오후 11시",
];

/// Hour at which the first slot opens.
const FIRST_SLOT_HOUR: i32 = 7;

/// The last two slots of the day.  Matched by label, not by index.
const LAST_CALL_LABEL: &str = "오후 10시";
const CLOSING_LABEL: &str = "오후 11시";

/// Result of [`compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Label of the open slot, `None` outside operating hours.
    pub current_label: Option<&'static str>,
    /// Label of the slot after the current one, if any.
    pub next_label: Option<&'static str>,
    /// `hour - 7`; may fall outside `0..17` when no slot is open.
    pub current_index: i32,
}

impl TimeWindow {
    /// Position of the next slot in the cycle.  Uses a truncating remainder,
    /// so hours before 06:00 yield a negative (unlabelled) index.
    pub fn next_index(&self) -> i32 {
        (self.current_index + 1) % SLOT_LABELS.len() as i32
    }

    /// Whether both tabs ("current" and "next") should be offered.
    ///
    /// False for the last two slots of the day and whenever no slot is open.
    pub fn show_tabs(&self) -> bool {
        match self.current_label {
            Some(label) => label != LAST_CALL_LABEL && label != CLOSING_LABEL,
            None => false,
        }
    }

    /// Single heading shown in place of the tab bar, when tabs are hidden.
    pub fn banner(&self) -> Option<&'static str> {
        match self.current_label {
            Some(LAST_CALL_LABEL) => Some("11시에 끝나는 오늘의 마지막 타임특가!"),
            Some(CLOSING_LABEL) | None => Some("7시에 시작되는 오늘의 타임특가!"),
            Some(_) => None,
        }
    }
}

fn label_at(index: i32) -> Option<&'static str> {
    usize::try_from(index)
        .ok()
        .and_then(|i| SLOT_LABELS.get(i).copied())
}

/// Derive the open and upcoming windows for `now`.
pub fn compute<Tz: TimeZone>(now: &DateTime<Tz>) -> TimeWindow {
    let current_index = now.hour() as i32 - FIRST_SLOT_HOUR;
    let mut window = TimeWindow {
        current_label: label_at(current_index),
        next_label: None,
        current_index,
    };
    window.next_label = label_at(window.next_index());
    window
}

// ───────────────────────────────────────── clock ─────────────

/// Source of "now" for the feed screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    System,
    /// Local time with the hour replaced (minutes/seconds keep ticking).
    /// Used to preview how the feed looks at a given time of day.
    PinnedHour(u32),
}

impl Clock {
    pub fn now(&self) -> DateTime<Local> {
        let now = Local::now();
        match *self {
            Clock::System => now,
            Clock::PinnedHour(hour) => now.with_hour(hour.min(23)).unwrap_or(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn at(hour: u32) -> DateTime<FixedOffset> {
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        kst.with_ymd_and_hms(2024, 5, 1, hour, 30, 0).unwrap()
    }

    #[test]
    fn nine_oclock_is_ninth_hour_slot() {
        let w = compute(&at(9));
        assert_eq!(w.current_label, Some("오전 9시"));
        assert_eq!(w.next_label, Some("오전 10시"));
        assert_eq!(w.current_index, 2);
        assert!(w.show_tabs());
        assert_eq!(w.banner(), None);
    }

    #[test]
    fn operating_hours_map_to_slot_indices() {
        for hour in 7..=23 {
            let w = compute(&at(hour));
            assert_eq!(w.current_index, hour as i32 - 7);
            assert!((0..17).contains(&w.current_index));
            assert_eq!(w.next_index(), (w.current_index + 1) % 17);
            assert_eq!(w.current_label, Some(SLOT_LABELS[w.current_index as usize]));
            assert_eq!(w.next_label, Some(SLOT_LABELS[w.next_index() as usize]));
        }
    }

    #[test]
    fn last_slot_wraps_to_first() {
        let w = compute(&at(23));
        assert_eq!(w.current_label, Some("오후 11시"));
        assert_eq!(w.next_label, Some("오전 7시"));
    }

    #[test]
    fn before_opening_has_no_current_window() {
        let w = compute(&at(3));
        assert_eq!(w.current_label, None);
        assert_eq!(w.next_label, None);
        assert!(!w.show_tabs());
        assert_eq!(w.banner(), Some("7시에 시작되는 오늘의 타임특가!"));

        // One hour before opening the next slot is already known.
        let w = compute(&at(6));
        assert_eq!(w.current_label, None);
        assert_eq!(w.next_label, Some("오전 7시"));
    }

    #[test]
    fn terminal_slots_hide_tabs() {
        let w = compute(&at(22));
        assert!(!w.show_tabs());
        assert_eq!(w.banner(), Some("11시에 끝나는 오늘의 마지막 타임특가!"));

        let w = compute(&at(23));
        assert!(!w.show_tabs());
        assert_eq!(w.banner(), Some("7시에 시작되는 오늘의 타임특가!"));

        assert!(compute(&at(21)).show_tabs());
    }

    #[test]
    fn pinned_clock_reports_requested_hour() {
        assert_eq!(Clock::PinnedHour(22).now().hour(), 22);
        assert_eq!(Clock::PinnedHour(99).now().hour(), 23);
    }
}
