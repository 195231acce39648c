//! Month grid derivation for the calendar panel.
//!
//! The grid is computed as a pure function of (year, month, today) so the view
//! layer only has to paint cells; nothing is patched in place after the fact.

use chrono::{Datelike, Days, NaiveDate};

use crate::almanac::{self, LunarDate};

/// The grid always spans 6 weeks of 7 days, padded with adjacent-month days.
pub const GRID_CELLS: usize = 42;

/// One cell of the 6x7 month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Solar day-of-month, what the big number in the cell shows.
    pub solar_day: u32,
    /// Approximate lunar label shown under the solar day.
    pub lunar: LunarDate,
    /// False for the leading/trailing padding days of adjacent months.
    pub in_displayed_month: bool,
    pub is_today: bool,
}

/// Build the 42-cell grid for `(year, month)`, Sunday-aligned.
///
/// Cells before day 1 are the tail of the previous month, cells after the last
/// day are the head of the next month. Exactly one cell is marked today when
/// the displayed month is the real current month, zero otherwise.
pub fn month_grid(year: i32, month: u32, today: NaiveDate) -> Vec<CalendarCell> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let Some(start) = first.checked_sub_days(Days::new(lead)) else {
        return Vec::new();
    };

    (0..GRID_CELLS as u64)
        .filter_map(|i| start.checked_add_days(Days::new(i)))
        .map(|date| CalendarCell {
            date,
            solar_day: date.day(),
            lunar: almanac::approximate_lunar_date(date),
            in_displayed_month: date.year() == year && date.month() == month,
            is_today: date == today,
        })
        .collect()
}

/// Shift `(year, month)` by `delta` months, anchoring on day 1 so month-length
/// overflow cannot skip a month (Jan 31 + 1 month lands in February).
pub fn add_months(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 + delta;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}
