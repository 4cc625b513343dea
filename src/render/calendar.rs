use crate::config::Scale;
use crate::model::{DateWindow, DayTally};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashSet;

/// GitHub dark-theme greens, lowest intensity first.
pub const PALETTE: [&str; 5] = ["#161b22", "#0e4429", "#006d32", "#26a641", "#39d353"];

pub const DAYS_PER_WEEK: usize = 7;

/// Color bucket for `count`. Fixed scale bounds are inclusive on the low end:
/// 1-3 → 1, 4-6 → 2, 7-9 → 3, 10 and above → 4.
pub fn bucket(count: u32, max: u32, scale: Scale) -> usize {
    if count == 0 {
        return 0;
    }
    match scale {
        Scale::Fixed => match count {
            1..=3 => 1,
            4..=6 => 2,
            7..=9 => 3,
            _ => 4,
        },
        Scale::Relative => {
            if max == 0 {
                return 0;
            }
            let ratio = f64::from(count) / f64::from(max);
            if ratio <= 0.25 {
                1
            } else if ratio <= 0.5 {
                2
            } else if ratio <= 0.75 {
                3
            } else {
                4
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub week: usize,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: usize,
    pub date: NaiveDate,
    pub count: u32,
    pub level: usize,
}

/// Weeks-as-columns layout of one window.
#[derive(Debug, Clone)]
pub struct CalendarGrid {
    pub window: DateWindow,
    /// Sunday on or before `window.start`.
    pub origin: NaiveDate,
    pub weeks: usize,
    pub cells: Vec<Cell>,
}

impl CalendarGrid {
    pub fn build(tally: &DayTally, window: &DateWindow, scale: Scale) -> Self {
        let origin = week_start(window.start);
        let span = (window.end - origin).num_days() as usize;
        let weeks = span / DAYS_PER_WEEK + 1;

        let max = window.iter_days().map(|d| tally.get(d)).max().unwrap_or(0);

        let cells = window
            .iter_days()
            .map(|date| {
                let offset = (date - origin).num_days() as usize;
                let count = tally.get(date);
                Cell {
                    week: offset / DAYS_PER_WEEK,
                    weekday: offset % DAYS_PER_WEEK,
                    date,
                    count,
                    level: bucket(count, max, scale),
                }
            })
            .collect();

        Self {
            window: *window,
            origin,
            weeks,
            cells,
        }
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().map(|c| u64::from(c.count)).sum()
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&Cell> {
        self.cells.iter().find(|c| c.date == date)
    }

    /// Column and first day of each month label. A month is labeled at the
    /// first column showing one of its first seven days.
    pub fn month_labels(&self) -> Vec<(usize, NaiveDate)> {
        let mut shown = HashSet::new();
        let mut labels = Vec::new();
        let mut ordered: Vec<&Cell> = self.cells.iter().collect();
        ordered.sort_by_key(|c| (c.week, c.weekday));

        for cell in ordered {
            let key = (cell.date.year(), cell.date.month());
            if cell.date.day() <= 7 && shown.insert(key) {
                labels.push((cell.week, cell.date));
            }
        }
        labels
    }
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}
