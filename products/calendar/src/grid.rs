use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::model::CalendarEvent;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Grids never shrink below five weeks so month-to-month navigation keeps a
/// steady height.
pub const MIN_WEEKS: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("month must be between 0 and 11, got {0}")]
    InvalidMonth(u32),
    #[error("year {0} is outside the supported range")]
    InvalidYear(i32),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DayCell {
    Blank,
    Day(u32),
}

impl DayCell {
    pub fn day(self) -> Option<u32> {
        match self {
            Self::Blank => None,
            Self::Day(day) => Some(day),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub month0: u32,
    pub year: i32,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells
            .iter()
            .take_while(|cell| **cell == DayCell::Blank)
            .count()
    }

    pub fn day_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.day().is_some()).count()
    }

    pub fn title(&self) -> String {
        month_title(self.month0, self.year)
    }
}

fn first_of_month(month0: u32, year: i32) -> Result<NaiveDate, CalendarError> {
    if month0 > 11 {
        return Err(CalendarError::InvalidMonth(month0));
    }
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).ok_or(CalendarError::InvalidYear(year))
}

fn days_in_month(first: NaiveDate) -> Result<u32, CalendarError> {
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or(CalendarError::InvalidYear(first.year()))?;
    Ok(next.signed_duration_since(first).num_days() as u32)
}

fn month_title(month0: u32, year: i32) -> String {
    let name = MONTH_NAMES.get(month0 as usize).copied().unwrap_or("?");
    format!("{name} {year}")
}

/// Leading blanks up to the weekday of the 1st (Sunday = 0), one cell per
/// day, then trailing blanks to whole weeks.
pub fn build_month_grid(month0: u32, year: i32) -> Result<MonthGrid, CalendarError> {
    let first = first_of_month(month0, year)?;
    let leading = first.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(first)?;

    let mut cells = vec![DayCell::Blank; leading];
    cells.extend((1..=days).map(DayCell::Day));
    let weeks = cells.len().div_ceil(7).max(MIN_WEEKS);
    cells.resize(weeks * 7, DayCell::Blank);

    Ok(MonthGrid {
        month0,
        year,
        cells,
    })
}

/// Loaded events that fall exactly on the given day.
pub fn events_on(events: &[CalendarEvent], year: i32, month0: u32, day: u32) -> Vec<&CalendarEvent> {
    events
        .iter()
        .filter(|event| {
            event.date.year() == year && event.date.month0() == month0 && event.date.day() == day
        })
        .collect()
}

pub fn is_today(cell: DayCell, month0: u32, year: i32, today: NaiveDate) -> bool {
    match cell {
        DayCell::Blank => false,
        DayCell::Day(day) => {
            today.day() == day && today.month0() == month0 && today.year() == year
        }
    }
}

/// The month currently on screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthCursor {
    month0: u32,
    year: i32,
}

impl MonthCursor {
    pub fn new(month0: u32, year: i32) -> Result<Self, CalendarError> {
        first_of_month(month0, year)?;
        Ok(Self { month0, year })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            month0: date.month0(),
            year: date.year(),
        }
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn previous(self) -> Self {
        if self.month0 == 0 {
            Self {
                month0: 11,
                year: self.year - 1,
            }
        } else {
            Self {
                month0: self.month0 - 1,
                year: self.year,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month0 == 11 {
            Self {
                month0: 0,
                year: self.year + 1,
            }
        } else {
            Self {
                month0: self.month0 + 1,
                year: self.year,
            }
        }
    }

    /// Inclusive `(first_day, last_day)` used to fetch the month.
    pub fn range(self) -> Result<(NaiveDate, NaiveDate), CalendarError> {
        let first = first_of_month(self.month0, self.year)?;
        let days = days_in_month(first)?;
        let last = first
            .with_day(days)
            .ok_or(CalendarError::InvalidYear(self.year))?;
        Ok((first, last))
    }

    pub fn grid(self) -> Result<MonthGrid, CalendarError> {
        build_month_grid(self.month0, self.year)
    }

    pub fn title(self) -> String {
        month_title(self.month0, self.year)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::model::{EventCategory, NewEvent};

    fn event_on(date: NaiveDate) -> CalendarEvent {
        NewEvent {
            title: "Payroll Processing".into(),
            date,
            start_time: None,
            end_time: None,
            all_day: true,
            category: EventCategory::Payroll,
            location: None,
            description: None,
        }
        .into_event(Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn february_2026_starts_on_sunday_and_fills_five_rows() {
        let grid = build_month_grid(1, 2026).unwrap();
        assert_eq!(grid.leading_blanks(), 0);
        assert_eq!(grid.day_count(), 28);
        assert_eq!(grid.cells.len(), 35);
        assert_eq!(grid.title(), "February 2026");
    }

    #[test]
    fn january_2026_is_offset_to_thursday() {
        let grid = build_month_grid(0, 2026).unwrap();
        assert_eq!(grid.leading_blanks(), 4);
        assert_eq!(grid.cells[4], DayCell::Day(1));
        assert_eq!(grid.day_count(), 31);
        assert_eq!(grid.cells.len(), 35);
    }

    #[test]
    fn leap_years_get_a_29th() {
        assert_eq!(build_month_grid(1, 2024).unwrap().day_count(), 29);
        assert_eq!(build_month_grid(1, 2100).unwrap().day_count(), 28);
        assert_eq!(build_month_grid(1, 2000).unwrap().day_count(), 29);
    }

    #[test]
    fn every_grid_is_whole_weeks_with_weekday_offset() {
        for year in [1999, 2024, 2026, 2031] {
            for month0 in 0..12 {
                let grid = build_month_grid(month0, year).unwrap();
                assert_eq!(grid.cells.len() % 7, 0);
                let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap();
                assert_eq!(
                    grid.leading_blanks(),
                    first.weekday().num_days_from_sunday() as usize
                );
                assert!(grid.weeks().all(|week| week.len() == 7));
            }
        }
    }

    #[test]
    fn six_week_months_are_not_truncated() {
        // August 2026 starts on a Saturday
        let grid = build_month_grid(7, 2026).unwrap();
        assert_eq!(grid.leading_blanks(), 6);
        assert_eq!(grid.cells.len(), 42);
    }

    #[test]
    fn out_of_range_month_is_an_error() {
        assert_eq!(build_month_grid(12, 2026), Err(CalendarError::InvalidMonth(12)));
        assert!(MonthCursor::new(12, 2026).is_err());
    }

    #[test]
    fn events_on_matches_exact_day_only() {
        let events = vec![
            event_on(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()),
            event_on(NaiveDate::from_ymd_opt(2026, 1, 16).unwrap()),
            event_on(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()),
        ];
        assert_eq!(events_on(&events, 2026, 0, 15).len(), 1);
        assert!(events_on(&events, 2026, 0, 17).is_empty());
    }

    #[test]
    fn today_flag_compares_all_three_parts() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 21).unwrap();
        assert!(is_today(DayCell::Day(21), 0, 2026, today));
        assert!(!is_today(DayCell::Day(21), 1, 2026, today));
        assert!(!is_today(DayCell::Day(21), 0, 2025, today));
        assert!(!is_today(DayCell::Blank, 0, 2026, today));
    }

    #[test]
    fn cursor_rolls_over_year_boundaries() {
        let january = MonthCursor::new(0, 2026).unwrap();
        assert_eq!(january.previous(), MonthCursor::new(11, 2025).unwrap());
        assert_eq!(january.previous().next(), january);
        let december = MonthCursor::new(11, 2026).unwrap();
        assert_eq!(december.next().title(), "January 2027");
    }

    #[test]
    fn cursor_range_covers_the_whole_month() {
        let (first, last) = MonthCursor::new(1, 2024).unwrap().range().unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
