//! Shared bodies of the CLI subcommands and the CSV download route.

use std::fmt::Write as _;

use chrono::NaiveDate;
use platform_store::StoreResult;
use products_calendar::{CalendarEvent, DayCell, MonthGrid, WEEKDAY_LABELS, events_on, is_today};
use products_directory::{CsvExport, DirectoryStore, FilterCriteria, ListFilters, export_file, filter};

/// Fetch with the categorical filters pushed to the store, apply the search
/// text in memory, and encode what remains.
pub async fn directory_export<S>(
    store: &S,
    criteria: &FilterCriteria,
    slug: &str,
    today: NaiveDate,
) -> StoreResult<CsvExport>
where
    S: DirectoryStore + ?Sized,
{
    let records = store.list(ListFilters::from(criteria)).await?;
    Ok(export_file(filter::apply(&records, criteria), slug, today))
}

/// Plain-text month view: `[dd]` marks today, `*` marks days with events,
/// followed by one line per event.
pub fn render_month(grid: &MonthGrid, events: &[CalendarEvent], today: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", grid.title());
    let header: Vec<String> = WEEKDAY_LABELS.iter().map(|label| format!("{label:>5}")).collect();
    let _ = writeln!(out, "{}", header.concat());
    for week in grid.weeks() {
        for cell in week {
            let text = match cell {
                DayCell::Blank => String::new(),
                DayCell::Day(day) => {
                    let busy = !events_on(events, grid.year, grid.month0, *day).is_empty();
                    let marker = if busy { "*" } else { "" };
                    if is_today(*cell, grid.month0, grid.year, today) {
                        format!("[{day}]{marker}")
                    } else {
                        format!("{day}{marker}")
                    }
                }
            };
            let _ = write!(out, "{text:>5}");
        }
        out.push('\n');
    }
    for event in events {
        let when = match event.time_label() {
            label if label.is_empty() => String::new(),
            label => format!("  {label}"),
        };
        let _ = writeln!(
            out,
            "{}{when}  {} ({})",
            event.date.format("%b %d"),
            event.title,
            event.category.as_str()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveTime, Utc};
    use products_calendar::{EventCategory, NewEvent, build_month_grid};
    use uuid::Uuid;

    use super::*;

    fn event(day: u32, title: &str) -> CalendarEvent {
        NewEvent {
            title: title.into(),
            date: NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0),
            end_time: NaiveTime::from_hms_opt(11, 0, 0),
            all_day: false,
            category: EventCategory::Meeting,
            location: None,
            description: None,
        }
        .into_event(Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn february_2026_renders_five_weeks() {
        let grid = build_month_grid(1, 2026).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        let text = render_month(&grid, &[event(5, "Planning Meeting")], today);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "February 2026");
        assert!(lines[1].contains("Sun") && lines[1].contains("Sat"));
        assert_eq!(lines.len(), 2 + 5 + 1);
        assert!(text.contains("5*"));
        assert!(text.contains("[10]"));
        assert_eq!(lines[7], "Feb 05  10:00 AM - 11:00 AM  Planning Meeting (meeting)");
    }

    #[test]
    fn first_week_starts_on_sunday_for_february_2026() {
        let grid = build_month_grid(1, 2026).unwrap();
        let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let text = render_month(&grid, &[], today);
        let first_week = text.lines().nth(2).unwrap();
        assert!(first_week.trim_start().starts_with("1 "));
    }
}
