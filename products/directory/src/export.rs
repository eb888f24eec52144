use std::borrow::Cow;

use chrono::NaiveDate;

use crate::model::Teammate;

pub const DEFAULT_EXPORT_SLUG: &str = "lending-heights-team-directory";
pub const CSV_MIME: &str = "text/csv;charset=utf-8";

pub const CSV_HEADERS: [&str; 16] = [
    "Full Name",
    "First Name",
    "Last Name",
    "Position",
    "Department",
    "Branch",
    "Email",
    "Phone",
    "NMLS",
    "Manager",
    "Start Date",
    "Birthday",
    "Status",
    "LinkedIn",
    "Calendly",
    "Tags",
];

const TAG_SEPARATOR: &str = "; ";

/// A ready-to-download export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub mime: &'static str,
    pub body: String,
}

impl CsvExport {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Quote a cell when it holds a delimiter, a quote or a line break.
pub fn escape_cell(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn row_cells(record: &Teammate) -> [String; 16] {
    let opt = |value: &Option<String>| value.clone().unwrap_or_default();
    let date = |value: Option<NaiveDate>| value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
    [
        record.full_name(),
        record.first_name.clone(),
        record.last_name.clone(),
        record.position.clone(),
        record.department.as_str().to_string(),
        record.branch.as_str().to_string(),
        record.email.clone(),
        opt(&record.phone),
        opt(&record.nmls),
        record.manager_id.map(|id| id.to_string()).unwrap_or_default(),
        date(record.start_date),
        date(record.birthday),
        record.onboarding_status.as_str().to_string(),
        opt(&record.linkedin),
        opt(&record.calendly),
        record.tags.join(TAG_SEPARATOR),
    ]
}

fn join_row<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .map(|cell| escape_cell(cell.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header row plus one row per record, joined with `\n`.
pub fn to_csv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a Teammate>,
{
    let mut lines = vec![join_row(&CSV_HEADERS)];
    lines.extend(records.into_iter().map(|record| join_row(&row_cells(record))));
    lines.join("\n")
}

/// `<slug>-<YYYY-MM-DD>.csv`
pub fn export_filename(slug: &str, today: NaiveDate) -> String {
    format!("{slug}-{}.csv", today.format("%Y-%m-%d"))
}

pub fn export_file<'a, I>(records: I, slug: &str, today: NaiveDate) -> CsvExport
where
    I: IntoIterator<Item = &'a Teammate>,
{
    let body = to_csv(records);
    tracing::debug!(bytes = body.len(), slug, "directory csv encoded");
    CsvExport {
        filename: export_filename(slug, today),
        mime: CSV_MIME,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Branch, Department, OnboardingStatus};

    fn sample() -> Teammate {
        Teammate::new(
            "A,",
            "B",
            "ab@lh.test",
            "Loan Officer",
            Department::Sales,
            Branch::EriePa,
        )
    }

    #[test]
    fn header_row_is_fixed() {
        let csv = to_csv(std::iter::empty());
        assert_eq!(
            csv,
            "Full Name,First Name,Last Name,Position,Department,Branch,Email,Phone,NMLS,Manager,Start Date,Birthday,Status,LinkedIn,Calendly,Tags"
        );
    }

    #[test]
    fn comma_values_are_quoted_and_tags_joined() {
        let mut record = sample();
        record.first_name = "A,".into();
        record.last_name = "B".into();
        record.tags = vec!["x".into(), "y".into()];
        let csv = to_csv([&record]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"A, B\",\"A,\",B,"));
        assert!(row.ends_with(",x; y"));
    }

    #[test]
    fn absent_fields_render_empty() {
        let mut record = sample();
        record.first_name = "Plain".into();
        record.onboarding_status = OnboardingStatus::InProgress;
        let csv = to_csv([&record]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "Plain B,Plain,B,Loan Officer,Sales,🌊 Erie PA,ab@lh.test,,,,,,In progress,,,"
        );
        assert!(!row.contains("null"));
        assert!(!row.contains("undefined"));
    }

    #[test]
    fn escape_doubles_inner_quotes() {
        assert_eq!(escape_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_cell("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(escape_cell("plain"), "plain");
    }

    #[test]
    fn tricky_value_survives_a_standard_parser() {
        let mut record = sample();
        let tricky = "Rivers, \"Doc\"\nSenior";
        record.position = tricky.into();
        record.start_date = NaiveDate::from_ymd_opt(2021, 3, 8);
        let csv = to_csv([&record]);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), CSV_HEADERS.len());
        let rows: Vec<_> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][3], tricky);
        assert_eq!(&rows[0][10], "2021-03-08");
    }

    #[test]
    fn filename_carries_slug_and_iso_date() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let export = export_file(std::iter::empty(), DEFAULT_EXPORT_SLUG, today);
        assert_eq!(export.filename, "lending-heights-team-directory-2026-02-01.csv");
        assert_eq!(export.mime, "text/csv;charset=utf-8");
        assert_eq!(
            export.content_disposition(),
            "attachment; filename=\"lending-heights-team-directory-2026-02-01.csv\""
        );
    }
}
