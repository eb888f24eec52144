use std::{borrow::Cow, cmp::Ordering};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::model::Teammate;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortColumn {
    FullName,
    Position,
    Department,
    Branch,
    Email,
    Manager,
    OnboardingStatus,
    Nmls,
    StartDate,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Table-mode column sort with a tri-state header toggle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TableSort {
    active: Option<(SortColumn, SortDirection)>,
}

impl TableSort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(column: SortColumn, direction: SortDirection) -> Self {
        Self {
            active: Some((column, direction)),
        }
    }

    pub fn active(&self) -> Option<(SortColumn, SortDirection)> {
        self.active
    }

    pub fn direction_of(&self, column: SortColumn) -> Option<SortDirection> {
        self.active
            .filter(|(active, _)| *active == column)
            .map(|(_, direction)| direction)
    }

    /// Header click: unsorted → ascending → descending → unsorted. A different
    /// column always restarts at ascending.
    pub fn toggle(&mut self, column: SortColumn) {
        self.active = match self.active {
            Some((current, SortDirection::Ascending)) if current == column => {
                Some((column, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
    }

    /// Stable sort of `records`; the input order is returned when unsorted.
    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a Teammate>
    where
        I: IntoIterator<Item = &'a Teammate>,
    {
        let mut rows: Vec<&'a Teammate> = records.into_iter().collect();
        if let Some((column, direction)) = self.active {
            rows.sort_by(|a, b| compare_rows(a, b, column, direction));
        }
        rows
    }
}

enum SortValue<'a> {
    Text(Cow<'a, str>),
    Date(NaiveDate),
}

fn sort_value(record: &Teammate, column: SortColumn) -> Option<SortValue<'_>> {
    let text = |label: &'static str| Some(SortValue::Text(Cow::Borrowed(label)));
    match column {
        SortColumn::FullName => Some(SortValue::Text(Cow::Owned(record.full_name()))),
        SortColumn::Position => Some(SortValue::Text(Cow::Borrowed(&record.position))),
        SortColumn::Department => text(record.department.as_str()),
        SortColumn::Branch => text(record.branch.as_str()),
        SortColumn::Email => Some(SortValue::Text(Cow::Borrowed(&record.email))),
        SortColumn::Manager => record
            .manager_id
            .map(|id| SortValue::Text(Cow::Owned(id.to_string()))),
        SortColumn::OnboardingStatus => text(record.onboarding_status.as_str()),
        SortColumn::Nmls => record
            .nmls
            .as_deref()
            .map(|value| SortValue::Text(Cow::Borrowed(value))),
        SortColumn::StartDate => record.start_date.map(SortValue::Date),
    }
}

fn compare_rows(a: &Teammate, b: &Teammate, column: SortColumn, direction: SortDirection) -> Ordering {
    match (sort_value(a, column), sort_value(b, column)) {
        (None, None) => Ordering::Equal,
        // absent values trail in both directions
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => {
            let ordering = match (left, right) {
                (SortValue::Text(l), SortValue::Text(r)) => locale_compare(&l, &r),
                (SortValue::Date(l), SortValue::Date(r)) => l.cmp(&r),
                _ => Ordering::Equal,
            };
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}

/// Collation close to a default-locale `localeCompare`. Primary level:
/// accents folded, case ignored, symbols and punctuation before digits
/// before letters. Ties break on accents, then lowercase ahead of uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    base_chars(a)
        .map(primary_weight)
        .cmp(base_chars(b).map(primary_weight))
        .then_with(|| {
            a.nfd()
                .flat_map(char::to_lowercase)
                .cmp(b.nfd().flat_map(char::to_lowercase))
        })
        .then_with(|| {
            base_chars(a)
                .map(char::is_uppercase)
                .cmp(base_chars(b).map(char::is_uppercase))
        })
}

/// Canonical decomposition with combining marks dropped: "É" becomes "E".
fn base_chars(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c))
}

fn primary_weight(c: char) -> (u8, char) {
    let class = if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    };
    (class, c.to_lowercase().next().unwrap_or(c))
}
