use std::str::FromStr;

use crate::model::{Branch, Department, OnboardingStatus, Teammate};

/// Sentinel label for an unconstrained selector.
pub const ALL_LABEL: &str = "All";

/// A categorical filter: either no constraint or an exact match.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Selector<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

impl<T: Copy> Selector<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(*value),
        }
    }
}

impl<T: FromStr> Selector<T> {
    /// `"All"` (or a blank string) is no constraint; anything else must parse.
    pub fn parse(raw: &str) -> Result<Self, T::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == ALL_LABEL {
            Ok(Self::All)
        } else {
            trimmed.parse().map(Self::Only)
        }
    }
}

impl<T> From<Option<T>> for Selector<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

/// The directory's current filter selections.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub department: Selector<Department>,
    pub branch: Selector<Branch>,
    pub onboarding_status: Selector<OnboardingStatus>,
}

impl FilterCriteria {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            ..Self::default()
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.search.is_empty()
            && self.department == Selector::All
            && self.branch == Selector::All
            && self.onboarding_status == Selector::All
    }
}

/// Conjunction of every active constraint in `criteria`.
pub fn matches(record: &Teammate, criteria: &FilterCriteria) -> bool {
    if !criteria.search.is_empty() {
        let needle = criteria.search.to_lowercase();
        let full_name = record.full_name();
        let fields = [
            full_name.as_str(),
            record.position.as_str(),
            record.branch.as_str(),
            record.email.as_str(),
        ];
        if !fields
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
        {
            return false;
        }
    }
    criteria.department.admits(&record.department)
        && criteria.branch.admits(&record.branch)
        && criteria.onboarding_status.admits(&record.onboarding_status)
}

/// Records matching `criteria`, in input order.
pub fn apply<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a Teammate>
where
    I: IntoIterator<Item = &'a Teammate>,
{
    records
        .into_iter()
        .filter(|record| matches(record, criteria))
        .collect()
}
