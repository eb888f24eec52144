use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A label outside one of the closed enumerations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Leadership,
    Sales,
    Operations,
}

impl Department {
    /// Declared order; gallery buckets follow it.
    pub const ALL: [Department; 3] = [Self::Leadership, Self::Sales, Self::Operations];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Leadership => "Leadership",
            Self::Sales => "Sales",
            Self::Operations => "Operations",
        }
    }

    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dept| dept.as_str() == s)
            .ok_or_else(|| UnknownLabel {
                kind: "department",
                value: s.to_string(),
            })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    #[serde(rename = "🌉 Pittsburgh (HQ)")]
    PittsburghHq,
    #[serde(rename = "🍑 Savannah")]
    Savannah,
    #[serde(rename = "🔔 Philadelphia")]
    Philadelphia,
    #[serde(rename = "🌊 Erie PA")]
    EriePa,
    #[serde(rename = "🖼️ ELG")]
    Elg,
    #[serde(rename = "💥 Prosper Firm")]
    ProsperFirm,
    #[serde(rename = "Champion Lending Group")]
    ChampionLendingGroup,
    #[serde(rename = "Keswick Mortgage Group")]
    KeswickMortgageGroup,
    #[serde(rename = "🌅 LH California")]
    LhCalifornia,
    #[serde(rename = "WTX Lending")]
    WtxLending,
}

impl Branch {
    pub const ALL: [Branch; 10] = [
        Self::PittsburghHq,
        Self::Savannah,
        Self::Philadelphia,
        Self::EriePa,
        Self::Elg,
        Self::ProsperFirm,
        Self::ChampionLendingGroup,
        Self::KeswickMortgageGroup,
        Self::LhCalifornia,
        Self::WtxLending,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PittsburghHq => "🌉 Pittsburgh (HQ)",
            Self::Savannah => "🍑 Savannah",
            Self::Philadelphia => "🔔 Philadelphia",
            Self::EriePa => "🌊 Erie PA",
            Self::Elg => "🖼️ ELG",
            Self::ProsperFirm => "💥 Prosper Firm",
            Self::ChampionLendingGroup => "Champion Lending Group",
            Self::KeswickMortgageGroup => "Keswick Mortgage Group",
            Self::LhCalifornia => "🌅 LH California",
            Self::WtxLending => "WTX Lending",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|branch| branch.as_str() == s)
            .ok_or_else(|| UnknownLabel {
                kind: "branch",
                value: s.to_string(),
            })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OnboardingStatus {
    #[default]
    #[serde(rename = "Not started")]
    NotStarted,
    #[serde(rename = "In progress")]
    InProgress,
    Done,
    Offboard,
}

impl OnboardingStatus {
    pub const ALL: [OnboardingStatus; 4] = [
        Self::NotStarted,
        Self::InProgress,
        Self::Done,
        Self::Offboard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::InProgress => "In progress",
            Self::Done => "Done",
            Self::Offboard => "Offboard",
        }
    }
}

impl fmt::Display for OnboardingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OnboardingStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownLabel {
                kind: "onboarding status",
                value: s.to_string(),
            })
    }
}

/// One employee's profile row.
///
/// The display name is always derived from `first_name` and `last_name`; there
/// is no separately stored full name to drift out of sync.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teammate {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub department: Department,
    pub branch: Branch,
    pub nmls: Option<String>,
    pub headshot_url: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub birthday: Option<NaiveDate>,
    pub onboarding_status: OnboardingStatus,
    pub linkedin: Option<String>,
    pub calendly: Option<String>,
    pub manager_id: Option<Uuid>,
    pub tags: Vec<String>,
}

impl Teammate {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        position: impl Into<String>,
        department: Department,
        branch: Branch,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            position: position.into(),
            department,
            branch,
            nmls: None,
            headshot_url: None,
            start_date: None,
            birthday: None,
            onboarding_status: OnboardingStatus::default(),
            linkedin: None,
            calendly: None,
            manager_id: None,
            tags: Vec::new(),
        }
    }

    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

pub fn full_name(first: &str, last: &str) -> String {
    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{first} {last}"),
        (false, true) => first.to_string(),
        _ => last.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeammateTag {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub color: Option<String>,
}

impl NewTag {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }
}

/// Per-state license held by a teammate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateLicense {
    pub id: Uuid,
    pub state_code: String,
    pub state_name: Option<String>,
    pub license_number: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientReview {
    pub id: Uuid,
    pub client_name: String,
    pub review_text: String,
    pub rating: u8,
    pub review_date: Option<NaiveDate>,
}

/// Detail-screen view of a teammate with its related rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeammateProfile {
    pub teammate: Teammate,
    pub manager: Option<ManagerSummary>,
    pub tags: Vec<TeammateTag>,
    pub licenses: Vec<StateLicense>,
    pub reviews: Vec<ClientReview>,
}

impl TeammateProfile {
    pub fn average_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let total: u32 = self.reviews.iter().map(|review| u32::from(review.rating)).sum();
        Some(f64::from(total) / self.reviews.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for branch in Branch::ALL {
            assert_eq!(branch.as_str().parse::<Branch>().unwrap(), branch);
        }
        for status in OnboardingStatus::ALL {
            assert_eq!(status.as_str().parse::<OnboardingStatus>().unwrap(), status);
        }
        assert_eq!("Sales".parse::<Department>().unwrap(), Department::Sales);
    }

    #[test]
    fn labels_outside_the_enumeration_are_rejected() {
        let err = "Marketing".parse::<Department>().unwrap_err();
        assert_eq!(err.to_string(), "unknown department `Marketing`");
        assert!("Pittsburgh".parse::<Branch>().is_err());
        assert!("done".parse::<OnboardingStatus>().is_err());
    }

    #[test]
    fn full_name_follows_first_and_last() {
        let mut mate = Teammate::new(
            "John",
            "Doe",
            "john@lh.test",
            "Loan Officer",
            Department::Sales,
            Branch::Savannah,
        );
        assert_eq!(mate.full_name(), "John Doe");
        mate.last_name = "Smith".into();
        assert_eq!(mate.full_name(), "John Smith");
    }

    #[test]
    fn display_uses_labels() {
        assert_eq!(Branch::PittsburghHq.to_string(), "🌉 Pittsburgh (HQ)");
        assert_eq!(OnboardingStatus::InProgress.to_string(), "In progress");
    }

    #[test]
    fn average_rating_over_reviews() {
        let teammate = Teammate::new("A", "B", "a@b.c", "P", Department::Sales, Branch::Elg);
        let review = |rating| ClientReview {
            id: Uuid::new_v4(),
            client_name: "Client".into(),
            review_text: "Great".into(),
            rating,
            review_date: None,
        };
        let profile = TeammateProfile {
            teammate,
            manager: None,
            tags: vec![],
            licenses: vec![],
            reviews: vec![review(5), review(4)],
        };
        assert_eq!(profile.average_rating(), Some(4.5));
    }
}
