use chrono::NaiveDate;
use platform_store::ValidationErrors;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Branch, Department, OnboardingStatus, Teammate};

pub const NAME_MAX: usize = 128;
pub const EMAIL_MAX: usize = 254;
pub const OPTIONAL_MAX: usize = 512;

/// Raw create-form buffer, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeammateForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub department: String,
    pub branch: String,
    pub nmls: String,
    pub start_date: String,
    pub birthday: String,
    pub onboarding_status: String,
    pub linkedin: String,
    pub calendly: String,
    pub manager_id: String,
}

/// A validated teammate ready to be inserted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeammate {
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
}

impl TeammateForm {
    pub fn validate(&self) -> Result<NewTeammate, ValidationErrors> {
        let mut report = ValidationErrors::default();

        let first_name = report.required("first_name", "First name", &self.first_name, NAME_MAX);
        let last_name = report.required("last_name", "Last name", &self.last_name, NAME_MAX);
        let email = validate_email(&mut report, &self.email);
        let position = report.required("position", "Position", &self.position, NAME_MAX);
        let phone = report.optional("phone", "Phone", &self.phone, OPTIONAL_MAX);
        let nmls = report.optional("nmls", "NMLS", &self.nmls, OPTIONAL_MAX);
        let linkedin = report.optional("linkedin", "LinkedIn", &self.linkedin, OPTIONAL_MAX);
        let calendly = report.optional("calendly", "Calendly", &self.calendly, OPTIONAL_MAX);
        let start_date = report.optional_date("start_date", "Start date", &self.start_date);
        let birthday = report.optional_date("birthday", "Birthday", &self.birthday);

        let department = parse_label(&mut report, "department", "Department", &self.department);
        let branch = parse_label(&mut report, "branch", "Branch", &self.branch);
        let onboarding_status = if self.onboarding_status.trim().is_empty() {
            Some(OnboardingStatus::default())
        } else {
            parse_label(
                &mut report,
                "onboarding_status",
                "Onboarding status",
                &self.onboarding_status,
            )
        };

        let manager_id = match self.manager_id.trim() {
            "" => None,
            raw => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    report.push("manager_id", "Manager must be a teammate id");
                    None
                }
            },
        };

        match (department, branch, onboarding_status) {
            (Some(department), Some(branch), Some(onboarding_status)) => report.finish(|| NewTeammate {
                first_name,
                last_name,
                email,
                phone,
                position,
                department,
                branch,
                nmls,
                headshot_url: None,
                start_date,
                birthday,
                onboarding_status,
                linkedin,
                calendly,
                manager_id,
            }),
            _ => Err(report),
        }
    }
}

impl NewTeammate {
    pub fn into_teammate(self, id: Uuid) -> Teammate {
        Teammate {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            position: self.position,
            department: self.department,
            branch: self.branch,
            nmls: self.nmls,
            headshot_url: self.headshot_url,
            start_date: self.start_date,
            birthday: self.birthday,
            onboarding_status: self.onboarding_status,
            linkedin: self.linkedin,
            calendly: self.calendly,
            manager_id: self.manager_id,
            tags: Vec::new(),
        }
    }
}

/// Partial update. `None` leaves a field untouched; for optional columns
/// `Some(None)` clears the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeammatePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub position: Option<String>,
    pub department: Option<Department>,
    pub branch: Option<Branch>,
    pub nmls: Option<Option<String>>,
    pub headshot_url: Option<Option<String>>,
    pub start_date: Option<Option<NaiveDate>>,
    pub birthday: Option<Option<NaiveDate>>,
    pub onboarding_status: Option<OnboardingStatus>,
    pub linkedin: Option<Option<String>>,
    pub calendly: Option<Option<String>>,
    pub manager_id: Option<Option<Uuid>>,
}

impl TeammatePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Re-check every present required field; trims text in place.
    pub fn validate(mut self) -> Result<Self, ValidationErrors> {
        let mut report = ValidationErrors::default();
        if let Some(raw) = self.first_name.take() {
            self.first_name = Some(report.required("first_name", "First name", &raw, NAME_MAX));
        }
        if let Some(raw) = self.last_name.take() {
            self.last_name = Some(report.required("last_name", "Last name", &raw, NAME_MAX));
        }
        if let Some(raw) = self.position.take() {
            self.position = Some(report.required("position", "Position", &raw, NAME_MAX));
        }
        if let Some(raw) = self.email.take() {
            self.email = Some(validate_email(&mut report, &raw));
        }
        for (field, label, slot) in [
            ("phone", "Phone", &mut self.phone),
            ("nmls", "NMLS", &mut self.nmls),
            ("linkedin", "LinkedIn", &mut self.linkedin),
            ("calendly", "Calendly", &mut self.calendly),
        ] {
            if let Some(Some(raw)) = slot.as_ref() {
                let cleaned = report.optional(field, label, raw, OPTIONAL_MAX);
                *slot = Some(cleaned);
            }
        }
        report.finish(|| self)
    }

    pub fn apply_to(&self, record: &mut Teammate) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
        set(&mut record.first_name, &self.first_name);
        set(&mut record.last_name, &self.last_name);
        set(&mut record.email, &self.email);
        set(&mut record.phone, &self.phone);
        set(&mut record.position, &self.position);
        set(&mut record.department, &self.department);
        set(&mut record.branch, &self.branch);
        set(&mut record.nmls, &self.nmls);
        set(&mut record.headshot_url, &self.headshot_url);
        set(&mut record.start_date, &self.start_date);
        set(&mut record.birthday, &self.birthday);
        set(&mut record.onboarding_status, &self.onboarding_status);
        set(&mut record.linkedin, &self.linkedin);
        set(&mut record.calendly, &self.calendly);
        set(&mut record.manager_id, &self.manager_id);
    }
}

fn validate_email(report: &mut ValidationErrors, raw: &str) -> String {
    let email = report.required("email", "Email", raw, EMAIL_MAX);
    if !email.is_empty() {
        let well_formed = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            }
            None => false,
        };
        if !well_formed {
            report.push("email", "Email must be a valid address");
        }
    }
    email
}

fn parse_label<T: std::str::FromStr>(
    report: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    raw: &str,
) -> Option<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        report.push(field, format!("{label} is required"));
        return None;
    }
    match trimmed.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            report.push(field, format!("{label} `{trimmed}` is not a known option"));
            None
        }
    }
}
