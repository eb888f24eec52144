use serde::Serialize;

use crate::model::{Branch, Department, OnboardingStatus, Teammate};

/// Headline numbers for the directory header plus per-category breakdowns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStats {
    pub total: usize,
    pub onboarded: usize,
    pub departments: usize,
    pub by_department: Vec<(Department, usize)>,
    pub by_status: Vec<(OnboardingStatus, usize)>,
    pub by_branch: Vec<(Branch, usize)>,
}

impl DirectoryStats {
    /// Offboarded teammates still count toward `total` and `by_status` but
    /// not toward the department and branch breakdowns.
    pub fn compute<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Teammate>,
    {
        let mut dept_counts = [0usize; 3];
        let mut status_counts = [0usize; 4];
        let mut branch_counts = [0usize; 10];
        let mut total = 0;

        for record in records {
            total += 1;
            if let Some(slot) = position(&OnboardingStatus::ALL, &record.onboarding_status) {
                status_counts[slot] += 1;
            }
            if record.onboarding_status == OnboardingStatus::Offboard {
                continue;
            }
            dept_counts[record.department.ordinal()] += 1;
            if let Some(slot) = position(&Branch::ALL, &record.branch) {
                branch_counts[slot] += 1;
            }
        }

        let onboarded = position(&OnboardingStatus::ALL, &OnboardingStatus::Done)
            .map_or(0, |slot| status_counts[slot]);

        Self {
            total,
            onboarded,
            departments: Department::ALL.len(),
            by_department: non_zero(&Department::ALL, &dept_counts),
            by_status: non_zero(&OnboardingStatus::ALL, &status_counts),
            by_branch: non_zero(&Branch::ALL, &branch_counts),
        }
    }

    pub fn count_for_department(&self, department: Department) -> usize {
        self.by_department
            .iter()
            .find(|(dept, _)| *dept == department)
            .map_or(0, |(_, count)| *count)
    }
}

fn position<T: PartialEq>(all: &[T], value: &T) -> Option<usize> {
    all.iter().position(|candidate| candidate == value)
}

fn non_zero<T: Copy>(labels: &[T], counts: &[usize]) -> Vec<(T, usize)> {
    labels
        .iter()
        .copied()
        .zip(counts.iter().copied())
        .filter(|(_, count)| *count > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mate(department: Department, branch: Branch, status: OnboardingStatus) -> Teammate {
        let mut mate = Teammate::new("T", "M", "t@lh.test", "Role", department, branch);
        mate.onboarding_status = status;
        mate
    }

    #[test]
    fn offboarded_teammates_leave_department_and_branch_counts() {
        let records = vec![
            mate(Department::Sales, Branch::Savannah, OnboardingStatus::Done),
            mate(Department::Sales, Branch::Savannah, OnboardingStatus::Offboard),
            mate(Department::Operations, Branch::Elg, OnboardingStatus::InProgress),
        ];
        let stats = DirectoryStats::compute(&records);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.onboarded, 1);
        assert_eq!(stats.departments, 3);
        assert_eq!(
            stats.by_department,
            vec![(Department::Sales, 1), (Department::Operations, 1)]
        );
        assert_eq!(stats.by_branch, vec![(Branch::Savannah, 1), (Branch::Elg, 1)]);
        assert_eq!(
            stats.by_status,
            vec![
                (OnboardingStatus::InProgress, 1),
                (OnboardingStatus::Done, 1),
                (OnboardingStatus::Offboard, 1),
            ]
        );
        assert_eq!(stats.count_for_department(Department::Leadership), 0);
    }

    #[test]
    fn empty_snapshot_has_only_the_department_constant() {
        let stats = DirectoryStats::compute(std::iter::empty());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.onboarded, 0);
        assert_eq!(stats.departments, 3);
        assert!(stats.by_department.is_empty());
        assert!(stats.by_status.is_empty());
    }
}
