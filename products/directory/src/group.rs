use crate::model::{Department, Teammate};

/// Records sharing one department, in their original relative order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepartmentBucket<'a> {
    pub department: Department,
    pub records: Vec<&'a Teammate>,
}

impl DepartmentBucket<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Stable partition by department.
///
/// Buckets come back in [`Department::ALL`] order and empty buckets are
/// dropped, so every record lands in exactly one returned bucket.
pub fn group_by_department<'a, I>(records: I) -> Vec<DepartmentBucket<'a>>
where
    I: IntoIterator<Item = &'a Teammate>,
{
    let mut slots: Vec<Vec<&'a Teammate>> = Department::ALL.iter().map(|_| Vec::new()).collect();
    for record in records {
        slots[record.department.ordinal()].push(record);
    }
    Department::ALL
        .into_iter()
        .zip(slots)
        .filter(|(_, records)| !records.is_empty())
        .map(|(department, records)| DepartmentBucket {
            department,
            records,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Branch;

    fn mate(first: &str, department: Department) -> Teammate {
        Teammate::new(
            first,
            "Test",
            format!("{}@lh.test", first.to_lowercase()),
            "Role",
            department,
            Branch::Philadelphia,
        )
    }

    #[test]
    fn buckets_follow_declared_order_not_insertion_order() {
        let records = vec![
            mate("Ops", Department::Operations),
            mate("Seller", Department::Sales),
            mate("Boss", Department::Leadership),
        ];
        let buckets = group_by_department(&records);
        let order: Vec<_> = buckets.iter().map(|b| b.department).collect();
        assert_eq!(
            order,
            vec![Department::Leadership, Department::Sales, Department::Operations]
        );
    }

    #[test]
    fn partition_is_stable_and_complete() {
        let records = vec![
            mate("A", Department::Sales),
            mate("B", Department::Operations),
            mate("C", Department::Sales),
            mate("D", Department::Sales),
            mate("E", Department::Operations),
        ];
        let buckets = group_by_department(&records);
        let total: usize = buckets.iter().map(DepartmentBucket::len).sum();
        assert_eq!(total, records.len());

        let sales: Vec<_> = buckets[0].records.iter().map(|r| r.first_name.as_str()).collect();
        assert_eq!(buckets[0].department, Department::Sales);
        assert_eq!(sales, vec!["A", "C", "D"]);

        for record in &records {
            let hits = buckets
                .iter()
                .filter(|b| b.records.iter().any(|r| r.id == record.id))
                .count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn empty_departments_are_absent() {
        let records = vec![mate("Solo", Department::Operations)];
        let buckets = group_by_department(&records);
        assert_eq!(buckets.len(), 1);
        assert!(group_by_department(std::iter::empty()).is_empty());
    }
}
