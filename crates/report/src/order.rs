// Attendance ordering and category grouping.

use std::collections::HashMap;

use crate::model::AttendanceRecord;

/// Rank of each attendance category; unknown categories rank last.
#[derive(Debug, Clone)]
pub struct CategoryPriority {
    ranks: HashMap<String, usize>,
    unknown: usize,
}

impl CategoryPriority {
    pub fn new<S: AsRef<str>>(order: &[S]) -> Self {
        let mut ranks = HashMap::new();
        for (i, category) in order.iter().enumerate() {
            ranks.entry(category.as_ref().trim().to_string()).or_insert(i);
        }
        Self { ranks, unknown: order.len() }
    }

    pub fn rank(&self, category: &str) -> usize {
        self.ranks.get(category.trim()).copied().unwrap_or(self.unknown)
    }
}

/// Stable sort by (category rank, team name).
pub fn sort_attendance(rows: &mut [AttendanceRecord], priority: &CategoryPriority) {
    rows.sort_by(|a, b| {
        priority
            .rank(&a.category)
            .cmp(&priority.rank(&b.category))
            .then_with(|| a.team.cmp(&b.team))
    });
}

/// Consecutive display block of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub rows: Vec<&'a AttendanceRecord>,
}

/// Group rows by category. Groups are ordered by (rank, category text);
/// rows inside a group keep their input order.
pub fn group_by_category<'a>(rows: &'a [AttendanceRecord], priority: &CategoryPriority) -> Vec<CategoryGroup<'a>> {
    let mut groups: Vec<CategoryGroup<'a>> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|g| g.category == row.category) {
            Some(group) => group.rows.push(row),
            None => groups.push(CategoryGroup {
                category: &row.category,
                rows: vec![row],
            }),
        }
    }
    groups.sort_by(|a, b| {
        priority
            .rank(a.category)
            .cmp(&priority.rank(b.category))
            .then_with(|| a.category.cmp(b.category))
    });
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rec(category: &str, team: &str) -> AttendanceRecord {
        AttendanceRecord {
            category: category.into(),
            team: team.into(),
            headcount: Vec::new(),
        }
    }

    fn priority() -> CategoryPriority {
        CategoryPriority::new(&["작업", "내무", "출장", "휴가"])
    }

    #[test]
    fn ranks() {
        let p = priority();
        assert_eq!(p.rank("작업"), 0);
        assert_eq!(p.rank(" 휴가 "), 3);
        assert_eq!(p.rank("교육"), 4);
    }

    #[test]
    fn sorts_by_priority_then_team() {
        let mut rows = vec![
            rec("휴가", "하역팀"),
            rec("작업", "중량물팀"),
            rec("교육", "물류팀"),
            rec("작업", "물류팀"),
            rec("출장", "하역팀"),
        ];
        sort_attendance(&mut rows, &priority());
        let got: Vec<_> = rows.iter().map(|r| (r.category.as_str(), r.team.as_str())).collect();
        assert_eq!(
            got,
            vec![
                ("작업", "물류팀"),
                ("작업", "중량물팀"),
                ("출장", "하역팀"),
                ("휴가", "하역팀"),
                ("교육", "물류팀"),
            ]
        );
    }

    #[test]
    fn groups_follow_priority_and_keep_row_order() {
        let rows = vec![
            rec("휴가", "A"),
            rec("작업", "B"),
            rec("휴가", "C"),
            rec("교육", "D"),
            rec("견학", "E"),
            rec("작업", "F"),
        ];
        let groups = group_by_category(&rows, &priority());
        let cats: Vec<_> = groups.iter().map(|g| g.category).collect();
        assert_eq!(cats, vec!["작업", "휴가", "견학", "교육"]);
        let teams: Vec<_> = groups[1].rows.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(teams, vec!["A", "C"]);
        assert_eq!(groups.iter().map(|g| g.rows.len()).sum::<usize>(), rows.len());
    }

    proptest! {
        /// Ranks are non-decreasing after sorting.
        #[test]
        fn sorted_ranks_non_decreasing(
            cats in proptest::collection::vec(
                prop_oneof![
                    Just("작업"), Just("내무"), Just("출장"), Just("휴가"), Just("교육"), Just("")
                ],
                0..50,
            ),
            teams in proptest::collection::vec("[a-c]{1,2}", 50),
        ) {
            let p = priority();
            let mut rows: Vec<_> = cats.iter().zip(teams.iter()).map(|(c, t)| rec(c, t)).collect();
            let before = rows.len();
            sort_attendance(&mut rows, &p);
            prop_assert_eq!(rows.len(), before);
            for pair in rows.windows(2) {
                prop_assert!(p.rank(&pair[0].category) <= p.rank(&pair[1].category));
            }
        }
    }
}
