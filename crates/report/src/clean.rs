// Junk-row filtering: restated headers, section labels, blank separators.

use std::collections::HashSet;

use crate::config::{Layout, TeamLayout};
use crate::grid::is_blank;
use crate::model::ExtractedRow;

#[derive(Debug, Clone, Default)]
pub struct DenyList {
    exact: HashSet<String>,
    contains: Vec<String>,
}

impl DenyList {
    pub fn new<I, J>(exact: I, contains: J) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        J: IntoIterator,
        J::Item: AsRef<str>,
    {
        Self {
            exact: exact.into_iter().map(|s| s.as_ref().trim().to_string()).collect(),
            contains: contains
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Layout-wide entries, the team's own entries, and every anchor and stop
    /// anchor of the team.
    pub fn for_team(layout: &Layout, team: &TeamLayout) -> Self {
        let exact = layout
            .filter
            .deny_exact
            .iter()
            .map(String::as_str)
            .chain(team.deny_exact.iter().map(String::as_str))
            .chain(team.section_anchors())
            .chain(team.stop_anchors.iter().map(String::as_str));
        let contains = layout
            .filter
            .deny_contains
            .iter()
            .chain(team.deny_contains.iter());
        Self::new(exact, contains)
    }

    pub fn is_junk(&self, text: &str) -> bool {
        let text = text.trim();
        is_blank(text) || self.exact.contains(text) || self.contains.iter().any(|c| text.contains(c.as_str()))
    }
}

/// Forward-fill blank `fields` from the last non-junk value above. A junk
/// value (restated header) resets the carry.
pub fn fill_down(rows: &mut [ExtractedRow], fields: &[String], deny: &DenyList) {
    for field in fields {
        let mut carry: Option<String> = None;
        for row in rows.iter_mut() {
            let Some(value) = row.fields.get_mut(field) else {
                break;
            };
            if is_blank(value) {
                if let Some(ref c) = carry {
                    *value = c.clone();
                }
            } else if deny.is_junk(value) {
                carry = None;
            } else {
                carry = Some(value.clone());
            }
        }
    }
}

/// Keep rows whose key cell is not junk and that carry any data at all.
pub fn clean_rows(rows: Vec<ExtractedRow>, key: &str, deny: &DenyList) -> Vec<ExtractedRow> {
    rows.into_iter()
        .filter(|row| !row.is_blank() && !deny.is_junk(row.get(key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(pairs: &[(&str, &str)]) -> ExtractedRow {
        ExtractedRow {
            source_row: 1,
            fields: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            headcount: Vec::new(),
        }
    }

    fn deny() -> DenyList {
        DenyList::new(["구분", "거래처", "nan", "[금일 작업]"], ["합계"])
    }

    #[test]
    fn junk_detection() {
        let d = deny();
        assert!(d.is_junk(""));
        assert!(d.is_junk("   "));
        assert!(d.is_junk(" 거래처 "));
        assert!(d.is_junk("nan"));
        assert!(d.is_junk("소계/합계"));
        assert!(!d.is_junk("거래처A"));
        assert!(!d.is_junk("NAN"));
    }

    #[test]
    fn restated_headers_and_blanks_dropped() {
        let rows = vec![
            row(&[("counterparty", "거래처"), ("description", "작업 내용")]),
            row(&[("counterparty", "A사"), ("description", "양하")]),
            row(&[("counterparty", ""), ("description", "")]),
            row(&[("counterparty", "nan"), ("description", "x")]),
            row(&[("counterparty", "B사"), ("description", "")]),
        ];
        let kept = clean_rows(rows, "counterparty", &deny());
        let keys: Vec<_> = kept.iter().map(|r| r.get("counterparty")).collect();
        assert_eq!(keys, vec!["A사", "B사"]);
    }

    #[test]
    fn fill_down_carries_category() {
        let mut rows = vec![
            row(&[("category", "구분")]),
            row(&[("category", "")]),
            row(&[("category", "작업")]),
            row(&[("category", "")]),
            row(&[("category", "휴가")]),
            row(&[("category", "")]),
        ];
        fill_down(&mut rows, &["category".to_string()], &deny());
        let cats: Vec<_> = rows.iter().map(|r| r.get("category")).collect();
        assert_eq!(cats, vec!["구분", "", "작업", "작업", "휴가", "휴가"]);
    }

    #[test]
    fn team_list_includes_anchors() {
        let layout = crate::config::Layout::from_toml(
            r#"
name = "t"
[filter]
deny_exact = ["구분"]
[[teams]]
id = "a"
name = "A"
stop_anchors = ["특이사항"]
deny_contains = ["계"]
[teams.work]
anchors = ["[금일 작업]"]
[teams.work.columns]
counterparty = 0
"#,
        )
        .unwrap();
        let d = DenyList::for_team(&layout, &layout.teams[0]);
        assert!(d.is_junk("[금일 작업]"));
        assert!(d.is_junk("특이사항"));
        assert!(d.is_junk("구분"));
        assert!(d.is_junk("합계"));
        assert!(!d.is_junk("거래처"));
    }

    proptest! {
        /// No surviving row has a key equal to a denylisted literal.
        #[test]
        fn denylisted_keys_never_survive(
            keys in proptest::collection::vec(
                prop_oneof![
                    Just("구분".to_string()),
                    Just("거래처".to_string()),
                    Just("nan".to_string()),
                    Just(String::new()),
                    "[가-힣A-Za-z0-9 ]{0,6}",
                ],
                0..40,
            )
        ) {
            let d = deny();
            let rows: Vec<_> = keys.iter().map(|k| row(&[("counterparty", k.as_str()), ("remark", "x")])).collect();
            let kept = clean_rows(rows, "counterparty", &d);
            for r in &kept {
                let key = r.get("counterparty").trim();
                prop_assert!(!["구분", "거래처", "nan", "[금일 작업]"].contains(&key));
            }
            let expected = keys.iter().filter(|k| !d.is_junk(k)).count();
            prop_assert_eq!(kept.len(), expected);
        }
    }
}
