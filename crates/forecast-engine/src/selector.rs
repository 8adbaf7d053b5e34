//! Ensemble member selection expressions.
//!
//! Grammar: comma-separated tokens, each a bare integer or an inclusive
//! `start-end` range; the literal `all` keeps every member. Parsing is
//! deliberately lenient: tokens that are not integers, reversed ranges and
//! labels that do not exist are ignored rather than rejected.

use std::collections::BTreeSet;

/// A parsed selection expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSelection {
    All,
    Labels(BTreeSet<u16>),
}

impl MemberSelection {
    pub fn parse(expression: &str) -> Self {
        let expression = expression.trim();
        if expression.is_empty() || expression.eq_ignore_ascii_case("all") {
            return MemberSelection::All;
        }

        let mut labels = BTreeSet::new();
        for token in expression.split(',').map(str::trim) {
            match token.split_once('-') {
                Some((start, end)) => {
                    if let (Ok(start), Ok(end)) = (start.trim().parse::<u16>(), end.trim().parse::<u16>()) {
                        labels.extend(start..=end);
                    }
                }
                None => {
                    if let Ok(label) = token.parse::<u16>() {
                        labels.insert(label);
                    }
                }
            }
        }
        MemberSelection::Labels(labels)
    }

    /// Labels of `all_labels` to drop, in ascending order.
    pub fn drop_set(&self, all_labels: &[u16]) -> BTreeSet<u16> {
        match self {
            MemberSelection::All => BTreeSet::new(),
            MemberSelection::Labels(keep) => all_labels
                .iter()
                .copied()
                .filter(|label| !keep.contains(label))
                .collect(),
        }
    }
}

/// Parse an expression and compute the drop-set in one step.
pub fn select(expression: &str, all_labels: &[u16]) -> BTreeSet<u16> {
    MemberSelection::parse(expression).drop_set(all_labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all() -> Vec<u16> {
        (1..=52).collect()
    }

    #[test]
    fn test_range_and_single() {
        let dropped = select("1-3,5", &all());
        let expected: BTreeSet<u16> = all().into_iter().filter(|l| ![1, 2, 3, 5].contains(l)).collect();
        assert_eq!(dropped, expected);
        assert_eq!(dropped.len(), 48);
    }

    #[test]
    fn test_all_keeps_everything() {
        assert!(select("all", &all()).is_empty());
        assert!(select("ALL", &all()).is_empty());
    }

    #[test]
    fn test_lenient_tokens_are_ignored() {
        let dropped = select("2, 2, 99, abc, 7-x, 10-8, 52", &all());
        assert!(!dropped.contains(&2));
        assert!(!dropped.contains(&52));
        assert!(dropped.contains(&8));
        assert!(dropped.contains(&10));
        assert_eq!(dropped.len(), 50);
    }

    #[test]
    fn test_nothing_matching_drops_everything() {
        assert_eq!(select("100-200", &all()).len(), 52);
    }
}
