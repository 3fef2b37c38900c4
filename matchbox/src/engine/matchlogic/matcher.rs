use crate::engine::data::Partition;
use crate::engine::entry::Exchange;
use std::collections::HashSet;

/// Finds exchanges between one requester and any number of candidates
///
/// Built once per search from the requester's partition and shared by every
/// candidate evaluation.
#[derive(Debug, Clone)]
pub struct Matcher {
    requester: Partition,
    needed: HashSet<String>,
}

impl Matcher {
    pub fn new(requester: Partition) -> Self {
        let needed = requester.needs.iter().cloned().collect();
        Self { requester, needed }
    }

    pub fn requester(&self) -> &Partition {
        &self.requester
    }

    /// True when no candidate can ever produce an exchange
    pub fn is_idle(&self) -> bool {
        self.requester.duplicates.is_empty() || self.needed.is_empty()
    }

    /// Lists every exchange with `candidate`
    ///
    /// Walks `my duplicates x their duplicates` and records a pair whenever
    /// the candidate's duplicate is one of the requester's needs. Pairs are
    /// kept in iteration order and never deduplicated, so several of the
    /// requester's duplicates can each be paired with the same need.
    pub fn exchanges_with(&self, candidate: &Partition) -> Vec<Exchange> {
        let mut exchanges = Vec::new();

        for my_double in &self.requester.duplicates {
            for their_double in &candidate.duplicates {
                if self.needed.contains(their_double) {
                    exchanges.push(Exchange {
                        my_double: my_double.clone(),
                        their_need: their_double.clone(),
                    });
                }
            }
        }

        exchanges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(needs: &[&str], duplicates: &[&str]) -> Partition {
        Partition {
            needs: needs.iter().map(|s| s.to_string()).collect(),
            duplicates: duplicates.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_single_exchange() {
        let matcher = Matcher::new(partition(&["5"], &["3"]));
        let exchanges = matcher.exchanges_with(&partition(&["3"], &["5"]));

        assert_eq!(
            exchanges,
            vec![Exchange {
                my_double: "3".to_string(),
                their_need: "5".to_string(),
            }]
        );
    }

    #[test]
    fn test_no_overlap() {
        let matcher = Matcher::new(partition(&["5"], &["3"]));
        assert!(matcher.exchanges_with(&partition(&[], &["9"])).is_empty());
    }

    #[test]
    fn test_their_needs_are_not_required() {
        // The candidate does not need "3", the pair is still proposed.
        let matcher = Matcher::new(partition(&["5"], &["3"]));
        let exchanges = matcher.exchanges_with(&partition(&["42"], &["5"]));
        assert_eq!(exchanges.len(), 1);
    }

    #[test]
    fn test_nested_loop_multiplicity() {
        // Two stickers both numbered "3" are recorded as duplicates.
        let matcher = Matcher::new(partition(&["7"], &["3", "3"]));
        let exchanges = matcher.exchanges_with(&partition(&["3"], &["7"]));

        assert_eq!(exchanges.len(), 2);
        assert!(exchanges
            .iter()
            .all(|e| e.my_double == "3" && e.their_need == "7"));
    }

    #[test]
    fn test_iteration_order() {
        let matcher = Matcher::new(partition(&["5", "6"], &["1", "2"]));
        let exchanges = matcher.exchanges_with(&partition(&[], &["6", "5", "8"]));
        let pairs: Vec<(&str, &str)> = exchanges
            .iter()
            .map(|e| (e.my_double.as_str(), e.their_need.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![("1", "6"), ("1", "5"), ("2", "6"), ("2", "5")]
        );
    }

    #[test]
    fn test_exchange_validity() {
        let me = partition(&["5", "6", "7"], &["1", "2"]);
        let them = partition(&["1"], &["6", "9", "7"]);
        let matcher = Matcher::new(me.clone());

        for exchange in matcher.exchanges_with(&them) {
            assert!(me.duplicates.contains(&exchange.my_double));
            assert!(them.duplicates.contains(&exchange.their_need));
            assert!(me.needs.contains(&exchange.their_need));
        }
    }

    #[test]
    fn test_idle_without_duplicates_or_needs() {
        assert!(Matcher::new(partition(&["5"], &[])).is_idle());
        assert!(Matcher::new(partition(&[], &["3"])).is_idle());
        assert!(!Matcher::new(partition(&["5"], &["3"])).is_idle());
    }
}
