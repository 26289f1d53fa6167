//! Batch scheme detection.
//!
//! Detection is stateless, so a batch is simply the per-card detection run
//! over a slice. With the `parallel` feature the `par_` variants spread the
//! work across rayon's thread pool and return the same results in the same
//! order.

use std::collections::BTreeMap;

use crate::detect::find_matching_card_scheme;
use crate::scheme::SchemeRule;

/// Detects the scheme of each card, preserving input order.
///
/// # Example
///
/// ```
/// use card_scheme::batch::detect_all;
/// use card_scheme::SchemeRule;
///
/// let schemes = vec![SchemeRule::new("visa", "Visa").lengths("16").ranges("4")];
/// let cards = ["4111111111111111", "5500000000000004"];
/// let results = detect_all(&cards, &schemes);
/// assert_eq!(results[0].map(|s| s.id.as_str()), Some("visa"));
/// assert!(results[1].is_none());
/// ```
pub fn detect_all<'a, S: AsRef<str>>(
    cards: &[S],
    schemes: &'a [SchemeRule],
) -> Vec<Option<&'a SchemeRule>> {
    cards
        .iter()
        .map(|c| find_matching_card_scheme(c.as_ref(), schemes))
        .collect()
}

/// Counts cards per detected scheme id. Unmatched cards are counted under
/// `None`.
///
/// ```
/// use card_scheme::batch::count_by_scheme;
/// use card_scheme::SchemeRule;
///
/// let schemes = vec![SchemeRule::new("visa", "Visa").lengths("16").ranges("4")];
/// let counts = count_by_scheme(&["4111111111111111", "4012888888881881", "1"], &schemes);
/// assert_eq!(counts[&Some("visa".to_string())], 2);
/// assert_eq!(counts[&None], 1);
/// ```
pub fn count_by_scheme<S: AsRef<str>>(
    cards: &[S],
    schemes: &[SchemeRule],
) -> BTreeMap<Option<String>, usize> {
    let mut counts = BTreeMap::new();
    for card in cards {
        let id = find_matching_card_scheme(card.as_ref(), schemes).map(|s| s.id.clone());
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

/// Parallel version of [`detect_all`].
///
/// # Feature
///
/// Requires the `parallel` feature to be enabled.
#[cfg(feature = "parallel")]
pub fn par_detect_all<'a, S: AsRef<str> + Sync>(
    cards: &[S],
    schemes: &'a [SchemeRule],
) -> Vec<Option<&'a SchemeRule>> {
    use rayon::prelude::*;
    cards
        .par_iter()
        .map(|c| find_matching_card_scheme(c.as_ref(), schemes))
        .collect()
}

/// Parallel version of [`count_by_scheme`].
///
/// # Feature
///
/// Requires the `parallel` feature to be enabled.
#[cfg(feature = "parallel")]
pub fn par_count_by_scheme<S: AsRef<str> + Sync>(
    cards: &[S],
    schemes: &[SchemeRule],
) -> BTreeMap<Option<String>, usize> {
    use rayon::prelude::*;
    cards
        .par_iter()
        .map(|c| find_matching_card_scheme(c.as_ref(), schemes).map(|s| s.id.clone()))
        .fold(BTreeMap::new, |mut counts, id| {
            *counts.entry(id).or_insert(0) += 1;
            counts
        })
        .reduce(BTreeMap::new, |mut left, right| {
            for (id, n) in right {
                *left.entry(id).or_insert(0) += n;
            }
            left
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VISA: &str = "4111111111111111";
    const MASTER: &str = "5105105105105100";
    const UNKNOWN: &str = "1234567890123456";

    fn schemes() -> Vec<SchemeRule> {
        vec![
            SchemeRule::new("visa", "Visa").lengths("16").ranges("4"),
            SchemeRule::new("master", "Mastercard").lengths("16").ranges("51-55"),
        ]
    }

    #[test]
    fn test_detect_all_preserves_order() {
        let schemes = schemes();
        let results = detect_all(&[MASTER, UNKNOWN, VISA], &schemes);
        let ids: Vec<_> = results.iter().map(|r| r.map(|s| s.id.as_str())).collect();
        assert_eq!(ids, vec![Some("master"), None, Some("visa")]);
    }

    #[test]
    fn test_count_by_scheme() {
        let schemes = schemes();
        let counts = count_by_scheme(&[VISA, VISA, MASTER, UNKNOWN, ""], &schemes);
        assert_eq!(counts.get(&Some("visa".to_string())), Some(&2));
        assert_eq!(counts.get(&Some("master".to_string())), Some(&1));
        assert_eq!(counts.get(&None), Some(&2));
    }

    #[test]
    fn test_empty_batch() {
        let cards: Vec<String> = Vec::new();
        assert!(detect_all(&cards, &schemes()).is_empty());
        assert!(count_by_scheme(&cards, &schemes()).is_empty());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let schemes = schemes();
        let cards: Vec<String> = (0..1000)
            .map(|i| match i % 3 {
                0 => VISA.to_string(),
                1 => MASTER.to_string(),
                _ => UNKNOWN.to_string(),
            })
            .collect();

        assert_eq!(par_detect_all(&cards, &schemes), detect_all(&cards, &schemes));
        assert_eq!(
            par_count_by_scheme(&cards, &schemes),
            count_by_scheme(&cards, &schemes)
        );
    }
}
