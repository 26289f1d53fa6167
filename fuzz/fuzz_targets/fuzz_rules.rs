//! Fuzz target for the rule parser and evaluator.

#![no_main]

use arbitrary::Arbitrary;
use card_scheme::rule::parse_validation_rules_with;
use card_scheme::{find_matching_card_scheme, SchemeRule, ValidationRule};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    lengths: &'a str,
    ranges: &'a str,
    card: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let mut dropped = 0usize;
    let rules = parse_validation_rules_with(input.ranges, |_| dropped += 1);
    assert_eq!(rules.len() + dropped, input.ranges.split(',').count());

    // Wide intervals are tried value by value; keep the evaluator step bounded.
    let bounded = rules.iter().all(|r| match *r {
        ValidationRule::Digits(_) => true,
        ValidationRule::Interval { min, max } => max - min <= 100_000,
    });
    if !bounded {
        return;
    }

    let schemes = [SchemeRule::new("fuzz", "Fuzz")
        .lengths(input.lengths)
        .ranges(input.ranges)];
    if let Some(found) = find_matching_card_scheme(input.card, &schemes) {
        assert!(!input.card.is_empty());
        assert_eq!(found.id, "fuzz");
    }
});
