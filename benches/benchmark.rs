//! Benchmarks for card_scheme performance testing.
//!
//! Run with: cargo bench

use card_scheme::{
    batch::{count_by_scheme, detect_all},
    dictionary::parse_response_str,
    find_matching_card_scheme, is_number_valid, luhn, parse_validation_rules,
    validate_card_range, SchemeRule, ValidationRule,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const DICTIONARY: &str = include_str!("../tests/fixtures/cards-dictionary.json");

// Test card numbers
const VISA_16: &str = "4111111111111111";
const MASTERCARD: &str = "5105105105105100";
const AMEX: &str = "378282246310005";
const UNKNOWN: &str = "1234567890123456";

const VISA_DIGITS: [u8; 16] = [4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];

fn schemes() -> Vec<SchemeRule> {
    parse_response_str(DICTIONARY).unwrap()
}

fn bench_luhn(c: &mut Criterion) {
    let mut group = c.benchmark_group("luhn");

    group.bench_function("is_number_valid", |b| {
        b.iter(|| is_number_valid(black_box(VISA_16)))
    });

    group.bench_function("validate_digits", |b| {
        b.iter(|| luhn::validate(black_box(&VISA_DIGITS)))
    });

    group.bench_function("double_then_sum", |b| {
        b.iter(|| {
            let doubled = luhn::double_every_second_digit(black_box(VISA_16)).unwrap();
            luhn::sum_digits(&doubled).unwrap()
        })
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for text in ["4", "51-55,2221-2720", "36,38,300-305,oops,9-1"] {
        group.bench_with_input(BenchmarkId::from_parameter(text), text, |b, text| {
            b.iter(|| parse_validation_rules(black_box(text)))
        });
    }

    group.bench_function("dictionary", |b| {
        b.iter(|| parse_response_str(black_box(DICTIONARY)))
    });

    group.finish();
}

fn bench_detect(c: &mut Criterion) {
    let schemes = schemes();
    let mut group = c.benchmark_group("detect");

    for (name, card) in [
        ("visa", VISA_16),
        ("mastercard", MASTERCARD),
        ("amex", AMEX),
        ("unknown", UNKNOWN),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), card, |b, card| {
            b.iter(|| find_matching_card_scheme(black_box(card), &schemes))
        });
    }

    group.finish();
}

/// Intervals are tried value by value, so cost grows with their width.
fn bench_wide_interval(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_interval");

    for width in [10u64, 1_000, 100_000] {
        let rules = [ValidationRule::Interval {
            min: 100_000,
            max: 100_000 + width,
        }];
        group.throughput(Throughput::Elements(width));
        group.bench_with_input(BenchmarkId::from_parameter(width), &rules, |b, rules| {
            b.iter(|| validate_card_range(black_box(UNKNOWN), rules))
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let schemes = schemes();
    let mut group = c.benchmark_group("batch");

    for size in [100usize, 1_000, 10_000].iter() {
        let cards: Vec<&str> = [VISA_16, MASTERCARD, AMEX, UNKNOWN]
            .iter()
            .cycle()
            .take(*size)
            .copied()
            .collect();

        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("detect_all", size), &cards, |b, cards| {
            b.iter(|| detect_all(black_box(cards.as_slice()), &schemes))
        });

        group.bench_with_input(BenchmarkId::new("count_by_scheme", size), &cards, |b, cards| {
            b.iter(|| count_by_scheme(black_box(cards.as_slice()), &schemes))
        });

        #[cfg(feature = "parallel")]
        group.bench_with_input(
            BenchmarkId::new("par_count_by_scheme", size),
            &cards,
            |b, cards| b.iter(|| card_scheme::batch::par_count_by_scheme(black_box(cards.as_slice()), &schemes)),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_luhn,
    bench_parse,
    bench_detect,
    bench_wide_interval,
    bench_batch,
);

criterion_main!(benches);
