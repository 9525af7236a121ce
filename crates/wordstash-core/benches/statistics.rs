use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use wordstash_core::statistics::{longest_streak, predict_milestone};

/// `days` lookup dates with a one-day gap every `gap_every` days.
fn dates(days: i64, gap_every: i64) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0..days)
        .filter(|d| d % gap_every != gap_every - 1)
        .map(|d| start + Duration::days(d))
        .collect()
}

fn bench_longest_streak(c: &mut Criterion) {
    let mut group = c.benchmark_group("longest_streak");

    for (label, days) in [("one_year", 365), ("ten_years", 3650)] {
        let mut input = dates(days, 17);
        input.reverse();
        group.bench_function(label, |b| b.iter(|| longest_streak(black_box(&input[..]))));
    }

    group.finish();
}

fn bench_milestone(c: &mut Criterion) {
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    c.bench_function("predict_milestone", |b| {
        b.iter(|| predict_milestone(black_box(5000), black_box(812), first, today))
    });
}

criterion_group!(benches, bench_longest_streak, bench_milestone);
criterion_main!(benches);
