use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use covid_dashboard::model::{group_by_country, RawRecord};
use covid_dashboard::view::{build_series, filter, filter_period, DateRange, FilterState, Metric};

const COUNTRIES: usize = 200;
const DAYS: i64 = 350;

fn feed() -> Vec<RawRecord> {
    let first = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();

    (0..COUNTRIES)
        .flat_map(|country| {
            (0..DAYS).rev().map(move |offset| {
                let date = (first + Duration::days(offset)).format("%d/%m/%Y").to_string();
                let cases = (country as i64 * 7 + offset) % 900;
                RawRecord::new(&format!("Country {country}"), &date, cases, cases / 40)
            })
        })
        .collect()
}

fn transform(c: &mut Criterion) {
    let raw = feed();
    let groups = group_by_country(raw.clone()).groups;
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2020, 9, 30).unwrap(),
    );
    let filters = FilterState {
        metric: Some(Metric::CasesOn1000),
        min_value: Some(10.0),
        max_value: None,
        country_searched: "country 1".to_string(),
    };

    c.bench_function("group_by_country", |b| {
        b.iter(|| group_by_country(black_box(raw.clone())))
    });

    c.bench_function("filter", |b| {
        b.iter(|| filter(black_box(&groups), range, black_box(&filters)))
    });

    c.bench_function("build_series", |b| {
        let period = filter_period(&groups, range);
        b.iter(|| build_series(black_box(&period), None))
    });
}

criterion_group!(benches, transform);
criterion_main!(benches);
