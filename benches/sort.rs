use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use regsense::alerts::{Alert, SortKey};
use regsense::dashboard::SortEngine;

const ALERT_COUNT: usize = 200;
const SEVERITIES: [&str; 5] = ["Critical", "High", "Medium", "Low", ""];

fn seed_alerts() -> Vec<Alert> {
    (0..ALERT_COUNT)
        .map(|i| Alert {
            id: i as i64,
            title: format!("Notice {i}"),
            published_date: if i % 3 == 0 {
                format!("Mon, {:02} Jan 2024 10:00:00 GMT", i % 28 + 1)
            } else {
                format!("2024-02-{:02}T08:30:00Z", i % 28 + 1)
            },
            severity: SEVERITIES[i % SEVERITIES.len()].to_string(),
            effective_date: format!("2024-{:02}-01", i % 12 + 1),
            analysed: i % 5 != 4,
            ..Alert::default()
        })
        .collect()
}

fn bench_sort_keys(c: &mut Criterion) {
    let alerts = seed_alerts();
    let engine = SortEngine::default();
    for key in SortKey::ALL {
        c.bench_with_input(
            BenchmarkId::new("sort_alerts", format!("{key:?}")),
            &alerts,
            |b, alerts| b.iter(|| black_box(engine.sort(black_box(alerts), key).len())),
        );
    }
}

criterion_group!(benches, bench_sort_keys);
criterion_main!(benches);
