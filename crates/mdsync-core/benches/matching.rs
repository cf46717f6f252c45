use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mdsync_core::UrlFilter;

const URLS: [&str; 5] = [
    "https://i.imgur.com/AbC9.png",
    "https://i.stack.imgur.com/aBc8.png",
    "https://test1.imgur.com/101.png",
    "https://test2.imgur.com/test/102.png",
    "http://localhost/100.png",
];

fn bench_evaluate(c: &mut Criterion) {
    let prefix_only = UrlFilter::new([
        "https://i.imgur.com/",
        "https://i.stack.imgur.com/",
        "!http://localhost/",
    ]);
    let mixed = UrlFilter::new([
        "https://i.imgur.com/",
        "!https://i.imgur.com/test/",
        "!r=https://(test2|test3)\\.imgur\\.com/test/.+",
        "r=https://(test2|test3)\\.imgur\\.com/.+",
    ]);

    c.bench_function("filter_prefix_rules", |b| {
        b.iter(|| prefix_only.filter(black_box(URLS)).map(|urls| urls.len()))
    });
    c.bench_function("filter_mixed_rules", |b| {
        b.iter(|| mixed.filter(black_box(URLS)).map(|urls| urls.len()))
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
