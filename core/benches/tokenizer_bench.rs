use criterion::{criterion_group, criterion_main, Criterion};
use moviesearch_core::tokenizer::tokenize_all;

fn bench_tokenize(c: &mut Criterion) {
    let strings: Vec<String> = (0..1000)
        .map(|i| format!("movie number {i} directed by director {i} starring actor {i}"))
        .collect();
    c.bench_function("tokenize_1k_records", |b| {
        b.iter(|| tokenize_all(strings.iter().map(|s| s.as_str())))
    });
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
