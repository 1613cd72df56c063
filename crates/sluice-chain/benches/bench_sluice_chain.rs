use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use serde_json::json;
use sluice_chain::FilterChain;
use sluice_core::{Callback, Options};

fn random_chain(size: usize) -> FilterChain {
    let mut rng = rand::thread_rng();
    let mut chain = FilterChain::new();
    for _ in 0..size {
        chain.attach(Callback::new(Ok), rng.gen_range(0..2000));
    }
    chain
}

fn bench_attach(c: &mut Criterion) {
    c.bench_function("attach_1000_random_priorities", |b| {
        b.iter(|| black_box(random_chain(1000)))
    });
}

fn bench_apply(c: &mut Criterion) {
    let chain = random_chain(100);
    c.bench_function("apply_100_callbacks", |b| {
        b.iter(|| black_box(chain.filter(black_box(json!("value")))))
    });

    let mut named = FilterChain::new();
    for (i, name) in ["StripTags", "StringTrim", "CamelCaseToUnderscore", "StringToLower"].iter().enumerate() {
        named.attach_by_name(name, Options::new(), 100 - i as i32).unwrap();
    }
    let text = json!("  <p>SomeCamelCaseText</p>  ".repeat(50));
    c.bench_function("apply_named_text_chain", |b| {
        b.iter(|| black_box(named.filter(black_box(text.clone()))))
    });
}

fn bench_merge_clone(c: &mut Criterion) {
    let a = random_chain(500);
    let b_chain = random_chain(500);
    c.bench_function("merge_500_into_500", |b| {
        b.iter(|| {
            let mut merged = a.clone();
            merged.merge(&b_chain);
            black_box(merged.count())
        })
    });
}

criterion_group!(benches, bench_attach, bench_apply, bench_merge_clone);
criterion_main!(benches);
