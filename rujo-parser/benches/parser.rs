use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rujo_parser::parser::parse_program;

fn program(source: &str) {
    let source = source.into();
    let _ast = parse_program(&source).unwrap();
    assert!(source.has_no_errors());
}

fn long_expr(c: &mut Criterion) {
    let mut group = c.benchmark_group("long-expr");

    let mut source = "1".to_string();
    for _i in 0..1000 {
        source.push_str(" + 1");
    }
    source.push(';');
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("long-expr", |b| b.iter(|| program(&source)));
}

fn stress_precedence(c: &mut Criterion) {
    let mut group = c.benchmark_group("stress-precedence");

    let mut source = "1".to_string();
    for _i in 0..200 {
        source.push_str(" == 2 < 3 + 5 * 5");
    }
    source.push(';');
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("stress-precedence", |b| b.iter(|| program(&source)));
}

fn many_statements(c: &mut Criterion) {
    let mut group = c.benchmark_group("many-statements");

    let mut source = "class Counter { prop int n; fn bump(): void { n = n + 1; } }\n".to_string();
    for i in 0..500 {
        source.push_str(&format!(
            "int v{i} = {i}; if (v{i} > 2) {{ print(v{i}); }} else {{ v{i} = v{i} * 2; }}\n",
            i = i
        ));
    }
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("many-statements", |b| b.iter(|| program(&source)));
}

criterion_group!(benches, long_expr, stress_precedence, many_statements);
criterion_main!(benches);
