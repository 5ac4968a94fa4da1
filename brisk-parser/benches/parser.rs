use brisk_parser::parser::parse;
use criterion::{criterion_group, criterion_main, Criterion, Throughput};

fn program(source: &str) {
    let source = source.into();
    let result = parse(&source);
    assert!(result.is_ok());
}

/// Wraps `expr` in a function body.
fn function(expr: &str) -> String {
    format!("function void main() {{ x = {}; }}", expr)
}

fn long_expr(c: &mut Criterion) {
    let mut group = c.benchmark_group("long-expr");

    let mut expr = "1".to_string();
    for _i in 0..1000 {
        expr.push_str(" + 1");
    }
    let source = function(&expr);
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("long-expr", |b| b.iter(|| program(&source)));
}

fn stress_precedence(c: &mut Criterion) {
    let mut group = c.benchmark_group("stress-precedence");

    let mut expr = "1".to_string();
    for _i in 0..200 {
        expr.push_str(" == 2 < 3 + 5 * 5 || !a && -b % 2");
    }
    let source = function(&expr);
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("stress-precedence", |b| b.iter(|| program(&source)));
}

fn many_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("many-functions");

    let mut source = String::new();
    for i in 0..500 {
        source.push_str(&format!(
            "function integer f{}(integer n, char[] s) {{
                integer total = 0;
                for (integer i = 0; i < n; i = i + 1) {{
                    if (s[i] == 'a') {{ total = total + 1; }} else {{ print(s[i]); }}
                }}
                return total;
            }}\n",
            i
        ));
    }
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("many-functions", |b| b.iter(|| program(&source)));
}

criterion_group!(benches, long_expr, stress_precedence, many_functions);
criterion_main!(benches);
