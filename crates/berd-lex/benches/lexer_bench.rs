//! Lexer throughput benchmark.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use berd_lex::tokenize;

/// A representative program exercising most token classes.
fn sample_program() -> String {
    let unit = r#"
var var score<5> = 0!
const const greeting = "hello there"!
when score > 2 { print "big"! }
score = score + 1!
score****!
if maybe { print "t"! } idk { print "i"! } else { print "e"! }
var var clipped = score ▷ [0..10]!
print history(score)?
"#;
    unit.repeat(64)
}

fn bench_tokenize(c: &mut Criterion) {
    let source = sample_program();
    c.bench_function("tokenize_sample", |b| {
        b.iter(|| tokenize(black_box(&source)).unwrap())
    });
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
