//! Parser benchmarks.
//!
//! Run with: `cargo bench --package cpc-par`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use cpc_lex::Lexer;
use cpc_par::Parser;
use cpc_util::Handler;

fn parse_source(source: &str) -> cpc_ast::Program {
    let mut handler = Handler::new();
    let tokens: Vec<_> = Lexer::new(source, &mut handler).collect();
    let mut parser = Parser::new(tokens, &mut handler);
    parser.parse()
}

fn bench_parser_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_simple");

    let source = "x := 42\n";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("assignment", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_procs(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_procs");

    let source = concat!(
        "PROC increment (INT n, INT result)\n",
        "  result := n + 1\n",
        ":\n",
        "FUNCTION INT fib (INT n)\n",
        "  INT result:\n",
        "  VALOF\n",
        "    IF\n",
        "      n <= 1\n",
        "        result := n\n",
        "      TRUE\n",
        "        result := fib(n - 1) + fib(n - 2)\n",
        "  RESULT result\n",
    );

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("proc_and_function", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_declarations(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_declarations");

    let source = concat!(
        "PROC main ()\n",
        "  INT a, b, c:\n",
        "  [10]INT buf:\n",
        "  CHAN OF INT link:\n",
        "  TIMER tim:\n",
        "  VAL INT limit IS 100:\n",
        "  RECORD point:\n",
        "    INT x:\n",
        "    INT y:\n",
        "  PROTOCOL reading IS INT; INT:\n",
        "  SKIP\n",
        ":\n",
    );

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("mixed_declarations", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_control_flow");

    let source = concat!(
        "PROC classify (INT n, INT result)\n",
        "  IF\n",
        "    n < 0\n",
        "      result := -1\n",
        "    n = 0\n",
        "      result := 0\n",
        "    TRUE\n",
        "      CASE n\n",
        "        1\n",
        "          result := 1\n",
        "        2\n",
        "          result := 2\n",
        "        ELSE\n",
        "          SEQ\n",
        "            INT sum, i:\n",
        "            sum := 0\n",
        "            i := 0\n",
        "            WHILE i < n\n",
        "              SEQ\n",
        "                sum := sum + i\n",
        "                i := i + 1\n",
        "            result := sum\n",
        ":\n",
    );

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("if_case_while", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_concurrency(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_concurrency");

    let source = concat!(
        "PROC producer_consumer ()\n",
        "  CHAN OF INT link:\n",
        "  TIMER clock:\n",
        "  PAR\n",
        "    SEQ i = 0 FOR 100\n",
        "      link ! i\n",
        "    INT v:\n",
        "    WHILE TRUE\n",
        "      ALT\n",
        "        link ? v\n",
        "          SKIP\n",
        "        INT deadline:\n",
        "        clock ? AFTER deadline\n",
        "          STOP\n",
        ":\n",
    );

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("par_alt_timer", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_simple,
    bench_parser_procs,
    bench_parser_declarations,
    bench_parser_control_flow,
    bench_parser_concurrency,
);
criterion_main!(benches);
