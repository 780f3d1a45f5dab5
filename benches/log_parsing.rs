use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use std::sync::Arc;
use svnlog::svn::parser::{parse_log, SEPARATOR};
use svnlog::svn::OutputParser;
use svnlog::{FetchMode, MemorySink};

fn generate_log(num_entries: usize, verbose: bool) -> String {
    let mut output = String::from(SEPARATOR);
    output.push('\n');
    for i in (1..=num_entries).rev() {
        output.push_str(&format!(
            "r{} | dev{} | 2015-06-07 08:09:10 +0000 (Sun, 07 Jun 2015) | 2 lines\n",
            i,
            i % 7
        ));
        if verbose {
            output.push_str("Changed paths:\n");
            output.push_str(&format!("   M /trunk/src/file_{}.rs\n", i));
            output.push_str(&format!("   A /trunk/src/new_{}.rs (from /trunk/src/file_{}.rs:{})\n", i, i, i));
        }
        output.push_str(&format!("\nCommit message {}\nSecond line\n", i));
        output.push_str(SEPARATOR);
        output.push('\n');
    }
    output
}

fn bench_parse_log(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_log");

    for size in [10, 100, 1000] {
        let plain = generate_log(size, false);
        group.bench_with_input(
            BenchmarkId::new("plain", format!("{} entries", size)),
            &plain,
            |b, input| {
                b.iter(|| parse_log(black_box(input)))
            },
        );

        let verbose = generate_log(size, true);
        group.bench_with_input(
            BenchmarkId::new("verbose", format!("{} entries", size)),
            &verbose,
            |b, input| {
                b.iter(|| parse_log(black_box(input)))
            },
        );
    }

    group.finish();
}

fn bench_output_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("output_parser");
    let parser = OutputParser::new(Arc::new(MemorySink::new()));
    let lines: Vec<String> = generate_log(200, true).lines().map(String::from).collect();

    for mode in [FetchMode::Raw, FetchMode::Assoc, FetchMode::Object] {
        group.bench_with_input(BenchmarkId::new("mode", mode), &lines, |b, input| {
            b.iter(|| parser.parse(mode, black_box(input)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_log, bench_output_modes);
criterion_main!(benches);
