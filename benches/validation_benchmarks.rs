use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gcodegen::i18n::MessageCatalog;
use gcodegen::validation::{ValidationOptions, scan_program, validate_program};
use std::hint::black_box;

/// Generate program text with specific validation scenarios
fn generate_program(lines: usize, scenario: &str) -> String {
    let mut content = String::from("%\nN10 G17 G21 G90\nN20 G54\nN30 M3 S10000\nN40 M8\nN50 G0 Z5\n");

    for i in 0..lines {
        let n = (i + 6) * 10;
        let line = match scenario {
            "clean" => format!(
                "N{n} G1 X{:.3} Y{:.3} F800",
                (i as f32) * 0.1,
                (i as f32) * 0.2
            ),
            "faulty" => match i % 4 {
                0 => format!("N{n} G99 X{i}"),
                1 => format!("N{n} G0 X{i} Z-1 F300"),
                2 => format!("N{n} G2 X{i} Y1"),
                _ => format!("N{n} G1 Z-2000 F100 F200"),
            },
            "comment_heavy" => match i % 2 {
                0 => format!("N{n} (PASS {} Z-{:.3})", i / 2, (i as f32) * 0.5),
                _ => format!("N{n} G1 X{:.1} ; segment {i}", (i as f32) * 0.1),
            },
            _ => unreachable!(),
        };
        content.push_str(&line);
        content.push('\n');
    }

    content.push_str("G0 Z5\nM9\nM5\nM30\n%\n");
    content
}

fn bench_scan_scenarios(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_program");
    let options = ValidationOptions::default();

    for scenario in ["clean", "faulty", "comment_heavy"] {
        for size in [100, 1_000, 10_000] {
            let program = generate_program(size, scenario);
            group.throughput(Throughput::Bytes(program.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(scenario, size),
                &program,
                |b, program| b.iter(|| scan_program(black_box(program), &options)),
            );
        }
    }

    group.finish();
}

fn bench_rendered_messages(c: &mut Criterion) {
    let catalog = MessageCatalog::builtin();
    let options = ValidationOptions::default();
    let program = generate_program(5_000, "faulty");

    c.bench_function("validate_program_faulty_5000", |b| {
        b.iter(|| validate_program(black_box(&program), &catalog, "en", &options))
    });
}

criterion_group!(benches, bench_scan_scenarios, bench_rendered_messages);
criterion_main!(benches);
