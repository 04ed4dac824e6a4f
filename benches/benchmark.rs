use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fmt::Write as _;

use screed::{build, open_reader, ScreedDb};

fn sample_fasta(records: usize) -> String {
    let mut out = String::new();
    for i in 0..records {
        writeln!(out, ">read_{i} sample").unwrap();
        writeln!(out, "{}", "ACGTACGTTA".repeat(10)).unwrap();
    }
    out
}

pub fn parse_and_lookup(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bench.fa");
    std::fs::write(&input, sample_fasta(1000)).unwrap();

    c.bench_function("parse 1k records", |b| {
        b.iter(|| {
            for rec in open_reader(&input).unwrap() {
                black_box(rec.unwrap());
            }
        })
    });

    let db_path = build(&input).unwrap();

    c.bench_function("open and scan database", |b| {
        b.iter(|| {
            let db = ScreedDb::open(&db_path).unwrap();
            for rec in db.iter_values() {
                black_box(rec.unwrap());
            }
        })
    });

    let db = ScreedDb::open(&db_path).unwrap();
    c.bench_function("lookup by name", |b| {
        b.iter(|| black_box(db.lookup("read_500").unwrap()))
    });
}

criterion_group!(benches, parse_and_lookup);
criterion_main!(benches);
