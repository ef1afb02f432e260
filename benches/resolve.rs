use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use dirmatch::{parse_name, CasingPolicy, DirectoryRecord, IdentityResolver, InMemoryDirectory};

const NAMES: [&str; 6] = [
    "Smith, John E.",
    "John Smith",
    "john e. smith",
    "  Smith,John ",
    "Mary Ann Jones",
    "Lovelace, Ada",
];

fn make_directory() -> InMemoryDirectory {
    let given = ["John", "Jane", "Mary", "Ada", "Grace", "Alan", "Edsger", "Barbara"];
    let surnames = ["Smith", "Jones", "Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov"];

    // 8 * 7 * 16 = 896 accounts, several per name to exercise ambiguity.
    let directory = InMemoryDirectory::new();
    for g in given {
        for s in surnames {
            for n in 0..16u32 {
                let account = format!("{g}.{s}{n}").to_lowercase();
                directory.insert(DirectoryRecord::new(account, g, s)).unwrap();
            }
        }
    }
    directory
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Elements(NAMES.len() as u64));
    for casing in [CasingPolicy::None, CasingPolicy::Title] {
        group.bench_function(casing.as_str(), |b| {
            b.iter(|| {
                for raw in NAMES {
                    let _ = parse_name(raw, casing).unwrap();
                }
            });
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let directory = make_directory();
    let resolver = IdentityResolver::new();

    let mut group = c.benchmark_group("resolve");
    group.bench_function("exact", |b| {
        b.iter(|| resolver.resolve("Smith, John", &directory, None).unwrap());
    });
    group.bench_function("last_name_fallback", |b| {
        b.iter(|| resolver.resolve("Smith, Jo", &directory, None).unwrap());
    });
    group.bench_function("no_match", |b| {
        b.iter(|| resolver.resolve("Quentin Zzyzx", &directory, None).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_parse, bench_resolve);
criterion_main!(benches);
