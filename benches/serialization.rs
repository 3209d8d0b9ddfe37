use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use typed_toml::project::ProjectParser;
use typed_toml::{dumps, from_str, loads, to_string, Table, TomlDecoder, TomlEncoder, Value};

const PYPROJECT: &str = r#"[build-system]
requires = ["whey"]
build-backend = "whey"

[project]
name = "greppy"
version = "0.0.0"
description = "Recursively grep over Python files in the files in the given directory 🔎"
readme = "README.rst"
keywords = ["grep", "search", "python"]
dependencies = ["click>=7.1.2", "consolekit>=0.4.0", "domdf-python-tools>=2.5.1"]
classifiers = [
    "Development Status :: 4 - Beta",
    "Programming Language :: Python :: 3 :: Only",
    "Operating System :: OS Independent",
]

[[project.authors]]
email = "dominic@davis-foster.co.uk"
name = "Dominic Davis-Foster"

[project.urls]
Homepage = "https://github.com/domdfcoding/greppy"
"Issue Tracker" = "https://github.com/domdfcoding/greppy/issues"

[project.scripts]
greppy = "greppy.__main__:main"

[project.entry-points."spam.magical"]
tomatoes = "spam:main_tomatoes"
"#;

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
struct Dependency {
    name: String,
    version: String,
    optional: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Lockfile {
    dependencies: Vec<Dependency>,
}

fn lockfile(size: u32) -> Lockfile {
    Lockfile {
        dependencies: (0..size)
            .map(|i| Dependency {
                name: format!("package-{}", i),
                version: format!("1.{}.0", i),
                optional: i % 3 == 0,
            })
            .collect(),
    }
}

fn benchmark_loads(c: &mut Criterion) {
    let mut group = c.benchmark_group("loads");

    group.bench_function("marking_inline", |b| {
        let decoder = TomlDecoder::new();
        b.iter(|| loads(black_box(PYPROJECT), &decoder))
    });

    group.bench_function("pure", |b| {
        let decoder = TomlDecoder::pure();
        b.iter(|| loads(black_box(PYPROJECT), &decoder))
    });

    group.finish();
}

fn benchmark_dumps(c: &mut Criterion) {
    let doc = loads(PYPROJECT, &TomlDecoder::new()).unwrap();
    let mut group = c.benchmark_group("dumps");

    group.bench_function("default_encoder", |b| {
        let encoder = TomlEncoder::new();
        b.iter(|| dumps(black_box(&doc), &encoder))
    });

    group.bench_function("preserving_inline", |b| {
        let encoder = TomlEncoder::new().preserve_inline(true);
        b.iter(|| dumps(black_box(&doc), &encoder))
    });

    group.finish();
}

fn benchmark_wide_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_document");

    for size in [10, 100, 1000].iter() {
        let doc: Table = (0..*size)
            .map(|i| (format!("key {}", i), Value::from(vec![i, i + 1, i + 2])))
            .collect();
        let text = dumps(&doc, &TomlEncoder::new()).unwrap();

        group.bench_with_input(BenchmarkId::new("dumps", size), &doc, |b, doc| {
            b.iter(|| dumps(black_box(doc), &TomlEncoder::new()))
        });
        group.bench_with_input(BenchmarkId::new("loads", size), &text, |b, text| {
            b.iter(|| loads(black_box(text), &TomlDecoder::new()))
        });
    }
    group.finish();
}

fn benchmark_project_parser(c: &mut Criterion) {
    let doc = loads(PYPROJECT, &TomlDecoder::new()).unwrap();
    let parser = ProjectParser::new();

    c.bench_function("project_parser", |b| {
        b.iter(|| parser.parse_document(black_box(&doc)))
    });
}

fn benchmark_serde(c: &mut Criterion) {
    let mut group = c.benchmark_group("serde_array_of_tables");

    for size in [10, 100, 500].iter() {
        let data = lockfile(*size);
        let text = to_string(&data, &TomlEncoder::new()).unwrap();

        group.bench_with_input(BenchmarkId::new("to_string", size), &data, |b, data| {
            b.iter(|| to_string(black_box(data), &TomlEncoder::new()))
        });
        group.bench_with_input(BenchmarkId::new("from_str", size), &text, |b, text| {
            b.iter(|| from_str::<Lockfile>(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let data = lockfile(100);
    let mut group = c.benchmark_group("comparison");

    group.bench_function("toml_serialize", |b| {
        b.iter(|| to_string(black_box(&data), &TomlEncoder::new()))
    });

    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(&data)))
    });

    let toml_str = to_string(&data, &TomlEncoder::new()).unwrap();
    let json_str = serde_json::to_string(&data).unwrap();

    group.bench_function("toml_deserialize", |b| {
        b.iter(|| from_str::<Lockfile>(black_box(&toml_str)))
    });

    group.bench_function("json_deserialize", |b| {
        b.iter(|| serde_json::from_str::<Lockfile>(black_box(&json_str)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_loads,
    benchmark_dumps,
    benchmark_wide_document,
    benchmark_project_parser,
    benchmark_serde,
    benchmark_comparison_with_json
);
criterion_main!(benches);
