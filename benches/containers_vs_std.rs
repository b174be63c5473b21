//! Criterion benchmarks comparing srtlib containers with their std counterparts
//!
//! Covers ordered maps and sets against `BTreeMap`/`BTreeSet`, vectors of
//! every integer width plus a 32-byte record against `Vec`, substring search
//! on the adversarial haystacks against a naive window scan, and case
//! conversion against `str::to_uppercase`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use srtlib::search::Finder;
use srtlib::{format_into, FastVec, IntMap32, IntSet32, StrBuf, StrMap};

// =============================================================================
// BENCHMARK CONFIGURATION
// =============================================================================

const SMALL_SIZE: usize = 1_000;
const MEDIUM_SIZE: usize = 10_000;
const LARGE_SIZE: usize = 100_000;
const SIZES: &[usize] = &[SMALL_SIZE, MEDIUM_SIZE, LARGE_SIZE];

#[derive(Clone, Copy)]
struct Record32 {
    _words: [u64; 4],
}

// =============================================================================
// ORDERED MAP BENCHMARKS
// =============================================================================

fn bench_int_map_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("int_map_insert");

    for &size in SIZES {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("IntMap32", size), &size, |b, &size| {
            b.iter(|| {
                let mut map = IntMap32::new();
                for i in 0..size as i32 {
                    map.insert(black_box(i), i).unwrap();
                }
                black_box(map)
            });
        });

        group.bench_with_input(BenchmarkId::new("std::BTreeMap", size), &size, |b, &size| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for i in 0..size as i32 {
                    map.insert(black_box(i), i);
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

fn bench_int_map_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("int_map_lookup");
    let mut rng = StdRng::seed_from_u64(42);

    for &size in SIZES {
        let mut ours = IntMap32::new();
        let mut theirs = BTreeMap::new();
        for i in 0..size as i32 {
            ours.insert(i, i).unwrap();
            theirs.insert(i, i);
        }
        let mut probes: Vec<i32> = (0..size as i32).collect();
        probes.shuffle(&mut rng);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("IntMap32", size), &probes, |b, probes| {
            b.iter(|| {
                let mut sum = 0i64;
                for k in probes {
                    sum += *ours.lookup(black_box(k)).unwrap_or(&0) as i64;
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("std::BTreeMap", size), &probes, |b, probes| {
            b.iter(|| {
                let mut sum = 0i64;
                for k in probes {
                    sum += *theirs.get(black_box(k)).unwrap_or(&0) as i64;
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

fn bench_str_map_insert_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("str_map_insert_delete");
    let size = MEDIUM_SIZE;
    group.throughput(Throughput::Elements(size as u64));

    group.bench_function("StrMap", |b| {
        b.iter(|| {
            let mut map = StrMap::new();
            let mut key = StrBuf::new();
            for i in 0..size {
                format_into!(key, 32, "{:016}", i).unwrap();
                map.insert(key.clone(), key.clone()).unwrap();
            }
            for i in 0..size {
                format_into!(key, 32, "{:016}", i).unwrap();
                map.delete(key.as_bytes());
            }
            black_box(map.count())
        });
    });

    group.bench_function("std::BTreeMap<String>", |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for i in 0..size {
                let key = format!("{:016}", i);
                map.insert(key.clone(), key);
            }
            for i in 0..size {
                map.remove(&format!("{:016}", i));
            }
            black_box(map.len())
        });
    });

    group.finish();
}

fn bench_int_set_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("int_set_insert");

    for &size in SIZES {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("IntSet32", size), &size, |b, &size| {
            b.iter(|| {
                let mut set = IntSet32::new();
                for i in 0..size as i32 {
                    set.insert(black_box(i.wrapping_mul(7919))).unwrap();
                }
                black_box(set)
            });
        });

        group.bench_with_input(BenchmarkId::new("std::BTreeSet", size), &size, |b, &size| {
            b.iter(|| {
                let mut set = BTreeSet::new();
                for i in 0..size as i32 {
                    set.insert(black_box(i.wrapping_mul(7919)));
                }
                black_box(set)
            });
        });
    }

    group.finish();
}

// =============================================================================
// VECTOR BENCHMARKS
// =============================================================================

macro_rules! bench_vec_width {
    ($group:expr, $ty:ty, $name:expr, $value:expr) => {
        $group.bench_with_input(
            BenchmarkId::new(concat!("FastVec<", $name, ">"), LARGE_SIZE),
            &LARGE_SIZE,
            |b, &size| {
                b.iter(|| {
                    let mut vec: FastVec<$ty> = FastVec::new();
                    for _ in 0..size {
                        vec.push(black_box($value)).unwrap();
                    }
                    while vec.pop().is_some() {}
                    black_box(vec)
                });
            },
        );
        $group.bench_with_input(
            BenchmarkId::new(concat!("std::Vec<", $name, ">"), LARGE_SIZE),
            &LARGE_SIZE,
            |b, &size| {
                b.iter(|| {
                    let mut vec: Vec<$ty> = Vec::new();
                    for _ in 0..size {
                        vec.push(black_box($value));
                    }
                    while vec.pop().is_some() {}
                    black_box(vec)
                });
            },
        );
    };
}

fn bench_vec_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("vec_push_pop");
    group.throughput(Throughput::Elements(LARGE_SIZE as u64));

    bench_vec_width!(group, i8, "i8", 7i8);
    bench_vec_width!(group, i16, "i16", 7i16);
    bench_vec_width!(group, i32, "i32", 7i32);
    bench_vec_width!(group, i64, "i64", 7i64);
    bench_vec_width!(group, Record32, "Record32", Record32 { _words: [7; 4] });

    group.finish();
}

// =============================================================================
// SEARCH BENCHMARKS
// =============================================================================

const ALICE: &str = concat!(
    "Alice was beginning to get very tired of sitting by her sister on the",
    " bank, and of having nothing to do. Once or twice she had peeped into",
    " the book her sister was reading, but it had no pictures or conversat",
    "ions in it, \"and what is the use of a book,\" thought Alice, \"witho",
    "ut pictures or conversations?\""
);

const HARDMATCH1_LONG: &str = concat!(
    "111111x11111131111111111111111111111111111111111111111111111111111111",
    "111111111111111111111111411111111111111111111111111111111111111111111",
    "111111111111111111111111111111111111111111111111111111111111111111111",
    "12k1"
);

const HARDMATCH1_SHORT: &str = "11111111111111111112k1";

fn search_fixtures() -> Vec<(&'static str, Vec<u8>, Vec<u8>)> {
    let hard2 = format!("{}dcbadcbadcbadcba", "abcd".repeat(42));
    let run = "_".repeat(64);
    let hard3 = format!("{}1234567890", run.repeat(5));

    vec![
        ("easymatch_a", ALICE.as_bytes().to_vec(), b" a ".to_vec()),
        ("easymatch_conversations", ALICE.as_bytes().to_vec(), b"conversations?".to_vec()),
        ("hardmatch1_long_a", HARDMATCH1_LONG.as_bytes().to_vec(), b"1111111112k1".to_vec()),
        ("hardmatch1_long_b", HARDMATCH1_LONG.as_bytes().to_vec(), b"112k1".to_vec()),
        ("hardmatch1_short_a", HARDMATCH1_SHORT.as_bytes().to_vec(), b"1111111112k1".to_vec()),
        ("hardmatch1_short_b", HARDMATCH1_SHORT.as_bytes().to_vec(), b"112k1".to_vec()),
        ("hardmatch2", hard2.into_bytes(), b"dcba".to_vec()),
        ("hardmatch3", hard3.into_bytes(), format!("{}123", run).into_bytes()),
    ]
}

fn naive_find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.measurement_time(Duration::from_secs(3));

    for (name, haystack, needle) in search_fixtures() {
        group.throughput(Throughput::Bytes(haystack.len() as u64));
        let finder = Finder::new(&needle);

        group.bench_with_input(BenchmarkId::new("Finder", name), &haystack, |b, haystack| {
            b.iter(|| black_box(finder.find(black_box(haystack), 0)));
        });

        group.bench_with_input(BenchmarkId::new("naive_windows", name), &haystack, |b, haystack| {
            b.iter(|| black_box(naive_find(black_box(haystack), &needle)));
        });
    }

    group.finish();
}

// =============================================================================
// CASE CONVERSION BENCHMARKS
// =============================================================================

fn bench_case_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("case_conversion");
    let inputs = [
        ("ascii", "The quick brown fox jumps over the lazy dog. ".repeat(64)),
        ("mixed", "Hello ωμέγα ünïcödé жизнь 愛 ".repeat(64)),
    ];

    for (name, text) in inputs.iter() {
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("StrBuf::to_upper", name), text, |b, text| {
            let source = StrBuf::from_text(text).unwrap();
            b.iter(|| {
                let mut s = source.clone();
                s.to_upper().unwrap();
                black_box(s)
            });
        });

        group.bench_with_input(BenchmarkId::new("str::to_uppercase", name), text, |b, text| {
            b.iter(|| black_box(text.to_uppercase()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_int_map_insert,
    bench_int_map_lookup,
    bench_str_map_insert_delete,
    bench_int_set_insert,
    bench_vec_push_pop,
    bench_search,
    bench_case_conversion
);
criterion_main!(benches);
