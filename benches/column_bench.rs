use std::path::Path;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use colstore::array::Selector;
use colstore::cache::{CacheMode, ReaderCache};
use colstore::conf::CacheConfig;
use colstore::io::stream::{HeapStreamProvider, StreamProvider};
use colstore::table::TableReader;
use colstore::testutil::{column_name, random_indices, write_sequence_table};
use colstore::types::{PrimitiveKind, TypeProvider};

const ROW_COUNTS: &[usize] = &[100_000, 1_000_000];
const PAGE_ROWS: &[usize] = &[1_024, 10_240, 65_536];
const GATHER_SIZES: &[usize] = &[10, 1000];

fn bench_scan(c: &mut Criterion) {
    for &num_rows in ROW_COUNTS {
        let streams = HeapStreamProvider::new();
        write_sequence_table(
            Arc::new(streams.clone()),
            Path::new("bench"),
            &[PrimitiveKind::Float32, PrimitiveKind::Int64],
            num_rows,
            65_536,
        );
        let streams: Arc<dyn StreamProvider> = Arc::new(streams);

        let mut group = c.benchmark_group(format!("scan/rows_{num_rows}"));
        group.throughput(Throughput::Elements(num_rows as u64));
        for &page_rows in PAGE_ROWS {
            for cached in [false, true] {
                let name = if cached { "cached" } else { "streaming" };
                let cache = Arc::new(ReaderCache::new(&CacheConfig::default()));
                group.bench_with_input(BenchmarkId::new(name, page_rows), &page_rows, |b, &page_rows| {
                    b.iter(|| {
                        let mut table =
                            TableReader::open(streams.clone(), cache.clone(), "bench").unwrap();
                        if cached {
                            table.cached_column_reader(0).unwrap();
                            table.cached_column_reader(1).unwrap();
                        }
                        while table.next(page_rows) > 0 {
                            black_box(table.read_column(0).unwrap());
                            black_box(table.read_column(1).unwrap());
                        }
                    })
                });
            }
        }
        group.finish();
    }
}

fn bench_gather(c: &mut Criterion) {
    let num_rows = 1_000_000;
    let streams = HeapStreamProvider::new();
    write_sequence_table(
        Arc::new(streams.clone()),
        Path::new("bench"),
        &[PrimitiveKind::Float32],
        num_rows,
        65_536,
    );
    let cache = ReaderCache::new(&CacheConfig::default());
    let column = Path::new("bench").join(column_name(PrimitiveKind::Float32));
    let reader = TypeProvider::for_kind(PrimitiveKind::Float32)
        .open_reader(&streams, &cache, &column, CacheMode::FullyCached)
        .unwrap()
        .unwrap();

    let mut group = c.benchmark_group("gather/cached");
    for &keys in GATHER_SIZES {
        let selector = Selector::gather(random_indices(keys, num_rows));
        group.throughput(Throughput::Elements(keys as u64));
        group.bench_with_input(BenchmarkId::new("keys", keys), &selector, |b, selector| {
            b.iter(|| reader.read(black_box(selector)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan, bench_gather);
criterion_main!(benches);
