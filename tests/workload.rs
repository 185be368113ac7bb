use shardbench::table::ScalableHashTable;
use shardbench::{BenchConfig, CoarseLockMap, KeyValueMap, MicroBenchmark, ShardedMap};

fn cfg(duration_secs: u64, w: usize, r: usize, e: usize) -> BenchConfig {
    BenchConfig {
        duration_secs,
        writer_threads: w,
        reader_threads: r,
        eraser_threads: e,
        prepopulate_keys: 4096,
        value_size: 1,
        ..BenchConfig::default()
    }
}

fn sharded() -> ShardedMap<u64, Vec<u8>> {
    ShardedMap::with_table(ScalableHashTable::with_capacity(1 << 16, 2.0, 256))
}

#[test]
fn zero_duration_reports_no_rates() {
    let map: CoarseLockMap<u64, Vec<u8>> = CoarseLockMap::new();
    let report = MicroBenchmark::new(&map, &cfg(0, 1, 1, 1)).run();
    assert!(report.throughput().is_none());
    assert!(report.rate_lines().is_empty());
    assert_eq!(report.render_lines(), vec!["Micro benchmarking coarse-lock map"]);
}

#[test]
fn single_reader_only_reads() {
    let map = sharded();
    let report = MicroBenchmark::new(&map, &cfg(2, 0, 1, 0)).run();
    assert_eq!(report.inserts, 0);
    assert_eq!(report.erases, 0);
    assert!(report.reads > 0);
    assert_eq!(map.len(), 4096);
    let t = report.throughput().unwrap();
    assert_eq!(t.reads_per_sec, report.reads / 2);
}

fn hammer<M: KeyValueMap<u64, Vec<u8>>>(map: &M) {
    let report = MicroBenchmark::new(map, &cfg(1, 8, 8, 2)).run();
    shardbench::tprintln!("{}: {:?}", map.name(), report);
    assert!(report.inserts > 0, "{}", map.name());
    assert!(report.reads > 0, "{}", map.name());
    assert!(report.erases > 0, "{}", map.name());
    for k in 0..4096u64 { assert!(map.lookup(&k).is_some(), "{} lost prepopulated key {}", map.name(), k); }
}

#[test]
fn writers_readers_erasers_hold_invariants_on_both_maps() {
    hammer(&CoarseLockMap::<u64, Vec<u8>>::new());
    hammer(&sharded());
}

#[test]
fn counters_start_fresh_per_map() {
    let config = cfg(1, 1, 0, 0);
    let first = MicroBenchmark::new(&CoarseLockMap::<u64, Vec<u8>>::new(), &config).run();
    let second = MicroBenchmark::new(&sharded(), &config).run();
    assert_eq!(first.reads + first.erases + second.reads + second.erases, 0);
    assert!(first.inserts > 0 && second.inserts > 0);
    assert_eq!(second.label, "sharded hash map");
}
