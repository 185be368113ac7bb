//!
//! Workload driver
//! ---------------
//! `MicroBenchmark` prepopulates a map single-threaded, then runs three kinds of
//! worker threads against it for a fixed wall-clock window:
//!
//! - writers insert random keys drawn from `[N, N + RAND_MAX]`
//! - readers look up random keys in `[0, N)`, every one of which must hit
//! - erasers remove random keys from `[N, N + RAND_MAX]`, hit or miss
//!
//! Readers and writers work disjoint key ranges, so an erase can never race a read
//! of a key the reader is entitled to find. Each thread times itself from its own
//! start instant; there is no shared start barrier. Counters are per-driver atomics
//! read only after every worker has been joined.
//!

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::BenchConfig;
use crate::map::KeyValueMap;
use crate::report::BenchReport;

/// Largest value the key source yields (`2^31 - 1`).
pub const RAND_MAX: u64 = i32::MAX as u64;

// One generator for the whole process, shared by every worker thread.
static KEY_SOURCE: Lazy<Mutex<StdRng>> = Lazy::new(|| Mutex::new(StdRng::from_entropy()));

/// Next pseudo-random value in `[0, RAND_MAX]`.
pub fn random() -> u64 { KEY_SOURCE.lock().gen_range(0..=RAND_MAX) }

#[derive(Debug, Default)]
pub struct Counters {
    inserts: AtomicU64,
    reads: AtomicU64,
    erases: AtomicU64,
}

impl Counters {
    /// (inserts, reads, erases)
    pub fn snapshot(&self) -> (u64, u64, u64) {
        (
            self.inserts.load(Ordering::Relaxed),
            self.reads.load(Ordering::Relaxed),
            self.erases.load(Ordering::Relaxed),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Write,
    Read,
    Erase,
}

impl Role {
    fn as_str(self) -> &'static str {
        match self {
            Role::Write => "write",
            Role::Read => "read",
            Role::Erase => "erase",
        }
    }
}

pub struct MicroBenchmark<'m, M: ?Sized> {
    map: &'m M,
    duration_secs: u64,
    writer_threads: usize,
    reader_threads: usize,
    eraser_threads: usize,
    max_key: u64,
    value: Vec<u8>,
    counters: Counters,
}

impl<'m, M> MicroBenchmark<'m, M>
where
    M: KeyValueMap<u64, Vec<u8>> + ?Sized,
{
    pub fn new(map: &'m M, cfg: &BenchConfig) -> Self {
        Self {
            map,
            duration_secs: cfg.duration_secs,
            writer_threads: cfg.writer_threads,
            reader_threads: cfg.reader_threads,
            eraser_threads: cfg.eraser_threads,
            max_key: cfg.prepopulate_keys,
            value: vec![b'a'; cfg.value_size],
            counters: Counters::default(),
        }
    }

    pub fn counters(&self) -> &Counters { &self.counters }

    /// Insert every key in `[0, N)`. A rejected insert means the map is broken.
    pub fn prepopulate(&self) {
        let started = Instant::now();
        for k in 0..self.max_key {
            let ok = self.map.insert(k, self.value.clone());
            assert!(ok, "prepopulation insert of key {} rejected by {}", k, self.map.name());
        }
        info!(target: "shardbench::workload", "prepopulated {} keys into {} in {:?}", self.max_key, self.map.name(), started.elapsed());
    }

    /// Prepopulate, run all worker threads to completion and collect the counters.
    pub fn run(&self) -> BenchReport {
        self.prepopulate();
        info!(
            target: "shardbench::workload",
            "starting {}: duration={}s writers={} readers={} erasers={}",
            self.map.name(), self.duration_secs, self.writer_threads, self.reader_threads, self.eraser_threads
        );
        std::thread::scope(|s| {
            for (role, n) in [(Role::Write, self.writer_threads), (Role::Read, self.reader_threads), (Role::Erase, self.eraser_threads)] {
                for idx in 0..n {
                    s.spawn(move || self.run_role(role, idx));
                }
            }
        });
        let report = self.report();
        info!(
            target: "shardbench::workload",
            "finished {}: inserts={} reads={} erases={}",
            report.label, report.inserts, report.reads, report.erases
        );
        report
    }

    pub fn report(&self) -> BenchReport {
        let (inserts, reads, erases) = self.counters.snapshot();
        BenchReport { label: self.map.name().to_string(), duration_secs: self.duration_secs, inserts, reads, erases }
    }

    fn run_role(&self, role: Role, idx: usize) {
        debug!(target: "shardbench::workload", "{} thread {} started", role.as_str(), idx);
        let ops = match role {
            Role::Write => self.run_write(),
            Role::Read => self.run_read(),
            Role::Erase => self.run_erase(),
        };
        debug!(target: "shardbench::workload", "{} thread {} done after {} ops", role.as_str(), idx, ops);
    }

    fn run_write(&self) -> u64 {
        let start = Instant::now();
        let mut ops = 0u64;
        while !self.timed_out(start) {
            self.map.insert(random() + self.max_key, self.value.clone());
            self.counters.inserts.fetch_add(1, Ordering::Relaxed);
            ops += 1;
        }
        ops
    }

    fn run_read(&self) -> u64 {
        let start = Instant::now();
        let mut ops = 0u64;
        while !self.timed_out(start) {
            let k = random() % self.max_key;
            let found = self.map.lookup(&k).is_some();
            assert!(found, "lookup of prepopulated key {} missed in {}", k, self.map.name());
            self.counters.reads.fetch_add(1, Ordering::Relaxed);
            ops += 1;
        }
        ops
    }

    fn run_erase(&self) -> u64 {
        let start = Instant::now();
        let mut ops = 0u64;
        while !self.timed_out(start) {
            // Key need not exist.
            let _ = self.map.erase(&(random() + self.max_key));
            self.counters.erases.fetch_add(1, Ordering::Relaxed);
            ops += 1;
        }
        ops
    }

    fn timed_out(&self, start: Instant) -> bool {
        start.elapsed().as_millis() > u128::from(self.duration_secs) * 1000
    }
}
