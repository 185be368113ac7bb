pub mod map;
pub mod coarse;
pub mod table;
pub mod sharded;
pub mod workload;
pub mod report;
pub mod config;
pub mod error;

pub use coarse::CoarseLockMap;
pub use config::{BenchConfig, MapKind};
pub use error::{BenchError, BenchResult};
pub use map::KeyValueMap;
pub use report::{BenchReport, Throughput};
pub use sharded::ShardedMap;
pub use table::ScalableHashTable;
pub use workload::MicroBenchmark;

// Test-only printing helper: expands to eprintln! during tests and debug builds.
// Usage in tests: tprintln!("debug: {}", value);
#[cfg(any(test, debug_assertions))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ( eprintln!($($arg)*) );
}

// In non-test builds, provide a no-op tprintln! so calls compile without effect.
#[cfg(not(any(test, debug_assertions)))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ({
        // Preserve formatting checks in release without producing code
        if false { let _ = format!($($arg)*); }
    });
}
