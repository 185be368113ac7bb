use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use shardbench::config::{usage, Invocation};
use shardbench::report::label_line;
use shardbench::{BenchConfig, BenchResult, CoarseLockMap, KeyValueMap, MapKind, MicroBenchmark, ShardedMap};

/// Measure one freshly built map and print its result.
fn bench_one<M: KeyValueMap<u64, Vec<u8>>>(map: &M, cfg: &BenchConfig) -> BenchResult<()> {
    if !cfg.json { println!("{}", label_line(map.name())); }
    let report = MicroBenchmark::new(map, cfg).run();
    if cfg.json {
        println!("{}", serde_json::to_string(&report.to_json())?);
    } else {
        for line in report.rate_lines() { println!("{}", line); }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Init logging; stdout is reserved for the report
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "shardbench".to_string());
    let cfg = match BenchConfig::from_env_and_args(args) {
        Ok(Invocation::Run(cfg)) => cfg,
        Ok(Invocation::Help) => {
            print!("{}", usage(&program));
            return Ok(());
        }
        Err(e) => {
            eprint!("{}", usage(&program));
            eprintln!("error: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    info!(
        target: "shardbench::main",
        "shardbench starting: RUST_LOG='{}', duration={}s, writers={}, readers={}, erasers={}, keys={}, value_size={}",
        rust_log, cfg.duration_secs, cfg.writer_threads, cfg.reader_threads, cfg.eraser_threads, cfg.prepopulate_keys, cfg.value_size
    );

    for kind in &cfg.maps {
        // Each map is built fresh and dropped before the next one runs
        match kind {
            MapKind::Coarse => bench_one(&CoarseLockMap::<u64, Vec<u8>>::new(), &cfg)?,
            MapKind::Sharded => bench_one(&ShardedMap::<u64, Vec<u8>>::new(), &cfg)?,
        }
    }
    Ok(())
}
