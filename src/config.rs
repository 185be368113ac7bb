//!
//! shardbench configuration
//! ------------------------
//! A run is described by an immutable `BenchConfig`, assembled from three layers:
//! built-in defaults, `SHARDBENCH_*` environment variables, then command-line flags.
//! Flags accept both `--flag value` and `--flag=value`; the gflags-era spellings
//! (`--nsec`, `--nthread_write`, ...) are kept as aliases.
//!

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};

pub const DEFAULT_DURATION_SECS: u64 = 10;
pub const DEFAULT_PREPOPULATE_KEYS: u64 = 1024 * 1024;
pub const DEFAULT_VALUE_SIZE: usize = 1000;

/// Which map implementation a run measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapKind {
    Coarse,
    Sharded,
}

impl MapKind {
    pub fn all() -> Vec<MapKind> { vec![MapKind::Coarse, MapKind::Sharded] }

    /// Parse a `--map` selection; `all` expands to every implementation.
    pub fn parse_selection(s: &str) -> BenchResult<Vec<MapKind>> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coarse" | "simple" => Ok(vec![MapKind::Coarse]),
            "sharded" | "scalable" => Ok(vec![MapKind::Sharded]),
            "all" => Ok(Self::all()),
            other => Err(BenchError::user("invalid_map".to_string(), format!("unknown map '{}': expected coarse, sharded or all", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    pub duration_secs: u64,
    pub writer_threads: usize,
    pub reader_threads: usize,
    pub eraser_threads: usize,
    /// Keys `[0, prepopulate_keys)` are inserted before the timed phase and read by readers.
    pub prepopulate_keys: u64,
    /// Size in bytes of the filler value written for every key.
    pub value_size: usize,
    pub maps: Vec<MapKind>,
    pub json: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            writer_threads: 1,
            reader_threads: 0,
            eraser_threads: 0,
            prepopulate_keys: DEFAULT_PREPOPULATE_KEYS,
            value_size: DEFAULT_VALUE_SIZE,
            maps: MapKind::all(),
            json: false,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(BenchConfig),
    Help,
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage:\n  {program} [OPTIONS]\n\nOptions:\n  --duration-seconds <N>   Run length per map in seconds (default: 10, env SHARDBENCH_DURATION_SECONDS)\n  --writer-threads <N>     Insert threads (default: 1, env SHARDBENCH_WRITER_THREADS)\n  --reader-threads <N>     Lookup threads (default: 0, env SHARDBENCH_READER_THREADS)\n  --eraser-threads <N>     Erase threads (default: 0, env SHARDBENCH_ERASER_THREADS)\n  --prepopulate-keys <N>   Keys inserted before the run (default: 1048576)\n  --value-size <N>         Filler value size in bytes (default: 1000)\n  --map <coarse|sharded|all>  Map(s) to measure (default: all)\n  --json                   Emit one JSON object per map instead of text\n  --help                   Show this message\n"
    )
}

fn parse_num<T: std::str::FromStr>(flag: &str, raw: &str) -> BenchResult<T> {
    raw.trim().parse::<T>().map_err(|_| {
        BenchError::user("invalid_number".to_string(), format!("{} expects a non-negative integer, got '{}'", flag, raw))
    })
}

impl BenchConfig {
    /// Build from the real process environment and arguments (program name excluded).
    pub fn from_env_and_args<I: IntoIterator<Item = String>>(args: I) -> BenchResult<Invocation> {
        Self::from_sources(args, |k| std::env::var(k).ok())
    }

    /// Build from explicit sources; `env` resolves environment variable names.
    pub fn from_sources<I, F>(args: I, env: F) -> BenchResult<Invocation>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = BenchConfig::default();
        cfg.apply_env(&env)?;

        let args: Vec<String> = args.into_iter().collect();
        let mut i = 0usize;
        while i < args.len() {
            let arg = args[i].as_str();
            // --flag=value or --flag value
            let (flag, inline) = match arg.split_once('=') {
                Some((f, v)) if f.starts_with("--") => (f, Some(v.to_string())),
                _ => (arg, None),
            };
            match flag {
                "--help" | "-h" => return Ok(Invocation::Help),
                "--json" => { cfg.json = true; i += 1; continue; }
                _ => {}
            }
            let value = match inline {
                Some(v) => v,
                None => {
                    i += 1;
                    args.get(i).cloned().ok_or_else(|| {
                        BenchError::user("missing_value".to_string(), format!("{} requires a value", flag))
                    })?
                }
            };
            match flag {
                "--duration-seconds" | "--nsec" => cfg.duration_secs = parse_num(flag, &value)?,
                "--writer-threads" | "--nthread_write" => cfg.writer_threads = parse_num(flag, &value)?,
                "--reader-threads" | "--nthread_read" => cfg.reader_threads = parse_num(flag, &value)?,
                "--eraser-threads" | "--nthread_erase" => cfg.eraser_threads = parse_num(flag, &value)?,
                "--prepopulate-keys" => cfg.prepopulate_keys = parse_num(flag, &value)?,
                "--value-size" => cfg.value_size = parse_num(flag, &value)?,
                "--map" => cfg.maps = MapKind::parse_selection(&value)?,
                _ => return Err(BenchError::user("unknown_flag".to_string(), format!("unknown option: {}", flag))),
            }
            i += 1;
        }

        cfg.validate()?;
        Ok(Invocation::Run(cfg))
    }

    fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, env: &F) -> BenchResult<()> {
        if let Some(v) = env("SHARDBENCH_DURATION_SECONDS") { self.duration_secs = parse_num("SHARDBENCH_DURATION_SECONDS", &v)?; }
        if let Some(v) = env("SHARDBENCH_WRITER_THREADS") { self.writer_threads = parse_num("SHARDBENCH_WRITER_THREADS", &v)?; }
        if let Some(v) = env("SHARDBENCH_READER_THREADS") { self.reader_threads = parse_num("SHARDBENCH_READER_THREADS", &v)?; }
        if let Some(v) = env("SHARDBENCH_ERASER_THREADS") { self.eraser_threads = parse_num("SHARDBENCH_ERASER_THREADS", &v)?; }
        Ok(())
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.reader_threads > 0 && self.prepopulate_keys == 0 {
            return Err(BenchError::user(
                "empty_keyspace".to_string(),
                "reader threads need a non-empty prepopulated key space".to_string(),
            ));
        }
        if self.maps.is_empty() {
            return Err(BenchError::user("invalid_map".to_string(), "no map selected".to_string()));
        }
        Ok(())
    }

    pub fn total_threads(&self) -> usize { self.writer_threads + self.reader_threads + self.eraser_threads }
}
