use serde::{Deserialize, Serialize};

/// Raw result of one benchmark run against one map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchReport {
    pub label: String,
    pub duration_secs: u64,
    pub inserts: u64,
    pub reads: u64,
    pub erases: u64,
}

/// Header printed before a map is measured.
pub fn label_line(label: &str) -> String { format!("Micro benchmarking {}", label) }

/// Completed operations per second, integer-divided by the configured duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throughput {
    pub inserts_per_sec: u64,
    pub reads_per_sec: u64,
    pub erases_per_sec: u64,
}

impl BenchReport {
    /// None when the run had zero duration.
    pub fn throughput(&self) -> Option<Throughput> {
        if self.duration_secs == 0 { return None; }
        Some(Throughput {
            inserts_per_sec: self.inserts / self.duration_secs,
            reads_per_sec: self.reads / self.duration_secs,
            erases_per_sec: self.erases / self.duration_secs,
        })
    }

    /// One line per operation kind; empty for a zero-duration run.
    pub fn rate_lines(&self) -> Vec<String> {
        match self.throughput() {
            Some(t) => vec![
                format!("insert/sec={}", t.inserts_per_sec),
                format!("read/sec={}", t.reads_per_sec),
                format!("erases/sec={}", t.erases_per_sec),
            ],
            None => Vec::new(),
        }
    }

    /// Label line followed by the rate lines.
    pub fn render_lines(&self) -> Vec<String> {
        let mut out = vec![label_line(&self.label)];
        out.extend(self.rate_lines());
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "map": self.label,
            "duration_secs": self.duration_secs,
            "inserts": self.inserts,
            "reads": self.reads,
            "erases": self.erases,
            "throughput": self.throughput(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(duration_secs: u64) -> BenchReport {
        BenchReport { label: "coarse-lock map".into(), duration_secs, inserts: 1000, reads: 2000, erases: 500 }
    }

    #[test]
    fn integer_division_per_second() {
        let t = report(10).throughput().unwrap();
        assert_eq!(t, Throughput { inserts_per_sec: 100, reads_per_sec: 200, erases_per_sec: 50 });
        let t = report(3).throughput().unwrap();
        assert_eq!(t.inserts_per_sec, 333);
    }

    #[test]
    fn text_lines() {
        assert_eq!(
            report(10).render_lines(),
            vec!["Micro benchmarking coarse-lock map", "insert/sec=100", "read/sec=200", "erases/sec=50"]
        );
    }

    #[test]
    fn zero_duration_skips_rates() {
        let r = report(0);
        assert!(r.throughput().is_none());
        assert!(r.rate_lines().is_empty());
        assert_eq!(r.render_lines(), vec!["Micro benchmarking coarse-lock map"]);
        assert!(r.to_json()["throughput"].is_null());
    }

    #[test]
    fn json_carries_counts_and_rates() {
        let v = report(10).to_json();
        assert_eq!(v["map"], "coarse-lock map");
        assert_eq!(v["reads"], 2000);
        assert_eq!(v["throughput"]["erases_per_sec"], 50);
    }
}
