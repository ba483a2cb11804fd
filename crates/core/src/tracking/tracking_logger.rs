use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for tracking-loop events.
///
/// The session reports into it and never prints on its own.
pub trait TrackingLogger: Send {
    /// A cycle finished; `completed` counts every cycle whose response was
    /// handled while tracking.
    fn cycle(&mut self, completed: u64);

    /// Time spent in one stage (`capture`, `match`, `render`).
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// A per-cycle value such as `verified_entries`.
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Called once when the loop ends. Default: no-op.
    fn summary(&self) {}
}

pub struct NullTrackingLogger;

impl TrackingLogger for NullTrackingLogger {
    fn cycle(&mut self, _completed: u64) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running count, sum and maximum of one series.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stats {
    pub count: u64,
    pub total: f64,
    pub max: f64,
}

impl Stats {
    fn record(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
        if self.count == 1 || value > self.max {
            self.max = value;
        }
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Reports through `log::info!`: a progress line every `every` cycles and
/// a per-stage summary at the end of the session.
pub struct StdoutTrackingLogger {
    every: u64,
    started: Instant,
    cycles: u64,
    stages: BTreeMap<String, Stats>,
    metrics: BTreeMap<String, Stats>,
}

impl StdoutTrackingLogger {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            started: Instant::now(),
            cycles: 0,
            stages: BTreeMap::new(),
            metrics: BTreeMap::new(),
        }
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn stage(&self, name: &str) -> Option<Stats> {
        self.stages.get(name).copied()
    }

    pub fn metric_stats(&self, name: &str) -> Option<Stats> {
        self.metrics.get(name).copied()
    }

    /// The end-of-session report, or `None` before anything was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.stages.is_empty() && self.metrics.is_empty() {
            return None;
        }
        let secs = self.started.elapsed().as_secs_f64();
        let mut out = format!("Tracked {} cycles in {secs:.1}s", self.cycles);
        if self.cycles > 0 && secs > 0.0 {
            out.push_str(&format!(" ({:.1} cycles/s)", self.cycles as f64 / secs));
        }
        for (stage, stats) in &self.stages {
            out.push_str(&format!(
                "\n  {stage:8} avg {:6.1}ms  max {:6.1}ms",
                stats.mean(),
                stats.max
            ));
        }
        for (name, stats) in &self.metrics {
            out.push_str(&format!("\n  {name} avg {:.1}", stats.mean()));
        }
        Some(out)
    }
}

impl Default for StdoutTrackingLogger {
    fn default() -> Self {
        Self::new(25)
    }
}

impl TrackingLogger for StdoutTrackingLogger {
    fn cycle(&mut self, completed: u64) {
        self.cycles = completed;
        if completed % self.every == 0 {
            let matched = self
                .metrics
                .get("verified_entries")
                .map_or(0.0, Stats::mean);
            log::info!("{completed} cycles, {matched:.1} verified per cycle");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.stages
            .entry(stage.to_string())
            .or_default()
            .record(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().record(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_accepts_everything() {
        let mut logger = NullTrackingLogger;
        logger.cycle(1);
        logger.timing("match", 5.0);
        logger.metric("verified_entries", 1.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_stage_stats_accumulate() {
        let mut logger = StdoutTrackingLogger::new(10);
        logger.timing("match", 20.0);
        logger.timing("match", 40.0);
        logger.timing("render", 5.0);

        let matched = logger.stage("match").unwrap();
        assert_eq!(matched.count, 2);
        assert_relative_eq!(matched.mean(), 30.0);
        assert_relative_eq!(matched.max, 40.0);
        assert_eq!(logger.stage("render").unwrap().count, 1);
        assert!(logger.stage("capture").is_none());
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = StdoutTrackingLogger::new(10);
        logger.cycle(2);
        logger.timing("capture", 2.0);
        logger.timing("match", 40.0);
        logger.metric("verified_entries", 1.0);
        logger.metric("verified_entries", 2.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.starts_with("Tracked 2 cycles"));
        assert!(summary.contains("capture"));
        assert!(summary.contains("match"));
        assert!(summary.contains("verified_entries avg 1.5"));
    }

    #[test]
    fn test_summary_empty_until_something_recorded() {
        let mut logger = StdoutTrackingLogger::default();
        logger.cycle(3);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_cycle_keeps_latest_count() {
        let mut logger = StdoutTrackingLogger::new(3);
        for i in 1..=7 {
            logger.cycle(i);
        }
        assert_eq!(logger.cycles(), 7);
    }

    #[test]
    fn test_stats_mean_of_nothing_is_zero() {
        assert_relative_eq!(Stats::default().mean(), 0.0);
        let mut stats = Stats::default();
        stats.record(-1.0);
        assert_relative_eq!(stats.max, -1.0);
    }
}
