//! Latency Tracking Module
//!
//! Keeps a bounded ring of recent render durations per template path and
//! summarizes them for the stats report.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Duration;

use serde::Serialize;

// == Latency Summary ==
/// Summary of a template's recent render times, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySummary {
    pub average: f64,
    pub median: f64,
    pub p95: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl LatencySummary {
    /// Summarizes `samples`; None when there are none.
    ///
    /// Median and p95 are the sorted samples at index `len / 2` and
    /// `floor(len * 0.95)`. All figures are rounded to two decimals.
    pub fn from_samples<'a>(samples: impl IntoIterator<Item = &'a Duration>) -> Option<Self> {
        let mut sorted: Vec<f64> = samples.into_iter().map(as_millis).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let len = sorted.len();
        let average = sorted.iter().sum::<f64>() / len as f64;
        let p95_index = ((len as f64 * 0.95).floor() as usize).min(len - 1);

        Some(Self {
            average: round2(average),
            median: round2(sorted[len / 2]),
            p95: round2(sorted[p95_index]),
            min: round2(sorted[0]),
            max: round2(sorted[len - 1]),
            count: len,
        })
    }
}

fn as_millis(d: &Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// == Latency Tracker ==
/// Per-template ring buffers of recent render durations.
///
/// At most `max_templates` paths are tracked in each of the sample and
/// failure maps; events for further paths are dropped until an
/// invalidation frees room.
#[derive(Debug)]
pub struct LatencyTracker {
    /// Samples kept per template
    window: usize,
    max_templates: usize,
    samples: HashMap<String, VecDeque<Duration>>,
    failures: HashMap<String, u64>,
}

impl LatencyTracker {
    /// Creates a tracker keeping the last `window` samples for each of at
    /// most `max_templates` templates.
    pub fn new(window: usize, max_templates: usize) -> Self {
        Self {
            window,
            max_templates,
            samples: HashMap::new(),
            failures: HashMap::new(),
        }
    }

    // == Record ==
    /// Appends a sample, dropping the oldest once the window is full.
    pub fn record(&mut self, template_path: &str, elapsed: Duration) {
        let window = self.window;
        if window == 0 || !admits(&self.samples, template_path, self.max_templates) {
            return;
        }
        let ring = self
            .samples
            .entry(template_path.to_string())
            .or_insert_with(|| VecDeque::with_capacity(window));
        if ring.len() >= window {
            ring.pop_front();
        }
        ring.push_back(elapsed);
    }

    /// Counts a failed render. Failures contribute no latency sample.
    pub fn record_failure(&mut self, template_path: &str) {
        if !admits(&self.failures, template_path, self.max_templates) {
            return;
        }
        *self.failures.entry(template_path.to_string()).or_insert(0) += 1;
    }

    // == Summaries ==
    /// Summary per template path, sorted by path.
    pub fn summaries(&self) -> BTreeMap<String, LatencySummary> {
        self.samples
            .iter()
            .filter_map(|(path, ring)| {
                LatencySummary::from_samples(ring).map(|summary| (path.clone(), summary))
            })
            .collect()
    }

    /// Failure count per template path, sorted by path.
    pub fn failures(&self) -> BTreeMap<String, u64> {
        self.failures
            .iter()
            .map(|(path, count)| (path.clone(), *count))
            .collect()
    }

    /// Drops samples and failure counts of every template matching `predicate`.
    pub fn forget_where<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.samples.retain(|path, _| !predicate(path));
        self.failures.retain(|path, _| !predicate(path));
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.failures.clear();
    }
}

fn admits<V>(map: &HashMap<String, V>, template_path: &str, max_templates: usize) -> bool {
    map.contains_key(template_path) || map.len() < max_templates
}
