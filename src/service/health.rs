//! Cache Health Module
//!
//! Derives a healthy / warning / error verdict from the two tiers' statistics.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::config::HealthThresholds;

// == Health Status ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Error,
}

// == Memory Usage ==
/// Live entry counts per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryUsage {
    pub compiled: usize,
    pub rendered: usize,
}

// == Health Report ==
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub enabled: bool,
    /// Human-readable reasons for a non-healthy status
    pub warnings: Vec<String>,
    pub compiled_templates: CacheStats,
    pub rendered_output: CacheStats,
    pub memory_usage: MemoryUsage,
}

impl HealthReport {
    /// Evaluates tier statistics against the configured thresholds.
    ///
    /// A tier's hit-rate floor only applies once it has seen at least
    /// `min_samples` lookups, so a cold cache is not reported as degraded.
    /// An enabled service with a zero-capacity tier is an `Error`: that tier
    /// can never produce a hit.
    pub fn evaluate(
        enabled: bool,
        compiled: CacheStats,
        rendered: CacheStats,
        thresholds: &HealthThresholds,
    ) -> Self {
        let mut warnings = Vec::new();
        let mut status = HealthStatus::Healthy;

        let tiers = [
            ("compiled templates", &compiled, thresholds.artifact_hit_rate_floor),
            ("rendered output", &rendered, thresholds.output_hit_rate_floor),
        ];

        for (name, stats, floor) in tiers {
            if enabled && stats.capacity == 0 {
                warnings.push(format!("Cache tier for {} has zero capacity", name));
                status = HealthStatus::Error;
            } else if stats.lookups() >= thresholds.min_samples && stats.hit_rate < floor {
                warnings.push(format!("Low cache hit rate for {}", name));
                if status == HealthStatus::Healthy {
                    status = HealthStatus::Warning;
                }
            }
        }

        Self {
            status,
            enabled,
            warnings,
            memory_usage: MemoryUsage {
                compiled: compiled.size,
                rendered: rendered.size,
            },
            compiled_templates: compiled,
            rendered_output: rendered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(hits: u64, misses: u64, capacity: usize) -> CacheStats {
        CacheStats {
            hits,
            misses,
            evictions: 0,
            size: 3,
            capacity,
            hit_rate: crate::cache::hit_rate(hits, misses),
        }
    }

    fn thresholds() -> HealthThresholds {
        HealthThresholds::default()
    }

    #[test]
    fn test_healthy_when_cold() {
        // Terrible hit rates, but too few samples to matter
        let report = HealthReport::evaluate(true, stats(0, 99, 10), stats(0, 99, 10), &thresholds());
        assert_eq!(report.status, HealthStatus::Healthy);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_warning_on_low_compiled_hit_rate() {
        let report = HealthReport::evaluate(true, stats(40, 60, 10), stats(90, 10, 10), &thresholds());
        assert_eq!(report.status, HealthStatus::Warning);
        assert_eq!(report.warnings, vec!["Low cache hit rate for compiled templates"]);
    }

    #[test]
    fn test_warning_on_low_rendered_hit_rate() {
        let report = HealthReport::evaluate(true, stats(90, 10, 10), stats(29, 71, 10), &thresholds());
        assert_eq!(report.status, HealthStatus::Warning);
        assert_eq!(report.warnings, vec!["Low cache hit rate for rendered output"]);
    }

    #[test]
    fn test_floor_is_exclusive() {
        let report = HealthReport::evaluate(true, stats(50, 50, 10), stats(30, 70, 10), &thresholds());
        assert_eq!(report.status, HealthStatus::Healthy);
    }

    #[test]
    fn test_both_tiers_warn() {
        let report = HealthReport::evaluate(true, stats(0, 200, 10), stats(0, 200, 10), &thresholds());
        assert_eq!(report.status, HealthStatus::Warning);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_zero_capacity_is_error_when_enabled() {
        let report = HealthReport::evaluate(true, stats(0, 0, 0), stats(0, 500, 10), &thresholds());
        assert_eq!(report.status, HealthStatus::Error);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_zero_capacity_ignored_when_disabled() {
        let report = HealthReport::evaluate(false, stats(0, 0, 0), stats(0, 0, 0), &thresholds());
        assert_eq!(report.status, HealthStatus::Healthy);
        assert!(!report.enabled);
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = HealthThresholds {
            artifact_hit_rate_floor: 0.99,
            output_hit_rate_floor: 0.0,
            min_samples: 1,
        };
        let report = HealthReport::evaluate(true, stats(9, 1, 10), stats(0, 1, 10), &strict);
        assert_eq!(report.status, HealthStatus::Warning);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_report_serializes() {
        let report = HealthReport::evaluate(true, stats(1, 1, 10), stats(1, 1, 10), &thresholds());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["memoryUsage"]["compiled"], 3);
        assert!(json["compiledTemplates"].get("hitRate").is_some());
    }
}
