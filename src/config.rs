//! Configuration Module
//!
//! Handles loading server and render-cache configuration from environment
//! variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

// == Tier Config ==
/// Capacity and default TTL of one cache tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierConfig {
    /// Maximum number of live entries (0 disables the tier)
    pub capacity: usize,
    /// TTL applied when an entry is stored without one
    pub default_ttl: Duration,
}

// == TTL Policy ==
/// Rendered-output TTLs by content class.
///
/// Detail pages change most often and static pages least often.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TtlPolicy {
    pub detail: Duration,
    pub list: Duration,
    pub static_page: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            detail: Duration::from_secs(5 * 60),
            list: Duration::from_secs(15 * 60),
            static_page: Duration::from_secs(30 * 60),
        }
    }
}

// == Health Thresholds ==
/// Hit-rate floors below which a tier is reported as `warning`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthThresholds {
    pub artifact_hit_rate_floor: f64,
    pub output_hit_rate_floor: f64,
    /// Hit + miss events a tier needs before its floor applies
    pub min_samples: u64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            artifact_hit_rate_floor: 0.5,
            output_hit_rate_floor: 0.3,
            min_samples: 100,
        }
    }
}

// == Cache Config ==
/// Render cache service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Global switch; when false every operation passes straight through
    pub enabled: bool,
    /// Compiled-artifact tier
    pub artifacts: TierConfig,
    /// Rendered-output tier
    pub outputs: TierConfig,
    pub ttl_policy: TtlPolicy,
    pub health: HealthThresholds,
    /// Number of latency samples kept per template
    pub latency_window: usize,
    /// Distinct template paths with latency or failure bookkeeping
    pub latency_max_templates: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            artifacts: TierConfig {
                capacity: 500,
                default_ttl: Duration::from_secs(24 * 60 * 60),
            },
            outputs: TierConfig {
                capacity: 1000,
                default_ttl: Duration::from_secs(15 * 60),
            },
            ttl_policy: TtlPolicy::default(),
            health: HealthThresholds::default(),
            latency_window: 100,
            latency_max_templates: 1000,
        }
    }
}

impl CacheConfig {
    /// Loads the cache configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `TEMPLATE_CACHE_ENABLED` - Global on/off switch (default: true)
    /// - `ARTIFACT_CACHE_CAPACITY` / `ARTIFACT_CACHE_TTL` - Compiled tier (default: 500, 86400s)
    /// - `OUTPUT_CACHE_CAPACITY` / `OUTPUT_CACHE_TTL` - Rendered tier (default: 1000, 900s)
    /// - `DETAIL_PAGE_TTL` / `LIST_PAGE_TTL` / `STATIC_PAGE_TTL` - (default: 300s, 900s, 1800s)
    /// - `LATENCY_WINDOW` - Latency samples kept per template (default: 100)
    /// - `LATENCY_MAX_TEMPLATES` - Template paths tracked for latency (default: 1000)
    /// - `ARTIFACT_HIT_RATE_FLOOR` / `OUTPUT_HIT_RATE_FLOOR` - (default: 0.5, 0.3)
    /// - `HEALTH_MIN_SAMPLES` - (default: 100)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_or("TEMPLATE_CACHE_ENABLED", defaults.enabled),
            artifacts: TierConfig {
                capacity: env_or("ARTIFACT_CACHE_CAPACITY", defaults.artifacts.capacity),
                default_ttl: env_secs("ARTIFACT_CACHE_TTL", defaults.artifacts.default_ttl),
            },
            outputs: TierConfig {
                capacity: env_or("OUTPUT_CACHE_CAPACITY", defaults.outputs.capacity),
                default_ttl: env_secs("OUTPUT_CACHE_TTL", defaults.outputs.default_ttl),
            },
            ttl_policy: TtlPolicy {
                detail: env_secs("DETAIL_PAGE_TTL", defaults.ttl_policy.detail),
                list: env_secs("LIST_PAGE_TTL", defaults.ttl_policy.list),
                static_page: env_secs("STATIC_PAGE_TTL", defaults.ttl_policy.static_page),
            },
            health: HealthThresholds {
                artifact_hit_rate_floor: env_or(
                    "ARTIFACT_HIT_RATE_FLOOR",
                    defaults.health.artifact_hit_rate_floor,
                ),
                output_hit_rate_floor: env_or(
                    "OUTPUT_HIT_RATE_FLOOR",
                    defaults.health.output_hit_rate_floor,
                ),
                min_samples: env_or("HEALTH_MIN_SAMPLES", defaults.health.min_samples),
            },
            latency_window: env_or("LATENCY_WINDOW", defaults.latency_window),
            latency_max_templates: env_or(
                "LATENCY_MAX_TEMPLATES",
                defaults.latency_max_templates,
            ),
        }
    }
}

// == Server Config ==
/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Root directory of the template files
    pub template_dir: PathBuf,
    /// Background sweep interval
    pub cleanup_interval: Duration,
    /// Template paths rendered by the warm-up action
    pub warmup_templates: Vec<String>,
    /// Render cache settings
    pub cache: CacheConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `TEMPLATE_DIR` - Template root directory (default: templates)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 300; 0 = default)
    /// - `WARMUP_TEMPLATES` - Comma-separated template paths (default: none)
    ///
    /// plus everything read by [`CacheConfig::from_env`].
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            template_dir: env::var("TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_dir),
            cleanup_interval: Some(env_secs("CLEANUP_INTERVAL", defaults.cleanup_interval))
                .filter(|interval| !interval.is_zero())
                .unwrap_or(defaults.cleanup_interval),
            warmup_templates: env::var("WARMUP_TEMPLATES")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            cache: CacheConfig::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            template_dir: PathBuf::from("templates"),
            cleanup_interval: Duration::from_secs(5 * 60),
            warmup_templates: Vec::new(),
            cache: CacheConfig::default(),
        }
    }
}

// == Helpers ==
/// Reads and parses `name`, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_secs(name: &str, default: Duration) -> Duration {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.template_dir, PathBuf::from("templates"));
        assert_eq!(config.cleanup_interval, Duration::from_secs(300));
        assert!(config.warmup_templates.is_empty());
    }

    #[test]
    fn test_cache_config_default() {
        let cache = CacheConfig::default();
        assert!(cache.enabled);
        assert_eq!(cache.artifacts.capacity, 500);
        assert_eq!(cache.artifacts.default_ttl, Duration::from_secs(86_400));
        assert_eq!(cache.outputs.capacity, 1000);
        assert_eq!(cache.outputs.default_ttl, Duration::from_secs(900));
        assert_eq!(cache.latency_window, 100);
        assert_eq!(cache.latency_max_templates, 1000);
        assert_eq!(cache.health.artifact_hit_rate_floor, 0.5);
        assert_eq!(cache.health.output_hit_rate_floor, 0.3);
        assert_eq!(cache.health.min_samples, 100);
    }

    #[test]
    fn test_ttl_policy_ordering() {
        let policy = TtlPolicy::default();
        assert!(policy.detail < policy.list);
        assert!(policy.list < policy.static_page);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for var in [
            "SERVER_PORT",
            "TEMPLATE_DIR",
            "CLEANUP_INTERVAL",
            "WARMUP_TEMPLATES",
            "TEMPLATE_CACHE_ENABLED",
            "ARTIFACT_CACHE_CAPACITY",
            "OUTPUT_CACHE_CAPACITY",
            "LATENCY_WINDOW",
        ] {
            env::remove_var(var);
        }

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, Duration::from_secs(300));
        assert!(config.cache.enabled);
        assert_eq!(config.cache.artifacts.capacity, 500);
        assert_eq!(config.cache.latency_window, 100);
    }

    #[test]
    fn test_zero_cleanup_interval_uses_default() {
        env::set_var("CLEANUP_INTERVAL", "0");
        let config = Config::from_env();
        env::remove_var("CLEANUP_INTERVAL");

        assert_eq!(config.cleanup_interval, Duration::from_secs(300));
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("RENDER_CACHE_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("RENDER_CACHE_TEST_GARBAGE", 7usize), 7);
        env::remove_var("RENDER_CACHE_TEST_GARBAGE");
    }

    #[test]
    fn test_env_secs() {
        env::set_var("RENDER_CACHE_TEST_SECS", " 42 ");
        assert_eq!(
            env_secs("RENDER_CACHE_TEST_SECS", Duration::ZERO),
            Duration::from_secs(42)
        );
        env::remove_var("RENDER_CACHE_TEST_SECS");
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list(" home, blog/index ,,about "),
            vec!["home", "blog/index", "about"]
        );
        assert!(parse_list("").is_empty());
    }
}
