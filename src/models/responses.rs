//! Response DTOs for the render cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::service::{HealthReport, ServiceStats, WarmUpReport};

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Envelope for data-returning endpoints (`GET /cache`)
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: now_rfc3339(),
        }
    }
}

/// Stats and health together, returned by `GET /cache` without an action
#[derive(Debug, Clone, Serialize)]
pub struct CacheOverview {
    pub stats: ServiceStats,
    pub health: HealthReport,
}

/// Response body for cache actions (`POST /cache`, `DELETE /cache`)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    /// Entries removed by a single-template invalidation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warm_up: Option<WarmUpReport>,
    pub timestamp: String,
}

impl ActionResponse {
    fn new(message: String) -> Self {
        Self {
            success: true,
            message,
            removed: None,
            warm_up: None,
            timestamp: now_rfc3339(),
        }
    }

    /// A single template was invalidated.
    pub fn invalidated(template: &str, removed: usize) -> Self {
        Self {
            removed: Some(removed),
            ..Self::new(format!("Cache invalidated for template: {}", template))
        }
    }

    /// Both tiers were cleared.
    pub fn invalidated_all() -> Self {
        Self::new("All caches invalidated".to_string())
    }

    /// A warm-up pass finished.
    pub fn warmed_up(report: WarmUpReport) -> Self {
        let message = if report.failed.is_empty() {
            "Cache warmed up successfully".to_string()
        } else {
            format!(
                "Cache warmed up with {} failed template(s)",
                report.failed.len()
            )
        };
        Self {
            warm_up: Some(report),
            ..Self::new(message)
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: now_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::WarmUpFailure;

    #[test]
    fn test_data_response_serialize() {
        let resp = DataResponse::new(vec![1, 2]);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_invalidated_response() {
        let json = serde_json::to_value(ActionResponse::invalidated("blog/post", 3)).unwrap();
        assert_eq!(json["removed"], 3);
        assert!(json["message"].as_str().unwrap().contains("blog/post"));
        assert!(json.get("warmUp").is_none());
    }

    #[test]
    fn test_invalidated_all_response() {
        let json = serde_json::to_value(ActionResponse::invalidated_all()).unwrap();
        assert_eq!(json["message"], "All caches invalidated");
        assert!(json.get("removed").is_none());
    }

    #[test]
    fn test_warmed_up_response_reports_failures() {
        let report = WarmUpReport {
            rendered: 1,
            failed: vec![WarmUpFailure {
                template_path: "broken".to_string(),
                error: "boom".to_string(),
            }],
        };
        let json = serde_json::to_value(ActionResponse::warmed_up(report)).unwrap();
        assert!(json["message"].as_str().unwrap().contains("1 failed"));
        assert_eq!(json["warmUp"]["failed"][0]["templatePath"], "broken");
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
