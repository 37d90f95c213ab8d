use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::feed::{Feed, HealthStatus};

pub const DEFAULT_REFRESH_INTERVAL_MINUTES: i32 = 60;

/// Per-feed health view exposed to callers polling for silent ingestion
/// failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedHealth {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub last_fetched: Option<DateTime<Utc>>,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub refresh_interval_minutes: i32,
}

impl From<Feed> for FeedHealth {
    fn from(feed: Feed) -> Self {
        Self {
            id: feed.id,
            url: feed.url,
            title: feed.title,
            last_fetched: feed.last_fetched,
            status: feed.health_status,
            error_message: feed.last_error,
            refresh_interval_minutes: feed.refresh_interval_minutes,
        }
    }
}

/// Aggregate counts over a set of feeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedHealthStats {
    pub total: usize,
    pub healthy: usize,
    pub error: usize,
    pub unknown: usize,
    pub healthy_percentage: f64,
}

/// A feed is due when it has never been fetched, or when the elapsed time
/// since the last fetch has reached its refresh interval. Pull-based: the
/// caller decides when to evaluate this.
pub fn is_refresh_due(
    last_fetched: Option<DateTime<Utc>>,
    interval_minutes: i32,
    now: DateTime<Utc>,
) -> bool {
    match last_fetched {
        None => true,
        Some(fetched) => {
            now.signed_duration_since(fetched) >= Duration::minutes(i64::from(interval_minutes))
        }
    }
}

pub fn health_stats(feeds: &[FeedHealth]) -> FeedHealthStats {
    let total = feeds.len();
    let healthy = feeds
        .iter()
        .filter(|f| f.status == HealthStatus::Healthy)
        .count();
    let error = feeds
        .iter()
        .filter(|f| f.status == HealthStatus::Error)
        .count();
    let unknown = feeds
        .iter()
        .filter(|f| f.status == HealthStatus::Unknown)
        .count();

    FeedHealthStats {
        total,
        healthy,
        error,
        unknown,
        healthy_percentage: if total > 0 {
            healthy as f64 / total as f64 * 100.0
        } else {
            0.0
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn health(status: HealthStatus) -> FeedHealth {
        FeedHealth {
            id: Uuid::new_v4(),
            url: "https://example.com/rss".to_string(),
            title: "Example".to_string(),
            last_fetched: None,
            status,
            error_message: None,
            refresh_interval_minutes: DEFAULT_REFRESH_INTERVAL_MINUTES,
        }
    }

    #[test]
    fn never_fetched_feed_is_always_due() {
        assert!(is_refresh_due(None, 60, Utc::now()));
    }

    #[test]
    fn feed_fetched_61_minutes_ago_is_due() {
        let now = Utc::now();
        let fetched = now - Duration::minutes(61);
        assert!(is_refresh_due(Some(fetched), 60, now));
    }

    #[test]
    fn feed_fetched_59_minutes_ago_is_not_due() {
        let now = Utc::now();
        let fetched = now - Duration::minutes(59);
        assert!(!is_refresh_due(Some(fetched), 60, now));
    }

    #[test]
    fn feed_fetched_exactly_at_interval_is_due() {
        let now = Utc::now();
        let fetched = now - Duration::minutes(60);
        assert!(is_refresh_due(Some(fetched), 60, now));
    }

    #[test]
    fn per_feed_interval_overrides_the_default() {
        let now = Utc::now();
        let fetched = now - Duration::minutes(10);
        assert!(is_refresh_due(Some(fetched), 5, now));
        assert!(!is_refresh_due(Some(fetched), 15, now));
    }

    #[test]
    fn stats_count_each_status() {
        let feeds = vec![
            health(HealthStatus::Healthy),
            health(HealthStatus::Healthy),
            health(HealthStatus::Error),
            health(HealthStatus::Unknown),
        ];

        let stats = health_stats(&feeds);
        assert_eq!(
            stats,
            FeedHealthStats {
                total: 4,
                healthy: 2,
                error: 1,
                unknown: 1,
                healthy_percentage: 50.0,
            }
        );
    }

    #[test]
    fn stats_over_no_feeds_have_zero_percentage() {
        let stats = health_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.healthy_percentage, 0.0);
    }
}
