use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// External catalog identifier. Caller-supplied, never generated locally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub i64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Locally cached mirror of an upstream catalog product.
///
/// `title`, `image` and `price` are overwritten on every successful refresh;
/// `review` is written once when the row is first created and then left alone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: f64,
    pub review: Option<String>,
    pub last_sync: DateTime<Utc>,
}

impl Product {
    /// Whether the row still satisfies the staleness window at `now`.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.last_sync) <= ttl
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{Product, ProductId};

    fn product_synced_at(hour: u32) -> Product {
        Product {
            id: ProductId(1),
            title: "Widget".to_string(),
            image: "https://example.com/widget.jpg".to_string(),
            price: 9.99,
            review: None,
            last_sync: Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn fresh_within_the_window() {
        let product = product_synced_at(0);
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert!(product.is_fresh_at(now, Duration::hours(24)));
    }

    #[test]
    fn stale_past_the_window() {
        let product = product_synced_at(0);
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 1, 0, 0).unwrap();
        assert!(!product.is_fresh_at(now, Duration::hours(24)));
    }
}
