// ABOUTME: In-process token usage accounting with derived dollar cost.
// ABOUTME: UsageTracker is a cloneable handle over shared totals that reset on process restart.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Token counts reported by a provider for a single request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// Per-million-token prices used to estimate cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl Pricing {
    /// Claude Sonnet 4 list pricing: $3.00 in, $15.00 out.
    pub const CLAUDE_SONNET_4: Pricing = Pricing {
        input_per_million: 3.00,
        output_per_million: 15.00,
    };

    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        input_tokens as f64 * self.input_per_million / 1_000_000.0
            + output_tokens as f64 * self.output_per_million / 1_000_000.0
    }

    /// Human-readable rate, e.g. "$3.00".
    pub fn input_label(&self) -> String {
        format!("${:.2}", self.input_per_million)
    }

    pub fn output_label(&self) -> String {
        format!("${:.2}", self.output_per_million)
    }
}

/// Raw accumulated counters.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageTotals {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub request_count: u64,
    pub last_reset: DateTime<Utc>,
}

impl UsageTotals {
    fn new() -> Self {
        Self {
            input_tokens: 0,
            output_tokens: 0,
            request_count: 0,
            last_reset: Utc::now(),
        }
    }
}

/// Point-in-time view of the totals plus derived values, shaped for the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub request_count: u64,
    pub estimated_cost: f64,
    pub last_reset: DateTime<Utc>,
}

/// Shared usage accumulator. Cloning yields another handle to the same totals.
#[derive(Debug, Clone)]
pub struct UsageTracker {
    totals: Arc<RwLock<UsageTotals>>,
    pricing: Pricing,
}

impl UsageTracker {
    pub fn new(pricing: Pricing) -> Self {
        Self {
            totals: Arc::new(RwLock::new(UsageTotals::new())),
            pricing,
        }
    }

    pub fn pricing(&self) -> Pricing {
        self.pricing
    }

    /// Add one request's token counts to the totals.
    pub async fn record(&self, usage: TokenUsage) {
        let mut totals = self.totals.write().await;
        totals.input_tokens = totals.input_tokens.saturating_add(usage.input_tokens);
        totals.output_tokens = totals.output_tokens.saturating_add(usage.output_tokens);
        totals.request_count = totals.request_count.saturating_add(1);
        tracing::debug!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            request_count = totals.request_count,
            "recorded usage"
        );
    }

    /// Read the current totals together with the estimated cost.
    pub async fn snapshot(&self) -> UsageSnapshot {
        let totals = self.totals.read().await;
        UsageSnapshot {
            input_tokens: totals.input_tokens,
            output_tokens: totals.output_tokens,
            total_tokens: totals.input_tokens.saturating_add(totals.output_tokens),
            request_count: totals.request_count,
            estimated_cost: self.pricing.cost(totals.input_tokens, totals.output_tokens),
            last_reset: totals.last_reset,
        }
    }

    /// Zero all counters and restamp `last_reset`.
    pub async fn reset(&self) {
        *self.totals.write().await = UsageTotals::new();
    }
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::new(Pricing::CLAUDE_SONNET_4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(input_tokens: u64, output_tokens: u64) -> TokenUsage {
        TokenUsage {
            input_tokens,
            output_tokens,
        }
    }

    #[test]
    fn cost_uses_per_million_rates() {
        let cost = Pricing::CLAUDE_SONNET_4.cost(1_000_000, 1_000_000);
        assert!((cost - 18.0).abs() < 1e-9);

        let cost = Pricing::CLAUDE_SONNET_4.cost(1_000, 2_000);
        assert!((cost - 0.033).abs() < 1e-9);
    }

    #[test]
    fn pricing_labels() {
        assert_eq!(Pricing::CLAUDE_SONNET_4.input_label(), "$3.00");
        assert_eq!(Pricing::CLAUDE_SONNET_4.output_label(), "$15.00");
    }

    #[tokio::test]
    async fn totals_accumulate_monotonically() {
        let tracker = UsageTracker::default();
        let mut previous = tracker.snapshot().await;
        assert_eq!(previous.request_count, 0);

        for (i, o) in [(100, 400), (0, 0), (2500, 1200)] {
            tracker.record(usage(i, o)).await;
            let current = tracker.snapshot().await;
            assert!(current.input_tokens >= previous.input_tokens);
            assert!(current.output_tokens >= previous.output_tokens);
            assert_eq!(current.request_count, previous.request_count + 1);
            assert!(current.estimated_cost >= previous.estimated_cost);
            previous = current;
        }

        assert_eq!(previous.input_tokens, 2600);
        assert_eq!(previous.output_tokens, 1600);
        assert_eq!(previous.total_tokens, 4200);
    }

    #[tokio::test]
    async fn clones_share_totals() {
        let tracker = UsageTracker::default();
        let other = tracker.clone();
        other.record(usage(10, 20)).await;
        assert_eq!(tracker.snapshot().await.total_tokens, 30);
    }

    #[tokio::test]
    async fn concurrent_records_are_not_lost() {
        let tracker = UsageTracker::default();
        let mut tasks = Vec::new();
        for _ in 0..50 {
            let t = tracker.clone();
            tasks.push(tokio::spawn(async move { t.record(usage(1, 2)).await }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        let snap = tracker.snapshot().await;
        assert_eq!(snap.request_count, 50);
        assert_eq!(snap.input_tokens, 50);
        assert_eq!(snap.output_tokens, 100);
    }

    #[tokio::test]
    async fn reset_zeroes_counters() {
        let tracker = UsageTracker::default();
        let before = tracker.snapshot().await.last_reset;
        tracker.record(usage(5, 5)).await;
        tracker.reset().await;
        let snap = tracker.snapshot().await;
        assert_eq!(snap.request_count, 0);
        assert_eq!(snap.total_tokens, 0);
        assert!(snap.last_reset >= before);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let snap = UsageSnapshot {
            input_tokens: 1,
            output_tokens: 2,
            total_tokens: 3,
            request_count: 1,
            estimated_cost: 0.0,
            last_reset: Utc::now(),
        };
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["inputTokens"], 1);
        assert_eq!(json["totalTokens"], 3);
        assert!(json.get("lastReset").is_some());
    }

    #[test]
    fn token_usage_defaults_missing_fields() {
        let u: TokenUsage = serde_json::from_str(r#"{"input_tokens": 7}"#).unwrap();
        assert_eq!(u, usage(7, 0));
    }
}
