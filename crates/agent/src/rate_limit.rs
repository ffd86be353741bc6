//! Per-client fixed-window rate governor.
//!
//! Every identity gets `limit` requests per window. The window opens on the
//! identity's first request and closes at a fixed instant; requests after that
//! instant open a fresh window. Rejected requests never move the reset time.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

/// The key requests are counted under.
///
/// Derived from the first entry of `X-Forwarded-For`. Requests without that
/// header all share the [`ClientIdentity::UNKNOWN`] bucket, so anonymous
/// clients compete for one budget. That degraded fairness is intentional:
/// the alternative is no limit at all for clients that hide their origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    pub const UNKNOWN: &'static str = "unknown";

    /// Identity from a raw `X-Forwarded-For` value: its first comma-separated
    /// entry, trimmed. Missing or blank values map to the shared bucket.
    pub fn from_forwarded_for(header: Option<&str>) -> Self {
        header
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(|ip| Self(ip.to_string()))
            .unwrap_or_else(Self::unknown)
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }
}

impl std::fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub allowed: bool,
    /// Requests left in the current window (0 when rejected)
    pub remaining: u32,
    pub limit: u32,
    /// When the current window closes
    pub reset_at: DateTime<Utc>,
}

impl Admission {
    /// Whole seconds until the window closes, rounded up, never below 1.
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        let millis = (self.reset_at - now).num_milliseconds();
        if millis <= 0 {
            1
        } else {
            ((millis as u64) + 999) / 1000
        }
    }

    pub fn reset_epoch_millis(&self) -> i64 {
        self.reset_at.timestamp_millis()
    }
}

#[derive(Debug, Clone, Copy)]
struct RateWindowRecord {
    count: u32,
    window_reset_at: DateTime<Utc>,
}

/// Fixed-window request counter shared by all request handlers.
///
/// One mutex guards the whole map, so the read-modify-write for an identity
/// is atomic: two concurrent requests can never both take the last slot.
/// The lock is never held across an `.await`.
pub struct RateGovernor {
    limit: u32,
    window: TimeDelta,
    max_tracked: usize,
    records: Mutex<HashMap<String, RateWindowRecord>>,
}

impl RateGovernor {
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const DEFAULT_WINDOW_MS: u64 = 60_000;

    pub fn new(limit: u32, window_ms: u64) -> Self {
        Self {
            limit,
            window: TimeDelta::milliseconds(i64::try_from(window_ms).unwrap_or(i64::MAX)),
            max_tracked: 10_000,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &outly_config::RateLimitConfig) -> Self {
        Self::new(config.limit, config.window_ms).with_max_tracked(config.max_tracked_identities)
    }

    /// Map size at which admitting a new identity first sweeps expired windows.
    pub fn with_max_tracked(mut self, max_tracked: usize) -> Self {
        self.max_tracked = max_tracked.max(1);
        self
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Admit or reject a request from `identity` now.
    pub fn admit(&self, identity: &ClientIdentity) -> Admission {
        self.admit_at(identity, Utc::now())
    }

    /// Admit or reject a request from `identity` at `now`.
    pub fn admit_at(&self, identity: &ClientIdentity, now: DateTime<Utc>) -> Admission {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());

        if records.len() >= self.max_tracked && !records.contains_key(identity.as_str()) {
            let before = records.len();
            records.retain(|_, r| now <= r.window_reset_at);
            debug!(evicted = before - records.len(), "Swept expired rate windows inline");
        }

        match records.get_mut(identity.as_str()) {
            Some(record) if now <= record.window_reset_at => {
                if record.count >= self.limit {
                    return Admission {
                        allowed: false,
                        remaining: 0,
                        limit: self.limit,
                        reset_at: record.window_reset_at,
                    };
                }
                record.count += 1;
                Admission {
                    allowed: true,
                    remaining: self.limit - record.count,
                    limit: self.limit,
                    reset_at: record.window_reset_at,
                }
            }
            _ => {
                let window_reset_at = now.checked_add_signed(self.window).unwrap_or(DateTime::<Utc>::MAX_UTC);
                records.insert(
                    identity.as_str().to_string(),
                    RateWindowRecord {
                        count: 1,
                        window_reset_at,
                    },
                );
                Admission {
                    allowed: true,
                    remaining: self.limit.saturating_sub(1),
                    limit: self.limit,
                    reset_at: window_reset_at,
                }
            }
        }
    }

    /// Drop every record whose window closed before `now`. Returns how many.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let before = records.len();
        records.retain(|_, r| now <= r.window_reset_at);
        before - records.len()
    }

    /// Number of identities currently tracked.
    pub fn tracked(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Default for RateGovernor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, Self::DEFAULT_WINDOW_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_760_000_000_000).unwrap()
    }

    fn ms(n: i64) -> TimeDelta {
        TimeDelta::milliseconds(n)
    }

    #[test]
    fn counts_down_then_rejects() {
        let governor = RateGovernor::default();
        let id = ClientIdentity::new("203.0.113.7");

        for expected in (0..20).rev() {
            let a = governor.admit_at(&id, t0() + ms(10));
            assert!(a.allowed);
            assert_eq!(a.remaining, expected);
        }

        let rejected = governor.admit_at(&id, t0() + ms(20));
        assert!(!rejected.allowed);
        assert_eq!(rejected.remaining, 0);
    }

    #[test]
    fn rejection_never_extends_window() {
        let governor = RateGovernor::new(2, 60_000);
        let id = ClientIdentity::new("a");

        let opened = governor.admit_at(&id, t0());
        governor.admit_at(&id, t0() + ms(1_000));
        for i in 0..5 {
            let rejected = governor.admit_at(&id, t0() + ms(30_000 + i * 1_000));
            assert!(!rejected.allowed);
            assert_eq!(rejected.reset_at, opened.reset_at);
        }
    }

    #[test]
    fn request_after_reset_opens_fresh_window() {
        let governor = RateGovernor::new(2, 60_000);
        let id = ClientIdentity::new("a");

        let opened = governor.admit_at(&id, t0());
        governor.admit_at(&id, t0());
        assert!(!governor.admit_at(&id, t0() + ms(60_000)).allowed);

        let fresh = governor.admit_at(&id, t0() + ms(60_001));
        assert!(fresh.allowed);
        assert_eq!(fresh.remaining, 1);
        assert_eq!(fresh.reset_at, t0() + ms(60_001) + ms(60_000));
        assert_ne!(fresh.reset_at, opened.reset_at);
    }

    #[test]
    fn identities_are_independent() {
        let governor = RateGovernor::new(1, 60_000);
        assert!(governor.admit_at(&ClientIdentity::new("a"), t0()).allowed);
        assert!(!governor.admit_at(&ClientIdentity::new("a"), t0()).allowed);
        assert!(governor.admit_at(&ClientIdentity::new("b"), t0()).allowed);
    }

    #[test]
    fn unknown_clients_share_a_bucket() {
        let governor = RateGovernor::new(1, 60_000);
        let first = ClientIdentity::from_forwarded_for(None);
        let second = ClientIdentity::from_forwarded_for(Some("  "));
        assert!(first.is_unknown() && second.is_unknown());
        assert!(governor.admit_at(&first, t0()).allowed);
        assert!(!governor.admit_at(&second, t0()).allowed);
    }

    #[test]
    fn identity_uses_first_forwarded_entry() {
        let id = ClientIdentity::from_forwarded_for(Some("198.51.100.4, 10.0.0.1, 10.0.0.2"));
        assert_eq!(id.as_str(), "198.51.100.4");
    }

    #[test]
    fn huge_window_saturates_instead_of_overflowing() {
        let governor = RateGovernor::new(2, u64::MAX);
        let id = ClientIdentity::new("192.0.2.44");

        let first = governor.admit_at(&id, t0());
        assert!(first.allowed);
        assert_eq!(first.reset_at, DateTime::<Utc>::MAX_UTC);

        assert!(governor.admit_at(&id, t0() + ms(1)).allowed);
        let rejected = governor.admit_at(&id, t0() + ms(2));
        assert!(!rejected.allowed);
        assert!(rejected.retry_after_secs(t0()) > 1);
    }

    #[test]
    fn retry_after_rounds_up() {
        let a = Admission {
            allowed: false,
            remaining: 0,
            limit: 20,
            reset_at: t0() + ms(1_500),
        };
        assert_eq!(a.retry_after_secs(t0()), 2);
        assert_eq!(a.retry_after_secs(t0() + ms(1_500)), 1);
        assert_eq!(a.retry_after_secs(t0() + ms(9_000)), 1);
        assert_eq!(a.reset_epoch_millis(), 1_760_000_001_500);
    }

    #[test]
    fn sweep_drops_only_expired_windows() {
        let governor = RateGovernor::new(5, 1_000);
        governor.admit_at(&ClientIdentity::new("old"), t0());
        governor.admit_at(&ClientIdentity::new("new"), t0() + ms(900));

        assert_eq!(governor.sweep_expired(t0() + ms(1_500)), 1);
        assert_eq!(governor.tracked(), 1);
    }

    #[test]
    fn full_map_sweeps_before_inserting() {
        let governor = RateGovernor::new(5, 1_000).with_max_tracked(2);
        governor.admit_at(&ClientIdentity::new("a"), t0());
        governor.admit_at(&ClientIdentity::new("b"), t0());

        governor.admit_at(&ClientIdentity::new("c"), t0() + ms(2_000));
        assert_eq!(governor.tracked(), 1);
    }

    #[test]
    fn concurrent_callers_never_exceed_limit() {
        let governor = Arc::new(RateGovernor::new(10, 60_000));
        let now = t0();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let governor = governor.clone();
                std::thread::spawn(move || {
                    (0..5)
                        .filter(|_| governor.admit_at(&ClientIdentity::new("shared"), now).allowed)
                        .count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 10);
    }
}
