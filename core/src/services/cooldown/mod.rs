//! Cooldown policy: a pure mapping from attempt ordinals to mandatory wait
//! periods.
//!
//! The schedule is indexed by the upcoming attempt's 1-based ordinal and is
//! driven by the attempt ledger (not by a rolling send window): the first
//! two attempts are free, then the wait escalates to a flat one-hour cap.

use chrono::{DateTime, Duration, Utc};

/// Escalating backoff schedule over ledger attempts
#[derive(Debug, Clone, Copy, Default)]
pub struct CooldownPolicy;

impl CooldownPolicy {
    /// Mandatory wait in seconds before attempt number `attempt_number`
    /// (1-indexed) may proceed.
    pub fn required_wait_seconds(attempt_number: u32) -> u64 {
        match attempt_number {
            0 | 1 | 2 => 0,
            3 => 90,
            4 => 180,
            5 => 300,
            6 => 600,
            7 => 1800,
            _ => 3600,
        }
    }

    /// Whether the pair is still inside the wait window for its next attempt
    pub fn is_blocked(last_attempt_at: Option<DateTime<Utc>>, attempt_count: u32) -> bool {
        Self::remaining_wait_seconds(last_attempt_at, attempt_count, Utc::now()) > 0
    }

    /// Seconds left before the next attempt (`attempt_count + 1`) is allowed;
    /// zero when no wait applies.
    pub fn remaining_wait_seconds(
        last_attempt_at: Option<DateTime<Utc>>,
        attempt_count: u32,
        now: DateTime<Utc>,
    ) -> u64 {
        let Some(last) = last_attempt_at else {
            return 0;
        };
        let wait = Self::required_wait_seconds(attempt_count + 1);
        if wait == 0 {
            return 0;
        }
        let deadline = last + Duration::seconds(wait as i64);
        if now >= deadline {
            0
        } else {
            (deadline - now).num_seconds().max(1) as u64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_escalates_to_flat_cap() {
        assert_eq!(CooldownPolicy::required_wait_seconds(1), 0);
        assert_eq!(CooldownPolicy::required_wait_seconds(2), 0);
        assert_eq!(CooldownPolicy::required_wait_seconds(3), 90);
        assert_eq!(CooldownPolicy::required_wait_seconds(4), 180);
        assert_eq!(CooldownPolicy::required_wait_seconds(5), 300);
        assert_eq!(CooldownPolicy::required_wait_seconds(6), 600);
        assert_eq!(CooldownPolicy::required_wait_seconds(7), 1800);
        assert_eq!(CooldownPolicy::required_wait_seconds(8), 3600);
        assert_eq!(CooldownPolicy::required_wait_seconds(99), 3600);
    }

    #[test]
    fn no_history_means_no_wait() {
        assert_eq!(CooldownPolicy::remaining_wait_seconds(None, 5, Utc::now()), 0);
        assert!(!CooldownPolicy::is_blocked(None, 5));
    }

    #[test]
    fn first_two_attempts_are_free() {
        let just_now = Some(Utc::now());
        assert!(!CooldownPolicy::is_blocked(just_now, 0));
        assert!(!CooldownPolicy::is_blocked(just_now, 1));
    }

    #[test]
    fn third_attempt_waits_ninety_seconds() {
        let now = Utc::now();
        let last = Some(now - Duration::seconds(30));
        let remaining = CooldownPolicy::remaining_wait_seconds(last, 2, now);
        assert!(remaining > 0 && remaining <= 60);
    }

    #[test]
    fn wait_clears_after_deadline() {
        let now = Utc::now();
        let last = Some(now - Duration::seconds(91));
        assert_eq!(CooldownPolicy::remaining_wait_seconds(last, 2, now), 0);

        let last = Some(now - Duration::seconds(3601));
        assert_eq!(CooldownPolicy::remaining_wait_seconds(last, 20, now), 0);
    }
}
