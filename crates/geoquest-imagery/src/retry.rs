//! Back-off between transient oracle failures.
//!
//! A transient failure still consumes a sampler attempt; the delay only keeps
//! a struggling oracle from being hammered while it recovers.

use std::time::Duration;

const MAX_DELAY_MS: u64 = 10_000;

/// Delay before the next draw after `consecutive` transient failures in a row.
///
/// `backoff_base_ms × 2^(consecutive - 1)`, capped at 10 s, with ±25 % jitter.
/// A zero base disables the delay.
pub(crate) fn backoff_delay(consecutive: u32, backoff_base_ms: u64) -> Duration {
    if backoff_base_ms == 0 || consecutive == 0 {
        return Duration::ZERO;
    }
    let computed = backoff_base_ms.saturating_mul(1u64 << (consecutive - 1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    Duration::from_millis(delay_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_base_disables_delay() {
        assert_eq!(backoff_delay(5, 0), Duration::ZERO);
    }

    #[test]
    fn no_failures_means_no_delay() {
        assert_eq!(backoff_delay(0, 250), Duration::ZERO);
    }

    #[test]
    fn first_retry_is_base_with_jitter() {
        let d = backoff_delay(1, 1_000).as_millis();
        assert!((750..=1_250).contains(&d), "got {d}ms");
    }

    #[test]
    fn delay_doubles_per_consecutive_failure() {
        let d = backoff_delay(3, 100).as_millis();
        assert!((300..=500).contains(&d), "got {d}ms");
    }

    #[test]
    fn delay_is_capped() {
        let d = backoff_delay(30, 1_000).as_millis();
        assert!(d <= 12_500, "got {d}ms");
    }
}
