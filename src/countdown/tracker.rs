//! Remaining-time calculation
//!
//! Given how much time was left when the countdown was (re)started and the
//! instant it was started at, work out what is left now. The exact value
//! drives expiry; the display value is rounded up to whole seconds so the
//! shown count never undershoots.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

/// Exact and display remaining time for one observation of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Remaining {
    pub exact: Duration,
    pub display: Duration,
}

impl Remaining {
    /// Both values are zero
    pub const ZERO: Remaining = Remaining {
        exact: Duration::ZERO,
        display: Duration::ZERO,
    };

    /// Remaining time for a countdown that is not running
    pub fn frozen(remaining: Duration) -> Self {
        Self {
            exact: remaining,
            display: round_up_to_second(remaining),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.exact.is_zero()
    }
}

/// Compute the remaining time of a countdown.
///
/// Returns `None` when `started_at` is absent; the caller already holds the
/// frozen value in that case. A `now` earlier than `started_at` counts as no
/// elapsed time, so the countdown never appears to go up.
pub fn compute_remaining(
    remaining: Duration,
    started_at: Option<Instant>,
    now: Instant,
) -> Option<Remaining> {
    let started_at = started_at?;
    let elapsed = now.saturating_duration_since(started_at);

    match remaining.checked_sub(elapsed) {
        Some(exact) if !exact.is_zero() => Some(Remaining {
            exact,
            display: round_up_to_second(exact),
        }),
        _ => Some(Remaining::ZERO),
    }
}

/// Round a duration up to the next whole second when it has a fractional part
pub fn round_up_to_second(duration: Duration) -> Duration {
    if duration.subsec_nanos() == 0 {
        duration
    } else {
        Duration::from_secs(duration.as_secs() + 1)
    }
}

/// Render a duration as `m:ss`, dropping any sub-second part
pub fn format_clock(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn not_started_computes_nothing() {
        let now = Instant::now();
        assert_eq!(compute_remaining(ms(5_000), None, now), None);
    }

    #[test]
    fn subtracts_elapsed_and_rounds_display_up() {
        let start = Instant::now();
        let remaining = compute_remaining(ms(3_000), Some(start), start + ms(2_500)).unwrap();
        assert_eq!(remaining.exact, ms(500));
        assert_eq!(remaining.display, ms(1_000));
    }

    #[test]
    fn whole_seconds_are_not_rounded() {
        let start = Instant::now();
        let remaining = compute_remaining(ms(10_000), Some(start), start + ms(4_000)).unwrap();
        assert_eq!(remaining.exact, ms(6_000));
        assert_eq!(remaining.display, ms(6_000));
    }

    #[test]
    fn one_millisecond_left_still_shows_a_second() {
        let start = Instant::now();
        let remaining = compute_remaining(ms(1_000), Some(start), start + ms(999)).unwrap();
        assert_eq!(remaining.exact, ms(1));
        assert_eq!(remaining.display, ms(1_000));
    }

    #[test]
    fn elapsed_past_the_end_clamps_to_zero() {
        let start = Instant::now();
        for overshoot in [0, 1, 100, 60_000] {
            let now = start + ms(3_000 + overshoot);
            assert_eq!(
                compute_remaining(ms(3_000), Some(start), now),
                Some(Remaining::ZERO)
            );
        }
    }

    #[test]
    fn exact_and_display_over_a_range_of_elapsed_times() {
        let start = Instant::now();
        let total = ms(90_000);
        for elapsed in (0..=90_000).step_by(250) {
            let remaining = compute_remaining(total, Some(start), start + ms(elapsed)).unwrap();
            let expected = 90_000 - elapsed;
            assert_eq!(remaining.exact, ms(expected));
            assert_eq!(remaining.display.as_millis() as u64, expected.div_ceil(1_000) * 1_000);
            assert!(remaining.display >= remaining.exact);
        }
    }

    #[test]
    fn clock_earlier_than_start_counts_as_no_elapsed_time() {
        let now = Instant::now();
        let start = now + ms(700);
        let remaining = compute_remaining(ms(2_000), Some(start), now).unwrap();
        assert_eq!(remaining.exact, ms(2_000));
    }

    #[test]
    fn frozen_values_round_the_same_way() {
        let frozen = Remaining::frozen(ms(9_400));
        assert_eq!(frozen.exact, ms(9_400));
        assert_eq!(frozen.display, ms(10_000));
        assert!(Remaining::frozen(Duration::ZERO).is_zero());
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(Duration::ZERO), "0:00");
        assert_eq!(format_clock(ms(3_000)), "0:03");
        assert_eq!(format_clock(ms(1_500_000)), "25:00");
        assert_eq!(format_clock(ms(3_599_999)), "59:59");
    }
}
