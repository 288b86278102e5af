//! Rolling usage counter over a fixed time window.

use chrono::{DateTime, Duration, Utc};

/// Count and spend of transactions inside the current window.
///
/// A fresh accumulator has no window yet (`period_ends_at` is `None`); the
/// first evaluation opens one at its own time, whatever that time is.
///
/// Expiry is lazy: nothing happens when the window ends. The owner must call
/// [`Accumulator::refreshed`] (or [`Accumulator::rebuild`]) with the
/// evaluation time before adding spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accumulator {
    window: Duration,
    period_used: i64,
    period_spend: i64,
    period_ends_at: Option<DateTime<Utc>>,
}

impl Accumulator {
    /// Empty accumulator with no window opened yet.
    pub fn zeroed(window: Duration) -> Self {
        Self {
            window,
            period_used: 0,
            period_spend: 0,
            period_ends_at: None,
        }
    }

    /// Rebuild an accumulator from its stored parts as seen at `now`.
    ///
    /// If no window is open, or `now` is strictly after `period_ends_at`,
    /// the stored usage is discarded and a new window ending at
    /// `now + window` starts. The end instant itself still belongs to the
    /// old window.
    pub fn rebuild(
        now: DateTime<Utc>,
        window: Duration,
        period_used: i64,
        period_spend: i64,
        period_ends_at: Option<DateTime<Utc>>,
    ) -> Self {
        match period_ends_at {
            Some(ends_at) if now <= ends_at => Self {
                window,
                period_used,
                period_spend,
                period_ends_at,
            },
            _ => Self {
                window,
                period_used: 0,
                period_spend: 0,
                period_ends_at: Some(
                    now.checked_add_signed(window)
                        .unwrap_or(DateTime::<Utc>::MAX_UTC),
                ),
            },
        }
    }

    /// This accumulator as seen at `now`.
    pub fn refreshed(self, now: DateTime<Utc>) -> Self {
        Self::rebuild(
            now,
            self.window,
            self.period_used,
            self.period_spend,
            self.period_ends_at,
        )
    }

    /// Record one more use of `amount`. Has no notion of expiry.
    pub fn add_spend(&mut self, amount: i64) {
        self.period_spend = self.period_spend.saturating_add(amount);
        self.period_used = self.period_used.saturating_add(1);
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn period_used(&self) -> i64 {
        self.period_used
    }

    pub fn period_spend(&self) -> i64 {
        self.period_spend
    }

    pub fn period_ends_at(&self) -> Option<DateTime<Utc>> {
        self.period_ends_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 2, 13, h, m, s).unwrap()
    }

    #[test]
    fn add_spend_counts_and_sums() {
        let mut acc = Accumulator::zeroed(Duration::minutes(2));
        acc.add_spend(20);
        acc.add_spend(15);

        assert_eq!(acc.period_used(), 2);
        assert_eq!(acc.period_spend(), 35);
    }

    #[test]
    fn rebuild_keeps_usage_before_window_end() {
        let ends = at(11, 2, 0);
        let acc = Accumulator::rebuild(at(11, 1, 0), Duration::minutes(2), 3, 60, Some(ends));

        assert_eq!(acc.period_used(), 3);
        assert_eq!(acc.period_spend(), 60);
        assert_eq!(acc.period_ends_at(), Some(ends));
    }

    #[test]
    fn rebuild_at_exact_end_is_not_expired() {
        let ends = at(11, 2, 0);
        let acc = Accumulator::rebuild(ends, Duration::minutes(2), 3, 60, Some(ends));

        assert_eq!(acc.period_used(), 3);
        assert_eq!(acc.period_ends_at(), Some(ends));
    }

    #[test]
    fn rebuild_after_window_end_resets() {
        let now = at(11, 2, 1);
        let acc = Accumulator::rebuild(now, Duration::minutes(2), 3, 60, Some(at(11, 2, 0)));

        assert_eq!(acc.period_used(), 0);
        assert_eq!(acc.period_spend(), 0);
        assert_eq!(acc.period_ends_at(), Some(now + Duration::minutes(2)));
    }

    #[test]
    fn zeroed_accumulator_opens_window_on_first_refresh() {
        let now = at(11, 0, 0);
        let acc = Accumulator::zeroed(Duration::minutes(2)).refreshed(now);

        assert_eq!(acc.period_used(), 0);
        assert_eq!(acc.period_ends_at(), Some(at(11, 2, 0)));
    }

    #[test]
    fn first_window_opens_for_pre_epoch_times() {
        let mut acc = Accumulator::zeroed(Duration::minutes(2));

        for year in 1960..1964 {
            let now = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap();
            acc = acc.refreshed(now);
            acc.add_spend(1);

            assert_eq!(acc.period_used(), 1);
            assert_eq!(acc.period_ends_at(), Some(now + Duration::minutes(2)));
        }
    }

    #[test]
    fn first_window_opens_at_the_earliest_representable_time() {
        let now = DateTime::<Utc>::MIN_UTC;
        let acc = Accumulator::rebuild(now, Duration::minutes(2), 7, 70, None);

        assert_eq!(acc.period_used(), 0);
        assert_eq!(acc.period_spend(), 0);
        assert_eq!(acc.period_ends_at(), Some(now + Duration::minutes(2)));
    }

    proptest! {
        /// Window reset law: expired windows reset before any new spend,
        /// live windows are returned untouched.
        #[test]
        fn window_reset_law(
            used in 0i64..1_000,
            spend in 0i64..1_000_000,
            window_secs in 1i64..3_600,
            offset_secs in -7_200i64..7_200,
        ) {
            let ends = at(12, 0, 0);
            let now = ends + Duration::seconds(offset_secs);
            let window = Duration::seconds(window_secs);

            let acc = Accumulator::rebuild(now, window, used, spend, Some(ends));

            if now > ends {
                prop_assert_eq!(acc.period_used(), 0);
                prop_assert_eq!(acc.period_spend(), 0);
                prop_assert_eq!(acc.period_ends_at(), Some(now + window));
            } else {
                prop_assert_eq!(acc.period_used(), used);
                prop_assert_eq!(acc.period_spend(), spend);
                prop_assert_eq!(acc.period_ends_at(), Some(ends));
            }
            prop_assert_eq!(acc.window(), window);
        }
    }
}
