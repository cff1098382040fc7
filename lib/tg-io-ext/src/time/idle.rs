/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Periodic ticker used by relay loops to detect silent connections
pub struct IdleInterval {
    period: Duration,
    interval: Interval,
}

impl IdleInterval {
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        IdleInterval { period, interval }
    }

    /// Wait for the next tick, returning the number of elapsed periods
    pub async fn tick(&mut self) -> usize {
        let scheduled = self.interval.tick().await;
        let late = Instant::now().saturating_duration_since(scheduled);
        1 + (late.as_nanos() / self.period.as_nanos()) as usize
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }
}
