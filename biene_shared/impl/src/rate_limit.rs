use std::{
    collections::HashMap,
    net::IpAddr,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use biene_shared_contracts::{
    rate_limit::{RateLimitDecision, RateLimitInfo, RateLimitService},
    time::TimeService,
};
use biene_utils::trace_instrument;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Expired records are only swept once this many clients are tracked.
const SWEEP_THRESHOLD: usize = 4096;

/// Fixed window request counter keyed by client ip.
///
/// Counters live in memory only, so they reset whenever the process restarts
/// and are not shared between multiple instances.
#[derive(Debug, Clone)]
pub struct RateLimitServiceImpl<Time> {
    time: Time,
    config: RateLimitConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Length of a single window
    pub window: Duration,
    /// Maximum number of requests per client and window
    pub max: u64,
    /// Clients that are never limited
    pub whitelist: Arc<[IpAddr]>,
}

#[derive(Debug, Default)]
struct State {
    records: Mutex<HashMap<IpAddr, RateLimitRecord>>,
}

#[derive(Debug, Clone, Copy)]
struct RateLimitRecord {
    count: u64,
    window_start: DateTime<Utc>,
}

impl RateLimitRecord {
    fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.window_start).to_std().unwrap_or_default()
    }

    fn is_expired(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.elapsed(now) >= window
    }
}

impl<Time> RateLimitServiceImpl<Time> {
    pub fn new(time: Time, config: RateLimitConfig) -> Self {
        Self {
            time,
            config,
            state: Default::default(),
        }
    }
}

impl<Time> RateLimitService for RateLimitServiceImpl<Time>
where
    Time: TimeService,
{
    #[trace_instrument(skip(self))]
    fn check(&self, client: IpAddr) -> RateLimitDecision {
        if self.config.whitelist.contains(&client) {
            return RateLimitDecision::Exempt;
        }

        let now = self.time.now();
        let window = self.config.window;

        let mut records = self
            .state
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if records.len() >= SWEEP_THRESHOLD && !records.contains_key(&client) {
            let before = records.len();
            records.retain(|_, record| !record.is_expired(now, window));
            debug!(
                removed = before - records.len(),
                "swept expired rate limit records"
            );
        }

        let record = records
            .entry(client)
            .and_modify(|record| {
                if record.is_expired(now, window) {
                    *record = RateLimitRecord {
                        count: 0,
                        window_start: now,
                    };
                }
            })
            .or_insert(RateLimitRecord {
                count: 0,
                window_start: now,
            });

        record.count = record.count.saturating_add(1);

        let info = RateLimitInfo {
            limit: self.config.max,
            remaining: self.config.max.saturating_sub(record.count),
            reset_after: window.saturating_sub(record.elapsed(now)),
        };

        if record.count > self.config.max {
            RateLimitDecision::Limited(info)
        } else {
            RateLimitDecision::Allowed(info)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use biene_shared_contracts::time::MockTimeService;
    use chrono::{TimeDelta, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;

    const CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));
    const OTHER_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 8));

    #[derive(Clone)]
    struct Clock(Arc<Mutex<DateTime<Utc>>>);

    impl Clock {
        fn new() -> Self {
            Self(Arc::new(Mutex::new(
                Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            )))
        }

        fn advance(&self, duration: Duration) {
            *self.0.lock().unwrap() += TimeDelta::from_std(duration).unwrap();
        }

        fn time_service(&self) -> MockTimeService {
            let clock = self.clone();
            let mut time = MockTimeService::new();
            time.expect_now().returning(move || *clock.0.lock().unwrap());
            time
        }
    }

    fn sut(clock: &Clock, whitelist: &[IpAddr]) -> RateLimitServiceImpl<MockTimeService> {
        RateLimitServiceImpl::new(
            clock.time_service(),
            RateLimitConfig {
                window: Duration::from_secs(60),
                max: 5,
                whitelist: whitelist.into(),
            },
        )
    }

    #[test]
    fn sixth_request_is_limited() {
        // Arrange
        let clock = Clock::new();
        let sut = sut(&clock, &[]);

        // Act
        let results = (0..6).map(|_| sut.check(CLIENT)).collect::<Vec<_>>();

        // Assert
        for (i, result) in results[..5].iter().enumerate() {
            assert_eq!(
                *result,
                RateLimitDecision::Allowed(RateLimitInfo {
                    limit: 5,
                    remaining: 4 - i as u64,
                    reset_after: Duration::from_secs(60),
                })
            );
        }
        assert_eq!(
            results[5],
            RateLimitDecision::Limited(RateLimitInfo {
                limit: 5,
                remaining: 0,
                reset_after: Duration::from_secs(60),
            })
        );
    }

    #[test]
    fn window_elapses() {
        // Arrange
        let clock = Clock::new();
        let sut = sut(&clock, &[]);
        for _ in 0..6 {
            sut.check(CLIENT);
        }

        // Act
        clock.advance(Duration::from_secs(59));
        let still_limited = sut.check(CLIENT);
        clock.advance(Duration::from_secs(1));
        let allowed_again = sut.check(CLIENT);

        // Assert
        assert_eq!(
            still_limited,
            RateLimitDecision::Limited(RateLimitInfo {
                limit: 5,
                remaining: 0,
                reset_after: Duration::from_secs(1),
            })
        );
        assert_eq!(
            allowed_again,
            RateLimitDecision::Allowed(RateLimitInfo {
                limit: 5,
                remaining: 4,
                reset_after: Duration::from_secs(60),
            })
        );
    }

    #[test]
    fn clients_are_counted_separately() {
        // Arrange
        let clock = Clock::new();
        let sut = sut(&clock, &[]);
        for _ in 0..6 {
            sut.check(CLIENT);
        }

        // Act
        let result = sut.check(OTHER_CLIENT);

        // Assert
        assert!(matches!(result, RateLimitDecision::Allowed(info) if info.remaining == 4));
    }

    #[test]
    fn whitelisted_client_is_exempt() {
        // Arrange
        let clock = Clock::new();
        let sut = sut(&clock, &[CLIENT]);

        // Act
        let results = (0..10).map(|_| sut.check(CLIENT)).collect::<Vec<_>>();

        // Assert
        assert!(results.iter().all(|r| *r == RateLimitDecision::Exempt));
    }

    #[test]
    fn expired_records_are_swept() {
        // Arrange
        let clock = Clock::new();
        let sut = sut(&clock, &[]);
        for i in 0..SWEEP_THRESHOLD as u32 {
            sut.check(IpAddr::V4(Ipv4Addr::from(i)));
        }
        clock.advance(Duration::from_secs(61));

        // Act
        sut.check(CLIENT);

        // Assert
        assert_eq!(sut.state.records.lock().unwrap().len(), 1);
    }
}
