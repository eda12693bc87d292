use std::{sync::Arc, time::Duration};

use biene_core_health_contracts::{HealthFeatureService, HealthStatus};
use biene_email_contracts::EmailService;
use biene_shared_contracts::time::TimeService;
use biene_utils::trace_instrument;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::error;

/// Pings the smtp server at most once per `cache_ttl`.
#[derive(Debug, Clone)]
pub struct HealthFeatureServiceImpl<Time, Email> {
    time: Time,
    email: Email,
    config: HealthFeatureConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthFeatureConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Default)]
struct State {
    cache: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    status: HealthStatus,
    timestamp: DateTime<Utc>,
}

impl CachedStatus {
    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now < self.timestamp + ttl
    }
}

impl<Time, Email> HealthFeatureServiceImpl<Time, Email> {
    pub fn new(time: Time, email: Email, config: HealthFeatureConfig) -> Self {
        Self {
            time,
            email,
            config,
            state: Default::default(),
        }
    }
}

impl<Time, Email> HealthFeatureService for HealthFeatureServiceImpl<Time, Email>
where
    Time: TimeService,
    Email: EmailService,
{
    #[trace_instrument(skip(self))]
    async fn get_status(&self) -> HealthStatus {
        let now = self.time.now();
        let ttl = self.config.cache_ttl;

        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard.as_ref().filter(|c| c.is_fresh(now, ttl)) {
            return cached.status;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard.as_ref().filter(|c| c.is_fresh(now, ttl)) {
            return cached.status;
        }

        let email = self
            .email
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping smtp server: {err}"))
            .is_ok();

        cache_guard
            .insert(CachedStatus {
                status: HealthStatus { email },
                timestamp: now,
            })
            .status
    }
}

#[cfg(test)]
mod tests {
    use biene_email_contracts::MockEmailService;
    use biene_shared_contracts::time::MockTimeService;
    use chrono::{TimeDelta, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;

    fn sut(
        time: MockTimeService,
        email: MockEmailService,
    ) -> HealthFeatureServiceImpl<MockTimeService, MockEmailService> {
        HealthFeatureServiceImpl::new(
            time,
            email,
            HealthFeatureConfig {
                cache_ttl: Duration::from_secs(10),
            },
        )
    }

    #[tokio::test]
    async fn reachable() {
        // Arrange
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let time = MockTimeService::new().with_now(now);
        let email = MockEmailService::new().with_ping(true);
        let sut = sut(time, email);

        // Act
        let result = sut.get_status().await;

        // Assert
        assert_eq!(result, HealthStatus { email: true });
    }

    #[tokio::test]
    async fn unreachable() {
        // Arrange
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let time = MockTimeService::new().with_now(now);
        let email = MockEmailService::new().with_ping(false);
        let sut = sut(time, email);

        // Act
        let result = sut.get_status().await;

        // Assert
        assert_eq!(result, HealthStatus { email: false });
    }

    #[tokio::test]
    async fn cached() {
        // Arrange
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut time = MockTimeService::new();
        let mut seq = mockall::Sequence::new();
        for offset in [0, 9, 10] {
            time.expect_now()
                .once()
                .in_sequence(&mut seq)
                .return_const(start + TimeDelta::seconds(offset));
        }

        let mut email = MockEmailService::new();
        let mut results = [false, true].into_iter();
        email.expect_ping().times(2).returning(move || {
            let ok = results.next().unwrap_or_default();
            Box::pin(std::future::ready(if ok {
                Ok(())
            } else {
                Err(anyhow::anyhow!("connection refused"))
            }))
        });

        let sut = sut(time, email);

        // Act
        let first = sut.get_status().await;
        let cached = sut.get_status().await;
        let refreshed = sut.get_status().await;

        // Assert
        assert_eq!(first, HealthStatus { email: false });
        assert_eq!(cached, HealthStatus { email: false });
        assert_eq!(refreshed, HealthStatus { email: true });
    }
}
