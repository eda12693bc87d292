use std::{net::IpAddr, time::Duration};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RateLimitService: Send + Sync + 'static {
    /// Count a request from `client` against its current window.
    fn check(&self, client: IpAddr) -> RateLimitDecision;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The client is on the allowlist and is not counted.
    Exempt,
    Allowed(RateLimitInfo),
    Limited(RateLimitInfo),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Maximum number of requests per window
    pub limit: u64,
    /// Requests left in the current window
    pub remaining: u64,
    /// Time until the current window ends
    pub reset_after: Duration,
}

#[cfg(feature = "mock")]
impl MockRateLimitService {
    pub fn with_check(mut self, client: IpAddr, result: RateLimitDecision) -> Self {
        self.expect_check()
            .once()
            .with(mockall::predicate::eq(client))
            .return_const(result);
        self
    }
}
