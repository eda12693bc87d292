use biene_shared_contracts::time::TimeService;
use biene_utils::trace_instrument;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeServiceImpl;

impl TimeService for TimeServiceImpl {
    #[trace_instrument(skip(self))]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
