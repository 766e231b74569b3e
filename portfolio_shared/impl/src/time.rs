use chrono::{DateTime, Utc};
use portfolio_di::Build;
use portfolio_shared_contracts::time::TimeService;
use portfolio_utils::trace_instrument;

#[derive(Debug, Clone, Copy, Build)]
pub struct TimeServiceImpl;

impl TimeService for TimeServiceImpl {
    #[trace_instrument(skip(self))]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_current() {
        let before = Utc::now();
        let now = TimeServiceImpl.now();
        let after = Utc::now();

        assert!(before <= now && now <= after);
    }
}
