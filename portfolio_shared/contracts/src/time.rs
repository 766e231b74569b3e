use chrono::{DateTime, Utc};

/// Source of the current time, mocked in tests.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TimeService: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg(feature = "mock")]
impl MockTimeService {
    /// Expect exactly one call returning `time`.
    pub fn with_now(self, time: DateTime<Utc>) -> Self {
        self.with_now_sequence([time])
    }

    /// Expect one call per element of `times`, answered in order.
    pub fn with_now_sequence(mut self, times: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        let mut seq = mockall::Sequence::new();
        for time in times {
            self.expect_now()
                .once()
                .in_sequence(&mut seq)
                .return_const(time);
        }
        self
    }
}
