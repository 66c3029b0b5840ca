use std::fmt::Debug;
use std::io;

use crate::ClockMode;

pub(crate) trait Platform: Debug + Send + Sync + 'static {
    type TimeSource: TimeSource;

    fn new_time_source(&self) -> Self::TimeSource;
}

#[cfg_attr(test, mockall::automock)]
pub(crate) trait TimeSource: Debug + Send + Sync {
    /// Reads the current tick. Successive reads never go backwards.
    fn now(&self) -> io::Result<u64>;

    fn mode(&self) -> ClockMode;
}
