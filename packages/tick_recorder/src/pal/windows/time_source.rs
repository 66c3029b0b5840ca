use std::io;

use crate::ClockMode;
use crate::pal::TimeSource;
use crate::pal::windows::{Bindings, BindingsFacade};

pub(crate) const BUILD_TARGET_MODE: ClockMode = ClockMode::NativeHighResCounter;

/// Reads the performance counter as-is. The counter frequency only matters for converting ticks
/// into seconds, which we leave to the caller.
#[derive(Debug)]
pub(crate) struct TimeSourceImpl {
    bindings: BindingsFacade,
}

impl TimeSourceImpl {
    pub(crate) const fn new(bindings: BindingsFacade) -> Self {
        Self { bindings }
    }
}

impl TimeSource for TimeSourceImpl {
    fn now(&self) -> io::Result<u64> {
        let counter = self.bindings.query_performance_counter()?;

        u64::try_from(counter).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn mode(&self) -> ClockMode {
        BUILD_TARGET_MODE
    }
}
