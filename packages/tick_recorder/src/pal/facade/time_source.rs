use std::fmt::Debug;
use std::io;
#[cfg(test)]
use std::sync::Arc;

use crate::ClockMode;
#[cfg(test)]
use crate::pal::MockTimeSource;
use crate::pal::{TimeSource, TimeSourceImpl};

pub(crate) enum TimeSourceFacade {
    Real(TimeSourceImpl),

    #[cfg(test)]
    Mock(Arc<MockTimeSource>),
}

impl From<TimeSourceImpl> for TimeSourceFacade {
    fn from(ts: TimeSourceImpl) -> Self {
        Self::Real(ts)
    }
}

#[cfg(test)]
impl From<MockTimeSource> for TimeSourceFacade {
    fn from(ts: MockTimeSource) -> Self {
        Self::Mock(Arc::new(ts))
    }
}

impl TimeSource for TimeSourceFacade {
    fn now(&self) -> io::Result<u64> {
        match self {
            Self::Real(ts) => ts.now(),
            #[cfg(test)]
            Self::Mock(ts) => ts.now(),
        }
    }

    fn mode(&self) -> ClockMode {
        match self {
            Self::Real(ts) => ts.mode(),
            #[cfg(test)]
            Self::Mock(ts) => ts.mode(),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))] // No API contract to test.
impl Debug for TimeSourceFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Real(ts) => ts.fmt(f),
            #[cfg(test)]
            Self::Mock(ts) => ts.fmt(f),
        }
    }
}
