use std::io;

use libc::timespec;

use crate::ClockMode;
use crate::pal::TimeSource;
use crate::pal::unix::{Bindings, BindingsFacade};

pub(crate) const BUILD_TARGET_MODE: ClockMode = ClockMode::PosixMonotonicRaw;

const NANOS_PER_SEC: u64 = 1_000_000_000;

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
        let ts = self.bindings.clock_gettime_monotonic_raw()?;

        timespec_to_nanos(&ts)
    }

    fn mode(&self) -> ClockMode {
        BUILD_TARGET_MODE
    }
}

/// Flattens the timespec into a single nanosecond count.
///
/// The OS never hands out negative components for a monotonic clock and a `u64` holds
/// about 584 years of nanoseconds, so failure here means the platform is misbehaving.
fn timespec_to_nanos(ts: &timespec) -> io::Result<u64> {
    u64::try_from(ts.tv_sec)
        .ok()
        .and_then(|secs| secs.checked_mul(NANOS_PER_SEC))
        .zip(u64::try_from(ts.tv_nsec).ok())
        .and_then(|(secs_as_nanos, nanos)| secs_as_nanos.checked_add(nanos))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "monotonic clock returned an unrepresentable timestamp ({} s, {} ns)",
                    ts.tv_sec, ts.tv_nsec
                ),
            )
        })
}
