//! Generic backend for targets without a dedicated tick source, and for Miri.

use std::io;
use std::sync::LazyLock;
use std::time::Instant;

use crate::ClockMode;
use crate::pal::{Platform, TimeSource};

pub(crate) const BUILD_TARGET_MODE: ClockMode = ClockMode::GenericMonotonicFallback;

/// `Instant` has no accessible numeric value, so ticks are nanoseconds since this anchor.
static ANCHOR: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform;

#[derive(Debug)]
pub(crate) struct BuildTargetPlatform;

impl Platform for BuildTargetPlatform {
    type TimeSource = TimeSourceImpl;

    fn new_time_source(&self) -> Self::TimeSource {
        TimeSourceImpl
    }
}

#[derive(Debug)]
pub(crate) struct TimeSourceImpl;

impl TimeSource for TimeSourceImpl {
    fn now(&self) -> io::Result<u64> {
        let elapsed = ANCHOR.elapsed().as_nanos();

        u64::try_from(elapsed).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn mode(&self) -> ClockMode {
        BUILD_TARGET_MODE
    }
}
