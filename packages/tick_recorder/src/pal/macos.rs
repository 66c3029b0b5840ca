use std::io;
use std::marker::PhantomData;

use crate::ClockMode;
use crate::pal::{Platform, TimeSource};

pub(crate) const BUILD_TARGET_MODE: ClockMode = ClockMode::MachAbsolute;

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform::new();

#[derive(Debug)]
pub(crate) struct BuildTargetPlatform {
    _placeholder: PhantomData<()>,
}

impl BuildTargetPlatform {
    // Only executed in const context.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub(crate) const fn new() -> Self {
        Self {
            _placeholder: PhantomData,
        }
    }
}

impl Platform for BuildTargetPlatform {
    type TimeSource = TimeSourceImpl;

    fn new_time_source(&self) -> Self::TimeSource {
        TimeSourceImpl
    }
}

/// Hands out raw `mach_absolute_time` ticks. Converting them to nanoseconds would need
/// `mach_timebase_info`, which we leave to the caller.
#[derive(Debug)]
pub(crate) struct TimeSourceImpl;

impl TimeSource for TimeSourceImpl {
    #[allow(
        deprecated,
        reason = "libc points at the mach2 package for this but the call itself is stable"
    )]
    fn now(&self) -> io::Result<u64> {
        // SAFETY: No safety requirements, the call cannot fail.
        Ok(unsafe { libc::mach_absolute_time() })
    }

    fn mode(&self) -> ClockMode {
        BUILD_TARGET_MODE
    }
}
