use std::{io, mem};

#[cfg(not(any(target_os = "linux", target_os = "android")))]
use libc::CLOCK_MONOTONIC as RAW_CLOCK_ID;
#[cfg(any(target_os = "linux", target_os = "android"))]
use libc::CLOCK_MONOTONIC_RAW as RAW_CLOCK_ID;
use libc::timespec;

use crate::pal::unix::Bindings;

/// FFI bindings that target the real operating system that the build is targeting.
///
/// You would only use different bindings in PAL unit tests that need to use mock bindings.
/// Even then, whenever possible, unit tests should use real bindings for maximum realism.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetBindings;

impl Bindings for BuildTargetBindings {
    /// Reads `CLOCK_MONOTONIC_RAW`, which is not subject to NTP frequency adjustments.
    ///
    /// Unix systems without a raw monotonic clock use `CLOCK_MONOTONIC` instead.
    fn clock_gettime_monotonic_raw(&self) -> io::Result<timespec> {
        // SAFETY: All-zero is a valid initial value for this type.
        let mut ts: timespec = unsafe { mem::zeroed() };

        // SAFETY: We are passing valid arguments, no other safety requirements.
        let result = unsafe { libc::clock_gettime(RAW_CLOCK_ID, &raw mut ts) };

        if result != 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(ts)
    }
}
