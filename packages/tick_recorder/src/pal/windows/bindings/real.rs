use std::io;

use windows::Win32::System::Performance::QueryPerformanceCounter;

use crate::pal::windows::Bindings;

/// FFI bindings that target the real operating system that the build is targeting.
///
/// You would only use different bindings in PAL unit tests that need to use mock bindings.
/// Even then, whenever possible, unit tests should use real bindings for maximum realism.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetBindings;

impl Bindings for BuildTargetBindings {
    fn query_performance_counter(&self) -> io::Result<i64> {
        let mut counter: i64 = 0;

        // SAFETY: We are passing a valid pointer to a local, no other safety requirements.
        unsafe { QueryPerformanceCounter(&raw mut counter) }.map_err(io::Error::from)?;

        Ok(counter)
    }
}
