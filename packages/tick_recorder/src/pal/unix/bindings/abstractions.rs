use std::fmt::Debug;
use std::io;

use libc::timespec;

/// Bindings for FFI calls into external libraries (either provided by operating system or not).
///
/// All PAL FFI calls must go through this trait, enabling them to be mocked.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Bindings: Debug + Send + Sync + 'static {
    /// Reads the raw monotonic clock, returning the OS error if the call fails.
    fn clock_gettime_monotonic_raw(&self) -> io::Result<timespec>;
}
