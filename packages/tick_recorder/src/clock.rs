use std::sync::OnceLock;

use derive_more::derive::Display;

use crate::pal::{BUILD_TARGET_MODE, Platform, PlatformFacade, TimeSource, TimeSourceFacade};
use crate::{Error, Result};

/// Identifies which platform tick source the build target reads from.
///
/// The mode is decided at compile time and never changes while the process runs. Ticks from
/// different modes are not comparable with each other.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ClockMode {
    /// The Windows performance counter (`QueryPerformanceCounter`).
    #[display("native high-resolution counter")]
    NativeHighResCounter,

    /// The Mach absolute time counter on Apple platforms (`mach_absolute_time`).
    #[display("mach absolute time")]
    MachAbsolute,

    /// The POSIX raw monotonic clock, in nanoseconds.
    #[display("POSIX raw monotonic clock")]
    PosixMonotonicRaw,

    /// The Rust standard library monotonic clock, in nanoseconds since first use.
    #[display("generic monotonic clock")]
    GenericMonotonicFallback,
}

impl ClockMode {
    /// Returns the stable numeric identifier of the mode.
    ///
    /// | Mode | Identifier |
    /// |------|-----------:|
    /// | [`NativeHighResCounter`][Self::NativeHighResCounter] | 0 |
    /// | [`MachAbsolute`][Self::MachAbsolute] | 1 |
    /// | [`PosixMonotonicRaw`][Self::PosixMonotonicRaw] | 2 |
    /// | [`GenericMonotonicFallback`][Self::GenericMonotonicFallback] | 3 |
    ///
    /// Use this when the mode needs to be stored or exchanged with tools that expect a number.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::NativeHighResCounter => 0,
            Self::MachAbsolute => 1,
            Self::PosixMonotonicRaw => 2,
            Self::GenericMonotonicFallback => 3,
        }
    }
}

/// A handle to the monotonic tick source of the build target.
///
/// Most code does not need this type and can call [`current_tick()`] instead. Each
/// [`Recorder`][crate::Recorder] owns a `Clock` to read ticks from.
///
/// # Examples
///
/// ```
/// use tick_recorder::Clock;
///
/// let clock = Clock::new();
///
/// let before = clock.now().unwrap();
/// let after = clock.now().unwrap();
///
/// assert!(after >= before);
/// assert_eq!(clock.mode(), tick_recorder::active_mode());
/// ```
#[derive(Debug)]
pub struct Clock {
    inner: TimeSourceFacade,
}

impl Clock {
    /// Creates a clock that reads the tick source of the build target.
    ///
    /// This also captures the process start tick if nothing has done so yet (see [`init()`]),
    /// so every reading from the clock comes after the start tick.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // The real clock cannot be made to fail on demand.
    pub fn new() -> Self {
        if let Err(error) = init() {
            tracing::warn!(%error, "clock created before the process start tick could be captured");
        }

        Self::build_target()
    }

    fn build_target() -> Self {
        Self::from_pal(&PlatformFacade::real())
    }

    #[must_use]
    pub(crate) fn from_pal(pal: &PlatformFacade) -> Self {
        Self {
            inner: pal.new_time_source(),
        }
    }

    /// Reads the current tick.
    ///
    /// Successive reads never return a smaller value than an earlier read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockUnavailable`][crate::Error::ClockUnavailable] if the platform fails
    /// to produce a reading.
    pub fn now(&self) -> Result<u64> {
        self.inner.now().map_err(Error::from)
    }

    /// Identifies the tick source this clock reads from.
    #[must_use]
    pub fn mode(&self) -> ClockMode {
        self.inner.mode()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

static PROCESS_START_TICK: OnceLock<u64> = OnceLock::new();

/// Captures the process start tick if it has not been captured yet and returns it.
///
/// Call this first thing in `main` so that the start tick precedes everything you measure.
/// Calling it again is harmless and returns the same value. The other functions in this package
/// that read the clock call this themselves, so forgetting it only moves the start point to the
/// first timestamp taken.
///
/// # Errors
///
/// Returns [`Error::ClockUnavailable`][crate::Error::ClockUnavailable] if the start tick has not
/// been captured yet and the platform fails to produce a reading. A later call may try again.
pub fn init() -> Result<u64> {
    if let Some(start) = PROCESS_START_TICK.get() {
        return Ok(*start);
    }

    let candidate = Clock::build_target().now()?;

    // If another thread got here first, its reading wins and ours is discarded.
    let mut stored = false;
    let start = *PROCESS_START_TICK.get_or_init(|| {
        stored = true;
        candidate
    });

    if stored {
        tracing::debug!(start, mode = %BUILD_TARGET_MODE, "captured process start tick");
    }

    Ok(start)
}

/// Reads the current tick from the build target's clock.
///
/// # Examples
///
/// ```
/// let first = tick_recorder::current_tick().unwrap();
/// let second = tick_recorder::current_tick().unwrap();
///
/// assert!(second >= first);
/// ```
///
/// # Errors
///
/// Returns [`Error::ClockUnavailable`][crate::Error::ClockUnavailable] if the platform fails to
/// produce a reading.
pub fn current_tick() -> Result<u64> {
    init()?;

    Clock::build_target().now()
}

/// Identifies the tick source selected for the build target.
///
/// This is a compile-time constant.
#[must_use]
pub const fn active_mode() -> ClockMode {
    BUILD_TARGET_MODE
}

/// Returns the tick captured when the process started using this package.
///
/// See [`init()`] for when exactly the tick is captured.
///
/// # Errors
///
/// Returns [`Error::ClockUnavailable`][crate::Error::ClockUnavailable] if the start tick has not
/// been captured yet and the platform fails to produce a reading.
pub fn process_start_tick() -> Result<u64> {
    init()
}

/// Returns the ticks elapsed since the process start tick.
///
/// # Examples
///
/// ```
/// tick_recorder::init().unwrap();
///
/// let early = tick_recorder::elapsed_since_start().unwrap();
/// std::thread::sleep(std::time::Duration::from_millis(1));
/// let later = tick_recorder::elapsed_since_start().unwrap();
///
/// assert!(later > early);
/// ```
///
/// # Errors
///
/// Returns [`Error::ClockUnavailable`][crate::Error::ClockUnavailable] if the platform fails to
/// produce a reading.
pub fn elapsed_since_start() -> Result<u64> {
    let start = init()?;
    let now = Clock::build_target().now()?;

    // The start tick is always read before `now`, so this only saturates on a broken clock.
    Ok(now.saturating_sub(start))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io;

    use static_assertions::assert_impl_all;

    use super::*;
    use crate::pal::{MockPlatform, MockTimeSource};

    assert_impl_all!(Clock: Send, Sync);
    assert_impl_all!(ClockMode: Send, Sync, Copy);

    fn clock_with(time_source: MockTimeSource) -> Clock {
        let mut platform = MockPlatform::new();

        platform
            .expect_new_time_source()
            .once()
            .return_once(move || time_source);

        Clock::from_pal(&platform.into())
    }

    #[test]
    fn mode_ids_are_stable() {
        assert_eq!(ClockMode::NativeHighResCounter.id(), 0);
        assert_eq!(ClockMode::MachAbsolute.id(), 1);
        assert_eq!(ClockMode::PosixMonotonicRaw.id(), 2);
        assert_eq!(ClockMode::GenericMonotonicFallback.id(), 3);
    }

    #[test]
    fn mode_has_readable_name() {
        assert_eq!(
            ClockMode::PosixMonotonicRaw.to_string(),
            "POSIX raw monotonic clock"
        );
    }

    #[test]
    fn now_passes_through_ticks() {
        let mut time_source = MockTimeSource::new();
        time_source.expect_now().once().returning(|| Ok(1234));

        let clock = clock_with(time_source);

        assert_eq!(clock.now().unwrap(), 1234);
    }

    #[test]
    fn now_reports_clock_failure() {
        let mut time_source = MockTimeSource::new();
        time_source
            .expect_now()
            .once()
            .returning(|| Err(io::Error::from(io::ErrorKind::Unsupported)));

        let clock = clock_with(time_source);

        assert!(matches!(
            clock.now().unwrap_err(),
            Error::ClockUnavailable { .. }
        ));
    }

    #[test]
    fn mode_comes_from_time_source() {
        let mut time_source = MockTimeSource::new();
        time_source
            .expect_mode()
            .return_const(ClockMode::MachAbsolute);

        let clock = clock_with(time_source);

        assert_eq!(clock.mode(), ClockMode::MachAbsolute);
    }

    #[test]
    fn real_clock_matches_active_mode() {
        assert_eq!(Clock::new().mode(), active_mode());
    }

    #[test]
    fn init_is_idempotent() {
        let first = init().unwrap();
        let second = init().unwrap();

        assert_eq!(first, second);
        assert_eq!(process_start_tick().unwrap(), first);
    }

    #[test]
    fn current_tick_is_not_before_start() {
        let tick = current_tick().unwrap();

        assert!(tick >= process_start_tick().unwrap());
    }
}
