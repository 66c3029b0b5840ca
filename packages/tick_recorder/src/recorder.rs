use std::sync::{Mutex, MutexGuard, TryLockError};

use crate::{Clock, ERR_POISONED_LOCK, Error, Result};

/// A thread-safe log of ticks used to measure intervals in running code.
///
/// Each call to [`start()`][Self::start] appends the current tick and returns its index. Pass that
/// index to [`stop()`][Self::stop] to get the ticks elapsed since the mark. Stopping does not
/// remove the mark, so one mark can be measured against any number of later points.
///
/// All operations on one recorder are mutually exclusive. The clock is read while the lock is
/// held, so the recorded order is the order in which callers acquired the lock. Separate recorders
/// share nothing.
///
/// # Examples
///
/// ```
/// use tick_recorder::Recorder;
///
/// let recorder = Recorder::new();
///
/// let request = recorder.start().unwrap();
///
/// // ... parse the request ...
/// let parsed_after = recorder.stop(request).unwrap();
///
/// // ... handle the request ...
/// let handled_after = recorder.stop(request).unwrap();
///
/// assert!(handled_after >= parsed_after);
/// assert_eq!(recorder.len(), 1);
/// ```
///
/// Sharing one recorder between threads:
///
/// ```
/// use std::thread;
///
/// use tick_recorder::Recorder;
///
/// let recorder = Recorder::new();
///
/// thread::scope(|s| {
///     for _ in 0..4 {
///         s.spawn(|| recorder.start().unwrap());
///     }
/// });
///
/// assert_eq!(recorder.len(), 4);
/// ```
#[derive(Debug)]
pub struct Recorder {
    ticks: Mutex<Vec<u64>>,
    clock: Clock,
}

impl Recorder {
    /// Creates an empty recorder that reads the build target's clock.
    ///
    /// This also captures the process start tick if nothing has done so yet (see
    /// [`Clock::new()`]).
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Clock::new())
    }

    #[must_use]
    pub(crate) fn with_clock(clock: Clock) -> Self {
        tracing::trace!(mode = %clock.mode(), "created recorder");

        Self {
            ticks: Mutex::new(Vec::new()),
            clock,
        }
    }

    /// Records the current tick and returns the index it was stored at.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the storage cannot grow or
    /// [`Error::ClockUnavailable`] if the clock cannot be read. In both cases nothing is recorded.
    pub fn start(&self) -> Result<usize> {
        let mut ticks = self.ticks.lock().expect(ERR_POISONED_LOCK);

        self.append(&mut ticks)
    }

    /// Like [`start()`][Self::start] but fails instead of waiting if another thread is using the
    /// recorder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WouldBlock`] if the recorder is in use, otherwise the same errors as
    /// [`start()`][Self::start].
    pub fn try_start(&self) -> Result<usize> {
        let mut ticks = self.try_lock()?;

        self.append(&mut ticks)
    }

    /// Returns the ticks elapsed since the timestamp at `index` was recorded.
    ///
    /// The timestamp stays in the recorder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if no timestamp has been recorded at `index` or
    /// [`Error::ClockUnavailable`] if the clock cannot be read.
    pub fn stop(&self, index: usize) -> Result<u64> {
        let ticks = self.ticks.lock().expect(ERR_POISONED_LOCK);

        self.elapsed_since(&ticks, index)
    }

    /// Like [`stop()`][Self::stop] but fails instead of waiting if another thread is using the
    /// recorder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WouldBlock`] if the recorder is in use, otherwise the same errors as
    /// [`stop()`][Self::stop].
    pub fn try_stop(&self, index: usize) -> Result<u64> {
        let ticks = self.try_lock()?;

        self.elapsed_since(&ticks, index)
    }

    /// Returns the raw tick recorded at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if no timestamp has been recorded at `index`.
    pub fn timestamp(&self, index: usize) -> Result<u64> {
        let ticks = self.ticks.lock().expect(ERR_POISONED_LOCK);

        tick_at(&ticks, index)
    }

    /// Returns the number of recorded timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.lock().expect(ERR_POISONED_LOCK).len()
    }

    /// Returns `true` if no timestamps are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.lock().expect(ERR_POISONED_LOCK).is_empty()
    }

    /// Returns how many timestamps the recorder can hold before it needs to grow its storage.
    ///
    /// Clearing the recorder keeps the capacity, so repeated measurement rounds do not reallocate.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.ticks.lock().expect(ERR_POISONED_LOCK).capacity()
    }

    /// Copies all recorded ticks, in the order they were recorded.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u64> {
        self.ticks.lock().expect(ERR_POISONED_LOCK).clone()
    }

    /// Removes all recorded timestamps.
    ///
    /// Indexes handed out before the call no longer refer to anything.
    pub fn clear(&self) {
        let removed = {
            let mut ticks = self.ticks.lock().expect(ERR_POISONED_LOCK);
            let removed = ticks.len();
            ticks.clear();
            removed
        };

        tracing::trace!(removed, "cleared recorder");
    }

    fn try_lock(&self) -> Result<MutexGuard<'_, Vec<u64>>> {
        match self.ticks.try_lock() {
            Ok(ticks) => Ok(ticks),
            Err(TryLockError::WouldBlock) => Err(Error::WouldBlock),
            Err(TryLockError::Poisoned(_)) => panic!("{ERR_POISONED_LOCK}"),
        }
    }

    fn append(&self, ticks: &mut Vec<u64>) -> Result<usize> {
        // Grow geometrically ourselves, starting from 1, so that allocation failure is reported
        // instead of aborting inside `push()`.
        if ticks.len() == ticks.capacity() {
            let requested = ticks.capacity().max(1);

            ticks
                .try_reserve_exact(requested)
                .map_err(|source| Error::AllocationFailure { requested, source })?;
        }

        let tick = self.clock.now()?;

        let index = ticks.len();
        ticks.push(tick);

        Ok(index)
    }

    fn elapsed_since(&self, ticks: &[u64], index: usize) -> Result<u64> {
        let start = tick_at(ticks, index)?;
        let now = self.clock.now()?;

        Ok(now.saturating_sub(start))
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

fn tick_at(ticks: &[u64], index: usize) -> Result<u64> {
    ticks.get(index).copied().ok_or(Error::IndexOutOfRange {
        index,
        len: ticks.len(),
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io;

    use mockall::Sequence;
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::pal::{MockPlatform, MockTimeSource};

    assert_impl_all!(Recorder: Send, Sync);

    /// Creates a recorder whose clock returns exactly the given ticks, in order.
    ///
    /// Any clock read beyond the script fails the test.
    fn recorder_with_ticks(script: &[u64]) -> Recorder {
        let mut time_source = MockTimeSource::new();
        let mut seq = Sequence::new();

        for &tick in script {
            time_source
                .expect_now()
                .once()
                .in_sequence(&mut seq)
                .returning(move || Ok(tick));
        }

        time_source
            .expect_mode()
            .return_const(crate::ClockMode::GenericMonotonicFallback);

        let mut platform = MockPlatform::new();
        platform
            .expect_new_time_source()
            .once()
            .return_once(move || time_source);

        Recorder::with_clock(Clock::from_pal(&platform.into()))
    }

    #[test]
    fn start_stop_scenario() {
        let recorder = recorder_with_ticks(&[1000, 1050, 1200, 1200]);

        assert_eq!(recorder.start().unwrap(), 0);
        assert_eq!(recorder.start().unwrap(), 1);
        assert_eq!(recorder.len(), 2);

        assert_eq!(recorder.stop(0).unwrap(), 200);
        assert_eq!(recorder.stop(1).unwrap(), 150);

        recorder.clear();
        assert_eq!(recorder.len(), 0);
        assert!(recorder.is_empty());
    }

    #[test]
    fn stop_can_be_repeated_against_one_start() {
        let recorder = recorder_with_ticks(&[10, 15, 40, 41]);

        let mark = recorder.start().unwrap();

        assert_eq!(recorder.stop(mark).unwrap(), 5);
        assert_eq!(recorder.stop(mark).unwrap(), 30);
        assert_eq!(recorder.stop(mark).unwrap(), 31);
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn timestamps_keep_call_order() {
        let recorder = recorder_with_ticks(&[3, 5, 8, 13]);

        for _ in 0..4 {
            recorder.start().unwrap();
        }

        assert_eq!(recorder.timestamp(0).unwrap(), 3);
        assert_eq!(recorder.timestamp(1).unwrap(), 5);
        assert_eq!(recorder.timestamp(2).unwrap(), 8);
        assert_eq!(recorder.timestamp(3).unwrap(), 13);
        assert_eq!(recorder.snapshot(), vec![3, 5, 8, 13]);
    }

    #[test]
    fn count_ignores_reads() {
        let recorder = recorder_with_ticks(&[1, 2, 3, 4]);

        recorder.start().unwrap();
        recorder.start().unwrap();
        recorder.stop(0).unwrap();
        recorder.timestamp(1).unwrap();
        recorder.stop(1).unwrap();

        assert_eq!(recorder.len(), 2);
    }

    #[test]
    fn count_restarts_after_clear() {
        let recorder = recorder_with_ticks(&[1, 2, 3]);

        recorder.start().unwrap();
        recorder.start().unwrap();
        recorder.clear();

        assert_eq!(recorder.start().unwrap(), 0);
        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.timestamp(0).unwrap(), 3);
    }

    #[test]
    fn clear_is_idempotent() {
        let recorder = recorder_with_ticks(&[1]);

        recorder.clear();
        assert_eq!(recorder.len(), 0);

        recorder.start().unwrap();
        recorder.clear();
        recorder.clear();
        assert_eq!(recorder.len(), 0);
    }

    #[test]
    fn out_of_range_index_is_rejected_without_reading_clock() {
        let recorder = recorder_with_ticks(&[100]);

        recorder.start().unwrap();

        assert!(matches!(
            recorder.stop(1).unwrap_err(),
            Error::IndexOutOfRange { index: 1, len: 1 }
        ));
        assert!(matches!(
            recorder.timestamp(5).unwrap_err(),
            Error::IndexOutOfRange { index: 5, len: 1 }
        ));
        assert!(matches!(
            recorder.try_stop(1).unwrap_err(),
            Error::IndexOutOfRange { index: 1, len: 1 }
        ));
    }

    #[test]
    fn index_from_before_clear_is_rejected() {
        let recorder = recorder_with_ticks(&[100]);

        let mark = recorder.start().unwrap();
        recorder.clear();

        assert!(matches!(
            recorder.stop(mark).unwrap_err(),
            Error::IndexOutOfRange { index: 0, len: 0 }
        ));
    }

    #[test]
    fn capacity_doubles_and_survives_clear() {
        let recorder = recorder_with_ticks(&[1, 2, 3, 4, 5]);

        assert_eq!(recorder.capacity(), 0);

        recorder.start().unwrap();
        assert_eq!(recorder.capacity(), 1);

        recorder.start().unwrap();
        assert_eq!(recorder.capacity(), 2);

        recorder.start().unwrap();
        assert_eq!(recorder.capacity(), 4);

        recorder.start().unwrap();
        assert_eq!(recorder.capacity(), 4);

        recorder.start().unwrap();
        assert_eq!(recorder.capacity(), 8);

        recorder.clear();
        assert_eq!(recorder.capacity(), 8);
    }

    #[test]
    fn clock_failure_records_nothing() {
        let mut time_source = MockTimeSource::new();
        time_source
            .expect_now()
            .once()
            .returning(|| Err(io::Error::from(io::ErrorKind::Unsupported)));
        time_source
            .expect_mode()
            .return_const(crate::ClockMode::GenericMonotonicFallback);

        let mut platform = MockPlatform::new();
        platform
            .expect_new_time_source()
            .once()
            .return_once(move || time_source);

        let recorder = Recorder::with_clock(Clock::from_pal(&platform.into()));

        assert!(matches!(
            recorder.start().unwrap_err(),
            Error::ClockUnavailable { .. }
        ));
        assert!(recorder.is_empty());
    }

    #[test]
    fn try_variants_fail_while_locked() {
        let recorder = recorder_with_ticks(&[10, 25]);

        recorder.start().unwrap();

        {
            let _held = recorder.ticks.lock().unwrap();

            assert!(matches!(recorder.try_start().unwrap_err(), Error::WouldBlock));
            assert!(matches!(recorder.try_stop(0).unwrap_err(), Error::WouldBlock));
        }

        assert_eq!(recorder.try_stop(0).unwrap(), 15);
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn try_start_appends_when_uncontended() {
        let recorder = recorder_with_ticks(&[7, 9]);

        assert_eq!(recorder.try_start().unwrap(), 0);
        assert_eq!(recorder.try_start().unwrap(), 1);
        assert_eq!(recorder.snapshot(), vec![7, 9]);
    }

    #[test]
    #[cfg(not(miri))] // Miri cannot talk to the real platform.
    fn real_clock_measures_forward() {
        let recorder = Recorder::new();

        let mark = recorder.start().unwrap();
        let start = recorder.timestamp(mark).unwrap();

        assert!(start >= crate::process_start_tick().unwrap());

        let first = recorder.stop(mark).unwrap();
        let second = recorder.stop(mark).unwrap();
        assert!(second >= first);
    }
}
