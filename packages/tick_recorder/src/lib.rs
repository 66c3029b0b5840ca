#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Records high-resolution monotonic timestamps for in-process code profiling.
//!
//! This is meant for the cases where conventional sampling or instrumentation profilers are not
//! available or not useful, such as single-threaded programs, embedded targets or environments
//! without external tooling. You mark points in your code with [`Recorder::start()`] and later
//! measure the ticks elapsed since such a mark with [`Recorder::stop()`].
//!
//! The package has two parts:
//!
//! - A monotonic clock that reads the best tick source available on the build target, selected at
//!   compile time. See [`current_tick()`], [`active_mode()`] and [`elapsed_since_start()`].
//! - A [`Recorder`] that keeps an ordered log of ticks and can be shared between threads.
//!
//! Ticks are opaque `u64` values in platform-dependent units. Only differences between two ticks
//! from the same process are meaningful. Converting ticks to wall-clock durations, aggregating
//! them or exporting them is left to the caller.
//!
//! # Basic usage
//!
//! ```
//! use tick_recorder::Recorder;
//!
//! # fn main() -> tick_recorder::Result<()> {
//! // Capture the process start tick before anything else happens.
//! tick_recorder::init()?;
//!
//! let recorder = Recorder::new();
//!
//! let whole = recorder.start()?;
//! let phase = recorder.start()?;
//! std::hint::black_box((0..1000).sum::<u64>());
//! let phase_ticks = recorder.stop(phase)?;
//! let whole_ticks = recorder.stop(whole)?;
//!
//! assert!(whole_ticks >= phase_ticks);
//! assert_eq!(recorder.len(), 2);
//!
//! println!(
//!     "{whole_ticks} ticks total, {phase_ticks} in phase ({} clock)",
//!     tick_recorder::active_mode()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Threading
//!
//! A [`Recorder`] serializes all of its operations through one lock, so any number of threads can
//! share it. The clock is read while the lock is held, which means the recorded order always
//! matches the order in which threads acquired the lock. Independent recorders share nothing and
//! never contend with each other.

mod clock;
mod error;
mod pal;
mod recorder;

pub use clock::*;
pub use error::*;
pub use recorder::*;

pub(crate) const ERR_POISONED_LOCK: &str =
    "encountered poisoned lock - recorded timestamps can no longer be trusted";
