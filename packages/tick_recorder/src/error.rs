use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Errors that can occur when reading the clock or operating on a [`Recorder`][crate::Recorder].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The recorder could not grow its storage to hold another timestamp.
    ///
    /// The timestamp was not recorded and the recorder is otherwise unchanged.
    #[error("failed to grow timestamp storage by {requested} entries")]
    AllocationFailure {
        /// How many additional entries the recorder tried to reserve.
        requested: usize,

        /// The allocation error reported by the standard library.
        #[source]
        source: TryReserveError,
    },

    /// A timestamp index referred to an entry that has not been recorded.
    #[error("timestamp index {index} is out of range for a recorder holding {len} timestamps")]
    IndexOutOfRange {
        /// The index the caller asked for.
        index: usize,

        /// How many timestamps the recorder held at the time of the call.
        len: usize,
    },

    /// The platform tick source failed to produce a reading.
    #[error("the platform clock is unavailable")]
    ClockUnavailable {
        /// The error reported by the operating system.
        #[source]
        source: io::Error,
    },

    /// A non-blocking operation found the recorder locked by another thread.
    #[error("the recorder is in use by another thread")]
    WouldBlock,
}

/// A specialized `Result` type for clock and recorder operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

impl From<io::Error> for Error {
    fn from(source: io::Error) -> Self {
        Self::ClockUnavailable { source }
    }
}
