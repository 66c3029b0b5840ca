//! Platform abstraction layer for the monotonic tick source.
//!
//! Exactly one backend is compiled for any build target. Miri always gets the fallback because it
//! cannot talk to a real operating system but Rust std time still works under it.

mod abstractions;
mod facade;

pub(crate) use abstractions::*;
pub(crate) use facade::*;

#[cfg(all(windows, not(miri)))]
mod windows;
#[cfg(all(windows, not(miri)))]
pub(crate) use windows::*;

#[cfg(all(target_vendor = "apple", not(miri)))]
mod macos;
#[cfg(all(target_vendor = "apple", not(miri)))]
pub(crate) use macos::*;

#[cfg(all(unix, not(target_vendor = "apple"), not(miri)))]
mod unix;
#[cfg(all(unix, not(target_vendor = "apple"), not(miri)))]
pub(crate) use unix::*;

#[cfg(any(miri, not(any(windows, unix))))]
mod fallback;
#[cfg(any(miri, not(any(windows, unix))))]
pub(crate) use fallback::*;

#[cfg(test)]
mod mock;
#[cfg(test)]
pub(crate) use mock::*;
