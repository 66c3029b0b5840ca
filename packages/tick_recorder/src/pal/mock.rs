#![cfg_attr(coverage_nightly, coverage(off))]

//! Mock platform for tests that need full control over the ticks a `Clock` observes.

use mockall::mock;

use crate::pal::{MockTimeSource, Platform};

mock! {
    #[derive(Debug)]
    pub Platform {
    }

    impl Platform for Platform {
        type TimeSource = MockTimeSource;

        /// Hands out the scripted tick source that a test clock or recorder will read from.
        fn new_time_source(&self) -> MockTimeSource;
    }
}
