//  LOG.rs
//    by Lut99
//
//  Created:
//    22 Mar 2024, 16:09:22
//  Last edited:
//    16 Oct 2026, 11:24:05
//  Auto updated?
//    Yes
//
//  Description:
//!   Provides crate-internal `debug!()`, `trace!()` and `warn!()` that go to
//!   the [`log`](https://github.com/rust-lang/log)-crate when the `log`
//!   feature is enabled, and vanish otherwise.
//


/***** LIBRARY *****/
#[cfg(feature = "log")]
#[allow(unused)]
pub(crate) use ::log::{debug, trace, warn};

/// Swallows its arguments whole. Stands in for the logging macros when the `log`-feature is
/// disabled.
#[cfg(not(feature = "log"))]
#[allow(unused)]
macro_rules! silent {
    ($($t:tt)*) => {};
}
#[cfg(not(feature = "log"))]
#[allow(unused)]
pub(crate) use silent as debug;
#[cfg(not(feature = "log"))]
#[allow(unused)]
pub(crate) use silent as trace;
#[cfg(not(feature = "log"))]
#[allow(unused)]
pub(crate) use silent as warn;
