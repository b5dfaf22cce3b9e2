#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Progress storage backends for the Pathforge world.
//!
//! The world only sees the infallible [`ProgressStore`] port. Backends in this
//! crate expose fallible `try_*` operations for hosts that want to report
//! failures, and degrade to logged warnings when driven through the port.
//!
//! [`ProgressStore`]: pathforge_core::ProgressStore

mod json_file;
mod memory;

pub use json_file::{JsonFileProgressStore, StoreError};
pub use memory::MemoryProgressStore;
