//! Common utilities for clusterium.

mod buffer2;

pub use buffer2::Buffer2;
