use std::fmt;

/// Identifier bound shared by view ids and layer ids.
///
/// Ordering is load-bearing: layers stack in ascending key order, and overlay
/// scans walk from the greatest key downwards. `Display` provides default layer
/// labels and log fields.
pub trait Key: Ord + Clone + fmt::Debug + fmt::Display + 'static {}

impl<T> Key for T where T: Ord + Clone + fmt::Debug + fmt::Display + 'static {}
