//! Derived statistics over the application document.
//!
//! Everything here is a pure function of its arguments. Nothing is cached;
//! callers recompute on every read. Glucose values are normalized to mg/dL
//! before any aggregate is taken.

mod calendar;
mod glucose;
mod insights;
mod summary;
mod tasks;

pub use calendar::*;
pub use glucose::*;
pub use insights::*;
pub use summary::*;
pub use tasks::*;

/// Round for display, halves away from zero.
pub fn whole(value: f64) -> i64 {
    value.round() as i64
}
