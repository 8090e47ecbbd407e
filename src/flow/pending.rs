//! Pending flags for operations with simulated latency.
//!
//! Each operation has one flag. While it is set the operation is in flight
//! and a second request for it is refused, which is what the disabled submit
//! button did on the page.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::errors::AppError;

pub struct PendingFlag {
    operation: &'static str,
    busy: AtomicBool,
}

impl PendingFlag {
    pub const fn new(operation: &'static str) -> Self {
        Self {
            operation,
            busy: AtomicBool::new(false),
        }
    }

    /// Mark the operation as started, or fail if it already is.
    pub fn begin(&self) -> Result<PendingGuard<'_>, AppError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::Pending {
                operation: self.operation,
            })?;
        Ok(PendingGuard { flag: self })
    }

    pub fn is_pending(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Clears its flag when dropped, whether the operation succeeded or not.
pub struct PendingGuard<'a> {
    flag: &'a PendingFlag,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.flag.busy.store(false, Ordering::Release);
    }
}

/// The operations that simulate latency.
pub struct PendingOps {
    pub reading: PendingFlag,
    pub reminder: PendingFlag,
    pub profile: PendingFlag,
    pub payment: PendingFlag,
}

impl Default for PendingOps {
    fn default() -> Self {
        Self {
            reading: PendingFlag::new("glucose reading submission"),
            reminder: PendingFlag::new("reminder creation"),
            profile: PendingFlag::new("profile save"),
            payment: PendingFlag::new("payment"),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingStatus {
    pub reading: bool,
    pub reminder: bool,
    pub profile: bool,
    pub payment: bool,
}

impl PendingOps {
    pub fn status(&self) -> PendingStatus {
        PendingStatus {
            reading: self.reading.is_pending(),
            reminder: self.reminder.is_pending(),
            profile: self.profile.is_pending(),
            payment: self.payment.is_pending(),
        }
    }
}
