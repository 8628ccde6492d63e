//! Passcode check in front of the dialysis report workflow.
//!
//! The passcode is a fixed shared string. This keeps casual users on the right path; it is not
//! access control.

use crate::constants::REPORT_PASSCODE;
use crate::{FalconError, FalconResult};

/// Checks `input` against the shared report passcode. The comparison is exact.
///
/// # Errors
///
/// Returns `FalconError::IncorrectPasscode` on mismatch.
pub fn verify_passcode(input: &str) -> FalconResult<()> {
    if input == REPORT_PASSCODE {
        return Ok(());
    }
    tracing::warn!("rejected report passcode");
    Err(FalconError::IncorrectPasscode)
}
