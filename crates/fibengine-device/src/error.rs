//! Device error type.

use fibengine_core::FibError;

/// Errors surfaced by the device layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// Another session already holds the device.
    #[error("device is busy: another session is open")]
    Busy,

    /// The caller's buffer cannot hold the result.
    #[error("buffer too small: result needs {needed} limbs, buffer holds {provided}")]
    BufferTooSmall {
        /// Limbs in the result.
        needed: usize,
        /// Limbs the caller provided.
        provided: usize,
    },

    /// The computation itself failed.
    #[error(transparent)]
    Compute(#[from] FibError),

    /// A strategy name did not match any known strategy.
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_error_display() {
        assert_eq!(
            DeviceError::Busy.to_string(),
            "device is busy: another session is open"
        );
        let err = DeviceError::BufferTooSmall {
            needed: 3,
            provided: 2,
        };
        assert_eq!(
            err.to_string(),
            "buffer too small: result needs 3 limbs, buffer holds 2"
        );
        let err = DeviceError::from(FibError::AllocationFailure(8));
        assert_eq!(err.to_string(), "failed to allocate 8 limbs");
    }
}
