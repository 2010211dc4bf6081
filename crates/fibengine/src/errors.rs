//! Application errors and exit codes.

use fibengine_core::constants::exit_codes;
use fibengine_core::FibError;
use fibengine_device::DeviceError;

/// Errors raised by the application itself rather than the device.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A read would allocate more than the memory limit allows.
    #[error("estimated memory for F({index}) ({needed} bytes) exceeds limit ({limit} bytes)")]
    MemoryLimit {
        /// Index being read.
        index: u64,
        /// Bytes the read would allocate.
        needed: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// The sweep was interrupted by Ctrl+C.
    #[error("sweep cancelled after {completed} reads")]
    Cancelled {
        /// Reads finished before the interrupt.
        completed: u64,
    },
}

/// Map a calculation error to an exit code.
pub fn handle_error(err: &FibError) -> i32 {
    match err {
        FibError::AllocationFailure(_)
        | FibError::CapacityExceeded { .. }
        | FibError::PreconditionViolation(_) => exit_codes::ERROR_GENERIC,
        FibError::Config(_) => exit_codes::ERROR_CONFIG,
        FibError::Mismatch => exit_codes::ERROR_MISMATCH,
    }
}

/// Map a device error to an exit code.
pub fn handle_device_error(err: &DeviceError) -> i32 {
    match err {
        DeviceError::Busy => exit_codes::ERROR_BUSY,
        DeviceError::BufferTooSmall { .. } => exit_codes::ERROR_GENERIC,
        DeviceError::Compute(e) => handle_error(e),
        DeviceError::UnknownStrategy(_) => exit_codes::ERROR_CONFIG,
    }
}

/// Exit code for any error surfaced by `app::run`.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(e) = err.downcast_ref::<AppError>() {
        return match e {
            AppError::Config(_) => exit_codes::ERROR_CONFIG,
            AppError::MemoryLimit { .. } => exit_codes::ERROR_GENERIC,
            AppError::Cancelled { .. } => exit_codes::ERROR_CANCELED,
        };
    }
    if let Some(e) = err.downcast_ref::<DeviceError>() {
        return handle_device_error(e);
    }
    if let Some(e) = err.downcast_ref::<FibError>() {
        return handle_error(e);
    }
    exit_codes::ERROR_GENERIC
}
