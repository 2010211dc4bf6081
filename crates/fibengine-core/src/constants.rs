//! Constants for buffer sizing, multiplication thresholds, and rendering.

/// Largest index served by the reference device configuration.
pub const MAX_INDEX: u64 = 500_000;

/// Operand size (in limbs) at or below which the recursive multiplier
/// hands over to schoolbook multiplication.
pub const KARATSUBA_THRESHOLD: usize = 8;

/// Extra limbs given to working buffers on top of the result estimate.
///
/// The squaring steps check `len(x) + len(y) <= capacity` before
/// multiplying; two limbs of headroom keep that check from rejecting a
/// product whose true size fits.
pub const WORKING_HEADROOM: usize = 2;

/// Largest power of ten that fits in a limb (10^19).
pub const DECIMAL_GROUP_BASE: u64 = 10_000_000_000_000_000_000;

/// Decimal digits per rendered group.
pub const DECIMAL_GROUP_DIGITS: usize = 19;

/// Process exit codes used by the command-line exerciser.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Another session holds the device.
    pub const ERROR_BUSY: i32 = 2;
    /// Strategy results did not match during cross-validation.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Sweep cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}
