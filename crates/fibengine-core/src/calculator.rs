//! Calculator traits and the `FibCalculator` decorator.
//!
//! `Calculator` is the public trait consumed by the device layer.
//! `CoreCalculator` is the internal trait implemented by algorithms.
//! `FibCalculator` wraps a core algorithm and hands its result across the
//! boundary as a plain limb vector.

use std::sync::Arc;

use crate::limbs::{Limb, LimbBuffer};

/// Error type for Fibonacci calculations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FibError {
    /// Backing storage for a buffer or the workspace could not be reserved.
    #[error("failed to allocate {0} limbs")]
    AllocationFailure(usize),

    /// A result or temporary does not fit its fixed capacity.
    #[error("capacity exceeded: needed {needed} limbs, capacity is {capacity}")]
    CapacityExceeded {
        /// Limbs the operation required.
        needed: usize,
        /// Limbs the destination can hold.
        capacity: usize,
    },

    /// An operand violated an arithmetic precondition.
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Results from different strategies don't match.
    #[error("result mismatch between strategies")]
    Mismatch,
}

/// Public trait for Fibonacci calculators.
pub trait Calculator: Send + Sync {
    /// Calculate F(k) as little-endian limbs with no leading zero limb.
    fn calculate(&self, k: u64) -> Result<Vec<Limb>, FibError>;

    /// Get the name of this calculator.
    fn name(&self) -> &str;
}

/// Internal trait for algorithm implementations.
/// Wrapped by `FibCalculator`.
pub trait CoreCalculator: Send + Sync {
    /// Compute F(k) into a freshly sized buffer.
    fn calculate_core(&self, k: u64) -> Result<LimbBuffer, FibError>;

    /// Get the name of this algorithm.
    fn name(&self) -> &str;
}

/// Decorator that wraps a `CoreCalculator` and copies its result out.
pub struct FibCalculator {
    inner: Arc<dyn CoreCalculator>,
}

impl FibCalculator {
    /// Create a new `FibCalculator` wrapping the given core calculator.
    #[must_use]
    pub fn new(inner: Arc<dyn CoreCalculator>) -> Self {
        Self { inner }
    }
}

impl Calculator for FibCalculator {
    fn calculate(&self, k: u64) -> Result<Vec<Limb>, FibError> {
        let result = self.inner.calculate_core(k).inspect_err(|err| {
            tracing::debug!(k, algorithm = self.inner.name(), %err, "calculation failed");
        })?;
        tracing::debug!(k, algorithm = self.inner.name(), limbs = result.len(), "calculated");
        Ok(result.to_vec())
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
