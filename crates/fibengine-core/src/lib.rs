//! # fibengine-core
//!
//! Exact Fibonacci numbers over fixed-capacity base-2^64 limb buffers.
//! Provides the limb arithmetic kernel, schoolbook and recursive (Karatsuba)
//! multiplication, fast doubling and iterative calculators, and decimal
//! rendering.

pub mod calculator;
pub mod capacity;
pub mod constants;
pub mod fastdoubling;
pub mod iterative;
pub mod kernel;
pub mod limbs;
pub mod multiply;
pub mod registry;
pub mod render;
pub mod strategy;
pub mod workspace;

// Re-exports
pub use calculator::{Calculator, CoreCalculator, FibCalculator, FibError};
pub use capacity::{result_capacity, CapacityEstimate};
pub use constants::{exit_codes, KARATSUBA_THRESHOLD, MAX_INDEX};
pub use limbs::{Limb, LimbBuffer};
pub use registry::{CalculatorFactory, DefaultFactory};
pub use render::render_decimal;
pub use strategy::{Multiplier, Strategy};

/// Compute F(k) with the given strategy.
///
/// Returns little-endian limbs with no leading zero limb; zero is `[0]`.
///
/// # Example
/// ```
/// use fibengine_core::{compute_fibonacci, Strategy};
///
/// assert_eq!(compute_fibonacci(10, Strategy::Karatsuba).unwrap(), vec![55]);
/// assert_eq!(compute_fibonacci(0, Strategy::Iterative).unwrap(), vec![0]);
/// ```
pub fn compute_fibonacci(k: u64, strategy: Strategy) -> Result<Vec<Limb>, FibError> {
    let calc: &dyn CoreCalculator = match strategy {
        Strategy::Iterative => &iterative::IterativeCalculator,
        Strategy::FastDoubling => &fastdoubling::OptimizedFastDoubling,
        Strategy::Karatsuba => &fastdoubling::KaratsubaFastDoubling,
    };
    Ok(calc.calculate_core(k)?.to_vec())
}

/// Compute F(k) with the default strategy and render it in decimal.
///
/// This is a convenience function for simple use cases. For strategy
/// selection and raw limbs, use [`compute_fibonacci`] or the `Calculator`
/// trait directly.
///
/// # Example
/// ```
/// assert_eq!(fibengine_core::fibonacci(10).unwrap(), "55");
/// assert_eq!(fibengine_core::fibonacci(0).unwrap(), "0");
/// ```
pub fn fibonacci(k: u64) -> Result<String, FibError> {
    compute_fibonacci(k, Strategy::default()).map(|limbs| render_decimal(&limbs))
}
