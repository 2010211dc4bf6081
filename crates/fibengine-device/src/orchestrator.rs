//! Running several strategies for one index and cross-checking them.

use std::time::Duration;

use fibengine_core::{FibError, Limb, Strategy};

use crate::device::Session;
use crate::error::DeviceError;
use crate::interfaces::CalculationResult;

/// Read the session's current position once per strategy, one after another.
///
/// `out` is scratch for each read. The session is left on the last strategy.
pub fn compare_strategies(
    session: &mut Session<'_>,
    strategies: &[Strategy],
    out: &mut [Limb],
) -> Vec<CalculationResult> {
    strategies
        .iter()
        .map(|&strategy| {
            session.set_strategy(strategy);
            match session.read(out) {
                Ok(response) => CalculationResult {
                    strategy,
                    outcome: Ok(out[..response.limbs].to_vec()),
                    duration: response.elapsed,
                },
                Err(e) => {
                    tracing::warn!(%strategy, index = session.position(), error = %e, "read failed");
                    CalculationResult {
                        strategy,
                        outcome: Err(e),
                        duration: Duration::ZERO,
                    }
                }
            }
        })
        .collect()
}

/// Analyze comparison results for mismatches.
///
/// Failed reads are skipped. With no successful result at all, the first
/// failure is returned.
pub fn analyze_comparison_results(results: &[CalculationResult]) -> Result<(), DeviceError> {
    let mut valid = results.iter().filter_map(|r| r.outcome.as_ref().ok());

    let Some(first) = valid.next() else {
        return Err(results
            .iter()
            .find_map(|r| r.outcome.as_ref().err().cloned())
            .unwrap_or_else(|| FibError::Config("no strategies selected".into()).into()));
    };

    // Compare all results to the first valid one
    if valid.any(|value| value != first) {
        return Err(FibError::Mismatch.into());
    }
    Ok(())
}
