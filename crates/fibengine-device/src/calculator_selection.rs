//! Strategy selection logic.

use fibengine_core::Strategy;

use crate::error::DeviceError;

/// Resolve an algorithm selection (`all` or one strategy name) to strategies.
pub fn select_strategies(algo: &str) -> Result<Vec<Strategy>, DeviceError> {
    match algo.trim() {
        "all" => Ok(Strategy::ALL.to_vec()),
        name => name
            .parse()
            .map(|s| vec![s])
            .map_err(|_| DeviceError::UnknownStrategy(name.to_string())),
    }
}
