//! Device interfaces: per-call request and response values, and the
//! presenter seam the command line implements.

use std::time::Duration;

use serde::Serialize;

use fibengine_core::{Limb, Strategy};

use crate::error::DeviceError;

/// One read: which index, computed how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest {
    /// Fibonacci index.
    pub index: u64,
    /// Strategy serving the read.
    pub strategy: Strategy,
}

/// Outcome of a successful read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadResponse {
    /// Fibonacci index that was computed.
    pub index: u64,
    /// Strategy that served the read.
    pub strategy: Strategy,
    /// Limbs written to the caller's buffer.
    pub limbs: usize,
    /// Time spent computing, excluding the copy out.
    pub elapsed: Duration,
}

/// Trait for presenting results to the user.
pub trait ResultPresenter: Send + Sync {
    /// Present a single read.
    fn present_result(&self, response: &ReadResponse, limbs: &[Limb], details: bool);

    /// Present the value returned by a side-channel write of `written` bytes.
    fn present_write(&self, written: usize, last_ns: u64);

    /// Present a comparison of strategies for one index.
    fn present_comparison(&self, index: u64, results: &[CalculationResult]);

    /// Present an error.
    fn present_error(&self, error: &str);
}

/// Result of running one strategy during a comparison.
#[derive(Debug, Clone)]
pub struct CalculationResult {
    /// Strategy that ran.
    pub strategy: Strategy,
    /// The computed limbs or a structured error.
    pub outcome: Result<Vec<Limb>, DeviceError>,
    /// Computation duration.
    pub duration: Duration,
}
