//! # fibengine-device
//!
//! Session layer in front of the Fibonacci core: single-writer access, a
//! positional cursor mapping the position to an index, a strategy side
//! channel, per-call timing, and cross-checking of strategies.

pub mod calculator_selection;
pub mod device;
pub mod error;
pub mod interfaces;
pub mod orchestrator;
pub mod transfer;

pub use device::{serve, FibDevice, SeekFrom, Session};
pub use error::DeviceError;
pub use interfaces::{CalculationResult, ReadRequest, ReadResponse, ResultPresenter};
pub use orchestrator::{analyze_comparison_results, compare_strategies};
