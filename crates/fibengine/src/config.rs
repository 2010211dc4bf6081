//! Application configuration from CLI flags and environment.

use clap::Parser;

use fibengine_core::capacity::parse_memory_limit;
use fibengine_core::MAX_INDEX;

use crate::errors::AppError;

/// fibengine: read exact Fibonacci numbers from the Fibonacci device.
///
/// With an INDEX, reads F(INDEX) once. Without one, sweeps every index from
/// 0 up to --max and back down to 0.
#[derive(Parser, Debug)]
#[command(name = "fibengine", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Fibonacci index to read; omit to sweep.
    pub index: Option<u64>,

    /// Strategy: iterative, fast, karatsuba, or all (cross-check every strategy).
    #[arg(short, long, default_value = "fast", env = "FIBENGINE_ALGO")]
    pub algo: String,

    /// Select the strategy by device mode number through the write side
    /// channel (1 iterative, 2 fast, 3 to 255 karatsuba).
    #[arg(long, conflicts_with = "algo", value_parser = clap::value_parser!(u8).range(1..))]
    pub mode: Option<u8>,

    /// Before sweeping, write the 15-byte marker once per index through the
    /// side channel and print each returned time; this selects karatsuba.
    #[arg(long, conflicts_with_all = ["algo", "mode", "index"])]
    pub write_phase: bool,

    /// Upper end of the sweep.
    #[arg(short, long, default_value_t = 100, env = "FIBENGINE_MAX")]
    pub max: u64,

    /// Largest index the device serves; seeks beyond it are clamped.
    #[arg(long, default_value_t = MAX_INDEX, env = "FIBENGINE_LIMIT")]
    pub limit: u64,

    /// Memory limit per read (e.g., "8G", "512M"); empty means unlimited.
    #[arg(long, default_value = "")]
    pub memory_limit: String,

    /// Verbose output (full numbers in comparisons).
    #[arg(short, long)]
    pub verbose: bool,

    /// Show per-read details.
    #[arg(short, long)]
    pub details: bool,

    /// Quiet mode (only output the numbers).
    #[arg(short, long)]
    pub quiet: bool,

    /// Emit one JSON object per read.
    #[arg(long)]
    pub json: bool,

    /// Write the decimal result of a single read to a file.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Memory limit in bytes, `None` when unlimited.
    pub fn memory_limit_bytes(&self) -> Result<Option<usize>, AppError> {
        match parse_memory_limit(&self.memory_limit).map_err(AppError::Config)? {
            0 => Ok(None),
            bytes => Ok(Some(bytes)),
        }
    }

    /// Last index of the sweep, never past the device limit.
    #[must_use]
    pub fn sweep_end(&self) -> u64 {
        self.max.min(self.limit)
    }
}
