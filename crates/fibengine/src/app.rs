//! Application entry point and dispatch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use fibengine_cli::output::write_to_file;
use fibengine_cli::{CLIResultPresenter, SweepProgress};
use fibengine_core::limbs::zeroed_limbs;
use fibengine_core::{render_decimal, result_capacity, CapacityEstimate, Limb, Strategy};
use fibengine_device::calculator_selection::select_strategies;
use fibengine_device::transfer::{byte_buffer, decode_limbs, LIMB_BYTES};
use fibengine_device::{
    analyze_comparison_results, compare_strategies, CalculationResult, FibDevice, ReadResponse,
    ResultPresenter, SeekFrom, Session,
};

use crate::config::AppConfig;
use crate::errors::AppError;

/// Marker written once per index by the sweep's write phase.
const WRITE_MARKER: &[u8] = b"testing writing";

/// Run the application.
///
/// Errors are reported through the presenter before being returned.
pub fn run(config: &AppConfig) -> Result<()> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        fibengine_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(());
    }

    let presenter = CLIResultPresenter::new(config.verbose, config.quiet, config.json);
    run_cli(config, &presenter).inspect_err(|err| presenter.present_error(&format!("{err:#}")))
}

fn run_cli(config: &AppConfig, presenter: &CLIResultPresenter) -> Result<()> {
    let memory_limit = config.memory_limit_bytes()?;
    let device = FibDevice::new(config.limit);
    let mut session = device.open().context("opening device")?;

    let strategies = if let Some(mode) = config.mode {
        let last_ns = session.write(&vec![0u8; usize::from(mode)]);
        tracing::debug!(mode, last_ns, strategy = %session.strategy(), "mode written");
        vec![session.strategy()]
    } else if config.write_phase {
        write_phase(&mut session, presenter, config.sweep_end());
        vec![session.strategy()]
    } else {
        select_strategies(&config.algo)?
    };

    let mut reader = Reader {
        session,
        strategies,
        memory_limit,
        details: config.details,
        presenter,
    };

    match config.index {
        Some(index) => {
            let reading = reader.read_at(index)?;
            reader.present(&reading, true);
            if let Some(path) = &config.output {
                write_to_file(path, &render_decimal(&reading.limbs))
                    .with_context(|| format!("writing result to {path}"))?;
            }
            Ok(())
        }
        None => run_sweep(&mut reader, config.sweep_end(), config.quiet || config.json),
    }
}

/// Write the marker once per index in `0..=end`, presenting each returned time.
fn write_phase(session: &mut Session<'_>, presenter: &CLIResultPresenter, end: u64) {
    for _ in 0..=end {
        let last_ns = session.write(WRITE_MARKER);
        presenter.present_write(WRITE_MARKER.len(), last_ns);
    }
    tracing::debug!(writes = end + 1, strategy = %session.strategy(), "write phase done");
}

/// Read every index from 0 up to `end`, then from `end` back down to 0.
fn run_sweep(reader: &mut Reader<'_, '_>, end: u64, hide_progress: bool) -> Result<()> {
    let cancel = Arc::new(AtomicBool::new(false));
    ctrlc_handler(Arc::clone(&cancel));

    let total = 2 * (end + 1);
    let progress = SweepProgress::new(total, hide_progress);
    tracing::info!(end, total, "sweep started");

    for index in (0..=end).chain((0..=end).rev()) {
        if cancel.load(Ordering::SeqCst) {
            progress.abandon("cancelled");
            return Err(AppError::Cancelled {
                completed: progress.position(),
            }
            .into());
        }

        let reading = match reader.read_at(index) {
            Ok(reading) => reading,
            Err(e) => {
                progress.abandon("failed");
                return Err(e);
            }
        };
        progress.suspend(|| reader.present(&reading, false));
        progress.inc();
    }

    progress.finish();
    tracing::info!(reads = total, "sweep finished");
    Ok(())
}

/// One index read through the session.
#[derive(Debug)]
struct Reading {
    response: ReadResponse,
    limbs: Vec<Limb>,
    comparison: Vec<CalculationResult>,
}

/// Session plus what every read needs.
struct Reader<'d, 'p> {
    session: Session<'d>,
    strategies: Vec<Strategy>,
    memory_limit: Option<usize>,
    details: bool,
    presenter: &'p CLIResultPresenter,
}

impl Reader<'_, '_> {
    fn read_at(&mut self, index: u64) -> Result<Reading> {
        let index = self.session.seek(SeekFrom::Start(index));
        self.check_memory(index)?;
        let capacity = result_capacity(index)?;

        if let [strategy] = self.strategies[..] {
            self.session.set_strategy(strategy);
            let mut buf = byte_buffer(capacity)?;
            let response = self.session.read_bytes(&mut buf)?;
            let limbs = decode_limbs(&buf[..response.limbs * LIMB_BYTES]);
            return Ok(Reading {
                response,
                limbs,
                comparison: Vec::new(),
            });
        }

        let mut out = zeroed_limbs(capacity)?;
        let comparison = compare_strategies(&mut self.session, &self.strategies, &mut out);
        if let Err(e) = analyze_comparison_results(&comparison) {
            self.presenter.present_comparison(index, &comparison);
            return Err(e.into());
        }

        let (strategy, limbs, elapsed) = comparison
            .iter()
            .find_map(|r| r.outcome.as_ref().ok().map(|l| (r.strategy, l.clone(), r.duration)))
            .context("no successful read")?;
        Ok(Reading {
            response: ReadResponse {
                index,
                strategy,
                limbs: limbs.len(),
                elapsed,
            },
            limbs,
            comparison,
        })
    }

    fn present(&self, reading: &Reading, with_comparison: bool) {
        self.presenter
            .present_result(&reading.response, &reading.limbs, self.details);
        if with_comparison && !reading.comparison.is_empty() {
            self.presenter
                .present_comparison(reading.response.index, &reading.comparison);
        }
    }

    fn check_memory(&self, index: u64) -> Result<()> {
        let Some(limit) = self.memory_limit else {
            return Ok(());
        };
        for &strategy in &self.strategies {
            let estimate = CapacityEstimate::estimate(index, strategy)?;
            if !estimate.fits_in(Some(limit)) {
                return Err(AppError::MemoryLimit {
                    index,
                    needed: estimate.total_bytes,
                    limit,
                }
                .into());
            }
        }
        Ok(())
    }
}

fn ctrlc_handler(cancel: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        cancel.store(true, Ordering::SeqCst);
    }) {
        tracing::warn!(error = %e, "could not install Ctrl+C handler");
    }
}
