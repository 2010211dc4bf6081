//! CLI result presenter.

use fibengine_core::{render_decimal, Limb};
use fibengine_device::{CalculationResult, ReadResponse, ResultPresenter};

use crate::output::{
    format_duration, format_json_line, format_json_write, format_number, format_read_line,
    format_result, format_write_line,
};
use crate::ui::{print_error, print_header, status_tag};

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
    json: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool, json: bool) -> Self {
        Self {
            verbose,
            quiet,
            json,
        }
    }

    /// The lines printed for one read, without the trailing newline.
    #[must_use]
    pub fn render_result(&self, response: &ReadResponse, limbs: &[Limb], details: bool) -> String {
        let decimal = render_decimal(limbs);
        if self.json {
            return format_json_line(response, &decimal);
        }
        if self.quiet {
            return decimal;
        }

        let mut out = format_read_line(response.index, &decimal);
        if details {
            out.push_str(&format!(
                "\n  strategy: {}, limbs: {}, digits: {}, elapsed: {}",
                response.strategy,
                format_number(response.limbs as u64),
                format_number(decimal.len() as u64),
                format_duration(response.elapsed),
            ));
        }
        out
    }

    /// The line printed for one side-channel write.
    #[must_use]
    pub fn render_write(&self, written: usize, last_ns: u64) -> String {
        if self.json {
            format_json_write(written, last_ns)
        } else if self.quiet {
            last_ns.to_string()
        } else {
            format_write_line(last_ns)
        }
    }

    /// One row of the comparison table.
    #[must_use]
    pub fn render_comparison_row(&self, result: &CalculationResult) -> String {
        let summary = match &result.outcome {
            Ok(limbs) => format_result(&render_decimal(limbs), self.verbose),
            Err(e) => e.to_string(),
        };
        format!(
            "  {:<22} {:>10} [{}] {}",
            result.strategy.name(),
            format_duration(result.duration),
            status_tag(result.outcome.is_ok()),
            summary,
        )
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_result(&self, response: &ReadResponse, limbs: &[Limb], details: bool) {
        println!("{}", self.render_result(response, limbs, details));
    }

    fn present_write(&self, written: usize, last_ns: u64) {
        println!("{}", self.render_write(written, last_ns));
    }

    fn present_comparison(&self, index: u64, results: &[CalculationResult]) {
        if self.quiet || self.json {
            return;
        }

        print_header(&format!("Comparison F({})", format_number(index)));
        for result in results {
            println!("{}", self.render_comparison_row(result));
        }
    }

    fn present_error(&self, error: &str) {
        print_error(error);
    }
}
