use super::helpers;
use super::{GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::Parser;
use prettytable::{cell, row};
use rayon::prelude::*;
use std::process::ExitCode;

/// Calculates the PDF uncertainty of a parton density at a single point.
#[derive(Parser)]
#[command(allow_negative_numbers = true)]
pub struct Opts {
    /// Name of the PDF set.
    #[arg(value_name = "PDFSET")]
    pdfset: String,
    /// Parton given as PDG ID or name.
    #[arg(value_parser = helpers::parse_pid)]
    pid: i32,
    /// Momentum fraction.
    x: f64,
    /// Squared factorization scale.
    #[arg(value_name = "Q2")]
    q2: f64,
    /// Set the number of fractional digits shown.
    #[arg(default_value_t = 7, long)]
    digits: usize,
}

impl Subcommand for Opts {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode> {
        let set = helpers::create_pdf_set(&self.pdfset)?;
        let force_positive = helpers::force_positive(cfg);

        let values = set
            .members()
            .par_iter()
            .map(|pdf| -> Result<f64> {
                let value = pdf.xfxq2(self.pid, self.x, self.q2)?;
                Ok(force_positive.map_or(value, |force_positive| force_positive.apply(value)))
            })
            .collect::<Result<Vec<_>>>()?;
        let uncertainty = set.uncertainty(&values)?;

        let mut table = helpers::create_table();
        table.set_titles(row![c => "pid", "central", "errplus", "errminus", "errsymm", "type"]);
        table.add_row(row![
            r->self.pid,
            r->format!("{:.*e}", self.digits, uncertainty.central),
            r->format!("{:.*e}", self.digits, uncertainty.errplus),
            r->format!("{:.*e}", self.digits, uncertainty.errminus),
            r->format!("{:.*e}", self.digits, uncertainty.errsymm),
            l->set.metadata().error_type()
        ]);

        table.printstd();

        Ok(ExitCode::SUCCESS)
    }
}
