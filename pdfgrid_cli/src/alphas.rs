use super::helpers;
use super::{GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::Parser;
use prettytable::{cell, row};
use std::process::ExitCode;

/// Evaluates the strong coupling of a PDF set.
#[derive(Parser)]
pub struct Opts {
    /// Name of the PDF set, optionally followed by `/MEMBER`, or an LHAPDF ID.
    #[arg(value_name = "PDFSET")]
    pdfset: String,
    /// Squared renormalization scales.
    #[arg(num_args = 1.., required = true, value_name = "Q2")]
    q2s: Vec<f64>,
    /// Set the number of fractional digits shown.
    #[arg(default_value_t = 7, long)]
    digits: usize,
}

impl Subcommand for Opts {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode> {
        let pdf = helpers::create_pdf(cfg, &self.pdfset)?;

        let mut table = helpers::create_table();
        table.set_titles(row![c => "Q2", "alphas"]);

        for &q2 in &self.q2s {
            let alphas = pdf.alphas_q2(q2)?;

            table.add_row(row![r->q2, r->format!("{:.*e}", self.digits, alphas)]);
        }

        table.printstd();

        Ok(ExitCode::SUCCESS)
    }
}
