use super::helpers;
use super::{GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::Parser;
use prettytable::{cell, row};
use std::process::ExitCode;

/// Evaluates the PDFs of a set member at a single point.
#[derive(Parser)]
pub struct Opts {
    /// Name of the PDF set, optionally followed by `/MEMBER`, or an LHAPDF ID.
    #[arg(value_name = "PDFSET")]
    pdfset: String,
    /// Momentum fraction.
    x: f64,
    /// Squared factorization scale.
    #[arg(value_name = "Q2")]
    q2: f64,
    /// Show only the given partons, as PDG IDs or names.
    #[arg(
        long,
        require_equals = true,
        value_delimiter = ',',
        value_name = "PIDS",
        value_parser = helpers::parse_pid
    )]
    pids: Vec<i32>,
    /// Set the number of fractional digits shown.
    #[arg(default_value_t = 7, long)]
    digits: usize,
}

impl Subcommand for Opts {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode> {
        let pdf = helpers::create_pdf(cfg, &self.pdfset)?;
        let pids = if self.pids.is_empty() {
            pdf.flavor_ids().to_vec()
        } else {
            self.pids.clone()
        };
        let values = pdf.xfxq2s(&pids, &[self.x], &[self.q2])?;

        let mut table = helpers::create_table();
        table.set_titles(row![c => "pid", "name", "xfx"]);

        for (&pid, value) in pids.iter().zip(values.iter()) {
            table.add_row(row![
                r->pid,
                l->helpers::pid_label(pid),
                r->format!("{:.*e}", self.digits, value)
            ]);
        }

        table.printstd();

        Ok(ExitCode::SUCCESS)
    }
}
