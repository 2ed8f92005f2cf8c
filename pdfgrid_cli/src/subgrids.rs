use super::helpers;
use super::{GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::Parser;
use prettytable::{cell, row};
use std::process::ExitCode;

/// Print the knot ranges of each subgrid of a set member.
#[derive(Parser)]
pub struct Opts {
    /// Name of the PDF set, optionally followed by `/MEMBER`, or an LHAPDF ID.
    #[arg(value_name = "PDFSET")]
    pdfset: String,
}

impl Subcommand for Opts {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode> {
        let pdf = helpers::create_pdf(cfg, &self.pdfset)?;

        let mut table = helpers::create_table();
        table.set_titles(row![
            c => "s", "nx", "xmin", "xmax", "nq", "Qmin", "Qmax", "interp", "order"
        ]);

        for (index, subgrid) in pdf.subgrids().iter().enumerate() {
            let qs = subgrid.qs();

            table.add_row(row![
                r->index,
                r->subgrid.xs().len(),
                r->subgrid.x_min(),
                r->subgrid.x_max(),
                r->qs.len(),
                r->qs[0],
                r->qs[qs.len() - 1],
                l->subgrid.interpolator(),
                c->format!("{}x{}", subgrid.x_order(), subgrid.q2_order())
            ]);
        }

        table.printstd();

        Ok(ExitCode::SUCCESS)
    }
}
