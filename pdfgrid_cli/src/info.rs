use super::helpers;
use super::{GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::Parser;
use itertools::Itertools;
use pdfgrid::alphas::AlphaS;
use prettytable::{cell, row};
use std::process::ExitCode;

/// Shows the metadata of a PDF set.
#[derive(Parser)]
pub struct Opts {
    /// Name of the PDF set, optionally followed by `/MEMBER`, or an LHAPDF ID.
    #[arg(value_name = "PDFSET")]
    pdfset: String,
}

impl Subcommand for Opts {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode> {
        let pdf = helpers::create_pdf(cfg, &self.pdfset)?;
        let metadata = pdf.metadata();
        let mut table = helpers::create_table();

        let optional = |value: Option<String>| value.unwrap_or_else(|| "-".to_owned());
        let alphas = match pdf.alphas() {
            AlphaS::Ipol(ipol) => format!("ipol ({} ranges)", ipol.threshold_ranges()),
            AlphaS::Analytic(_) => "analytic".to_owned(),
            AlphaS::Unavailable(_) => "-".to_owned(),
        };

        table.add_row(row!["name", pdf.set_name()]);
        table.add_row(row!["description", pdf.set_desc()]);
        table.add_row(row!["member", pdf.member()]);
        table.add_row(row!["type", optional(pdf.pdf_type().map(str::to_owned))]);
        table.add_row(row!["index", optional(pdf.set_index().map(|i| i.to_string()))]);
        table.add_row(row!["lhaid", optional(pdf.lhapdf_id().map(|i| i.to_string()))]);
        table.add_row(row![
            "members",
            optional(pdf.num_members().map(|n| n.to_string()))
        ]);
        table.add_row(row!["set type", metadata.set_type]);
        table.add_row(row!["polarized", metadata.polarized]);
        table.add_row(row!["error type", metadata.error_type()]);
        table.add_row(row![
            "flavors",
            pdf.flavor_ids().iter().map(|&pid| helpers::pid_label(pid)).join(", ")
        ]);
        table.add_row(row!["x", format!("{} .. {}", pdf.x_min(), pdf.x_max())]);
        table.add_row(row!["Q", format!("{} .. {}", pdf.q_min(), pdf.q_max())]);
        table.add_row(row!["subgrids", pdf.subgrid_count()]);
        table.add_row(row!["interpolator", pdf.interpolator()]);
        table.add_row(row!["extrapolator", pdf.extrapolator()]);
        table.add_row(row!["force positive", u8::from(pdf.force_positive())]);
        table.add_row(row!["alphas", alphas]);
        table.add_row(row![
            "alphas(MZ)",
            optional(metadata.alphas_mz.map(|a| a.to_string()))
        ]);

        table.printstd();

        Ok(ExitCode::SUCCESS)
    }
}
