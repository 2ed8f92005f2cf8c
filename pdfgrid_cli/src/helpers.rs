use super::GlobalConfiguration;
use anyhow::{Context, Result};
use pdfgrid::manage::SetResolver;
use pdfgrid::metadata::ForcePositive;
use pdfgrid::pdf::Pdf;
use pdfgrid::pids;
use pdfgrid::set::PdfSet;
use prettytable::format::{FormatBuilder, LinePosition, LineSeparator};
use prettytable::Table;

pub fn create_table() -> Table {
    let mut table = Table::new();
    table.set_format(
        FormatBuilder::new()
            .column_separator(' ')
            .separator(LinePosition::Title, LineSeparator::new('-', '+', ' ', ' '))
            .build(),
    );
    table
}

/// Load the member given by `NAME`, `NAME/MEMBER` or an LHAPDF id.
pub fn create_pdf(cfg: &GlobalConfiguration, spec: &str) -> Result<Pdf> {
    let pdf = SetResolver::from_env()
        .load_spec(spec)
        .with_context(|| format!("could not load PDF '{spec}'"))?;

    Ok(match force_positive(cfg) {
        Some(force_positive) => pdf.with_force_positive(force_positive),
        None => pdf,
    })
}

pub fn create_pdf_set(name: &str) -> Result<PdfSet> {
    SetResolver::from_env()
        .load_set(name)
        .with_context(|| format!("could not load PDF set '{name}'"))
}

pub const fn force_positive(cfg: &GlobalConfiguration) -> Option<ForcePositive> {
    if cfg.force_positive {
        Some(ForcePositive::ClipNegative)
    } else {
        None
    }
}

/// Parse a PDG id or a parton name like `g` or `ubar`.
pub fn parse_pid(argument: &str) -> std::result::Result<i32, String> {
    pids::parse_pid(argument).ok_or_else(|| format!("unknown parton '{argument}'"))
}

pub fn pid_label(pid: i32) -> String {
    pids::pid_name(pid).map_or_else(|| pid.to_string(), str::to_owned)
}
