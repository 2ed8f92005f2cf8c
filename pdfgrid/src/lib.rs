//! `pdfgrid` evaluates parton distribution functions and the strong coupling from grids stored in
//! the LHAPDF 6 (`lhagrid1`) format.
//!
//! A set is read with [`pdf::Pdf::load`] for a single member or [`set::PdfSet::load`] for all of
//! them. Sets are searched for in the directories listed in `PDFGRID_DATA_PATH` and
//! `LHAPDF_DATA_PATH`, see [`manage::SetResolver`]. Everything is immutable once loaded, so
//! members can be shared between threads without locking.

mod extrapolation;
mod interpolation;

pub mod alphas;
pub mod cache;
pub mod error;
pub mod manage;
pub mod metadata;
pub mod parser;
pub mod pdf;
pub mod pids;
pub mod set;
pub mod subgrid;
pub mod uncertainty;
