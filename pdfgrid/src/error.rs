//! Module containing the error type of this crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Catch-all error for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A file belonging to a PDF set could not be read.
    #[error("could not read '{}'", path.display())]
    Io {
        /// Path of the file that failed to be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A file was read but its contents violate the grid format.
    #[error("{0}")]
    Format(String),
    /// A PDF set name or LHAPDF id could not be resolved to a directory.
    #[error("PDF set '{0}' not found")]
    UnknownSet(String),
    /// The requested flavor is not tabulated in the PDF.
    #[error("flavor with PDG id {0} is not part of the PDF")]
    UnknownFlavor(i32),
    /// A query argument lies outside the mathematical domain.
    #[error("{0}")]
    Domain(String),
    /// The strong coupling cannot be computed from the data of the set.
    #[error("{0}")]
    Coupling(String),
}

/// Type for the error of this crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
