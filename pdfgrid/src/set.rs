//! Module containing [`PdfSet`], all members of a PDF set.

use super::alphas::AlphaS;
use super::error::{Error, Result};
use super::manage::SetResolver;
use super::metadata::MetaData;
use super::parser;
use super::pdf::Pdf;
use super::uncertainty::{ErrorType, PdfUncertainty};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::slice::Iter;
use std::sync::Arc;
use tracing::info;

/// All members of a PDF set, ordered by their index. Member `0` is the central member.
#[derive(Clone, Debug)]
pub struct PdfSet {
    name: String,
    path: PathBuf,
    metadata: Arc<MetaData>,
    members: Vec<Pdf>,
}

impl PdfSet {
    /// Load the set `name` found by [`SetResolver::from_env`].
    ///
    /// # Errors
    ///
    /// See [`SetResolver::load_set`].
    pub fn load(name: &str) -> Result<Self> {
        SetResolver::from_env().load_set(name)
    }

    /// Load every member of the set stored in the directory `dir`. The number of members is
    /// given by `NumMembers`, or by the member files present if the key is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if a file cannot be read and [`Error::Format`] if a file violates
    /// the grid format or the set has no member.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let name = parser::set_name(dir)?;
        let metadata = parser::read_info(&parser::info_path(dir, &name))?;
        let alphas = AlphaS::from_metadata(&metadata).map_err(|err| match err {
            Error::Format(message) => Error::Format(format!("{name}.info: {message}")),
            err => err,
        })?;

        let num_members = metadata.num_members.unwrap_or_else(|| {
            (0..)
                .take_while(|&member| parser::member_path(dir, &name, member).is_file())
                .count()
        });

        if num_members == 0 {
            return Err(Error::Format(format!("set '{name}' does not have any member")));
        }

        info!(set = %name, members = num_members, "loading PDF set");

        let metadata = Arc::new(metadata);
        let alphas = Arc::new(alphas);

        let members = (0..num_members)
            .into_par_iter()
            .map(|member| {
                Pdf::from_member_file(
                    &name,
                    member,
                    Arc::clone(&metadata),
                    Arc::clone(&alphas),
                    &parser::member_path(dir, &name, member),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name,
            path: dir.to_path_buf(),
            metadata,
            members,
        })
    }

    /// Name of the set.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory the set was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Metadata shared by all members.
    #[must_use]
    pub fn metadata(&self) -> &MetaData {
        &self.metadata
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`, a loaded set has at least its central member.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The central member.
    #[must_use]
    pub fn central(&self) -> &Pdf {
        &self.members[0]
    }

    /// Member `member`, if it exists.
    #[must_use]
    pub fn member(&self, member: usize) -> Option<&Pdf> {
        self.members.get(member)
    }

    /// All members ordered by their index.
    #[must_use]
    pub fn members(&self) -> &[Pdf] {
        &self.members
    }

    /// Take the members out of the set.
    #[must_use]
    pub fn into_members(self) -> Vec<Pdf> {
        self.members
    }

    /// Iterate over the members.
    pub fn iter(&self) -> Iter<'_, Pdf> {
        self.members.iter()
    }

    /// The parsed `ErrorType` of the set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the error type is not known.
    pub fn error_type(&self) -> Result<ErrorType> {
        self.metadata.error_type().parse()
    }

    /// Compute the PDF uncertainty of `values`, which must hold one value per member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the number of values differs from the number of members
    /// or does not fit the error type.
    pub fn uncertainty(&self, values: &[f64]) -> Result<PdfUncertainty> {
        if values.len() != self.members.len() {
            return Err(Error::Format(format!(
                "got {} values for {} members",
                values.len(),
                self.members.len()
            )));
        }

        self.error_type()?.uncertainty(values)
    }

    /// Compute the PDF uncertainty of [`Pdf::xfxq2`].
    ///
    /// # Errors
    ///
    /// See [`Pdf::xfxq2`] and [`PdfSet::uncertainty`].
    pub fn xfxq2_uncertainty(&self, pid: i32, x: f64, q2: f64) -> Result<PdfUncertainty> {
        let values = self
            .members
            .par_iter()
            .map(|pdf| pdf.xfxq2(pid, x, q2))
            .collect::<Result<Vec<_>>>()?;

        self.uncertainty(&values)
    }
}

impl<'a> IntoIterator for &'a PdfSet {
    type Item = &'a Pdf;
    type IntoIter = Iter<'a, Pdf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
