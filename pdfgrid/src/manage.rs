//! Resolution of PDF set names to directories on the local filesystem.

use super::error::{Error, Result};
use super::parser;
use super::pdf::Pdf;
use super::set::PdfSet;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variables holding `:`-separated lists of directories with PDF sets, in order of
/// precedence.
pub const DATA_PATH_VARIABLES: [&str; 2] = ["PDFGRID_DATA_PATH", "LHAPDF_DATA_PATH"];

/// Name of the file mapping LHAPDF ids to set names.
pub const INDEX_FILE: &str = "pdfsets.index";

/// Finds PDF sets in an ordered list of directories.
#[derive(Clone, Debug, Default)]
pub struct SetResolver {
    paths: Vec<PathBuf>,
}

fn is_set_dir(dir: &Path) -> bool {
    parser::set_name(dir).is_ok_and(|name| parser::info_path(dir, &name).is_file())
}

impl SetResolver {
    /// Resolver without any search path; only paths to set directories can be resolved.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver searching the directories listed in the variables [`DATA_PATH_VARIABLES`], or
    /// the current directory if none are set.
    #[must_use]
    pub fn from_env() -> Self {
        let mut paths: Vec<PathBuf> = DATA_PATH_VARIABLES
            .iter()
            .filter_map(|variable| env::var(variable).ok())
            .flat_map(|value| {
                value
                    .split(':')
                    .filter(|path| !path.is_empty())
                    .map(PathBuf::from)
                    .collect::<Vec<_>>()
            })
            .collect();

        if paths.is_empty() {
            paths.push(PathBuf::from("."));
        }

        debug!(?paths, "PDF set search paths");

        Self { paths }
    }

    /// Append `path` to the search paths.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_path(path);
        self
    }

    /// Append `path` to the search paths.
    pub fn add_path(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    /// The search paths in order of precedence.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Return the directory of the set `name`. `name` can also be the path of a set directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSet`] if no search path contains the set.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let direct = Path::new(name);

        if direct.components().count() > 1 && is_set_dir(direct) {
            debug!(name, "PDF set given as path");
            return Ok(direct.to_path_buf());
        }

        self.paths
            .iter()
            .map(|path| path.join(name))
            .find(|dir| is_set_dir(dir))
            .inspect(|dir| debug!(name, dir = %dir.display(), "resolved PDF set"))
            .ok_or_else(|| Error::UnknownSet(name.to_owned()))
    }

    /// Names of all sets found in the search paths, sorted alphabetically.
    #[must_use]
    pub fn available_sets(&self) -> Vec<String> {
        self.paths
            .iter()
            .filter_map(|path| fs::read_dir(path).ok())
            .flatten()
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|dir| is_set_dir(dir))
            .filter_map(|dir| parser::set_name(&dir).ok())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Return the set name and member index of the LHAPDF id `lhaid`, using the first
    /// `pdfsets.index` file found in the search paths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSet`] if there is no index file or no set with a smaller or
    /// equal id, and [`Error::Format`] if the index file is malformed.
    pub fn lookup_lhaid(&self, lhaid: u32) -> Result<(String, usize)> {
        let index = self
            .paths
            .iter()
            .map(|path| path.join(INDEX_FILE))
            .find(|path| path.is_file())
            .ok_or_else(|| Error::UnknownSet(lhaid.to_string()))?;
        let contents = fs::read_to_string(&index).map_err(|err| Error::io(&index, err))?;

        let mut best: Option<(u32, &str)> = None;

        for line in contents.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let (Some(id), Some(name)) = (tokens.next(), tokens.next()) else {
                return Err(Error::Format(format!(
                    "{}: malformed line '{line}'",
                    index.display()
                )));
            };
            let id: u32 = id.parse().map_err(|_| {
                Error::Format(format!("{}: malformed id in '{line}'", index.display()))
            })?;

            if id <= lhaid && best.is_none_or(|(best_id, _)| id > best_id) {
                best = Some((id, name));
            }
        }

        let (id, name) = best.ok_or_else(|| Error::UnknownSet(lhaid.to_string()))?;
        let member = usize::try_from(lhaid - id).map_err(|_| Error::UnknownSet(lhaid.to_string()))?;

        debug!(lhaid, name, member, "looked up LHAPDF id");

        Ok((name.to_owned(), member))
    }

    /// Split a set specification `NAME`, `NAME/MEMBER` or LHAPDF id into set name and member.
    ///
    /// # Errors
    ///
    /// See [`SetResolver::lookup_lhaid`].
    pub fn parse_spec(&self, spec: &str) -> Result<(String, usize)> {
        if let Ok(lhaid) = spec.parse::<u32>() {
            return self.lookup_lhaid(lhaid);
        }

        if let Some((name, member)) = spec.rsplit_once('/')
            && let Ok(member) = member.parse()
        {
            return Ok((name.to_owned(), member));
        }

        Ok((spec.to_owned(), 0))
    }

    /// Load member `member` of the set `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSet`] if the set cannot be found, or the error of
    /// [`Pdf::from_dir`].
    pub fn load_pdf(&self, name: &str, member: usize) -> Result<Pdf> {
        Pdf::from_dir(&self.resolve(name)?, member)
    }

    /// Load the member given by the set specification `spec`, see
    /// [`SetResolver::parse_spec`].
    ///
    /// # Errors
    ///
    /// See [`SetResolver::parse_spec`] and [`SetResolver::load_pdf`].
    pub fn load_spec(&self, spec: &str) -> Result<Pdf> {
        let (name, member) = self.parse_spec(spec)?;
        self.load_pdf(&name, member)
    }

    /// Load all members of the set `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSet`] if the set cannot be found, or the error of
    /// [`PdfSet::from_dir`].
    pub fn load_set(&self, name: &str) -> Result<PdfSet> {
        PdfSet::from_dir(&self.resolve(name)?)
    }
}
