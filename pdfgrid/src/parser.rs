//! Readers for the files of an LHAPDF set.

use super::error::{Error, Result};
use super::metadata::MetaData;
use serde::Deserialize;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Header of a member file, in front of the first `---` separator.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MemberHeader {
    /// Role of the member, for instance `central`, `replica` or `error`.
    #[serde(rename = "PdfType")]
    pub pdf_type: Option<String>,
    /// Format of the member file.
    #[serde(rename = "Format")]
    pub format: Option<String>,
}

/// One subgrid block of a member file, with the values still flat.
#[derive(Debug)]
pub struct SubGridBlock {
    /// Knots in x.
    pub xs: Vec<f64>,
    /// Knots in Q.
    pub qs: Vec<f64>,
    /// PDG ids in column order.
    pub pids: Vec<i32>,
    /// Values in row-major order of (x, Q, flavor).
    pub values: Vec<f64>,
}

/// Contents of a member file.
#[derive(Debug)]
pub struct MemberFile {
    /// The YAML header.
    pub header: MemberHeader,
    /// The subgrids in the order of the file.
    pub blocks: Vec<SubGridBlock>,
}

/// Name of the set stored in the directory `dir`.
///
/// # Errors
///
/// Returns [`Error::UnknownSet`] if `dir` does not end in a directory name.
pub fn set_name(dir: &Path) -> Result<String> {
    dir.file_name()
        .and_then(OsStr::to_str)
        .map(str::to_owned)
        .ok_or_else(|| Error::UnknownSet(dir.display().to_string()))
}

/// Path of the `.info` file of the set `set_name` stored in `dir`.
#[must_use]
pub fn info_path(dir: &Path, set_name: &str) -> PathBuf {
    dir.join(format!("{set_name}.info"))
}

/// Path of the file of member `member` of the set `set_name` stored in `dir`.
#[must_use]
pub fn member_path(dir: &Path, set_name: &str, member: usize) -> PathBuf {
    dir.join(format!("{set_name}_{member:04}.dat"))
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| Error::io(path, err))
}

/// Read and parse the `.info` file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Format`] if it is not a valid
/// metadata document.
pub fn read_info(path: &Path) -> Result<MetaData> {
    MetaData::from_yaml(&read_to_string(path)?)
        .map_err(|err| Error::Format(format!("{}: {err}", path.display())))
}

fn parse_line<T: FromStr>(line: &str, what: &str) -> std::result::Result<Vec<T>, String> {
    line.split_whitespace()
        .map(|token| {
            token
                .parse()
                .map_err(|_| format!("could not parse '{token}' in the {what}"))
        })
        .collect()
}

fn parse_block(lines: &[&str]) -> std::result::Result<SubGridBlock, String> {
    let [x_line, q_line, pid_line, rows @ ..] = lines else {
        return Err("block is missing its x, Q or flavor line".to_owned());
    };

    let xs: Vec<f64> = parse_line(x_line, "x knots")?;
    let qs: Vec<f64> = parse_line(q_line, "Q knots")?;
    let pids: Vec<i32> = parse_line(pid_line, "flavor list")?;

    if rows.len() != xs.len() * qs.len() {
        return Err(format!(
            "found {} rows of values, expected {} x-knots times {} Q-knots",
            rows.len(),
            xs.len(),
            qs.len()
        ));
    }

    let mut values = Vec::with_capacity(rows.len() * pids.len());

    for (index, row) in rows.iter().enumerate() {
        let row: Vec<f64> = parse_line(row, "values")?;

        if row.len() != pids.len() {
            return Err(format!(
                "row {index} has {} values but {} flavors are declared",
                row.len(),
                pids.len()
            ));
        }

        values.extend(row);
    }

    Ok(SubGridBlock {
        xs,
        qs,
        pids,
        values,
    })
}

/// Parse the contents of a member file.
///
/// # Errors
///
/// Returns a message describing the first violation of the format.
pub fn parse_member(contents: &str) -> std::result::Result<MemberFile, String> {
    let mut sections = vec![Vec::new()];

    for line in contents.lines().map(str::trim) {
        if line == "---" {
            sections.push(Vec::new());
        } else if !line.is_empty()
            && let Some(section) = sections.last_mut()
        {
            section.push(line);
        }
    }

    if sections.len() < 2 {
        return Err("the header is not terminated by '---'".to_owned());
    }

    let header_lines = sections.remove(0);
    let header: MemberHeader = if header_lines.is_empty() {
        MemberHeader::default()
    } else {
        serde_yaml::from_str(&header_lines.join("\n")).map_err(|err| err.to_string())?
    };

    if let Some(format) = header.format.as_deref().filter(|&format| format != "lhagrid1") {
        return Err(format!("unsupported format '{format}'"));
    }

    let blocks = sections
        .iter()
        .filter(|section| !section.is_empty())
        .enumerate()
        .map(|(index, section)| {
            parse_block(section).map_err(|err| format!("subgrid {index}: {err}"))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if blocks.is_empty() {
        return Err("the file does not contain any subgrid".to_owned());
    }

    Ok(MemberFile { header, blocks })
}

/// Read and parse the member file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Format`] if its contents
/// violate the `lhagrid1` format.
pub fn read_member(path: &Path) -> Result<MemberFile> {
    parse_member(&read_to_string(path)?)
        .map_err(|err| Error::Format(format!("{}: {err}", path.display())))
}
