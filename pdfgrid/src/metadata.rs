//! Set-level attributes read from the `.info` file of a PDF set.

use super::error::{Error, Result};
use serde::Deserialize;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Interpolation scheme used inside a subgrid.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(try_from = "String")]
pub enum InterpolatorType {
    /// Cubic Hermite interpolation in `ln x` and `ln Q2`.
    #[default]
    LogBicubic,
    /// Cubic Hermite interpolation in `x` and `Q2`.
    Bicubic,
    /// Linear interpolation in `ln x` and `ln Q2`.
    LogBilinear,
    /// Linear interpolation in `x` and `Q2`.
    Bilinear,
}

impl InterpolatorType {
    /// Return `true` if the interpolation works on logarithmic coordinates.
    #[must_use]
    pub const fn is_log(self) -> bool {
        matches!(self, Self::LogBicubic | Self::LogBilinear)
    }

    /// Return `true` if the interpolation uses cubic polynomials.
    #[must_use]
    pub const fn is_cubic(self) -> bool {
        matches!(self, Self::LogBicubic | Self::Bicubic)
    }

    /// Number of knots per dimension a single interpolation uses.
    #[must_use]
    pub const fn order(self) -> usize {
        if self.is_cubic() { 4 } else { 2 }
    }

    /// The linear scheme working on the same coordinates.
    #[must_use]
    pub const fn linear(self) -> Self {
        if self.is_log() {
            Self::LogBilinear
        } else {
            Self::Bilinear
        }
    }
}

impl FromStr for InterpolatorType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "logcubic" | "log" => Ok(Self::LogBicubic),
            "cubic" => Ok(Self::Bicubic),
            "loglinear" => Ok(Self::LogBilinear),
            "linear" => Ok(Self::Bilinear),
            _ => Err(Error::Format(format!("unknown interpolator '{s}'"))),
        }
    }
}

impl TryFrom<String> for InterpolatorType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl Display for InterpolatorType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::LogBicubic => "logcubic",
            Self::Bicubic => "cubic",
            Self::LogBilinear => "loglinear",
            Self::Bilinear => "linear",
        })
    }
}

/// Behavior of a PDF outside the tabulated region.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(try_from = "String")]
pub enum ExtrapolatorType {
    /// Continue the boundary behavior of the grid.
    #[default]
    Continuation,
    /// Freeze the PDF at the closest point on the grid boundary.
    Nearest,
}

impl FromStr for ExtrapolatorType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "continuation" => Ok(Self::Continuation),
            "nearest" => Ok(Self::Nearest),
            _ => Err(Error::Format(format!("unsupported extrapolator '{s}'"))),
        }
    }
}

impl TryFrom<String> for ExtrapolatorType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl Display for ExtrapolatorType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Continuation => "continuation",
            Self::Nearest => "nearest",
        })
    }
}

/// How the strong coupling of a set is computed.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(try_from = "String")]
pub enum AlphaSType {
    /// Interpolation of the tabulated values in `AlphaS_Qs` and `AlphaS_Vals`.
    Ipol,
    /// Approximate analytic solution of the renormalization group equation.
    Analytic,
    /// Numerical solution of the renormalization group equation; the tabulated values are used
    /// when present.
    Ode,
}

impl FromStr for AlphaSType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ipol" => Ok(Self::Ipol),
            "analytic" => Ok(Self::Analytic),
            "ode" => Ok(Self::Ode),
            _ => Err(Error::Format(format!("unknown alphas type '{s}'"))),
        }
    }
}

impl TryFrom<String> for AlphaSType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl Display for AlphaSType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Ipol => "ipol",
            Self::Analytic => "analytic",
            Self::Ode => "ode",
        })
    }
}

/// Kind of distribution stored in a set.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(try_from = "String")]
pub enum SetType {
    /// Parton distribution functions.
    #[default]
    Pdf,
    /// Fragmentation functions.
    FragFn,
}

impl FromStr for SetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" | "spacelike" => Ok(Self::Pdf),
            "fragfn" | "timelike" => Ok(Self::FragFn),
            _ => Err(Error::Format(format!("unknown set type '{s}'"))),
        }
    }
}

impl TryFrom<String> for SetType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl Display for SetType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Pdf => "pdf",
            Self::FragFn => "fragfn",
        })
    }
}

/// Clipping applied to every value returned by a PDF.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(try_from = "u8")]
pub enum ForcePositive {
    /// Values are returned unchanged.
    #[default]
    Off,
    /// Negative values are replaced by zero.
    ClipNegative,
    /// Values smaller than `1e-10` are replaced by `1e-10`.
    ClipSmall,
}

impl ForcePositive {
    /// Apply the clipping to `value`.
    #[must_use]
    pub const fn apply(self, value: f64) -> f64 {
        match self {
            Self::Off => value,
            Self::ClipNegative if value < 0.0 => 0.0,
            Self::ClipSmall if value < 1e-10 => 1e-10,
            Self::ClipNegative | Self::ClipSmall => value,
        }
    }
}

impl TryFrom<u8> for ForcePositive {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::ClipNegative),
            2 => Ok(Self::ClipSmall),
            _ => Err(Error::Format(format!("invalid ForcePositive value {value}"))),
        }
    }
}

impl From<ForcePositive> for u8 {
    fn from(value: ForcePositive) -> Self {
        match value {
            ForcePositive::Off => 0,
            ForcePositive::ClipNegative => 1,
            ForcePositive::ClipSmall => 2,
        }
    }
}

/// Contents of the `.info` file of a PDF set. Keys that are not present take the defaults used
/// by LHAPDF, unknown keys are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MetaData {
    /// Free-form description of the set.
    #[serde(rename = "SetDesc")]
    pub set_desc: String,
    /// LHAPDF id of the central member.
    #[serde(rename = "SetIndex")]
    pub set_index: Option<u32>,
    /// Authors of the set.
    #[serde(rename = "Authors")]
    pub authors: String,
    /// Literature reference.
    #[serde(rename = "Reference")]
    pub reference: String,
    /// Format of the member files.
    #[serde(rename = "Format")]
    pub format: String,
    /// Version of the data files.
    #[serde(rename = "DataVersion")]
    pub data_version: Option<i32>,
    /// Number of members, including the central one.
    #[serde(rename = "NumMembers")]
    pub num_members: Option<usize>,
    /// PDG id of the hadron the PDFs describe.
    #[serde(rename = "Particle")]
    pub particle: Option<i32>,
    /// PDG ids of the tabulated partons.
    #[serde(rename = "Flavors")]
    pub flavors: Vec<i32>,
    /// Perturbative order of the evolution.
    #[serde(rename = "OrderQCD")]
    pub order_qcd: Option<u32>,
    /// Flavor-number scheme, for instance `variable` or `fixed`.
    #[serde(rename = "FlavorScheme")]
    pub flavor_scheme: String,
    /// Maximum number of active flavors.
    #[serde(rename = "NumFlavors")]
    pub num_flavors: Option<u32>,
    /// Whether the set describes helicity differences of polarized hadrons.
    #[serde(rename = "Polarized")]
    pub polarized: bool,
    /// Whether the set contains PDFs or fragmentation functions.
    #[serde(rename = "SetType")]
    pub set_type: SetType,
    /// Error treatment of the members, for instance `replicas` or `hessian`.
    #[serde(rename = "ErrorType")]
    pub error_type: Option<String>,
    /// Confidence level of the uncertainties in percent.
    #[serde(rename = "ErrorConfLevel")]
    pub error_conf_level: Option<f64>,
    /// Smallest tabulated momentum fraction.
    #[serde(rename = "XMin")]
    pub x_min: Option<f64>,
    /// Largest tabulated momentum fraction.
    #[serde(rename = "XMax")]
    pub x_max: Option<f64>,
    /// Smallest tabulated scale.
    #[serde(rename = "QMin")]
    pub q_min: Option<f64>,
    /// Largest tabulated scale.
    #[serde(rename = "QMax")]
    pub q_max: Option<f64>,
    /// Mass of the Z boson.
    #[serde(rename = "MZ")]
    pub m_z: Option<f64>,
    /// Mass of the down quark.
    #[serde(rename = "MDown")]
    pub m_down: Option<f64>,
    /// Mass of the up quark.
    #[serde(rename = "MUp")]
    pub m_up: Option<f64>,
    /// Mass of the strange quark.
    #[serde(rename = "MStrange")]
    pub m_strange: Option<f64>,
    /// Mass of the charm quark.
    #[serde(rename = "MCharm")]
    pub m_charm: Option<f64>,
    /// Mass of the bottom quark.
    #[serde(rename = "MBottom")]
    pub m_bottom: Option<f64>,
    /// Mass of the top quark.
    #[serde(rename = "MTop")]
    pub m_top: Option<f64>,
    /// Strong coupling at the Z mass.
    #[serde(rename = "AlphaS_MZ")]
    pub alphas_mz: Option<f64>,
    /// Perturbative order of the running coupling.
    #[serde(rename = "AlphaS_OrderQCD")]
    pub alphas_order_qcd: Option<u32>,
    /// Method used to compute the strong coupling.
    #[serde(rename = "AlphaS_Type")]
    pub alphas_type: Option<AlphaSType>,
    /// Scales at which the strong coupling is tabulated.
    #[serde(rename = "AlphaS_Qs")]
    pub alphas_qs: Vec<f64>,
    /// Tabulated values of the strong coupling.
    #[serde(rename = "AlphaS_Vals")]
    pub alphas_vals: Vec<f64>,
    /// QCD scale for three active flavors.
    #[serde(rename = "AlphaS_Lambda3")]
    pub alphas_lambda3: Option<f64>,
    /// QCD scale for four active flavors.
    #[serde(rename = "AlphaS_Lambda4")]
    pub alphas_lambda4: Option<f64>,
    /// QCD scale for five active flavors.
    #[serde(rename = "AlphaS_Lambda5")]
    pub alphas_lambda5: Option<f64>,
    /// Interpolation scheme of the subgrids.
    #[serde(rename = "Interpolator")]
    pub interpolator: InterpolatorType,
    /// Extrapolation outside the grid.
    #[serde(rename = "Extrapolator")]
    pub extrapolator: ExtrapolatorType,
    /// Clipping of returned values.
    #[serde(rename = "ForcePositive")]
    pub force_positive: ForcePositive,
}

impl MetaData {
    /// Parse the YAML contents of an `.info` file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if `yaml` is not a valid document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|err| Error::Format(err.to_string()))
    }

    /// Error type of the set; `replicas` if it is not given.
    #[must_use]
    pub fn error_type(&self) -> &str {
        self.error_type.as_deref().unwrap_or("replicas")
    }
}
