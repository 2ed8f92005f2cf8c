//! Module containing [`Pdf`], a single member of a PDF set.

use super::alphas::AlphaS;
use super::error::{Error, Result};
use super::extrapolation;
use super::manage::SetResolver;
use super::metadata::{ExtrapolatorType, ForcePositive, InterpolatorType, MetaData};
use super::parser::{self, MemberFile};
use super::pids::{self, FlavorTable};
use super::set::PdfSet;
use super::subgrid::SubGrid;
use ndarray::{Array3, Zip};
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// One member of a PDF set: the parton densities for all tabulated flavors as functions of the
/// momentum fraction `x` and the scale `Q2`, together with the strong coupling.
#[derive(Clone, Debug)]
pub struct Pdf {
    set_name: String,
    member: usize,
    metadata: Arc<MetaData>,
    alphas: Arc<AlphaS>,
    pdf_type: Option<String>,
    flavors: FlavorTable,
    subgrids: Vec<SubGrid>,
    x_min: f64,
    x_max: f64,
    q_min: f64,
    q_max: f64,
    extrapolator: ExtrapolatorType,
    force_positive: ForcePositive,
}

fn prefix_format_error(prefix: impl Display) -> impl FnOnce(Error) -> Error {
    move |err| match err {
        Error::Format(message) => Error::Format(format!("{prefix}: {message}")),
        err => err,
    }
}

fn check_domain(x: f64, q2: f64) -> Result<()> {
    if !x.is_finite() || x <= 0.0 || x > 1.0 {
        return Err(Error::Domain(format!("x = {x} is outside of (0, 1]")));
    }

    if !q2.is_finite() || q2 <= 0.0 {
        return Err(Error::Domain(format!("Q2 = {q2} must be positive and finite")));
    }

    Ok(())
}

impl Pdf {
    /// Load member `member` of the set `set_name`, which is searched for in the directories
    /// given by [`SetResolver::from_env`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSet`] if the set cannot be found, or the error of
    /// [`Pdf::from_dir`].
    pub fn load(set_name: &str, member: usize) -> Result<Self> {
        SetResolver::from_env().load_pdf(set_name, member)
    }

    /// Load all members of the set `set_name`, ordered by their index.
    ///
    /// # Errors
    ///
    /// See [`PdfSet::from_dir`].
    pub fn load_all(set_name: &str) -> Result<Vec<Self>> {
        SetResolver::from_env()
            .load_set(set_name)
            .map(PdfSet::into_members)
    }

    /// Load a member given by `NAME`, `NAME/MEMBER` or a numeric LHAPDF id.
    ///
    /// # Errors
    ///
    /// See [`SetResolver::load_spec`].
    pub fn with_setname(spec: &str) -> Result<Self> {
        SetResolver::from_env().load_spec(spec)
    }

    /// Load member `member` from the set stored in the directory `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if a file cannot be read and [`Error::Format`] if a file violates
    /// the grid format.
    pub fn from_dir(dir: &Path, member: usize) -> Result<Self> {
        let set_name = parser::set_name(dir)?;
        let metadata = parser::read_info(&parser::info_path(dir, &set_name))?;
        let alphas = AlphaS::from_metadata(&metadata)
            .map_err(prefix_format_error(format!("{set_name}.info")))?;

        Self::from_member_file(
            &set_name,
            member,
            Arc::new(metadata),
            Arc::new(alphas),
            &parser::member_path(dir, &set_name, member),
        )
    }

    pub(crate) fn from_member_file(
        set_name: &str,
        member: usize,
        metadata: Arc<MetaData>,
        alphas: Arc<AlphaS>,
        path: &Path,
    ) -> Result<Self> {
        debug!(path = %path.display(), "reading member file");

        let file = parser::read_member(path)?;

        Self::from_parts(set_name, member, metadata, alphas, file)
            .map_err(prefix_format_error(path.display()))
    }

    fn from_parts(
        set_name: &str,
        member: usize,
        metadata: Arc<MetaData>,
        alphas: Arc<AlphaS>,
        file: MemberFile,
    ) -> Result<Self> {
        let pids = file.blocks[0].pids.clone();
        let flavors = FlavorTable::new(&pids)?;

        if !metadata.flavors.is_empty()
            && let Some(pid) = flavors
                .pids()
                .iter()
                .find(|&&pid| !metadata.flavors.iter().any(|&f| pids::normalize_pid(f) == pid))
        {
            return Err(Error::Format(format!(
                "flavor {pid} is not declared in the Flavors of the set"
            )));
        }

        let mut subgrids = Vec::with_capacity(file.blocks.len());

        for (index, block) in file.blocks.into_iter().enumerate() {
            if block.pids != pids {
                return Err(Error::Format(format!(
                    "subgrid {index} has flavors {:?}, but subgrid 0 has {pids:?}",
                    block.pids
                )));
            }

            let shape = (block.xs.len(), block.qs.len(), block.pids.len());
            let values = Array3::from_shape_vec(shape, block.values)
                .map_err(|err| Error::Format(format!("subgrid {index}: {err}")))?
                .permuted_axes([2, 0, 1])
                .as_standard_layout()
                .into_owned();

            subgrids.push(
                SubGrid::new(block.xs, block.qs, values, metadata.interpolator)
                    .map_err(prefix_format_error(format!("subgrid {index}")))?,
            );
        }

        for (index, pair) in subgrids.windows(2).enumerate() {
            let upper = pair[0].qs()[pair[0].qs().len() - 1];
            let lower = pair[1].qs()[0];

            if upper != lower {
                return Err(Error::Format(format!(
                    "subgrid {index} ends at Q = {upper}, but subgrid {} starts at Q = {lower}",
                    index + 1
                )));
            }
        }

        let x_min = subgrids.iter().map(SubGrid::x_min).fold(f64::INFINITY, f64::min);
        let x_max = subgrids
            .iter()
            .map(SubGrid::x_max)
            .fold(f64::NEG_INFINITY, f64::max);
        let q_min = subgrids[0].qs()[0];
        let last = &subgrids[subgrids.len() - 1];
        let q_max = last.qs()[last.qs().len() - 1];

        Ok(Self {
            set_name: set_name.to_owned(),
            member,
            extrapolator: metadata.extrapolator,
            force_positive: metadata.force_positive,
            metadata,
            alphas,
            pdf_type: file.header.pdf_type,
            flavors,
            subgrids,
            x_min,
            x_max,
            q_min,
            q_max,
        })
    }

    /// Replace the clipping of returned values set by the `ForcePositive` entry of the set.
    #[must_use]
    pub fn with_force_positive(mut self, force_positive: ForcePositive) -> Self {
        self.force_positive = force_positive;
        self
    }

    /// Name of the set this member belongs to.
    #[must_use]
    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    /// Index of this member in its set; `0` is the central member.
    #[must_use]
    pub const fn member(&self) -> usize {
        self.member
    }

    /// The `PdfType` of the member file, for instance `central` or `replica`.
    #[must_use]
    pub fn pdf_type(&self) -> Option<&str> {
        self.pdf_type.as_deref()
    }

    /// Metadata of the set this member belongs to.
    #[must_use]
    pub fn metadata(&self) -> &MetaData {
        &self.metadata
    }

    /// The subgrids ordered by increasing Q2.
    #[must_use]
    pub fn subgrids(&self) -> &[SubGrid] {
        &self.subgrids
    }

    /// Number of subgrids.
    #[must_use]
    pub fn subgrid_count(&self) -> usize {
        self.subgrids.len()
    }

    /// The mapping of PDG ids to table positions.
    #[must_use]
    pub const fn flavor_table(&self) -> &FlavorTable {
        &self.flavors
    }

    /// PDG ids of the tabulated flavors, in the order of the grid files.
    #[must_use]
    pub fn flavor_ids(&self) -> &[i32] {
        self.flavors.pids()
    }

    /// Same as [`Pdf::flavor_ids`].
    #[must_use]
    pub fn pids(&self) -> &[i32] {
        self.flavor_ids()
    }

    /// Smallest x knot of all subgrids.
    #[must_use]
    pub const fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Largest x knot of all subgrids.
    #[must_use]
    pub const fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Smallest Q knot, as written in the grid file.
    #[must_use]
    pub const fn q_min(&self) -> f64 {
        self.q_min
    }

    /// Largest Q knot, as written in the grid file.
    #[must_use]
    pub const fn q_max(&self) -> f64 {
        self.q_max
    }

    /// Smallest Q2 knot.
    #[must_use]
    pub fn q2_min(&self) -> f64 {
        self.q_min * self.q_min
    }

    /// Largest Q2 knot.
    #[must_use]
    pub fn q2_max(&self) -> f64 {
        self.q_max * self.q_max
    }

    /// The pair `(x_min, x_max)`.
    #[must_use]
    pub const fn x_bounds(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    /// The pair `(q2_min, q2_max)`.
    #[must_use]
    pub fn q2_bounds(&self) -> (f64, f64) {
        (self.q2_min(), self.q2_max())
    }

    /// LHAPDF id of the central member of the set, if the set has one.
    #[must_use]
    pub fn set_index(&self) -> Option<u32> {
        self.metadata.set_index
    }

    /// Number of members of the set as declared by `NumMembers`.
    #[must_use]
    pub fn num_members(&self) -> Option<usize> {
        self.metadata.num_members
    }

    /// Description of the set.
    #[must_use]
    pub fn set_desc(&self) -> &str {
        &self.metadata.set_desc
    }

    /// LHAPDF id of this member.
    #[must_use]
    pub fn lhapdf_id(&self) -> Option<u32> {
        let member = u32::try_from(self.member).ok()?;
        self.metadata.set_index?.checked_add(member)
    }

    /// Number of knots per dimension used by the interpolation of the set.
    #[must_use]
    pub fn interpolation_order(&self) -> usize {
        self.metadata.interpolator.order()
    }

    /// Interpolation scheme declared by the set.
    #[must_use]
    pub fn interpolator(&self) -> InterpolatorType {
        self.metadata.interpolator
    }

    /// Extrapolation used outside of the grid.
    #[must_use]
    pub const fn extrapolator(&self) -> ExtrapolatorType {
        self.extrapolator
    }

    /// Clipping applied to returned values.
    #[must_use]
    pub const fn force_positive(&self) -> ForcePositive {
        self.force_positive
    }

    fn evaluate(&self, flavor: usize, x: f64, q2: f64) -> f64 {
        self.force_positive.apply(extrapolation::evaluate(
            &self.subgrids,
            self.extrapolator,
            flavor,
            x,
            q2,
        ))
    }

    fn position(&self, pid: i32) -> Result<usize> {
        self.flavors.position(pid).ok_or(Error::UnknownFlavor(pid))
    }

    /// Momentum fraction `x` times the density of the parton with PDG id `pid` at the scale
    /// `q2`. The id `0` is accepted for the gluon. Points outside the grid are extrapolated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] unless `0 < x <= 1` and `q2 > 0` are finite, and
    /// [`Error::UnknownFlavor`] if `pid` is not tabulated.
    pub fn xfxq2(&self, pid: i32, x: f64, q2: f64) -> Result<f64> {
        check_domain(x, q2)?;
        let flavor = self.position(pid)?;

        Ok(self.evaluate(flavor, x, q2))
    }

    /// Evaluate [`Pdf::xfxq2`] for all combinations of `pids`, `xs` and `q2s`. The result has
    /// the shape `[pids.len(), xs.len(), q2s.len()]`, so within each flavor `x` is the outer and
    /// `Q2` the inner dimension.
    ///
    /// # Errors
    ///
    /// Returns the error of the first invalid argument, see [`Pdf::xfxq2`].
    pub fn xfxq2s(&self, pids: &[i32], xs: &[f64], q2s: &[f64]) -> Result<Array3<f64>> {
        for &x in xs {
            check_domain(x, 1.0)?;
        }
        for &q2 in q2s {
            check_domain(1.0, q2)?;
        }

        let flavors = pids
            .iter()
            .map(|&pid| self.position(pid))
            .collect::<Result<Vec<_>>>()?;

        let mut result = Array3::zeros((pids.len(), xs.len(), q2s.len()));

        Zip::indexed(&mut result).par_for_each(|(ip, ix, iq), value| {
            *value = self.evaluate(flavors[ip], xs[ix], q2s[iq]);
        });

        Ok(result)
    }

    /// Evaluate [`Pdf::xfxq2`] for every tabulated flavor, in the order of
    /// [`Pdf::flavor_ids`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] for invalid `x` or `q2`.
    pub fn xfxq2_all(&self, x: f64, q2: f64) -> Result<Vec<f64>> {
        check_domain(x, q2)?;

        Ok((0..self.flavors.len())
            .map(|flavor| self.evaluate(flavor, x, q2))
            .collect())
    }

    /// Return the tabulated value of `pid` in subgrid `subgrid` at the knots `ix` and `iq2`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFlavor`] if `pid` is not tabulated and [`Error::Domain`] if an
    /// index is out of range.
    pub fn xf_at_knot(&self, pid: i32, subgrid: usize, ix: usize, iq2: usize) -> Result<f64> {
        let flavor = self.position(pid)?;

        self.subgrids
            .get(subgrid)
            .and_then(|grid| grid.values().get((flavor, ix, iq2)).copied())
            .ok_or_else(|| {
                Error::Domain(format!(
                    "knot ({ix}, {iq2}) of subgrid {subgrid} does not exist"
                ))
            })
    }

    /// The strong coupling of the set.
    #[must_use]
    pub fn alphas(&self) -> &AlphaS {
        &self.alphas
    }

    /// Strong coupling at the scale `q2`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] for invalid `q2` and [`Error::Coupling`] if the set does not
    /// describe its coupling.
    pub fn alphas_q2(&self, q2: f64) -> Result<f64> {
        self.alphas.alphas_q2(q2)
    }
}
