//! Module containing the rectangular (x, Q2) tables a PDF member is made of.

use super::error::{Error, Result};
use super::interpolation;
use super::metadata::InterpolatorType;
use ndarray::{Array3, Array4, ArrayView3, s};

/// Values of all flavors tabulated on the product of a set of x and a set of Q2 knots.
#[derive(Clone, Debug)]
pub struct SubGrid {
    xs: Vec<f64>,
    qs: Vec<f64>,
    q2s: Vec<f64>,
    x_coords: Vec<f64>,
    q2_coords: Vec<f64>,
    values: Array3<f64>,
    coefficients: Array4<f64>,
    interpolator: InterpolatorType,
    cubic_x: bool,
    cubic_q2: bool,
}

fn check_knots(knots: &[f64], axis: &str) -> Result<()> {
    if knots.len() < 2 {
        return Err(Error::Format(format!(
            "{axis} has {} knot(s), at least 2 are required",
            knots.len()
        )));
    }

    if let Some(knot) = knots.iter().find(|knot| !knot.is_finite() || **knot <= 0.0) {
        return Err(Error::Format(format!("{axis} knot {knot} is not positive")));
    }

    if let Some(pair) = knots.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(Error::Format(format!(
            "{axis} knots are not strictly increasing: {} is followed by {}",
            pair[0], pair[1]
        )));
    }

    Ok(())
}

impl SubGrid {
    /// Constructor. `qs` are the knots in Q, `values` is indexed by flavor position, x index and
    /// Q index. Cubic interpolators interpolate linearly along an axis with fewer than four knots,
    /// keeping cubic interpolation along the other axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the knots are not positive and strictly increasing, if an
    /// axis has fewer than two knots, or if the shape of `values` does not match the knots.
    pub fn new(
        xs: Vec<f64>,
        qs: Vec<f64>,
        values: Array3<f64>,
        interpolator: InterpolatorType,
    ) -> Result<Self> {
        check_knots(&xs, "x")?;
        check_knots(&qs, "Q")?;

        let (flavors, nx, nq) = values.dim();

        if (nx, nq) != (xs.len(), qs.len()) {
            return Err(Error::Format(format!(
                "value table has shape {:?}, expected {} x-knots and {} Q-knots",
                values.shape(),
                xs.len(),
                qs.len()
            )));
        }

        let cubic_x = interpolator.is_cubic() && nx >= 4;
        let cubic_q2 = interpolator.is_cubic() && nq >= 4;

        let q2s: Vec<_> = qs.iter().map(|q| q * q).collect();
        let (x_coords, q2_coords): (Vec<_>, Vec<_>) = if interpolator.is_log() {
            (
                xs.iter().map(|x| x.ln()).collect(),
                q2s.iter().map(|q2| q2.ln()).collect(),
            )
        } else {
            (xs.clone(), q2s.clone())
        };

        let coefficients = if cubic_x {
            let mut coefficients = Array4::zeros((flavors, nx - 1, nq, 4));

            for flavor in 0..flavors {
                for iq in 0..nq {
                    let column = values.slice(s![flavor, .., iq]);

                    for ix in 0..nx - 1 {
                        let abcd = interpolation::hermite_coefficients(&x_coords, column, ix);
                        coefficients
                            .slice_mut(s![flavor, ix, iq, ..])
                            .assign(&ndarray::aview1(&abcd));
                    }
                }
            }

            coefficients
        } else {
            Array4::zeros((0, 0, 0, 4))
        };

        Ok(Self {
            xs,
            qs,
            q2s,
            x_coords,
            q2_coords,
            values,
            coefficients,
            interpolator,
            cubic_x,
            cubic_q2,
        })
    }

    /// Knots in x.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Knots in Q, as read from the grid file.
    #[must_use]
    pub fn qs(&self) -> &[f64] {
        &self.qs
    }

    /// Knots in Q2.
    #[must_use]
    pub fn q2s(&self) -> &[f64] {
        &self.q2s
    }

    /// Tabulated values, indexed by flavor position, x index and Q2 index.
    #[must_use]
    pub fn values(&self) -> ArrayView3<'_, f64> {
        self.values.view()
    }

    /// Interpolation scheme of this subgrid.
    #[must_use]
    pub const fn interpolator(&self) -> InterpolatorType {
        self.interpolator
    }

    /// Number of knots used along x: 4 for cubic, 2 for linear interpolation.
    #[must_use]
    pub const fn x_order(&self) -> usize {
        if self.cubic_x { 4 } else { 2 }
    }

    /// Number of knots used along Q2: 4 for cubic, 2 for linear interpolation.
    #[must_use]
    pub const fn q2_order(&self) -> usize {
        if self.cubic_q2 { 4 } else { 2 }
    }

    /// Smallest x knot.
    #[must_use]
    pub fn x_min(&self) -> f64 {
        self.xs[0]
    }

    /// Largest x knot.
    #[must_use]
    pub fn x_max(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    /// Smallest Q2 knot.
    #[must_use]
    pub fn q2_min(&self) -> f64 {
        self.q2s[0]
    }

    /// Largest Q2 knot.
    #[must_use]
    pub fn q2_max(&self) -> f64 {
        self.q2s[self.q2s.len() - 1]
    }

    /// Interpolate flavor `flavor` at a point inside the knot ranges.
    pub(crate) fn interpolate(&self, flavor: usize, x: f64, q2: f64) -> f64 {
        debug_assert!(x >= self.x_min() && x <= self.x_max());
        debug_assert!(q2 >= self.q2_min() && q2 <= self.q2_max());

        let ix = interpolation::find_interval(&self.xs, x);
        let iq = interpolation::find_interval(&self.q2s, q2);
        let (u, v) = if self.interpolator.is_log() {
            (x.ln(), q2.ln())
        } else {
            (x, q2)
        };

        let xc = &self.x_coords;
        let qc = &self.q2_coords;
        let tx = (u - xc[ix]) / (xc[ix + 1] - xc[ix]);
        let along_x = |iq: usize| {
            if self.cubic_x {
                interpolation::cubic(tx, self.coefficients.slice(s![flavor, ix, iq, ..]))
            } else {
                interpolation::linear(
                    u,
                    xc[ix],
                    xc[ix + 1],
                    self.values[[flavor, ix, iq]],
                    self.values[[flavor, ix + 1, iq]],
                )
            }
        };

        let vl = along_x(iq);
        let vh = along_x(iq + 1);

        if !self.cubic_q2 {
            return interpolation::linear(v, qc[iq], qc[iq + 1], vl, vh);
        }

        let nq = qc.len();
        let dq1 = qc[iq + 1] - qc[iq];
        let tq = (v - qc[iq]) / dq1;

        let (vdl, vdh) = if iq == 0 {
            let vhh = along_x(iq + 2);
            let dq2 = qc[iq + 2] - qc[iq + 1];
            let vdl = vh - vl;
            (vdl, (vdl + (vhh - vh) * dq1 / dq2) * 0.5)
        } else if iq + 2 == nq {
            let vll = along_x(iq - 1);
            let dq0 = qc[iq] - qc[iq - 1];
            let vdh = vh - vl;
            ((vdh + (vl - vll) * dq1 / dq0) * 0.5, vdh)
        } else {
            let vll = along_x(iq - 1);
            let vhh = along_x(iq + 2);
            let dq0 = qc[iq] - qc[iq - 1];
            let dq2 = qc[iq + 2] - qc[iq + 1];
            (
                ((vh - vl) + (vl - vll) * dq1 / dq0) * 0.5,
                ((vh - vl) + (vhh - vh) * dq1 / dq2) * 0.5,
            )
        };

        interpolation::hermite(tq, vl, vdl, vh, vdh)
    }
}

/// Index of the subgrid used for `q2`: the first one whose largest Q2 knot is not smaller than
/// `q2`, so that on a seam the lower subgrid wins. Scales below the first subgrid map to the
/// first one, scales above the last subgrid to the last one.
pub(crate) fn select_subgrid(subgrids: &[SubGrid], q2: f64) -> usize {
    subgrids
        .iter()
        .position(|subgrid| q2 <= subgrid.q2_max())
        .unwrap_or(subgrids.len() - 1)
}
