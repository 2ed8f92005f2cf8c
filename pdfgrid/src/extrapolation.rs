//! Evaluation of a PDF member at arbitrary points, extrapolating outside of its grid.

use super::interpolation;
use super::metadata::ExtrapolatorType;
use super::subgrid::{self, SubGrid};

/// Evaluate flavor position `flavor` of the member consisting of `subgrids` at `(x, q2)`. Points
/// inside the grid are interpolated, everything else is extrapolated with `extrapolator`.
pub fn evaluate(
    subgrids: &[SubGrid],
    extrapolator: ExtrapolatorType,
    flavor: usize,
    x: f64,
    q2: f64,
) -> f64 {
    match extrapolator {
        ExtrapolatorType::Continuation => continuation(subgrids, flavor, x, q2),
        ExtrapolatorType::Nearest => nearest(subgrids, flavor, x, q2),
    }
}

fn nearest(subgrids: &[SubGrid], flavor: usize, x: f64, q2: f64) -> f64 {
    let q2 = q2.clamp(subgrids[0].q2_min(), subgrids[subgrids.len() - 1].q2_max());
    let subgrid = &subgrids[subgrid::select_subgrid(subgrids, q2)];

    subgrid.interpolate(flavor, x.clamp(subgrid.x_min(), subgrid.x_max()), q2)
}

/// Linear extrapolation through the points `(xl, yl)` and `(xh, yh)`. If both values are
/// sufficiently positive the logarithm of the values is extrapolated in `ln x`.
fn extrapolate_linear(x: f64, xl: f64, xh: f64, yl: f64, yh: f64) -> f64 {
    if yl > 1e-3 && yh > 1e-3 {
        (yl.ln() + (x.ln() - xl.ln()) / (xh.ln() - xl.ln()) * (yh.ln() - yl.ln())).exp()
    } else {
        interpolation::linear(x, xl, xh, yl, yh)
    }
}

fn continuation(subgrids: &[SubGrid], flavor: usize, x: f64, q2: f64) -> f64 {
    let first = &subgrids[0];
    let last = &subgrids[subgrids.len() - 1];

    if q2 < first.q2_min() {
        let q2_min = first.q2_min();
        let f_min = along_x(subgrids, flavor, x, q2_min);
        let f_min1 = along_x(subgrids, flavor, x, q2_min * 1.01);

        let anomalous_dimension = if f_min.abs() >= 1e-5 {
            (f_min1 / f_min).ln() / 0.01
        } else {
            1.0
        };

        f_min * (q2 / q2_min).powf(anomalous_dimension * q2 / q2_min + 1.0 - q2 / q2_min)
    } else if q2 > last.q2_max() {
        let q2s = last.q2s();
        let q2_max = q2s[q2s.len() - 1];
        let q2_max1 = q2s[q2s.len() - 2];

        extrapolate_linear(
            q2,
            q2_max,
            q2_max1,
            along_x(subgrids, flavor, x, q2_max),
            along_x(subgrids, flavor, x, q2_max1),
        )
    } else {
        along_x(subgrids, flavor, x, q2)
    }
}

/// Evaluate at a scale inside the grid, extrapolating in x if necessary.
fn along_x(subgrids: &[SubGrid], flavor: usize, x: f64, q2: f64) -> f64 {
    let subgrid = &subgrids[subgrid::select_subgrid(subgrids, q2)];
    let xs = subgrid.xs();
    let n = xs.len();

    if x < xs[0] {
        extrapolate_linear(
            x,
            xs[0],
            xs[1],
            subgrid.interpolate(flavor, xs[0], q2),
            subgrid.interpolate(flavor, xs[1], q2),
        )
    } else if x > xs[n - 1] {
        extrapolate_linear(
            x,
            xs[n - 1],
            xs[n - 2],
            subgrid.interpolate(flavor, xs[n - 1], q2),
            subgrid.interpolate(flavor, xs[n - 2], q2),
        )
    } else {
        subgrid.interpolate(flavor, x, q2)
    }
}
