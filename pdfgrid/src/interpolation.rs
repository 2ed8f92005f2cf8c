//! Interpolation kernels shared by the subgrids and the strong coupling.

use ndarray::ArrayView1;

/// Return the index `i` with `coords[i] <= value < coords[i + 1]`. A value on the last knot is
/// assigned to the last interval; `coords` must have at least two entries and `value` must lie
/// inside them.
pub fn find_interval(coords: &[f64], value: f64) -> usize {
    debug_assert!(coords.len() >= 2);

    let upper = coords.partition_point(|&c| c <= value);
    upper.min(coords.len() - 1).saturating_sub(1)
}

/// Cubic Hermite polynomial on the unit interval with values `vl`, `vh` and derivatives `vdl`,
/// `vdh` at its ends.
pub fn hermite(t: f64, vl: f64, vdl: f64, vh: f64, vdh: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;

    let p0 = (2.0 * t3 - 3.0 * t2 + 1.0) * vl;
    let m0 = (t3 - 2.0 * t2 + t) * vdl;
    let p1 = (-2.0 * t3 + 3.0 * t2) * vh;
    let m1 = (t3 - t2) * vdh;

    p0 + m0 + p1 + m1
}

/// Evaluate the polynomial `a t^3 + b t^2 + c t + d` with `coefficients = [a, b, c, d]`.
pub fn cubic(t: f64, coefficients: ArrayView1<f64>) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;

    coefficients[0] * t3 + coefficients[1] * t2 + coefficients[2] * t + coefficients[3]
}

/// Straight line through `(xl, yl)` and `(xh, yh)` evaluated at `x`.
pub fn linear(x: f64, xl: f64, xh: f64, yl: f64, yh: f64) -> f64 {
    yl + (x - xl) / (xh - xl) * (yh - yl)
}

/// Derivative of `values` with respect to `coords` at knot `i`: the mean of the neighboring
/// difference quotients inside, one-sided at both ends.
pub fn derivative(coords: &[f64], values: ArrayView1<f64>, i: usize) -> f64 {
    let n = coords.len();

    if i == 0 {
        (values[1] - values[0]) / (coords[1] - coords[0])
    } else if i == n - 1 {
        (values[i] - values[i - 1]) / (coords[i] - coords[i - 1])
    } else {
        let left = (values[i] - values[i - 1]) / (coords[i] - coords[i - 1]);
        let right = (values[i + 1] - values[i]) / (coords[i + 1] - coords[i]);
        (left + right) / 2.0
    }
}

/// Coefficients `[a, b, c, d]` of the cubic Hermite polynomial describing `values` on the
/// interval between knots `i` and `i + 1`, with the derivatives of [`derivative`].
pub fn hermite_coefficients(coords: &[f64], values: ArrayView1<f64>, i: usize) -> [f64; 4] {
    let width = coords[i + 1] - coords[i];
    let vl = values[i];
    let vh = values[i + 1];
    let vdl = derivative(coords, values, i) * width;
    let vdh = derivative(coords, values, i + 1) * width;

    [
        vdh + vdl - 2.0 * vh + 2.0 * vl,
        3.0 * vh - 3.0 * vl - 2.0 * vdl - vdh,
        vdl,
        vl,
    ]
}
