//! Module implementing the strong coupling of a PDF set.

use super::error::{Error, Result};
use super::interpolation;
use super::metadata::{AlphaSType, MetaData};
use itertools::Itertools;

/// A range of tabulated knots that does not contain a flavor threshold.
#[derive(Clone, Debug)]
struct Block {
    q2s: Vec<f64>,
    log_q2s: Vec<f64>,
    alphas: Vec<f64>,
}

impl Block {
    fn forward(&self, i: usize) -> f64 {
        (self.alphas[i + 1] - self.alphas[i]) / (self.log_q2s[i + 1] - self.log_q2s[i])
    }

    fn backward(&self, i: usize) -> f64 {
        (self.alphas[i] - self.alphas[i - 1]) / (self.log_q2s[i] - self.log_q2s[i - 1])
    }

    fn central(&self, i: usize) -> f64 {
        0.5 * (self.forward(i) + self.backward(i))
    }

    fn interpolate(&self, q2: f64) -> f64 {
        let n = self.q2s.len();
        let i = interpolation::find_interval(&self.q2s, q2);

        let (di, di1) = if n == 2 {
            (self.forward(0), self.forward(0))
        } else if i == 0 {
            (self.forward(i), self.central(i + 1))
        } else if i == n - 2 {
            (self.central(i), self.backward(i + 1))
        } else {
            (self.central(i), self.central(i + 1))
        };

        let dlogq2 = self.log_q2s[i + 1] - self.log_q2s[i];
        let t = (q2.ln() - self.log_q2s[i]) / dlogq2;

        interpolation::hermite(
            t,
            self.alphas[i],
            di * dlogq2,
            self.alphas[i + 1],
            di1 * dlogq2,
        )
    }
}

/// Strong coupling interpolated from a table, which may have repeated knots at flavor
/// thresholds.
#[derive(Clone, Debug)]
pub struct AlphaSTable {
    q2s: Vec<f64>,
    alphas: Vec<f64>,
    blocks: Vec<Block>,
}

impl AlphaSTable {
    /// Constructor. `qs` are the scales, not their squares.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the two tables have different lengths, if scales are not
    /// positive or decrease, or if a range between thresholds has fewer than two knots.
    pub fn new(qs: &[f64], alphas: &[f64]) -> Result<Self> {
        if qs.len() < 2 {
            return Err(Error::Format(format!(
                "AlphaS_Qs has {} knot(s), at least 2 are required",
                qs.len()
            )));
        }

        if qs.len() != alphas.len() {
            return Err(Error::Format(format!(
                "AlphaS_Qs has {} entries but AlphaS_Vals has {}",
                qs.len(),
                alphas.len()
            )));
        }

        if let Some(q) = qs.iter().find(|q| !q.is_finite() || **q <= 0.0) {
            return Err(Error::Format(format!("AlphaS_Qs contains non-positive scale {q}")));
        }

        if let Some(value) = alphas.iter().find(|value| !value.is_finite() || **value <= 0.0) {
            return Err(Error::Format(format!(
                "AlphaS_Vals contains non-positive value {value}"
            )));
        }

        if qs.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(Error::Format("AlphaS_Qs must not decrease".to_owned()));
        }

        let q2s: Vec<_> = qs.iter().map(|q| q * q).collect();
        let mut blocks = Vec::new();
        let mut start = 0;

        for end in 1..=q2s.len() {
            if end == q2s.len() || q2s[end] == q2s[end - 1] {
                if end - start < 2 {
                    return Err(Error::Format(format!(
                        "AlphaS_Qs has a threshold range with a single knot at Q = {}",
                        qs[start]
                    )));
                }

                blocks.push(Block {
                    q2s: q2s[start..end].to_vec(),
                    log_q2s: q2s[start..end].iter().map(|q2| q2.ln()).collect(),
                    alphas: alphas[start..end].to_vec(),
                });
                start = end;
            }
        }

        Ok(Self {
            q2s,
            alphas: alphas.to_vec(),
            blocks,
        })
    }

    /// Number of ranges separated by flavor thresholds.
    #[must_use]
    pub fn threshold_ranges(&self) -> usize {
        self.blocks.len()
    }

    /// Strong coupling at `q2`.
    #[must_use]
    pub fn alphas_q2(&self, q2: f64) -> f64 {
        let n = self.q2s.len();

        if q2 < self.q2s[0] {
            // the first knot may itself be a threshold
            let next = (1..n).find(|&i| self.q2s[i] != self.q2s[0]).unwrap_or(n - 1);
            return self.power_law(q2, 0, next);
        }

        if q2 > self.q2s[n - 1] {
            let previous = (0..n - 1)
                .rev()
                .find(|&i| self.q2s[i] != self.q2s[n - 1])
                .unwrap_or(0);
            return self.power_law(q2, n - 1, previous);
        }

        self.blocks
            .iter()
            .find_or_last(|block| q2 <= block.q2s[block.q2s.len() - 1])
            .map_or(f64::NAN, |block| block.interpolate(q2))
    }

    /// Straight line in `(log Q2, log alphas)` through the knots `from` and `to`.
    fn power_law(&self, q2: f64, from: usize, to: usize) -> f64 {
        let dlogq2 = (self.q2s[to] / self.q2s[from]).log10();
        let dlogas = (self.alphas[to] / self.alphas[from]).log10();

        self.alphas[from] * (q2 / self.q2s[from]).powf(dlogas / dlogq2)
    }
}

const BETA0: [f64; 2] = [0.875352187, -0.053051647];
const BETA1: [f64; 2] = [0.6459225457, -0.0802126037];
const BETA2: [f64; 3] = [0.719864327, -0.140904490, 0.00303291339];

/// Strong coupling from the approximate analytic solution of its renormalization group
/// equation, with up to three loops.
#[derive(Clone, Debug)]
pub struct AnalyticAlphaS {
    loops: u32,
    lambdas: [Option<f64>; 3],
    // squared quark mass and the number of flavors active above it
    thresholds: Vec<(f64, u32)>,
    fixed_flavors: Option<u32>,
}

impl AnalyticAlphaS {
    /// Construct from the QCD scales, quark masses and perturbative order in `metadata`.
    #[must_use]
    pub fn new(metadata: &MetaData) -> Self {
        let max_flavors = metadata.num_flavors.unwrap_or(5);
        let fixed = metadata.flavor_scheme.eq_ignore_ascii_case("fixed");

        Self {
            loops: (metadata.alphas_order_qcd.unwrap_or(0) + 1).min(3),
            lambdas: [
                metadata.alphas_lambda3,
                metadata.alphas_lambda4,
                metadata.alphas_lambda5,
            ],
            thresholds: [metadata.m_charm, metadata.m_bottom, metadata.m_top]
                .into_iter()
                .zip(4..=max_flavors)
                .filter_map(|(mass, flavors)| mass.map(|m| (m * m, flavors)))
                .collect(),
            fixed_flavors: fixed.then_some(max_flavors),
        }
    }

    /// Number of active flavors at `q2`.
    #[must_use]
    pub fn flavors(&self, q2: f64) -> u32 {
        self.fixed_flavors.unwrap_or_else(|| {
            self.thresholds
                .iter()
                .filter(|&&(m2, _)| m2 < q2)
                .map(|&(_, flavors)| flavors)
                .max()
                .unwrap_or(3)
        })
    }

    /// Strong coupling at `q2`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coupling`] if the QCD scale for the number of active flavors is not
    /// known and [`Error::Domain`] if `q2` is not above the square of that scale.
    #[allow(clippy::suboptimal_flops)]
    pub fn alphas_q2(&self, q2: f64) -> Result<f64> {
        let nf = self.flavors(q2);
        let lambda = usize::try_from(nf)
            .ok()
            .and_then(|nf| nf.checked_sub(3))
            .and_then(|index| self.lambdas.get(index).copied().flatten())
            .ok_or_else(|| Error::Coupling(format!("AlphaS_Lambda{nf} is required")))?;

        if q2 <= lambda * lambda {
            return Err(Error::Domain(format!(
                "Q2 = {q2} is not above the QCD scale squared {}",
                lambda * lambda
            )));
        }

        let nf = f64::from(nf);
        let b0 = BETA0[0] + BETA0[1] * nf;
        let b1 = BETA1[0] + BETA1[1] * nf;
        let b2 = BETA2[0] + BETA2[1] * nf + BETA2[2] * nf * nf;
        let b02 = b0 * b0;

        let t = (q2 / (lambda * lambda)).ln();
        let z = t.ln();
        let y = 1.0 / (b0 * t);

        let mut result = 0.0;

        if self.loops > 2 {
            result += (b1 * b1 * (z * z - z - 1.0) + b0 * b2) / (b02 * b02 * t * t);
        }
        if self.loops > 1 {
            result += -b1 * z / (b02 * t);
        }
        result += 1.0;

        Ok(result * y)
    }
}

/// Strong coupling of a PDF set.
#[derive(Clone, Debug)]
pub enum AlphaS {
    /// Interpolated from tabulated values.
    Ipol(AlphaSTable),
    /// Analytic approximation.
    Analytic(AnalyticAlphaS),
    /// The set does not provide enough information; the string says what is missing.
    Unavailable(String),
}

impl AlphaS {
    /// Choose the strong coupling described by `metadata`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the tables are inconsistent, or if the set declares an
    /// interpolated coupling without providing tables.
    pub fn from_metadata(metadata: &MetaData) -> Result<Self> {
        let has_table = !metadata.alphas_qs.is_empty() || !metadata.alphas_vals.is_empty();

        match metadata.alphas_type {
            Some(AlphaSType::Analytic) => Ok(Self::Analytic(AnalyticAlphaS::new(metadata))),
            _ if has_table => {
                AlphaSTable::new(&metadata.alphas_qs, &metadata.alphas_vals).map(Self::Ipol)
            }
            Some(AlphaSType::Ipol) => Err(Error::Format(
                "AlphaS_Type is ipol, but AlphaS_Qs and AlphaS_Vals are missing".to_owned(),
            )),
            Some(AlphaSType::Ode) | None => Ok(Self::Unavailable(
                "the set provides neither AlphaS_Qs/AlphaS_Vals nor AlphaS_Type: analytic"
                    .to_owned(),
            )),
        }
    }

    /// Strong coupling at `q2`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] if `q2` is not positive and finite and [`Error::Coupling`] if
    /// the set does not describe its coupling.
    pub fn alphas_q2(&self, q2: f64) -> Result<f64> {
        if !q2.is_finite() || q2 <= 0.0 {
            return Err(Error::Domain(format!("Q2 = {q2} must be positive and finite")));
        }

        match self {
            Self::Ipol(table) => Ok(table.alphas_q2(q2)),
            Self::Analytic(analytic) => analytic.alphas_q2(q2),
            Self::Unavailable(reason) => Err(Error::Coupling(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn table_is_split_at_thresholds() {
        let table = AlphaSTable::new(
            &[1.0, 1.2, 1.51, 1.51, 2.0, 3.0, 4.92, 4.92, 10.0],
            &[0.5, 0.45, 0.4, 0.41, 0.36, 0.3, 0.25, 0.251, 0.2],
        )
        .unwrap();

        assert_eq!(table.threshold_ranges(), 3);

        // knots are reproduced, on thresholds the lower range wins
        assert_eq!(table.alphas_q2(1.0), 0.5);
        assert_approx_eq!(f64, table.alphas_q2(1.51 * 1.51), 0.4, ulps = 4);
        assert_approx_eq!(f64, table.alphas_q2(4.0), 0.36, ulps = 4);
        assert_approx_eq!(f64, table.alphas_q2(4.92 * 4.92), 0.25, ulps = 4);
        assert_approx_eq!(f64, table.alphas_q2(100.0), 0.2, ulps = 4);
    }

    #[test]
    fn table_is_validated() {
        assert!(matches!(
            AlphaSTable::new(&[1.0, 2.0], &[0.3]),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            AlphaSTable::new(&[1.0, 3.0, 2.0], &[0.3, 0.2, 0.1]),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            AlphaSTable::new(&[1.0, 2.0, 2.0, 3.0, 3.0], &[0.3, 0.2, 0.2, 0.1, 0.1]),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn power_law_is_extrapolated() {
        // alphas = Q2^-0.1 on the knots
        let qs = [1.0, 2.0, 4.0, 8.0, 16.0];
        let vals: Vec<_> = qs.iter().map(|q: &f64| (q * q).powf(-0.1)).collect();
        let table = AlphaSTable::new(&qs, &vals).unwrap();

        assert_approx_eq!(f64, table.alphas_q2(0.25), 0.25f64.powf(-0.1), epsilon = 1e-12);
        assert_approx_eq!(f64, table.alphas_q2(1e4), 1e4f64.powf(-0.1), epsilon = 1e-12);
    }

    #[test]
    fn interpolation_is_smooth() {
        let qs = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0];
        let vals: Vec<_> = qs.iter().map(|q: &f64| 0.1 + 0.3 / (q * q).ln().max(0.5)).collect();
        let table = AlphaSTable::new(&qs, &vals).unwrap();

        let mut previous = f64::INFINITY;

        for i in 0..=100 {
            let q2 = 1.0 + f64::from(i) * 10.23;
            let value = table.alphas_q2(q2);
            assert!(value <= previous);
            previous = value;
        }
    }

    #[test]
    fn analytic_running() {
        let metadata = MetaData {
            alphas_type: Some(AlphaSType::Analytic),
            alphas_order_qcd: Some(2),
            alphas_lambda4: Some(0.326),
            alphas_lambda5: Some(0.226),
            m_charm: Some(1.4),
            m_bottom: Some(4.75),
            m_top: Some(172.0),
            ..MetaData::default()
        };
        let alphas = AlphaS::from_metadata(&metadata).unwrap();

        let AlphaS::Analytic(analytic) = &alphas else {
            panic!("expected analytic coupling");
        };
        assert_eq!(analytic.flavors(1.0), 3);
        assert_eq!(analytic.flavors(10.0), 4);
        assert_eq!(analytic.flavors(91.1876 * 91.1876), 5);
        // the top quark is not active with the default of five flavors
        assert_eq!(analytic.flavors(1e6), 5);

        let mz = alphas.alphas_q2(91.1876 * 91.1876).unwrap();
        assert!(mz > 0.11 && mz < 0.125, "alphas(MZ) = {mz}");
        assert!(alphas.alphas_q2(1e4).unwrap() < alphas.alphas_q2(100.0).unwrap());

        // no Lambda3 given
        assert!(matches!(alphas.alphas_q2(1.0), Err(Error::Coupling(_))));
        assert!(matches!(alphas.alphas_q2(-1.0), Err(Error::Domain(_))));
    }

    #[test]
    fn thresholds_without_charm_mass() {
        let metadata = MetaData {
            alphas_type: Some(AlphaSType::Analytic),
            alphas_lambda3: Some(0.339),
            alphas_lambda5: Some(0.226),
            m_bottom: Some(4.75),
            m_top: Some(172.0),
            ..MetaData::default()
        };
        let analytic = AnalyticAlphaS::new(&metadata);

        assert_eq!(analytic.flavors(10.0), 3);
        assert_eq!(analytic.flavors(100.0), 5);
        assert_eq!(analytic.flavors(1e6), 5);

        let six_flavors = AnalyticAlphaS::new(&MetaData {
            num_flavors: Some(6),
            ..metadata
        });
        assert_eq!(six_flavors.flavors(100.0), 5);
        assert_eq!(six_flavors.flavors(1e6), 6);

        // the scale for five flavors is used above the bottom mass
        assert!(analytic.alphas_q2(100.0).is_ok());
    }

    #[test]
    fn missing_coupling() {
        let alphas = AlphaS::from_metadata(&MetaData::default()).unwrap();
        assert!(matches!(alphas.alphas_q2(10.0), Err(Error::Coupling(_))));

        let metadata = MetaData {
            alphas_type: Some(AlphaSType::Ipol),
            ..MetaData::default()
        };
        assert!(matches!(
            AlphaS::from_metadata(&metadata),
            Err(Error::Format(_))
        ));
    }
}
