//! PDF uncertainties computed from the values of all members of a set.

use super::error::{Error, Result};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// How the members of a set encode its uncertainty.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Monte Carlo replicas; member 0 is their average.
    Replicas,
    /// Asymmetric Hessian eigenvectors, stored as pairs of members.
    Hessian,
    /// Symmetric Hessian eigenvectors, one member per eigenvector.
    SymmHessian,
}

/// The `ErrorType` of a set, for instance `replicas` or `hessian+as`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorType {
    kind: ErrorKind,
    variations: Vec<String>,
}

impl ErrorType {
    /// The kind of uncertainty.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Names of the parameter variations appended to the set, for instance `as` for `+as`.
    #[must_use]
    pub fn variations(&self) -> &[String] {
        &self.variations
    }

    /// Number of members that take part in the PDF uncertainty, out of `members` in total. Each
    /// parameter variation occupies two members at the end of the set.
    #[must_use]
    pub fn core_members(&self, members: usize) -> usize {
        members.saturating_sub(2 * self.variations.len())
    }

    /// Compute the uncertainty of `values`, which must have one entry per member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if there are too few members for the error type.
    pub fn uncertainty(&self, values: &[f64]) -> Result<PdfUncertainty> {
        let values = &values[..self.core_members(values.len())];

        match self.kind {
            ErrorKind::Replicas => replicas(values),
            ErrorKind::Hessian => hessian(values),
            ErrorKind::SymmHessian => symm_hessian(values),
        }
    }
}

impl FromStr for ErrorType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split('+');
        let kind = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            Some("replicas") => ErrorKind::Replicas,
            Some("hessian") => ErrorKind::Hessian,
            Some("symmhessian") => ErrorKind::SymmHessian,
            _ => return Err(Error::Format(format!("unknown ErrorType '{s}'"))),
        };
        let variations = parts.map(str::to_owned).collect();

        Ok(Self { kind, variations })
    }
}

impl Display for ErrorType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Replicas => "replicas",
            ErrorKind::Hessian => "hessian",
            ErrorKind::SymmHessian => "symmhessian",
        };

        write!(f, "{kind}")?;

        for variation in &self.variations {
            write!(f, "+{variation}")?;
        }

        Ok(())
    }
}

/// Central value and uncertainties of a quantity computed with every member of a set.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PdfUncertainty {
    /// Central value.
    pub central: f64,
    /// Upper uncertainty.
    pub errplus: f64,
    /// Lower uncertainty.
    pub errminus: f64,
    /// Symmetrized uncertainty.
    pub errsymm: f64,
}

#[allow(clippy::cast_precision_loss)]
fn replicas(values: &[f64]) -> Result<PdfUncertainty> {
    if values.len() < 3 {
        return Err(Error::Format(format!(
            "replica uncertainties need at least 2 replicas, found {}",
            values.len().saturating_sub(1)
        )));
    }

    let replicas = &values[1..];
    let n = replicas.len() as f64;
    let average = replicas.iter().sum::<f64>() / n;
    let squares = replicas.iter().map(|value| value * value).sum::<f64>() / n;
    let variance = n / (n - 1.0) * (squares - average * average);
    let errsymm = if variance > 0.0 { variance.sqrt() } else { 0.0 };

    Ok(PdfUncertainty {
        central: average,
        errplus: errsymm,
        errminus: errsymm,
        errsymm,
    })
}

fn hessian(values: &[f64]) -> Result<PdfUncertainty> {
    if values.len() < 3 || values.len() % 2 == 0 {
        return Err(Error::Format(format!(
            "Hessian uncertainties need a central member and pairs of eigenvectors, found {} \
             members",
            values.len()
        )));
    }

    let central = values[0];
    let mut errplus = 0.0;
    let mut errminus = 0.0;
    let mut errsymm = 0.0;

    for pair in values[1..].chunks_exact(2) {
        let (up, down) = (pair[0], pair[1]);
        let plus = (up - central).max(down - central).max(0.0);
        let minus = (central - up).max(central - down).max(0.0);

        errplus += plus * plus;
        errminus += minus * minus;
        errsymm += (up - down) * (up - down);
    }

    Ok(PdfUncertainty {
        central,
        errplus: f64::sqrt(errplus),
        errminus: f64::sqrt(errminus),
        errsymm: 0.5 * f64::sqrt(errsymm),
    })
}

fn symm_hessian(values: &[f64]) -> Result<PdfUncertainty> {
    if values.len() < 2 {
        return Err(Error::Format(
            "symmetric Hessian uncertainties need at least one eigenvector".to_owned(),
        ));
    }

    let central = values[0];
    let errsymm = values[1..]
        .iter()
        .map(|value| (value - central) * (value - central))
        .sum::<f64>()
        .sqrt();

    Ok(PdfUncertainty {
        central,
        errplus: errsymm,
        errminus: errsymm,
        errsymm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn error_types() {
        let error_type: ErrorType = "replicas".parse().unwrap();
        assert_eq!(error_type.kind(), ErrorKind::Replicas);
        assert!(error_type.variations().is_empty());
        assert_eq!(error_type.core_members(101), 101);

        let error_type: ErrorType = "hessian+as".parse().unwrap();
        assert_eq!(error_type.kind(), ErrorKind::Hessian);
        assert_eq!(error_type.variations(), ["as"]);
        assert_eq!(error_type.core_members(61), 59);
        assert_eq!(error_type.to_string(), "hessian+as");

        let error_type: ErrorType = "SymmHessian+as+mc".parse().unwrap();
        assert_eq!(error_type.kind(), ErrorKind::SymmHessian);
        assert_eq!(error_type.core_members(5), 1);

        assert!(matches!("bootstrap".parse::<ErrorType>(), Err(Error::Format(_))));
    }

    #[test]
    fn replica_uncertainty() {
        let error_type: ErrorType = "replicas".parse().unwrap();
        // the central member is ignored
        let result = error_type.uncertainty(&[100.0, 1.0, 2.0, 3.0, 4.0]).unwrap();

        assert_approx_eq!(f64, result.central, 2.5, ulps = 2);
        assert_approx_eq!(f64, result.errsymm, (5.0_f64 / 3.0).sqrt(), epsilon = 1e-14);
        assert_eq!(result.errplus, result.errsymm);
        assert_eq!(result.errminus, result.errsymm);

        let result = error_type.uncertainty(&[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(result.errsymm, 0.0);

        assert!(error_type.uncertainty(&[1.0, 1.0]).is_err());
    }

    #[test]
    fn hessian_uncertainty() {
        let error_type: ErrorType = "hessian".parse().unwrap();
        let result = error_type
            .uncertainty(&[1.0, 1.5, 0.75, 0.5, 1.0])
            .unwrap();

        assert_eq!(result.central, 1.0);
        assert_approx_eq!(f64, result.errplus, 0.5, ulps = 2);
        assert_approx_eq!(f64, result.errminus, (0.0625_f64 + 0.25).sqrt(), ulps = 2);
        assert_approx_eq!(f64, result.errsymm, 0.5 * (0.5625_f64 + 0.25).sqrt(), ulps = 2);

        assert!(error_type.uncertainty(&[1.0, 1.5]).is_err());
    }

    #[test]
    fn variations_are_excluded() {
        let error_type: ErrorType = "symmhessian+as".parse().unwrap();
        // the last two members are the coupling variations
        let result = error_type
            .uncertainty(&[1.0, 1.3, 1.4, 10.0, -10.0])
            .unwrap();

        assert_eq!(result.central, 1.0);
        assert_approx_eq!(f64, result.errsymm, 0.5, epsilon = 1e-14);
        assert_eq!(result.errplus, result.errsymm);
    }
}
