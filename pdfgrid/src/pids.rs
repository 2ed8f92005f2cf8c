//! Conventions for particle identifiers.

use super::error::{Error, Result};
use rustc_hash::FxHashMap;

/// PDG Monte Carlo id of the gluon.
pub const GLUON: i32 = 21;

/// PDG Monte Carlo id of the photon.
pub const PHOTON: i32 = 22;

/// Map the alternative gluon id `0` onto `21`; all other ids are returned unchanged.
#[must_use]
pub const fn normalize_pid(pid: i32) -> i32 {
    if pid == 0 { GLUON } else { pid }
}

/// Return a short human-readable name for `pid`, if it is a parton.
#[must_use]
pub const fn pid_name(pid: i32) -> Option<&'static str> {
    Some(match normalize_pid(pid) {
        -6 => "tbar",
        -5 => "bbar",
        -4 => "cbar",
        -3 => "sbar",
        -2 => "ubar",
        -1 => "dbar",
        1 => "d",
        2 => "u",
        3 => "s",
        4 => "c",
        5 => "b",
        6 => "t",
        GLUON => "g",
        PHOTON => "photon",
        _ => return None,
    })
}

/// Parse a flavor given either as a PDG id or as one of the names returned by [`pid_name`].
#[must_use]
pub fn parse_pid(flavor: &str) -> Option<i32> {
    if let Ok(pid) = flavor.parse::<i32>() {
        return Some(normalize_pid(pid));
    }

    (-6..=6)
        .filter(|&pid| pid != 0)
        .chain([GLUON, PHOTON])
        .find(|&pid| pid_name(pid) == Some(flavor))
}

/// Maps PDG ids onto positions in the value tables of a PDF. The order of the ids is the order
/// in which they appear in the grid files.
#[derive(Clone, Debug)]
pub struct FlavorTable {
    pids: Vec<i32>,
    positions: FxHashMap<i32, usize>,
}

impl FlavorTable {
    /// Constructor. The id `0` is stored as `21`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if an id appears more than once.
    pub fn new(pids: &[i32]) -> Result<Self> {
        let pids: Vec<_> = pids.iter().copied().map(normalize_pid).collect();
        let mut positions = FxHashMap::default();

        for (position, &pid) in pids.iter().enumerate() {
            if positions.insert(pid, position).is_some() {
                return Err(Error::Format(format!("flavor {pid} appears more than once")));
            }
        }

        Ok(Self { pids, positions })
    }

    /// Return the table position of `pid`, accepting `0` for the gluon.
    #[must_use]
    pub fn position(&self, pid: i32) -> Option<usize> {
        self.positions.get(&normalize_pid(pid)).copied()
    }

    /// Return `true` if `pid` is tabulated.
    #[must_use]
    pub fn contains(&self, pid: i32) -> bool {
        self.position(pid).is_some()
    }

    /// PDG ids in table order.
    #[must_use]
    pub fn pids(&self) -> &[i32] {
        &self.pids
    }

    /// Number of flavors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pids.len()
    }

    /// Return `true` if there are no flavors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }
}
