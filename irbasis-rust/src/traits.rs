//! Statistics of the analytic-continuation kernels

use std::fmt;

/// Statistics type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistics {
    Fermionic,
    Bosonic,
}

impl Statistics {
    /// Get the string representation of the statistics
    pub fn as_str(self) -> &'static str {
        match self {
            Statistics::Fermionic => "fermionic",
            Statistics::Bosonic => "bosonic",
        }
    }

    /// Offset zeta in the frequency index o = 2n + zeta
    ///
    /// The Matsubara frequency is ω_n = π o / β with zeta = 1 for fermions
    /// and 0 for bosons.
    pub fn zeta(self) -> i64 {
        match self {
            Statistics::Fermionic => 1,
            Statistics::Bosonic => 0,
        }
    }

    /// Frequency index o for the Matsubara index n
    pub fn frequency_index(self, n: i64) -> i64 {
        2 * n + self.zeta()
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
