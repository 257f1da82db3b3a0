//! Worst-case plan costs with provisional lower bounds.
//!
//! A cost is either finite, infinite (no solution reachable) or undefined
//! (not computed yet). Finite costs computed from a cut-off search frontier
//! are marked as a *range*: the true cost is at least the stored value.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Cost of reaching the goal from a world or through an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cost {
    /// Not computed.
    Undefined,
    /// A finite number of steps. `range` marks a provisional lower bound.
    Finite {
        /// Number of steps.
        value: u32,
        /// True when the value is only a lower bound pending deeper search.
        range: bool,
    },
    /// The goal cannot be reached.
    Infinity,
}

impl Default for Cost {
    fn default() -> Self {
        Self::Undefined
    }
}

impl Cost {
    /// A settled finite cost.
    #[must_use]
    pub const fn settled(value: u32) -> Self {
        Self::Finite {
            value,
            range: false,
        }
    }

    /// A provisional lower bound.
    #[must_use]
    pub const fn range(value: u32) -> Self {
        Self::Finite { value, range: true }
    }

    /// Returns true for a provisional finite cost.
    #[must_use]
    pub const fn is_range(self) -> bool {
        matches!(self, Self::Finite { range: true, .. })
    }

    /// Returns true for settled finite costs and for infinity.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Finite { range: false, .. } | Self::Infinity)
    }

    /// Returns true for any finite cost.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        matches!(self, Self::Finite { .. })
    }

    /// The finite value, if any.
    #[must_use]
    pub const fn value(self) -> Option<u32> {
        match self {
            Self::Finite { value, .. } => Some(value),
            Self::Undefined | Self::Infinity => None,
        }
    }

    /// Cost of taking one more step first. Infinity and Undefined are unchanged.
    #[must_use]
    pub const fn successor(self) -> Self {
        match self {
            Self::Finite { value, range } => Self::Finite {
                value: value.saturating_add(1),
                range,
            },
            other => other,
        }
    }

    /// Compares by magnitude only, ignoring the range flag.
    ///
    /// Returns `None` if either side is undefined.
    #[must_use]
    pub fn value_cmp(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Undefined, _) | (_, Self::Undefined) => None,
            (Self::Infinity, Self::Infinity) => Some(Ordering::Equal),
            (Self::Infinity, Self::Finite { .. }) => Some(Ordering::Greater),
            (Self::Finite { .. }, Self::Infinity) => Some(Ordering::Less),
            (Self::Finite { value: a, .. }, Self::Finite { value: b, .. }) => Some(a.cmp(&b)),
        }
    }

    /// True iff `self` is defined and strictly cheaper than `other` by magnitude.
    #[must_use]
    pub fn is_strictly_below(self, other: Self) -> bool {
        self.value_cmp(other) == Some(Ordering::Less)
    }

    /// Best-case aggregation over alternative edges.
    ///
    /// Settled finite costs win over provisional ones, provisional ones win
    /// over a settled infinity. No alternatives at all means infinity.
    pub fn best(costs: impl IntoIterator<Item = Self>) -> Self {
        let mut settled: Option<Self> = None;
        let mut provisional: Option<Self> = None;
        for cost in costs {
            match cost {
                Self::Finite { range: false, .. } => {
                    settled = Some(settled.map_or(cost, |c| c.min(cost)));
                }
                Self::Finite { range: true, .. } => {
                    provisional = Some(provisional.map_or(cost, |c| c.min(cost)));
                }
                Self::Infinity | Self::Undefined => {}
            }
        }
        settled.or(provisional).unwrap_or(Self::Infinity)
    }

    /// Worst-case aggregation over indistinguishable worlds.
    ///
    /// If any cost is provisional the largest provisional cost is returned,
    /// otherwise the largest settled one. Empty input is undefined.
    pub fn worst(costs: impl IntoIterator<Item = Self>) -> Self {
        let mut settled: Option<Self> = None;
        let mut provisional: Option<Self> = None;
        for cost in costs {
            match cost {
                Self::Finite { range: true, .. } => {
                    provisional = Some(provisional.map_or(cost, |c| c.max(cost)));
                }
                Self::Finite { range: false, .. } | Self::Infinity => {
                    settled = Some(settled.map_or(cost, |c| c.max(cost)));
                }
                Self::Undefined => {}
            }
        }
        provisional.or(settled).unwrap_or(Self::Undefined)
    }

    fn rank(self) -> (u8, u32, bool) {
        match self {
            Self::Undefined => (0, 0, false),
            Self::Finite { value, range } => (1, value, range),
            Self::Infinity => (2, 0, false),
        }
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Finite { value, range: false } => write!(f, "{value}"),
            Self::Finite { value, range: true } => write!(f, ">={value}"),
            Self::Infinity => write!(f, "inf"),
        }
    }
}
