//! Popularity Tiers

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Error returned when a tier label outside the fixed set is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown popularity tier label: `{0}`")]
pub struct UnknownTier(pub String);

/// Popularity strength of a role, from strongest (`+++`) to weakest (`---`).
///
/// The set is closed: any other label is rejected with [`UnknownTier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PopularityTier {
    /// `+++`
    #[serde(rename = "+++")]
    TriplePlus,

    /// `++`
    #[serde(rename = "++")]
    DoublePlus,

    /// `+`
    #[serde(rename = "+")]
    Plus,

    /// `-`
    #[serde(rename = "-")]
    Minus,

    /// `--`
    #[serde(rename = "--")]
    DoubleMinus,

    /// `---`
    #[serde(rename = "---")]
    TripleMinus,
}

impl PopularityTier {
    /// All tiers, strongest first.
    pub const ALL: [PopularityTier; 6] = [
        PopularityTier::TriplePlus,
        PopularityTier::DoublePlus,
        PopularityTier::Plus,
        PopularityTier::Minus,
        PopularityTier::DoubleMinus,
        PopularityTier::TripleMinus,
    ];

    /// The tier's label as it appears in payloads and fixtures.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PopularityTier::TriplePlus => "+++",
            PopularityTier::DoublePlus => "++",
            PopularityTier::Plus => "+",
            PopularityTier::Minus => "-",
            PopularityTier::DoubleMinus => "--",
            PopularityTier::TripleMinus => "---",
        }
    }
}

impl fmt::Display for PopularityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PopularityTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+++" => Ok(PopularityTier::TriplePlus),
            "++" => Ok(PopularityTier::DoublePlus),
            "+" => Ok(PopularityTier::Plus),
            "-" => Ok(PopularityTier::Minus),
            "--" => Ok(PopularityTier::DoubleMinus),
            "---" => Ok(PopularityTier::TripleMinus),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}

/// Adjustment interval for one tier, as fractions of the base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBounds {
    /// Lower end of the interval, as a fraction of the base price.
    pub min_fraction: Decimal,

    /// Upper end of the interval, as a fraction of the base price.
    pub max_fraction: Decimal,
}

impl TierBounds {
    /// Create tier bounds from fractions of the base price.
    #[must_use]
    pub fn new(min_fraction: Decimal, max_fraction: Decimal) -> Self {
        Self {
            min_fraction,
            max_fraction,
        }
    }

    /// Whether the interval is inverted (`min_fraction > max_fraction`).
    ///
    /// An inverted interval resolves to an empty adjustment range for every
    /// positive base price.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.min_fraction > self.max_fraction
    }
}

/// Tier-to-interval configuration table.
///
/// The mapping is data, not code, so that bound derivation stays testable in
/// isolation and alternative tables can be loaded from fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    bounds: FxHashMap<PopularityTier, TierBounds>,
}

impl TierTable {
    /// Build a table from explicit rows. Missing tiers resolve to `None` in
    /// [`TierTable::bounds`].
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = (PopularityTier, TierBounds)>) -> Self {
        Self {
            bounds: rows.into_iter().collect(),
        }
    }

    /// Look up the interval for a tier.
    #[must_use]
    pub fn bounds(&self, tier: PopularityTier) -> Option<TierBounds> {
        self.bounds.get(&tier).copied()
    }

    /// Rows whose interval is inverted (`min_fraction > max_fraction`).
    ///
    /// The stock table ships with the `---` row declared as
    /// `(-0.15, -0.30)`, which is inverted relative to the other rows. The
    /// numbers are reproduced as configured rather than corrected; callers
    /// that want to reject such tables can use this check up front, and roles
    /// assigned an inverted tier fail bound resolution with an explicit
    /// error.
    #[must_use]
    pub fn inverted_rows(&self) -> SmallVec<[(PopularityTier, TierBounds); 6]> {
        PopularityTier::ALL
            .iter()
            .filter_map(|tier| self.bounds(*tier).map(|bounds| (*tier, bounds)))
            .filter(|(_, bounds)| bounds.is_inverted())
            .collect()
    }
}

impl Default for TierTable {
    /// The stock table, fractions of the base price per tier label.
    fn default() -> Self {
        Self::from_rows([
            (
                PopularityTier::TriplePlus,
                TierBounds::new(Decimal::new(15, 2), Decimal::new(30, 2)),
            ),
            (
                PopularityTier::DoublePlus,
                TierBounds::new(Decimal::new(5, 2), Decimal::new(20, 2)),
            ),
            (
                PopularityTier::Plus,
                TierBounds::new(Decimal::new(-5, 2), Decimal::new(10, 2)),
            ),
            (
                PopularityTier::Minus,
                TierBounds::new(Decimal::new(-10, 2), Decimal::new(5, 2)),
            ),
            (
                PopularityTier::DoubleMinus,
                TierBounds::new(Decimal::new(-50, 2), Decimal::new(-20, 2)),
            ),
            (
                PopularityTier::TripleMinus,
                TierBounds::new(Decimal::new(-15, 2), Decimal::new(-30, 2)),
            ),
        ])
    }
}
