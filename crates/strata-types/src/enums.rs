//! Enumeration types shared across the Strata pipeline.
//!
//! Wire labels are `snake_case` so that stored results and dashboard
//! bindings use the same vocabulary as the scoring rules.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Contradiction kinds
// ---------------------------------------------------------------------------

/// A class of environmental contradiction detected within one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ContradictionKind {
    /// Vegetation density and canopy height disagree (clearing, cultivation,
    /// earthworks under regrowth).
    VegetationCanopy,
    /// Near water but elevated and gently sloped: the classic settlement
    /// signature.
    WaterProximity,
    /// Regular edge structure in the fine vegetation grid.
    GeometricPattern,
}

impl ContradictionKind {
    /// Stable wire label for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VegetationCanopy => "vegetation_canopy",
            Self::WaterProximity => "water_proximity",
            Self::GeometricPattern => "geometric_pattern",
        }
    }
}

impl core::fmt::Display for ContradictionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Attractor categories
// ---------------------------------------------------------------------------

/// The kind of prior knowledge an attractor represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AttractorCategory {
    /// Archival or expedition reference to a place.
    Historical,
    /// A geological feature (terra preta, bluff, anomaly).
    Geological,
    /// A hydrological feature (confluence, oxbow, spring).
    Hydrological,
    /// A symbolic or cartographic marker.
    Symbolic,
    /// A location drawn from oral tradition or myth.
    Mythic,
    /// A site already confirmed by lidar survey.
    LidarConfirmed,
}

impl AttractorCategory {
    /// Stable wire label for this category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Historical => "historical",
            Self::Geological => "geological",
            Self::Hydrological => "hydrological",
            Self::Symbolic => "symbolic",
            Self::Mythic => "mythic",
            Self::LidarConfirmed => "lidar_confirmed",
        }
    }
}

impl core::fmt::Display for AttractorCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Site types
// ---------------------------------------------------------------------------

/// Predicted archaeological site type for a scored cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SiteType {
    /// Score too low to suggest a site.
    Unlikely,
    /// Strong geometric structure: a planned settlement.
    Settlement,
    /// Exceptionally strong water-proximity signature.
    CeremonialCenter,
    /// High composite score without a type-specific signature.
    MajorSettlement,
    /// Moderate composite score.
    MinorSettlement,
    /// Weak but non-negligible evidence.
    PotentialSite,
}

impl SiteType {
    /// Stable wire label for this site type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unlikely => "unlikely",
            Self::Settlement => "settlement",
            Self::CeremonialCenter => "ceremonial_center",
            Self::MajorSettlement => "major_settlement",
            Self::MinorSettlement => "minor_settlement",
            Self::PotentialSite => "potential_site",
        }
    }
}

impl core::fmt::Display for SiteType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
