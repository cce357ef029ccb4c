//! Level-of-detail selection
//!
//! Maps a node's projected screen coverage and the frame's quality budget to
//! a discrete detail level. The thresholds form a geometric ladder: starting
//! from the budget, each step multiplies by `scale_factor`, and the level
//! climbs while the threshold stays below the projected size. Larger or
//! closer objects therefore always land on an equal or higher level, and
//! ties round down to fewer polygons.

use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::core::error::Error;

/// Tuning constants for visibility and detail selection.
///
/// Immutable once handed to the scene manager. Serializable so external
/// save/load tooling can persist quality settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LodConfig {
    /// Threshold multiplier between consecutive detail levels.
    pub scale_factor: f32,
    /// Projected size below which detail-floor nodes drop back to level 0.
    pub min_lod_threshold: f32,
    /// Hard cap on the selected level, before clamping to the LOD list.
    pub max_levels: usize,
    /// Cull floor: projected sizes below `seconds_allowed` times this are
    /// not worth resolving at all and force the node hidden.
    pub min_projected_size: f32,
    /// User detail dial. The quality budget is
    /// `seconds_allowed * scale_factor^(-max_lod)`, so raising the dial by
    /// one shifts every object up one level on the ladder.
    pub max_lod: f32,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            scale_factor: 4.0,
            min_lod_threshold: 0.000_976_562_97,
            max_levels: 6,
            min_projected_size: 0.000_125,
            max_lod: 3.6,
        }
    }
}

impl LodConfig {
    /// Budget base derived from the user detail dial.
    pub fn lod_power(&self) -> f32 {
        self.scale_factor.powf(-self.max_lod)
    }

    /// Reject configurations the selector cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(Error::Config(format!(
                "scale_factor must be finite and > 1.0, got {}",
                self.scale_factor
            )));
        }
        if !self.min_lod_threshold.is_finite() || self.min_lod_threshold <= 0.0 {
            return Err(Error::Config(format!(
                "min_lod_threshold must be finite and > 0.0, got {}",
                self.min_lod_threshold
            )));
        }
        if !self.min_projected_size.is_finite() || self.min_projected_size <= 0.0 {
            return Err(Error::Config(format!(
                "min_projected_size must be finite and > 0.0, got {}",
                self.min_projected_size
            )));
        }
        if !self.max_lod.is_finite() {
            return Err(Error::Config(format!(
                "max_lod must be finite, got {}",
                self.max_lod
            )));
        }
        if self.max_levels == 0 {
            return Err(Error::Config("max_levels must be at least 1".into()));
        }
        Ok(())
    }
}

/// Pick a detail level for one node.
///
/// # Arguments
/// * `projected_size` - the node's screen coverage per
///   `ViewFrustum::projected_size`
/// * `budget` - `seconds_allowed * config.lod_power()`
/// * `detail_floor` - whether the node's finest LOD guarantees at least
///   level 1 (single-level peek done by the caller)
///
/// # Returns
/// Level in `0..=config.max_levels`; the caller clamps to the node's actual
/// LOD list length.
pub fn select_level(
    projected_size: f32,
    budget: f32,
    detail_floor: bool,
    config: &LodConfig,
) -> usize {
    let mut level = if detail_floor {
        if projected_size < config.min_lod_threshold {
            return 0;
        }
        1
    } else {
        0
    };

    let mut scale = budget;
    while level < config.max_levels {
        if scale >= projected_size {
            break;
        }
        scale *= config.scale_factor;
        level += 1;
    }

    level
}
