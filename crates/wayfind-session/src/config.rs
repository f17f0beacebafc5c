//! Engine configuration and per-run parameters.
//!
//! Both types (de)serialize under the `serde` feature with every field
//! optional, so a loader can hand over a partial document and keep the
//! defaults for the rest.

use wayfind_paths::{DEFAULT_DISCOUNT, HubConfig};

use crate::error::{SessionError, SessionResult};

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Settings shared by every run of a [`Session`](crate::Session).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Hub selection thresholds for the lookup index.
    pub hubs: HubConfig,
    /// Multiplier applied to hub-route distances when discounting edges.
    pub shortcut_discount: f64,
    /// Hub search radius used when a run does not give one. `None` indexes
    /// the whole graph.
    pub default_radius_km: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hubs: HubConfig::default(),
            shortcut_discount: DEFAULT_DISCOUNT,
            default_radius_km: None,
        }
    }
}

impl EngineConfig {
    /// Check every field, reporting the first bad one.
    pub fn validate(&self) -> SessionResult<()> {
        if self.hubs.min_degree == 0 {
            return Err(invalid("hubs.min_degree must be at least 1"));
        }
        if !self.hubs.min_span.is_finite() || self.hubs.min_span < 0.0 {
            return Err(invalid(format!(
                "hubs.min_span must be a non-negative number, got {}",
                self.hubs.min_span
            )));
        }
        if self.hubs.region_node_cap == 0 {
            return Err(invalid("hubs.region_node_cap must be at least 1"));
        }
        if !self.shortcut_discount.is_finite() || self.shortcut_discount <= 0.0 {
            return Err(invalid(format!(
                "shortcut_discount must be a positive number, got {}",
                self.shortcut_discount
            )));
        }
        check_radius("default_radius_km", self.default_radius_km)
    }
}

// ---------------------------------------------------------------------------
// AlgorithmParams
// ---------------------------------------------------------------------------

/// Extra parameters passed along with an algorithm selection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AlgorithmParams {
    /// Radius around the start node, in kilometres, within which the lookup
    /// variant selects hubs. Ignored by the other algorithms.
    pub radius_km: Option<f64>,
}

impl AlgorithmParams {
    #[inline]
    pub fn with_radius(radius_km: f64) -> Self {
        Self {
            radius_km: Some(radius_km),
        }
    }

    pub fn validate(&self) -> SessionResult<()> {
        check_radius("radius_km", self.radius_km)
    }
}

fn check_radius(field: &str, radius: Option<f64>) -> SessionResult<()> {
    match radius {
        Some(r) if !r.is_finite() || r <= 0.0 => Err(invalid(format!(
            "{field} must be a positive number, got {r}"
        ))),
        _ => Ok(()),
    }
}

fn invalid(msg: impl Into<String>) -> SessionError {
    SessionError::InvalidConfig(msg.into())
}
