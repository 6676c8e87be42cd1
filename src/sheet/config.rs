use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};

/// How bend strips are laid out when a triplet is straightened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnfoldMode {
    /// Unfold directions are projected onto the XY plane, producing a plan
    /// view once the root lies in XY.
    #[default]
    PlanView,
    /// Unfold directions are kept in 3D.
    Spatial,
}

/// Tolerances and switches for the sheet-metal pipeline.
///
/// Every field has a default, so a partial JSON/TOML document is enough to
/// deserialize one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Target sheet thickness. Estimated from the model when `None`.
    pub thickness: Option<f64>,
    /// Relative tolerance on the measured thickness.
    pub thickness_tolerance: f64,
    /// Angle (radians) below which two directions count as parallel.
    pub angle_tolerance: f64,
    /// Faces smaller than this are ignored when pairing.
    pub min_face_area: f64,
    /// Distance below which two faces count as touching.
    pub adjacency_tolerance: f64,
    /// Distance below which two vertices count as the same point.
    pub vertex_match_tolerance: f64,
    /// Grid used to measure the distance between curved faces.
    pub samples_u: usize,
    pub samples_v: usize,
    /// Per-direction grid used for the adjacency proximity test.
    pub adjacency_samples: usize,
    pub mode: UnfoldMode,
    /// Rotate the part so the root face lies in the XY plane before
    /// unfolding.
    pub align_root: bool,
    /// Relative tolerance between a hole's depth and the thickness.
    pub hole_depth_tolerance: f64,
    /// Relative tolerance between the radii of two halves of one hole.
    pub hole_radius_tolerance: f64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            thickness: None,
            thickness_tolerance: 1e-6,
            angle_tolerance: 1e-6,
            min_face_area: 0.0,
            adjacency_tolerance: 1e-6,
            vertex_match_tolerance: 1e-6,
            samples_u: 10,
            samples_v: 10,
            adjacency_samples: 5,
            mode: UnfoldMode::PlanView,
            align_root: true,
            hole_depth_tolerance: 0.05,
            hole_radius_tolerance: 1e-6,
        }
    }
}

impl SheetConfig {
    #[must_use]
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = Some(thickness);
        self
    }

    #[must_use]
    pub fn with_thickness_tolerance(mut self, tolerance: f64) -> Self {
        self.thickness_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_angle_tolerance(mut self, tolerance: f64) -> Self {
        self.angle_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_min_face_area(mut self, area: f64) -> Self {
        self.min_face_area = area;
        self
    }

    #[must_use]
    pub fn with_adjacency_tolerance(mut self, tolerance: f64) -> Self {
        self.adjacency_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_vertex_match_tolerance(mut self, tolerance: f64) -> Self {
        self.vertex_match_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_samples(mut self, nu: usize, nv: usize) -> Self {
        self.samples_u = nu;
        self.samples_v = nv;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: UnfoldMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_align_root(mut self, align: bool) -> Self {
        self.align_root = align;
        self
    }

    #[must_use]
    pub fn with_hole_tolerances(mut self, depth: f64, radius: f64) -> Self {
        self.hole_depth_tolerance = depth;
        self.hole_radius_tolerance = radius;
        self
    }

    /// Checks that tolerances are usable.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::InvalidConfig`] for negative or non-finite
    /// tolerances, empty sample grids or a non-positive thickness.
    pub fn validate(&self) -> Result<()> {
        let tolerances = [
            ("thickness_tolerance", self.thickness_tolerance),
            ("angle_tolerance", self.angle_tolerance),
            ("min_face_area", self.min_face_area),
            ("adjacency_tolerance", self.adjacency_tolerance),
            ("vertex_match_tolerance", self.vertex_match_tolerance),
            ("hole_depth_tolerance", self.hole_depth_tolerance),
            ("hole_radius_tolerance", self.hole_radius_tolerance),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{name} must be finite and >= 0, got {value}")));
            }
        }
        if self.samples_u == 0 || self.samples_v == 0 || self.adjacency_samples == 0 {
            return Err(invalid("sample counts must be at least 1".into()));
        }
        if let Some(t) = self.thickness {
            if !(t.is_finite() && t > 0.0) {
                return Err(invalid(format!("thickness must be positive, got {t}")));
            }
        }
        Ok(())
    }
}

fn invalid(msg: String) -> crate::error::Error {
    SheetError::InvalidConfig(msg).into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SheetConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let c = SheetConfig::default().with_angle_tolerance(-1.0);
        assert!(c.validate().is_err());
        let c = SheetConfig::default().with_thickness(0.0);
        assert!(c.validate().is_err());
        let c = SheetConfig::default().with_hole_tolerances(0.05, -1e-3);
        assert!(c.validate().is_err());
        let c = SheetConfig::default().with_samples(0, 3);
        assert!(c.validate().is_err());
        let c = SheetConfig::default().with_adjacency_tolerance(f64::NAN);
        assert!(c.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: SheetConfig =
            serde_json::from_str(r#"{ "thickness": 1.5, "mode": "spatial" }"#).unwrap();
        assert_eq!(c.thickness, Some(1.5));
        assert_eq!(c.mode, UnfoldMode::Spatial);
        assert_eq!(c.samples_u, 10);
        assert!(c.align_root);
    }

    #[test]
    fn serializes_back() {
        let c = SheetConfig::default().with_thickness(2.0);
        let json = serde_json::to_string(&c).unwrap();
        let back: SheetConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
