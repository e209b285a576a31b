use serde::{Deserialize, Serialize};

use crate::model::GridBounds;
use crate::util::{clog, cwarn};

/// localStorage key holding an optional JSON override of [`EditorConfig`].
pub const CONFIG_STORAGE_KEY: &str = "perler_config";

/// Smallest accepted cell size; keeps cell indices and grid line counts small.
pub const MIN_CELL_SIZE: f64 = 2.0;
/// Smallest accepted zoom-out scale.
pub const MIN_SCALE_FLOOR: f64 = 0.05;

/// Tunables for the editor. Every field falls back to its default when absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Size of one cell in world units (CSS pixels at scale 1).
    pub cell_size: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Multiplier applied by the zoom buttons.
    pub zoom_step: f64,
    /// How long a motionless press waits before it turns into a drag.
    pub tap_delay_ms: u32,
    /// Screen distance a press may travel and still count as a tap.
    pub drag_threshold_px: f64,
    /// Bead radius as a fraction of the cell size.
    pub bead_radius_factor: f64,
    pub minimap_size_px: f64,
    pub minimap_margin_cells: i32,
    pub export_cell_px: f64,
    pub export_padding_cells: i32,
    /// Fixed-size grid; `None` means the canvas is unbounded.
    pub bounds: Option<GridBounds>,
    /// Whether moving the pinch midpoint also pans the view.
    pub pinch_pans: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            cell_size: 15.0,
            min_scale: 0.5,
            max_scale: 10.0,
            zoom_step: 1.25,
            tap_delay_ms: 250,
            drag_threshold_px: 8.0,
            bead_radius_factor: 0.4,
            minimap_size_px: 150.0,
            minimap_margin_cells: 2,
            export_cell_px: 20.0,
            export_padding_cells: 5,
            bounds: None,
            pinch_pans: false,
        }
    }
}

impl EditorConfig {
    /// Parses a JSON override. Unknown fields are ignored, missing ones default.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<EditorConfig>(raw).map(EditorConfig::validated)
    }

    /// Replaces values that would break the transform math with their defaults.
    pub fn validated(mut self) -> Self {
        let d = EditorConfig::default();
        let positive = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        self.cell_size = positive(self.cell_size, d.cell_size).max(MIN_CELL_SIZE);
        self.min_scale = positive(self.min_scale, d.min_scale);
        self.max_scale = positive(self.max_scale, d.max_scale);
        if self.min_scale > self.max_scale {
            std::mem::swap(&mut self.min_scale, &mut self.max_scale);
        }
        self.min_scale = self.min_scale.max(MIN_SCALE_FLOOR);
        self.max_scale = self.max_scale.max(self.min_scale);
        self.zoom_step = if self.zoom_step.is_finite() && self.zoom_step > 1.0 {
            self.zoom_step
        } else {
            d.zoom_step
        };
        self.drag_threshold_px = if self.drag_threshold_px.is_finite() && self.drag_threshold_px >= 0.0 {
            self.drag_threshold_px
        } else {
            d.drag_threshold_px
        };
        self.bead_radius_factor = if self.bead_radius_factor.is_finite() {
            self.bead_radius_factor.clamp(0.05, 0.5)
        } else {
            d.bead_radius_factor
        };
        self.minimap_size_px = positive(self.minimap_size_px, d.minimap_size_px);
        self.minimap_margin_cells = self.minimap_margin_cells.max(0);
        self.export_cell_px = positive(self.export_cell_px, d.export_cell_px);
        self.export_padding_cells = self.export_padding_cells.max(0);
        if matches!(self.bounds, Some(b) if b.width == 0 || b.height == 0) {
            self.bounds = None;
        }
        self
    }

    /// Reads the override from localStorage, falling back to defaults.
    pub fn load() -> Self {
        let raw = web_sys::window()
            .and_then(|win| win.local_storage().ok().flatten())
            .and_then(|store| store.get_item(CONFIG_STORAGE_KEY).ok().flatten());
        match raw {
            Some(raw) => match EditorConfig::from_json(&raw) {
                Ok(cfg) => {
                    clog(&format!("config override loaded from '{}'", CONFIG_STORAGE_KEY));
                    cfg
                }
                Err(e) => {
                    cwarn(&format!("ignoring malformed '{}': {}", CONFIG_STORAGE_KEY, e));
                    EditorConfig::default()
                }
            },
            None => EditorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = EditorConfig::from_json(r#"{"cell_size": 20, "tap_delay_ms": 400}"#).unwrap();
        assert_eq!(cfg.cell_size, 20.0);
        assert_eq!(cfg.tap_delay_ms, 400);
        assert_eq!(cfg.max_scale, 10.0);
        assert_eq!(cfg.bounds, None);
    }

    #[test]
    fn fixed_bounds_override() {
        let cfg = EditorConfig::from_json(r#"{"bounds": {"width": 30, "height": 30}, "min_scale": 1.0, "max_scale": 5.0}"#)
            .unwrap();
        assert_eq!(cfg.bounds, Some(GridBounds { width: 30, height: 30 }));
        assert_eq!(cfg.min_scale, 1.0);
        assert_eq!(cfg.max_scale, 5.0);
    }

    #[test]
    fn validation_repairs_bad_values() {
        let cfg = EditorConfig {
            cell_size: -1.0,
            min_scale: 8.0,
            max_scale: 2.0,
            zoom_step: 0.5,
            bead_radius_factor: 3.0,
            bounds: Some(GridBounds { width: 0, height: 4 }),
            ..EditorConfig::default()
        }
        .validated();
        assert_eq!(cfg.cell_size, 15.0);
        assert_eq!((cfg.min_scale, cfg.max_scale), (2.0, 8.0));
        assert_eq!(cfg.zoom_step, 1.25);
        assert_eq!(cfg.bead_radius_factor, 0.5);
        assert_eq!(cfg.bounds, None);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(EditorConfig::from_json("{not json").is_err());
        assert!(EditorConfig::from_json(r#"{"cell_size": "big"}"#).is_err());
    }

    #[test]
    fn tiny_cell_and_scale_are_raised_to_floor() {
        let cfg = EditorConfig::from_json(r#"{"cell_size": 1e-9, "min_scale": 1e-12}"#).unwrap();
        assert_eq!(cfg.cell_size, MIN_CELL_SIZE);
        assert_eq!(cfg.min_scale, MIN_SCALE_FLOOR);
        assert!(cfg.max_scale >= cfg.min_scale);
    }
}
