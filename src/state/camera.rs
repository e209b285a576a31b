// View transform (pan/zoom) and the screen <-> world <-> cell conversions.
use crate::model::Cell;

/// Maps world space to screen space: `screen = world * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Axis-aligned rectangle in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl WorldRect {
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn intersects(&self, other: &WorldRect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }

    pub fn inflate(&self, by: f64) -> WorldRect {
        WorldRect {
            x: self.x - by,
            y: self.y - by,
            w: self.w + 2.0 * by,
            h: self.h + 2.0 * by,
        }
    }
}

/// World-space rectangle covered by a cell.
pub fn cell_rect(cell: Cell, cell_size: f64) -> WorldRect {
    WorldRect {
        x: cell.x as f64 * cell_size,
        y: cell.y as f64 * cell_size,
        w: cell_size,
        h: cell_size,
    }
}

pub fn world_to_cell(wx: f64, wy: f64, cell_size: f64) -> Cell {
    Cell::new((wx / cell_size).floor() as i32, (wy / cell_size).floor() as i32)
}

impl Camera {
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        ((sx - self.offset_x) / self.scale, (sy - self.offset_y) / self.scale)
    }

    #[cfg(test)]
    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
        (wx * self.scale + self.offset_x, wy * self.scale + self.offset_y)
    }

    pub fn screen_to_cell(&self, sx: f64, sy: f64, cell_size: f64) -> Cell {
        let (wx, wy) = self.screen_to_world(sx, sy);
        world_to_cell(wx, wy, cell_size)
    }

    /// World rectangle visible through a viewport of the given CSS size.
    pub fn visible_world_rect(&self, viewport_w: f64, viewport_h: f64) -> WorldRect {
        let (x, y) = self.screen_to_world(0.0, 0.0);
        WorldRect {
            x,
            y,
            w: viewport_w / self.scale,
            h: viewport_h / self.scale,
        }
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Multiplies the scale by `factor` (clamped) while keeping the world point
    /// under the focal screen point fixed.
    pub fn zoom_at(&mut self, focal_x: f64, focal_y: f64, factor: f64, min_scale: f64, max_scale: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_scale = (self.scale * factor).clamp(min_scale, max_scale);
        let ratio = new_scale / self.scale;
        self.offset_x = focal_x - (focal_x - self.offset_x) * ratio;
        self.offset_y = focal_y - (focal_y - self.offset_y) * ratio;
        self.scale = new_scale;
    }

    pub fn reset(&mut self) {
        *self = Camera::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_to_cell_floors_negative_coordinates() {
        let cam = Camera::default();
        assert_eq!(cam.screen_to_cell(-0.5, 14.9, 15.0), Cell::new(-1, 0));
        assert_eq!(cam.screen_to_cell(15.0, -15.0, 15.0), Cell::new(1, -1));
        assert_eq!(cam.screen_to_cell(-15.1, -30.0, 15.0), Cell::new(-2, -2));
    }

    #[test]
    fn screen_to_world_inverts_world_to_screen() {
        let cam = Camera { scale: 2.5, offset_x: -40.0, offset_y: 17.0 };
        let (sx, sy) = cam.world_to_screen(12.0, -3.0);
        let (wx, wy) = cam.screen_to_world(sx, sy);
        assert!((wx - 12.0).abs() < 1e-9);
        assert!((wy + 3.0).abs() < 1e-9);
    }

    #[test]
    fn visible_rect_tracks_pan_and_zoom() {
        let cam = Camera { scale: 2.0, offset_x: 100.0, offset_y: -50.0 };
        let r = cam.visible_world_rect(800.0, 600.0);
        assert_eq!(r, WorldRect { x: -50.0, y: 25.0, w: 400.0, h: 300.0 });
    }

    #[test]
    fn zoom_clamps_to_limits() {
        let mut cam = Camera::default();
        for _ in 0..50 {
            cam.zoom_at(100.0, 100.0, 1.25, 0.5, 10.0);
        }
        assert_eq!(cam.scale, 10.0);
        for _ in 0..50 {
            cam.zoom_at(100.0, 100.0, 0.8, 0.5, 10.0);
        }
        assert_eq!(cam.scale, 0.5);
    }

    #[test]
    fn zoom_ignores_degenerate_factor() {
        let mut cam = Camera { scale: 3.0, offset_x: 4.0, offset_y: 5.0 };
        cam.zoom_at(10.0, 10.0, 0.0, 0.5, 10.0);
        cam.zoom_at(10.0, 10.0, f64::NAN, 0.5, 10.0);
        assert_eq!(cam, Camera { scale: 3.0, offset_x: 4.0, offset_y: 5.0 });
    }

    #[test]
    fn rect_intersection() {
        let a = WorldRect { x: 0.0, y: 0.0, w: 10.0, h: 10.0 };
        assert!(a.intersects(&WorldRect { x: 9.0, y: 9.0, w: 5.0, h: 5.0 }));
        assert!(!a.intersects(&WorldRect { x: 10.0, y: 0.0, w: 5.0, h: 5.0 }));
        assert!(a.inflate(1.0).intersects(&WorldRect { x: 10.0, y: 0.0, w: 5.0, h: 5.0 }));
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn zoom_keeps_focal_point_fixed(
                fx in -2000.0f64..2000.0,
                fy in -2000.0f64..2000.0,
                scale in 0.5f64..10.0,
                ox in -5000.0f64..5000.0,
                oy in -5000.0f64..5000.0,
                ratio in 0.05f64..20.0,
            ) {
                let mut cam = Camera { scale, offset_x: ox, offset_y: oy };
                let before = cam.screen_to_world(fx, fy);
                cam.zoom_at(fx, fy, ratio, 0.5, 10.0);
                let after = cam.screen_to_world(fx, fy);
                prop_assert!((before.0 - after.0).abs() < 1e-6 * (1.0 + before.0.abs()));
                prop_assert!((before.1 - after.1).abs() < 1e-6 * (1.0 + before.1.abs()));
            }

            #[test]
            fn scale_never_leaves_bounds(steps in proptest::collection::vec(0.1f64..10.0, 1..60)) {
                let mut cam = Camera::default();
                for f in steps {
                    cam.zoom_at(320.0, 240.0, f, 0.5, 10.0);
                    prop_assert!(cam.scale >= 0.5 && cam.scale <= 10.0);
                }
            }
        }
    }
}
