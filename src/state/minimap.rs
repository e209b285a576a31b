// Projection from world space into the fixed-size minimap surface.
use super::camera::WorldRect;
use crate::model::BoundingBox;

/// Rectangle in minimap pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Uniform scale plus centering offset: `map = world * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapProjection {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Framed world extent (bounding box plus margin).
    pub extent: WorldRect,
}

impl MinimapProjection {
    /// Fits the bounding box, grown by `margin` cells on every side, into a
    /// `map_w` x `map_h` surface and centers it.
    pub fn fit(bbox: BoundingBox, margin: i32, cell_size: f64, map_w: f64, map_h: f64) -> Self {
        let framed = bbox.expand(margin);
        let extent = WorldRect {
            x: framed.min_x as f64 * cell_size,
            y: framed.min_y as f64 * cell_size,
            w: framed.width() as f64 * cell_size,
            h: framed.height() as f64 * cell_size,
        };
        let scale = (map_w / extent.w).min(map_h / extent.h);
        Self {
            scale,
            offset_x: (map_w - extent.w * scale) * 0.5 - extent.x * scale,
            offset_y: (map_h - extent.h * scale) * 0.5 - extent.y * scale,
            extent,
        }
    }

    pub fn world_to_map(&self, wx: f64, wy: f64) -> (f64, f64) {
        (wx * self.scale + self.offset_x, wy * self.scale + self.offset_y)
    }

    #[cfg(test)]
    pub fn map_to_world(&self, mx: f64, my: f64) -> (f64, f64) {
        ((mx - self.offset_x) / self.scale, (my - self.offset_y) / self.scale)
    }

    pub fn project(&self, r: &WorldRect) -> MapRect {
        let (x, y) = self.world_to_map(r.x, r.y);
        MapRect {
            x,
            y,
            w: r.w * self.scale,
            h: r.h * self.scale,
        }
    }

    #[cfg(test)]
    pub fn unproject(&self, r: &MapRect) -> WorldRect {
        let (x, y) = self.map_to_world(r.x, r.y);
        WorldRect {
            x,
            y,
            w: r.w / self.scale,
            h: r.h / self.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::camera::Camera;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn default_box_fills_square_map() {
        let p = MinimapProjection::fit(BoundingBox::DEFAULT, 2, 15.0, 150.0, 150.0);
        // 10 cells + 2*2 margin = 14 cells of 15 units
        assert!(close(p.extent.w, 210.0));
        assert!(close(p.scale, 150.0 / 210.0));
        let (x0, y0) = p.world_to_map(p.extent.x, p.extent.y);
        assert!(close(x0, 0.0) && close(y0, 0.0));
        let (x1, y1) = p.world_to_map(p.extent.right(), p.extent.bottom());
        assert!(close(x1, 150.0) && close(y1, 150.0));
    }

    #[test]
    fn wide_content_is_centered_vertically() {
        let bbox = BoundingBox { min_x: 0, min_y: 0, max_x: 19, max_y: 3 };
        let p = MinimapProjection::fit(bbox, 0, 10.0, 100.0, 100.0);
        assert!(close(p.scale, 0.5));
        let (_, top) = p.world_to_map(0.0, 0.0);
        let (_, bottom) = p.world_to_map(0.0, 40.0);
        assert!(close(top, 40.0));
        assert!(close(bottom, 60.0));
    }

    #[test]
    fn viewport_rect_round_trips() {
        let cam = Camera { scale: 2.5, offset_x: -120.0, offset_y: 75.0 };
        let visible = cam.visible_world_rect(1024.0, 768.0);
        let bbox = BoundingBox { min_x: -3, min_y: -1, max_x: 5, max_y: 2 };
        let p = MinimapProjection::fit(bbox, 2, 15.0, 150.0, 150.0);
        let drawn = p.project(&visible);
        let back = p.unproject(&drawn);
        assert!(close(back.x, visible.x));
        assert!(close(back.y, visible.y));
        assert!(close(back.w, visible.w));
        assert!(close(back.h, visible.h));
    }

    #[test]
    fn map_point_inverts_world_point() {
        let p = MinimapProjection::fit(BoundingBox { min_x: -40, min_y: 7, max_x: 2, max_y: 9 }, 2, 15.0, 150.0, 120.0);
        let (mx, my) = p.world_to_map(-333.0, 121.5);
        let (wx, wy) = p.map_to_world(mx, my);
        assert!(close(wx, -333.0) && close(wy, 121.5));
    }
}
