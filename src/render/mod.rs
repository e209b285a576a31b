//! Drawing passes for the main view, the minimap and the PNG export.
//!
//! All passes draw through [`Surface`], a small immediate-mode 2D API. The
//! browser implementation lives in [`canvas`]; tests record calls instead.

pub mod canvas;

use crate::export::ExportLayout;
use crate::model::{Cell, Grid, GridBounds, Rgb};
use crate::state::camera::{WorldRect, cell_rect};
use crate::state::{Editor, MinimapProjection};

pub const BACKGROUND: Rgb = Rgb::from_u32(0xFFFFFF);
pub const GRID_LINE: Rgb = Rgb::from_u32(0xE0E0E0);
pub const MINIMAP_BACKGROUND: Rgb = Rgb::from_u32(0xF6F8FA);
pub const MINIMAP_BORDER: Rgb = Rgb::from_u32(0x8B949E);
pub const VIEWPORT_FRAME: Rgb = Rgb::from_u32(0xF85149);

const VIEWPORT_DASH: [f64; 2] = [4.0, 3.0];

/// Immediate-mode 2D drawing target.
pub trait Surface {
    fn reset_transform(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn scale(&mut self, s: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn clear(&mut self, w: f64, h: f64);
    fn set_fill(&mut self, color: Rgb);
    fn set_stroke(&mut self, color: Rgb);
    fn set_line_width(&mut self, w: f64);
    fn set_line_dash(&mut self, pattern: &[f64]);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64);
    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64);
}

/// Inclusive range of grid lines to draw, in cell units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineSpan {
    first_col: i32,
    last_col: i32,
    first_row: i32,
    last_row: i32,
}

impl LineSpan {
    /// Lines covering `visible` plus one line of slack on every side,
    /// cut to the board when the grid is bounded.
    fn covering(visible: &WorldRect, cell: f64, bounds: Option<GridBounds>) -> Self {
        let mut span = LineSpan {
            first_col: ((visible.x / cell).floor() as i32).saturating_sub(1),
            last_col: ((visible.right() / cell).ceil() as i32).saturating_add(1),
            first_row: ((visible.y / cell).floor() as i32).saturating_sub(1),
            last_row: ((visible.bottom() / cell).ceil() as i32).saturating_add(1),
        };
        if let Some(b) = bounds {
            span.first_col = span.first_col.max(0);
            span.first_row = span.first_row.max(0);
            span.last_col = span.last_col.min(b.width as i32);
            span.last_row = span.last_row.min(b.height as i32);
        }
        span
    }

    fn is_empty(&self) -> bool {
        self.first_col > self.last_col || self.first_row > self.last_row
    }
}

fn draw_grid_lines(s: &mut impl Surface, span: LineSpan, cell: f64) {
    if span.is_empty() {
        return;
    }
    let top = span.first_row as f64 * cell;
    let bottom = span.last_row as f64 * cell;
    let left = span.first_col as f64 * cell;
    let right = span.last_col as f64 * cell;
    for col in span.first_col..=span.last_col {
        let x = col as f64 * cell;
        s.line(x, top, x, bottom);
    }
    for row in span.first_row..=span.last_row {
        let y = row as f64 * cell;
        s.line(left, y, right, y);
    }
}

fn draw_bead(s: &mut impl Surface, cell: Cell, color: Rgb, cell_size: f64, radius: f64) {
    s.set_fill(color);
    s.fill_circle(
        (cell.x as f64 + 0.5) * cell_size,
        (cell.y as f64 + 0.5) * cell_size,
        radius,
    );
}

/// Main view: background, grid lines and beads culled to the visible rect.
pub fn draw_main(s: &mut impl Surface, editor: &Editor) {
    let (w, h) = editor.viewport();
    let cam = editor.camera();
    let cfg = editor.config();
    let cell = cfg.cell_size;

    s.reset_transform();
    s.scale(editor.dpr());
    s.clear(w, h);
    s.set_fill(BACKGROUND);
    s.fill_rect(0.0, 0.0, w, h);

    s.save();
    s.translate(cam.offset_x, cam.offset_y);
    s.scale(cam.scale);

    let visible = cam.visible_world_rect(w, h);
    s.set_stroke(GRID_LINE);
    s.set_line_width(1.0 / cam.scale);
    draw_grid_lines(s, LineSpan::covering(&visible, cell, cfg.bounds), cell);

    let cull = visible.inflate(cell);
    let radius = cell * cfg.bead_radius_factor;
    for (c, color) in editor.grid().iter() {
        if cell_rect(c, cell).intersects(&cull) {
            draw_bead(s, c, color, cell, radius);
        }
    }
    s.restore();
}

/// Minimap: every bead fitted into `map_w` x `map_h`, plus a dashed frame
/// for the main view's visible rect. Returns the projection used.
pub fn draw_minimap(s: &mut impl Surface, editor: &Editor, map_w: f64, map_h: f64) -> MinimapProjection {
    let cfg = editor.config();
    let cell = cfg.cell_size;
    let grid = editor.grid();
    let proj = MinimapProjection::fit(grid.bounding_box(), cfg.minimap_margin_cells, cell, map_w, map_h);

    s.reset_transform();
    s.scale(editor.dpr());
    s.clear(map_w, map_h);
    s.set_fill(MINIMAP_BACKGROUND);
    s.fill_rect(0.0, 0.0, map_w, map_h);

    s.save();
    s.translate(proj.offset_x, proj.offset_y);
    s.scale(proj.scale);
    let radius = cell * cfg.bead_radius_factor;
    for (c, color) in grid.iter() {
        draw_bead(s, c, color, cell, radius);
    }
    s.restore();

    let frame = proj.project(&editor.visible_rect());
    s.set_stroke(VIEWPORT_FRAME);
    s.set_line_width(1.0);
    s.set_line_dash(&VIEWPORT_DASH);
    s.stroke_rect(frame.x, frame.y, frame.w, frame.h);
    s.set_line_dash(&[]);

    s.set_stroke(MINIMAP_BORDER);
    s.stroke_rect(0.5, 0.5, map_w - 1.0, map_h - 1.0);
    proj
}

/// Export raster: white board, grid lines and every bead, with the padded
/// bounding box starting at (0, 0).
pub fn draw_export(s: &mut impl Surface, grid: &Grid, layout: &ExportLayout, radius_factor: f64) {
    let cell = layout.cell_px;
    let (w, h) = (layout.width_px(), layout.height_px());
    s.reset_transform();
    s.set_fill(BACKGROUND);
    s.fill_rect(0.0, 0.0, w, h);

    s.set_stroke(GRID_LINE);
    s.set_line_width(1.0);
    for col in 0..=layout.cols {
        let x = col as f64 * cell;
        s.line(x, 0.0, x, h);
    }
    for row in 0..=layout.rows {
        let y = row as f64 * cell;
        s.line(0.0, y, w, y);
    }

    s.save();
    s.translate(-(layout.origin.x as f64) * cell, -(layout.origin.y as f64) * cell);
    let radius = cell * radius_factor;
    for (c, color) in grid.iter() {
        draw_bead(s, c, color, cell, radius);
    }
    s.restore();
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        ResetTransform,
        Translate(f64, f64),
        Scale(f64),
        Save,
        Restore,
        Clear(f64, f64),
        Fill(Rgb),
        Stroke(Rgb),
        LineWidth(f64),
        LineDash(Vec<f64>),
        FillRect(f64, f64, f64, f64),
        StrokeRect(f64, f64, f64, f64),
        Line(f64, f64, f64, f64),
        Circle(f64, f64, f64),
    }

    /// Surface that records every call for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub ops: Vec<Op>,
    }

    impl RecordingSurface {
        pub fn circles(&self) -> Vec<(f64, f64, f64)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Circle(x, y, r) => Some((*x, *y, *r)),
                    _ => None,
                })
                .collect()
        }

        pub fn lines(&self) -> usize {
            self.ops.iter().filter(|op| matches!(op, Op::Line(..))).count()
        }
    }

    impl Surface for RecordingSurface {
        fn reset_transform(&mut self) {
            self.ops.push(Op::ResetTransform);
        }
        fn translate(&mut self, x: f64, y: f64) {
            self.ops.push(Op::Translate(x, y));
        }
        fn scale(&mut self, s: f64) {
            self.ops.push(Op::Scale(s));
        }
        fn save(&mut self) {
            self.ops.push(Op::Save);
        }
        fn restore(&mut self) {
            self.ops.push(Op::Restore);
        }
        fn clear(&mut self, w: f64, h: f64) {
            self.ops.push(Op::Clear(w, h));
        }
        fn set_fill(&mut self, color: Rgb) {
            self.ops.push(Op::Fill(color));
        }
        fn set_stroke(&mut self, color: Rgb) {
            self.ops.push(Op::Stroke(color));
        }
        fn set_line_width(&mut self, w: f64) {
            self.ops.push(Op::LineWidth(w));
        }
        fn set_line_dash(&mut self, pattern: &[f64]) {
            self.ops.push(Op::LineDash(pattern.to_vec()));
        }
        fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
            self.ops.push(Op::FillRect(x, y, w, h));
        }
        fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
            self.ops.push(Op::StrokeRect(x, y, w, h));
        }
        fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
            self.ops.push(Op::Line(x0, y0, x1, y1));
        }
        fn fill_circle(&mut self, cx: f64, cy: f64, r: f64) {
            self.ops.push(Op::Circle(cx, cy, r));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::recording::{Op, RecordingSurface};
    use super::*;
    use crate::config::EditorConfig;
    use crate::model::PALETTE;
    use crate::state::PointerInput;

    fn editor_with_beads(cells: &[(i32, i32)]) -> Editor {
        let mut ed = Editor::new(EditorConfig::default());
        ed.resize(150.0, 150.0, 1.0);
        for &(x, y) in cells {
            ed.toggle_cell(Cell::new(x, y));
        }
        ed
    }

    #[test]
    fn main_pass_culls_offscreen_beads() {
        let ed = editor_with_beads(&[(0, 0), (1000, 1000), (-2, 3)]);
        let mut s = RecordingSurface::default();
        draw_main(&mut s, &ed);
        let circles = s.circles();
        assert_eq!(circles, vec![(7.5, 7.5, 6.0)]);
    }

    #[test]
    fn main_pass_draws_one_slack_line_each_side() {
        let ed = editor_with_beads(&[]);
        let mut s = RecordingSurface::default();
        draw_main(&mut s, &ed);
        // columns and rows -1..=11
        assert_eq!(s.lines(), 26);
        assert!(s.ops.contains(&Op::Line(-15.0, -15.0, -15.0, 165.0)));
    }

    #[test]
    fn grid_stroke_width_is_zoom_independent() {
        let mut ed = editor_with_beads(&[]);
        ed.zoom_in();
        ed.zoom_in();
        let scale = ed.camera().scale;
        let mut s = RecordingSurface::default();
        draw_main(&mut s, &ed);
        assert!(s.ops.contains(&Op::LineWidth(1.0 / scale)));
        assert!(s.ops.contains(&Op::Scale(scale)));
    }

    #[test]
    fn bounded_grid_lines_stop_at_board_edge() {
        let cfg = EditorConfig {
            bounds: Some(GridBounds { width: 4, height: 2 }),
            ..EditorConfig::default()
        };
        let mut ed = Editor::new(cfg);
        ed.resize(150.0, 150.0, 1.0);
        let mut s = RecordingSurface::default();
        draw_main(&mut s, &ed);
        // 5 vertical + 3 horizontal
        assert_eq!(s.lines(), 8);
    }

    #[test]
    fn main_pass_applies_dpr_before_camera() {
        let mut ed = editor_with_beads(&[]);
        ed.resize(150.0, 150.0, 2.0);
        let mut s = RecordingSurface::default();
        draw_main(&mut s, &ed);
        assert_eq!(&s.ops[..2], &[Op::ResetTransform, Op::Scale(2.0)]);
    }

    #[test]
    fn minimap_frame_maps_back_to_visible_rect() {
        let mut ed = editor_with_beads(&[(-3, 2), (5, -1), (0, 0)]);
        ed.resize(640.0, 480.0, 1.0);
        ed.pointer(PointerInput::Down { id: 1, x: 0.0, y: 0.0 });
        ed.pointer(PointerInput::Move { id: 1, x: 90.0, y: -40.0 });
        ed.pointer(PointerInput::Up { id: 1 });
        ed.zoom_in();

        let mut s = RecordingSurface::default();
        let proj = draw_minimap(&mut s, &ed, 150.0, 150.0);
        assert_eq!(s.circles().len(), 3);

        let dash_at = s.ops.iter().position(|op| *op == Op::LineDash(VIEWPORT_DASH.to_vec())).unwrap();
        let Op::StrokeRect(x, y, w, h) = s.ops[dash_at + 1] else {
            panic!("expected the viewport frame after the dash pattern");
        };
        let back = proj.unproject(&crate::state::minimap::MapRect { x, y, w, h });
        let visible = ed.visible_rect();
        assert!((back.x - visible.x).abs() < 1e-9);
        assert!((back.y - visible.y).abs() < 1e-9);
        assert!((back.w - visible.w).abs() < 1e-9);
        assert!((back.h - visible.h).abs() < 1e-9);
    }

    #[test]
    fn tiny_cell_size_keeps_passes_bounded() {
        let cfg = EditorConfig { cell_size: 1e-9, ..EditorConfig::default() };
        let mut ed = Editor::new(cfg);
        ed.resize(300.0, 300.0, 1.0);
        let mut s = RecordingSurface::default();
        draw_main(&mut s, &ed);
        assert!(s.lines() < 1000);

        ed.toggle_at_screen(100.0, 100.0);
        assert_eq!(ed.bead_count(), 1);
        let mut s = RecordingSurface::default();
        draw_minimap(&mut s, &ed, 150.0, 150.0);
        assert!(s.lines() < 1000);
    }

    #[test]
    fn export_pass_offsets_beads_to_padded_origin() {
        let mut grid = Grid::new();
        grid.set(Cell::new(-3, 2), PALETTE[0].color);
        grid.set(Cell::new(5, -1), PALETTE[1].color);
        grid.set(Cell::new(0, 0), PALETTE[2].color);
        let layout = ExportLayout::new(&grid, 5, 20.0);
        let mut s = RecordingSurface::default();
        draw_export(&mut s, &grid, &layout, 0.4);

        assert!(s.ops.contains(&Op::FillRect(0.0, 0.0, 380.0, 280.0)));
        assert!(s.ops.contains(&Op::Translate(160.0, 120.0)));
        assert_eq!(s.lines(), (19 + 1) + (14 + 1));
        // bead (0,0) lands at ((0 + 8) * 20 + 10, (0 + 6) * 20 + 10) after the translate
        let mut circles = s.circles();
        circles.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        assert_eq!(circles[1], (10.0, 10.0, 8.0));
    }
}
