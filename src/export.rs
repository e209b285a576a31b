//! PNG export of the occupied area.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlAnchorElement, HtmlCanvasElement};

use crate::model::{Cell, Grid};
use crate::render::{canvas::context_2d, draw_export};
use crate::state::Editor;
use crate::util::{clog, cwarn};

pub const EXPORT_FILE_NAME: &str = "kids_perler_artwork.png";

/// Raster layout for an export: the bounding box grown by `padding` cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportLayout {
    /// Top-left cell of the padded box; drawn at pixel (0, 0).
    pub origin: Cell,
    pub cols: u32,
    pub rows: u32,
    pub cell_px: f64,
}

impl ExportLayout {
    pub fn new(grid: &Grid, padding: i32, cell_px: f64) -> Self {
        let padded = grid.bounding_box().expand(padding.max(0));
        Self {
            origin: Cell::new(padded.min_x, padded.min_y),
            cols: padded.width() as u32,
            rows: padded.height() as u32,
            cell_px,
        }
    }

    pub fn width_px(&self) -> f64 {
        self.cols as f64 * self.cell_px
    }

    pub fn height_px(&self) -> f64 {
        self.rows as f64 * self.cell_px
    }
}

/// Renders the grid to an offscreen canvas and triggers a browser download.
pub fn download_png(editor: &Editor) -> Result<(), JsValue> {
    let cfg = editor.config();
    let layout = ExportLayout::new(editor.grid(), cfg.export_padding_cells, cfg.export_cell_px);
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(layout.width_px().ceil() as u32);
    canvas.set_height(layout.height_px().ceil() as u32);
    let mut ctx = context_2d(&canvas).ok_or_else(|| JsValue::from_str("2d context unavailable"))?;
    draw_export(&mut ctx, editor.grid(), &layout, cfg.bead_radius_factor);

    let url = canvas.to_data_url_with_type("image/png")?;
    let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    link.set_download(EXPORT_FILE_NAME);
    link.set_href(&url);
    link.click();
    clog(&format!(
        "exported {} beads as {}x{} px",
        editor.bead_count(),
        canvas.width(),
        canvas.height()
    ));
    Ok(())
}

/// Export entry point for UI callbacks; failures are logged and otherwise ignored.
pub fn export_or_warn(editor: &Editor) {
    if let Err(e) = download_png(editor) {
        cwarn(&format!("export failed: {:?}", e));
    }
}
