//! Editor controller.
//!
//! [`Editor`] owns every piece of mutable editor state (bead grid, view
//! transform, gesture machine, selected color) and is the only place that
//! mutates it. The view layer forwards DOM events here and acts on the returned
//! [`Response`]: redraw when asked, and schedule or clear the browser timeout
//! backing the tap timer.

use super::camera::{Camera, WorldRect};
use super::gesture::{GestureMachine, GestureSettings, Intent, PointerInput, TimerToken};
use crate::config::EditorConfig;
use crate::model::{Cell, DEFAULT_COLOR, Grid, Rgb};
use crate::util::clog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Schedule { token: TimerToken, delay_ms: u32 },
    Cancel { token: TimerToken },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub redraw: bool,
    pub timers: Vec<TimerCommand>,
}

impl Response {
    fn redraw() -> Self {
        Self {
            redraw: true,
            timers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    grid: Grid,
    camera: Camera,
    gesture: GestureMachine,
    selected: Rgb,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let config = config.validated();
        let gesture = GestureMachine::new(GestureSettings {
            tap_delay_ms: config.tap_delay_ms,
            drag_threshold_px: config.drag_threshold_px,
            pinch_pans: config.pinch_pans,
        });
        Self {
            config,
            grid: Grid::new(),
            camera: Camera::default(),
            gesture,
            selected: DEFAULT_COLOR,
            viewport_w: 0.0,
            viewport_h: 0.0,
            dpr: 1.0,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn selected(&self) -> Rgb {
        self.selected
    }

    /// Viewport size in CSS pixels.
    pub fn viewport(&self) -> (f64, f64) {
        (self.viewport_w, self.viewport_h)
    }

    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    pub fn bead_count(&self) -> usize {
        self.grid.len()
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.camera.scale * 100.0).round() as u32
    }

    pub fn visible_rect(&self) -> WorldRect {
        self.camera.visible_world_rect(self.viewport_w, self.viewport_h)
    }

    pub fn select_color(&mut self, color: Rgb) {
        self.selected = color;
    }

    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) -> Response {
        self.viewport_w = width.max(0.0);
        self.viewport_h = height.max(0.0);
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        Response::redraw()
    }

    pub fn pointer(&mut self, input: PointerInput) -> Response {
        let intents = self.gesture.handle(input);
        self.apply(intents)
    }

    pub fn tap_timer_fired(&mut self, token: TimerToken) -> Response {
        let intents = self.gesture.tap_timer_fired(token);
        self.apply(intents)
    }

    /// Toggles the selected color at a screen point. Cells outside fixed bounds are ignored.
    pub fn toggle_at_screen(&mut self, x: f64, y: f64) -> bool {
        let cell = self.camera.screen_to_cell(x, y, self.config.cell_size);
        self.toggle_cell(cell)
    }

    pub fn toggle_cell(&mut self, cell: Cell) -> bool {
        if let Some(bounds) = self.config.bounds {
            if !bounds.contains(cell) {
                return false;
            }
        }
        self.grid.toggle(cell, self.selected);
        true
    }

    pub fn zoom_in(&mut self) -> Response {
        self.zoom_at_center(self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> Response {
        self.zoom_at_center(1.0 / self.config.zoom_step)
    }

    /// Mouse-wheel zoom around the cursor.
    pub fn wheel(&mut self, delta_y: f64, x: f64, y: f64) -> Response {
        let factor = (-delta_y * 0.001).exp();
        self.zoom(x, y, factor);
        Response::redraw()
    }

    /// Empties the grid, resets the view to identity and drops any gesture in flight.
    pub fn clear_all(&mut self) -> Response {
        clog(&format!("clearing {} beads", self.grid.len()));
        self.grid.clear_all();
        self.camera.reset();
        let intents = self.gesture.reset();
        let mut resp = self.apply(intents);
        resp.redraw = true;
        resp
    }

    fn zoom_at_center(&mut self, factor: f64) -> Response {
        self.zoom(self.viewport_w * 0.5, self.viewport_h * 0.5, factor);
        Response::redraw()
    }

    fn zoom(&mut self, focal_x: f64, focal_y: f64, factor: f64) {
        self.camera
            .zoom_at(focal_x, focal_y, factor, self.config.min_scale, self.config.max_scale);
    }

    fn apply(&mut self, intents: Vec<Intent>) -> Response {
        let mut resp = Response::default();
        for intent in intents {
            match intent {
                Intent::ToggleBead { x, y } => {
                    resp.redraw |= self.toggle_at_screen(x, y);
                }
                Intent::PanBy { dx, dy } => {
                    self.camera.pan_by(dx, dy);
                    resp.redraw = true;
                }
                Intent::ZoomAt { factor, focal_x, focal_y } => {
                    self.zoom(focal_x, focal_y, factor);
                    resp.redraw = true;
                }
                Intent::ScheduleTapTimer { token, delay_ms } => {
                    resp.timers.push(TimerCommand::Schedule { token, delay_ms });
                }
                Intent::CancelTapTimer { token } => {
                    resp.timers.push(TimerCommand::Cancel { token });
                }
            }
        }
        resp
    }
}
