//! Pointer gesture recognition.
//!
//! Raw pointer down/move/up/cancel events go in, high-level [`Intent`]s come out:
//! a tap toggles a bead, a drag pans, a two-finger pinch zooms around its midpoint.
//! The machine never touches the camera or the grid itself; the editor applies the
//! intents. Tap recognition is tied to the `TapPending` phase, which can only be
//! entered from `Idle`, so once a gesture has dragged or pinched it can no longer
//! produce a tap.

use std::collections::BTreeMap;

pub type PointerId = i32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down { id: PointerId, x: f64, y: f64 },
    Move { id: PointerId, x: f64, y: f64 },
    Up { id: PointerId },
    Cancel { id: PointerId },
}

/// Identifies one scheduled tap timer. A fired timer whose token no longer
/// matches the pending tap is stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Toggle the bead under this screen point.
    ToggleBead { x: f64, y: f64 },
    PanBy { dx: f64, dy: f64 },
    ZoomAt { factor: f64, focal_x: f64, focal_y: f64 },
    ScheduleTapTimer { token: TimerToken, delay_ms: u32 },
    CancelTapTimer { token: TimerToken },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    /// One pointer down, not yet moved past the threshold, timer running.
    TapPending {
        pointer: PointerId,
        origin: (f64, f64),
        token: TimerToken,
    },
    Dragging {
        pointer: PointerId,
    },
    Pinching {
        a: PointerId,
        b: PointerId,
        distance: f64,
        midpoint: (f64, f64),
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSettings {
    pub tap_delay_ms: u32,
    pub drag_threshold_px: f64,
    pub pinch_pans: bool,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            tap_delay_ms: 250,
            drag_threshold_px: 8.0,
            pinch_pans: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GestureMachine {
    settings: GestureSettings,
    /// Active pointers and their last screen position, ordered by id.
    pointers: BTreeMap<PointerId, (f64, f64)>,
    phase: Phase,
    next_token: u64,
}

fn distance(p: (f64, f64), q: (f64, f64)) -> f64 {
    (q.0 - p.0).hypot(q.1 - p.1)
}

fn midpoint(p: (f64, f64), q: (f64, f64)) -> (f64, f64) {
    ((p.0 + q.0) * 0.5, (p.1 + q.1) * 0.5)
}

impl GestureMachine {
    pub fn new(settings: GestureSettings) -> Self {
        Self {
            settings,
            pointers: BTreeMap::new(),
            phase: Phase::Idle,
            next_token: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    pub fn handle(&mut self, input: PointerInput) -> Vec<Intent> {
        match input {
            PointerInput::Down { id, x, y } => self.pointer_down(id, (x, y)),
            PointerInput::Move { id, x, y } => self.pointer_move(id, (x, y)),
            PointerInput::Up { id } => self.pointer_release(id, false),
            PointerInput::Cancel { id } => self.pointer_release(id, true),
        }
    }

    /// Long press: a pending tap whose timer expires becomes a drag.
    pub fn tap_timer_fired(&mut self, token: TimerToken) -> Vec<Intent> {
        if let Phase::TapPending { pointer, token: pending, .. } = self.phase {
            if pending == token {
                self.phase = Phase::Dragging { pointer };
            }
        }
        Vec::new()
    }

    /// Drops the current gesture without emitting a tap.
    pub fn reset(&mut self) -> Vec<Intent> {
        let mut out = Vec::new();
        if let Phase::TapPending { token, .. } = self.phase {
            out.push(Intent::CancelTapTimer { token });
        }
        self.pointers.clear();
        self.phase = Phase::Idle;
        out
    }

    fn pointer_down(&mut self, id: PointerId, pos: (f64, f64)) -> Vec<Intent> {
        if self.pointers.contains_key(&id) {
            return Vec::new();
        }
        self.pointers.insert(id, pos);
        let mut out = Vec::new();
        match self.phase {
            Phase::Idle => {
                let token = TimerToken(self.next_token);
                self.next_token += 1;
                self.phase = Phase::TapPending { pointer: id, origin: pos, token };
                out.push(Intent::ScheduleTapTimer {
                    token,
                    delay_ms: self.settings.tap_delay_ms,
                });
            }
            Phase::TapPending { token, .. } => {
                out.push(Intent::CancelTapTimer { token });
                self.start_pinch();
            }
            Phase::Dragging { .. } => self.start_pinch(),
            // Extra fingers beyond the pinch pair are tracked but ignored.
            Phase::Pinching { .. } => {}
        }
        out
    }

    fn pointer_move(&mut self, id: PointerId, pos: (f64, f64)) -> Vec<Intent> {
        let Some(prev) = self.pointers.insert(id, pos) else {
            // hover or an untracked pointer; keep the map unchanged
            self.pointers.remove(&id);
            return Vec::new();
        };
        let mut out = Vec::new();
        match self.phase {
            Phase::TapPending { pointer, origin, token } if pointer == id => {
                if distance(origin, pos) > self.settings.drag_threshold_px {
                    out.push(Intent::CancelTapTimer { token });
                    out.push(Intent::PanBy {
                        dx: pos.0 - prev.0,
                        dy: pos.1 - prev.1,
                    });
                    self.phase = Phase::Dragging { pointer };
                }
            }
            Phase::Dragging { pointer } if pointer == id => {
                out.push(Intent::PanBy {
                    dx: pos.0 - prev.0,
                    dy: pos.1 - prev.1,
                });
            }
            Phase::Pinching { a, b, distance: last_dist, midpoint: last_mid } if id == a || id == b => {
                let (Some(&pa), Some(&pb)) = (self.pointers.get(&a), self.pointers.get(&b)) else {
                    return out;
                };
                let dist = distance(pa, pb);
                let mid = midpoint(pa, pb);
                if self.settings.pinch_pans {
                    out.push(Intent::PanBy {
                        dx: mid.0 - last_mid.0,
                        dy: mid.1 - last_mid.1,
                    });
                }
                if last_dist > 0.0 && dist > 0.0 {
                    out.push(Intent::ZoomAt {
                        factor: dist / last_dist,
                        focal_x: mid.0,
                        focal_y: mid.1,
                    });
                }
                self.phase = Phase::Pinching { a, b, distance: dist, midpoint: mid };
            }
            _ => {}
        }
        out
    }

    fn pointer_release(&mut self, id: PointerId, cancelled: bool) -> Vec<Intent> {
        if self.pointers.remove(&id).is_none() {
            return Vec::new();
        }
        let mut out = Vec::new();
        match self.phase {
            Phase::Idle => {}
            Phase::TapPending { origin, token, .. } => {
                out.push(Intent::CancelTapTimer { token });
                if !cancelled && self.pointers.is_empty() {
                    out.push(Intent::ToggleBead { x: origin.0, y: origin.1 });
                }
                self.phase = Phase::Idle;
            }
            Phase::Dragging { pointer } => {
                self.phase = match self.pointers.keys().next() {
                    None => Phase::Idle,
                    Some(&other) if pointer == id => Phase::Dragging { pointer: other },
                    Some(_) => Phase::Dragging { pointer },
                };
            }
            Phase::Pinching { a, b, .. } => match self.pointers.len() {
                0 => self.phase = Phase::Idle,
                1 => {
                    if let Some(&rest) = self.pointers.keys().next() {
                        self.phase = Phase::Dragging { pointer: rest };
                    }
                }
                _ => {
                    if id == a || id == b {
                        self.start_pinch();
                    }
                }
            },
        }
        if self.pointers.is_empty() {
            self.phase = Phase::Idle;
        }
        out
    }

    /// Seeds a pinch from the two lowest pointer ids.
    fn start_pinch(&mut self) {
        let mut it = self.pointers.iter();
        if let (Some((&a, &pa)), Some((&b, &pb))) = (it.next(), it.next()) {
            self.phase = Phase::Pinching {
                a,
                b,
                distance: distance(pa, pb),
                midpoint: midpoint(pa, pb),
            };
        }
    }
}
