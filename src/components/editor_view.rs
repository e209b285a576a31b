use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement, PointerEvent, WheelEvent};
use yew::prelude::*;

use crate::config::EditorConfig;
use crate::export::export_or_warn;
use crate::model::Rgb;
use crate::render::{canvas::context_2d, draw_main, draw_minimap};
use crate::state::{Editor, PointerInput, Response, TimerCommand, TimerToken};
use crate::util::{clog, cwarn};

use super::{palette::Palette, status_panel::StatusPanel, toolbar::Toolbar};

#[derive(Properties, PartialEq, Clone)]
pub struct EditorViewProps {
    pub config: EditorConfig,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct StatusInfo {
    beads: usize,
    zoom_percent: u32,
}

/// A scheduled tap timeout. Owns its callback so that clearing the timeout
/// also frees the closure and the handles it captured.
struct PendingTap<C = Closure<dyn FnMut()>> {
    token: TimerToken,
    id: i32,
    _callback: C,
}

/// Takes the pending timer out of `slot`; with `Some(token)` only if it is that timer.
fn take_pending<C>(slot: &mut Option<PendingTap<C>>, token: Option<TimerToken>) -> Option<PendingTap<C>> {
    match (slot.as_ref(), token) {
        (Some(p), Some(t)) if p.token != t => None,
        _ => slot.take(),
    }
}

/// Shared handles the DOM closures need: the editor, the draw closure and the
/// pending tap timeout.
#[derive(Clone)]
struct ViewHandles {
    editor: Rc<RefCell<Editor>>,
    draw: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
    tap_timer: Rc<RefCell<Option<PendingTap>>>,
}

impl ViewHandles {
    fn redraw(&self) {
        if let Some(f) = &*self.draw.borrow() {
            f();
        }
    }

    fn apply(&self, resp: Response) {
        for cmd in resp.timers {
            match cmd {
                TimerCommand::Schedule { token, delay_ms } => self.schedule_tap(token, delay_ms),
                TimerCommand::Cancel { token } => self.cancel_tap(Some(token)),
            }
        }
        if resp.redraw {
            self.redraw();
        }
    }

    fn schedule_tap(&self, token: TimerToken, delay_ms: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        self.cancel_tap(None);
        let handles = self.clone();
        let callback: Closure<dyn FnMut()> = Closure::once(move || {
            // Dropped after the call returns; the JS wrapper defers the free.
            let fired = handles.tap_timer.borrow_mut().take();
            let resp = handles.editor.borrow_mut().tap_timer_fired(token);
            handles.apply(resp);
            drop(fired);
        });
        let scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms as i32,
        );
        match scheduled {
            Ok(id) => {
                *self.tap_timer.borrow_mut() = Some(PendingTap { token, id, _callback: callback });
            }
            Err(e) => cwarn(&format!("tap timer not scheduled: {:?}", e)),
        }
    }

    /// Clears the pending timeout; with `Some(token)` only if it is that timer.
    fn cancel_tap(&self, token: Option<TimerToken>) {
        let pending = take_pending(&mut self.tap_timer.borrow_mut(), token);
        if let Some(pending) = pending {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(pending.id);
            }
        }
    }

    fn pointer(&self, input: PointerInput) {
        let resp = self.editor.borrow_mut().pointer(input);
        self.apply(resp);
    }
}

fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

#[function_component(EditorView)]
pub fn editor_view(props: &EditorViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let minimap_ref = use_node_ref();
    let editor = {
        let config = props.config.clone();
        use_mut_ref(move || Editor::new(config))
    };
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);
    let tap_timer = use_mut_ref(|| None::<PendingTap>);
    let selected = {
        let editor = editor.clone();
        use_state(move || editor.borrow().selected())
    };
    let status = use_state(StatusInfo::default);
    let last_status = use_mut_ref(StatusInfo::default);

    let handles = ViewHandles {
        editor: editor.clone(),
        draw: draw_ref.clone(),
        tap_timer: tap_timer.clone(),
    };

    // Mount: sizing, draw closure, listeners
    {
        let canvas_ref = canvas_ref.clone();
        let minimap_ref = minimap_ref.clone();
        let handles = handles.clone();
        let status = status.clone();
        let last_status = last_status.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let document = window.document().expect("document");
            let canvas: HtmlCanvasElement = canvas_ref.cast::<HtmlCanvasElement>().expect("canvas");
            let minimap: HtmlCanvasElement = minimap_ref.cast::<HtmlCanvasElement>().expect("minimap");
            let map_px = handles.editor.borrow().config().minimap_size_px;

            let compute_and_apply_canvas_size = {
                let canvas = canvas.clone();
                let minimap = minimap.clone();
                let document = document.clone();
                let window = window.clone();
                let editor = handles.editor.clone();
                move || {
                    let toolbar_height: f64 = document
                        .get_element_by_id("toolbar")
                        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                        .map(|el| el.client_height() as f64)
                        .unwrap_or(0.0);
                    let width = window
                        .inner_width()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(800.0);
                    let height = window
                        .inner_height()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(600.0)
                        - toolbar_height;
                    let dpr = window.device_pixel_ratio();
                    let width = width.max(0.0);
                    let height = height.max(0.0);
                    canvas.set_width((width * dpr) as u32);
                    canvas.set_height((height * dpr) as u32);
                    let style = canvas.style();
                    style.set_property("width", &format!("{}px", width)).ok();
                    style.set_property("height", &format!("{}px", height)).ok();
                    minimap.set_width((map_px * dpr) as u32);
                    minimap.set_height((map_px * dpr) as u32);
                    let _ = editor.borrow_mut().resize(width, height, dpr);
                }
            };
            compute_and_apply_canvas_size();

            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let minimap = minimap.clone();
                let editor = handles.editor.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let ed = editor.borrow();
                    if let Some(mut ctx) = context_2d(&canvas) {
                        draw_main(&mut ctx, &ed);
                    }
                    if let Some(mut ctx) = context_2d(&minimap) {
                        draw_minimap(&mut ctx, &ed, map_px, map_px);
                    }
                    let info = StatusInfo {
                        beads: ed.bead_count(),
                        zoom_percent: ed.zoom_percent(),
                    };
                    drop(ed);
                    if *last_status.borrow() != info {
                        *last_status.borrow_mut() = info;
                        status.set(info);
                    }
                })
            };
            *handles.draw.borrow_mut() = Some(draw_closure.clone());
            (draw_closure)();

            let pointerdown_cb = {
                let canvas = canvas.clone();
                let handles = handles.clone();
                Closure::wrap(Box::new(move |e: PointerEvent| {
                    if e.pointer_type() == "mouse" && e.button() != 0 {
                        return;
                    }
                    e.prevent_default();
                    canvas.set_pointer_capture(e.pointer_id()).ok();
                    let (x, y) = canvas_point(&canvas, e.client_x(), e.client_y());
                    handles.pointer(PointerInput::Down { id: e.pointer_id(), x, y });
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("pointerdown", pointerdown_cb.as_ref().unchecked_ref())
                .ok();
            let pointermove_cb = {
                let canvas = canvas.clone();
                let handles = handles.clone();
                Closure::wrap(Box::new(move |e: PointerEvent| {
                    let (x, y) = canvas_point(&canvas, e.client_x(), e.client_y());
                    handles.pointer(PointerInput::Move { id: e.pointer_id(), x, y });
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("pointermove", pointermove_cb.as_ref().unchecked_ref())
                .ok();
            let pointerup_cb = {
                let handles = handles.clone();
                Closure::wrap(Box::new(move |e: PointerEvent| {
                    handles.pointer(PointerInput::Up { id: e.pointer_id() });
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("pointerup", pointerup_cb.as_ref().unchecked_ref())
                .ok();
            let pointercancel_cb = {
                let handles = handles.clone();
                Closure::wrap(Box::new(move |e: PointerEvent| {
                    handles.pointer(PointerInput::Cancel { id: e.pointer_id() });
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("pointercancel", pointercancel_cb.as_ref().unchecked_ref())
                .ok();
            // Wheel zoom
            let wheel_cb = {
                let canvas = canvas.clone();
                let handles = handles.clone();
                Closure::wrap(Box::new(move |e: WheelEvent| {
                    e.prevent_default();
                    let (x, y) = canvas_point(&canvas, e.client_x(), e.client_y());
                    let resp = handles.editor.borrow_mut().wheel(e.delta_y(), x, y);
                    handles.apply(resp);
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref())
                .ok();
            let resize_cb = {
                let handles = handles.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    compute_and_apply_canvas_size();
                    handles.redraw();
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                .ok();
            clog("editor mounted");

            // Cleanup
            let window_clone = window.clone();
            move || {
                let _ = canvas.remove_event_listener_with_callback(
                    "pointerdown",
                    pointerdown_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "pointermove",
                    pointermove_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "pointerup",
                    pointerup_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "pointercancel",
                    pointercancel_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "wheel",
                    wheel_cb.as_ref().unchecked_ref(),
                );
                let _ = window_clone.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                handles.cancel_tap(None);
                handles.draw.borrow_mut().take();
                let _keep_alive = (
                    &pointerdown_cb,
                    &pointermove_cb,
                    &pointerup_cb,
                    &pointercancel_cb,
                    &wheel_cb,
                    &resize_cb,
                );
            }
        });
    }

    let on_select: Callback<Rgb> = {
        let handles = handles.clone();
        let selected = selected.clone();
        Callback::from(move |color: Rgb| {
            handles.editor.borrow_mut().select_color(color);
            selected.set(color);
        })
    };
    let zoom_in_cb: Callback<()> = {
        let handles = handles.clone();
        Callback::from(move |()| {
            let resp = handles.editor.borrow_mut().zoom_in();
            handles.apply(resp);
        })
    };
    let zoom_out_cb: Callback<()> = {
        let handles = handles.clone();
        Callback::from(move |()| {
            let resp = handles.editor.borrow_mut().zoom_out();
            handles.apply(resp);
        })
    };
    let clear_cb: Callback<()> = {
        let handles = handles.clone();
        Callback::from(move |()| {
            let resp = handles.editor.borrow_mut().clear_all();
            handles.apply(resp);
        })
    };
    let download_cb: Callback<()> = {
        let handles = handles.clone();
        Callback::from(move |()| export_or_warn(&handles.editor.borrow()))
    };

    let map_px = props.config.minimap_size_px;
    html! {<div style="position:relative; width:100vw; height:100vh; overflow:hidden; background:#ffffff;">
        <Toolbar on_zoom_in={zoom_in_cb} on_zoom_out={zoom_out_cb} on_clear={clear_cb} on_download={download_cb}>
            <Palette selected={*selected} on_select={on_select} />
        </Toolbar>
        <canvas ref={canvas_ref.clone()} id="perler-canvas" style="display:block; touch-action:none; cursor:crosshair;"></canvas>
        <canvas ref={minimap_ref.clone()} id="perler-minimap"
            style={format!("position:absolute; right:12px; bottom:12px; width:{0}px; height:{0}px; border-radius:6px; box-shadow:0 1px 4px rgba(0,0,0,0.3); pointer-events:none;", map_px)}></canvas>
        <StatusPanel beads={status.beads} zoom_percent={status.zoom_percent} />
    </div>}
}
