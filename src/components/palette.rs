use yew::prelude::*;

use crate::model::{Rgb, PALETTE};

#[derive(Properties, PartialEq, Clone)]
pub struct PaletteProps {
    pub selected: Rgb,
    pub on_select: Callback<Rgb>,
}

#[function_component]
pub fn Palette(props: &PaletteProps) -> Html {
    html! {<div id="color-palette" style="display:flex; flex-wrap:wrap; gap:6px; align-items:center;">
        { for PALETTE.iter().map(|swatch| {
            let color = swatch.color;
            let is_selected = color == props.selected;
            let onclick = {
                let cb = props.on_select.clone();
                Callback::from(move |_| cb.emit(color))
            };
            let border = if is_selected { "3px solid #1f6feb" } else { "1px solid #8b949e" };
            html! {
                <div class={classes!("color-swatch", is_selected.then_some("selected"))}
                    title={swatch.name}
                    onclick={onclick}
                    style={format!("width:28px; height:28px; border-radius:50%; cursor:pointer; box-sizing:border-box; background:{}; border:{};", color.to_hex(), border)}>
                </div>
            }
        }) }
    </div>}
}
