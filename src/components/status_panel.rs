use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatusPanelProps {
    pub beads: usize,
    pub zoom_percent: u32,
}

#[function_component]
pub fn StatusPanel(props: &StatusPanelProps) -> Html {
    let value_style = "font-variant-numeric:tabular-nums; font-weight:600;";
    html! {
        <div style="position:absolute; left:12px; bottom:12px; background:rgba(246,248,250,0.9); border:1px solid #d0d7de; border-radius:8px; padding:6px 10px; display:flex; gap:12px; font-size:13px; pointer-events:none;">
            <span>{"Beads "}<span style={value_style}>{ props.beads }</span></span>
            <span>{"Zoom "}<span style={value_style}>{ format!("{}%", props.zoom_percent) }</span></span>
        </div>
    }
}
