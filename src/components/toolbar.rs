use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ToolbarProps {
    pub on_zoom_in: Callback<()>,
    pub on_zoom_out: Callback<()>,
    pub on_clear: Callback<()>,
    pub on_download: Callback<()>,
    #[prop_or_default]
    pub children: Html,
}

#[function_component(Toolbar)]
pub fn toolbar(props: &ToolbarProps) -> Html {
    let zi = {
        let cb = props.on_zoom_in.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let zo = {
        let cb = props.on_zoom_out.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let clear = {
        let cb = props.on_clear.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let download = {
        let cb = props.on_download.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {<div id="toolbar" style="display:flex; flex-wrap:wrap; gap:10px; align-items:center; padding:8px 12px; background:#f6f8fa; border-bottom:1px solid #d0d7de;">
        { props.children.clone() }
        <span style="width:8px;"></span>
        <button onclick={zo} title="Zoom out"> {"-"} </button>
        <button onclick={zi} title="Zoom in"> {"+"} </button>
        <span style="width:8px;"></span>
        <button onclick={clear}> {"Clear"} </button>
        <button onclick={download}> {"Download PNG"} </button>
    </div>}
}
