use super::editor_view::EditorView;
use crate::config::EditorConfig;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    // Read once per mount; the editor keeps its own copy.
    let config = use_memo((), |_| EditorConfig::load());
    html! { <EditorView config={(*config).clone()} /> }
}
