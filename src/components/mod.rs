pub mod app;
pub mod editor_view;
pub mod palette;
pub mod status_panel;
pub mod toolbar;
