pub mod camera;
pub mod editor;
pub mod gesture;
pub mod minimap;

pub use editor::{Editor, Response, TimerCommand};
pub use gesture::{PointerInput, TimerToken};
pub use minimap::MinimapProjection;
