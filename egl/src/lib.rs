pub mod libegl;
pub mod libwayland_egl;
pub mod wrap;

pub use libegl::*;
pub use wrap::{Context, Display, Error, NativeWindow, WindowSurface};
