pub mod adapter;
mod context;
#[cfg(unix)]
mod context_egl;
pub mod libgl;
pub mod shader;

#[cfg(any(test, feature = "fake"))]
pub mod fake;

pub use adapter::Adapter;
pub use context::Context;
#[cfg(unix)]
pub use context_egl::EglContext;
pub use libgl::*;
