/// a gpu rendering context bound to a window surface.
///
/// after creation the context is current; [`Context::bind`] must be called again before drawing if
/// anything else was made current in between.
pub trait Context {
    fn bind(&self) -> anyhow::Result<()>;
    fn unbind(&self);
    /// clears the color buffer with the configured clear color.
    fn clear(&self);
    /// presents the back buffer.
    fn swap_buffers(&self) -> anyhow::Result<()>;
}
