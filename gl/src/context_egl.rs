use std::rc::Rc;

use anyhow::{Context as _, anyhow};
use raw_window_handle as rwh;

use crate::adapter::Adapter as _;
use crate::context::Context;
use crate::libgl as gl;

pub struct EglContext {
    // NOTE: fields drop in declaration order; the surface must go before the context and both
    // before the display they were created on.
    surface: egl::WindowSurface,
    context: egl::Context,
    display: Rc<egl::Display>,
    api: Rc<gl::Api>,
}

impl EglContext {
    /// negotiates a gles2 capable window config, creates a context and a surface for the window
    /// and makes them current.
    ///
    /// `width` and `height` are the initial client-area size; only wayland needs them.
    pub fn new(
        display_handle: rwh::DisplayHandle,
        window_handle: rwh::WindowHandle,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "window has no client area");

        let native_display = match display_handle.as_raw() {
            rwh::RawDisplayHandle::Wayland(payload) => payload.display.as_ptr(),
            rwh::RawDisplayHandle::Xlib(payload) => payload
                .display
                .map_or(egl::EGL_DEFAULT_DISPLAY, |display| display.as_ptr()),
            _ => egl::EGL_DEFAULT_DISPLAY,
        };
        let native_window = match window_handle.as_raw() {
            rwh::RawWindowHandle::Wayland(payload) => egl::NativeWindow::Wayland {
                wl_surface: payload.surface.as_ptr(),
                width,
                height,
            },
            rwh::RawWindowHandle::Xlib(payload) => egl::NativeWindow::Xlib(payload.window),
            other => return Err(anyhow!("unsupported window system: {other:?}")),
        };

        let display = egl::Display::open(native_display).context("could not open display")?;
        let (major, minor) = display.version;
        log::info!("initialized egl version {major}.{minor}");

        #[rustfmt::skip]
        let config_attrs = [
            egl::EGL_RENDERABLE_TYPE as egl::EGLint, egl::EGL_OPENGL_ES2_BIT as _,
            egl::EGL_SURFACE_TYPE as _, egl::EGL_WINDOW_BIT as _,
            egl::EGL_BUFFER_SIZE as _, 32,
            egl::EGL_RED_SIZE as _, 8,
            egl::EGL_GREEN_SIZE as _, 8,
            egl::EGL_BLUE_SIZE as _, 8,
            egl::EGL_ALPHA_SIZE as _, 8,
            egl::EGL_NONE as _,
        ];
        let config = display
            .choose_config(&config_attrs)
            .context("could not choose config")?;

        display
            .bind_api(egl::EGL_OPENGL_ES_API)
            .context("could not bind api")?;

        #[rustfmt::skip]
        let context_attrs = [
            egl::EGL_CONTEXT_CLIENT_VERSION as egl::EGLint, 2,
            egl::EGL_NONE as _,
        ];
        let context = egl::Context::new(&display, config, &context_attrs)
            .context("could not create context")?;

        let surface = egl::WindowSurface::new(&display, config, native_window)
            .context("could not create surface")?;

        display
            .make_current(&surface, &context)
            .context("could not make current")?;

        let api = unsafe { gl::Api::load_with(|procname| display.get_proc_address(procname)) }
            .context("could not load gles2")?;

        unsafe {
            for (label, name) in [
                ("vendor", gl::VENDOR),
                ("version", gl::VERSION),
                ("renderer", gl::RENDERER),
            ] {
                match api.get_string(name) {
                    Ok(value) => log::info!("opengl: {label}={value}"),
                    Err(err) => log::warn!("opengl: {label} unavailable: {err:#}"),
                }
            }

            api.clear_color(0.0, 0.0, 0.0, 1.0);
        }

        Ok(Self {
            surface,
            context,
            display,
            api: Rc::new(api),
        })
    }

    /// the gles2 function table; valid while this context is current.
    pub fn api(&self) -> Rc<gl::Api> {
        Rc::clone(&self.api)
    }

    /// keeps the native surface in sync with the window's client area.
    pub fn resize(&self, width: u32, height: u32) {
        self.surface.resize(width, height);
    }
}

impl Context for EglContext {
    fn bind(&self) -> anyhow::Result<()> {
        self.display
            .make_current(&self.surface, &self.context)
            .context("could not make current")
    }

    fn unbind(&self) {}

    fn clear(&self) {
        unsafe { self.api.clear(gl::COLOR_BUFFER_BIT) };
    }

    fn swap_buffers(&self) -> anyhow::Result<()> {
        self.display
            .swap_buffers(&self.surface)
            .context("could not swap buffers")
    }
}
