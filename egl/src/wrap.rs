use std::ffi::{CStr, c_int, c_void};
use std::ptr::{null, null_mut};
use std::rc::Rc;
use std::{error, fmt};

use crate::libegl::*;
use crate::libwayland_egl;

// NOTE: every wrapper here owns exactly one native resource and releases it on drop. a failure
// half-way through setup thus releases whatever was acquired before it.

// ----
// error

#[derive(Debug)]
pub enum Error {
    CouldNotLoad(dynlib::Error),
    Call { name: &'static str, code: EGLint },
    NoMatchingConfig,
    CouldNotCreateWlEglWindow,
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::CouldNotLoad(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CouldNotLoad(err) => f.write_fmt(format_args!("could not load library: {err}")),
            Self::Call { name, code } => {
                f.write_fmt(format_args!("{name} failed: egl error {code:#x}"))
            }
            Self::NoMatchingConfig => f.write_str("no config matches the requested attributes"),
            Self::CouldNotCreateWlEglWindow => {
                f.write_str("could not create wl egl window, make sure params are correct")
            }
        }
    }
}

impl Error {
    fn last(lib: &Lib, name: &'static str) -> Self {
        let code = unsafe { (lib.eglGetError)() };
        Self::Call { name, code }
    }
}

// ----
// display

pub struct Display {
    pub lib: Lib,
    pub raw: EGLDisplay,
    pub version: (EGLint, EGLint),
}

impl Display {
    /// `native_display` may be [`EGL_DEFAULT_DISPLAY`].
    pub fn open(native_display: EGLNativeDisplayType) -> Result<Rc<Self>, Error> {
        let lib = Lib::load().map_err(Error::CouldNotLoad)?;

        let raw = unsafe { (lib.eglGetDisplay)(native_display) };
        if raw == EGL_NO_DISPLAY {
            return Err(Error::last(&lib, "eglGetDisplay"));
        }

        let (mut major, mut minor) = (0, 0);
        if unsafe { (lib.eglInitialize)(raw, &mut major, &mut minor) } == EGL_FALSE {
            return Err(Error::last(&lib, "eglInitialize"));
        }

        Ok(Rc::new(Self {
            lib,
            raw,
            version: (major, minor),
        }))
    }

    /// `attrs` is a NONE-terminated list of (attribute, value) pairs; the first matching config
    /// wins.
    pub fn choose_config(&self, attrs: &[EGLint]) -> Result<EGLConfig, Error> {
        assert_eq!(attrs.last().copied(), Some(EGL_NONE as EGLint));

        let mut num_configs = 0;
        if unsafe { (self.lib.eglGetConfigs)(self.raw, null_mut(), 0, &mut num_configs) }
            == EGL_FALSE
        {
            return Err(Error::last(&self.lib, "eglGetConfigs"));
        }
        if num_configs == 0 {
            return Err(Error::NoMatchingConfig);
        }

        let mut config: EGLConfig = null_mut();
        if unsafe {
            (self.lib.eglChooseConfig)(self.raw, attrs.as_ptr(), &mut config, 1, &mut num_configs)
        } == EGL_FALSE
        {
            return Err(Error::last(&self.lib, "eglChooseConfig"));
        }
        if num_configs == 0 || config.is_null() {
            return Err(Error::NoMatchingConfig);
        }
        Ok(config)
    }

    pub fn bind_api(&self, api: EGLenum) -> Result<(), Error> {
        if unsafe { (self.lib.eglBindAPI)(api) } == EGL_FALSE {
            Err(Error::last(&self.lib, "eglBindAPI"))
        } else {
            Ok(())
        }
    }

    pub fn make_current(&self, surface: &WindowSurface, context: &Context) -> Result<(), Error> {
        if unsafe { (self.lib.eglMakeCurrent)(self.raw, surface.raw, surface.raw, context.raw) }
            == EGL_FALSE
        {
            Err(Error::last(&self.lib, "eglMakeCurrent"))
        } else {
            Ok(())
        }
    }

    pub fn swap_buffers(&self, surface: &WindowSurface) -> Result<(), Error> {
        if unsafe { (self.lib.eglSwapBuffers)(self.raw, surface.raw) } == EGL_FALSE {
            Err(Error::last(&self.lib, "eglSwapBuffers"))
        } else {
            Ok(())
        }
    }

    pub fn query_string(&self, name: EGLenum) -> Option<String> {
        let ptr = unsafe { (self.lib.eglQueryString)(self.raw, name as EGLint) };
        if ptr.is_null() {
            return None;
        }
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }

    pub fn get_proc_address(&self, procname: &CStr) -> *mut c_void {
        unsafe { (self.lib.eglGetProcAddress)(procname.as_ptr()) }
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        unsafe {
            (self.lib.eglMakeCurrent)(self.raw, EGL_NO_SURFACE, EGL_NO_SURFACE, EGL_NO_CONTEXT);
            (self.lib.eglTerminate)(self.raw);
        }
    }
}

// ----
// context

pub struct Context {
    display: Rc<Display>,
    pub raw: EGLContext,
    pub config: EGLConfig,
}

impl Context {
    /// the client api must be bound with [`Display::bind_api`] beforehand.
    pub fn new(
        display: &Rc<Display>,
        config: EGLConfig,
        attrs: &[EGLint],
    ) -> Result<Self, Error> {
        assert_eq!(attrs.last().copied(), Some(EGL_NONE as EGLint));

        let raw = unsafe {
            (display.lib.eglCreateContext)(display.raw, config, EGL_NO_CONTEXT, attrs.as_ptr())
        };
        if raw == EGL_NO_CONTEXT {
            return Err(Error::last(&display.lib, "eglCreateContext"));
        }

        Ok(Self {
            display: Rc::clone(display),
            raw,
            config,
        })
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        unsafe { (self.display.lib.eglDestroyContext)(self.display.raw, self.raw) };
    }
}

// ----
// surface

// NOTE: wsi stands for window system integration; it is somewhat modelled after
// https://registry.khronos.org/vulkan/specs/latest/html/vkspec.html#wsi

/// what eglCreateWindowSurface will be fed with.
#[derive(Debug, Clone, Copy)]
pub enum NativeWindow {
    Wayland {
        wl_surface: *mut c_void,
        width: u32,
        height: u32,
    },
    Xlib(XlibWindow),
}

struct WaylandWsi {
    lib: libwayland_egl::Lib,
    wl_egl_window: *mut libwayland_egl::wl_egl_window,
}

impl WaylandWsi {
    fn new(wl_surface: *mut c_void, width: u32, height: u32) -> Result<Self, Error> {
        let lib = libwayland_egl::Lib::load().map_err(Error::CouldNotLoad)?;
        let wl_egl_window =
            unsafe { (lib.wl_egl_window_create)(wl_surface, width as c_int, height as c_int) };
        if wl_egl_window.is_null() {
            return Err(Error::CouldNotCreateWlEglWindow);
        }
        Ok(Self { lib, wl_egl_window })
    }
}

impl Drop for WaylandWsi {
    fn drop(&mut self) {
        unsafe { (self.lib.wl_egl_window_destroy)(self.wl_egl_window) };
    }
}

enum Wsi {
    Wayland(WaylandWsi),
    Xlib(XlibWindow),
}

impl Wsi {
    fn as_native(&self) -> EGLNativeWindowType {
        match self {
            Self::Wayland(payload) => payload.wl_egl_window.cast(),
            Self::Xlib(xid) => *xid as EGLNativeWindowType,
        }
    }
}

pub struct WindowSurface {
    display: Rc<Display>,
    pub raw: EGLSurface,
    // NOTE: must outlive the egl surface; fields drop after Drop::drop.
    wsi: Wsi,
}

impl WindowSurface {
    pub fn new(
        display: &Rc<Display>,
        config: EGLConfig,
        native_window: NativeWindow,
    ) -> Result<Self, Error> {
        let wsi = match native_window {
            NativeWindow::Wayland {
                wl_surface,
                width,
                height,
            } => Wsi::Wayland(WaylandWsi::new(wl_surface, width, height)?),
            NativeWindow::Xlib(xid) => Wsi::Xlib(xid),
        };

        let raw = unsafe {
            (display.lib.eglCreateWindowSurface)(display.raw, config, wsi.as_native(), null())
        };
        if raw == EGL_NO_SURFACE {
            return Err(Error::last(&display.lib, "eglCreateWindowSurface"));
        }

        Ok(Self {
            display: Rc::clone(display),
            raw,
            wsi,
        })
    }

    /// only wayland needs to be told about the new size; other platforms track the window.
    pub fn resize(&self, width: u32, height: u32) {
        if let Wsi::Wayland(ref payload) = self.wsi {
            unsafe {
                (payload.lib.wl_egl_window_resize)(
                    payload.wl_egl_window,
                    width as c_int,
                    height as c_int,
                    0,
                    0,
                )
            };
        }
    }
}

impl Drop for WindowSurface {
    fn drop(&mut self) {
        unsafe { (self.display.lib.eglDestroySurface)(self.display.raw, self.raw) };
    }
}

#[test]
fn test_error_display() {
    let err = Error::Call {
        name: "eglInitialize",
        code: EGL_NOT_INITIALIZED as EGLint,
    };
    assert_eq!(err.to_string(), "eglInitialize failed: egl error 0x3001");
    assert_eq!(
        Error::NoMatchingConfig.to_string(),
        "no config matches the requested attributes"
    );
}
