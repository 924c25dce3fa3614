#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use std::ffi::{c_char, c_uint, c_ulong, c_void};
use std::ptr::null_mut;

use dynlib::DynLib;

pub type khronos_int32_t = i32;

// https://registry.khronos.org/EGL/api/EGL/eglplatform.h

pub type EGLNativeDisplayType = *mut c_void;
pub type EGLNativePixmapType = *mut c_void;
pub type EGLNativeWindowType = *mut c_void;

// NOTE: on x11 the native window is an xid, not a pointer.
pub type XlibWindow = c_ulong;

pub type EGLint = khronos_int32_t;

// https://registry.khronos.org/EGL/api/EGL/egl.h

pub type EGLBoolean = c_uint;
pub type EGLenum = c_uint;
pub type EGLDisplay = *mut c_void;
pub type EGLConfig = *mut c_void;
pub type EGLSurface = *mut c_void;
pub type EGLContext = *mut c_void;

// 1.0

pub const EGL_ALPHA_SIZE: EGLenum = 0x3021;
pub const EGL_BAD_ACCESS: EGLenum = 0x3002;
pub const EGL_BAD_ALLOC: EGLenum = 0x3003;
pub const EGL_BAD_ATTRIBUTE: EGLenum = 0x3004;
pub const EGL_BAD_CONFIG: EGLenum = 0x3005;
pub const EGL_BAD_CONTEXT: EGLenum = 0x3006;
pub const EGL_BAD_CURRENT_SURFACE: EGLenum = 0x3007;
pub const EGL_BAD_DISPLAY: EGLenum = 0x3008;
pub const EGL_BAD_MATCH: EGLenum = 0x3009;
pub const EGL_BAD_NATIVE_PIXMAP: EGLenum = 0x300A;
pub const EGL_BAD_NATIVE_WINDOW: EGLenum = 0x300B;
pub const EGL_BAD_PARAMETER: EGLenum = 0x300C;
pub const EGL_BAD_SURFACE: EGLenum = 0x300D;
pub const EGL_BLUE_SIZE: EGLenum = 0x3022;
pub const EGL_BUFFER_SIZE: EGLenum = 0x3020;
pub const EGL_EXTENSIONS: EGLenum = 0x3055;
pub const EGL_FALSE: EGLBoolean = 0;
pub const EGL_GREEN_SIZE: EGLenum = 0x3023;
pub const EGL_NONE: EGLenum = 0x3038;
pub const EGL_NOT_INITIALIZED: EGLenum = 0x3001;
pub const EGL_NO_CONTEXT: EGLContext = null_mut();
pub const EGL_NO_DISPLAY: EGLDisplay = null_mut();
pub const EGL_NO_SURFACE: EGLSurface = null_mut();
pub const EGL_RED_SIZE: EGLenum = 0x3024;
pub const EGL_SUCCESS: EGLenum = 0x3000;
pub const EGL_SURFACE_TYPE: EGLenum = 0x3033;
pub const EGL_TRUE: EGLBoolean = 1;
pub const EGL_VENDOR: EGLenum = 0x3053;
pub const EGL_VERSION: EGLenum = 0x3054;
pub const EGL_WINDOW_BIT: EGLenum = 0x0004;

// 1.1

pub const EGL_CONTEXT_LOST: EGLenum = 0x300E;

// 1.2

pub const EGL_CLIENT_APIS: EGLenum = 0x308D;
pub const EGL_OPENGL_ES_API: EGLenum = 0x30A0;
pub const EGL_RENDERABLE_TYPE: EGLenum = 0x3040;

// 1.3

pub const EGL_CONTEXT_CLIENT_VERSION: EGLenum = 0x3098;
pub const EGL_OPENGL_ES2_BIT: EGLenum = 0x0004;

// 1.4

pub const EGL_DEFAULT_DISPLAY: EGLNativeDisplayType = null_mut();

pub struct Lib {
    pub eglBindAPI: unsafe extern "C" fn(api: EGLenum) -> EGLBoolean,
    pub eglChooseConfig: unsafe extern "C" fn(
        dpy: EGLDisplay,
        attrib_list: *const EGLint,
        configs: *mut EGLConfig,
        config_size: EGLint,
        num_config: *mut EGLint,
    ) -> EGLBoolean,
    pub eglCreateContext: unsafe extern "C" fn(
        dpy: EGLDisplay,
        config: EGLConfig,
        share_context: EGLContext,
        attrib_list: *const EGLint,
    ) -> EGLContext,
    pub eglCreateWindowSurface: unsafe extern "C" fn(
        dpy: EGLDisplay,
        config: EGLConfig,
        win: EGLNativeWindowType,
        attrib_list: *const EGLint,
    ) -> EGLSurface,
    pub eglDestroyContext: unsafe extern "C" fn(dpy: EGLDisplay, ctx: EGLContext) -> EGLBoolean,
    pub eglDestroySurface: unsafe extern "C" fn(dpy: EGLDisplay, surface: EGLSurface) -> EGLBoolean,
    pub eglGetConfigs: unsafe extern "C" fn(
        dpy: EGLDisplay,
        configs: *mut EGLConfig,
        config_size: EGLint,
        num_config: *mut EGLint,
    ) -> EGLBoolean,
    pub eglGetDisplay: unsafe extern "C" fn(display_id: EGLNativeDisplayType) -> EGLDisplay,
    pub eglGetError: unsafe extern "C" fn() -> EGLint,
    pub eglGetProcAddress: unsafe extern "C" fn(procname: *const c_char) -> *mut c_void,
    pub eglInitialize:
        unsafe extern "C" fn(dpy: EGLDisplay, major: *mut EGLint, minor: *mut EGLint) -> EGLBoolean,
    pub eglMakeCurrent: unsafe extern "C" fn(
        dpy: EGLDisplay,
        draw: EGLSurface,
        read: EGLSurface,
        ctx: EGLContext,
    ) -> EGLBoolean,
    pub eglQueryString: unsafe extern "C" fn(dpy: EGLDisplay, name: EGLint) -> *const c_char,
    pub eglSwapBuffers: unsafe extern "C" fn(dpy: EGLDisplay, surface: EGLSurface) -> EGLBoolean,
    pub eglTerminate: unsafe extern "C" fn(dpy: EGLDisplay) -> EGLBoolean,

    _dl: DynLib,
}

impl Lib {
    pub fn load() -> Result<Self, dynlib::Error> {
        let dl = DynLib::open_any(&[c"libEGL.so", c"libEGL.so.1"])?;

        Ok(Self {
            eglBindAPI: dl.lookup(c"eglBindAPI")?,
            eglChooseConfig: dl.lookup(c"eglChooseConfig")?,
            eglCreateContext: dl.lookup(c"eglCreateContext")?,
            eglCreateWindowSurface: dl.lookup(c"eglCreateWindowSurface")?,
            eglDestroyContext: dl.lookup(c"eglDestroyContext")?,
            eglDestroySurface: dl.lookup(c"eglDestroySurface")?,
            eglGetConfigs: dl.lookup(c"eglGetConfigs")?,
            eglGetDisplay: dl.lookup(c"eglGetDisplay")?,
            eglGetError: dl.lookup(c"eglGetError")?,
            eglGetProcAddress: dl.lookup(c"eglGetProcAddress")?,
            eglInitialize: dl.lookup(c"eglInitialize")?,
            eglMakeCurrent: dl.lookup(c"eglMakeCurrent")?,
            eglQueryString: dl.lookup(c"eglQueryString")?,
            eglSwapBuffers: dl.lookup(c"eglSwapBuffers")?,
            eglTerminate: dl.lookup(c"eglTerminate")?,

            _dl: dl,
        })
    }
}
