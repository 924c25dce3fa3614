#![allow(non_camel_case_types)]

use std::ffi::{c_int, c_void};

use dynlib::{DynLib, opaque_struct};

opaque_struct!(wl_egl_window);

pub struct Lib {
    pub wl_egl_window_create: unsafe extern "C" fn(
        surface: *mut c_void,
        width: c_int,
        height: c_int,
    ) -> *mut wl_egl_window,
    pub wl_egl_window_destroy: unsafe extern "C" fn(egl_window: *mut wl_egl_window),
    pub wl_egl_window_resize: unsafe extern "C" fn(
        egl_window: *mut wl_egl_window,
        width: c_int,
        height: c_int,
        dx: c_int,
        dy: c_int,
    ),

    _dl: DynLib,
}

impl Lib {
    pub fn load() -> Result<Self, dynlib::Error> {
        let dl = DynLib::open_any(&[c"libwayland-egl.so", c"libwayland-egl.so.1"])?;

        Ok(Self {
            wl_egl_window_create: dl.lookup(c"wl_egl_window_create")?,
            wl_egl_window_destroy: dl.lookup(c"wl_egl_window_destroy")?,
            wl_egl_window_resize: dl.lookup(c"wl_egl_window_resize")?,

            _dl: dl,
        })
    }
}
