use std::ffi::{CStr, c_void};
use std::mem::transmute_copy;
use std::ptr::NonNull;
use std::{error, fmt};

use libc::{dlclose, dlerror, dlopen, dlsym};

#[derive(Debug)]
pub enum Error {
    CouldNotOpen(String),
    CouldNotLookup(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CouldNotOpen(reason) => f.write_fmt(format_args!("could not open: {reason}")),
            Self::CouldNotLookup(reason) => {
                f.write_fmt(format_args!("could not lookup: {reason}"))
            }
        }
    }
}

// NOTE: dlerror returns a pointer into a static buffer, it must not be freed.
fn last_dlerror() -> String {
    let err = unsafe { dlerror() };
    if err.is_null() {
        return "unknown dlerror".to_string();
    }
    unsafe { CStr::from_ptr(err) }
        .to_str()
        .map_or_else(|_| "invalid dlerror string".to_string(), str::to_string)
}

pub struct DynLib(NonNull<c_void>);

impl DynLib {
    pub fn open(filename: &CStr) -> Result<Self, Error> {
        let handle = unsafe { dlopen(filename.as_ptr(), libc::RTLD_LAZY) };
        NonNull::new(handle)
            .map(Self)
            .ok_or_else(|| Error::CouldNotOpen(last_dlerror()))
    }

    /// tries each of the filenames in order, returns the first one that opens.
    pub fn open_any(filenames: &[&CStr]) -> Result<Self, Error> {
        let mut reasons = Vec::with_capacity(filenames.len());
        for filename in filenames {
            match Self::open(filename) {
                Ok(this) => return Ok(this),
                Err(Error::CouldNotOpen(reason) | Error::CouldNotLookup(reason)) => {
                    reasons.push(reason)
                }
            }
        }
        Err(Error::CouldNotOpen(reasons.join("; ")))
    }

    /// F must be a function pointer type matching the symbol's signature.
    pub fn lookup<F: Sized>(&self, name: &CStr) -> Result<F, Error> {
        assert_eq!(size_of::<F>(), size_of::<*mut c_void>());

        unsafe {
            _ = dlerror();

            let addr = dlsym(self.0.as_ptr(), name.as_ptr());
            if addr.is_null() {
                Err(Error::CouldNotLookup(last_dlerror()))
            } else {
                Ok(transmute_copy(&addr))
            }
        }
    }
}

impl Drop for DynLib {
    fn drop(&mut self) {
        unsafe { dlclose(self.0.as_ptr()) };
    }
}

#[macro_export]
macro_rules! opaque_struct {
    ($name:ident) => {
        #[repr(C)]
        pub struct $name {
            _data: [u8; 0],
            _marker: std::marker::PhantomData<(*mut u8, std::marker::PhantomPinned)>,
        }
    };
}

#[test]
fn test_open_missing_library() {
    let ret = DynLib::open_any(&[c"libdoes-not-exist.so", c"libdoes-not-exist.so.1"]);
    assert!(matches!(ret, Err(Error::CouldNotOpen(_))));
}

#[test]
fn test_lookup_libc_symbol() {
    let lib = DynLib::open_any(&[c"libc.so.6", c"libc.so"]).expect("libc");
    let strlen: unsafe extern "C" fn(*const libc::c_char) -> libc::size_t =
        lib.lookup(c"strlen").expect("strlen");
    assert_eq!(unsafe { strlen(c"four".as_ptr()) }, 4);
    assert!(matches!(
        lib.lookup::<unsafe extern "C" fn()>(c"definitely_not_a_symbol"),
        Err(Error::CouldNotLookup(_))
    ));
}
