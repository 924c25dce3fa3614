#![allow(non_snake_case)]

use std::ffi::{CStr, c_char, c_float, c_int, c_uchar, c_uint, c_void};

use anyhow::anyhow;

// https://registry.khronos.org/OpenGL/api/GLES2/gl2.h

pub type GLboolean = c_uchar;
pub type GLbitfield = c_uint;
pub type GLchar = c_char;
pub type GLenum = c_uint;
pub type GLfloat = c_float;
pub type GLint = c_int;
pub type GLsizei = c_int;
pub type GLubyte = c_uchar;
pub type GLuint = c_uint;

pub const FALSE: GLboolean = 0;
pub const TRUE: GLboolean = 1;
pub const NO_ERROR: GLenum = 0;

pub const COLOR_BUFFER_BIT: GLbitfield = 0x00004000;

pub const TRIANGLES: GLenum = 0x0004;
pub const TRIANGLE_STRIP: GLenum = 0x0005;

pub const FLOAT: GLenum = 0x1406;

pub const VENDOR: GLenum = 0x1F00;
pub const RENDERER: GLenum = 0x1F01;
pub const VERSION: GLenum = 0x1F02;
pub const SHADING_LANGUAGE_VERSION: GLenum = 0x8B8C;

pub const FRAGMENT_SHADER: GLenum = 0x8B30;
pub const VERTEX_SHADER: GLenum = 0x8B31;
pub const COMPILE_STATUS: GLenum = 0x8B81;
pub const LINK_STATUS: GLenum = 0x8B82;
pub const INFO_LOG_LENGTH: GLenum = 0x8B84;

pub struct Api {
    pub AttachShader: unsafe extern "C" fn(program: GLuint, shader: GLuint),
    pub BindAttribLocation: unsafe extern "C" fn(program: GLuint, index: GLuint, name: *const GLchar),
    pub Clear: unsafe extern "C" fn(mask: GLbitfield),
    pub ClearColor: unsafe extern "C" fn(red: GLfloat, green: GLfloat, blue: GLfloat, alpha: GLfloat),
    pub CompileShader: unsafe extern "C" fn(shader: GLuint),
    pub CreateProgram: unsafe extern "C" fn() -> GLuint,
    pub CreateShader: unsafe extern "C" fn(r#type: GLenum) -> GLuint,
    pub DeleteProgram: unsafe extern "C" fn(program: GLuint),
    pub DeleteShader: unsafe extern "C" fn(shader: GLuint),
    pub DrawArrays: unsafe extern "C" fn(mode: GLenum, first: GLint, count: GLsizei),
    pub EnableVertexAttribArray: unsafe extern "C" fn(index: GLuint),
    pub GetError: unsafe extern "C" fn() -> GLenum,
    pub GetProgramInfoLog: unsafe extern "C" fn(
        program: GLuint,
        buf_size: GLsizei,
        length: *mut GLsizei,
        info_log: *mut GLchar,
    ),
    pub GetProgramiv: unsafe extern "C" fn(program: GLuint, pname: GLenum, params: *mut GLint),
    pub GetShaderInfoLog: unsafe extern "C" fn(
        shader: GLuint,
        buf_size: GLsizei,
        length: *mut GLsizei,
        info_log: *mut GLchar,
    ),
    pub GetShaderiv: unsafe extern "C" fn(shader: GLuint, pname: GLenum, params: *mut GLint),
    pub GetString: unsafe extern "C" fn(name: GLenum) -> *const GLubyte,
    pub LinkProgram: unsafe extern "C" fn(program: GLuint),
    pub ShaderSource: unsafe extern "C" fn(
        shader: GLuint,
        count: GLsizei,
        string: *const *const GLchar,
        length: *const GLint,
    ),
    pub UseProgram: unsafe extern "C" fn(program: GLuint),
    pub VertexAttribPointer: unsafe extern "C" fn(
        index: GLuint,
        size: GLint,
        r#type: GLenum,
        normalized: GLboolean,
        stride: GLsizei,
        pointer: *const c_void,
    ),
    pub Viewport: unsafe extern "C" fn(x: GLint, y: GLint, width: GLsizei, height: GLsizei),
}

impl Api {
    /// # Safety
    ///
    /// `get_proc_address` must return either null or a pointer to the named gles2 function.
    pub unsafe fn load_with<F>(mut get_proc_address: F) -> anyhow::Result<Self>
    where
        F: FnMut(&CStr) -> *mut c_void,
    {
        let mut load = |name: &CStr| -> anyhow::Result<*mut c_void> {
            let ptr = get_proc_address(name);
            if ptr.is_null() {
                Err(anyhow!("could not load {name:?}"))
            } else {
                Ok(ptr)
            }
        };

        // NOTE: all fields are plain fn pointers, transmuting from a non-null data pointer is fine.
        macro_rules! load {
            ($name:literal) => {
                unsafe { std::mem::transmute::<*mut c_void, _>(load($name)?) }
            };
        }

        Ok(Self {
            AttachShader: load!(c"glAttachShader"),
            BindAttribLocation: load!(c"glBindAttribLocation"),
            Clear: load!(c"glClear"),
            ClearColor: load!(c"glClearColor"),
            CompileShader: load!(c"glCompileShader"),
            CreateProgram: load!(c"glCreateProgram"),
            CreateShader: load!(c"glCreateShader"),
            DeleteProgram: load!(c"glDeleteProgram"),
            DeleteShader: load!(c"glDeleteShader"),
            DrawArrays: load!(c"glDrawArrays"),
            EnableVertexAttribArray: load!(c"glEnableVertexAttribArray"),
            GetError: load!(c"glGetError"),
            GetProgramInfoLog: load!(c"glGetProgramInfoLog"),
            GetProgramiv: load!(c"glGetProgramiv"),
            GetShaderInfoLog: load!(c"glGetShaderInfoLog"),
            GetShaderiv: load!(c"glGetShaderiv"),
            GetString: load!(c"glGetString"),
            LinkProgram: load!(c"glLinkProgram"),
            ShaderSource: load!(c"glShaderSource"),
            UseProgram: load!(c"glUseProgram"),
            VertexAttribPointer: load!(c"glVertexAttribPointer"),
            Viewport: load!(c"glViewport"),
        })
    }
}

#[test]
fn test_load_with_reports_missing_function() {
    let ret = unsafe { Api::load_with(|_| std::ptr::null_mut()) };
    let err = ret.err().expect("loading must fail");
    assert!(err.to_string().contains("glAttachShader"));
}
