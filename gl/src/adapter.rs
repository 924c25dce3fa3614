use std::ffi::{CStr, c_char, c_void};
use std::num::NonZero;

use anyhow::{Context as _, anyhow};

use crate::libgl as gl;

// NOTE: methods mirror gles2 1:1 with the exception of things that can be rustified (like strings,
// zero handles and out-params).
pub trait Adapter {
    type Program: Copy;
    type Shader: Copy;

    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    unsafe fn bind_attrib_location(&self, program: Self::Program, index: gl::GLuint, name: &CStr);
    unsafe fn clear(&self, mask: gl::GLbitfield);
    unsafe fn clear_color(
        &self,
        red: gl::GLfloat,
        green: gl::GLfloat,
        blue: gl::GLfloat,
        alpha: gl::GLfloat,
    );
    unsafe fn compile_shader(&self, shader: Self::Shader);
    unsafe fn create_program(&self) -> anyhow::Result<Self::Program>;
    unsafe fn create_shader(&self, r#type: gl::GLenum) -> anyhow::Result<Self::Shader>;
    unsafe fn delete_program(&self, program: Self::Program);
    unsafe fn delete_shader(&self, shader: Self::Shader);
    unsafe fn draw_arrays(&self, mode: gl::GLenum, first: gl::GLint, count: gl::GLsizei);
    unsafe fn enable_vertex_attrib_array(&self, index: gl::GLuint);
    unsafe fn get_error(&self) -> Option<gl::GLenum>;
    unsafe fn get_program_info_log(&self, program: Self::Program) -> String;
    unsafe fn get_program_parameter(&self, program: Self::Program, pname: gl::GLenum) -> gl::GLint;
    unsafe fn get_shader_info_log(&self, shader: Self::Shader) -> String;
    unsafe fn get_shader_parameter(&self, shader: Self::Shader, pname: gl::GLenum) -> gl::GLint;
    unsafe fn get_string(&self, name: gl::GLenum) -> anyhow::Result<String>;
    unsafe fn link_program(&self, program: Self::Program);
    unsafe fn shader_source(&self, shader: Self::Shader, source: &str);
    unsafe fn use_program(&self, program: Option<Self::Program>);
    /// `pointer` is a client-side array when no array buffer is bound.
    unsafe fn vertex_attrib_pointer(
        &self,
        index: gl::GLuint,
        size: gl::GLint,
        r#type: gl::GLenum,
        normalized: gl::GLboolean,
        stride: gl::GLsizei,
        pointer: *const c_void,
    );
    unsafe fn viewport(&self, x: gl::GLint, y: gl::GLint, width: gl::GLsizei, height: gl::GLsizei);
}

// the log length reported by the driver includes the nul terminator.
fn info_log_from_bytes(mut bytes: Vec<u8>, written: gl::GLsizei) -> String {
    bytes.truncate(written.max(0) as usize);
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

impl Adapter for gl::Api {
    type Program = NonZero<gl::GLuint>;
    type Shader = NonZero<gl::GLuint>;

    #[inline]
    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { (self.AttachShader)(program.get(), shader.get()) };
    }

    #[inline]
    unsafe fn bind_attrib_location(&self, program: Self::Program, index: gl::GLuint, name: &CStr) {
        unsafe { (self.BindAttribLocation)(program.get(), index, name.as_ptr()) };
    }

    #[inline]
    unsafe fn clear(&self, mask: gl::GLbitfield) {
        unsafe { (self.Clear)(mask) };
    }

    #[inline]
    unsafe fn clear_color(
        &self,
        red: gl::GLfloat,
        green: gl::GLfloat,
        blue: gl::GLfloat,
        alpha: gl::GLfloat,
    ) {
        unsafe { (self.ClearColor)(red, green, blue, alpha) };
    }

    #[inline]
    unsafe fn compile_shader(&self, shader: Self::Shader) {
        unsafe { (self.CompileShader)(shader.get()) };
    }

    #[inline]
    unsafe fn create_program(&self) -> anyhow::Result<Self::Program> {
        let program = unsafe { (self.CreateProgram)() };
        NonZero::new(program).context("could not create program")
    }

    #[inline]
    unsafe fn create_shader(&self, r#type: gl::GLenum) -> anyhow::Result<Self::Shader> {
        let shader = unsafe { (self.CreateShader)(r#type) };
        NonZero::new(shader).context("could not create shader")
    }

    #[inline]
    unsafe fn delete_program(&self, program: Self::Program) {
        unsafe { (self.DeleteProgram)(program.get()) };
    }

    #[inline]
    unsafe fn delete_shader(&self, shader: Self::Shader) {
        unsafe { (self.DeleteShader)(shader.get()) };
    }

    #[inline]
    unsafe fn draw_arrays(&self, mode: gl::GLenum, first: gl::GLint, count: gl::GLsizei) {
        unsafe { (self.DrawArrays)(mode, first, count) };
    }

    #[inline]
    unsafe fn enable_vertex_attrib_array(&self, index: gl::GLuint) {
        unsafe { (self.EnableVertexAttribArray)(index) };
    }

    #[inline]
    unsafe fn get_error(&self) -> Option<gl::GLenum> {
        let ret = unsafe { (self.GetError)() };
        (ret != gl::NO_ERROR).then_some(ret)
    }

    unsafe fn get_program_info_log(&self, program: Self::Program) -> String {
        let len = unsafe { self.get_program_parameter(program, gl::INFO_LOG_LENGTH) };
        let mut info_log = vec![0u8; len.max(0) as usize];
        let mut written: gl::GLsizei = 0;
        unsafe {
            (self.GetProgramInfoLog)(
                program.get(),
                len,
                &mut written,
                info_log.as_mut_ptr() as *mut gl::GLchar,
            )
        };
        info_log_from_bytes(info_log, written)
    }

    #[inline]
    unsafe fn get_program_parameter(&self, program: Self::Program, pname: gl::GLenum) -> gl::GLint {
        let mut param: gl::GLint = 0;
        unsafe { (self.GetProgramiv)(program.get(), pname, &mut param) };
        param
    }

    unsafe fn get_shader_info_log(&self, shader: Self::Shader) -> String {
        let len = unsafe { self.get_shader_parameter(shader, gl::INFO_LOG_LENGTH) };
        let mut info_log = vec![0u8; len.max(0) as usize];
        let mut written: gl::GLsizei = 0;
        unsafe {
            (self.GetShaderInfoLog)(
                shader.get(),
                len,
                &mut written,
                info_log.as_mut_ptr() as *mut gl::GLchar,
            )
        };
        info_log_from_bytes(info_log, written)
    }

    #[inline]
    unsafe fn get_shader_parameter(&self, shader: Self::Shader, pname: gl::GLenum) -> gl::GLint {
        let mut param: gl::GLint = 0;
        unsafe { (self.GetShaderiv)(shader.get(), pname, &mut param) };
        param
    }

    unsafe fn get_string(&self, name: gl::GLenum) -> anyhow::Result<String> {
        let ptr = unsafe { (self.GetString)(name) };
        if ptr.is_null() {
            return Err(anyhow!("could not get string (name 0x{name:x})"));
        }
        unsafe { CStr::from_ptr(ptr as *const c_char) }
            .to_str()
            .context("invalid string")
            .map(str::to_string)
    }

    #[inline]
    unsafe fn link_program(&self, program: Self::Program) {
        unsafe { (self.LinkProgram)(program.get()) };
    }

    #[inline]
    unsafe fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe {
            (self.ShaderSource)(
                shader.get(),
                1,
                &(source.as_ptr() as *const gl::GLchar),
                &(source.len() as gl::GLint),
            )
        };
    }

    #[inline]
    unsafe fn use_program(&self, program: Option<Self::Program>) {
        unsafe { (self.UseProgram)(program.map_or(0, NonZero::get)) };
    }

    #[inline]
    unsafe fn vertex_attrib_pointer(
        &self,
        index: gl::GLuint,
        size: gl::GLint,
        r#type: gl::GLenum,
        normalized: gl::GLboolean,
        stride: gl::GLsizei,
        pointer: *const c_void,
    ) {
        unsafe { (self.VertexAttribPointer)(index, size, r#type, normalized, stride, pointer) };
    }

    #[inline]
    unsafe fn viewport(&self, x: gl::GLint, y: gl::GLint, width: gl::GLsizei, height: gl::GLsizei) {
        unsafe { (self.Viewport)(x, y, width, height) };
    }
}

#[test]
fn test_info_log_from_bytes() {
    let bytes = b"0:1(1): error: syntax error\0\0".to_vec();
    assert_eq!(info_log_from_bytes(bytes, 28), "0:1(1): error: syntax error");
    assert_eq!(info_log_from_bytes(vec![0; 4], 0), "");
}
