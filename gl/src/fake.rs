//! a recording, gpu-less [`Adapter`] for tests.
//!
//! shaders compile when their source contains `void main()`; names are handed out from a small
//! fixed pool so that leaked objects eventually make creation fail.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::ffi::{CStr, c_void};
use std::num::NonZero;

use anyhow::{Context as _, anyhow};

use crate::adapter::Adapter;
use crate::context::Context;
use crate::libgl as gl;

pub const MAX_OBJECTS: usize = 8;

const SYNTAX_ERROR_LOG: &str = "0:1(1): error: syntax error, unexpected end of file";
const LINK_ERROR_LOG: &str = "error: linking with uncompiled/unspecialized shader";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AttachShader(gl::GLuint, gl::GLuint),
    BindAttribLocation(gl::GLuint, gl::GLuint, String),
    Clear(gl::GLbitfield),
    ClearColor([gl::GLfloat; 4]),
    CompileShader(gl::GLuint),
    CreateProgram(gl::GLuint),
    CreateShader(gl::GLenum, gl::GLuint),
    DeleteProgram(gl::GLuint),
    DeleteShader(gl::GLuint),
    DrawArrays {
        mode: gl::GLenum,
        first: gl::GLint,
        count: gl::GLsizei,
    },
    EnableVertexAttribArray(gl::GLuint),
    LinkProgram(gl::GLuint),
    ShaderSource(gl::GLuint),
    UseProgram(Option<gl::GLuint>),
    VertexAttribPointer {
        index: gl::GLuint,
        size: gl::GLint,
        r#type: gl::GLenum,
        stride: gl::GLsizei,
    },
    Viewport(gl::GLint, gl::GLint, gl::GLsizei, gl::GLsizei),
    // not a gl call, recorded by FakeContext so ordering against draws can be checked.
    SwapBuffers,
}

struct FakeShader {
    source: String,
    compiled: bool,
    info_log: String,
}

struct FakeProgram {
    attached: Vec<gl::GLuint>,
    linked: bool,
    info_log: String,
}

#[derive(Default)]
struct State {
    names: Vec<bool>,
    shaders: BTreeMap<gl::GLuint, FakeShader>,
    programs: BTreeMap<gl::GLuint, FakeProgram>,
    current_program: Option<gl::GLuint>,
    calls: Vec<Call>,
}

impl State {
    fn alloc_name(&mut self) -> Option<NonZero<gl::GLuint>> {
        if self.names.is_empty() {
            self.names = vec![false; MAX_OBJECTS];
        }
        let index = self.names.iter().position(|taken| !taken)?;
        self.names[index] = true;
        NonZero::new(index as gl::GLuint + 1)
    }

    fn free_name(&mut self, name: gl::GLuint) {
        if let Some(taken) = self.names.get_mut(name as usize - 1) {
            *taken = false;
        }
    }
}

#[derive(Default)]
pub struct FakeAdapter {
    state: RefCell<State>,
    pub fail_link: Cell<bool>,
}

impl FakeAdapter {
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn current_program(&self) -> Option<gl::GLuint> {
        self.state.borrow().current_program
    }

    pub fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl Adapter for FakeAdapter {
    type Program = NonZero<gl::GLuint>;
    type Shader = NonZero<gl::GLuint>;

    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        let mut state = self.state.borrow_mut();
        if let Some(payload) = state.programs.get_mut(&program.get()) {
            payload.attached.push(shader.get());
        }
        state
            .calls
            .push(Call::AttachShader(program.get(), shader.get()));
    }

    unsafe fn bind_attrib_location(&self, program: Self::Program, index: gl::GLuint, name: &CStr) {
        self.record(Call::BindAttribLocation(
            program.get(),
            index,
            name.to_string_lossy().into_owned(),
        ));
    }

    unsafe fn clear(&self, mask: gl::GLbitfield) {
        self.record(Call::Clear(mask));
    }

    unsafe fn clear_color(
        &self,
        red: gl::GLfloat,
        green: gl::GLfloat,
        blue: gl::GLfloat,
        alpha: gl::GLfloat,
    ) {
        self.record(Call::ClearColor([red, green, blue, alpha]));
    }

    unsafe fn compile_shader(&self, shader: Self::Shader) {
        let mut state = self.state.borrow_mut();
        if let Some(payload) = state.shaders.get_mut(&shader.get()) {
            payload.compiled = payload.source.contains("void main()");
            payload.info_log = if payload.compiled {
                String::new()
            } else {
                SYNTAX_ERROR_LOG.to_string()
            };
        }
        state.calls.push(Call::CompileShader(shader.get()));
    }

    unsafe fn create_program(&self) -> anyhow::Result<Self::Program> {
        let mut state = self.state.borrow_mut();
        let program = state.alloc_name().context("could not create program")?;
        state.programs.insert(
            program.get(),
            FakeProgram {
                attached: Vec::new(),
                linked: false,
                info_log: String::new(),
            },
        );
        state.calls.push(Call::CreateProgram(program.get()));
        Ok(program)
    }

    unsafe fn create_shader(&self, r#type: gl::GLenum) -> anyhow::Result<Self::Shader> {
        if r#type != gl::VERTEX_SHADER && r#type != gl::FRAGMENT_SHADER {
            return Err(anyhow!("could not create shader (type 0x{:x})", r#type));
        }
        let mut state = self.state.borrow_mut();
        let shader = state.alloc_name().context("could not create shader")?;
        state.shaders.insert(
            shader.get(),
            FakeShader {
                source: String::new(),
                compiled: false,
                info_log: String::new(),
            },
        );
        state.calls.push(Call::CreateShader(r#type, shader.get()));
        Ok(shader)
    }

    unsafe fn delete_program(&self, program: Self::Program) {
        let mut state = self.state.borrow_mut();
        if state.programs.remove(&program.get()).is_some() {
            state.free_name(program.get());
        }
        if state.current_program == Some(program.get()) {
            state.current_program = None;
        }
        state.calls.push(Call::DeleteProgram(program.get()));
    }

    unsafe fn delete_shader(&self, shader: Self::Shader) {
        let mut state = self.state.borrow_mut();
        if state.shaders.remove(&shader.get()).is_some() {
            state.free_name(shader.get());
        }
        state.calls.push(Call::DeleteShader(shader.get()));
    }

    unsafe fn draw_arrays(&self, mode: gl::GLenum, first: gl::GLint, count: gl::GLsizei) {
        self.record(Call::DrawArrays { mode, first, count });
    }

    unsafe fn enable_vertex_attrib_array(&self, index: gl::GLuint) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    unsafe fn get_error(&self) -> Option<gl::GLenum> {
        None
    }

    unsafe fn get_program_info_log(&self, program: Self::Program) -> String {
        let state = self.state.borrow();
        state
            .programs
            .get(&program.get())
            .map(|payload| payload.info_log.clone())
            .unwrap_or_default()
    }

    unsafe fn get_program_parameter(&self, program: Self::Program, pname: gl::GLenum) -> gl::GLint {
        let state = self.state.borrow();
        let Some(payload) = state.programs.get(&program.get()) else {
            return 0;
        };
        match pname {
            gl::LINK_STATUS => payload.linked as gl::GLint,
            gl::INFO_LOG_LENGTH if payload.info_log.is_empty() => 0,
            gl::INFO_LOG_LENGTH => payload.info_log.len() as gl::GLint + 1,
            _ => 0,
        }
    }

    unsafe fn get_shader_info_log(&self, shader: Self::Shader) -> String {
        let state = self.state.borrow();
        state
            .shaders
            .get(&shader.get())
            .map(|payload| payload.info_log.clone())
            .unwrap_or_default()
    }

    unsafe fn get_shader_parameter(&self, shader: Self::Shader, pname: gl::GLenum) -> gl::GLint {
        let state = self.state.borrow();
        let Some(payload) = state.shaders.get(&shader.get()) else {
            return 0;
        };
        match pname {
            gl::COMPILE_STATUS => payload.compiled as gl::GLint,
            gl::INFO_LOG_LENGTH if payload.info_log.is_empty() => 0,
            gl::INFO_LOG_LENGTH => payload.info_log.len() as gl::GLint + 1,
            _ => 0,
        }
    }

    unsafe fn get_string(&self, name: gl::GLenum) -> anyhow::Result<String> {
        match name {
            gl::VENDOR => Ok("fake".to_string()),
            gl::VERSION => Ok("OpenGL ES 2.0 fake".to_string()),
            gl::RENDERER => Ok("fake renderer".to_string()),
            _ => Err(anyhow!("could not get string (name 0x{name:x})")),
        }
    }

    unsafe fn link_program(&self, program: Self::Program) {
        let mut state = self.state.borrow_mut();
        let fail_link = self.fail_link.get();
        let State {
            shaders, programs, ..
        } = &mut *state;
        if let Some(payload) = programs.get_mut(&program.get()) {
            let all_compiled = payload.attached.len() == 2
                && payload
                    .attached
                    .iter()
                    .all(|name| shaders.get(name).is_some_and(|shader| shader.compiled));
            payload.linked = all_compiled && !fail_link;
            payload.info_log = if payload.linked {
                String::new()
            } else {
                LINK_ERROR_LOG.to_string()
            };
        }
        state.calls.push(Call::LinkProgram(program.get()));
    }

    unsafe fn shader_source(&self, shader: Self::Shader, source: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(payload) = state.shaders.get_mut(&shader.get()) {
            payload.source = source.to_string();
        }
        state.calls.push(Call::ShaderSource(shader.get()));
    }

    unsafe fn use_program(&self, program: Option<Self::Program>) {
        let mut state = self.state.borrow_mut();
        state.current_program = program.map(NonZero::get);
        state.calls.push(Call::UseProgram(program.map(NonZero::get)));
    }

    unsafe fn vertex_attrib_pointer(
        &self,
        index: gl::GLuint,
        size: gl::GLint,
        r#type: gl::GLenum,
        _normalized: gl::GLboolean,
        stride: gl::GLsizei,
        pointer: *const c_void,
    ) {
        assert!(!pointer.is_null());
        self.record(Call::VertexAttribPointer {
            index,
            size,
            r#type,
            stride,
        });
    }

    unsafe fn viewport(&self, x: gl::GLint, y: gl::GLint, width: gl::GLsizei, height: gl::GLsizei) {
        self.record(Call::Viewport(x, y, width, height));
    }
}

/// a [`Context`] that forwards `clear` to a [`FakeAdapter`] and records swaps on it.
pub struct FakeContext<'a> {
    pub api: &'a FakeAdapter,
}

impl Context for FakeContext<'_> {
    fn bind(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn unbind(&self) {}

    fn clear(&self) {
        unsafe { self.api.clear(gl::COLOR_BUFFER_BIT) };
    }

    fn swap_buffers(&self) -> anyhow::Result<()> {
        self.api.record(Call::SwapBuffers);
        Ok(())
    }
}

#[test]
fn test_names_are_reused_after_delete() {
    let api = FakeAdapter::default();
    unsafe {
        let first = api.create_shader(gl::VERTEX_SHADER).expect("first");
        api.delete_shader(first);
        let second = api.create_shader(gl::VERTEX_SHADER).expect("second");
        assert_eq!(first, second);
    }
}

#[test]
fn test_names_run_out_when_leaked() {
    let api = FakeAdapter::default();
    unsafe {
        for _ in 0..MAX_OBJECTS {
            api.create_shader(gl::FRAGMENT_SHADER).expect("shader");
        }
        assert!(api.create_shader(gl::FRAGMENT_SHADER).is_err());
    }
}
