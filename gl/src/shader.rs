use crate::adapter::Adapter;
use crate::libgl as gl;

/// vertex attribute location the position attribute is bound to before linking.
pub const A_POS_LOCATION: gl::GLuint = 0;

/// compiles a single shader stage.
///
/// returns `None` when the shader could not be created or compiled; in the latter case the
/// driver's info log is logged and the shader object is released.
pub unsafe fn compile<A: Adapter>(api: &A, source: &str, kind: gl::GLenum) -> Option<A::Shader> {
    unsafe {
        let shader = match api.create_shader(kind) {
            Ok(shader) => shader,
            Err(err) => {
                log::error!("{err:#}");
                return None;
            }
        };

        api.shader_source(shader, source);
        api.compile_shader(shader);

        if api.get_shader_parameter(shader, gl::COMPILE_STATUS) == gl::FALSE as gl::GLint {
            if api.get_shader_parameter(shader, gl::INFO_LOG_LENGTH) > 1 {
                let info_log = api.get_shader_info_log(shader);
                log::error!("error compiling shader:\n{info_log}");
            }
            api.delete_shader(shader);
            return None;
        }

        Some(shader)
    }
}

/// links the two stages into a program and makes it current.
///
/// both shaders are consumed: they are released whether or not linking succeeds.
pub unsafe fn link<A: Adapter>(
    api: &A,
    vertex: A::Shader,
    fragment: A::Shader,
) -> Option<A::Program> {
    unsafe {
        let program = match api.create_program() {
            Ok(program) => program,
            Err(err) => {
                log::error!("{err:#}");
                api.delete_shader(vertex);
                api.delete_shader(fragment);
                return None;
            }
        };

        api.attach_shader(program, vertex);
        api.attach_shader(program, fragment);

        api.bind_attrib_location(program, A_POS_LOCATION, c"a_pos");

        api.link_program(program);

        // done with the shaders
        api.delete_shader(vertex);
        api.delete_shader(fragment);

        if api.get_program_parameter(program, gl::LINK_STATUS) == gl::FALSE as gl::GLint {
            if api.get_program_parameter(program, gl::INFO_LOG_LENGTH) > 1 {
                let info_log = api.get_program_info_log(program);
                log::error!("error linking program:\n{info_log}");
            }
            api.delete_program(program);
            return None;
        }

        api.use_program(Some(program));

        Some(program)
    }
}

#[cfg(test)]
const VALID_VERTEX: &str = "attribute vec4 a_pos;\nvoid main() { gl_Position = a_pos; }\n";
#[cfg(test)]
const VALID_FRAGMENT: &str = "void main() { gl_FragColor = vec4(1.0); }\n";

#[test]
fn test_compile_valid_shader() {
    use crate::fake::{Call, FakeAdapter};

    let api = FakeAdapter::default();
    let shader = unsafe { compile(&api, VALID_VERTEX, gl::VERTEX_SHADER) }.expect("shader");
    assert_eq!(api.live_shaders(), 1);
    assert!(api.calls().contains(&Call::CompileShader(shader.get())));
}

#[test]
fn test_compile_invalid_shader_releases_it() {
    use crate::fake::{Call, FakeAdapter, MAX_OBJECTS};

    let api = FakeAdapter::default();
    // more attempts than there are names; a leak would exhaust them.
    for _ in 0..MAX_OBJECTS * 4 {
        assert!(unsafe { compile(&api, "void main( {", gl::FRAGMENT_SHADER) }.is_none());
        assert_eq!(api.live_shaders(), 0);
    }
    assert!(
        api.calls()
            .iter()
            .any(|call| matches!(call, Call::DeleteShader(_)))
    );
    assert!(unsafe { compile(&api, VALID_FRAGMENT, gl::FRAGMENT_SHADER) }.is_some());
}

#[test]
fn test_link_binds_a_pos_and_uses_program() {
    use crate::fake::{Call, FakeAdapter};

    let api = FakeAdapter::default();
    let (program, vertex, fragment) = unsafe {
        let vertex = compile(&api, VALID_VERTEX, gl::VERTEX_SHADER).expect("vertex");
        let fragment = compile(&api, VALID_FRAGMENT, gl::FRAGMENT_SHADER).expect("fragment");
        let program = link(&api, vertex, fragment).expect("program");
        (program, vertex, fragment)
    };

    let calls = api.calls();
    assert!(calls.contains(&Call::BindAttribLocation(
        program.get(),
        A_POS_LOCATION,
        "a_pos".to_string()
    )));
    assert!(calls.contains(&Call::DeleteShader(vertex.get())));
    assert!(calls.contains(&Call::DeleteShader(fragment.get())));
    assert_eq!(calls.last(), Some(&Call::UseProgram(Some(program.get()))));
    assert_eq!(api.live_shaders(), 0);
    assert_eq!(api.current_program(), Some(program.get()));
}

#[test]
fn test_link_failure_releases_program() {
    use crate::fake::{Call, FakeAdapter};

    let api = FakeAdapter::default();
    api.fail_link.set(true);
    let ret = unsafe {
        let vertex = compile(&api, VALID_VERTEX, gl::VERTEX_SHADER).expect("vertex");
        let fragment = compile(&api, VALID_FRAGMENT, gl::FRAGMENT_SHADER).expect("fragment");
        link(&api, vertex, fragment)
    };

    assert!(ret.is_none());
    assert_eq!(api.live_programs(), 0);
    assert_eq!(api.live_shaders(), 0);
    assert_eq!(api.current_program(), None);
    assert!(
        !api.calls()
            .iter()
            .any(|call| matches!(call, Call::UseProgram(_)))
    );
}
