use gl::shader::{self, A_POS_LOCATION};
use gl::{Adapter, Context};

pub const VERTEX_SHADER: &str = r"
attribute vec4 a_pos;
void main()
{
    gl_Position = a_pos;
}
";

pub const FRAGMENT_SHADER: &str = r"
precision mediump float;
void main()
{
    gl_FragColor = vec4(0.25, 0.50, 1.0, 1.0);
}
";

// NOTE: a static, not a const; the driver reads client-side arrays at draw time.
#[rustfmt::skip]
pub static QUAD: [f32; 12] = [
    -0.5,  0.5, 0.0,
    -0.5, -0.5, 0.0,
     0.5,  0.5, 0.0,
     0.5, -0.5, 0.0,
];

pub const QUAD_VERTEX_COUNT: gl::GLsizei = 4;

/// compiles both stages and links them into the current program.
///
/// a stage that fails to compile short-circuits: nothing is linked and the other stage is released.
pub unsafe fn setup_program<A: Adapter>(api: &A, vertex_src: &str, fragment_src: &str) -> bool {
    unsafe {
        let vertex = shader::compile(api, vertex_src, gl::VERTEX_SHADER);
        let fragment = shader::compile(api, fragment_src, gl::FRAGMENT_SHADER);

        match (vertex, fragment) {
            (Some(vertex), Some(fragment)) => shader::link(api, vertex, fragment).is_some(),
            (vertex, fragment) => {
                if let Some(vertex) = vertex {
                    api.delete_shader(vertex);
                }
                if let Some(fragment) = fragment {
                    api.delete_shader(fragment);
                }
                false
            }
        }
    }
}

pub unsafe fn setup_world<A: Adapter>(api: &A) -> bool {
    unsafe { setup_program(api, VERTEX_SHADER, FRAGMENT_SHADER) }
}

/// draws a simple box and presents it.
pub fn render_scene<A: Adapter>(context: &dyn Context, api: &A) -> anyhow::Result<()> {
    context.clear();

    unsafe {
        api.vertex_attrib_pointer(
            A_POS_LOCATION,
            3,
            gl::FLOAT,
            gl::FALSE,
            0,
            QUAD.as_ptr().cast(),
        );
        api.enable_vertex_attrib_array(A_POS_LOCATION);
        api.draw_arrays(gl::TRIANGLE_STRIP, 0, QUAD_VERTEX_COUNT);
    }

    context.swap_buffers()
}

/// keeps the viewport covering the whole client area.
pub fn on_size<A: Adapter>(api: &A, width: u32, height: u32) {
    unsafe { api.viewport(0, 0, width as gl::GLsizei, height as gl::GLsizei) };
}

#[test]
fn test_setup_world() {
    use gl::fake::{Call, FakeAdapter};

    let api = FakeAdapter::default();
    assert!(unsafe { setup_world(&api) });

    let program = api.current_program().expect("current program");
    assert!(api.calls().contains(&Call::BindAttribLocation(
        program,
        A_POS_LOCATION,
        "a_pos".to_string()
    )));
    assert_eq!(api.live_shaders(), 0);
    assert_eq!(api.live_programs(), 1);
}

#[test]
fn test_setup_with_broken_fragment_never_links() {
    use gl::fake::{Call, FakeAdapter};

    let api = FakeAdapter::default();
    assert!(!unsafe { setup_program(&api, VERTEX_SHADER, "precision mediump float; void main( {") });

    let calls = api.calls();
    assert!(!calls.iter().any(|call| matches!(
        call,
        Call::CreateProgram(_) | Call::LinkProgram(_) | Call::UseProgram(_)
    )));
    assert_eq!(api.live_shaders(), 0);
    assert_eq!(api.current_program(), None);
}

#[test]
fn test_render_scene_per_frame() {
    use gl::fake::{Call, FakeAdapter, FakeContext};

    let api = FakeAdapter::default();
    assert!(unsafe { setup_world(&api) });
    api.take_calls();

    let context = FakeContext { api: &api };
    for _ in 0..3 {
        render_scene(&context, &api).expect("render");
        assert_eq!(
            api.take_calls(),
            vec![
                Call::Clear(gl::COLOR_BUFFER_BIT),
                Call::VertexAttribPointer {
                    index: A_POS_LOCATION,
                    size: 3,
                    r#type: gl::FLOAT,
                    stride: 0,
                },
                Call::EnableVertexAttribArray(A_POS_LOCATION),
                Call::DrawArrays {
                    mode: gl::TRIANGLE_STRIP,
                    first: 0,
                    count: 4,
                },
                Call::SwapBuffers,
            ]
        );
    }
}

#[test]
fn test_on_size_sets_viewport() {
    use gl::fake::{Call, FakeAdapter};

    let api = FakeAdapter::default();
    on_size(&api, 800, 600);
    assert_eq!(api.calls(), vec![Call::Viewport(0, 0, 800, 600)]);
}
