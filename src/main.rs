use std::rc::Rc;

use barebones::config::AppConfig;
use barebones::logger::Logger;
use barebones::world;

#[cfg(unix)]
fn run_frames(
    window: &mut window::Window,
    gl_context: &gl::EglContext,
    api: &gl::Api,
) -> anyhow::Result<()> {
    if !unsafe { world::setup_world(api) } {
        log::error!("could not set up the world");
        return Ok(());
    }

    // NOTE: a frame is drawn on every iteration that did not observe a quit, whether or not any
    // messages were handled.
    while window.process_events() >= 0 {
        world::render_scene(gl_context, api)?;
    }
    Ok(())
}

#[cfg(unix)]
fn run(config: &AppConfig) -> anyhow::Result<()> {
    use anyhow::Context as _;
    use raw_window_handle::{HasDisplayHandle as _, HasWindowHandle as _};

    let mut window = window::Window::create(config.window_attrs())?;

    let gl_context = Rc::new(
        gl::EglContext::new(
            window.display_handle()?,
            window.window_handle()?,
            window.width(),
            window.height(),
        )
        .context("could not create gl context")?,
    );
    let api = gl_context.api();

    {
        let gl_context = Rc::clone(&gl_context);
        let api = Rc::clone(&api);
        window.bind(window::ON_SIZE, move |window| {
            let (width, height) = (window.width(), window.height());
            log::debug!("onsize {width}x{height}");
            // minimized.
            if width == 0 || height == 0 {
                return;
            }
            gl_context.resize(width, height);
            world::on_size(&*api, width, height);
        });
    }

    window.show();
    window.update();

    let result = run_frames(&mut window, &gl_context, &api);

    // NOTE: the handler holds the gl context; it must let go before the native window goes away.
    window.unbind(window::ON_SIZE);
    drop(api);
    drop(gl_context);

    result
}

#[cfg(not(unix))]
fn run(_config: &AppConfig) -> anyhow::Result<()> {
    Err(anyhow::anyhow!("egl is only available on unix"))
}

fn main() {
    let config = AppConfig::default();
    if let Err(err) = Logger::init(config.log_level) {
        eprintln!("could not init logger: {err}");
    }

    if let Err(err) = run(&config) {
        log::error!("{err:#}");
    }

    println!("program exit.");
}
