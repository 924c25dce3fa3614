use std::time::Duration;

use anyhow::{Context as _, anyhow};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};

use crate::{Key, Message, Window, WindowAttrs};

#[inline]
fn map_window_event(window_event: winit::event::WindowEvent) -> Message {
    use winit::event::WindowEvent::*;
    use winit::keyboard::{KeyCode, PhysicalKey};

    match window_event {
        KeyboardInput { event, .. } if event.state.is_pressed() => {
            Message::KeyDown(match event.physical_key {
                PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
                _ => Key::Other,
            })
        }
        Resized(physical_size) => Message::Resized {
            width: physical_size.width,
            height: physical_size.height,
        },
        RedrawRequested => Message::Paint,
        CloseRequested => Message::CloseRequested,
        Destroyed => Message::Destroyed,
        other => {
            log::trace!("unused window event: {other:?}");
            Message::Other
        }
    }
}

// NOTE: winit wants a `&mut ApplicationHandler` while the event loop is being pumped; the window
// lends itself out for the duration of a single pump.
struct Pump<'a>(&'a mut Window);

impl winit::application::ApplicationHandler for Pump<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let this = &mut *self.0;
        if this.window.is_some() {
            return;
        }

        let (width, height) = this.attrs.size;
        let window_attrs = winit::window::WindowAttributes::default()
            .with_title(this.attrs.title.as_str())
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height))
            .with_resizable(this.attrs.resizable)
            .with_visible(false);
        match event_loop.create_window(window_attrs) {
            Ok(window) => {
                this.window = Some(window);
                log::info!("created winit window");
            }
            Err(err) => this.create_error = Some(err),
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        window_event: winit::event::WindowEvent,
    ) {
        let this = &mut *self.0;
        if this
            .window
            .as_ref()
            .is_none_or(|window| window.id() != window_id)
        {
            return;
        }

        this.dispatch(map_window_event(window_event));
        // whatever the handler posted (escape -> close) is handled within the same pump.
        this.drain_posted();
    }
}

/// returns true if the event loop exited.
pub(crate) fn pump(event_loop: &mut EventLoop<()>, window: &mut Window) -> bool {
    match event_loop.pump_app_events(Some(Duration::ZERO), &mut Pump(window)) {
        PumpStatus::Continue => false,
        PumpStatus::Exit(code) => {
            log::debug!("event loop exited (code {code})");
            true
        }
    }
}

impl Window {
    /// creates a hidden window whose client area is exactly `attrs.size`.
    ///
    /// the platform event loop backing the window is a process-wide resource that can be created
    /// once; creating a second window in the same process fails.
    pub fn create(attrs: WindowAttrs) -> anyhow::Result<Self> {
        let mut event_loop = EventLoop::new().context("could not create event loop")?;
        let mut this = Self::new_detached(attrs);

        // NOTE: the native window gets created from `resumed`, which winit delivers on the first
        // pump.
        let exited = pump(&mut event_loop, &mut this);
        if let Some(err) = this.create_error.take() {
            return Err(err).context("could not create window");
        }
        if exited {
            return Err(anyhow!("event loop exited before the window was created"));
        }
        if this.window.is_none() {
            return Err(anyhow!("could not create window (it was never resumed)"));
        }

        this.event_loop = Some(event_loop);
        this.processed = 0;
        Ok(this)
    }
}
