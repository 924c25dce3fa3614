use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use raw_window_handle as rwh;

mod backend_winit;

pub const DEFAULT_SIZE: (u32, u32) = (640, 480);

/// fired synchronously from within the resize notification, after [`Window::width`] and
/// [`Window::height`] reflect the new size.
pub const ON_SIZE: &str = "onsize";

#[derive(Debug, Clone)]
pub struct WindowAttrs {
    pub title: String,
    /// client-area size in physical pixels.
    pub size: (u32, u32),
    pub resizable: bool,
}

impl Default for WindowAttrs {
    fn default() -> Self {
        Self {
            title: String::new(),
            size: DEFAULT_SIZE,
            resizable: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// what the message pump acts upon; everything the platform reports is mapped to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    KeyDown(Key),
    Resized { width: u32, height: u32 },
    Paint,
    CloseRequested,
    Destroyed,
    Other,
}

pub type Handler = Rc<dyn Fn(&Window)>;

pub struct Window {
    // NOTE: the native window must drop before the event loop that created it.
    window: Option<winit::window::Window>,
    event_loop: Option<winit::event_loop::EventLoop<()>>,
    attrs: WindowAttrs,
    create_error: Option<winit::error::OsError>,

    size: (u32, u32),
    handlers: HashMap<String, Handler>,
    posted: VecDeque<Message>,
    processed: i32,
    quit_requested: bool,
}

/// shorthand for [`Window::create`].
pub fn create_window(title: &str, width: u32, height: u32) -> anyhow::Result<Window> {
    Window::create(WindowAttrs {
        title: title.to_string(),
        size: (width, height),
        ..WindowAttrs::default()
    })
}

impl Window {
    fn new_detached(attrs: WindowAttrs) -> Self {
        Self {
            window: None,
            event_loop: None,
            size: attrs.size,
            attrs,
            create_error: None,

            handlers: HashMap::new(),
            posted: VecDeque::new(),
            processed: 0,
            quit_requested: false,
        }
    }

    pub fn show(&self) {
        if let Some(ref window) = self.window {
            window.set_visible(true);
        }
    }

    /// asks for a repaint; it arrives as [`Message::Paint`] on a later pump.
    pub fn update(&self) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    pub fn width(&self) -> u32 {
        self.size.0
    }

    pub fn height(&self) -> u32 {
        self.size.1
    }

    /// replaces whatever was bound to `name` before.
    pub fn bind(&mut self, name: impl Into<String>, handler: impl Fn(&Window) + 'static) {
        self.handlers.insert(name.into(), Rc::new(handler));
    }

    pub fn unbind(&mut self, name: &str) {
        self.handlers.remove(name);
    }

    /// queues a message to be handled by the next [`Window::process_events`] (or by the one that is
    /// currently running).
    pub fn post(&mut self, message: Message) {
        self.posted.push_back(message);
    }

    /// drains pending messages without blocking.
    ///
    /// returns the number of messages handled, or a negative value if a close/quit was observed
    /// during this call.
    pub fn process_events(&mut self) -> i32 {
        self.processed = 0;

        if let Some(mut event_loop) = self.event_loop.take() {
            let exited = backend_winit::pump(&mut event_loop, self);
            self.event_loop = Some(event_loop);
            if exited {
                self.quit_requested = true;
            }
        }
        self.drain_posted();

        if std::mem::take(&mut self.quit_requested) {
            -1
        } else {
            self.processed
        }
    }

    fn drain_posted(&mut self) {
        while let Some(message) = self.posted.pop_front() {
            self.dispatch(message);
        }
    }

    fn dispatch(&mut self, message: Message) {
        self.processed += 1;

        match message {
            Message::KeyDown(Key::Escape) => self.post(Message::CloseRequested),
            Message::Resized { width, height } => {
                self.size = (width, height);
                self.fire_event(ON_SIZE);
            }
            // drawing is the caller's job, done outside of the pump.
            Message::Paint => {}
            Message::CloseRequested | Message::Destroyed => self.quit_requested = true,
            Message::KeyDown(Key::Other) | Message::Other => {}
        }
    }

    fn fire_event(&self, name: &str) {
        if let Some(handler) = self.handlers.get(name).cloned() {
            handler(self);
        }
    }
}

impl rwh::HasDisplayHandle for Window {
    fn display_handle(&self) -> Result<rwh::DisplayHandle<'_>, rwh::HandleError> {
        match self.window {
            Some(ref window) => rwh::HasDisplayHandle::display_handle(window),
            None => Err(rwh::HandleError::Unavailable),
        }
    }
}

impl rwh::HasWindowHandle for Window {
    fn window_handle(&self) -> Result<rwh::WindowHandle<'_>, rwh::HandleError> {
        match self.window {
            Some(ref window) => rwh::HasWindowHandle::window_handle(window),
            None => Err(rwh::HandleError::Unavailable),
        }
    }
}

#[cfg(test)]
fn detached(width: u32, height: u32) -> Window {
    Window::new_detached(WindowAttrs {
        title: "test".to_string(),
        size: (width, height),
        ..WindowAttrs::default()
    })
}

#[test]
fn test_size_matches_request_before_resize() {
    for (width, height) in [(1, 1), (640, 480), (1920, 1080)] {
        let window = detached(width, height);
        assert_eq!((window.width(), window.height()), (width, height));
    }
}

#[test]
fn test_resize_updates_size_before_onsize_fires() {
    use std::cell::Cell;

    let mut window = detached(640, 480);
    let seen = Rc::new(Cell::new((0, 0)));
    let seen_clone = Rc::clone(&seen);
    window.bind(ON_SIZE, move |window| {
        seen_clone.set((window.width(), window.height()))
    });

    window.post(Message::Resized {
        width: 800,
        height: 600,
    });
    assert_eq!(window.process_events(), 1);
    assert_eq!(seen.get(), (800, 600));
    assert_eq!((window.width(), window.height()), (800, 600));
}

#[test]
fn test_last_bind_wins() {
    use std::cell::Cell;

    let mut window = detached(640, 480);
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));
    {
        let first = Rc::clone(&first);
        window.bind(ON_SIZE, move |_| first.set(first.get() + 1));
    }
    {
        let second = Rc::clone(&second);
        window.bind(ON_SIZE, move |_| second.set(second.get() + 1));
    }

    window.post(Message::Resized {
        width: 10,
        height: 10,
    });
    window.process_events();
    assert_eq!((first.get(), second.get()), (0, 1));

    window.unbind(ON_SIZE);
    window.post(Message::Resized {
        width: 20,
        height: 20,
    });
    window.process_events();
    assert_eq!((first.get(), second.get()), (0, 1));
    assert_eq!(window.width(), 20);
}

#[test]
fn test_process_events_counts_messages() {
    let mut window = detached(640, 480);
    assert_eq!(window.process_events(), 0);

    window.post(Message::Paint);
    window.post(Message::Other);
    window.post(Message::KeyDown(Key::Other));
    assert_eq!(window.process_events(), 3);
    assert_eq!(window.process_events(), 0);
}

#[test]
fn test_process_events_is_negative_only_on_quit() {
    let mut window = detached(640, 480);

    window.post(Message::CloseRequested);
    assert!(window.process_events() < 0);
    // the quit is reported once, for the call that observed it.
    assert_eq!(window.process_events(), 0);

    window.post(Message::Destroyed);
    assert!(window.process_events() < 0);
}

#[test]
fn test_escape_requests_close() {
    let mut window = detached(640, 480);
    window.post(Message::KeyDown(Key::Escape));
    assert!(window.process_events() < 0);
}
