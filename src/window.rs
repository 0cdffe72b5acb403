//! Window management and input callbacks using winit

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use winit::{
    dpi::PhysicalSize,
    error::{EventLoopError, OsError},
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window as WinitWindow, WindowBuilder},
};

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] EventLoopError),
    #[error("Failed to create window: {0}")]
    Os(#[from] OsError),
}

/// Wrapper around winit window with additional state
pub struct Window {
    window: Arc<WinitWindow>,
    width: u32,
    height: u32,
    close_requested: bool,
}

impl Window {
    /// Create a new window with the given title and dimensions
    pub fn new(
        event_loop: &EventLoop<()>,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<Self, WindowError> {
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(title)
                .with_inner_size(PhysicalSize::new(width, height))
                .build(event_loop)?,
        );
        let size = window.inner_size();

        Ok(Self {
            window,
            width: size.width,
            height: size.height,
            close_requested: false,
        })
    }

    /// Get arc reference to window
    pub fn window_arc(&self) -> Arc<WinitWindow> {
        Arc::clone(&self.window)
    }

    /// Get current window dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    pub fn set_close(&mut self, close: bool) {
        self.close_requested = close;
    }

    /// Checked once per frame by [`run`]
    pub fn should_close(&self) -> bool {
        self.close_requested
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Resized(size) => {
                self.width = size.width;
                self.height = size.height;
            }
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            _ => {}
        }
    }
}

type ResizeFn<S> = Box<dyn FnMut(&mut S, u32, u32)>;
type KeyFn<S, W> = Box<dyn FnMut(&mut S, &mut W, f32)>;
type ScrollFn<S> = Box<dyn FnMut(&mut S, f32)>;
type DragFn<S> = Box<dyn FnMut(&mut S, f32, f32)>;

/// Callback registry fed by the event loop.
///
/// Key callbacks are polled once per frame for as long as their key is held
/// and receive the frame time in seconds. Drag callbacks receive cursor
/// deltas in window pixels while the drag button is held.
pub struct InputBindings<S, W = Window> {
    resize: Vec<ResizeFn<S>>,
    keys: Vec<(KeyCode, KeyFn<S, W>)>,
    scroll: Vec<ScrollFn<S>>,
    drag: Vec<DragFn<S>>,
    drag_button: MouseButton,
    held_keys: HashSet<KeyCode>,
    dragging: bool,
    cursor: Option<(f64, f64)>,
}

impl<S, W> Default for InputBindings<S, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, W> InputBindings<S, W> {
    pub fn new() -> Self {
        Self {
            resize: Vec::new(),
            keys: Vec::new(),
            scroll: Vec::new(),
            drag: Vec::new(),
            drag_button: MouseButton::Left,
            held_keys: HashSet::new(),
            dragging: false,
            cursor: None,
        }
    }

    pub fn with_drag_button(mut self, button: MouseButton) -> Self {
        self.drag_button = button;
        self
    }

    pub fn register_framebuffer_resize(&mut self, callback: impl FnMut(&mut S, u32, u32) + 'static) {
        self.resize.push(Box::new(callback));
    }

    pub fn register_key(&mut self, key: KeyCode, callback: impl FnMut(&mut S, &mut W, f32) + 'static) {
        self.keys.push((key, Box::new(callback)));
    }

    pub fn register_scroll(&mut self, callback: impl FnMut(&mut S, f32) + 'static) {
        self.scroll.push(Box::new(callback));
    }

    pub fn register_drag(&mut self, callback: impl FnMut(&mut S, f32, f32) + 'static) {
        self.drag.push(Box::new(callback));
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held_keys.contains(&key)
    }

    fn framebuffer_resized(&mut self, state: &mut S, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        for callback in &mut self.resize {
            callback(state, width, height);
        }
    }

    fn key_changed(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.held_keys.insert(key);
        } else {
            self.held_keys.remove(&key);
        }
    }

    fn scrolled(&mut self, state: &mut S, delta_y: f32) {
        for callback in &mut self.scroll {
            callback(state, delta_y);
        }
    }

    fn button_changed(&mut self, button: MouseButton, pressed: bool) {
        if button == self.drag_button {
            self.dragging = pressed;
        }
    }

    fn cursor_moved(&mut self, state: &mut S, x: f64, y: f64) {
        if let (true, Some((last_x, last_y))) = (self.dragging, self.cursor) {
            let (dx, dy) = ((x - last_x) as f32, (y - last_y) as f32);
            for callback in &mut self.drag {
                callback(state, dx, dy);
            }
        }
        self.cursor = Some((x, y));
    }

    fn focus_lost(&mut self) {
        self.held_keys.clear();
        self.dragging = false;
    }

    fn poll_keys(&mut self, state: &mut S, window: &mut W, dt: f32) {
        for (key, callback) in &mut self.keys {
            if self.held_keys.contains(key) {
                callback(state, window, dt);
            }
        }
    }

    fn handle_event(&mut self, state: &mut S, event: &WindowEvent) {
        match event {
            WindowEvent::Resized(size) => self.framebuffer_resized(state, size.width, size.height),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.key_changed(key, event.state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => self.button_changed(*button, *button_state == ElementState::Pressed),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(state, position.x, position.y)
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.scrolled(state, delta_y);
            }
            WindowEvent::Focused(false) => self.focus_lost(),
            _ => {}
        }
    }
}

/// Drive the frame loop until the window asks to close.
///
/// Each iteration samples held keys, then calls `on_frame` with the time
/// since the previous frame in seconds.
pub fn run<S, F>(
    event_loop: EventLoop<()>,
    mut window: Window,
    mut bindings: InputBindings<S>,
    mut state: S,
    mut on_frame: F,
) -> Result<(), WindowError>
where
    F: FnMut(&mut S, &mut Window, f32),
{
    let mut last_frame = Instant::now();

    event_loop.run(move |event, elwt: &EventLoopWindowTarget<()>| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { event, .. } => {
                window.handle_event(&event);
                bindings.handle_event(&mut state, &event);
            }
            Event::AboutToWait => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f32();
                last_frame = now;

                bindings.poll_keys(&mut state, &mut window, dt);
                on_frame(&mut state, &mut window, dt);

                if window.should_close() {
                    log::info!("Close requested, shutting down");
                    elwt.exit();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}
