use std::{
    num::NonZeroU32,
    sync::Arc,
    time::{Duration, Instant},
};

use softbuffer::{Context, Surface};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Fullscreen, Window, WindowId},
};

use crate::{
    display::{
        DisplaySettings, DisplaySurface, InputEvent, blit_centered_xrgb, check_frame_fits,
    },
    foundation::{
        core::{CanvasGeometry, FrameRGB},
        error::{ReelError, ReelResult},
    },
};

const WINDOW_OPEN_TIMEOUT: Duration = Duration::from_secs(5);

/// A `winit` window painted through `softbuffer`.
///
/// The event loop is driven from the playback thread with `pump_app_events`, so presenting a
/// frame and waiting for key presses happen in the same blocking call.
pub struct WindowSurface {
    event_loop: EventLoop<()>,
    state: WindowState,
}

struct WindowState {
    settings: DisplaySettings,
    window: Option<Arc<Window>>,
    surface: Option<Surface<Arc<Window>, Arc<Window>>>,
    events: Vec<InputEvent>,
    error: Option<String>,
    exited: bool,
}

impl WindowSurface {
    pub fn open(settings: DisplaySettings) -> ReelResult<Self> {
        let event_loop = EventLoop::new()
            .map_err(|e| ReelError::display(format!("failed to create event loop: {e}")))?;

        let mut this = Self {
            event_loop,
            state: WindowState {
                settings,
                window: None,
                surface: None,
                events: Vec::new(),
                error: None,
                exited: false,
            },
        };

        // The window is created from `resumed`, which the first pumps deliver.
        let deadline = Instant::now() + WINDOW_OPEN_TIMEOUT;
        while this.state.window.is_none() {
            if this.state.exited || Instant::now() >= deadline {
                return Err(ReelError::display("display window did not open"));
            }
            this.pump(Duration::from_millis(10))?;
        }

        let canvas = this.state.settings.canvas;
        tracing::info!(
            width = canvas.width,
            height = canvas.height,
            fullscreen = this.state.settings.fullscreen,
            "display window opened"
        );
        Ok(this)
    }

    fn pump(&mut self, wait: Duration) -> ReelResult<()> {
        if self.state.exited {
            return Ok(());
        }
        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(Some(wait), &mut self.state)
        {
            tracing::debug!(code, "event loop exited");
            self.state.exited = true;
            self.state.events.push(InputEvent::CloseRequested);
        }
        match self.state.error.take() {
            Some(err) => Err(ReelError::display(err)),
            None => Ok(()),
        }
    }

    fn blit(&mut self, frame: &FrameRGB) -> ReelResult<()> {
        let (Some(window), Some(surface)) = (self.state.window.as_ref(), self.state.surface.as_mut())
        else {
            return Err(ReelError::display("display window is not open"));
        };

        let size = window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            // Minimized.
            return Ok(());
        };
        surface
            .resize(w, h)
            .map_err(|e| ReelError::display(format!("failed to resize surface: {e}")))?;

        let mut buffer = surface
            .buffer_mut()
            .map_err(|e| ReelError::display(format!("failed to map surface buffer: {e}")))?;
        blit_centered_xrgb(&mut buffer, size.width, size.height, frame);
        buffer
            .present()
            .map_err(|e| ReelError::display(format!("failed to present frame: {e}")))
    }
}

impl DisplaySurface for WindowSurface {
    fn canvas(&self) -> CanvasGeometry {
        self.state.settings.canvas
    }

    fn present(&mut self, frame: &FrameRGB, wait: Duration) -> ReelResult<Vec<InputEvent>> {
        check_frame_fits(self.canvas(), frame)?;
        self.blit(frame)?;
        self.poll_events(wait)
    }

    fn poll_events(&mut self, wait: Duration) -> ReelResult<Vec<InputEvent>> {
        let deadline = Instant::now() + wait;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            self.pump(remaining)?;
            if !self.state.events.is_empty() || remaining.is_zero() || self.state.exited {
                break;
            }
        }
        Ok(std::mem::take(&mut self.state.events))
    }
}

impl WindowState {
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), String> {
        let canvas = self.settings.canvas;
        let mut attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(PhysicalSize::new(canvas.width, canvas.height));
        if self.settings.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| format!("failed to create window: {e}"))?,
        );
        window.set_cursor_visible(false);

        let context = Context::new(window.clone())
            .map_err(|e| format!("failed to create softbuffer context: {e}"))?;
        let surface = Surface::new(&context, window.clone())
            .map_err(|e| format!("failed to create softbuffer surface: {e}"))?;

        self.window = Some(window);
        self.surface = Some(surface);
        Ok(())
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.events.push(InputEvent::CloseRequested),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                let input = match &event.logical_key {
                    Key::Character(s) => s.chars().next().map(InputEvent::Key),
                    Key::Named(NamedKey::Escape) => Some(InputEvent::Escape),
                    _ => None,
                };
                self.events.extend(input);
            }
            _ => {}
        }
    }
}
