//! Windowed runtime.
//!
//! The widget tree is rasterized on the CPU every redraw and presented
//! through the `roi_gpu` blit pipeline.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use roi_gpu::{FramePipeline, GpuContext, Texture};
use winit::event::{ElementState, Event as WinitEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key as WinitKey, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::display::{self, Frame};
use crate::error::{Result, UiError};
use crate::event::{Event, Key, Modifiers, MouseButton};
use crate::layout::{Bounds, Point};
use crate::widget::Element;

/// Core application trait.
///
/// The application owns a retained widget tree and reacts to the messages
/// its widgets emit.
pub trait Application {
    type Message: 'static;

    /// Window title.
    fn title(&self) -> String;

    /// Root of the widget tree. Called once; the tree is mutated in place
    /// afterwards.
    fn root(&self) -> Element<Self::Message>;

    /// Handle one message.
    fn update(&mut self, message: Self::Message);
}

/// Settings for running an application.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Overrides `Application::title`
    pub window_title: Option<String>,
    pub log_level: log::LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_title: None,
            log_level: log::LevelFilter::Info,
        }
    }
}

/// Initialize `env_logger` at `level`. `RUST_LOG` takes precedence.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

/// Deliver `event` to the tree and feed resulting messages to the app.
pub fn dispatch<A: Application>(app: &mut A, root: &Element<A::Message>, event: &Event) {
    let messages = {
        let mut widget = root.borrow_mut();
        let bounds = Bounds::from_size(widget.size());
        widget.on_event(event, bounds)
    };
    for message in messages {
        app.update(message);
    }
}

/// GPU side of the window: one texture the size of the UI frame.
struct Presenter {
    ctx: GpuContext,
    pipeline: FramePipeline,
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

impl Presenter {
    fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self> {
        let ctx = pollster::block_on(GpuContext::new(window))?;
        let pipeline = FramePipeline::new(&ctx);
        let blank = vec![255u8; (width * height * 4) as usize];
        let texture = Texture::from_rgba8(&ctx, &blank, width, height)?;
        let bind_group = pipeline.create_texture_bind_group(&ctx, &texture);
        Ok(Self {
            ctx,
            pipeline,
            texture,
            bind_group,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        if (frame.width, frame.height) != (self.texture.width, self.texture.height) {
            self.texture = Texture::from_rgba8(&self.ctx, &frame.rgba, frame.width, frame.height)?;
            self.bind_group = self
                .pipeline
                .create_texture_bind_group(&self.ctx, &self.texture);
        } else {
            self.texture.write(&self.ctx, &frame.rgba)?;
        }

        let output = match self.ctx.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = (self.ctx.width(), self.ctx.height());
                self.ctx.resize(w, h);
                return Ok(());
            }
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        self.pipeline.render(&mut encoder, &view, &self.bind_group);
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn convert_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        winit::event::MouseButton::Other(n) => Some(MouseButton::Other(n)),
        _ => None,
    }
}

fn convert_key(key: &WinitKey) -> Option<Key> {
    match key {
        WinitKey::Character(text) => text.chars().next().map(Key::Char),
        WinitKey::Named(named) => match named {
            NamedKey::Enter => Some(Key::Enter),
            NamedKey::Escape => Some(Key::Escape),
            NamedKey::Backspace => Some(Key::Backspace),
            NamedKey::Delete => Some(Key::Delete),
            NamedKey::Tab => Some(Key::Tab),
            NamedKey::ArrowUp => Some(Key::Up),
            NamedKey::ArrowDown => Some(Key::Down),
            NamedKey::ArrowLeft => Some(Key::Left),
            NamedKey::ArrowRight => Some(Key::Right),
            _ => None,
        },
        _ => None,
    }
}

/// Open a window showing `app`'s widget tree and run until it is closed.
///
/// The window is sized to the root widget and is not resizable. Returns the
/// application so its final state can be inspected.
pub fn run<A: Application + 'static>(app: A, settings: Settings) -> Result<A> {
    init_logging(settings.log_level);

    let event_loop = EventLoop::new()?;
    let root = app.root();
    let size = root.borrow().size();
    let (width, height) = (
        size.width.ceil().max(1.0) as u32,
        size.height.ceil().max(1.0) as u32,
    );

    let title = settings.window_title.unwrap_or_else(|| app.title());
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(title)
            .with_inner_size(winit::dpi::LogicalSize::new(width, height))
            .with_resizable(false)
            .build(&event_loop)?,
    );
    let mut presenter = Presenter::new(Arc::clone(&window), width, height)?;
    log::info!("Window opened at {}x{}", width, height);

    let app = Rc::new(RefCell::new(app));
    let shared = Rc::clone(&app);
    let mut cursor = Point::zero();
    let mut modifiers = Modifiers::default();

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Wait);

        let WinitEvent::WindowEvent { event, .. } = event else {
            return;
        };
        let ui_event = match event {
            WindowEvent::CloseRequested => {
                elwt.exit();
                None
            }
            WindowEvent::Resized(size) => {
                presenter.resize(size.width, size.height);
                window.request_redraw();
                None
            }
            WindowEvent::RedrawRequested => {
                let presented = display::render(&*root.borrow())
                    .and_then(|frame| presenter.present(&frame));
                if let Err(e) = presented {
                    log::error!("Render failed: {}", e);
                    elwt.exit();
                }
                None
            }
            WindowEvent::ModifiersChanged(changed) => {
                let keys = changed.state();
                modifiers = Modifiers {
                    shift: keys.shift_key(),
                    ctrl: keys.control_key(),
                    alt: keys.alt_key(),
                    meta: keys.super_key(),
                };
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = window.scale_factor();
                cursor = Point::new((position.x / scale) as f32, (position.y / scale) as f32);
                Some(Event::MouseMoved { position: cursor })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                convert_button(button).map(|button| match state {
                    ElementState::Pressed => Event::MousePressed {
                        button,
                        position: cursor,
                    },
                    ElementState::Released => Event::MouseReleased {
                        button,
                        position: cursor,
                    },
                })
            }
            WindowEvent::KeyboardInput { event, .. } => {
                convert_key(&event.logical_key).map(|key| match event.state {
                    ElementState::Pressed => Event::KeyPressed { key, modifiers },
                    ElementState::Released => Event::KeyReleased { key, modifiers },
                })
            }
            _ => None,
        };

        if let Some(ui_event) = ui_event {
            dispatch(&mut *shared.borrow_mut(), &root, &ui_event);
            window.request_redraw();
        }
    })?;

    Rc::try_unwrap(app)
        .map(RefCell::into_inner)
        .map_err(|_| UiError::Shutdown)
}
