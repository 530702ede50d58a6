use std::ffi::CString;
use std::num::NonZeroU32;
use std::time::Instant;

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use hello_triangle::context::RawGl;
use hello_triangle::session::{FrameContext, RenderSession, SessionConfig};

use crate::args::Args;

pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
}

impl App {
    pub fn new(args: &Args) -> Self {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(args.width, args.height)))
            .with_min_inner_size(Size::Physical(PhysicalSize::new(32, 32)))
            .with_title(&args.title);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new();

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |mut configs| configs.next().unwrap())
            .unwrap();

        let handle = window.as_ref().map(|w| w.raw_window_handle());
        let gl_display = gl_config.display();

        // 3.3 core; the embedded shaders are #version 330.
        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(handle);

        let gl_window = GlWindow::new(window.unwrap(), &gl_config);

        let gl_context = unsafe {
            gl_display
                .create_context(&gl_config, &context_attr)
                .unwrap()
        }
        .make_current(&gl_window.surface)
        .unwrap();

        gl::load_with(|s| {
            gl_display
                .get_proc_address(CString::new(s).unwrap().as_c_str())
                .cast()
        });

        Self {
            event_loop,
            gl_context,
            gl_window,
        }
    }

    pub fn run(self, config: SessionConfig) -> ! {
        let gl = RawGl::new();
        let mut session = RenderSession::new(config);

        // Initialization failures are fatal, with the compiler log attached.
        if let Err(e) = session.on_load(&gl) {
            log::error!("could not initialize the render session: {e}");
            std::process::exit(1);
        }

        let size = self.gl_window.window.inner_size();
        if let Err(e) = session.on_resize(&gl, size.width, size.height) {
            log::warn!("initial viewport setup failed: {e}");
        }

        let mut last_frame = Instant::now();

        self.event_loop
            .run(move |event, _window_target, control_flow| {
                *control_flow = ControlFlow::Poll;
                match event {
                    Event::WindowEvent { event, .. } => match event {
                        WindowEvent::Resized(size) => {
                            if size.width != 0 && size.height != 0 {
                                self.gl_window.surface.resize(
                                    &self.gl_context,
                                    NonZeroU32::new(size.width).unwrap(),
                                    NonZeroU32::new(size.height).unwrap(),
                                );
                            }
                            if let Err(e) = session.on_resize(&gl, size.width, size.height) {
                                log::warn!("resize ignored: {e}");
                            }
                        }
                        WindowEvent::KeyboardInput { input, .. } => {
                            if let KeyboardInput {
                                virtual_keycode: Some(VirtualKeyCode::Escape),
                                state: ElementState::Pressed,
                                ..
                            } = input
                            {
                                control_flow.set_exit();
                            }
                        }
                        WindowEvent::CloseRequested => control_flow.set_exit(),
                        _ => (),
                    },
                    Event::RedrawRequested(_) => {
                        let now = Instant::now();
                        let frame = FrameContext {
                            elapsed: now - last_frame,
                            framebuffer_size: self.gl_window.window.inner_size().into(),
                        };
                        last_frame = now;

                        match session.on_render_frame(&gl, &frame) {
                            Ok(()) => {
                                self.gl_window
                                    .surface
                                    .swap_buffers(&self.gl_context)
                                    .unwrap();
                            }
                            // Per-frame errors are not fatal, the next
                            // frame is attempted regardless.
                            Err(e) => log::error!("frame dropped: {e}"),
                        }
                    }
                    Event::MainEventsCleared => {
                        self.gl_window.window.request_redraw();
                    }
                    Event::LoopDestroyed => {
                        if let Err(e) = session.on_unload(&gl) {
                            log::error!("session teardown failed: {e}");
                        }
                    }
                    _ => (),
                }
            })
    }
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Self {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).unwrap(),
            NonZeroU32::new(height).unwrap(),
        );

        let surface = unsafe {
            config
                .display()
                .create_window_surface(config, &attrs)
                .unwrap()
        };

        Self { window, surface }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not read shader source: {0}")]
    ShaderSource(#[from] std::io::Error),
}
