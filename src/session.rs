use std::time::Duration;

use thiserror::Error;

use crate::context::GlContext;
use crate::geometry::{Geometry, GeometryBuilder, GeometryError, VertexAttribute};
use crate::program::{Program, ProgramBuilder, ProgramError};
use crate::TRIANGLE;

/// What one session renders: a shader pair plus the vertex data.
///
/// The repository's near-duplicate window variants collapse into this one
/// parameterized form.
pub struct SessionConfig {
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub vertex_data: Vec<f32>,
    pub clear_color: [f32; 4],
}

impl SessionConfig {
    pub fn new(vert_src: &str, frag_src: &str) -> Self {
        Self {
            vertex_shader: vert_src.to_owned(),
            fragment_shader: frag_src.to_owned(),
            vertex_data: TRIANGLE.to_vec(),
            clear_color: [0.2, 0.3, 0.3, 1.0],
        }
    }
}

/// Per-frame data handed in by the window host. Consumed, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub elapsed: Duration,
    pub framebuffer_size: (u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Ready,
    Rendering,
    TornDown,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("shader program initialization failed: {0}")]
    Program(#[from] ProgramError),
    #[error("geometry initialization failed: {0}")]
    Geometry(#[from] GeometryError),
    #[error("{op} is not valid in the {state:?} state")]
    InvalidState {
        op: &'static str,
        state: SessionState,
    },
}

/// The per-frame driver behind the window host's lifecycle hooks.
///
/// The host calls `on_load` once, `on_resize` and `on_render_frame`
/// interleaved arbitrarily, and `on_unload` at session end. All calls come
/// from the single thread owning the GL context; nothing here blocks or
/// spawns work.
pub struct RenderSession {
    config: SessionConfig,
    state: SessionState,
    program: Option<Program>,
    geometry: Option<Geometry>,
    vertex_count: usize,
    frames: u64,
    gpu_errors: u64,
}

impl RenderSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Uninitialized,
            program: None,
            geometry: None,
            vertex_count: 0,
            frames: 0,
            gpu_errors: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// GPU error flags observed so far. These are logged, never fatal.
    pub fn gpu_errors(&self) -> u64 {
        self.gpu_errors
    }

    /// Builds the GPU resources. Any failure here is fatal for the session;
    /// there is no partial-rendering fallback.
    pub fn on_load(&mut self, gl: &impl GlContext) -> Result<(), SessionError> {
        if self.state != SessionState::Uninitialized {
            return Err(SessionError::InvalidState {
                op: "on_load",
                state: self.state,
            });
        }

        let [r, g, b, a] = self.config.clear_color;
        gl.set_clear_color(r, g, b, a);

        let program =
            ProgramBuilder::new(&self.config.vertex_shader, &self.config.fragment_shader)
                .build(gl)?;

        let geometry = GeometryBuilder::new(&self.config.vertex_data)
            .with_attribute(VertexAttribute::Vec3)
            .build(gl)?;

        self.vertex_count = geometry.vertices();
        self.program = Some(program);
        self.geometry = Some(geometry);
        self.state = SessionState::Ready;

        log::debug!(
            "session ready, {} vertices, program id {}",
            self.vertex_count,
            self.program.as_ref().map(Program::id).unwrap_or(0),
        );

        Ok(())
    }

    /// Matches the viewport to the framebuffer. Idempotent; zero sizes are
    /// fine (a minimized window reports them).
    pub fn on_resize(&mut self, gl: &impl GlContext, width: u32, height: u32) -> Result<(), SessionError> {
        match self.state {
            SessionState::Ready | SessionState::Rendering => {
                gl.viewport(0, 0, width as i32, height as i32);
                Ok(())
            }
            state => Err(SessionError::InvalidState {
                op: "on_resize",
                state,
            }),
        }
    }

    /// Renders one frame: clear, bind program, draw, then poll the GL error
    /// flag. A pending error is logged and counted; the next frame proceeds.
    ///
    /// Returning `Ok` is the present signal; the host swaps buffers after it.
    pub fn on_render_frame(
        &mut self,
        gl: &impl GlContext,
        frame: &FrameContext,
    ) -> Result<(), SessionError> {
        match self.state {
            SessionState::Ready | SessionState::Rendering => {}
            state => {
                return Err(SessionError::InvalidState {
                    op: "on_render_frame",
                    state,
                })
            }
        }

        gl.clear_color_buffer();

        // on_load populated both or failed the session.
        let program = self.program.as_ref().ok_or(ProgramError::InvalidHandle)?;
        let geometry = self.geometry.as_ref().ok_or(GeometryError::InvalidHandle)?;

        program.bind(gl)?;
        geometry.draw(gl, self.vertex_count)?;

        self.state = SessionState::Rendering;
        self.frames += 1;

        while let Some(e) = gl.poll_error() {
            self.gpu_errors += 1;
            log::warn!("GPU reported {e} after frame {}", self.frames);
        }

        log::trace!(
            "frame {} presented, {:?} since previous, {}x{}",
            self.frames,
            frame.elapsed,
            frame.framebuffer_size.0,
            frame.framebuffer_size.1,
        );

        Ok(())
    }

    /// Destroys geometry then program, the reverse of creation order.
    ///
    /// Idempotent: winit can reach teardown through more than one path, so
    /// repeated calls (or a call before `on_load`) are clean no-ops.
    pub fn on_unload(&mut self, gl: &impl GlContext) -> Result<(), SessionError> {
        if self.state == SessionState::TornDown {
            return Ok(());
        }

        if let Some(mut geometry) = self.geometry.take() {
            geometry.destroy(gl)?;
        }

        if let Some(mut program) = self.program.take() {
            program.destroy(gl)?;
        }

        self.state = SessionState::TornDown;

        log::debug!("session torn down after {} frames", self.frames);

        Ok(())
    }
}
