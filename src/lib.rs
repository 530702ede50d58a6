//! GPU resource lifecycle and render-loop protocol for a minimal
//! one-triangle OpenGL session. The windowing layer lives in the `viewer`
//! binary; this library only ever sees the GL context it is handed.

/// The canonical triangle, three vertices of three floats each.
#[rustfmt::skip]
pub const TRIANGLE: [f32; 9] = [
    -0.5, -0.5, 0.0,
    0.5, -0.5, 0.0,
    0.0, 0.5, 0.0,
];

pub mod context;
pub mod geometry;
pub mod program;
pub mod session;
