use std::ffi::{c_char, c_void, CString};

use gl::types::{GLenum, GLuint};

use crate::program::ShaderStage;

/// The GL entry points this crate issues, behind one seam.
///
/// `RawGl` forwards to the loaded `gl` bindings and is the only unsafe code
/// in the crate. Tests substitute a recording implementation, which is what
/// makes the lifecycle protocol checkable without a live context.
pub trait GlContext {
    fn create_shader(&self, stage: ShaderStage) -> GLuint;
    fn shader_source(&self, shader: GLuint, src: &str);
    fn compile_shader(&self, shader: GLuint);
    fn compile_succeeded(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn link_succeeded(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn delete_program(&self, program: GLuint);
    fn use_program(&self, program: GLuint);

    fn gen_vertex_array(&self) -> GLuint;
    fn bind_vertex_array(&self, vao: GLuint);
    fn delete_vertex_array(&self, vao: GLuint);

    fn gen_buffer(&self) -> GLuint;
    fn bind_array_buffer(&self, vbo: GLuint);
    /// Uploads into the currently bound array buffer with the static usage hint.
    fn array_buffer_data(&self, data: &[f32]);
    fn delete_buffer(&self, vbo: GLuint);

    fn vertex_attrib_pointer(&self, index: u32, components: usize, stride: usize, offset: usize);
    fn enable_vertex_attrib_array(&self, index: u32);

    fn draw_triangles(&self, first: i32, count: i32);

    fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear_color_buffer(&self);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);

    /// Reads and clears one pending error flag, `None` when clean.
    fn poll_error(&self) -> Option<GlError>;
}

/// A decoded `glGetError` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlError {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    InvalidFramebufferOperation,
    OutOfMemory,
    Unknown(GLenum),
}

impl GlError {
    pub fn from_raw(code: GLenum) -> Option<Self> {
        match code {
            gl::NO_ERROR => None,
            gl::INVALID_ENUM => Some(Self::InvalidEnum),
            gl::INVALID_VALUE => Some(Self::InvalidValue),
            gl::INVALID_OPERATION => Some(Self::InvalidOperation),
            gl::INVALID_FRAMEBUFFER_OPERATION => Some(Self::InvalidFramebufferOperation),
            gl::OUT_OF_MEMORY => Some(Self::OutOfMemory),
            other => Some(Self::Unknown(other)),
        }
    }
}

impl std::fmt::Display for GlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEnum => write!(f, "GL_INVALID_ENUM"),
            Self::InvalidValue => write!(f, "GL_INVALID_VALUE"),
            Self::InvalidOperation => write!(f, "GL_INVALID_OPERATION"),
            Self::InvalidFramebufferOperation => write!(f, "GL_INVALID_FRAMEBUFFER_OPERATION"),
            Self::OutOfMemory => write!(f, "GL_OUT_OF_MEMORY"),
            Self::Unknown(code) => write!(f, "unknown GL error {code:#06x}"),
        }
    }
}

/// Production implementation over the loaded `gl` bindings.
///
/// `gl::load_with` must have run on the current context before any call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawGl;

impl RawGl {
    pub fn new() -> Self {
        Self
    }
}

fn read_info_log(len: i32, read: impl FnOnce(i32, *mut i32, *mut c_char)) -> String {
    let mut buf = vec![0_u8; len.max(1) as usize];
    let mut written = 0;

    read(buf.len() as i32, &mut written, buf.as_mut_ptr() as *mut c_char);

    buf.truncate(written.clamp(0, len) as usize);
    String::from_utf8_lossy(&buf).into_owned()
}

impl GlContext for RawGl {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        let kind = match stage {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        };
        unsafe { gl::CreateShader(kind) }
    }

    fn shader_source(&self, shader: GLuint, src: &str) {
        // GLSL source text never contains interior nul bytes.
        let src = CString::new(src).unwrap();
        unsafe {
            gl::ShaderSource(
                shader,
                1,
                (&src.as_ptr()) as *const *const c_char,
                std::ptr::null(),
            );
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) }
    }

    fn compile_succeeded(&self, shader: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success) };
        success == 1
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len = 0;
        unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len) };
        read_info_log(len, |cap, written, buf| unsafe {
            gl::GetShaderInfoLog(shader, cap, written, buf)
        })
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn link_succeeded(&self, program: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut success) };
        success == 1
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len = 0;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len) };
        read_info_log(len, |cap, written, buf| unsafe {
            gl::GetProgramInfoLog(program, cap, written, buf)
        })
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn gen_vertex_array(&self) -> GLuint {
        let mut vao = 0;
        unsafe { gl::GenVertexArrays(1, &mut vao) };
        vao
    }

    fn bind_vertex_array(&self, vao: GLuint) {
        unsafe { gl::BindVertexArray(vao) }
    }

    fn delete_vertex_array(&self, vao: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, (&vao) as *const GLuint) }
    }

    fn gen_buffer(&self) -> GLuint {
        let mut vbo = 0;
        unsafe { gl::GenBuffers(1, &mut vbo) };
        vbo
    }

    fn bind_array_buffer(&self, vbo: GLuint) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, vbo) }
    }

    fn array_buffer_data(&self, data: &[f32]) {
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (data.len() * std::mem::size_of::<f32>()) as isize,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );
        }
    }

    fn delete_buffer(&self, vbo: GLuint) {
        unsafe { gl::DeleteBuffers(1, (&vbo) as *const GLuint) }
    }

    fn vertex_attrib_pointer(&self, index: u32, components: usize, stride: usize, offset: usize) {
        unsafe {
            gl::VertexAttribPointer(
                index,
                components as i32,
                gl::FLOAT,
                gl::FALSE,
                (stride * std::mem::size_of::<f32>()) as i32,
                (offset * std::mem::size_of::<f32>()) as *const c_void,
            );
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        unsafe { gl::DrawArrays(gl::TRIANGLES, first, count) }
    }

    fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    fn clear_color_buffer(&self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { gl::Viewport(x, y, width, height) }
    }

    fn poll_error(&self) -> Option<GlError> {
        GlError::from_raw(unsafe { gl::GetError() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_decode() {
        assert_eq!(GlError::from_raw(gl::NO_ERROR), None);
        assert_eq!(
            GlError::from_raw(gl::INVALID_OPERATION),
            Some(GlError::InvalidOperation)
        );
        assert_eq!(GlError::from_raw(0x1234), Some(GlError::Unknown(0x1234)));

        assert_eq!(GlError::InvalidEnum.to_string(), "GL_INVALID_ENUM");
        assert_eq!(
            GlError::Unknown(0x1234).to_string(),
            "unknown GL error 0x1234"
        );
    }
}
