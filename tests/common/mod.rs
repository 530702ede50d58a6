#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use gl::types::GLuint;

use hello_triangle::context::{GlContext, GlError};
use hello_triangle::program::ShaderStage;

pub const VERT_SRC: &str = "#version 330 core
layout (location = 0) in vec3 position;
void main() { gl_Position = vec4(position, 1.0); }
";

pub const FRAG_SRC: &str = "#version 330 core
out vec4 frag_color;
void main() { frag_color = vec4(1.0, 0.5, 0.2, 1.0); }
";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage, GLuint),
    ShaderSource(GLuint),
    CompileShader(GLuint),
    DeleteShader(GLuint),
    CreateProgram(GLuint),
    AttachShader(GLuint, GLuint),
    LinkProgram(GLuint),
    DetachShader(GLuint, GLuint),
    DeleteProgram(GLuint),
    UseProgram(GLuint),
    GenVertexArray(GLuint),
    BindVertexArray(GLuint),
    DeleteVertexArray(GLuint),
    GenBuffer(GLuint),
    BindArrayBuffer(GLuint),
    BufferData(usize),
    DeleteBuffer(GLuint),
    VertexAttribPointer {
        index: u32,
        components: usize,
        stride: usize,
        offset: usize,
    },
    EnableVertexAttribArray(u32),
    DrawTriangles {
        first: i32,
        count: i32,
    },
    SetClearColor([f32; 4]),
    Clear,
    Viewport(i32, i32, i32, i32),
}

/// A `GlContext` that records every call instead of touching a GPU.
///
/// Handles are sequential starting at 1. Compile/link failures and pending
/// error flags can be injected per test.
#[derive(Default)]
pub struct RecordingGl {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<GLuint>,
    stages: RefCell<Vec<(GLuint, ShaderStage)>>,
    pub fail_compile: Cell<Option<ShaderStage>>,
    pub fail_link: Cell<bool>,
    pub pending_errors: RefCell<Vec<GlError>>,
    pub viewport: Cell<(i32, i32, i32, i32)>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn alloc(&self) -> GLuint {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn stage_of(&self, shader: GLuint) -> Option<ShaderStage> {
        self.stages
            .borrow()
            .iter()
            .find(|(id, _)| *id == shader)
            .map(|(_, stage)| *stage)
    }
}

impl GlContext for RecordingGl {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        let id = self.alloc();
        self.stages.borrow_mut().push((id, stage));
        self.record(Call::CreateShader(stage, id));
        id
    }

    fn shader_source(&self, shader: GLuint, _src: &str) {
        self.record(Call::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: GLuint) {
        self.record(Call::CompileShader(shader));
    }

    fn compile_succeeded(&self, shader: GLuint) -> bool {
        self.fail_compile.get() != self.stage_of(shader)
    }

    fn shader_info_log(&self, _shader: GLuint) -> String {
        "0:3(1): error: syntax error, unexpected end of file".to_owned()
    }

    fn delete_shader(&self, shader: GLuint) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> GLuint {
        let id = self.alloc();
        self.record(Call::CreateProgram(id));
        id
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.record(Call::AttachShader(program, shader));
    }

    fn link_program(&self, program: GLuint) {
        self.record(Call::LinkProgram(program));
    }

    fn link_succeeded(&self, _program: GLuint) -> bool {
        !self.fail_link.get()
    }

    fn program_info_log(&self, _program: GLuint) -> String {
        "error: unresolved reference in fragment stage".to_owned()
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        self.record(Call::DetachShader(program, shader));
    }

    fn delete_program(&self, program: GLuint) {
        self.record(Call::DeleteProgram(program));
    }

    fn use_program(&self, program: GLuint) {
        self.record(Call::UseProgram(program));
    }

    fn gen_vertex_array(&self) -> GLuint {
        let id = self.alloc();
        self.record(Call::GenVertexArray(id));
        id
    }

    fn bind_vertex_array(&self, vao: GLuint) {
        self.record(Call::BindVertexArray(vao));
    }

    fn delete_vertex_array(&self, vao: GLuint) {
        self.record(Call::DeleteVertexArray(vao));
    }

    fn gen_buffer(&self) -> GLuint {
        let id = self.alloc();
        self.record(Call::GenBuffer(id));
        id
    }

    fn bind_array_buffer(&self, vbo: GLuint) {
        self.record(Call::BindArrayBuffer(vbo));
    }

    fn array_buffer_data(&self, data: &[f32]) {
        self.record(Call::BufferData(data.len()));
    }

    fn delete_buffer(&self, vbo: GLuint) {
        self.record(Call::DeleteBuffer(vbo));
    }

    fn vertex_attrib_pointer(&self, index: u32, components: usize, stride: usize, offset: usize) {
        self.record(Call::VertexAttribPointer {
            index,
            components,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.record(Call::DrawTriangles { first, count });
    }

    fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(Call::SetClearColor([r, g, b, a]));
    }

    fn clear_color_buffer(&self) {
        self.record(Call::Clear);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.viewport.set((x, y, width, height));
        self.record(Call::Viewport(x, y, width, height));
    }

    fn poll_error(&self) -> Option<GlError> {
        let mut pending = self.pending_errors.borrow_mut();
        if pending.is_empty() {
            None
        } else {
            Some(pending.remove(0))
        }
    }
}
