use gl::types::GLuint;
use thiserror::Error;

use crate::context::GlContext;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("vertex data length is not a multiple of the attribute layout")]
    InvalidDataLength,
    #[error("draw requested {requested} vertices but {uploaded} were uploaded")]
    VertexCountMismatch { requested: usize, uploaded: usize },
    #[error("geometry handles already destroyed")]
    InvalidHandle,
}

pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
}

impl VertexAttribute {
    pub fn components(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
        }
    }
}

pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    data: &'a [f32],
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Allocates the vertex-array and buffer pair and records the layout.
    ///
    /// The VAO must be bound before the attribute-pointer calls or the
    /// layout association is not recorded; build ends with both the buffer
    /// and the array object unbound so no global bind state leaks.
    pub fn build(self, gl: &impl GlContext) -> Result<Geometry, GeometryError> {
        let stride: usize = self.attributes.iter().map(|a| a.components()).sum();

        if stride == 0 || self.data.len() % stride != 0 {
            return Err(GeometryError::InvalidDataLength);
        }

        let vao = gl.gen_vertex_array();
        let vbo = gl.gen_buffer();

        gl.bind_vertex_array(vao);
        gl.bind_array_buffer(vbo);
        gl.array_buffer_data(self.data);

        let mut offset = 0;
        for (i, attr) in self.attributes.iter().enumerate() {
            gl.vertex_attrib_pointer(i as u32, attr.components(), stride, offset);
            gl.enable_vertex_attrib_array(i as u32);
            offset += attr.components();
        }

        gl.bind_array_buffer(0);
        gl.bind_vertex_array(0);

        let vertices = self.data.len() / stride;

        Ok(Geometry { vao, vbo, vertices })
    }
}

/// A vertex buffer and the vertex-array object describing its layout.
/// The two handles are created as a pair and destroyed as a pair.
#[derive(Debug)]
pub struct Geometry {
    vao: GLuint,
    vbo: GLuint,
    vertices: usize,
}

impl Geometry {
    pub fn vao(&self) -> GLuint {
        self.vao
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    /// Issues one triangle-list draw of `vertex_count` vertices.
    ///
    /// `vertex_count` must match the uploaded count; a mismatch is reported
    /// without any GPU submission.
    pub fn draw(&self, gl: &impl GlContext, vertex_count: usize) -> Result<(), GeometryError> {
        if self.vao == 0 {
            return Err(GeometryError::InvalidHandle);
        }

        if vertex_count != self.vertices {
            return Err(GeometryError::VertexCountMismatch {
                requested: vertex_count,
                uploaded: self.vertices,
            });
        }

        gl.bind_vertex_array(self.vao);
        gl.draw_triangles(0, vertex_count as i32);
        gl.bind_vertex_array(0);

        Ok(())
    }

    /// Deletes buffer then array object. A second call reports `InvalidHandle`.
    pub fn destroy(&mut self, gl: &impl GlContext) -> Result<(), GeometryError> {
        if self.vao == 0 {
            return Err(GeometryError::InvalidHandle);
        }

        gl.delete_buffer(self.vbo);
        gl.delete_vertex_array(self.vao);

        self.vbo = 0;
        self.vao = 0;

        Ok(())
    }
}
