use gl::types::GLuint;
use thiserror::Error;

use crate::context::GlContext;

/// One compiled unit of a program, before linking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("failed to compile {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("failed to link program: {log}")]
    Link { log: String },
    #[error("program handle already destroyed")]
    InvalidHandle,
}

pub struct ProgramBuilder {
    vert: String,
    frag: String,
}

impl ProgramBuilder {
    /// Sources are explicit text; callers resolve any file paths beforehand.
    pub fn new(vert_src: &str, frag_src: &str) -> Self {
        Self {
            vert: vert_src.to_owned(),
            frag: frag_src.to_owned(),
        }
    }

    /// Compiles both stages and links them into one program object.
    ///
    /// A compile failure in either stage stops before linking. Stage objects
    /// are deleted on every path, including the successful one, where they
    /// are detached first since the linked program fully consumes them.
    pub fn build(self, gl: &impl GlContext) -> Result<Program, ProgramError> {
        let vert = compile_stage(gl, ShaderStage::Vertex, &self.vert)?;

        let frag = match compile_stage(gl, ShaderStage::Fragment, &self.frag) {
            Ok(frag) => frag,
            Err(e) => {
                gl.delete_shader(vert);
                return Err(e);
            }
        };

        let program = gl.create_program();
        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);

        if !gl.link_succeeded(program) {
            let log = gl.program_info_log(program);

            gl.delete_program(program);
            gl.delete_shader(vert);
            gl.delete_shader(frag);

            return Err(ProgramError::Link { log });
        }

        gl.detach_shader(program, vert);
        gl.detach_shader(program, frag);
        gl.delete_shader(vert);
        gl.delete_shader(frag);

        Ok(Program { id: program })
    }
}

fn compile_stage(
    gl: &impl GlContext,
    stage: ShaderStage,
    src: &str,
) -> Result<GLuint, ProgramError> {
    let shader = gl.create_shader(stage);
    gl.shader_source(shader, src);
    gl.compile_shader(shader);

    if !gl.compile_succeeded(shader) {
        let log = gl.shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(ProgramError::Compile { stage, log });
    }

    Ok(shader)
}

/// A linked shader program. The id stays valid until `destroy`.
#[derive(Debug)]
pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Makes this program current for subsequent draws on the context.
    pub fn bind(&self, gl: &impl GlContext) -> Result<(), ProgramError> {
        if self.id == 0 {
            return Err(ProgramError::InvalidHandle);
        }

        gl.use_program(self.id);
        Ok(())
    }

    /// Releases the program object. A second call reports `InvalidHandle`.
    pub fn destroy(&mut self, gl: &impl GlContext) -> Result<(), ProgramError> {
        if self.id == 0 {
            return Err(ProgramError::InvalidHandle);
        }

        gl.delete_program(self.id);
        self.id = 0;
        Ok(())
    }
}
