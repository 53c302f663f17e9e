use std::ffi::CString;

use anyhow::{bail, Result};
use gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};

const MAX_ERROR_LENGTH: GLsizei = 2048;

/// Value bound to a named uniform. An explicit tag, not an arity
/// heuristic: a one-element scalar array is still a scalar array.
pub enum UniformValue {
    /// A texture sampled by the shader. Assigned the next free texture
    /// unit in declaration order.
    Sampler(GLuint),
    /// A float array uploaded by value once at link time.
    ScalarArray(Vec<f32>),
}

pub struct UniformBinding {
    pub name: &'static str,
    pub value: UniformValue,
}

impl UniformBinding {
    pub fn sampler(name: &'static str, texture: GLuint) -> Self {
        Self {
            name,
            value: UniformValue::Sampler(texture),
        }
    }

    pub fn scalar_array(name: &'static str, values: Vec<f32>) -> Self {
        Self {
            name,
            value: UniformValue::ScalarArray(values),
        }
    }
}

/// A linked vertex/fragment program with its uniform bindings resolved.
///
/// Scalar-array values are fixed once at link time. Sampler bindings
/// are re-asserted on every `activate` call, since the same texture
/// units are reused by every pass in the frame.
pub struct Program {
    program: GLuint,
    /// Texture object for each texture unit, in declaration order.
    samplers: Vec<GLuint>,
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.program) };
    }
}

impl Program {
    pub fn link(
        vertex_src: &str,
        fragment_src: &str,
        bindings: Vec<UniformBinding>,
    ) -> Result<Self> {
        let program = unsafe { gl::CreateProgram() };

        for &(typ, src) in [
            (gl::VERTEX_SHADER, vertex_src),
            (gl::FRAGMENT_SHADER, fragment_src),
        ]
        .iter()
        {
            let shader = compile_shader(typ, src)?;
            unsafe {
                gl::AttachShader(program, shader);
                // The program keeps the shader alive until detach.
                gl::DeleteShader(shader);
            }
        }

        unsafe { gl::LinkProgram(program) };

        let mut status = gl::FALSE as GLint;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut status) };
        if status != (gl::TRUE as GLint) {
            let mut length = MAX_ERROR_LENGTH;
            let mut error_log = vec![0u8; length as usize];
            unsafe {
                gl::GetProgramInfoLog(
                    program,
                    length,
                    &mut length,
                    error_log.as_mut_ptr() as *mut GLchar,
                );
            }
            let length = (length.max(0) as usize).min(error_log.len());
            bail!(
                "Program failed to link: {}",
                String::from_utf8_lossy(&error_log[..length])
            );
        }

        unsafe { gl::UseProgram(program) };

        let mut samplers = Vec::new();
        for binding in &bindings {
            let location = uniform_location(program, binding.name)?;
            match &binding.value {
                UniformValue::Sampler(texture) => {
                    unsafe { gl::Uniform1i(location, samplers.len() as GLint) };
                    samplers.push(*texture);
                }
                UniformValue::ScalarArray(values) => unsafe {
                    gl::Uniform1fv(location, values.len() as GLsizei, values.as_ptr());
                },
            }
        }

        Ok(Self { program, samplers })
    }

    /// Makes this program current and rebinds every sampler to its
    /// texture unit.
    pub fn activate(&self) {
        unsafe { gl::UseProgram(self.program) };
        for (unit, texture) in self.samplers.iter().enumerate() {
            unsafe {
                gl::ActiveTexture(gl::TEXTURE0 + unit as GLenum);
                gl::BindTexture(gl::TEXTURE_2D, *texture);
            }
        }
    }
}

fn compile_shader(typ: GLenum, src: &str) -> Result<GLuint> {
    let shader = unsafe { gl::CreateShader(typ) };
    let strings = [src.as_ptr() as *const GLchar];
    let lengths = [src.len() as GLint];
    unsafe {
        gl::ShaderSource(shader, 1, strings.as_ptr(), lengths.as_ptr());
        gl::CompileShader(shader);
    }

    let mut status = gl::FALSE as GLint;
    unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status) };

    if status != (gl::TRUE as GLint) {
        let mut length = MAX_ERROR_LENGTH;
        let mut error_log = vec![0u8; length as usize];
        unsafe {
            gl::GetShaderInfoLog(
                shader,
                length,
                &mut length,
                error_log.as_mut_ptr() as *mut GLchar,
            );
        }
        let length = (length.max(0) as usize).min(error_log.len());
        bail!(
            "Shader failed to compile: {}",
            String::from_utf8_lossy(&error_log[..length])
        );
    }

    Ok(shader)
}

fn uniform_location(program: GLuint, name: &'static str) -> Result<GLint> {
    let c_name = CString::new(name)?;
    let location = unsafe { gl::GetUniformLocation(program, c_name.as_ptr()) };
    if location < 0 {
        // Also hit if the compiler optimized the uniform away, which
        // means the binding list disagrees with the shader source.
        bail!("Uniform '{}' not found in program", name);
    }
    Ok(location)
}
