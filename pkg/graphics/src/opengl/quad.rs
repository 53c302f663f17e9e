use core::ptr::null;

use anyhow::Result;
use gl::types::{GLsizei, GLuint};

use super::check_gl_error;

/// The full-screen quad every pass draws: two triangles covering clip
/// space, with texture coordinates spanning [0, 1].
pub struct FullScreenQuad {
    vao: GLuint,
    vertex_buffer: GLuint,
    index_buffer: GLuint,
}

impl Drop for FullScreenQuad {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vertex_buffer);
            gl::DeleteBuffers(1, &self.index_buffer);
        }
    }
}

impl FullScreenQuad {
    pub fn new() -> Result<Self> {
        // pos.xy, tex.uv
        const VERTICES: [f32; 16] = [
            -1.0, -1.0, 0.0, 0.0, //
            1.0, -1.0, 1.0, 0.0, //
            1.0, 1.0, 1.0, 1.0, //
            -1.0, 1.0, 0.0, 1.0,
        ];
        const INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

        let mut vao = 0;
        let mut vertex_buffer = 0;
        let mut index_buffer = 0;

        let stride = (4 * core::mem::size_of::<f32>()) as GLsizei;

        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vertex_buffer);
            gl::GenBuffers(1, &mut index_buffer);
            gl::BindVertexArray(vao);

            gl::BindBuffer(gl::ARRAY_BUFFER, vertex_buffer);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                core::mem::size_of_val(&VERTICES) as isize,
                VERTICES.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, index_buffer);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                core::mem::size_of_val(&INDICES) as isize,
                INDICES.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::VertexAttribPointer(0, 2, gl::FLOAT, gl::FALSE, stride, null());
            gl::EnableVertexAttribArray(0);
            gl::VertexAttribPointer(
                1,
                2,
                gl::FLOAT,
                gl::FALSE,
                stride,
                (2 * core::mem::size_of::<f32>()) as *const _,
            );
            gl::EnableVertexAttribArray(1);

            gl::BindVertexArray(0);
        }

        check_gl_error("full-screen quad setup")?;

        Ok(Self {
            vao,
            vertex_buffer,
            index_buffer,
        })
    }

    /// Issues the one draw call of a pass: the fragment shader runs
    /// once for every pixel of the bound target.
    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawElements(gl::TRIANGLES, 6, gl::UNSIGNED_INT, null());
        }
    }
}
