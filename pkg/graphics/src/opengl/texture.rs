use anyhow::Result;
use codec::picture::PackedPlane;
use gl::types::{GLint, GLsizei, GLuint};

use super::check_gl_error;

/// An immutable GPU texture holding CPU-produced packed coefficients.
pub struct Texture {
    object: GLuint,
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe { gl::DeleteTextures(1, &self.object) };
    }
}

impl Texture {
    /// Uploads a packed coefficient plane as a single-channel 32-bit
    /// float texture. Filtering is nearest-neighbor: interpolating
    /// between independent coefficients would be meaningless.
    pub fn from_packed_plane(plane: &PackedPlane) -> Result<Self> {
        let mut object = 0;
        unsafe {
            gl::GenTextures(1, &mut object);
            gl::BindTexture(gl::TEXTURE_2D, object);

            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::NEAREST as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::NEAREST as GLint);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_WRAP_S,
                gl::CLAMP_TO_EDGE as GLint,
            );
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_WRAP_T,
                gl::CLAMP_TO_EDGE as GLint,
            );

            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::R32F as GLint,
                plane.width() as GLsizei,
                plane.height() as GLsizei,
                0,
                gl::RED,
                gl::FLOAT,
                plane.data().as_ptr() as *const _,
            );

            gl::BindTexture(gl::TEXTURE_2D, 0);
        }

        check_gl_error("packed plane upload")?;
        Ok(Self { object })
    }

    pub fn object(&self) -> GLuint {
        self.object
    }
}
