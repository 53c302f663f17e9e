use anyhow::{bail, Result};
use gl::types::{GLenum, GLint, GLsizei, GLuint};

use super::check_gl_error;
use super::halffloat::half_to_float;

/// Pixel format of an off-screen render target, fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceFormat {
    /// Half-precision float, single channel. Used for intermediate
    /// coefficient stages: values may be negative and exceed [0, 1].
    CoefficientF16,
    /// 8-bit fixed-point RGB for the final displayable image.
    Rgb8,
}

impl SurfaceFormat {
    fn internal_format(self) -> GLenum {
        match self {
            SurfaceFormat::CoefficientF16 => gl::R16F,
            SurfaceFormat::Rgb8 => gl::RGB,
        }
    }

    fn pixel_format(self) -> GLenum {
        match self {
            SurfaceFormat::CoefficientF16 => gl::RED,
            SurfaceFormat::Rgb8 => gl::RGB,
        }
    }

    fn pixel_type(self) -> GLenum {
        match self {
            SurfaceFormat::CoefficientF16 => gl::HALF_FLOAT,
            SurfaceFormat::Rgb8 => gl::UNSIGNED_BYTE,
        }
    }

    fn filter(self) -> GLint {
        match self {
            // No interpolation is semantically valid between
            // independent coefficients.
            SurfaceFormat::CoefficientF16 => gl::NEAREST as GLint,
            SurfaceFormat::Rgb8 => gl::LINEAR as GLint,
        }
    }
}

/// An owned off-screen pixel store: a texture attached to a framebuffer
/// so one pass can render into it and a later pass can sample it.
pub struct Surface {
    framebuffer: GLuint,
    texture: GLuint,
    width: usize,
    height: usize,
    format: SurfaceFormat,
}

impl Drop for Surface {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteFramebuffers(1, &self.framebuffer);
            gl::DeleteTextures(1, &self.texture);
        }
    }
}

impl Surface {
    pub fn new(format: SurfaceFormat, width: usize, height: usize) -> Result<Self> {
        let mut framebuffer = 0;
        let mut texture = 0;

        unsafe {
            gl::GenTextures(1, &mut texture);
            gl::BindTexture(gl::TEXTURE_2D, texture);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, format.filter());
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, format.filter());
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
                format.internal_format() as GLint,
                width as GLsizei,
                height as GLsizei,
                0,
                format.pixel_format(),
                format.pixel_type(),
                core::ptr::null(),
            );
            gl::BindTexture(gl::TEXTURE_2D, 0);

            gl::GenFramebuffers(1, &mut framebuffer);
            gl::BindFramebuffer(gl::FRAMEBUFFER, framebuffer);
            gl::FramebufferTexture2D(
                gl::FRAMEBUFFER,
                gl::COLOR_ATTACHMENT0,
                gl::TEXTURE_2D,
                texture,
                0,
            );

            let status = gl::CheckFramebufferStatus(gl::FRAMEBUFFER);
            if status != gl::FRAMEBUFFER_COMPLETE {
                gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
                gl::DeleteFramebuffers(1, &framebuffer);
                gl::DeleteTextures(1, &texture);
                bail!(
                    "Incomplete framebuffer for {:?} target (status 0x{:x}); \
                     the backend may not support rendering to this format",
                    format,
                    status
                );
            }

            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
        }

        check_gl_error("surface creation")?;

        Ok(Self {
            framebuffer,
            texture,
            width,
            height,
            format,
        })
    }

    /// Binds this surface as the active render target with the viewport
    /// covering it exactly, so a full-screen quad invokes the fragment
    /// computation once per texel.
    pub fn bind_target(&self) {
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, self.framebuffer);
            gl::Viewport(0, 0, self.width as GLsizei, self.height as GLsizei);
        }
    }

    pub fn texture_object(&self) -> GLuint {
        self.texture
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reads the surface back to host memory, decoding the half floats.
    /// Verification/debug only; never part of the per-frame path.
    pub fn read_coefficients(&self) -> Result<Vec<f32>> {
        if self.format != SurfaceFormat::CoefficientF16 {
            bail!("Readback is only supported for coefficient surfaces");
        }

        let mut raw = vec![0u16; self.width * self.height];
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, self.framebuffer);
            gl::ReadPixels(
                0,
                0,
                self.width as GLsizei,
                self.height as GLsizei,
                gl::RED,
                gl::HALF_FLOAT,
                raw.as_mut_ptr() as *mut _,
            );
            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
        }
        check_gl_error("surface readback")?;

        Ok(raw.into_iter().map(half_to_float).collect())
    }
}
