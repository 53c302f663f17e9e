//! Construction and per-frame sequencing of the render passes.
//!
//! Pass order is the only dependency mechanism: a pass may read a
//! surface only if an earlier pass in the same frame wrote it. The
//! pipeline exclusively owns every texture, surface and program it
//! creates.

use anyhow::Result;
use codec::picture::{PackedPicture, PackedPlane};
use codec::quantization::QuantizationTable;

use crate::opengl::quad::FullScreenQuad;
use crate::opengl::shader::{Program, UniformBinding};
use crate::opengl::surface::{Surface, SurfaceFormat};
use crate::opengl::texture::Texture;
use crate::shaders;

/// One dequantize stage: a packed zigzag-scan input texture rendered
/// through the dequantize program into a half-float coefficient
/// surface.
struct DequantizePass {
    program: Program,
    output: Surface,
    // Owns the input texture for as long as the program references it.
    _input: Texture,
}

pub struct Pipeline {
    quad: FullScreenQuad,
    dequantize: [DequantizePass; 3],
    reconstruct: Program,
    rgb_surface: Surface,
    present: Program,
    window_width: u32,
    window_height: u32,
}

fn build_dequantize_pass(
    plane: &PackedPlane,
    table: &QuantizationTable,
    fragment_src: &str,
) -> Result<DequantizePass> {
    let input = Texture::from_packed_plane(plane)?;
    let output = Surface::new(SurfaceFormat::CoefficientF16, plane.width(), plane.height())?;
    let program = Program::link(
        shaders::PASS_THROUGH_VERTEX,
        fragment_src,
        vec![
            UniformBinding::sampler("scan_coeffs", input.object()),
            UniformBinding::scalar_array("quant_table", table.factors().to_vec()),
        ],
    )?;

    Ok(DequantizePass {
        program,
        output,
        _input: input,
    })
}

impl Pipeline {
    /// Uploads the three packed channel textures and builds every pass.
    /// Requires a current GL context; all failures here are fatal to
    /// the caller since nothing downstream can recover from a missing
    /// resource.
    pub fn new(
        picture: &PackedPicture,
        table: &QuantizationTable,
        window_size: (u32, u32),
    ) -> Result<Self> {
        let width = picture.width();
        let height = picture.height();

        let dequantize_fragment = shaders::dequantize_fragment_source();
        // One program per channel: same source, but each bakes in its
        // own input sampler so per-frame uniform churn is zero.
        let dequantize = [
            build_dequantize_pass(&picture.y, table, &dequantize_fragment)?,
            build_dequantize_pass(&picture.u, table, &dequantize_fragment)?,
            build_dequantize_pass(&picture.v, table, &dequantize_fragment)?,
        ];

        let reconstruct = Program::link(
            shaders::PASS_THROUGH_VERTEX,
            shaders::RECONSTRUCT_FRAGMENT,
            vec![
                UniformBinding::sampler("coeffs_y", dequantize[0].output.texture_object()),
                UniformBinding::sampler("coeffs_u", dequantize[1].output.texture_object()),
                UniformBinding::sampler("coeffs_v", dequantize[2].output.texture_object()),
            ],
        )?;
        let rgb_surface = Surface::new(SurfaceFormat::Rgb8, width, height)?;

        let present = Program::link(
            shaders::PASS_THROUGH_VERTEX,
            shaders::PRESENT_FRAGMENT,
            vec![UniformBinding::sampler(
                "rgb_tex",
                rgb_surface.texture_object(),
            )],
        )?;

        let quad = FullScreenQuad::new()?;

        info!(
            "Pipeline ready: {}x{} picture, {} passes per frame",
            width,
            height,
            dequantize.len() + 2
        );

        Ok(Self {
            quad,
            dequantize,
            reconstruct,
            rgb_surface,
            present,
            window_width: window_size.0,
            window_height: window_size.1,
        })
    }

    /// Runs the full pass sequence for one frame. Strict order:
    /// dequantize Y, U, V; reconstruct; present. Each draw is issued
    /// against the in-order GL command stream, so a pass's writes are
    /// visible to every later read in the same frame.
    pub fn render_frame(&self) {
        for pass in &self.dequantize {
            pass.output.bind_target();
            unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) };
            pass.program.activate();
            self.quad.draw();
        }

        self.rgb_surface.bind_target();
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) };
        self.reconstruct.activate();
        self.quad.draw();

        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
            gl::Viewport(
                0,
                0,
                self.window_width as gl::types::GLsizei,
                self.window_height as gl::types::GLsizei,
            );
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
        self.present.activate();
        self.quad.draw();
    }

    /// Reads back one channel's dequantized coefficients (0 = Y, 1 = U,
    /// 2 = V) after a frame has rendered. Debug/verification only.
    pub fn read_dequantized(&self, channel: usize) -> Result<Vec<f32>> {
        self.dequantize[channel].output.read_coefficients()
    }
}
