//! Demo: run the CPU forward path over a synthetic gradient, then let
//! the GPU dequantize, inverse-transform and display it every frame.

use anyhow::Result;
use codec::picture::Picture;
use codec::quantization::QuantizationTable;
use codec::transform;
use graphics::app::Application;
use graphics::pipeline::Pipeline;
use log::info;

const PICTURE_WIDTH: usize = 512;
const PICTURE_HEIGHT: usize = 512;
const WINDOW_SIZE: u32 = 1024;

fn main() -> Result<()> {
    env_logger::init();

    let picture = Picture::gradient(PICTURE_WIDTH, PICTURE_HEIGHT)?;
    let table = QuantizationTable::lossless();

    let packed = transform::encode_picture(&picture, &table);
    info!(
        "Encoded {}x{} picture ({} blocks per plane)",
        picture.width(),
        picture.height(),
        packed.y.num_blocks()
    );

    let mut app = Application::new()?;
    let mut window = app.create_window("Block Transform Viewer", WINDOW_SIZE, WINDOW_SIZE)?;

    let pipeline = Pipeline::new(&packed, &table, window.size())?;

    while !window.should_close() {
        pipeline.render_frame();
        window.swap_buffers();

        app.poll_events();
        window.tick();
    }

    Ok(())
}
