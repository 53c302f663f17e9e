//! CPU side of the block-transform pipeline: planar pictures, the 8x8
//! forward/inverse DCT, quantization, zigzag reordering and the packed
//! block layout shared with the GPU shaders.

extern crate anyhow;
#[macro_use]
extern crate lazy_static;

pub mod color;
pub mod constants;
pub mod dct;
pub mod layout;
pub mod picture;
pub mod quantization;
pub mod transform;
pub mod zigzag;
