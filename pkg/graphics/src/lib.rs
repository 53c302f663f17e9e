//! GPU side of the block-transform pipeline: GLFW window bootstrap,
//! OpenGL resource wrappers and the three-stage render pipeline that
//! dequantizes, inverse-transforms and color-converts packed
//! coefficient textures back into a displayable image.

extern crate anyhow;
extern crate codec;
extern crate gl;
extern crate glfw;
#[macro_use]
extern crate log;

pub mod app;
pub mod opengl;
pub mod pipeline;
pub mod shaders;
pub mod window;
