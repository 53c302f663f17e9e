use anyhow::{bail, Result};

use crate::constants::{BLOCK_DIM, BLOCK_SIZE};

/// One channel of an image: a row-major rectangle of f32 samples.
///
/// The width must be a multiple of 64 so that a whole number of packed
/// blocks fits on each texture row, and the height a multiple of 8 so
/// that 8x8 blocks partition the plane exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    pub(crate) data: Vec<f32>,
    pub(crate) width: usize,
    pub(crate) height: usize,
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        bail!("Zero-sized plane: {}x{}", width, height);
    }
    if width % BLOCK_SIZE != 0 {
        bail!(
            "Plane width {} is not a multiple of {} (packed layout requirement)",
            width,
            BLOCK_SIZE
        );
    }
    if height % BLOCK_DIM != 0 {
        bail!(
            "Plane height {} is not a multiple of the block size {}",
            height,
            BLOCK_DIM
        );
    }
    Ok(())
}

impl Plane {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            data: vec![0.0; width * height],
            width,
            height,
        })
    }

    pub fn from_fn<F: FnMut(usize, usize) -> f32>(
        width: usize,
        height: usize,
        mut f: F,
    ) -> Result<Self> {
        let mut plane = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                plane.data[y * width + x] = f(x, y);
            }
        }
        Ok(plane)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// A plane's worth of 8x8 block coefficients in the packed layout: each
/// block's 64 values are stored contiguously, blocks in raster order.
///
/// Same storage shape as a `Plane` (a WxH plane has exactly W*H
/// coefficients), but a distinct type so that raster samples and packed
/// coefficients can't be passed where the other is expected.
#[derive(Clone, Debug, PartialEq)]
pub struct PackedPlane {
    pub(crate) data: Vec<f32>,
    pub(crate) width: usize,
    pub(crate) height: usize,
}

impl PackedPlane {
    pub(crate) fn zeroed(width: usize, height: usize) -> Self {
        // Only reachable from a validated Plane or PackedPlane.
        Self {
            data: vec![0.0; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn num_blocks(&self) -> usize {
        self.width * self.height / BLOCK_SIZE
    }
}

/// Three same-sized planes: luma plus two chroma channels.
#[derive(Clone, Debug)]
pub struct Picture {
    pub y: Plane,
    pub u: Plane,
    pub v: Plane,
}

impl Picture {
    pub fn new(y: Plane, u: Plane, v: Plane) -> Result<Self> {
        if (y.width, y.height) != (u.width, u.height) || (y.width, y.height) != (v.width, v.height)
        {
            bail!(
                "Picture planes disagree in size: Y {}x{}, U {}x{}, V {}x{}",
                y.width,
                y.height,
                u.width,
                u.height,
                v.width,
                v.height
            );
        }
        Ok(Self { y, u, v })
    }

    /// Synthetic test source: luma ramps with x*y, both chroma channels
    /// sit at a constant 200/255.
    pub fn gradient(width: usize, height: usize) -> Result<Self> {
        let scale = (width * height) as f32;
        let y = Plane::from_fn(width, height, |x, y| (x * y) as f32 / scale)?;
        let u = Plane::from_fn(width, height, |_, _| 200.0 / 255.0)?;
        let v = u.clone();
        Picture::new(y, u, v)
    }

    pub fn width(&self) -> usize {
        self.y.width
    }

    pub fn height(&self) -> usize {
        self.y.height
    }
}

/// The packed-coefficient counterpart of a `Picture`.
#[derive(Clone, Debug)]
pub struct PackedPicture {
    pub y: PackedPlane,
    pub u: PackedPlane,
    pub v: PackedPlane,
}

impl PackedPicture {
    pub fn width(&self) -> usize {
        self.y.width
    }

    pub fn height(&self) -> usize {
        self.y.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_dimension_validation() {
        assert!(Plane::new(128, 64).is_ok());
        // Width must be a multiple of 64, not just 8.
        assert!(Plane::new(72, 64).is_err());
        assert!(Plane::new(128, 60).is_err());
        assert!(Plane::new(0, 64).is_err());
    }

    #[test]
    fn picture_plane_sizes_must_agree() {
        let a = Plane::new(128, 64).unwrap();
        let b = Plane::new(128, 128).unwrap();
        assert!(Picture::new(a.clone(), a.clone(), a.clone()).is_ok());
        assert!(Picture::new(a.clone(), b, a).is_err());
    }

    #[test]
    fn gradient_shape() {
        let picture = Picture::gradient(512, 512).unwrap();
        assert_eq!(picture.y.data[0], 0.0);
        let last = picture.y.data[512 * 512 - 1];
        assert!((last - (511.0 * 511.0 / (512.0 * 512.0))).abs() < 1e-6);
        for v in picture.u.data.iter().take(16) {
            assert_eq!(*v, 200.0 / 255.0);
        }
    }
}
