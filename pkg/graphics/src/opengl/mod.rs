use anyhow::{bail, Result};

pub mod halffloat;
pub mod quad;
pub mod shader;
pub mod surface;
pub mod texture;

/// Drains the GL error queue, failing with every pending error code.
/// Any flagged state here is fatal: a broken resource invalidates all
/// downstream passes.
pub fn check_gl_error(context: &str) -> Result<()> {
    let mut codes = Vec::new();
    loop {
        let err = unsafe { gl::GetError() };
        if err == gl::NO_ERROR {
            break;
        }
        codes.push(err);
    }

    if !codes.is_empty() {
        let text = codes
            .iter()
            .map(|c| format!("0x{:x}", c))
            .collect::<Vec<_>>()
            .join(", ");
        bail!("OpenGL error during {}: {}", context, text);
    }
    Ok(())
}
