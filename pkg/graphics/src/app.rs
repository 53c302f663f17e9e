use std::ffi::CStr;

use anyhow::{anyhow, Result};
use glfw::Context;

use crate::window::Window;

/// Top-level context for a graphical application. Manages the GLFW
/// instance and window creation.
///
/// NOTE: This may only live on one thread.
pub struct Application {
    glfw_inst: glfw::Glfw,
}

impl Application {
    pub fn new() -> Result<Self> {
        let mut glfw_inst = glfw::init(glfw::FAIL_ON_ERRORS)
            .map_err(|e| anyhow!("GLFW initialization failed: {:?}", e))?;
        glfw_inst.window_hint(glfw::WindowHint::ContextVersion(3, 2));
        glfw_inst.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw_inst.window_hint(glfw::WindowHint::OpenGlProfile(
            glfw::OpenGlProfileHint::Core,
        ));
        glfw_inst.window_hint(glfw::WindowHint::Resizable(false));

        Ok(Self { glfw_inst })
    }

    pub fn create_window(&mut self, name: &str, width: u32, height: u32) -> Result<Window> {
        let (mut window, events) = self
            .glfw_inst
            .create_window(width, height, name, glfw::WindowMode::Windowed)
            .ok_or_else(|| anyhow!("Failed to create GLFW window"))?;

        window.set_key_polling(true);

        window.make_current();
        gl::load_with(|s| window.get_proc_address(s) as *const _);

        self.glfw_inst
            .set_swap_interval(glfw::SwapInterval::Sync(1));

        let version = unsafe {
            let ptr = gl::GetString(gl::VERSION);
            if ptr.is_null() {
                return Err(anyhow!("GL context reports no version string"));
            }
            CStr::from_ptr(ptr as *const _).to_string_lossy().into_owned()
        };
        info!("GL version: {}", version);

        Ok(Window::from(window, events))
    }

    pub fn poll_events(&mut self) {
        self.glfw_inst.poll_events();
    }
}
