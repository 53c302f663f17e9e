use std::sync::mpsc::Receiver;

use glfw::Context;

/// A window plus its event stream. The pipeline only needs the drawable
/// size, the swap primitive and a close signal; everything else stays
/// behind this wrapper.
pub struct Window {
    window: glfw::Window,
    events: Receiver<(f64, glfw::WindowEvent)>,
}

impl Window {
    pub(crate) fn from(window: glfw::Window, events: Receiver<(f64, glfw::WindowEvent)>) -> Self {
        Self { window, events }
    }

    /// Drawable size in pixels (width, height).
    pub fn size(&self) -> (u32, u32) {
        let (w, h) = self.window.get_framebuffer_size();
        (w as u32, h as u32)
    }

    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    pub fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    /// Drains pending events; Escape requests close.
    pub fn tick(&mut self) {
        for (_, event) in glfw::flush_messages(&self.events) {
            match event {
                glfw::WindowEvent::Key(glfw::Key::Escape, _, glfw::Action::Press, _) => {
                    self.window.set_should_close(true)
                }
                _ => {}
            }
        }
    }
}
