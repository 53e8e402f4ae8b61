use anyhow::Result;
use minifb::{Key, Window, WindowOptions};

use crate::config::CanvasConfig;
use crate::render::Canvas;

/// Where finished canvases are shown.
pub trait Surface {
    /// Polls window events. `true` once the user asked to quit.
    fn should_close(&mut self) -> bool;

    fn present(&mut self, canvas: &Canvas) -> Result<()>;
}

/// Fixed-size minifb window. Closing it or pressing Escape ends the loop.
pub struct MinifbSurface {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    // Events are only pumped by an update; skipped frames need one too.
    presented: bool,
}

impl MinifbSurface {
    pub fn new(cfg: &CanvasConfig) -> Result<Self> {
        let width = cfg.width as usize;
        let height = cfg.height as usize;
        let window = Window::new(
            &cfg.title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        Ok(Self {
            window,
            buffer: vec![0u32; width * height],
            width,
            height,
            presented: false,
        })
    }
}

impl Surface for MinifbSurface {
    fn should_close(&mut self) -> bool {
        if !std::mem::take(&mut self.presented) {
            self.window.update();
        }
        !self.window.is_open() || self.window.is_key_down(Key::Escape)
    }

    fn present(&mut self, canvas: &Canvas) -> Result<()> {
        canvas.write_0rgb(&mut self.buffer);
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)?;
        self.presented = true;
        Ok(())
    }
}
