//! Presentation sink backed by the shared screen buffer
//!
//! The controller renders into a local `Renderer` and hands changed
//! screens to the display task. It never waits for the display: if the
//! display task holds the buffer, the frame is skipped and retried on the
//! next tick.

use lightgate_core::traits::{PresentationSink, SinkError, View};
use lightgate_display::Renderer;

use crate::channels::{SCREEN_BUFFER, SCREEN_UPDATE};

pub struct ScreenPublisher {
    renderer: Renderer,
}

impl ScreenPublisher {
    pub const fn new() -> Self {
        Self {
            renderer: Renderer::new(),
        }
    }
}

impl PresentationSink for ScreenPublisher {
    fn present(&mut self, view: &View<'_>) -> Result<(), SinkError> {
        let screen = self.renderer.render(view);
        if !screen.is_dirty() {
            return Ok(());
        }

        let mut buffer = SCREEN_BUFFER.try_lock().map_err(|_| SinkError::Busy)?;
        *buffer = screen.clone();
        drop(buffer);

        self.renderer.mark_clean();
        SCREEN_UPDATE.signal(());
        Ok(())
    }
}
