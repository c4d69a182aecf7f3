use anyhow::Result;
use tracing::debug;
use usls::{Image, Key, Viewer};

/// Window title for the preview
pub const WINDOW_TITLE: &str = "Gesture Control";

/// Display surface for processed frames
pub trait Display {
    /// Renders one frame
    fn show(&mut self, frame: &Image) -> Result<()>;

    /// Waits up to `timeout_ms` for input and reports whether the user
    /// asked to quit
    fn exit_requested(&mut self, timeout_ms: u64) -> bool;

    /// Closes any open window
    fn close(&mut self);
}

/// On-screen preview through the usls viewer. Esc or closing the window exits.
pub struct ViewerDisplay {
    viewer: Option<Viewer<'static>>,
}

impl ViewerDisplay {
    pub fn new(window_scale: f32) -> Self {
        let viewer = Viewer::new(WINDOW_TITLE).with_window_scale(window_scale);
        Self {
            viewer: Some(viewer),
        }
    }
}

impl Display for ViewerDisplay {
    fn show(&mut self, frame: &Image) -> Result<()> {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.imshow(frame)?;
        }
        Ok(())
    }

    fn exit_requested(&mut self, timeout_ms: u64) -> bool {
        let Some(viewer) = self.viewer.as_mut() else {
            return true;
        };
        if viewer.is_window_exist() && !viewer.is_window_open() {
            return true;
        }
        matches!(viewer.wait_key(timeout_ms), Some(Key::Escape))
    }

    fn close(&mut self) {
        if self.viewer.take().is_some() {
            debug!("viewer closed");
        }
    }
}

/// No window; runs until the camera stops
#[derive(Debug, Default)]
pub struct HeadlessDisplay;

impl Display for HeadlessDisplay {
    fn show(&mut self, _frame: &Image) -> Result<()> {
        Ok(())
    }

    fn exit_requested(&mut self, _timeout_ms: u64) -> bool {
        false
    }

    fn close(&mut self) {}
}
