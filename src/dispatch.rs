//! Maps fired gestures to simulated input.

use anyhow::{Result, anyhow};
use enigo::{Axis, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use tracing::info;

use crate::config::GestureConfig;
use crate::gesture::Gesture;

/// Keys used for slide navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKey {
    Left,
    Right,
}

/// The input event produced for a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextSlide,
    PreviousSlide,
    /// Scroll by the given amount; positive scrolls up (zooms in)
    ZoomIn(i32),
}

impl Action {
    /// Picks the action for a gesture
    pub fn for_gesture(gesture: Gesture, config: &GestureConfig) -> Self {
        match gesture {
            Gesture::ThumbUp => Self::NextSlide,
            Gesture::ThumbDown => Self::PreviousSlide,
            Gesture::Zoom => Self::ZoomIn(config.scroll_amount),
        }
    }

    /// Human-readable log line for the action
    pub fn describe(&self) -> &'static str {
        match self {
            Self::NextSlide => "Next slide",
            Self::PreviousSlide => "Previous slide",
            Self::ZoomIn(_) => "Zooming in",
        }
    }
}

/// Input-simulation boundary
pub trait InputSink {
    /// Press and release a key
    fn press_key(&mut self, key: SlideKey) -> Result<()>;

    /// Scroll vertically; positive amounts scroll up
    fn scroll(&mut self, amount: i32) -> Result<()>;
}

/// Sends the action for `gesture` to the sink and logs it
pub fn dispatch<S: InputSink + ?Sized>(
    gesture: Gesture,
    sink: &mut S,
    config: &GestureConfig,
) -> Result<Action> {
    let action = Action::for_gesture(gesture, config);
    match action {
        Action::NextSlide => sink.press_key(SlideKey::Right)?,
        Action::PreviousSlide => sink.press_key(SlideKey::Left)?,
        Action::ZoomIn(amount) => sink.scroll(amount)?,
    }
    info!("{}", action.describe());
    Ok(action)
}

/// Injects real keyboard and mouse events through enigo
pub struct EnigoInput {
    enigo: Enigo,
}

impl EnigoInput {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow!("failed to initialize input simulation: {:?}", e))?;
        Ok(Self { enigo })
    }
}

impl InputSink for EnigoInput {
    fn press_key(&mut self, key: SlideKey) -> Result<()> {
        let key = match key {
            SlideKey::Left => Key::LeftArrow,
            SlideKey::Right => Key::RightArrow,
        };
        self.enigo
            .key(key, Direction::Click)
            .map_err(|e| anyhow!("key press failed: {:?}", e))
    }

    fn scroll(&mut self, amount: i32) -> Result<()> {
        // enigo scrolls down for positive lengths
        self.enigo
            .scroll(-amount, Axis::Vertical)
            .map_err(|e| anyhow!("scroll failed: {:?}", e))
    }
}

/// Logs the input events instead of sending them
#[derive(Debug, Default)]
pub struct DryRunInput;

impl InputSink for DryRunInput {
    fn press_key(&mut self, key: SlideKey) -> Result<()> {
        info!("[dry-run] press {:?}", key);
        Ok(())
    }

    fn scroll(&mut self, amount: i32) -> Result<()> {
        info!("[dry-run] scroll {}", amount);
        Ok(())
    }
}
