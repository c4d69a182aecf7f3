//! Gesture classification from a single hand's landmarks.
//!
//! A thumb clearly above the wrist is "thumb up", clearly below is "thumb
//! down". Otherwise the index fingertip is tracked over a short window and
//! a path that returns close to where it started is read as a "zoom" circle.

use std::fmt;
use tracing::debug;

use crate::config::GestureConfig;
use crate::history::PositionHistory;
use crate::landmarks::LandmarkSet;

/// Recognized gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    ThumbUp,
    ThumbDown,
    Zoom,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThumbUp => "thumb_up",
            Self::ThumbDown => "thumb_down",
            Self::Zoom => "zoom",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies one frame's landmarks.
///
/// The thumb test runs first and wins outright; the fingertip history is
/// only updated when it falls through to the zoom test. A hand missing the
/// wrist, thumb tip or index fingertip yields `None` and leaves the history
/// untouched.
pub fn classify(
    landmarks: &LandmarkSet,
    history: &mut PositionHistory,
    config: &GestureConfig,
) -> Option<Gesture> {
    let (Some(wrist), Some(thumb_tip), Some(index_tip)) =
        (landmarks.wrist(), landmarks.thumb_tip(), landmarks.index_tip())
    else {
        debug!("hand is missing a required joint, skipping classification");
        return None;
    };

    // Image y grows downward, so a raised thumb has a negative offset
    let dy = thumb_tip.y - wrist.y;
    if dy < -config.vertical_threshold {
        return Some(Gesture::ThumbUp);
    }
    if dy > config.vertical_threshold {
        return Some(Gesture::ThumbDown);
    }

    history.push(index_tip);
    detect_circle_motion(history, config).then_some(Gesture::Zoom)
}

/// True when the history holds enough samples and its oldest and newest
/// positions are closer than the zoom distance
pub fn detect_circle_motion(history: &PositionHistory, config: &GestureConfig) -> bool {
    if history.len() < config.zoom_min_samples {
        return false;
    }

    let (Some(first), Some(last)) = (history.peek_front(), history.peek_back()) else {
        return false;
    };
    let distance = first.distance(last);
    debug!("circle check: {} samples, distance {:.4}", history.len(), distance);

    distance < config.zoom_distance
}
