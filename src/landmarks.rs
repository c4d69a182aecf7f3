//! Hand landmark types and the provider boundary.
//!
//! Joints follow the 21-point hand layout shared by MediaPipe and the
//! Ultralytics hand-keypoints dataset: wrist first, then four joints per
//! finger from thumb to pinky.

use anyhow::Result;
use usls::Image;

use crate::config::HAND_KEYPOINTS;

/// Named hand joints, indexed in keypoint order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandJoint {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

/// A 2D point in normalized image coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One detected hand: a slot per joint, `None` where the joint was not found
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LandmarkSet {
    joints: [Option<Point>; HAND_KEYPOINTS],
}

impl LandmarkSet {
    /// Builds a landmark set from per-joint points in keypoint order.
    /// Extra entries are ignored and missing trailing entries stay absent.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Option<Point>>,
    {
        let mut joints = [None; HAND_KEYPOINTS];
        for (slot, point) in joints.iter_mut().zip(points) {
            *slot = point;
        }
        Self { joints }
    }

    /// Sets a single joint, replacing any previous value
    pub fn with_joint(mut self, joint: HandJoint, point: Point) -> Self {
        self.joints[joint as usize] = Some(point);
        self
    }

    pub fn get(&self, joint: HandJoint) -> Option<Point> {
        self.joints[joint as usize]
    }

    pub fn wrist(&self) -> Option<Point> {
        self.get(HandJoint::Wrist)
    }

    pub fn thumb_tip(&self) -> Option<Point> {
        self.get(HandJoint::ThumbTip)
    }

    pub fn index_tip(&self) -> Option<Point> {
        self.get(HandJoint::IndexTip)
    }

    /// Number of joints that were detected
    pub fn present_count(&self) -> usize {
        self.joints.iter().filter(|j| j.is_some()).count()
    }
}

/// Produces at most one hand per frame
pub trait LandmarkProvider {
    /// Detects a hand in the frame. `Ok(None)` means no hand was found.
    fn detect(&mut self, frame: &Image) -> Result<Option<LandmarkSet>>;

    /// Draws the most recent detection onto a copy of the frame
    fn annotate(&self, frame: &Image) -> Result<Image> {
        Ok(frame.clone())
    }
}
