use anyhow::{Context, Result};
use tracing::debug;
use usls::{Annotator, Image, Y, models::YOLO};

use crate::cli::Args;
use crate::config;
use crate::landmarks::{LandmarkProvider, LandmarkSet, Point};

/// A keypoint in pixel coordinates as reported by the model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawKeypoint {
    pub x: f32,
    pub y: f32,
    pub confidence: Option<f32>,
}

/// One detected hand before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawHand {
    pub confidence: Option<f32>,
    pub keypoints: Vec<RawKeypoint>,
}

/// Pulls hand boxes and their keypoints out of a model result.
/// Boxes and keypoint groups are reported in the same order.
pub fn extract_hands(detection: &Y) -> Vec<RawHand> {
    let Some(keypointss) = detection.keypointss() else {
        return vec![];
    };
    let hbbs = detection.hbbs().unwrap_or(&[]);

    keypointss
        .iter()
        .enumerate()
        .map(|(i, keypoints)| RawHand {
            confidence: hbbs.get(i).and_then(|hbb| hbb.confidence()),
            keypoints: keypoints
                .iter()
                .map(|kpt| RawKeypoint {
                    x: kpt.x(),
                    y: kpt.y(),
                    confidence: kpt.confidence(),
                })
                .collect(),
        })
        .collect()
}

/// Picks the most confident hand at or above `min_confidence` and converts
/// its keypoints to normalized frame coordinates. Keypoints below
/// `keypoint_confidence` are left out of the landmark set.
pub fn select_hand(
    hands: &[RawHand],
    frame_width: f32,
    frame_height: f32,
    min_confidence: f32,
    keypoint_confidence: f32,
) -> Option<LandmarkSet> {
    if frame_width <= 0.0 || frame_height <= 0.0 {
        return None;
    }

    let best = hands
        .iter()
        .filter_map(|hand| hand.confidence.map(|c| (c, hand)))
        .filter(|(c, _)| *c >= min_confidence)
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, hand)| hand)?;

    let points = best.keypoints.iter().map(|kpt| {
        let visible = kpt.confidence.is_some_and(|c| c >= keypoint_confidence);
        visible.then(|| Point::new(kpt.x / frame_width, kpt.y / frame_height))
    });

    Some(LandmarkSet::from_points(points))
}

/// Hand landmark provider backed by a YOLO keypoint model
pub struct HandDetector {
    model: YOLO,
    annotator: Annotator,
    min_confidence: f32,
    keypoint_confidence: f32,
    last_detection: Option<Y>,
}

impl HandDetector {
    /// Loads the hand keypoint model described by the command line arguments
    pub fn new(args: &Args) -> Result<Self> {
        let model_config = config::build_model_config(args)?;
        let model = YOLO::new(model_config.commit()?)
            .with_context(|| format!("failed to load hand model {}", args.model))?;

        Ok(Self {
            model,
            annotator: Annotator::default(),
            min_confidence: args.min_confidence,
            keypoint_confidence: args.keypoint_confidence,
            last_detection: None,
        })
    }
}

impl LandmarkProvider for HandDetector {
    fn detect(&mut self, frame: &Image) -> Result<Option<LandmarkSet>> {
        let ys = self.model.forward(std::slice::from_ref(frame))?;
        let Some(y) = ys.into_iter().next() else {
            self.last_detection = None;
            return Ok(None);
        };

        let hands = extract_hands(&y);
        debug!("hands detected: {}", hands.len());
        let landmarks = select_hand(
            &hands,
            frame.width() as f32,
            frame.height() as f32,
            self.min_confidence,
            self.keypoint_confidence,
        );
        self.last_detection = Some(y);

        Ok(landmarks)
    }

    fn annotate(&self, frame: &Image) -> Result<Image> {
        match &self.last_detection {
            Some(y) => Ok(self.annotator.annotate(frame, y)?),
            None => Ok(frame.clone()),
        }
    }
}
