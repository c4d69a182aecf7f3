use anyhow::{Result, bail};
use usls::Config;
use crate::cli::Args;

/// Number of keypoints in the hand model layout
pub const HAND_KEYPOINTS: usize = 21;

/// Thresholds used by the classifier, the cooldown gate and the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// `thumb_tip.y - wrist.y` beyond this (either sign) is a thumb gesture
    pub vertical_threshold: f32,
    /// Oldest-to-newest fingertip distance below which zoom fires.
    /// Compared against normalized coordinates, so the default of 20 is
    /// satisfied by almost any motion once enough samples exist.
    pub zoom_distance: f32,
    pub history_capacity: usize,
    pub zoom_min_samples: usize,
    pub cooldown_secs: f64,
    pub scroll_amount: i32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            vertical_threshold: 0.1,
            zoom_distance: 20.0,
            history_capacity: 15,
            zoom_min_samples: 10,
            cooldown_secs: 2.0,
            scroll_amount: 100,
        }
    }
}

impl GestureConfig {
    /// Builds the gesture thresholds from command line arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        let config = Self {
            vertical_threshold: args.vertical_threshold,
            zoom_distance: args.zoom_distance,
            history_capacity: args.history_capacity,
            zoom_min_samples: args.zoom_min_samples,
            cooldown_secs: args.cooldown,
            scroll_amount: args.scroll_amount,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects threshold combinations that would make a gesture unreachable
    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            bail!("history capacity must be at least 1");
        }
        if self.zoom_min_samples > self.history_capacity {
            bail!(
                "zoom needs {} samples but the history only keeps {}",
                self.zoom_min_samples,
                self.history_capacity
            );
        }
        if self.cooldown_secs.is_nan() || self.cooldown_secs < 0.0 {
            bail!("cooldown must be a non-negative number of seconds");
        }
        if self.vertical_threshold.is_nan() || self.vertical_threshold < 0.0 {
            bail!("vertical threshold must be non-negative");
        }
        Ok(())
    }
}

/// Builds the hand keypoint model configuration from command line arguments
pub fn build_model_config(args: &Args) -> Result<Config> {
    let config = Config::yolo()
        .with_model_file(&args.model)
        .with_task(args.task.parse()?)
        .with_version(args.ver.try_into()?)
        .with_scale(args.scale.parse()?)
        .with_model_dtype(args.dtype.parse()?)
        .with_model_device(args.device.parse()?)
        .with_class_confs(&[args.min_confidence])
        .with_keypoint_confs(&[args.keypoint_confidence])
        .with_class_names(&["hand"])
        .with_nc(1)
        .with_nk(HAND_KEYPOINTS)
        .with_topk(1)
        .with_model_num_dry_run(2);

    Ok(config)
}
