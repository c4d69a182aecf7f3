use argh::FromArgs;

/// Hands-free slide control: thumb up / thumb down / circle to zoom
#[derive(FromArgs, Debug, Clone)]
pub struct Args {
    /// camera device index
    #[argh(option, default = "0")]
    pub camera: u32,

    /// hand keypoint model file (21 keypoints, YOLO pose layout)
    #[argh(option, default = "String::from(\"./models/yolo11n-hand-pose.onnx\")")]
    pub model: String,

    /// task: pose
    #[argh(option, default = "String::from(\"pose\")")]
    pub task: String,

    /// model dtype
    #[argh(option, default = "String::from(\"auto\")")]
    pub dtype: String,

    /// version
    #[argh(option, default = "11.0")]
    pub ver: f32,

    /// device: cuda, cpu, mps
    #[argh(option, default = "String::from(\"cpu:0\")")]
    pub device: String,

    /// scale: n, s, m, l
    #[argh(option, default = "String::from(\"n\")")]
    pub scale: String,

    /// minimum hand detection confidence
    #[argh(option, default = "0.7")]
    pub min_confidence: f32,

    /// minimum confidence for a single keypoint to count as present
    #[argh(option, default = "0.5")]
    pub keypoint_confidence: f32,

    /// seconds that must pass between two fired gestures
    #[argh(option, default = "2.0")]
    pub cooldown: f64,

    /// thumb-to-wrist vertical offset that counts as thumb up/down
    #[argh(option, default = "0.1")]
    pub vertical_threshold: f32,

    /// max distance between oldest and newest fingertip sample for zoom
    #[argh(option, default = "20.0")]
    pub zoom_distance: f32,

    /// number of fingertip samples kept for zoom detection
    #[argh(option, default = "15")]
    pub history_capacity: usize,

    /// fingertip samples required before zoom can be reported
    #[argh(option, default = "10")]
    pub zoom_min_samples: usize,

    /// scroll amount sent on zoom (positive scrolls up)
    #[argh(option, default = "100")]
    pub scroll_amount: i32,

    /// key poll timeout in milliseconds
    #[argh(option, default = "5")]
    pub poll_ms: u64,

    /// window scale
    #[argh(option, default = "1.0")]
    pub window_scale: f32,

    /// presentation file to open in the default application at startup
    #[argh(option)]
    pub presentation: Option<String>,

    /// use headless mode
    #[argh(switch)]
    pub headless: bool,

    /// log gestures without sending key or scroll events
    #[argh(switch)]
    pub dry_run: bool,

    /// show the raw camera frame without landmark overlay
    #[argh(switch)]
    pub no_annotate: bool,

    /// show a progress spinner with frame rate
    #[argh(switch)]
    pub progress: bool,
}
