use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

/// Live spinner for the camera loop: frame count, throughput and last action
pub struct FrameProgress {
    progress_bar: ProgressBar,
    start_time: Instant,
    processed_frames: u64,
    last_action: Option<&'static str>,
}

impl FrameProgress {
    /// Creates a new spinner; a live feed has no known total
    pub fn new(operation_name: &str) -> Result<Self> {
        let progress_bar = ProgressBar::new_spinner();

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} frames | {msg}")?;

        progress_bar.set_style(style);
        progress_bar.set_message(format!("Watching {}", operation_name));

        Ok(Self {
            progress_bar,
            start_time: Instant::now(),
            processed_frames: 0,
            last_action: None,
        })
    }

    /// Updates the progress by one frame
    pub fn update_frame(&mut self) {
        self.processed_frames += 1;
        self.progress_bar.inc(1);

        let msg = self.get_progress_message();
        self.progress_bar.set_message(msg);
    }

    /// Records the most recently fired action for display
    pub fn set_last_action(&mut self, action: &'static str) {
        self.last_action = Some(action);
    }

    fn get_progress_message(&self) -> String {
        if self.processed_frames == 0 {
            return "Starting...".to_string();
        }

        let elapsed = self.start_time.elapsed().as_secs_f64();
        let fps = if elapsed > 0.0 {
            self.processed_frames as f64 / elapsed
        } else {
            0.0
        };

        format!(
            "{} | Speed: {:.1} fps | Last: {}",
            format_duration(elapsed),
            fps,
            self.last_action.unwrap_or("-")
        )
    }

    /// Finishes the spinner with a summary
    pub fn finish(&self) {
        let total_time = self.start_time.elapsed().as_secs_f64();
        let avg_fps = if total_time > 0.0 {
            self.processed_frames as f64 / total_time
        } else {
            0.0
        };

        self.progress_bar.finish_with_message(format!(
            "Stopped after {} | Avg FPS: {:.1}",
            format_duration(total_time),
            avg_fps
        ));
    }

    /// Gets the current number of processed frames
    pub fn processed_frames(&self) -> u64 {
        self.processed_frames
    }
}

/// Formats a duration in seconds to h:mm:ss format
fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
