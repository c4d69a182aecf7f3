//! The capture -> classify -> gate -> dispatch -> display loop.
//!
//! All per-session mutable state (fingertip history, cooldown timer and
//! counters) lives in [`Session`] and is owned by the loop, which runs on a
//! single thread.

use anyhow::Result;
use std::time::Instant;
use tracing::{debug, info};

use crate::camera::FrameSource;
use crate::config::GestureConfig;
use crate::cooldown::CooldownGate;
use crate::dispatch::{self, Action, InputSink};
use crate::display::Display;
use crate::gesture;
use crate::history::PositionHistory;
use crate::image;
use crate::landmarks::{LandmarkProvider, LandmarkSet};
use crate::progress::FrameProgress;

/// Counters reported when the loop stops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: u64,
    pub frames_with_hand: u64,
    pub next_slide: u64,
    pub previous_slide: u64,
    pub zoom_in: u64,
}

impl SessionStats {
    fn record(&mut self, action: Action) {
        match action {
            Action::NextSlide => self.next_slide += 1,
            Action::PreviousSlide => self.previous_slide += 1,
            Action::ZoomIn(_) => self.zoom_in += 1,
        }
    }

    pub fn actions(&self) -> u64 {
        self.next_slide + self.previous_slide + self.zoom_in
    }
}

/// Mutable state carried from frame to frame
#[derive(Debug, Clone)]
pub struct Session {
    pub history: PositionHistory,
    pub cooldown: CooldownGate,
    pub stats: SessionStats,
}

impl Session {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            history: PositionHistory::new(config.history_capacity),
            cooldown: CooldownGate::new(config.cooldown_secs),
            stats: SessionStats::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Drives the gesture pipeline over a frame source until it stops
pub struct FrameLoop<'a> {
    source: &'a mut dyn FrameSource,
    provider: &'a mut dyn LandmarkProvider,
    input: &'a mut dyn InputSink,
    display: &'a mut dyn Display,
    config: GestureConfig,
    session: Session,
    annotate: bool,
    poll_ms: u64,
    progress: Option<FrameProgress>,
    state: LoopState,
}

impl<'a> FrameLoop<'a> {
    pub fn new(
        source: &'a mut dyn FrameSource,
        provider: &'a mut dyn LandmarkProvider,
        input: &'a mut dyn InputSink,
        display: &'a mut dyn Display,
        config: GestureConfig,
    ) -> Self {
        let session = Session::new(&config);
        Self {
            source,
            provider,
            input,
            display,
            config,
            session,
            annotate: true,
            poll_ms: 5,
            progress: None,
            state: LoopState::Running,
        }
    }

    /// Whether detected landmarks are drawn onto the displayed frame
    pub fn with_annotation(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    /// Key poll timeout per iteration
    pub fn with_poll_ms(mut self, poll_ms: u64) -> Self {
        self.poll_ms = poll_ms;
        self
    }

    pub fn with_progress(mut self, progress: Option<FrameProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Runs until the camera fails or the user exits, then releases the
    /// camera and closes the display. Errors are fatal and also release.
    pub fn run(&mut self) -> Result<SessionStats> {
        let start = Instant::now();
        let result = loop {
            match self.step(start.elapsed().as_secs_f64()) {
                Ok(LoopState::Running) => continue,
                Ok(LoopState::Stopped) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        self.stop();
        result.map(|_| self.session.stats.clone())
    }

    /// Runs a single iteration at time `now` (seconds since start)
    pub fn step(&mut self, now: f64) -> Result<LoopState> {
        if self.state == LoopState::Stopped {
            return Ok(LoopState::Stopped);
        }

        let Some(frame) = self.source.read() else {
            info!("no frame from camera, stopping");
            self.state = LoopState::Stopped;
            return Ok(self.state);
        };
        let frame = image::mirror_frame(frame);
        self.session.stats.frames += 1;

        let landmarks = self.provider.detect(&frame)?;
        if let Some(landmarks) = &landmarks {
            self.session.stats.frames_with_hand += 1;
            self.handle_hand(landmarks, now)?;
        }

        if self.annotate && landmarks.is_some() {
            let annotated = self.provider.annotate(&frame)?;
            self.display.show(&annotated)?;
        } else {
            self.display.show(&frame)?;
        }

        if let Some(progress) = self.progress.as_mut() {
            progress.update_frame();
        }

        if self.display.exit_requested(self.poll_ms) {
            info!("exit requested");
            self.state = LoopState::Stopped;
        }
        Ok(self.state)
    }

    fn handle_hand(&mut self, landmarks: &LandmarkSet, now: f64) -> Result<()> {
        let classified = gesture::classify(landmarks, &mut self.session.history, &self.config);
        let Some(gesture) = classified else {
            return Ok(());
        };
        debug!("classified {} at {:.3}s", gesture, now);

        if !self.session.cooldown.try_fire(Some(gesture), now) {
            debug!("{} suppressed by cooldown", gesture);
            return Ok(());
        }

        let action = dispatch::dispatch(gesture, &mut *self.input, &self.config)?;
        self.session.stats.record(action);
        if let Some(progress) = self.progress.as_mut() {
            progress.set_last_action(action.describe());
        }
        Ok(())
    }

    /// Finishes the spinner, releases the camera and closes the display
    fn stop(&mut self) {
        self.state = LoopState::Stopped;
        if let Some(progress) = self.progress.take() {
            progress.finish();
        }
        self.source.release();
        self.display.close();

        let stats = &self.session.stats;
        info!(
            "session ended: {} frames, {} with a hand, {} actions (next {}, previous {}, zoom {})",
            stats.frames,
            stats.frames_with_hand,
            stats.actions(),
            stats.next_slide,
            stats.previous_slide,
            stats.zoom_in
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::SlideKey;
    use crate::dispatch::tests::RecordingInput;
    use crate::landmarks::{HandJoint, Point};
    use ::image::RgbImage;
    use std::collections::VecDeque;
    use usls::Image;

    #[derive(Default)]
    struct FakeSource {
        frames: VecDeque<RgbImage>,
        released: usize,
    }

    impl FakeSource {
        fn with_frames(count: usize) -> Self {
            Self {
                frames: (0..count).map(|_| RgbImage::new(4, 4)).collect(),
                released: 0,
            }
        }
    }

    impl FrameSource for FakeSource {
        fn read(&mut self) -> Option<RgbImage> {
            self.frames.pop_front()
        }

        fn release(&mut self) {
            self.released += 1;
        }
    }

    /// Returns the queued detections in order, then no hand
    #[derive(Default)]
    struct FakeProvider {
        detections: VecDeque<Option<LandmarkSet>>,
        annotated: std::cell::Cell<usize>,
    }

    impl FakeProvider {
        fn new(detections: Vec<Option<LandmarkSet>>) -> Self {
            Self {
                detections: detections.into(),
                annotated: std::cell::Cell::new(0),
            }
        }
    }

    impl LandmarkProvider for FakeProvider {
        fn detect(&mut self, _frame: &Image) -> Result<Option<LandmarkSet>> {
            Ok(self.detections.pop_front().flatten())
        }

        fn annotate(&self, frame: &Image) -> Result<Image> {
            self.annotated.set(self.annotated.get() + 1);
            Ok(frame.clone())
        }
    }

    #[derive(Default)]
    struct FakeDisplay {
        shown: usize,
        exit_after: Option<usize>,
        closed: usize,
    }

    impl Display for FakeDisplay {
        fn show(&mut self, _frame: &Image) -> Result<()> {
            self.shown += 1;
            Ok(())
        }

        fn exit_requested(&mut self, _timeout_ms: u64) -> bool {
            self.exit_after.is_some_and(|n| self.shown >= n)
        }

        fn close(&mut self) {
            self.closed += 1;
        }
    }

    fn hand(thumb_y: f32, index: (f32, f32)) -> LandmarkSet {
        LandmarkSet::default()
            .with_joint(HandJoint::Wrist, Point::new(0.5, 0.5))
            .with_joint(HandJoint::ThumbTip, Point::new(0.45, thumb_y))
            .with_joint(HandJoint::IndexTip, Point::new(index.0, index.1))
    }

    fn thumb_up() -> Option<LandmarkSet> {
        Some(hand(0.3, (0.5, 0.5)))
    }

    fn neutral() -> Option<LandmarkSet> {
        Some(hand(0.5, (0.5, 0.5)))
    }

    #[test]
    fn test_stops_when_camera_fails() {
        let mut source = FakeSource::default();
        let mut provider = FakeProvider::default();
        let mut input = RecordingInput::default();
        let mut display = FakeDisplay::default();

        let stats = FrameLoop::new(
            &mut source,
            &mut provider,
            &mut input,
            &mut display,
            GestureConfig::default(),
        )
        .run()
        .unwrap();

        assert_eq!(stats.frames, 0);
        assert_eq!(display.shown, 0);
        assert_eq!(source.released, 1);
        assert_eq!(display.closed, 1);
    }

    #[test]
    fn test_no_hand_still_renders() {
        let mut source = FakeSource::with_frames(1);
        let mut provider = FakeProvider::new(vec![None]);
        let mut input = RecordingInput::default();
        let mut display = FakeDisplay::default();

        let mut frame_loop = FrameLoop::new(
            &mut source,
            &mut provider,
            &mut input,
            &mut display,
            GestureConfig::default(),
        );
        assert_eq!(frame_loop.step(0.0).unwrap(), LoopState::Running);
        assert!(frame_loop.session().history.is_empty());
        assert_eq!(frame_loop.session().stats.frames, 1);
        assert_eq!(frame_loop.session().stats.frames_with_hand, 0);
        drop(frame_loop);

        assert_eq!(display.shown, 1);
        assert!(input.keys.is_empty());
        assert!(input.scrolls.is_empty());
        assert_eq!(provider.annotated.get(), 0);
    }

    #[test]
    fn test_cooldown_gates_repeated_thumb_up() {
        let mut source = FakeSource::with_frames(3);
        let mut provider = FakeProvider::new(vec![thumb_up(), thumb_up(), thumb_up()]);
        let mut input = RecordingInput::default();
        let mut display = FakeDisplay::default();

        let mut frame_loop = FrameLoop::new(
            &mut source,
            &mut provider,
            &mut input,
            &mut display,
            GestureConfig::default(),
        );
        frame_loop.step(0.0).unwrap();
        frame_loop.step(1.0).unwrap();
        frame_loop.step(2.01).unwrap();
        assert_eq!(frame_loop.session().cooldown.last_fired(), Some(2.01));
        assert_eq!(frame_loop.session().stats.next_slide, 2);
        drop(frame_loop);

        assert_eq!(input.keys, vec![SlideKey::Right, SlideKey::Right]);
        assert_eq!(display.shown, 3);
    }

    #[test]
    fn test_zoom_fires_after_enough_samples() {
        let mut source = FakeSource::with_frames(12);
        let mut provider = FakeProvider::new((0..12).map(|_| neutral()).collect());
        let mut input = RecordingInput::default();
        let mut display = FakeDisplay::default();

        let mut frame_loop = FrameLoop::new(
            &mut source,
            &mut provider,
            &mut input,
            &mut display,
            GestureConfig::default(),
        );
        for i in 0..9 {
            frame_loop.step(i as f64 * 0.1).unwrap();
        }
        assert_eq!(frame_loop.session().stats.actions(), 0);

        frame_loop.step(0.9).unwrap();
        frame_loop.step(1.0).unwrap();
        frame_loop.step(1.1).unwrap();
        assert_eq!(frame_loop.session().history.len(), 12);
        drop(frame_loop);

        // Zoom is reported on every later frame but only fires once
        assert_eq!(input.scrolls, vec![100]);
        assert!(input.keys.is_empty());
    }

    #[test]
    fn test_exit_key_stops_and_releases() {
        let mut source = FakeSource::with_frames(5);
        let mut provider = FakeProvider::new(vec![thumb_up(), None, None]);
        let mut input = RecordingInput::default();
        let mut display = FakeDisplay {
            exit_after: Some(2),
            ..FakeDisplay::default()
        };

        let stats = FrameLoop::new(
            &mut source,
            &mut provider,
            &mut input,
            &mut display,
            GestureConfig::default(),
        )
        .run()
        .unwrap();

        assert_eq!(stats.frames, 2);
        assert_eq!(stats.frames_with_hand, 1);
        assert_eq!(stats.next_slide, 1);
        assert_eq!(source.frames.len(), 3);
        assert_eq!(source.released, 1);
        assert_eq!(display.closed, 1);
        assert_eq!(input.keys, vec![SlideKey::Right]);
    }

    #[test]
    fn test_stopped_loop_does_not_read_more_frames() {
        let mut source = FakeSource::with_frames(3);
        let mut provider = FakeProvider::default();
        let mut input = RecordingInput::default();
        let mut display = FakeDisplay {
            exit_after: Some(1),
            ..FakeDisplay::default()
        };

        let mut frame_loop = FrameLoop::new(
            &mut source,
            &mut provider,
            &mut input,
            &mut display,
            GestureConfig::default(),
        );
        assert_eq!(frame_loop.step(0.0).unwrap(), LoopState::Stopped);
        assert_eq!(frame_loop.step(0.1).unwrap(), LoopState::Stopped);
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        drop(frame_loop);

        assert_eq!(source.frames.len(), 2);
    }

    #[test]
    fn test_annotation_only_for_detected_hands() {
        let mut source = FakeSource::with_frames(3);
        let mut provider = FakeProvider::new(vec![neutral(), None, neutral()]);
        let mut input = RecordingInput::default();
        let mut display = FakeDisplay::default();

        FrameLoop::new(
            &mut source,
            &mut provider,
            &mut input,
            &mut display,
            GestureConfig::default(),
        )
        .run()
        .unwrap();
        assert_eq!(provider.annotated.get(), 2);
        assert_eq!(display.shown, 3);

        let mut source = FakeSource::with_frames(2);
        let mut provider = FakeProvider::new(vec![neutral(), neutral()]);
        let mut display = FakeDisplay::default();
        FrameLoop::new(
            &mut source,
            &mut provider,
            &mut input,
            &mut display,
            GestureConfig::default(),
        )
        .with_annotation(false)
        .run()
        .unwrap();
        assert_eq!(provider.annotated.get(), 0);
        assert_eq!(display.shown, 2);
    }

    #[test]
    fn test_input_failure_is_fatal_and_releases() {
        let mut source = FakeSource::with_frames(2);
        let mut provider = FakeProvider::new(vec![thumb_up(), thumb_up()]);
        let mut input = RecordingInput {
            fail: true,
            ..RecordingInput::default()
        };
        let mut display = FakeDisplay::default();

        let result = FrameLoop::new(
            &mut source,
            &mut provider,
            &mut input,
            &mut display,
            GestureConfig::default(),
        )
        .run();

        assert!(result.is_err());
        assert_eq!(source.released, 1);
        assert_eq!(display.closed, 1);
        assert_eq!(display.shown, 0);
    }

    #[test]
    fn test_missing_joints_skip_gesture_logic() {
        let partial = LandmarkSet::default().with_joint(HandJoint::Wrist, Point::new(0.5, 0.5));
        let mut source = FakeSource::with_frames(1);
        let mut provider = FakeProvider::new(vec![Some(partial)]);
        let mut input = RecordingInput::default();
        let mut display = FakeDisplay::default();

        let mut frame_loop = FrameLoop::new(
            &mut source,
            &mut provider,
            &mut input,
            &mut display,
            GestureConfig::default(),
        );
        frame_loop.step(0.0).unwrap();
        assert_eq!(frame_loop.session().stats.frames_with_hand, 1);
        assert!(frame_loop.session().history.is_empty());
        assert_eq!(frame_loop.session().cooldown.last_fired(), None);
        drop(frame_loop);

        assert_eq!(display.shown, 1);
    }
}
