use anyhow::{Context, Result};
use image::RgbImage;
use nokhwa::Camera;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use tracing::{debug, info, warn};

/// Source of RGB frames for the frame loop
pub trait FrameSource {
    /// Reads the next frame. `None` means the source failed or ran dry and
    /// the loop should stop.
    fn read(&mut self) -> Option<RgbImage>;

    /// Releases the underlying device
    fn release(&mut self);
}

/// Webcam capture through nokhwa
pub struct CameraSource {
    camera: Option<Camera>,
}

impl CameraSource {
    /// Opens the camera at `index` and starts streaming
    pub fn open(index: u32) -> Result<Self> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .with_context(|| format!("failed to open camera {}", index))?;
        camera
            .open_stream()
            .with_context(|| format!("failed to start stream on camera {}", index))?;
        info!("camera {} opened: {:?}", index, camera.camera_format());

        Ok(Self {
            camera: Some(camera),
        })
    }

    fn capture(camera: &mut Camera) -> Result<RgbImage> {
        let buffer = camera.frame()?;
        let decoded = buffer.decode_image::<RgbFormat>()?;
        let (width, height) = (decoded.width(), decoded.height());
        RgbImage::from_raw(width, height, decoded.into_raw())
            .context("decoded frame has an unexpected buffer size")
    }
}

impl FrameSource for CameraSource {
    fn read(&mut self) -> Option<RgbImage> {
        let camera = self.camera.as_mut()?;
        match Self::capture(camera) {
            Ok(frame) => Some(frame),
            Err(e) => {
                warn!("camera read failed: {:#}", e);
                None
            }
        }
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                warn!("failed to stop camera stream: {}", e);
            }
            debug!("camera released");
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.release();
    }
}
