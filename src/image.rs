use image::{RgbImage, imageops::flip_horizontal_in_place};
use usls::Image;

/// Mirrors a camera frame horizontally so on-screen motion matches the
/// user's own left and right, and wraps it for the model and viewer
///
/// # Arguments
/// * `frame` - The raw RGB frame as delivered by the camera
///
/// # Returns
/// The mirrored frame as a `usls::Image`
pub fn mirror_frame(mut frame: RgbImage) -> Image {
    flip_horizontal_in_place(&mut frame);
    Image::from(frame)
}
