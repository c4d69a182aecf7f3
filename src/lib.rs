//! Hands-free slide control from a webcam.
//!
//! A hand keypoint model finds one hand per frame. A raised thumb advances
//! the slide, a lowered thumb goes back, and a circling index finger scrolls
//! to zoom in. A cooldown keeps a held pose from firing repeatedly.

pub mod camera;
pub mod cli;
pub mod config;
pub mod cooldown;
pub mod dispatch;
pub mod display;
pub mod frame_loop;
pub mod gesture;
pub mod hand_model;
pub mod history;
pub mod image;
pub mod landmarks;
pub mod presentation;
pub mod progress;
