#![warn(clippy::all, rust_2018_idioms)]

mod app;
pub mod config;
pub mod geom;
pub mod peel;
pub mod render;
pub mod texture;

pub use app::StickerApp;
use egui::{emath::Rot2, vec2, Color32};
use geom::{HighlightShape, Pose, RectPose};
use peel::PeelSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The sticker at rest
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Sticker {
    /// Width, height in canvas units
    pub size: [f32; 2],
    /// Center in canvas units, y up
    pub position: [f32; 2],
    /// Counter-clockwise rotation with 0 resting on the x axis
    /// In degrees
    pub rotation: f32,
    /// Fill without artwork, tint with it
    pub face_color: Color32,
    /// Color of the peeled-back paper
    pub back_color: Color32,
}

/// Shine along the crease
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Highlight {
    /// Extent across the crease
    pub width: f32,
    /// Distance from the crease
    pub gap: f32,
    pub color: Color32,
}

/// Everything the RON config file holds
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StickerConfig {
    pub sticker: Sticker,
    pub highlight: Highlight,
    /// Sticker scale while pressed
    pub lift_scale: f32,
    /// PNG artwork
    pub artwork: Option<PathBuf>,
}

impl Sticker {
    pub fn rect_pose(&self) -> RectPose {
        RectPose {
            pose: Pose::new(
                vec2(self.position[0], self.position[1]),
                Rot2::from_angle(self.rotation.to_radians()),
            ),
            size: vec2(self.size[0], self.size[1]),
        }
    }
}

impl StickerConfig {
    pub fn peel_settings(&self) -> PeelSettings {
        PeelSettings {
            lift_scale: self.lift_scale,
            highlight: HighlightShape {
                width: self.highlight.width,
                gap: self.highlight.gap,
            },
        }
    }
}

impl Default for Sticker {
    fn default() -> Self {
        Self {
            size: [200., 200.],
            position: [0.; 2],
            rotation: 0.,
            face_color: Color32::from_rgb(230, 80, 90),
            back_color: Color32::from_rgb(235, 235, 225),
        }
    }
}

impl Default for Highlight {
    fn default() -> Self {
        Self {
            width: 24.,
            gap: 0.,
            color: Color32::from_white_alpha(90),
        }
    }
}

impl Default for StickerConfig {
    fn default() -> Self {
        Self {
            sticker: Sticker::default(),
            highlight: Highlight::default(),
            lift_scale: 1.,
            artwork: None,
        }
    }
}
