use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use image::RgbImage;
use log::info;

use crate::hand::HandObservation;

/// Pixel-space crop region, already padded and clamped to the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Bounding box around all 21 landmark pixels, expanded by `padding` on
/// every side for better cropping and clamped to the frame bounds.
pub fn hand_bounding_box(
    hand: &HandObservation,
    frame_width: u32,
    frame_height: u32,
    padding: u32,
) -> BoundingBox {
    let mut x_min = frame_width as f32;
    let mut y_min = frame_height as f32;
    let mut x_max = 0.;
    let mut y_max = 0.;

    for (x, y) in hand.pixel_positions(frame_width, frame_height) {
        x_min = f32::min(x_min, x);
        y_min = f32::min(y_min, y);
        x_max = f32::max(x_max, x);
        y_max = f32::max(y_max, y);
    }

    let x0 = (x_min - padding as f32).max(0.) as u32;
    let y0 = (y_min - padding as f32).max(0.) as u32;
    let x1 = ((x_max + padding as f32).max(0.) as u32).min(frame_width);
    let y1 = ((y_max + padding as f32).max(0.) as u32).min(frame_height);

    BoundingBox {
        x: x0,
        y: y0,
        width: x1.saturating_sub(x0),
        height: y1.saturating_sub(y0),
    }
}

pub fn crop_hand(frame: &RgbImage, region: &BoundingBox) -> RgbImage {
    image::imageops::crop_imm(frame, region.x, region.y, region.width, region.height).to_image()
}

/// Writes numbered JPEG samples under `<root>/<label>/`
pub struct DatasetWriter {
    label_dir: PathBuf,
    saved: usize,
}

impl DatasetWriter {
    pub fn new(root: &Path, label: &str) -> Result<Self> {
        let label_dir = root.join(label);
        fs::create_dir_all(&label_dir).with_context(|| {
            format!("failed to create dataset directory {}", label_dir.display())
        })?;
        info!("Saving \"{}\" samples to {}", label, label_dir.display());
        Ok(DatasetWriter {
            label_dir,
            saved: 0,
        })
    }

    pub fn save(&mut self, image: &RgbImage) -> Result<PathBuf> {
        let path = self.label_dir.join(format!("{}.jpg", self.saved));
        image
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        self.saved += 1;
        Ok(path)
    }

    pub fn saved(&self) -> usize {
        self.saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{Landmark, LANDMARK_COUNT};

    fn hand_spanning(x0: f32, y0: f32, x1: f32, y1: f32) -> HandObservation {
        let mut landmarks = vec![
            Landmark {
                x: x0,
                y: y0,
                z: 0.
            };
            LANDMARK_COUNT
        ];
        landmarks[1] = Landmark {
            x: x1,
            y: y1,
            z: 0.,
        };
        HandObservation::from_landmarks(landmarks, 0.9, String::from("Left")).unwrap()
    }

    #[test]
    fn test_bounding_box_with_padding() {
        // Landmarks spanning (64,48)..(320,240) in a 640x480 frame
        let hand = hand_spanning(0.1, 0.1, 0.5, 0.5);
        let bbox = hand_bounding_box(&hand, 640, 480, 20);
        assert_eq!(
            bbox,
            BoundingBox {
                x: 44,
                y: 28,
                width: 296,
                height: 232,
            }
        );
    }

    #[test]
    fn test_bounding_box_clamps_to_frame_edges() {
        // Landmarks right at the corners: padding must not escape the frame
        let hand = hand_spanning(0., 0., 1., 1.);
        let bbox = hand_bounding_box(&hand, 640, 480, 20);
        assert_eq!(
            bbox,
            BoundingBox {
                x: 0,
                y: 0,
                width: 640,
                height: 480,
            }
        );
    }

    #[test]
    fn test_crop_matches_bounding_box() {
        let frame = RgbImage::new(640, 480);
        let hand = hand_spanning(0.25, 0.25, 0.75, 0.75);
        let bbox = hand_bounding_box(&hand, 640, 480, 0);
        let crop = crop_hand(&frame, &bbox);
        assert_eq!((crop.width(), crop.height()), (bbox.width, bbox.height));
    }
}
