use anyhow::{Context, Result};
use image::RgbImage;
use log::{info, warn};
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{CameraIndex, RequestedFormat, RequestedFormatType},
    Camera,
};

/// Frame Source: supplies successive colour images from a camera device.
/// Frames are optionally mirrored horizontally, so the on-screen hand
/// moves the way the user expects from a selfie view.
pub struct FrameSource {
    camera: Camera,
    mirror: bool,
}

impl FrameSource {
    /// Open the device and start streaming. Failure here is fatal for the
    /// component that needed the camera.
    pub fn open(index: u32, mirror: bool) -> Result<Self> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .with_context(|| format!("failed to open camera device {index}"))?;
        camera
            .open_stream()
            .context("failed to start camera stream")?;
        let resolution = camera.resolution();
        info!(
            "Camera {} started at {}x{}",
            index,
            resolution.width(),
            resolution.height()
        );
        Ok(FrameSource { camera, mirror })
    }

    /// Grab and decode the next frame. Failures here are transient; the
    /// caller should skip the frame and retry.
    pub fn grab(&mut self) -> Result<RgbImage> {
        let buffer = self
            .camera
            .frame()
            .context("failed to read frame from camera")?;
        let frame = buffer
            .decode_image::<RgbFormat>()
            .context("failed to decode camera frame")?;
        Ok(if self.mirror {
            image::imageops::flip_horizontal(&frame)
        } else {
            frame
        })
    }
}

impl Drop for FrameSource {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            warn!("Failed to stop camera stream cleanly: {e}");
        }
    }
}
