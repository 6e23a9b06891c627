//! Cursor control from raw landmark geometry, without a trained gesture
//! classifier. An open palm (all fingertips far from the wrist) moves the
//! pointer; a pinch (index tip close to and above the thumb tip) clicks.
//! Useful for exploring thresholds before collecting a dataset.

use anyhow::{Context, Result};
use clap::{command, Parser};
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use env_logger::Env;
use log::{debug, info, warn};
use map_range::MapRange;

use gesture_reader::{
    camera::FrameSource,
    geometry_utils::{distance_points, midpoint},
    hand::landmark_index,
    provider::HandPipeline,
};

// Open-palm thresholds: minimum wrist-to-fingertip distances in frame pixels
const THUMB_OPEN_THRESHOLD: f32 = 140.;
const INDEX_OPEN_THRESHOLD: f32 = 160.;
const MIDDLE_OPEN_THRESHOLD: f32 = 120.;
const RING_OPEN_THRESHOLD: f32 = 120.;
const PINKY_OPEN_THRESHOLD: f32 = 120.;

const PINCH_DISTANCE: f32 = 50.;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Which camera device to capture from
    #[arg(long = "camera.index", default_value_t = 0)]
    camera_index: u32,

    /// Path to the landmark helper script
    #[arg(long="detector.script", default_value_t=String::from("./hand_detect.py"))]
    detector_script: String,

    /// Python interpreter used to launch the helper script
    #[arg(long="detector.python", default_value_t=String::from("python3"))]
    detector_python: String,

    #[arg(long = "loglevel", default_value_t=String::from("info"))]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger from the environment

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    debug!("Started; args: {:?}", cli);

    let mut enigo =
        Enigo::new(&Settings::default()).context("failed to initialise input injection")?;
    let (screen_width, screen_height) = enigo
        .main_display()
        .context("failed to query main display size")?;

    let mut source = FrameSource::open(cli.camera_index, true)?;
    let mut pipeline = HandPipeline::new(&cli.detector_python, &cli.detector_script, None, 0.5)?;

    info!("Camera started successfully; Ctrl-C to quit");

    loop {
        let frame = source.grab().context("camera stream ended")?;
        let analysis = match pipeline.analyze(&frame) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Helper failed on this frame: {e:#}");
                continue;
            }
        };

        let (frame_width, frame_height) = (frame.width(), frame.height());
        for hand in &analysis.hands {
            let wrist = hand.pixel_position(landmark_index::WRIST, frame_width, frame_height);
            let thumb_tip =
                hand.pixel_position(landmark_index::THUMB_TIP, frame_width, frame_height);
            let index_mcp =
                hand.pixel_position(landmark_index::INDEX_FINGER_MCP, frame_width, frame_height);
            let index_tip =
                hand.pixel_position(landmark_index::INDEX_FINGER_TIP, frame_width, frame_height);
            let middle_tip =
                hand.pixel_position(landmark_index::MIDDLE_FINGER_TIP, frame_width, frame_height);
            let ring_tip =
                hand.pixel_position(landmark_index::RING_FINGER_TIP, frame_width, frame_height);
            let pinky_tip =
                hand.pixel_position(landmark_index::PINKY_TIP, frame_width, frame_height);

            let thumb_distance = distance_points(&wrist, &thumb_tip);
            let index_distance = distance_points(&wrist, &index_tip);
            let middle_distance = distance_points(&wrist, &middle_tip);
            let ring_distance = distance_points(&wrist, &ring_tip);
            let pinky_distance = distance_points(&wrist, &pinky_tip);

            debug!(
                "Distances between wrist and each fingertip: {:.0} {:.0} {:.0} {:.0} {:.0}",
                thumb_distance, index_distance, middle_distance, ring_distance, pinky_distance
            );

            // If the palm is open, the cursor follows the middle of the palm
            if thumb_distance >= THUMB_OPEN_THRESHOLD
                && index_distance >= INDEX_OPEN_THRESHOLD
                && middle_distance >= MIDDLE_OPEN_THRESHOLD
                && ring_distance >= RING_OPEN_THRESHOLD
                && pinky_distance >= PINKY_OPEN_THRESHOLD
            {
                let (palm_x, palm_y) = midpoint(&wrist, &index_mcp);
                let x = palm_x.map_range(0. ..frame_width as f32, 0. ..screen_width as f32) as i32;
                let y =
                    palm_y.map_range(0. ..frame_height as f32, 0. ..screen_height as f32) as i32;
                enigo
                    .move_mouse(x, y, Coordinate::Abs)
                    .context("failed to move pointer")?;
            }

            // Thumb and index close together, index on top: a pinch
            if distance_points(&index_tip, &thumb_tip) < PINCH_DISTANCE
                && index_tip.1 <= thumb_tip.1
            {
                info!("Pinch!");
                enigo
                    .button(Button::Left, Direction::Click)
                    .context("failed to click")?;
            }
        }
    }
}
