use clap::{command, Parser};

use crate::interpreter::ScrollPolicy;

// Some defaults; some of which can be overriden via CLI args
const MODEL_FILE_PATH: &str = "./custom_gestures.task";
const DETECTOR_SCRIPT_PATH: &str = "./hand_detect.py";
const DETECTOR_PYTHON: &str = "python3";

const CAMERA_INDEX: u32 = 0;
const MIN_HAND_CONFIDENCE: f32 = 0.5;
const SCROLL_UNITS: i32 = 3;

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Which camera device to capture from
    #[arg(long = "camera.index", default_value_t = CAMERA_INDEX)]
    pub camera_index: u32,

    /// Disable the horizontal mirror applied to captured frames
    /// (mirroring gives the usual selfie-view hand control)
    #[arg(long = "camera.noMirror")]
    pub camera_no_mirror: bool,

    /// Path to the trained gesture classifier (.task) file
    #[arg(long="detector.modelPath", default_value_t=String::from(MODEL_FILE_PATH))]
    pub model_path: String,

    /// Path to the landmark/gesture helper script
    #[arg(long="detector.script", default_value_t=String::from(DETECTOR_SCRIPT_PATH))]
    pub detector_script: String,

    /// Python interpreter used to launch the helper script
    #[arg(long="detector.python", default_value_t=String::from(DETECTOR_PYTHON))]
    pub detector_python: String,

    /// Drop detected hands below this confidence
    #[arg(long = "detector.minHandConfidence", default_value_t = MIN_HAND_CONFIDENCE)]
    pub min_hand_confidence: f32,

    /// Scroll step per emitted scroll action, in text-view units
    #[arg(long = "scroll.units", default_value_t = SCROLL_UNITS)]
    pub scroll_units: i32,

    /// Use the two-phase (start/end latch) vertical scroll vocabulary
    /// instead of continuous per-frame scrolling
    #[arg(long = "scroll.twoPhase")]
    pub scroll_two_phase: bool,

    /// Override the detected screen width (pixels) for pointer mapping
    #[arg(long = "screen.width")]
    pub screen_width: Option<u32>,

    /// Override the detected screen height (pixels) for pointer mapping
    #[arg(long = "screen.height")]
    pub screen_height: Option<u32>,

    /// Text file to load into the reader at startup
    #[arg(long = "reader.file")]
    pub reader_file: Option<String>,

    #[arg(long = "loglevel", default_value_t=String::from("info"))]
    pub log_level: String,
}

impl Cli {
    pub fn scroll_policy(&self) -> ScrollPolicy {
        if self.scroll_two_phase {
            ScrollPolicy::StartEnd
        } else {
            ScrollPolicy::Continuous
        }
    }
}
