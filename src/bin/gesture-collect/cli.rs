use clap::{command, Parser};

// Some defaults; some of which can be overriden via CLI args
const OUTPUT_ROOT: &str = "./gesture_images";
const SAMPLE_COUNT: usize = 100;
const SAMPLE_INTERVAL_MS: u64 = 50;
const CROP_PADDING: u32 = 20;
const DETECTOR_SCRIPT_PATH: &str = "./hand_detect.py";
const DETECTOR_PYTHON: &str = "python3";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Gesture label to record; samples are saved under <outputRoot>/<label>/
    #[arg(long)]
    pub label: String,

    /// Root directory for the labeled dataset
    #[arg(long="outputRoot", default_value_t=String::from(OUTPUT_ROOT))]
    pub output_root: String,

    /// How many cropped hand images to save
    #[arg(long, default_value_t = SAMPLE_COUNT)]
    pub count: usize,

    /// Delay between captured frames, in milliseconds
    #[arg(long = "intervalMs", default_value_t = SAMPLE_INTERVAL_MS)]
    pub interval_ms: u64,

    /// Padding around the detected hand bounding box, in pixels
    #[arg(long, default_value_t = CROP_PADDING)]
    pub padding: u32,

    /// Which camera device to capture from
    #[arg(long = "camera.index", default_value_t = 0)]
    pub camera_index: u32,

    /// Path to the landmark helper script
    #[arg(long="detector.script", default_value_t=String::from(DETECTOR_SCRIPT_PATH))]
    pub detector_script: String,

    /// Python interpreter used to launch the helper script
    #[arg(long="detector.python", default_value_t=String::from(DETECTOR_PYTHON))]
    pub detector_python: String,

    #[arg(long = "loglevel", default_value_t=String::from("info"))]
    pub log_level: String,
}
