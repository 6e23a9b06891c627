//! Labeled hand-image dataset collection, for training a custom gesture
//! classifier. Detected hands are cropped (with padding) and saved as
//! numbered JPEGs under a per-label directory.

use std::{path::Path, thread, time::Duration};

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{debug, info, warn};

use gesture_reader::{
    camera::FrameSource,
    dataset::{crop_hand, hand_bounding_box, DatasetWriter},
    provider::HandPipeline,
};

mod cli;
use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger from the environment

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    debug!("Started; args: {:?}", cli);

    let mut source = FrameSource::open(cli.camera_index, true)?;
    // Landmarks only; no gesture model is needed for collection
    let mut pipeline = HandPipeline::new(&cli.detector_python, &cli.detector_script, None, 0.5)?;
    let mut writer = DatasetWriter::new(Path::new(&cli.output_root), &cli.label)?;

    info!(
        "Recording {} samples for label \"{}\"; frames without a hand are skipped",
        cli.count, cli.label
    );

    while writer.saved() < cli.count {
        let frame = match source.grab() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Unable to read frame from the camera: {e:#}");
                thread::sleep(Duration::from_millis(cli.interval_ms));
                continue;
            }
        };
        let analysis = match pipeline.analyze(&frame) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Helper failed on this frame: {e:#}");
                thread::sleep(Duration::from_millis(cli.interval_ms));
                continue;
            }
        };

        if let Some(hand) = analysis.hands.first() {
            let bbox = hand_bounding_box(hand, frame.width(), frame.height(), cli.padding);
            let crop = crop_hand(&frame, &bbox);
            let path = writer.save(&crop)?;
            info!("Saved sample {}/{}: {}", writer.saved(), cli.count, path.display());
        }

        thread::sleep(Duration::from_millis(cli.interval_ms));
    }

    info!(
        "Done; {} samples under {}/{}",
        writer.saved(),
        cli.output_root,
        cli.label
    );
    Ok(())
}
