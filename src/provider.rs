//! Landmark/Gesture Provider: a MediaPipe hand landmarker + gesture
//! recognizer driven through a helper subprocess.
//!
//! The helper receives one frame per request as a 12-byte little-endian
//! header (width, height, channels) followed by raw RGB bytes, and answers
//! with a single JSON line:
//!
//! `{"hands": [{"handedness": "...", "score": 0.9, "landmarks": [{"x":..,"y":..,"z":..} x21]}],
//!   "gestures": [{"label": "open_palm", "score": 0.8}]}`
//!
//! Only the top-1 gesture entry is consumed. The helper prints `READY` on
//! its own line once the models are loaded.

use std::{
    io::{BufRead, BufReader, Write},
    process::{Child, ChildStdout, Command, Stdio},
};

use anyhow::{bail, Context, Result};
use image::RgbImage;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::{
    gesture::GestureResult,
    hand::{HandObservation, Landmark, LANDMARK_COUNT},
};

/// Per-frame provider output: zero or more hands, plus the top-1 gesture
/// label with confidence. Both come from one helper round-trip per frame.
#[derive(Debug, Default)]
pub struct FrameAnalysis {
    pub hands: Vec<HandObservation>,
    pub gesture: Option<GestureResult>,
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct GestureJson {
    label: String,
    score: f32,
}

#[derive(Deserialize, Debug)]
struct AnalysisJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    gestures: Vec<GestureJson>,
    #[serde(default)]
    error: Option<String>,
}

pub struct HandPipeline {
    process: Child,
    stdout_reader: BufReader<ChildStdout>,
    min_hand_confidence: f32,
}

impl HandPipeline {
    /// Launch the helper and wait for its READY handshake. Passing no model
    /// path runs the helper in landmarks-only mode (no gesture classifier).
    pub fn new(
        python: &str,
        script: &str,
        model_path: Option<&str>,
        min_hand_confidence: f32,
    ) -> Result<Self> {
        let mut command = Command::new(python);
        command
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        if let Some(model_path) = model_path {
            command.arg("--model").arg(model_path);
        }

        info!("Starting landmark/gesture helper: {python} {script}");
        let mut process = command
            .spawn()
            .with_context(|| format!("failed to start helper process \"{python} {script}\""))?;

        let stdout = process
            .stdout
            .take()
            .context("failed to take helper stdout")?;
        let mut stdout_reader = BufReader::new(stdout);

        let mut ready_line = String::new();
        stdout_reader
            .read_line(&mut ready_line)
            .context("failed to read helper handshake")?;
        if ready_line.trim() != "READY" {
            bail!("helper did not signal READY, got: {}", ready_line.trim());
        }
        info!("Landmark/gesture helper ready");

        Ok(HandPipeline {
            process,
            stdout_reader,
            min_hand_confidence,
        })
    }

    /// Run one frame through the helper. Failures are transient from the
    /// caller's point of view (skip the frame, retry next iteration).
    pub fn analyze(&mut self, frame: &RgbImage) -> Result<FrameAnalysis> {
        let stdin = self
            .process
            .stdin
            .as_mut()
            .context("helper stdin unavailable")?;

        stdin.write_all(&frame.width().to_le_bytes())?;
        stdin.write_all(&frame.height().to_le_bytes())?;
        stdin.write_all(&3u32.to_le_bytes())?;
        stdin.write_all(frame.as_raw())?;
        stdin.flush()?;

        let mut response = String::new();
        self.stdout_reader
            .read_line(&mut response)
            .context("failed to read helper response")?;
        if response.is_empty() {
            bail!("helper closed its output stream");
        }

        let parsed: AnalysisJson = serde_json::from_str(&response)
            .with_context(|| format!("failed to parse helper response: {}", response.trim()))?;

        if let Some(error) = parsed.error {
            warn!("Helper reported an error for this frame: {error}");
            return Ok(FrameAnalysis::default());
        }

        let hands = parsed
            .hands
            .into_iter()
            .filter(|h| h.score >= self.min_hand_confidence)
            .filter_map(|h| {
                if h.landmarks.len() != LANDMARK_COUNT {
                    // Treat an incomplete landmark set as no hand at all,
                    // rather than defaulting missing points to the origin
                    warn!(
                        "Expected {} landmarks, got {}; dropping hand",
                        LANDMARK_COUNT,
                        h.landmarks.len()
                    );
                    return None;
                }
                let landmarks = h
                    .landmarks
                    .iter()
                    .map(|lm| Landmark {
                        x: lm.x,
                        y: lm.y,
                        z: lm.z,
                    })
                    .collect();
                HandObservation::from_landmarks(landmarks, h.score, h.handedness)
            })
            .collect::<Vec<_>>();

        let gesture = parsed.gestures.into_iter().next().map(|g| GestureResult {
            label: g.label,
            confidence: g.score,
        });

        if let Some(g) = &gesture {
            debug!(
                "Frame analysis: {} hand(s), gesture \"{}\" ({:.2})",
                hands.len(),
                g.label,
                g.confidence
            );
        }

        Ok(FrameAnalysis { hands, gesture })
    }
}

impl Drop for HandPipeline {
    fn drop(&mut self) {
        let _ = self.process.kill();
    }
}
