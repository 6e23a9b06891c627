use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{sync_channel, Receiver, SyncSender},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use image::RgbImage;
use log::{debug, error, info, warn};

use crate::{
    camera::FrameSource,
    interpreter::{Interpreter, InterpreterSettings, STATUS_NO_GESTURE},
    provider::{FrameAnalysis, HandPipeline},
    settings::Cli,
    sink::{ActionSink, DesktopSink},
};

/// Events from the background worker to the UI thread. All UI state is
/// owned by the UI thread; the worker only ever communicates through this
/// channel, never by touching widgets.
pub enum UiEvent {
    Status(String),
    ScrollVertical(i32),
    ScrollHorizontal(i32),
    Preview(egui::ColorImage),
    /// The worker loop ended (fatal camera/provider failure)
    Stopped(String),
}

pub const EVENT_QUEUE_SIZE: usize = 32;

const PREVIEW_WIDTH: u32 = 200;
const PREVIEW_HEIGHT: u32 = 150;
const ERROR_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Fallback when the display size cannot be queried and no override is given
const DEFAULT_SCREEN: (u32, u32) = (1920, 1080);

pub struct WorkerHandle {
    join_handle: JoinHandle<()>,
    cancel: Arc<AtomicBool>,
}

impl WorkerHandle {
    /// Request the worker to stop, then wait for it up to the timeout.
    /// A worker stuck in a blocking camera read is detached rather than
    /// allowed to hang application exit.
    pub fn shutdown(self, timeout: Duration) {
        self.cancel.store(true, Ordering::Relaxed);
        let deadline = Instant::now() + timeout;
        while !self.join_handle.is_finished() {
            if Instant::now() >= deadline {
                warn!("Worker did not stop within {timeout:?}; detaching");
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        if self.join_handle.join().is_err() {
            error!("Worker thread panicked");
        }
    }
}

/// Start the frame-processing worker. Returns the handle for shutdown and
/// the receiving end of the bounded event channel for the UI thread.
pub fn spawn(cli: &Cli) -> (WorkerHandle, Receiver<UiEvent>) {
    let (events_tx, events_rx) = sync_channel(EVENT_QUEUE_SIZE);
    let cancel = Arc::new(AtomicBool::new(false));

    let cli = cli.clone();
    let cancel_flag = Arc::clone(&cancel);
    let join_handle = thread::spawn(move || {
        if let Err(e) = run(&cli, &cancel_flag, &events_tx) {
            error!("Worker terminated: {e:#}");
            let _ = events_tx.try_send(UiEvent::Stopped(format!("{e:#}")));
        }
    });

    (
        WorkerHandle {
            join_handle,
            cancel,
        },
        events_rx,
    )
}

fn run(cli: &Cli, cancel: &AtomicBool, events_tx: &SyncSender<UiEvent>) -> Result<()> {
    let mut sink = DesktopSink::new(events_tx.clone())?;

    let screen_size = {
        let detected = match sink.screen_size() {
            Ok(size) => size,
            Err(e) => {
                warn!("Could not query display size ({e:#}); assuming {DEFAULT_SCREEN:?}");
                DEFAULT_SCREEN
            }
        };
        (
            cli.screen_width.unwrap_or(detected.0),
            cli.screen_height.unwrap_or(detected.1),
        )
    };
    info!(
        "Mapping pointer to a {}x{} screen",
        screen_size.0, screen_size.1
    );

    let mut source =
        FrameSource::open(cli.camera_index, !cli.camera_no_mirror).context("camera unavailable")?;
    let mut pipeline = HandPipeline::new(
        &cli.detector_python,
        &cli.detector_script,
        Some(&cli.model_path),
        cli.min_hand_confidence,
    )?;
    let mut interpreter = Interpreter::new(InterpreterSettings {
        scroll_policy: cli.scroll_policy(),
        scroll_units: cli.scroll_units,
        screen_size,
    });

    let _ = events_tx.try_send(UiEvent::Status(String::from(STATUS_NO_GESTURE)));

    while !cancel.load(Ordering::Relaxed) {
        let frame = match source.grab() {
            Ok(frame) => frame,
            Err(e) => {
                // Transient: skip this frame and retry next iteration
                debug!("Skipping unreadable frame: {e:#}");
                thread::sleep(ERROR_RETRY_DELAY);
                continue;
            }
        };
        let analysis = match pipeline.analyze(&frame) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Provider failed on this frame: {e:#}");
                thread::sleep(ERROR_RETRY_DELAY);
                continue;
            }
        };

        process_frame(
            &mut interpreter,
            &analysis,
            (frame.width(), frame.height()),
            &mut sink,
            events_tx,
        )?;

        send_preview(&frame, events_tx);
    }

    info!("Worker stopped on shutdown request");
    Ok(())
}

/// One frame through the interpreter: status text (if changed) goes to the
/// UI channel, the action (if any) to the sink. Actions are applied in
/// frame order, one at a time.
pub fn process_frame(
    interpreter: &mut Interpreter,
    analysis: &FrameAnalysis,
    frame_size: (u32, u32),
    sink: &mut impl ActionSink,
    events_tx: &SyncSender<UiEvent>,
) -> Result<()> {
    let label = analysis.gesture.as_ref().and_then(|g| g.parsed());
    let interpretation = interpreter.interpret(analysis.hands.first(), label, frame_size);

    if let Some(status) = interpretation.status {
        let _ = events_tx.try_send(UiEvent::Status(String::from(status)));
    }
    if let Some(action) = interpretation.action {
        sink.apply(&action)?;
    }
    Ok(())
}

fn send_preview(frame: &RgbImage, events_tx: &SyncSender<UiEvent>) {
    let thumbnail = image::imageops::thumbnail(frame, PREVIEW_WIDTH, PREVIEW_HEIGHT);
    let size = [thumbnail.width() as usize, thumbnail.height() as usize];
    let pixels = thumbnail
        .as_raw()
        .chunks_exact(3)
        .map(|p| egui::Color32::from_rgb(p[0], p[1], p[2]))
        .collect();
    // Dropping previews when the queue is full is fine
    let _ = events_tx.try_send(UiEvent::Preview(egui::ColorImage { size, pixels }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gesture::GestureResult,
        hand::{HandObservation, Landmark, LANDMARK_COUNT},
        interpreter::{Action, ScrollPolicy},
        sink::RecordingSink,
    };

    fn analysis(label: &str) -> FrameAnalysis {
        let lm = Landmark {
            x: 0.5,
            y: 0.5,
            z: 0.,
        };
        let hand =
            HandObservation::from_landmarks(vec![lm; LANDMARK_COUNT], 0.9, String::from("Right"))
                .unwrap();
        FrameAnalysis {
            hands: vec![hand],
            gesture: Some(GestureResult {
                label: String::from(label),
                confidence: 0.8,
            }),
        }
    }

    fn interpreter() -> Interpreter {
        Interpreter::new(InterpreterSettings {
            scroll_policy: ScrollPolicy::Continuous,
            scroll_units: 3,
            screen_size: (1920, 1080),
        })
    }

    #[test]
    fn test_process_frame_applies_action_and_status() {
        let (events_tx, events_rx) = sync_channel(EVENT_QUEUE_SIZE);
        let mut sink = RecordingSink::default();
        let mut interpreter = interpreter();

        process_frame(
            &mut interpreter,
            &analysis("pinch"),
            (640, 480),
            &mut sink,
            &events_tx,
        )
        .unwrap();
        assert_eq!(sink.actions, vec![Action::Click]);
        match events_rx.try_recv().unwrap() {
            UiEvent::Status(s) => assert_eq!(s, "Click"),
            _ => panic!("expected a status event"),
        }

        // Held pinch: no further action, no further status
        process_frame(
            &mut interpreter,
            &analysis("pinch"),
            (640, 480),
            &mut sink,
            &events_tx,
        )
        .unwrap();
        assert_eq!(sink.actions.len(), 1);
        assert!(events_rx.try_recv().is_err());
    }

    #[test]
    fn test_process_frame_ignores_unknown_labels() {
        let (events_tx, events_rx) = sync_channel(EVENT_QUEUE_SIZE);
        let mut sink = RecordingSink::default();
        let mut interpreter = interpreter();

        process_frame(
            &mut interpreter,
            &analysis("thumbs_up"),
            (640, 480),
            &mut sink,
            &events_tx,
        )
        .unwrap();
        assert!(sink.actions.is_empty());
        assert!(events_rx.try_recv().is_err());
    }

    #[test]
    fn test_shutdown_joins_cooperative_worker() {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let join_handle = thread::spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                thread::sleep(Duration::from_millis(1));
            }
        });
        let handle = WorkerHandle {
            join_handle,
            cancel,
        };
        let started = Instant::now();
        handle.shutdown(Duration::from_secs(2));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_shutdown_detaches_stuck_worker() {
        let cancel = Arc::new(AtomicBool::new(false));
        let join_handle = thread::spawn(|| {
            thread::sleep(Duration::from_secs(10));
        });
        let handle = WorkerHandle {
            join_handle,
            cancel,
        };
        let started = Instant::now();
        handle.shutdown(Duration::from_millis(50));
        // Teardown proceeded without waiting for the stuck thread
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
