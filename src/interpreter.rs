use log::debug;
use map_range::MapRange;
use serde::{Deserialize, Serialize};

use crate::{gesture::GestureLabel, hand::HandObservation};

/// A discrete, user-visible action emitted for at most one per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the OS pointer to absolute screen pixel coordinates
    MovePointer(i32, i32),
    /// Single primary-button click at the current pointer location
    Click,
    /// Scroll the text view by signed units; negative is up
    ScrollVertical(i32),
    /// Scroll the text view by signed units; negative is left
    ScrollHorizontal(i32),
}

/// How vertical scroll gestures are debounced.
///
/// - `Continuous`: `scroll_up`/`scroll_down` emit a scroll action on every
///   frame the label persists
/// - `StartEnd`: a `scrollUP_start`/`scrollDOWN_start` label arms a latch and
///   the matching `_end` label emits exactly one scroll action
///
/// Left/right scroll is continuous under both policies. Each policy treats
/// the other policy's vertical labels as outside its vocabulary, since each
/// corresponds to a separately-trained label set.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPolicy {
    Continuous,
    StartEnd,
}

/// State carried across frames: the click debounce latch and the
/// scroll-start latches for the two-phase policy. Initialised once,
/// mutated every frame, never persisted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InterpreterState {
    click_latched: bool,
    scroll_up_started: bool,
    scroll_down_started: bool,
}

pub struct InterpreterSettings {
    pub scroll_policy: ScrollPolicy,
    /// Scroll step per emitted action, in text-view units
    pub scroll_units: i32,
    /// Target screen resolution for pointer mapping, in pixels
    pub screen_size: (u32, u32),
}

/// Per-frame output: at most one action, and a status text update
/// (None means "leave the displayed status unchanged")
#[derive(Debug, PartialEq, Eq)]
pub struct Interpretation {
    pub action: Option<Action>,
    pub status: Option<&'static str>,
}

impl Interpretation {
    fn none() -> Self {
        Interpretation {
            action: None,
            status: None,
        }
    }
}

pub const STATUS_NO_GESTURE: &str = "No Gesture Detected";

/// Maps the per-frame classifier output and landmark geometry onto discrete
/// actions. Emission depends only on the current frame and the carried
/// `InterpreterState`; the interpreter itself performs no I/O.
pub struct Interpreter {
    settings: InterpreterSettings,
    state: InterpreterState,
}

impl Interpreter {
    pub fn new(settings: InterpreterSettings) -> Self {
        Interpreter {
            settings,
            state: InterpreterState::default(),
        }
    }

    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    pub fn interpret(
        &mut self,
        hand: Option<&HandObservation>,
        label: Option<GestureLabel>,
        frame_size: (u32, u32),
    ) -> Interpretation {
        // No hand observed: no action regardless of label, state untouched
        let Some(hand) = hand else {
            return Interpretation {
                action: None,
                status: Some(STATUS_NO_GESTURE),
            };
        };

        // Labels outside the vocabulary are a no-op, state untouched
        let Some(label) = label else {
            return Interpretation::none();
        };

        // Any recognised label other than a held pinch releases the
        // click latch, so the next pinch clicks again
        if label != GestureLabel::Pinch {
            self.state.click_latched = false;
        }

        let units = self.settings.scroll_units;

        match label {
            GestureLabel::OpenPalm => {
                let centroid = hand.palm_centroid(frame_size.0, frame_size.1);
                let (x, y) = self.map_to_screen(centroid, frame_size);
                Interpretation {
                    action: Some(Action::MovePointer(x, y)),
                    status: Some("Cursor Movement"),
                }
            }
            GestureLabel::Pinch => {
                if self.state.click_latched {
                    // Gesture still held; suppress repeat clicks
                    Interpretation::none()
                } else {
                    self.state.click_latched = true;
                    Interpretation {
                        action: Some(Action::Click),
                        status: Some("Click"),
                    }
                }
            }
            GestureLabel::Idle => Interpretation {
                action: None,
                status: Some("Idle"),
            },
            GestureLabel::ScrollUp => match self.settings.scroll_policy {
                ScrollPolicy::Continuous => Interpretation {
                    action: Some(Action::ScrollVertical(-units)),
                    status: Some("Scroll Up"),
                },
                ScrollPolicy::StartEnd => Interpretation::none(),
            },
            GestureLabel::ScrollDown => match self.settings.scroll_policy {
                ScrollPolicy::Continuous => Interpretation {
                    action: Some(Action::ScrollVertical(units)),
                    status: Some("Scroll Down"),
                },
                ScrollPolicy::StartEnd => Interpretation::none(),
            },
            GestureLabel::ScrollLeft => Interpretation {
                action: Some(Action::ScrollHorizontal(-units)),
                status: Some("Scroll to Left"),
            },
            GestureLabel::ScrollRight => Interpretation {
                action: Some(Action::ScrollHorizontal(units)),
                status: Some("Scroll to Right"),
            },
            GestureLabel::ScrollUpStart => match self.settings.scroll_policy {
                ScrollPolicy::StartEnd => {
                    self.state.scroll_up_started = true;
                    Interpretation {
                        action: None,
                        status: Some("Scroll Up Started"),
                    }
                }
                ScrollPolicy::Continuous => Interpretation::none(),
            },
            GestureLabel::ScrollUpEnd => match self.settings.scroll_policy {
                ScrollPolicy::StartEnd => {
                    if self.state.scroll_up_started {
                        self.state.scroll_up_started = false;
                        Interpretation {
                            action: Some(Action::ScrollVertical(-units)),
                            status: Some("Scroll Up"),
                        }
                    } else {
                        // End without a preceding start
                        Interpretation::none()
                    }
                }
                ScrollPolicy::Continuous => Interpretation::none(),
            },
            GestureLabel::ScrollDownStart => match self.settings.scroll_policy {
                ScrollPolicy::StartEnd => {
                    self.state.scroll_down_started = true;
                    Interpretation {
                        action: None,
                        status: Some("Scroll Down Started"),
                    }
                }
                ScrollPolicy::Continuous => Interpretation::none(),
            },
            GestureLabel::ScrollDownEnd => match self.settings.scroll_policy {
                ScrollPolicy::StartEnd => {
                    if self.state.scroll_down_started {
                        self.state.scroll_down_started = false;
                        Interpretation {
                            action: Some(Action::ScrollVertical(units)),
                            status: Some("Scroll Down"),
                        }
                    } else {
                        Interpretation::none()
                    }
                }
                ScrollPolicy::Continuous => Interpretation::none(),
            },
        }
    }

    /// Linear rescale from frame pixel coordinates to screen pixel
    /// coordinates. NB: deliberately not clamped to screen bounds;
    /// targets just past an edge are forwarded as-is.
    fn map_to_screen(&self, frame_position: (f32, f32), frame_size: (u32, u32)) -> (i32, i32) {
        let (frame_x, frame_y) = frame_position;
        let (screen_w, screen_h) = self.settings.screen_size;
        let x = frame_x.map_range(0. ..frame_size.0 as f32, 0. ..screen_w as f32);
        let y = frame_y.map_range(0. ..frame_size.1 as f32, 0. ..screen_h as f32);
        if x < 0. || y < 0. || x > screen_w as f32 || y > screen_h as f32 {
            debug!("Pointer target ({x},{y}) outside screen bounds");
        }
        (x as i32, y as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{HandObservation, Landmark, LANDMARK_COUNT};

    fn hand_at(x: f32, y: f32) -> HandObservation {
        let lm = Landmark { x, y, z: 0. };
        HandObservation::from_landmarks(vec![lm; LANDMARK_COUNT], 0.9, String::from("Right"))
            .unwrap()
    }

    fn interpreter(policy: ScrollPolicy) -> Interpreter {
        Interpreter::new(InterpreterSettings {
            scroll_policy: policy,
            scroll_units: 3,
            screen_size: (1920, 1080),
        })
    }

    const FRAME: (u32, u32) = (640, 480);

    #[test]
    fn test_no_hand_emits_nothing_for_any_label() {
        let mut it = interpreter(ScrollPolicy::Continuous);
        for label in [
            Some(GestureLabel::OpenPalm),
            Some(GestureLabel::Pinch),
            Some(GestureLabel::ScrollUp),
            Some(GestureLabel::Idle),
            None,
        ] {
            let out = it.interpret(None, label, FRAME);
            assert_eq!(out.action, None);
        }
        assert_eq!(*it.state(), InterpreterState::default());
    }

    #[test]
    fn test_unknown_label_is_noop_and_preserves_state() {
        let mut it = interpreter(ScrollPolicy::Continuous);
        let hand = hand_at(0.5, 0.5);

        // Latch a pinch first, then feed an unrecognised label
        let out = it.interpret(Some(&hand), Some(GestureLabel::Pinch), FRAME);
        assert_eq!(out.action, Some(Action::Click));
        let latched = it.state().clone();

        let out = it.interpret(Some(&hand), None, FRAME);
        assert_eq!(out.action, None);
        assert_eq!(out.status, None);
        assert_eq!(*it.state(), latched);

        // Still latched: a further pinch must not click again
        let out = it.interpret(Some(&hand), Some(GestureLabel::Pinch), FRAME);
        assert_eq!(out.action, None);
    }

    #[test]
    fn test_pinch_debounce_sequence() {
        let mut it = interpreter(ScrollPolicy::Continuous);
        let hand = hand_at(0.5, 0.5);
        let sequence = [
            GestureLabel::Pinch,
            GestureLabel::Pinch,
            GestureLabel::Pinch,
            GestureLabel::Idle,
            GestureLabel::Pinch,
        ];
        let clicks = sequence
            .iter()
            .filter(|label| {
                it.interpret(Some(&hand), Some(**label), FRAME).action == Some(Action::Click)
            })
            .count();
        assert_eq!(clicks, 2);
    }

    #[test]
    fn test_open_palm_coordinate_mapping() {
        let mut it = interpreter(ScrollPolicy::Continuous);
        // All landmarks at the frame centre: centroid is (320, 240)
        let hand = hand_at(0.5, 0.5);
        let out = it.interpret(Some(&hand), Some(GestureLabel::OpenPalm), FRAME);
        assert_eq!(out.action, Some(Action::MovePointer(960, 540)));
        assert_eq!(out.status, Some("Cursor Movement"));
    }

    #[test]
    fn test_continuous_scroll_repeats_every_frame() {
        let mut it = interpreter(ScrollPolicy::Continuous);
        let hand = hand_at(0.5, 0.5);
        for _ in 0..3 {
            let out = it.interpret(Some(&hand), Some(GestureLabel::ScrollUp), FRAME);
            assert_eq!(out.action, Some(Action::ScrollVertical(-3)));
        }
        let out = it.interpret(Some(&hand), Some(GestureLabel::ScrollDown), FRAME);
        assert_eq!(out.action, Some(Action::ScrollVertical(3)));
        let out = it.interpret(Some(&hand), Some(GestureLabel::ScrollLeft), FRAME);
        assert_eq!(out.action, Some(Action::ScrollHorizontal(-3)));
        let out = it.interpret(Some(&hand), Some(GestureLabel::ScrollRight), FRAME);
        assert_eq!(out.action, Some(Action::ScrollHorizontal(3)));
    }

    #[test]
    fn test_two_phase_scroll_latch() {
        let mut it = interpreter(ScrollPolicy::StartEnd);
        let hand = hand_at(0.5, 0.5);

        // End without a preceding start: nothing
        let out = it.interpret(Some(&hand), Some(GestureLabel::ScrollUpEnd), FRAME);
        assert_eq!(out.action, None);

        // Start then end: exactly one scroll, latch reset
        let out = it.interpret(Some(&hand), Some(GestureLabel::ScrollUpStart), FRAME);
        assert_eq!(out.action, None);
        let out = it.interpret(Some(&hand), Some(GestureLabel::ScrollUpEnd), FRAME);
        assert_eq!(out.action, Some(Action::ScrollVertical(-3)));
        assert_eq!(*it.state(), InterpreterState::default());

        // A second immediate end: nothing
        let out = it.interpret(Some(&hand), Some(GestureLabel::ScrollUpEnd), FRAME);
        assert_eq!(out.action, None);
    }

    #[test]
    fn test_two_phase_scroll_down() {
        let mut it = interpreter(ScrollPolicy::StartEnd);
        let hand = hand_at(0.5, 0.5);
        let out = it.interpret(Some(&hand), Some(GestureLabel::ScrollDownStart), FRAME);
        assert_eq!(out.action, None);
        assert_eq!(out.status, Some("Scroll Down Started"));
        let out = it.interpret(Some(&hand), Some(GestureLabel::ScrollDownEnd), FRAME);
        assert_eq!(out.action, Some(Action::ScrollVertical(3)));
    }

    #[test]
    fn test_policies_ignore_each_others_vertical_labels() {
        let hand = hand_at(0.5, 0.5);

        let mut continuous = interpreter(ScrollPolicy::Continuous);
        for label in [GestureLabel::ScrollUpStart, GestureLabel::ScrollUpEnd] {
            let out = continuous.interpret(Some(&hand), Some(label), FRAME);
            assert_eq!(out.action, None);
        }
        assert_eq!(*continuous.state(), InterpreterState::default());

        let mut latched = interpreter(ScrollPolicy::StartEnd);
        for label in [GestureLabel::ScrollUp, GestureLabel::ScrollDown] {
            let out = latched.interpret(Some(&hand), Some(label), FRAME);
            assert_eq!(out.action, None);
        }
    }

    #[test]
    fn test_idle_is_idempotent() {
        let mut it = interpreter(ScrollPolicy::StartEnd);
        let hand = hand_at(0.5, 0.5);
        for _ in 0..5 {
            let out = it.interpret(Some(&hand), Some(GestureLabel::Idle), FRAME);
            assert_eq!(out.action, None);
            assert_eq!(out.status, Some("Idle"));
            assert_eq!(*it.state(), InterpreterState::default());
        }
    }
}
