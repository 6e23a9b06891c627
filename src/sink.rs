use std::sync::mpsc::SyncSender;

use anyhow::{Context, Result};
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};

use crate::{interpreter::Action, worker::UiEvent};

/// Action Sink: executes the discrete actions emitted by the interpreter.
pub trait ActionSink {
    fn apply(&mut self, action: &Action) -> Result<()>;
}

/// Pointer movement and clicks go to the OS via enigo; scroll actions are
/// forwarded to the UI thread, since scrolling targets the in-app text
/// view rather than the desktop.
pub struct DesktopSink {
    enigo: Enigo,
    events: SyncSender<UiEvent>,
}

impl DesktopSink {
    pub fn new(events: SyncSender<UiEvent>) -> Result<Self> {
        let enigo =
            Enigo::new(&Settings::default()).context("failed to initialise input injection")?;
        Ok(DesktopSink { enigo, events })
    }

    /// Primary display size in pixels, used for pointer mapping
    pub fn screen_size(&self) -> Result<(u32, u32)> {
        let (width, height) = self
            .enigo
            .main_display()
            .context("failed to query main display size")?;
        Ok((width as u32, height as u32))
    }
}

impl ActionSink for DesktopSink {
    fn apply(&mut self, action: &Action) -> Result<()> {
        match *action {
            Action::MovePointer(x, y) => self
                .enigo
                .move_mouse(x, y, Coordinate::Abs)
                .context("failed to move pointer")?,
            Action::Click => self
                .enigo
                .button(Button::Left, Direction::Click)
                .context("failed to click")?,
            Action::ScrollVertical(units) => {
                // try_send: dropping a scroll tick beats blocking the worker
                let _ = self.events.try_send(UiEvent::ScrollVertical(units));
            }
            Action::ScrollHorizontal(units) => {
                let _ = self.events.try_send(UiEvent::ScrollHorizontal(units));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct RecordingSink {
    pub actions: Vec<Action>,
}

#[cfg(test)]
impl ActionSink for RecordingSink {
    fn apply(&mut self, action: &Action) -> Result<()> {
        self.actions.push(*action);
        Ok(())
    }
}
