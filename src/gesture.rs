/// The recognised gesture vocabulary. The classifier emits plain string
/// labels; anything that fails to parse is outside the vocabulary and
/// must be treated as a no-op by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureLabel {
    OpenPalm,
    Pinch,
    Idle,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
    ScrollUpStart,
    ScrollUpEnd,
    ScrollDownStart,
    ScrollDownEnd,
}

impl GestureLabel {
    /// Parse a classifier label string. Returns None for labels outside
    /// the vocabulary; this is deliberate, not a missing case.
    pub fn parse(label: &str) -> Option<GestureLabel> {
        match label {
            "open_palm" => Some(GestureLabel::OpenPalm),
            "pinch" => Some(GestureLabel::Pinch),
            "idle" => Some(GestureLabel::Idle),
            "scroll_up" => Some(GestureLabel::ScrollUp),
            "scroll_down" => Some(GestureLabel::ScrollDown),
            "scroll_left" => Some(GestureLabel::ScrollLeft),
            "scroll_right" => Some(GestureLabel::ScrollRight),
            "scrollUP_start" => Some(GestureLabel::ScrollUpStart),
            "scrollUP_end" => Some(GestureLabel::ScrollUpEnd),
            "scrollDOWN_start" => Some(GestureLabel::ScrollDownStart),
            "scrollDOWN_end" => Some(GestureLabel::ScrollDownEnd),
            _ => None,
        }
    }
}

/// Top-1 classifier output for one frame
#[derive(Debug, Clone)]
pub struct GestureResult {
    pub label: String,
    pub confidence: f32,
}

impl GestureResult {
    pub fn parsed(&self) -> Option<GestureLabel> {
        GestureLabel::parse(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_vocabulary() {
        assert_eq!(GestureLabel::parse("open_palm"), Some(GestureLabel::OpenPalm));
        assert_eq!(GestureLabel::parse("pinch"), Some(GestureLabel::Pinch));
        assert_eq!(GestureLabel::parse("idle"), Some(GestureLabel::Idle));
        assert_eq!(GestureLabel::parse("scroll_up"), Some(GestureLabel::ScrollUp));
        assert_eq!(
            GestureLabel::parse("scroll_down"),
            Some(GestureLabel::ScrollDown)
        );
        assert_eq!(
            GestureLabel::parse("scroll_left"),
            Some(GestureLabel::ScrollLeft)
        );
        assert_eq!(
            GestureLabel::parse("scroll_right"),
            Some(GestureLabel::ScrollRight)
        );
        assert_eq!(
            GestureLabel::parse("scrollUP_start"),
            Some(GestureLabel::ScrollUpStart)
        );
        assert_eq!(
            GestureLabel::parse("scrollUP_end"),
            Some(GestureLabel::ScrollUpEnd)
        );
        assert_eq!(
            GestureLabel::parse("scrollDOWN_start"),
            Some(GestureLabel::ScrollDownStart)
        );
        assert_eq!(
            GestureLabel::parse("scrollDOWN_end"),
            Some(GestureLabel::ScrollDownEnd)
        );
    }

    #[test]
    fn test_parse_unknown_labels() {
        assert_eq!(GestureLabel::parse("wave"), None);
        assert_eq!(GestureLabel::parse(""), None);
        assert_eq!(GestureLabel::parse("OPEN_PALM"), None);
    }
}
