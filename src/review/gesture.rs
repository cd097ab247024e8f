//! Touch disambiguation for the review screen: long presses navigate by
//! screen half, double taps flip, and a lone tap only opens the timing window.

/// Two taps within this window count as a double tap.
pub const DOUBLE_TAP_WINDOW_MS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Touch {
    /// A plain press-and-release, stamped in milliseconds.
    Tap { at_ms: u64 },
    /// A press-and-hold at horizontal position `x`.
    LongPress { x: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    Flip,
    Next,
    Previous,
}

#[derive(Debug, Default)]
pub struct GestureRecognizer {
    last_tap_ms: Option<u64>,
}

impl GestureRecognizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a touch into an action, or None when the touch only opens a
    /// double-tap window.
    pub fn recognize(&mut self, touch: Touch, view_width: f32) -> Option<GestureAction> {
        match touch {
            Touch::LongPress { x } => {
                // A long press cancels any pending tap window.
                self.last_tap_ms = None;
                if x >= view_width / 2.0 {
                    Some(GestureAction::Next)
                } else {
                    Some(GestureAction::Previous)
                }
            }
            Touch::Tap { at_ms } => match self.last_tap_ms {
                Some(last) if at_ms.saturating_sub(last) < DOUBLE_TAP_WINDOW_MS => {
                    self.last_tap_ms = None;
                    Some(GestureAction::Flip)
                }
                _ => {
                    self.last_tap_ms = Some(at_ms);
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f32 = 400.0;

    #[test]
    fn long_press_right_half_advances() {
        let mut rec = GestureRecognizer::new();
        assert_eq!(
            rec.recognize(Touch::LongPress { x: 200.0 }, WIDTH),
            Some(GestureAction::Next)
        );
        assert_eq!(
            rec.recognize(Touch::LongPress { x: 399.0 }, WIDTH),
            Some(GestureAction::Next)
        );
    }

    #[test]
    fn long_press_left_half_goes_back() {
        let mut rec = GestureRecognizer::new();
        assert_eq!(
            rec.recognize(Touch::LongPress { x: 0.0 }, WIDTH),
            Some(GestureAction::Previous)
        );
        assert_eq!(
            rec.recognize(Touch::LongPress { x: 199.9 }, WIDTH),
            Some(GestureAction::Previous)
        );
    }

    #[test]
    fn double_tap_within_window_flips_exactly_once() {
        let mut rec = GestureRecognizer::new();
        assert_eq!(rec.recognize(Touch::Tap { at_ms: 1_000 }, WIDTH), None);
        assert_eq!(
            rec.recognize(Touch::Tap { at_ms: 1_299 }, WIDTH),
            Some(GestureAction::Flip)
        );
    }

    #[test]
    fn slow_tap_pair_never_flips() {
        let mut rec = GestureRecognizer::new();
        assert_eq!(rec.recognize(Touch::Tap { at_ms: 1_000 }, WIDTH), None);
        // Exactly at the boundary is too slow; it starts a new window.
        assert_eq!(rec.recognize(Touch::Tap { at_ms: 1_300 }, WIDTH), None);
    }

    #[test]
    fn second_tap_of_a_slow_pair_opens_a_new_window() {
        let mut rec = GestureRecognizer::new();
        assert_eq!(rec.recognize(Touch::Tap { at_ms: 1_000 }, WIDTH), None);
        assert_eq!(rec.recognize(Touch::Tap { at_ms: 1_400 }, WIDTH), None);
        assert_eq!(
            rec.recognize(Touch::Tap { at_ms: 1_500 }, WIDTH),
            Some(GestureAction::Flip)
        );
    }

    #[test]
    fn flip_consumes_the_window() {
        let mut rec = GestureRecognizer::new();
        rec.recognize(Touch::Tap { at_ms: 1_000 }, WIDTH);
        assert_eq!(
            rec.recognize(Touch::Tap { at_ms: 1_100 }, WIDTH),
            Some(GestureAction::Flip)
        );
        // A third quick tap starts over rather than chaining flips.
        assert_eq!(rec.recognize(Touch::Tap { at_ms: 1_200 }, WIDTH), None);
    }

    #[test]
    fn long_press_cancels_pending_window() {
        let mut rec = GestureRecognizer::new();
        rec.recognize(Touch::Tap { at_ms: 1_000 }, WIDTH);
        rec.recognize(Touch::LongPress { x: 300.0 }, WIDTH);
        assert_eq!(rec.recognize(Touch::Tap { at_ms: 1_100 }, WIDTH), None);
    }
}
